//! Cancellation utilities
//!
//! Provides first-class cancellation handles for in-flight requests.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::WatsonError;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. The guarded future is dropped at its next await
    /// point, which closes the underlying HTTP connection.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Run `future` until it completes or `handle` is cancelled.
pub async fn with_cancellation<F, T>(handle: CancelHandle, future: F) -> Result<T, WatsonError>
where
    F: Future<Output = Result<T, WatsonError>>,
{
    tokio::select! {
        _ = handle.cancelled() => Err(WatsonError::Http("request cancelled".to_string())),
        result = future => result,
    }
}
