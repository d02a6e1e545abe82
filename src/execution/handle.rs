//! Handles for spawned requests.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::WatsonError;
use crate::execution::response::ServiceResponse;
use crate::utils::cancel::CancelHandle;

/// A request running on the tokio runtime.
///
/// Await it for the result, call [`cancel`](Self::cancel) to abort the
/// in-flight exchange, or [`detach`](Self::detach) to let it finish
/// unobserved. Dropping the handle without either keeps the task running.
#[must_use = "await the handle, or call `detach()` to discard the result"]
#[derive(Debug)]
pub struct RequestHandle {
    join: JoinHandle<Result<ServiceResponse, WatsonError>>,
    cancel: CancelHandle,
}

impl RequestHandle {
    pub(crate) fn new(
        join: JoinHandle<Result<ServiceResponse, WatsonError>>,
        cancel: CancelHandle,
    ) -> Self {
        Self { join, cancel }
    }

    /// Abort the request. Awaiting afterwards yields a cancellation error.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the cancel handle, for cancelling from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Fire and forget. Failures are logged at debug level.
    pub fn detach(self) {
        let join = self.join;
        tokio::spawn(async move {
            match join.await {
                Ok(Ok(resp)) => {
                    tracing::debug!(target: "watson::http", status = resp.status(), "detached request finished");
                }
                Ok(Err(e)) => {
                    tracing::debug!(target: "watson::http", err = %e, "detached request failed");
                }
                Err(e) => {
                    tracing::debug!(target: "watson::http", err = %e, "detached request task aborted");
                }
            }
        });
    }
}

impl Future for RequestHandle {
    type Output = Result<ServiceResponse, WatsonError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.join).poll(cx).map(|res| match res {
            Ok(result) => result,
            Err(e) => Err(WatsonError::Http(format!("request task failed: {e}"))),
        })
    }
}
