//! Authentication helpers and token providers.
//!
//! Static credentials (Basic auth, Watson tokens, API keys) are resolved once
//! by [`CredentialResolver`] and baked into the service defaults. IAM bearer
//! tokens change over time and are supplied per request by a
//! [`TokenProvider`].

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::WatsonError;

pub mod credentials;
pub mod iam;
pub mod resolver;

pub use credentials::{
    CredentialSource, Credentials, CredentialsFile, EnvironmentCredentials, VcapServices,
};
pub use iam::IamTokenManager;
pub use resolver::{AuthScheme, CredentialKind, CredentialResolver, ResolvedAuth};

/// Supplies Bearer tokens for the `Authorization` header.
///
/// Implementations may cache internally and refresh tokens when necessary.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns an access token suitable for `Authorization: Bearer <token>`.
    async fn token(&self) -> Result<String, WatsonError>;
}

/// A token managed outside the SDK.
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String, WatsonError> {
        Ok(self.token.expose_secret().to_string())
    }
}
