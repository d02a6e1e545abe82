//! Credential resolution.
//!
//! Resolution order for a service:
//! 1. an explicit Watson token short-circuits everything else
//! 2. otherwise the injected sources are layered (lowest precedence first)
//!    and the explicit options are layered on top
//! 3. IAM credentials win over Basic / API key credentials
//! 4. the service's [`CredentialKind`] decides what is required, unless
//!    `use_unauthenticated` is set

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::auth::credentials::{
    CredentialSource, Credentials, CredentialsFile, EnvLookup, EnvironmentCredentials,
    VcapServices, process_env,
};
use crate::defaults::auth::WATSON_TOKEN_HEADER;
use crate::error::WatsonError;
use crate::execution::ServiceDefaults;
use crate::options::ServiceOptions;
use crate::utils::http_headers::basic_auth_value;

/// What a service needs to authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// HTTP Basic auth
    UsernamePassword,
    /// `api_key` query parameter
    ApiKey,
}

/// How requests of a service are authenticated.
#[derive(Clone)]
pub enum AuthScheme {
    /// `X-Watson-Authorization-Token` header
    Token(SecretString),
    /// `Authorization: Basic ...` header
    Basic {
        username: String,
        password: SecretString,
    },
    /// `api_key` query parameter
    ApiKey(SecretString),
    /// Bearer tokens from an IAM token manager
    Iam {
        apikey: Option<SecretString>,
        access_token: Option<SecretString>,
        iam_url: Option<String>,
    },
    Unauthenticated,
}

impl fmt::Debug for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token"),
            Self::Basic { username, .. } => {
                f.debug_struct("Basic").field("username", username).finish_non_exhaustive()
            }
            Self::ApiKey(_) => f.write_str("ApiKey"),
            Self::Iam { iam_url, .. } => {
                f.debug_struct("Iam").field("iam_url", iam_url).finish_non_exhaustive()
            }
            Self::Unauthenticated => f.write_str("Unauthenticated"),
        }
    }
}

impl AuthScheme {
    /// Bake static credentials into the service defaults. IAM is applied per
    /// request by a token provider instead.
    pub fn apply(&self, defaults: ServiceDefaults) -> ServiceDefaults {
        match self {
            Self::Token(token) => defaults.with_header(WATSON_TOKEN_HEADER, token.expose_secret()),
            Self::Basic { username, password } => defaults.with_header(
                "Authorization",
                basic_auth_value(username, password.expose_secret()),
            ),
            Self::ApiKey(key) => defaults.with_query("api_key", key.expose_secret()),
            Self::Iam { .. } | Self::Unauthenticated => defaults,
        }
    }
}

/// Result of resolving credentials for one service.
#[derive(Debug, Clone)]
pub struct ResolvedAuth {
    pub scheme: AuthScheme,
    /// Merged credentials, kept for [`crate::service::ServiceCore::credentials`].
    pub credentials: Credentials,
}

impl ResolvedAuth {
    /// Base URL discovered alongside the credentials, if any.
    pub fn url(&self) -> Option<&str> {
        self.credentials.url.as_deref()
    }
}

/// Merges credential sources and explicit options into an [`AuthScheme`].
#[derive(Clone, Default)]
pub struct CredentialResolver {
    sources: Vec<Arc<dyn CredentialSource>>,
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl CredentialResolver {
    /// No discovery; only explicit options count.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Service catalog, credentials file, then environment variables, all
    /// read through `env`.
    pub fn from_lookup(env: EnvLookup) -> Self {
        Self::empty()
            .with_source(VcapServices::from_env(&env))
            .with_source(CredentialsFile::discover(&env))
            .with_source(EnvironmentCredentials::new(env))
    }

    /// Discovery against the process environment.
    pub fn from_environment() -> Self {
        Self::from_lookup(process_env())
    }

    /// Add a source. Later sources take precedence over earlier ones.
    pub fn with_source(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Layer every source, then the explicit options.
    pub fn merged_credentials(&self, service_name: &str, options: &ServiceOptions) -> Credentials {
        self.sources
            .iter()
            .filter_map(|s| s.lookup(service_name))
            .fold(Credentials::default(), Credentials::merge)
            .merge(options.explicit_credentials())
    }

    pub fn resolve(
        &self,
        service_name: &str,
        kind: CredentialKind,
        options: &ServiceOptions,
    ) -> Result<ResolvedAuth, WatsonError> {
        if let Some(token) = &options.token {
            tracing::debug!(target: "watson::auth", service = service_name, "using watson token");
            return Ok(ResolvedAuth {
                scheme: AuthScheme::Token(token.clone()),
                credentials: options.explicit_credentials(),
            });
        }

        let credentials = self.merged_credentials(service_name, options);

        let scheme = if credentials.iam_apikey.is_some() || options.iam_access_token.is_some() {
            AuthScheme::Iam {
                apikey: credentials.iam_apikey.clone(),
                access_token: options.iam_access_token.clone(),
                iam_url: options.iam_url.clone(),
            }
        } else {
            match kind {
                CredentialKind::UsernamePassword => {
                    match (&credentials.username, &credentials.password) {
                        (Some(username), Some(password)) => AuthScheme::Basic {
                            username: username.clone(),
                            password: password.clone(),
                        },
                        _ if options.use_unauthenticated => AuthScheme::Unauthenticated,
                        _ => {
                            return Err(WatsonError::Configuration(
                                "Argument error: username and password are required unless use_unauthenticated is set"
                                    .to_string(),
                            ));
                        }
                    }
                }
                CredentialKind::ApiKey => match &credentials.api_key {
                    Some(key) => AuthScheme::ApiKey(key.clone()),
                    None if options.use_unauthenticated => AuthScheme::Unauthenticated,
                    None => {
                        return Err(WatsonError::Configuration(
                            "Argument error: api_key was not specified".to_string(),
                        ));
                    }
                },
            }
        };

        tracing::debug!(target: "watson::auth", service = service_name, scheme = ?scheme, "resolved credentials");
        Ok(ResolvedAuth {
            scheme,
            credentials,
        })
    }
}
