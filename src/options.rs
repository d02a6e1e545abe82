//! Service construction options.
//!
//! Every facade is built from a [`ServiceOptions`]. Only what the caller
//! sets explicitly is stored here; credentials from the service catalog,
//! credentials file and environment are merged in later by the
//! [`CredentialResolver`](crate::auth::CredentialResolver).

use std::fmt;

use secrecy::SecretString;

use crate::auth::CredentialResolver;
use crate::auth::credentials::Credentials;
use crate::types::HttpConfig;
use crate::utils::http_headers::{Headers, set_header};

/// Options accepted by every service constructor.
#[derive(Clone, Default)]
pub struct ServiceOptions {
    /// Base URL override. A trailing slash is stripped.
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub api_key: Option<SecretString>,
    /// Watson authorization token. Bypasses every other credential.
    pub token: Option<SecretString>,
    pub iam_apikey: Option<SecretString>,
    pub iam_access_token: Option<SecretString>,
    pub iam_url: Option<String>,
    pub use_unauthenticated: bool,
    /// Headers sent with every request of the service.
    pub headers: Headers,
    /// API version date, required by versioned services.
    pub version: Option<String>,
    /// Sends `X-Watson-Learning-Opt-Out: 1` with every request.
    pub learning_opt_out: bool,
    pub http_config: HttpConfig,
    /// Pre-built client; takes precedence over `http_config`.
    pub http_client: Option<reqwest::Client>,
    /// Credential sources. `None` reads the process environment.
    pub credential_resolver: Option<CredentialResolver>,
}

impl fmt::Debug for ServiceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceOptions")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("has_password", &self.password.is_some())
            .field("has_api_key", &self.api_key.is_some())
            .field("has_token", &self.token.is_some())
            .field("has_iam_apikey", &self.iam_apikey.is_some())
            .field("has_iam_access_token", &self.iam_access_token.is_some())
            .field("iam_url", &self.iam_url)
            .field("use_unauthenticated", &self.use_unauthenticated)
            .field("version", &self.version)
            .field("learning_opt_out", &self.learning_opt_out)
            .field("http_config", &self.http_config)
            .finish_non_exhaustive()
    }
}

impl ServiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Username and password in one call.
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username(username).password(password)
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    pub fn iam_apikey(mut self, apikey: impl Into<String>) -> Self {
        self.iam_apikey = Some(SecretString::from(apikey.into()));
        self
    }

    pub fn iam_access_token(mut self, token: impl Into<String>) -> Self {
        self.iam_access_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn iam_url(mut self, url: impl Into<String>) -> Self {
        self.iam_url = Some(url.into());
        self
    }

    pub fn use_unauthenticated(mut self, enabled: bool) -> Self {
        self.use_unauthenticated = enabled;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn learning_opt_out(mut self, enabled: bool) -> Self {
        self.learning_opt_out = enabled;
        self
    }

    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn credential_resolver(mut self, resolver: CredentialResolver) -> Self {
        self.credential_resolver = Some(resolver);
        self
    }

    /// The explicitly provided credentials. These always win over discovered ones.
    pub fn explicit_credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
            api_key: self.api_key.clone(),
            iam_apikey: self.iam_apikey.clone(),
            url: self.url.clone(),
        }
    }

    /// The `reqwest::Client` to use: the supplied one or one built from `http_config`.
    pub fn build_http_client(&self) -> Result<reqwest::Client, crate::error::WatsonError> {
        match &self.http_client {
            Some(client) => Ok(client.clone()),
            None => self.http_config.build_client(),
        }
    }
}
