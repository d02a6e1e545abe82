//! Authorization V1
//!
//! Issues short-lived Watson tokens for a target service URL, for use in
//! untrusted environments such as browsers. With IAM credentials the
//! current IAM access token is returned instead.

use crate::auth::CredentialKind;
use crate::error::WatsonError;
use crate::execution::HttpMethod;
use crate::options::ServiceOptions;
use crate::service::{Endpoint, ServiceCore, ServiceInfo};

const GET_TOKEN: Endpoint = Endpoint::new(HttpMethod::Get, "/v1/token", &["url"]);
const AUTHORIZATION_PATH: &str = "/authorization/api";

/// Point `url` at the authorization API on the same host.
fn authorization_url(url: &str) -> Result<String, WatsonError> {
    let mut parsed = reqwest::Url::parse(url)
        .map_err(|e| WatsonError::Configuration(format!("Invalid url '{url}': {e}")))?;
    parsed.set_path(AUTHORIZATION_PATH);
    parsed.set_query(None);
    Ok(parsed.to_string())
}

/// Authorization client.
#[derive(Debug, Clone)]
pub struct AuthorizationV1 {
    core: ServiceCore,
    target_url: Option<String>,
}

impl AuthorizationV1 {
    pub const INFO: ServiceInfo = ServiceInfo {
        name: "authorization",
        default_url: "https://stream.watsonplatform.net/authorization/api",
        credential_kind: CredentialKind::UsernamePassword,
        versioned: false,
    };

    /// `options.url` names the target service. Requests go to the
    /// authorization API on the host of the resolved URL, whether it was
    /// given explicitly or discovered.
    pub fn new(options: ServiceOptions) -> Result<Self, WatsonError> {
        let target_url = options.url.clone();
        Ok(Self {
            core: ServiceCore::with_base_url(Self::INFO, options, authorization_url)?,
            target_url,
        })
    }

    pub fn core(&self) -> &ServiceCore {
        &self.core
    }

    /// A token for `url`, defaulting to the URL given at construction.
    pub async fn get_token(&self, url: Option<&str>) -> Result<String, WatsonError> {
        if let Some(manager) = self.core.token_manager() {
            return manager.get_token().await;
        }

        let target = url.or(self.target_url.as_deref());
        let request = GET_TOKEN.request().query_opt("url", target);
        let response = self.core.execute(request, GET_TOKEN.required).await?;
        Ok(String::from_utf8_lossy(&response.into_bytes()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialResolver;

    #[test]
    fn base_url_is_rewritten_to_authorization_api() {
        let auth = AuthorizationV1::new(
            ServiceOptions::new()
                .url("https://stream.watsonplatform.net/speech-to-text/api")
                .basic_auth("u", "p")
                .credential_resolver(CredentialResolver::empty()),
        )
        .unwrap();
        assert_eq!(
            auth.core().base_url(),
            "https://stream.watsonplatform.net/authorization/api"
        );
    }

    #[test]
    fn discovered_url_is_rewritten_to_authorization_api() {
        let lookup: crate::auth::credentials::EnvLookup = std::sync::Arc::new(|key| match key {
            "AUTHORIZATION_URL" => {
                Some("https://stream.example.net/speech-to-text/api".to_string())
            }
            "AUTHORIZATION_USERNAME" => Some("u".to_string()),
            "AUTHORIZATION_PASSWORD" => Some("p".to_string()),
            _ => None,
        });
        let auth = AuthorizationV1::new(
            ServiceOptions::new().credential_resolver(CredentialResolver::from_lookup(lookup)),
        )
        .unwrap();
        assert_eq!(auth.core().base_url(), "https://stream.example.net/authorization/api");
        assert_eq!(auth.target_url, None);
    }

    #[test]
    fn default_url_is_unchanged() {
        let auth = AuthorizationV1::new(
            ServiceOptions::new()
                .basic_auth("u", "p")
                .credential_resolver(CredentialResolver::empty()),
        )
        .unwrap();
        assert_eq!(auth.core().base_url(), AuthorizationV1::INFO.default_url);
    }

    #[test]
    fn invalid_url_fails_construction() {
        let err = AuthorizationV1::new(
            ServiceOptions::new()
                .url("not a url")
                .basic_auth("u", "p")
                .credential_resolver(CredentialResolver::empty()),
        )
        .unwrap_err();
        match err {
            WatsonError::Configuration(message) => assert!(message.contains("Invalid url")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_target_url_is_a_validation_error() {
        let auth = AuthorizationV1::new(
            ServiceOptions::new()
                .basic_auth("u", "p")
                .credential_resolver(CredentialResolver::empty()),
        )
        .unwrap();
        let err = auth.get_token(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameters: url");
    }
}
