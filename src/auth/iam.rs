//! IAM token manager.
//!
//! Token source, in order:
//! 1. a user-managed access token, used as is
//! 2. no token yet, or the refresh token is too old: request a new one with the API key
//! 3. the access token passed 80% of its lifetime: refresh it
//! 4. otherwise the cached token
//!
//! Tokens are cached in-memory; concurrent callers share one in-flight
//! request through the state lock.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex as AsyncMutex;

use crate::auth::TokenProvider;
use crate::error::WatsonError;
use crate::execution::normalize_response;

/// Fixed client credentials the IAM endpoint expects (`bx:bx`).
const IAM_CLIENT_AUTH: &str = "Basic Yng6Yng=";
const APIKEY_GRANT: &str = "urn:ibm:params:oauth:grant-type:apikey";
const REFRESH_GRANT: &str = "refresh_token";
const FRACTION_OF_TTL: f64 = 0.8;
const REFRESH_TOKEN_MAX_AGE_SECS: i64 = 7 * 24 * 3600;

/// Token response from the IAM endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IamTokenData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Unix timestamp at which the access token expires.
    #[serde(default)]
    pub expiration: i64,
}

impl IamTokenData {
    fn is_expired(&self, now: i64) -> bool {
        if self.expires_in == 0 || self.expiration == 0 {
            return true;
        }
        let refresh_time =
            self.expiration as f64 - self.expires_in as f64 * (1.0 - FRACTION_OF_TTL);
        refresh_time < now as f64
    }

    fn is_refresh_token_expired(&self, now: i64) -> bool {
        self.expiration == 0 || self.expiration + REFRESH_TOKEN_MAX_AGE_SECS < now
    }
}

/// Retrieves, stores and refreshes IAM access tokens.
pub struct IamTokenManager {
    http: reqwest::Client,
    iam_url: String,
    apikey: Option<SecretString>,
    user_token: Mutex<Option<SecretString>>,
    state: AsyncMutex<Option<IamTokenData>>,
}

impl fmt::Debug for IamTokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamTokenManager")
            .field("iam_url", &self.iam_url)
            .field("has_apikey", &self.apikey.is_some())
            .finish_non_exhaustive()
    }
}

impl IamTokenManager {
    pub fn new(
        http: reqwest::Client,
        iam_url: Option<String>,
        apikey: Option<SecretString>,
        access_token: Option<SecretString>,
    ) -> Self {
        Self {
            http,
            iam_url: iam_url.unwrap_or_else(|| crate::defaults::auth::IAM_URL.to_string()),
            apikey,
            user_token: Mutex::new(access_token),
            state: AsyncMutex::new(None),
        }
    }

    /// Switch to a user-managed access token. The caller is responsible for
    /// replacing it before it expires.
    pub fn set_access_token(&self, token: impl Into<String>) {
        let mut g = self.user_token.lock().unwrap_or_else(PoisonError::into_inner);
        *g = Some(SecretString::from(token.into()));
    }

    pub fn iam_url(&self) -> &str {
        &self.iam_url
    }

    fn user_token(&self) -> Option<String> {
        self.user_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// Current access token, requesting or refreshing as needed.
    pub async fn get_token(&self) -> Result<String, WatsonError> {
        if let Some(token) = self.user_token() {
            return Ok(token);
        }

        let mut state = self.state.lock().await;
        let now = chrono::Utc::now().timestamp();
        let data = match state.as_ref() {
            Some(info) if !info.is_refresh_token_expired(now) && !info.is_expired(now) => {
                return Ok(info.access_token.clone());
            }
            Some(info) if !info.is_refresh_token_expired(now) => {
                tracing::debug!(target: "watson::auth", "refreshing IAM token");
                let refresh = info.refresh_token.clone();
                self.post(&[("grant_type", REFRESH_GRANT), ("refresh_token", refresh.as_str())])
                    .await?
            }
            _ => {
                let apikey = self.apikey.as_ref().ok_or_else(|| {
                    WatsonError::Configuration("IAM API key was not specified".to_string())
                })?;
                tracing::debug!(target: "watson::auth", "requesting IAM token");
                self.post(&[
                    ("grant_type", APIKEY_GRANT),
                    ("apikey", apikey.expose_secret()),
                    ("response_type", "cloud_iam"),
                ])
                .await?
            }
        };

        let token = data.access_token.clone();
        *state = Some(data);
        Ok(token)
    }

    async fn post(&self, form: &[(&str, &str)]) -> Result<IamTokenData, WatsonError> {
        let resp = self
            .http
            .post(&self.iam_url)
            .header(reqwest::header::AUTHORIZATION, IAM_CLIENT_AUTH)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let raw = resp.bytes().await?;
        normalize_response(status, headers, raw)?.into_json()
    }
}

#[async_trait]
impl TokenProvider for IamTokenManager {
    async fn token(&self) -> Result<String, WatsonError> {
        self.get_token().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_body(access: &str, expires_in: i64, expiration: i64) -> serde_json::Value {
        json!({
            "access_token": access,
            "refresh_token": "refresh",
            "token_type": "Bearer",
            "expires_in": expires_in,
            "expiration": expiration,
        })
    }

    #[test]
    fn expiry_uses_eighty_percent_of_ttl() {
        let now = 10_000;
        let fresh = IamTokenData {
            access_token: "a".into(),
            refresh_token: "r".into(),
            token_type: "Bearer".into(),
            expires_in: 3600,
            expiration: now + 3600,
        };
        assert!(!fresh.is_expired(now));
        // 80% of the lifetime has passed once less than 720s remain.
        assert!(fresh.is_expired(now + 3600 - 700));
        assert!(!fresh.is_refresh_token_expired(now + 3600));
        assert!(fresh.is_refresh_token_expired(now + 3600 + REFRESH_TOKEN_MAX_AGE_SECS + 1));
    }

    #[tokio::test]
    async fn user_managed_token_short_circuits() {
        let manager = IamTokenManager::new(
            reqwest::Client::new(),
            Some("http://127.0.0.1:9/never".into()),
            None,
            Some(SecretString::from("user-token")),
        );
        assert_eq!(manager.get_token().await.unwrap(), "user-token");
        manager.set_access_token("replaced");
        assert_eq!(manager.get_token().await.unwrap(), "replaced");
    }

    #[tokio::test]
    async fn user_managed_token_survives_poisoned_lock() {
        let manager = IamTokenManager::new(
            reqwest::Client::new(),
            Some("http://127.0.0.1:9/never".into()),
            None,
            Some(SecretString::from("user-token")),
        );
        std::thread::scope(|s| {
            let poisoner = s.spawn(|| {
                let _guard = manager.user_token.lock().unwrap();
                panic!("holder panicked");
            });
            assert!(poisoner.join().is_err());
        });
        assert!(manager.user_token.is_poisoned());

        manager.set_access_token("replaced");
        assert_eq!(manager.get_token().await.unwrap(), "replaced");
    }

    #[tokio::test]
    async fn requests_then_caches_token() {
        let server = MockServer::start().await;
        let now = chrono::Utc::now().timestamp();
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .and(header("authorization", IAM_CLIENT_AUTH))
            .and(body_string_contains("apikey=my-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("t1", 3600, now + 3600)))
            .expect(1)
            .mount(&server)
            .await;

        let manager = IamTokenManager::new(
            reqwest::Client::new(),
            Some(format!("{}/identity/token", server.uri())),
            Some(SecretString::from("my-key")),
            None,
        );
        assert_eq!(manager.get_token().await.unwrap(), "t1");
        assert_eq!(manager.get_token().await.unwrap(), "t1");
    }

    #[tokio::test]
    async fn expired_token_is_refreshed() {
        let server = MockServer::start().await;
        let now = chrono::Utc::now().timestamp();
        Mock::given(method("POST"))
            .and(body_string_contains("grant_type=urn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("old", 3600, now - 10)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new", 3600, now + 3600)))
            .expect(1)
            .mount(&server)
            .await;

        let manager = IamTokenManager::new(
            reqwest::Client::new(),
            Some(server.uri()),
            Some(SecretString::from("k")),
            None,
        );
        assert_eq!(manager.get_token().await.unwrap(), "old");
        assert_eq!(manager.get_token().await.unwrap(), "new");
    }

    #[tokio::test]
    async fn failed_token_request_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorCode": "BXNIM0415E",
                "errorMessage": "Provided API key could not be found"
            })))
            .mount(&server)
            .await;

        let manager = IamTokenManager::new(
            reqwest::Client::new(),
            Some(server.uri()),
            Some(SecretString::from("bad")),
            None,
        );
        let err = manager.get_token().await.unwrap_err();
        assert_eq!(err.status_code(), Some(400));
    }

    #[tokio::test]
    async fn missing_apikey_is_a_configuration_error() {
        let manager = IamTokenManager::new(reqwest::Client::new(), None, None, None);
        assert!(matches!(
            manager.get_token().await,
            Err(WatsonError::Configuration(_))
        ));
    }
}
