//! Credential sources.
//!
//! Each source answers one question: what credentials does it hold for a
//! service name such as `natural_language_classifier`? Sources never touch
//! the process environment directly; environment access goes through an
//! injected lookup function so tests can supply their own.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;

use crate::defaults::auth::{CREDENTIALS_FILE_ENV, CREDENTIALS_FILE_NAME, VCAP_SERVICES_ENV};
use crate::error::WatsonError;

/// Environment lookup: variable name in, value out.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by the process environment.
pub fn process_env() -> EnvLookup {
    Arc::new(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

/// Credentials for one service. Every field is optional; sources fill in
/// what they know and [`Credentials::merge`] layers them.
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub api_key: Option<SecretString>,
    pub iam_apikey: Option<SecretString>,
    pub url: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("iam_apikey", &self.iam_apikey.as_ref().map(|_| "[REDACTED]"))
            .field("url", &self.url)
            .finish()
    }
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.api_key.is_none()
            && self.iam_apikey.is_none()
            && self.url.is_none()
    }

    /// Layer `higher` on top of `self`; fields set in `higher` win.
    pub fn merge(self, higher: Credentials) -> Credentials {
        Credentials {
            username: higher.username.or(self.username),
            password: higher.password.or(self.password),
            api_key: higher.api_key.or(self.api_key),
            iam_apikey: higher.iam_apikey.or(self.iam_apikey),
            url: higher.url.or(self.url),
        }
    }

    /// Read `{PREFIX}_USERNAME`, `_PASSWORD`, `_URL`, `_API_KEY` and
    /// `_APIKEY` / `_IAM_APIKEY` through `get`.
    fn from_prefixed(service_name: &str, get: impl Fn(&str) -> Option<String>) -> Self {
        let prefix = service_name.to_uppercase();
        let var = |suffix: &str| get(&format!("{prefix}_{suffix}")).filter(|v| !v.is_empty());
        Credentials {
            username: var("USERNAME"),
            password: var("PASSWORD").map(SecretString::from),
            api_key: var("API_KEY").map(SecretString::from),
            iam_apikey: var("IAM_APIKEY")
                .or_else(|| var("APIKEY"))
                .map(SecretString::from),
            url: var("URL"),
        }
    }
}

/// A place credentials can come from.
pub trait CredentialSource: Send + Sync {
    /// Credentials held for `service_name`, if any.
    fn lookup(&self, service_name: &str) -> Option<Credentials>;
}

// ---------------------------------------------------------------------------
// Platform service catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct VcapInstance {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    credentials: HashMap<String, Value>,
}

/// The Cloud Foundry `VCAP_SERVICES` catalog.
///
/// A service matches when its catalog key starts with the service name or
/// one of its instances is named exactly that; the first instance wins.
#[derive(Debug, Clone, Default)]
pub struct VcapServices {
    services: HashMap<String, Vec<VcapInstance>>,
}

impl VcapServices {
    /// Parse the catalog JSON.
    pub fn from_json(json: &str) -> Result<Self, WatsonError> {
        let services = serde_json::from_str(json)
            .map_err(|e| WatsonError::Configuration(format!("Invalid {VCAP_SERVICES_ENV}: {e}")))?;
        Ok(Self { services })
    }

    /// Read the catalog through `env`. Missing or malformed catalogs are empty.
    pub fn from_env(env: &EnvLookup) -> Self {
        match env(VCAP_SERVICES_ENV) {
            Some(json) => Self::from_json(&json).unwrap_or_else(|e| {
                tracing::debug!(target: "watson::auth", err = %e, "ignoring malformed service catalog");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    fn instance(&self, service_name: &str) -> Option<&VcapInstance> {
        let mut keys: Vec<&String> = self.services.keys().collect();
        keys.sort();
        keys.iter()
            .find(|k| k.starts_with(service_name))
            .and_then(|k| self.services.get(*k))
            .and_then(|instances| instances.first())
            .or_else(|| {
                self.services
                    .values()
                    .flatten()
                    .find(|i| i.name.as_deref() == Some(service_name))
            })
    }
}

impl CredentialSource for VcapServices {
    fn lookup(&self, service_name: &str) -> Option<Credentials> {
        let creds = &self.instance(service_name)?.credentials;
        let text = |key: &str| creds.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Credentials {
            username: text("username"),
            password: text("password").map(SecretString::from),
            api_key: text("api_key").map(SecretString::from),
            iam_apikey: text("apikey").map(SecretString::from),
            url: text("url"),
        })
    }
}

// ---------------------------------------------------------------------------
// Environment variables
// ---------------------------------------------------------------------------

/// `{SERVICE}_USERNAME`-style environment variables.
#[derive(Clone)]
pub struct EnvironmentCredentials {
    env: EnvLookup,
}

impl EnvironmentCredentials {
    pub fn new(env: EnvLookup) -> Self {
        Self { env }
    }
}

impl fmt::Debug for EnvironmentCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentCredentials").finish_non_exhaustive()
    }
}

impl CredentialSource for EnvironmentCredentials {
    fn lookup(&self, service_name: &str) -> Option<Credentials> {
        let creds = Credentials::from_prefixed(service_name, |k| (self.env)(k));
        (!creds.is_empty()).then_some(creds)
    }
}

// ---------------------------------------------------------------------------
// Credentials file
// ---------------------------------------------------------------------------

/// An `ibm-credentials.env` file in dotenv format, using the same
/// `{SERVICE}_*` keys as the environment.
#[derive(Clone, Default)]
pub struct CredentialsFile {
    path: Option<PathBuf>,
    vars: HashMap<String, String>,
}

impl fmt::Debug for CredentialsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsFile")
            .field("path", &self.path)
            .field("keys", &self.vars.len())
            .finish()
    }
}

fn is_file(path: &Path) -> bool {
    path.is_file()
}

fn with_file_name(path: &Path) -> PathBuf {
    if path.ends_with(CREDENTIALS_FILE_NAME) {
        path.to_path_buf()
    } else {
        path.join(CREDENTIALS_FILE_NAME)
    }
}

impl CredentialsFile {
    /// Parse a credentials file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WatsonError> {
        let path = path.as_ref();
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            WatsonError::Configuration(format!(
                "Failed to read credentials file {}: {e}",
                path.display()
            ))
        })?;
        let mut vars = HashMap::new();
        for item in iter {
            let (k, v) = item.map_err(|e| {
                WatsonError::Configuration(format!(
                    "Failed to parse credentials file {}: {e}",
                    path.display()
                ))
            })?;
            vars.insert(k, v);
        }
        Ok(Self {
            path: Some(path.to_path_buf()),
            vars,
        })
    }

    /// Locate the credentials file:
    /// 1. `IBM_CREDENTIALS_FILE`, naming the file or its directory
    /// 2. `ibm-credentials.env` in the home directory
    /// 3. `ibm-credentials.env` in the working directory
    ///
    /// When `IBM_CREDENTIALS_FILE` is set but names nothing usable the other
    /// locations are not tried.
    pub fn locate(env: &EnvLookup) -> Option<PathBuf> {
        if let Some(given) = env(CREDENTIALS_FILE_ENV) {
            let given = PathBuf::from(given);
            if is_file(&given) {
                return Some(given);
            }
            let joined = with_file_name(&given);
            return is_file(&joined).then_some(joined);
        }

        let home = directories::BaseDirs::new().map(|d| with_file_name(d.home_dir()));
        let cwd = std::env::current_dir().ok().map(|d| with_file_name(&d));
        [home, cwd].into_iter().flatten().find(|p| is_file(p))
    }

    /// Locate and parse the credentials file. A missing or unreadable file
    /// yields an empty source.
    pub fn discover(env: &EnvLookup) -> Self {
        let Some(path) = Self::locate(env) else {
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(file) => {
                tracing::debug!(target: "watson::auth", path = %path.display(), "loaded credentials file");
                file
            }
            Err(e) => {
                tracing::debug!(target: "watson::auth", err = %e, "ignoring credentials file");
                Self::default()
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl CredentialSource for CredentialsFile {
    fn lookup(&self, service_name: &str) -> Option<Credentials> {
        let creds = Credentials::from_prefixed(service_name, |k| self.vars.get(k).cloned());
        (!creds.is_empty()).then_some(creds)
    }
}
