//! Shared service plumbing.
//!
//! Every facade owns a [`ServiceCore`]: the resolved base URL, the default
//! headers and query parameters, and a [`RequestExecutor`]. Facades only
//! declare endpoints ([`Endpoint`]) and map their typed parameters onto a
//! [`ServiceRequest`].

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{
    AuthScheme, CredentialKind, CredentialResolver, Credentials, IamTokenManager,
};
use crate::defaults::auth::LEARNING_OPT_OUT_HEADER;
use crate::error::WatsonError;
use crate::execution::{
    HttpMethod, LoggingInterceptor, RequestExecutor, RequestHandle, ServiceDefaults,
    ServiceRequest, ServiceResponse,
};
use crate::options::ServiceOptions;
use crate::utils::path::strip_trailing_slash;

/// Static description of a service.
#[derive(Debug, Clone, Copy)]
pub struct ServiceInfo {
    /// Snake-case name used for credential lookup, e.g. `speech_to_text`.
    pub name: &'static str,
    pub default_url: &'static str,
    pub credential_kind: CredentialKind,
    /// Versioned services require a `version` and send it as a query parameter.
    pub versioned: bool,
}

/// One documented endpoint: verb, path template and required parameters.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
    pub required: &'static [&'static str],
}

impl Endpoint {
    pub const fn new(
        method: HttpMethod,
        path: &'static str,
        required: &'static [&'static str],
    ) -> Self {
        Self {
            method,
            path,
            required,
        }
    }

    /// A fresh request against this endpoint.
    pub fn request(&self) -> ServiceRequest {
        ServiceRequest::new(self.method, self.path)
    }
}

/// Executor and resolved configuration shared by every call of a service.
#[derive(Debug, Clone)]
pub struct ServiceCore {
    info: ServiceInfo,
    executor: RequestExecutor,
    credentials: Arc<Credentials>,
    iam: Option<Arc<IamTokenManager>>,
}

impl ServiceCore {
    /// Resolve credentials and defaults. Fails when a versioned service has
    /// no `version` or when no usable credentials are found.
    pub fn new(info: ServiceInfo, options: ServiceOptions) -> Result<Self, WatsonError> {
        Self::with_base_url(info, options, |url| Ok(url.to_string()))
    }

    /// Like [`ServiceCore::new`], with `map_url` applied to the resolved base
    /// URL, whichever source it came from.
    pub fn with_base_url<F>(
        info: ServiceInfo,
        options: ServiceOptions,
        map_url: F,
    ) -> Result<Self, WatsonError>
    where
        F: FnOnce(&str) -> Result<String, WatsonError>,
    {
        let version = options.version.clone().filter(|v| !v.is_empty());
        if info.versioned && version.is_none() {
            return Err(WatsonError::Configuration(
                "Argument error: version was not specified".to_string(),
            ));
        }

        let resolver = options
            .credential_resolver
            .clone()
            .unwrap_or_else(CredentialResolver::from_environment);
        let auth = resolver.resolve(info.name, info.credential_kind, &options)?;

        let base_url = map_url(auth.url().unwrap_or(info.default_url))?;
        let base_url = strip_trailing_slash(&base_url).to_string();
        let http_client = options.build_http_client()?;

        // Caller headers override the auth header.
        let mut defaults = auth
            .scheme
            .apply(ServiceDefaults::new(base_url).with_header("Accept", "application/json"));
        for (name, value) in &options.http_config.headers {
            defaults = defaults.with_header(name.clone(), value.clone());
        }
        for (name, value) in &options.headers {
            defaults = defaults.with_header(name.clone(), value.clone());
        }
        if options.learning_opt_out {
            defaults = defaults.with_header(LEARNING_OPT_OUT_HEADER, "1");
        }
        if info.versioned
            && let Some(version) = version
        {
            defaults = defaults.with_query("version", version);
        }

        let mut executor = RequestExecutor::new(info.name, http_client.clone(), defaults)
            .with_user_agent(options.http_config.user_agent())
            .with_interceptor(Arc::new(LoggingInterceptor));

        let iam = match &auth.scheme {
            AuthScheme::Iam {
                apikey,
                access_token,
                iam_url,
            } => {
                let manager = Arc::new(IamTokenManager::new(
                    http_client,
                    iam_url.clone(),
                    apikey.clone(),
                    access_token.clone(),
                ));
                executor = executor.with_token_provider(manager.clone());
                Some(manager)
            }
            _ => None,
        };

        tracing::debug!(
            target: "watson::auth",
            service = info.name,
            base_url = %executor.defaults().base_url,
            "service configured"
        );

        Ok(Self {
            info,
            executor,
            credentials: Arc::new(auth.credentials),
            iam,
        })
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    pub fn name(&self) -> &'static str {
        self.info.name
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.executor.defaults().base_url
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// The resolved credentials, e.g. for requesting a token from the
    /// authorization service.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            url: Some(self.base_url().to_string()),
            ..(*self.credentials).clone()
        }
    }

    /// The IAM token manager, when the service authenticates with IAM.
    pub fn token_manager(&self) -> Option<&Arc<IamTokenManager>> {
        self.iam.as_ref()
    }

    /// Replace the IAM access token with a user-managed one. Returns `false`
    /// when the service does not use IAM.
    pub fn set_iam_access_token(&self, token: impl Into<String>) -> bool {
        match &self.iam {
            Some(manager) => {
                manager.set_access_token(token);
                true
            }
            None => false,
        }
    }

    /// Execute `request`, returning the raw response.
    pub async fn execute(
        &self,
        request: ServiceRequest,
        required: &[&str],
    ) -> Result<ServiceResponse, WatsonError> {
        self.executor.execute(request, required).await
    }

    /// Execute `request` and deserialize the JSON body.
    pub async fn call<T: DeserializeOwned>(
        &self,
        request: ServiceRequest,
        required: &[&str],
    ) -> Result<T, WatsonError> {
        self.execute(request, required).await?.into_json()
    }

    /// Spawn `request` on the runtime; see [`RequestHandle`].
    pub fn spawn(&self, request: ServiceRequest, required: &'static [&'static str]) -> RequestHandle {
        self.executor.spawn(request, required)
    }
}
