//! HTTP Interceptor interfaces
//!
//! Interceptors can observe and tweak request builders before send, observe
//! responses, and be notified of errors. The hooks are best-effort and should
//! avoid expensive work.

use reqwest::header::HeaderMap;

use crate::error::WatsonError;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub service: String,
    pub method: &'static str,
    pub url: String,
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Return the (possibly modified)
    /// builder or an error to short-circuit the request.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _headers: &HeaderMap,
    ) -> Result<reqwest::RequestBuilder, WatsonError> {
        Ok(builder)
    }

    /// Called once response headers arrive, before the body is read.
    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        _response: &reqwest::Response,
    ) -> Result<(), WatsonError> {
        Ok(())
    }

    /// Called when sending fails or the response normalizes to an error.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &WatsonError) {}
}

/// A simple logging interceptor backed by `tracing` (no credentials are logged).
#[derive(Clone, Debug, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _headers: &HeaderMap,
    ) -> Result<reqwest::RequestBuilder, WatsonError> {
        tracing::debug!(target: "watson::http", service=%ctx.service, method=%ctx.method, url=%ctx.url, "sending request");
        Ok(builder)
    }

    fn on_response(
        &self,
        ctx: &HttpRequestContext,
        response: &reqwest::Response,
    ) -> Result<(), WatsonError> {
        tracing::debug!(target: "watson::http", service=%ctx.service, url=%ctx.url, status=%response.status().as_u16(), "response received");
        Ok(())
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &WatsonError) {
        tracing::debug!(target: "watson::http", service=%ctx.service, url=%ctx.url, err=%error, "request error");
    }
}
