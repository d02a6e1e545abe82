//! Request pipeline
//!
//! Describe a call with [`ServiceRequest`], then hand it to a
//! [`RequestExecutor`] which validates, assembles, sends and normalizes it.

pub mod executor;
pub mod handle;
pub mod interceptor;
pub mod multipart;
pub mod request;
pub mod response;

pub use executor::RequestExecutor;
pub use handle::RequestHandle;
pub use interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor};
pub use multipart::{FormField, build_file, build_form};
pub use request::{HttpMethod, Payload, ServiceDefaults, ServiceRequest};
pub use response::{ResponseBody, ServiceResponse, normalize_response};
