//! # watson-sdk - IBM Watson REST client
//!
//! Typed async clients for the Watson services, built on one shared request
//! pipeline: parameter validation, path templating, multipart encoding,
//! content-type sniffing, credential resolution and error normalization.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use watson_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), WatsonError> {
//!     let nlc = NaturalLanguageClassifierV1::new(
//!         ServiceOptions::new().basic_auth("username", "password"),
//!     )?;
//!
//!     let result = nlc.classify("10D41B-nlc-1", "How hot will it be today?").await?;
//!     println!("top class: {:?}", result.top_class);
//!     Ok(())
//! }
//! ```
//!
//! ## Credentials
//!
//! Without explicit credentials each client looks in `VCAP_SERVICES`, an
//! `ibm-credentials.env` file, and `{SERVICE}_USERNAME` / `_PASSWORD` /
//! `_URL` / `_API_KEY` environment variables, in that order of increasing
//! precedence. Explicit options always win.
//!
//! ## Errors
//!
//! Every call returns `Result<T, WatsonError>`. Missing required parameters
//! fail before any network I/O; service-reported errors and non-2xx
//! statuses are normalized into [`WatsonError::Service`] and
//! [`WatsonError::Status`].

#![deny(unsafe_code)]

pub mod auth;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod options;
pub mod params;
pub mod service;
pub mod services;
pub mod types;
pub mod utils;

pub use error::WatsonError;
pub use options::ServiceOptions;

pub mod prelude {
    pub use crate::auth::{CredentialResolver, CredentialSource, Credentials};
    pub use crate::error::WatsonError;
    pub use crate::execution::{RequestHandle, ServiceResponse};
    pub use crate::options::ServiceOptions;
    pub use crate::services::*;
    pub use crate::types::{FileDescriptor, FileParam, FileValue, HttpConfig};
}
