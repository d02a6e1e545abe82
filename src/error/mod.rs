//! Error Handling Module
//!
//! Every fallible operation in the SDK returns [`WatsonError`]:
//! - construction failures (missing version, unresolvable credentials)
//! - validation failures (missing required call parameters)
//! - transport failures passed through from `reqwest`
//! - service-reported and HTTP-status failures produced by the response normalizer
//!
//! # Example
//!
//! ```rust,ignore
//! use watson_sdk::error::WatsonError;
//!
//! let err = WatsonError::MissingParameters(vec!["classifier_id".into()]);
//! assert_eq!(err.to_string(), "Missing required parameters: classifier_id");
//! ```

mod conversions;
pub mod types;

pub use types::*;
