//! Utility modules for watson-sdk
//!
//! Small, dependency-light helpers shared by the request pipeline.

pub mod cancel;
pub mod http_headers;
pub mod mime;
pub mod path;
pub mod query;

pub use cancel::CancelHandle;
pub use mime::{DEFAULT_CONTENT_TYPE, detect_content_type};
pub use path::{PathParams, expand_path, strip_trailing_slash};
pub use query::stringify_query;
