//! Shared data types.

pub mod file;
pub mod http;

pub use file::{FileData, FileDescriptor, FileOptions, FileParam, FileValue, ResolvedFile};
pub use http::{HttpConfig, HttpConfigBuilder};
