//! Type Conversions for WatsonError
//!
//! `From` implementations for the error types the pipeline propagates with `?`.

use super::types::WatsonError;

impl From<reqwest::Error> for WatsonError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for WatsonError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<std::io::Error> for WatsonError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: WatsonError = json_err.into();
        assert!(matches!(err, WatsonError::Json(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: WatsonError = io.into();
        assert_eq!(err, WatsonError::Io("gone".into()));
    }
}
