use thiserror::Error;

/// Top-level error type for the AroVeda client.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define their
/// own error types and implement `From<SubsystemError> for AroError` so that
/// the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AroError {
    fn from(err: toml::de::Error) -> Self {
        AroError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AroError {
    fn from(err: toml::ser::Error) -> Self {
        AroError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AroError {
    fn from(err: serde_json::Error) -> Self {
        AroError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for AroVeda operations.
pub type Result<T> = std::result::Result<T, AroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AroError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(AroError, &str)> = vec![
            (
                AroError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                AroError::Validation("not a pdf".to_string()),
                "Validation error: not a pdf",
            ),
            (
                AroError::Network("connection refused".to_string()),
                "Network error: connection refused",
            ),
            (
                AroError::Upload("status 500".to_string()),
                "Upload error: status 500",
            ),
            (
                AroError::Speech("no synthesizer".to_string()),
                "Speech error: no synthesizer",
            ),
            (
                AroError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AroError = io_err.into();
        assert!(matches!(err, AroError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: AroError = err.unwrap_err().into();
        assert!(matches!(err, AroError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: AroError = err.unwrap_err().into();
        assert!(matches!(err, AroError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
