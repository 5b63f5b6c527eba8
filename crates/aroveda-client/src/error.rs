//! Error types for the service clients.

use aroveda_core::error::AroError;

/// What went wrong with a single request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// Connection, TLS, timeout or other transport failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("service returned {status}{}", detail(.message))]
    Status { status: u16, message: String },
    /// The service answered 2xx with a body we could not decode.
    #[error("undecodable response: {0}")]
    Decode(String),
}

/// `": <message>"`, or nothing when the service sent no message.
fn detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

/// Errors from the service clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The answering endpoint could not be reached or refused the query.
    #[error("network fault: {0}")]
    Network(Fault),
    /// The indexing endpoint could not be reached or refused the file.
    #[error("upload fault: {0}")]
    Upload(Fault),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ClientError::Network(fault) | ClientError::Upload(fault) => Some(fault),
            ClientError::Config(_) => None,
        }
    }
}

impl From<ClientError> for AroError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(_) => AroError::Network(err.to_string()),
            ClientError::Upload(_) => AroError::Upload(err.to_string()),
            ClientError::Config(msg) => AroError::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_display() {
        assert_eq!(
            Fault::Transport("connection refused".to_string()).to_string(),
            "transport failure: connection refused"
        );
        assert_eq!(
            Fault::Status {
                status: 400,
                message: "Question is required".to_string()
            }
            .to_string(),
            "service returned 400: Question is required"
        );
        assert_eq!(
            Fault::Status {
                status: 502,
                message: String::new()
            }
            .to_string(),
            "service returned 502"
        );
        assert_eq!(
            Fault::Decode("expected value".to_string()).to_string(),
            "undecodable response: expected value"
        );
    }

    #[test]
    fn test_fault_is_std_error() {
        let fault = Fault::Status {
            status: 404,
            message: String::new(),
        };
        let err: &dyn std::error::Error = &fault;
        assert_eq!(err.to_string(), "service returned 404");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Network(Fault::Transport("timed out".to_string()));
        assert_eq!(err.to_string(), "network fault: transport failure: timed out");

        let err = ClientError::Upload(Fault::Status {
            status: 500,
            message: "Error processing PDF".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "upload fault: service returned 500: Error processing PDF"
        );

        let err = ClientError::Config("bad base url".to_string());
        assert_eq!(err.to_string(), "invalid client configuration: bad base url");
    }

    #[test]
    fn test_client_error_fault_accessor() {
        let fault = Fault::Decode("eof".to_string());
        assert_eq!(ClientError::Network(fault.clone()).fault(), Some(&fault));
        assert_eq!(ClientError::Upload(fault.clone()).fault(), Some(&fault));
        assert_eq!(ClientError::Config("x".to_string()).fault(), None);
    }

    #[test]
    fn test_client_error_into_aro_error() {
        let err: AroError = ClientError::Network(Fault::Transport("x".into())).into();
        assert!(matches!(err, AroError::Network(_)));

        let err: AroError = ClientError::Upload(Fault::Decode("x".into())).into();
        assert!(matches!(err, AroError::Upload(_)));

        let err: AroError = ClientError::Config("x".into()).into();
        assert!(matches!(err, AroError::Config(_)));
    }
}
