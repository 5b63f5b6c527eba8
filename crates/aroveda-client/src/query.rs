//! Query client for the answering endpoint (`POST /query`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use aroveda_core::{DocumentHandle, LANGUAGE};

use crate::error::ClientError;
use crate::http::{read_json, transport_fault, ServiceClient};

/// Body of a query request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub filename: String,
    pub language: String,
}

impl QueryRequest {
    /// A question about `document` in the session language.
    pub fn new(question: impl Into<String>, document: &DocumentHandle) -> Self {
        Self {
            question: question.into(),
            filename: document.filename.clone(),
            language: LANGUAGE.to_string(),
        }
    }
}

/// Body of a successful query response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

/// Answers questions about an uploaded document.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Ask one question. `Ok(None)` means the service answered without an answer.
    async fn query(&self, request: &QueryRequest) -> Result<Option<String>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct QueryClient {
    service: ServiceClient,
}

impl QueryClient {
    pub fn new(service: ServiceClient) -> Self {
        Self { service }
    }
}

#[async_trait]
impl QueryService for QueryClient {
    async fn query(&self, request: &QueryRequest) -> Result<Option<String>, ClientError> {
        let url = self.service.url("/query");
        tracing::debug!(
            url = %url,
            filename = %request.filename,
            question_len = request.question.len(),
            "Sending query"
        );

        let response = self
            .service
            .http()
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(transport_fault(&e)))?;

        let body: QueryResponse = read_json(response).await.map_err(ClientError::Network)?;
        tracing::debug!(has_answer = body.answer.is_some(), "Query answered");
        Ok(body.answer)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fault;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> QueryClient {
        ServiceClient::with_timeout(&server.uri(), Duration::from_secs(5))
            .unwrap()
            .query_client()
    }

    fn request() -> QueryRequest {
        QueryRequest::new("What is X?", &DocumentHandle::new("doc1.pdf"))
    }

    #[test]
    fn test_request_uses_session_language() {
        let req = request();
        assert_eq!(req.question, "What is X?");
        assert_eq!(req.filename, "doc1.pdf");
        assert_eq!(req.language, "en-US");
    }

    #[tokio::test]
    async fn test_query_returns_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "question": "What is X?",
                "filename": "doc1.pdf",
                "language": "en-US"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "42"})))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server).query(&request()).await.unwrap();
        assert_eq!(answer.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_query_without_answer_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let answer = client_for(&server).query(&request()).await.unwrap();
        assert!(answer.is_none());
    }

    #[tokio::test]
    async fn test_query_error_status_is_network_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "No document found. Please upload it first."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).query(&request()).await.unwrap_err();
        match err {
            ClientError::Network(Fault::Status { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "No document found. Please upload it first.");
            }
            other => panic!("Expected Network status fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).query(&request()).await;
        assert!(result.is_err());
        // `expect(1)` is verified when the server drops.
    }

    #[tokio::test]
    async fn test_query_malformed_body_is_decode_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).query(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(Fault::Decode(_))));
    }

    #[tokio::test]
    async fn test_query_timeout_is_transport_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"answer": "late"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = ServiceClient::with_timeout(&server.uri(), Duration::from_millis(50))
            .unwrap()
            .query_client();
        let err = client.query(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(Fault::Transport(_))));
    }
}
