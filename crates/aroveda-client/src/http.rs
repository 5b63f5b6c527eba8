//! Shared HTTP plumbing: connection pool, endpoint URLs, response decoding.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use aroveda_core::config::ServiceConfig;

use crate::error::{ClientError, Fault};
use crate::query::QueryClient;
use crate::upload::UploadClient;

/// Longest error body kept in a fault message.
const MAX_ERROR_BODY: usize = 200;

/// Budget for the reachability check, independent of the request timeout.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection to the remote service, shared by the query and upload clients.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// Build a client from the `[service]` configuration section.
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientError> {
        Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base url must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path such as `/query`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn query_client(&self) -> QueryClient {
        QueryClient::new(self.clone())
    }

    pub fn upload_client(&self) -> UploadClient {
        UploadClient::new(self.clone())
    }

    /// Fetch the service's welcome text to check that it is reachable.
    pub async fn ping(&self) -> Result<String, ClientError> {
        self.ping_with_timeout(PING_TIMEOUT).await
    }

    /// Like [`ping`](Self::ping), giving up after `timeout`.
    pub async fn ping_with_timeout(&self, timeout: Duration) -> Result<String, ClientError> {
        let url = self.url("/");
        let response = self
            .http
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ClientError::Network(transport_fault(&e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(transport_fault(&e)))?;
        if !status.is_success() {
            return Err(ClientError::Network(Fault::Status {
                status: status.as_u16(),
                message: error_message(&body),
            }));
        }
        Ok(body.trim().to_string())
    }
}

pub(crate) fn transport_fault(err: &reqwest::Error) -> Fault {
    if err.is_timeout() {
        Fault::Transport(format!("timed out: {}", err))
    } else {
        Fault::Transport(err.to_string())
    }
}

/// Check the status and decode a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Fault> {
    let status = response.status();
    let body = response.text().await.map_err(|e| transport_fault(&e))?;
    if !status.is_success() {
        return Err(Fault::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    serde_json::from_str(&body).map_err(|e| Fault::Decode(e.to_string()))
}

/// The service reports failures as `{"error": "..."}`; anything else is kept verbatim.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    };
    message.chars().take(MAX_ERROR_BODY).collect()
}
