//! HTTP clients for the remote indexing and answering service.
//!
//! `ServiceClient` holds the connection pool and base address; the
//! `QueryClient` and `UploadClient` built from it implement the
//! `QueryService` and `UploadService` traits the chat session depends on.
//! Neither client retries.

pub mod error;
pub mod http;
pub mod mock;
pub mod query;
pub mod upload;

pub use error::{ClientError, Fault};
pub use http::ServiceClient;
pub use mock::{MockQueryService, MockUploadService};
pub use query::{QueryClient, QueryRequest, QueryResponse, QueryService};
pub use upload::{UploadClient, UploadReceipt, UploadService};
