//! HTTP clients for the two backends the chatroom talks to.
//!
//! - [`ChatApiClient`]: models, tools, chat turns and conversation reset
//! - [`RetrievalClient`]: document ingestion and long-term memory entries
//!
//! Both clients treat every non-2xx response as an
//! [`ApiClientError::Server`] and leave the decision of what to do with a
//! failure to the caller.

pub mod chat_client;
pub mod document;
pub mod retrieval_client;
pub mod wire;

pub use chat_client::ChatApiClient;
pub use document::UploadDocument;
pub use retrieval_client::RetrievalClient;

use crate::error::api_client::ApiClientError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::time::Duration;

use reqwest::Response;
use url::Url;

/// Request timeout for both backends unless configured otherwise.
pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(120);

/// Parse a backend base URL so that relative endpoint paths join onto it.
///
/// `Url::join` replaces the last path segment unless the base ends with a
/// slash, so `http://host/rag` becomes `http://host/rag/`.
#[track_caller]
pub(crate) fn parse_base_url(base_url_str: &str) -> Result<Url, ApiClientError> {
    let mut base_url = Url::parse(base_url_str)?;

    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }

    Ok(base_url)
}

/// Turn a non-2xx response into [`ApiClientError::Server`], keeping the body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("no response body").to_string()
    } else {
        body
    };

    Err(ApiClientError::Server {
        status: HttpStatusCode::from(status.as_u16()),
        message,
        location: ErrorLocation::from(Location::caller()),
    })
}
