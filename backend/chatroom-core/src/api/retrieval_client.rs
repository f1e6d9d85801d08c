use crate::api::document::UploadDocument;
use crate::api::wire::{RememberRequest, UploadFields, UploadOutcome, UploadResponse};
use crate::api::{DEFAULT_TIMEOUT_DURATION, ensure_success, parse_base_url};
use crate::error::api_client::ApiClientError;

use std::time::Duration;

use log::debug;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use url::Url;

const UPLOAD_FILE_ENDPOINT: &str = "upload_file";
const REMEMBER_ENDPOINT: &str = "remember";

/// Client for the retrieval-augmented-generation backend.
#[derive(Clone)]
pub struct RetrievalClient {
    base_url: Url,
    client: Client,
}

impl RetrievalClient {
    pub fn new(base_url_str: &str) -> Result<Self, ApiClientError> {
        Self::with_timeout(base_url_str, DEFAULT_TIMEOUT_DURATION)
    }

    pub fn with_timeout(base_url_str: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let base_url = parse_base_url(base_url_str)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submit a document for ingestion as `multipart/form-data`.
    ///
    /// The form carries three parts: `file`, `domain` and `user_tag`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError`] on transport failures and non-2xx statuses.
    /// An `error` field in a 2xx body is not an `Err`; it comes back as
    /// [`UploadOutcome::Rejected`].
    pub async fn upload_file(
        &self,
        document: UploadDocument,
        fields: &UploadFields,
    ) -> Result<UploadOutcome, ApiClientError> {
        let url = self.base_url.join(UPLOAD_FILE_ENDPOINT)?;
        debug!(
            "POST {url} file={} ({} bytes, {})",
            document.file_name,
            document.bytes.len(),
            document.mime
        );

        let file_part = Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str(document.mime)?;

        let form = Form::new()
            .part("file", file_part)
            .text("domain", fields.domain.clone())
            .text("user_tag", fields.user_tag.clone());

        let response = ensure_success(self.client.post(url).multipart(form).send().await?).await?;
        let body = response.bytes().await?;
        let outcome = UploadOutcome::from(UploadResponse::from_body(&body));
        debug!("Upload answered with {} byte body: {outcome:?}", body.len());

        Ok(outcome)
    }

    /// Store a free-text memory entry.
    pub async fn remember(&self, request: &RememberRequest) -> Result<(), ApiClientError> {
        let url = self.base_url.join(REMEMBER_ENDPOINT)?;
        debug!("POST {url} domain={} user={}", request.domain, request.user);

        ensure_success(self.client.post(url).json(request).send().await?).await?;

        Ok(())
    }
}
