use crate::api::wire::{
    ChatRequest, ChatResponse, ModelsResponse, SelectModelRequest, ToolDescriptor, ToolsResponse,
};
use crate::api::{DEFAULT_TIMEOUT_DURATION, ensure_success, parse_base_url};
use crate::error::api_client::ApiClientError;

use std::time::Duration;

use log::debug;
use reqwest::Client;
use url::Url;

const MODELS_ENDPOINT: &str = "api/models";
const TOOLS_ENDPOINT: &str = "api/tools";
const MODEL_SELECT_ENDPOINT: &str = "api/model/select";
const CHAT_ENDPOINT: &str = "api/chat";
const CHAT_NEW_ENDPOINT: &str = "api/chat/new";

/// Client for the model/tool/chat backend.
#[derive(Clone)]
pub struct ChatApiClient {
    base_url: Url,
    client: Client,
}

impl ChatApiClient {
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

    pub async fn list_models(&self) -> Result<ModelsResponse, ApiClientError> {
        let url = self.base_url.join(MODELS_ENDPOINT)?;
        debug!("GET {url}");

        let response = ensure_success(self.client.get(url).send().await?).await?;
        let models: ModelsResponse = response.json().await?;

        Ok(models)
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ApiClientError> {
        let url = self.base_url.join(TOOLS_ENDPOINT)?;
        debug!("GET {url}");

        let response = ensure_success(self.client.get(url).send().await?).await?;
        let tools: ToolsResponse = response.json().await?;

        Ok(tools.tools.unwrap_or_default())
    }

    /// Tell the backend which model to use; `None` clears the selection.
    pub async fn select_model(&self, model: Option<&str>) -> Result<(), ApiClientError> {
        let url = self.base_url.join(MODEL_SELECT_ENDPOINT)?;
        debug!("POST {url} model={model:?}");

        let body = SelectModelRequest { model };
        ensure_success(self.client.post(url).json(&body).send().await?).await?;

        Ok(())
    }

    /// Post one chat turn and wait for the complete reply.
    pub async fn send_chat(&self, message: &str) -> Result<ChatResponse, ApiClientError> {
        let url = self.base_url.join(CHAT_ENDPOINT)?;
        debug!("POST {url} ({} chars)", message.chars().count());

        let body = ChatRequest { message };
        let response = ensure_success(self.client.post(url).json(&body).send().await?).await?;
        let reply: ChatResponse = response.json().await?;

        Ok(reply)
    }

    /// Ask the backend to forget the current conversation.
    pub async fn reset_chat(&self) -> Result<(), ApiClientError> {
        let url = self.base_url.join(CHAT_NEW_ENDPOINT)?;
        debug!("POST {url}");

        ensure_success(self.client.post(url).send().await?).await?;

        Ok(())
    }
}
