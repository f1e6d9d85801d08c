//! User-triggered session operations.
//!
//! Each operation talks to at most one backend and records the outcome in the
//! [`SessionStore`]. How a backend failure is reported depends on the operation:
//!
//! | Operation | On failure |
//! |---|---|
//! | [`load_session`](SessionController::load_session) | list empty + [`Notice`] |
//! | [`select_model`](SessionController::select_model) | [`Notice`], selection kept |
//! | [`send_message`](SessionController::send_message) | [`Notice`], draft kept |
//! | [`new_chat`](SessionController::new_chat) | `Err` returned, transcript kept |
//! | [`upload_file`](SessionController::upload_file) | [`Acknowledgment`] |
//! | [`remember_turn`](SessionController::remember_turn) | [`Acknowledgment`] |

use crate::api::document::UploadDocument;
use crate::api::wire::{RememberRequest, UploadFields};
use crate::api::{ChatApiClient, RetrievalClient};
use crate::config::{AppConfig, RetrievalConfig};
use crate::error::api_client::ApiClientError;
use crate::error::session::SessionError;
use crate::session::acknowledgment::Acknowledgment;
use crate::session::model::{ChatTurn, Disclosure, ModelList, Tool};
use crate::session::notice::Notice;
use crate::session::state::{Action, RequestKind, SessionState};
use crate::session::store::SessionStore;

use common::ErrorLocation;

use std::future::Future;
use std::panic::Location;
use std::path::Path;

use log::{debug, error, info, warn};

/// Result of [`SessionController::send_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Reply received and appended to the transcript.
    Sent,

    /// Draft was empty or whitespace; nothing was sent.
    EmptyDraft,

    /// A message is already waiting for its reply, or a chat reset is in
    /// progress; nothing was sent.
    Busy,

    /// The backend call failed; a notice was raised and the draft kept.
    Failed,
}

#[derive(Clone)]
pub struct SessionController {
    chat: ChatApiClient,
    retrieval: RetrievalClient,
    store: SessionStore,
    settings: RetrievalConfig,
}

impl SessionController {
    pub fn new(chat: ChatApiClient, retrieval: RetrievalClient, settings: RetrievalConfig) -> Self {
        Self {
            chat,
            retrieval,
            store: SessionStore::new(),
            settings,
        }
    }

    /// Build both backend clients from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiClientError> {
        let timeout = config.request_timeout();
        let chat = ChatApiClient::with_timeout(&config.server.chat_api_url, timeout)?;
        let retrieval = RetrievalClient::with_timeout(&config.server.retrieval_url, timeout)?;

        info!(
            "Chat API at {}, retrieval API at {}",
            chat.base_url(),
            retrieval.base_url()
        );

        Ok(Self::new(chat, retrieval, config.retrieval.clone()))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn snapshot(&self) -> SessionState {
        self.store.snapshot().await
    }

    /// Fetch the model list and the tool list.
    ///
    /// Both requests run concurrently and each result is applied as soon as it
    /// arrives, so one failing never holds back the other.
    pub async fn load_session(&self) -> Result<(), SessionError> {
        info!("Loading session");

        let load_models = async {
            let action = match self.chat.list_models().await {
                Ok(response) => {
                    let models = ModelList::from(response);
                    info!(
                        "Loaded {} model(s), selected: {}",
                        models.models().len(),
                        models.selected().unwrap_or("<none>")
                    );
                    Action::ModelsLoaded(models)
                }
                Err(e) => {
                    error!("Failed to fetch model list: {e}");
                    Action::ModelsFailed
                }
            };
            self.store.dispatch(action).await
        };

        let load_tools = async {
            let action = match self.chat.list_tools().await {
                Ok(descriptors) => {
                    let tools: Vec<Tool> = descriptors.into_iter().map(Tool::from).collect();
                    info!("Loaded {} tool(s)", tools.len());
                    Action::ToolsLoaded(tools)
                }
                Err(e) => {
                    error!("Failed to fetch tool list: {e}");
                    Action::ToolsFailed
                }
            };
            self.store.dispatch(action).await
        };

        let (models_applied, tools_applied) = tokio::join!(load_models, load_tools);
        models_applied?;
        tools_applied?;

        Ok(())
    }

    /// Select a model (`None` or `""` clears the selection) and tell the backend.
    ///
    /// The local selection changes before the request is sent and is not
    /// rolled back if the backend refuses.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownModel`] without sending anything if the
    /// id is not in the loaded model list.
    pub async fn select_model(&self, model: Option<&str>) -> Result<(), SessionError> {
        let model = model.filter(|id| !id.is_empty());

        let transition = self
            .store
            .dispatch(Action::ModelSelected(model.map(str::to_string)))
            .await?;

        if let Some(id) = model
            && transition.current.models().selected() != Some(id)
        {
            warn!("Refusing to select unknown model '{id}'");
            return Err(SessionError::UnknownModel {
                model: id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        match self.chat.select_model(model).await {
            Ok(()) => info!("Switched model to {}", model.unwrap_or("<none>")),
            Err(e) => {
                error!("Model switch failed: {e}");
                self.store
                    .dispatch(Action::NoticeRaised(Notice::ModelSwitchFailed))
                    .await?;
            }
        }

        Ok(())
    }

    pub async fn set_draft(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.store.dispatch(Action::DraftChanged(text.into())).await?;
        Ok(())
    }

    /// Send the current draft as one chat turn.
    ///
    /// The draft is sent as typed; only the blank check trims it.
    pub async fn send_message(&self) -> Result<SendOutcome, SessionError> {
        let transition = self
            .store
            .dispatch(Action::RequestStarted(RequestKind::Send))
            .await?;

        if transition.previous.is_busy(RequestKind::Send) {
            debug!("Send ignored, a message is already in flight");
            return Ok(SendOutcome::Busy);
        }

        if !transition.current.is_busy(RequestKind::Send) {
            if let Some(blocking) = transition.current.blocked_by(RequestKind::Send) {
                debug!("Send ignored, {blocking} in progress");
                return Ok(SendOutcome::Busy);
            }
            debug!("Send ignored, draft is blank");
            return Ok(SendOutcome::EmptyDraft);
        }

        let text = transition.current.draft().to_string();

        match self.chat.send_chat(&text).await {
            Ok(response) => {
                let turn = ChatTurn::from_reply(text, response);
                info!(
                    "Received reply with {} tool result(s)",
                    turn.tool_results.len()
                );
                self.store.dispatch(Action::SendSucceeded(turn)).await?;
                Ok(SendOutcome::Sent)
            }
            Err(e) => {
                error!("Chat request failed: {e}");
                self.store.dispatch(Action::SendFailed).await?;
                Ok(SendOutcome::Failed)
            }
        }
    }

    /// Reset the conversation on the backend, then clear the transcript.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] without a request while a message is
    /// waiting for its reply, and [`SessionError::Api`] if the backend call
    /// fails; the transcript is left untouched in both cases.
    pub async fn new_chat(&self) -> Result<(), SessionError> {
        let transition = self
            .store
            .dispatch(Action::RequestStarted(RequestKind::Reset))
            .await?;

        if transition.previous.is_busy(RequestKind::Reset) {
            debug!("New chat ignored, a reset is already in flight");
            return Ok(());
        }

        if let Some(blocking) = transition.current.blocked_by(RequestKind::Reset) {
            warn!("New chat refused, {blocking} in progress");
            return Err(SessionError::Busy {
                kind: blocking,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        match self.chat.reset_chat().await {
            Ok(()) => {
                self.store.dispatch(Action::ChatReset).await?;
                info!("Started new chat");
                Ok(())
            }
            Err(e) => {
                error!("Chat reset failed, keeping transcript: {e}");
                self.store
                    .dispatch(Action::RequestFinished(RequestKind::Reset))
                    .await?;
                Err(SessionError::Api(e))
            }
        }
    }

    /// Upload a file to the retrieval backend.
    ///
    /// Returns `Ok(None)` when no file was chosen; otherwise every outcome,
    /// failures included, comes back as an [`Acknowledgment`].
    pub async fn upload_file(&self, path: Option<&Path>) -> Result<Option<Acknowledgment>, SessionError> {
        let Some(path) = path else {
            debug!("No file chosen, nothing to upload");
            return Ok(None);
        };

        let acknowledgment = self
            .single_flight(RequestKind::Upload, async {
                match UploadDocument::load(path).await {
                    Ok(document) => self.submit_document(document).await,
                    Err(e) => {
                        warn!("Not uploading {}: {e}", path.display());
                        Acknowledgment::UploadFailed {
                            message: e.summary(),
                        }
                    }
                }
            })
            .await?;

        Ok(Some(acknowledgment))
    }

    /// Upload a document that is already in memory.
    pub async fn upload_document(&self, document: UploadDocument) -> Result<Acknowledgment, SessionError> {
        self.single_flight(RequestKind::Upload, self.submit_document(document))
            .await
    }

    /// Store free text as a manually tagged fact in long-term memory.
    pub async fn remember_turn(&self, text: &str) -> Result<Acknowledgment, SessionError> {
        let request = RememberRequest::manual_fact(
            text,
            &self.settings.memory_domain,
            &self.settings.user,
        );

        self.single_flight(RequestKind::Remember, async {
            match self.retrieval.remember(&request).await {
                Ok(()) => {
                    info!("Stored memory entry ({} chars)", request.text.chars().count());
                    Acknowledgment::Remembered
                }
                Err(e) => {
                    error!("Failed to store memory entry: {e}");
                    Acknowledgment::RememberFailed
                }
            }
        })
        .await
    }

    /// Remember the turn at `index` (zero-based) as a question/answer pair.
    pub async fn remember_turn_at(&self, index: usize) -> Result<Acknowledgment, SessionError> {
        let text = self
            .store
            .snapshot()
            .await
            .transcript()
            .turn(index)
            .map(ChatTurn::remember_text)
            .ok_or_else(|| SessionError::UnknownTurn {
                index,
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.remember_turn(&text).await
    }

    /// Flip one tool result between collapsed and expanded.
    pub async fn toggle_tool_result(&self, turn: usize, result: usize) -> Result<Disclosure, SessionError> {
        let transition = self
            .store
            .dispatch(Action::ToolResultToggled { turn, result })
            .await?;

        let state = &transition.current;
        if state.transcript().turn(turn).is_none() {
            return Err(SessionError::UnknownTurn {
                index: turn,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        state
            .disclosure(turn, result)
            .ok_or_else(|| SessionError::UnknownToolResult {
                turn,
                result,
                location: ErrorLocation::from(Location::caller()),
            })
    }

    pub async fn dismiss_notice(&self) -> Result<(), SessionError> {
        self.store.dispatch(Action::NoticeDismissed).await?;
        Ok(())
    }

    /// Run `request` unless another request of the same kind is in flight.
    async fn single_flight<F>(&self, kind: RequestKind, request: F) -> Result<Acknowledgment, SessionError>
    where
        F: Future<Output = Acknowledgment>,
    {
        let transition = self.store.dispatch(Action::RequestStarted(kind)).await?;

        if transition.previous.is_busy(kind) {
            warn!("{kind} requested while one is already in flight");
            return Ok(Acknowledgment::Busy(kind));
        }

        let acknowledgment = request.await;
        self.store.dispatch(Action::RequestFinished(kind)).await?;

        Ok(acknowledgment)
    }

    async fn submit_document(&self, document: UploadDocument) -> Acknowledgment {
        let fields = UploadFields {
            domain: self.settings.upload_domain.clone(),
            user_tag: self.settings.upload_user_tag.clone(),
        };
        let file_name = document.file_name.clone();

        match self.retrieval.upload_file(document, &fields).await {
            Ok(outcome) => {
                info!("Upload of {file_name} answered: {outcome:?}");
                Acknowledgment::from(outcome)
            }
            Err(e) => {
                error!("Upload of {file_name} failed: {e}");
                Acknowledgment::UploadFailed {
                    message: e.summary(),
                }
            }
        }
    }
}
