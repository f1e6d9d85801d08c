//! Session state as an immutable record plus a pure reducer.
//!
//! Every change to what the chat window shows is an [`Action`] applied with
//! [`SessionState::reduce`]. The reducer never performs I/O, so each property
//! of the session can be checked by feeding it actions directly.

use crate::session::model::{ChatTurn, Disclosure, ModelList, Tool, Transcript};
use crate::session::notice::Notice;

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FormatResult};

/// Operations that allow at most one request in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestKind {
    Send,
    Reset,
    Upload,
    Remember,
}

impl Display for RequestKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let label = match self {
            RequestKind::Send => "Message send",
            RequestKind::Reset => "Chat reset",
            RequestKind::Upload => "Upload",
            RequestKind::Remember => "Remember",
        };
        formatter.write_str(label)
    }
}

/// State transitions of the chat window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Model list arrived from the backend.
    ModelsLoaded(ModelList),

    /// Model list could not be fetched; the list degrades to empty.
    ModelsFailed,

    ToolsLoaded(Vec<Tool>),

    /// Tool list could not be fetched; the list degrades to empty.
    ToolsFailed,

    /// User picked a model (`None` = no model). Unknown ids are ignored.
    ModelSelected(Option<String>),

    DraftChanged(String),

    /// Claim the single in-flight slot for `kind`.
    ///
    /// Ignored when the slot is taken or a conflicting request is in flight
    /// (see [`SessionState::blocked_by`]). For [`RequestKind::Send`] it is
    /// also ignored when the draft is blank.
    RequestStarted(RequestKind),

    /// Release the in-flight slot for `kind` without any other change.
    RequestFinished(RequestKind),

    /// The reply for the in-flight send arrived.
    SendSucceeded(ChatTurn),

    /// The in-flight send failed; the draft stays for a retry.
    SendFailed,

    /// The backend forgot the conversation.
    ChatReset,

    ToolResultToggled { turn: usize, result: usize },

    NoticeRaised(Notice),

    NoticeDismissed,
}

impl Action {
    /// Short label for logs, without message contents.
    pub fn name(&self) -> &'static str {
        match self {
            Action::ModelsLoaded(_) => "ModelsLoaded",
            Action::ModelsFailed => "ModelsFailed",
            Action::ToolsLoaded(_) => "ToolsLoaded",
            Action::ToolsFailed => "ToolsFailed",
            Action::ModelSelected(_) => "ModelSelected",
            Action::DraftChanged(_) => "DraftChanged",
            Action::RequestStarted(_) => "RequestStarted",
            Action::RequestFinished(_) => "RequestFinished",
            Action::SendSucceeded(_) => "SendSucceeded",
            Action::SendFailed => "SendFailed",
            Action::ChatReset => "ChatReset",
            Action::ToolResultToggled { .. } => "ToolResultToggled",
            Action::NoticeRaised(_) => "NoticeRaised",
            Action::NoticeDismissed => "NoticeDismissed",
        }
    }
}

/// Everything the chat window renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    models: ModelList,
    tools: Vec<Tool>,
    draft: String,
    transcript: Transcript,
    notice: Option<Notice>,
    in_flight: BTreeSet<RequestKind>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn models(&self) -> &ModelList {
        &self.models
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn is_busy(&self, kind: RequestKind) -> bool {
        self.in_flight.contains(&kind)
    }

    /// True while a chat message is waiting for its reply.
    pub fn is_loading(&self) -> bool {
        self.is_busy(RequestKind::Send)
    }

    /// The in-flight request that keeps `kind` from starting, if any.
    ///
    /// A send and a reset both change the conversation, so neither may start
    /// while the other is pending: a reply landing after a reset would show a
    /// turn from the previous conversation.
    pub fn blocked_by(&self, kind: RequestKind) -> Option<RequestKind> {
        let conflicting = match kind {
            RequestKind::Send => RequestKind::Reset,
            RequestKind::Reset => RequestKind::Send,
            RequestKind::Upload | RequestKind::Remember => return None,
        };
        self.is_busy(conflicting).then_some(conflicting)
    }

    /// Apply one action and return the next state.
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::ModelsLoaded(models) => {
                self.models = models;
            }
            Action::ModelsFailed => {
                self.models = ModelList::default();
                self.notice = Some(Notice::ModelListUnavailable);
            }
            Action::ToolsLoaded(tools) => {
                self.tools = tools;
            }
            Action::ToolsFailed => {
                self.tools.clear();
                self.notice = Some(Notice::ToolListUnavailable);
            }
            Action::ModelSelected(model) => {
                let model = model.filter(|id| !id.is_empty());
                self.models.select(model.as_deref());
            }
            Action::DraftChanged(text) => {
                self.draft = text;
            }
            Action::RequestStarted(kind) => {
                let blank_send = kind == RequestKind::Send && self.draft.trim().is_empty();
                if !blank_send && self.blocked_by(kind).is_none() {
                    self.in_flight.insert(kind);
                }
            }
            Action::RequestFinished(kind) => {
                self.in_flight.remove(&kind);
            }
            Action::SendSucceeded(turn) => {
                self.transcript.push(turn);
                self.draft.clear();
                self.in_flight.remove(&RequestKind::Send);
            }
            Action::SendFailed => {
                self.notice = Some(Notice::ReplyUnavailable);
                self.in_flight.remove(&RequestKind::Send);
            }
            Action::ChatReset => {
                self.transcript.clear();
                self.in_flight.remove(&RequestKind::Reset);
            }
            Action::ToolResultToggled { turn, result } => {
                if let Some(tool_result) = self.transcript.tool_result_mut(turn, result) {
                    tool_result.disclosure = tool_result.disclosure.toggled();
                }
            }
            Action::NoticeRaised(notice) => {
                self.notice = Some(notice);
            }
            Action::NoticeDismissed => {
                self.notice = None;
            }
        }

        self
    }

    /// Disclosure of one tool result, if it exists.
    pub fn disclosure(&self, turn: usize, result: usize) -> Option<Disclosure> {
        self.transcript
            .tool_result(turn, result)
            .map(|tool_result| tool_result.disclosure)
    }
}
