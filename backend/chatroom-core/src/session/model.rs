//! Transient entities shown by the chat window.
//!
//! Nothing here is persisted; everything is rebuilt on the next session load.

use crate::api::wire::{ChatResponse, ModelsResponse, ToolDescriptor, ToolResultPayload};

/// Text shown for a tool the backend did not describe.
pub const NO_DESCRIPTION: &str = "No description";

// ============================================
// MODELS
// ============================================

/// Available model identifiers and the selected one.
///
/// The selection is always either a member of `models` or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelList {
    models: Vec<String>,
    selected: String,
}

impl ModelList {
    /// Build a list from the backend's answer.
    ///
    /// A missing, empty or unknown `current` falls back to the first model.
    pub fn new(models: Vec<String>, current: Option<String>) -> Self {
        let selected = current
            .filter(|id| models.contains(id))
            .or_else(|| models.first().cloned())
            .unwrap_or_default();

        Self { models, selected }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// The selected model, `None` when nothing is selected.
    pub fn selected(&self) -> Option<&str> {
        if self.selected.is_empty() {
            None
        } else {
            Some(&self.selected)
        }
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Change the selection. Returns `false` and leaves it alone for unknown ids.
    pub(crate) fn select(&mut self, model: Option<&str>) -> bool {
        match model {
            None => {
                self.selected.clear();
                true
            }
            Some(id) if self.contains(id) => {
                self.selected = id.to_string();
                true
            }
            Some(_) => false,
        }
    }
}

impl From<ModelsResponse> for ModelList {
    fn from(response: ModelsResponse) -> Self {
        ModelList::new(response.models, response.current_model)
    }
}

// ============================================
// TOOLS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub name: String,
    pub description: Option<String>,
}

impl Tool {
    /// Description for display, with a placeholder for undocumented tools.
    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => NO_DESCRIPTION,
        }
    }
}

impl From<ToolDescriptor> for Tool {
    fn from(descriptor: ToolDescriptor) -> Self {
        Self {
            name: descriptor.name,
            description: descriptor.description,
        }
    }
}

// ============================================
// TRANSCRIPT
// ============================================

/// Whether a tool result's raw output is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disclosure {
    #[default]
    Collapsed,
    Expanded,
}

impl Disclosure {
    pub fn toggled(self) -> Self {
        match self {
            Disclosure::Collapsed => Disclosure::Expanded,
            Disclosure::Expanded => Disclosure::Collapsed,
        }
    }

    pub fn is_open(self) -> bool {
        self == Disclosure::Expanded
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub tool_name: String,
    pub result: String,
    pub disclosure: Disclosure,
}

impl ToolResult {
    pub fn new(tool_name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            result: result.into(),
            disclosure: Disclosure::Collapsed,
        }
    }
}

impl From<ToolResultPayload> for ToolResult {
    fn from(payload: ToolResultPayload) -> Self {
        let result = payload.result_text();
        ToolResult::new(payload.tool_name, result)
    }
}

/// One user message with the assistant's reply and the tools it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
    pub tool_results: Vec<ToolResult>,
}

impl ChatTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            tool_results: Vec::new(),
        }
    }

    pub fn from_reply(user: impl Into<String>, response: ChatResponse) -> Self {
        Self {
            user: user.into(),
            assistant: response.reply,
            tool_results: response
                .tool_results
                .unwrap_or_default()
                .into_iter()
                .map(ToolResult::from)
                .collect(),
        }
    }

    /// The question/answer pair as stored in long-term memory.
    pub fn remember_text(&self) -> String {
        format!("User: {}\nAI: {}", self.user, self.assistant)
    }
}

/// Turns in send order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn turn(&self, index: usize) -> Option<&ChatTurn> {
        self.turns.get(index)
    }

    pub fn tool_result(&self, turn: usize, result: usize) -> Option<&ToolResult> {
        self.turns.get(turn)?.tool_results.get(result)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub(crate) fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }

    pub(crate) fn tool_result_mut(&mut self, turn: usize, result: usize) -> Option<&mut ToolResult> {
        self.turns.get_mut(turn)?.tool_results.get_mut(result)
    }
}
