use std::fmt::{Display, Formatter, Result as FormatResult};

/// Dismissible, non-blocking error shown above the chat.
///
/// Each variant has one fixed message; the underlying error only goes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ModelListUnavailable,
    ToolListUnavailable,
    ModelSwitchFailed,
    ReplyUnavailable,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::ModelListUnavailable => "Unable to fetch model list",
            Notice::ToolListUnavailable => "Unable to fetch tool list",
            Notice::ModelSwitchFailed => "Model switch failed",
            Notice::ReplyUnavailable => "Unable to get AI reply",
        }
    }
}

impl Display for Notice {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.message())
    }
}
