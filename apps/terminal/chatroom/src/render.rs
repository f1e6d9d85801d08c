//! Pure rendering of session state to terminal text.
//!
//! Nothing here writes to the terminal; the REPL prints what these return.

use chatroom_core::error::SessionError;
use chatroom_core::session::{
    Acknowledgment, ChatTurn, ModelList, Notice, SessionState, Tool, Transcript,
};

const SELECTED_MARKER: &str = "*";
const COLLAPSED_MARKER: &str = "▸";
const EXPANDED_MARKER: &str = "▾";
const BUSY_MARKER: &str = "…";
const INDENT: &str = "    ";

pub const CONTINUE_PROMPT: &str = "Press Enter to continue";

pub fn render_models(models: &ModelList) -> String {
    if models.is_empty() {
        return "No models available".to_string();
    }

    let mut text = String::from("Models:");
    for id in models.models() {
        let marker = if models.selected() == Some(id.as_str()) {
            SELECTED_MARKER
        } else {
            " "
        };
        text.push_str(&format!("\n  {marker} {id}"));
    }
    if models.selected().is_none() {
        text.push_str("\n  (no model selected)");
    }
    text
}

pub fn render_tools(tools: &[Tool]) -> String {
    if tools.is_empty() {
        return "No tools available".to_string();
    }

    let mut text = String::from("Tools:");
    for tool in tools {
        text.push_str(&format!("\n  {} - {}", tool.name, tool.display_description()));
    }
    text
}

/// One turn, numbered from 1 as the user types it in `/remember` and `/toggle`.
pub fn render_turn(index: usize, turn: &ChatTurn) -> String {
    let number = index + 1;
    let mut text = format!("[{number}] You: {}\n{INDENT}AI: {}", turn.user, turn.assistant);

    for (result_index, tool_result) in turn.tool_results.iter().enumerate() {
        let marker = if tool_result.disclosure.is_open() {
            EXPANDED_MARKER
        } else {
            COLLAPSED_MARKER
        };
        text.push_str(&format!(
            "\n{INDENT}{marker} {} ({number}.{})",
            tool_result.tool_name,
            result_index + 1
        ));

        if tool_result.disclosure.is_open() {
            for line in tool_result.result.lines() {
                text.push_str(&format!("\n{INDENT}{INDENT}{line}"));
            }
        }
    }
    text
}

pub fn render_transcript(transcript: &Transcript) -> String {
    if transcript.is_empty() {
        return "No messages yet".to_string();
    }

    transcript
        .turns()
        .iter()
        .enumerate()
        .map(|(index, turn)| render_turn(index, turn))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_notice(notice: Notice) -> String {
    format!("! {notice} (/dismiss to clear)")
}

/// Acknowledgment framed in a box so it stands out from chat output.
pub fn render_acknowledgment(acknowledgment: &Acknowledgment) -> String {
    let message = acknowledgment.to_string();
    let lines: Vec<&str> = message.lines().collect();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let border = format!("+{}+", "-".repeat(width + 2));
    let mut text = border.clone();
    for line in lines {
        let padding = width - line.chars().count();
        text.push_str(&format!("\n| {line}{} |", " ".repeat(padding)));
    }
    text.push('\n');
    text.push_str(&border);
    text
}

/// Input prompt: selected model, and a busy marker while a reply is pending.
pub fn prompt(state: &SessionState) -> String {
    let model = state.models().selected().unwrap_or("no model");
    if state.is_loading() {
        format!("[{model}] {BUSY_MARKER} > ")
    } else {
        format!("[{model}] > ")
    }
}

/// Short user-facing text for a session error; details are in the log.
pub fn render_session_error(error: &SessionError) -> String {
    match error {
        SessionError::UnknownModel { model, .. } => {
            format!("Unknown model '{model}', see /models")
        }
        SessionError::UnknownTurn { index, .. } => format!("No turn {}", index + 1),
        SessionError::UnknownToolResult { turn, result, .. } => {
            format!("Turn {} has no tool result {}", turn + 1, result + 1)
        }
        SessionError::Busy { kind, .. } => Acknowledgment::Busy(*kind).to_string(),
        SessionError::Api(e) => e.summary(),
        SessionError::Store(_) => "Session is no longer available".to_string(),
    }
}
