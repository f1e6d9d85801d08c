//! Parsing of REPL input lines.
//!
//! Anything not starting with `/` is a chat message. Turn and tool-result
//! numbers are typed 1-based and stored 0-based.

use crate::error::ChatroomError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

const COMMAND_PREFIX: char = '/';

/// Keyword that clears the model selection in `/model none`.
const NO_MODEL_KEYWORD: &str = "none";

pub const HELP_TEXT: &str = "\
Commands:
  <text>              send a message
  /models             list models
  /model <id>|none    select a model
  /tools              list tools
  /new                start a new chat
  /upload <path>      upload a pdf, doc, docx or txt file
  /remember <n>       save turn n to long-term memory
  /toggle <n> <m>     show or hide tool result m of turn n
  /dismiss            clear the error notice
  /help               show this help
  /quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line.
    Empty,
    Send(String),
    Models,
    SelectModel(Option<String>),
    Tools,
    NewChat,
    Upload(Option<PathBuf>),
    Remember(usize),
    Toggle { turn: usize, result: usize },
    Dismiss,
    Help,
    Quit,
}

impl Command {
    #[track_caller]
    pub fn parse(line: &str) -> Result<Self, ChatroomError> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Ok(Command::Empty);
        }

        let Some(body) = trimmed.strip_prefix(COMMAND_PREFIX) else {
            return Ok(Command::Send(line.trim_end_matches(['\r', '\n']).to_string()));
        };

        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };

        let command = match name {
            "models" => Command::Models,
            "model" => match rest {
                "" => return Err(usage("/model <id>|none")),
                NO_MODEL_KEYWORD => Command::SelectModel(None),
                id => Command::SelectModel(Some(id.to_string())),
            },
            "tools" => Command::Tools,
            "new" => Command::NewChat,
            "upload" => {
                Command::Upload((!rest.is_empty()).then(|| PathBuf::from(rest)))
            }
            "remember" => Command::Remember(position(rest, "/remember <n>")?),
            "toggle" => {
                let mut numbers = rest.split_whitespace();
                let (Some(turn), Some(result), None) =
                    (numbers.next(), numbers.next(), numbers.next())
                else {
                    return Err(usage("/toggle <n> <m>"));
                };
                Command::Toggle {
                    turn: position(turn, "/toggle <n> <m>")?,
                    result: position(result, "/toggle <n> <m>")?,
                }
            }
            "dismiss" => Command::Dismiss,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(ChatroomError::Command {
                    message: format!("Unknown command '/{other}', type /help for a list"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}

/// 1-based number typed by the user, as a 0-based index.
#[track_caller]
fn position(text: &str, usage_text: &str) -> Result<usize, ChatroomError> {
    match text.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number - 1),
        _ => Err(usage(usage_text)),
    }
}

#[track_caller]
fn usage(usage_text: &str) -> ChatroomError {
    ChatroomError::Command {
        message: format!("Usage: {usage_text} (numbers start at 1)"),
        location: ErrorLocation::from(Location::caller()),
    }
}
