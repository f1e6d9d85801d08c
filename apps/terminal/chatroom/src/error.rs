use chatroom_core::error::{ApiClientError, ConfigError, SessionError};

use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;

use thiserror::Error;

/// Errors surfaced by the terminal front end.
///
/// Backend and session failures arrive here already logged, so only their
/// rendered message is kept alongside the location where the front end saw them.
#[derive(Debug, Error)]
pub enum ChatroomError {
    /// Error from this App
    #[error("Chatroom Error: {message} {location}")]
    Chatroom {
        message: String,
        location: ErrorLocation,
    },

    /// Input line that is not a valid command
    #[error("Command Error: {message} {location}")]
    Command {
        message: String,
        location: ErrorLocation,
    },

    /// Error from chatroom-core operations (config, clients, session)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Terminal input/output failed
    #[error("IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
    },
}

impl ChatroomError {
    /// Message without the location suffix, for showing to the user.
    pub fn message(&self) -> &str {
        match self {
            ChatroomError::Chatroom { message, .. }
            | ChatroomError::Command { message, .. }
            | ChatroomError::Core { message, .. }
            | ChatroomError::Io { message, .. } => message,
        }
    }
}

impl From<SessionError> for ChatroomError {
    #[track_caller]
    fn from(error: SessionError) -> Self {
        ChatroomError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for ChatroomError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        ChatroomError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ApiClientError> for ChatroomError {
    #[track_caller]
    fn from(error: ApiClientError) -> Self {
        ChatroomError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<IoError> for ChatroomError {
    #[track_caller]
    fn from(error: IoError) -> Self {
        ChatroomError::Io {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
