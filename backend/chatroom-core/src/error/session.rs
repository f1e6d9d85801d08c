use crate::error::api_client::ApiClientError;
use crate::error::store::StoreError;
use crate::session::state::RequestKind;

use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Errors returned by [`SessionController`](crate::session::SessionController) operations.
///
/// Backend failures the session absorbs (notices, acknowledgments) never show up
/// here; only the ones the caller has to handle do.
#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error("Unknown Model Error: '{model}' is not in the model list {location}")]
    UnknownModel {
        model: String,
        location: ErrorLocation,
    },

    #[error("Busy Error: cannot start while {kind} is in progress {location}")]
    Busy {
        kind: RequestKind,
        location: ErrorLocation,
    },

    #[error("Unknown Turn Error: no turn at index {index} {location}")]
    UnknownTurn {
        index: usize,
        location: ErrorLocation,
    },

    #[error("Unknown Tool Result Error: turn {turn} has no tool result {result} {location}")]
    UnknownToolResult {
        turn: usize,
        result: usize,
        location: ErrorLocation,
    },
}
