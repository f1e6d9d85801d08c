use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum StoreError {
    /// The state actor stopped or dropped its reply channel.
    #[error("Store Error: {message} {location}")]
    ActorUnavailable {
        message: String,
        location: ErrorLocation,
    },
}
