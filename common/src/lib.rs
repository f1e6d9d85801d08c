//! Shared building blocks for the chatroom workspace.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location tracking and HTTP status helpers
//! - **chatroom-core**: backend clients, session state and controller
//! - **chatroom**: terminal front end wiring everything together
//!
//! Nothing in here knows about either backend, which keeps it usable from
//! every layer.

pub mod error;
pub mod http_status;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use http_status::HttpStatusCode;
