//! The chat session: data model, reducer, state actor and controller.

pub mod acknowledgment;
pub mod controller;
pub mod model;
pub mod notice;
pub mod state;
pub mod store;

pub use acknowledgment::Acknowledgment;
pub use controller::{SendOutcome, SessionController};
pub use model::{ChatTurn, Disclosure, ModelList, Tool, ToolResult, Transcript};
pub use notice::Notice;
pub use state::{Action, RequestKind, SessionState};
pub use store::{SessionStore, Transition};
