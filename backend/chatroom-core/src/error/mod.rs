pub mod api_client;
pub mod config;
pub mod document;
pub mod session;
pub mod store;

pub use api_client::ApiClientError;
pub use config::ConfigError;
pub use document::DocumentError;
pub use session::SessionError;
pub use store::StoreError;
