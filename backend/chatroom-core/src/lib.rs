pub mod api;
pub mod config;
pub mod error;
pub mod session;

#[cfg(test)]
mod tests;

pub const CHATROOM_APP_NAME: &str = "chatroom";
pub const DEFAULT_BACKEND_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_CHAT_API_PORT: u16 = 3100;
pub const DEFAULT_RETRIEVAL_PORT: u16 = 8500;
pub const DEFAULT_CHAT_API_URL: &str = const_format::concatcp!(
    "http://",
    DEFAULT_BACKEND_HOSTNAME,
    ":",
    DEFAULT_CHAT_API_PORT
);
pub const DEFAULT_RETRIEVAL_URL: &str = const_format::concatcp!(
    "http://",
    DEFAULT_BACKEND_HOSTNAME,
    ":",
    DEFAULT_RETRIEVAL_PORT
);
