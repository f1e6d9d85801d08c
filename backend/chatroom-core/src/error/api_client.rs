use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ApiClientError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Server Error: HTTP {status} - {message} {location}")]
    Server {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },
}

impl ApiClientError {
    /// Status code reported by the backend, if the failure came from one.
    pub fn status(&self) -> Option<HttpStatusCode> {
        match self {
            ApiClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message without the location suffix, for user-facing text.
    pub fn message(&self) -> &str {
        match self {
            ApiClientError::Http { message, .. }
            | ApiClientError::Json { message, .. }
            | ApiClientError::UrlParse { message, .. }
            | ApiClientError::Server { message, .. } => message,
        }
    }

    /// One-line description for user-facing text, without the location.
    pub fn summary(&self) -> String {
        match self {
            ApiClientError::Server {
                status, message, ..
            } => format!("HTTP {status} - {message}"),
            other => other.message().to_string(),
        }
    }
}

impl From<url::ParseError> for ApiClientError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ApiClientError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ApiClientError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        ApiClientError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for ApiClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ApiClientError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
