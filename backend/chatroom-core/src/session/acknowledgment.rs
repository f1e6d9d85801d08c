use crate::api::wire::UploadOutcome;
use crate::session::state::RequestKind;

use std::fmt::{Display, Formatter, Result as FormatResult};

/// Blocking message the front end must show and have the user confirm.
///
/// Upload and remember results are reported this way rather than as a
/// [`Notice`](crate::session::Notice), success included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgment {
    UploadAccepted {
        filename: String,
        success: u64,
        fail: u64,
    },

    /// The retrieval backend answered with an `error` field.
    UploadRejected { message: String },

    /// The upload never produced a backend answer (bad file, transport, status).
    UploadFailed { message: String },

    Remembered,

    RememberFailed,

    /// Another request of the same kind is still running.
    Busy(RequestKind),
}

impl From<UploadOutcome> for Acknowledgment {
    fn from(outcome: UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Rejected { message } => Acknowledgment::UploadRejected { message },
            UploadOutcome::Ingested {
                filename,
                success,
                fail,
            } => Acknowledgment::UploadAccepted {
                filename,
                success,
                fail,
            },
        }
    }
}

impl Display for Acknowledgment {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            Acknowledgment::UploadAccepted {
                filename,
                success,
                fail,
            } => write!(
                formatter,
                "File {filename} uploaded: {success} succeeded, {fail} failed"
            ),
            Acknowledgment::UploadRejected { message } => write!(formatter, "Error: {message}"),
            Acknowledgment::UploadFailed { message } => {
                write!(formatter, "File upload failed: {message}")
            }
            Acknowledgment::Remembered => formatter.write_str("Answer saved"),
            Acknowledgment::RememberFailed => formatter.write_str("Failed to save answer"),
            Acknowledgment::Busy(kind) => {
                write!(formatter, "{kind} already in progress, wait for it to finish")
            }
        }
    }
}
