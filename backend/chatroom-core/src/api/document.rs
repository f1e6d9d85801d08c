//! Files accepted for upload to the retrieval backend.

use crate::error::document::DocumentError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;

use log::debug;

/// Extensions the picker accepts, with the MIME type sent for each.
pub const ACCEPTED_DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
];

/// A document read into memory and ready to be sent as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDocument {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadDocument {
    /// Build a document from a file name and its contents.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Unsupported`] if the extension is not one of
    /// [`ACCEPTED_DOCUMENT_TYPES`].
    #[track_caller]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let file_name = file_name.into();
        let mime = mime_for(Path::new(&file_name))?;

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Read a document from disk.
    ///
    /// The extension is checked before the file is read, so unsupported files
    /// are refused without touching their contents.
    pub async fn load(path: &Path) -> Result<Self, DocumentError> {
        let mime = mime_for(path)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| DocumentError::Unsupported {
                path: path.to_path_buf(),
                reason: String::from("path has no file name"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DocumentError::Read {
                path: path.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!("Loaded {} ({} bytes, {mime})", path.display(), bytes.len());

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }
}

/// MIME type for an accepted document, matched on the extension (case-insensitive).
#[track_caller]
pub fn mime_for(path: &Path) -> Result<&'static str, DocumentError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    ACCEPTED_DOCUMENT_TYPES
        .iter()
        .find(|(accepted, _)| *accepted == extension)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| DocumentError::Unsupported {
            path: path.to_path_buf(),
            reason: if extension.is_empty() {
                String::from("no file extension")
            } else {
                format!("'.{extension}' is not a PDF, Word or plain text document")
            },
            location: ErrorLocation::from(Location::caller()),
        })
}
