//! Errors surfaced to the user.

use crate::pdf::RasterError;
use serde::Serialize;
use thiserror::Error;

pub const INVALID_TYPE_MESSAGE: &str = "Please upload a PDF file.";
pub const RENDER_FALLBACK_MESSAGE: &str = "Failed to render the PDF.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreviewError {
    #[error("{}", INVALID_TYPE_MESSAGE)]
    InvalidType,

    #[error(transparent)]
    Render(#[from] RasterError),

    #[error("Nothing to print: upload a PDF first")]
    NothingToPrint,

    #[error("Failed to read file: {0}")]
    Io(String),

    #[error("Failed to open the print dialog: {0}")]
    Print(String),

    #[error("Malformed upload: {0}")]
    Upload(String),
}

impl PreviewError {
    /// Message shown in the preview pane. Never empty.
    pub fn user_message(&self) -> String {
        match self {
            Self::Render(e) if e.detail().is_some_and(|d| d.trim().is_empty()) => {
                RENDER_FALLBACK_MESSAGE.to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl Serialize for PreviewError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.user_message())
    }
}
