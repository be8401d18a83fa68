//! File intake: what was selected, and whether it is a PDF.

use crate::error::PreviewError;
use std::path::Path;
use std::sync::Arc;

pub const PDF_MIME: &str = "application/pdf";

/// The currently selected document. Replaced wholesale on every selection.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub mime: String,
    /// Shared so the blocking render task can hold the bytes without a copy.
    pub bytes: Arc<Vec<u8>>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Read a file from disk. The MIME type is inferred from the extension,
    /// the same information a browser file picker would report.
    pub fn from_path(path: &Path) -> Result<Self, PreviewError> {
        let bytes = std::fs::read(path).map_err(|e| PreviewError::Io(e.to_string()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_for_path(path), bytes))
    }
}

/// MIME type for a path, by extension only.
pub fn mime_for_path(path: &Path) -> &'static str {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        PDF_MIME
    } else {
        "application/octet-stream"
    }
}

/// Accept only `application/pdf`. Content is not inspected; malformed files
/// fail later inside the renderer.
pub fn validate(file: &UploadedFile) -> Result<(), PreviewError> {
    let essence = file.mime.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(PDF_MIME) {
        Ok(())
    } else {
        Err(PreviewError::InvalidType)
    }
}
