//! The seam between the rasterizer and whatever library actually decodes PDFs.

use image::RgbaImage;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while turning a PDF into a bitmap.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("PDF renderer is unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("The PDF has no pages")]
    NoPages,

    #[error("Invalid page index: {0}")]
    InvalidPage(u16),

    #[error("Preview area has no usable width ({0})")]
    EmptyContainer(f32),

    #[error("Page is too large to render ({width}x{height} px)")]
    SurfaceTooLarge { width: u32, height: u32 },

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),
}

impl RasterError {
    /// The library-supplied part of the message, if this variant carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::EngineUnavailable(d) | Self::Load(d) | Self::Render(d) | Self::Encode(d) => {
                Some(d.as_str())
            }
            _ => None,
        }
    }
}

impl Serialize for RasterError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Unscaled page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

/// Pixel size of the bitmap a page should be drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
    /// Smoothing blurs small text when the bitmap is scaled up for zoom.
    pub smoothing: bool,
}

/// A PDF decoding and rasterization library.
///
/// The document borrows both the engine and the input bytes, which matches
/// how pdfium-render ties `PdfDocument` to its `Pdfium` instance.
pub trait PdfEngine {
    type Document<'a>: RasterDocument
    where
        Self: 'a;

    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Self::Document<'a>, RasterError>;
}

/// An opened document.
pub trait RasterDocument {
    fn page_count(&self) -> u32;

    /// Native (scale 1.0) size of a page.
    fn page_size(&self, index: u16) -> Result<PageSize, RasterError>;

    /// Draw a page into a freshly allocated bitmap of the target size.
    fn render_page(&self, index: u16, target: RenderTarget) -> Result<RgbaImage, RasterError>;
}
