//! In-memory engine for exercising the render pipeline without PDFium.

use super::engine::{PageSize, PdfEngine, RasterDocument, RasterError, RenderTarget};
use image::{Rgba, RgbaImage};
use std::sync::{Arc, Mutex};

/// In-memory engine: any input starting with `%PDF` opens as a document with
/// the configured pages, anything else fails like a corrupt file would.
#[derive(Clone)]
pub(crate) struct FakeEngine {
    pub pages: Vec<PageSize>,
    pub render_error: Option<String>,
    pub rendered: Arc<Mutex<Vec<RenderTarget>>>,
}

impl FakeEngine {
    pub(crate) fn letter(page_count: usize) -> Self {
        Self {
            pages: vec![
                PageSize {
                    width: 612.0,
                    height: 792.0,
                };
                page_count
            ],
            render_error: None,
            rendered: Arc::default(),
        }
    }
}

pub(crate) struct FakeDocument<'a> {
    engine: &'a FakeEngine,
}

impl PdfEngine for FakeEngine {
    type Document<'a> = FakeDocument<'a>;

    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<FakeDocument<'a>, RasterError> {
        if !bytes.starts_with(b"%PDF") {
            return Err(RasterError::Load("file is not a PDF".to_string()));
        }
        Ok(FakeDocument { engine: self })
    }
}

impl RasterDocument for FakeDocument<'_> {
    fn page_count(&self) -> u32 {
        self.engine.pages.len() as u32
    }

    fn page_size(&self, index: u16) -> Result<PageSize, RasterError> {
        self.engine
            .pages
            .get(index as usize)
            .copied()
            .ok_or(RasterError::InvalidPage(index))
    }

    fn render_page(&self, index: u16, target: RenderTarget) -> Result<RgbaImage, RasterError> {
        self.page_size(index)?;
        if let Some(message) = &self.engine.render_error {
            return Err(RasterError::Render(message.clone()));
        }
        self.engine.rendered.lock().unwrap().push(target);
        Ok(RgbaImage::from_pixel(
            target.width,
            target.height,
            Rgba([20, 20, 20, 255]),
        ))
    }
}

pub(crate) const SAMPLE_PDF: &[u8] = b"%PDF-1.7 sample";

