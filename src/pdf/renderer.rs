//! PDFium-backed engine using pdfium-render.
//!
//! Note: pdfium-render's Pdfium struct is not Send+Sync, so a fresh instance is
//! bound inside each blocking render task. Only the library location is shared,
//! and it is resolved once per process.

use super::engine::{PageSize, PdfEngine, RasterDocument, RasterError, RenderTarget};
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

/// Where the PDFium dynamic library was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    Path(PathBuf),
    System,
}

static LIBRARY: OnceCell<LibrarySource> = OnceCell::const_new();

/// Locate PDFium, memoizing the first successful result.
///
/// A failed lookup is not cached, so installing the library and retrying an
/// upload works without restarting the app. Probing candidates loads shared
/// libraries, so it runs on the blocking pool.
pub async fn resolve_library(explicit: Option<&Path>) -> Result<LibrarySource, RasterError> {
    let explicit = explicit.map(Path::to_path_buf);
    LIBRARY
        .get_or_try_init(|| async move {
            tauri::async_runtime::spawn_blocking(move || locate_library(explicit.as_deref()))
                .await
                .map_err(|e| RasterError::EngineUnavailable(e.to_string()))?
        })
        .await
        .cloned()
}

#[cfg(target_os = "windows")]
const LIBRARY_FILE: &str = "pdfium.dll";
#[cfg(target_os = "macos")]
const LIBRARY_FILE: &str = "libpdfium.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LIBRARY_FILE: &str = "libpdfium.so";

/// Candidate library paths, most specific first.
fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            // Tauri bundles resources next to the executable on Windows/Linux
            paths.push(exe_dir.join(LIBRARY_FILE));
            // exe is Contents/MacOS/letterhead, the dylib lives in Contents/Frameworks
            paths.push(exe_dir.join("..").join("Frameworks").join(LIBRARY_FILE));
        }
    }

    // Development checkout
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("lib").join(LIBRARY_FILE));
    }

    paths
}

fn locate_library(explicit: Option<&Path>) -> Result<LibrarySource, RasterError> {
    for path in search_paths(explicit) {
        if !path.exists() {
            continue;
        }
        match Pdfium::bind_to_library(&path) {
            Ok(_) => {
                tracing::info!(path = %path.display(), "loaded bundled PDFium library");
                return Ok(LibrarySource::Path(path));
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = ?e, "PDFium candidate rejected");
            }
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(_) => {
            tracing::info!("loaded system PDFium library");
            Ok(LibrarySource::System)
        }
        Err(e) => Err(RasterError::EngineUnavailable(format!(
            "could not load the PDFium library ({:?}); set LETTERHEAD_PDFIUM_PATH to its location",
            e
        ))),
    }
}

/// A bound PDFium instance.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    pub fn bind(source: &LibrarySource) -> Result<Self, RasterError> {
        let bindings = match source {
            LibrarySource::Path(path) => Pdfium::bind_to_library(path),
            LibrarySource::System => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| RasterError::EngineUnavailable(format!("{:?}", e)))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PdfEngine for PdfiumEngine {
    type Document<'a> = PdfiumDocument<'a>;

    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<PdfiumDocument<'a>, RasterError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| RasterError::Load(e.to_string()))?;
        Ok(PdfiumDocument { document })
    }
}

pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    fn page(&self, index: u16) -> Result<PdfPage<'a>, RasterError> {
        self.document
            .pages()
            .get(index)
            .map_err(|_| RasterError::InvalidPage(index))
    }
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }

    fn page_size(&self, index: u16) -> Result<PageSize, RasterError> {
        let page = self.page(index)?;
        Ok(PageSize {
            width: page.width().value,
            height: page.height().value,
        })
    }

    fn render_page(&self, index: u16, target: RenderTarget) -> Result<RgbaImage, RasterError> {
        let page = self.page(index)?;

        let config = PdfRenderConfig::new()
            .set_target_width(target.width as i32)
            .set_target_height(target.height as i32)
            .set_image_smoothing(target.smoothing)
            .render_form_data(true)
            .render_annotations(true);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RasterError::Render(e.to_string()))?;

        Ok(bitmap.as_image().into_rgba8())
    }
}
