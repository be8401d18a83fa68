//! Tauri commands for the letterhead preview.
//!
//! These commands expose intake, rendering, zoom and printing to the WebView
//! frontend via IPC. Loading commands answer with a fresh [`PreviewSnapshot`]
//! so the frontend never keeps its own copy of the state. Zoom commands answer
//! with a [`ZoomState`] only, since the bitmap does not change.
//!
//! Note: pdfium-render's Pdfium struct is not Send+Sync, so rendering binds a
//! Pdfium instance inside a blocking task. Only the uploaded bytes live in state.

use crate::config::Settings;
use crate::error::PreviewError;
use crate::intake::UploadedFile;
use crate::letterhead::{Letterhead, LETTERHEAD};
use crate::pdf::{self, PdfiumEngine, RasterError, Rasterizer, RenderOutcome};
use crate::preview::{PreviewSession, PreviewSnapshot, ZoomState};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tauri::http::HeaderMap;
use tauri::ipc::{InvokeBody, Request};
use tauri::{AppHandle, State, WebviewWindow};
use tauri_plugin_dialog::{DialogExt, FilePath};

/// Application state: the single preview session plus startup settings.
pub struct AppState {
    pub preview: Mutex<PreviewSession>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            preview: Mutex::new(PreviewSession::new()),
            settings,
        }
    }

    fn session(&self) -> MutexGuard<'_, PreviewSession> {
        // Session updates are plain field writes; a panic mid-update cannot
        // leave anything worse than a stale preview.
        self.preview.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn join_error(e: tauri::Error) -> PreviewError {
    PreviewError::Render(RasterError::Render(e.to_string()))
}

/// Render page one off the async runtime.
async fn rasterize_in_background(
    pdfium_path: Option<PathBuf>,
    bytes: Arc<Vec<u8>>,
    container_width: f32,
) -> Result<RenderOutcome, PreviewError> {
    let source = pdf::resolve_library(pdfium_path.as_deref()).await?;

    let outcome = tauri::async_runtime::spawn_blocking(move || {
        let engine = PdfiumEngine::bind(&source)?;
        Rasterizer::new(engine).rasterize(&bytes, container_width)
    })
    .await
    .map_err(join_error)??;

    Ok(outcome)
}

/// Run one upload through intake and rendering, then report the new state.
async fn load_into_preview(
    state: &AppState,
    file: UploadedFile,
    container_width: f32,
) -> PreviewSnapshot {
    let begun = state.session().begin_upload(file);
    let ticket = match begun {
        Ok(ticket) => ticket,
        Err(_) => return state.session().snapshot(),
    };

    let result = rasterize_in_background(
        state.settings.pdfium_path.clone(),
        ticket.file.bytes.clone(),
        container_width,
    )
    .await;

    let mut session = state.session();
    session.complete_render(&ticket, result);
    session.snapshot()
}

async fn read_file(path: PathBuf) -> Result<UploadedFile, PreviewError> {
    tauri::async_runtime::spawn_blocking(move || UploadedFile::from_path(&path))
        .await
        .map_err(|e| PreviewError::Io(e.to_string()))?
}

/// Read a file from disk and load it. A read failure lands in the session
/// like any other intake or render failure.
async fn load_path_into_preview(
    state: &AppState,
    path: PathBuf,
    container_width: f32,
) -> PreviewSnapshot {
    match read_file(path.clone()).await {
        Ok(file) => load_into_preview(state, file, container_width).await,
        Err(e) => {
            let mut session = state.session();
            session.fail_intake(&path.display().to_string(), &e);
            session.snapshot()
        }
    }
}

/// Header carrying the percent-encoded file name of a raw upload.
pub const FILE_NAME_HEADER: &str = "x-file-name";
/// Header carrying the browser-reported MIME type of a raw upload.
pub const FILE_MIME_HEADER: &str = "x-file-mime";
/// Header carrying the preview pane width in CSS pixels.
pub const CONTAINER_WIDTH_HEADER: &str = "x-container-width";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Split a raw upload into the file and the pane width it should fit.
fn upload_from_parts(
    headers: &HeaderMap,
    body: &InvokeBody,
) -> Result<(UploadedFile, f32), PreviewError> {
    let InvokeBody::Raw(bytes) = body else {
        return Err(PreviewError::Upload("expected raw file bytes".into()));
    };

    let name = header(headers, FILE_NAME_HEADER)
        .map(|raw| {
            urlencoding::decode(raw)
                .map(|n| n.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
        .unwrap_or_default();
    // A browser that cannot tell the type sends none; intake rejects it.
    let mime = header(headers, FILE_MIME_HEADER).unwrap_or_default();
    let container_width = header(headers, CONTAINER_WIDTH_HEADER)
        .and_then(|w| w.trim().parse::<f32>().ok())
        .ok_or_else(|| {
            PreviewError::Upload(format!("missing or invalid {}", CONTAINER_WIDTH_HEADER))
        })?;

    Ok((UploadedFile::new(name, mime, bytes.clone()), container_width))
}

/// Load a PDF sent from the WebView's file input.
///
/// The file bytes arrive as the raw IPC body. Name, MIME type and the preview
/// pane width travel in the `x-file-name`, `x-file-mime` and
/// `x-container-width` headers.
#[tauri::command]
pub async fn upload_pdf(
    request: Request<'_>,
    state: State<'_, AppState>,
) -> Result<PreviewSnapshot, PreviewError> {
    let (file, container_width) = upload_from_parts(request.headers(), request.body())?;
    Ok(load_into_preview(&state, file, container_width).await)
}

/// Load a PDF from disk (launch argument or "Open With").
#[tauri::command]
pub async fn open_pdf_path(
    path: String,
    container_width: f32,
    state: State<'_, AppState>,
) -> Result<PreviewSnapshot, PreviewError> {
    Ok(load_path_into_preview(&state, PathBuf::from(path), container_width).await)
}

/// Show the native file picker and load the chosen PDF.
/// Returns `None` when the picker is cancelled.
#[tauri::command]
pub async fn choose_pdf(
    app: AppHandle,
    container_width: f32,
    state: State<'_, AppState>,
) -> Result<Option<PreviewSnapshot>, PreviewError> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .file()
        .add_filter("PDF document", &["pdf"])
        .pick_file(move |picked| {
            let _ = tx.send(picked);
        });

    let picked = rx.await.ok().flatten();
    let Some(path) = picked.and_then(file_path_to_path) else {
        return Ok(None);
    };

    Ok(Some(load_path_into_preview(&state, path, container_width).await))
}

fn file_path_to_path(picked: FilePath) -> Option<PathBuf> {
    match picked {
        FilePath::Path(path) => Some(path),
        FilePath::Url(url) => url.to_file_path().ok(),
    }
}

#[tauri::command]
pub fn get_preview(state: State<'_, AppState>) -> PreviewSnapshot {
    state.session().snapshot()
}

#[tauri::command]
pub fn zoom_in(state: State<'_, AppState>) -> ZoomState {
    let mut session = state.session();
    session.zoom_in();
    tracing::debug!(zoom = session.zoom().value(), "zoom changed");
    session.zoom_state()
}

#[tauri::command]
pub fn zoom_out(state: State<'_, AppState>) -> ZoomState {
    let mut session = state.session();
    session.zoom_out();
    tracing::debug!(zoom = session.zoom().value(), "zoom changed");
    session.zoom_state()
}

#[tauri::command]
pub fn zoom_reset(state: State<'_, AppState>) -> ZoomState {
    let mut session = state.session();
    session.reset_zoom();
    tracing::debug!(zoom = session.zoom().value(), "zoom changed");
    session.zoom_state()
}

/// Open the native print dialog for the letterhead window.
///
/// Print CSS in the frontend hides the controls and fits the letterhead to
/// the page; nothing is laid out here.
#[tauri::command]
pub fn print_letterhead(
    window: WebviewWindow,
    state: State<'_, AppState>,
) -> Result<(), PreviewError> {
    if !state.session().can_print() {
        return Err(PreviewError::NothingToPrint);
    }
    tracing::info!(window = window.label(), "opening print dialog");
    window
        .print()
        .map_err(|e| PreviewError::Print(e.to_string()))
}

#[tauri::command]
pub fn get_letterhead() -> Letterhead {
    LETTERHEAD
}

/// Whether a path should be offered to the preview as a PDF.
pub fn is_pdf_path(path: &Path) -> bool {
    path.is_file() && crate::intake::mime_for_path(path) == crate::intake::PDF_MIME
}
