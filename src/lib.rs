// Letterhead - Native Tauri Backend
//
// Places the first page of an uploaded PDF onto the company letterhead,
// rendered with PDFium, and hands the result to the native print dialog.

mod commands;
mod config;
mod error;
mod intake;
mod letterhead;
mod pdf;
mod preview;
mod zoom;

use commands::{
    choose_pdf, get_letterhead, get_preview, open_pdf_path, print_letterhead, upload_pdf,
    zoom_in, zoom_out, zoom_reset, AppState,
};
use config::Settings;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tauri::RunEvent;

/// Stores the file path that was passed to the app on launch (if any).
/// This is used to open PDFs when the app is launched via file association.
pub struct LaunchFile(pub Mutex<Option<String>>);

/// Turn one launch argument into a PDF path, if it names one.
///
/// Accepts plain paths, `file://` URLs (macOS sometimes passes these) and
/// percent-encoded paths.
fn pdf_from_arg(arg: &str) -> Option<PathBuf> {
    // Skip Tauri/debug flags
    if arg.starts_with('-') {
        return None;
    }

    let direct = Path::new(arg);
    if commands::is_pdf_path(direct) {
        return Some(direct.to_path_buf());
    }

    if arg.starts_with("file://") {
        if let Some(path) = url::Url::parse(arg).ok().and_then(|u| u.to_file_path().ok()) {
            if commands::is_pdf_path(&path) {
                return Some(path);
            }
        }
    }

    if let Ok(decoded) = urlencoding::decode(arg) {
        let decoded = PathBuf::from(decoded.as_ref());
        if decoded.as_os_str() != arg && commands::is_pdf_path(&decoded) {
            return Some(decoded);
        }
    }

    None
}

/// Extract the PDF file path from command line arguments.
fn get_pdf_from_args() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    tracing::debug!(?args, "launch arguments");

    args.iter()
        .skip(1)
        .find_map(|arg| pdf_from_arg(arg))
        .and_then(|path| path.to_str().map(str::to_string))
}

/// Handle file associations - extract PDF paths from URLs and emit to frontend.
#[cfg(any(target_os = "macos", target_os = "ios"))]
fn handle_file_associations<R: tauri::Runtime>(app_handle: &tauri::AppHandle<R>, urls: Vec<url::Url>) {
    use tauri::Emitter;

    tracing::info!(count = urls.len(), "received file open event");

    let first_pdf = urls
        .iter()
        .filter_map(|url| url.to_file_path().ok())
        .find(|path| commands::is_pdf_path(path));

    match first_pdf.as_deref().and_then(Path::to_str) {
        Some(path) => {
            // Only the first PDF is opened
            if let Err(e) = app_handle.emit("open-file", path) {
                tracing::warn!(error = %e, "failed to emit open-file event");
            }
        }
        None => tracing::warn!("file open event contained no readable PDF"),
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let settings = Settings::from_env();
    config::init_logging(&settings);

    // Check for PDF file in launch arguments (Windows/Linux primarily)
    let launch_file = get_pdf_from_args();
    if let Some(ref file) = launch_file {
        tracing::info!(file = %file, "launch file from args");
    }

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(AppState::new(settings))
        .manage(LaunchFile(Mutex::new(launch_file)))
        .invoke_handler(tauri::generate_handler![
            upload_pdf,
            open_pdf_path,
            choose_pdf,
            get_preview,
            zoom_in,
            zoom_out,
            zoom_reset,
            print_letterhead,
            get_letterhead,
            get_launch_file,
        ])
        .setup(|_app| {
            tracing::info!("app setup complete");
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    // Run with event handler for macOS file associations
    app.run(|_app_handle, event| match event {
        // Handle macOS "Open With" / double-click file associations
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        RunEvent::Opened { urls } => handle_file_associations(_app_handle, urls),

        RunEvent::ExitRequested { .. } => tracing::debug!("exit requested"),

        _ => {}
    });
}

/// Get the file path that was passed on launch (if any).
/// Frontend calls this on startup to check if a PDF should be opened.
#[tauri::command]
fn get_launch_file(state: tauri::State<LaunchFile>) -> Option<String> {
    let mut guard = state.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.take() // Return and clear the launch file
}
