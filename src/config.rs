//! Runtime settings, read from the environment once at startup.

use std::path::PathBuf;

/// Explicit location of the PDFium dynamic library.
pub const PDFIUM_PATH_VAR: &str = "LETTERHEAD_PDFIUM_PATH";
/// Log filter, takes precedence over `RUST_LOG`.
pub const LOG_VAR: &str = "LETTERHEAD_LOG";

const DEFAULT_LOG_FILTER: &str = "letterhead_lib=info,warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub pdfium_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pdfium_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            pdfium_path: non_empty(PDFIUM_PATH_VAR).map(PathBuf::from),
            log_filter: non_empty(LOG_VAR)
                .or_else(|| non_empty("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_logging(settings: &Settings) {
    let filter = tracing_subscriber::EnvFilter::try_new(&settings.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
