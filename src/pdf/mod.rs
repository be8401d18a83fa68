//! PDF rasterization.
//!
//! This module provides:
//! - The `PdfEngine` seam over the decoding library
//! - A PDFium implementation with memoized library discovery
//! - First-page rendering sized to the preview pane, encoded as a JPEG data URL

mod engine;
mod rasterizer;
mod renderer;
#[cfg(test)]
pub(crate) mod testing;

pub use engine::*;
pub use rasterizer::*;
pub use renderer::*;
