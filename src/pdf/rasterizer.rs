//! First-page rasterization sized to the preview pane.

use super::engine::{PdfEngine, RasterDocument, RasterError, RenderTarget};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};
use serde::Serialize;

/// Oversampling applied on top of the fit-to-width scale so the bitmap stays
/// sharp at the maximum zoom and on paper.
pub const QUALITY_FACTOR: f32 = 4.0;

/// JPEG quality used for the embedded page image.
pub const JPEG_QUALITY: u8 = 100;

/// Largest bitmap side we will allocate. Matches the canvas limit of common
/// WebView engines, which the image ends up in.
pub const MAX_SURFACE_SIDE: u32 = 16_384;

const FIRST_PAGE: u16 = 0;

/// A rendered page ready to embed in the WebView.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    /// `data:image/jpeg;base64,...`
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Everything a successful rasterization produces.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub page_count: u32,
    pub page: RenderedPage,
}

/// Pixel size of the bitmap for a page of `native_width` x `native_height`
/// points shown in a pane `container_width` pixels wide.
pub fn target_size(
    native_width: f32,
    native_height: f32,
    container_width: f32,
) -> Result<(u32, u32), RasterError> {
    if !container_width.is_finite() || container_width <= 0.0 {
        return Err(RasterError::EmptyContainer(container_width));
    }
    if !(native_width.is_finite() && native_height.is_finite())
        || native_width <= 0.0
        || native_height <= 0.0
    {
        return Err(RasterError::Render(format!(
            "page has invalid dimensions {}x{}",
            native_width, native_height
        )));
    }

    let scale = container_width / native_width * QUALITY_FACTOR;
    let width = (native_width * scale).round();
    let height = (native_height * scale).round();

    if width > MAX_SURFACE_SIDE as f32 || height > MAX_SURFACE_SIDE as f32 {
        return Err(RasterError::SurfaceTooLarge {
            width: width as u32,
            height: height as u32,
        });
    }

    Ok((width.max(1.0) as u32, height.max(1.0) as u32))
}

/// Drives a [`PdfEngine`] through open, measure, render and encode.
pub struct Rasterizer<E> {
    engine: E,
}

impl<E: PdfEngine> Rasterizer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Render page one of `bytes` to fit a pane `container_width` pixels wide.
    pub fn rasterize(&self, bytes: &[u8], container_width: f32) -> Result<RenderOutcome, RasterError> {
        let document = self.engine.open(bytes)?;

        let page_count = document.page_count();
        if page_count == 0 {
            return Err(RasterError::NoPages);
        }

        let native = document.page_size(FIRST_PAGE)?;
        let (width, height) = target_size(native.width, native.height, container_width)?;
        tracing::debug!(
            page_count,
            native_width = native.width,
            native_height = native.height,
            width,
            height,
            "rasterizing first page"
        );

        let bitmap = document.render_page(
            FIRST_PAGE,
            RenderTarget {
                width,
                height,
                smoothing: false,
            },
        )?;

        Ok(RenderOutcome {
            page_count,
            page: encode_jpeg_data_url(&bitmap)?,
        })
    }
}

/// JPEG has no alpha channel; transparent areas of the page become paper white.
fn flatten_on_white(bitmap: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(bitmap.width(), bitmap.height(), |x, y| {
        let [r, g, b, a] = bitmap.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

fn encode_jpeg_data_url(bitmap: &RgbaImage) -> Result<RenderedPage, RasterError> {
    let flattened = flatten_on_white(bitmap);

    let mut jpeg_bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_bytes, JPEG_QUALITY)
        .encode_image(&flattened)
        .map_err(|e| RasterError::Encode(e.to_string()))?;

    Ok(RenderedPage {
        data_url: format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg_bytes)),
        width: flattened.width(),
        height: flattened.height(),
    })
}
