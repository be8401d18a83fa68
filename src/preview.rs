//! Session state behind the preview pane.
//!
//! Every upload bumps a generation counter and hands out a [`RenderTicket`].
//! A render result is only applied while its ticket is current, so a slow
//! render of an older file can never overwrite a newer one.

use crate::error::PreviewError;
use crate::intake::{self, UploadedFile};
use crate::pdf::{RenderOutcome, RenderedPage};
use crate::zoom::ZoomLevel;
use serde::Serialize;

/// Proof that a render was started for a particular upload.
#[derive(Debug, Clone)]
pub struct RenderTicket {
    pub generation: u64,
    pub file: UploadedFile,
}

#[derive(Debug, Default)]
pub struct PreviewSession {
    file: Option<UploadedFile>,
    image: Option<RenderedPage>,
    page_count: Option<u32>,
    zoom: ZoomLevel,
    rendering: bool,
    error: Option<String>,
    generation: u64,
}

/// Which controls the WebView should enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub can_reset_zoom: bool,
    pub can_print: bool,
}

/// Everything the WebView needs to draw the preview pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSnapshot {
    pub file_name: Option<String>,
    pub image: Option<RenderedPage>,
    pub page_count: Option<u32>,
    pub zoom: ZoomLevel,
    pub zoom_percent: u32,
    pub rendering: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub controls: Controls,
}

/// Answer to a zoom command. Zoom is a CSS scale on the existing bitmap, so
/// the image itself is never sent again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomState {
    pub zoom: ZoomLevel,
    pub zoom_percent: u32,
    pub controls: Controls,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a new selection and, if it is a PDF, start a render for it.
    ///
    /// Either way the previous image is gone afterwards, and any render still
    /// running for an earlier file is invalidated.
    pub fn begin_upload(&mut self, file: UploadedFile) -> Result<RenderTicket, PreviewError> {
        self.generation += 1;
        self.image = None;
        self.page_count = None;

        if let Err(e) = intake::validate(&file) {
            tracing::warn!(name = %file.name, mime = %file.mime, "rejected non-PDF upload");
            self.file = None;
            self.rendering = false;
            self.error = Some(e.user_message());
            return Err(e);
        }

        tracing::info!(
            name = %file.name,
            bytes = file.bytes.len(),
            generation = self.generation,
            "accepted upload"
        );
        self.zoom.reset();
        self.error = None;
        self.rendering = true;
        self.file = Some(file.clone());

        Ok(RenderTicket {
            generation: self.generation,
            file,
        })
    }

    /// Record a selection that could not even be read, e.g. a file that vanished
    /// between picking and loading. Like a rejected upload, it clears the
    /// preview and invalidates any render still running.
    pub fn fail_intake(&mut self, name: &str, error: &PreviewError) {
        self.generation += 1;
        tracing::warn!(name = %name, error = %error, "could not read selected file");
        self.file = None;
        self.image = None;
        self.page_count = None;
        self.rendering = false;
        self.error = Some(error.user_message());
    }

    /// Apply the result of a render. Returns `false` if the ticket is stale and
    /// the result was dropped.
    pub fn complete_render(
        &mut self,
        ticket: &RenderTicket,
        result: Result<RenderOutcome, PreviewError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::warn!(
                name = %ticket.file.name,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale render"
            );
            return false;
        }

        self.rendering = false;
        match result {
            Ok(outcome) => {
                tracing::info!(
                    name = %ticket.file.name,
                    page_count = outcome.page_count,
                    width = outcome.page.width,
                    height = outcome.page.height,
                    "render complete"
                );
                self.page_count = Some(outcome.page_count);
                self.image = Some(outcome.page);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(name = %ticket.file.name, error = %e, "render failed");
                self.image = None;
                self.page_count = None;
                self.error = Some(e.user_message());
            }
        }
        true
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    // Zoom only means something once there is a page to scale.

    pub fn zoom_in(&mut self) {
        if self.has_image() {
            self.zoom.zoom_in();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.has_image() {
            self.zoom.zoom_out();
        }
    }

    pub fn reset_zoom(&mut self) {
        if self.has_image() {
            self.zoom.reset();
        }
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn can_print(&self) -> bool {
        self.has_image() && !self.rendering
    }

    /// Shown when only the first of several pages will make it onto the letterhead.
    pub fn multi_page_warning(&self) -> Option<String> {
        match self.page_count {
            Some(count) if count > 1 => Some(format!(
                "This PDF has {} pages. Only the first page is placed on the letterhead.",
                count
            )),
            _ => None,
        }
    }

    fn controls(&self) -> Controls {
        let has_image = self.has_image();
        Controls {
            can_zoom_in: has_image && self.zoom.can_zoom_in(),
            can_zoom_out: has_image && self.zoom.can_zoom_out(),
            can_reset_zoom: has_image,
            can_print: self.can_print(),
        }
    }

    pub fn zoom_state(&self) -> ZoomState {
        ZoomState {
            zoom: self.zoom,
            zoom_percent: self.zoom.percent(),
            controls: self.controls(),
        }
    }

    pub fn snapshot(&self) -> PreviewSnapshot {
        PreviewSnapshot {
            file_name: self.file.as_ref().map(|f| f.name.clone()),
            image: self.image.clone(),
            page_count: self.page_count,
            zoom: self.zoom,
            zoom_percent: self.zoom.percent(),
            rendering: self.rendering,
            error: self.error.clone(),
            warning: self.multi_page_warning(),
            controls: self.controls(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_TYPE_MESSAGE;
    use crate::pdf::testing::{FakeEngine, SAMPLE_PDF};
    use crate::pdf::{RasterError, Rasterizer};

    fn pdf(name: &str) -> UploadedFile {
        UploadedFile::new(name, "application/pdf", SAMPLE_PDF.to_vec())
    }

    fn render(engine: FakeEngine, ticket: &RenderTicket) -> Result<RenderOutcome, PreviewError> {
        Rasterizer::new(engine)
            .rasterize(&ticket.file.bytes, 200.0)
            .map_err(PreviewError::from)
    }

    fn upload_and_render(session: &mut PreviewSession, file: UploadedFile, engine: FakeEngine) {
        let ticket = session.begin_upload(file).unwrap();
        let result = render(engine, &ticket);
        assert!(session.complete_render(&ticket, result));
    }

    #[test]
    fn test_non_pdf_never_sets_image() {
        let mut session = PreviewSession::new();
        upload_and_render(&mut session, pdf("first.pdf"), FakeEngine::letter(1));
        assert!(session.has_image());

        let err = session
            .begin_upload(UploadedFile::new("photo.png", "image/png", vec![1, 2, 3]))
            .unwrap_err();
        assert_eq!(err, PreviewError::InvalidType);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.image, None);
        assert_eq!(snapshot.page_count, None);
        assert_eq!(snapshot.file_name, None);
        assert_eq!(snapshot.error.as_deref(), Some(INVALID_TYPE_MESSAGE));
        assert!(!snapshot.rendering);
    }

    #[test]
    fn test_successful_render_sets_image_and_count() {
        let mut session = PreviewSession::new();
        let ticket = session.begin_upload(pdf("memo.pdf")).unwrap();
        assert!(session.snapshot().rendering);
        assert!(!session.can_print());

        let result = render(FakeEngine::letter(1), &ticket);
        session.complete_render(&ticket, result);

        let snapshot = session.snapshot();
        assert!(!snapshot.rendering);
        assert_eq!(snapshot.page_count, Some(1));
        assert_eq!(snapshot.image.as_ref().map(|i| i.width), Some(800));
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.warning, None);
        assert!(snapshot.controls.can_print);
    }

    #[test]
    fn test_failed_render_clears_state_and_sets_message() {
        let mut session = PreviewSession::new();
        let mut engine = FakeEngine::letter(1);
        engine.render_error = Some("bad xref".to_string());

        let ticket = session
            .begin_upload(UploadedFile::new("broken.pdf", "application/pdf", SAMPLE_PDF.to_vec()))
            .unwrap();
        let result = render(engine, &ticket);
        session.complete_render(&ticket, result);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.image, None);
        assert_eq!(snapshot.page_count, None);
        assert!(!snapshot.error.unwrap_or_default().is_empty());
        assert!(!snapshot.controls.can_print);
    }

    #[test]
    fn test_corrupt_bytes_surface_load_error() {
        let mut session = PreviewSession::new();
        let ticket = session
            .begin_upload(UploadedFile::new("junk.pdf", "application/pdf", b"garbage".to_vec()))
            .unwrap();
        let result = render(FakeEngine::letter(1), &ticket);
        session.complete_render(&ticket, result);

        assert_eq!(
            session.snapshot().error,
            Some(RasterError::Load("file is not a PDF".into()).to_string())
        );
    }

    #[test]
    fn test_second_upload_replaces_everything() {
        let mut session = PreviewSession::new();
        upload_and_render(&mut session, pdf("three-pages.pdf"), FakeEngine::letter(3));
        session.zoom_in();
        let first = session.snapshot();
        assert_eq!(first.page_count, Some(3));
        assert!(first.warning.is_some());

        let mut a4 = FakeEngine::letter(1);
        a4.pages[0].width = 595.0;
        a4.pages[0].height = 842.0;
        upload_and_render(&mut session, pdf("single.pdf"), a4);

        let second = session.snapshot();
        assert_eq!(second.file_name.as_deref(), Some("single.pdf"));
        assert_eq!(second.page_count, Some(1));
        assert_eq!(second.warning, None);
        assert_ne!(second.image, first.image);
        assert_eq!(second.zoom.value(), 1.0);
    }

    #[test]
    fn test_stale_render_is_discarded() {
        let mut session = PreviewSession::new();
        let slow = session.begin_upload(pdf("slow.pdf")).unwrap();
        let fast = session.begin_upload(pdf("fast.pdf")).unwrap();

        let fast_result = render(FakeEngine::letter(1), &fast);
        assert!(session.complete_render(&fast, fast_result));
        let after_fast = session.snapshot();

        let slow_result = render(FakeEngine::letter(5), &slow);
        assert!(!session.complete_render(&slow, slow_result));

        assert_eq!(session.snapshot(), after_fast);
        assert_eq!(session.snapshot().file_name.as_deref(), Some("fast.pdf"));
    }

    #[test]
    fn test_invalid_upload_invalidates_in_flight_render() {
        let mut session = PreviewSession::new();
        let ticket = session.begin_upload(pdf("memo.pdf")).unwrap();
        let _ = session.begin_upload(UploadedFile::new("notes.txt", "text/plain", Vec::new()));

        let result = render(FakeEngine::letter(1), &ticket);
        assert!(!session.complete_render(&ticket, result));
        assert!(!session.has_image());
    }

    #[test]
    fn test_zoom_disabled_without_image() {
        let mut session = PreviewSession::new();
        session.zoom_in();
        assert_eq!(session.zoom().value(), 1.0);

        let controls = session.snapshot().controls;
        assert!(!controls.can_zoom_in);
        assert!(!controls.can_zoom_out);
        assert!(!controls.can_reset_zoom);
        assert!(!controls.can_print);
    }

    #[test]
    fn test_zoom_controls_track_bounds() {
        let mut session = PreviewSession::new();
        upload_and_render(&mut session, pdf("memo.pdf"), FakeEngine::letter(1));

        for _ in 0..20 {
            session.zoom_in();
        }
        let snapshot = session.snapshot();
        assert_eq!(snapshot.zoom.value(), 1.8);
        assert_eq!(snapshot.zoom_percent, 180);
        assert!(!snapshot.controls.can_zoom_in);
        assert!(snapshot.controls.can_zoom_out);

        session.reset_zoom();
        assert_eq!(session.zoom().value(), 1.0);
    }

    #[test]
    fn test_new_upload_resets_zoom() {
        let mut session = PreviewSession::new();
        upload_and_render(&mut session, pdf("memo.pdf"), FakeEngine::letter(1));
        session.zoom_out();
        session.begin_upload(pdf("next.pdf")).unwrap();
        assert_eq!(session.zoom().value(), 1.0);
    }

    #[test]
    fn test_snapshot_uses_camel_case() {
        let json = serde_json::to_value(PreviewSession::new().snapshot()).unwrap();
        assert_eq!(json["zoomPercent"], 100);
        assert_eq!(json["controls"]["canPrint"], false);
        assert!(json["image"].is_null());
    }

    #[test]
    fn test_zoom_state_never_carries_the_image() {
        let mut session = PreviewSession::new();
        upload_and_render(&mut session, pdf("memo.pdf"), FakeEngine::letter(1));
        session.zoom_in();

        let state = session.zoom_state();
        assert_eq!(state.zoom_percent, 110);
        assert!(state.controls.can_print);

        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("dataUrl"));
        assert!(!json.contains("image"));
        assert!(json.contains("\"zoomPercent\":110"));
    }

    #[test]
    fn test_unreadable_file_is_recorded_in_session() {
        let mut session = PreviewSession::new();
        upload_and_render(&mut session, pdf("memo.pdf"), FakeEngine::letter(2));
        let in_flight = session.begin_upload(pdf("next.pdf")).unwrap();

        let err = PreviewError::Io("No such file or directory".into());
        session.fail_intake("gone.pdf", &err);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.image, None);
        assert_eq!(snapshot.page_count, None);
        assert_eq!(snapshot.file_name, None);
        assert!(!snapshot.rendering);
        assert_eq!(snapshot.error, Some(err.user_message()));

        let result = render(FakeEngine::letter(1), &in_flight);
        assert!(!session.complete_render(&in_flight, result));
        assert_eq!(session.snapshot().error, Some(err.user_message()));
    }
}
