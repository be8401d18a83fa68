//! Preview zoom. The level only drives a CSS scale on the rendered bitmap;
//! changing it never re-renders the page.

use serde::Serialize;

/// Bounded zoom factor for the preview pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ZoomLevel(f64);

impl ZoomLevel {
    pub const MIN: f64 = 0.8;
    pub const MAX: f64 = 1.8;
    pub const STEP: f64 = 0.1;
    pub const DEFAULT: f64 = 1.0;

    pub fn value(self) -> f64 {
        self.0
    }

    /// Integer percentage for the zoom label.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    pub fn can_zoom_in(self) -> bool {
        self.0 < Self::MAX
    }

    pub fn can_zoom_out(self) -> bool {
        self.0 > Self::MIN
    }

    pub fn zoom_in(&mut self) {
        self.0 = round2(self.0 + Self::STEP).min(Self::MAX);
    }

    pub fn zoom_out(&mut self) {
        self.0 = round2(self.0 - Self::STEP).max(Self::MIN);
    }

    pub fn reset(&mut self) {
        self.0 = Self::DEFAULT;
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

// Repeated 0.1 steps drift (1.0 + 0.1 + 0.1 = 1.2000000000000002).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
