//! Camera over the canvas.
//!
//! Handles conversions between graph coordinates and screen coordinates,
//! accounting for pan and zoom, and framing content with [`Viewport::fit_view`].

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 2.0;

/// How [`Viewport::fit_view`] frames the content.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitViewOptions {
    /// Fraction of the canvas left empty on each side.
    pub padding: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for FitViewOptions {
    fn default() -> Self {
        Self {
            padding: 0.1,
            min_zoom: MIN_ZOOM,
            max_zoom: 1.0,
        }
    }
}

impl FitViewOptions {
    /// Zoom bounds ordered and kept inside `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_range(&self) -> (f32, f32) {
        let lo = self.min_zoom.min(self.max_zoom).max(MIN_ZOOM).min(MAX_ZOOM);
        let hi = self.min_zoom.max(self.max_zoom).min(MAX_ZOOM).max(lo);
        (lo, hi)
    }

    pub fn has_valid_zoom_range(&self) -> bool {
        self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Convert graph coordinates to screen coordinates.
    ///
    /// `canvas_offset` is the top-left corner of the canvas in screen space.
    pub fn to_screen(&self, pos: Pos2, canvas_offset: Pos2) -> Pos2 {
        canvas_offset + self.pan + pos.to_vec2() * self.zoom
    }

    /// Convert screen coordinates to graph coordinates.
    pub fn from_screen(&self, screen_pos: Pos2, canvas_offset: Pos2) -> Pos2 {
        ((screen_pos - canvas_offset - self.pan) / self.zoom).to_pos2()
    }

    pub fn rect_to_screen(&self, rect: Rect, canvas_offset: Pos2) -> Rect {
        Rect::from_min_max(
            self.to_screen(rect.min, canvas_offset),
            self.to_screen(rect.max, canvas_offset),
        )
    }

    /// Zoom by `factor`, keeping the canvas-relative point `anchor` stationary.
    pub fn zoom_about(&mut self, anchor: Vec2, factor: f32) {
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = new_zoom / old_zoom;
        self.pan = anchor - (anchor - self.pan) * ratio;
        self.zoom = new_zoom;
    }

    /// Center `bounds` (graph space) in a canvas of `canvas_size`, zooming so it fits.
    pub fn fit_view(&mut self, bounds: Rect, canvas_size: Vec2, options: &FitViewOptions) {
        let content_w = bounds.width().max(1.0);
        let content_h = bounds.height().max(1.0);
        let padding = options.padding.clamp(0.0, 0.45);
        let avail = canvas_size * (1.0 - padding * 2.0);
        let (min_zoom, max_zoom) = options.zoom_range();
        let zoom = (avail.x / content_w).min(avail.y / content_h).clamp(min_zoom, max_zoom);
        self.zoom = zoom;
        self.pan = canvas_size * 0.5 - bounds.center().to_vec2() * zoom;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_conversion_inverts() {
        let viewport = Viewport {
            pan: Vec2::new(30.0, -12.0),
            zoom: 0.5,
        };
        let offset = Pos2::new(100.0, 40.0);
        let graph_pos = Pos2::new(250.0, 80.0);

        let screen = viewport.to_screen(graph_pos, offset);
        assert_eq!(screen, Pos2::new(255.0, 68.0));
        assert_eq!(viewport.from_screen(screen, offset), graph_pos);
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut viewport = Viewport::default();
        let anchor = Vec2::new(200.0, 100.0);
        let before = viewport.from_screen(anchor.to_pos2(), Pos2::ZERO);

        viewport.zoom_about(anchor, 1.25);

        let after = viewport.from_screen(anchor.to_pos2(), Pos2::ZERO);
        assert!((before - after).length() < 1e-3);
        assert_eq!(viewport.zoom, 1.25);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut viewport = Viewport::default();
        viewport.zoom_about(Vec2::ZERO, 100.0);
        assert_eq!(viewport.zoom, MAX_ZOOM);
        viewport.zoom_about(Vec2::ZERO, 0.0001);
        assert_eq!(viewport.zoom, MIN_ZOOM);
    }

    #[test]
    fn fit_view_centers_content() {
        let mut viewport = Viewport::default();
        let bounds = Rect::from_min_size(Pos2::new(1000.0, 1000.0), Vec2::new(400.0, 200.0));
        let canvas = Vec2::new(1000.0, 500.0);

        viewport.fit_view(bounds, canvas, &FitViewOptions::default());

        assert_eq!(viewport.zoom, 1.0);
        let center = viewport.to_screen(bounds.center(), Pos2::ZERO);
        assert!((center.to_vec2() - canvas * 0.5).length() < 1e-3);
    }

    #[test]
    fn fit_view_zooms_out_for_large_content() {
        let mut viewport = Viewport::default();
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(4000.0, 1000.0));

        viewport.fit_view(bounds, Vec2::new(1000.0, 1000.0), &FitViewOptions::default());

        assert!((viewport.zoom - 0.2).abs() < 1e-6);
    }

    #[test]
    fn inverted_zoom_range_is_reordered() {
        let options = FitViewOptions {
            padding: 0.1,
            min_zoom: 2.0,
            max_zoom: 0.5,
        };
        assert_eq!(options.zoom_range(), (0.5, 2.0));
        assert!(!options.has_valid_zoom_range());

        let mut viewport = Viewport::default();
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(4000.0, 1000.0));
        viewport.fit_view(bounds, Vec2::new(1000.0, 1000.0), &options);

        assert_eq!(viewport.zoom, 0.5);
    }

    #[test]
    fn zoom_range_stays_positive() {
        let options = FitViewOptions {
            padding: 0.1,
            min_zoom: -1.0,
            max_zoom: 0.0,
        };
        assert_eq!(options.zoom_range(), (MIN_ZOOM, MIN_ZOOM));
        assert!(!options.has_valid_zoom_range());
        assert!(FitViewOptions::default().has_valid_zoom_range());
    }
}
