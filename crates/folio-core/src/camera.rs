//! Viewport pan/zoom state.

use crate::config::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// The board viewport.
///
/// Canvas coordinates map to screen coordinates as
/// `screen = canvas * zoom + translate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset in screen pixels.
    pub translate: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Increment for `zoom_in`/`zoom_out`.
    pub zoom_step: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: ZOOM_MIN,
            max_zoom: ZOOM_MAX,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom bounds.
    pub fn with_bounds(min_zoom: f64, max_zoom: f64, zoom_step: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            zoom_step,
            ..Self::default()
        }
    }

    /// Canvas-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.zoom)
    }

    /// Screen-to-canvas transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.translate)
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Set the zoom level, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.zoom_step);
    }

    /// Change the zoom level while keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, zoom: f64) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let canvas_point = self.screen_to_canvas(screen_point);
        self.zoom = new_zoom;

        // Shift the pan so canvas_point lands back under screen_point
        let moved = self.canvas_to_screen(canvas_point);
        self.translate += Vec2::new(screen_point.x - moved.x, screen_point.y - moved.y);
    }

    /// Reset to 100% with no pan.
    pub fn reset(&mut self) {
        self.translate = Vec2::ZERO;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.translate, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_translate() {
        let mut camera = Camera::new();
        camera.translate = Vec2::new(50.0, 100.0);
        let canvas = camera.screen_to_canvas(Point::new(100.0, 200.0));
        assert!((canvas.x - 50.0).abs() < f64::EPSILON);
        assert!((canvas.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_zoom() {
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        let canvas = camera.screen_to_canvas(Point::new(100.0, 200.0));
        assert!((canvas.x - 50.0).abs() < f64::EPSILON);
        assert!((canvas.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_steps_are_clamped() {
        let mut camera = Camera::with_bounds(0.5, 1.2, 0.5);
        camera.zoom_in();
        assert!((camera.zoom - 1.2).abs() < f64::EPSILON);
        camera.zoom_out();
        camera.zoom_out();
        assert!((camera.zoom - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut camera = Camera::new();
        camera.translate = Vec2::new(30.0, -20.0);
        let anchor = Point::new(200.0, 150.0);
        let before = camera.screen_to_canvas(anchor);
        camera.zoom_at(anchor, 2.5);
        let after = camera.screen_to_canvas(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }
}
