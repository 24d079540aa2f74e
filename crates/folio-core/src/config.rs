//! Board configuration.

use serde::{Deserialize, Serialize};

/// Default grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Lowest allowed zoom level.
pub const ZOOM_MIN: f64 = 0.1;
/// Highest allowed zoom level.
pub const ZOOM_MAX: f64 = 5.0;
/// Increment applied by a single zoom in/out step.
pub const ZOOM_STEP: f64 = 0.1;

/// Maximum number of history entries to keep.
pub const MAX_HISTORY: usize = 100;

/// Tunables for a [`Board`](crate::Board) and its interaction handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Grid spacing used by every position-snapping computation.
    pub grid_size: f64,
    /// Whether pointer positions snap to the grid.
    pub snap_to_grid: bool,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    /// Maximum number of undoable entries; the oldest are evicted first.
    pub history_limit: usize,
    /// Offset applied to pasted and duplicated elements.
    pub paste_offset: f64,
    /// Distance moved by a single arrow-key nudge.
    pub nudge_step: f64,
    /// Size of resize handles in screen pixels.
    pub handle_size: f64,
    /// Pointer hit tolerance in screen pixels.
    pub hit_tolerance: f64,
    /// Smallest width/height a resize gesture may produce.
    pub min_element_size: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_to_grid: false,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_step: ZOOM_STEP,
            history_limit: MAX_HISTORY,
            paste_offset: 10.0,
            nudge_step: 1.0,
            handle_size: 8.0,
            hit_tolerance: 4.0,
            min_element_size: 1.0,
        }
    }
}

impl BoardConfig {
    /// Grid size to snap with, or `None` when snapping is disabled.
    pub fn active_grid(&self) -> Option<f64> {
        (self.snap_to_grid && self.grid_size > 0.0).then_some(self.grid_size)
    }

    /// Zoom range as `(min, max)`.
    ///
    /// Swapped bounds are put in order; non-positive or non-finite bounds
    /// fall back to the defaults.
    pub fn zoom_bounds(&self) -> (f64, f64) {
        let (min, max) = (self.zoom_min, self.zoom_max);
        let valid = |z: f64| z.is_finite() && z > 0.0;
        if !valid(min) || !valid(max) {
            log::warn!("Invalid zoom bounds {min}..{max}; using {ZOOM_MIN}..{ZOOM_MAX}");
            (ZOOM_MIN, ZOOM_MAX)
        } else if min > max {
            log::warn!("Zoom bounds {min}..{max} are reversed");
            (max, min)
        } else {
            (min, max)
        }
    }
}
