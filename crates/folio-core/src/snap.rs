//! Grid snapping.

use kurbo::Point;

/// Snap a single coordinate to the nearest grid line.
///
/// `round(v / grid) * grid`; with no grid the value passes through.
pub fn snap_value(value: f64, grid: Option<f64>) -> f64 {
    match grid {
        Some(size) if size > 0.0 => (value / size).round() * size,
        _ => value,
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid: Option<f64>) -> Point {
    Point::new(snap_value(point.x, grid), snap_value(point.y, grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let p = snap_to_grid(Point::new(23.0, 38.0), Some(20.0));
        assert!((p.x - 20.0).abs() < f64::EPSILON);
        assert!((p.y - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_grid_passthrough() {
        let p = snap_to_grid(Point::new(23.5, -7.25), None);
        assert!((p.x - 23.5).abs() < f64::EPSILON);
        assert!((p.y + 7.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_values() {
        assert!((snap_value(-31.0, Some(20.0)) + 40.0).abs() < f64::EPSILON);
        assert!((snap_value(-29.0, Some(20.0)) + 20.0).abs() < f64::EPSILON);
    }
}
