//! Resize handles and the resize contract.

use crate::element::{Element, HandleSet};
use crate::snap::snap_value;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Line endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

/// Type of resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
    Endpoint(Endpoint),
}

impl HandleKind {
    /// Which box sides this handle moves as `(left, top, right, bottom)`.
    fn moves(self) -> (bool, bool, bool, bool) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (true, true, false, false),
            HandleKind::Corner(Corner::TopRight) => (false, true, true, false),
            HandleKind::Corner(Corner::BottomLeft) => (true, false, false, true),
            HandleKind::Corner(Corner::BottomRight) => (false, false, true, true),
            HandleKind::Edge(Edge::Top) => (false, true, false, false),
            HandleKind::Edge(Edge::Right) => (false, false, true, false),
            HandleKind::Edge(Edge::Bottom) => (false, false, false, true),
            HandleKind::Edge(Edge::Left) => (true, false, false, false),
            HandleKind::Endpoint(_) => (false, false, false, false),
        }
    }
}

/// A resize handle with its canvas position.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a canvas point hits this handle.
    /// `tolerance` should already be divided by the zoom level.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Get the resize handles of an element.
pub fn get_handles(element: &Element) -> Vec<Handle> {
    match element.behavior().handles() {
        HandleSet::Endpoints => vec![
            Handle::new(element.start(), HandleKind::Endpoint(Endpoint::Start)),
            Handle::new(element.end(), HandleKind::Endpoint(Endpoint::End)),
        ],
        HandleSet::Box => {
            let b = element.bounds();
            let mid_x = (b.x0 + b.x1) / 2.0;
            let mid_y = (b.y0 + b.y1) / 2.0;
            // Bottom and right first: where handles coincide on a collapsed
            // box, the earlier one wins and the box grows like a new one.
            vec![
                Handle::new(Point::new(b.x1, b.y1), HandleKind::Corner(Corner::BottomRight)),
                Handle::new(Point::new(b.x1, mid_y), HandleKind::Edge(Edge::Right)),
                Handle::new(Point::new(mid_x, b.y1), HandleKind::Edge(Edge::Bottom)),
                Handle::new(Point::new(b.x1, b.y0), HandleKind::Corner(Corner::TopRight)),
                Handle::new(Point::new(b.x0, b.y1), HandleKind::Corner(Corner::BottomLeft)),
                Handle::new(Point::new(mid_x, b.y0), HandleKind::Edge(Edge::Top)),
                Handle::new(Point::new(b.x0, mid_y), HandleKind::Edge(Edge::Left)),
                Handle::new(Point::new(b.x0, b.y0), HandleKind::Corner(Corner::TopLeft)),
            ]
        }
        HandleSet::None => Vec::new(),
    }
}

/// Find the handle closest to `point` within `tolerance`.
///
/// On small elements handles overlap; the nearest one wins, ties going to
/// the earlier handle.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    let mut best: Option<(f64, HandleKind)> = None;
    for handle in get_handles(element) {
        if !handle.hit_test(point, tolerance) {
            continue;
        }
        let dist = (point - handle.position).hypot2();
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, handle.kind));
        }
    }
    best.map(|(_, kind)| kind)
}

/// Resize `element` from its pre-gesture `snapshot` by dragging `handle`
/// by `delta`.
///
/// Box handles work on the normalized snapshot; a moving edge is clamped to
/// `opposite ± min_size`, so the box never inverts mid-gesture. Endpoint
/// handles move one end of a line freely. Moved coordinates are snapped to
/// `grid` when it is set.
pub fn resize(
    element: &mut Element,
    snapshot: &Element,
    handle: HandleKind,
    delta: Vec2,
    min_size: f64,
    grid: Option<f64>,
) {
    if let HandleKind::Endpoint(endpoint) = handle {
        let (x, y) = match endpoint {
            Endpoint::Start => (snapshot.x1, snapshot.y1),
            Endpoint::End => (snapshot.x2, snapshot.y2),
        };
        let x = snap_value(x + delta.x, grid);
        let y = snap_value(y + delta.y, grid);
        element.set_box(snapshot.x1, snapshot.y1, snapshot.x2, snapshot.y2);
        match endpoint {
            Endpoint::Start => {
                element.x1 = x;
                element.y1 = y;
            }
            Endpoint::End => {
                element.x2 = x;
                element.y2 = y;
            }
        }
        return;
    }

    let b = snapshot.bounds();
    let (left, top, right, bottom) = handle.moves();
    let mut x0 = b.x0;
    let mut y0 = b.y0;
    let mut x1 = b.x1;
    let mut y1 = b.y1;

    if left {
        x0 = snap_value(b.x0 + delta.x, grid).min(x1 - min_size);
    }
    if right {
        x1 = snap_value(b.x1 + delta.x, grid).max(x0 + min_size);
    }
    if top {
        y0 = snap_value(b.y0 + delta.y, grid).min(y1 - min_size);
    }
    if bottom {
        y1 = snap_value(b.y1 + delta.y, grid).max(y0 + min_size);
    }

    element.set_box(x0, y0, x1, y1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn square() -> Element {
        Element::new(ElementKind::Rectangle).with_box(0.0, 0.0, 50.0, 50.0)
    }

    #[test]
    fn test_box_has_eight_handles() {
        assert_eq!(get_handles(&square()).len(), 8);
        let line = Element::new(ElementKind::Line).with_box(0.0, 0.0, 10.0, 10.0);
        assert_eq!(get_handles(&line).len(), 2);
        assert!(get_handles(&Element::new(ElementKind::Text)).is_empty());
    }

    #[test]
    fn test_hit_test_handles() {
        let element = square();
        assert_eq!(
            hit_test_handles(&element, Point::new(49.0, 51.0), 4.0),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(
            hit_test_handles(&element, Point::new(25.0, -2.0), 4.0),
            Some(HandleKind::Edge(Edge::Top))
        );
        assert_eq!(hit_test_handles(&element, Point::new(25.0, 25.0), 4.0), None);
    }

    #[test]
    fn test_nearest_handle_wins() {
        let tiny = Element::new(ElementKind::Rectangle).with_box(0.0, 0.0, 4.0, 4.0);
        assert_eq!(
            hit_test_handles(&tiny, Point::new(4.0, 4.5), 8.0),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
    }

    #[test]
    fn test_collapsed_box_grabs_bottom_right() {
        let point = Element::new(ElementKind::Rectangle).with_box(10.0, 10.0, 10.0, 10.0);
        assert_eq!(
            hit_test_handles(&point, Point::new(10.0, 10.0), 4.0),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        let flat = Element::new(ElementKind::Rectangle).with_box(0.0, 10.0, 40.0, 10.0);
        assert_eq!(
            hit_test_handles(&flat, Point::new(0.0, 10.0), 4.0),
            Some(HandleKind::Corner(Corner::BottomLeft))
        );
    }

    #[test]
    fn test_resize_clamps_to_min_size() {
        let snapshot = square();
        let mut element = snapshot.clone();
        resize(
            &mut element,
            &snapshot,
            HandleKind::Corner(Corner::TopLeft),
            Vec2::new(80.0, 80.0),
            1.0,
            None,
        );
        assert!((element.x1 - 49.0).abs() < f64::EPSILON);
        assert!((element.y1 - 49.0).abs() < f64::EPSILON);
        assert!(element.x1 < element.x2);
        assert!(element.y1 < element.y2);
    }

    #[test]
    fn test_edge_resize_moves_one_side() {
        let snapshot = square();
        let mut element = snapshot.clone();
        resize(
            &mut element,
            &snapshot,
            HandleKind::Edge(Edge::Right),
            Vec2::new(13.0, 40.0),
            1.0,
            Some(20.0),
        );
        assert!((element.x2 - 60.0).abs() < f64::EPSILON);
        assert!((element.y1 - 0.0).abs() < f64::EPSILON);
        assert!((element.y2 - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_endpoint_resize() {
        let snapshot = Element::new(ElementKind::Arrow).with_box(0.0, 0.0, 10.0, 10.0);
        let mut element = snapshot.clone();
        resize(
            &mut element,
            &snapshot,
            HandleKind::Endpoint(Endpoint::Start),
            Vec2::new(30.0, 5.0),
            1.0,
            None,
        );
        assert!((element.x1 - 30.0).abs() < f64::EPSILON);
        assert!((element.y1 - 5.0).abs() < f64::EPSILON);
        assert!((element.x2 - 10.0).abs() < f64::EPSILON);
    }
}
