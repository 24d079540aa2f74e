//! Per-kind element behavior.
//!
//! Each [`ElementKind`] maps to one unit struct implementing
//! [`ElementBehavior`]; [`ElementKind::behavior`] is an exhaustive match, so
//! adding a kind without a behavior does not compile.

use super::{Element, ElementKind, ElementPatch, FieldValue, StyleDefaults, measure_text};
use kurbo::{Point, Vec2};

/// Which manipulation handles an element exposes once selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSet {
    /// Four corners and four edge midpoints.
    Box,
    /// Start and end points of a line.
    Endpoints,
    None,
}

/// Geometry rules for one element kind.
pub trait ElementBehavior: Sync {
    /// Style values taken from the current defaults for a new element.
    fn initialize(&self, defaults: &StyleDefaults) -> ElementPatch;

    /// Place a new element at the pointer-down position with zero size.
    fn on_create_start(&self, element: &mut Element, point: Point) {
        element.set_box(point.x, point.y, point.x, point.y);
    }

    /// Track the pointer while the element is being drawn.
    fn on_create_move(&self, element: &mut Element, point: Point) {
        element.x2 = point.x;
        element.y2 = point.y;
    }

    /// Settle the geometry once the creating gesture ends.
    fn on_create_end(&self, element: &mut Element) {
        element.normalize();
    }

    /// Move an element to `snapshot + delta`.
    fn on_drag(&self, element: &mut Element, snapshot: &Element, delta: Vec2) {
        element.set_box(
            snapshot.x1 + delta.x,
            snapshot.y1 + delta.y,
            snapshot.x2 + delta.x,
            snapshot.y2 + delta.y,
        );
    }

    fn handles(&self) -> HandleSet {
        HandleSet::Box
    }

    /// Whether pointer positions snap to the grid while creating.
    fn snaps_to_grid(&self) -> bool {
        true
    }
}

impl ElementKind {
    pub fn behavior(self) -> &'static dyn ElementBehavior {
        match self {
            ElementKind::Rectangle => &RectangleBehavior,
            ElementKind::Ellipse => &EllipseBehavior,
            ElementKind::Line => &LineBehavior,
            ElementKind::Arrow => &ArrowBehavior,
            ElementKind::Text => &TextBehavior,
            ElementKind::Draw => &DrawBehavior,
            ElementKind::Image => &ImageBehavior,
        }
    }
}

fn stroke(defaults: &StyleDefaults) -> [FieldValue; 4] {
    [
        FieldValue::StrokeColor(defaults.stroke_color),
        FieldValue::StrokeWidth(defaults.stroke_width),
        FieldValue::StrokeStyle(defaults.stroke_style),
        FieldValue::StrokeOpacity(defaults.stroke_opacity),
    ]
}

fn fill(defaults: &StyleDefaults) -> [FieldValue; 2] {
    [
        FieldValue::FillColor(defaults.fill_color),
        FieldValue::FillOpacity(defaults.fill_opacity),
    ]
}

struct RectangleBehavior;

impl ElementBehavior for RectangleBehavior {
    fn initialize(&self, defaults: &StyleDefaults) -> ElementPatch {
        stroke(defaults)
            .into_iter()
            .chain(fill(defaults))
            .chain([FieldValue::ShapeVariant(defaults.shape_variant)])
            .collect()
    }
}

struct EllipseBehavior;

impl ElementBehavior for EllipseBehavior {
    fn initialize(&self, defaults: &StyleDefaults) -> ElementPatch {
        stroke(defaults).into_iter().chain(fill(defaults)).collect()
    }
}

struct LineBehavior;

impl ElementBehavior for LineBehavior {
    fn initialize(&self, defaults: &StyleDefaults) -> ElementPatch {
        stroke(defaults).into_iter().collect()
    }

    // Endpoint order is meaningful for lines.
    fn on_create_end(&self, _element: &mut Element) {}

    fn handles(&self) -> HandleSet {
        HandleSet::Endpoints
    }
}

struct ArrowBehavior;

impl ElementBehavior for ArrowBehavior {
    fn initialize(&self, defaults: &StyleDefaults) -> ElementPatch {
        stroke(defaults)
            .into_iter()
            .chain([
                FieldValue::ArrowheadStart(defaults.arrowhead_start),
                FieldValue::ArrowheadEnd(defaults.arrowhead_end),
            ])
            .collect()
    }

    fn on_create_end(&self, _element: &mut Element) {}

    fn handles(&self) -> HandleSet {
        HandleSet::Endpoints
    }
}

pub(crate) struct TextBehavior;

impl TextBehavior {
    /// Resize the element's box to its measured content, anchored at `(x1, y1)`.
    pub(crate) fn fit(element: &mut Element) {
        let (width, height) = measure_text(&element.text, element.text_size, element.text_font);
        element.x2 = element.x1 + width;
        element.y2 = element.y1 + height;
    }
}

impl ElementBehavior for TextBehavior {
    fn initialize(&self, defaults: &StyleDefaults) -> ElementPatch {
        ElementPatch::from_iter([
            FieldValue::TextColor(defaults.text_color),
            FieldValue::TextFont(defaults.text_font),
            FieldValue::TextSize(defaults.text_size),
            FieldValue::TextAlign(defaults.text_align),
        ])
    }

    fn on_create_start(&self, element: &mut Element, point: Point) {
        element.set_box(point.x, point.y, point.x, point.y);
        Self::fit(element);
    }

    // Text is placed by a click; its size follows the content.
    fn on_create_move(&self, _element: &mut Element, _point: Point) {}

    fn on_create_end(&self, element: &mut Element) {
        Self::fit(element);
    }

    fn handles(&self) -> HandleSet {
        HandleSet::None
    }
}

struct DrawBehavior;

impl DrawBehavior {
    /// Shift points so the box starts at their minimum and record the extent.
    fn normalize_points(element: &mut Element) {
        let Some(&[first_x, first_y]) = element.points.first() else {
            return;
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first_x, first_y, first_x, first_y);
        for &[x, y] in &element.points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        for point in &mut element.points {
            point[0] -= min_x;
            point[1] -= min_y;
        }
        element.x1 += min_x;
        element.y1 += min_y;
        element.draw_width = max_x - min_x;
        element.draw_height = max_y - min_y;
        element.x2 = element.x1 + element.draw_width;
        element.y2 = element.y1 + element.draw_height;
    }
}

impl ElementBehavior for DrawBehavior {
    fn initialize(&self, defaults: &StyleDefaults) -> ElementPatch {
        ElementPatch::from_iter([
            FieldValue::StrokeColor(defaults.stroke_color),
            FieldValue::StrokeWidth(defaults.stroke_width),
            FieldValue::StrokeOpacity(defaults.stroke_opacity),
        ])
    }

    fn on_create_start(&self, element: &mut Element, point: Point) {
        element.set_box(point.x, point.y, point.x, point.y);
        element.points = vec![[0.0, 0.0]];
        element.draw_width = 0.0;
        element.draw_height = 0.0;
    }

    fn on_create_move(&self, element: &mut Element, point: Point) {
        // Points are unscaled while drawing, so they stay relative to (x1, y1).
        element.points.push([point.x - element.x1, point.y - element.y1]);
        Self::normalize_points(element);
    }

    fn on_create_end(&self, element: &mut Element) {
        Self::normalize_points(element);
    }

    fn snaps_to_grid(&self) -> bool {
        false
    }
}

struct ImageBehavior;

impl ElementBehavior for ImageBehavior {
    fn initialize(&self, _defaults: &StyleDefaults) -> ElementPatch {
        ElementPatch::from_iter([FieldValue::StrokeWidth(0.0)])
    }
}
