//! Element definitions for the board.

mod behavior;
mod patch;
mod style;
mod text;

pub(crate) use behavior::TextBehavior;
pub use behavior::{ElementBehavior, HandleSet};
pub use patch::{ElementPatch, Field, FieldValue};
pub use style::{
    Arrowhead, Color, FontFamily, ParseColorError, ShapeVariant, StrokeStyle, StyleDefaults,
    TextAlign,
};
pub use text::{LINE_HEIGHT, measure_text};

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Identifier shared by the members of an element group.
pub type GroupId = Uuid;

/// Element type tag; selects the behavior strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Text,
    Draw,
    Image,
}

impl ElementKind {
    /// Whether elements of this kind are drawn by a pointer gesture.
    pub fn is_creatable(self) -> bool {
        !matches!(self, ElementKind::Image)
    }

    /// Line-like kinds keep their endpoint order instead of a normalized box.
    pub fn is_linear(self) -> bool {
        matches!(self, ElementKind::Line | ElementKind::Arrow)
    }
}

fn one() -> f64 {
    1.0
}

/// The atomic drawable unit.
///
/// Geometry is the two corners `(x1, y1)` and `(x2, y2)`; they are not
/// normalized, so `x1` may exceed `x2` while a gesture is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub(crate) id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Freehand points, relative to `(x1, y1)`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<[f64; 2]>,
    /// Extent the freehand points were recorded at; renderers scale from it.
    #[serde(default)]
    pub draw_width: f64,
    #[serde(default)]
    pub draw_height: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default)]
    pub fill_color: Option<Color>,
    #[serde(default = "one")]
    pub fill_opacity: f64,
    #[serde(default = "Color::black")]
    pub stroke_color: Color,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    #[serde(default = "one")]
    pub stroke_opacity: f64,
    #[serde(default = "Color::black")]
    pub text_color: Color,
    #[serde(default)]
    pub text_font: FontFamily,
    #[serde(default)]
    pub text_size: f64,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub arrowhead_start: Arrowhead,
    #[serde(default)]
    pub arrowhead_end: Arrowhead,
    #[serde(default)]
    pub shape_variant: ShapeVariant,
    /// Back-reference into the board's asset table (images).
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub selected: bool,
    /// Text input is active for this element.
    #[serde(default)]
    pub editing: bool,
    /// Locked elements are immune to selection and mutation.
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub group: Option<GroupId>,
}

impl Element {
    /// Create an element with a fresh id and zeroed geometry.
    pub fn new(kind: ElementKind) -> Self {
        Self::with_id(Uuid::new_v4(), kind)
    }

    /// Create an element with a specific id (for storage and tests).
    pub fn with_id(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            points: Vec::new(),
            draw_width: 0.0,
            draw_height: 0.0,
            text: String::new(),
            fill_color: None,
            fill_opacity: 1.0,
            stroke_color: Color::black(),
            stroke_width: 0.0,
            stroke_style: StrokeStyle::default(),
            stroke_opacity: 1.0,
            text_color: Color::black(),
            text_font: FontFamily::default(),
            text_size: 0.0,
            text_align: TextAlign::default(),
            arrowhead_start: Arrowhead::None,
            arrowhead_end: Arrowhead::None,
            shape_variant: ShapeVariant::default(),
            asset_id: None,
            selected: false,
            editing: false,
            locked: false,
            group: None,
        }
    }

    /// Create an element with the default style of its kind applied.
    pub fn create(kind: ElementKind, defaults: &StyleDefaults) -> Self {
        let mut element = Self::new(kind);
        kind.behavior().initialize(defaults).apply_to(&mut element);
        element
    }

    /// Builder-style geometry setter.
    pub fn with_box(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.set_box(x1, y1, x2, y2);
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Assign a fresh id (paste/duplicate).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub fn behavior(&self) -> &'static dyn ElementBehavior {
        self.kind.behavior()
    }

    pub fn set_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
    }

    /// Normalized axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.x2, self.y2).abs()
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Swap corners so that `x1 <= x2` and `y1 <= y2`.
    pub fn normalize(&mut self) {
        let bounds = self.bounds();
        self.set_box(bounds.x0, bounds.y0, bounds.x1, bounds.y1);
    }

    /// Move all four coordinates by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.x1 += delta.x;
        self.y1 += delta.y;
        self.x2 += delta.x;
        self.y2 += delta.y;
    }

    /// Check whether a canvas point hits this element.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let tolerance = tolerance + self.stroke_width / 2.0;
        match self.kind {
            ElementKind::Line | ElementKind::Arrow => {
                point_to_segment_dist(point, self.start(), self.end()) <= tolerance
            }
            ElementKind::Draw if self.points.len() > 1 => {
                let origin = self.start();
                let sx = scale_factor(self.x2 - self.x1, self.draw_width);
                let sy = scale_factor(self.y2 - self.y1, self.draw_height);
                let points: Vec<Point> = self
                    .points
                    .iter()
                    .map(|[x, y]| Point::new(origin.x + x * sx, origin.y + y * sy))
                    .collect();
                point_to_polyline_dist(point, &points) <= tolerance
            }
            _ => self.bounds().inflate(tolerance, tolerance).contains(point),
        }
    }

    /// Inclusive bounding-box intersection test against a region.
    ///
    /// Touching edges count, so a zero-size region selects what it lies on.
    pub fn intersects(&self, region: Rect) -> bool {
        let bounds = self.bounds();
        let region = region.abs();
        bounds.x0 <= region.x1
            && region.x0 <= bounds.x1
            && bounds.y0 <= region.y1
            && region.y0 <= bounds.y1
    }
}

fn scale_factor(extent: f64, recorded: f64) -> f64 {
    if recorded.abs() < f64::EPSILON {
        1.0
    } else {
        extent / recorded
    }
}

/// Distance from a point to a line segment (a to b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}
