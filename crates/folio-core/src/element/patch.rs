//! Typed partial element snapshots.
//!
//! History entries store the fields a mutation touched as a list of
//! [`FieldValue`]s, one variant per mutable element field, so applying an
//! update or its inverse is an exhaustive match instead of a loose merge.

use super::{Arrowhead, Color, Element, FontFamily, GroupId, ShapeVariant, StrokeStyle, TextAlign};
use serde::{Deserialize, Serialize};

/// Name of a mutable element field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    X1,
    Y1,
    X2,
    Y2,
    Points,
    DrawWidth,
    DrawHeight,
    Text,
    FillColor,
    FillOpacity,
    StrokeColor,
    StrokeWidth,
    StrokeStyle,
    StrokeOpacity,
    TextColor,
    TextFont,
    TextSize,
    TextAlign,
    ArrowheadStart,
    ArrowheadEnd,
    ShapeVariant,
    AssetId,
    Locked,
    Group,
}

impl Field {
    /// The four box coordinates.
    pub const GEOMETRY: [Field; 4] = [Field::X1, Field::Y1, Field::X2, Field::Y2];

    /// Read the current value of this field from an element.
    pub fn read(self, element: &Element) -> FieldValue {
        match self {
            Field::X1 => FieldValue::X1(element.x1),
            Field::Y1 => FieldValue::Y1(element.y1),
            Field::X2 => FieldValue::X2(element.x2),
            Field::Y2 => FieldValue::Y2(element.y2),
            Field::Points => FieldValue::Points(element.points.clone()),
            Field::DrawWidth => FieldValue::DrawWidth(element.draw_width),
            Field::DrawHeight => FieldValue::DrawHeight(element.draw_height),
            Field::Text => FieldValue::Text(element.text.clone()),
            Field::FillColor => FieldValue::FillColor(element.fill_color),
            Field::FillOpacity => FieldValue::FillOpacity(element.fill_opacity),
            Field::StrokeColor => FieldValue::StrokeColor(element.stroke_color),
            Field::StrokeWidth => FieldValue::StrokeWidth(element.stroke_width),
            Field::StrokeStyle => FieldValue::StrokeStyle(element.stroke_style),
            Field::StrokeOpacity => FieldValue::StrokeOpacity(element.stroke_opacity),
            Field::TextColor => FieldValue::TextColor(element.text_color),
            Field::TextFont => FieldValue::TextFont(element.text_font),
            Field::TextSize => FieldValue::TextSize(element.text_size),
            Field::TextAlign => FieldValue::TextAlign(element.text_align),
            Field::ArrowheadStart => FieldValue::ArrowheadStart(element.arrowhead_start),
            Field::ArrowheadEnd => FieldValue::ArrowheadEnd(element.arrowhead_end),
            Field::ShapeVariant => FieldValue::ShapeVariant(element.shape_variant),
            Field::AssetId => FieldValue::AssetId(element.asset_id.clone()),
            Field::Locked => FieldValue::Locked(element.locked),
            Field::Group => FieldValue::Group(element.group),
        }
    }

    /// Whether this is a style attribute (applied through the style API).
    pub fn is_style(self) -> bool {
        matches!(
            self,
            Field::FillColor
                | Field::FillOpacity
                | Field::StrokeColor
                | Field::StrokeWidth
                | Field::StrokeStyle
                | Field::StrokeOpacity
                | Field::TextColor
                | Field::TextFont
                | Field::TextSize
                | Field::TextAlign
                | Field::ArrowheadStart
                | Field::ArrowheadEnd
                | Field::ShapeVariant
        )
    }
}

/// A value for a single element field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    X1(f64),
    Y1(f64),
    X2(f64),
    Y2(f64),
    Points(Vec<[f64; 2]>),
    DrawWidth(f64),
    DrawHeight(f64),
    Text(String),
    FillColor(Option<Color>),
    FillOpacity(f64),
    StrokeColor(Color),
    StrokeWidth(f64),
    StrokeStyle(StrokeStyle),
    StrokeOpacity(f64),
    TextColor(Color),
    TextFont(FontFamily),
    TextSize(f64),
    TextAlign(TextAlign),
    ArrowheadStart(Arrowhead),
    ArrowheadEnd(Arrowhead),
    ShapeVariant(ShapeVariant),
    AssetId(Option<String>),
    Locked(bool),
    Group(Option<GroupId>),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::X1(_) => Field::X1,
            FieldValue::Y1(_) => Field::Y1,
            FieldValue::X2(_) => Field::X2,
            FieldValue::Y2(_) => Field::Y2,
            FieldValue::Points(_) => Field::Points,
            FieldValue::DrawWidth(_) => Field::DrawWidth,
            FieldValue::DrawHeight(_) => Field::DrawHeight,
            FieldValue::Text(_) => Field::Text,
            FieldValue::FillColor(_) => Field::FillColor,
            FieldValue::FillOpacity(_) => Field::FillOpacity,
            FieldValue::StrokeColor(_) => Field::StrokeColor,
            FieldValue::StrokeWidth(_) => Field::StrokeWidth,
            FieldValue::StrokeStyle(_) => Field::StrokeStyle,
            FieldValue::StrokeOpacity(_) => Field::StrokeOpacity,
            FieldValue::TextColor(_) => Field::TextColor,
            FieldValue::TextFont(_) => Field::TextFont,
            FieldValue::TextSize(_) => Field::TextSize,
            FieldValue::TextAlign(_) => Field::TextAlign,
            FieldValue::ArrowheadStart(_) => Field::ArrowheadStart,
            FieldValue::ArrowheadEnd(_) => Field::ArrowheadEnd,
            FieldValue::ShapeVariant(_) => Field::ShapeVariant,
            FieldValue::AssetId(_) => Field::AssetId,
            FieldValue::Locked(_) => Field::Locked,
            FieldValue::Group(_) => Field::Group,
        }
    }

    /// Write this value into an element.
    pub fn apply(&self, element: &mut Element) {
        match self {
            FieldValue::X1(v) => element.x1 = *v,
            FieldValue::Y1(v) => element.y1 = *v,
            FieldValue::X2(v) => element.x2 = *v,
            FieldValue::Y2(v) => element.y2 = *v,
            FieldValue::Points(v) => element.points = v.clone(),
            FieldValue::DrawWidth(v) => element.draw_width = *v,
            FieldValue::DrawHeight(v) => element.draw_height = *v,
            FieldValue::Text(v) => element.text = v.clone(),
            FieldValue::FillColor(v) => element.fill_color = *v,
            FieldValue::FillOpacity(v) => element.fill_opacity = *v,
            FieldValue::StrokeColor(v) => element.stroke_color = *v,
            FieldValue::StrokeWidth(v) => element.stroke_width = *v,
            FieldValue::StrokeStyle(v) => element.stroke_style = *v,
            FieldValue::StrokeOpacity(v) => element.stroke_opacity = *v,
            FieldValue::TextColor(v) => element.text_color = *v,
            FieldValue::TextFont(v) => element.text_font = *v,
            FieldValue::TextSize(v) => element.text_size = *v,
            FieldValue::TextAlign(v) => element.text_align = *v,
            FieldValue::ArrowheadStart(v) => element.arrowhead_start = *v,
            FieldValue::ArrowheadEnd(v) => element.arrowhead_end = *v,
            FieldValue::ShapeVariant(v) => element.shape_variant = *v,
            FieldValue::AssetId(v) => element.asset_id = v.clone(),
            FieldValue::Locked(v) => element.locked = *v,
            FieldValue::Group(v) => element.group = *v,
        }
    }
}

/// A partial element: the subset of fields a change touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    values: Vec<FieldValue>,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, replacing any earlier value for the same field.
    pub fn set(&mut self, value: FieldValue) {
        let field = value.field();
        if let Some(existing) = self.values.iter_mut().find(|v| v.field() == field) {
            *existing = value;
        } else {
            self.values.push(value);
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, value: FieldValue) -> Self {
        self.set(value);
        self
    }

    /// Read the given fields from an element.
    pub fn capture(element: &Element, fields: &[Field]) -> Self {
        Self {
            values: fields.iter().map(|f| f.read(element)).collect(),
        }
    }

    /// The fields whose values differ between two snapshots.
    pub fn changed_fields(before: &Element, after: &Element, fields: &[Field]) -> Vec<Field> {
        fields
            .iter()
            .copied()
            .filter(|f| f.read(before) != f.read(after))
            .collect()
    }

    pub fn apply_to(&self, element: &mut Element) {
        for value in &self.values {
            value.apply(element);
        }
    }

    /// Overwrite this patch's values with those of `other`.
    pub fn merge(&mut self, other: &ElementPatch) {
        for value in &other.values {
            self.set(value.clone());
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.iter().find(|v| v.field() == field)
    }

    /// Field names in this patch, sorted.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = self.values.iter().map(FieldValue::field).collect();
        fields.sort();
        fields
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl FromIterator<FieldValue> for ElementPatch {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        let mut patch = Self::new();
        for value in iter {
            patch.set(value);
        }
        patch
    }
}
