//! At-rest document format.

use crate::asset::Asset;
use crate::element::Element;
use crate::error::FolioResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// A serialized board: elements in paint order, their assets and the
/// viewport. Every field is defaulted when missing so older and partial
/// documents still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardDocument {
    pub version: u32,
    pub elements: Vec<Element>,
    pub assets: BTreeMap<String, Asset>,
    pub zoom: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for BoardDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            elements: Vec::new(),
            assets: BTreeMap::new(),
            zoom: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl BoardDocument {
    pub fn to_json(&self) -> FolioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> FolioResult<Self> {
        let document: Self = serde_json::from_str(json)?;
        if document.version > DOCUMENT_VERSION {
            log::warn!(
                "Document version {} is newer than supported version {}",
                document.version,
                DOCUMENT_VERSION
            );
        }
        Ok(document)
    }

    /// Drop assets no element references.
    pub fn retain_referenced_assets(&mut self) {
        let elements = &self.elements;
        self.assets.retain(|id, _| {
            elements
                .iter()
                .any(|e| e.asset_id.as_deref() == Some(id.as_str()))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn test_empty_json_loads_defaults() {
        let document = BoardDocument::from_json("{}").unwrap();
        assert_eq!(document, BoardDocument::default());
        assert!((document.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_viewport_fields_are_camel_case() {
        let document = BoardDocument {
            translate_x: 5.0,
            ..Default::default()
        };
        let json = document.to_json().unwrap();
        assert!(json.contains("\"translateX\""));
        let back = BoardDocument::from_json(&json).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(BoardDocument::from_json("[1, 2").is_err());
    }

    #[test]
    fn test_retain_referenced_assets() {
        let mut image = Element::new(ElementKind::Image);
        image.asset_id = Some("kept".into());
        let asset = |id: &str| Asset {
            id: id.into(),
            data_url: String::new(),
            width: 1.0,
            height: 1.0,
        };
        let mut document = BoardDocument {
            elements: vec![image],
            ..Default::default()
        };
        document.assets.insert("kept".into(), asset("kept"));
        document.assets.insert("orphan".into(), asset("orphan"));
        document.retain_referenced_assets();
        assert_eq!(document.assets.len(), 1);
        assert!(document.assets.contains_key("kept"));
    }
}
