//! Plain-text clipboard protocol and paste re-identification.
//!
//! Board content travels as `folio:::<json>`; any other text is pasted as a
//! text element by the board.

use crate::asset::Asset;
use crate::element::{Element, GroupId};
use crate::error::FolioResult;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Marker prefix of board clipboard text.
pub const CLIPBOARD_PREFIX: &str = "folio:::";

/// Elements and the assets they reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardPayload {
    pub elements: Vec<Element>,
    pub assets: BTreeMap<String, Asset>,
}

/// Parsed clipboard text.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardContent {
    Board(ClipboardPayload),
    Text(String),
}

impl ClipboardPayload {
    /// Encode as clipboard text.
    pub fn to_clipboard_text(&self) -> FolioResult<String> {
        Ok(format!("{CLIPBOARD_PREFIX}{}", serde_json::to_string(self)?))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Classify clipboard text.
///
/// Malformed JSON after the prefix yields an empty payload rather than an
/// error; missing `elements`/`assets` are treated as empty.
pub fn parse_clipboard(text: &str) -> ClipboardContent {
    let Some(json) = text.strip_prefix(CLIPBOARD_PREFIX) else {
        return ClipboardContent::Text(text.to_string());
    };
    match serde_json::from_str(json) {
        Ok(payload) => ClipboardContent::Board(payload),
        Err(err) => {
            log::warn!("Ignoring malformed clipboard payload: {err}");
            ClipboardContent::Board(ClipboardPayload::default())
        }
    }
}

/// Prepare copied elements for insertion.
///
/// Every element gets a fresh id, `selected = true`, cleared edit state and
/// the given offset. Each source group maps to one new group id for the
/// whole batch. With an `active_group`, all elements join that group
/// instead.
pub fn reidentify(
    elements: impl IntoIterator<Item = Element>,
    active_group: Option<GroupId>,
    offset: Vec2,
) -> Vec<Element> {
    let mut groups: HashMap<GroupId, GroupId> = HashMap::new();
    elements
        .into_iter()
        .map(|mut element| {
            element.regenerate_id();
            element.translate(offset);
            element.selected = true;
            element.editing = false;
            element.locked = false;
            element.group = match (active_group, element.group) {
                (Some(active), _) => Some(active),
                (None, Some(old)) => Some(*groups.entry(old).or_insert_with(Uuid::new_v4)),
                (None, None) => None,
            };
            element
        })
        .collect()
}
