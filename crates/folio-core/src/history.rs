//! Undo/redo history with change coalescing.
//!
//! Entries are stored newest first. `index` is the undo cursor: entries
//! `0..index` have been undone and can be redone, entries `index..` can be
//! undone. Recording a new entry discards the redo branch.

use crate::config::MAX_HISTORY;
use crate::element::{Element, ElementId, ElementPatch, Field};

/// Identifies a run of edits that collapse into one undo step: the same
/// sorted element ids and the same sorted field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoalesceKey {
    ids: Vec<ElementId>,
    fields: Vec<Field>,
}

impl CoalesceKey {
    pub fn new(
        ids: impl IntoIterator<Item = ElementId>,
        fields: impl IntoIterator<Item = Field>,
    ) -> Self {
        let mut ids: Vec<ElementId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        let mut fields: Vec<Field> = fields.into_iter().collect();
        fields.sort();
        fields.dedup();
        Self { ids, fields }
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Before/after values of the fields one element changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementUpdate {
    pub id: ElementId,
    pub prev: ElementPatch,
    pub next: ElementPatch,
}

impl ElementUpdate {
    /// Diff two snapshots of the same element over `fields`.
    ///
    /// Returns `None` when nothing changed.
    pub fn diff(before: &Element, after: &Element, fields: &[Field]) -> Option<Self> {
        let changed = ElementPatch::changed_fields(before, after, fields);
        if changed.is_empty() {
            return None;
        }
        Some(Self {
            id: after.id(),
            prev: ElementPatch::capture(before, &changed),
            next: ElementPatch::capture(after, &changed),
        })
    }
}

/// One undoable step.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// Elements added; the snapshots are their values after creation.
    Create { elements: Vec<Element> },
    /// Elements removed; full snapshots taken before removal.
    Remove { elements: Vec<Element> },
    Update {
        changes: Vec<ElementUpdate>,
        coalesce_key: Option<CoalesceKey>,
    },
}

impl HistoryEntry {
    pub fn update(changes: Vec<ElementUpdate>) -> Self {
        HistoryEntry::Update {
            changes,
            coalesce_key: None,
        }
    }

    pub fn coalescing_update(changes: Vec<ElementUpdate>, key: CoalesceKey) -> Self {
        HistoryEntry::Update {
            changes,
            coalesce_key: Some(key),
        }
    }

    pub fn coalesce_key(&self) -> Option<&CoalesceKey> {
        match self {
            HistoryEntry::Update { coalesce_key, .. } => coalesce_key.as_ref(),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryEntry::Create { .. } => "create",
            HistoryEntry::Remove { .. } => "remove",
            HistoryEntry::Update { .. } => "update",
        }
    }

    /// Ids of the elements this entry touches.
    pub fn ids(&self) -> Vec<ElementId> {
        match self {
            HistoryEntry::Create { elements } | HistoryEntry::Remove { elements } => {
                elements.iter().map(Element::id).collect()
            }
            HistoryEntry::Update { changes, .. } => changes.iter().map(|c| c.id).collect(),
        }
    }

    /// Fold `other` into this entry if both carry the same coalesce key.
    ///
    /// The earliest `prev` values are kept; `next` values are overwritten.
    fn try_merge(&mut self, other: &HistoryEntry) -> bool {
        let (Some(key), Some(other_key)) = (self.coalesce_key(), other.coalesce_key()) else {
            return false;
        };
        if key != other_key {
            return false;
        }
        let (
            HistoryEntry::Update { changes, .. },
            HistoryEntry::Update {
                changes: incoming, ..
            },
        ) = (self, other)
        else {
            return false;
        };
        for change in incoming {
            match changes.iter_mut().find(|c| c.id == change.id) {
                Some(existing) => {
                    // A field first touched mid-run keeps its own prev value.
                    for value in change.prev.values() {
                        if existing.prev.get(value.field()).is_none() {
                            existing.prev.set(value.clone());
                        }
                    }
                    existing.next.merge(&change.next);
                }
                None => changes.push(change.clone()),
            }
        }
        true
    }
}

/// Bounded linear undo stack.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new entry, discarding the redo branch and coalescing with
    /// the most recent entry when their keys match.
    pub fn record(&mut self, entry: HistoryEntry) {
        if self.index > 0 {
            self.entries.drain(..self.index);
            self.index = 0;
        }

        if let Some(latest) = self.entries.first_mut() {
            if latest.try_merge(&entry) {
                log::debug!("History: coalesced {} into latest entry", entry.label());
                return;
            }
        }

        log::debug!(
            "History: recorded {} for {} element(s)",
            entry.label(),
            entry.ids().len()
        );
        self.entries.insert(0, entry);
        self.entries.truncate(self.limit);
    }

    /// Step the cursor back and return the entry to invert.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.is_undo_disabled() {
            return None;
        }
        let entry = &self.entries[self.index];
        self.index += 1;
        log::debug!("History: undo {} (index {})", entry.label(), self.index);
        Some(entry)
    }

    /// Step the cursor forward and return the entry to replay.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.is_redo_disabled() {
            return None;
        }
        self.index -= 1;
        let entry = &self.entries[self.index];
        log::debug!("History: redo {} (index {})", entry.label(), self.index);
        Some(entry)
    }

    pub fn is_undo_disabled(&self) -> bool {
        self.index >= self.entries.len()
    }

    pub fn is_redo_disabled(&self) -> bool {
        self.index == 0 || self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.is_undo_disabled()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_redo_disabled()
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}
