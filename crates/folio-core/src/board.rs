//! The board: elements, assets, selection, history and viewport.
//!
//! Every public mutating method fires [`BoardObserver::on_update`] once when
//! it is done. Mutations that change document content record exactly one
//! history entry; undo and redo only replay entries.

use crate::asset::Asset;
use crate::camera::Camera;
use crate::clipboard::{ClipboardContent, ClipboardPayload, parse_clipboard, reidentify};
use crate::config::BoardConfig;
use crate::document::{BoardDocument, DOCUMENT_VERSION};
use crate::element::{
    Element, ElementId, ElementKind, ElementPatch, Field, FieldValue, GroupId, StyleDefaults,
    TextBehavior,
};
use crate::error::FolioResult;
use crate::handles::{self, HandleKind};
use crate::history::{CoalesceKey, ElementUpdate, History, HistoryEntry};
use crate::selection;
use crate::snap::{snap_to_grid, snap_value};
use crate::store::ElementStore;
use kurbo::{Point, Rect, Vec2};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The modal gesture currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Marquee selection.
    Select,
    Create,
    Drag,
    Resize,
    /// Canvas panning; persists until switched off.
    Move,
    /// Text input focused.
    Edit,
    /// Marquee for an export region.
    Screenshot,
    /// Eraser; persists until switched off.
    Erase,
}

impl Action {
    /// Modes that survive pointer-up and history replay.
    pub fn is_persistent(self) -> bool {
        matches!(self, Action::Move | Action::Erase)
    }
}

/// Callbacks into the rendering/host layer.
pub trait BoardObserver {
    /// Board state changed; re-render.
    fn on_update(&mut self) {}

    /// A screenshot marquee completed with this canvas region.
    fn on_screenshot(&mut self, _region: Rect) {}

    /// A creating gesture finalized this element.
    fn on_element_created(&mut self, _element: &Element) {}

    /// Copy/cut produced clipboard text.
    fn on_clipboard_write(&mut self, _text: &str) {}
}

/// Token for an element being created by a gesture.
///
/// The element is visible from [`Board::begin_create`] on; its single CREATE
/// history entry is recorded by [`Board::finalize_create`].
#[derive(Debug, PartialEq, Eq)]
pub struct CreateHandle {
    id: ElementId,
}

impl CreateHandle {
    pub fn id(&self) -> ElementId {
        self.id
    }
}

pub struct Board {
    config: BoardConfig,
    elements: ElementStore,
    assets: BTreeMap<String, Asset>,
    history: History,
    tool: Option<ElementKind>,
    action: Option<Action>,
    active_element: Option<ElementId>,
    active_group: Option<GroupId>,
    camera: Camera,
    selection_region: Option<Rect>,
    defaults: StyleDefaults,
    pending_create: Option<ElementId>,
    edit_origin: Option<Element>,
    /// Pre-gesture copies of the elements a drag or resize is moving.
    gesture_origin: Vec<Element>,
    observer: Option<Box<dyn BoardObserver>>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("elements", &self.elements.len())
            .field("assets", &self.assets.len())
            .field("history", &self.history.len())
            .field("history_index", &self.history.index())
            .field("tool", &self.tool)
            .field("action", &self.action)
            .field("active_group", &self.active_group)
            .field("zoom", &self.camera.zoom)
            .finish_non_exhaustive()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            history: History::new(config.history_limit),
            camera: {
                let (min, max) = config.zoom_bounds();
                Camera::with_bounds(min, max, config.zoom_step)
            },
            config,
            elements: ElementStore::new(),
            assets: BTreeMap::new(),
            tool: None,
            action: None,
            active_element: None,
            active_group: None,
            selection_region: None,
            defaults: StyleDefaults::default(),
            pending_create: None,
            edit_origin: None,
            gesture_origin: Vec::new(),
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: impl BoardObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn BoardObserver>> {
        self.observer.take()
    }

    pub(crate) fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_update();
        }
    }

    // ---- Accessors ----

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Elements in paint order.
    pub fn elements(&self) -> &[Element] {
        self.elements.as_slice()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn selected(&self) -> Vec<&Element> {
        selection::selected(&self.elements)
    }

    pub fn selected_ids(&self) -> Vec<ElementId> {
        selection::selected_ids(&self.elements)
    }

    pub fn assets(&self) -> &BTreeMap<String, Asset> {
        &self.assets
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tool(&self) -> Option<ElementKind> {
        self.tool
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active_element
    }

    pub fn active_group(&self) -> Option<GroupId> {
        self.active_group
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    pub fn translate(&self) -> Vec2 {
        self.camera.translate
    }

    pub fn selection_region(&self) -> Option<Rect> {
        self.selection_region
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    pub fn is_undo_disabled(&self) -> bool {
        self.history.is_undo_disabled()
    }

    pub fn is_redo_disabled(&self) -> bool {
        self.history.is_redo_disabled()
    }

    /// Grid to snap to, if snapping is on.
    pub fn grid(&self) -> Option<f64> {
        self.config.active_grid()
    }

    /// Element hit tolerance in canvas units.
    pub fn hit_tolerance(&self) -> f64 {
        self.config.hit_tolerance / self.camera.zoom
    }

    /// Handle hit tolerance in canvas units.
    pub fn handle_tolerance(&self) -> f64 {
        self.config.handle_size / self.camera.zoom
    }

    /// Topmost selectable element under a canvas point.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        selection::element_at_point(
            &self.elements,
            point,
            self.hit_tolerance(),
            self.active_group,
        )
    }

    /// Resize handle under a canvas point, when exactly one element is selected.
    pub fn handle_at(&self, point: Point) -> Option<(ElementId, HandleKind)> {
        let selected = self.selected();
        let [element] = selected.as_slice() else {
            return None;
        };
        handles::hit_test_handles(element, point, self.handle_tolerance())
            .map(|handle| (element.id(), handle))
    }

    // ---- Tool and mode ----

    /// Arm a creation tool for the next pointer-down.
    pub fn set_tool(&mut self, tool: Option<ElementKind>) {
        if let Some(kind) = tool.filter(|kind| !kind.is_creatable()) {
            log::warn!("{kind:?} elements cannot be drawn; tool ignored");
            return;
        }
        self.tool = tool;
        self.notify();
    }

    /// Switch the persistent mode (`Move`, `Erase`, `Screenshot`) or clear it.
    pub fn set_mode(&mut self, mode: Option<Action>) {
        if !matches!(
            mode,
            None | Some(Action::Move | Action::Erase | Action::Screenshot)
        ) {
            log::warn!("{mode:?} is not a selectable mode");
            return;
        }
        self.finish_edit();
        self.cancel_gesture();
        log::debug!("Mode: {:?} -> {:?}", self.action, mode);
        self.action = mode;
        self.selection_region = None;
        self.notify();
    }

    pub(crate) fn set_action(&mut self, action: Option<Action>) {
        if self.action != action {
            log::debug!("Action: {:?} -> {:?}", self.action, action);
        }
        self.action = action;
    }

    /// Clear the gesture action, keeping persistent modes.
    pub(crate) fn end_action(&mut self) {
        if !self.action.is_some_and(Action::is_persistent) {
            self.set_action(None);
        }
        self.selection_region = None;
    }

    pub(crate) fn set_selection_region(&mut self, region: Option<Rect>) {
        self.selection_region = region;
    }

    // ---- Element mutations ----

    /// Insert elements on top of the paint order and record CREATE.
    pub fn add_elements(&mut self, elements: Vec<Element>) {
        let elements: Vec<Element> = elements
            .into_iter()
            .filter(|e| !self.elements.contains(e.id()))
            .collect();
        if elements.is_empty() {
            return;
        }
        self.elements.push_back(elements.clone());
        self.history.record(HistoryEntry::Create { elements });
        self.notify();
    }

    /// Apply `patch` to the given elements and record UPDATE.
    ///
    /// Locked elements are skipped unless the patch only touches `locked`.
    pub fn update_elements(&mut self, ids: &[ElementId], patch: &ElementPatch) {
        let fields = patch.fields();
        let changes = self.apply_patch(ids, patch, &fields);
        if !changes.is_empty() {
            self.history.record(HistoryEntry::update(changes));
        }
        self.notify();
    }

    fn apply_patch(
        &mut self,
        ids: &[ElementId],
        patch: &ElementPatch,
        fields: &[Field],
    ) -> Vec<ElementUpdate> {
        let unlocking = fields == [Field::Locked];
        let refit = affects_text_box(fields);
        let diff_fields = diff_fields(fields);
        let mut changes = Vec::new();
        for &id in ids {
            let Some(element) = self.elements.get_mut(id) else {
                continue;
            };
            if element.locked && !unlocking {
                continue;
            }
            let before = element.clone();
            patch.apply_to(element);
            if element.locked {
                element.selected = false;
                element.editing = false;
            }
            if refit && element.kind == ElementKind::Text {
                TextBehavior::fit(element);
            }
            if let Some(change) = ElementUpdate::diff(&before, element, &diff_fields) {
                changes.push(change);
            }
        }
        changes
    }

    /// Remove elements and record REMOVE with their full snapshots.
    pub fn remove_elements(&mut self, ids: &[ElementId]) {
        let ids: Vec<ElementId> = ids
            .iter()
            .copied()
            .filter(|&id| self.elements.get(id).is_some_and(|e| !e.locked))
            .collect();
        let mut removed = self.elements.remove(&ids);
        if removed.is_empty() {
            return;
        }
        for element in &mut removed {
            element.selected = false;
            element.editing = false;
        }
        if self.active_element.is_some_and(|id| ids.contains(&id)) {
            self.active_element = None;
        }
        self.history.record(HistoryEntry::Remove { elements: removed });
        self.notify();
    }

    /// Remove the selection.
    pub fn delete_selected(&mut self) {
        let ids = self.selected_ids();
        self.remove_elements(&ids);
    }

    // ---- History ----

    /// Revert the most recent active entry. Commits a text edit, drops an
    /// element still being created and puts back anything a drag or resize
    /// had moved first.
    pub fn undo(&mut self) {
        self.finish_edit();
        self.cancel_pending_create();
        self.cancel_gesture();
        if let Some(entry) = self.history.undo() {
            replay(&mut self.elements, entry, false);
        }
        self.after_replay();
        self.notify();
    }

    pub fn redo(&mut self) {
        self.finish_edit();
        self.cancel_pending_create();
        self.cancel_gesture();
        if let Some(entry) = self.history.redo() {
            replay(&mut self.elements, entry, true);
        }
        self.after_replay();
        self.notify();
    }

    fn after_replay(&mut self) {
        self.active_group = None;
        self.active_element = None;
        self.edit_origin = None;
        selection::clear_selection(&mut self.elements);
        self.end_action();
    }

    // ---- Two-phase creation ----

    /// Insert a zero-size element of `kind` at `point` without recording
    /// history, clearing the selection.
    pub fn begin_create(&mut self, kind: ElementKind, point: Point) -> CreateHandle {
        self.cancel_pending_create();
        selection::clear_selection(&mut self.elements);
        let point = self.creation_point(kind, point);
        let mut element = Element::create(kind, &self.defaults);
        kind.behavior().on_create_start(&mut element, point);
        element.group = self.active_group;
        let id = element.id();
        self.elements.push_back([element]);
        self.pending_create = Some(id);
        self.active_element = Some(id);
        self.set_action(Some(Action::Create));
        log::debug!("Create: started {kind:?} {id}");
        self.notify();
        CreateHandle { id }
    }

    /// Track the pointer for an element being created.
    pub fn update_create(&mut self, handle: &CreateHandle, point: Point) {
        if self.pending_create != Some(handle.id) {
            return;
        }
        let Some(kind) = self.elements.get(handle.id).map(|e| e.kind) else {
            return;
        };
        let point = self.creation_point(kind, point);
        if let Some(element) = self.elements.get_mut(handle.id) {
            kind.behavior().on_create_move(element, point);
        }
        self.notify();
    }

    /// Finish creating: settle geometry, select the element and record one
    /// CREATE entry. Text goes into edit mode instead; its CREATE is recorded
    /// when the edit commits.
    pub fn finalize_create(&mut self, handle: CreateHandle) -> Option<ElementId> {
        if self.pending_create != Some(handle.id) {
            return None;
        }
        let id = handle.id;
        let element = self.elements.get_mut(id)?;
        element.behavior().on_create_end(element);
        element.selected = true;
        let is_text = element.kind == ElementKind::Text;
        self.tool = None;

        if is_text {
            element.editing = true;
            self.edit_origin = Some(element.clone());
            self.active_element = Some(id);
            self.set_action(Some(Action::Edit));
            self.selection_region = None;
            self.notify();
            return Some(id);
        }

        self.pending_create = None;
        self.active_element = None;
        self.end_action();
        self.record_created(id);
        self.notify();
        Some(id)
    }

    /// Drop an element that is still being created.
    pub fn cancel_create(&mut self, handle: CreateHandle) {
        if self.pending_create == Some(handle.id) {
            self.cancel_pending_create();
            self.end_action();
            self.notify();
        }
    }

    fn cancel_pending_create(&mut self) {
        if let Some(id) = self.pending_create.take() {
            log::debug!("Create: cancelled {id}");
            self.elements.remove(&[id]);
            if self.active_element == Some(id) {
                self.active_element = None;
            }
        }
    }

    fn record_created(&mut self, id: ElementId) {
        let Some(element) = self.elements.get(id).cloned() else {
            return;
        };
        self.history.record(HistoryEntry::Create {
            elements: vec![element.clone()],
        });
        if let Some(observer) = self.observer.as_mut() {
            observer.on_element_created(&element);
        }
    }

    fn creation_point(&self, kind: ElementKind, point: Point) -> Point {
        if kind.behavior().snaps_to_grid() {
            snap_to_grid(point, self.grid())
        } else {
            point
        }
    }

    // ---- Gestures ----

    /// Start a drag or resize over copies of the given elements.
    ///
    /// Locked elements are left out; they never move.
    pub(crate) fn begin_gesture(&mut self, snapshots: Vec<Element>) -> bool {
        self.cancel_gesture();
        self.gesture_origin = snapshots.into_iter().filter(|e| !e.locked).collect();
        !self.gesture_origin.is_empty()
    }

    /// Move the gesture's elements to `snapshot + delta`.
    ///
    /// The delta is snapped once, against the first snapshot, so the
    /// selection keeps its internal layout.
    pub(crate) fn drag_elements(&mut self, delta: Vec2) {
        let delta = match (self.gesture_origin.first(), self.grid()) {
            (Some(anchor), Some(grid)) => Vec2::new(
                snap_value(anchor.x1 + delta.x, Some(grid)) - anchor.x1,
                snap_value(anchor.y1 + delta.y, Some(grid)) - anchor.y1,
            ),
            _ => delta,
        };
        for snapshot in &self.gesture_origin {
            if let Some(element) = self.elements.get_mut(snapshot.id()) {
                if !element.locked {
                    element.behavior().on_drag(element, snapshot, delta);
                }
            }
        }
    }

    pub(crate) fn resize_element(&mut self, handle: HandleKind, delta: Vec2) {
        let min_size = self.config.min_element_size;
        let grid = self.grid();
        let Some(snapshot) = self.gesture_origin.first() else {
            return;
        };
        if let Some(element) = self.elements.get_mut(snapshot.id()) {
            if !element.locked {
                handles::resize(element, snapshot, handle, delta, min_size, grid);
            }
        }
    }

    /// End the gesture with one UPDATE comparing the snapshots with the
    /// live elements.
    ///
    /// Returns `false` when nothing moved.
    pub(crate) fn commit_gesture(&mut self) -> bool {
        let snapshots = std::mem::take(&mut self.gesture_origin);
        let mut changes = Vec::new();
        for snapshot in &snapshots {
            let Some(element) = self.elements.get_mut(snapshot.id()) else {
                continue;
            };
            if !element.kind.is_linear() {
                element.normalize();
            }
            if let Some(change) = ElementUpdate::diff(snapshot, element, &Field::GEOMETRY) {
                changes.push(change);
            }
        }
        if changes.is_empty() {
            return false;
        }
        self.history.record(HistoryEntry::update(changes));
        true
    }

    /// Abandon a drag or resize, putting the elements back where it found
    /// them. Nothing is recorded.
    pub(crate) fn cancel_gesture(&mut self) {
        let snapshots = std::mem::take(&mut self.gesture_origin);
        if snapshots.is_empty() {
            return;
        }
        log::debug!("Gesture: cancelled over {} elements", snapshots.len());
        for snapshot in &snapshots {
            if let Some(element) = self.elements.get_mut(snapshot.id()) {
                ElementPatch::capture(snapshot, &Field::GEOMETRY).apply_to(element);
            }
        }
    }

    pub(crate) fn emit_screenshot(&mut self, region: Rect) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_screenshot(region);
        }
    }

    pub(crate) fn clear_selection_silent(&mut self) {
        selection::clear_selection(&mut self.elements);
    }

    /// Unlocked elements under a canvas point, ignoring the active group.
    pub(crate) fn elements_at(&self, point: Point) -> Vec<ElementId> {
        selection::elements_at_point(&self.elements, point, self.hit_tolerance())
    }

    pub(crate) fn click_select(&mut self, id: ElementId, shift: bool) {
        selection::click_select(&mut self.elements, id, shift, self.active_group);
    }

    /// Move the selection by whole steps; a burst on the same selection and
    /// axis coalesces into one history entry.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        let ids = self.selected_ids();
        if ids.is_empty() || (dx == 0.0 && dy == 0.0) {
            return;
        }
        let mut fields = Vec::new();
        if dx != 0.0 {
            fields.extend([Field::X1, Field::X2]);
        }
        if dy != 0.0 {
            fields.extend([Field::Y1, Field::Y2]);
        }
        let mut changes = Vec::new();
        for &id in &ids {
            let Some(element) = self.elements.get_mut(id) else {
                continue;
            };
            let before = element.clone();
            element.translate(Vec2::new(dx, dy));
            if let Some(change) = ElementUpdate::diff(&before, element, &fields) {
                changes.push(change);
            }
        }
        self.history.record(HistoryEntry::coalescing_update(
            changes,
            CoalesceKey::new(ids, fields),
        ));
        self.notify();
    }

    // ---- Selection ----

    pub fn clear_selection(&mut self) {
        self.finish_edit();
        selection::clear_selection(&mut self.elements);
        self.notify();
    }

    pub fn select_by_region(&mut self, region: Rect) {
        self.finish_edit();
        selection::select_by_region(&mut self.elements, region, self.active_group);
        self.notify();
    }

    pub fn select_all(&mut self) {
        self.finish_edit();
        selection::select_all(&mut self.elements, self.active_group);
        self.notify();
    }

    /// Click-select semantics: replace, or toggle with `shift`.
    pub fn select(&mut self, id: ElementId, shift: bool) {
        self.finish_edit();
        self.click_select(id, shift);
        self.notify();
    }

    /// Enter the group of `id` for direct editing of its members.
    pub fn enter_group(&mut self, id: ElementId) {
        let Some(group) = self.elements.get(id).and_then(|e| e.group) else {
            return;
        };
        self.active_group = Some(group);
        selection::clear_selection(&mut self.elements);
        selection::click_select(&mut self.elements, id, false, Some(group));
        log::debug!("Entered group {group}");
        self.notify();
    }

    pub fn exit_group(&mut self) {
        if self.active_group.take().is_some() {
            selection::clear_selection(&mut self.elements);
            self.notify();
        }
    }

    /// Put the selection into a new group.
    pub fn group_selected(&mut self) {
        let ids = self.selected_ids();
        if ids.len() < 2 {
            return;
        }
        let group = Uuid::new_v4();
        self.update_elements(&ids, &ElementPatch::new().with(FieldValue::Group(Some(group))));
    }

    pub fn ungroup_selected(&mut self) {
        let ids: Vec<ElementId> = self
            .selected()
            .into_iter()
            .filter(|e| e.group.is_some())
            .map(Element::id)
            .collect();
        if ids.is_empty() {
            return;
        }
        self.active_group = None;
        self.update_elements(&ids, &ElementPatch::new().with(FieldValue::Group(None)));
    }

    /// Lock the selection; locked elements drop out of it.
    pub fn lock_selected(&mut self) {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return;
        }
        self.finish_edit();
        for &id in &ids {
            if let Some(element) = self.elements.get_mut(id) {
                element.selected = false;
            }
        }
        self.update_elements(&ids, &ElementPatch::new().with(FieldValue::Locked(true)));
    }

    pub fn unlock_all(&mut self) {
        let ids: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|e| e.locked)
            .map(Element::id)
            .collect();
        if ids.is_empty() {
            return;
        }
        self.update_elements(&ids, &ElementPatch::new().with(FieldValue::Locked(false)));
    }

    /// Apply style values to the selection and make them the new defaults.
    ///
    /// Repeated changes to the same fields of the same selection coalesce.
    pub fn apply_style(&mut self, patch: &ElementPatch) {
        let patch: ElementPatch = patch
            .values()
            .iter()
            .filter(|v| v.field().is_style())
            .cloned()
            .collect();
        if patch.is_empty() {
            return;
        }
        for value in patch.values() {
            set_default(&mut self.defaults, value);
        }
        let ids = self.selected_ids();
        let fields = patch.fields();
        let changes = self.apply_patch(&ids, &patch, &fields);
        if !changes.is_empty() {
            self.history.record(HistoryEntry::coalescing_update(
                changes,
                CoalesceKey::new(ids, diff_fields(&fields)),
            ));
        }
        self.notify();
    }

    // ---- Text editing ----

    /// Start editing a text element.
    pub fn begin_edit(&mut self, id: ElementId) {
        self.finish_edit();
        let Some(element) = self.elements.get(id) else {
            return;
        };
        if element.kind != ElementKind::Text || element.locked {
            return;
        }
        selection::clear_selection(&mut self.elements);
        if let Some(element) = self.elements.get_mut(id) {
            element.selected = true;
            element.editing = true;
            self.edit_origin = Some(element.clone());
        }
        self.active_element = Some(id);
        self.set_action(Some(Action::Edit));
        self.notify();
    }

    /// Mirror the live input value into the edited element.
    pub fn set_edit_text(&mut self, text: &str) {
        if self.action != Some(Action::Edit) {
            return;
        }
        let Some(element) = self.active_element.and_then(|id| self.elements.get_mut(id)) else {
            return;
        };
        element.text = text.to_string();
        TextBehavior::fit(element);
        self.notify();
    }

    /// Leave edit mode, recording the text change.
    pub fn commit_edit(&mut self) {
        if self.finish_edit() {
            self.notify();
        }
    }

    /// Commit any edit in progress; returns whether one was.
    fn finish_edit(&mut self) -> bool {
        if self.action != Some(Action::Edit) {
            return false;
        }
        self.set_action(None);
        let origin = self.edit_origin.take();
        let Some(id) = self.active_element.take() else {
            return true;
        };
        let Some(element) = self.elements.get_mut(id) else {
            return true;
        };
        element.editing = false;
        TextBehavior::fit(element);
        let empty = element.text.trim().is_empty();

        if self.pending_create == Some(id) {
            self.pending_create = None;
            if empty {
                self.elements.remove(&[id]);
            } else {
                self.record_created(id);
            }
            return true;
        }

        let Some(mut origin) = origin else {
            return true;
        };
        if empty {
            self.elements.remove(&[id]);
            origin.selected = false;
            origin.editing = false;
            self.history.record(HistoryEntry::Remove {
                elements: vec![origin],
            });
        } else if let Some(change) =
            ElementUpdate::diff(&origin, element, &[Field::Text, Field::X2, Field::Y2])
        {
            self.history.record(HistoryEntry::update(vec![change]));
        }
        true
    }

    // ---- Clipboard ----

    fn payload(&self, elements: Vec<Element>) -> ClipboardPayload {
        let assets = self
            .assets
            .iter()
            .filter(|(id, _)| {
                elements
                    .iter()
                    .any(|e| e.asset_id.as_deref() == Some(id.as_str()))
            })
            .map(|(id, asset)| (id.clone(), asset.clone()))
            .collect();
        ClipboardPayload { elements, assets }
    }

    /// Copy the selection as clipboard text.
    pub fn copy(&mut self) -> Option<String> {
        let elements = selection::snapshot_selected(&self.elements);
        if elements.is_empty() {
            return None;
        }
        let text = match self.payload(elements).to_clipboard_text() {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Failed to encode clipboard payload: {err}");
                return None;
            }
        };
        if let Some(observer) = self.observer.as_mut() {
            observer.on_clipboard_write(&text);
        }
        Some(text)
    }

    /// Copy, then remove the selection.
    pub fn cut(&mut self) -> Option<String> {
        let text = self.copy()?;
        self.delete_selected();
        Some(text)
    }

    /// Paste clipboard text. Board payloads are re-identified and offset;
    /// plain text becomes a text element. `position` places the paste
    /// instead of the default offset.
    pub fn paste(&mut self, text: &str, position: Option<Point>) {
        self.finish_edit();
        match parse_clipboard(text) {
            ClipboardContent::Board(payload) => self.paste_payload(payload, position),
            ClipboardContent::Text(text) => self.paste_text(&text, position),
        }
    }

    fn paste_payload(&mut self, payload: ClipboardPayload, position: Option<Point>) {
        if payload.is_empty() {
            return;
        }
        let offset = match position {
            Some(position) => {
                let origin = payload
                    .elements
                    .iter()
                    .map(Element::bounds)
                    .reduce(|a, b| a.union(b))
                    .map(|r| r.origin())
                    .unwrap_or(Point::ZERO);
                position - origin
            }
            None => Vec2::new(self.config.paste_offset, self.config.paste_offset),
        };
        for (id, asset) in payload.assets {
            self.assets.entry(id).or_insert(asset);
        }
        let elements = reidentify(payload.elements, self.active_group, offset);
        self.insert_selected(elements);
    }

    fn paste_text(&mut self, text: &str, position: Option<Point>) {
        if text.trim().is_empty() {
            return;
        }
        let position = position.unwrap_or_else(|| self.default_paste_point());
        let mut element = Element::create(ElementKind::Text, &self.defaults);
        element.text = text.to_string();
        element.set_box(position.x, position.y, position.x, position.y);
        TextBehavior::fit(&mut element);
        element.group = self.active_group;
        element.selected = true;
        self.insert_selected(vec![element]);
    }

    fn default_paste_point(&self) -> Point {
        let offset = self.config.paste_offset;
        self.camera.screen_to_canvas(Point::new(offset, offset))
    }

    /// Replace the selection with `elements`, added as one CREATE.
    fn insert_selected(&mut self, elements: Vec<Element>) {
        selection::clear_selection(&mut self.elements);
        self.add_elements(elements);
    }

    /// Copy the selection in place with the paste offset.
    pub fn duplicate_selected(&mut self) {
        let elements = selection::snapshot_selected(&self.elements);
        if elements.is_empty() {
            return;
        }
        self.finish_edit();
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        let elements = reidentify(elements, self.active_group, offset);
        self.insert_selected(elements);
    }

    /// Add an image element from encoded bytes, registering its asset.
    pub fn add_image(&mut self, bytes: &[u8], position: Point) -> FolioResult<ElementId> {
        let asset = Asset::from_image_bytes(Uuid::new_v4().to_string(), bytes)?;
        let asset_id = match self.assets.values().find(|a| a.data_url == asset.data_url) {
            Some(existing) => existing.id.clone(),
            None => {
                let id = asset.id.clone();
                self.assets.insert(id.clone(), asset.clone());
                id
            }
        };
        let mut element = Element::create(ElementKind::Image, &self.defaults);
        element.set_box(
            position.x,
            position.y,
            position.x + asset.width,
            position.y + asset.height,
        );
        element.asset_id = Some(asset_id);
        element.group = self.active_group;
        element.selected = true;
        let id = element.id();
        self.finish_edit();
        self.insert_selected(vec![element]);
        Ok(id)
    }

    // ---- Viewport ----

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
        self.notify();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
        self.notify();
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
        self.notify();
    }

    /// Zoom keeping a screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, zoom: f64) {
        self.camera.zoom_at(screen_point, zoom);
        self.notify();
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
        self.notify();
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.notify();
    }

    // ---- Document lifecycle ----

    /// Snapshot the whole board, keeping every asset.
    pub fn to_document(&self) -> BoardDocument {
        BoardDocument {
            version: DOCUMENT_VERSION,
            elements: self.elements.iter().cloned().map(clear_flags).collect(),
            assets: self.assets.clone(),
            zoom: self.camera.zoom,
            translate_x: self.camera.translate.x,
            translate_y: self.camera.translate.y,
        }
    }

    /// Export elements (all or the selection) with only referenced assets.
    pub fn export_document(&self, selected_only: bool) -> BoardDocument {
        let mut document = self.to_document();
        if selected_only {
            let ids = self.selected_ids();
            document.elements.retain(|e| ids.contains(&e.id()));
        }
        document.retain_referenced_assets();
        document
    }

    /// Replace the board content with a document. History is cleared.
    pub fn load_document(&mut self, document: BoardDocument) {
        self.clear_transient();
        self.elements =
            ElementStore::from_elements(document.elements.into_iter().map(clear_flags).collect());
        self.assets = document.assets;
        self.history.clear();
        self.camera.reset();
        self.camera.set_zoom(document.zoom);
        self.camera.translate = Vec2::new(document.translate_x, document.translate_y);
        self.notify();
    }

    pub fn load_json(&mut self, json: &str) -> FolioResult<()> {
        let document = BoardDocument::from_json(json)?;
        self.load_document(document);
        Ok(())
    }

    pub fn to_json(&self) -> FolioResult<String> {
        self.to_document().to_json()
    }

    /// Empty the board and its history, keeping config and defaults.
    pub fn reset(&mut self) {
        self.load_document(BoardDocument::default());
    }

    fn clear_transient(&mut self) {
        self.tool = None;
        self.action = None;
        self.active_element = None;
        self.active_group = None;
        self.selection_region = None;
        self.pending_create = None;
        self.edit_origin = None;
        self.gesture_origin.clear();
    }
}

fn clear_flags(mut element: Element) -> Element {
    element.selected = false;
    element.editing = false;
    element
}

fn affects_text_box(fields: &[Field]) -> bool {
    fields
        .iter()
        .any(|f| matches!(f, Field::Text | Field::TextSize | Field::TextFont))
}

/// Patched fields plus the text box, which follows text content and font.
fn diff_fields(fields: &[Field]) -> Vec<Field> {
    let mut fields = fields.to_vec();
    if affects_text_box(&fields) {
        fields.extend([Field::X2, Field::Y2]);
        fields.sort();
        fields.dedup();
    }
    fields
}

fn set_default(defaults: &mut StyleDefaults, value: &FieldValue) {
    match value {
        FieldValue::FillColor(v) => defaults.fill_color = *v,
        FieldValue::FillOpacity(v) => defaults.fill_opacity = *v,
        FieldValue::StrokeColor(v) => defaults.stroke_color = *v,
        FieldValue::StrokeWidth(v) => defaults.stroke_width = *v,
        FieldValue::StrokeStyle(v) => defaults.stroke_style = *v,
        FieldValue::StrokeOpacity(v) => defaults.stroke_opacity = *v,
        FieldValue::TextColor(v) => defaults.text_color = *v,
        FieldValue::TextFont(v) => defaults.text_font = *v,
        FieldValue::TextSize(v) => defaults.text_size = *v,
        FieldValue::TextAlign(v) => defaults.text_align = *v,
        FieldValue::ArrowheadStart(v) => defaults.arrowhead_start = *v,
        FieldValue::ArrowheadEnd(v) => defaults.arrowhead_end = *v,
        FieldValue::ShapeVariant(v) => defaults.shape_variant = *v,
        _ => {}
    }
}

/// Apply a history entry forward (redo) or inverted (undo).
///
/// Elements that no longer exist are skipped.
fn replay(store: &mut ElementStore, entry: &HistoryEntry, forward: bool) {
    match (entry, forward) {
        (HistoryEntry::Create { elements }, true) | (HistoryEntry::Remove { elements }, false) => {
            store.push_front(elements.iter().cloned().map(clear_flags));
        }
        (HistoryEntry::Create { elements }, false) | (HistoryEntry::Remove { elements }, true) => {
            let ids: Vec<ElementId> = elements.iter().map(Element::id).collect();
            store.remove(&ids);
        }
        (HistoryEntry::Update { changes, .. }, _) => {
            for change in changes {
                if let Some(element) = store.get_mut(change.id) {
                    let patch = if forward { &change.next } else { &change.prev };
                    patch.apply_to(element);
                }
            }
        }
    }
}
