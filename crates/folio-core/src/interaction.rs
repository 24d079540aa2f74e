//! Pointer and keyboard interaction.
//!
//! [`EventHandler`] turns normalized events into [`Board`] calls. The board
//! holds the observable `action`; the handler keeps the per-gesture data
//! (snapshots, marquee origin, create handle) and drops it whenever the
//! board's action no longer matches, e.g. after an undo mid-gesture.

use crate::board::{Action, Board, CreateHandle};
use crate::element::{Element, ElementId, ElementKind};
use crate::handles::HandleKind;
use crate::input::{KeyEvent, PointerEvent};
use crate::shortcuts::{Command, ShortcutRegistry};
use kurbo::{Point, Rect, Vec2};

/// Marquee rectangle for selection and screenshots.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRect {
    pub start: Point,
    pub current: Point,
}

impl SelectionRect {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Normalized rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

#[derive(Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    Create(CreateHandle),
    /// The board holds the pre-drag copies of the moving elements.
    Drag {
        origin: Point,
        /// Element clicked while already selected; resolved on release
        /// if nothing moved.
        click: Option<(ElementId, bool)>,
        moved: bool,
    },
    Resize {
        origin: Point,
        handle: HandleKind,
    },
    Select(SelectionRect),
    Screenshot(SelectionRect),
    Pan {
        last_screen: Point,
    },
    Erase {
        ids: Vec<ElementId>,
    },
}

impl Gesture {
    fn action(&self) -> Option<Action> {
        match self {
            Gesture::Idle => None,
            Gesture::Create(_) => Some(Action::Create),
            Gesture::Drag { .. } => Some(Action::Drag),
            Gesture::Resize { .. } => Some(Action::Resize),
            Gesture::Select(_) => Some(Action::Select),
            Gesture::Screenshot(_) => Some(Action::Screenshot),
            Gesture::Pan { .. } => Some(Action::Move),
            Gesture::Erase { .. } => Some(Action::Erase),
        }
    }
}

/// Drives a [`Board`] from pointer and keyboard events.
#[derive(Debug, Default)]
pub struct EventHandler {
    gesture: Gesture,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Current marquee, if one is being drawn.
    pub fn selection_rect(&self) -> Option<SelectionRect> {
        match &self.gesture {
            Gesture::Select(rect) | Gesture::Screenshot(rect) => Some(*rect),
            _ => None,
        }
    }

    /// Elements the eraser has touched in the current stroke.
    pub fn erase_candidates(&self) -> &[ElementId] {
        match &self.gesture {
            Gesture::Erase { ids } => ids,
            _ => &[],
        }
    }

    /// Drop gesture data the board no longer backs.
    fn sync(&mut self, board: &mut Board) {
        if self.gesture.action().is_some() && self.gesture.action() != board.action() {
            log::debug!("Dropping stale {:?} gesture", self.gesture.action());
            self.reset(board);
        }
    }

    /// Abandon the current gesture. Elements a drag or resize moved go back.
    fn reset(&mut self, board: &mut Board) {
        if matches!(self.gesture, Gesture::Drag { .. } | Gesture::Resize { .. }) {
            board.cancel_gesture();
        }
        self.gesture = Gesture::Idle;
    }

    pub fn pointer_down(&mut self, board: &mut Board, event: PointerEvent) {
        self.sync(board);
        let point = event.position;
        let shift = event.modifiers.shift;

        if board.action() == Some(Action::Edit) {
            board.commit_edit();
        }

        if let Some(kind) = board.tool() {
            self.gesture = Gesture::Create(board.begin_create(kind, point));
            return;
        }

        match board.action() {
            Some(Action::Screenshot) => {
                let rect = SelectionRect::new(point);
                board.set_selection_region(Some(rect.to_rect()));
                self.gesture = Gesture::Screenshot(rect);
                board.notify();
                return;
            }
            Some(Action::Erase) => {
                self.gesture = Gesture::Erase {
                    ids: board.elements_at(point),
                };
                return;
            }
            // Panning wins over handles and elements, so a press never
            // replaces the persistent mode with a drag or resize.
            Some(Action::Move) => {
                self.gesture = Gesture::Pan {
                    last_screen: event.screen,
                };
                return;
            }
            _ => {}
        }

        if let Some((id, handle)) = board.handle_at(point) {
            if let Some(snapshot) = board.element(id).cloned() {
                if board.begin_gesture(vec![snapshot]) {
                    board.set_action(Some(Action::Resize));
                    self.gesture = Gesture::Resize {
                        origin: point,
                        handle,
                    };
                    return;
                }
            }
        }

        let mut hit = board.element_at(point);
        if hit.is_none() && board.active_group().is_some() {
            board.exit_group();
            hit = board.element_at(point);
        }

        if let Some(id) = hit {
            let selected = board.element(id).is_some_and(|e| e.selected);
            self.start_drag(board, point, id, selected, shift);
            return;
        }

        let rect = SelectionRect::new(point);
        board.clear_selection_silent();
        board.set_selection_region(Some(rect.to_rect()));
        board.set_action(Some(Action::Select));
        self.gesture = Gesture::Select(rect);
        board.notify();
    }

    fn start_drag(
        &mut self,
        board: &mut Board,
        origin: Point,
        id: ElementId,
        already_selected: bool,
        shift: bool,
    ) {
        let click = if already_selected {
            Some((id, shift))
        } else {
            board.click_select(id, shift);
            None
        };
        let snapshots = board
            .selected()
            .into_iter()
            .cloned()
            .collect::<Vec<Element>>();
        if !board.begin_gesture(snapshots) {
            // Shift-click removed the last selected element.
            board.notify();
            return;
        }
        board.set_action(Some(Action::Drag));
        self.gesture = Gesture::Drag {
            origin,
            click,
            moved: false,
        };
        board.notify();
    }

    pub fn pointer_move(&mut self, board: &mut Board, event: PointerEvent) {
        self.sync(board);
        let point = event.position;
        match &mut self.gesture {
            Gesture::Idle => return,
            Gesture::Create(handle) => {
                board.update_create(handle, point);
                return;
            }
            Gesture::Drag { origin, moved, .. } => {
                let delta = point - *origin;
                if delta != Vec2::ZERO {
                    *moved = true;
                }
                log::trace!("Drag by {delta:?}");
                board.drag_elements(delta);
            }
            Gesture::Resize { origin, handle } => {
                let delta = point - *origin;
                log::trace!("Resize {handle:?} by {delta:?}");
                board.resize_element(*handle, delta);
            }
            Gesture::Select(rect) | Gesture::Screenshot(rect) => {
                rect.current = point;
                board.set_selection_region(Some(rect.to_rect()));
            }
            Gesture::Pan { last_screen } => {
                let delta = event.screen - *last_screen;
                *last_screen = event.screen;
                board.pan(delta);
                return;
            }
            Gesture::Erase { ids } => {
                for id in board.elements_at(point) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
        }
        board.notify();
    }

    pub fn pointer_up(&mut self, board: &mut Board, event: PointerEvent) {
        self.sync(board);
        let point = event.position;
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Create(handle) => {
                board.update_create(&handle, point);
                board.finalize_create(handle);
            }
            Gesture::Drag { click, moved, .. } => {
                let recorded = if moved {
                    board.commit_gesture()
                } else {
                    board.cancel_gesture();
                    false
                };
                if let Some((id, shift)) = click.filter(|_| !recorded) {
                    board.click_select(id, shift);
                }
                board.end_action();
                board.notify();
            }
            Gesture::Resize { .. } => {
                board.commit_gesture();
                board.end_action();
                board.notify();
            }
            Gesture::Select(mut rect) => {
                rect.current = point;
                board.end_action();
                board.select_by_region(rect.to_rect());
            }
            Gesture::Screenshot(mut rect) => {
                rect.current = point;
                board.emit_screenshot(rect.to_rect());
                board.set_action(None);
                board.set_selection_region(None);
                board.notify();
            }
            Gesture::Pan { .. } => {}
            Gesture::Erase { ids } => {
                board.remove_elements(&ids);
            }
        }
    }

    /// Double click: edit text, or enter the clicked element's group.
    pub fn double_click(&mut self, board: &mut Board, event: PointerEvent) {
        self.sync(board);
        if self.is_active() {
            return;
        }
        let Some((id, kind, group)) = board
            .element_at(event.position)
            .and_then(|id| board.element(id))
            .map(|e| (e.id(), e.kind, e.group))
        else {
            return;
        };
        if kind == ElementKind::Text {
            board.begin_edit(id);
        } else if group.is_some() && board.active_group().is_none() {
            board.enter_group(id);
        }
    }

    /// Handle a key press. Returns whether it was consumed.
    pub fn key_down(&mut self, board: &mut Board, event: KeyEvent) -> bool {
        self.sync(board);
        let Some(command) = ShortcutRegistry::resolve(&event) else {
            return false;
        };

        if board.action() == Some(Action::Edit) {
            // Typing belongs to the text input; only Escape leaves it.
            if command == Command::Escape {
                board.commit_edit();
                return true;
            }
            return false;
        }

        log::debug!("Key command: {command:?}");
        match command {
            Command::Delete => board.delete_selected(),
            Command::Copy => {
                board.copy();
            }
            Command::Cut => {
                board.cut();
            }
            Command::Undo => {
                self.reset(board);
                board.undo();
            }
            Command::Redo => {
                self.reset(board);
                board.redo();
            }
            Command::SelectAll => board.select_all(),
            Command::Duplicate => board.duplicate_selected(),
            Command::Group => board.group_selected(),
            Command::Ungroup => board.ungroup_selected(),
            Command::Lock => board.lock_selected(),
            Command::ZoomIn => board.zoom_in(),
            Command::ZoomOut => board.zoom_out(),
            Command::ZoomReset => board.reset_view(),
            Command::Escape => {
                if board.action() == Some(Action::Screenshot) {
                    self.reset(board);
                    board.set_mode(None);
                }
                board.exit_group();
                board.clear_selection();
            }
            Command::Nudge { dx, dy, large } => {
                if self.is_active() || board.selected().is_empty() {
                    return false;
                }
                let step = if large {
                    board.config().grid_size
                } else {
                    board.config().nudge_step
                };
                board.nudge(f64::from(dx) * step, f64::from(dy) * step);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, Modifiers};

    fn at(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(Point::new(x, y))
    }

    fn click(handler: &mut EventHandler, board: &mut Board, x: f64, y: f64) {
        handler.pointer_down(board, at(x, y));
        handler.pointer_up(board, at(x, y));
    }

    fn drag(handler: &mut EventHandler, board: &mut Board, from: (f64, f64), to: (f64, f64)) {
        handler.pointer_down(board, at(from.0, from.1));
        handler.pointer_move(board, at(to.0, to.1));
        handler.pointer_up(board, at(to.0, to.1));
    }

    fn board_with_rect() -> (Board, ElementId) {
        let mut board = Board::default();
        let rect = Element::new(ElementKind::Rectangle).with_box(0.0, 0.0, 50.0, 50.0);
        let id = rect.id();
        board.add_elements(vec![rect]);
        (board, id)
    }

    #[test]
    fn test_create_with_tool() {
        let mut board = Board::default();
        let mut handler = EventHandler::new();
        board.set_tool(Some(ElementKind::Rectangle));
        drag(&mut handler, &mut board, (60.0, 40.0), (10.0, 10.0));

        assert_eq!(board.elements().len(), 1);
        let element = &board.elements()[0];
        assert!((element.x1 - 10.0).abs() < f64::EPSILON);
        assert!((element.x2 - 60.0).abs() < f64::EPSILON);
        assert!(element.selected);
        assert!(board.tool().is_none());
        assert!(board.action().is_none());
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_click_selects_and_empty_click_clears() {
        let (mut board, id) = board_with_rect();
        let mut handler = EventHandler::new();
        click(&mut handler, &mut board, 25.0, 25.0);
        assert_eq!(board.selected_ids(), vec![id]);
        assert_eq!(board.history().len(), 1);

        click(&mut handler, &mut board, 300.0, 300.0);
        assert!(board.selected().is_empty());
        assert!(board.action().is_none());
    }

    #[test]
    fn test_drag_records_one_update() {
        let (mut board, id) = board_with_rect();
        let mut handler = EventHandler::new();
        handler.pointer_down(&mut board, at(25.0, 25.0));
        handler.pointer_move(&mut board, at(30.0, 25.0));
        handler.pointer_move(&mut board, at(45.0, 35.0));
        handler.pointer_up(&mut board, at(45.0, 35.0));

        let element = board.element(id).unwrap();
        assert!((element.x1 - 20.0).abs() < f64::EPSILON);
        assert!((element.y1 - 10.0).abs() < f64::EPSILON);
        assert_eq!(board.history().len(), 2);

        board.undo();
        assert!((board.element(id).unwrap().x1 - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_snaps_to_grid() {
        let mut board = Board::new(crate::BoardConfig {
            snap_to_grid: true,
            ..Default::default()
        });
        let rect = Element::new(ElementKind::Rectangle).with_box(0.0, 0.0, 40.0, 40.0);
        let id = rect.id();
        board.add_elements(vec![rect]);
        let mut handler = EventHandler::new();
        drag(&mut handler, &mut board, (10.0, 10.0), (23.0, 41.0));
        let element = board.element(id).unwrap();
        assert!((element.x1 - 20.0).abs() < f64::EPSILON);
        assert!((element.y1 - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_by_corner_handle() {
        let (mut board, id) = board_with_rect();
        let mut handler = EventHandler::new();
        click(&mut handler, &mut board, 25.0, 25.0);
        drag(&mut handler, &mut board, (50.0, 50.0), (80.0, 70.0));

        let element = board.element(id).unwrap();
        assert!((element.x2 - 80.0).abs() < f64::EPSILON);
        assert!((element.y2 - 70.0).abs() < f64::EPSILON);
        assert!((element.x1 - 0.0).abs() < f64::EPSILON);
        assert_eq!(board.history().len(), 2);
    }

    #[test]
    fn test_marquee_selects() {
        let (mut board, id) = board_with_rect();
        let mut handler = EventHandler::new();
        handler.pointer_down(&mut board, at(100.0, 100.0));
        assert_eq!(board.action(), Some(Action::Select));
        handler.pointer_move(&mut board, at(40.0, 40.0));
        assert!(board.selection_region().is_some());
        handler.pointer_up(&mut board, at(40.0, 40.0));
        assert_eq!(board.selected_ids(), vec![id]);
        assert!(board.selection_region().is_none());
        assert!(board.action().is_none());
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut board, a) = board_with_rect();
        let b = Element::new(ElementKind::Ellipse).with_box(100.0, 0.0, 150.0, 50.0);
        let b_id = b.id();
        board.add_elements(vec![b]);
        let mut handler = EventHandler::new();
        let shift = |x, y| at(x, y).with_modifiers(Modifiers::SHIFT);

        click(&mut handler, &mut board, 25.0, 25.0);
        handler.pointer_down(&mut board, shift(125.0, 25.0));
        handler.pointer_up(&mut board, shift(125.0, 25.0));
        assert_eq!(board.selected_ids(), vec![a, b_id]);

        handler.pointer_down(&mut board, shift(25.0, 25.0));
        handler.pointer_up(&mut board, shift(25.0, 25.0));
        assert_eq!(board.selected_ids(), vec![b_id]);
    }

    #[test]
    fn test_plain_click_on_multi_selection_narrows() {
        let (mut board, a) = board_with_rect();
        let b = Element::new(ElementKind::Ellipse).with_box(100.0, 0.0, 150.0, 50.0);
        board.add_elements(vec![b]);
        board.select_all();
        let mut handler = EventHandler::new();
        click(&mut handler, &mut board, 25.0, 25.0);
        assert_eq!(board.selected_ids(), vec![a]);
    }

    #[test]
    fn test_pan_mode_persists() {
        let (mut board, id) = board_with_rect();
        let mut handler = EventHandler::new();
        board.set_mode(Some(Action::Move));
        drag(&mut handler, &mut board, (10.0, 10.0), (40.0, 30.0));
        assert_eq!(board.translate(), Vec2::new(30.0, 20.0));
        assert_eq!(board.action(), Some(Action::Move));
        // Pressing on an element pans instead of dragging it.
        assert!((board.element(id).unwrap().x1 - 0.0).abs() < f64::EPSILON);
        assert_eq!(board.history().len(), 1);

        // So does pressing on a selected element or its resize handle.
        board.select(id, false);
        drag(&mut handler, &mut board, (25.0, 25.0), (35.0, 25.0));
        drag(&mut handler, &mut board, (50.0, 50.0), (60.0, 50.0));
        let element = board.element(id).unwrap();
        assert!((element.x1 - 0.0).abs() < f64::EPSILON);
        assert!((element.x2 - 50.0).abs() < f64::EPSILON);
        assert_eq!(board.translate(), Vec2::new(50.0, 20.0));
        assert_eq!(board.action(), Some(Action::Move));
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_text_tool_enters_edit() {
        let mut board = Board::default();
        let mut handler = EventHandler::new();
        board.set_tool(Some(ElementKind::Text));
        click(&mut handler, &mut board, 10.0, 10.0);
        assert_eq!(board.action(), Some(Action::Edit));
        board.set_edit_text("hi");

        // Typing is not a shortcut while editing.
        assert!(!handler.key_down(&mut board, KeyEvent::new(Key::Delete)));
        assert!(handler.key_down(&mut board, KeyEvent::new(Key::Escape)));
        assert!(board.action().is_none());
        assert_eq!(board.elements()[0].text, "hi");
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_pointer_down_commits_edit() {
        let mut board = Board::default();
        let mut handler = EventHandler::new();
        board.set_tool(Some(ElementKind::Text));
        click(&mut handler, &mut board, 10.0, 10.0);
        board.set_edit_text("note");
        click(&mut handler, &mut board, 500.0, 500.0);
        assert_eq!(board.history().len(), 1);
        assert!(!board.elements()[0].editing);
    }

    #[test]
    fn test_double_click_text_and_group() {
        let mut board = Board::default();
        let mut text = Element::create(ElementKind::Text, board.defaults());
        text.text = "x".into();
        let text = text.with_box(0.0, 0.0, 20.0, 20.0);
        let group = uuid::Uuid::new_v4();
        let mut a = Element::new(ElementKind::Rectangle).with_box(100.0, 0.0, 120.0, 20.0);
        let mut b = Element::new(ElementKind::Rectangle).with_box(200.0, 0.0, 220.0, 20.0);
        a.group = Some(group);
        b.group = Some(group);
        let (text_id, a_id) = (text.id(), a.id());
        board.add_elements(vec![text, a, b]);
        let mut handler = EventHandler::new();

        handler.double_click(&mut board, at(10.0, 10.0));
        assert_eq!(board.active_element(), Some(text_id));
        assert_eq!(board.action(), Some(Action::Edit));
        board.commit_edit();

        handler.double_click(&mut board, at(110.0, 10.0));
        assert_eq!(board.active_group(), Some(group));
        assert_eq!(board.selected_ids(), vec![a_id]);

        handler.key_down(&mut board, KeyEvent::new(Key::Escape));
        assert!(board.active_group().is_none());
        assert!(board.selected().is_empty());
    }

    #[test]
    fn test_screenshot_emits_region() {
        use crate::BoardObserver;
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Shots(Rc<RefCell<Vec<Rect>>>);
        impl BoardObserver for Shots {
            fn on_screenshot(&mut self, region: Rect) {
                self.0.borrow_mut().push(region);
            }
        }

        let shots = Rc::new(RefCell::new(Vec::new()));
        let mut board = Board::default();
        board.set_observer(Shots(shots.clone()));
        board.set_mode(Some(Action::Screenshot));
        let mut handler = EventHandler::new();
        drag(&mut handler, &mut board, (50.0, 60.0), (10.0, 20.0));

        assert_eq!(*shots.borrow(), vec![Rect::new(10.0, 20.0, 50.0, 60.0)]);
        assert!(board.action().is_none());
    }

    #[test]
    fn test_erase_removes_in_one_entry() {
        let (mut board, a) = board_with_rect();
        let b = Element::new(ElementKind::Ellipse).with_box(100.0, 0.0, 150.0, 50.0);
        board.add_elements(vec![b]);
        board.set_mode(Some(Action::Erase));
        let mut handler = EventHandler::new();
        handler.pointer_down(&mut board, at(25.0, 25.0));
        handler.pointer_move(&mut board, at(125.0, 25.0));
        assert_eq!(handler.erase_candidates().len(), 2);
        handler.pointer_up(&mut board, at(125.0, 25.0));

        assert!(board.elements().is_empty());
        assert_eq!(board.history().len(), 3);
        assert_eq!(board.action(), Some(Action::Erase));
        board.undo();
        assert!(board.element(a).is_some());
    }

    #[test]
    fn test_undo_mid_drag_drops_gesture() {
        let (mut board, id) = board_with_rect();
        let mut handler = EventHandler::new();
        handler.pointer_down(&mut board, at(25.0, 25.0));
        handler.pointer_move(&mut board, at(35.0, 25.0));
        board.undo();
        handler.pointer_move(&mut board, at(45.0, 25.0));
        handler.pointer_up(&mut board, at(45.0, 25.0));
        assert!(board.element(id).is_none());
        assert!(!handler.is_active());
    }

    #[test]
    fn test_undo_key_mid_drag_puts_element_back() {
        let (mut board, a) = board_with_rect();
        let b = Element::new(ElementKind::Ellipse).with_box(200.0, 0.0, 250.0, 50.0);
        let b_id = b.id();
        board.add_elements(vec![b]);
        let mut handler = EventHandler::new();

        handler.pointer_down(&mut board, at(25.0, 25.0));
        handler.pointer_move(&mut board, at(125.0, 25.0));
        assert!((board.element(a).unwrap().x1 - 100.0).abs() < f64::EPSILON);
        assert!(handler.key_down(
            &mut board,
            KeyEvent::new(Key::char('z')).with_modifiers(Modifiers::CTRL)
        ));
        handler.pointer_up(&mut board, at(125.0, 25.0));

        assert!(board.element(b_id).is_none());
        assert!((board.element(a).unwrap().x1 - 0.0).abs() < f64::EPSILON);
        assert_eq!(board.history().len(), 2);
        assert_eq!(board.history().index(), 1);

        while !board.is_undo_disabled() {
            board.undo();
        }
        while !board.is_redo_disabled() {
            board.redo();
        }
        assert!((board.element(a).unwrap().x1 - 0.0).abs() < f64::EPSILON);
        assert!((board.element(b_id).unwrap().x1 - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_board_undo_mid_resize_puts_element_back() {
        let (mut board, a) = board_with_rect();
        board.add_elements(vec![
            Element::new(ElementKind::Ellipse).with_box(200.0, 0.0, 250.0, 50.0),
        ]);
        let mut handler = EventHandler::new();
        click(&mut handler, &mut board, 25.0, 25.0);

        handler.pointer_down(&mut board, at(50.0, 50.0));
        assert_eq!(board.action(), Some(Action::Resize));
        handler.pointer_move(&mut board, at(90.0, 90.0));
        board.undo();
        handler.pointer_move(&mut board, at(100.0, 100.0));
        handler.pointer_up(&mut board, at(100.0, 100.0));

        let element = board.element(a).unwrap();
        assert!((element.x2 - 50.0).abs() < f64::EPSILON);
        assert!((element.y2 - 50.0).abs() < f64::EPSILON);
        assert_eq!(board.history().len(), 2);
        assert!(!handler.is_active());
    }

    #[test]
    fn test_arrow_keys_nudge() {
        let (mut board, id) = board_with_rect();
        let mut handler = EventHandler::new();
        assert!(!handler.key_down(&mut board, KeyEvent::new(Key::ArrowRight)));
        board.select_all();
        for _ in 0..3 {
            handler.key_down(&mut board, KeyEvent::new(Key::ArrowRight));
        }
        handler.key_down(
            &mut board,
            KeyEvent::new(Key::ArrowDown).with_modifiers(Modifiers::SHIFT),
        );
        let element = board.element(id).unwrap();
        assert!((element.x1 - 3.0).abs() < f64::EPSILON);
        assert!((element.y1 - 20.0).abs() < f64::EPSILON);
        assert_eq!(board.history().len(), 3);
    }

    #[test]
    fn test_keyboard_delete_and_undo() {
        let (mut board, id) = board_with_rect();
        let mut handler = EventHandler::new();
        board.select_all();
        assert!(handler.key_down(&mut board, KeyEvent::new(Key::Backspace)));
        assert!(board.element(id).is_none());
        handler.key_down(
            &mut board,
            KeyEvent::new(Key::char('Z')).with_modifiers(Modifiers::CTRL),
        );
        assert!(board.element(id).is_some());
        handler.key_down(
            &mut board,
            KeyEvent::new(Key::char('y')).with_modifiers(Modifiers::CTRL),
        );
        assert!(board.element(id).is_none());
    }
}
