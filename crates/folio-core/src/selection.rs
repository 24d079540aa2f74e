//! Selection state over an [`ElementStore`].
//!
//! Selection lives in the elements' `selected` flags. Locked elements are
//! never selected. Without an active group, selecting a grouped element
//! selects its whole group; with one, only that group's members take part.

use crate::element::{Element, ElementId, GroupId};
use crate::store::ElementStore;
use kurbo::{Point, Rect};
use std::collections::HashSet;

/// Currently selected elements, in paint order.
pub fn selected(store: &ElementStore) -> Vec<&Element> {
    store.iter().filter(|e| e.selected).collect()
}

pub fn selected_ids(store: &ElementStore) -> Vec<ElementId> {
    store.iter().filter(|e| e.selected).map(Element::id).collect()
}

pub fn has_selection(store: &ElementStore) -> bool {
    store.iter().any(|e| e.selected)
}

/// Deselect everything. Editing implies selection, so it is cleared too.
pub fn clear_selection(store: &mut ElementStore) {
    for element in store.iter_mut() {
        element.selected = false;
        element.editing = false;
    }
}

/// Deep copies of the selected elements, taken as a gesture's origin.
pub fn snapshot_selected(store: &ElementStore) -> Vec<Element> {
    store.iter().filter(|e| e.selected).cloned().collect()
}

fn selectable(element: &Element, active_group: Option<GroupId>) -> bool {
    !element.locked && active_group.is_none_or(|group| element.group == Some(group))
}

/// Select exactly the elements whose bounds intersect `region`.
pub fn select_by_region(store: &mut ElementStore, region: Rect, active_group: Option<GroupId>) {
    for element in store.iter_mut() {
        element.selected = selectable(element, active_group) && element.intersects(region);
        if !element.selected {
            element.editing = false;
        }
    }
    if active_group.is_none() {
        expand_groups(store);
    }
}

/// Select every sibling of a selected grouped element.
pub fn expand_groups(store: &mut ElementStore) {
    let groups: HashSet<GroupId> = store
        .iter()
        .filter(|e| e.selected)
        .filter_map(|e| e.group)
        .collect();
    if groups.is_empty() {
        return;
    }
    for element in store.iter_mut() {
        if !element.locked && element.group.is_some_and(|g| groups.contains(&g)) {
            element.selected = true;
        }
    }
}

/// Select every selectable element.
pub fn select_all(store: &mut ElementStore, active_group: Option<GroupId>) {
    for element in store.iter_mut() {
        element.selected = selectable(element, active_group);
    }
}

/// Apply click-selection rules to the element with `id`.
///
/// A plain click replaces the selection; a shift click toggles the element
/// (and its group, outside an active group) without touching the rest.
pub fn click_select(
    store: &mut ElementStore,
    id: ElementId,
    shift: bool,
    active_group: Option<GroupId>,
) {
    let Some(element) = store.get(id) else {
        return;
    };
    if !selectable(element, active_group) {
        return;
    }
    let group = if active_group.is_none() { element.group } else { None };
    let targets: Vec<ElementId> = match group {
        Some(group) => store
            .iter()
            .filter(|e| e.group == Some(group) && !e.locked)
            .map(Element::id)
            .collect(),
        None => vec![id],
    };

    if shift {
        let select = !store.get(id).is_some_and(|e| e.selected);
        for target in targets {
            if let Some(element) = store.get_mut(target) {
                element.selected = select;
                if !select {
                    element.editing = false;
                }
            }
        }
    } else {
        clear_selection(store);
        for target in targets {
            if let Some(element) = store.get_mut(target) {
                element.selected = true;
            }
        }
    }
}

/// Topmost selectable element under `point`.
pub fn element_at_point(
    store: &ElementStore,
    point: Point,
    tolerance: f64,
    active_group: Option<GroupId>,
) -> Option<ElementId> {
    store
        .iter()
        .rev()
        .find(|e| selectable(e, active_group) && e.hit_test(point, tolerance))
        .map(Element::id)
}

/// Ids of every unlocked element under `point`.
pub fn elements_at_point(store: &ElementStore, point: Point, tolerance: f64) -> Vec<ElementId> {
    store
        .iter()
        .filter(|e| !e.locked && e.hit_test(point, tolerance))
        .map(Element::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use uuid::Uuid;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
        Element::new(ElementKind::Rectangle).with_box(x1, y1, x2, y2)
    }

    #[test]
    fn test_select_by_region() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 20.0, 30.0, 30.0);
        let mut store = ElementStore::from_elements(vec![a.clone(), b.clone()]);

        select_by_region(&mut store, Rect::new(5.0, 5.0, 25.0, 25.0), None);
        assert_eq!(selected_ids(&store), vec![a.id(), b.id()]);

        select_by_region(&mut store, Rect::new(100.0, 100.0, 110.0, 110.0), None);
        assert!(!has_selection(&store));
    }

    #[test]
    fn test_region_selects_whole_group() {
        let group = Uuid::new_v4();
        let mut a = rect(0.0, 0.0, 10.0, 10.0);
        let mut b = rect(200.0, 200.0, 210.0, 210.0);
        a.group = Some(group);
        b.group = Some(group);
        let mut store = ElementStore::from_elements(vec![a, b]);

        select_by_region(&mut store, Rect::new(0.0, 0.0, 5.0, 5.0), None);
        assert_eq!(selected(&store).len(), 2);

        select_by_region(&mut store, Rect::new(0.0, 0.0, 5.0, 5.0), Some(group));
        assert_eq!(selected(&store).len(), 1);
    }

    #[test]
    fn test_locked_never_selected() {
        let mut locked = rect(0.0, 0.0, 10.0, 10.0);
        locked.locked = true;
        let mut store = ElementStore::from_elements(vec![locked]);
        select_by_region(&mut store, Rect::new(0.0, 0.0, 50.0, 50.0), None);
        select_all(&mut store, None);
        assert!(!has_selection(&store));
        assert!(element_at_point(&store, Point::new(5.0, 5.0), 0.0, None).is_none());
    }

    #[test]
    fn test_click_and_shift_click() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 0.0, 30.0, 10.0);
        let mut store = ElementStore::from_elements(vec![a.clone(), b.clone()]);

        click_select(&mut store, a.id(), false, None);
        click_select(&mut store, b.id(), true, None);
        assert_eq!(selected_ids(&store), vec![a.id(), b.id()]);

        click_select(&mut store, a.id(), true, None);
        assert_eq!(selected_ids(&store), vec![b.id()]);

        click_select(&mut store, a.id(), false, None);
        assert_eq!(selected_ids(&store), vec![a.id()]);
    }

    #[test]
    fn test_topmost_hit_wins() {
        let below = rect(0.0, 0.0, 10.0, 10.0);
        let above = rect(5.0, 5.0, 15.0, 15.0);
        let store = ElementStore::from_elements(vec![below.clone(), above.clone()]);
        assert_eq!(
            element_at_point(&store, Point::new(7.0, 7.0), 0.0, None),
            Some(above.id())
        );
        assert_eq!(
            element_at_point(&store, Point::new(2.0, 2.0), 0.0, None),
            Some(below.id())
        );
        assert_eq!(elements_at_point(&store, Point::new(7.0, 7.0), 0.0).len(), 2);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let mut store = ElementStore::from_elements(vec![a.clone()]);
        select_all(&mut store, None);
        let snapshot = snapshot_selected(&store);
        if let Some(element) = store.get_mut(a.id()) {
            element.x1 = 50.0;
        }
        assert!((snapshot[0].x1 - 0.0).abs() < f64::EPSILON);
    }
}
