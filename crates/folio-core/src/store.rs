//! Ordered element storage with O(1) id lookup.

use crate::element::{Element, ElementId};
use std::collections::HashMap;

/// Elements in paint order (first = bottom) with an id index.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
    index: HashMap<ElementId, usize>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut store = Self {
            elements,
            index: HashMap::new(),
        };
        store.dedupe();
        store.reindex();
        store
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, element) in self.elements.iter().enumerate() {
            self.index.insert(element.id(), i);
        }
    }

    /// Drop later elements that reuse an earlier id.
    fn dedupe(&mut self) {
        let mut seen = std::collections::HashSet::new();
        let before = self.elements.len();
        self.elements.retain(|e| seen.insert(e.id()));
        if self.elements.len() != before {
            log::warn!("Dropped {} elements with duplicate ids", before - self.elements.len());
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.index.get(&id).map(|&i| &self.elements[i])
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.index.get(&id).map(|&i| &mut self.elements[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.elements.iter_mut()
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    /// Append elements on top of the paint order.
    ///
    /// Elements whose id is already present are skipped.
    pub fn push_back(&mut self, elements: impl IntoIterator<Item = Element>) {
        for element in elements {
            if self.contains(element.id()) {
                log::warn!("Skipping element with duplicate id {}", element.id());
                continue;
            }
            self.index.insert(element.id(), self.elements.len());
            self.elements.push(element);
        }
    }

    /// Insert elements at the bottom of the paint order, keeping their
    /// relative order.
    pub fn push_front(&mut self, elements: impl IntoIterator<Item = Element>) {
        let mut block: Vec<Element> = Vec::new();
        for element in elements {
            if self.contains(element.id()) || block.iter().any(|e| e.id() == element.id()) {
                log::warn!("Skipping element with duplicate id {}", element.id());
                continue;
            }
            block.push(element);
        }
        if block.is_empty() {
            return;
        }
        self.elements.splice(0..0, block);
        self.reindex();
    }

    /// Remove elements by id, returning the removed ones in paint order.
    pub fn remove(&mut self, ids: &[ElementId]) -> Vec<Element> {
        if !ids.iter().any(|id| self.contains(*id)) {
            return Vec::new();
        }
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.elements.len());
        for element in self.elements.drain(..) {
            if ids.contains(&element.id()) {
                removed.push(element);
            } else {
                kept.push(element);
            }
        }
        self.elements = kept;
        self.reindex();
        removed
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.index.clear();
    }

    pub fn into_vec(self) -> Vec<Element> {
        self.elements
    }
}

impl<'a> IntoIterator for &'a ElementStore {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn ids(store: &ElementStore) -> Vec<ElementId> {
        store.iter().map(Element::id).collect()
    }

    #[test]
    fn test_push_and_lookup() {
        let a = Element::new(ElementKind::Rectangle);
        let b = Element::new(ElementKind::Ellipse);
        let mut store = ElementStore::new();
        store.push_back([a.clone(), b.clone()]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b.id()).map(|e| e.kind), Some(ElementKind::Ellipse));
        assert_eq!(ids(&store), vec![a.id(), b.id()]);
    }

    #[test]
    fn test_push_front_keeps_block_order() {
        let a = Element::new(ElementKind::Rectangle);
        let b = Element::new(ElementKind::Rectangle);
        let c = Element::new(ElementKind::Rectangle);
        let mut store = ElementStore::from_elements(vec![a.clone()]);
        store.push_front([b.clone(), c.clone()]);
        assert_eq!(ids(&store), vec![b.id(), c.id(), a.id()]);
        assert!(store.get(a.id()).is_some());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let a = Element::new(ElementKind::Rectangle);
        let mut store = ElementStore::new();
        store.push_back([a.clone(), a.clone()]);
        store.push_front([a.clone()]);
        assert_eq!(store.len(), 1);
        let loaded = ElementStore::from_elements(vec![a.clone(), a]);
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_remove_reindexes() {
        let a = Element::new(ElementKind::Rectangle);
        let b = Element::new(ElementKind::Rectangle);
        let c = Element::new(ElementKind::Rectangle);
        let mut store = ElementStore::from_elements(vec![a.clone(), b.clone(), c.clone()]);
        let removed = store.remove(&[a.id(), Element::new(ElementKind::Line).id()]);
        assert_eq!(removed.len(), 1);
        assert_eq!(store.get(c.id()).map(Element::id), Some(c.id()));
        assert!(store.get(a.id()).is_none());
        assert!(store.remove(&[a.id()]).is_empty());
    }
}
