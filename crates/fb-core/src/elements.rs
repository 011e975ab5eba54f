//! Ordered element storage for a single form.
//!
//! Every element carries an explicit `position`. After any mutation the
//! positions of a form's elements are exactly `0..len`: dense, unique and
//! zero-based. Storage order is insertion order; `ordered()` is the render
//! order.

use crate::id::ElementId;
use crate::model::{ElementPatch, FormElement};
use serde::{Deserialize, Serialize};

/// Suffix appended to the label of a duplicated element.
pub const COPY_SUFFIX: &str = " (Copy)";

/// The elements of one form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementList {
    items: Vec<FormElement>,
}

impl ElementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&FormElement> {
        self.items.iter().find(|el| el.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Elements in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &FormElement> {
        self.items.iter()
    }

    /// Elements sorted ascending by position, the render and export order.
    pub fn ordered(&self) -> Vec<&FormElement> {
        let mut view: Vec<&FormElement> = self.items.iter().collect();
        view.sort_by_key(|el| el.position);
        view
    }

    /// Insert `element` at `position` (clamped to `0..=len`), or append when `None`.
    /// Elements at or after the slot shift up by one. Returns the slot used.
    pub fn insert(&mut self, mut element: FormElement, position: Option<usize>) -> usize {
        let len = self.items.len();
        let slot = position.map_or(len, |p| p.min(len));
        for el in &mut self.items {
            if el.position >= slot {
                el.position += 1;
            }
        }
        element.position = slot;
        self.items.push(element);
        slot
    }

    /// Merge `patch` into an element's properties. `None` if not found.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> Option<&FormElement> {
        let el = self.items.iter_mut().find(|el| el.id == id)?;
        patch.apply(el);
        Some(&*el)
    }

    /// Swap in new kind and properties for an existing element, keeping its
    /// id and position. Returns the previous element.
    pub fn replace(&mut self, element: FormElement) -> Option<FormElement> {
        let el = self.items.iter_mut().find(|el| el.id == element.id)?;
        let position = el.position;
        let previous = std::mem::replace(el, element);
        el.position = position;
        Some(previous)
    }

    /// Delete an element and close the gap it leaves. Returns the removed element.
    pub fn remove(&mut self, id: ElementId) -> Option<FormElement> {
        let idx = self.items.iter().position(|el| el.id == id)?;
        let removed = self.items.remove(idx);
        for el in &mut self.items {
            if el.position > removed.position {
                el.position -= 1;
            }
        }
        Some(removed)
    }

    /// Move an element to `position` (clamped to `0..len`), shifting the
    /// elements in between by one slot. Returns `(old, new)` positions.
    pub fn move_to(&mut self, id: ElementId, position: usize) -> Option<(usize, usize)> {
        let old = self.get(id)?.position;
        let new = position.min(self.items.len().saturating_sub(1));
        for el in &mut self.items {
            if el.id == id {
                el.position = new;
            } else if old < new && el.position > old && el.position <= new {
                el.position -= 1;
            } else if old > new && el.position >= new && el.position < old {
                el.position += 1;
            }
        }
        Some((old, new))
    }

    /// Clone an element directly after itself under `copy_id`, with its label
    /// marked as a copy. Returns the clone.
    pub fn duplicate(&mut self, id: ElementId, copy_id: ElementId) -> Option<&FormElement> {
        let source = self.get(id)?;
        let mut copy = source.clone();
        copy.id = copy_id;
        copy.props.label.push_str(COPY_SUFFIX);
        let slot = source.position + 1;
        for el in &mut self.items {
            if el.position >= slot {
                el.position += 1;
            }
        }
        copy.position = slot;
        self.items.push(copy);
        self.items.last()
    }

    /// Whether positions are exactly `0..len`.
    pub fn is_dense(&self) -> bool {
        let mut seen = vec![false; self.items.len()];
        for el in &self.items {
            match seen.get_mut(el.position) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Re-rank positions to `0..len`, keeping the existing relative order
    /// (ties broken by storage order). Returns `true` if anything changed.
    pub fn normalize(&mut self) -> bool {
        if self.is_dense() {
            return false;
        }
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by_key(|&i| self.items[i].position);
        for (rank, i) in order.into_iter().enumerate() {
            self.items[i].position = rank;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, ElementProps};
    use pretty_assertions::assert_eq;

    fn el(label: &str) -> FormElement {
        FormElement::new(
            ElementId::intern(&format!("elements-test-{label}")),
            ElementKind::Text,
            ElementProps {
                label: label.to_string(),
                ..ElementProps::default()
            },
        )
    }

    fn id(label: &str) -> ElementId {
        ElementId::intern(&format!("elements-test-{label}"))
    }

    fn list(labels: &[&str]) -> ElementList {
        let mut list = ElementList::new();
        for l in labels {
            list.insert(el(l), None);
        }
        list
    }

    fn labels(list: &ElementList) -> Vec<String> {
        list.ordered().iter().map(|e| e.label().to_string()).collect()
    }

    #[test]
    fn append_assigns_next_position() {
        let list = list(&["A", "B", "C"]);
        assert_eq!(labels(&list), ["A", "B", "C"]);
        assert!(list.is_dense());
    }

    #[test]
    fn insert_clamps_past_end() {
        let mut list = list(&["A"]);
        let slot = list.insert(el("Z"), Some(99));
        assert_eq!(slot, 1);
        assert_eq!(labels(&list), ["A", "Z"]);
    }

    #[test]
    fn move_forward_shifts_down() {
        let mut list = list(&["A", "B", "C", "D"]);
        assert_eq!(list.move_to(id("A"), 2), Some((0, 2)));
        assert_eq!(labels(&list), ["B", "C", "A", "D"]);
        assert!(list.is_dense());
    }

    #[test]
    fn move_clamps_to_last_slot() {
        let mut list = list(&["A", "B", "C"]);
        assert_eq!(list.move_to(id("A"), 10), Some((0, 2)));
        assert_eq!(labels(&list), ["B", "C", "A"]);
        assert!(list.is_dense());
    }

    #[test]
    fn move_to_same_slot_is_stable() {
        let mut list = list(&["A", "B"]);
        assert_eq!(list.move_to(id("B"), 1), Some((1, 1)));
        assert_eq!(labels(&list), ["A", "B"]);
    }

    #[test]
    fn missing_ids_are_noops() {
        let mut list = list(&["A"]);
        let before = list.clone();
        let ghost = ElementId::intern("elements-test-ghost");
        assert!(list.remove(ghost).is_none());
        assert!(list.move_to(ghost, 0).is_none());
        assert!(list.duplicate(ghost, ElementId::generate()).is_none());
        assert!(list.update(ghost, &ElementPatch::default()).is_none());
        assert_eq!(list, before);
    }

    #[test]
    fn replace_keeps_position() {
        let mut list = list(&["A", "B"]);
        let mut changed = el("B2");
        changed.id = id("B");
        changed.position = 7;
        let prev = list.replace(changed).unwrap();
        assert_eq!(prev.label(), "B");
        assert_eq!(list.get(id("B")).unwrap().position, 1);
        assert_eq!(labels(&list), ["A", "B2"]);
    }

    #[test]
    fn normalize_reranks_gaps_and_duplicates() {
        let mut list = list(&["A", "B", "C"]);
        list.items[0].position = 5;
        list.items[1].position = 5;
        list.items[2].position = 1;
        assert!(!list.is_dense());
        assert!(list.normalize());
        assert!(list.is_dense());
        assert_eq!(labels(&list), ["C", "A", "B"]);
        assert!(!list.normalize());
    }
}
