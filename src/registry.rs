//! Ordered mark collection with selection, z-order, and clipboard.
//!
//! Marks are stored in insertion order; layer order is the `z` field and is
//! independent of it. Persistence and all public operations reference marks
//! by index. Runtime ids exist only to key the spatial index.

use crate::constants::{CLICK_TOLERANCE, PASTE_OFFSET};
use crate::spatial_index::SpatialIndex;
use crate::transform::hit_tolerance;
use crate::types::{Mark, MarkKind};

#[derive(Default)]
pub struct MarkRegistry {
    marks: Vec<Mark>,
    selected: Option<usize>,
    active: Option<usize>,
    clipboard: Option<Mark>,
    next_mark_id: u64,
    index: SpatialIndex,
}

impl MarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Mark> {
        self.marks.get(index)
    }

    /// Mutable access for gesture updates. The spatial index is refreshed
    /// lazily via [`sync_index`](Self::sync_index) when the gesture commits,
    /// not on every move event.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Mark> {
        self.marks.get_mut(index)
    }

    /// Refresh the spatial index entry for one mark after its geometry
    /// changed.
    pub fn sync_index(&mut self, index: usize) {
        if let Some(mark) = self.marks.get(index) {
            self.index
                .update(mark.id, (mark.x, mark.y), (mark.width, mark.height));
        }
    }

    // ========================================================================
    // Collection operations
    // ========================================================================

    /// Append a mark, assigning its runtime id. Returns the new index.
    pub fn add(&mut self, mut mark: Mark) -> usize {
        self.next_mark_id += 1;
        mark.id = self.next_mark_id;
        self.index
            .insert(mark.id, (mark.x, mark.y), (mark.width, mark.height));
        self.marks.push(mark);
        self.marks.len() - 1
    }

    /// Create and append a mark of the given kind at a canvas position.
    /// Called by the placement UI when a placement action commits.
    pub fn add_mark(&mut self, kind: MarkKind, x: i32, y: i32) -> usize {
        self.add(Mark::new(kind, x, y))
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Mark> {
        if index >= self.marks.len() {
            return None;
        }
        let mark = self.marks.remove(index);
        self.index.remove(mark.id);

        // Indices above the removal point shift down by one
        self.selected = adjust_after_removal(self.selected, index);
        self.active = adjust_after_removal(self.active, index);
        Some(mark)
    }

    /// Set the layer order of a mark.
    pub fn move_z(&mut self, index: usize, new_z: i32) {
        if let Some(mark) = self.marks.get_mut(index) {
            mark.z = new_z;
        }
    }

    /// Indices in paint order: ascending z, ties broken by insertion order.
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.marks.len()).collect();
        order.sort_by_key(|&i| self.marks[i].z);
        order
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.marks.len());
    }

    pub fn activate(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| i < self.marks.len());
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    pub fn clipboard(&self) -> Option<&Mark> {
        self.clipboard.as_ref()
    }

    pub fn set_clipboard(&mut self, mark: Option<Mark>) {
        self.clipboard = mark;
    }

    /// Copy a mark into the single-slot clipboard by value.
    pub fn copy_to_clipboard(&mut self, index: usize) -> bool {
        match self.marks.get(index) {
            Some(mark) => {
                self.clipboard = Some(mark.clone());
                true
            }
            None => false,
        }
    }

    /// Paste the clipboard mark as a fresh value copy. With an explicit
    /// position the copy lands there; otherwise it is offset slightly from
    /// the clipboard source so the paste is visibly distinct.
    pub fn paste_from_clipboard(&mut self, position: Option<(i32, i32)>) -> Option<usize> {
        let mut copy = self.clipboard.clone()?;
        match position {
            Some((x, y)) => {
                copy.x = x;
                copy.y = y;
            }
            None => {
                copy.x += PASTE_OFFSET.0;
                copy.y += PASTE_OFFSET.1;
            }
        }
        Some(self.add(copy))
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    /// Top-most mark whose tolerance-expanded bounds contain the canvas
    /// point. Candidates come from the spatial index; the precise check runs
    /// in reverse registry order so the most recently drawn mark wins
    /// overlapping clicks.
    pub fn hit_test(&self, cx: i32, cy: i32, zoom: f64) -> Option<usize> {
        let margin = f64::from(CLICK_TOLERANCE).max(hit_tolerance(zoom));
        let candidates = self.index.query_point(f64::from(cx), f64::from(cy), margin);
        if candidates.is_empty() {
            return None;
        }

        self.marks
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, mark)| candidates.contains(&mark.id))
            .find(|(_, mark)| mark.contains(cx, cy, CLICK_TOLERANCE))
            .map(|(i, _)| i)
    }

    // ========================================================================
    // Snapshot restore
    // ========================================================================

    /// Replace the whole mark list, e.g. from an undo snapshot or a loaded
    /// project. Runtime ids are reassigned and the spatial index rebuilt.
    pub fn restore(&mut self, marks: Vec<Mark>) {
        self.marks = marks;
        for mark in &mut self.marks {
            self.next_mark_id += 1;
            mark.id = self.next_mark_id;
        }
        self.index.rebuild(
            self.marks
                .iter()
                .map(|m| (m.id, (m.x, m.y), (m.width, m.height))),
        );
        self.selected = self.selected.filter(|&i| i < self.marks.len());
        self.active = self.active.filter(|&i| i < self.marks.len());
    }

    /// Value copy of the current mark list, for undo snapshots.
    pub fn snapshot_marks(&self) -> Vec<Mark> {
        self.marks.clone()
    }
}

fn adjust_after_removal(slot: Option<usize>, removed: usize) -> Option<usize> {
    match slot {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}
