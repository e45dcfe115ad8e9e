//! R-tree spatial index over mark bounding boxes.
//!
//! Narrows hit testing from O(n) to O(log n) point queries. The index is a
//! candidate filter only: callers still run the precise tolerance-expanded
//! containment test, in z-order, on the returned ids.

use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A spatial entry for one mark's bounding box, keyed by runtime mark id.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub mark_id: u64,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl SpatialEntry {
    pub fn new(mark_id: u64, position: (i32, i32), size: (i32, i32)) -> Self {
        Self {
            mark_id,
            min_x: f64::from(position.0),
            min_y: f64::from(position.1),
            max_x: f64::from(position.0 + size.0),
            max_y: f64::from(position.1 + size.1),
        }
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.mark_id == other.mark_id
    }
}

/// Spatial index for marks using an R-tree.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<u64, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mark_id: u64, position: (i32, i32), size: (i32, i32)) {
        if let Some(old) = self.entries.remove(&mark_id) {
            self.tree.remove(&old);
        }
        let entry = SpatialEntry::new(mark_id, position, size);
        self.tree.insert(entry);
        self.entries.insert(mark_id, entry);
    }

    pub fn remove(&mut self, mark_id: u64) -> bool {
        if let Some(entry) = self.entries.remove(&mark_id) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    pub fn update(&mut self, mark_id: u64, position: (i32, i32), size: (i32, i32)) {
        self.insert(mark_id, position, size);
    }

    /// Ids of all marks whose bounds, expanded by `margin`, contain the
    /// given canvas point.
    pub fn query_point(&self, x: f64, y: f64, margin: f64) -> Vec<u64> {
        let probe = AABB::from_corners([x - margin, y - margin], [x + margin, y + margin]);
        self.tree
            .locate_in_envelope_intersecting(&probe)
            .map(|entry| entry.mark_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the whole index, e.g. after a load or undo restore.
    pub fn rebuild<I>(&mut self, marks: I)
    where
        I: Iterator<Item = (u64, (i32, i32), (i32, i32))>,
    {
        let entries: Vec<SpatialEntry> = marks
            .map(|(id, pos, size)| SpatialEntry::new(id, pos, size))
            .collect();
        self.entries = entries.iter().map(|e| (e.mark_id, *e)).collect();
        self.tree = RTree::bulk_load(entries);
    }
}
