//! Rim slot bookkeeping for collision avoidance.
//!
//! A cluster's rim is cut into equal angular buckets, each wide enough for
//! one state disc. States placed on the rim occupy the bucket containing
//! their angle; states without a preferred direction are parked in
//! `undecided` until slot resolution hands them a free bucket.

use serde::{Deserialize, Serialize};

use super::state::StateId;

/// One angular bucket on a cluster rim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// States placed in this bucket, in placement order.
    pub occupants: Vec<StateId>,
}

impl Slot {
    /// Number of states in this bucket.
    pub fn occupancy(&self) -> usize {
        self.occupants.len()
    }

    /// Whether nothing occupies this bucket.
    pub fn is_free(&self) -> bool {
        self.occupants.is_empty()
    }
}

/// Slot table of a single cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTable {
    slots: Vec<Slot>,
    undecided: Vec<StateId>,
}

impl SlotTable {
    /// Create a table with `count` buckets (at least one).
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![Slot::default(); count.max(1)],
            undecided: Vec::new(),
        }
    }

    /// Size a table so that each bucket fits one state disc on a rim of
    /// `rim_radius`, with at least one bucket per member state.
    pub fn for_rim(rim_radius: f64, state_radius: f64, members: usize) -> Self {
        let fit = (std::f64::consts::PI * rim_radius / state_radius).floor();
        let count = if fit.is_finite() && fit >= 1.0 { fit as usize } else { 1 };
        Self::new(count.max(members))
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; a table has at least one bucket.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Angular width of one bucket in degrees.
    pub fn width(&self) -> f64 {
        360.0 / self.slots.len() as f64
    }

    /// Bucket containing `degrees` (expected in `[0, 360)`).
    pub fn index_of(&self, degrees: f64) -> usize {
        let raw = (degrees / self.width()).floor();
        if raw.is_finite() && raw >= 0.0 {
            (raw as usize) % self.slots.len()
        } else {
            0
        }
    }

    /// Center angle of a bucket in degrees.
    pub fn center_of(&self, index: usize) -> f64 {
        (index as f64 + 0.5) * self.width()
    }

    /// Place `state` in the bucket containing `degrees`; returns the index.
    pub fn occupy(&mut self, degrees: f64, state: StateId) -> usize {
        let index = self.index_of(degrees);
        self.slots[index].occupants.push(state);
        index
    }

    /// Place `state` directly in bucket `index`.
    pub fn occupy_index(&mut self, index: usize, state: StateId) {
        self.slots[index].occupants.push(state);
    }

    /// Remove `state` from bucket `index`.
    pub fn release(&mut self, index: usize, state: StateId) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.occupants.retain(|s| *s != state);
        }
    }

    /// Bucket by index.
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// All buckets.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Free bucket closest to `index`, searching outward alternately
    /// clockwise then counter-clockwise.
    pub fn nearest_free(&self, index: usize) -> Option<usize> {
        let n = self.slots.len();
        for step in 1..=n / 2 {
            let up = (index + step) % n;
            if self.slots[up].is_free() {
                return Some(up);
            }
            let down = (index + n - step) % n;
            if self.slots[down].is_free() {
                return Some(down);
            }
        }
        None
    }

    /// Bucket with the fewest occupants, lowest index on ties.
    pub fn least_occupied(&self) -> usize {
        self.slots
            .iter()
            .enumerate()
            .min_by_key(|(i, s)| (s.occupancy(), *i))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Indices of buckets holding more than one state.
    pub fn crowded(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.occupancy() > 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// Register a state that still lacks a rim position.
    pub fn consider(&mut self, state: StateId) {
        if !self.undecided.contains(&state) {
            self.undecided.push(state);
        }
    }

    /// States registered with [`Self::consider`], in registration order.
    pub fn undecided(&self) -> &[StateId] {
        &self.undecided
    }

    /// Take the undecided registrations, leaving the list empty.
    pub fn take_undecided(&mut self) -> Vec<StateId> {
        std::mem::take(&mut self.undecided)
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new(1)
    }
}
