//! Clusters of same-rank states.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::position::Position;
use super::slot::SlotTable;
use super::state::StateId;

/// Handle of a cluster in the layout arena.
///
/// Only valid for the ranking run that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(u32);

impl ClusterId {
    /// Create a handle from a raw arena index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A group of same-rank states drawn as one cone segment.
///
/// Geometry fields are zero until the geometry stage runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Arena handle.
    pub id: ClusterId,
    /// Rank shared by all member states.
    pub rank: usize,
    /// Member states.
    pub states: Vec<StateId>,
    /// Parent cluster one rank up (`None` only for the root).
    pub ancestor: Option<ClusterId>,
    /// Child clusters one rank down, sorted by volume once geometry ran.
    pub descendants: Vec<ClusterId>,
    /// Placement among the ancestor's descendants.
    pub position: Position,
    /// Radius of the top disc, sized by the member count.
    pub top_radius: f64,
    /// Radius of the base disc, where descendants attach.
    pub base_radius: f64,
    /// Horizontal extent of the whole subtree.
    pub size: f64,
    /// Volume of the cluster plus all its descendants.
    pub volume: f64,
    /// Some member has no outgoing transitions.
    pub has_deadlock: bool,
    /// Rim slots used by the state positioner.
    pub slots: SlotTable,
}

impl Cluster {
    /// Create an empty cluster at `rank`.
    pub fn new(id: ClusterId, rank: usize) -> Self {
        Self {
            id,
            rank,
            states: Vec::new(),
            ancestor: None,
            descendants: Vec::new(),
            position: Position::Centered,
            top_radius: 0.0,
            base_radius: 0.0,
            size: 0.0,
            volume: 0.0,
            has_deadlock: false,
            slots: SlotTable::default(),
        }
    }

    /// Number of member states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Number of child clusters.
    pub fn num_descendants(&self) -> usize {
        self.descendants.len()
    }

    /// Whether this cluster holds exactly one state.
    pub fn is_singleton(&self) -> bool {
        self.states.len() == 1
    }

    /// Whether this cluster has no ancestor.
    pub fn is_root(&self) -> bool {
        self.ancestor.is_none()
    }

    pub(crate) fn add_state(&mut self, state: StateId, deadlock: bool) {
        self.states.push(state);
        self.has_deadlock |= deadlock;
    }
}
