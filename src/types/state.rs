//! State identity and per-state layout data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::cluster::ClusterId;
use super::position::Position;

/// Handle of a state in the LTS arena.
///
/// Dense index, ordered by insertion for deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(u32);

impl StateId {
    /// Create a handle from a raw arena index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl From<u32> for StateId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Layout data derived for one state.
///
/// Everything here is recomputed on every ranking run. A state that is
/// never reached keeps `rank == None` and `cluster == None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateLayout {
    /// Breadth-first layer, `None` if unreached.
    pub rank: Option<usize>,
    /// Owning cluster.
    pub cluster: Option<ClusterId>,
    /// Angle on the owning cluster's rim, or centered.
    pub position: Position,
    /// Slot index in the owning cluster's slot table, for rim positions.
    pub slot: Option<usize>,
    /// Tree-edge neighbours one rank up.
    pub superiors: BTreeSet<StateId>,
    /// Tree-edge neighbours one rank down.
    pub subordinates: BTreeSet<StateId>,
    /// Same-rank neighbours.
    pub comrades: BTreeSet<StateId>,
    /// No outgoing transitions.
    pub deadlock: bool,
}

impl StateLayout {
    /// Fresh, unranked layout record.
    pub fn new(deadlock: bool) -> Self {
        Self {
            rank: None,
            cluster: None,
            position: Position::Centered,
            slot: None,
            superiors: BTreeSet::new(),
            subordinates: BTreeSet::new(),
            comrades: BTreeSet::new(),
            deadlock,
        }
    }

    /// Whether the ranker reached this state.
    pub fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }

    /// Center the state, releasing any slot reference.
    pub(crate) fn center(&mut self) {
        self.position = Position::Centered;
        self.slot = None;
    }
}
