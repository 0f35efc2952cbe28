//! Transition identity and rank classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a transition in the LTS arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionId(u32);

impl TransitionId {
    /// Create a handle from a raw arena index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// How a transition relates to the rank structure.
///
/// Assigned by the ranker; `Unvisited` transitions touch no reached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionClass {
    /// Not classified (source unreached).
    Unvisited,
    /// Tree edge between adjacent ranks.
    Forward,
    /// Edge between comrades of the same rank.
    Sideways,
    /// Edge back to an earlier rank (iterative ranking only).
    Backpointer,
    /// Begin and end are the same state.
    SelfLoop,
}

impl TransitionClass {
    /// Whether the transition goes against the rank tree.
    pub fn is_backpointer(&self) -> bool {
        matches!(self, Self::Backpointer)
    }
}

impl Default for TransitionClass {
    fn default() -> Self {
        Self::Unvisited
    }
}

impl fmt::Display for TransitionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unvisited => write!(f, "unvisited"),
            Self::Forward => write!(f, "forward"),
            Self::Sideways => write!(f, "sideways"),
            Self::Backpointer => write!(f, "backpointer"),
            Self::SelfLoop => write!(f, "self_loop"),
        }
    }
}
