//! Core types for the layout engine.

pub mod state;
pub mod transition;
pub mod cluster;
pub mod position;
pub mod slot;

pub use state::{StateId, StateLayout};
pub use transition::{TransitionId, TransitionClass};
pub use cluster::{Cluster, ClusterId};
pub use position::{Position, normalize_degrees, vector_to_degrees};
pub use slot::{Slot, SlotTable};
