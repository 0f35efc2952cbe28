//! # lts-layout
//!
//! Structuring and 3D cone-tree layout for labeled transition systems.
//!
//! The engine answers one question:
//!
//! > Given an LTS and its initial state, where does every state go?
//!
//! ## Core Contract
//!
//! 1. Rank states by breadth-first distance from the initial state
//! 2. Group each rank into clusters of comrades and merge them into a tree
//! 3. Size every cluster as a cone segment and place descendants on the rim
//! 4. Give every state an angle (or the axis) inside its cluster
//! 5. Export the result with a deterministic `layout_id`
//!
//! ## Architecture
//!
//! ```text
//! Lts → LayoutEngine::apply → Layout → LayoutExport → LayoutFingerprint
//!              ↑
//!        LayoutConfig (RankStyle + geometry parameters)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same LTS + same config → identical `layout_id`
//! - Rank members are ordered by discovery, clusters by rank
//! - Relations are kept in ordered sets

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod lts;
pub mod config;
pub mod canonical;
pub mod layout;
pub mod engine;
pub mod export;

// Re-exports
pub use types::{
    Cluster, ClusterId, Position, Slot, SlotTable, StateId, StateLayout, TransitionClass,
    TransitionId,
};
pub use lts::{Lts, LtsError, State, Transition};
pub use config::{ConfigError, LayoutConfig, RankStyle};
pub use canonical::{fingerprint, fingerprint_hex};
pub use layout::{arrange_descendants, ChildGeometry, DescendantArrangement, Layout};
pub use engine::{LayoutEngine, LayoutError};
pub use export::{
    ClusterRecord, LayoutExport, LayoutFingerprint, LayoutSummary, StateRecord, TransitionRecord,
};

/// Schema version of the exported layout.
/// Increment on breaking changes to any export type.
pub const LAYOUT_SCHEMA_VERSION: &str = "1.0.0";

/// Default config version identifier.
pub const DEFAULT_CONFIG_VERSION: &str = "layout_config_v1";
