//! Layout export.
//!
//! Flattens a [`Layout`] into plain records for a renderer and fingerprints
//! it.
//!
//! ## Determinism
//!
//! `layout_id` is computed over quantized floats (see
//! [`LayoutConfig::params_hash`]), so the same LTS laid out with the same
//! parameters always yields the same fingerprint.

use serde::{Deserialize, Serialize};

use crate::canonical::fingerprint_hex;
use crate::config::{quantize_float, LayoutConfig, RankStyle};
use crate::layout::Layout;
use crate::lts::Lts;
use crate::types::{ClusterId, Position, StateId, TransitionClass, TransitionId};
use crate::LAYOUT_SCHEMA_VERSION;

/// Fingerprint of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutFingerprint(String);

impl LayoutFingerprint {
    /// Create a fingerprint from a hash string.
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the fingerprint as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LayoutFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counts for status display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSummary {
    /// Number of ranks.
    pub num_ranks: usize,
    /// Number of clusters.
    pub num_clusters: usize,
    /// States reached from the initial state.
    pub num_states: usize,
    /// States not reached.
    pub num_unreached: usize,
    /// Transitions in the LTS.
    pub num_transitions: usize,
    /// Reached states without outgoing transitions.
    pub num_deadlocks: usize,
    /// Transitions classified as backpointers.
    pub num_backpointers: usize,
}

impl LayoutSummary {
    /// Count what `layout` derived from `lts`.
    pub fn from_layout(lts: &Lts, layout: &Layout) -> Self {
        let num_states = layout.states().iter().filter(|s| s.is_ranked()).count();
        Self {
            num_ranks: layout.num_ranks(),
            num_clusters: layout.num_clusters(),
            num_states,
            num_unreached: lts.num_states() - num_states.min(lts.num_states()),
            num_transitions: lts.num_transitions(),
            num_deadlocks: layout
                .states()
                .iter()
                .filter(|s| s.is_ranked() && s.deadlock)
                .count(),
            num_backpointers: (0..lts.num_transitions())
                .filter(|i| layout.transition_class(TransitionId::new(*i as u32)).is_backpointer())
                .count(),
        }
    }
}

/// One state of an exported layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// State handle.
    pub id: StateId,
    /// Rank, `None` if unreached.
    pub rank: Option<usize>,
    /// Owning cluster, `None` if unreached.
    pub cluster: Option<ClusterId>,
    /// Placement within the cluster.
    pub position: Position,
    /// Rim slot, for states placed at an angle.
    pub slot: Option<usize>,
    /// No outgoing transitions.
    pub deadlock: bool,
}

/// One cluster of an exported layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    /// Cluster handle.
    pub id: ClusterId,
    /// Rank of its members.
    pub rank: usize,
    /// Member states, sorted.
    pub states: Vec<StateId>,
    /// Parent cluster.
    pub ancestor: Option<ClusterId>,
    /// Child clusters in placement order.
    pub descendants: Vec<ClusterId>,
    /// Placement among the ancestor's descendants.
    pub position: Position,
    /// Top disc radius.
    pub top_radius: f64,
    /// Base disc radius.
    pub base_radius: f64,
    /// Horizontal extent of the subtree.
    pub size: f64,
    /// Subtree volume.
    pub volume: f64,
    /// Some member is a deadlock.
    pub has_deadlock: bool,
}

/// One transition of an exported layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Source state.
    pub begin: StateId,
    /// Target state.
    pub end: StateId,
    /// Action label.
    pub label: String,
    /// Classification by the ranker.
    pub class: TransitionClass,
}

/// Serializable snapshot of a layout.
///
/// Contains everything a renderer needs plus the identity of the run:
/// - `schema_version`: export format version
/// - `config_id` + `params_hash`: parameter identity
/// - `layout_id`: deterministic fingerprint of the result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutExport {
    /// Export format version.
    pub schema_version: String,
    /// Ranking policy used.
    pub rank_style: RankStyle,
    /// Config identifier.
    pub config_id: String,
    /// Hash of the parameters (quantized, not float-dependent).
    pub params_hash: String,
    /// Fingerprint of the layout.
    pub layout_id: LayoutFingerprint,
    /// Counts.
    pub summary: LayoutSummary,
    /// States in handle order.
    pub states: Vec<StateRecord>,
    /// Clusters in handle (rank) order.
    pub clusters: Vec<ClusterRecord>,
    /// Transitions in handle order.
    pub transitions: Vec<TransitionRecord>,
}

impl LayoutExport {
    /// Snapshot `layout`, which must have been derived from `lts`.
    pub fn new(lts: &Lts, layout: &Layout, config: &LayoutConfig) -> Self {
        let states: Vec<StateRecord> = layout
            .states()
            .iter()
            .enumerate()
            .map(|(i, s)| StateRecord {
                id: StateId::new(i as u32),
                rank: s.rank,
                cluster: s.cluster,
                position: s.position,
                slot: s.slot,
                deadlock: s.deadlock,
            })
            .collect();

        let clusters: Vec<ClusterRecord> = layout
            .clusters()
            .iter()
            .map(|c| {
                let mut members = c.states.clone();
                members.sort();
                ClusterRecord {
                    id: c.id,
                    rank: c.rank,
                    states: members,
                    ancestor: c.ancestor,
                    descendants: c.descendants.clone(),
                    position: c.position,
                    top_radius: c.top_radius,
                    base_radius: c.base_radius,
                    size: c.size,
                    volume: c.volume,
                    has_deadlock: c.has_deadlock,
                }
            })
            .collect();

        let transitions: Vec<TransitionRecord> = lts
            .transitions()
            .iter()
            .enumerate()
            .map(|(i, t)| TransitionRecord {
                begin: t.begin,
                end: t.end,
                label: t.label.clone(),
                class: layout.transition_class(TransitionId::new(i as u32)),
            })
            .collect();

        let params_hash = config.params_hash();
        let layout_id = Self::compute_fingerprint(&states, &clusters, &transitions, &params_hash);

        Self {
            schema_version: LAYOUT_SCHEMA_VERSION.to_string(),
            rank_style: layout.rank_style(),
            config_id: config.config_id().to_string(),
            params_hash,
            layout_id,
            summary: LayoutSummary::from_layout(lts, layout),
            states,
            clusters,
            transitions,
        }
    }

    /// Compute the layout fingerprint.
    fn compute_fingerprint(
        states: &[StateRecord],
        clusters: &[ClusterRecord],
        transitions: &[TransitionRecord],
        params_hash: &str,
    ) -> LayoutFingerprint {
        let states: Vec<_> = states
            .iter()
            .map(|s| (s.id, s.rank, s.cluster, quantize_position(s.position), s.slot))
            .collect();
        let clusters: Vec<_> = clusters
            .iter()
            .map(|c| {
                (
                    c.id,
                    &c.states,
                    c.ancestor,
                    &c.descendants,
                    quantize_position(c.position),
                    quantize_float(c.top_radius),
                    quantize_float(c.base_radius),
                    quantize_float(c.size),
                    quantize_float(c.volume),
                )
            })
            .collect();
        let classes: Vec<_> = transitions.iter().map(|t| t.class).collect();

        let canonical = (&states, &clusters, &classes, params_hash, LAYOUT_SCHEMA_VERSION);
        LayoutFingerprint::new(fingerprint_hex(&canonical))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn quantize_position(position: Position) -> Option<i64> {
    position.degrees().map(quantize_float)
}
