//! Layout pipeline: ranks, clusters, cone geometry and state angles.
//!
//! The pipeline runs five bounded passes over one [`Layout`] arena:
//!
//! 1. **Rank**: breadth-first layering from the initial state
//! 2. **Cluster**: connected components of the comrade relation per rank
//! 3. **Hierarchy**: bottom-up merging until the clusters form a tree
//! 4. **Geometry**: radii, volumes and descendant angles, bottom-up
//! 5. **Position**: state angles, bottom-up then top-down, then slot resolution
//!
//! ## Architecture
//!
//! ```text
//! Lts → rank → cluster → hierarchy → geometry → position
//!         ↓        ↓          ↓           ↓          ↓
//!    StateLayout Cluster  ancestor   top/base    Position
//!     relations  arena   descendants  radius    + slots
//! ```
//!
//! Every pass reads what the previous ones wrote; nothing is shared across
//! runs. A new run starts from an empty [`Layout`].

pub mod rank;
pub mod cluster;
pub mod hierarchy;
pub mod geometry;
pub mod position;
pub mod slots;

pub use geometry::{arrange_descendants, ChildGeometry, DescendantArrangement};

use serde::Serialize;

use crate::config::RankStyle;
use crate::lts::Lts;
use crate::types::{
    Cluster, ClusterId, StateId, StateLayout, TransitionClass, TransitionId,
};

/// Arena of everything the pipeline derives from an [`Lts`].
///
/// Indexed by the handles of the LTS it was built for; cluster handles are
/// dense and ordered by rank once the hierarchy pass has run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    pub(crate) rank_style: RankStyle,
    pub(crate) states: Vec<StateLayout>,
    pub(crate) transitions: Vec<TransitionClass>,
    pub(crate) clusters: Vec<Cluster>,
    pub(crate) states_in_rank: Vec<Vec<StateId>>,
    pub(crate) clusters_in_rank: Vec<Vec<ClusterId>>,
}

impl Layout {
    /// Fresh arena for `lts`: every state unranked, every transition unvisited.
    pub(crate) fn new(lts: &Lts, rank_style: RankStyle) -> Self {
        Self {
            rank_style,
            states: lts
                .states()
                .iter()
                .map(|s| StateLayout::new(s.is_deadlock()))
                .collect(),
            transitions: vec![TransitionClass::Unvisited; lts.num_transitions()],
            clusters: Vec::new(),
            states_in_rank: Vec::new(),
            clusters_in_rank: Vec::new(),
        }
    }

    /// Rank style this layout was computed with.
    pub fn rank_style(&self) -> RankStyle {
        self.rank_style
    }

    /// Layout record of a state.
    pub fn state(&self, id: StateId) -> Option<&StateLayout> {
        self.states.get(id.index())
    }

    /// All state records, indexed by [`StateId::index`].
    pub fn states(&self) -> &[StateLayout] {
        &self.states
    }

    /// Classification of a transition.
    pub fn transition_class(&self, id: TransitionId) -> TransitionClass {
        self.transitions.get(id.index()).copied().unwrap_or_default()
    }

    /// Cluster by handle.
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.index())
    }

    /// All clusters, indexed by [`ClusterId::index`].
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Cluster owning a state.
    pub fn cluster_of(&self, state: StateId) -> Option<&Cluster> {
        self.state(state)
            .and_then(|s| s.cluster)
            .and_then(|c| self.cluster(c))
    }

    /// Number of non-empty ranks.
    pub fn num_ranks(&self) -> usize {
        self.states_in_rank.len()
    }

    /// Number of clusters.
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// States of a rank, in discovery order.
    pub fn states_in_rank(&self, rank: usize) -> &[StateId] {
        self.states_in_rank.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Clusters of a rank.
    pub fn clusters_in_rank(&self, rank: usize) -> &[ClusterId] {
        self.clusters_in_rank.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The cluster holding the initial state.
    pub fn root_cluster(&self) -> Option<ClusterId> {
        self.clusters_in_rank(0).first().copied()
    }

    /// Path from `cluster` up to the root, both included.
    ///
    /// Stops after visiting every cluster once, so a corrupted ancestor
    /// chain cannot loop.
    pub fn ancestry(&self, cluster: ClusterId) -> Vec<ClusterId> {
        let mut path = Vec::new();
        let mut current = Some(cluster);
        while let Some(id) = current {
            if path.len() > self.clusters.len() {
                break;
            }
            let Some(c) = self.cluster(id) else { break };
            path.push(id);
            current = c.ancestor;
        }
        path
    }

    /// Whether the pipeline produced anything.
    pub fn is_empty(&self) -> bool {
        self.states_in_rank.is_empty()
    }
}
