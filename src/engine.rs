//! Layout engine.
//!
//! Owns the [`Layout`] arena and runs the pipeline over an [`Lts`].

use crate::config::{ConfigError, LayoutConfig, RankStyle};
use crate::export::{LayoutExport, LayoutSummary};
use crate::layout::{cluster, geometry, hierarchy, position, rank, Layout};
use crate::lts::Lts;
use crate::types::ClusterId;

/// Error type for layout runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The LTS has no states.
    #[error("LTS has no states")]
    EmptyGraph,
    /// The LTS has states but no initial state.
    #[error("LTS has no initial state")]
    NoInitialState,
    /// Configuration rejected by validation.
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// Merging left a cluster without a unique ancestor (internal consistency violation).
    #[error("Cluster {cluster} at rank {rank} has {ancestors} ancestor clusters")]
    OrphanCluster {
        /// Offending cluster.
        cluster: ClusterId,
        /// Its rank.
        rank: usize,
        /// Number of ancestor clusters found.
        ancestors: usize,
    },
}

/// Layout engine.
///
/// Structures an LTS into ranks and clusters and places everything on a
/// cone tree.
///
/// ## Algorithm
///
/// 1. Discard the previous layout
/// 2. Validate the config and the LTS
/// 3. Rank, cluster, merge the hierarchy
/// 4. Size clusters bottom-up and place descendants
/// 5. Position states
///
/// Every run starts from scratch, so a failed run leaves an empty layout
/// rather than a half-built one.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    layout: Layout,
}

impl LayoutEngine {
    /// Create an engine with the given parameters.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config, layout: Layout::default() }
    }

    /// Lay out `lts` from scratch.
    pub fn apply(&mut self, lts: &Lts) -> Result<&Layout, LayoutError> {
        self.reset();
        self.config.validate()?;
        if lts.is_empty() {
            return Err(LayoutError::EmptyGraph);
        }
        let initial = lts.initial_state().ok_or(LayoutError::NoInitialState)?;

        let span = tracing::info_span!(
            "layout",
            style = %self.config.rank_style,
            states = lts.num_states(),
            transitions = lts.num_transitions(),
        );
        let _guard = span.enter();

        self.layout = Layout::new(lts, self.config.rank_style);

        rank::rank_states(lts, &mut self.layout, initial);
        cluster::build_clusters(&mut self.layout);
        if let Err(e) = hierarchy::merge_hierarchy(&mut self.layout) {
            self.reset();
            return Err(e);
        }
        geometry::compute_geometry(&mut self.layout, &self.config);
        position::position_states(&mut self.layout, &self.config);

        tracing::info!(
            ranks = self.layout.num_ranks(),
            clusters = self.layout.num_clusters(),
            "Layout complete"
        );

        Ok(&self.layout)
    }

    /// Switch the ranking policy and lay out `lts` again.
    pub fn rerank(&mut self, lts: &Lts, style: RankStyle) -> Result<&Layout, LayoutError> {
        self.config.rank_style = style;
        self.apply(lts)
    }

    /// Recompute geometry and positions for the current clustering.
    ///
    /// Ranks and clusters are kept; everything derived from them is
    /// recomputed with the current parameters. The layout is left untouched
    /// if the parameters do not validate.
    pub fn refresh_geometry(&mut self) -> Result<(), LayoutError> {
        self.config.validate()?;
        if self.layout.is_empty() {
            return Ok(());
        }
        geometry::compute_geometry(&mut self.layout, &self.config);
        position::position_states(&mut self.layout, &self.config);
        Ok(())
    }

    /// Discard all derived data.
    pub fn reset(&mut self) {
        self.layout = Layout::default();
    }

    /// Current layout (empty before the first successful run).
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Active parameters.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the parameters. Takes effect on the next run.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// Count summary of the current layout.
    pub fn summary(&self, lts: &Lts) -> LayoutSummary {
        LayoutSummary::from_layout(lts, &self.layout)
    }

    /// Serializable snapshot of the current layout.
    pub fn export(&self, lts: &Lts) -> LayoutExport {
        LayoutExport::new(lts, &self.layout, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, StateId, TransitionClass, TransitionId};

    #[test]
    fn test_empty_graph_rejected() {
        let mut engine = LayoutEngine::default();
        assert_eq!(engine.apply(&Lts::new()).unwrap_err(), LayoutError::EmptyGraph);
        assert!(engine.layout().is_empty());
    }

    #[test]
    fn test_missing_initial_state_rejected() {
        let mut lts = Lts::new();
        lts.add_state();
        let mut engine = LayoutEngine::default();
        assert_eq!(engine.apply(&lts).unwrap_err(), LayoutError::NoInitialState);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let lts = Lts::from_transitions(1, Vec::<(u32, u32, &str)>::new()).unwrap();
        let config = LayoutConfig { state_radius: -1.0, ..Default::default() };
        let mut engine = LayoutEngine::new(config);

        assert!(matches!(engine.apply(&lts), Err(LayoutError::InvalidConfig(_))));
    }

    #[test]
    fn test_single_state() {
        let lts = Lts::from_transitions(1, Vec::<(u32, u32, &str)>::new()).unwrap();
        let mut engine = LayoutEngine::default();
        let layout = engine.apply(&lts).unwrap();

        assert_eq!(layout.num_ranks(), 1);
        assert_eq!(layout.num_clusters(), 1);
        let root = layout.cluster(layout.root_cluster().unwrap()).unwrap();
        assert!((root.top_radius - 0.2).abs() < 1e-9);
        assert!(root.has_deadlock);
        assert_eq!(layout.state(StateId::new(0)).unwrap().position, Position::Centered);
    }

    #[test]
    fn test_rerank_discards_previous_run() {
        let lts = Lts::from_transitions(2, [(0, 1, "a"), (1, 0, "b")]).unwrap();
        let mut engine = LayoutEngine::default();

        let layout = engine.apply(&lts).unwrap();
        assert_eq!(layout.transition_class(TransitionId::new(1)), TransitionClass::Backpointer);

        let layout = engine.rerank(&lts, RankStyle::Cyclic).unwrap();
        assert_eq!(layout.rank_style(), RankStyle::Cyclic);
        assert_ne!(layout.transition_class(TransitionId::new(1)), TransitionClass::Backpointer);
        assert_eq!(layout.num_ranks(), 2);
        assert_eq!(engine.config().rank_style, RankStyle::Cyclic);
    }

    #[test]
    fn test_refresh_keeps_clusters() {
        let lts = Lts::from_transitions(4, [(0, 1, "a"), (0, 2, "a"), (0, 3, "a")]).unwrap();
        let mut engine = LayoutEngine::default();
        let before = engine.apply(&lts).unwrap().clone();

        engine.refresh_geometry().unwrap();
        let after = engine.layout();

        assert_eq!(before.num_clusters(), after.num_clusters());
        for (a, b) in before.clusters().iter().zip(after.clusters()) {
            assert_eq!(a.states, b.states);
            assert_eq!(a.position, b.position);
            assert!((a.volume - b.volume).abs() < 1e-12);
        }
    }

    #[test]
    fn test_failed_run_clears_previous_layout() {
        let lts = Lts::from_transitions(2, [(0, 1, "a")]).unwrap();
        let mut engine = LayoutEngine::default();
        engine.apply(&lts).unwrap();
        assert_eq!(engine.layout().num_clusters(), 2);

        assert_eq!(engine.apply(&Lts::new()).unwrap_err(), LayoutError::EmptyGraph);
        assert!(engine.layout().is_empty());
        assert_eq!(engine.layout().num_clusters(), 0);

        engine.apply(&lts).unwrap();
        let mut no_initial = Lts::new();
        no_initial.add_state();
        assert_eq!(engine.apply(&no_initial).unwrap_err(), LayoutError::NoInitialState);
        assert!(engine.layout().is_empty());

        engine.apply(&lts).unwrap();
        engine.set_config(LayoutConfig { cone_height: 0.0, ..Default::default() });
        assert!(matches!(engine.apply(&lts), Err(LayoutError::InvalidConfig(_))));
        assert!(engine.layout().is_empty());
    }

    #[test]
    fn test_refresh_rejects_invalid_config() {
        let lts = Lts::from_transitions(2, [(0, 1, "a")]).unwrap();
        let mut engine = LayoutEngine::default();
        let before = engine.apply(&lts).unwrap().clone();

        engine.set_config(LayoutConfig { fill_ratio: 0.0, ..Default::default() });
        assert!(matches!(engine.refresh_geometry(), Err(LayoutError::InvalidConfig(_))));

        for (a, b) in before.clusters().iter().zip(engine.layout().clusters()) {
            assert_eq!(a.top_radius, b.top_radius);
            assert!(b.top_radius.is_finite());
        }
    }

    #[test]
    fn test_reset_clears_layout() {
        let lts = Lts::from_transitions(2, [(0, 1, "a")]).unwrap();
        let mut engine = LayoutEngine::default();
        engine.apply(&lts).unwrap();
        engine.reset();

        assert!(engine.layout().is_empty());
        assert_eq!(engine.layout().num_clusters(), 0);
    }
}
