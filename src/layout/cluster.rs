//! Comrade clustering.
//!
//! Each rank's states are split into connected components of the comrade
//! relation. Components are grown with an explicit worklist, so large
//! components cannot exhaust the stack.

use crate::types::{Cluster, ClusterId};

use super::Layout;

/// Create one cluster per comrade component in every rank.
pub(crate) fn build_clusters(layout: &mut Layout) {
    for rank in 0..layout.states_in_rank.len() {
        let members = layout.states_in_rank[rank].clone();
        let mut in_rank = Vec::new();

        for seed in members {
            if layout.states[seed.index()].cluster.is_some() {
                continue;
            }

            let id = ClusterId::new(layout.clusters.len() as u32);
            let mut cluster = Cluster::new(id, rank);
            layout.states[seed.index()].cluster = Some(id);

            let mut worklist = vec![seed];
            while let Some(state) = worklist.pop() {
                let record = &layout.states[state.index()];
                cluster.add_state(state, record.deadlock);

                let comrades: Vec<_> = record.comrades.iter().copied().collect();
                for comrade in comrades {
                    let slot = &mut layout.states[comrade.index()].cluster;
                    if slot.is_none() {
                        *slot = Some(id);
                        worklist.push(comrade);
                    }
                }
            }

            layout.clusters.push(cluster);
            in_rank.push(id);
        }

        layout.clusters_in_rank.push(in_rank);
    }

    tracing::debug!(clusters = layout.clusters.len(), "Built comrade clusters");
}
