//! Hierarchy repair.
//!
//! Ranking an arbitrary graph can leave a cluster whose states hang below
//! several clusters of the previous rank. Working from the deepest rank up,
//! every such group of ancestor clusters is merged into one, after which
//! each cluster has exactly one ancestor and the clusters form a tree.
//!
//! Absorbed clusters are emptied in place and dropped by a final compaction
//! that renumbers the survivors densely in rank order.

use std::collections::BTreeSet;

use crate::engine::LayoutError;
use crate::types::ClusterId;

use super::Layout;

/// Merge ambiguous ancestors and link every cluster to its single ancestor.
pub(crate) fn merge_hierarchy(layout: &mut Layout) -> Result<(), LayoutError> {
    let mut merges = 0usize;

    for rank in (1..layout.clusters_in_rank.len()).rev() {
        let clusters = layout.clusters_in_rank[rank].clone();

        for &cluster in &clusters {
            let ancestors = ancestor_clusters(layout, cluster, rank);
            if ancestors.len() > 1 {
                merges += ancestors.len() - 1;
                merge_clusters(layout, rank - 1, &ancestors);
            }
        }

        for cluster in clusters {
            let ancestors = ancestor_clusters(layout, cluster, rank);
            let mut iter = ancestors.iter().copied();
            match (iter.next(), iter.next()) {
                (Some(ancestor), None) => {
                    layout.clusters[cluster.index()].ancestor = Some(ancestor);
                    layout.clusters[ancestor.index()].descendants.push(cluster);
                }
                _ => {
                    tracing::error!(
                        cluster = %cluster,
                        rank,
                        ancestors = ancestors.len(),
                        "Cluster has no unique ancestor after merging"
                    );
                    return Err(LayoutError::OrphanCluster {
                        cluster,
                        rank,
                        ancestors: ancestors.len(),
                    });
                }
            }
        }
    }

    if let Some(roots) = layout.clusters_in_rank.first() {
        if roots.len() != 1 {
            tracing::error!(roots = roots.len(), "Rank 0 must hold exactly one cluster");
            let cluster = roots.get(1).copied().unwrap_or(ClusterId::new(0));
            return Err(LayoutError::OrphanCluster { cluster, rank: 0, ancestors: 0 });
        }
    }

    compact(layout);

    tracing::debug!(merges, clusters = layout.clusters.len(), "Merged cluster hierarchy");
    Ok(())
}

/// Clusters at `rank - 1` holding a superior of some state in `cluster`.
fn ancestor_clusters(layout: &Layout, cluster: ClusterId, rank: usize) -> BTreeSet<ClusterId> {
    let mut ancestors = BTreeSet::new();
    for state in &layout.clusters[cluster.index()].states {
        for superior in &layout.states[state.index()].superiors {
            let record = &layout.states[superior.index()];
            if record.rank == Some(rank - 1) {
                if let Some(c) = record.cluster {
                    ancestors.insert(c);
                }
            }
        }
    }
    ancestors
}

/// Fold every cluster in `group` into the lowest-numbered one.
fn merge_clusters(layout: &mut Layout, rank: usize, group: &BTreeSet<ClusterId>) {
    let mut iter = group.iter().copied();
    let Some(target) = iter.next() else { return };

    for absorbed in iter {
        let states = std::mem::take(&mut layout.clusters[absorbed.index()].states);
        let deadlock = layout.clusters[absorbed.index()].has_deadlock;

        for state in &states {
            layout.states[state.index()].cluster = Some(target);
        }

        let survivor = &mut layout.clusters[target.index()];
        survivor.states.extend(states);
        survivor.has_deadlock |= deadlock;

        layout.clusters_in_rank[rank].retain(|c| *c != absorbed);

        tracing::trace!(target = %target, absorbed = %absorbed, rank, "Merged sibling clusters");
    }
}

/// Drop absorbed clusters and renumber the rest in rank order.
fn compact(layout: &mut Layout) {
    let mut old: Vec<_> = std::mem::take(&mut layout.clusters)
        .into_iter()
        .map(Some)
        .collect();
    let mut remap: Vec<Option<ClusterId>> = vec![None; old.len()];
    let mut clusters = Vec::with_capacity(old.len());

    for in_rank in &mut layout.clusters_in_rank {
        for id in in_rank.iter_mut() {
            if let Some(mut cluster) = old[id.index()].take() {
                let new_id = ClusterId::new(clusters.len() as u32);
                remap[id.index()] = Some(new_id);
                cluster.id = new_id;
                clusters.push(cluster);
                *id = new_id;
            }
        }
    }

    let lookup = |id: ClusterId| remap.get(id.index()).copied().flatten();
    for cluster in &mut clusters {
        cluster.ancestor = cluster.ancestor.and_then(lookup);
        cluster.descendants = cluster.descendants.iter().copied().filter_map(lookup).collect();
    }
    for state in &mut layout.states {
        state.cluster = state.cluster.and_then(lookup);
    }

    layout.clusters = clusters;
}
