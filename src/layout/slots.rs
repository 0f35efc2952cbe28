//! Slot resolution.
//!
//! The last positioning pass. Two kinds of overlap remain after the
//! directional passes:
//!
//! - several states steered into the same rim slot;
//! - several states without any direction, all parked on the cluster axis.
//!
//! Crowded slots keep their first occupant and push the others to the
//! nearest free slot. Undecided states are registered with their cluster's
//! slot table; the first keeps the axis if no decided state already holds
//! it and the rest go to the least occupied slots.

use crate::types::{ClusterId, Position, StateId};

use super::Layout;

/// Separate colliding and undecided states in every cluster.
pub(crate) fn resolve_cluster_slots(layout: &mut Layout, undecided: Vec<StateId>) {
    for state in undecided {
        if let Some(cluster) = layout.states[state.index()].cluster {
            layout.clusters[cluster.index()].slots.consider(state);
        }
    }

    let mut moved = 0usize;
    for index in 0..layout.clusters.len() {
        let cluster = ClusterId::new(index as u32);
        moved += relieve_crowded_slots(layout, cluster);
        moved += place_undecided(layout, cluster);
    }

    tracing::debug!(moved, "Resolved cluster slots");
}

/// Spread states sharing a slot; returns how many were moved.
fn relieve_crowded_slots(layout: &mut Layout, cluster: ClusterId) -> usize {
    let mut moved = 0;
    let crowded = layout.clusters[cluster.index()].slots.crowded();

    for index in crowded {
        let extra: Vec<StateId> = layout.clusters[cluster.index()]
            .slots
            .slot(index)
            .map(|s| s.occupants.iter().skip(1).copied().collect())
            .unwrap_or_default();

        for state in extra {
            let table = &mut layout.clusters[cluster.index()].slots;
            let Some(free) = table.nearest_free(index) else { break };
            table.release(index, state);
            table.occupy_index(free, state);
            let degrees = table.center_of(free);

            let record = &mut layout.states[state.index()];
            record.position = Position::Angle(degrees);
            record.slot = Some(free);
            moved += 1;
        }
    }
    moved
}

/// Give the cluster's undecided states distinct places; returns how many
/// were put on the rim.
fn place_undecided(layout: &mut Layout, cluster: ClusterId) -> usize {
    let c = &mut layout.clusters[cluster.index()];
    let undecided = c.slots.take_undecided();
    if undecided.is_empty() || c.is_singleton() {
        return 0;
    }

    let axis_taken = c
        .states
        .iter()
        .any(|s| !undecided.contains(s) && layout.states[s.index()].position.is_centered());

    let mut pending = undecided.into_iter();
    if !axis_taken {
        if let Some(first) = pending.next() {
            layout.states[first.index()].center();
        }
    }

    let mut placed = 0;
    for state in pending {
        let index = c.slots.least_occupied();
        c.slots.occupy_index(index, state);

        let record = &mut layout.states[state.index()];
        record.position = Position::Angle(c.slots.center_of(index));
        record.slot = Some(index);
        placed += 1;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayoutConfig, RankStyle};
    use crate::layout::geometry::compute_geometry;
    use crate::layout::test_support::{full, ranked_and_merged, sid};
    use crate::lts::Lts;

    fn sized(lts: &Lts) -> Layout {
        let mut layout = ranked_and_merged(lts, RankStyle::Iterative);
        compute_geometry(&mut layout, &LayoutConfig::default());
        layout
    }

    #[test]
    fn test_crowded_slot_is_relieved() {
        // rank 1 holds the comrade pair {1, 2}
        let lts = Lts::from_transitions(3, [(0, 1, "a"), (0, 2, "a"), (1, 2, "b")]).unwrap();
        let mut layout = sized(&lts);
        let cluster = layout.cluster_of(sid(1)).unwrap().id;

        for s in [sid(1), sid(2)] {
            let slot = layout.clusters[cluster.index()].slots.occupy(10.0, s);
            layout.states[s.index()].position = Position::Angle(10.0);
            layout.states[s.index()].slot = Some(slot);
        }

        resolve_cluster_slots(&mut layout, Vec::new());

        let a = layout.state(sid(1)).unwrap();
        let b = layout.state(sid(2)).unwrap();
        assert_eq!(a.position, Position::Angle(10.0));
        assert_ne!(a.slot, b.slot);
        assert!(layout.cluster(cluster).unwrap().slots.crowded().is_empty());
    }

    #[test]
    fn test_first_undecided_keeps_axis() {
        let lts = Lts::from_transitions(4, [(0, 1, "a"), (0, 2, "a"), (0, 3, "a"), (1, 2, "b"), (2, 3, "b")])
            .unwrap();
        let mut layout = sized(&lts);

        resolve_cluster_slots(&mut layout, vec![sid(1), sid(2), sid(3)]);

        assert!(layout.state(sid(1)).unwrap().position.is_centered());
        let p2 = layout.state(sid(2)).unwrap();
        let p3 = layout.state(sid(3)).unwrap();
        assert!(p2.position.degrees().is_some());
        assert!(p3.position.degrees().is_some());
        assert_ne!(p2.slot, p3.slot);
    }

    #[test]
    fn test_axis_held_by_decided_state() {
        let lts = Lts::from_transitions(3, [(0, 1, "a"), (0, 2, "a"), (1, 2, "b")]).unwrap();
        let mut layout = sized(&lts);

        // state 1 is centered and decided; only 2 is undecided
        resolve_cluster_slots(&mut layout, vec![sid(2)]);

        assert!(layout.state(sid(1)).unwrap().position.is_centered());
        assert!(layout.state(sid(2)).unwrap().position.degrees().is_some());
    }

    #[test]
    fn test_large_leaf_cluster_angles_are_distinct() {
        // root fans out to a 60-state comrade chain, one leaf cluster
        let n = 61u32;
        let mut edges: Vec<(u32, u32, &str)> = (1..n).map(|i| (0, i, "a")).collect();
        edges.extend((1..n - 1).map(|i| (i, i + 1, "b")));
        let lts = Lts::from_transitions(n as usize, edges).unwrap();
        let layout = full(&lts);

        let cluster = layout.cluster_of(sid(1)).unwrap();
        assert_eq!(cluster.num_states(), 60);
        assert!(cluster.slots.len() >= 60);
        assert!(cluster.slots.crowded().is_empty());

        let mut angles: Vec<f64> = cluster
            .states
            .iter()
            .filter_map(|s| layout.state(*s).unwrap().position.degrees())
            .collect();
        assert_eq!(angles.len(), 59);
        angles.sort_by(f64::total_cmp);
        angles.dedup();
        assert_eq!(angles.len(), 59);
    }

    #[test]
    fn test_merged_pair_is_separated() {
        // 1 and 2 share child 3, so their clusters are merged and neither
        // has a direction
        let lts = Lts::from_transitions(4, [(0, 1, "a"), (0, 2, "a"), (1, 3, "b"), (2, 3, "b")])
            .unwrap();
        let layout = full(&lts);

        let p1 = layout.state(sid(1)).unwrap();
        let p2 = layout.state(sid(2)).unwrap();
        assert!(!(p1.position.is_centered() && p2.position.is_centered()));
    }
}
