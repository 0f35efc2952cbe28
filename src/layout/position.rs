//! State positioning.
//!
//! Edge-length heuristic after F. van Ham: a state is turned towards the
//! states it is connected to in the neighbouring rank, so that the edges
//! drawn between clusters stay short.
//!
//! 1. Bottom-up: each state looks at its subordinates, which are already
//!    placed. States without a usable direction are recorded as undecided.
//! 2. Top-down: undecided states look at their superiors instead.
//! 3. Slot resolution (see [`super::slots`]) separates whatever is left.
//!
//! Directions are combined by summing unit vectors. A sum shorter than
//! `direction_threshold` means the neighbours pull in opposing directions
//! and the state is centered.

use crate::config::LayoutConfig;
use crate::types::{vector_to_degrees, ClusterId, Position, StateId};

use super::{slots, Layout};

/// Outcome of combining neighbour directions.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    /// No neighbour had an angle.
    Unknown,
    /// The angles cancel out.
    Weak,
    /// Clear preferred angle in degrees.
    Toward(f64),
}

/// Assign a position to every ranked state.
pub(crate) fn position_states(layout: &mut Layout, config: &LayoutConfig) {
    for state in &mut layout.states {
        state.center();
    }

    let undecided = edge_length_bottom_up(layout, config);
    let bottom_up_undecided = undecided.len();
    let unresolved = edge_length_top_down(layout, config, undecided);

    tracing::debug!(
        undecided = bottom_up_undecided,
        unresolved = unresolved.len(),
        "Positioned states"
    );

    slots::resolve_cluster_slots(layout, unresolved);
}

/// First pass, deepest rank first. Returns the undecided states in the
/// order they were met.
fn edge_length_bottom_up(layout: &mut Layout, config: &LayoutConfig) -> Vec<StateId> {
    let mut undecided = Vec::new();

    for rank in (0..layout.clusters_in_rank.len()).rev() {
        for cluster in layout.clusters_in_rank[rank].clone() {
            let c = &layout.clusters[cluster.index()];
            let singleton = c.is_singleton();
            let leaf = c.descendants.is_empty();
            let members = c.states.clone();

            for state in members {
                if singleton {
                    layout.states[state.index()].center();
                } else if leaf {
                    layout.states[state.index()].center();
                    undecided.push(state);
                } else {
                    // With a single descendant that cluster is centered, so
                    // each subordinate contributes its own angle.
                    let towards: Vec<Position> = layout.states[state.index()]
                        .subordinates
                        .iter()
                        .map(|s| subordinate_direction(layout, *s))
                        .collect();
                    let direction = combine(&towards, config.direction_threshold);
                    commit(layout, cluster, state, direction, &mut undecided);
                }
            }
        }
    }

    undecided
}

/// Second pass over the undecided states, shallowest rank first. Returns the
/// states that still have no direction.
fn edge_length_top_down(
    layout: &mut Layout,
    config: &LayoutConfig,
    undecided: Vec<StateId>,
) -> Vec<StateId> {
    let mut unresolved = Vec::new();

    for state in undecided.into_iter().rev() {
        let Some(cluster) = layout.states[state.index()].cluster else { continue };
        let c = &layout.clusters[cluster.index()];

        if c.is_singleton() {
            layout.states[state.index()].center();
            continue;
        }
        if c.is_root() {
            layout.states[state.index()].center();
            unresolved.push(state);
            continue;
        }

        let own = c.position;
        let towards: Vec<Position> = layout.states[state.index()]
            .superiors
            .iter()
            .map(|s| superior_direction(own, layout.states[s.index()].position))
            .collect();
        let direction = combine(&towards, config.direction_threshold);
        commit(layout, cluster, state, direction, &mut unresolved);
    }

    unresolved
}

/// Angle of a subordinate as seen from its superior's cluster axis.
fn subordinate_direction(layout: &Layout, subordinate: StateId) -> Position {
    let record = &layout.states[subordinate.index()];
    let cluster_position = record
        .cluster
        .map(|c| layout.clusters[c.index()].position)
        .unwrap_or(Position::Centered);

    match (cluster_position, record.position) {
        (Position::Centered, own) => own,
        (Position::Angle(offset), Position::Centered) => Position::Angle(offset),
        (Position::Angle(offset), Position::Angle(own)) => Position::angle(offset + own),
    }
}

/// Angle of a superior in the frame of a cluster placed at `own`.
fn superior_direction(own: Position, superior: Position) -> Position {
    match (own, superior) {
        (Position::Centered, position) => position,
        // The ancestor's axis lies straight back from an off-center cluster.
        (Position::Angle(_), Position::Centered) => Position::Angle(180.0),
        (Position::Angle(offset), Position::Angle(angle)) => Position::angle(angle - offset),
    }
}

fn combine(towards: &[Position], threshold: f64) -> Direction {
    let mut sum = (0.0, 0.0);
    let mut any = false;
    for (x, y) in towards.iter().filter_map(Position::unit_vector) {
        sum.0 += x;
        sum.1 += y;
        any = true;
    }

    if !any {
        Direction::Unknown
    } else if sum.0.hypot(sum.1) < threshold {
        Direction::Weak
    } else {
        Direction::Toward(vector_to_degrees(sum.0, sum.1))
    }
}

fn commit(
    layout: &mut Layout,
    cluster: ClusterId,
    state: StateId,
    direction: Direction,
    undecided: &mut Vec<StateId>,
) {
    match direction {
        Direction::Unknown => {
            layout.states[state.index()].center();
            undecided.push(state);
        }
        Direction::Weak => layout.states[state.index()].center(),
        Direction::Toward(degrees) => {
            let slot = layout.clusters[cluster.index()].slots.occupy(degrees, state);
            let record = &mut layout.states[state.index()];
            record.position = Position::Angle(degrees);
            record.slot = Some(slot);
        }
    }
}
