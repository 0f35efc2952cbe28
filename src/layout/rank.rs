//! Breadth-first ranking.
//!
//! Rank 0 holds the initial state; rank `r + 1` holds every state first
//! reached from rank `r`. While layering, each traversed transition is
//! classified and the superior/subordinate/comrade relations are recorded.
//!
//! ## Policies
//!
//! - [`RankStyle::Iterative`]: only outgoing transitions are followed. An
//!   edge to an earlier rank is a backpointer.
//! - [`RankStyle::Cyclic`]: outgoing and incoming transitions are followed,
//!   so neighbouring ranks differ by at most one and no edge is ever a
//!   backpointer.

use crate::config::RankStyle;
use crate::lts::Lts;
use crate::types::{StateId, TransitionClass};

use super::Layout;

/// Assign ranks to every state reachable from `initial`.
///
/// Unreached states keep `rank == None`.
pub(crate) fn rank_states(lts: &Lts, layout: &mut Layout, initial: StateId) {
    let style = layout.rank_style;
    layout.states[initial.index()].rank = Some(0);

    let mut frontier = vec![initial];
    let mut rank = 0;

    while !frontier.is_empty() {
        let mut next = Vec::new();

        for &state in &frontier {
            let node = &lts.states()[state.index()];

            for &tid in &node.outgoing {
                let end = lts.transitions()[tid.index()].end;
                let class = link(layout, style, state, end, rank, &mut next);
                layout.transitions[tid.index()] = class;
            }

            if style == RankStyle::Cyclic {
                for &tid in &node.incoming {
                    let begin = lts.transitions()[tid.index()].begin;
                    let class = link(layout, style, state, begin, rank, &mut next);
                    layout.transitions[tid.index()] = class;
                }
            }
        }

        layout.states_in_rank.push(frontier);
        frontier = next;
        rank += 1;
    }

    tracing::debug!(
        style = %style,
        ranks = layout.states_in_rank.len(),
        reached = layout.states_in_rank.iter().map(Vec::len).sum::<usize>(),
        total = layout.states.len(),
        "Ranked states"
    );
}

/// Relate `state` (at `rank`) to a neighbour and classify the edge.
fn link(
    layout: &mut Layout,
    style: RankStyle,
    state: StateId,
    neighbour: StateId,
    rank: usize,
    next: &mut Vec<StateId>,
) -> TransitionClass {
    if state == neighbour {
        return TransitionClass::SelfLoop;
    }

    match layout.states[neighbour.index()].rank {
        None => {
            layout.states[neighbour.index()].rank = Some(rank + 1);
            next.push(neighbour);
            add_tree_edge(layout, state, neighbour);
            TransitionClass::Forward
        }
        Some(r) if r == rank + 1 => {
            add_tree_edge(layout, state, neighbour);
            TransitionClass::Forward
        }
        Some(r) if r == rank => {
            layout.states[state.index()].comrades.insert(neighbour);
            layout.states[neighbour.index()].comrades.insert(state);
            TransitionClass::Sideways
        }
        // Earlier rank. In cyclic mode that is always rank - 1, and the tree
        // edge was recorded when the neighbour's layer was processed.
        Some(_) => match style {
            RankStyle::Iterative => TransitionClass::Backpointer,
            RankStyle::Cyclic => TransitionClass::Forward,
        },
    }
}

fn add_tree_edge(layout: &mut Layout, superior: StateId, subordinate: StateId) {
    layout.states[superior.index()].subordinates.insert(subordinate);
    layout.states[subordinate.index()].superiors.insert(superior);
}
