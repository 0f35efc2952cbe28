//! Labeled transition system container.
//!
//! The LTS is the read-only input to the layout pipeline. It owns states and
//! transitions; the engine refers to them by [`StateId`] and
//! [`TransitionId`] and keeps all derived data in its own arenas.

use serde::{Deserialize, Serialize};

use crate::types::{StateId, TransitionId};

/// Error type for building an LTS.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LtsError {
    /// A transition or the initial state names a state that does not exist.
    #[error("Unknown state: {0}")]
    UnknownState(StateId),
}

/// A state of the input graph with its adjacency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Transitions leaving this state, in insertion order (self-loops included).
    pub outgoing: Vec<TransitionId>,
    /// Transitions entering this state, in insertion order (self-loops included).
    pub incoming: Vec<TransitionId>,
}

impl State {
    /// A state with no outgoing transitions.
    pub fn is_deadlock(&self) -> bool {
        self.outgoing.is_empty()
    }
}

/// A labeled, directed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Source state.
    pub begin: StateId,
    /// Target state.
    pub end: StateId,
    /// Action label.
    pub label: String,
}

impl Transition {
    /// Whether begin and end coincide.
    pub fn is_self_loop(&self) -> bool {
        self.begin == self.end
    }
}

/// Labeled transition system.
///
/// States and transitions live in dense arenas indexed by their handles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lts {
    states: Vec<State>,
    transitions: Vec<Transition>,
    initial: Option<StateId>,
}

impl Lts {
    /// Create an empty LTS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an LTS with `num_states` states, the given `(begin, end, label)`
    /// transitions, and state 0 as the initial state.
    pub fn from_transitions<'a, I>(num_states: usize, transitions: I) -> Result<Self, LtsError>
    where
        I: IntoIterator<Item = (u32, u32, &'a str)>,
    {
        let mut lts = Self::new();
        for _ in 0..num_states {
            lts.add_state();
        }
        for (begin, end, label) in transitions {
            lts.add_transition(StateId::new(begin), StateId::new(end), label)?;
        }
        if num_states > 0 {
            lts.set_initial_state(StateId::new(0))?;
        }
        Ok(lts)
    }

    /// Add a state and return its handle.
    pub fn add_state(&mut self) -> StateId {
        let id = StateId::new(self.states.len() as u32);
        self.states.push(State::default());
        id
    }

    /// Add a transition between two existing states.
    pub fn add_transition(
        &mut self,
        begin: StateId,
        end: StateId,
        label: impl Into<String>,
    ) -> Result<TransitionId, LtsError> {
        self.check(begin)?;
        self.check(end)?;

        let id = TransitionId::new(self.transitions.len() as u32);
        self.transitions.push(Transition {
            begin,
            end,
            label: label.into(),
        });
        self.states[begin.index()].outgoing.push(id);
        self.states[end.index()].incoming.push(id);
        Ok(id)
    }

    /// Set the state the ranking starts from.
    pub fn set_initial_state(&mut self, id: StateId) -> Result<(), LtsError> {
        self.check(id)?;
        self.initial = Some(id);
        Ok(())
    }

    /// The initial state, if set.
    pub fn initial_state(&self) -> Option<StateId> {
        self.initial
    }

    /// State by handle.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Transition by handle.
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(id.index())
    }

    /// All states, indexed by [`StateId::index`].
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// All transitions, indexed by [`TransitionId::index`].
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Iterate over all state handles in arena order.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len() as u32).map(StateId::new)
    }

    /// Get number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Get number of transitions.
    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Whether the LTS has no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn check(&self, id: StateId) -> Result<(), LtsError> {
        if id.index() < self.states.len() {
            Ok(())
        } else {
            Err(LtsError::UnknownState(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_states_and_transitions() {
        let mut lts = Lts::new();
        let a = lts.add_state();
        let b = lts.add_state();

        let t = lts.add_transition(a, b, "go").unwrap();

        assert_eq!(lts.num_states(), 2);
        assert_eq!(lts.num_transitions(), 1);
        assert_eq!(lts.state(a).unwrap().outgoing, vec![t]);
        assert_eq!(lts.state(b).unwrap().incoming, vec![t]);
        assert_eq!(lts.transition(t).unwrap().label, "go");
        assert!(lts.state(b).unwrap().is_deadlock());
        assert!(!lts.state(a).unwrap().is_deadlock());
    }

    #[test]
    fn test_unknown_state_rejected() {
        let mut lts = Lts::new();
        let a = lts.add_state();
        let ghost = StateId::new(9);

        assert_eq!(lts.add_transition(a, ghost, "x"), Err(LtsError::UnknownState(ghost)));
        assert_eq!(lts.set_initial_state(ghost), Err(LtsError::UnknownState(ghost)));
        assert_eq!(lts.num_transitions(), 0);
    }

    #[test]
    fn test_from_transitions_sets_initial() {
        let lts = Lts::from_transitions(3, [(0, 1, "a"), (1, 2, "b"), (2, 2, "tau")]).unwrap();

        assert_eq!(lts.initial_state(), Some(StateId::new(0)));
        assert!(lts.transition(TransitionId::new(2)).unwrap().is_self_loop());
        // a self-loop keeps a state out of deadlock
        assert!(!lts.state(StateId::new(2)).unwrap().is_deadlock());
    }

    #[test]
    fn test_empty_has_no_initial() {
        let lts = Lts::from_transitions(0, Vec::<(u32, u32, &str)>::new()).unwrap();
        assert!(lts.is_empty());
        assert!(lts.initial_state().is_none());
    }
}
