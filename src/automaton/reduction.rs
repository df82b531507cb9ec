//! Reachability analysis and the sub-automata derived from it
use std::collections::BTreeMap;

use log::debug;

use super::{Nfa, State, StateSet};
use crate::set::intersect;

impl Nfa {
    /// Return all states reachable from `start`, in depth-first preorder
    fn reachable_from<'a, I>(&self, start: I) -> StateSet
    where
        I: IntoIterator<Item = &'a State>,
    {
        let mut reached = StateSet::new();
        let mut stack: Vec<&State> = start.into_iter().collect();
        stack.reverse();

        while let Some(state) = stack.pop() {
            if !reached.insert(state.clone()) {
                continue;
            }
            let successors: Vec<&State> = self.edges(state).flat_map(|(_, t)| t.iter()).collect();
            stack.extend(successors.into_iter().rev());
        }
        reached
    }

    /// All states that can be entered from an initial state
    pub fn reachable_states(&self) -> StateSet {
        self.reachable_from(self.initial_states.iter())
    }

    /// All states from which one of `targets` can be reached, following
    /// the transitions backwards
    fn coreachable_from(&self, targets: &StateSet) -> StateSet {
        let mut predecessors: BTreeMap<&State, Vec<&State>> = BTreeMap::new();
        for (source, row) in &self.transitions {
            for target in row.values().flatten() {
                predecessors.entry(target).or_default().push(source);
            }
        }

        let mut useful = StateSet::new();
        let mut stack: Vec<&State> = targets.iter().collect();
        while let Some(state) = stack.pop() {
            if !useful.insert(state.clone()) {
                continue;
            }
            if let Some(sources) = predecessors.get(state) {
                stack.extend(sources.iter().copied());
            }
        }
        useful
    }

    /// Remove all states that cannot be entered and all states from which
    /// no final state can be reached, together with their edges
    ///
    /// The alphabet of the result only contains the letters that still
    /// label an edge. If no final state is reachable the result is empty.
    pub fn remove_useless_parts(&self) -> Nfa {
        let reachable = self.reachable_states();
        let reachable_final = intersect(&self.final_states, &reachable);
        let coreachable = self.coreachable_from(&reachable_final);

        let useful: StateSet = self
            .states
            .iter()
            .filter(|q| reachable.contains(q) && coreachable.contains(q))
            .cloned()
            .collect();

        let mut nfa = Nfa::new();
        nfa.initial_states = intersect(&self.initial_states, &useful);
        nfa.final_states = intersect(&self.final_states, &useful);

        for (source, row) in &self.transitions {
            if !useful.contains(source) {
                continue;
            }
            for (letter, targets) in row {
                let targets = intersect(targets, &useful);
                if !targets.is_empty() {
                    nfa.set_transition(source.clone(), letter.clone(), targets);
                }
            }
        }
        nfa.alphabet = self
            .alphabet
            .iter()
            .filter(|a| {
                nfa.transitions
                    .values()
                    .any(|row| row.contains_key(*a))
            })
            .cloned()
            .collect();
        nfa.states = useful;

        debug!(
            "removed {} useless states, {} left",
            self.states.len() - nfa.states.len(),
            nfa.states.len()
        );
        debug_assert!(nfa.is_well_formed());
        nfa
    }

    /// The part of the automaton reachable from its initial states
    ///
    /// Edges are copied unchanged and the alphabet is kept as is.
    pub fn reachable_part(&self) -> Nfa {
        self.project(self.initial_states.clone())
    }

    /// The automaton seen from `state`: `state` is the only initial
    /// state and everything that cannot be reached from it is dropped
    ///
    /// State names are kept and the alphabet is inherited unchanged, even
    /// letters that no longer label an edge.
    pub fn induced_nfa(&self, state: &State) -> Nfa {
        debug_assert!(self.states.contains(state));
        self.project(StateSet::from([state.clone()]))
    }

    fn project(&self, initial_states: StateSet) -> Nfa {
        let states = self.reachable_from(initial_states.iter());
        let mut nfa = Nfa::new();
        nfa.alphabet = self.alphabet.clone();
        for state in &states {
            if let Some(row) = self.transitions.get(state) {
                nfa.transitions.insert(state.clone(), row.clone());
            }
        }
        nfa.final_states = intersect(&self.final_states, &states);
        nfa.initial_states = initial_states;
        nfa.states = states;
        debug_assert!(nfa.is_well_formed());
        nfa
    }
}
