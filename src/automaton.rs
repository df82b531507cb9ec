//! Nondeterministic finite automata
//!
//! An [Nfa] is the quintuple of its states, its alphabet, its initial
//! states, its final states and a sparse transition relation mapping a
//! state and a letter to a set of successor states. Automata for
//! compound expressions are built bottom-up from [one_letter] with
//! [concat], [union] and [kleene_star] and can afterwards be trimmed
//! with [Nfa::remove_useless_parts] and compared with
//! [Nfa::is_equivalent].
//!
//! There are no epsilon transitions. Concatenation and the Kleene star
//! splice their operands together purely by adding edges.
use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::set::Set;

mod construction;
mod equivalence;
mod json;
mod reduction;

pub use construction::{concat, kleene_star, one_letter, union};

/// A node of an automaton
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(String);

/// A symbol of the input alphabet
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Letter(String);

pub type StateSet = Set<State>;
pub type Alphabet = Set<Letter>;

type Transitions = BTreeMap<State, BTreeMap<Letter, StateSet>>;

static NO_STATES: StateSet = Set::new();

#[derive(thiserror::Error, Debug)]
pub enum AutomatonError {
    #[error("malformed automaton: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no unused state name left")]
    FreshNamesExhausted,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The state named by the decimal representation of `index`
    fn indexed(index: usize) -> Self {
        Self(index.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Letter {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&str> for Letter {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A nondeterministic finite automaton
///
/// The transition relation is sparse: a missing entry means there is no
/// edge, and no entry ever holds an empty set of successors.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    states: StateSet,
    alphabet: Alphabet,
    initial_states: StateSet,
    transitions: Transitions,
    final_states: StateSet,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn initial_states(&self) -> &StateSet {
        &self.initial_states
    }

    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    pub fn add_state(&mut self, state: State) {
        self.states.insert(state);
    }

    pub fn add_letter(&mut self, letter: Letter) {
        self.alphabet.insert(letter);
    }

    /// Mark `state` as initial, adding it to the states if necessary
    pub fn add_initial_state(&mut self, state: State) {
        self.states.insert(state.clone());
        self.initial_states.insert(state);
    }

    /// Mark `state` as final, adding it to the states if necessary
    pub fn add_final_state(&mut self, state: State) {
        self.states.insert(state.clone());
        self.final_states.insert(state);
    }

    /// The successors of `state` on `letter`. Empty if there is no edge.
    pub fn transition(&self, state: &State, letter: &Letter) -> &StateSet {
        self.transitions
            .get(state)
            .and_then(|row| row.get(letter))
            .unwrap_or(&NO_STATES)
    }

    /// All outgoing edges of `state`, grouped by letter
    pub fn edges<'a>(
        &'a self,
        state: &State,
    ) -> impl Iterator<Item = (&'a Letter, &'a StateSet)> + use<'a> {
        self.transitions.get(state).into_iter().flatten()
    }

    /// Replace the successors of `state` on `letter` with `targets`.
    ///
    /// An empty `targets` removes the edge.
    pub fn set_transition(&mut self, state: State, letter: Letter, targets: StateSet) {
        if targets.is_empty() {
            if let Some(row) = self.transitions.get_mut(&state) {
                row.remove(&letter);
                if row.is_empty() {
                    self.transitions.remove(&state);
                }
            }
        } else {
            self.transitions
                .entry(state)
                .or_default()
                .insert(letter, targets);
        }
    }

    /// Add the single edge `state --letter--> target`
    pub fn add_transition(&mut self, state: State, letter: Letter, target: State) {
        self.transitions
            .entry(state)
            .or_default()
            .entry(letter)
            .or_default()
            .insert(target);
    }

    /// Rebuild the whole transition relation by evaluating `delta` on
    /// every pair of a state and a letter
    pub fn set_transition_function<F>(&mut self, mut delta: F)
    where
        F: FnMut(&State, &Letter) -> StateSet,
    {
        let mut transitions = Transitions::new();
        for state in &self.states {
            for letter in &self.alphabet {
                let targets = delta(state, letter);
                if !targets.is_empty() {
                    transitions
                        .entry(state.clone())
                        .or_default()
                        .insert(letter.clone(), targets);
                }
            }
        }
        self.transitions = transitions;
    }

    /// Check that initial and final states are states and that every
    /// edge connects states and is labelled with a letter of the alphabet
    pub fn is_well_formed(&self) -> bool {
        self.initial_states.iter().all(|q| self.states.contains(q))
            && self.final_states.iter().all(|q| self.states.contains(q))
            && self.transitions.iter().all(|(source, row)| {
                self.states.contains(source)
                    && row.iter().all(|(letter, targets)| {
                        self.alphabet.contains(letter)
                            && targets.iter().all(|q| self.states.contains(q))
                    })
            })
    }

    /// Simulate the NFA on `word`
    ///
    /// The word is accepted if a final state is reachable from an
    /// initial state by reading its letters one after the other.
    pub fn accepts<'a, I>(&self, word: I) -> bool
    where
        I: IntoIterator<Item = &'a Letter>,
    {
        let mut current = self.initial_states.clone();
        for letter in word {
            let mut next = StateSet::new();
            for state in &current {
                next.extend(self.transition(state, letter).iter().cloned());
            }
            if next.is_empty() {
                return false;
            }
            current = next;
        }
        current.iter().any(|q| self.final_states.contains(q))
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "states: {}", self.states)?;
        writeln!(f, "alphabet: {}", self.alphabet)?;
        writeln!(f, "initial states: {}", self.initial_states)?;
        writeln!(f, "final states: {}", self.final_states)?;
        writeln!(f, "transitions:")?;
        for (source, row) in &self.transitions {
            for (letter, targets) in row {
                writeln!(f, "  {} -- {} --> {}", source, letter, targets)?;
            }
        }
        Ok(())
    }
}

/// Generate a DOT structured string.
pub fn nfa_dot(nfa: &Nfa) -> String {
    let mut dot = String::from("digraph nfa {\n\trankdir=\"LR\";\n\tnode [shape = circle];\n");
    dot.push_str("\tstart [shape=\"none\", label=\"\"]\n");
    for state in nfa.initial_states() {
        dot.push_str(&format!("\tstart -> \"{}\"\n", state));
    }
    for state in nfa.final_states() {
        dot.push_str(&format!("\t\"{}\" [shape=\"doublecircle\"]\n", state));
    }
    for (from, row) in &nfa.transitions {
        for (letter, targets) in row {
            for to in targets {
                dot.push_str(&format!(
                    "\t\"{}\" -> \"{}\" [label=\"{}\"]\n",
                    from, to, letter
                ));
            }
        }
    }
    dot += "}";
    dot
}
