//! Thompson-style construction without epsilon transitions
//!
//! [concat] and [union] first rename the states of both operands into a
//! common, disjoint name space (see [Renaming]) and then copy both
//! automata into the result. [kleene_star] works in place on its
//! argument.
use std::collections::BTreeMap;

use log::{debug, trace};

use super::{AutomatonError, Letter, Nfa, State, StateSet};
use crate::set::{intersect, join};

/// Which operand of a binary construction a state comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Side {
    Left,
    Right,
}

/// Assigns fresh names to the states of the operands of a binary
/// construction
///
/// Names are the indices `0, 1, 2, ...` handed out in order of first
/// use. The original name is never part of the new name, so the result
/// cannot contain collisions no matter how the operand states are named.
#[derive(Debug, Default)]
struct Renaming {
    names: BTreeMap<(Side, State), State>,
}

impl Renaming {
    fn rename(&mut self, side: Side, state: &State) -> State {
        let next = self.names.len();
        self.names
            .entry((side, state.clone()))
            .or_insert_with(|| State::indexed(next))
            .clone()
    }

    fn rename_all(&mut self, side: Side, states: &StateSet) -> StateSet {
        states.iter().map(|q| self.rename(side, q)).collect()
    }

    /// Copy the states and transitions of `nfa` into `target`
    fn copy_into(&mut self, side: Side, nfa: &Nfa, target: &mut Nfa) {
        for state in nfa.states() {
            let renamed = self.rename(side, state);
            target.add_state(renamed);
        }
        for (source, row) in &nfa.transitions {
            let source = self.rename(side, source);
            for (letter, targets) in row {
                let targets = self.rename_all(side, targets);
                target.set_transition(source.clone(), letter.clone(), targets);
            }
        }
    }
}

/// The automaton recognizing exactly the one-letter word `letter`
pub fn one_letter(letter: Letter) -> Nfa {
    let initial = State::indexed(0);
    let end = State::indexed(1);
    let mut nfa = Nfa::new();
    nfa.add_letter(letter.clone());
    nfa.add_initial_state(initial.clone());
    nfa.add_final_state(end.clone());
    nfa.add_transition(initial, letter, end);
    nfa
}

/// The automaton recognizing L(a)·L(b)
///
/// Every edge of `a` leading into a final state of `a` is duplicated to
/// lead into every initial state of `b` as well. If `a` accepts the
/// empty word the initial states of `b` are initial in the result, and
/// if `b` accepts the empty word the final states of `a` stay final.
pub fn concat(a: &Nfa, b: &Nfa) -> Nfa {
    let mut renaming = Renaming::default();
    let mut c = Nfa::new();
    c.alphabet = join(a.alphabet(), b.alphabet());
    renaming.copy_into(Side::Left, a, &mut c);
    renaming.copy_into(Side::Right, b, &mut c);

    let a_initial = renaming.rename_all(Side::Left, a.initial_states());
    let b_initial = renaming.rename_all(Side::Right, b.initial_states());
    c.initial_states = a_initial;
    if accepts_empty_word(a) {
        c.initial_states.extend(b_initial.iter().cloned());
    }

    c.final_states = renaming.rename_all(Side::Right, b.final_states());
    if accepts_empty_word(b) {
        c.final_states
            .extend(renaming.rename_all(Side::Left, a.final_states()));
    }

    for (source, row) in &a.transitions {
        let source = renaming.rename(Side::Left, source);
        for (letter, targets) in row {
            if intersect(targets, a.final_states()).is_empty() {
                continue;
            }
            let spliced = join(c.transition(&source, letter), &b_initial);
            trace!("splice {} -- {} --> {}", source, letter, spliced);
            c.set_transition(source.clone(), letter.clone(), spliced);
        }
    }

    debug!(
        "concat: {} + {} states -> {} states",
        a.states().len(),
        b.states().len(),
        c.states().len()
    );
    debug_assert!(c.is_well_formed());
    c
}

/// The automaton recognizing L(a) ∪ L(b)
///
/// Both operands are copied side by side without any connecting edges.
pub fn union(a: &Nfa, b: &Nfa) -> Nfa {
    let mut renaming = Renaming::default();
    let mut c = Nfa::new();
    c.alphabet = join(a.alphabet(), b.alphabet());
    renaming.copy_into(Side::Left, a, &mut c);
    renaming.copy_into(Side::Right, b, &mut c);

    for (side, nfa) in [(Side::Left, a), (Side::Right, b)] {
        let initial = renaming.rename_all(side, nfa.initial_states());
        c.initial_states.extend(initial);
        let end = renaming.rename_all(side, nfa.final_states());
        c.final_states.extend(end);
    }

    debug!(
        "union: {} + {} states -> {} states",
        a.states().len(),
        b.states().len(),
        c.states().len()
    );
    debug_assert!(c.is_well_formed());
    c
}

/// Turn `a` into the automaton recognizing L(a)*, in place
///
/// A fresh state `q0` becomes the only initial and the only final state.
/// Every edge into a final state gets a copy leading into `q0`, and `q0`
/// inherits the outgoing edges of all former initial states.
pub fn kleene_star(a: &mut Nfa) -> Result<(), AutomatonError> {
    let q0 = (0..=usize::MAX)
        .map(State::indexed)
        .find(|q| !a.states.contains(q))
        .ok_or(AutomatonError::FreshNamesExhausted)?;
    a.add_state(q0.clone());

    let mut into_final: Vec<(State, Letter)> = Vec::new();
    for (source, row) in &a.transitions {
        for (letter, targets) in row {
            if !intersect(targets, &a.final_states).is_empty() {
                into_final.push((source.clone(), letter.clone()));
            }
        }
    }
    for (source, letter) in into_final {
        a.add_transition(source, letter, q0.clone());
    }

    let restart: Vec<(Letter, StateSet)> = a
        .initial_states
        .iter()
        .flat_map(|q| a.edges(q))
        .map(|(letter, targets)| (letter.clone(), targets.clone()))
        .collect();
    for (letter, targets) in restart {
        let joined = join(&targets, a.transition(&q0, &letter));
        a.set_transition(q0.clone(), letter, joined);
    }

    a.initial_states.clear();
    a.initial_states.insert(q0.clone());
    a.final_states.clear();
    a.final_states.insert(q0);

    debug!("kleene star: {} states", a.states().len());
    debug_assert!(a.is_well_formed());
    Ok(())
}

fn accepts_empty_word(nfa: &Nfa) -> bool {
    nfa.initial_states()
        .iter()
        .any(|q| nfa.final_states().contains(q))
}
