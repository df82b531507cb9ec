pub mod automaton;
pub mod ltl;
pub mod regex;
pub mod set;

pub use automaton::{AutomatonError, Letter, Nfa, State};
pub use set::Set;
