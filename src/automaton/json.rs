//! The JSON interchange format
//!
//! ```text
//! {"States":[..],"Alphabet":[..],"InitialStates":[..],
//!  "Transitions":{"<state>":{"<letter>":["<state>",..]}},"FinalStates":[..]}
//! ```
//!
//! Decoding is lenient: every field may be missing or `null`, and states
//! or letters that are referenced without being declared are added to
//! the automaton. Only syntactically broken input is rejected.
use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Alphabet, AutomatonError, Letter, Nfa, State, StateSet, Transitions};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope<'a> {
    states: &'a StateSet,
    alphabet: &'a Alphabet,
    initial_states: &'a StateSet,
    transitions: &'a Transitions,
    final_states: &'a StateSet,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct RawEnvelope {
    states: Option<Vec<State>>,
    alphabet: Option<Vec<Letter>>,
    initial_states: Option<Vec<State>>,
    transitions: Option<BTreeMap<State, Option<BTreeMap<Letter, Option<Vec<State>>>>>>,
    final_states: Option<Vec<State>>,
}

impl Nfa {
    /// Decode an automaton from its JSON representation
    pub fn from_json(json: &str) -> Result<Nfa, AutomatonError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the automaton as compact JSON
    ///
    /// Transitions are sorted by state and letter and pairs without
    /// successors are left out, so the output is canonical.
    pub fn to_json(&self) -> Result<String, AutomatonError> {
        Ok(serde_json::to_string(self)?)
    }

    fn declare_state(&mut self, state: &State, role: &str) {
        if self.states.insert(state.clone()) {
            warn!("{} {} is not listed as a state, adding it", role, state);
        }
    }
}

impl From<RawEnvelope> for Nfa {
    fn from(raw: RawEnvelope) -> Self {
        let mut nfa = Nfa::new();
        nfa.states = raw.states.unwrap_or_default().into_iter().collect();
        nfa.alphabet = raw.alphabet.unwrap_or_default().into_iter().collect();

        for state in raw.initial_states.unwrap_or_default() {
            nfa.declare_state(&state, "initial state");
            nfa.initial_states.insert(state);
        }

        for (source, row) in raw.transitions.unwrap_or_default() {
            nfa.declare_state(&source, "transition source");
            for (letter, targets) in row.unwrap_or_default() {
                let targets: StateSet = targets.unwrap_or_default().into_iter().collect();
                if targets.is_empty() {
                    continue;
                }
                for target in &targets {
                    nfa.declare_state(target, "transition target");
                }
                if nfa.alphabet.insert(letter.clone()) {
                    warn!("letter {} is not listed in the alphabet, adding it", letter);
                }
                nfa.set_transition(source.clone(), letter, targets);
            }
        }

        for state in raw.final_states.unwrap_or_default() {
            nfa.declare_state(&state, "final state");
            nfa.final_states.insert(state);
        }

        debug_assert!(nfa.is_well_formed());
        nfa
    }
}

impl Serialize for Nfa {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Envelope {
            states: &self.states,
            alphabet: &self.alphabet,
            initial_states: &self.initial_states,
            transitions: &self.transitions,
            final_states: &self.final_states,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Nfa {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawEnvelope::deserialize(deserializer).map(Nfa::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::Set;

    #[test]
    fn encode_simple_nfa() {
        //                           +-+
        // --> 0 -- a --> 1 -- b --> |2|
        //     ^                     +-+
        //     |                      |
        //     +--------- a ----------+
        let mut nfa = Nfa::new();
        nfa.add_letter("a".into());
        nfa.add_letter("b".into());
        for q in ["0", "1", "2"] {
            nfa.add_state(q.into());
        }
        nfa.add_initial_state("0".into());
        nfa.add_final_state("2".into());
        nfa.add_transition("0".into(), "a".into(), "1".into());
        nfa.add_transition("1".into(), "b".into(), "2".into());
        nfa.add_transition("2".into(), "a".into(), "0".into());

        let json = r#"{"States":["0","1","2"],"Alphabet":["a","b"],"InitialStates":["0"],"Transitions":{"0":{"a":["1"]},"1":{"b":["2"]},"2":{"a":["0"]}},"FinalStates":["2"]}"#;
        assert_eq!(nfa.to_json().unwrap(), json);
        assert_eq!(Nfa::from_json(json).unwrap(), nfa);
    }

    #[test]
    fn round_trip() {
        // -> □ -> o
        //
        //    o -> □
        let mut nfa = Nfa::new();
        nfa.add_letter("a".into());
        for q in ["0", "1", "2", "3"] {
            nfa.add_state(q.into());
        }
        nfa.add_initial_state("0".into());
        nfa.add_final_state("0".into());
        nfa.add_final_state("3".into());
        nfa.set_transition("0".into(), "a".into(), Set::from(["1".into()]));
        nfa.set_transition("2".into(), "a".into(), Set::from(["3".into()]));

        let first = nfa.to_json().unwrap();
        let decoded = Nfa::from_json(&first).unwrap();
        assert_eq!(decoded, nfa);
        assert_eq!(decoded.to_json().unwrap(), first);
    }

    #[test]
    fn reencoding_is_byte_identical() {
        let json = r#"{"States":["2","1"],"Alphabet":["a","π"],"InitialStates":["2"],"Transitions":{"1":{"a":["2"]},"2":{"a":["1"],"π":["2","1"]}},"FinalStates":["2"]}"#;
        assert_eq!(Nfa::from_json(json).unwrap().to_json().unwrap(), json);
    }

    #[test]
    fn sparse_encoding() {
        let mut nfa = Nfa::new();
        nfa.add_letter("a".into());
        nfa.add_initial_state("0".into());
        nfa.set_transition("0".into(), "a".into(), Set::new());
        assert_eq!(
            nfa.to_json().unwrap(),
            r#"{"States":["0"],"Alphabet":["a"],"InitialStates":["0"],"Transitions":{},"FinalStates":[]}"#
        );
    }

    #[test]
    fn lenient_decoding() {
        let nfa = Nfa::from_json(
            r#"{"States":["0"],"InitialStates":["0","1"],"Transitions":{"1":{"a":["2"]},"3":{}},"FinalStates":["2"]}"#,
        )
        .unwrap();
        assert!(nfa.is_well_formed());
        assert_eq!(
            nfa.states(),
            &Set::from(["0".into(), "1".into(), "2".into(), "3".into()])
        );
        assert_eq!(nfa.alphabet(), &Set::from(["a".into()]));
        assert_eq!(
            nfa.transition(&"1".into(), &"a".into()),
            &Set::from(["2".into()])
        );
    }

    #[test]
    fn missing_fields() {
        let nfa = Nfa::from_json(r#"{"States":["0"],"Transitions":null}"#).unwrap();
        assert_eq!(nfa.states().len(), 1);
        assert!(nfa.initial_states().is_empty());
        assert!(nfa.alphabet().is_empty());

        let nfa = Nfa::from_json("{}").unwrap();
        assert!(nfa.states().is_empty());
    }

    #[test]
    fn malformed_envelope() {
        assert!(matches!(
            Nfa::from_json(r#"{"States":["0""#),
            Err(AutomatonError::Decode(_))
        ));
        assert!(matches!(
            Nfa::from_json(r#"{"States":"0"}"#),
            Err(AutomatonError::Decode(_))
        ));
        assert!(matches!(
            Nfa::from_json(r#"{"Transitions":{"0":["1"]}}"#),
            Err(AutomatonError::Decode(_))
        ));
    }
}
