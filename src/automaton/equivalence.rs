//! Equality of automata up to a renaming of their states
//!
//! Two automata are equivalent if there is a bijection between their
//! states that maps initial states to initial states, final states to
//! final states and every edge onto an edge with the same letter.
//!
//! The bijection is found by backtracking. States are only ever paired
//! with states of the same [Signature] (initial/final flags and the
//! number of incoming, outgoing and looping edges per letter), and every
//! new pair is checked against the pairs chosen so far. States are
//! visited in breadth-first order from the initial states so that a new
//! state usually has an already paired neighbour, which rules out most
//! candidates immediately.
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use log::trace;

use super::{Letter, Nfa, State};

/// Renaming-invariant description of the neighbourhood of a state
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Signature<'a> {
    initial: bool,
    accepting: bool,
    outgoing: BTreeMap<&'a Letter, usize>,
    incoming: BTreeMap<&'a Letter, usize>,
    loops: Vec<&'a Letter>,
}

/// An automaton with its states numbered by position
struct Graph<'a> {
    states: Vec<&'a State>,
    successors: Vec<Vec<(&'a Letter, usize)>>,
    predecessors: Vec<Vec<(&'a Letter, usize)>>,
    edges: HashSet<(usize, &'a Letter, usize)>,
    signatures: Vec<Signature<'a>>,
}

impl<'a> Graph<'a> {
    fn new(nfa: &'a Nfa) -> Self {
        let states: Vec<&State> = nfa.states().iter().collect();
        let index: HashMap<&State, usize> = states.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        let mut successors = vec![Vec::new(); states.len()];
        let mut predecessors = vec![Vec::new(); states.len()];
        let mut edges = HashSet::new();
        for (source, row) in &nfa.transitions {
            let Some(&s) = index.get(source) else {
                continue;
            };
            for (letter, targets) in row {
                for target in targets {
                    let Some(&t) = index.get(target) else {
                        continue;
                    };
                    successors[s].push((letter, t));
                    predecessors[t].push((letter, s));
                    edges.insert((s, letter, t));
                }
            }
        }

        let signatures = (0..states.len())
            .map(|i| {
                let mut signature = Signature {
                    initial: nfa.initial_states().contains(states[i]),
                    accepting: nfa.final_states().contains(states[i]),
                    outgoing: BTreeMap::new(),
                    incoming: BTreeMap::new(),
                    loops: Vec::new(),
                };
                for &(letter, t) in &successors[i] {
                    *signature.outgoing.entry(letter).or_default() += 1;
                    if t == i {
                        signature.loops.push(letter);
                    }
                }
                for &(letter, _) in &predecessors[i] {
                    *signature.incoming.entry(letter).or_default() += 1;
                }
                signature.loops.sort();
                signature
            })
            .collect();

        Graph {
            states,
            successors,
            predecessors,
            edges,
            signatures,
        }
    }

    fn len(&self) -> usize {
        self.states.len()
    }

    /// States in breadth-first order from the initial states, followed
    /// by the states that are not reachable
    fn search_order(&self) -> Vec<usize> {
        let mut seen = vec![false; self.len()];
        let mut order = Vec::with_capacity(self.len());
        let roots: Vec<usize> = (0..self.len())
            .filter(|&i| self.signatures[i].initial)
            .chain(0..self.len())
            .collect();
        for root in roots {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            let mut queue = VecDeque::from([root]);
            while let Some(i) = queue.pop_front() {
                order.push(i);
                for &(_, j) in self.successors[i].iter().chain(&self.predecessors[i]) {
                    if !seen[j] {
                        seen[j] = true;
                        queue.push_back(j);
                    }
                }
            }
        }
        order
    }
}

/// Backtracking search for a bijection between the states of two graphs
struct Matcher<'a, 'b> {
    left: &'b Graph<'a>,
    right: &'b Graph<'a>,
    order: Vec<usize>,
    /// right state paired with each left state
    mapping: Vec<Option<usize>>,
    /// whether a right state is already paired
    used: Vec<bool>,
}

impl Matcher<'_, '_> {
    fn search(&mut self, depth: usize) -> bool {
        let Some(&s) = self.order.get(depth) else {
            return true;
        };
        for t in self.candidates(s) {
            if !self.consistent(s, t) {
                continue;
            }
            self.mapping[s] = Some(t);
            self.used[t] = true;
            if self.search(depth + 1) {
                return true;
            }
            self.mapping[s] = None;
            self.used[t] = false;
        }
        trace!("no partner for state {}", self.left.states[s]);
        false
    }

    /// Unused right states with the signature of left state `s`. A right
    /// state with the same name comes first.
    fn candidates(&self, s: usize) -> Vec<usize> {
        let mut candidates: Vec<usize> = (0..self.right.len())
            .filter(|&t| !self.used[t] && self.right.signatures[t] == self.left.signatures[s])
            .collect();
        let name = self.left.states[s];
        candidates.sort_by_key(|&t| self.right.states[t] != name);
        candidates
    }

    /// Check that pairing `s` with `t` maps every edge between `s` and an
    /// already paired state (or `s` itself) onto an edge of the right graph
    fn consistent(&self, s: usize, t: usize) -> bool {
        let image = |i: usize| if i == s { Some(t) } else { self.mapping[i] };
        self.left.successors[s].iter().all(|&(letter, j)| match image(j) {
            Some(u) => self.right.edges.contains(&(t, letter, u)),
            None => true,
        }) && self.left.predecessors[s].iter().all(|&(letter, j)| match image(j) {
            Some(u) => self.right.edges.contains(&(u, letter, t)),
            None => true,
        })
    }
}

impl Nfa {
    /// Decide whether `self` and `other` are the same automaton up to the
    /// names of their states
    ///
    /// Letters are compared by value. States that cannot be reached still
    /// count, so an automaton with an additional isolated state is not
    /// equivalent to the original.
    pub fn is_equivalent(&self, other: &Nfa) -> bool {
        if self.states.len() != other.states.len()
            || self.initial_states.len() != other.initial_states.len()
            || self.final_states.len() != other.final_states.len()
            || self.alphabet != other.alphabet
        {
            return false;
        }

        let left = Graph::new(self);
        let right = Graph::new(other);
        if left.edges.len() != right.edges.len() {
            return false;
        }
        let mut left_signatures = left.signatures.clone();
        let mut right_signatures = right.signatures.clone();
        left_signatures.sort();
        right_signatures.sort();
        if left_signatures != right_signatures {
            return false;
        }

        let mut matcher = Matcher {
            left: &left,
            right: &right,
            order: left.search_order(),
            mapping: vec![None; left.len()],
            used: vec![false; right.len()],
        };
        matcher.search(0)
    }
}

/// Structural equivalence, see [Nfa::is_equivalent]
impl PartialEq for Nfa {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent(other)
    }
}
