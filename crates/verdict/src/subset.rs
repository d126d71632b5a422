use std::collections::{BTreeMap, HashMap};

use bit_set::BitSet;

use crate::automaton::Automaton;
use crate::symbol::Symbol;

/// Lazily determinized complement of an automaton.
///
/// A node is the epsilon-closure of a set of original states; the empty set
/// is the implicit dead state and a perfectly good node. A node accepts in
/// the complement iff it contains no final state. Successors are computed
/// on demand and memoized, so only the part of the (worst case `2^n`)
/// subset space that a search actually reaches is ever materialized.
///
/// The complement search runs this over the automaton's declared alphabet;
/// the inclusion search supplies a combined alphabet instead, which is why
/// the alphabet is a parameter rather than baked in.
pub struct SubsetMachine<'a> {
    aut: &'a Automaton,
    alphabet: Vec<Symbol>,
    steps: HashMap<BitSet, BTreeMap<Symbol, BitSet>>,
}

impl<'a> SubsetMachine<'a> {
    /// Machine over the automaton's declared alphabet.
    pub fn new(aut: &'a Automaton) -> SubsetMachine<'a> {
        let alphabet = aut.alphabet().iter().cloned().collect();
        Self::with_alphabet(aut, alphabet)
    }

    /// Machine over a caller-chosen alphabet.
    pub fn with_alphabet(aut: &'a Automaton, alphabet: Vec<Symbol>) -> SubsetMachine<'a> {
        SubsetMachine {
            aut,
            alphabet,
            steps: HashMap::new(),
        }
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    /// The start node, `closure(initial)`.
    pub fn start(&self) -> BitSet {
        self.aut.epsilon_closure(self.aut.initial())
    }

    /// True iff `node` is accepting in the complement, i.e. contains no
    /// final state of the underlying automaton.
    pub fn rejecting(&self, node: &BitSet) -> bool {
        node.is_disjoint(self.aut.finals())
    }

    /// Deterministic successor of `node` on `sym`, memoized by node value.
    pub fn step(&mut self, node: &BitSet, sym: &Symbol) -> BitSet {
        if let Some(next) = self.steps.get(node).and_then(|out| out.get(sym)) {
            return next.clone();
        }
        let next = self
            .aut
            .epsilon_closure(&self.aut.symbol_move(node, sym));
        self.steps
            .entry(node.clone())
            .or_default()
            .insert(sym.clone(), next.clone());
        next
    }
}
