use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use bit_set::BitSet;
use log::debug;
use thiserror::Error;

use crate::symbol::{normalize_symbol, Symbol};

/// Dense state handle, assigned by interning at construction.
pub type StateId = usize;

#[derive(Debug, Error)]
pub enum AutomatonError {
    #[error("malformed transition: {0}")]
    MalformedTransition(String),
    #[error("missing required field '{0}'")]
    MissingRequiredField(String),
}

/// Epsilon-NFA over opaque string states and symbols.
///
/// States are interned to dense ids so state sets are bitsets, and the
/// transition relation is split at construction into epsilon adjacency and
/// per-symbol adjacency, both indexed by source state. The structure is
/// immutable once built; every search owns its own frontier state.
///
/// Symbol-keyed maps are ordered (`BTreeMap`/`BTreeSet`) so that edge
/// enumeration has a fixed total order; which of several equally short
/// witnesses a search returns depends on it.
#[derive(Debug)]
pub struct Automaton {
    names: Vec<String>,
    alphabet: BTreeSet<Symbol>,
    initial: BitSet,
    finals: BitSet,
    eps_adj: Vec<Vec<StateId>>,
    sym_adj: Vec<BTreeMap<Symbol, Vec<StateId>>>,
}

fn intern(name: &str, names: &mut Vec<String>, ids: &mut HashMap<String, StateId>) -> StateId {
    if let Some(&id) = ids.get(name) {
        return id;
    }
    let id = names.len();
    names.push(name.to_owned());
    ids.insert(name.to_owned(), id);
    id
}

impl Automaton {
    /// Builds an automaton from raw string sets and `(from, symbol, to)`
    /// triples. The symbol slot accepts any epsilon spelling (see
    /// [`normalize_symbol`]); epsilon spellings in `sigma` are dropped.
    ///
    /// States mentioned only in `initial`, `finals`, or `delta` are
    /// tolerated and interned; they simply contribute no further structure.
    /// Multi-edges are kept as-is. A transition whose endpoint name is
    /// empty or blank is rejected, construction is all-or-nothing.
    pub fn new(
        states: &[&str],
        sigma: &[&str],
        initial: &[&str],
        finals: &[&str],
        delta: &[(&str, &str, &str)],
    ) -> Result<Automaton, AutomatonError> {
        let mut names: Vec<String> = Vec::new();
        let mut ids: HashMap<String, StateId> = HashMap::new();

        for name in states {
            intern(name, &mut names, &mut ids);
        }
        for name in initial.iter().chain(finals) {
            intern(name, &mut names, &mut ids);
        }
        for (from, sym, to) in delta {
            if from.trim().is_empty() || to.trim().is_empty() {
                return Err(AutomatonError::MalformedTransition(format!(
                    "({:?}, {:?}, {:?})",
                    from, sym, to
                )));
            }
            intern(from, &mut names, &mut ids);
            intern(to, &mut names, &mut ids);
        }

        let n = names.len();
        let mut eps_adj: Vec<Vec<StateId>> = vec![Vec::new(); n];
        let mut sym_adj: Vec<BTreeMap<Symbol, Vec<StateId>>> = vec![BTreeMap::new(); n];
        for (from, sym, to) in delta {
            let p = ids[*from];
            let q = ids[*to];
            match normalize_symbol(Some(*sym)) {
                None => eps_adj[p].push(q),
                Some(a) => sym_adj[p].entry(a).or_default().push(q),
            }
        }

        let alphabet: BTreeSet<Symbol> = sigma
            .iter()
            .filter_map(|s| normalize_symbol(Some(*s)))
            .collect();

        let mut initial_set = BitSet::with_capacity(n);
        for name in initial {
            initial_set.insert(ids[*name]);
        }
        let mut final_set = BitSet::with_capacity(n);
        for name in finals {
            final_set.insert(ids[*name]);
        }

        debug!(
            "built automaton: {} states, {} alphabet symbols, {} transitions",
            n,
            alphabet.len(),
            delta.len()
        );

        Ok(Automaton {
            names,
            alphabet,
            initial: initial_set,
            finals: final_set,
            eps_adj,
            sym_adj,
        })
    }

    pub fn num_states(&self) -> usize {
        self.names.len()
    }

    /// Declared alphabet, epsilon excluded.
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn initial(&self) -> &BitSet {
        &self.initial
    }

    pub fn finals(&self) -> &BitSet {
        &self.finals
    }

    pub fn eps_moves(&self, q: StateId) -> &[StateId] {
        &self.eps_adj[q]
    }

    pub fn sym_moves(&self, q: StateId) -> &BTreeMap<Symbol, Vec<StateId>> {
        &self.sym_adj[q]
    }

    /// Every symbol that labels some transition, declared or not.
    pub fn transition_symbols(&self) -> BTreeSet<Symbol> {
        self.sym_adj
            .iter()
            .flat_map(|out| out.keys().cloned())
            .collect()
    }

    /// States reachable from `seed` by zero or more epsilon moves.
    pub fn epsilon_closure(&self, seed: &BitSet) -> BitSet {
        let mut closure = seed.clone();
        let mut queue: VecDeque<StateId> = seed.iter().collect();
        while let Some(q) = queue.pop_front() {
            for &r in &self.eps_adj[q] {
                if closure.insert(r) {
                    queue.push_back(r);
                }
            }
        }
        closure
    }

    /// Union of `sym`-successors over every state in `from`. Not closed
    /// under epsilon; callers chain [`Automaton::epsilon_closure`].
    pub fn symbol_move(&self, from: &BitSet, sym: &Symbol) -> BitSet {
        let mut result = BitSet::with_capacity(self.names.len());
        for q in from.iter() {
            if let Some(targets) = self.sym_adj[q].get(sym) {
                for &r in targets {
                    result.insert(r);
                }
            }
        }
        result
    }

    /// Replays `word` from the initial set and reports whether a final
    /// state is reached. This is the membership check the witness searches
    /// are sound against.
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut current = self.epsilon_closure(&self.initial);
        for sym in word {
            current = self.epsilon_closure(&self.symbol_move(&current, sym));
            if current.is_empty() {
                return false;
            }
        }
        !current.is_disjoint(&self.finals)
    }
}
