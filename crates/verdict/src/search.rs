use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use bit_set::BitSet;
use log::debug;

use crate::automaton::{Automaton, StateId};
use crate::subset::SubsetMachine;
use crate::symbol::{Symbol, EPSILON};

/// A witness word. The empty word is a legal witness (an automaton whose
/// start set is already accepting, or whose complement accepts epsilon);
/// "no witness exists" is `None` at the search functions, not a `Word`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word(Vec<Symbol>);

impl Word {
    pub fn empty() -> Word {
        Word(Vec::new())
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(EPSILON);
        }
        for sym in &self.0 {
            write!(f, "{}", sym)?;
        }
        Ok(())
    }
}

/// Walks a predecessor map back from `end` to a start node (the only node
/// on the chain with no predecessor) and returns the consumed symbols in
/// traversal order. Epsilon edges contribute nothing.
fn reconstruct<N>(pred: &HashMap<N, (N, Option<Symbol>)>, end: &N) -> Word
where
    N: Eq + Hash + Clone,
{
    let mut symbols: Vec<Symbol> = Vec::new();
    let mut cur = end.clone();
    while let Some((prev, sym)) = pred.get(&cur) {
        if let Some(sym) = sym {
            symbols.push(sym.clone());
        }
        cur = prev.clone();
    }
    symbols.reverse();
    Word(symbols)
}

/// Shortest accepting word of `a`, or `None` if `L(a)` is empty.
///
/// "Shortest" counts transitions, not consumed symbols: the BFS layers by
/// edges, and an epsilon edge occupies a layer even though it adds nothing
/// to the word. Among accepting paths the one with the fewest edges wins,
/// even when a path with more edges would spell a shorter string.
pub fn find_witness(a: &Automaton) -> Option<Word> {
    if !a.initial().is_disjoint(a.finals()) {
        return Some(Word::empty());
    }

    let mut queue: VecDeque<StateId> = a.initial().iter().collect();
    let mut visited: BitSet = a.initial().clone();
    let mut pred: HashMap<StateId, (StateId, Option<Symbol>)> = HashMap::new();

    while let Some(p) = queue.pop_front() {
        for &q in a.eps_moves(p) {
            if visited.insert(q) {
                pred.insert(q, (p, None));
                if a.finals().contains(q) {
                    return Some(reconstruct(&pred, &q));
                }
                queue.push_back(q);
            }
        }
        for (sym, targets) in a.sym_moves(p) {
            for &q in targets {
                if visited.insert(q) {
                    pred.insert(q, (p, Some(sym.clone())));
                    if a.finals().contains(q) {
                        return Some(reconstruct(&pred, &q));
                    }
                    queue.push_back(q);
                }
            }
        }
    }
    None
}

/// Shortest word rejected by `a` (a witness for `L(a)` complement over the
/// declared alphabet), or `None` if `a` accepts every word.
///
/// Explores the implicit deterministic complement automaton through a
/// [`SubsetMachine`] instead of determinizing up front; nodes are
/// discovered and deduplicated by set value.
pub fn find_complement_witness(a: &Automaton) -> Option<Word> {
    let mut det = SubsetMachine::new(a);
    let start = det.start();
    if det.rejecting(&start) {
        return Some(Word::empty());
    }

    let alphabet: Vec<Symbol> = det.alphabet().to_vec();
    let mut queue: VecDeque<BitSet> = VecDeque::from([start.clone()]);
    let mut visited: HashSet<BitSet> = HashSet::from([start]);
    let mut pred: HashMap<BitSet, (BitSet, Option<Symbol>)> = HashMap::new();

    while let Some(node) = queue.pop_front() {
        for sym in &alphabet {
            let next = det.step(&node, sym);
            if visited.contains(&next) {
                continue;
            }
            visited.insert(next.clone());
            pred.insert(next.clone(), (node.clone(), Some(sym.clone())));
            if det.rejecting(&next) {
                return Some(reconstruct(&pred, &next));
            }
            queue.push_back(next);
        }
    }
    debug!("complement search exhausted {} subset nodes", visited.len());
    None
}

/// Shortest word accepted by both automata, or `None` if the intersection
/// of their languages is empty.
///
/// BFS over state pairs. Per dequeued pair: epsilon moves of `a1` alone,
/// then epsilon moves of `a2` alone, then synchronized moves on every
/// symbol both states can consume (enumerated through the smaller of the
/// two outgoing maps).
pub fn find_intersection_witness(a1: &Automaton, a2: &Automaton) -> Option<Word> {
    let start1 = a1.epsilon_closure(a1.initial());
    let start2 = a2.epsilon_closure(a2.initial());

    let accepting = |p: StateId, q: StateId| a1.finals().contains(p) && a2.finals().contains(q);

    let mut queue: VecDeque<(StateId, StateId)> = VecDeque::new();
    let mut visited: HashSet<(StateId, StateId)> = HashSet::new();
    for p in start1.iter() {
        for q in start2.iter() {
            if accepting(p, q) {
                return Some(Word::empty());
            }
            visited.insert((p, q));
            queue.push_back((p, q));
        }
    }

    let mut pred: HashMap<(StateId, StateId), ((StateId, StateId), Option<Symbol>)> =
        HashMap::new();

    while let Some((p, q)) = queue.pop_front() {
        for &p2 in a1.eps_moves(p) {
            let nxt = (p2, q);
            if visited.insert(nxt) {
                pred.insert(nxt, ((p, q), None));
                if accepting(p2, q) {
                    return Some(reconstruct(&pred, &nxt));
                }
                queue.push_back(nxt);
            }
        }
        for &q2 in a2.eps_moves(q) {
            let nxt = (p, q2);
            if visited.insert(nxt) {
                pred.insert(nxt, ((p, q), None));
                if accepting(p, q2) {
                    return Some(reconstruct(&pred, &nxt));
                }
                queue.push_back(nxt);
            }
        }

        let out1 = a1.sym_moves(p);
        let out2 = a2.sym_moves(q);
        let (small, large, swapped) = if out1.len() <= out2.len() {
            (out1, out2, false)
        } else {
            (out2, out1, true)
        };
        for (sym, small_targets) in small {
            let large_targets = match large.get(sym) {
                Some(targets) => targets,
                None => continue,
            };
            let (targets1, targets2) = if swapped {
                (large_targets, small_targets)
            } else {
                (small_targets, large_targets)
            };
            for &p2 in targets1 {
                for &q2 in targets2 {
                    let nxt = (p2, q2);
                    if visited.insert(nxt) {
                        pred.insert(nxt, ((p, q), Some(sym.clone())));
                        if accepting(p2, q2) {
                            return Some(reconstruct(&pred, &nxt));
                        }
                        queue.push_back(nxt);
                    }
                }
            }
        }
    }
    None
}

/// Shortest word accepted by `a1` but rejected by `a2`, or `None` if
/// `L(a1)` is included in `L(a2)`.
///
/// Product of `a1` with the lazily determinized complement of `a2`. The
/// alphabet handed to the subset machine is the union of both declared
/// alphabets and every symbol labeling a transition in either automaton,
/// so under-declared descriptions still determinize correctly.
pub fn find_inclusion_witness(a1: &Automaton, a2: &Automaton) -> Option<Word> {
    let mut sigma: BTreeSet<Symbol> = a1.alphabet().iter().cloned().collect();
    sigma.extend(a2.alphabet().iter().cloned());
    sigma.extend(a1.transition_symbols());
    sigma.extend(a2.transition_symbols());
    let mut det = SubsetMachine::with_alphabet(a2, sigma.into_iter().collect());

    let start2 = det.start();
    let mut queue: VecDeque<(StateId, BitSet)> = VecDeque::new();
    let mut visited: HashSet<(StateId, BitSet)> = HashSet::new();
    for p in a1.initial().iter() {
        if a1.finals().contains(p) && det.rejecting(&start2) {
            return Some(Word::empty());
        }
        let node = (p, start2.clone());
        if visited.insert(node.clone()) {
            queue.push_back(node);
        }
    }

    let mut pred: HashMap<(StateId, BitSet), ((StateId, BitSet), Option<Symbol>)> = HashMap::new();

    while let Some((p, s2)) = queue.pop_front() {
        for &q in a1.eps_moves(p) {
            let nxt = (q, s2.clone());
            if visited.contains(&nxt) {
                continue;
            }
            visited.insert(nxt.clone());
            pred.insert(nxt.clone(), ((p, s2.clone()), None));
            if a1.finals().contains(q) && det.rejecting(&s2) {
                return Some(reconstruct(&pred, &nxt));
            }
            queue.push_back(nxt);
        }
        for (sym, targets) in a1.sym_moves(p) {
            let next2 = det.step(&s2, sym);
            for &q in targets {
                let nxt = (q, next2.clone());
                if visited.contains(&nxt) {
                    continue;
                }
                visited.insert(nxt.clone());
                pred.insert(nxt.clone(), ((p, s2.clone()), Some(sym.clone())));
                if a1.finals().contains(q) && det.rejecting(&next2) {
                    return Some(reconstruct(&pred, &nxt));
                }
                queue.push_back(nxt);
            }
        }
    }
    None
}
