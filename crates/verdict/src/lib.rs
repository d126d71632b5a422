mod automaton;
mod search;
mod subset;
mod symbol;


pub use automaton::{Automaton, AutomatonError, StateId};
pub use search::{
    find_complement_witness, find_inclusion_witness, find_intersection_witness, find_witness, Word,
};
pub use subset::SubsetMachine;
pub use symbol::{normalize_symbol, Symbol, BOTTOM, EPSILON};
