//! JSON automaton descriptions.
//!
//! An automaton object requires `Q`, `I`, `F`, and `Delta`; `Sigma` is
//! optional. `Delta` accepts a list of `[from, symbol, to]` triples, a list
//! of `{"from": …, "symbol": …, "to": …}` objects (lists may mix both), or
//! an adjacency object `{state: {symbol: target-or-list-of-targets}}`.
//! Scalars used as states or symbols are stringified; a `null` or missing
//! symbol is an epsilon move, as is any epsilon spelling the core
//! normalizer accepts.

use anyhow::{anyhow, bail, Result};
use serde_json::{json, Map, Value};
use verdict::{Automaton, AutomatonError};

pub fn automaton_from_value(value: &Value) -> Result<Automaton> {
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("automaton description must be a JSON object"))?;

    let states = name_list(required(obj, "Q")?, "Q")?;
    let sigma = match obj.get("Sigma") {
        Some(v) => name_list(v, "Sigma")?,
        None => Vec::new(),
    };
    let initial = name_list(required(obj, "I")?, "I")?;
    let finals = name_list(required(obj, "F")?, "F")?;
    let delta = transition_list(required(obj, "Delta")?)?;

    let states: Vec<&str> = states.iter().map(String::as_str).collect();
    let sigma: Vec<&str> = sigma.iter().map(String::as_str).collect();
    let initial: Vec<&str> = initial.iter().map(String::as_str).collect();
    let finals: Vec<&str> = finals.iter().map(String::as_str).collect();
    let delta: Vec<(&str, &str, &str)> = delta
        .iter()
        .map(|(p, a, q)| (p.as_str(), a.as_str(), q.as_str()))
        .collect();

    Ok(Automaton::new(&states, &sigma, &initial, &finals, &delta)?)
}

/// Extracts the `A1`/`A2` pair used by the intersection and inclusion
/// subcommands.
pub fn pair_from_value(value: &Value) -> Result<(Automaton, Automaton)> {
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("pair description must be a JSON object"))?;
    let a1 = automaton_from_value(required(obj, "A1")?)?;
    let a2 = automaton_from_value(required(obj, "A2")?)?;
    Ok((a1, a2))
}

fn required<'v>(obj: &'v Map<String, Value>, key: &str) -> Result<&'v Value> {
    obj.get(key)
        .ok_or_else(|| AutomatonError::MissingRequiredField(key.to_owned()).into())
}

/// Stringifies a scalar the way the automaton model expects its opaque
/// identifiers: strings verbatim, other scalars via their JSON rendering.
fn name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A transition's symbol slot; `null` means epsilon, which the core
/// normalizer spells as the empty string.
fn symbol_slot(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => name(other),
    }
}

fn name_list(value: &Value, key: &str) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| anyhow!("field '{}' must be a list", key))?;
    Ok(items.iter().map(name).collect())
}

fn transition_list(value: &Value) -> Result<Vec<(String, String, String)>> {
    let mut transitions = Vec::new();
    match value {
        // Adjacency shape: {state: {symbol: target-or-list}}
        Value::Object(map) => {
            for (state, sym_map) in map {
                let sym_map = sym_map.as_object().ok_or_else(|| {
                    AutomatonError::MalformedTransition(
                        "Delta object values must be objects of symbol -> targets".to_owned(),
                    )
                })?;
                for (sym, targets) in sym_map {
                    match targets {
                        Value::Array(items) => {
                            for target in items {
                                transitions.push((state.clone(), sym.clone(), name(target)));
                            }
                        }
                        single => transitions.push((state.clone(), sym.clone(), name(single))),
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Array(triple) if triple.len() == 3 => {
                        transitions.push((
                            name(&triple[0]),
                            symbol_slot(&triple[1]),
                            name(&triple[2]),
                        ));
                    }
                    Value::Object(entry) => {
                        let from = entry.get("from").filter(|v| !v.is_null());
                        let to = entry.get("to").filter(|v| !v.is_null());
                        let (Some(from), Some(to)) = (from, to) else {
                            bail!(AutomatonError::MalformedTransition(
                                "transition object must have 'from' and 'to'".to_owned(),
                            ));
                        };
                        let sym = entry.get("symbol").map(symbol_slot).unwrap_or_default();
                        transitions.push((name(from), sym, name(to)));
                    }
                    other => bail!(AutomatonError::MalformedTransition(other.to_string())),
                }
            }
        }
        _ => bail!(AutomatonError::MalformedTransition(
            "Delta must be a list or adjacency object".to_owned(),
        )),
    }
    Ok(transitions)
}

/// The demo automaton the `empty` and `complement` subcommands run with
/// `--demo`.
pub fn demo_automaton() -> Value {
    json!({
        "Q": ["q0", "q1", "q2"],
        "Sigma": ["a", "b"],
        "I": ["q0"],
        "F": ["q2"],
        "Delta": [
            ["q0", "a", "q1"],
            ["q1", "b", "q2"]
        ]
    })
}

/// The demo pair for `intersect` and `include`: L(A1) = {a}, L(A2) = {}.
pub fn demo_pair() -> Value {
    json!({
        "A1": {
            "Q": ["s0", "s1"],
            "Sigma": ["a"],
            "I": ["s0"],
            "F": ["s1"],
            "Delta": [["s0", "a", "s1"]]
        },
        "A2": {
            "Q": ["t0"],
            "Sigma": ["a"],
            "I": ["t0"],
            "F": [],
            "Delta": []
        }
    })
}
