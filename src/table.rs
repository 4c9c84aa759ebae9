//! Automaton/table builder.
//!
//! Builds the shift/reduce table by simulating, for every state, which
//! grammar positions consuming a given input symbol moves the automaton to.
//! A state is an ordered list of annotated symbol occurrences (items) plus
//! a transition map from symbol name to an ordered, deduplicated target
//! list; two states are the same state iff their item lists are equal
//! element-wise, which is the key the frontier expansion dedups on.

use crate::directing::{after_non_terminal, merge_symbols};
use crate::error::GrammarError;
use crate::grammar::{ACCEPT_SYMBOL, END_SYMBOL, Grammar, REDUCE_SYMBOL, Symbol};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use smartstring::alias::String;
use std::collections::{BTreeSet, HashMap};

/// One row of the automaton: its items and its outgoing transitions, both
/// in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// The annotated grammar positions active in this state.
    pub items: Vec<Symbol>,

    /// Transition targets per input symbol name: further grammar positions,
    /// reduce markers, or the accept marker.
    pub transitions: IndexMap<String, Vec<Symbol>>,
}

/// The finished automaton: the grammar's alphabet and the ordered states,
/// with state 0 the start state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Every symbol name appearing anywhere in the grammar.
    pub alphabet: IndexSet<String>,

    /// The states, in discovery order.
    pub states: Vec<State>,
}

/// Construction policy knobs.
///
/// `prefer_shift` names the input symbols for which a shift always wins over
/// a reduce instead of raising a conflict (the dangling-else
/// disambiguation). The library default is empty; the CLI defaults it to
/// `ELSE`.
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Symbol names whose shift/reduce conflicts resolve silently to shift.
    pub prefer_shift: BTreeSet<String>,
}

fn conflict(name: &str) -> GrammarError {
    GrammarError::AmbiguousGrammar(format!("shift/reduce conflict on {:?}", name))
}

/// Merges shift targets into the state's transitions, each symbol under its
/// own name. Raises on a reduce already registered under that name, unless
/// the name prefers shift, in which case the reduce entries are evicted.
fn merge_shift(
    state: &mut State,
    symbols: &[Symbol],
    opts: &TableOptions,
) -> Result<(), GrammarError> {
    for symbol in symbols {
        match state.transitions.entry(symbol.name.clone()) {
            Entry::Occupied(mut entry) => {
                let targets = entry.get_mut();

                if opts.prefer_shift.contains(&symbol.name) {
                    targets.retain(|s| s.name.as_str() != REDUCE_SYMBOL);
                    if !targets.contains(symbol) {
                        targets.push(symbol.clone());
                    }
                    continue;
                }

                let has_shift = targets.iter().any(|s| s.name.as_str() != REDUCE_SYMBOL);
                let has_reduce = targets.iter().any(|s| s.name.as_str() == REDUCE_SYMBOL);
                let incoming_reduce = symbol.name.as_str() == REDUCE_SYMBOL;
                if (has_shift && incoming_reduce) || (has_reduce && !incoming_reduce) {
                    return Err(conflict(&symbol.name));
                }

                if !targets.contains(symbol) {
                    targets.push(symbol.clone());
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(vec![symbol.clone()]);
            }
        }
    }
    Ok(())
}

/// Registers a reduce by `rule` under the name of each directing symbol.
/// Raises when the name already holds a shift, unless the name prefers
/// shift, in which case the reduce is silently dropped.
fn merge_reduce(
    state: &mut State,
    symbols: &[Symbol],
    rule: usize,
    opts: &TableOptions,
) -> Result<(), GrammarError> {
    for symbol in symbols {
        let marker = Symbol::reduce(rule);
        match state.transitions.entry(symbol.name.clone()) {
            Entry::Occupied(mut entry) => {
                if opts.prefer_shift.contains(&symbol.name) {
                    continue;
                }

                let targets = entry.get_mut();
                if targets.iter().any(|s| s.name.as_str() != REDUCE_SYMBOL) {
                    return Err(conflict(&symbol.name));
                }
                if !targets.contains(&marker) {
                    targets.push(marker);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(vec![marker]);
            }
        }
    }
    Ok(())
}

/// Extends the state with the transition contributed by the symbol at
/// (`rule_idx`, `pos`) — the position one ahead of an item.
///
/// A non-terminal contributes its tagged occurrence plus the directing sets
/// of all its productions; the end marker contributes a reduce by
/// `rule_idx`; a plain terminal contributes just its tagged occurrence.
fn extend_with_next(
    grammar: &Grammar,
    rule_idx: usize,
    pos: usize,
    state: &mut State,
    opts: &TableOptions,
) -> Result<(), GrammarError> {
    let name = &grammar.rules[rule_idx].rhs[pos];
    let symbol = Symbol::at(name.clone(), rule_idx, pos);

    if grammar.is_non_terminal(name) {
        let mut outgoing = vec![symbol];
        for prod in grammar.productions_of(name) {
            outgoing.extend(prod.directing.iter().cloned());
        }
        merge_shift(state, &outgoing, opts)
    } else if name.as_str() == END_SYMBOL {
        merge_reduce(state, std::slice::from_ref(&symbol), rule_idx, opts)
    } else {
        merge_shift(state, std::slice::from_ref(&symbol), opts)
    }
}

/// Grammar positions survive into a state's item list; markers and
/// end-of-input occurrences do not.
fn is_item(symbol: &Symbol) -> bool {
    symbol.rule.is_some() && symbol.pos.is_some() && symbol.name.as_str() != END_SYMBOL
}

/// Materializes the state reached through `targets`: each surviving target
/// becomes an item, and each item contributes its outgoing transition — a
/// reduce over the after-non-terminal closure when the item ends its rule,
/// the next-position transition otherwise.
fn fill_state(
    grammar: &Grammar,
    targets: &[Symbol],
    opts: &TableOptions,
) -> Result<State, GrammarError> {
    let mut state = State::default();

    for symbol in targets {
        let (Some(rule_idx), Some(pos)) = (symbol.rule, symbol.pos) else {
            continue;
        };
        if symbol.name.as_str() == END_SYMBOL {
            continue;
        }
        state.items.push(symbol.clone());

        let rule = &grammar.rules[rule_idx];
        if pos + 1 == rule.rhs.len() {
            let closure = after_non_terminal(grammar, &rule.lhs, &BTreeSet::new());
            merge_reduce(&mut state, &closure, rule_idx, opts)?;
        } else {
            extend_with_next(grammar, rule_idx, pos + 1, &mut state, opts)?;
        }
    }

    Ok(state)
}

/// Builds the full table for a solved grammar.
///
/// State 0 is seeded from the start rule's directing set, an accept marker
/// under the start non-terminal's name, and a reduce under the end-of-input
/// key for any rule whose whole right-hand side is the end marker. The
/// frontier then expands breadth-first: every transition target list whose
/// surviving items are unseen materializes a new state, until no state
/// produces one. Dedup is an exact item-list lookup, so no two states in
/// the result share an item sequence.
///
/// Fails with [`GrammarError::AmbiguousGrammar`] on the first shift/reduce
/// conflict not covered by [`TableOptions::prefer_shift`]; no partial table
/// is returned.
///
/// # Panics
/// Panics on an empty grammar; the driver rejects those before building.
pub fn create_table(grammar: &Grammar, opts: &TableOptions) -> Result<Table, GrammarError> {
    assert!(
        !grammar.rules.is_empty(),
        "cannot build a table for an empty grammar"
    );

    let alphabet = grammar.alphabet();
    let start = grammar.start_symbol();

    let mut seed = State::default();
    seed.items.push(Symbol::marker(start));
    merge_shift(&mut seed, &grammar.rules[0].directing, opts)?;
    seed.transitions
        .insert(start.into(), vec![Symbol::marker(ACCEPT_SYMBOL)]);

    for (i, rule) in grammar.rules.iter().enumerate().skip(1) {
        if rule.rhs.len() == 1 && rule.rhs[0].as_str() == END_SYMBOL {
            seed.transitions
                .insert(END_SYMBOL.into(), vec![Symbol::reduce(i)]);
            continue;
        }
        if rule.lhs.as_str() == start {
            merge_shift(&mut seed, &rule.directing, opts)?;
        }
    }

    let mut states = vec![seed];
    let mut known: HashMap<Vec<Symbol>, usize> = HashMap::new();

    let mut current = 0;
    while current < states.len() {
        let target_lists: Vec<Vec<Symbol>> = states[current].transitions.values().cloned().collect();
        for targets in target_lists {
            let key: Vec<Symbol> = targets.iter().filter(|s| is_item(s)).cloned().collect();
            if key.is_empty() || known.contains_key(&key) {
                continue;
            }
            let state = fill_state(grammar, &targets, opts)?;
            debug_assert_eq!(state.items, key);
            log::trace!("state {}: {} items", states.len(), state.items.len());
            known.insert(key, states.len());
            states.push(state);
        }
        current += 1;
    }

    log::debug!(
        "table built: {} states over {} symbols",
        states.len(),
        alphabet.len()
    );
    Ok(Table { alphabet, states })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directing::solve;
    use crate::grammar::Rule;

    fn rule(lhs: &str, rhs: &[&str]) -> Rule {
        Rule::new(lhs, rhs.iter().map(|s| String::from(*s)).collect())
    }

    fn solved(rules: Vec<Rule>) -> Grammar {
        let mut grammar = Grammar::from_rules(rules);
        solve(&mut grammar);
        grammar
    }

    fn build(rules: Vec<Rule>) -> Result<Table, GrammarError> {
        create_table(&solved(rules), &TableOptions::default())
    }

    #[test]
    fn seed_state_accepts_on_start_symbol() {
        let table = build(vec![rule("S", &["a"])]).unwrap();
        let seed = &table.states[0];
        assert_eq!(seed.items, vec![Symbol::marker("S")]);
        assert_eq!(seed.transitions["S"], vec![Symbol::marker(ACCEPT_SYMBOL)]);
        assert_eq!(seed.transitions["a"], vec![Symbol::at("a", 0, 0)]);
    }

    #[test]
    fn seed_state_absorbs_all_start_productions() {
        let table = build(vec![rule("S", &["a"]), rule("S", &["b", "c"])]).unwrap();
        let seed = &table.states[0];
        assert_eq!(seed.transitions["a"], vec![Symbol::at("a", 0, 0)]);
        assert_eq!(seed.transitions["b"], vec![Symbol::at("b", 1, 0)]);
    }

    #[test]
    fn end_marker_rule_reduces_in_seed_state() {
        let table = build(vec![rule("S", &["a", "Z"]), rule("Z", &["#"])]).unwrap();
        let seed = &table.states[0];
        assert_eq!(seed.transitions[END_SYMBOL], vec![Symbol::reduce(1)]);
    }

    #[test]
    fn shift_reduce_conflict_is_detected() {
        // After `b`, seeing `a` could shift (rule 2 continues) or reduce
        // (rule 1 is done and `a` follows A in rule 0).
        let err = build(vec![
            rule("S", &["A", "a"]),
            rule("A", &["b"]),
            rule("A", &["b", "a"]),
        ])
        .unwrap_err();
        assert_eq!(err, conflict("a"));
    }

    #[test]
    fn prefer_shift_resolves_the_conflict() {
        let grammar = solved(vec![
            rule("S", &["A", "a"]),
            rule("A", &["b"]),
            rule("A", &["b", "a"]),
        ]);
        let opts = TableOptions {
            prefer_shift: BTreeSet::from([String::from("a")]),
        };
        let table = create_table(&grammar, &opts).unwrap();

        let state = table
            .states
            .iter()
            .find(|s| s.items.contains(&Symbol::at("b", 1, 0)))
            .unwrap();
        // The reduce by rule 1 was evicted; only the shift remains.
        assert_eq!(state.transitions["a"], vec![Symbol::at("a", 2, 1)]);
    }

    #[test]
    fn reduce_reduce_is_tolerated() {
        // Both A and B finish on `b` with `x` next; two reduce markers
        // co-register under `x` without raising.
        let grammar = solved(vec![
            rule("S", &["A", "x"]),
            rule("S", &["B", "x"]),
            rule("A", &["b"]),
            rule("B", &["b"]),
        ]);
        let table = create_table(&grammar, &TableOptions::default()).unwrap();
        let state = table
            .states
            .iter()
            .find(|s| s.items.contains(&Symbol::at("b", 2, 0)))
            .unwrap();
        assert_eq!(
            state.transitions["x"],
            vec![Symbol::reduce(2), Symbol::reduce(3)]
        );
    }

    #[test]
    #[should_panic(expected = "empty grammar")]
    fn empty_grammar_panics() {
        let _ = create_table(&Grammar::default(), &TableOptions::default());
    }
}
