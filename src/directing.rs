//! Directing-set solver.
//!
//! For each rule `R: N -> α`, the directing set collects the symbols that
//! can legitimately begin the continuation after matching `α` — what the
//! table builder later uses to decide, at the end of a right-hand side,
//! which input symbols justify reducing by `R`.
//!
//! The solver grows every rule's set to a fixed point: each pass only adds
//! symbols, over a universe bounded by rule count times position count, so
//! convergence is a single `changed` flag going quiet. The
//! after-non-terminal closure threads an explicit visited-rule set through
//! its recursion, which keeps mutual tail-references terminating by
//! construction.

use crate::grammar::{EMPTY_SYMBOL, Grammar, Rule, Symbol};
use std::collections::BTreeSet;

/// Appends to `current` every symbol in `new` it does not already contain
/// (by structural equality), preserving arrival order. Returns whether
/// anything was added.
pub(crate) fn merge_symbols(
    current: &mut Vec<Symbol>,
    new: impl IntoIterator<Item = Symbol>,
) -> bool {
    let mut changed = false;
    for symbol in new {
        if !current.contains(&symbol) {
            current.push(symbol);
            changed = true;
        }
    }
    changed
}

/// The directing symbols of every production of `non_terminal`, in rule
/// order.
fn non_terminal_directing(grammar: &Grammar, non_terminal: &str) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    for rule in grammar.productions_of(non_terminal) {
        symbols.extend(rule.directing.iter().cloned());
    }
    symbols
}

/// Collects, within one rule, the symbols that can follow each occurrence
/// of `non_terminal` in its right-hand side.
///
/// An occurrence in final position defers to whatever can follow this
/// rule's own non-terminal (recursing with the caller's visited set);
/// otherwise the symbol one position ahead is taken, tagged with its
/// rule/position, preceded by the directing sets of its productions when it
/// is itself a non-terminal.
fn after_in_rule(
    grammar: &Grammar,
    rule: &Rule,
    rule_idx: usize,
    non_terminal: &str,
    visited: &BTreeSet<usize>,
) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    let mut start = 0;

    while let Some(offset) = rule.rhs[start..].iter().position(|s| s == non_terminal) {
        let next = start + offset + 1;
        if next >= rule.rhs.len() {
            symbols.extend(after_non_terminal(grammar, &rule.lhs, visited));
        } else {
            let next_name = &rule.rhs[next];
            if grammar.is_non_terminal(next_name) {
                symbols.extend(non_terminal_directing(grammar, next_name));
            }
            symbols.push(Symbol::at(next_name.clone(), rule_idx, next));
        }
        start = next;
    }

    symbols
}

/// The after-non-terminal closure: every symbol that can appear immediately
/// after an occurrence of `non_terminal` in any rule not in `visited`.
///
/// Each scanned rule is added to the visited set before recursing through
/// it, so chains of tail occurrences terminate over the finite rule-index
/// universe.
pub(crate) fn after_non_terminal(
    grammar: &Grammar,
    non_terminal: &str,
    visited: &BTreeSet<usize>,
) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    for (i, rule) in grammar.rules.iter().enumerate() {
        if visited.contains(&i) {
            continue;
        }
        let mut inner = visited.clone();
        inner.insert(i);
        symbols.extend(after_in_rule(grammar, rule, i, non_terminal, &inner));
    }
    symbols
}

/// One seeding pass over rule `i`: the symbols its directing set should
/// absorb given the current state of all other sets.
fn seed_rule(grammar: &Grammar, i: usize) -> Vec<Symbol> {
    let rule = &grammar.rules[i];
    assert!(
        !rule.rhs.is_empty(),
        "rule {} has an empty right-hand side",
        i
    );

    if rule.rhs.len() == 1 && rule.rhs[0].as_str() == EMPTY_SYMBOL {
        return after_non_terminal(grammar, &rule.lhs, &BTreeSet::new());
    }

    let mut symbols = Vec::new();
    let first = &rule.rhs[0];
    if grammar.is_non_terminal(first) {
        symbols.extend(non_terminal_directing(grammar, first));
    }
    symbols.push(Symbol::at(first.clone(), i, 0));
    symbols
}

/// Grows every rule's directing set in place until no set grows any
/// further.
///
/// # Panics
/// Panics if a rule with an empty right-hand side reaches the solver; that
/// is a bug in the epsilon-elimination stage, not a property of the input
/// grammar.
pub fn solve(grammar: &mut Grammar) {
    let mut pass = 0;
    loop {
        pass += 1;
        let mut changed = false;
        for i in 0..grammar.rules.len() {
            let fresh = seed_rule(grammar, i);
            changed |= merge_symbols(&mut grammar.rules[i].directing, fresh);
        }
        log::trace!("directing pass {}: changed={}", pass, changed);
        if !changed {
            break;
        }
    }
    log::debug!("directing sets converged after {} passes", pass);
}
