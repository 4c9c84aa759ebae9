//! Grammar validator: reachability, productivity, and the syntactic
//! ambiguity heuristic.
//!
//! All three checks are fixed-point closures over the grammar and run once,
//! after epsilon-elimination and before directing-set solving; the first
//! failure aborts the pipeline with no partial result.

use crate::error::{GrammarError, join_names};
use crate::grammar::{EMPTY_SYMBOL, Grammar};
use smartstring::alias::String;
use std::collections::{BTreeSet, HashMap};

/// Runs all three checks in order: reachability, productivity, repetition.
pub fn validate(grammar: &Grammar, terminals: &[String]) -> Result<(), GrammarError> {
    check_reachable(grammar)?;
    check_productive(grammar, terminals)?;
    check_repetition(grammar)?;
    Ok(())
}

/// Fails with [`GrammarError::UnreachableSymbol`] if any declared
/// non-terminal is excluded from the closure that follows right-hand-side
/// non-terminal references from the start symbol.
pub fn check_reachable(grammar: &Grammar) -> Result<(), GrammarError> {
    let Some(start) = grammar.rules.first() else {
        return Ok(());
    };

    let non_terminals: BTreeSet<&str> = grammar.rules.iter().map(|r| r.lhs.as_str()).collect();
    let mut reachable: BTreeSet<&str> = BTreeSet::from([start.lhs.as_str()]);

    let mut changed = true;
    while changed {
        changed = false;
        for rule in &grammar.rules {
            if !reachable.contains(rule.lhs.as_str()) {
                continue;
            }
            for name in &rule.rhs {
                if non_terminals.contains(name.as_str()) && reachable.insert(name) {
                    changed = true;
                }
            }
        }
    }

    let unreachable: Vec<String> = non_terminals
        .difference(&reachable)
        .map(|&name| name.into())
        .collect();
    if !unreachable.is_empty() {
        return Err(GrammarError::UnreachableSymbol(unreachable));
    }
    log::debug!("all {} non-terminals reachable", non_terminals.len());
    Ok(())
}

/// Fails with [`GrammarError::UnproductiveSymbol`] when the leftover
/// unproductive non-terminals form a closed cycle.
///
/// Productivity grows by monotone fixed point: a non-terminal is productive
/// once some production's right-hand side consists entirely of vocabulary
/// symbols or already-productive non-terminals. A leftover symbol is only an
/// error when every non-terminal it depends on is itself unproductive — a
/// symbol blocked merely by ordering is not a dead-end.
pub fn check_productive(grammar: &Grammar, terminals: &[String]) -> Result<(), GrammarError> {
    let mut vocab: BTreeSet<&str> = terminals.iter().map(|s| s.as_str()).collect();
    vocab.insert(EMPTY_SYMBOL);

    let non_terminals: BTreeSet<&str> = grammar.rules.iter().map(|r| r.lhs.as_str()).collect();
    let mut productive: BTreeSet<&str> = BTreeSet::new();

    let mut changed = true;
    while changed {
        changed = false;
        for rule in &grammar.rules {
            if productive.contains(rule.lhs.as_str()) {
                continue;
            }
            let all_productive = rule
                .rhs
                .iter()
                .all(|s| vocab.contains(s.as_str()) || productive.contains(s.as_str()));
            if all_productive {
                productive.insert(&rule.lhs);
                changed = true;
            }
        }
    }

    let unproductive: BTreeSet<&str> = non_terminals.difference(&productive).copied().collect();
    if unproductive.is_empty() {
        return Ok(());
    }

    let mut deps: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for rule in &grammar.rules {
        for name in &rule.rhs {
            if non_terminals.contains(name.as_str()) {
                deps.entry(&rule.lhs).or_default().insert(name);
            }
        }
    }

    let dead: Vec<String> = unproductive
        .iter()
        .filter(|nt| {
            deps.get(*nt)
                .is_none_or(|d| d.iter().all(|dep| unproductive.contains(dep)))
        })
        .map(|&nt| nt.into())
        .collect();
    if !dead.is_empty() {
        return Err(GrammarError::UnproductiveSymbol(dead));
    }
    log::debug!("unproductive but not cyclic: {:?}", unproductive);
    Ok(())
}

/// Fails with [`GrammarError::AmbiguousGrammar`] if any rule's right-hand
/// side contains its own non-terminal more than once.
///
/// This is a cheap syntactic proxy, not an ambiguity decision procedure: it
/// over-rejects some unambiguous grammars and misses conflicts that only
/// surface during table construction. The two checks are kept independent
/// on purpose.
pub fn check_repetition(grammar: &Grammar) -> Result<(), GrammarError> {
    let mut offending: Vec<String> = Vec::new();
    for rule in &grammar.rules {
        let count = rule.rhs.iter().filter(|s| **s == rule.lhs).count();
        if count > 1 && !offending.contains(&rule.lhs) {
            offending.push(rule.lhs.clone());
        }
    }
    if !offending.is_empty() {
        return Err(GrammarError::AmbiguousGrammar(format!(
            "non-terminal repeated on its own right-hand side: {}",
            join_names(&offending)
        )));
    }
    Ok(())
}
