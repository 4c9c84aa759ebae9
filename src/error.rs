//! # Grammar Error Type
//!
//! This module defines [`GrammarError`], the single error surface for
//! grammar-soundness failures. All three variants are static properties of
//! the input grammar — retrying changes nothing — so they propagate
//! unchanged from the stage that detects them to the driver, which prints a
//! diagnostic and exits non-zero. The library itself never prints or exits.
//!
//! Internal invariant violations (an empty right-hand side reaching the
//! solver, an empty grammar reaching the builder) are *not* grammar errors:
//! they indicate a bug in the upstream rewriting stage and panic instead.

use smartstring::alias::String;
use thiserror::Error;

/// A grammar-soundness failure raised by the validator or the table builder.
///
/// The list variants carry the offending non-terminal names, sorted;
/// [`GrammarError::AmbiguousGrammar`] carries a message naming either the
/// self-repeating non-terminals (heuristic) or the conflicting input symbol
/// (shift/reduce conflict during construction).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarError {
    /// A declared non-terminal is never derivable from the start symbol.
    #[error("unreachable non-terminals: {}", join_names(.0))]
    UnreachableSymbol(Vec<String>),

    /// A non-terminal can never derive a terminal-only string: it sits in a
    /// cyclic dead-end where every non-terminal it depends on is itself
    /// unproductive.
    #[error("unproductive non-terminals: {}", join_names(.0))]
    UnproductiveSymbol(Vec<String>),

    /// The grammar admits two incompatible parse actions, caught either by
    /// the syntactic self-repetition heuristic or as a shift/reduce conflict
    /// while building the table.
    #[error("ambiguous grammar: {0}")]
    AmbiguousGrammar(std::string::String),
}

pub(crate) fn join_names(names: &[String]) -> std::string::String {
    names
        .iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
