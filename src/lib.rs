//! # slrtab
//!
//! An SLR-style parsing-table generator: given a context-free grammar as
//! production rules, it validates the grammar's structural soundness
//! (reachability, productivity, a syntactic ambiguity heuristic) and builds
//! a deduplicated shift/reduce automaton keyed by input symbol, ready for a
//! downstream parser that wants a fixed, precomputed decision table.
//!
//! ## Pipeline
//!
//! Data flows strictly forward:
//!
//! 1. [`reader`] — parse `A -> b c | d` lines and rewrite the rule set to be
//!    free of epsilon-productions;
//! 2. [`check`] — reachability, productivity, and the repetition heuristic;
//! 3. [`directing`] — grow every rule's directing-symbol set to a fixed
//!    point;
//! 4. [`table`] — expand the automaton frontier into deduplicated states
//!    with shift/reduce transitions, raising on conflicts;
//! 5. [`export`] — render the finished table as tab-separated text.
//!
//! All stages are single-threaded, synchronous, and in-memory; grammar
//! errors are static, so nothing is retried.
//!
//! ## Example
//!
//! ```rust
//! use slrtab::{Grammar, TableOptions};
//!
//! let rules = slrtab::parse_rules("S -> a S b | c").unwrap();
//! let mut grammar = Grammar::from_rules(slrtab::eliminate_empty(rules));
//!
//! let terminals = grammar.terminal_names();
//! slrtab::validate(&grammar, &terminals).unwrap();
//! slrtab::solve(&mut grammar);
//!
//! let table = slrtab::create_table(&grammar, &TableOptions::default()).unwrap();
//! assert_eq!(table.states.len(), 5);
//! ```

pub mod check;
pub mod directing;
pub mod error;
pub mod export;
pub mod grammar;
pub mod reader;
pub mod table;

pub use check::{check_productive, check_reachable, check_repetition, validate};
pub use directing::solve;
pub use error::GrammarError;
pub use export::export_table;
pub use grammar::{Grammar, Rule, Symbol};
pub use reader::{eliminate_empty, parse_rules};
pub use table::{State, Table, TableOptions, create_table};
