//! Grammar model: symbols, rules, and the queries the analysis stages run
//! against them.
//!
//! The model is pure data. A [`Symbol`] identifies either a concrete grammar
//! position (a name tagged with the rule and offset it occurs at) or an
//! abstract marker (start, accept, reduce). A [`Rule`] is one production with
//! its directing-symbol set, and a [`Grammar`] is the ordered rule list —
//! the rule's index in that list is its identity, referenced back from
//! [`Symbol::rule`].

use indexmap::IndexSet;
use smartstring::alias::String;
use std::fmt;

/// Name of the empty (epsilon) production marker.
pub const EMPTY_SYMBOL: &str = "e";

/// Name of the end-of-input marker.
pub const END_SYMBOL: &str = "#";

/// Name tagging a reduce action inside a transition target list.
pub const REDUCE_SYMBOL: &str = "R";

/// Name tagging successful completion in the start state.
pub const ACCEPT_SYMBOL: &str = "OK";

/// A grammar symbol occurrence or an abstract marker.
///
/// Equality is structural over all three fields: two occurrences of the same
/// name at different rule/position are distinct symbols. A symbol with both
/// indices absent is a bare marker (start, accept), not a grammar position;
/// a reduce marker carries only the rule index of the rule it reduces by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Token text or non-terminal name.
    pub name: String,

    /// Index of the rule this occurrence belongs to, if any.
    pub rule: Option<usize>,

    /// Offset within that rule's right-hand side, if any.
    pub pos: Option<usize>,
}

impl Symbol {
    /// Creates a bare marker symbol carrying no grammar position.
    pub fn marker(name: impl Into<String>) -> Self {
        Symbol {
            name: name.into(),
            rule: None,
            pos: None,
        }
    }

    /// Creates a symbol occurrence tagged with its rule and position.
    pub fn at(name: impl Into<String>, rule: usize, pos: usize) -> Self {
        Symbol {
            name: name.into(),
            rule: Some(rule),
            pos: Some(pos),
        }
    }

    /// Creates a reduce marker for the given rule.
    pub fn reduce(rule: usize) -> Self {
        Symbol {
            name: REDUCE_SYMBOL.into(),
            rule: Some(rule),
            pos: None,
        }
    }
}

/// Renders the display form used in exported tables: the bare name, or the
/// name suffixed with the 1-based rule number and then the 1-based position
/// number, for whichever indices are present.
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rule, self.pos) {
            (Some(rule), Some(pos)) => write!(f, "{}{}{}", self.name, rule + 1, pos + 1),
            (Some(rule), None) => write!(f, "{}{}", self.name, rule + 1),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// One production `lhs -> rhs`, plus its directing-symbol set.
///
/// The right-hand side is never empty: an empty production is represented as
/// exactly one [`EMPTY_SYMBOL`] entry, eliminated before analysis. The
/// `directing` set starts empty and is grown in place by
/// [`solve`](crate::directing::solve); rule equality covers all three fields,
/// which is what the epsilon-elimination pass dedups new alternatives by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The non-terminal this rule produces.
    pub lhs: String,

    /// Ordered right-hand-side symbol names.
    pub rhs: Vec<String>,

    /// Directing symbols: what can begin the continuation after matching
    /// `rhs`. Empty until solved.
    pub directing: Vec<Symbol>,
}

impl Rule {
    /// Creates a rule with an empty directing set.
    pub fn new(lhs: impl Into<String>, rhs: Vec<String>) -> Self {
        Rule {
            lhs: lhs.into(),
            rhs,
            directing: Vec::new(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        for name in &self.rhs {
            write!(f, " {}", name)?;
        }
        Ok(())
    }
}

/// An ordered rule list. Rule 0 is the start rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    /// The rules, indexed by position.
    pub rules: Vec<Rule>,
}

impl Grammar {
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Grammar { rules }
    }

    /// The start non-terminal: rule 0's left-hand side.
    ///
    /// # Panics
    /// Panics on an empty grammar; callers reject those before analysis.
    pub fn start_symbol(&self) -> &str {
        &self.rules[0].lhs
    }

    /// A name is a non-terminal iff some rule produces it.
    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.lhs.as_str() == name)
    }

    /// All rules whose left-hand side is `name` ("productions of X").
    pub fn productions_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Rule> {
        self.rules.iter().filter(move |rule| rule.lhs.as_str() == name)
    }

    /// All rules whose right-hand side contains `name` at any position
    /// ("rules mentioning X"), with their indices.
    pub fn rules_mentioning<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Rule)> {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.rhs.iter().any(|s| s == name))
    }

    /// Every symbol name appearing anywhere in the grammar, in
    /// first-appearance order (left-hand side first, then the right-hand
    /// side, per rule in order).
    pub fn alphabet(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        for rule in &self.rules {
            names.insert(rule.lhs.clone());
            for name in &rule.rhs {
                names.insert(name.clone());
            }
        }
        names
    }

    /// The terminal vocabulary: every right-hand-side name that no rule
    /// produces, in first-appearance order.
    pub fn terminal_names(&self) -> Vec<String> {
        let mut names = IndexSet::new();
        for rule in &self.rules {
            for name in &rule.rhs {
                if !self.is_non_terminal(name) {
                    names.insert(name.clone());
                }
            }
        }
        names.into_iter().collect()
    }
}
