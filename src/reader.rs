//! Grammar ingestion: the line-oriented `A -> b c | d` source format and the
//! epsilon-elimination rewrite that runs before analysis.
//!
//! Reader errors are input errors (`anyhow`), not grammar-soundness errors:
//! this module owns the well-formedness of its own format, while the
//! validator owns the semantics of the resulting rule set.

use crate::grammar::{EMPTY_SYMBOL, Rule};
use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use smartstring::alias::String;
use std::collections::BTreeSet;

static RULE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+?)\s*->\s*(.+)$").unwrap());

/// Parses rule lines into a flat rule list.
///
/// Lines without `->` are skipped (blank lines, comments, prose). A rule
/// line is `LHS -> alt ( | alt )*`; each alternative yields one [`Rule`] in
/// file order. A line with `->` but no left-hand side, or with an empty
/// alternative, is an input error.
pub fn parse_rules(input: &str) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw_line.trim();

        if !line.contains("->") {
            continue;
        }

        let Some(cap) = RULE_RE.captures(line) else {
            bail!("Malformed rule at line ({}): {:?}", line_no, line);
        };

        let lhs = &cap[1];
        for alt in cap[2].split('|') {
            let rhs: Vec<String> = alt.split_whitespace().map(String::from).collect();
            if rhs.is_empty() {
                bail!("Empty alternative at line ({}): {:?}", line_no, line);
            }
            rules.push(Rule::new(lhs, rhs));
        }
    }

    log::debug!("parsed {} rules", rules.len());
    Ok(rules)
}

fn is_empty_rule(rule: &Rule) -> bool {
    rule.rhs.len() == 1 && rule.rhs[0].as_str() == EMPTY_SYMBOL
}

/// Appends to `out` every alternative derivable by dropping the nullable
/// non-terminal `nullable` from the rules that mention it.
///
/// A mentioning rule whose right-hand side is a single symbol makes its own
/// left-hand side transitively nullable; those are followed through a
/// work-list with a visited set, so mutually-referencing single-symbol rules
/// terminate. Returns whether anything new was added.
fn expand_nullable(rules: &[Rule], out: &mut Vec<Rule>, nullable: &str) -> bool {
    let mut changed = false;
    let mut queue: Vec<String> = vec![nullable.into()];
    let mut visited: BTreeSet<String> = BTreeSet::new();

    while let Some(name) = queue.pop() {
        if !visited.insert(name.clone()) {
            continue;
        }
        for rule in rules.iter().filter(|r| r.rhs.iter().any(|s| *s == name)) {
            if rule.rhs.len() == 1 {
                queue.push(rule.lhs.clone());
                continue;
            }
            let alt = Rule::new(
                rule.lhs.clone(),
                rule.rhs.iter().filter(|s| **s != name).cloned().collect(),
            );
            if !rules.contains(&alt) && !out.contains(&alt) {
                out.push(alt);
                changed = true;
            }
        }
    }

    changed
}

/// Rewrites the rule set to be free of epsilon-productions.
///
/// Whole passes repeat until a pass adds no new alternative; every pass
/// keeps the originals in order and appends, right after each nullable
/// rule, the alternatives that omit its non-terminal. The `-> e` rules
/// themselves are dropped at the end, so downstream stages only ever see
/// non-empty right-hand sides.
pub fn eliminate_empty(mut rules: Vec<Rule>) -> Vec<Rule> {
    let mut pass = 0;
    loop {
        pass += 1;
        let mut next = Vec::with_capacity(rules.len());
        let mut changed = false;

        for rule in &rules {
            next.push(rule.clone());
            if is_empty_rule(rule) {
                changed |= expand_nullable(&rules, &mut next, &rule.lhs);
            }
        }

        log::trace!("epsilon pass {}: {} rules", pass, next.len());
        rules = next;
        if !changed {
            break;
        }
    }

    rules.retain(|rule| !is_empty_rule(rule));
    rules
}
