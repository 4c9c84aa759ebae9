//! Tab-separated table rendering for downstream consumers.

use crate::grammar::Symbol;
use crate::table::Table;
use std::io::{self, Write};

fn cell(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|symbol| format!("'{}'", symbol))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes the table as tab-separated text: a header row with one quoted
/// cell per alphabet symbol, then one row per state — its item list first,
/// then that state's transition target list under each alphabet symbol
/// (empty when the state has no transition for it).
pub fn export_table<W: Write>(out: &mut W, table: &Table) -> io::Result<()> {
    for name in &table.alphabet {
        write!(out, "\t'{}'", name)?;
    }
    writeln!(out)?;

    for state in &table.states {
        write!(out, "{}", cell(&state.items))?;
        for name in &table.alphabet {
            match state.transitions.get(name.as_str()) {
                Some(targets) => write!(out, "\t{}", cell(targets))?,
                None => write!(out, "\t")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
