//! Command-line interface for the `slrtab` table generator.
//!
//! Reads a line-oriented grammar file, runs the full pipeline (epsilon
//! elimination, validation, directing-set solving, table construction), and
//! writes the tab-separated table to the output path. Any grammar or I/O
//! failure prints a diagnostic and exits non-zero.

#[cfg(feature = "cli")]
mod real {
    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use slrtab::{Grammar, TableOptions};
    use std::path::PathBuf;

    #[derive(Parser)]
    #[command(about = "Generate an SLR parsing table from a grammar file")]
    struct Args {
        /// Path to the grammar source file
        grammar: PathBuf,

        /// Path to the output table file
        output: PathBuf,

        /// Input symbols that always prefer shift over reduce
        #[arg(long = "prefer-shift", value_name = "NAME", default_values = ["ELSE"])]
        prefer_shift: Vec<String>,

        /// Enable debug logging (off by default).
        #[arg(short = 'd', long)]
        debug: bool,
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        if args.debug {
            env_logger::Builder::new()
                .filter_level(log::LevelFilter::Debug)
                .init();
        } else {
            env_logger::init();
        }

        let source = std::fs::read_to_string(&args.grammar)
            .with_context(|| format!("can't read {:?}", args.grammar))?;

        let rules = slrtab::parse_rules(&source)?;
        if rules.is_empty() {
            bail!("no rules found in {:?}", args.grammar);
        }

        let mut grammar = Grammar::from_rules(slrtab::eliminate_empty(rules));
        for rule in &grammar.rules {
            println!("{}", rule);
        }

        let terminals = grammar.terminal_names();
        slrtab::validate(&grammar, &terminals)?;
        slrtab::solve(&mut grammar);

        let opts = TableOptions {
            prefer_shift: args
                .prefer_shift
                .iter()
                .map(|name| name.as_str().into())
                .collect(),
        };
        let table = slrtab::create_table(&grammar, &opts)?;

        let mut out = std::fs::File::create(&args.output)
            .with_context(|| format!("can't create {:?}", args.output))?;
        slrtab::export_table(&mut out, &table)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("slrtab disabled (compiled without `cli` feature)");
}
