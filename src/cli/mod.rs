//! The zakkro Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions. Trees arrive as JSON-serialized
//! [`SourceFile`]s produced by the host parser.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use miette::Report;
use termcolor::{ColorChoice, StandardStream};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::ast::printer::print_file;
use crate::ast::{SourceFile, Span};
use crate::cli::args::{Command, ZakkroArgs};
use crate::diagnostics::to_error_source;
use crate::macros::{expand_file, ExpansionOutcome, MacroContext, MacroRegistry};
use crate::{err_ctx, err_msg, ZakkroError};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ZakkroArgs::parse();
    init_tracing(args.verbose);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Expand {
            file,
            source,
            json,
            reference_enum,
            reference_cases,
        } => {
            let options = ExpandOptions {
                source,
                reference_enum,
                reference_cases,
            };
            handle_expand(&file, &options, json)
        }
        Command::Macrotrace { file, source } => {
            let options = ExpandOptions {
                source,
                ..Default::default()
            };
            handle_macrotrace(&file, &options)
        }
        Command::ListMacros => handle_list_macros(),
    };

    if let Err(e) = result {
        eprintln!("{:?}", Report::new(e));
        process::exit(1);
    }
}

/// Logs go to stderr; `--verbose` overrides `RUST_LOG`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("zakkro=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Per-run settings shared by `expand` and `macrotrace`.
#[derive(Debug, Default)]
struct ExpandOptions {
    source: Option<PathBuf>,
    reference_enum: Option<String>,
    reference_cases: Option<Vec<String>>,
}

/// Handles the `expand` subcommand.
fn handle_expand(path: &Path, options: &ExpandOptions, json: bool) -> Result<(), ZakkroError> {
    let outcome = run_expansion(path, options)?;
    if json {
        let text = serde_json::to_string_pretty(&outcome)
            .map_err(|e| err_msg!(Io, "Could not serialize the expansion result").with_cause(e))?;
        println!("{}", text);
    } else {
        println!("{}", print_file(&outcome.file));
    }
    finish(&outcome)
}

/// Handles the `macrotrace` subcommand.
fn handle_macrotrace(path: &Path, options: &ExpandOptions) -> Result<(), ZakkroError> {
    let outcome = run_expansion(path, options)?;
    output::print_trace(&outcome.trace)
        .map_err(|e| err_msg!(Io, "Could not write the trace").with_cause(e))?;
    finish(&outcome)
}

/// Handles the `list-macros` subcommand.
fn handle_list_macros() -> Result<(), ZakkroError> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    output::write_macro_list(&mut stdout, MacroRegistry::standard())
        .map_err(|e| err_msg!(Io, "Could not write the macro list").with_cause(e))
}

fn run_expansion(path: &Path, options: &ExpandOptions) -> Result<ExpansionOutcome, ZakkroError> {
    let file = read_tree(path)?;
    let mut ctx = MacroContext::new(file.name.clone());
    if let Some(source_path) = &options.source {
        ctx = ctx.with_source(read_text(source_path)?);
    }
    if let Some(name) = &options.reference_enum {
        ctx = ctx.with_reference_enum(name.clone());
    }
    if let Some(cases) = &options.reference_cases {
        ctx = ctx.with_reference_cases(cases.iter().cloned());
    }
    debug!(file = %file.name, items = file.items.len(), "expanding tree");
    Ok(expand_file(file, MacroRegistry::standard(), &ctx))
}

/// Prints diagnostics and turns any of them into a failing exit.
fn finish(outcome: &ExpansionOutcome) -> Result<(), ZakkroError> {
    if outcome.is_success() {
        return Ok(());
    }
    output::eprint_diagnostics(&outcome.diagnostics);
    Err(err_msg!(
        Expansion,
        "{} macro invocation(s) failed",
        outcome.diagnostics.len()
    ))
}

fn read_text(path: &Path) -> Result<String, ZakkroError> {
    fs::read_to_string(path)
        .map_err(|e| err_msg!(Io, "Could not read '{}'", path.display()).with_cause(e))
}

fn read_tree(path: &Path) -> Result<SourceFile, ZakkroError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| {
        let offset = offset_at(&text, e.line(), e.column());
        let src = to_error_source(&path.display().to_string(), &text);
        err_ctx!(
            Input,
            format!("Invalid syntax tree: {}", e),
            &src,
            Span::new(offset, offset),
            "the file must hold a JSON-serialized SourceFile"
        )
    })
}

/// Byte offset of a 1-based line and column.
fn offset_at(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

#[cfg(test)]
mod tests {
    use super::offset_at;

    #[test]
    fn offsets_from_line_and_column() {
        let text = "{\n  \"name\": 1\n}";
        assert_eq!(offset_at(text, 1, 1), 0);
        assert_eq!(offset_at(text, 2, 3), 4);
        assert_eq!(offset_at(text, 9, 9), text.len());
    }
}
