//! Defines the command-line arguments and subcommands for the zakkro CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "zakkro",
    version,
    about = "Expands zakkro macros in host syntax trees."
)]
pub struct ZakkroArgs {
    /// Log every dispatched expansion to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand every macro in a JSON syntax tree and print the result.
    Expand {
        /// The JSON-serialized source file emitted by the host parser.
        #[arg(required = true)]
        file: PathBuf,
        /// Host source text the tree's spans point into.
        #[arg(long)]
        source: Option<PathBuf>,
        /// Print the expanded tree, diagnostics and trace as JSON.
        #[arg(long)]
        json: bool,
        /// Enum that @SlopeSubset initializers convert from.
        #[arg(long, value_name = "NAME")]
        reference_enum: Option<String>,
        /// Case names of the reference enum, comma separated.
        #[arg(long, value_name = "CASES", value_delimiter = ',')]
        reference_cases: Option<Vec<String>>,
    },
    /// Show a stepwise macro expansion trace with diffs.
    Macrotrace {
        /// The JSON-serialized source file to trace.
        #[arg(required = true)]
        file: PathBuf,
        /// Host source text the tree's spans point into.
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// List all available macros with their documentation.
    ListMacros,
}
