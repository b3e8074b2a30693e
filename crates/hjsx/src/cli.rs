//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueEnum};
use hjsx_transformer::ObjectMerge;
use serde::Deserialize;

/// Compiles inline tag markup in JavaScript to hyperscript calls.
#[derive(Debug, Parser)]
#[command(name = "hjsx")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files to transform (defaults to every matching file in the workspace)
    pub paths: Vec<Utf8PathBuf>,

    /// Working directory
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Directory for transformed files, relative to the workspace
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Constructor function name
    #[arg(long)]
    pub factory: Option<String>,

    /// How `class_` and `style_` objects are merged
    #[arg(long, value_enum)]
    pub merge: Option<MergeStrategy>,

    /// File extensions to transform (repeatable)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Parse and lower only, without writing output
    #[arg(long, conflicts_with = "emit")]
    pub check: bool,

    /// Print transformed code to stdout instead of writing files
    #[arg(long)]
    pub emit: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Human-readable with code snippets
    HumanVerbose,
    /// JSON output
    Json,
    /// Machine-readable (one line per error)
    Machine,
}

/// Merge strategy for `class_` and `style_`.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Object spread (default)
    #[default]
    Spread,
    /// `Object.assign`
    Assign,
}

impl From<MergeStrategy> for ObjectMerge {
    fn from(strategy: MergeStrategy) -> Self {
        match strategy {
            MergeStrategy::Spread => ObjectMerge::Spread,
            MergeStrategy::Assign => ObjectMerge::Assign,
        }
    }
}

/// What to do with transformed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Write,
    Check,
    Emit,
}

impl Args {
    pub fn mode(&self) -> RunMode {
        if self.check {
            RunMode::Check
        } else if self.emit {
            RunMode::Emit
        } else {
            RunMode::Write
        }
    }
}
