//! Command-line interface for layout-exemplar.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **select**: Rank a corpus against a query layout and print the exemplars
//! - **score**: Compare two layouts aspect by aspect
//! - **inspect**: Summarize a corpus file
//!
//! ## Usage
//!
//! ```text
//! # Ten exemplars for a content-aware query
//! layout-exemplar select train.json.gz query.json --task content
//!
//! # Deterministic selection from a 500-layout subsample
//! layout-exemplar select train.json query.json --task gents -k 5 --candidate-size 500 --seed 42
//!
//! # JSON output for scripting
//! layout-exemplar score a.json b.json --format json
//!
//! # What does this corpus carry?
//! layout-exemplar inspect train.json
//! ```

use clap::{Parser, Subcommand};

pub mod inspect;
pub mod score;
pub mod select;

#[derive(Parser)]
#[command(name = "layout-exemplar")]
#[command(version)]
#[command(about = "Select in-context exemplars for layout generation")]
#[command(
    long_about = "layout-exemplar ranks a corpus of training layouts against a query layout.\n\nEach generation task has its own notion of similarity:\n- gent, genr: element types\n- gents, refinement: element types and sizes or positions\n- completion: the first element's geometry\n- content: overlap of canvas content regions\n- text: text embeddings\n- pptlayout: geometry, depth, rotation and text alignment together"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select exemplars for a query layout
    Select(select::SelectArgs),

    /// Compare two layouts
    Score(score::ScoreArgs),

    /// Summarize a corpus
    Inspect(inspect::InspectArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Layout id for display, falling back to its position
pub(crate) fn display_id(id: Option<&str>, index: usize) -> String {
    id.map_or_else(|| format!("#{index}"), str::to_string)
}
