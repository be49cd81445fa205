//! Select command - rank a corpus against a query and print the exemplars.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{display_id, OutputFormat};
use crate::corpus::{load_corpus, load_layout};
use crate::core::types::CanvasPreset;
use crate::selection::{Exemplar, ExemplarSelector, SelectorConfig, Task};

#[derive(Args)]
pub struct SelectArgs {
    /// Corpus of training layouts (JSON, optionally .gz)
    #[arg(required = true)]
    pub corpus: PathBuf,

    /// Query layout (JSON object)
    #[arg(required = true)]
    pub query: PathBuf,

    /// Generation task: gent, gents, genr, completion, refinement, content,
    /// text or pptlayout (long names such as content-aware also work)
    #[arg(short, long)]
    pub task: String,

    /// Number of exemplars to select
    #[arg(short = 'k', long, default_value = "10")]
    pub num_prompt: usize,

    /// Draw a random pool of this many layouts first (0 = whole corpus)
    #[arg(long, default_value = "0")]
    pub candidate_size: usize,

    /// Shuffle the selected exemplars instead of printing them best-first
    #[arg(long)]
    pub shuffle: bool,

    /// Seed for sampling and shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Canvas used to rasterize content regions
    #[arg(long, value_enum, default_value = "posterlayout")]
    pub canvas: CanvasPreset,

    /// Quantize corpus boxes onto the canvas grid, so elements smaller than
    /// one cell count as empty when filtering degenerate layouts
    #[arg(long)]
    pub discretize: bool,
}

/// Execute the select command
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded, the task is unknown, or a
/// layout lacks an aspect the task needs.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SelectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let task = Task::from_name(&args.task)?;

    let mut corpus = load_corpus(&args.corpus)?;
    if args.discretize {
        let canvas = args.canvas.canvas();
        corpus = corpus
            .into_iter()
            .map(|layout| layout.with_discretized_boxes(canvas))
            .collect();
    }
    let corpus_size = corpus.len();
    let query = load_layout(&args.query)?;

    if verbose {
        eprintln!(
            "Loaded {corpus_size} layouts; query has {} elements",
            query.len()
        );
    }

    let config = SelectorConfig {
        candidate_size: args.candidate_size,
        num_prompt: args.num_prompt,
        shuffle: args.shuffle,
        seed: args.seed,
        canvas: args.canvas.canvas(),
    };
    let mut selector = ExemplarSelector::new(task, corpus, config)?;
    let pool_size = selector.pool().len();
    let exemplars = selector.select(&query)?;

    if verbose {
        eprintln!(
            "Scored {pool_size} candidates with {}; selected {}",
            task.long_name(),
            exemplars.len()
        );
    }

    match format {
        OutputFormat::Text => print_text(task, pool_size, corpus_size, &exemplars),
        OutputFormat::Json => print_json(task, pool_size, corpus_size, &exemplars)?,
        OutputFormat::Tsv => print_tsv(&exemplars),
    }

    Ok(())
}

fn print_text(task: Task, pool_size: usize, corpus_size: usize, exemplars: &[Exemplar<'_>]) {
    println!("Task: {} ({})", task.long_name(), task.name());
    println!("Candidates: {pool_size} of {corpus_size} layouts");

    if exemplars.is_empty() {
        println!("\nNo exemplars found.");
        return;
    }

    println!("\n{:>4}  {:>7}  {:>8}  {:>8}  Id", "Rank", "Index", "Score", "Elements");
    for (i, e) in exemplars.iter().enumerate() {
        println!(
            "{:>4}  {:>7}  {:>8.4}  {:>8}  {}",
            i + 1,
            e.index,
            e.score,
            e.layout.len(),
            display_id(e.layout.id.as_deref(), e.index),
        );
    }
}

fn print_json(
    task: Task,
    pool_size: usize,
    corpus_size: usize,
    exemplars: &[Exemplar<'_>],
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "task": task.name(),
        "corpus_size": corpus_size,
        "pool_size": pool_size,
        "exemplars": exemplars.iter().map(|e| {
            serde_json::json!({
                "index": e.index,
                "id": e.layout.id,
                "score": e.score,
                "layout": e.layout,
            })
        }).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(exemplars: &[Exemplar<'_>]) {
    println!("rank\tindex\tid\tscore\telements");
    for (i, e) in exemplars.iter().enumerate() {
        println!(
            "{}\t{}\t{}\t{:.6}\t{}",
            i + 1,
            e.index,
            display_id(e.layout.id.as_deref(), e.index),
            e.score,
            e.layout.len(),
        );
    }
}
