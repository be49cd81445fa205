//! Score command - compare two layouts directly.
//!
//! Reports every similarity aspect both layouts carry, plus the score each
//! generation task would assign. The first layout plays the candidate role
//! and the second the query.

use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::layout::Layout;
use crate::core::types::CanvasPreset;
use crate::corpus::load_layout;
use crate::selection::Task;
use crate::similarity::{
    alignment_similarity, bbox_matching, bbox_similarity, content_iou, depth_similarity,
    embedding_similarity, label_similarity, rotation_similarity,
};

#[derive(Args)]
pub struct ScoreArgs {
    /// Candidate layout (JSON object)
    #[arg(required = true)]
    pub candidate: PathBuf,

    /// Query layout (JSON object)
    #[arg(required = true)]
    pub query: PathBuf,

    /// Canvas used to rasterize content regions
    #[arg(long, value_enum, default_value = "posterlayout")]
    pub canvas: CanvasPreset,
}

/// Per-aspect and per-task similarities between two layouts
struct ScoreResult {
    candidate_path: PathBuf,
    query_path: PathBuf,
    aspects: Vec<(&'static str, f64)>,
    tasks: Vec<(Task, f64)>,
}

/// Execute the score command
///
/// # Errors
///
/// Returns an error if either layout cannot be loaded or the two layouts
/// disagree on an aspect's dimensions.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ScoreArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let candidate = load_layout(&args.candidate)?;
    let query = load_layout(&args.query)?;

    if verbose {
        eprintln!(
            "Candidate: {} elements ({}), query: {} elements ({})",
            candidate.len(),
            candidate.box_format,
            query.len(),
            query.box_format,
        );
    }

    // Geometry is compared in the query's box format
    let candidate = candidate.to_format(query.box_format);

    let result = ScoreResult {
        aspects: aspect_scores(&candidate, &query, args.canvas)?,
        tasks: task_scores(&candidate, &query, args.canvas, verbose),
        candidate_path: args.candidate,
        query_path: args.query,
    };

    match format {
        OutputFormat::Text => print_text_result(&result),
        OutputFormat::Json => print_json_result(&result)?,
        OutputFormat::Tsv => print_tsv_result(&result),
    }

    Ok(())
}

fn aspect_scores(
    candidate: &Layout,
    query: &Layout,
    preset: CanvasPreset,
) -> anyhow::Result<Vec<(&'static str, f64)>> {
    let mut aspects = vec![
        ("label", label_similarity(&candidate.labels, &query.labels)),
        (
            "bbox",
            bbox_similarity(
                &candidate.labels,
                &candidate.bounding_boxes,
                &query.labels,
                &query.bounding_boxes,
            )?,
        ),
        (
            "size",
            bbox_similarity(
                &candidate.labels,
                &candidate.sizes(),
                &query.labels,
                &query.sizes(),
            )?,
        ),
    ];

    let matching = bbox_matching(
        &candidate.labels,
        &candidate.bounding_boxes,
        &query.labels,
        &query.bounding_boxes,
    )?;
    if let (Some(c), Some(q)) = (&candidate.depth, &query.depth) {
        aspects.push(("depth", matching.mean_by(|p| depth_similarity(c[p.left], q[p.right]))));
    }
    if let (Some(c), Some(q)) = (&candidate.rotation, &query.rotation) {
        aspects.push((
            "rotation",
            matching.mean_by(|p| rotation_similarity(c[p.left], q[p.right])),
        ));
    }
    if let (Some(c), Some(q)) = (&candidate.text_alignment, &query.text_alignment) {
        aspects.push((
            "text_alignment",
            matching.try_mean_by(|p| alignment_similarity(&c[p.left], &q[p.right]))?,
        ));
    }
    if let (Some(c), Some(q)) = (
        &candidate.discrete_content_bounding_boxes,
        &query.discrete_content_bounding_boxes,
    ) {
        aspects.push(("content_iou", content_iou(c, q, preset.canvas())));
    }
    if let (Some(c), Some(q)) = (&candidate.embedding, &query.embedding) {
        aspects.push(("embedding", embedding_similarity(c, q)?));
    }

    Ok(aspects)
}

fn task_scores(
    candidate: &Layout,
    query: &Layout,
    preset: CanvasPreset,
    verbose: bool,
) -> Vec<(Task, f64)> {
    Task::ALL
        .into_iter()
        .filter_map(|task| {
            let scored = task
                .scorer(preset.canvas())
                .and_then(|scorer| scorer.score(candidate, query));
            match scored {
                Ok(score) => Some((task, score)),
                Err(e) => {
                    if verbose {
                        eprintln!("Skipping {}: {e}", task.long_name());
                    }
                    None
                }
            }
        })
        .collect()
}

fn print_text_result(result: &ScoreResult) {
    println!(
        "\nScoring: {} vs {}",
        result.candidate_path.display(),
        result.query_path.display()
    );

    println!("\n   Aspects:");
    for (name, score) in &result.aspects {
        println!("     {name:<16}{:>8.4}", score);
    }

    println!("\n   Tasks:");
    for (task, score) in &result.tasks {
        println!("     {:<16}{:>8.4}", task.name(), score);
    }
}

fn print_json_result(result: &ScoreResult) -> anyhow::Result<()> {
    let aspects: serde_json::Map<String, serde_json::Value> = result
        .aspects
        .iter()
        .map(|(name, score)| ((*name).to_string(), serde_json::json!(score)))
        .collect();
    let tasks: serde_json::Map<String, serde_json::Value> = result
        .tasks
        .iter()
        .map(|(task, score)| (task.name().to_string(), serde_json::json!(score)))
        .collect();

    let output = serde_json::json!({
        "candidate": result.candidate_path.display().to_string(),
        "query": result.query_path.display().to_string(),
        "aspects": aspects,
        "tasks": tasks,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_result(result: &ScoreResult) {
    println!("kind\tname\tscore");
    for (name, score) in &result.aspects {
        println!("aspect\t{name}\t{score:.6}");
    }
    for (task, score) in &result.tasks {
        println!("task\t{}\t{score:.6}", task.name());
    }
}
