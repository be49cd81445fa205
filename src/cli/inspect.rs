use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::layout::Layout;
use crate::core::types::{Aspect, Label};
use crate::corpus::load_corpus;

#[derive(Args)]
pub struct InspectArgs {
    /// Corpus of layouts (JSON, optionally .gz)
    #[arg(required = true)]
    pub corpus: PathBuf,
}

#[allow(clippy::cast_precision_loss)]
fn count_to_f64(count: usize) -> f64 {
    count as f64
}

/// Summary statistics for a corpus
struct CorpusSummary {
    layouts: usize,
    degenerate: usize,
    min_elements: usize,
    max_elements: usize,
    mean_elements: f64,
    labels: BTreeMap<Label, usize>,
    aspects: Vec<(Aspect, usize)>,
}

impl CorpusSummary {
    fn from_layouts(layouts: &[Layout]) -> Self {
        let mut labels = BTreeMap::new();
        for label in layouts.iter().flat_map(|l| l.labels.iter()) {
            *labels.entry(*label).or_insert(0) += 1;
        }

        let lengths = layouts.iter().map(Layout::len);
        let total: usize = lengths.clone().sum();
        let mean_elements = if layouts.is_empty() {
            0.0
        } else {
            count_to_f64(total) / count_to_f64(layouts.len())
        };

        let present = |has: fn(&Layout) -> bool| layouts.iter().filter(|l| has(l)).count();
        let aspects = vec![
            (Aspect::Depth, present(|l| l.depth.is_some())),
            (Aspect::Rotation, present(|l| l.rotation.is_some())),
            (Aspect::TextAlignment, present(|l| l.text_alignment.is_some())),
            (
                Aspect::DiscreteBoundingBoxes,
                present(|l| l.discrete_bounding_boxes.is_some()),
            ),
            (
                Aspect::DiscreteContentBoundingBoxes,
                present(|l| l.discrete_content_bounding_boxes.is_some()),
            ),
            (Aspect::Embedding, present(|l| l.embedding.is_some())),
        ];

        Self {
            layouts: layouts.len(),
            degenerate: layouts.iter().filter(|l| l.is_degenerate()).count(),
            min_elements: lengths.clone().min().unwrap_or(0),
            max_elements: lengths.max().unwrap_or(0),
            mean_elements,
            labels,
            aspects,
        }
    }
}

/// Execute the inspect command
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: InspectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let layouts = load_corpus(&args.corpus)?;
    if verbose {
        eprintln!("Loaded {} layouts from {}", layouts.len(), args.corpus.display());
    }

    let summary = CorpusSummary::from_layouts(&layouts);

    match format {
        OutputFormat::Text => print_text(&summary),
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Tsv => print_tsv(&summary),
    }

    Ok(())
}

fn print_text(s: &CorpusSummary) {
    println!("Layouts: {} ({} degenerate)", s.layouts, s.degenerate);
    println!(
        "Elements per layout: min {}, mean {:.1}, max {}",
        s.min_elements, s.mean_elements, s.max_elements
    );

    println!("\nLabels:");
    for (label, count) in &s.labels {
        println!("  {label:>6}  {count}");
    }

    println!("\nAspects:");
    for (aspect, count) in &s.aspects {
        println!("  {:<32}{count}/{}", aspect.to_string(), s.layouts);
    }
}

fn print_json(s: &CorpusSummary) -> anyhow::Result<()> {
    let labels: serde_json::Map<String, serde_json::Value> = s
        .labels
        .iter()
        .map(|(label, count)| (label.to_string(), serde_json::json!(count)))
        .collect();
    let aspects: serde_json::Map<String, serde_json::Value> = s
        .aspects
        .iter()
        .map(|(aspect, count)| (aspect.to_string(), serde_json::json!(count)))
        .collect();

    let output = serde_json::json!({
        "layouts": s.layouts,
        "degenerate": s.degenerate,
        "elements": {
            "min": s.min_elements,
            "mean": s.mean_elements,
            "max": s.max_elements,
        },
        "labels": labels,
        "aspects": aspects,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(s: &CorpusSummary) {
    println!("key\tvalue");
    println!("layouts\t{}", s.layouts);
    println!("degenerate\t{}", s.degenerate);
    println!("min_elements\t{}", s.min_elements);
    println!("mean_elements\t{:.4}", s.mean_elements);
    println!("max_elements\t{}", s.max_elements);
    for (label, count) in &s.labels {
        println!("label_{label}\t{count}");
    }
    for (aspect, count) in &s.aspects {
        println!("aspect_{aspect}\t{count}");
    }
}
