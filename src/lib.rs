//! # layout-exemplar
//!
//! A library for choosing in-context exemplars for layout generation.
//!
//! Prompting a model to generate a layout (a poster, a mobile screen, a
//! document page, a slide) works much better when the prompt carries a few
//! worked examples that resemble the request. `layout-exemplar` ranks a
//! corpus of training layouts against a query layout and returns the top
//! candidates, using a similarity measure suited to the generation task.
//!
//! ## Features
//!
//! - **Task-aware ranking**: eight strategies, from label multisets to
//!   rasterized content overlap and text embeddings
//! - **Optimal element matching**: label-respecting box correspondence via
//!   the Hungarian algorithm
//! - **Degenerate filtering**: layouts whose elements all have zero size are
//!   never returned
//! - **Reproducible sampling**: seeded candidate pools and shuffles
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use layout_exemplar::corpus::{load_corpus, load_layout};
//! use layout_exemplar::{create_selector, SelectorConfig};
//!
//! let corpus = load_corpus(Path::new("train.json.gz")).unwrap();
//! let query = load_layout(Path::new("query.json")).unwrap();
//!
//! let config = SelectorConfig { num_prompt: 5, seed: Some(42), ..SelectorConfig::default() };
//! let mut selector = create_selector("gents", corpus, config).unwrap();
//!
//! for exemplar in selector.select(&query).unwrap() {
//!     println!("{}: {:.3}", exemplar.index, exemplar.score);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Layout data model, box formats and canvases
//! - [`similarity`]: Similarity metrics and the assignment solver
//! - [`selection`]: Task scorers and the exemplar selector
//! - [`corpus`]: Loading layouts from JSON files
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod corpus;
pub mod selection;
pub mod similarity;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::layout::Layout;
pub use crate::core::types::*;
pub use selection::{
    create_selector, Exemplar, ExemplarSelector, LayoutScorer, SelectionError, SelectorConfig,
    Task,
};
pub use similarity::SimilarityError;
