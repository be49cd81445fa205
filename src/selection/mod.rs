//! Exemplar selection: rank a training corpus against a query layout and
//! return the best few non-degenerate layouts.
//!
//! - [`Task`]: the generation tasks, parsed from their short names
//! - [`LayoutScorer`]: per-task scoring strategy (one implementation per task)
//! - [`ExemplarSelector`]: owns the candidate pool and performs retrieval
//!
//! ## Selection algorithm
//!
//! 1. **Pool**: at construction the corpus is optionally shuffled once and
//!    truncated to `candidate_size` layouts
//! 2. **Score**: every pool layout is scored against the query
//! 3. **Rank**: stable sort by descending score, ties by corpus index
//! 4. **Filter**: degenerate layouts (no element has any size) are skipped
//! 5. **Take**: the first `num_prompt` survivors, optionally shuffled
//!
//! A short result (fewer than `num_prompt` usable layouts) is not an error.
//!
//! ## Example
//!
//! ```rust
//! use layout_exemplar::{ExemplarSelector, Layout, SelectorConfig, Task};
//!
//! let corpus = vec![
//!     Layout::new(vec![1, 2], vec![[0.0, 0.0, 0.1, 0.1], [0.5, 0.5, 0.1, 0.1]]),
//!     Layout::new(vec![1], vec![[0.0, 0.0, 0.1, 0.1]]),
//! ];
//! let query = Layout::new(vec![1, 2], vec![[0.0, 0.0, 0.1, 0.1], [0.5, 0.5, 0.1, 0.1]]);
//!
//! let config = SelectorConfig { num_prompt: 1, shuffle: false, ..SelectorConfig::default() };
//! let selector = ExemplarSelector::new(Task::BasicElement, corpus, config).unwrap();
//! let mut rng = rand::rng();
//! let exemplars = selector.select_with_rng(&query, &mut rng).unwrap();
//!
//! assert_eq!(exemplars.len(), 1);
//! assert_eq!(exemplars[0].index, 0);
//! ```

pub mod scorers;
pub mod selector;
pub mod task;

pub use scorers::LayoutScorer;
pub use selector::{create_selector, Exemplar, ExemplarSelector, ScoredCandidate, SelectorConfig};
pub use task::Task;

use thiserror::Error;

use crate::core::types::{Aspect, BoxFormat};
use crate::similarity::SimilarityError;
use crate::utils::validation::ValidationError;

/// Which side of a comparison a layout is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Query,
    Candidate,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Candidate => write!(f, "candidate"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Unknown task '{0}' (expected one of: gent, gents, genr, completion, refinement, content, text, pptlayout)")]
    UnknownTask(String),

    #[error("The {role} layout is missing '{aspect}', which this task requires")]
    MissingAspect { aspect: Aspect, role: Role },

    #[error("The {role} layout has {actual} '{aspect}' entries for {expected} elements")]
    MisalignedAspect {
        aspect: Aspect,
        role: Role,
        expected: usize,
        actual: usize,
    },

    #[error("Box format mismatch: candidate is {candidate}, query is {query}")]
    FormatMismatch {
        candidate: BoxFormat,
        query: BoxFormat,
    },

    #[error("Candidate {index}: {source}")]
    AtCandidate {
        index: usize,
        #[source]
        source: Box<SelectionError>,
    },

    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
