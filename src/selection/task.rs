use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::{Aspect, Canvas};
use crate::selection::scorers::{
    BasicElementScorer, CompletionScorer, ContentAwareScorer, LayoutScorer, MultiAspectScorer,
    RefinementScorer, RelationalElementScorer, SizedElementScorer, TextToLayoutScorer,
};
use crate::selection::SelectionError;
use crate::similarity::AspectWeights;

/// Layout generation task; each one ranks exemplars differently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    /// Generate from element types
    #[serde(rename = "gent")]
    BasicElement,
    /// Generate from element types and sizes
    #[serde(rename = "gents")]
    SizedElement,
    /// Generate from element types and pairwise relations
    #[serde(rename = "genr")]
    RelationalElement,
    /// Continue a partial layout
    #[serde(rename = "completion")]
    Completion,
    /// Clean up a noisy layout
    #[serde(rename = "refinement")]
    Refinement,
    /// Place elements around existing canvas content
    #[serde(rename = "content")]
    ContentAware,
    /// Generate from a text description
    #[serde(rename = "text")]
    TextToLayout,
    /// Presentation slides: geometry, depth, rotation and alignment together
    #[serde(rename = "pptlayout")]
    MultiAspect,
}

impl Task {
    pub const ALL: [Self; 8] = [
        Self::BasicElement,
        Self::SizedElement,
        Self::RelationalElement,
        Self::Completion,
        Self::Refinement,
        Self::ContentAware,
        Self::TextToLayout,
        Self::MultiAspect,
    ];

    /// Short name used on the command line and in configs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BasicElement => "gent",
            Self::SizedElement => "gents",
            Self::RelationalElement => "genr",
            Self::Completion => "completion",
            Self::Refinement => "refinement",
            Self::ContentAware => "content",
            Self::TextToLayout => "text",
            Self::MultiAspect => "pptlayout",
        }
    }

    /// Descriptive name, also accepted by [`Task::from_name`]
    #[must_use]
    pub const fn long_name(self) -> &'static str {
        match self {
            Self::BasicElement => "basic-element",
            Self::SizedElement => "sized-element",
            Self::RelationalElement => "relational-element",
            Self::Completion => "completion",
            Self::Refinement => "refinement",
            Self::ContentAware => "content-aware",
            Self::TextToLayout => "text-to-layout",
            Self::MultiAspect => "multi-aspect",
        }
    }

    /// Look up a task by short or long name (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::UnknownTask` if no task has that name.
    pub fn from_name(name: &str) -> Result<Self, SelectionError> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == lower || t.long_name() == lower)
            .ok_or_else(|| SelectionError::UnknownTask(name.to_string()))
    }

    /// Optional layout aspects this task reads from both query and candidates
    #[must_use]
    pub const fn required_aspects(self) -> &'static [Aspect] {
        match self {
            Self::ContentAware => &[Aspect::DiscreteContentBoundingBoxes],
            Self::TextToLayout => &[Aspect::Embedding],
            Self::MultiAspect => &[Aspect::Depth, Aspect::Rotation, Aspect::TextAlignment],
            _ => &[],
        }
    }

    /// Build the scoring strategy for this task.
    ///
    /// `canvas` is only used by the content-aware task.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Similarity` if the multi-aspect weights fail
    /// to normalize, or `SelectionError::Validation` if the content-aware
    /// canvas is empty or too large.
    pub fn scorer(self, canvas: Canvas) -> Result<Box<dyn LayoutScorer>, SelectionError> {
        Ok(match self {
            Self::BasicElement => Box::new(BasicElementScorer),
            Self::SizedElement => Box::new(SizedElementScorer),
            Self::RelationalElement => Box::new(RelationalElementScorer),
            Self::Completion => Box::new(CompletionScorer),
            Self::Refinement => Box::new(RefinementScorer),
            Self::ContentAware => Box::new(ContentAwareScorer::new(canvas)?),
            Self::TextToLayout => Box::new(TextToLayoutScorer),
            Self::MultiAspect => Box::new(MultiAspectScorer::new(AspectWeights::default())?),
        })
    }
}

impl FromStr for Task {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
