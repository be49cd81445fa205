//! Per-task scoring strategies.
//!
//! Each scorer compares one training layout (the candidate) with the query
//! and returns a scalar where higher means a better exemplar. The weights
//! are fixed per task.

use crate::core::layout::Layout;
use crate::core::types::{Aspect, Canvas};
use crate::selection::{Role, SelectionError};
use crate::similarity::{
    alignment_similarity, bbox_matching, content_iou, depth_similarity, embedding_similarity,
    label_bbox_similarity, label_similarity, rotation_similarity, AspectWeights,
};
use crate::utils::validation::check_canvas;

/// Scores a candidate layout against a query layout
pub trait LayoutScorer: Send + Sync {
    /// Name reported in logs and output
    fn name(&self) -> &'static str;

    /// Similarity of `candidate` to `query`; higher is better.
    ///
    /// # Errors
    ///
    /// Fails if either layout lacks an aspect the task needs, or if the two
    /// layouts are not comparable (box conventions, vector lengths).
    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError>;
}

fn require<'a, T>(
    value: Option<&'a T>,
    aspect: Aspect,
    role: Role,
) -> Result<&'a T, SelectionError> {
    value.ok_or(SelectionError::MissingAspect { aspect, role })
}

/// Fetch a per-element aspect and check it has one entry per element
fn require_aligned<'a, T>(
    layout: &'a Layout,
    value: Option<&'a Vec<T>>,
    aspect: Aspect,
    role: Role,
) -> Result<&'a [T], SelectionError> {
    let values = require(value, aspect, role)?;
    if values.len() != layout.len() {
        return Err(SelectionError::MisalignedAspect {
            aspect,
            role,
            expected: layout.len(),
            actual: values.len(),
        });
    }
    Ok(values.as_slice())
}

fn check_format(candidate: &Layout, query: &Layout) -> Result<(), SelectionError> {
    if candidate.box_format != query.box_format {
        return Err(SelectionError::FormatMismatch {
            candidate: candidate.box_format,
            query: query.box_format,
        });
    }
    Ok(())
}

/// Element types only
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicElementScorer;

impl BasicElementScorer {
    pub const LABEL_WEIGHT: f64 = 1.0;
}

impl LayoutScorer for BasicElementScorer {
    fn name(&self) -> &'static str {
        "basic-element"
    }

    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError> {
        Ok(Self::LABEL_WEIGHT * label_similarity(&candidate.labels, &query.labels))
    }
}

/// Element types plus box sizes; positions are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct SizedElementScorer;

impl SizedElementScorer {
    pub const LABEL_WEIGHT: f64 = 0.5;
    pub const BBOX_WEIGHT: f64 = 0.5;
}

impl LayoutScorer for SizedElementScorer {
    fn name(&self) -> &'static str {
        "sized-element"
    }

    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError> {
        check_format(candidate, query)?;
        Ok(label_bbox_similarity(
            &candidate.labels,
            &candidate.sizes(),
            &query.labels,
            &query.sizes(),
            Self::LABEL_WEIGHT,
            Self::BBOX_WEIGHT,
        )?)
    }
}

/// Element types only; relations are not compared
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationalElementScorer;

impl LayoutScorer for RelationalElementScorer {
    fn name(&self) -> &'static str {
        "relational-element"
    }

    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError> {
        BasicElementScorer.score(candidate, query)
    }
}

/// Position of the first element, which is all a partial layout guarantees
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionScorer;

impl CompletionScorer {
    pub const LABEL_WEIGHT: f64 = 0.0;
    pub const BBOX_WEIGHT: f64 = 1.0;
    pub const PREFIX_LEN: usize = 1;
}

impl LayoutScorer for CompletionScorer {
    fn name(&self) -> &'static str {
        "completion"
    }

    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError> {
        check_format(candidate, query)?;
        let c = Self::PREFIX_LEN.min(candidate.len());
        let q = Self::PREFIX_LEN.min(query.len());
        Ok(label_bbox_similarity(
            &candidate.labels[..c],
            &candidate.bounding_boxes[..c.min(candidate.bounding_boxes.len())],
            &query.labels[..q],
            &query.bounding_boxes[..q.min(query.bounding_boxes.len())],
            Self::LABEL_WEIGHT,
            Self::BBOX_WEIGHT,
        )?)
    }
}

/// Full element types and boxes
#[derive(Debug, Clone, Copy, Default)]
pub struct RefinementScorer;

impl RefinementScorer {
    pub const LABEL_WEIGHT: f64 = 0.5;
    pub const BBOX_WEIGHT: f64 = 0.5;
}

impl LayoutScorer for RefinementScorer {
    fn name(&self) -> &'static str {
        "refinement"
    }

    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError> {
        check_format(candidate, query)?;
        Ok(label_bbox_similarity(
            &candidate.labels,
            &candidate.bounding_boxes,
            &query.labels,
            &query.bounding_boxes,
            Self::LABEL_WEIGHT,
            Self::BBOX_WEIGHT,
        )?)
    }
}

/// Overlap of the salient-content regions on a fixed canvas
#[derive(Debug, Clone, Copy)]
pub struct ContentAwareScorer {
    canvas: Canvas,
}

impl ContentAwareScorer {
    /// # Errors
    ///
    /// Returns `SelectionError::Validation` if the canvas is empty or too
    /// large to rasterize.
    pub fn new(canvas: Canvas) -> Result<Self, SelectionError> {
        check_canvas(canvas)?;
        Ok(Self { canvas })
    }

    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }
}

impl Default for ContentAwareScorer {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
        }
    }
}

impl LayoutScorer for ContentAwareScorer {
    fn name(&self) -> &'static str {
        "content-aware"
    }

    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError> {
        let aspect = Aspect::DiscreteContentBoundingBoxes;
        let query_boxes = require(
            query.discrete_content_bounding_boxes.as_ref(),
            aspect,
            Role::Query,
        )?;
        let candidate_boxes = require(
            candidate.discrete_content_bounding_boxes.as_ref(),
            aspect,
            Role::Candidate,
        )?;
        Ok(content_iou(candidate_boxes, query_boxes, self.canvas))
    }
}

/// Dot product of precomputed text embeddings
#[derive(Debug, Clone, Copy, Default)]
pub struct TextToLayoutScorer;

impl LayoutScorer for TextToLayoutScorer {
    fn name(&self) -> &'static str {
        "text-to-layout"
    }

    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError> {
        let query_embedding = require(query.embedding.as_ref(), Aspect::Embedding, Role::Query)?;
        let candidate_embedding =
            require(candidate.embedding.as_ref(), Aspect::Embedding, Role::Candidate)?;
        Ok(embedding_similarity(candidate_embedding, query_embedding)?)
    }
}

/// Presentation slides: labels, boxes, depth, rotation and text alignment.
///
/// Depth, rotation and alignment are per-element, so they are compared over
/// the element pairs found by the box matching and averaged.
#[derive(Debug, Clone, Copy)]
pub struct MultiAspectScorer {
    weights: AspectWeights,
}

impl MultiAspectScorer {
    /// Create a scorer; `weights` are normalized to sum to 1.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Similarity` if the weights cannot be normalized.
    pub fn new(weights: AspectWeights) -> Result<Self, SelectionError> {
        Ok(Self {
            weights: weights.normalized()?,
        })
    }

    /// The normalized weights in use
    #[must_use]
    pub fn weights(&self) -> AspectWeights {
        self.weights
    }
}

impl LayoutScorer for MultiAspectScorer {
    fn name(&self) -> &'static str {
        "multi-aspect"
    }

    fn score(&self, candidate: &Layout, query: &Layout) -> Result<f64, SelectionError> {
        check_format(candidate, query)?;

        let q_depth = require_aligned(query, query.depth.as_ref(), Aspect::Depth, Role::Query)?;
        let q_rotation =
            require_aligned(query, query.rotation.as_ref(), Aspect::Rotation, Role::Query)?;
        let q_alignment = require_aligned(
            query,
            query.text_alignment.as_ref(),
            Aspect::TextAlignment,
            Role::Query,
        )?;
        let c_depth =
            require_aligned(candidate, candidate.depth.as_ref(), Aspect::Depth, Role::Candidate)?;
        let c_rotation = require_aligned(
            candidate,
            candidate.rotation.as_ref(),
            Aspect::Rotation,
            Role::Candidate,
        )?;
        let c_alignment = require_aligned(
            candidate,
            candidate.text_alignment.as_ref(),
            Aspect::TextAlignment,
            Role::Candidate,
        )?;

        let matching = bbox_matching(
            &candidate.labels,
            &candidate.bounding_boxes,
            &query.labels,
            &query.bounding_boxes,
        )?;

        let label = label_similarity(&candidate.labels, &query.labels);
        let bbox = matching.score();
        let depth = matching.mean_by(|p| depth_similarity(c_depth[p.left], q_depth[p.right]));
        let rotation =
            matching.mean_by(|p| rotation_similarity(c_rotation[p.left], q_rotation[p.right]));
        let alignment = matching
            .try_mean_by(|p| alignment_similarity(&c_alignment[p.left], &q_alignment[p.right]))?;

        let w = &self.weights;
        Ok(w.label * label
            + w.bbox * bbox
            + w.depth * depth
            + w.rotation * rotation
            + w.alignment * alignment)
    }
}
