//! Similarity metrics between layouts and their aspects.
//!
//! Every metric returns a scalar where higher means more similar. Bounded
//! metrics live in `[0, 1]`; the embedding dot product is only bounded if the
//! caller normalized the vectors upstream.
//!
//! | Metric | Compares | Notes |
//! |--------|----------|-------|
//! | [`label_similarity`] | label multisets | Dice coefficient on counts |
//! | [`bbox_similarity`] | boxes | optimal label-respecting matching |
//! | [`depth_similarity`] | z-order ranks | exact match |
//! | [`rotation_similarity`] | degrees | linear over the full circle |
//! | [`alignment_similarity`] | alignment codes | fraction of agreeing positions |
//! | [`content_iou`] | rasterized content boxes | smoothed IoU |
//! | [`embedding_similarity`] | text embeddings | dot product |
//!
//! ## Example
//!
//! ```rust
//! use layout_exemplar::similarity::{bbox_similarity, label_similarity};
//!
//! let labels = [1, 2];
//! let boxes = [[0.0, 0.0, 0.1, 0.1], [0.5, 0.5, 0.1, 0.1]];
//!
//! assert!((label_similarity(&labels, &[1]) - 2.0 / 3.0).abs() < 1e-9);
//! assert!((bbox_similarity(&labels, &boxes, &labels, &boxes).unwrap() - 1.0).abs() < 1e-9);
//! ```

pub mod assignment;
pub mod content;
pub mod metrics;
pub mod weights;

pub use content::{content_iou, Raster, CONTENT_IOU_SMOOTHING};
pub use metrics::{
    alignment_similarity, bbox_matching, bbox_similarity, depth_similarity, embedding_similarity,
    label_bbox_similarity, label_similarity, rotation_similarity, BoxMatching, MatchedPair,
    BBOX_DISTANCE_SCALE,
};
pub use weights::{normalize_weights, AspectWeights};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("Length mismatch in {what}: {left} vs {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Boxes have different dimensions: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Non-finite cost at ({row}, {col})")]
    NonFiniteCost { row: usize, col: usize },

    #[error("No weights given")]
    EmptyWeights,

    #[error("Weight {index} is invalid ({value}): weights must be finite and non-negative")]
    InvalidWeight { index: usize, value: f64 },

    #[error("Weights sum to zero")]
    ZeroWeightSum,
}
