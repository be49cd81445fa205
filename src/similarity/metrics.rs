use std::collections::HashMap;

use crate::core::types::Label;
use crate::similarity::assignment::{AssignmentSolver, CostMatrix, HungarianSolver};
use crate::similarity::SimilarityError;

/// Distance multiplier in the box similarity `0.5^(scale * d)`.
///
/// With unit-square coordinates, two boxes half a unit apart score 0.5.
/// Changing this value changes exemplar rankings.
pub const BBOX_DISTANCE_SCALE: f64 = 2.0;

/// Convert usize to f64 with explicit precision loss allowance
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Multiset Dice coefficient of two label sequences:
/// `2 * Σ_v min(count_a(v), count_b(v)) / (|a| + |b|)`.
///
/// Order is ignored. Returns 1.0 for identical multisets, 0.0 for disjoint
/// ones, and 1.0 when both are empty (two empty layouts trivially agree).
#[must_use]
pub fn label_similarity(a: &[Label], b: &[Label]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut counts: HashMap<Label, (usize, usize)> = HashMap::new();
    for label in a {
        counts.entry(*label).or_default().0 += 1;
    }
    for label in b {
        counts.entry(*label).or_default().1 += 1;
    }

    let shared: usize = counts.values().map(|&(ca, cb)| ca.min(cb)).sum();
    count_to_f64(2 * shared) / count_to_f64(total)
}

/// One matched element pair from [`bbox_matching`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPair {
    /// Element index in the left layout
    pub left: usize,
    /// Element index in the right layout
    pub right: usize,
    /// Box similarity of the pair (0.0 if the labels differ)
    pub similarity: f64,
}

/// Optimal element correspondence between two layouts
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMatching {
    pub pairs: Vec<MatchedPair>,
    pub left_len: usize,
    pub right_len: usize,
}

impl BoxMatching {
    /// Mean similarity over the matched pairs.
    ///
    /// With no pairs the mean is undefined: two empty layouts score 1.0,
    /// an empty layout against a non-empty one scores 0.0.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.mean_by(|p| p.similarity)
    }

    /// Mean of `f` over the matched pairs, with the same empty-side
    /// convention as [`BoxMatching::score`]
    pub fn mean_by<F>(&self, f: F) -> f64
    where
        F: FnMut(&MatchedPair) -> f64,
    {
        if self.pairs.is_empty() {
            return self.unmatched_score();
        }
        self.pairs.iter().map(f).sum::<f64>() / count_to_f64(self.pairs.len())
    }

    /// Like [`BoxMatching::mean_by`] for a fallible per-pair score
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_mean_by<F, E>(&self, mut f: F) -> Result<f64, E>
    where
        F: FnMut(&MatchedPair) -> Result<f64, E>,
    {
        if self.pairs.is_empty() {
            return Ok(self.unmatched_score());
        }
        let mut total = 0.0;
        for pair in &self.pairs {
            total += f(pair)?;
        }
        Ok(total / count_to_f64(self.pairs.len()))
    }

    fn unmatched_score(&self) -> f64 {
        if self.left_len == 0 && self.right_len == 0 {
            1.0
        } else {
            0.0
        }
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Match elements of two layouts by box proximity using the default solver.
///
/// See [`bbox_matching_with`].
///
/// # Errors
///
/// Returns `SimilarityError::LengthMismatch` if labels and boxes of a side
/// differ in length, `SimilarityError::DimensionMismatch` if boxes differ in
/// dimension, or `SimilarityError::NonFiniteCost` for NaN/infinite coordinates.
pub fn bbox_matching<B: AsRef<[f64]>>(
    labels_a: &[Label],
    boxes_a: &[B],
    labels_b: &[Label],
    boxes_b: &[B],
) -> Result<BoxMatching, SimilarityError> {
    bbox_matching_with(&HungarianSolver, labels_a, boxes_a, labels_b, boxes_b)
}

/// Match elements of two layouts by box proximity.
///
/// Pair similarity is `0.5^(BBOX_DISTANCE_SCALE * d)` for Euclidean distance
/// `d`, and zero for pairs with different labels. The matching maximizes the
/// total similarity over `min(M, N)` pairs. Boxes may have any dimension
/// (full boxes, or just sizes) as long as both sides agree.
///
/// # Errors
///
/// Same as [`bbox_matching`].
pub fn bbox_matching_with<S, B>(
    solver: &S,
    labels_a: &[Label],
    boxes_a: &[B],
    labels_b: &[Label],
    boxes_b: &[B],
) -> Result<BoxMatching, SimilarityError>
where
    S: AssignmentSolver + ?Sized,
    B: AsRef<[f64]>,
{
    if labels_a.len() != boxes_a.len() {
        return Err(SimilarityError::LengthMismatch {
            what: "labels and boxes (left)",
            left: labels_a.len(),
            right: boxes_a.len(),
        });
    }
    if labels_b.len() != boxes_b.len() {
        return Err(SimilarityError::LengthMismatch {
            what: "labels and boxes (right)",
            left: labels_b.len(),
            right: boxes_b.len(),
        });
    }

    if let Some(first) = boxes_a.first().or_else(|| boxes_b.first()) {
        let dim = first.as_ref().len();
        if let Some(bad) = boxes_a
            .iter()
            .chain(boxes_b)
            .map(|b| b.as_ref().len())
            .find(|&d| d != dim)
        {
            return Err(SimilarityError::DimensionMismatch {
                left: dim,
                right: bad,
            });
        }
    }

    let rows = boxes_a.len();
    let cols = boxes_b.len();
    let mut similarities = Vec::with_capacity(rows * cols);
    for (label_a, box_a) in labels_a.iter().zip(boxes_a) {
        for (label_b, box_b) in labels_b.iter().zip(boxes_b) {
            let sim = if label_a == label_b {
                0.5f64.powf(BBOX_DISTANCE_SCALE * euclidean(box_a.as_ref(), box_b.as_ref()))
            } else {
                0.0
            };
            similarities.push(sim);
        }
    }

    let cost = CostMatrix::new(rows, cols, similarities.iter().map(|s| -s).collect())?;
    let pairs = solver
        .solve(&cost)
        .into_iter()
        .map(|(left, right)| MatchedPair {
            left,
            right,
            similarity: similarities[left * cols + right],
        })
        .collect();

    Ok(BoxMatching {
        pairs,
        left_len: rows,
        right_len: cols,
    })
}

/// Mean similarity of the optimal label-respecting box matching.
///
/// Identical label/box sets score 1.0. Boxes whose labels differ never
/// contribute, so two single-element layouts with different labels score 0.0.
///
/// # Errors
///
/// Same as [`bbox_matching`].
pub fn bbox_similarity<B: AsRef<[f64]>>(
    labels_a: &[Label],
    boxes_a: &[B],
    labels_b: &[Label],
    boxes_b: &[B],
) -> Result<f64, SimilarityError> {
    Ok(bbox_matching(labels_a, boxes_a, labels_b, boxes_b)?.score())
}

/// `label_weight * label_similarity + bbox_weight * bbox_similarity`.
///
/// Weights are used as given; normalize them first to keep the result in `[0, 1]`.
///
/// # Errors
///
/// Same as [`bbox_matching`].
pub fn label_bbox_similarity<B: AsRef<[f64]>>(
    labels_a: &[Label],
    boxes_a: &[B],
    labels_b: &[Label],
    boxes_b: &[B],
    label_weight: f64,
    bbox_weight: f64,
) -> Result<f64, SimilarityError> {
    let label_sim = label_similarity(labels_a, labels_b);
    let bbox_sim = bbox_similarity(labels_a, boxes_a, labels_b, boxes_b)?;
    Ok(label_weight * label_sim + bbox_weight * bbox_sim)
}

/// 1.0 if two z-order ranks are equal, else 0.0
#[must_use]
pub fn depth_similarity(a: i64, b: i64) -> f64 {
    if a == b {
        1.0
    } else {
        0.0
    }
}

/// `1 - |a - b| / 360` for rotations in degrees
#[must_use]
pub fn rotation_similarity(a: f64, b: f64) -> f64 {
    1.0 - (a - b).abs() / 360.0
}

/// Fraction of positions where two alignment code vectors agree.
///
/// # Errors
///
/// Returns `SimilarityError::LengthMismatch` if the vectors differ in length.
pub fn alignment_similarity(a: &[i64], b: &[i64]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::LengthMismatch {
            what: "alignment codes",
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Ok(1.0);
    }
    let agree = a.iter().zip(b).filter(|(x, y)| x == y).count();
    Ok(count_to_f64(agree) / count_to_f64(a.len()))
}

/// Dot product of two pre-normalized embeddings.
///
/// # Errors
///
/// Returns `SimilarityError::LengthMismatch` if the vectors differ in length.
pub fn embedding_similarity(a: &[f64], b: &[f64]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::LengthMismatch {
            what: "embeddings",
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}
