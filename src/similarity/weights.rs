use serde::{Deserialize, Serialize};

use crate::similarity::SimilarityError;

/// Divide each weight by the total so a weighted sum of `[0, 1]` scores
/// stays in `[0, 1]`.
///
/// # Errors
///
/// Returns `SimilarityError::EmptyWeights` for an empty slice,
/// `SimilarityError::InvalidWeight` for a negative or non-finite weight, and
/// `SimilarityError::ZeroWeightSum` when every weight is zero.
pub fn normalize_weights(weights: &[f64]) -> Result<Vec<f64>, SimilarityError> {
    if weights.is_empty() {
        return Err(SimilarityError::EmptyWeights);
    }
    if let Some((index, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(SimilarityError::InvalidWeight { index, value });
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(SimilarityError::ZeroWeightSum);
    }

    Ok(weights.iter().map(|w| w / total).collect())
}

/// Weights of the multi-aspect (presentation) score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectWeights {
    pub label: f64,
    pub bbox: f64,
    pub depth: f64,
    pub rotation: f64,
    pub alignment: f64,
}

impl Default for AspectWeights {
    fn default() -> Self {
        Self {
            label: 5.0,
            bbox: 5.0,
            depth: 1.0,
            rotation: 1.0,
            alignment: 1.0,
        }
    }
}

impl AspectWeights {
    /// Normalize weights to sum to 1.0
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`normalize_weights`].
    pub fn normalized(&self) -> Result<Self, SimilarityError> {
        let n = normalize_weights(&[
            self.label,
            self.bbox,
            self.depth,
            self.rotation,
            self.alignment,
        ])?;
        Ok(Self {
            label: n[0],
            bbox: n[1],
            depth: n[2],
            rotation: n[3],
            alignment: n[4],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_weights() {
        let n = normalize_weights(&[5.0, 5.0, 1.0, 1.0, 1.0]).unwrap();
        let expected = [5.0 / 13.0, 5.0 / 13.0, 1.0 / 13.0, 1.0 / 13.0, 1.0 / 13.0];
        for (got, want) in n.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!((n.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_weights_rejects_bad_input() {
        assert_eq!(normalize_weights(&[]), Err(SimilarityError::EmptyWeights));
        assert_eq!(normalize_weights(&[0.0, 0.0]), Err(SimilarityError::ZeroWeightSum));
        assert!(matches!(
            normalize_weights(&[1.0, -1.0]),
            Err(SimilarityError::InvalidWeight { index: 1, .. })
        ));
        assert!(normalize_weights(&[f64::INFINITY]).is_err());
    }

    #[test]
    fn test_aspect_weights_default_normalized() {
        let w = AspectWeights::default().normalized().unwrap();
        assert!((w.label - 5.0 / 13.0).abs() < 1e-12);
        assert!((w.alignment - 1.0 / 13.0).abs() < 1e-12);
        let total = w.label + w.bbox + w.depth + w.rotation + w.alignment;
        assert!((total - 1.0).abs() < 1e-12);
    }
}
