//! Rectangular minimum-cost assignment.
//!
//! Given an M×N cost matrix, pick `min(M, N)` (row, column) pairs, each row
//! and column used at most once, minimizing the total cost. Unmatched rows or
//! columns simply do not appear in the result.
//!
//! The solver sits behind [`AssignmentSolver`] so the matching step can be
//! tested (or replaced) independently of the similarity weighting built on
//! top of it.

use crate::similarity::SimilarityError;

/// Dense row-major cost matrix with finite entries
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Build from row-major data.
    ///
    /// # Errors
    ///
    /// Returns `SimilarityError::LengthMismatch` if `data.len() != rows * cols`
    /// and `SimilarityError::NonFiniteCost` if any entry is NaN or infinite.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, SimilarityError> {
        if data.len() != rows * cols {
            return Err(SimilarityError::LengthMismatch {
                what: "cost matrix",
                left: data.len(),
                right: rows * cols,
            });
        }
        if let Some(pos) = data.iter().position(|c| !c.is_finite()) {
            return Err(SimilarityError::NonFiniteCost {
                row: pos / cols.max(1),
                col: pos % cols.max(1),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build by evaluating `f(row, col)` for every cell.
    ///
    /// # Errors
    ///
    /// Returns `SimilarityError::NonFiniteCost` if `f` yields a non-finite value.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self, SimilarityError>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self::new(rows, cols, data)
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.get(r, c));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Total cost of a set of (row, col) pairs
    #[must_use]
    pub fn total(&self, pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(r, c)| self.get(r, c)).sum()
    }
}

/// Solves the rectangular assignment problem
pub trait AssignmentSolver {
    /// Return a minimum-cost set of `min(rows, cols)` (row, col) pairs,
    /// sorted by row.
    fn solve(&self, cost: &CostMatrix) -> Vec<(usize, usize)>;
}

/// Shortest-augmenting-path Hungarian algorithm with row/column potentials.
///
/// Runs in O(n² m) for an n×m problem with n ≤ m; taller matrices are
/// transposed first. Deterministic: among equal-cost optima it returns
/// whichever the column scan order reaches first.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl AssignmentSolver for HungarianSolver {
    fn solve(&self, cost: &CostMatrix) -> Vec<(usize, usize)> {
        if cost.rows == 0 || cost.cols == 0 {
            return Vec::new();
        }

        if cost.rows > cost.cols {
            let mut pairs: Vec<(usize, usize)> = solve_wide(&cost.transpose())
                .into_iter()
                .enumerate()
                .map(|(c, r)| (r, c))
                .collect();
            pairs.sort_unstable();
            return pairs;
        }

        solve_wide(cost).into_iter().enumerate().collect()
    }
}

/// Assign every row of an n×m matrix (n ≤ m) to a distinct column.
/// Returns the chosen column per row.
fn solve_wide(cost: &CostMatrix) -> Vec<usize> {
    let n = cost.rows;
    let m = cost.cols;

    // 1-based with a virtual column 0 holding the row being inserted
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; m + 1];
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = cost.get(i0 - 1, j - 1) - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=m {
        if p[j] != 0 {
            assignment[p[j] - 1] = j - 1;
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Exhaustive minimum over all injective row→column maps (rows ≤ cols)
    fn brute_force_min(cost: &CostMatrix) -> f64 {
        fn go(cost: &CostMatrix, row: usize, used: &mut Vec<bool>) -> f64 {
            if row == cost.rows() {
                return 0.0;
            }
            let mut best = f64::INFINITY;
            for c in 0..cost.cols() {
                if !used[c] {
                    used[c] = true;
                    best = best.min(cost.get(row, c) + go(cost, row + 1, used));
                    used[c] = false;
                }
            }
            best
        }
        if cost.rows() > cost.cols() {
            let t = cost.transpose();
            return go(&t, 0, &mut vec![false; t.cols()]);
        }
        go(cost, 0, &mut vec![false; cost.cols()])
    }

    fn assert_valid(cost: &CostMatrix, pairs: &[(usize, usize)]) {
        assert_eq!(pairs.len(), cost.rows().min(cost.cols()));
        let mut rows: Vec<usize> = pairs.iter().map(|p| p.0).collect();
        let mut cols: Vec<usize> = pairs.iter().map(|p| p.1).collect();
        rows.dedup();
        cols.sort_unstable();
        cols.dedup();
        assert_eq!(rows.len(), pairs.len(), "rows must be distinct and sorted");
        assert_eq!(cols.len(), pairs.len(), "columns must be distinct");
    }

    #[test]
    fn test_square_known_optimum() {
        let cost = CostMatrix::new(3, 3, vec![4.0, 1.0, 3.0, 2.0, 0.0, 5.0, 3.0, 2.0, 2.0]).unwrap();
        let pairs = HungarianSolver.solve(&cost);
        assert_valid(&cost, &pairs);
        assert_eq!(pairs, vec![(0, 1), (1, 0), (2, 2)]);
        assert!((cost.total(&pairs) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_wide_and_tall_matrices() {
        let wide = CostMatrix::new(2, 4, vec![9.0, 2.0, 7.0, 8.0, 6.0, 4.0, 3.0, 7.0]).unwrap();
        let pairs = HungarianSolver.solve(&wide);
        assert_valid(&wide, &pairs);
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);

        let tall = wide.transpose();
        let pairs = HungarianSolver.solve(&tall);
        assert_valid(&tall, &pairs);
        assert_eq!(pairs, vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x2545_f491);

        for rows in 1..=5 {
            for cols in 1..=5 {
                for _ in 0..4 {
                    let cost =
                        CostMatrix::from_fn(rows, cols, |_, _| rng.random_range(-1.0..0.0)).unwrap();
                    let pairs = HungarianSolver.solve(&cost);
                    assert_valid(&cost, &pairs);
                    let expected = brute_force_min(&cost);
                    assert!(
                        (cost.total(&pairs) - expected).abs() < 1e-9,
                        "{rows}x{cols}: got {}, expected {expected}",
                        cost.total(&pairs)
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_matrix() {
        let cost = CostMatrix::new(0, 3, vec![]).unwrap();
        assert!(HungarianSolver.solve(&cost).is_empty());
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = CostMatrix::new(1, 2, vec![0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, SimilarityError::NonFiniteCost { row: 0, col: 1 }));
        assert!(CostMatrix::new(2, 2, vec![0.0; 3]).is_err());
    }
}
