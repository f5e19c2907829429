//! Dense square linear systems solved by Gauss-Jordan elimination with
//! partial pivoting.
//!
//! Systems here are tiny (8x8 for a four-point homography), so the solver
//! favours a straightforward augmented-matrix layout over anything blocked.

use super::EPS;
use crate::error::{GeometryError, Result};
use log::trace;

/// Something that can solve `A·x = b` for `x`.
///
/// The homography estimator is generic over this so a different strategy
/// (for example a least-squares solver for over-determined systems) can be
/// dropped in without touching the code that consumes homographies.
pub trait LinearSolver {
    /// Solve the system whose coefficient matrix is given as rows of `a`.
    fn solve<R: AsRef<[f64]>>(&self, a: &[R], b: &[f64]) -> Result<Vec<f64>>;
}

/// Exact solver for square, non-singular systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianElimination;

impl LinearSolver for GaussianElimination {
    fn solve<R: AsRef<[f64]>>(&self, a: &[R], b: &[f64]) -> Result<Vec<f64>> {
        solve_linear_system(a, b)
    }
}

/// Solve `A·x = b` for square `A` using Gaussian elimination with partial pivoting.
///
/// Fails with [`GeometryError::Shape`] when `A` is not `n x n` or `b` is not
/// length `n`, and with [`GeometryError::SingularSystem`] when the best pivot
/// of some column is below `1e-12`. Nothing is returned on failure.
pub fn solve_linear_system<R: AsRef<[f64]>>(a: &[R], b: &[f64]) -> Result<Vec<f64>> {
    let n = a.len();
    if let Some((r, row)) = a
        .iter()
        .enumerate()
        .find(|(_, row)| row.as_ref().len() != n)
    {
        return Err(GeometryError::shape(
            format!("square {}x{} coefficient matrix", n, n),
            format!("row {} with {} entries", r, row.as_ref().len()),
        ));
    }
    if b.len() != n {
        return Err(GeometryError::shape(
            format!("right-hand side of length {}", n),
            format!("length {}", b.len()),
        ));
    }

    // Augmented [A | b]
    let mut m: Vec<Vec<f64>> = a
        .iter()
        .zip(b)
        .map(|(row, &rhs)| {
            let mut aug = Vec::with_capacity(n + 1);
            aug.extend_from_slice(row.as_ref());
            aug.push(rhs);
            aug
        })
        .collect();

    for col in 0..n {
        let mut pivot_row = col;
        let mut best = m[col][col].abs();
        for (r, row) in m.iter().enumerate().skip(col + 1) {
            let v = row[col].abs();
            if v > best {
                best = v;
                pivot_row = r;
            }
        }
        if best.is_nan() || best < EPS {
            return Err(GeometryError::SingularSystem { column: col, pivot: best });
        }

        if pivot_row != col {
            trace!("pivot: column {} swaps row {} <-> {} (|p| = {:e})", col, col, pivot_row, best);
            m.swap(col, pivot_row);
        }

        let pivot = m[col][col];
        for v in &mut m[col][col..] {
            *v /= pivot;
        }

        let pivot_vals = m[col].clone();
        for (r, row) in m.iter_mut().enumerate() {
            if r == col {
                continue;
            }
            let factor = row[col];
            if factor.abs() < EPS {
                continue;
            }
            for (v, p) in row[col..].iter_mut().zip(&pivot_vals[col..]) {
                *v -= factor * p;
            }
        }
    }

    Ok(m.into_iter().map(|row| row[n]).collect())
}
