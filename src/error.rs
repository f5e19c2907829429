//! Error type shared by the solver, the homography estimator and `RectSpace`.

use std::fmt;

/// Failure of a geometry operation. Every variant is fatal to the call that
/// produced it; no partial or approximate result is ever returned alongside.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Input dimensions do not match (non-square matrix, vector length, point count).
    Shape {
        /// What the operation required
        expected: String,
        /// What it was given
        got: String,
    },
    /// Best available pivot in `column` fell below tolerance.
    SingularSystem {
        /// Elimination column where the system broke down
        column: usize,
        /// Magnitude of the best pivot candidate
        pivot: f64,
    },
    /// 3x3 determinant below tolerance.
    NotInvertible {
        /// Determinant that failed the check
        determinant: f64,
    },
    /// Homogeneous `w` vanished during perspective division.
    PointAtInfinity {
        /// The offending `w` component
        w: f64,
    },
    /// A quad corner is too close to collinear with its neighbours.
    IllConditioned {
        /// Index of the worst corner
        corner: usize,
        /// Sine of the angle at that corner
        sine: f64,
        /// Configured lower bound
        min_sine: f64,
    },
    /// An estimator option holds a value it cannot work with.
    InvalidOption {
        /// Option name
        name: &'static str,
        /// Rejected value
        value: f64,
    },
    /// Rectangle size must be finite and non-zero.
    InvalidRect {
        /// Requested width
        width: f64,
        /// Requested height
        height: f64,
    },
}

impl GeometryError {
    pub(crate) fn shape(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::Shape {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape { expected, got } => {
                write!(f, "shape mismatch: expected {}, got {}", expected, got)
            }
            Self::SingularSystem { column, pivot } => write!(
                f,
                "singular system: best pivot {:e} in column {} is below tolerance",
                pivot, column
            ),
            Self::NotInvertible { determinant } => {
                write!(f, "matrix not invertible (det = {:e})", determinant)
            }
            Self::PointAtInfinity { w } => {
                write!(f, "point mapped to infinity (w = {:e})", w)
            }
            Self::IllConditioned {
                corner,
                sine,
                min_sine,
            } => write!(
                f,
                "ill-conditioned quad: corner {} has sine {:.3e} < {:.3e}",
                corner, sine, min_sine
            ),
            Self::InvalidOption { name, value } => {
                write!(f, "invalid value {} for option {}", value, name)
            }
            Self::InvalidRect { width, height } => {
                write!(f, "invalid rectangle size {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GeometryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = GeometryError::shape("3 entries", "2 entries");
        assert_eq!(e.to_string(), "shape mismatch: expected 3 entries, got 2 entries");

        let e = GeometryError::PointAtInfinity { w: 0.0 };
        assert!(e.to_string().contains("infinity"));

        let e = GeometryError::SingularSystem {
            column: 4,
            pivot: 1e-14,
        };
        assert!(e.to_string().contains("column 4"));

        let e = GeometryError::InvalidOption {
            name: "min_corner_sine",
            value: f64::NAN,
        };
        assert_eq!(e.to_string(), "invalid value NaN for option min_corner_sine");
    }
}
