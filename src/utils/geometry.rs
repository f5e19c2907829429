//! Geometry utilities for four-point homographies

use super::EPS;
use super::linear_system::{GaussianElimination, LinearSolver};
use crate::error::{GeometryError, Result};
use crate::models::{Mat3, Point, Quad};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Invert a 3x3 matrix through its adjugate.
///
/// Fails with [`GeometryError::NotInvertible`] when `|det| < 1e-12`.
pub fn invert_mat3(m: &Mat3) -> Result<Mat3> {
    let [a, b, c, d, e, f, g, h, i] = *m.as_array();

    // Cofactors
    let c00 = e * i - f * h;
    let c01 = -(d * i - f * g);
    let c02 = d * h - e * g;
    let c10 = -(b * i - c * h);
    let c11 = a * i - c * g;
    let c12 = -(a * h - b * g);
    let c20 = b * f - c * e;
    let c21 = -(a * f - c * d);
    let c22 = a * e - b * d;

    let det = a * c00 + b * c01 + c * c02;
    if det.is_nan() || det.abs() < EPS {
        return Err(GeometryError::NotInvertible { determinant: det });
    }

    let inv_det = 1.0 / det;
    Ok(Mat3::from_row_major([
        c00 * inv_det,
        c10 * inv_det,
        c20 * inv_det,
        c01 * inv_det,
        c11 * inv_det,
        c21 * inv_det,
        c02 * inv_det,
        c12 * inv_det,
        c22 * inv_det,
    ]))
}

impl Mat3 {
    /// Inverse via [`invert_mat3`]
    pub fn inverse(&self) -> Result<Mat3> {
        invert_mat3(self)
    }
}

/// Map `p` through `h` with perspective division.
///
/// Fails with [`GeometryError::PointAtInfinity`] when the homogeneous `w`
/// is below `1e-12` in magnitude.
pub fn apply_homography(h: &Mat3, p: Point) -> Result<Point> {
    let [x, y, w] = h.mul_vec3(p.to_homogeneous());
    if w.is_nan() || w.abs() < EPS {
        return Err(GeometryError::PointAtInfinity { w });
    }
    Ok(Point::new(x / w, y / w))
}

/// Build the 8x8 system for `src[k] -> dst[k]` with `h33` fixed to 1.
///
/// Unknowns are `[h11 h12 h13 h21 h22 h23 h31 h32]`; each correspondence
/// `(u, v) -> (x, y)` contributes
///
/// ```text
/// h11*u + h12*v + h13 - x*h31*u - x*h32*v = x
/// h21*u + h22*v + h23 - y*h31*u - y*h32*v = y
/// ```
pub fn homography_system(src: &Quad, dst: &Quad) -> ([[f64; 8]; 8], [f64; 8]) {
    let mut a = [[0.0f64; 8]; 8];
    let mut b = [0.0f64; 8];

    for (k, (s, d)) in src.corners().iter().zip(dst.corners()).enumerate() {
        let (u, v) = (s.x, s.y);
        let (x, y) = (d.x, d.y);

        let row = k * 2;
        a[row] = [u, v, 1.0, 0.0, 0.0, 0.0, -x * u, -x * v];
        b[row] = x;

        a[row + 1] = [0.0, 0.0, 0.0, u, v, 1.0, -y * u, -y * v];
        b[row + 1] = y;
    }

    (a, b)
}

/// Tuning for [`HomographyEstimator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorOptions {
    /// Reject quads whose smallest corner sine (see [`Quad::min_corner_sine`])
    /// is below this bound. `None` accepts anything the solver can solve.
    pub min_corner_sine: Option<f64>,
}

/// A homography together with its inverse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    /// Maps source points to destination points; `(2, 2)` is 1
    pub forward: Mat3,
    /// Maps destination points back to source points
    pub inverse: Mat3,
}

impl Homography {
    /// Estimate the transform carrying `src[k]` onto `dst[k]` with default options
    pub fn from_points(src: &Quad, dst: &Quad) -> Result<Self> {
        HomographyEstimator::new().estimate(src, dst)
    }

    /// Pair a matrix with its checked inverse
    pub fn from_matrix(forward: Mat3) -> Result<Self> {
        let inverse = invert_mat3(&forward)?;
        Ok(Self { forward, inverse })
    }

    /// Source -> destination
    pub fn map(&self, p: Point) -> Result<Point> {
        apply_homography(&self.forward, p)
    }

    /// Destination -> source
    pub fn map_inverse(&self, p: Point) -> Result<Point> {
        apply_homography(&self.inverse, p)
    }
}

/// Exact four-point homography estimation.
///
/// Generic over the [`LinearSolver`] used for the 8x8 system.
#[derive(Debug, Clone, Default)]
pub struct HomographyEstimator<S = GaussianElimination> {
    solver: S,
    options: EstimatorOptions,
}

impl HomographyEstimator {
    /// Estimator with Gaussian elimination and no conditioning guard
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: LinearSolver> HomographyEstimator<S> {
    /// Estimator backed by a custom solver
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            options: EstimatorOptions::default(),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: EstimatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Compute `H` with `H(src[k]) = dst[k]` for k = 0..3, plus its inverse.
    ///
    /// All-or-nothing: a singular system or a non-invertible result is
    /// returned as an error and no matrix escapes.
    pub fn estimate(&self, src: &Quad, dst: &Quad) -> Result<Homography> {
        if let Some(min_sine) = self.options.min_corner_sine {
            check_conditioning(src, min_sine)?;
            check_conditioning(dst, min_sine)?;
        }

        let (a, b) = homography_system(src, dst);
        let h = self.solver.solve(&a, &b)?;
        if h.len() != 8 {
            return Err(GeometryError::shape("8 homography parameters", format!("{}", h.len())));
        }

        let forward = Mat3::from_row_major([h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0]);
        let homography = Homography::from_matrix(forward)?;
        debug!("estimated homography {:?}", forward.as_array());
        Ok(homography)
    }

    /// Slice-based entry point; both sides must hold exactly four points
    pub fn estimate_from_slices(&self, src: &[Point], dst: &[Point]) -> Result<Homography> {
        let src = Quad::try_from(src)?;
        let dst = Quad::try_from(dst)?;
        self.estimate(&src, &dst)
    }
}

fn check_conditioning(quad: &Quad, min_sine: f64) -> Result<()> {
    if !min_sine.is_finite() {
        return Err(GeometryError::InvalidOption {
            name: "min_corner_sine",
            value: min_sine,
        });
    }
    let (corner, sine) = quad.min_corner_sine();
    if sine < min_sine {
        warn!(
            "rejecting quad {:?}: corner {} sine {:.3e} below {:.3e}",
            quad.corners(),
            corner,
            sine,
            min_sine
        );
        return Err(GeometryError::IllConditioned {
            corner,
            sine,
            min_sine,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_quad() -> Quad {
        Quad::new([
            Point::new(200.0, 150.0),
            Point::new(500.0, 130.0),
            Point::new(520.0, 340.0),
            Point::new(190.0, 300.0),
        ])
    }

    #[test]
    fn test_perspective_transform() {
        let src = Quad::rect(100.0, 100.0);
        let dst = Quad::rect(50.0, 50.0);

        let h = Homography::from_points(&src, &dst).unwrap();
        let p = h.map(Point::new(50.0, 50.0)).unwrap();
        assert!(p.approx_eq(&Point::new(25.0, 25.0), 1e-9));
        assert_eq!(h.forward.get(2, 2), 1.0);
    }

    #[test]
    fn test_corners_interpolated() {
        let src = Quad::unit();
        let dst = image_quad();
        let h = Homography::from_points(&src, &dst).unwrap();
        for (s, d) in src.corners().iter().zip(dst.corners()) {
            assert!(h.map(*s).unwrap().approx_eq(d, 1e-9));
            assert!(h.map_inverse(*d).unwrap().approx_eq(s, 1e-9));
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        let h = Homography::from_points(&Quad::unit(), &image_quad()).unwrap();
        let scale = h.forward.as_array().iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!((h.inverse * h.forward).approx_eq(&Mat3::IDENTITY, 1e-9 * scale.max(1.0)));
        assert!((h.forward * h.inverse).approx_eq(&Mat3::IDENTITY, 1e-9 * scale.max(1.0)));
    }

    #[test]
    fn test_collinear_source_is_singular() {
        let src = Quad::new([
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ]);
        let err = Homography::from_points(&src, &image_quad()).unwrap_err();
        assert!(matches!(err, GeometryError::SingularSystem { .. }));
    }

    #[test]
    fn test_invert_known_matrix() {
        let m = Mat3::from_row_major([1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
        let inv = m.inverse().unwrap();
        let expected = Mat3::from_row_major([-24.0, 18.0, 5.0, 20.0, -15.0, -4.0, -5.0, 4.0, 1.0]);
        assert!(inv.approx_eq(&expected, 1e-12));
    }

    #[test]
    fn test_invert_singular() {
        let err = invert_mat3(&Mat3::zeros()).unwrap_err();
        assert!(matches!(err, GeometryError::NotInvertible { .. }));

        // Rank 1
        let rank_one = Mat3::from_row_major([1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 3.0, 6.0, 9.0]);
        assert!(matches!(
            rank_one.inverse(),
            Err(GeometryError::NotInvertible { .. })
        ));
    }

    #[test]
    fn test_point_at_infinity() {
        let h = Mat3::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 1.0]]);
        let err = apply_homography(&h, Point::new(-1.0, 5.0)).unwrap_err();
        assert!(matches!(err, GeometryError::PointAtInfinity { .. }));

        let p = apply_homography(&h, Point::new(1.0, 4.0)).unwrap();
        assert!(p.approx_eq(&Point::new(0.5, 2.0), 1e-12));
    }

    #[test]
    fn test_slices_must_hold_four_points() {
        let est = HomographyEstimator::new();
        let three = [Point::new(0.0, 0.0); 3];
        let four = *Quad::unit().corners();
        assert!(matches!(
            est.estimate_from_slices(&three, &four),
            Err(GeometryError::Shape { .. })
        ));
        assert!(matches!(
            est.estimate_from_slices(&four, &three),
            Err(GeometryError::Shape { .. })
        ));
        assert!(est.estimate_from_slices(&four, image_quad().corners()).is_ok());
    }

    #[test]
    fn test_conditioning_guard() {
        let nearly_flat = Quad::new([
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(200.0, 0.001),
            Point::new(0.0, 100.0),
        ]);
        // Unguarded estimation still succeeds
        assert!(Homography::from_points(&Quad::unit(), &nearly_flat).is_ok());

        let guarded = HomographyEstimator::new().with_options(EstimatorOptions {
            min_corner_sine: Some(1e-3),
        });
        let err = guarded.estimate(&Quad::unit(), &nearly_flat).unwrap_err();
        assert!(matches!(err, GeometryError::IllConditioned { corner: 1, .. }));
        assert!(guarded.estimate(&Quad::unit(), &image_quad()).is_ok());
    }

    #[test]
    fn test_non_finite_guard_rejected() {
        for bound in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let est = HomographyEstimator::new().with_options(EstimatorOptions {
                min_corner_sine: Some(bound),
            });
            assert!(matches!(
                est.estimate(&Quad::unit(), &image_quad()),
                Err(GeometryError::InvalidOption {
                    name: "min_corner_sine",
                    ..
                })
            ));
        }
    }

    struct FailingSolver;

    impl LinearSolver for FailingSolver {
        fn solve<R: AsRef<[f64]>>(&self, _a: &[R], _b: &[f64]) -> Result<Vec<f64>> {
            Err(GeometryError::SingularSystem {
                column: 0,
                pivot: 0.0,
            })
        }
    }

    #[test]
    fn test_custom_solver_errors_propagate() {
        let est = HomographyEstimator::with_solver(FailingSolver);
        assert!(matches!(
            est.estimate(&Quad::unit(), &image_quad()),
            Err(GeometryError::SingularSystem { .. })
        ));
    }
}
