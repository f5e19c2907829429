//! quadspace - perspective-correct coordinates for quadrilateral regions
//!
//! Computes the exact homography between two sets of four points, inverts
//! it, and uses the pair to translate coordinates between an arbitrary image
//! quadrilateral and a canonical `W x H` rectangle. Everything is pure and
//! synchronous; rendering, input handling and persistence are left to the
//! caller.
//!
//! ```
//! use quadspace::{Point, Quad, RectSpace};
//!
//! let quad = Quad::new([
//!     Point::new(200.0, 150.0),
//!     Point::new(500.0, 130.0),
//!     Point::new(520.0, 340.0),
//!     Point::new(190.0, 300.0),
//! ]);
//! let space = RectSpace::new(quad).unwrap();
//! let p = space.to_image(Point::new(1.0, 1.0)).unwrap();
//! assert!(p.approx_eq(&Point::new(520.0, 340.0), 1e-9));
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Error type and result alias
pub mod error;
/// Core value types (Point, Quad, Mat3)
pub mod models;
/// Rect space and quad editing
pub mod space;
/// CLI support (argument parsing, environment defaults, overlay drawing)
pub mod tools;
/// Numerical utilities (linear systems, homographies)
pub mod utils;

pub use error::{GeometryError, Result};
pub use models::{Corner, Edge, Mat3, Point, Quad, Vec3};
pub use space::{DragState, Handle, QuadEdit, RectSpace};
pub use utils::geometry::{
    EstimatorOptions, Homography, HomographyEstimator, apply_homography, invert_mat3,
};
pub use utils::linear_system::{GaussianElimination, LinearSolver, solve_linear_system};

/// Homography carrying `src[k]` onto `dst[k]` for k = 0..3, with its inverse.
///
/// Shorthand for [`Homography::from_points`].
pub fn homography_from_4_points(src: &Quad, dst: &Quad) -> Result<Homography> {
    Homography::from_points(src, dst)
}

/// Rect space over a `width x height` rectangle for `quad`.
///
/// Shorthand for [`RectSpace::with_size`].
pub fn rect_space_from_image_quad(quad: Quad, width: f64, height: f64) -> Result<RectSpace> {
    RectSpace::with_size(quad, width, height)
}
