//! Rectangle space: perspective-correct coordinates for a quadrilateral region
//!
//! A [`RectSpace`] pairs an image-space [`Quad`] with the canonical rectangle
//! `(0,0), (W,0), (W,H), (0,H)` and converts points both ways through the
//! homography between them. Edits to the quad are expressed as additive
//! deltas in rect space (see [`edit`]) so the projective distortion is
//! absorbed by the mapping instead of the caller.

pub mod edit;

pub use edit::{DragState, Handle, QuadEdit};

use crate::error::{GeometryError, Result};
use crate::models::{Mat3, Point, Quad};
use crate::utils::geometry::{EstimatorOptions, Homography, HomographyEstimator, apply_homography};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

/// Bidirectional mapping between an image quad and a `W x H` rectangle.
///
/// Immutable: a changed quad means a new `RectSpace`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectSpace {
    quad: Quad,
    width: f64,
    height: f64,
    /// `forward` is rect -> image, `inverse` is image -> rect
    homography: Homography,
    options: EstimatorOptions,
}

impl RectSpace {
    /// Space over the unit square
    pub fn new(quad: Quad) -> Result<Self> {
        Self::with_size(quad, 1.0, 1.0)
    }

    /// Space over a `width x height` rectangle
    pub fn with_size(quad: Quad, width: f64, height: f64) -> Result<Self> {
        Self::with_options(quad, width, height, EstimatorOptions::default())
    }

    /// Space over a `width x height` rectangle with estimator options.
    ///
    /// A negative size mirrors the rectangle along that axis; zero and
    /// non-finite sizes fail with [`GeometryError::InvalidRect`]. The options
    /// are kept and reused by every edit derived from this space.
    pub fn with_options(
        quad: Quad,
        width: f64,
        height: f64,
        options: EstimatorOptions,
    ) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width != 0.0 && height != 0.0) {
            return Err(GeometryError::InvalidRect { width, height });
        }
        let rect = Quad::rect(width, height);
        let homography = HomographyEstimator::new()
            .with_options(options)
            .estimate(&rect, &quad)?;
        debug!(
            "rect space {}x{} over quad {:?}",
            width,
            height,
            quad.corners()
        );
        Ok(Self {
            quad,
            width,
            height,
            homography,
            options,
        })
    }

    /// Same rectangle size and options over a different quad
    pub fn rebuild(&self, quad: Quad) -> Result<Self> {
        Self::with_options(quad, self.width, self.height, self.options)
    }

    /// The image-space quad this space was built from
    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    /// Rectangle width
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Rectangle height
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The canonical rectangle in the quad's index order
    pub fn rect(&self) -> Quad {
        Quad::rect(self.width, self.height)
    }

    /// Rect -> image matrix
    pub fn rect_to_image(&self) -> &Mat3 {
        &self.homography.forward
    }

    /// Image space -> rect space
    pub fn to_rect(&self, p: Point) -> Result<Point> {
        apply_homography(&self.homography.inverse, p)
    }

    /// Rect space -> image space
    pub fn to_image(&self, p: Point) -> Result<Point> {
        apply_homography(&self.homography.forward, p)
    }

    /// Move an image-space point by `(du, dv)` measured in rect space
    pub fn move_in_rect(&self, p: Point, du: f64, dv: f64) -> Result<Point> {
        let uv = self.to_rect(p)?;
        self.to_image(uv.translate(du, dv))
    }

    /// Map many image points into rect space, stopping at the first failure
    pub fn to_rect_all(&self, points: &[Point]) -> Result<Vec<Point>> {
        points.iter().map(|p| self.to_rect(*p)).collect()
    }

    /// Map many rect points into image space, stopping at the first failure
    pub fn to_image_all(&self, points: &[Point]) -> Result<Vec<Point>> {
        points.iter().map(|p| self.to_image(*p)).collect()
    }

    /// [`to_rect_all`](Self::to_rect_all) on the rayon pool
    pub fn to_rect_parallel(&self, points: &[Point]) -> Result<Vec<Point>> {
        points.par_iter().map(|p| self.to_rect(*p)).collect()
    }

    /// [`to_image_all`](Self::to_image_all) on the rayon pool
    pub fn to_image_parallel(&self, points: &[Point]) -> Result<Vec<Point>> {
        points.par_iter().map(|p| self.to_image(*p)).collect()
    }

    /// Image-space vertices of a `cols x rows` lattice spanning the rectangle.
    ///
    /// Both borders are included, so `cols` and `rows` must be at least 2.
    /// Vertices come back row-major: `index = row * cols + col`.
    pub fn mesh(&self, cols: usize, rows: usize) -> Result<Vec<Point>> {
        if cols < 2 || rows < 2 {
            return Err(GeometryError::shape(
                "mesh of at least 2x2 vertices",
                format!("{}x{}", cols, rows),
            ));
        }
        let du = self.width / (cols - 1) as f64;
        let dv = self.height / (rows - 1) as f64;

        let lines: Vec<Vec<Point>> = (0..rows)
            .into_par_iter()
            .map(|j| {
                (0..cols)
                    .map(|i| self.to_image(Point::new(i as f64 * du, j as f64 * dv)))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(lines.into_iter().flatten().collect())
    }
}
