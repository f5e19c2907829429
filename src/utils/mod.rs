//! Numerical building blocks
//!
//! This module provides:
//! - Linear systems (Gaussian elimination with partial pivoting)
//! - Geometry (3x3 inversion, four-point homography estimation, point mapping)

pub mod geometry;
pub mod linear_system;

/// Absolute tolerance on pivots, determinants and homogeneous `w`
pub const EPS: f64 = 1e-12;
