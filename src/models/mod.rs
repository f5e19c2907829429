/// 3x3 matrices and homogeneous vectors
pub mod matrix;
/// 2D points
pub mod point;
/// Four-corner quads and their corner/edge indices
pub mod quad;

pub use matrix::{Mat3, Vec3};
pub use point::Point;
pub use quad::{Corner, Edge, Quad};
