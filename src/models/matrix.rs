use serde::{Deserialize, Serialize};
use std::ops::{Index, Mul};

/// Homogeneous 2D coordinate `(x, y, w)`
pub type Vec3 = [f64; 3];

/// 3x3 matrix stored as 9 values in row-major order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat3 {
    m: [f64; 9],
}

impl Mat3 {
    /// Identity transform
    pub const IDENTITY: Mat3 = Mat3::from_row_major([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Build from 9 row-major values
    pub const fn from_row_major(m: [f64; 9]) -> Self {
        Self { m }
    }

    /// Build from three rows
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        let [r0, r1, r2] = rows;
        Self::from_row_major([
            r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2],
        ])
    }

    /// All-zero matrix
    pub fn zeros() -> Self {
        Self::from_row_major([0.0; 9])
    }

    /// Row-major values
    pub fn as_array(&self) -> &[f64; 9] {
        &self.m
    }

    /// Element at row `r`, column `c`
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.m[r * 3 + c]
    }

    /// Matrix-vector product
    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        [
            m[0] * v[0] + m[1] * v[1] + m[2] * v[2],
            m[3] * v[0] + m[4] * v[1] + m[5] * v[2],
            m[6] * v[0] + m[7] * v[1] + m[8] * v[2],
        ]
    }

    /// Largest absolute element-wise difference
    pub fn max_abs_diff(&self, other: &Mat3) -> f64 {
        self.m
            .iter()
            .zip(other.m.iter())
            .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()))
    }

    /// Element-wise comparison within `tol`
    pub fn approx_eq(&self, other: &Mat3, tol: f64) -> bool {
        self.max_abs_diff(other) <= tol
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<(usize, usize)> for Mat3 {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.m[r * 3 + c]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut out = [0.0; 9];
        for r in 0..3 {
            for c in 0..3 {
                out[r * 3 + c] = (0..3).map(|k| self.get(r, k) * rhs.get(k, c)).sum();
            }
        }
        Mat3::from_row_major(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_product() {
        let m = Mat3::from_row_major([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0]);
        assert_eq!(m * Mat3::IDENTITY, m);
        assert_eq!(Mat3::IDENTITY * m, m);
        assert_eq!(m[(2, 2)], 10.0);
        assert_eq!(m.get(1, 0), 4.0);
    }

    #[test]
    fn test_mul_vec3() {
        let m = Mat3::from_rows([[2.0, 0.0, 1.0], [0.0, 3.0, -1.0], [0.0, 0.0, 1.0]]);
        assert_eq!(m.mul_vec3([1.0, 1.0, 1.0]), [3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = Mat3::from_row_major([1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
        let b = Mat3::from_row_major([1.0, 2.0, 3.5, 0.0, 1.0, 4.0, 5.0, 6.0, -0.25]);
        assert_eq!(a.max_abs_diff(&b), 0.5);
        assert!(a.approx_eq(&b, 0.5));
        assert!(!a.approx_eq(&b, 0.4));
    }
}
