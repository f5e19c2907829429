use super::Point;
use crate::error::{GeometryError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Corner of a quad in the top-left, top-right, bottom-right, bottom-left order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    /// Index 0
    TopLeft,
    /// Index 1
    TopRight,
    /// Index 2
    BottomRight,
    /// Index 3
    BottomLeft,
}

impl Corner {
    /// All corners in index order
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Position of this corner in a `Quad`
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    /// Corner at `index`, if it is in 0..4
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Edge `k` runs from corner `k` to corner `k + 1 (mod 4)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// Corners 0 -> 1
    Top,
    /// Corners 1 -> 2
    Right,
    /// Corners 2 -> 3
    Bottom,
    /// Corners 3 -> 0
    Left,
}

impl Edge {
    /// All edges in index order
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Position of this edge (and of its starting corner)
    pub fn index(self) -> usize {
        match self {
            Edge::Top => 0,
            Edge::Right => 1,
            Edge::Bottom => 2,
            Edge::Left => 3,
        }
    }

    /// Edge at `index`, if it is in 0..4
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The two corners joined by this edge
    pub fn corners(self) -> (usize, usize) {
        let i = self.index();
        (i, (i + 1) % 4)
    }
}

/// Ordered quadrilateral: exactly four corners in a fixed winding order.
///
/// The index order is a contract with whoever pairs this quad with another
/// point set; by convention 0..3 are top-left, top-right, bottom-right,
/// bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad {
    corners: [Point; 4],
}

impl Quad {
    /// Create a quad from its four corners
    pub const fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangle `(0,0), (w,0), (w,h), (0,h)`
    pub fn rect(width: f64, height: f64) -> Self {
        Self::new([
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ])
    }

    /// Unit square
    pub fn unit() -> Self {
        Self::rect(1.0, 1.0)
    }

    /// Corners in index order
    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    /// A single corner
    pub fn corner(&self, corner: Corner) -> Point {
        self.corners[corner.index()]
    }

    /// Midpoints of the four edges, edge `k` first at index `k`
    pub fn edge_midpoints(&self) -> [Point; 4] {
        std::array::from_fn(|i| self.corners[i].midpoint(&self.corners[(i + 1) % 4]))
    }

    /// Average of the four corners
    pub fn centroid(&self) -> Point {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / 4.0, sy / 4.0)
    }

    /// Smallest |sin| of the angle each corner makes with its two neighbours.
    ///
    /// The four neighbour triples are exactly the four 3-point subsets of the
    /// quad, so a value near zero means some three corners are (nearly)
    /// collinear or two corners coincide. Returns `(corner_index, sine)`.
    pub fn min_corner_sine(&self) -> (usize, f64) {
        let mut worst = (0, f64::INFINITY);
        for i in 0..4 {
            let p = self.corners[i];
            let prev = self.corners[(i + 3) % 4];
            let next = self.corners[(i + 1) % 4];
            let (ax, ay) = (prev.x - p.x, prev.y - p.y);
            let (bx, by) = (next.x - p.x, next.y - p.y);
            let norm = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
            let sine = if norm > 0.0 {
                (ax * by - ay * bx).abs() / norm
            } else {
                0.0
            };
            if sine < worst.1 {
                worst = (i, sine);
            }
        }
        worst
    }
}

impl From<[Point; 4]> for Quad {
    fn from(corners: [Point; 4]) -> Self {
        Self::new(corners)
    }
}

impl TryFrom<&[Point]> for Quad {
    type Error = GeometryError;

    fn try_from(points: &[Point]) -> Result<Self> {
        let corners: [Point; 4] = points
            .try_into()
            .map_err(|_| GeometryError::shape("4 points", format!("{} points", points.len())))?;
        Ok(Self::new(corners))
    }
}

impl Index<usize> for Quad {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.corners[index]
    }
}

impl Index<Corner> for Quad {
    type Output = Point;

    fn index(&self, corner: Corner) -> &Point {
        &self.corners[corner.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Quad {
        Quad::new([
            Point::new(200.0, 150.0),
            Point::new(500.0, 130.0),
            Point::new(520.0, 340.0),
            Point::new(190.0, 300.0),
        ])
    }

    #[test]
    fn test_rect_layout() {
        let r = Quad::rect(4.0, 2.0);
        assert_eq!(r[Corner::TopLeft], Point::new(0.0, 0.0));
        assert_eq!(r[Corner::TopRight], Point::new(4.0, 0.0));
        assert_eq!(r[Corner::BottomRight], Point::new(4.0, 2.0));
        assert_eq!(r[Corner::BottomLeft], Point::new(0.0, 2.0));
        assert_eq!(r.corner(Corner::TopRight), r[1]);
    }

    #[test]
    fn test_try_from_slice() {
        let pts = [Point::new(0.0, 0.0); 3];
        let err = Quad::try_from(&pts[..]).unwrap_err();
        assert!(matches!(err, GeometryError::Shape { .. }));

        let pts = [Point::new(1.0, 1.0); 4];
        assert!(Quad::try_from(&pts[..]).is_ok());
    }

    #[test]
    fn test_edge_midpoints_and_centroid() {
        let q = Quad::unit();
        let mids = q.edge_midpoints();
        assert_eq!(mids[Edge::Top.index()], Point::new(0.5, 0.0));
        assert_eq!(mids[Edge::Right.index()], Point::new(1.0, 0.5));
        assert_eq!(mids[Edge::Bottom.index()], Point::new(0.5, 1.0));
        assert_eq!(mids[Edge::Left.index()], Point::new(0.0, 0.5));
        assert_eq!(q.centroid(), Point::new(0.5, 0.5));
        assert_eq!(Edge::Left.corners(), (3, 0));
    }

    #[test]
    fn test_min_corner_sine() {
        let (_, sine) = Quad::unit().min_corner_sine();
        assert!((sine - 1.0).abs() < 1e-12);

        let (_, sine) = sample().min_corner_sine();
        assert!(sine > 0.5);

        // Corner 1 sits on the segment between corners 0 and 2
        let flat = Quad::new([
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ]);
        let (corner, sine) = flat.min_corner_sine();
        assert_eq!(corner, 1);
        assert!(sine < 1e-12);

        let coincident = Quad::new([Point::new(3.0, 3.0); 4]);
        assert_eq!(coincident.min_corner_sine().1, 0.0);
    }

    #[test]
    fn test_serde_as_array() {
        let json = serde_json::to_string(&Quad::unit()).unwrap();
        assert!(json.starts_with("[{"));
        let back: Quad = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Quad::unit());
    }
}
