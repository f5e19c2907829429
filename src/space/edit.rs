//! Quad edits driven by rect-space deltas
//!
//! Every edit takes a [`RectSpace`] snapshot, moves some corners by
//! `(du, dv)` in rect coordinates (through [`RectSpace::move_in_rect`]) and
//! builds a fresh space from the result. Corners an edit does not name are
//! copied through untouched.

use super::RectSpace;
use crate::error::Result;
use crate::models::{Corner, Edge, Point, Quad};
use log::debug;
use serde::{Deserialize, Serialize};

/// A single edit of a quad, in rect-space units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QuadEdit {
    /// Move the whole quad
    Pan {
        /// Horizontal delta
        du: f64,
        /// Vertical delta
        dv: f64,
    },
    /// Grow or shrink about the top-left corner
    Scale {
        /// Delta applied to the far edges
        d: f64,
    },
    /// Drag one edge; only the component across the edge is used
    Edge {
        /// Dragged edge
        edge: Edge,
        /// Horizontal delta
        du: f64,
        /// Vertical delta
        dv: f64,
    },
    /// Drag one corner; its two neighbours follow along the shared edges
    Corner {
        /// Dragged corner
        corner: Corner,
        /// Horizontal delta
        du: f64,
        /// Vertical delta
        dv: f64,
    },
}

impl QuadEdit {
    /// Rect-space delta for each corner; `None` leaves the corner alone
    pub fn corner_deltas(&self) -> [Option<(f64, f64)>; 4] {
        let mut deltas = [None; 4];
        match *self {
            QuadEdit::Pan { du, dv } => deltas = [Some((du, dv)); 4],
            QuadEdit::Scale { d } => {
                deltas[1] = Some((d, 0.0));
                deltas[2] = Some((d, d));
                deltas[3] = Some((0.0, d));
            }
            QuadEdit::Edge { edge, du, dv } => {
                let delta = match edge {
                    Edge::Top | Edge::Bottom => (0.0, dv),
                    Edge::Right | Edge::Left => (du, 0.0),
                };
                let (a, b) = edge.corners();
                deltas[a] = Some(delta);
                deltas[b] = Some(delta);
            }
            QuadEdit::Corner { corner, du, dv } => {
                let i = corner.index();
                deltas[i] = Some((du, dv));
                // Corners 0/1 and 2/3 share horizontal edges, 0/3 and 1/2 vertical ones
                deltas[i ^ 1] = Some((0.0, dv));
                deltas[3 - i] = Some((du, 0.0));
            }
        }
        deltas
    }
}

impl RectSpace {
    /// The quad that results from `edit`, without building a new space
    pub fn edited_quad(&self, edit: &QuadEdit) -> Result<Quad> {
        let mut corners = *self.quad.corners();
        for (corner, delta) in corners.iter_mut().zip(edit.corner_deltas()) {
            if let Some((du, dv)) = delta {
                *corner = self.move_in_rect(*corner, du, dv)?;
            }
        }
        Ok(Quad::new(corners))
    }

    /// Apply `edit` and build the space for the edited quad.
    ///
    /// On error `self` is still the valid current state.
    pub fn apply(&self, edit: &QuadEdit) -> Result<RectSpace> {
        let quad = self.edited_quad(edit)?;
        let next = self.rebuild(quad)?;
        debug!("applied {:?}", edit);
        Ok(next)
    }

    /// Shorthand for [`QuadEdit::Pan`]
    pub fn pan(&self, du: f64, dv: f64) -> Result<RectSpace> {
        self.apply(&QuadEdit::Pan { du, dv })
    }

    /// Shorthand for [`QuadEdit::Scale`]
    pub fn scale(&self, d: f64) -> Result<RectSpace> {
        self.apply(&QuadEdit::Scale { d })
    }
}

/// Something a pointer can grab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    /// The quad interior; dragging pans
    Body,
    /// An edge midpoint
    Edge(Edge),
    /// A corner
    Corner(Corner),
}

impl Handle {
    /// The edit this handle produces for a drag of `(du, dv)`
    pub fn edit(self, du: f64, dv: f64) -> QuadEdit {
        match self {
            Handle::Body => QuadEdit::Pan { du, dv },
            Handle::Edge(edge) => QuadEdit::Edge { edge, du, dv },
            Handle::Corner(corner) => QuadEdit::Corner { corner, du, dv },
        }
    }

    /// Where the handle sits on `quad`, in image space
    pub fn position(self, quad: &Quad) -> Point {
        match self {
            Handle::Body => quad.centroid(),
            Handle::Edge(edge) => quad.edge_midpoints()[edge.index()],
            Handle::Corner(corner) => quad.corner(corner),
        }
    }
}

/// An in-progress drag, anchored at the rect-space position of the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    handle: Handle,
    anchor: Point,
}

impl DragState {
    /// Start dragging `handle` with the pointer at image position `pointer`
    pub fn begin(space: &RectSpace, handle: Handle, pointer: Point) -> Result<Self> {
        Ok(Self {
            handle,
            anchor: space.to_rect(pointer)?,
        })
    }

    /// Current anchor in rect space
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Pointer moved to `pointer`: apply the handle's edit and re-anchor in
    /// the new space. On error the state and `space` are unchanged.
    pub fn step(&mut self, space: &RectSpace, pointer: Point) -> Result<RectSpace> {
        let uv = space.to_rect(pointer)?;
        let edit = self
            .handle
            .edit(uv.x - self.anchor.x, uv.y - self.anchor.y);
        let next = space.apply(&edit)?;
        self.anchor = next.to_rect(pointer)?;
        Ok(next)
    }
}
