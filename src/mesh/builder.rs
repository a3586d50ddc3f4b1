use std::collections::HashSet;

use crate::error::{DomainError, Result};
use crate::math::Point3;

use super::{Edge, Face, Mesh};

/// Multiplies vertex-count factors, failing if the total cannot be indexed by `u32`.
pub(crate) fn vertex_budget(factors: &[usize]) -> Result<usize> {
    let total = factors
        .iter()
        .try_fold(1usize, |acc, &f| acc.checked_mul(f))
        .ok_or(DomainError::TooManyVertices(usize::MAX))?;
    if total > u32::MAX as usize {
        return Err(DomainError::TooManyVertices(total).into());
    }
    Ok(total)
}

/// A ring of vertices around a sweep or revolution axis.
///
/// A ring of zero radius collapses to a single vertex on the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ring {
    Loop { start: u32, len: u32 },
    Point(u32),
}

impl Ring {
    /// Index of the `j`-th vertex; a collapsed ring answers its single vertex.
    pub(crate) fn at(self, j: u32) -> u32 {
        match self {
            Self::Loop { start, len } => start + j % len,
            Self::Point(index) => index,
        }
    }
}

/// Accumulates one mesh. Faces may only name vertices already pushed.
///
/// With `reversed` set, every face is emitted with opposite winding; sweeps
/// use it for clockwise profiles.
#[derive(Debug, Default)]
pub(crate) struct MeshBuilder {
    vertices: Vec<Point3>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    reversed: bool,
}

#[allow(clippy::cast_possible_truncation)]
impl MeshBuilder {
    /// Reserves room for `vertices`; the count must come from [`vertex_budget`].
    pub(crate) fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::new(),
            faces: Vec::with_capacity(faces),
            reversed: false,
        }
    }

    pub(crate) fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub(crate) fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub(crate) fn push_vertex(&mut self, point: Point3) -> u32 {
        let index = self.vertex_count();
        self.vertices.push(point);
        index
    }

    /// Pushes a closed ring of points and returns it.
    pub(crate) fn push_ring<I>(&mut self, points: I) -> Ring
    where
        I: IntoIterator<Item = Point3>,
    {
        let start = self.vertex_count();
        self.vertices.extend(points);
        Ring::Loop {
            start,
            len: self.vertex_count() - start,
        }
    }

    pub(crate) fn edge(&mut self, a: u32, b: u32) {
        debug_assert!(a < self.vertex_count() && b < self.vertex_count());
        self.edges.push([a, b]);
    }

    /// Edges around a closed ring.
    pub(crate) fn ring_edges(&mut self, ring: Ring) {
        if let Ring::Loop { len, .. } = ring {
            for j in 0..len {
                self.edge(ring.at(j), ring.at(j + 1));
            }
        }
    }

    /// Edges joining vertex `j` of `a` to vertex `j` of `b`.
    pub(crate) fn rung_edges(&mut self, a: Ring, b: Ring, len: u32) {
        for j in 0..len {
            self.edge(a.at(j), b.at(j));
        }
    }

    pub(crate) fn triangle(&mut self, t: [u32; 3]) {
        self.face(Face::Triangle(t));
    }

    pub(crate) fn quad(&mut self, q: [u32; 4]) {
        self.face(Face::Quad(q));
    }

    /// Emits a planar polygon of up to four corners, dropping repeated
    /// corners where rings have collapsed. Fewer than three distinct
    /// corners emit nothing.
    pub(crate) fn polygon(&mut self, corners: [u32; 4]) {
        let mut unique: Vec<u32> = Vec::with_capacity(4);
        for (i, &c) in corners.iter().enumerate() {
            if c != corners[(i + 1) % 4] {
                unique.push(c);
            }
        }
        match unique.as_slice() {
            &[a, b, c] => self.triangle([a, b, c]),
            &[a, b, c, d] => self.quad([a, b, c, d]),
            _ => {}
        }
    }

    fn face(&mut self, face: Face) {
        debug_assert!(
            face.indices().iter().all(|&i| i < self.vertex_count()),
            "face {face:?} names a vertex not yet emitted"
        );
        self.faces.push(if self.reversed { face.flipped() } else { face });
    }

    /// Band of faces between rings `a` and `b`: `(a_j, a_j+1, b_j+1, b_j)`.
    ///
    /// `segments` is the number of faces; pass the ring length to wrap
    /// around, one less to leave the band open. A collapsed ring turns
    /// its quads into triangles; two collapsed rings emit nothing.
    pub(crate) fn strip(&mut self, a: Ring, b: Ring, segments: u32) {
        if a == b {
            return;
        }
        for j in 0..segments {
            match (a, b) {
                (Ring::Point(_), Ring::Point(_)) => return,
                (Ring::Point(p), _) => self.triangle([p, b.at(j + 1), b.at(j)]),
                (_, Ring::Point(p)) => self.triangle([a.at(j), a.at(j + 1), p]),
                _ => self.quad([a.at(j), a.at(j + 1), b.at(j + 1), b.at(j)]),
            }
        }
    }

    /// Fan of triangles closing a ring: `(r_0, r_j+1, r_j+2)`, or the
    /// reverse winding when `reverse` is set.
    pub(crate) fn fan(&mut self, ring: Ring, reverse: bool) {
        let Ring::Loop { start, len } = ring else {
            return;
        };
        for j in 0..len.saturating_sub(2) {
            if reverse {
                self.triangle([start, start + j + 2, start + j + 1]);
            } else {
                self.triangle([start, start + j + 1, start + j + 2]);
            }
        }
    }

    /// Finishes with the explicitly emitted edge list.
    pub(crate) fn finish(self) -> Mesh {
        Mesh {
            vertices: self.vertices,
            edges: self.edges,
            faces: self.faces,
        }
    }

    /// Finishes with the unique edges implied by the faces.
    pub(crate) fn finish_with_face_edges(mut self) -> Mesh {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for face in &self.faces {
            for (a, b) in face.directed_edges() {
                let key = if a < b { [a, b] } else { [b, a] };
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }
        self.edges = edges;
        self.finish()
    }
}
