//! Index-based polygon meshes.
//!
//! A [`Mesh`] owns one vertex list; faces and edges refer to vertices only
//! by their position in that list.

mod builder;
mod report;

pub(crate) use builder::{vertex_budget, MeshBuilder, Ring};
pub use report::{connected_components, MeshReport};

use crate::error::{DomainError, Result};
use crate::math::{Point3, Vector3};

/// An unordered pair of vertex indices.
pub type Edge = [u32; 2];

/// A triangle or quadrilateral, wound counter-clockwise seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Triangle([u32; 3]),
    Quad([u32; 4]),
}

impl Face {
    /// Vertex indices in winding order.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        match self {
            Self::Triangle(t) => t,
            Self::Quad(q) => q,
        }
    }

    #[must_use]
    pub fn is_triangle(&self) -> bool {
        matches!(self, Self::Triangle(_))
    }

    #[must_use]
    pub fn is_quad(&self) -> bool {
        matches!(self, Self::Quad(_))
    }

    /// The same face with opposite winding.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Triangle([a, b, c]) => Self::Triangle([a, c, b]),
            Self::Quad([a, b, c, d]) => Self::Quad([a, d, c, b]),
        }
    }

    /// Fan triangulation from the first vertex, preserving winding.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> {
        let pair = match *self {
            Self::Triangle(t) => [Some(t), None],
            Self::Quad([a, b, c, d]) => [Some([a, b, c]), Some([a, c, d])],
        };
        pair.into_iter().flatten()
    }

    /// Iterator over the directed boundary edges of the face.
    pub fn directed_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let idx = self.indices();
        let n = idx.len();
        (0..n).map(move |i| (idx[i], idx[(i + 1) % n]))
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Whether the two boxes overlap with positive volume.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|k| self.min[k] < other.max[k] && other.min[k] < self.max[k])
    }
}

/// Vertices, edges and faces of one generated solid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Point3>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh from raw parts, e.g. one handed back by a host.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DanglingIndex`] if an edge or face refers to a
    /// vertex that does not exist.
    pub fn from_parts(vertices: Vec<Point3>, edges: Vec<Edge>, faces: Vec<Face>) -> Result<Self> {
        let mesh = Self {
            vertices,
            edges,
            faces,
        };
        match mesh.first_dangling_index() {
            Some(index) => Err(DomainError::DanglingIndex {
                index,
                vertex_count: mesh.vertices.len(),
            }
            .into()),
            None => Ok(mesh),
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// First edge or face index that is not a valid vertex index.
    #[must_use]
    pub fn first_dangling_index(&self) -> Option<u32> {
        let len = self.vertices.len();
        self.faces
            .iter()
            .flat_map(|f| f.indices().iter().copied())
            .chain(self.edges.iter().flatten().copied())
            .find(|&i| i as usize >= len)
    }

    /// Bounding box of all vertices, `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.vertices.first()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for v in &self.vertices[1..] {
            aabb.min = aabb.min.inf(v);
            aabb.max = aabb.max.sup(v);
        }
        Some(aabb)
    }

    /// All faces split into triangles, for hosts that only take triangles.
    #[must_use]
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        self.faces.iter().flat_map(Face::triangles).collect()
    }

    /// A copy with every vertex moved by `offset`; topology is unchanged.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v + offset).collect(),
            edges: self.edges.clone(),
            faces: self.faces.clone(),
        }
    }
}
