//! Mesh health checks used to verify builder output.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::{Face, Mesh};

/// Area below which a face counts as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// Summary of a mesh's topological and geometric health.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Number of triangular faces.
    pub triangle_count: usize,
    /// Number of quadrilateral faces.
    pub quad_count: usize,
    /// Number of distinct undirected edges implied by the faces.
    pub edge_count: usize,

    /// Face corners naming a vertex that does not exist.
    pub out_of_range_index_count: usize,
    /// Edges bounding exactly one face.
    pub boundary_edge_count: usize,
    /// Edges bounding three or more faces.
    pub non_manifold_edge_count: usize,
    /// Directed edges walked the same way by more than one face.
    pub orientation_conflict_count: usize,
    /// Faces with repeated corners or near-zero area.
    pub degenerate_face_count: usize,
    /// Faces using the same vertex set as an earlier face.
    pub duplicate_face_count: usize,
    /// Connected pieces among the vertices used by faces.
    pub component_count: usize,
    /// Enclosed volume; positive when faces wind outward.
    pub signed_volume: f64,
}

impl MeshReport {
    /// Runs every check over `mesh`.
    #[must_use]
    pub fn analyze(mesh: &Mesh) -> Self {
        let vertex_count = mesh.vertex_count();
        let valid_faces: Vec<&Face> = mesh
            .faces()
            .iter()
            .filter(|f| f.indices().iter().all(|&i| (i as usize) < vertex_count))
            .collect();
        let out_of_range_index_count = mesh
            .faces()
            .iter()
            .flat_map(|f| f.indices().iter())
            .filter(|&&i| i as usize >= vertex_count)
            .count();

        let mut undirected: HashMap<(u32, u32), usize> = HashMap::new();
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for face in &valid_faces {
            for (a, b) in face.directed_edges() {
                *undirected.entry((a.min(b), a.max(b))).or_default() += 1;
                *directed.entry((a, b)).or_default() += 1;
            }
        }

        Self {
            vertex_count,
            face_count: mesh.face_count(),
            triangle_count: mesh.faces().iter().filter(|f| f.is_triangle()).count(),
            quad_count: mesh.faces().iter().filter(|f| f.is_quad()).count(),
            edge_count: undirected.len(),
            out_of_range_index_count,
            boundary_edge_count: undirected.values().filter(|&&n| n == 1).count(),
            non_manifold_edge_count: undirected.values().filter(|&&n| n > 2).count(),
            orientation_conflict_count: directed.values().filter(|&&n| n > 1).count(),
            degenerate_face_count: valid_faces
                .iter()
                .filter(|f| is_degenerate(mesh, f))
                .count(),
            duplicate_face_count: count_duplicates(&valid_faces),
            component_count: connected_components(mesh).len(),
            signed_volume: signed_volume(mesh, &valid_faces),
        }
    }

    /// Every face index names an existing vertex.
    #[must_use]
    pub fn indices_consistent(&self) -> bool {
        self.out_of_range_index_count == 0
    }

    /// No edge is left open.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.boundary_edge_count == 0 && self.indices_consistent()
    }

    /// Every edge bounds exactly two faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.is_watertight() && self.non_manifold_edge_count == 0
    }

    /// Neighbouring faces walk their shared edge in opposite directions.
    #[must_use]
    pub fn is_oriented(&self) -> bool {
        self.orientation_conflict_count == 0
    }

    /// Closed, manifold, consistently and outwardly wound.
    #[must_use]
    pub fn is_printable(&self) -> bool {
        self.is_manifold() && self.is_oriented() && self.signed_volume > 0.0
    }
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(
            f,
            "  Faces: {} ({} tris, {} quads)",
            self.face_count, self.triangle_count, self.quad_count
        )?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Components: {}", self.component_count)?;
        writeln!(f, "  Volume: {:.6}", self.signed_volume)?;
        let yes_no = |b: bool| if b { "Yes" } else { "No" };
        writeln!(f, "  Watertight: {}", yes_no(self.is_watertight()))?;
        writeln!(f, "  Manifold: {}", yes_no(self.is_manifold()))?;
        writeln!(f, "  Oriented: {}", yes_no(self.is_oriented()))?;
        for (label, count) in [
            ("Out-of-range indices", self.out_of_range_index_count),
            ("Boundary edges", self.boundary_edge_count),
            ("Non-manifold edges", self.non_manifold_edge_count),
            ("Orientation conflicts", self.orientation_conflict_count),
            ("Degenerate faces", self.degenerate_face_count),
            ("Duplicate faces", self.duplicate_face_count),
        ] {
            if count > 0 {
                writeln!(f, "  {label}: {count}")?;
            }
        }
        Ok(())
    }
}

fn is_degenerate(mesh: &Mesh, face: &Face) -> bool {
    let idx = face.indices();
    let distinct: HashSet<u32> = idx.iter().copied().collect();
    if distinct.len() < idx.len() {
        return true;
    }
    let v = mesh.vertices();
    let area: f64 = face
        .triangles()
        .map(|[a, b, c]| {
            let (a, b, c) = (v[a as usize], v[b as usize], v[c as usize]);
            (b - a).cross(&(c - a)).norm() * 0.5
        })
        .sum();
    area < DEGENERATE_AREA
}

fn count_duplicates(faces: &[&Face]) -> usize {
    let mut seen = HashSet::new();
    faces
        .iter()
        .filter(|f| {
            let mut key = f.indices().to_vec();
            key.sort_unstable();
            !seen.insert(key)
        })
        .count()
}

fn signed_volume(mesh: &Mesh, faces: &[&Face]) -> f64 {
    let v = mesh.vertices();
    faces
        .iter()
        .flat_map(|f| f.triangles())
        .map(|[a, b, c]| {
            let (a, b, c) = (v[a as usize].coords, v[b as usize].coords, v[c as usize].coords);
            a.dot(&b.cross(&c))
        })
        .sum::<f64>()
        / 6.0
}

/// Groups the vertices used by faces into connected pieces.
///
/// Each piece is a sorted list of vertex indices; pieces are ordered by
/// their smallest index. Vertices no face uses are left out.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn connected_components(mesh: &Mesh) -> Vec<Vec<u32>> {
    let n = mesh.vertex_count();
    let mut parent: Vec<usize> = (0..n).collect();
    let mut used = vec![false; n];

    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for face in mesh.faces() {
        let idx: Vec<usize> = face.indices().iter().map(|&i| i as usize).collect();
        if idx.iter().any(|&i| i >= n) {
            continue;
        }
        for &i in &idx {
            used[i] = true;
        }
        for pair in idx.windows(2) {
            let (ra, rb) = (root(&mut parent, pair[0]), root(&mut parent, pair[1]));
            if ra != rb {
                parent[ra.max(rb)] = ra.min(rb);
            }
        }
    }

    let mut groups: HashMap<usize, Vec<u32>> = HashMap::new();
    for i in (0..n).filter(|&i| used[i]) {
        let r = root(&mut parent, i);
        groups.entry(r).or_default().push(i as u32);
    }
    let mut pieces: Vec<Vec<u32>> = groups.into_values().collect();
    pieces.sort_by_key(|piece| piece[0]);
    pieces
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_tetra(offset: f64) -> (Vec<Point3>, Vec<Face>) {
        let base = 4 * u32::from(offset > 0.0);
        (
            vec![
                p(offset, 0.0, 0.0),
                p(offset + 1.0, 0.0, 0.0),
                p(offset, 1.0, 0.0),
                p(offset, 0.0, 1.0),
            ],
            vec![
                Face::Triangle([base, base + 2, base + 1]),
                Face::Triangle([base, base + 1, base + 3]),
                Face::Triangle([base + 1, base + 2, base + 3]),
                Face::Triangle([base, base + 3, base + 2]),
            ],
        )
    }

    #[test]
    fn closed_tetra_is_printable() {
        let (v, f) = unit_tetra(0.0);
        let report = MeshReport::analyze(&Mesh::from_parts(v, vec![], f).unwrap());
        assert!(report.is_printable(), "{report}");
        assert_eq!(report.edge_count, 6);
        assert_eq!(report.component_count, 1);
        assert_relative_eq!(report.signed_volume, 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn inside_out_tetra_has_negative_volume() {
        let (v, f) = unit_tetra(0.0);
        let flipped = f.into_iter().map(Face::flipped).collect();
        let report = MeshReport::analyze(&Mesh::from_parts(v, vec![], flipped).unwrap());
        assert!(report.is_manifold());
        assert!(report.is_oriented());
        assert!(report.signed_volume < 0.0);
        assert!(!report.is_printable());
    }

    #[test]
    fn open_surface_reports_boundary() {
        let (v, mut f) = unit_tetra(0.0);
        f.pop();
        let report = MeshReport::analyze(&Mesh::from_parts(v, vec![], f).unwrap());
        assert_eq!(report.boundary_edge_count, 3);
        assert!(!report.is_watertight());
    }

    #[test]
    fn one_flipped_face_conflicts() {
        let (v, mut f) = unit_tetra(0.0);
        f[0] = f[0].flipped();
        let report = MeshReport::analyze(&Mesh::from_parts(v, vec![], f).unwrap());
        assert!(report.is_manifold());
        assert_eq!(report.orientation_conflict_count, 3);
    }

    #[test]
    fn disjoint_pieces_are_separate_components() {
        let (mut v, mut f) = unit_tetra(0.0);
        let (v2, f2) = unit_tetra(5.0);
        v.extend(v2);
        f.extend(f2);
        let mesh = Mesh::from_parts(v, vec![], f).unwrap();
        let pieces = connected_components(&mesh);
        assert_eq!(pieces, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
        assert_relative_eq!(MeshReport::analyze(&mesh).signed_volume, 2.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_area_and_repeated_corner_faces_are_degenerate() {
        let mesh = Mesh::from_parts(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)],
            vec![],
            vec![Face::Triangle([0, 1, 2]), Face::Quad([0, 1, 1, 2])],
        )
        .unwrap();
        assert_eq!(MeshReport::analyze(&mesh).degenerate_face_count, 2);
    }

    #[test]
    fn duplicate_faces_counted_regardless_of_winding() {
        let (v, mut f) = unit_tetra(0.0);
        f.push(f[1].flipped());
        let report = MeshReport::analyze(&Mesh::from_parts(v, vec![], f).unwrap());
        assert_eq!(report.duplicate_face_count, 1);
        assert!(!report.is_manifold());
    }

    #[test]
    fn display_lists_issues_only_when_present() {
        let (v, f) = unit_tetra(0.0);
        let text = MeshReport::analyze(&Mesh::from_parts(v, vec![], f).unwrap()).to_string();
        assert!(text.contains("Manifold: Yes"));
        assert!(!text.contains("Boundary edges"));
    }
}
