use tracing::debug;

use crate::composite::{HoleCut, MagnetSpec};
use crate::domain::{sample_all, SliceDomain};
use crate::error::{AssemblyError, DomainError, Result};
use crate::math::{Vector3, TOLERANCE};
use crate::mesh::{vertex_budget, Mesh, MeshBuilder};

use super::{check_segments, full_turn, Cylinder, DEFAULT_SEGMENTS};

/// One puck of a disk stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    pub bottom: f64,
    pub top: f64,
    pub radius: f64,
}

impl Disk {
    #[must_use]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Approximates a solid of revolution by a stack of constant-radius disks.
///
/// The interval is height along z. Disk `i` spans one slice and takes the
/// radius function's value at the slice midpoint. Disks share no vertices;
/// each is its own closed cylinder.
pub struct DiskRevolution<F> {
    start: f64,
    end: f64,
    slices: usize,
    radius: F,
    segments: usize,
}

impl<F> DiskRevolution<F>
where
    F: Fn(f64) -> f64,
{
    /// Creates a new `DiskRevolution` over heights `[start, end]`.
    #[must_use]
    pub fn new(start: f64, end: f64, slices: usize, radius: F) -> Self {
        Self {
            start,
            end,
            slices,
            radius,
            segments: DEFAULT_SEGMENTS,
        }
    }

    #[must_use]
    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Height span and radius of every disk, bottom first.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for an invalid interval or a radius that is
    /// not positive, or an `EvaluationError` for a non-finite radius.
    pub fn disks(&self) -> Result<Vec<Disk>> {
        let domain = SliceDomain::new(self.start, self.end, self.slices)?;
        let radii = sample_all("radius", &self.radius, domain.midpoints())?;
        radii
            .into_iter()
            .enumerate()
            .map(|(i, radius)| {
                if radius <= TOLERANCE {
                    return Err(DomainError::NonPositiveSize {
                        what: "disk radius",
                        value: radius,
                    }
                    .into());
                }
                Ok(Disk {
                    bottom: domain.station(i),
                    top: domain.station(i + 1),
                    radius,
                })
            })
            .collect()
    }

    /// Builds all disks into one mesh with `n` separate components.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::disks`] does, or with `TooFewSegments` or
    /// `TooManyVertices` before any radius is sampled.
    pub fn execute(&self) -> Result<Mesh> {
        check_segments(self.segments, 3)?;
        let m = self.segments;
        let vertex_total = vertex_budget(&[2, self.slices, m])?;
        let disks = self.disks()?;
        debug!(disks = disks.len(), segments = m, "building disk stack");

        let mut builder = MeshBuilder::with_capacity(vertex_total, vertex_total + m);
        let angles = full_turn(m);
        for disk in &disks {
            Cylinder::new(disk.radius, disk.bottom, disk.top)
                .segments(m)
                .emit(&mut builder, &angles);
        }

        let mesh = builder.finish_with_face_edges();
        debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "disk stack built"
        );
        Ok(mesh)
    }

    /// One magnet pocket per disk, sunk into the disk above its bottom face.
    ///
    /// The pocket is half the magnet depth tall and centred half a depth
    /// above the bottom face, so it stays closed inside the disk.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidLayout`] when a pocket does not fit
    /// inside its disk, or fails as [`Self::disks`] does.
    pub fn magnet_pockets(&self, magnet: &MagnetSpec) -> Result<Vec<HoleCut>> {
        let disks = self.disks()?;
        let height = magnet.depth / 2.0;
        let tool = magnet.tool(height)?;
        disks
            .iter()
            .enumerate()
            .map(|(i, disk)| {
                let center = disk.bottom + magnet.depth / 2.0;
                if magnet.radius >= disk.radius || center + height / 2.0 >= disk.top {
                    return Err(AssemblyError::InvalidLayout(format!(
                        "magnet pocket does not fit in disk {i}"
                    ))
                    .into());
                }
                Ok(HoleCut {
                    tool: tool.clone(),
                    position: Vector3::new(0.0, 0.0, center),
                })
            })
            .collect()
    }
}
