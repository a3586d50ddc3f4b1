use crate::error::{DomainError, Result};
use crate::math::TOLERANCE;
use crate::mesh::{vertex_budget, Mesh, MeshBuilder};

use super::{check_segments, full_turn, push_circle, DEFAULT_SEGMENTS};

/// Creates a closed cylinder around the z axis between two heights.
///
/// Used for disks, poles and magnet pockets. With `open_bottom` the bottom
/// cap is left out, giving a cup that the host can sink into a surface.
pub struct Cylinder {
    radius: f64,
    bottom: f64,
    top: f64,
    segments: usize,
    open_bottom: bool,
}

impl Cylinder {
    /// Creates a new `Cylinder` with [`DEFAULT_SEGMENTS`] sides.
    #[must_use]
    pub fn new(radius: f64, bottom: f64, top: f64) -> Self {
        Self {
            radius,
            bottom,
            top,
            segments: DEFAULT_SEGMENTS,
            open_bottom: false,
        }
    }

    #[must_use]
    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    #[must_use]
    pub fn open_bottom(mut self, open: bool) -> Self {
        self.open_bottom = open;
        self
    }

    /// Builds the mesh: `2·m` vertices, `m` side quads and `m − 2`
    /// triangles per cap.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the radius is not positive, the top is not
    /// above the bottom, or fewer than three segments are asked for.
    pub fn execute(&self) -> Result<Mesh> {
        if !(self.radius.is_finite() && self.radius > TOLERANCE) {
            return Err(DomainError::NonPositiveSize {
                what: "cylinder radius",
                value: self.radius,
            }
            .into());
        }
        if !self.bottom.is_finite() || !self.top.is_finite() {
            return Err(DomainError::NonFiniteBound(if self.bottom.is_finite() {
                self.top
            } else {
                self.bottom
            })
            .into());
        }
        if self.bottom >= self.top {
            return Err(DomainError::EmptyInterval {
                start: self.bottom,
                end: self.top,
            }
            .into());
        }
        check_segments(self.segments, 3)?;

        let m = self.segments;
        let vertex_total = vertex_budget(&[2, m])?;
        let mut builder = MeshBuilder::with_capacity(vertex_total, 3 * m);
        let angles = full_turn(m);
        self.emit(&mut builder, &angles);
        Ok(builder.finish_with_face_edges())
    }

    /// Adds this cylinder's rings and faces to `builder`.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn emit(&self, builder: &mut MeshBuilder, angles: &[f64]) {
        let bottom = push_circle(builder, self.radius, self.bottom, angles);
        let top = push_circle(builder, self.radius, self.top, angles);
        builder.strip(bottom, top, angles.len() as u32);
        if !self.open_bottom {
            builder.fan(bottom, true);
        }
        builder.fan(top, false);
    }
}
