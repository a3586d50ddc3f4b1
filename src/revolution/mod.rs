//! Solids of revolution about the z axis.
//!
//! A ring of radius `ρ` at height `z` is the set of points
//! `(ρ cos θ_j, ρ sin θ_j, z)` for the angular samples `θ_j`, counted
//! counter-clockwise when seen from above. A ring whose radius is within
//! [`TOLERANCE`] of zero is a single vertex on the axis.

mod cylinder;
mod disk;
mod shell;
mod smooth;

pub use cylinder::Cylinder;
pub use disk::{Disk, DiskRevolution};
pub use shell::ShellRevolution;
pub use smooth::SmoothRevolution;

use std::f64::consts::{PI, TAU};

use crate::error::{DomainError, Result};
use crate::math::{polar, Point3, TOLERANCE};
use crate::mesh::{MeshBuilder, Ring};

/// Sides of every circle unless overridden.
pub const DEFAULT_SEGMENTS: usize = 100;

/// Radial gap between nested shells (0.5 mm at 1 unit = 15 mm).
pub const DEFAULT_CLEARANCE: f64 = 1.0 / 30.0;

/// Angular samples across a half revolution, both cut planes included.
pub const DEFAULT_SPLIT_SAMPLES: usize = 50;

/// Parameters shared by the revolution builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevolutionParams {
    /// Angular samples of a full revolution.
    pub segments: usize,
    /// Gap left between a shell and the one it nests around.
    pub clearance: f64,
    /// Angular samples of a half revolution.
    pub split_samples: usize,
}

impl Default for RevolutionParams {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            clearance: DEFAULT_CLEARANCE,
            split_samples: DEFAULT_SPLIT_SAMPLES,
        }
    }
}

pub(crate) fn check_segments(got: usize, min: usize) -> Result<()> {
    if got < min {
        return Err(DomainError::TooFewSegments { min, got }.into());
    }
    Ok(())
}

/// `m` angles evenly spaced around the circle, `0` included, `2π` not.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn full_turn(m: usize) -> Vec<f64> {
    (0..m).map(|j| TAU * j as f64 / m as f64).collect()
}

/// `m` angles from `0` to `π`, both ends included.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn half_turn(m: usize) -> Vec<f64> {
    let last = (m - 1) as f64;
    (0..m).map(|j| PI * j as f64 / last).collect()
}

/// Pushes a ring of radius `radius` at height `z`, or one axis vertex when
/// the radius is zero.
pub(crate) fn push_circle(builder: &mut MeshBuilder, radius: f64, z: f64, angles: &[f64]) -> Ring {
    if radius.abs() <= TOLERANCE {
        Ring::Point(builder.push_vertex(Point3::new(0.0, 0.0, z)))
    } else {
        builder.push_ring(angles.iter().map(|&theta| polar(radius, theta, z)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_params() {
        let params = RevolutionParams::default();
        assert_eq!(params.segments, 100);
        assert_eq!(params.split_samples, 50);
        assert_relative_eq!(params.clearance * 15.0, 0.5);
    }

    #[test]
    fn full_turn_excludes_closing_angle() {
        let angles = full_turn(4);
        assert_eq!(angles.len(), 4);
        assert_relative_eq!(angles[1], PI / 2.0);
        assert_relative_eq!(angles[3], 1.5 * PI);
    }

    #[test]
    fn half_turn_includes_both_cut_planes() {
        let angles = half_turn(5);
        assert_eq!(angles[0], 0.0);
        assert_relative_eq!(angles[4], PI);
        assert_relative_eq!(angles[2], PI / 2.0);
    }

    #[test]
    fn zero_radius_collapses_to_axis_vertex() {
        let mut builder = MeshBuilder::default();
        let angles = full_turn(8);
        let point = push_circle(&mut builder, 0.0, 2.0, &angles);
        let ring = push_circle(&mut builder, 1.0, 2.0, &angles);
        assert_eq!(point, Ring::Point(0));
        assert_eq!(ring, Ring::Loop { start: 1, len: 8 });
        let mesh = builder.finish();
        assert_eq!(mesh.vertices()[0], Point3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(mesh.vertices()[3].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn too_few_segments() {
        assert!(check_segments(3, 3).is_ok());
        assert!(check_segments(2, 3).is_err());
    }
}
