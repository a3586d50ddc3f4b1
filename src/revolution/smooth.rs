use tracing::{debug, warn};

use crate::composite::{MagnetPocket, MagnetSpec};
use crate::domain::{sample, sample_all, SliceDomain};
use crate::error::{AssemblyError, DomainError, Result};
use crate::math::{Vector3, TOLERANCE};
use crate::mesh::{vertex_budget, Mesh, MeshBuilder, Ring};

use super::{
    check_segments, full_turn, half_turn, push_circle, DEFAULT_SEGMENTS, DEFAULT_SPLIT_SAMPLES,
};

/// Revolves the region between two height functions about the z axis.
///
/// The interval is radius. The top surface is `z = outer(ρ)` and the bottom
/// surface `z = inner(ρ)`, both sampled at every station. A full revolution
/// wraps its angular samples around; a split revolution covers half a turn
/// and closes each cut plane with one planar face per radial slice, so the
/// half can be printed flat on its cut.
///
/// The solid is walled at both radial ends unless the two surfaces meet
/// there, in which case their rings are shared.
pub struct SmoothRevolution<R, S> {
    start: f64,
    end: f64,
    slices: usize,
    outer: R,
    inner: S,
    split: bool,
    segments: usize,
    split_samples: usize,
}

impl<R, S> SmoothRevolution<R, S>
where
    R: Fn(f64) -> f64,
    S: Fn(f64) -> f64,
{
    /// Creates a new full `SmoothRevolution` over radii `[start, end]`.
    #[must_use]
    pub fn new(start: f64, end: f64, slices: usize, outer: R, inner: S) -> Self {
        Self {
            start,
            end,
            slices,
            outer,
            inner,
            split: false,
            segments: DEFAULT_SEGMENTS,
            split_samples: DEFAULT_SPLIT_SAMPLES,
        }
    }

    /// Builds half a revolution instead of a full one.
    #[must_use]
    pub fn split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    /// Angular samples of a full revolution.
    #[must_use]
    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Angular samples of a split revolution, both cut planes included.
    #[must_use]
    pub fn split_samples(mut self, samples: usize) -> Self {
        self.split_samples = samples;
        self
    }

    fn angles(&self) -> Result<Vec<f64>> {
        if self.split {
            check_segments(self.split_samples, 3)?;
            Ok(half_turn(self.split_samples))
        } else {
            check_segments(self.segments, 3)?;
            Ok(full_turn(self.segments))
        }
    }

    /// Builds the mesh.
    ///
    /// Top rings come first, one per station from the inner radius out,
    /// then the bottom rings. A ring on the axis is a single vertex.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for an invalid interval, a negative start
    /// radius or too few angular samples, or an `EvaluationError` for a
    /// non-finite height at any station.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Mesh> {
        let domain = SliceDomain::new(self.start, self.end, self.slices)?;
        if self.start < 0.0 {
            return Err(DomainError::NegativeRadius(self.start).into());
        }
        let angles = self.angles()?;
        let n = self.slices;
        let m = angles.len();
        let vertex_total = vertex_budget(&[2, n + 1, m])?;
        let tops = sample_all("outer", &self.outer, domain.stations())?;
        let bottoms = sample_all("inner", &self.inner, domain.stations())?;
        debug!(
            slices = self.slices,
            samples = angles.len(),
            split = self.split,
            "building smooth revolution"
        );
        if tops.iter().zip(&bottoms).any(|(t, b)| t + TOLERANCE < *b) {
            warn!("outer surface dips below inner surface");
        }

        let mut builder = MeshBuilder::with_capacity(vertex_total, 2 * n * m + 2 * n + 2 * m);

        let top: Vec<Ring> = domain
            .stations()
            .zip(&tops)
            .map(|(rho, &z)| push_circle(&mut builder, rho, z, &angles))
            .collect();
        let last = n;
        let bottom: Vec<Ring> = domain
            .stations()
            .zip(&bottoms)
            .enumerate()
            .map(|(i, (rho, &z))| {
                let at_end = i == 0 || i == last;
                if at_end && (tops[i] - z).abs() <= TOLERANCE {
                    top[i]
                } else {
                    push_circle(&mut builder, rho, z, &angles)
                }
            })
            .collect();

        let segments = (if self.split { m - 1 } else { m }) as u32;
        for i in 0..n {
            builder.strip(top[i + 1], top[i], segments);
            builder.strip(bottom[i], bottom[i + 1], segments);
        }
        builder.strip(bottom[n], top[n], segments);
        builder.strip(top[0], bottom[0], segments);

        if self.split {
            let l = segments;
            for i in 0..n {
                builder.polygon([
                    top[i + 1].at(0),
                    top[i].at(0),
                    bottom[i].at(0),
                    bottom[i + 1].at(0),
                ]);
                builder.polygon([
                    top[i].at(l),
                    top[i + 1].at(l),
                    bottom[i + 1].at(l),
                    bottom[i].at(l),
                ]);
            }
        }

        let mesh = builder.finish_with_face_edges();
        debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "smooth revolution built"
        );
        Ok(mesh)
    }

    /// Magnet pocket on the axis, opening onto the bottom surface.
    ///
    /// Returns the cut and an open-bottomed liner that fills the pocket's
    /// walls once the host has subtracted it.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::SplitMagnetUnsupported`] for a split
    /// revolution, [`AssemblyError::InvalidLayout`] when the solid does not
    /// reach the axis or is too thin for the magnet, or an
    /// `EvaluationError` for a non-finite height on the axis.
    pub fn magnet_pocket(&self, magnet: &MagnetSpec) -> Result<MagnetPocket> {
        if self.split {
            return Err(AssemblyError::SplitMagnetUnsupported.into());
        }
        if self.start > TOLERANCE {
            return Err(AssemblyError::InvalidLayout(
                "magnet pocket needs a solid on the axis".into(),
            )
            .into());
        }
        let floor = sample("inner", &self.inner, self.start)?;
        let roof = sample("outer", &self.outer, self.start)?;
        if floor + magnet.depth >= roof {
            return Err(AssemblyError::InvalidLayout(format!(
                "magnet depth {} exceeds solid height {}",
                magnet.depth,
                roof - floor
            ))
            .into());
        }
        MagnetPocket::new(magnet, Vector3::new(0.0, 0.0, floor + magnet.depth / 2.0))
    }
}
