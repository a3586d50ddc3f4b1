use tracing::debug;

use crate::domain::{sample_all, SliceDomain};
use crate::error::Result;
use crate::mesh::Mesh;
use crate::profile::Profile;

use super::{build_solid_sweep, solid_sweep_budget, RingScale};

/// Sweeps a profile with one constant scale per slice, like a Riemann sum.
///
/// Both scale functions are evaluated at each slice midpoint, so every
/// slice is a flat-sided prism; neighbouring prisms are joined by riser
/// faces where their scales differ.
pub struct FacetedSweep<'a, U, V> {
    start: f64,
    end: f64,
    slices: usize,
    scale_u: U,
    scale_v: V,
    profile: &'a Profile,
}

impl<'a, U, V> FacetedSweep<'a, U, V>
where
    U: Fn(f64) -> f64,
    V: Fn(f64) -> f64,
{
    /// Creates a new `FacetedSweep` over `[start, end]`.
    ///
    /// `scale_u` scales the profile's `u` coordinate (mapped to y) and
    /// `scale_v` its `v` coordinate (mapped to z).
    #[must_use]
    pub fn new(
        start: f64,
        end: f64,
        slices: usize,
        scale_u: U,
        scale_v: V,
        profile: &'a Profile,
    ) -> Self {
        Self {
            start,
            end,
            slices,
            scale_u,
            scale_v,
            profile,
        }
    }

    /// Builds the mesh.
    ///
    /// Produces `2·n·k` vertices for `n` slices and a `k`-point profile:
    /// `n·k` lateral quads, `k` riser quads between each pair of
    /// neighbouring slices whose scales differ, and `k−2` cap triangles at
    /// each end. Neighbours with equal scales share their seam ring.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for an empty interval, zero slices or more
    /// vertices than `u32` indices can address (all before any scale
    /// function is called), or an `EvaluationError` if a scale function
    /// yields a non-finite value at a slice midpoint.
    pub fn execute(&self) -> Result<Mesh> {
        let domain = SliceDomain::new(self.start, self.end, self.slices)?;
        let vertex_total = solid_sweep_budget(&domain, self.profile)?;
        debug!(
            slices = self.slices,
            profile_points = self.profile.len(),
            "building faceted sweep"
        );

        let us = sample_all("scale_u", &self.scale_u, domain.midpoints())?;
        let vs = sample_all("scale_v", &self.scale_v, domain.midpoints())?;
        let scales: Vec<(RingScale, RingScale)> = us
            .into_iter()
            .zip(vs)
            .map(|(u, v)| {
                let s = RingScale { u, v };
                (s, s)
            })
            .collect();

        Ok(build_solid_sweep(&domain, self.profile, &scales, vertex_total))
    }
}
