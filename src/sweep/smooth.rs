use tracing::debug;

use crate::domain::{sample_all, SliceDomain};
use crate::error::Result;
use crate::mesh::Mesh;
use crate::profile::Profile;

use super::{build_solid_sweep, solid_sweep_budget, RingScale};

/// Sweeps a profile whose scale follows the functions continuously.
///
/// Each slice's left ring is scaled by the functions at its left station
/// and its right ring at its right station, so neighbouring slices meet
/// with identical vertices and the surface is a piecewise-linear
/// approximation that improves with the slice count.
pub struct SmoothSweep<'a, U, V> {
    start: f64,
    end: f64,
    slices: usize,
    scale_u: U,
    scale_v: V,
    profile: &'a Profile,
}

impl<'a, U, V> SmoothSweep<'a, U, V>
where
    U: Fn(f64) -> f64,
    V: Fn(f64) -> f64,
{
    /// Creates a new `SmoothSweep` over `[start, end]`.
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
    /// The vertex layout matches [`super::FacetedSweep`]. Every slice after
    /// the first builds its lateral quads from the previous slice's right
    /// ring, so there are no riser faces and `n·k + 2·(k−2)` faces in all.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for an invalid interval, slice count or
    /// vertex total (before any scale function is called), or an
    /// `EvaluationError` if a scale function is non-finite at any station.
    pub fn execute(&self) -> Result<Mesh> {
        let domain = SliceDomain::new(self.start, self.end, self.slices)?;
        let vertex_total = solid_sweep_budget(&domain, self.profile)?;
        debug!(
            slices = self.slices,
            profile_points = self.profile.len(),
            "building smooth sweep"
        );

        let us = sample_all("scale_u", &self.scale_u, domain.stations())?;
        let vs = sample_all("scale_v", &self.scale_v, domain.stations())?;
        let at = |i: usize| RingScale { u: us[i], v: vs[i] };
        let scales: Vec<(RingScale, RingScale)> =
            (0..domain.slices()).map(|i| (at(i), at(i + 1))).collect();

        Ok(build_solid_sweep(&domain, self.profile, &scales, vertex_total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{DomainError, EvaluationError, SolidusError};
    use crate::mesh::MeshReport;
    use crate::sweep::FacetedSweep;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    fn half_disk(x: f64) -> f64 {
        (1.0 - x * x).sqrt()
    }

    #[test]
    fn same_vertex_count_as_faceted() {
        let profile = Profile::square_on_base();
        let smooth = SmoothSweep::new(-0.9, 0.9, 20, half_disk, half_disk, &profile)
            .execute()
            .unwrap();
        let faceted = FacetedSweep::new(-0.9, 0.9, 20, half_disk, half_disk, &profile)
            .execute()
            .unwrap();
        assert_eq!(smooth.vertex_count(), faceted.vertex_count());
        let k = profile.len();
        assert_eq!(smooth.face_count(), 20 * k + 2 * (k - 2));
    }

    #[test]
    fn consecutive_slices_meet_exactly() {
        let profile = Profile::equilateral_triangle();
        let (n, k) = (12, profile.len());
        let mesh = SmoothSweep::new(0.1, 2.0, n, f64::sqrt, |x| x * x, &profile)
            .execute()
            .unwrap();
        let v = mesh.vertices();
        for i in 0..n - 1 {
            let right = (2 * i + 1) * k;
            let next_left = (2 * i + 2) * k;
            assert_eq!(&v[right..right + k], &v[next_left..next_left + k], "slice {i}");
        }
    }

    #[test]
    fn ends_follow_function_values() {
        let profile = Profile::square_centered();
        let mesh = SmoothSweep::new(0.0, 1.0, 4, |x| 1.0 + x, |_| 1.0, &profile)
            .execute()
            .unwrap();
        let v = mesh.vertices();
        assert_relative_eq!(v[0].y, -1.0);
        let last = v.len() - 4;
        assert_relative_eq!(v[last].x, 1.0);
        assert_relative_eq!(v[last].y, -2.0);
    }

    #[test]
    fn manifold_without_degenerate_faces() {
        let profile = Profile::circle(16, 0.0).unwrap();
        let n = 10;
        let mesh = SmoothSweep::new(-0.95, 0.95, n, half_disk, half_disk, &profile)
            .execute()
            .unwrap();
        let report = MeshReport::analyze(&mesh);
        assert!(report.is_printable(), "{report}");
        assert_eq!(report.degenerate_face_count, 0);
        assert_eq!(report.component_count, 1);
    }

    #[test]
    fn interior_slices_have_no_degenerate_faces() {
        // zero scale at x = 0 collapses only the first cap
        let profile = Profile::square_on_base();
        let k = profile.len();
        let mesh = SmoothSweep::new(0.0, 2.0, 10, f64::sqrt, f64::sqrt, &profile)
            .execute()
            .unwrap();
        let report = MeshReport::analyze(&mesh);
        assert_eq!(report.face_count, 10 * k + 2 * (k - 2));
        assert_eq!(report.degenerate_face_count, k - 2);
        assert!(report.is_manifold(), "{report}");
    }

    #[test]
    fn index_consistent_across_sizes() {
        for k in [3, 4, 7, 16] {
            let profile = Profile::circle(k, 0.2).unwrap();
            for n in [1, 2, 3, 8, 25] {
                let mesh = SmoothSweep::new(0.0, 2.0, n, |x| 1.0 + x, |x| 2.0 - 0.5 * x, &profile)
                    .execute()
                    .unwrap();
                assert_eq!(mesh.first_dangling_index(), None, "n = {n}, k = {k}");
                let report = MeshReport::analyze(&mesh);
                assert!(report.is_manifold(), "n = {n}, k = {k}: {report}");
                assert_eq!(report.degenerate_face_count, 0, "n = {n}, k = {k}");
            }
        }
    }

    #[test]
    fn oversized_request_fails_before_sampling() {
        let calls = Cell::new(0usize);
        let scale = |_: f64| {
            calls.set(calls.get() + 1);
            1.0
        };
        let profile = Profile::circle(1000, 0.0).unwrap();
        let err = SmoothSweep::new(0.0, 1.0, 5_000_000, scale, scale, &profile)
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            SolidusError::Domain(DomainError::TooManyVertices(_))
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn volume_approaches_sphere() {
        let profile = Profile::circle(128, 0.0).unwrap();
        let mesh = SmoothSweep::new(-1.0, 1.0, 200, half_disk, half_disk, &profile)
            .execute()
            .unwrap();
        let volume = MeshReport::analyze(&mesh).signed_volume;
        let sphere = 4.0 / 3.0 * std::f64::consts::PI;
        assert_relative_eq!(volume, sphere, max_relative = 1e-2);
    }

    #[test]
    fn endpoint_outside_function_domain_fails() {
        // midpoints would be fine, the right end station is not
        let profile = Profile::square_centered();
        let err = SmoothSweep::new(0.0, 1.5, 3, half_disk, |_| 1.0, &profile)
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            SolidusError::Evaluation(EvaluationError::NonFinite { .. })
        ));
    }
}
