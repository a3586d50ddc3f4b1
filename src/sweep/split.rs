use tracing::debug;

use crate::domain::SliceDomain;
use crate::error::{DomainError, Result};
use crate::mesh::Mesh;
use crate::profile::Profile;

use super::FacetedSweep;

/// A faceted sweep cut at interior points into separate pieces.
///
/// Each piece covers one sub-interval between consecutive cuts and is
/// sliced with the full slice count, so short pieces get finer slices.
/// Printing the pieces separately lets a solid that would need support
/// be laid flat on its cut faces.
pub struct SplitSweep<'a, U, V> {
    start: f64,
    end: f64,
    slices: usize,
    cuts: Vec<f64>,
    scale_u: U,
    scale_v: V,
    profile: &'a Profile,
}

impl<'a, U, V> SplitSweep<'a, U, V>
where
    U: Fn(f64) -> f64,
    V: Fn(f64) -> f64,
{
    /// Creates a new `SplitSweep` over `[start, end]` cut at `cuts`.
    #[must_use]
    pub fn new(
        start: f64,
        end: f64,
        slices: usize,
        cuts: Vec<f64>,
        scale_u: U,
        scale_v: V,
        profile: &'a Profile,
    ) -> Self {
        Self {
            start,
            end,
            slices,
            cuts,
            scale_u,
            scale_v,
            profile,
        }
    }

    /// Interval bounds of every piece, in order.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the interval is invalid, or
    /// [`DomainError::InvalidSplit`] for a cut that is not finite, not
    /// strictly inside the interval, or not above the previous cut.
    pub fn pieces(&self) -> Result<Vec<(f64, f64)>> {
        let domain = SliceDomain::new(self.start, self.end, self.slices)?;
        let mut bounds = Vec::with_capacity(self.cuts.len() + 2);
        bounds.push(domain.start());
        for &cut in &self.cuts {
            let previous = bounds[bounds.len() - 1];
            if !cut.is_finite() || cut <= previous || cut >= domain.end() {
                return Err(DomainError::InvalidSplit(cut).into());
            }
            bounds.push(cut);
        }
        bounds.push(domain.end());
        Ok(bounds.windows(2).map(|w| (w[0], w[1])).collect())
    }

    /// Builds one faceted mesh per piece.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::pieces`] does, or as [`FacetedSweep::execute`] does
    /// for any piece. No meshes are returned if any piece fails.
    pub fn execute(&self) -> Result<Vec<Mesh>> {
        let pieces = self.pieces()?;
        debug!(pieces = pieces.len(), slices = self.slices, "building split sweep");
        pieces
            .into_iter()
            .map(|(a, b)| {
                FacetedSweep::new(a, b, self.slices, &self.scale_u, &self.scale_v, self.profile)
                    .execute()
            })
            .collect()
    }
}
