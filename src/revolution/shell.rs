use tracing::{debug, warn};

use crate::composite::{HoleCut, MagnetPlinth, MagnetSpec};
use crate::domain::{sample, sample_all, SliceDomain};
use crate::error::{AssemblyError, DomainError, Result};
use crate::math::{Vector3, TOLERANCE};
use crate::mesh::{vertex_budget, Mesh, MeshBuilder};

use super::{
    check_segments, full_turn, push_circle, Cylinder, DEFAULT_CLEARANCE, DEFAULT_SEGMENTS,
};

/// Approximates a solid of revolution by nested cylindrical shells.
///
/// The interval is radius. Shell `i` is a closed ring from radius
/// `x_i + clearance` out to `x_{i+1}`, with its top at the outer function
/// and its bottom at the inner function, both taken at the slice midpoint.
/// The clearance lets each shell slide over the one inside it. A shell
/// starting on the axis has no hole and becomes a solid core.
pub struct ShellRevolution<R, S> {
    start: f64,
    end: f64,
    slices: usize,
    outer: R,
    inner: S,
    clearance: f64,
    segments: usize,
    magnet: Option<MagnetSpec>,
}

impl<R, S> ShellRevolution<R, S>
where
    R: Fn(f64) -> f64,
    S: Fn(f64) -> f64,
{
    /// Creates a new `ShellRevolution` over radii `[start, end]`.
    ///
    /// `outer` gives the height of each shell's top, `inner` the height of
    /// its bottom.
    #[must_use]
    pub fn new(start: f64, end: f64, slices: usize, outer: R, inner: S) -> Self {
        Self {
            start,
            end,
            slices,
            outer,
            inner,
            clearance: DEFAULT_CLEARANCE,
            segments: DEFAULT_SEGMENTS,
            magnet: None,
        }
    }

    #[must_use]
    pub fn clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }

    #[must_use]
    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Lifts the core shell's bottom by one and a half magnet depths to make
    /// room for a [`MagnetPlinth`] holding the magnet.
    #[must_use]
    pub fn magnet(mut self, magnet: MagnetSpec) -> Self {
        self.magnet = Some(magnet);
        self
    }

    /// Height the core's bottom is lifted by, once the magnet is known to
    /// fit under a core from `bottom` to `top` with outer radius `radius`.
    fn core_lift(&self, radius: f64, top: f64, bottom: f64) -> Result<f64> {
        let Some(magnet) = &self.magnet else {
            return Ok(0.0);
        };
        if self.start.abs() > TOLERANCE {
            return Err(AssemblyError::InvalidLayout(
                "shell magnet needs a core shell on the axis".into(),
            )
            .into());
        }
        let lift = 1.5 * magnet.depth;
        if magnet.radius >= radius || bottom + lift >= top {
            return Err(AssemblyError::InvalidLayout(format!(
                "magnet does not fit under a core of radius {radius} and height {}",
                top - bottom
            ))
            .into());
        }
        Ok(lift)
    }

    /// The plinth under a lifted core and the pocket to cut from it, or
    /// `None` without a magnet.
    ///
    /// The plinth has the core's outer radius and fills the lift exactly.
    /// The pocket is one magnet depth tall and centred in the plinth, so
    /// it stays closed.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidLayout`] if the stack has no core or
    /// the magnet does not fit under it, a `DomainError` for an invalid
    /// interval, or an `EvaluationError` for a non-finite core height.
    pub fn magnet_plinth(&self) -> Result<Option<MagnetPlinth>> {
        let Some(magnet) = &self.magnet else {
            return Ok(None);
        };
        let domain = SliceDomain::new(self.start, self.end, self.slices)?;
        let mid = domain.midpoint(0);
        let top = sample("outer", &self.outer, mid)?;
        let bottom = sample("inner", &self.inner, mid)?;
        let radius = domain.station(1);
        let lift = self.core_lift(radius, top, bottom)?;

        let mesh = Cylinder::new(radius, bottom, bottom + lift)
            .segments(self.segments)
            .execute()?;
        let cut = HoleCut {
            tool: magnet.tool(magnet.depth)?,
            position: Vector3::new(0.0, 0.0, bottom + lift / 2.0),
        };
        Ok(Some(MagnetPlinth { mesh, cut }))
    }

    /// Builds all shells into one mesh, innermost first.
    ///
    /// Each ring shell has four rings (top-inner, top-outer, bottom-inner,
    /// bottom-outer) and `4·m` quads. The core shell has single axis
    /// vertices in place of its inner rings, fans for rims and no inside
    /// wall. With a magnet set, the core's bottom is lifted by one and a
    /// half magnet depths.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for an invalid interval, a negative start
    /// radius, a clearance outside `[0, dx)` or too few segments, an
    /// `EvaluationError` for a non-finite height, or
    /// [`AssemblyError::InvalidLayout`] if a magnet does not fit.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Mesh> {
        let domain = SliceDomain::new(self.start, self.end, self.slices)?;
        if self.start < 0.0 {
            return Err(DomainError::NegativeRadius(self.start).into());
        }
        let step = domain.step();
        if !(self.clearance.is_finite() && self.clearance >= 0.0 && self.clearance < step) {
            return Err(DomainError::InvalidClearance {
                clearance: self.clearance,
                step,
            }
            .into());
        }
        check_segments(self.segments, 3)?;
        let m = self.segments;
        let vertex_total = vertex_budget(&[4, self.slices, m])?;
        debug!(
            shells = self.slices,
            clearance = self.clearance,
            segments = self.segments,
            "building shell stack"
        );

        let tops = sample_all("outer", &self.outer, domain.midpoints())?;
        let mut bottoms = sample_all("inner", &self.inner, domain.midpoints())?;
        bottoms[0] += self.core_lift(domain.station(1), tops[0], bottoms[0])?;

        let mut builder = MeshBuilder::with_capacity(vertex_total, vertex_total);
        let angles = full_turn(m);
        let segments = m as u32;

        for (i, (&top, &bottom)) in tops.iter().zip(&bottoms).enumerate() {
            if top <= bottom {
                warn!(shell = i, top, bottom, "shell top is not above its bottom");
            }
            let x = domain.station(i);
            let rho_in = if x.abs() <= TOLERANCE { 0.0 } else { x + self.clearance };
            let rho_out = domain.station(i + 1);

            let top_in = push_circle(&mut builder, rho_in, top, &angles);
            let top_out = push_circle(&mut builder, rho_out, top, &angles);
            let bottom_in = push_circle(&mut builder, rho_in, bottom, &angles);
            let bottom_out = push_circle(&mut builder, rho_out, bottom, &angles);

            builder.strip(top_out, top_in, segments);
            builder.strip(bottom_in, bottom_out, segments);
            builder.strip(bottom_out, top_out, segments);
            builder.strip(top_in, bottom_in, segments);
        }

        let mesh = builder.finish_with_face_edges();
        debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "shell stack built"
        );
        Ok(mesh)
    }
}
