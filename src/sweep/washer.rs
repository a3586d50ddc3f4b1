use tracing::{debug, warn};

use crate::domain::{sample_all, SliceDomain};
use crate::error::Result;
use crate::mesh::{vertex_budget, Mesh, MeshBuilder};
use crate::profile::Profile;

use super::{ring_points, RingScale, SliceCursor};

const OUTER_LEFT: u32 = 0;
const INNER_LEFT: u32 = 1;
const OUTER_RIGHT: u32 = 2;
const INNER_RIGHT: u32 = 3;

/// Sweeps a hollow cross-section: the profile scaled by an outer and an
/// inner radius function, both taken at each slice midpoint.
///
/// Every slice is an independent closed washer with its own four rings.
/// There are no solid end caps; each slice end is an annulus between the
/// outer and inner copies of the profile.
pub struct WasherSweep<'a, R, S> {
    start: f64,
    end: f64,
    slices: usize,
    outer: R,
    inner: S,
    profile: &'a Profile,
}

impl<'a, R, S> WasherSweep<'a, R, S>
where
    R: Fn(f64) -> f64,
    S: Fn(f64) -> f64,
{
    /// Creates a new `WasherSweep` over `[start, end]`.
    #[must_use]
    pub fn new(
        start: f64,
        end: f64,
        slices: usize,
        outer: R,
        inner: S,
        profile: &'a Profile,
    ) -> Self {
        Self {
            start,
            end,
            slices,
            outer,
            inner,
            profile,
        }
    }

    /// Builds the mesh: `4·n·k` vertices and `4·n·k` quads.
    ///
    /// An inner radius at or above the outer radius, or not above zero, is
    /// still built but logged as a warning, since the washer then turns
    /// inside out or through the axis.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for an invalid interval or slice count, or an
    /// `EvaluationError` if either radius function is non-finite at a
    /// slice midpoint.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Mesh> {
        let domain = SliceDomain::new(self.start, self.end, self.slices)?;
        let k = self.profile.len();
        let vertex_total = vertex_budget(&[4, self.slices, k])?;
        debug!(slices = self.slices, profile_points = k, "building washer sweep");

        let outer = sample_all("outer", &self.outer, domain.midpoints())?;
        let inner = sample_all("inner", &self.inner, domain.midpoints())?;
        for (i, (&r_out, &r_in)) in outer.iter().zip(&inner).enumerate() {
            if r_in >= r_out || r_in <= 0.0 {
                warn!(slice = i, outer = r_out, inner = r_in, "washer slice has no proper hole");
            }
        }

        let mut builder = MeshBuilder::with_capacity(vertex_total, vertex_total)
            .reversed(!self.profile.is_counter_clockwise());
        let ring_len = k as u32;
        let mut cursor = SliceCursor::new(ring_len, 4);

        for (i, (&r_out, &r_in)) in outer.iter().zip(&inner).enumerate() {
            debug_assert_eq!(builder.vertex_count(), cursor.current_start());
            let (left, right) = (domain.station(i), domain.station(i + 1));
            let (o, s) = (RingScale::uniform(r_out), RingScale::uniform(r_in));
            builder.push_ring(ring_points(self.profile, left, o));
            builder.push_ring(ring_points(self.profile, left, s));
            builder.push_ring(ring_points(self.profile, right, o));
            builder.push_ring(ring_points(self.profile, right, s));

            let ol = cursor.ring(OUTER_LEFT);
            let il = cursor.ring(INNER_LEFT);
            let or = cursor.ring(OUTER_RIGHT);
            let ir = cursor.ring(INNER_RIGHT);

            for ring in [ol, il, or, ir] {
                builder.ring_edges(ring);
            }
            builder.rung_edges(ol, or, ring_len);
            builder.rung_edges(il, ir, ring_len);
            builder.rung_edges(ol, il, ring_len);
            builder.rung_edges(or, ir, ring_len);

            builder.strip(ol, or, ring_len);
            builder.strip(ir, il, ring_len);
            builder.strip(il, ol, ring_len);
            builder.strip(or, ir, ring_len);

            cursor.advance();
        }

        let mesh = builder.finish();
        debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "washer sweep built"
        );
        Ok(mesh)
    }
}
