//! Solids swept along the x axis with a scaled cross-section.
//!
//! A profile point `(u, v)` placed at station `x` with scales `(su, sv)`
//! becomes the vertex `(x, su * u, sv * v)`. Every slice emits its own
//! "left" and "right" copies of the profile; [`SliceCursor`] tracks where
//! each copy starts in the vertex list so faces can be wired across slice
//! boundaries.

mod faceted;
mod smooth;
mod split;
mod washer;

pub use faceted::FacetedSweep;
pub use smooth::SmoothSweep;
pub use split::SplitSweep;
pub use washer::WasherSweep;

use tracing::debug;

use crate::domain::SliceDomain;
use crate::error::Result;
use crate::math::Point3;
use crate::mesh::{vertex_budget, Mesh, MeshBuilder, Ring};
use crate::profile::Profile;

/// Vertex-block bookkeeping for one sweep pass.
///
/// Each slice owns a contiguous block of `rings_per_slice` rings of
/// `ring_len` vertices. The cursor holds the start of the block being
/// emitted and of the block before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceCursor {
    ring_len: u32,
    rings_per_slice: u32,
    current_start: u32,
    previous_start: Option<u32>,
}

impl SliceCursor {
    /// A cursor positioned at the first slice, vertex 0.
    #[must_use]
    pub fn new(ring_len: u32, rings_per_slice: u32) -> Self {
        Self {
            ring_len,
            rings_per_slice,
            current_start: 0,
            previous_start: None,
        }
    }

    /// First vertex index of the current slice.
    #[must_use]
    pub fn current_start(&self) -> u32 {
        self.current_start
    }

    /// First vertex index of the previous slice; `None` on the first slice.
    #[must_use]
    pub fn previous_start(&self) -> Option<u32> {
        self.previous_start
    }

    /// Number of vertices in one slice block.
    #[must_use]
    pub fn block_len(&self) -> u32 {
        self.ring_len * self.rings_per_slice
    }

    /// First vertex index of ring `r` in the current slice.
    #[must_use]
    pub fn ring_start(&self, r: u32) -> u32 {
        debug_assert!(r < self.rings_per_slice);
        self.current_start + r * self.ring_len
    }

    /// First vertex index of ring `r` in the previous slice.
    #[must_use]
    pub fn previous_ring_start(&self, r: u32) -> Option<u32> {
        debug_assert!(r < self.rings_per_slice);
        self.previous_start.map(|start| start + r * self.ring_len)
    }

    /// Moves to the next slice.
    pub fn advance(&mut self) {
        self.previous_start = Some(self.current_start);
        self.current_start += self.block_len();
    }

    pub(crate) fn ring(&self, r: u32) -> Ring {
        Ring::Loop {
            start: self.ring_start(r),
            len: self.ring_len,
        }
    }

    pub(crate) fn previous_ring(&self, r: u32) -> Option<Ring> {
        self.previous_ring_start(r).map(|start| Ring::Loop {
            start,
            len: self.ring_len,
        })
    }
}

/// Scale applied to the `u` and `v` profile coordinates of one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RingScale {
    pub(crate) u: f64,
    pub(crate) v: f64,
}

impl RingScale {
    pub(crate) fn uniform(s: f64) -> Self {
        Self { u: s, v: s }
    }
}

/// The profile placed at station `x` and scaled.
pub(crate) fn ring_points(
    profile: &Profile,
    x: f64,
    scale: RingScale,
) -> impl Iterator<Item = Point3> + '_ {
    profile
        .points()
        .iter()
        .map(move |p| Point3::new(x, scale.u * p.x, scale.v * p.y))
}

/// Vertices needed by a two-ring-per-slice sweep, checked before any
/// scale function is sampled.
pub(crate) fn solid_sweep_budget(domain: &SliceDomain, profile: &Profile) -> Result<usize> {
    vertex_budget(&[2, domain.slices(), profile.len()])
}

/// Builds a solid sweep from per-slice `(left, right)` ring scales.
///
/// Slice `i` spans stations `i` and `i + 1` of `domain`. Where the previous
/// right ring and the current left ring have different scales they are
/// joined by a band of riser quads; where the scales are equal the slice's
/// lateral quads start from the previous right ring and its own left ring
/// is left unused. The first left ring and the last right ring are closed
/// with fan caps.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn build_solid_sweep(
    domain: &SliceDomain,
    profile: &Profile,
    scales: &[(RingScale, RingScale)],
    vertex_total: usize,
) -> Mesh {
    let n = domain.slices();
    let k = profile.len();
    debug_assert_eq!(scales.len(), n);

    let face_total = (2 * n - 1) * k + 2 * (k - 2);
    let mut builder = MeshBuilder::with_capacity(vertex_total, face_total)
        .reversed(!profile.is_counter_clockwise());
    let ring_len = k as u32;
    let mut cursor = SliceCursor::new(ring_len, 2);
    let mut risers = 0usize;

    for (i, &(left_scale, right_scale)) in scales.iter().enumerate() {
        debug_assert_eq!(builder.vertex_count(), cursor.current_start());
        builder.push_ring(ring_points(profile, domain.station(i), left_scale));
        builder.push_ring(ring_points(profile, domain.station(i + 1), right_scale));
        let (left, right) = (cursor.ring(0), cursor.ring(1));

        let from = match cursor.previous_ring(1) {
            None => {
                builder.fan(left, true);
                left
            }
            Some(previous_right) if scales[i - 1].1 == left_scale => previous_right,
            Some(previous_right) => {
                builder.strip(previous_right, left, ring_len);
                builder.rung_edges(previous_right, left, ring_len);
                risers += 1;
                left
            }
        };
        if from == left {
            builder.ring_edges(left);
        }
        builder.ring_edges(right);
        builder.rung_edges(from, right, ring_len);
        builder.strip(from, right, ring_len);
        if i + 1 == n {
            builder.fan(right, false);
        }

        cursor.advance();
    }

    let mesh = builder.finish();
    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        risers,
        "solid sweep built"
    );
    mesh
}
