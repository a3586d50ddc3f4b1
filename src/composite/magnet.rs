use crate::error::Result;
use crate::math::Vector3;
use crate::mesh::Mesh;
use crate::revolution::{Cylinder, DEFAULT_SEGMENTS};

/// Magnet depth: 4 mm plus 2 mm clearance, at 1 unit = 15 mm.
pub const MAGNET_DEPTH: f64 = 6.0 / 15.0;

/// Magnet diameter: 10 mm plus 1.5 mm clearance, at 1 unit = 15 mm.
pub const MAGNET_DIAMETER: f64 = 11.5 / 15.0;

/// Size of the cylindrical magnets embedded in printed pieces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnetSpec {
    pub radius: f64,
    pub depth: f64,
    /// Sides of the cutting cylinder.
    pub segments: usize,
}

impl Default for MagnetSpec {
    fn default() -> Self {
        Self {
            radius: MAGNET_DIAMETER / 2.0,
            depth: MAGNET_DEPTH,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl MagnetSpec {
    /// Closed cutting cylinder of the magnet's radius, centred on the origin.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the radius or `height` is not positive.
    pub fn tool(&self, height: f64) -> Result<Mesh> {
        Cylinder::new(self.radius, -height / 2.0, height / 2.0)
            .segments(self.segments)
            .execute()
    }

    /// Pocket wall with an open bottom, one magnet depth tall, centred on
    /// the origin.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the radius or depth is not positive.
    pub fn liner(&self) -> Result<Mesh> {
        Cylinder::new(self.radius, -self.depth / 2.0, self.depth / 2.0)
            .segments(self.segments)
            .open_bottom(true)
            .execute()
    }
}

/// A request for the host to subtract `tool`, placed at `position` in the
/// target's local frame, from a target mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct HoleCut {
    pub tool: Mesh,
    pub position: Vector3,
}

/// A magnet pocket that opens onto a face: the cut plus a liner that the
/// host adds back as a separate piece.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnetPocket {
    pub cut: HoleCut,
    pub liner: Mesh,
}

impl MagnetPocket {
    pub(crate) fn new(magnet: &MagnetSpec, position: Vector3) -> Result<Self> {
        Ok(Self {
            cut: HoleCut {
                tool: magnet.tool(magnet.depth)?,
                position,
            },
            liner: magnet.liner()?,
        })
    }
}

/// A cylinder filling the space under a shell lifted for a magnet, with
/// the pocket to cut from it. Both are in the shell stack's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnetPlinth {
    pub mesh: Mesh,
    pub cut: HoleCut,
}
