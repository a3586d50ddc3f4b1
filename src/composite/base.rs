use tracing::debug;

use crate::error::{AssemblyError, DomainError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::{Face, Mesh};
use crate::revolution::{Cylinder, DEFAULT_SEGMENTS};

use super::{assemble_composite, Composite, HoleCut, MagnetSpec};

/// A box centred on the z axis, standing on `z = 0`: `length` along x,
/// `width` along y, `height` up. Eight vertices and six outward quads.
///
/// # Errors
///
/// Returns [`DomainError::NonPositiveSize`] for a dimension that is not
/// positive.
pub fn base_box(length: f64, width: f64, height: f64) -> Result<Mesh> {
    for (what, value) in [("length", length), ("width", width), ("height", height)] {
        if !(value.is_finite() && value > TOLERANCE) {
            return Err(DomainError::NonPositiveSize { what, value }.into());
        }
    }
    let (x, y) = (0.5 * length, 0.5 * width);
    let vertices = vec![
        Point3::new(x, y, 0.0),
        Point3::new(x, -y, 0.0),
        Point3::new(-x, -y, 0.0),
        Point3::new(-x, y, 0.0),
        Point3::new(x, y, height),
        Point3::new(x, -y, height),
        Point3::new(-x, -y, height),
        Point3::new(-x, y, height),
    ];
    let faces = vec![
        Face::Quad([0, 1, 2, 3]),
        Face::Quad([4, 7, 6, 5]),
        Face::Quad([0, 4, 5, 1]),
        Face::Quad([1, 5, 6, 2]),
        Face::Quad([2, 6, 7, 3]),
        Face::Quad([4, 0, 3, 7]),
    ];
    let edges = vec![
        [0, 1],
        [1, 2],
        [2, 3],
        [3, 0],
        [4, 5],
        [5, 6],
        [6, 7],
        [7, 4],
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
    ];
    Mesh::from_parts(vertices, edges, faces)
}

/// x positions of `count` items spread evenly along a length, each in the
/// middle of its own equal share.
#[allow(clippy::cast_precision_loss)]
fn evenly_spaced(length: f64, count: usize) -> Vec<f64> {
    let spacing = length / count as f64;
    (0..count)
        .map(|i| -0.5 * length + 0.5 * spacing + spacing * i as f64)
        .collect()
}

fn check_count(count: usize, what: &str) -> Result<()> {
    if count == 0 {
        return Err(AssemblyError::InvalidLayout(format!("need at least one {what}")).into());
    }
    Ok(())
}

/// A base box with vertical poles for stacking washers or shells.
pub struct PoleBase {
    length: f64,
    width: f64,
    height: f64,
    poles: usize,
    pole_height: f64,
    pole_radius: f64,
    segments: usize,
}

impl PoleBase {
    /// Creates a new `PoleBase` with poles 2 units tall and 0.1 in radius.
    #[must_use]
    pub fn new(length: f64, width: f64, height: f64, poles: usize) -> Self {
        Self {
            length,
            width,
            height,
            poles,
            pole_height: 2.0,
            pole_radius: 0.1,
            segments: DEFAULT_SEGMENTS,
        }
    }

    #[must_use]
    pub fn pole_height(mut self, height: f64) -> Self {
        self.pole_height = height;
        self
    }

    #[must_use]
    pub fn pole_radius(mut self, radius: f64) -> Self {
        self.pole_radius = radius;
        self
    }

    #[must_use]
    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// x positions of the pole axes.
    #[must_use]
    pub fn pole_positions(&self) -> Vec<f64> {
        evenly_spaced(self.length, self.poles)
    }

    /// Builds the base and its poles as separate objects, `base` then
    /// `pole 0`, `pole 1`, ...
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for a non-positive size or an
    /// [`AssemblyError::InvalidLayout`] if there are no poles or they do
    /// not fit side by side.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<Composite> {
        check_count(self.poles, "pole")?;
        let spacing = self.length / self.poles as f64;
        if 2.0 * self.pole_radius >= spacing || 2.0 * self.pole_radius >= self.width {
            return Err(AssemblyError::InvalidLayout(format!(
                "poles of radius {} do not fit {} to a base of {} by {}",
                self.pole_radius, self.poles, self.length, self.width
            ))
            .into());
        }
        debug!(poles = self.poles, "building pole base");

        let base = base_box(self.length, self.width, self.height)?;
        let pole = Cylinder::new(self.pole_radius, 0.0, self.pole_height)
            .segments(self.segments)
            .execute()?;
        let mut parts = vec![("base".to_owned(), base, Vector3::zeros())];
        for (i, x) in self.pole_positions().into_iter().enumerate() {
            parts.push((format!("pole {i}"), pole.clone(), Vector3::new(x, 0.0, 0.0)));
        }
        assemble_composite(parts)
    }
}

/// A base box with magnet pockets sealed inside it, one per piece that
/// will snap onto it.
pub struct MagnetBase {
    length: f64,
    width: f64,
    height: f64,
    magnets: usize,
    magnet: MagnetSpec,
}

impl MagnetBase {
    #[must_use]
    pub fn new(length: f64, width: f64, height: f64, magnets: usize) -> Self {
        Self {
            length,
            width,
            height,
            magnets,
            magnet: MagnetSpec::default(),
        }
    }

    #[must_use]
    pub fn magnet(mut self, magnet: MagnetSpec) -> Self {
        self.magnet = magnet;
        self
    }

    /// x positions of the pocket axes.
    #[must_use]
    pub fn magnet_positions(&self) -> Vec<f64> {
        evenly_spaced(self.length, self.magnets)
    }

    /// Builds the base with one pending cut per pocket.
    ///
    /// Each pocket is half a magnet depth tall and centred in the box's
    /// height.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for a non-positive size or an
    /// [`AssemblyError::InvalidLayout`] if there are no magnets or the
    /// pockets do not fit inside the box.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<Composite> {
        check_count(self.magnets, "magnet")?;
        let spacing = self.length / self.magnets as f64;
        let pocket_height = self.magnet.depth / 2.0;
        let diameter = 2.0 * self.magnet.radius;
        if diameter >= spacing || diameter >= self.width || pocket_height >= self.height {
            return Err(AssemblyError::InvalidLayout(format!(
                "{} magnet pockets do not fit in a base of {} by {} by {}",
                self.magnets, self.length, self.width, self.height
            ))
            .into());
        }
        debug!(magnets = self.magnets, "building magnet base");

        let tool = self.magnet.tool(pocket_height)?;
        let mut composite = assemble_composite([(
            "base",
            base_box(self.length, self.width, self.height)?,
            Vector3::zeros(),
        )])?;
        for x in self.magnet_positions() {
            composite.add_cut(
                "base",
                HoleCut {
                    tool: tool.clone(),
                    position: Vector3::new(x, 0.0, 0.5 * self.height),
                },
            )?;
        }
        Ok(composite)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SolidusError;
    use crate::mesh::MeshReport;
    use approx::assert_relative_eq;

    #[test]
    fn box_is_closed_with_expected_volume() {
        let mesh = base_box(6.0, 2.0, 0.3).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.edges().len(), 12);
        let report = MeshReport::analyze(&mesh);
        assert!(report.is_printable(), "{report}");
        assert_relative_eq!(report.signed_volume, 3.6, epsilon = 1e-12);
    }

    #[test]
    fn box_rejects_flat_dimension() {
        let err = base_box(1.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            SolidusError::Domain(DomainError::NonPositiveSize { what: "width", .. })
        ));
    }

    #[test]
    fn poles_centred_in_equal_shares() {
        let base = PoleBase::new(6.0, 2.0, 0.3, 3);
        assert_eq!(base.pole_positions(), vec![-2.0, 0.0, 2.0]);

        let composite = base.segments(12).execute().unwrap();
        assert_eq!(composite.len(), 4);
        let pole = composite.get("pole 2").unwrap();
        assert_relative_eq!(pole.offset().x, 2.0);
        let bounds = pole.world_bounds().unwrap();
        assert_relative_eq!(bounds.min.z, 0.0);
        assert_relative_eq!(bounds.max.z, 2.0);
    }

    #[test]
    fn poles_must_fit() {
        let err = PoleBase::new(1.0, 1.0, 0.3, 10).pole_radius(0.1).execute().unwrap_err();
        assert!(matches!(
            err,
            SolidusError::Assembly(AssemblyError::InvalidLayout(_))
        ));
        assert!(PoleBase::new(1.0, 1.0, 0.3, 0).execute().is_err());
    }

    #[test]
    fn magnet_pockets_centred_in_height() {
        let h = 8.0 / 15.0;
        let composite = MagnetBase::new(20.0 / 15.0, 20.0 / 15.0, h, 1).execute().unwrap();
        assert_eq!(composite.len(), 1);
        assert_eq!(composite.cuts().len(), 1);
        let cut = &composite.cuts()[0].cut;
        assert_relative_eq!(cut.position.x, 0.0);
        assert_relative_eq!(cut.position.z, h / 2.0);
        let bounds = cut.tool.translated(&cut.position).bounds().unwrap();
        assert!(bounds.min.z > 0.0 && bounds.max.z < h);
    }

    #[test]
    fn magnet_base_spacing() {
        let base = MagnetBase::new(6.0, 2.0, 1.0, 4);
        assert_eq!(base.magnet_positions(), vec![-2.25, -0.75, 0.75, 2.25]);
        assert_eq!(base.execute().unwrap().cuts().len(), 4);
        assert!(MagnetBase::new(1.0, 2.0, 1.0, 4).execute().is_err());
    }
}
