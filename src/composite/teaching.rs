use tracing::debug;

use crate::error::{AssemblyError, Result};
use crate::math::Vector3;
use crate::mesh::Mesh;
use crate::revolution::{
    Cylinder, DiskRevolution, RevolutionParams, ShellRevolution, SmoothRevolution,
};

use super::{assemble_composite, base_box, Composite, HoleCut, MagnetSpec};

/// Sizes for a [`TeachingSet`], in model units (1 unit = 15 mm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeachingSetParams {
    pub disks: usize,
    pub shells: usize,
    /// Radial slices of the smooth model.
    pub smoothness: usize,
    pub revolution: RevolutionParams,
    pub magnet: MagnetSpec,
    /// Height of the pieces' placement above the base's floor.
    pub lift: f64,
    pub base_height: f64,
    pub depression_depth: f64,
    /// Gap added around each piece when sizing the base.
    pub spacing: f64,
    /// Margin added to the widest radius when laying out the base.
    pub layout_margin: f64,
    /// Margin added to each piece's footprint when sizing its depression.
    pub depression_margin: f64,
}

impl Default for TeachingSetParams {
    fn default() -> Self {
        Self {
            disks: 7,
            shells: 7,
            smoothness: 50,
            revolution: RevolutionParams::default(),
            magnet: MagnetSpec::default(),
            lift: 0.5,
            base_height: 6.0 / 15.0,
            depression_depth: 2.0 / 15.0,
            spacing: 20.0 / 15.0,
            layout_margin: 1.5 / 15.0,
            depression_margin: 1.0 / 15.0,
        }
    }
}

/// The smooth, disk and shell models of one solid of revolution, side by
/// side on a base with a shallow depression under each.
///
/// `profile` gives height as a function of radius over `[x_1, x_2]`;
/// `inverse` gives radius as a function of height over `[z_1, z_2]` and
/// drives the disk model. The disks carry magnet pockets.
pub struct TeachingSet<F, G> {
    profile: F,
    x_range: (f64, f64),
    inverse: G,
    z_range: (f64, f64),
    params: TeachingSetParams,
}

impl<F, G> TeachingSet<F, G>
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    #[must_use]
    pub fn new(profile: F, x_1: f64, x_2: f64, inverse: G, z_1: f64, z_2: f64) -> Self {
        Self {
            profile,
            x_range: (x_1, x_2),
            inverse,
            z_range: (z_1, z_2),
            params: TeachingSetParams::default(),
        }
    }

    #[must_use]
    pub fn params(mut self, params: TeachingSetParams) -> Self {
        self.params = params;
        self
    }

    /// Radius used to lay the three models out, and base width.
    fn layout(&self) -> (f64, f64) {
        let radius = self.x_range.1 + self.params.layout_margin;
        let width = 2.0 * radius + self.params.spacing;
        (radius, width)
    }

    /// x positions of the disk, smooth and shell models.
    #[must_use]
    pub fn positions(&self) -> [f64; 3] {
        let (_, width) = self.layout();
        [-width, 0.0, width]
    }

    /// Builds the set: objects `smooth`, `disks`, `shells` and `base`, with
    /// magnet pockets cut from the disks and one depression per model cut
    /// from the base.
    ///
    /// # Errors
    ///
    /// Fails as the underlying builders do, or with
    /// [`AssemblyError::InvalidLayout`] if a model's footprint does not fit
    /// its place on the base.
    pub fn execute(&self) -> Result<Composite> {
        let p = &self.params;
        let segments = p.revolution.segments;
        let (x_1, x_2) = self.x_range;
        let (z_1, z_2) = self.z_range;
        debug!(
            disks = p.disks,
            shells = p.shells,
            smoothness = p.smoothness,
            "building teaching set"
        );

        let smooth = SmoothRevolution::new(x_1, x_2, p.smoothness, &self.profile, |_| 0.0)
            .segments(segments)
            .execute()?;
        let disk_stack = DiskRevolution::new(z_1, z_2, p.disks, &self.inverse).segments(segments);
        let disks = disk_stack.execute()?;
        let pockets = disk_stack.magnet_pockets(&p.magnet)?;
        let shells = ShellRevolution::new(x_1, x_2, p.shells, &self.profile, |_| 0.0)
            .clearance(p.revolution.clearance)
            .segments(segments)
            .execute()?;

        let (_, width) = self.layout();
        let length = 3.0 * width;
        let [disk_x, smooth_x, shell_x] = self.positions();
        let models = [
            ("smooth", smooth, smooth_x),
            ("disks", disks, disk_x),
            ("shells", shells, shell_x),
        ];

        let floor = p.base_height - p.depression_depth / 2.0;
        let mut depressions = Vec::with_capacity(models.len());
        for (name, mesh, x) in &models {
            let radius = footprint_radius(mesh) + p.depression_margin;
            if radius >= width / 2.0 {
                return Err(AssemblyError::InvalidLayout(format!(
                    "{name} footprint {radius} does not fit a base {width} wide"
                ))
                .into());
            }
            depressions.push(HoleCut {
                tool: Cylinder::new(radius, -p.depression_depth / 2.0, p.depression_depth / 2.0)
                    .segments(segments)
                    .execute()?,
                position: Vector3::new(*x, 0.0, floor),
            });
        }

        let base = base_box(length, width, p.base_height)?;
        let mut composite = assemble_composite(
            models
                .into_iter()
                .map(|(name, mesh, x)| (name, mesh, Vector3::new(x, 0.0, p.lift)))
                .chain([("base", base, Vector3::zeros())]),
        )?;
        for pocket in pockets {
            composite.add_cut("disks", pocket)?;
        }
        for depression in depressions {
            composite.add_cut("base", depression)?;
        }
        Ok(composite)
    }
}

/// Largest distance of any vertex from the z axis.
fn footprint_radius(mesh: &Mesh) -> f64 {
    mesh.vertices()
        .iter()
        .map(|v| v.x.hypot(v.y))
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SolidusError;
    use approx::assert_relative_eq;

    fn small() -> TeachingSetParams {
        TeachingSetParams {
            disks: 4,
            shells: 3,
            smoothness: 8,
            revolution: RevolutionParams {
                segments: 16,
                ..RevolutionParams::default()
            },
            ..TeachingSetParams::default()
        }
    }

    fn paraboloid() -> TeachingSet<impl Fn(f64) -> f64, impl Fn(f64) -> f64> {
        let top = 3.4_f64;
        TeachingSet::new(move |x| top - x * x, 0.0, top.sqrt(), move |z| (top - z).sqrt(), 0.0, top)
            .params(small())
    }

    #[test]
    fn layout_matches_unit_conventions() {
        let set = paraboloid();
        let (radius, width) = set.layout();
        assert_relative_eq!(radius, 3.4_f64.sqrt() + 0.1);
        assert_relative_eq!(width, 2.0 * radius + 20.0 / 15.0);
        let [disk_x, smooth_x, shell_x] = set.positions();
        assert_relative_eq!(smooth_x, 0.0);
        assert_relative_eq!(shell_x - smooth_x, width);
        assert_relative_eq!(smooth_x - disk_x, width);
    }

    #[test]
    fn objects_and_cuts() {
        let composite = paraboloid().execute().unwrap();
        let names: Vec<&str> = composite.objects().iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["smooth", "disks", "shells", "base"]);
        let on_disks = composite.cuts().iter().filter(|c| c.target == "disks").count();
        let on_base = composite.cuts().iter().filter(|c| c.target == "base").count();
        assert_eq!(on_disks, 4);
        assert_eq!(on_base, 3);
    }

    #[test]
    fn depressions_sit_under_their_models() {
        let composite = paraboloid().execute().unwrap();
        let base_cuts: Vec<&HoleCut> = composite
            .cuts()
            .iter()
            .filter(|c| c.target == "base")
            .map(|c| &c.cut)
            .collect();
        for (cut, name) in base_cuts.iter().zip(["smooth", "disks", "shells"]) {
            let model = composite.get(name).unwrap();
            assert_relative_eq!(cut.position.x, model.offset().x);
            let tool = cut.tool.bounds().unwrap();
            let piece = model.mesh().bounds().unwrap();
            assert!(tool.max.x > piece.max.x, "{name}");
            let depth = tool.size().z;
            assert_relative_eq!(cut.position.z + depth / 2.0, 6.0 / 15.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn too_wide_inverse_fails_layout() {
        // disks wider than the layout radius allows
        let set = TeachingSet::new(|x| 1.0 - x, 0.0, 1.0, |z| 5.0 * (1.0 - z), 0.0, 1.0)
            .params(TeachingSetParams {
                disks: 2,
                ..small()
            });
        let err = set.execute().unwrap_err();
        assert!(matches!(
            err,
            SolidusError::Assembly(AssemblyError::InvalidLayout(_))
        ));
    }

    #[test]
    fn footprint_of_cylinder() {
        let mesh = Cylinder::new(1.5, 0.0, 1.0).segments(8).execute().unwrap();
        assert_relative_eq!(footprint_radius(&mesh), 1.5, epsilon = 1e-12);
    }
}
