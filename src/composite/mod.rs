//! Staging finished meshes for a host application.
//!
//! Builders return bare meshes; a [`Composite`] names them, places them and
//! records the hole cuts the host still has to perform. The crate never
//! talks to a scene, performs boolean subtraction or writes files itself:
//! those are the [`SceneSink`], [`HoleCutter`] and [`MeshExporter`] traits,
//! implemented by the host.

mod base;
mod magnet;
mod teaching;

pub use base::{base_box, MagnetBase, PoleBase};
pub use magnet::{
    HoleCut, MagnetPlinth, MagnetPocket, MagnetSpec, MAGNET_DEPTH, MAGNET_DIAMETER,
};
pub use teaching::{TeachingSet, TeachingSetParams};

use tracing::debug;

use crate::error::{AssemblyError, Result};
use crate::math::{Point3, Vector3};
use crate::mesh::{Aabb, Mesh};

/// A named mesh placed in the scene by a translation.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    name: String,
    mesh: Mesh,
    offset: Vector3,
}

impl SceneObject {
    /// Creates a scene object after checking that the mesh is usable.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::EmptyMesh`] if the mesh has no vertices or
    /// no faces, or [`AssemblyError::IndexOutOfRange`] if it names a vertex
    /// it does not have.
    pub fn new(name: impl Into<String>, mesh: Mesh, offset: Vector3) -> Result<Self> {
        let name = name.into();
        if mesh.is_empty() {
            return Err(AssemblyError::EmptyMesh(name).into());
        }
        if let Some(index) = mesh.first_dangling_index() {
            return Err(AssemblyError::IndexOutOfRange {
                name,
                index,
                vertex_count: mesh.vertex_count(),
            }
            .into());
        }
        Ok(Self { name, mesh, offset })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mesh in its own local frame.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[must_use]
    pub fn offset(&self) -> &Vector3 {
        &self.offset
    }

    /// Vertex positions after placement.
    pub fn world_vertices(&self) -> impl Iterator<Item = Point3> + '_ {
        self.mesh.vertices().iter().map(move |v| v + self.offset)
    }

    /// Bounding box after placement.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.mesh.bounds().map(|b| Aabb {
            min: b.min + self.offset,
            max: b.max + self.offset,
        })
    }
}

/// A hole cut waiting to be applied to a named object.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCut {
    pub target: String,
    pub cut: HoleCut,
}

/// Places a scene object in the host's scene.
pub trait SceneSink {
    /// # Errors
    ///
    /// Host-defined; usually [`AssemblyError::Host`].
    fn place(&mut self, object: &SceneObject) -> Result<()>;
}

/// Subtracts a hole cut from a mesh by boolean difference.
pub trait HoleCutter {
    /// Returns `target` with `cut.tool`, placed at `cut.position` in the
    /// target's local frame, removed.
    ///
    /// # Errors
    ///
    /// Host-defined; usually [`AssemblyError::Host`].
    fn subtract(&mut self, target: &Mesh, cut: &HoleCut) -> Result<Mesh>;
}

/// Writes a placed mesh to some file format.
pub trait MeshExporter {
    /// # Errors
    ///
    /// Host-defined; usually [`AssemblyError::Host`].
    fn export(&mut self, object: &SceneObject) -> Result<()>;
}

/// An ordered set of scene objects and the hole cuts still owed to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    objects: Vec<SceneObject>,
    cuts: Vec<PendingCut>,
}

impl Composite {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    #[must_use]
    pub fn cuts(&self) -> &[PendingCut] {
        &self.cuts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Adds an object.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidLayout`] if the name is taken.
    pub fn push(&mut self, object: SceneObject) -> Result<()> {
        if self.get(&object.name).is_some() {
            return Err(
                AssemblyError::InvalidLayout(format!("duplicate object '{}'", object.name)).into(),
            );
        }
        self.objects.push(object);
        Ok(())
    }

    /// Records a hole to be cut from the object named `target`.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidLayout`] if there is no such object.
    pub fn add_cut(&mut self, target: &str, cut: HoleCut) -> Result<()> {
        if self.get(target).is_none() {
            return Err(AssemblyError::InvalidLayout(format!("no object '{target}' to cut")).into());
        }
        self.cuts.push(PendingCut {
            target: target.to_owned(),
            cut,
        });
        Ok(())
    }

    /// Records a magnet pocket: its cut on `target`, and its liner as a new
    /// object placed where the pocket ends up.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::add_cut`] and [`Self::push`] do.
    pub fn add_magnet_pocket(&mut self, target: &str, pocket: MagnetPocket) -> Result<()> {
        let base = *self
            .get(target)
            .ok_or_else(|| AssemblyError::InvalidLayout(format!("no object '{target}' to cut")))?
            .offset();
        let liner = SceneObject::new(
            format!("{target} magnet"),
            pocket.liner,
            base + pocket.cut.position,
        )?;
        self.add_cut(target, pocket.cut)?;
        self.push(liner)
    }

    /// Places a shell stack's magnet plinth at the offset of `target` as a
    /// new object, and records its pocket against the plinth.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidLayout`] if there is no such object,
    /// or fails as [`Self::push`] does.
    pub fn add_magnet_plinth(&mut self, target: &str, plinth: MagnetPlinth) -> Result<()> {
        let base = *self
            .get(target)
            .ok_or_else(|| AssemblyError::InvalidLayout(format!("no object '{target}'")))?
            .offset();
        let name = format!("{target} plinth");
        self.push(SceneObject::new(name.clone(), plinth.mesh, base)?)?;
        self.add_cut(&name, plinth.cut)
    }

    /// Names of every pair of objects whose placed bounding boxes overlap.
    #[must_use]
    pub fn overlapping_pairs(&self) -> Vec<(&str, &str)> {
        let bounds: Vec<(&str, Option<Aabb>)> = self
            .objects
            .iter()
            .map(|o| (o.name(), o.world_bounds()))
            .collect();
        let mut pairs = Vec::new();
        for (i, (a, box_a)) in bounds.iter().enumerate() {
            for (b, box_b) in &bounds[i + 1..] {
                if let (Some(box_a), Some(box_b)) = (box_a, box_b) {
                    if box_a.overlaps(box_b) {
                        pairs.push((*a, *b));
                    }
                }
            }
        }
        pairs
    }

    /// Applies every pending cut through `cutter`, replacing each target's
    /// mesh with the result. Cuts are applied in the order they were added.
    ///
    /// # Errors
    ///
    /// Propagates the cutter's error, or [`AssemblyError::EmptyMesh`] /
    /// [`AssemblyError::IndexOutOfRange`] if it returns an unusable mesh.
    /// The composite is left unchanged on failure.
    pub fn cut_holes<C: HoleCutter + ?Sized>(&mut self, cutter: &mut C) -> Result<()> {
        let mut objects = self.objects.clone();
        for pending in &self.cuts {
            let Some(object) = objects.iter_mut().find(|o| o.name == pending.target) else {
                return Err(AssemblyError::InvalidLayout(format!(
                    "no object '{}' to cut",
                    pending.target
                ))
                .into());
            };
            let mesh = cutter.subtract(&object.mesh, &pending.cut)?;
            *object = SceneObject::new(object.name.clone(), mesh, object.offset)?;
        }
        debug!(cuts = self.cuts.len(), "hole cuts applied");
        self.objects = objects;
        self.cuts.clear();
        Ok(())
    }

    /// Hands every object to the host scene, in order.
    ///
    /// # Errors
    ///
    /// Propagates the sink's first error.
    pub fn forward<S: SceneSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for object in &self.objects {
            sink.place(object)?;
        }
        debug!(objects = self.objects.len(), "composite forwarded");
        Ok(())
    }

    /// Exports every object, in order.
    ///
    /// # Errors
    ///
    /// Propagates the exporter's first error.
    pub fn export<E: MeshExporter + ?Sized>(&self, exporter: &mut E) -> Result<()> {
        for object in &self.objects {
            exporter.export(object)?;
        }
        Ok(())
    }
}

/// Turns `(name, mesh, offset)` parts into a [`Composite`].
///
/// Meshes are moved in unchanged; the offset is kept beside them.
///
/// # Errors
///
/// Fails as [`SceneObject::new`] and [`Composite::push`] do.
pub fn assemble_composite<I, N>(parts: I) -> Result<Composite>
where
    I: IntoIterator<Item = (N, Mesh, Vector3)>,
    N: Into<String>,
{
    let mut composite = Composite::new();
    for (name, mesh, offset) in parts {
        composite.push(SceneObject::new(name, mesh, offset)?)?;
    }
    Ok(composite)
}
