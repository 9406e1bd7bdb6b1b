//! Host scene data: the registry the importer writes into.
//!
//! `SceneData` holds named meshes and materials (the deduplication
//! namespace), the images bound to materials, and the objects linked into
//! the scene. It is plain owned state; the importer borrows it mutably for
//! the duration of an import.

use std::collections::HashMap;
use std::sync::Arc;

use daeport_math::{Aabb, Mat4, Vec3};

use crate::material::ImportedMaterial;
use crate::mesh::ImportedMesh;
use crate::texture::Image;

/// One material slot of an object.
#[derive(Clone, Debug, Default)]
pub struct MaterialSlot {
    pub material: Option<Arc<ImportedMaterial>>,
}

/// An object linked into the scene.
///
/// Each object owns its transform and material slots; the mesh is shared.
#[derive(Clone, Debug)]
pub struct ImportedObject {
    /// Unique object name within the scene
    pub name: String,

    /// Instanced mesh
    pub mesh: Arc<ImportedMesh>,

    /// Object-to-world transform
    pub matrix_world: Mat4,

    pub material_slots: Vec<MaterialSlot>,
}

impl ImportedObject {
    /// Create an object with identity transform and no material slots.
    pub fn new(name: impl Into<String>, mesh: Arc<ImportedMesh>) -> Self {
        Self {
            name: name.into(),
            mesh,
            matrix_world: Mat4::IDENTITY,
            material_slots: Vec::new(),
        }
    }

    /// Append an empty material slot and return its index.
    pub fn material_slot_add(&mut self) -> usize {
        self.material_slots.push(MaterialSlot::default());
        self.material_slots.len() - 1
    }

    /// Material of the first slot, if any.
    pub fn active_material(&self) -> Option<&Arc<ImportedMaterial>> {
        self.material_slots.first().and_then(|slot| slot.material.as_ref())
    }

    /// World-space bounding box of the instanced mesh.
    pub fn world_bounds(&self) -> Aabb {
        let b = &self.mesh.bounds;
        if b.is_empty() {
            return Aabb::empty();
        }

        let corners = [
            Vec3::new(b.x.min, b.y.min, b.z.min),
            Vec3::new(b.x.max, b.y.min, b.z.min),
            Vec3::new(b.x.min, b.y.max, b.z.min),
            Vec3::new(b.x.max, b.y.max, b.z.min),
            Vec3::new(b.x.min, b.y.min, b.z.max),
            Vec3::new(b.x.max, b.y.min, b.z.max),
            Vec3::new(b.x.min, b.y.max, b.z.max),
            Vec3::new(b.x.max, b.y.max, b.z.max),
        ];

        corners.iter().fold(Aabb::empty(), |aabb, corner| {
            aabb.include(self.matrix_world.transform_point3(*corner))
        })
    }
}

/// Registry of imported meshes and materials plus the linked objects.
#[derive(Debug, Default)]
pub struct SceneData {
    meshes: HashMap<String, Arc<ImportedMesh>>,
    materials: HashMap<String, Arc<ImportedMaterial>>,
    material_images: HashMap<String, Arc<Image>>,
    objects: Vec<ImportedObject>,
    object_index: HashMap<String, usize>,
}

impl SceneData {
    /// Create empty scene data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&Arc<ImportedMesh>> {
        self.meshes.get(name)
    }

    pub fn contains_mesh(&self, name: &str) -> bool {
        self.meshes.contains_key(name)
    }

    /// Register a mesh under its name.
    ///
    /// Registered meshes are never replaced: if the name is taken, the
    /// existing mesh is returned and `mesh` is dropped.
    pub fn add_mesh(&mut self, mesh: ImportedMesh) -> Arc<ImportedMesh> {
        self.meshes
            .entry(mesh.name.clone())
            .or_insert_with(|| Arc::new(mesh))
            .clone()
    }

    /// Get a material by name.
    pub fn material(&self, name: &str) -> Option<&Arc<ImportedMaterial>> {
        self.materials.get(name)
    }

    pub fn contains_material(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Register a material under its name; same rules as [`Self::add_mesh`].
    pub fn add_material(&mut self, material: ImportedMaterial) -> Arc<ImportedMaterial> {
        self.materials
            .entry(material.name.clone())
            .or_insert_with(|| Arc::new(material))
            .clone()
    }

    /// Image bound to a material's diffuse texture, by material name.
    pub fn material_image(&self, material: &str) -> Option<&Arc<Image>> {
        self.material_images.get(material)
    }

    /// Record the image bound to a material's diffuse texture.
    pub fn set_material_image(&mut self, material: impl Into<String>, image: Arc<Image>) {
        self.material_images.insert(material.into(), image);
    }

    /// Link a new object instancing `mesh` into the scene.
    ///
    /// The object is named after the mesh; on collision a numeric suffix
    /// (`.001`, `.002`, ...) is appended.
    pub fn link_object(&mut self, mesh: Arc<ImportedMesh>) -> &mut ImportedObject {
        let name = self.unique_object_name(&mesh.name);
        let index = self.objects.len();

        self.object_index.insert(name.clone(), index);
        self.objects.push(ImportedObject::new(name, mesh));
        &mut self.objects[index]
    }

    fn unique_object_name(&self, base: &str) -> String {
        if !self.object_index.contains_key(base) {
            return base.to_string();
        }

        (1..)
            .map(|n| format!("{}.{:03}", base, n))
            .find(|candidate| !self.object_index.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Get an object by name.
    pub fn object(&self, name: &str) -> Option<&ImportedObject> {
        self.object_index.get(name).map(|&i| &self.objects[i])
    }

    /// Objects in the order they were linked.
    pub fn objects(&self) -> &[ImportedObject] {
        &self.objects
    }

    /// Registered meshes, sorted by name.
    pub fn meshes(&self) -> Vec<&Arc<ImportedMesh>> {
        let mut meshes: Vec<_> = self.meshes.values().collect();
        meshes.sort_by(|a, b| a.name.cmp(&b.name));
        meshes
    }

    /// Registered materials, sorted by name.
    pub fn materials(&self) -> Vec<&Arc<ImportedMaterial>> {
        let mut materials: Vec<_> = self.materials.values().collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name));
        materials
    }

    /// Get mesh count.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Get object count.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get total face count across all objects.
    pub fn total_face_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.face_count()).sum()
    }

    /// Compute the world-space bounding box of all objects.
    pub fn world_bounds(&self) -> Aabb {
        self.objects
            .iter()
            .map(ImportedObject::world_bounds)
            .filter(|b| !b.is_empty())
            .fold(Aabb::empty(), |acc, b| {
                acc.include(Vec3::new(b.x.min, b.y.min, b.z.min))
                    .include(Vec3::new(b.x.max, b.y.max, b.z.max))
            })
    }
}
