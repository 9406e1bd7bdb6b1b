//! Geometry node import: materials, meshes and object linking.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::mesh::import_triangle_set;
use super::{ColladaImporter, ImportResult};
use crate::collada::{GeometryNode, Primitive};
use crate::material::ImportedMaterial;
use crate::naming::import_name;
use crate::texture::ImageLoader;

impl<'a, L: ImageLoader> ColladaImporter<'a, L> {
    /// Import one geometry instance.
    ///
    /// Links one object per triangle set of the geometry. Meshes and
    /// materials already registered under their import names are reused.
    pub fn import_geometry_node(&mut self, node: &GeometryNode, base_dir: &Path) -> ImportResult<()> {
        let mut bound: HashMap<&str, Arc<ImportedMaterial>> = HashMap::new();
        for (symbol, material) in &node.material_bindings {
            let name = import_name(&material.id, 0);

            let imported = if let Some(existing) = self.scene.material(&name).cloned() {
                self.report.materials_reused += 1;
                existing
            } else {
                let created = self.import_material(material, &name, base_dir)?;
                self.report.materials_created += 1;
                created
            };
            bound.insert(symbol.as_str(), imported);
        }

        let geometry = &node.geometry;
        let matrix_world = node.matrix.transpose();

        for (index, primitive) in geometry.primitives.iter().enumerate() {
            let Primitive::TriangleSet(triset) = primitive else {
                if let Primitive::Unsupported { kind, .. } = primitive {
                    log::debug!(
                        "Skipping <{}> primitive {} of geometry '{}'",
                        kind,
                        index,
                        geometry.id
                    );
                }
                self.report.primitives_skipped += 1;
                continue;
            };

            let material = bound.get(triset.material.as_str()).cloned();
            if material.is_none() {
                log::warn!(
                    "Material symbol '{}' of geometry '{}' is not bound, importing without material",
                    triset.material,
                    geometry.id
                );
            }

            let name = import_name(&geometry.id, index);
            let mesh = if let Some(existing) = self.scene.mesh(&name).cloned() {
                self.report.meshes_reused += 1;
                existing
            } else {
                let image = material
                    .as_ref()
                    .and_then(|m| self.scene.material_image(&m.name))
                    .cloned();

                let Some(mesh) = import_triangle_set(triset, &name, image)? else {
                    log::debug!(
                        "Skipping empty triangle set {} of geometry '{}'",
                        index,
                        geometry.id
                    );
                    self.report.primitives_skipped += 1;
                    continue;
                };

                log::debug!(
                    "Created mesh '{}' ({} vertices, {} faces)",
                    name,
                    mesh.vertex_count(),
                    mesh.face_count()
                );
                self.report.meshes_created += 1;
                self.scene.add_mesh(mesh)
            };

            let object = self.scene.link_object(mesh);
            object.matrix_world = matrix_world;
            let slot = object.material_slot_add();
            object.material_slots[slot].material = material;
            self.report.objects_linked += 1;
        }

        Ok(())
    }
}
