//! Effect to material conversion.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use daeport_math::Vec3;

use super::{ColladaImporter, ImportError, ImportResult};
use crate::collada::{DiffuseChannel, Material, TextureMap};
use crate::material::{ImageTexture, ImportedMaterial, TextureCoords};
use crate::texture::ImageLoader;

/// Shading model of a `profile_COMMON` technique.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadingModel {
    Constant,
    Lambert,
    Phong,
    Blinn,
}

impl ShadingModel {
    /// Whether the model has a diffuse term.
    pub fn has_diffuse(self) -> bool {
        match self {
            ShadingModel::Constant => false,
            ShadingModel::Lambert | ShadingModel::Phong | ShadingModel::Blinn => true,
        }
    }
}

impl FromStr for ShadingModel {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(ShadingModel::Constant),
            "lambert" => Ok(ShadingModel::Lambert),
            "phong" => Ok(ShadingModel::Phong),
            "blinn" => Ok(ShadingModel::Blinn),
            other => Err(ImportError::UnknownShadingModel(other.to_string())),
        }
    }
}

impl<'a, L: ImageLoader> ColladaImporter<'a, L> {
    /// Register a Lambert material named `name` for a document material.
    pub(super) fn import_material(
        &mut self,
        material: &Material,
        name: &str,
        base_dir: &Path,
    ) -> ImportResult<Arc<ImportedMaterial>> {
        let shading: ShadingModel = material.effect.shading_type.parse()?;

        let mut imported = ImportedMaterial::new(name);
        if shading.has_diffuse() {
            if let Some(diffuse) = &material.effect.diffuse {
                self.import_diffuse(&mut imported, diffuse, base_dir);
            }
        }

        log::debug!(
            "Created material '{}' from '{}' ({:?})",
            name,
            material.id,
            shading
        );
        Ok(self.scene.add_material(imported))
    }

    fn import_diffuse(
        &mut self,
        material: &mut ImportedMaterial,
        diffuse: &DiffuseChannel,
        base_dir: &Path,
    ) {
        match diffuse {
            DiffuseChannel::Color([r, g, b, _]) => {
                material.diffuse_color = Vec3::new(*r, *g, *b);
            }
            DiffuseChannel::Map(map) => self.import_diffuse_map(material, map, base_dir),
        }
    }

    fn import_diffuse_map(
        &mut self,
        material: &mut ImportedMaterial,
        map: &TextureMap,
        base_dir: &Path,
    ) {
        if !self.options.load_textures {
            log::debug!("Texture loading disabled, ignoring '{}'", map.image_path());
            return;
        }

        match self.loader.load_image(map.image_path(), base_dir) {
            Ok(image) => {
                let texture = Arc::new(ImageTexture {
                    name: self.options.texture_name.clone(),
                    image: image.clone(),
                });
                let slot = material.add_texture_slot(texture);
                slot.texture_coords = TextureCoords::Uv;
                slot.use_map_color_diffuse = true;

                self.scene.set_material_image(material.name.clone(), image);
            }
            Err(e) => {
                log::warn!(
                    "Could not load texture '{}' for material '{}': {}",
                    map.image_path(),
                    material.name,
                    e
                );
                material.diffuse_color = Vec3::from_array(self.options.missing_texture_color);
                self.report.missing_textures += 1;
            }
        }
    }
}
