//! Host material representation.
//!
//! Every imported material uses a Lambert diffuse shader. Its base color is
//! either a flat diffuse color or an image texture bound through a
//! UV-mapped texture slot.

use std::sync::Arc;

use daeport_math::Vec3;

use crate::texture::Image;

/// Diffuse shading model of a host material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiffuseShader {
    #[default]
    Lambert,
}

/// How a texture slot maps the texture onto the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureCoords {
    #[default]
    Uv,
}

/// An image texture resource.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    /// Texture name
    pub name: String,

    /// Image shown by the texture
    pub image: Arc<Image>,
}

/// A texture bound to a material.
#[derive(Clone, Debug)]
pub struct TextureSlot {
    pub texture: Arc<ImageTexture>,

    /// Coordinate source for the lookup
    pub texture_coords: TextureCoords,

    /// Whether the texture modulates the diffuse color
    pub use_map_color_diffuse: bool,
}

/// A material registered in [`SceneData`](crate::scene::SceneData).
#[derive(Clone, Debug)]
pub struct ImportedMaterial {
    /// Registry name
    pub name: String,

    pub diffuse_shader: DiffuseShader,

    /// Diffuse color (RGB, 0-1)
    pub diffuse_color: Vec3,

    /// Texture slots, in binding order
    pub texture_slots: Vec<TextureSlot>,
}

impl ImportedMaterial {
    /// Default diffuse color of a new material.
    pub const DEFAULT_DIFFUSE: Vec3 = Vec3::new(0.8, 0.8, 0.8);

    /// Create a new Lambert material with the default diffuse color.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse_shader: DiffuseShader::Lambert,
            diffuse_color: Self::DEFAULT_DIFFUSE,
            texture_slots: Vec::new(),
        }
    }

    /// Append a texture slot and return it for configuration.
    pub fn add_texture_slot(&mut self, texture: Arc<ImageTexture>) -> &mut TextureSlot {
        self.texture_slots.push(TextureSlot {
            texture,
            texture_coords: TextureCoords::Uv,
            use_map_color_diffuse: false,
        });
        let last = self.texture_slots.len() - 1;
        &mut self.texture_slots[last]
    }

    /// Image of the first slot that modulates the diffuse color.
    pub fn diffuse_image(&self) -> Option<&Arc<Image>> {
        self.texture_slots
            .iter()
            .find(|slot| slot.use_map_color_diffuse)
            .map(|slot| &slot.texture.image)
    }

    /// Check if this material uses any textures.
    pub fn has_textures(&self) -> bool {
        !self.texture_slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_material() {
        let material = ImportedMaterial::new("Red");
        assert_eq!(material.name, "Red");
        assert_eq!(material.diffuse_shader, DiffuseShader::Lambert);
        assert_eq!(material.diffuse_color, ImportedMaterial::DEFAULT_DIFFUSE);
        assert!(!material.has_textures());
        assert!(material.diffuse_image().is_none());
    }

    #[test]
    fn test_diffuse_texture_slot() {
        let image = Arc::new(Image::new(1, 1, vec![[1.0, 1.0, 1.0, 1.0]], "white.png"));
        let texture = Arc::new(ImageTexture {
            name: "Kd".to_string(),
            image: image.clone(),
        });

        let mut material = ImportedMaterial::new("Textured");
        material.add_texture_slot(texture).use_map_color_diffuse = true;

        assert!(material.has_textures());
        assert_eq!(material.texture_slots[0].texture_coords, TextureCoords::Uv);
        assert!(Arc::ptr_eq(material.diffuse_image().unwrap(), &image));
    }
}
