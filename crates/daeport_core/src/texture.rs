//! Image loading for diffuse texture maps.
//!
//! Material import asks an [`ImageLoader`] for the image referenced by a
//! texture map. [`DiskImageLoader`] resolves the path against the document
//! directory, decodes it with the `image` crate and caches the result so
//! that materials sharing an image share one [`Image`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during image loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load image: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image with pixel data.
///
/// Stores pixels in linear RGBA float format.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (linear, 0-1 range), row-major order
    pub pixels: Vec<[f32; 4]>,

    /// Path the image was loaded from
    pub path: String,
}

impl Image {
    /// Create a new image from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// File name component of the source path, used as the image's display name.
    pub fn name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Source of images for texture-mapped materials.
///
/// `path` is the path written in the document; `base_dir` is the
/// directory of the document it came from.
pub trait ImageLoader {
    fn load_image(&mut self, path: &str, base_dir: &Path) -> TextureResult<Arc<Image>>;
}

/// Loads images from disk, caching them by resolved path.
#[derive(Default)]
pub struct DiskImageLoader {
    images: HashMap<PathBuf, Arc<Image>>,
}

impl DiskImageLoader {
    /// Create a new empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Get total memory usage of cached images.
    pub fn total_size_bytes(&self) -> usize {
        self.images.values().map(|i| i.size_bytes()).sum()
    }
}

impl ImageLoader for DiskImageLoader {
    fn load_image(&mut self, path: &str, base_dir: &Path) -> TextureResult<Arc<Image>> {
        let full_path = resolve_image_path(path, base_dir);

        if let Some(image) = self.images.get(&full_path) {
            return Ok(image.clone());
        }

        let image = Arc::new(load_image_file(&full_path)?);
        self.images.insert(full_path, image.clone());

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            path,
            image.width,
            image.height,
            image.size_bytes() as f32 / 1024.0
        );

        Ok(image)
    }
}

/// Resolve an image reference from a document against the document directory.
///
/// Accepts plain paths as well as `file://` URIs; absolute paths are kept.
pub fn resolve_image_path(path: &str, base_dir: &Path) -> PathBuf {
    let path = path.strip_prefix("file://").unwrap_or(path);
    let path = Path::new(path);

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Load an image from a file path.
fn load_image_file(path: &Path) -> TextureResult<Image> {
    if !path.is_file() {
        return Err(TextureError::LoadError(format!(
            "{} does not exist",
            path.display()
        )));
    }

    let img = image::open(path)?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<[f32; 4]> = rgba
        .pixels()
        .map(|p| {
            [
                srgb_to_linear(p[0]),
                srgb_to_linear(p[1]),
                srgb_to_linear(p[2]),
                p[3] as f32 / 255.0, // Alpha is linear
            ]
        })
        .collect();

    Ok(Image::new(
        width,
        height,
        pixels,
        path.to_string_lossy().to_string(),
    ))
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
