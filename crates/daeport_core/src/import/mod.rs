//! Importing COLLADA documents into [`SceneData`].
//!
//! The entry points are [`import_dae`] and [`import_dae_from_string`]. Both
//! parse the whole document first, so a malformed file fails before anything
//! is registered, then walk every geometry node of the document scene.
//!
//! Meshes and materials are registered under names derived from their
//! document ids (see [`import_name`](crate::naming::import_name)); anything
//! already registered under that name is reused, which makes repeated
//! imports of the same document share resources.

mod geometry;
mod material;
mod mesh;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collada::{ColladaDocument, ParseError};
use crate::mesh::MeshError;
use crate::scene::SceneData;
use crate::texture::{DiskImageLoader, ImageLoader};

pub use material::ShadingModel;
pub use mesh::{import_triangle_set, is_flat_face, triangle_face};

/// Errors that can occur during import.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Unknown shading model: {0}")]
    UnknownShadingModel(String),

    #[error("{kind} indices cover {found} triangles, expected {expected}")]
    IndexCountMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{kind} index {index} out of range ({len} available)")]
    IndexOutOfRange {
        kind: &'static str,
        index: u32,
        len: usize,
    },
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Import configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Diffuse color of materials whose texture could not be loaded
    pub missing_texture_color: [f32; 3],

    /// Name given to texture resources created for diffuse maps
    pub texture_name: String,

    /// Load images for texture-mapped materials; when off, maps are ignored
    pub load_textures: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            missing_texture_color: [1.0, 0.0, 0.0],
            texture_name: "Kd".to_string(),
            load_textures: true,
        }
    }
}

/// What an import did to the scene.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub geometry_nodes: usize,
    pub meshes_created: usize,
    pub meshes_reused: usize,
    pub materials_created: usize,
    pub materials_reused: usize,
    pub objects_linked: usize,

    /// Unsupported or empty primitives
    pub primitives_skipped: usize,

    /// Texture maps whose image failed to load
    pub missing_textures: usize,
}

/// Imports documents into a borrowed [`SceneData`].
pub struct ColladaImporter<'a, L: ImageLoader = DiskImageLoader> {
    scene: &'a mut SceneData,
    loader: L,
    options: ImportOptions,
    report: ImportReport,
}

impl<'a> ColladaImporter<'a, DiskImageLoader> {
    /// Create an importer that loads textures from disk with default options.
    pub fn new(scene: &'a mut SceneData) -> Self {
        Self::with_options(scene, DiskImageLoader::new(), ImportOptions::default())
    }
}

impl<'a, L: ImageLoader> ColladaImporter<'a, L> {
    pub fn with_options(scene: &'a mut SceneData, loader: L, options: ImportOptions) -> Self {
        Self {
            scene,
            loader,
            options,
            report: ImportReport::default(),
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import every geometry node of the document scene.
    pub fn import_document(&mut self, document: &ColladaDocument) -> ImportResult<ImportReport> {
        let result = document.geometry_nodes().try_for_each(|node| -> ImportResult<()> {
            self.import_geometry_node(node, &document.base_dir)?;
            self.report.geometry_nodes += 1;
            Ok(())
        });

        // Counts always start fresh on the next call
        let report = std::mem::take(&mut self.report);
        result?;

        log::info!(
            "Imported {} geometry nodes: {} objects, {} meshes ({} reused), {} materials ({} reused), {} primitives skipped",
            report.geometry_nodes,
            report.objects_linked,
            report.meshes_created,
            report.meshes_reused,
            report.materials_created,
            report.materials_reused,
            report.primitives_skipped
        );
        Ok(report)
    }
}

/// Import a `.dae` file into `scene`.
///
/// Relative image paths are resolved against the file's directory.
///
/// # Example
///
/// ```ignore
/// use daeport_core::import::import_dae;
/// use daeport_core::scene::SceneData;
///
/// let mut scene = SceneData::new();
/// let report = import_dae("robot.dae", &mut scene)?;
/// println!("Linked {} objects", report.objects_linked);
/// ```
pub fn import_dae<P: AsRef<Path>>(path: P, scene: &mut SceneData) -> ImportResult<ImportReport> {
    let path = path.as_ref();
    log::debug!("Importing {}", path.display());

    let content = std::fs::read_to_string(path)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    import_dae_from_string(&content, base_dir, scene)
}

/// Import COLLADA content from a string.
pub fn import_dae_from_string(
    content: &str,
    base_dir: impl Into<PathBuf>,
    scene: &mut SceneData,
) -> ImportResult<ImportReport> {
    let document = ColladaDocument::parse(content, base_dir)?;
    ColladaImporter::new(scene).import_document(&document)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;

    use crate::texture::{Image, ImageLoader, TextureError, TextureResult};

    /// Serves images from memory by document path; counts requests.
    #[derive(Default)]
    pub struct MemoryImageLoader {
        pub images: HashMap<String, Arc<Image>>,
        pub requests: usize,
    }

    impl MemoryImageLoader {
        pub fn with_image(path: &str) -> Self {
            let mut loader = Self::default();
            let image = Image::new(1, 1, vec![[1.0, 1.0, 1.0, 1.0]], path);
            loader.images.insert(path.to_string(), Arc::new(image));
            loader
        }
    }

    impl ImageLoader for MemoryImageLoader {
        fn load_image(&mut self, path: &str, _base_dir: &Path) -> TextureResult<Arc<Image>> {
            self.requests += 1;
            self.images
                .get(path)
                .cloned()
                .ok_or_else(|| TextureError::LoadError(format!("{} not found", path)))
        }
    }
}
