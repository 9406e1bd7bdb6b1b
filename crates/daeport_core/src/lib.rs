//! daeport core - COLLADA scene import.
//!
//! This crate provides:
//!
//! - **Document model**: `.dae` parsing into resolved geometry, material and
//!   scene types ([`collada`])
//! - **Scene registry**: [`SceneData`] with named meshes, materials and
//!   linked objects
//! - **Import**: conversion of geometry nodes into registry resources
//!   ([`import`])
//!
//! # Example
//!
//! ```ignore
//! use daeport_core::{import_dae, SceneData};
//!
//! let mut scene = SceneData::new();
//! let report = import_dae("robot.dae", &mut scene)?;
//! println!("Imported {} objects, {} meshes",
//!     report.objects_linked,
//!     scene.mesh_count());
//! ```

pub mod collada;
pub mod import;
pub mod material;
pub mod mesh;
pub mod naming;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use collada::ColladaDocument;
pub use import::{
    import_dae, import_dae_from_string, ColladaImporter, ImportError, ImportOptions,
    ImportReport, ImportResult,
};
pub use material::ImportedMaterial;
pub use mesh::{ImportedMesh, MeshBuilder};
pub use naming::import_name;
pub use scene::{ImportedObject, SceneData};
pub use texture::{DiskImageLoader, Image, ImageLoader};
