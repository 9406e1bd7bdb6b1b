//! COLLADA document model.
//!
//! These types represent a parsed `.dae` document after `#id` references
//! have been resolved. They are read-only input to the importer.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use daeport_math::{Mat4, Mat4Ext, Vec2, Vec3};

/// A parsed COLLADA document.
#[derive(Clone, Debug, Default)]
pub struct ColladaDocument {
    /// Directory that relative image paths are resolved against
    pub base_dir: PathBuf,

    /// `<library_images>` entries
    pub images: Vec<Arc<ImageRef>>,

    /// `<library_effects>` entries
    pub effects: Vec<Arc<Effect>>,

    /// `<library_materials>` entries
    pub materials: Vec<Arc<Material>>,

    /// `<library_geometries>` entries
    pub geometries: Vec<Arc<Geometry>>,

    /// The instantiated visual scene, if the document has one
    pub scene: Option<VisualScene>,
}

impl ColladaDocument {
    /// Every geometry instance of the scene, in document order.
    pub fn geometry_nodes(&self) -> impl Iterator<Item = &GeometryNode> {
        self.scene.iter().flat_map(|scene| scene.geometry_nodes.iter())
    }

    /// Look up a geometry by id.
    pub fn geometry(&self, id: &str) -> Option<&Arc<Geometry>> {
        self.geometries.iter().find(|g| g.id == id)
    }

    /// Look up a material by id.
    pub fn material(&self, id: &str) -> Option<&Arc<Material>> {
        self.materials.iter().find(|m| m.id == id)
    }
}

/// An `<image>` element.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRef {
    pub id: String,

    /// Path as written in `<init_from>`
    pub path: String,
}

/// An `<effect>` with a `profile_COMMON` technique.
#[derive(Clone, Debug)]
pub struct Effect {
    pub id: String,

    /// Name of the shading element (`constant`, `lambert`, `phong`, `blinn`, ...)
    pub shading_type: String,

    /// The `<diffuse>` input, if the shading element has one
    pub diffuse: Option<DiffuseChannel>,
}

/// Value of a `<diffuse>` input.
#[derive(Clone, Debug)]
pub enum DiffuseChannel {
    /// A flat RGBA color
    Color([f32; 4]),

    /// A texture lookup
    Map(TextureMap),
}

/// A `<texture>` reference: sampler -> surface -> image.
#[derive(Clone, Debug)]
pub struct TextureMap {
    pub sampler: Sampler2D,

    /// Name of the texture coordinate set the lookup uses
    pub texcoord: String,
}

impl TextureMap {
    /// Path of the image this map samples.
    pub fn image_path(&self) -> &str {
        &self.sampler.surface.image.path
    }
}

/// A `<sampler2D>` parameter.
#[derive(Clone, Debug)]
pub struct Sampler2D {
    pub sid: String,
    pub surface: Surface,
}

/// A `<surface>` parameter.
#[derive(Clone, Debug)]
pub struct Surface {
    pub sid: String,
    pub image: Arc<ImageRef>,
}

/// A `<material>` element.
#[derive(Clone, Debug)]
pub struct Material {
    pub id: String,
    pub name: Option<String>,
    pub effect: Arc<Effect>,
}

/// A `<geometry>` element.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub id: String,
    pub name: Option<String>,

    /// Primitive elements of the mesh, in document order
    pub primitives: Vec<Primitive>,
}

/// A primitive element inside `<mesh>`.
#[derive(Clone, Debug)]
pub enum Primitive {
    /// `<triangles>`
    TriangleSet(TriangleSet),

    /// Any other primitive element (`polylist`, `lines`, ...)
    Unsupported {
        /// Element name
        kind: String,

        /// Material symbol, if the element declares one
        material: Option<String>,
    },
}

/// A `<triangles>` element with its index streams split per input.
///
/// All index arrays are per triangle and parallel to `vertex_index`.
#[derive(Clone, Debug, Default)]
pub struct TriangleSet {
    /// Material binding symbol
    pub material: String,

    /// Vertex position pool
    pub vertex: Vec<Vec3>,

    /// Vertex indices per triangle; `None` when the element has no `<p>`
    pub vertex_index: Option<Vec<[u32; 3]>>,

    /// Normal pool
    pub normal: Vec<Vec3>,

    /// Normal indices per triangle; `None` without a NORMAL input
    pub normal_index: Option<Vec<[u32; 3]>>,

    /// One UV pool per TEXCOORD input, ordered by set
    pub texcoordset: Vec<Vec<Vec2>>,

    /// One per-triangle UV index array per TEXCOORD input
    pub texcoord_indexset: Vec<Vec<[u32; 3]>>,
}

impl TriangleSet {
    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.vertex_index.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `<visual_scene>`, flattened to its geometry instances.
#[derive(Clone, Debug, Default)]
pub struct VisualScene {
    pub id: String,
    pub geometry_nodes: Vec<GeometryNode>,
}

/// One `<instance_geometry>` placed in the scene graph.
#[derive(Clone, Debug)]
pub struct GeometryNode {
    /// Id of the enclosing `<node>`, if it has one
    pub node_id: Option<String>,

    pub geometry: Arc<Geometry>,

    /// World matrix in document layout: the row-major values of the
    /// transform stored as columns. The transform itself is the transpose.
    pub matrix: Mat4,

    /// Material bindings from `<bind_material>`, by symbol
    pub material_bindings: BTreeMap<String, Arc<Material>>,
}

/// A transformation element of a `<node>`.
#[derive(Clone, Debug)]
pub enum NodeTransform {
    /// `<matrix>`, 16 values row by row
    Matrix([f32; 16]),

    /// `<translate>`
    Translate(Vec3),

    /// `<rotate>`: axis and angle in degrees
    Rotate(Vec3, f32),

    /// `<scale>`
    Scale(Vec3),

    /// `<lookat>`: eye, interest point, up
    Lookat(Vec3, Vec3, Vec3),
}

impl NodeTransform {
    /// Convert this element to a transformation matrix.
    pub fn to_matrix(&self) -> Mat4 {
        match self {
            NodeTransform::Matrix(values) => Mat4::from_row_major(values),
            NodeTransform::Translate(t) => Mat4::from_translation(*t),
            NodeTransform::Rotate(axis, degrees) => Mat4::from_axis_angle_degrees(*axis, *degrees),
            NodeTransform::Scale(s) => Mat4::from_scale(*s),
            NodeTransform::Lookat(eye, target, up) => {
                Mat4::look_at_rh(*eye, *target, *up).inverse()
            }
        }
    }
}

/// Combine the transformation elements of a node into a single matrix.
pub fn compose_node_transforms(transforms: &[NodeTransform]) -> Mat4 {
    transforms
        .iter()
        .fold(Mat4::IDENTITY, |acc, t| acc * t.to_matrix())
}
