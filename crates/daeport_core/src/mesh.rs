//! Host mesh representation produced by the importer.
//!
//! Faces are stored in the host's face-table layout: four vertex slots per
//! face, where a triangle keeps its last slot at 0. Meshes are assembled
//! with [`MeshBuilder`] and frozen by [`MeshBuilder::finalize`], which
//! validates the topology and computes derived data.

use std::sync::Arc;

use daeport_math::{Aabb, Vec2, Vec3};
use thiserror::Error;

use crate::texture::Image;

/// Four vertex indices; triangles leave the last slot at 0.
pub type Face = [u32; 4];

/// Errors raised while assembling a mesh.
#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("Face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },

    #[error("Face {face} does not exist (mesh has {face_count} faces)")]
    FaceOutOfRange { face: usize, face_count: usize },

    #[error("Mesh has no UV layer")]
    NoUvLayer,
}

/// UV coordinates for the three corners of one face, plus the image shown on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UvFace {
    pub uv: [Vec2; 3],
    pub image: Option<Arc<Image>>,
}

/// A mesh registered in [`SceneData`](crate::scene::SceneData).
///
/// Never mutated after [`MeshBuilder::finalize`]; shared through `Arc` by
/// every object that instances it.
#[derive(Clone, Debug)]
pub struct ImportedMesh {
    /// Registry name
    pub name: String,

    /// Vertex positions, index-compatible with the source vertex pool
    pub vertices: Vec<Vec3>,

    /// Face table
    pub faces: Vec<Face>,

    /// Per-face smooth shading flags (present when the source had normals)
    pub smooth: Option<Vec<bool>>,

    /// Per-face UV coordinates (present when the source had a UV channel)
    pub uv_layer: Option<Vec<UvFace>>,

    /// Geometric normal of every face, computed on finalize
    pub face_normals: Vec<Vec3>,

    /// Axis-aligned bounding box of the vertices
    pub bounds: Aabb,
}

impl ImportedMesh {
    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has a UV layer.
    pub fn has_uvs(&self) -> bool {
        self.uv_layer.is_some()
    }

    /// Smooth flag of a face; faces without smoothing data are flat.
    pub fn is_smooth(&self, face: usize) -> bool {
        self.smooth
            .as_ref()
            .and_then(|flags| flags.get(face))
            .copied()
            .unwrap_or(false)
    }

    /// The three triangle corners of a face, in stored order.
    pub fn triangle(&self, face: usize) -> Option<[u32; 3]> {
        self.faces.get(face).map(|f| [f[0], f[1], f[2]])
    }
}

/// Accumulates vertices, faces and per-face attributes for one mesh.
///
/// Faces are added first; smooth flags and UV faces are then set by face
/// index, mirroring how the host allocates its face table up front.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    name: String,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    smooth: Option<Vec<bool>>,
    uv_layer: Option<Vec<UvFace>>,
}

impl MeshBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Replace the vertex array.
    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
    }

    /// Append a face and return its index.
    pub fn push_face(&mut self, face: Face) -> usize {
        self.faces.push(face);
        self.faces.len() - 1
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Set the smooth flag of a face, allocating the flag array (all flat) on first use.
    pub fn set_smooth(&mut self, face: usize, smooth: bool) -> Result<(), MeshError> {
        self.check_face(face)?;
        let face_count = self.faces.len();
        let flags = self.smooth.get_or_insert_with(|| vec![false; face_count]);
        flags.resize(face_count, false);
        flags[face] = smooth;
        Ok(())
    }

    /// Allocate a UV layer with one default entry per face.
    ///
    /// Only a single layer is supported; calling this again keeps the existing data.
    pub fn add_uv_layer(&mut self) {
        let face_count = self.faces.len();
        let layer = self.uv_layer.get_or_insert_with(Vec::new);
        layer.resize(face_count, UvFace::default());
    }

    /// Write the UV data of a face into the UV layer.
    pub fn set_uv_face(&mut self, face: usize, uv_face: UvFace) -> Result<(), MeshError> {
        self.check_face(face)?;
        let layer = self.uv_layer.as_mut().ok_or(MeshError::NoUvLayer)?;
        if layer.len() <= face {
            return Err(MeshError::NoUvLayer);
        }
        layer[face] = uv_face;
        Ok(())
    }

    fn check_face(&self, face: usize) -> Result<(), MeshError> {
        if face < self.faces.len() {
            Ok(())
        } else {
            Err(MeshError::FaceOutOfRange {
                face,
                face_count: self.faces.len(),
            })
        }
    }

    /// Validate the topology, compute derived data and freeze the mesh.
    pub fn finalize(self) -> Result<ImportedMesh, MeshError> {
        let vertex_count = self.vertices.len();

        for (index, face) in self.faces.iter().enumerate() {
            if let Some(&vertex) = face.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(MeshError::VertexOutOfRange {
                    face: index,
                    vertex,
                    vertex_count,
                });
            }
        }

        let face_normals = self
            .faces
            .iter()
            .map(|face| face_normal(&self.vertices, face))
            .collect();
        let bounds = Aabb::from_point_cloud(&self.vertices);

        Ok(ImportedMesh {
            name: self.name,
            vertices: self.vertices,
            faces: self.faces,
            smooth: self.smooth,
            uv_layer: self.uv_layer,
            face_normals,
            bounds,
        })
    }
}

/// Normal of the triangle in the first three slots (counter-clockwise winding).
///
/// Degenerate triangles get a zero normal.
fn face_normal(vertices: &[Vec3], face: &Face) -> Vec3 {
    let p0 = vertices[face[0] as usize];
    let p1 = vertices[face[1] as usize];
    let p2 = vertices[face[2] as usize];

    (p1 - p0).cross(p2 - p0).normalize_or_zero()
}
