//! Triangle set to mesh conversion.

use std::sync::Arc;

use daeport_math::{Vec2, Vec3};

use super::{ImportError, ImportResult};
use crate::collada::TriangleSet;
use crate::mesh::{Face, ImportedMesh, MeshBuilder, UvFace};
use crate::texture::Image;

/// Dot product range (inclusive) within which two corner normals count as equal.
const FLAT_DOT_MIN: f32 = 0.99999;
const FLAT_DOT_MAX: f32 = 1.00001;

/// Build a mesh from one triangle set.
///
/// Returns `Ok(None)` when the set has no vertex indices. `image` is attached
/// to every UV face.
pub fn import_triangle_set(
    triset: &TriangleSet,
    name: &str,
    image: Option<Arc<Image>>,
) -> ImportResult<Option<ImportedMesh>> {
    let Some(vertex_index) = triset.vertex_index.as_deref().filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let mut builder = MeshBuilder::new(name);
    builder.set_vertices(triset.vertex.clone());
    for &triangle in vertex_index {
        builder.push_face(triangle_face(triangle));
    }

    if let Some(normal_index) = &triset.normal_index {
        check_index_count("normal", vertex_index.len(), normal_index.len())?;
        for (face, &[n1, n2, n3]) in normal_index.iter().enumerate() {
            let normals = [
                fetch(&triset.normal, n1, "normal")?,
                fetch(&triset.normal, n2, "normal")?,
                fetch(&triset.normal, n3, "normal")?,
            ];
            builder.set_smooth(face, !is_flat_face(&normals))?;
        }
    }

    if let Some(uv_index) = triset.texcoord_indexset.first() {
        let pool: &[Vec2] = triset
            .texcoordset
            .first()
            .map(Vec::as_slice)
            .unwrap_or_default();
        check_index_count("texcoord", vertex_index.len(), uv_index.len())?;
        builder.add_uv_layer();

        for (face, (&uvs, &[_, _, v3])) in uv_index.iter().zip(vertex_index).enumerate() {
            let [t1, t2, t3] = rotate_corners(uvs, v3 == 0);
            let uv = [
                fetch(pool, t1, "texcoord")?,
                fetch(pool, t2, "texcoord")?,
                fetch(pool, t3, "texcoord")?,
            ];
            builder.set_uv_face(
                face,
                UvFace {
                    uv,
                    image: image.clone(),
                },
            )?;
        }
    }

    Ok(Some(builder.finalize()?))
}

/// Face for a source triangle.
///
/// The host reads a 0 in the last slot as "triangle", so a triangle whose
/// third index is 0 is rotated to put that index first. Winding is unchanged.
pub fn triangle_face(triangle: [u32; 3]) -> Face {
    let [v1, v2, v3] = rotate_corners(triangle, triangle[2] == 0);
    [v1, v2, v3, 0]
}

/// Move the last corner to the front when `rotate` is set.
fn rotate_corners<T: Copy>([a, b, c]: [T; 3], rotate: bool) -> [T; 3] {
    if rotate {
        [c, a, b]
    } else {
        [a, b, c]
    }
}

/// Whether the three corner normals of a face agree.
///
/// The first normal is compared against the other two; the face is flat when
/// both dot products lie in `[0.99999, 1.00001]`.
pub fn is_flat_face(normals: &[Vec3; 3]) -> bool {
    let first = normals[0];
    normals[1..]
        .iter()
        .all(|n| (FLAT_DOT_MIN..=FLAT_DOT_MAX).contains(&first.dot(*n)))
}

/// Per-triangle index arrays must cover every triangle.
fn check_index_count(kind: &'static str, expected: usize, found: usize) -> ImportResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ImportError::IndexCountMismatch {
            kind,
            expected,
            found,
        })
    }
}

fn fetch<T: Copy>(pool: &[T], index: u32, kind: &'static str) -> ImportResult<T> {
    pool.get(index as usize)
        .copied()
        .ok_or(ImportError::IndexOutOfRange {
            kind,
            index,
            len: pool.len(),
        })
}
