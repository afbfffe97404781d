//! Triangle list to flat quad stream conversion
//!
//! Flat primitives consume vertices four at a time. Each source triangle
//! `(a, b, c)` is emitted as the four corners `(a, a, b, c)`: the first vertex
//! is duplicated, so every quad is degenerate along its first edge and the
//! drawn area equals the source triangle. Output length is always
//! `4 * triangle_count`.
//!
//! Attribute channels are looked up per corner. A channel that is empty or
//! shorter than the referenced vertex index falls back to a fixed default:
//!
//! | channel  | default              |
//! |----------|----------------------|
//! | color    | `(255, 255, 255, 255)` |
//! | normal   | `(0, 0, 1)`          |
//! | tangent  | `(0, 0, 0, 0)`       |
//! | uv0, uv1 | `(0, 0)`             |
//!
//! Positions are mandatory; an index past the position list is an error.

use crate::render::mesh::SourceMesh;
use crate::render::vertex::CornerVertex;
use thiserror::Error;

/// Corners emitted for every source triangle
pub const CORNERS_PER_TRIANGLE: usize = 4;

/// Errors raised while reshaping a submesh
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReshapeError {
    /// The submesh index does not exist in the mesh
    #[error("Submesh {index} out of range (mesh has {count} submeshes)")]
    SubmeshOutOfRange {
        /// Requested submesh
        index: usize,
        /// Submeshes in the mesh
        count: usize,
    },

    /// A corner references a vertex without a position
    #[error("Corner {corner} references vertex {index} but the mesh has {len} positions")]
    PositionOutOfRange {
        /// Output corner being built
        corner: usize,
        /// Referenced vertex index
        index: u32,
        /// Length of the position list
        len: usize,
    },
}

/// Expand a triangle list into per-corner vertex indices `(a, a, b, c)`
///
/// Trailing indices that do not form a whole triangle are ignored.
pub fn expand_triangles(indices: &[u32]) -> Vec<u32> {
    let triangles = indices.chunks_exact(3);
    if !triangles.remainder().is_empty() {
        log::warn!(
            "Triangle list length {} is not a multiple of 3; ignoring {} trailing indices",
            indices.len(),
            triangles.remainder().len()
        );
    }

    let mut corners = Vec::with_capacity(triangles.len() * CORNERS_PER_TRIANGLE);
    for triangle in triangles {
        corners.extend_from_slice(&[triangle[0], triangle[0], triangle[1], triangle[2]]);
    }
    corners
}

/// Build the flat vertex stream for one submesh
pub fn reshape_submesh(mesh: &SourceMesh, submesh: usize) -> Result<Vec<CornerVertex>, ReshapeError> {
    let mut vertices = Vec::new();
    reshape_submesh_into(mesh, submesh, &mut vertices)?;
    Ok(vertices)
}

/// Build the flat vertex stream for one submesh into an existing buffer
///
/// `out` is cleared first; its allocation is reused. On error `out` holds the
/// corners built before the failing one.
pub fn reshape_submesh_into(
    mesh: &SourceMesh,
    submesh: usize,
    out: &mut Vec<CornerVertex>,
) -> Result<(), ReshapeError> {
    let indices = mesh.submesh(submesh).ok_or(ReshapeError::SubmeshOutOfRange {
        index: submesh,
        count: mesh.submesh_count(),
    })?;

    let corners = expand_triangles(indices);
    out.clear();
    out.reserve(corners.len());

    for (corner, &index) in corners.iter().enumerate() {
        let vertex = build_corner(mesh, index).ok_or(ReshapeError::PositionOutOfRange {
            corner,
            index,
            len: mesh.vertex_count(),
        })?;
        out.push(vertex);
    }

    log::trace!(
        "Reshaped submesh {}: {} triangles -> {} corners",
        submesh,
        indices.len() / 3,
        out.len()
    );
    Ok(())
}

/// Look up every attribute of one source vertex, applying channel defaults
///
/// Returns `None` when the vertex has no position.
fn build_corner(mesh: &SourceMesh, index: u32) -> Option<CornerVertex> {
    let i = index as usize;
    let position = mesh.positions().get(i)?;

    Some(CornerVertex {
        position: (*position).into(),
        color: mesh.colors().get(i).copied().unwrap_or(CornerVertex::DEFAULT_COLOR),
        normal: mesh
            .normals()
            .get(i)
            .map_or(CornerVertex::DEFAULT_NORMAL, |n| (*n).into()),
        tangent: mesh
            .tangents()
            .get(i)
            .map_or(CornerVertex::DEFAULT_TANGENT, |t| (*t).into()),
        uv0: mesh.uv0().get(i).map_or(CornerVertex::DEFAULT_UV, |uv| (*uv).into()),
        uv1: mesh.uv1().get(i).map_or(CornerVertex::DEFAULT_UV, |uv| (*uv).into()),
    })
}
