//! Source mesh data consumed by the proxy renderer
//!
//! A [`SourceMesh`] is the read-only, per-tick view of the mesh the proxy keeps
//! in sync: vertex positions, optional per-vertex attribute channels, and one
//! triangle index list per submesh. Each submesh is drawn with the material at
//! the same index in the proxy's material list.
//!
//! Optional channels are expected to be either empty or exactly as long as the
//! position list. Consumers never fail on a short channel; they fall back to a
//! per-attribute default instead (see [`crate::render::reshape`]).

use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::vertex::Color32;

/// Triangle mesh split into material submeshes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    positions: Vec<Vec3>,
    colors: Vec<Color32>,
    normals: Vec<Vec3>,
    tangents: Vec<Vec4>,
    uv0: Vec<Vec2>,
    uv1: Vec<Vec2>,
    submeshes: Vec<Vec<u32>>,
}

impl SourceMesh {
    /// Create a mesh from vertex positions with no submeshes
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            ..Default::default()
        }
    }

    /// Set per-vertex colors
    pub fn with_colors(mut self, colors: Vec<Color32>) -> Self {
        self.colors = colors;
        self
    }

    /// Set per-vertex normals
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    /// Set per-vertex tangents
    pub fn with_tangents(mut self, tangents: Vec<Vec4>) -> Self {
        self.tangents = tangents;
        self
    }

    /// Set the first texture coordinate channel
    pub fn with_uv0(mut self, uv0: Vec<Vec2>) -> Self {
        self.uv0 = uv0;
        self
    }

    /// Set the second texture coordinate channel
    pub fn with_uv1(mut self, uv1: Vec<Vec2>) -> Self {
        self.uv1 = uv1;
        self
    }

    /// Append a submesh given as a triangle list
    pub fn with_submesh(mut self, indices: Vec<u32>) -> Self {
        self.submeshes.push(indices);
        self
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex colors (may be empty)
    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    /// Per-vertex normals (may be empty)
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Per-vertex tangents (may be empty)
    pub fn tangents(&self) -> &[Vec4] {
        &self.tangents
    }

    /// First texture coordinate channel (may be empty)
    pub fn uv0(&self) -> &[Vec2] {
        &self.uv0
    }

    /// Second texture coordinate channel (may be empty)
    pub fn uv1(&self) -> &[Vec2] {
        &self.uv1
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of submeshes
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Triangle index list of a submesh
    pub fn submesh(&self, index: usize) -> Option<&[u32]> {
        self.submeshes.get(index).map(Vec::as_slice)
    }

    /// Number of whole triangles in a submesh
    pub fn triangle_count(&self, index: usize) -> Option<usize> {
        self.submesh(index).map(|indices| indices.len() / 3)
    }

    /// Report attribute channels that are neither empty nor vertex-count long
    ///
    /// Returns the names of the offending channels; an empty list means the
    /// mesh is well formed.
    pub fn validate(&self) -> Vec<&'static str> {
        let count = self.vertex_count();
        let channels = [
            ("colors", self.colors.len()),
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("uv0", self.uv0.len()),
            ("uv1", self.uv1.len()),
        ];

        channels
            .into_iter()
            .filter(|&(_, len)| len != 0 && len != count)
            .map(|(name, _)| name)
            .collect()
    }

    /// Create a test cube split into two submeshes
    ///
    /// Unit cube centered at the origin with vertices at ±1.0 on each axis.
    /// Submesh 0 holds the front and back faces (4 triangles), submesh 1 the
    /// four side faces (8 triangles). Normals point away from the center along
    /// z, colors are opaque white.
    pub fn cube() -> Self {
        let positions = vec![
            // Front face
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            // Back face
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ];

        let normals = vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];

        let uv0 = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
        ];

        let caps = vec![
            // Front
            0, 1, 2, 2, 3, 0,
            // Back
            4, 5, 6, 6, 7, 4,
        ];

        let sides = vec![
            // Left
            4, 0, 3, 3, 5, 4,
            // Right
            1, 7, 6, 6, 2, 1,
            // Top
            3, 2, 6, 6, 5, 3,
            // Bottom
            4, 7, 1, 1, 0, 4,
        ];

        Self::new(positions)
            .with_colors(vec![Color32::WHITE; 8])
            .with_normals(normals)
            .with_uv0(uv0)
            .with_submesh(caps)
            .with_submesh(sides)
    }
}
