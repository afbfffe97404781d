//! Vertex types for flat overlay primitives

use bytemuck::{Pod, Zeroable};

/// 8-bit RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color32 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color32 {
    /// Opaque white
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Opaque black
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// Build a color from its channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as normalized floats
    pub fn to_linear(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

impl Default for Color32 {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One corner of a flat primitive's vertex stream
///
/// Laid out `#[repr(C)]` without padding so a slice can be uploaded as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CornerVertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Vertex color
    pub color: Color32,
    /// Surface normal
    pub normal: [f32; 3],
    /// Tangent with handedness in `w`
    pub tangent: [f32; 4],
    /// First texture coordinate set
    pub uv0: [f32; 2],
    /// Second texture coordinate set
    pub uv1: [f32; 2],
}

impl CornerVertex {
    /// Color used when a mesh carries no usable color for a vertex
    pub const DEFAULT_COLOR: Color32 = Color32::WHITE;
    /// Normal used when a mesh carries no usable normal (forward)
    pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
    /// Tangent used when a mesh carries no usable tangent
    pub const DEFAULT_TANGENT: [f32; 4] = [0.0; 4];
    /// Texture coordinate used when a channel is missing
    pub const DEFAULT_UV: [f32; 2] = [0.0; 2];

    /// Corner at `position` with every other attribute defaulted
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            color: Self::DEFAULT_COLOR,
            normal: Self::DEFAULT_NORMAL,
            tangent: Self::DEFAULT_TANGENT,
            uv0: Self::DEFAULT_UV,
            uv1: Self::DEFAULT_UV,
        }
    }

    /// View a vertex stream as raw bytes for upload
    pub fn as_bytes(vertices: &[CornerVertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}
