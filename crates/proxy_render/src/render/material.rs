//! Per-submesh materials
//!
//! Materials are shared by reference between the proxy, its flat primitives
//! and the surface renderer. Change detection compares them by value.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Material shared between the proxy, its renderables and the surface renderer
pub type SharedMaterial = Arc<Material>;

/// Material properties assigned per submesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Linear RGB tint
    pub base_color: [f32; 3],
    /// Opacity in `0.0..=1.0`
    pub alpha: f32,
}

impl Material {
    /// Opaque white material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: [1.0; 3],
            alpha: 1.0,
        }
    }

    /// Replace the tint
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b];
        self
    }

    /// Replace the opacity, clamped to `0.0..=1.0`
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Wrap into a shareable handle
    pub fn shared(self) -> SharedMaterial {
        Arc::new(self)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default")
    }
}
