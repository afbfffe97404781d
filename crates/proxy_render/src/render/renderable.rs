//! Renderer collaborator traits
//!
//! Defines the interface between the proxy and whatever actually draws things.
//! Keeps the proxy independent of the host's scene graph and GPU backend.

use crate::render::material::SharedMaterial;
use crate::render::vertex::{Color32, CornerVertex};
use thiserror::Error;

/// Errors raised by renderable factories and handles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderableError {
    /// The factory could not produce a new renderable
    #[error("Failed to create renderable: {reason}")]
    Creation {
        /// Reason for the failure
        reason: String,
    },

    /// The backing object no longer exists
    #[error("Renderable backing object was already disposed")]
    Disposed,
}

/// One directly drawn, vertex-colored primitive
///
/// Handles are pooled, so every setter may be called on a handle that
/// previously displayed a different submesh.
pub trait FlatRenderable {
    /// Assign the material used for the whole primitive
    fn set_material(&mut self, material: SharedMaterial);

    /// Replace the vertex stream
    fn set_vertices(&mut self, vertices: Vec<CornerVertex>);

    /// Uniform tint multiplied into every vertex color
    fn set_color(&mut self, color: Color32);

    /// Uniform opacity
    fn set_alpha(&mut self, alpha: f32);

    /// Start or stop drawing the primitive
    fn set_active(&mut self, active: bool);

    /// Whether the primitive is currently drawn
    fn is_active(&self) -> bool;
}

/// Creates and destroys flat renderables for one proxy
///
/// Factories are cheap handles onto the host; the proxy clones one into its
/// pool's creation and disposal agents.
pub trait RenderableFactory: Clone + 'static {
    /// Handle type produced by this factory
    type Handle: FlatRenderable + 'static;

    /// Create a new renderable attached to the proxy's node at identity offset
    fn create(&self) -> Result<Self::Handle, RenderableError>;

    /// Destroy a renderable and its backing object
    fn dispose(&self, handle: Self::Handle);
}

/// The standard 3D shaded-surface renderer attached to the proxy's node
pub trait SurfaceRenderer {
    /// Attach the renderer if it is not attached yet
    fn attach(&mut self);

    /// Detach and destroy the renderer if attached
    fn detach(&mut self);

    /// Whether the renderer is currently attached
    fn is_attached(&self) -> bool;

    /// Assign the material list, one per submesh
    fn set_materials(&mut self, materials: &[SharedMaterial]);
}
