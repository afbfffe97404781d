//! # Rendering Data & Collaborators
//!
//! Everything the proxy needs to turn a submeshed mesh into flat primitives:
//!
//! - [`SourceMesh`] and [`Material`] - the inputs, owned by the host
//! - [`CornerVertex`] - the flat vertex record handed to each primitive
//! - [`reshape`] - triangle list to four-corner stream conversion
//! - [`SubmeshRenderables`] - pooled submesh index -> renderable map
//! - [`FlatRenderable`], [`RenderableFactory`], [`SurfaceRenderer`] - the
//!   host-side renderer interfaces

pub mod material;
pub mod mesh;
pub mod renderable;
pub mod reshape;
pub mod submesh_renderables;
pub mod vertex;

pub use material::{Material, SharedMaterial};
pub use mesh::SourceMesh;
pub use renderable::{FlatRenderable, RenderableError, RenderableFactory, SurfaceRenderer};
pub use reshape::{reshape_submesh, reshape_submesh_into, ReshapeError, CORNERS_PER_TRIANGLE};
pub use submesh_renderables::{RenderablePool, SubmeshRenderables, SyncReport};
pub use vertex::{Color32, CornerVertex};
