//! Scene graph and headless host
//!
//! A small node hierarchy plus adapters that let the proxy renderer run against
//! it without any GPU backend.

pub mod graph;
pub mod headless;

pub use graph::{FlatPrimitive, NodeKey, SceneError, SceneGraph, SceneNode, SurfaceComponent};
pub use headless::{
    share, SceneOverlayOracle, SceneRenderable, SceneRenderableFactory, SceneSurface, SharedMeshSlot,
    SharedScene,
};
