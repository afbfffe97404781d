//! # Proxy Render
//!
//! Displays a submeshed mesh either as a shaded 3D surface or, when the object
//! is parented under a 2D overlay, as one flat vertex-colored primitive per
//! submesh.
//!
//! ## Features
//!
//! - **Change gating**: rebuilds only when the overlay flag, mesh or materials change
//! - **Pooled renderables**: flat primitives are reused across rebuilds
//! - **Flat reshaping**: triangle lists become four-corner vertex streams with attribute defaults
//! - **Headless host**: an in-memory scene graph to run everything without a GPU
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proxy_render::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProxyConfig::load_from_file("proxy.toml")?;
//!     proxy_render::foundation::logging::init_with_level(&config.log_level);
//!
//!     let mut graph = SceneGraph::new();
//!     let node = graph.create_node("proxy");
//!     let scene = share(graph);
//!
//!     let mut proxy = ProxyRenderer::new(
//!         SceneRenderableFactory::new(scene.clone(), node),
//!         SceneSurface::new(scene.clone(), node),
//!         &config,
//!     );
//!     proxy.set_materials(vec![Material::default().shared()]);
//!
//!     let mesh = SharedMeshSlot::new(Some(Arc::new(SourceMesh::cube())));
//!     let oracle = SceneOverlayOracle::new(scene, node);
//!     proxy.tick(&mesh, &oracle)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod sync;
pub mod render;
pub mod scene;
pub mod proxy;

pub use proxy::{ProxyRenderer, ProxyError, RenderMode, TickOutcome};

/// Common imports for proxy users
pub mod prelude {
    pub use crate::{
        core::{Config, ConfigError, PoolCapacity, ProxyConfig},
        foundation::math::{Transform, Vec2, Vec3, Vec4},
        proxy::{MeshSource, OverlayOracle, ProxyError, ProxyRenderer, RenderMode, TickOutcome},
        render::{
            Color32, CornerVertex, FlatRenderable, Material, RenderableError, RenderableFactory,
            SharedMaterial, SourceMesh, SurfaceRenderer,
        },
        scene::{
            share, SceneGraph, SceneOverlayOracle, SceneRenderableFactory, SceneSurface, SharedMeshSlot,
        },
        sync::{ChangeMonitor, ObjectPool},
    };
}
