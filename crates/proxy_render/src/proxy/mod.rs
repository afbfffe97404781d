//! Proxy renderer
//!
//! Keeps one mesh displayed either through the host's shaded surface renderer
//! or, while the proxy sits under an overlay root, as one flat primitive per
//! submesh. Work only happens on ticks where the overlay flag, the mesh
//! reference or the material list changed since the previous tick.
//!
//! ```
//! use proxy_render::prelude::*;
//! use std::sync::Arc;
//!
//! let mut graph = SceneGraph::new();
//! let canvas = graph.create_node("canvas");
//! graph.set_overlay_root(canvas, true).unwrap();
//! let node = graph.create_child(canvas, "proxy").unwrap();
//! let scene = share(graph);
//!
//! let mut proxy = ProxyRenderer::new(
//!     SceneRenderableFactory::new(scene.clone(), node),
//!     SceneSurface::new(scene.clone(), node),
//!     &ProxyConfig::default(),
//! );
//! proxy.set_materials(vec![Material::new("front").shared(), Material::new("sides").shared()]);
//!
//! let mesh = SharedMeshSlot::new(Some(Arc::new(SourceMesh::cube())));
//! let oracle = SceneOverlayOracle::new(scene.clone(), node);
//! let outcome = proxy.tick(&mesh, &oracle).unwrap();
//! assert_eq!(outcome, TickOutcome::Rebuilt { mode: RenderMode::Overlay, submeshes: 2 });
//! ```

pub mod host;

#[cfg(test)]
mod tests;

pub use host::{MeshSource, OverlayOracle};

use crate::core::config::ProxyConfig;
use crate::render::material::SharedMaterial;
use crate::render::mesh::SourceMesh;
use crate::render::renderable::{FlatRenderable, RenderableError, RenderableFactory, SurfaceRenderer};
use crate::render::reshape::{reshape_submesh, ReshapeError};
use crate::render::submesh_renderables::SubmeshRenderables;
use crate::render::vertex::Color32;
use crate::sync::{same_instance, ChangeMonitor, PoolStats};
use std::sync::Arc;
use thiserror::Error;

/// How the mesh is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Shaded 3D surface through the host renderer
    Standard,
    /// One flat primitive per submesh
    Overlay,
}

/// Result of a successful tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No watched input changed; nothing was touched
    Unchanged,
    /// Inputs changed and the display was rebuilt
    Rebuilt {
        /// Mode after the rebuild
        mode: RenderMode,
        /// Submeshes now displayed
        submeshes: usize,
    },
}

/// Errors that fail a tick
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// A flat renderable could not be created
    #[error(transparent)]
    Renderable(#[from] RenderableError),

    /// A submesh could not be converted to flat vertices
    #[error(transparent)]
    Reshape(#[from] ReshapeError),

    /// The mesh has more submeshes than there are materials
    #[error("No material for submesh {index} ({available} materials assigned)")]
    MissingMaterial {
        /// First submesh without a material
        index: usize,
        /// Length of the material list
        available: usize,
    },
}

/// Everything the change monitor watches
///
/// Lives as long as the proxy so the material list is read in place instead of
/// being copied every tick.
struct FrameInputs {
    in_overlay: bool,
    mesh: Option<Arc<SourceMesh>>,
    materials: Vec<SharedMaterial>,
}

/// Displays a mesh through whichever renderer fits the proxy's context
pub struct ProxyRenderer<F: RenderableFactory, S: SurfaceRenderer> {
    monitor: ChangeMonitor<FrameInputs>,
    inputs: FrameInputs,
    renderables: SubmeshRenderables<F::Handle>,
    surface: S,
    mode: Option<RenderMode>,
}

impl<F: RenderableFactory, S: SurfaceRenderer> ProxyRenderer<F, S> {
    /// Create a proxy with its own renderable pool
    pub fn new(factory: F, surface: S, config: &ProxyConfig) -> Self {
        let mut monitor: ChangeMonitor<FrameInputs> =
            ChangeMonitor::new(config.assume_changed_on_first_evaluation);
        monitor.watch(|inputs: &FrameInputs| inputs.in_overlay);
        monitor.watch_with(|inputs: &FrameInputs| inputs.mesh.clone(), same_instance);
        monitor.watch_array(|inputs| inputs.materials.as_slice());

        Self {
            monitor,
            inputs: FrameInputs {
                in_overlay: false,
                mesh: None,
                materials: Vec::new(),
            },
            renderables: SubmeshRenderables::from_factory(factory, config.pool_capacity.limit()),
            surface,
            mode: None,
        }
    }

    /// Replace the material list, one entry per submesh
    pub fn set_materials(&mut self, materials: Vec<SharedMaterial>) {
        self.inputs.materials = materials;
    }

    /// Current material list
    pub fn materials(&self) -> &[SharedMaterial] {
        &self.inputs.materials
    }

    /// Run one synchronization pass
    ///
    /// Does nothing unless the overlay flag, the mesh reference or the material
    /// list changed since the previous tick. A failed tick leaves the previous
    /// display in place and the next tick tries again.
    pub fn tick(
        &mut self,
        mesh_source: &impl MeshSource,
        oracle: &impl OverlayOracle,
    ) -> Result<TickOutcome, ProxyError> {
        self.inputs.in_overlay = oracle.is_in_overlay();
        self.inputs.mesh = mesh_source.current_mesh();

        if !self.monitor.evaluate(&self.inputs) {
            return Ok(TickOutcome::Unchanged);
        }

        let mode = if self.inputs.in_overlay {
            RenderMode::Overlay
        } else {
            RenderMode::Standard
        };
        if self.mode != Some(mode) {
            log::info!("Proxy render mode {:?} -> {:?}", self.mode, mode);
        }

        let mesh = self.inputs.mesh.clone();
        let materials = self.inputs.materials.clone();
        let rebuilt = match mode {
            RenderMode::Overlay => self.rebuild_overlay(mesh.as_deref(), &materials),
            RenderMode::Standard => Ok(self.rebuild_standard(mesh.as_deref(), &materials)),
        };
        let submeshes = match rebuilt {
            Ok(submeshes) => submeshes,
            Err(e) => {
                log::warn!("Proxy rebuild in {:?} mode failed: {}", mode, e);
                self.monitor.invalidate();
                return Err(e);
            }
        };
        self.mode = Some(mode);

        log::debug!("Rebuilt proxy in {:?} mode with {} submeshes", mode, submeshes);
        Ok(TickOutcome::Rebuilt { mode, submeshes })
    }

    /// Show one flat primitive per submesh
    ///
    /// Materials are checked and every submesh is reshaped before anything is
    /// touched. A renderable creation failure can still leave extra handles
    /// mapped, but they stay inactive and the surface stays attached.
    fn rebuild_overlay(
        &mut self,
        mesh: Option<&SourceMesh>,
        materials: &[SharedMaterial],
    ) -> Result<usize, ProxyError> {
        let count = match mesh {
            Some(mesh) if !materials.is_empty() => mesh.submesh_count(),
            _ => 0,
        };
        if count > materials.len() {
            return Err(ProxyError::MissingMaterial {
                index: materials.len(),
                available: materials.len(),
            });
        }

        let mut streams = Vec::with_capacity(count);
        if let Some(mesh) = mesh.filter(|_| count > 0) {
            for issue in mesh.validate() {
                log::warn!("Mesh attribute issue: {}", issue);
            }
            for index in 0..count {
                streams.push(reshape_submesh(mesh, index)?);
            }
        }

        let report = self.renderables.sync_to(count)?;
        if !report.is_noop() {
            log::debug!(
                "Flat renderables: {} acquired, {} retired",
                report.acquired,
                report.retired
            );
        }

        if self.surface.is_attached() {
            self.surface.detach();
        }

        for (((_, handle), vertices), material) in self.renderables.iter_mut().zip(streams).zip(materials) {
            handle.set_material(Arc::clone(material));
            handle.set_vertices(vertices);
            handle.set_color(Color32::WHITE);
            handle.set_alpha(1.0);
            handle.set_active(true);
        }

        Ok(count)
    }

    fn rebuild_standard(&mut self, mesh: Option<&SourceMesh>, materials: &[SharedMaterial]) -> usize {
        let disposed = self.renderables.teardown_all();
        if disposed > 0 {
            log::debug!("Disposed {} flat renderables", disposed);
        }

        self.surface.attach();
        self.surface.set_materials(materials);
        mesh.map_or(0, SourceMesh::submesh_count)
    }

    /// Force the next tick to rebuild even if no input changed
    pub fn invalidate(&mut self) {
        self.monitor.invalidate();
    }

    /// Dispose every renderable, pooled or active, and detach the surface
    ///
    /// The proxy stays usable; the next tick rebuilds from scratch.
    pub fn shutdown(&mut self) {
        self.renderables.shutdown();
        if self.surface.is_attached() {
            self.surface.detach();
        }
        if self.mode.take().is_some() {
            log::info!("Proxy renderer shut down");
        }
        self.monitor.invalidate();
    }

    /// Mode of the last successful rebuild
    pub fn mode(&self) -> Option<RenderMode> {
        self.mode
    }

    /// Number of submeshes with an active flat renderable
    pub fn active_submeshes(&self) -> usize {
        self.renderables.len()
    }

    /// Flat renderable for a submesh
    pub fn renderable(&self, index: usize) -> Option<&F::Handle> {
        self.renderables.get(index)
    }

    /// Released renderables waiting for reuse
    pub fn idle_pool_len(&self) -> usize {
        self.renderables.pool().idle_len()
    }

    /// Lifetime counters of the renderable pool
    pub fn pool_stats(&self) -> PoolStats {
        self.renderables.pool().stats()
    }

    /// The shaded surface renderer
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the shaded surface renderer
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<F: RenderableFactory, S: SurfaceRenderer> Drop for ProxyRenderer<F, S> {
    fn drop(&mut self) {
        self.renderables.shutdown();
    }
}

impl<F: RenderableFactory, S: SurfaceRenderer> std::fmt::Debug for ProxyRenderer<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyRenderer")
            .field("mode", &self.mode)
            .field("materials", &self.inputs.materials.len())
            .field("renderables", &self.renderables)
            .field("monitor", &self.monitor)
            .finish()
    }
}
