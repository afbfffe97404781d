//! In-memory host backed by a [`SceneGraph`]
//!
//! Implements every host collaborator the proxy needs on top of a shared scene
//! so the proxy can run without a GPU backend. Flat renderables are child nodes
//! carrying a [`FlatPrimitive`]; the surface renderer is a [`SurfaceComponent`]
//! on the proxy's own node.

use crate::proxy::host::{MeshSource, OverlayOracle};
use crate::render::material::SharedMaterial;
use crate::render::mesh::SourceMesh;
use crate::render::renderable::{FlatRenderable, RenderableError, RenderableFactory, SurfaceRenderer};
use crate::render::vertex::{Color32, CornerVertex};
use crate::scene::graph::{FlatPrimitive, NodeKey, SceneGraph, SurfaceComponent};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Scene shared between the host adapters
pub type SharedScene = Rc<RefCell<SceneGraph>>;

/// Wrap a scene for sharing between adapters
pub fn share(scene: SceneGraph) -> SharedScene {
    Rc::new(RefCell::new(scene))
}

/// Reports whether a node sits under an overlay root
#[derive(Debug, Clone)]
pub struct SceneOverlayOracle {
    scene: SharedScene,
    node: NodeKey,
}

impl SceneOverlayOracle {
    /// Oracle for `node`
    pub fn new(scene: SharedScene, node: NodeKey) -> Self {
        Self { scene, node }
    }
}

impl OverlayOracle for SceneOverlayOracle {
    fn is_in_overlay(&self) -> bool {
        self.scene.borrow().is_under_overlay(self.node)
    }
}

/// Surface renderer stored as a component on the proxy node
#[derive(Debug, Clone)]
pub struct SceneSurface {
    scene: SharedScene,
    node: NodeKey,
}

impl SceneSurface {
    /// Surface renderer for `node`
    pub fn new(scene: SharedScene, node: NodeKey) -> Self {
        Self { scene, node }
    }

    /// Materials currently assigned, if attached
    pub fn materials(&self) -> Option<Vec<SharedMaterial>> {
        let scene = self.scene.borrow();
        scene
            .node(self.node)
            .and_then(|node| node.surface.as_ref())
            .map(|surface| surface.materials.clone())
    }

    fn with_node<R>(&self, f: impl FnOnce(&mut Option<SurfaceComponent>) -> R) -> Option<R> {
        let mut scene = self.scene.borrow_mut();
        match scene.node_mut(self.node) {
            Some(node) => Some(f(&mut node.surface)),
            None => {
                log::warn!("Surface node {:?} no longer exists", self.node);
                None
            }
        }
    }
}

impl SurfaceRenderer for SceneSurface {
    fn attach(&mut self) {
        self.with_node(|surface| {
            surface.get_or_insert_with(SurfaceComponent::default);
        });
    }

    fn detach(&mut self) {
        self.with_node(|surface| *surface = None);
    }

    fn is_attached(&self) -> bool {
        let scene = self.scene.borrow();
        scene.node(self.node).map_or(false, |node| node.surface.is_some())
    }

    fn set_materials(&mut self, materials: &[SharedMaterial]) {
        let applied = self.with_node(|surface| match surface {
            Some(surface) => {
                surface.materials = materials.to_vec();
                true
            }
            None => false,
        });
        if applied == Some(false) {
            log::warn!("Ignoring material assignment on detached surface {:?}", self.node);
        }
    }
}

/// Creates flat primitives as children of the proxy node
#[derive(Debug, Clone)]
pub struct SceneRenderableFactory {
    scene: SharedScene,
    owner: NodeKey,
    remaining: Option<Rc<Cell<usize>>>,
}

impl SceneRenderableFactory {
    /// Factory parenting its primitives under `owner`
    pub fn new(scene: SharedScene, owner: NodeKey) -> Self {
        Self {
            scene,
            owner,
            remaining: None,
        }
    }

    /// Allow only `count` more creations; later ones fail
    ///
    /// The limit is shared by every clone of this factory.
    pub fn fail_after(mut self, count: usize) -> Self {
        self.remaining = Some(Rc::new(Cell::new(count)));
        self
    }

    /// Node the primitives are parented to
    pub fn owner(&self) -> NodeKey {
        self.owner
    }
}

impl RenderableFactory for SceneRenderableFactory {
    type Handle = SceneRenderable;

    fn create(&self) -> Result<SceneRenderable, RenderableError> {
        if let Some(remaining) = &self.remaining {
            if remaining.get() == 0 {
                return Err(RenderableError::Creation {
                    reason: "creation limit reached".to_string(),
                });
            }
            remaining.set(remaining.get() - 1);
        }

        let mut scene = self.scene.borrow_mut();
        let node = scene
            .create_child(self.owner, "flat primitive")
            .map_err(|e| RenderableError::Creation { reason: e.to_string() })?;
        if let Some(entry) = scene.node_mut(node) {
            entry.primitive = Some(FlatPrimitive::default());
        }

        log::debug!("Created flat primitive {:?} under {:?}", node, self.owner);
        Ok(SceneRenderable {
            scene: Rc::clone(&self.scene),
            node,
        })
    }

    fn dispose(&self, handle: SceneRenderable) {
        let removed = self.scene.borrow_mut().destroy_node(handle.node);
        if removed == 0 {
            log::warn!("Flat primitive {:?} was already destroyed", handle.node);
        } else {
            log::debug!("Destroyed flat primitive {:?}", handle.node);
        }
    }
}

/// Handle to a flat primitive node
#[derive(Debug)]
pub struct SceneRenderable {
    scene: SharedScene,
    node: NodeKey,
}

impl SceneRenderable {
    /// Backing scene node
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// Snapshot of the primitive state
    pub fn primitive(&self) -> Result<FlatPrimitive, RenderableError> {
        let scene = self.scene.borrow();
        scene
            .node(self.node)
            .and_then(|node| node.primitive.clone())
            .ok_or(RenderableError::Disposed)
    }

    fn update(&mut self, f: impl FnOnce(&mut FlatPrimitive)) {
        let mut scene = self.scene.borrow_mut();
        match scene.node_mut(self.node).and_then(|node| node.primitive.as_mut()) {
            Some(primitive) => f(primitive),
            None => log::warn!("Flat primitive {:?}: {}", self.node, RenderableError::Disposed),
        }
    }
}

impl FlatRenderable for SceneRenderable {
    fn set_material(&mut self, material: SharedMaterial) {
        self.update(|p| p.material = Some(material));
    }

    fn set_vertices(&mut self, vertices: Vec<CornerVertex>) {
        self.update(|p| p.vertices = vertices);
    }

    fn set_color(&mut self, color: Color32) {
        self.update(|p| p.color = color);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.update(|p| p.alpha = alpha);
    }

    fn set_active(&mut self, active: bool) {
        self.update(|p| p.active = active);
    }

    fn is_active(&self) -> bool {
        self.primitive().map_or(false, |p| p.active)
    }
}

/// Swappable mesh reference
///
/// Clones share the same slot, so a test or demo can keep one clone and swap
/// meshes while the proxy reads through another.
#[derive(Debug, Clone, Default)]
pub struct SharedMeshSlot {
    mesh: Rc<RefCell<Option<Arc<SourceMesh>>>>,
}

impl SharedMeshSlot {
    /// Slot holding `mesh`
    pub fn new(mesh: Option<Arc<SourceMesh>>) -> Self {
        Self {
            mesh: Rc::new(RefCell::new(mesh)),
        }
    }

    /// Replace the mesh
    pub fn set(&self, mesh: Arc<SourceMesh>) {
        *self.mesh.borrow_mut() = Some(mesh);
    }

    /// Remove the mesh
    pub fn clear(&self) {
        *self.mesh.borrow_mut() = None;
    }
}

impl MeshSource for SharedMeshSlot {
    fn current_mesh(&self) -> Option<Arc<SourceMesh>> {
        self.mesh.borrow().clone()
    }
}
