//! Scenario tests driving the proxy against the headless scene host


use super::*;
use crate::foundation::math::Vec3;
use crate::render::material::Material;
use crate::scene::{
    share, FlatPrimitive, NodeKey, SceneGraph, SceneOverlayOracle, SceneRenderableFactory, SceneSurface,
    SharedMeshSlot, SharedScene,
};

/// Proxy wired to a scene with a world root and an overlay canvas root
struct Harness {
    scene: SharedScene,
    world: NodeKey,
    canvas: NodeKey,
    node: NodeKey,
    mesh: SharedMeshSlot,
    oracle: SceneOverlayOracle,
    proxy: ProxyRenderer<SceneRenderableFactory, SceneSurface>,
}

impl Harness {
    fn new(config: ProxyConfig) -> Self {
        Self::build(config, None)
    }

    fn with_creation_limit(config: ProxyConfig, limit: usize) -> Self {
        Self::build(config, Some(limit))
    }

    fn build(config: ProxyConfig, creation_limit: Option<usize>) -> Self {
        let mut graph = SceneGraph::new();
        let world = graph.create_node("world");
        let canvas = graph.create_node("canvas");
        graph.set_overlay_root(canvas, true).unwrap();
        let node = graph.create_child(world, "proxy").unwrap();
        let scene = share(graph);

        let mut factory = SceneRenderableFactory::new(scene.clone(), node);
        if let Some(limit) = creation_limit {
            factory = factory.fail_after(limit);
        }
        let mut proxy = ProxyRenderer::new(factory, SceneSurface::new(scene.clone(), node), &config);
        proxy.set_materials(materials(&["front", "sides"]));

        Self {
            oracle: SceneOverlayOracle::new(scene.clone(), node),
            mesh: SharedMeshSlot::new(Some(Arc::new(mesh_with_submeshes(&[1, 2])))),
            scene,
            world,
            canvas,
            node,
            proxy,
        }
    }

    fn enter_overlay(&self) {
        self.scene.borrow_mut().set_parent(self.node, Some(self.canvas)).unwrap();
    }

    fn leave_overlay(&self) {
        self.scene.borrow_mut().set_parent(self.node, Some(self.world)).unwrap();
    }

    fn tick(&mut self) -> Result<TickOutcome, ProxyError> {
        self.proxy.tick(&self.mesh, &self.oracle)
    }

    fn primitive(&self, index: usize) -> FlatPrimitive {
        self.proxy.renderable(index).unwrap().primitive().unwrap()
    }

    fn primitive_node(&self, index: usize) -> NodeKey {
        self.proxy.renderable(index).unwrap().node()
    }

    /// Primitive nodes parented to the proxy, active or pooled
    fn primitive_nodes(&self) -> usize {
        self.scene.borrow().children(self.node).len()
    }

    fn active_primitives(&self) -> usize {
        self.scene.borrow().active_primitives(self.node)
    }
}

/// Mesh whose submesh `i` holds `triangles[i]` triangles over a shared quad
fn mesh_with_submeshes(triangles: &[usize]) -> SourceMesh {
    let mut mesh = SourceMesh::new(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ]);
    for &count in triangles {
        let indices = [[0, 1, 2], [2, 3, 0]].iter().cycle().take(count).flatten().copied().collect();
        mesh = mesh.with_submesh(indices);
    }
    mesh
}

fn materials(names: &[&str]) -> Vec<SharedMaterial> {
    names.iter().map(|name| Material::new(*name).shared()).collect()
}
