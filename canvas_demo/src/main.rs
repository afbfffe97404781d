//! Canvas proxy demo
//!
//! Runs a proxy renderer against the headless scene host and walks it through
//! the standard -> overlay -> shrink -> standard sequence, logging what each
//! tick did. Pass a `.toml` or `.ron` config path as the first argument to
//! override the defaults.

use proxy_render::foundation::logging;
use proxy_render::prelude::*;
use proxy_render::scene::{NodeKey, SceneError, SharedScene};
use std::sync::Arc;

struct CanvasDemo {
    scene: SharedScene,
    world: NodeKey,
    canvas: NodeKey,
    node: NodeKey,
    mesh: SharedMeshSlot,
    oracle: SceneOverlayOracle,
    proxy: ProxyRenderer<SceneRenderableFactory, SceneSurface>,
}

impl CanvasDemo {
    fn new(config: &ProxyConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mut graph = SceneGraph::new();
        let world = graph.create_node("world");
        let canvas = graph.create_node("canvas");
        graph.set_overlay_root(canvas, true)?;
        let node = graph.create_child(world, "cube proxy")?;
        let scene = share(graph);

        let mut proxy = ProxyRenderer::new(
            SceneRenderableFactory::new(scene.clone(), node),
            SceneSurface::new(scene.clone(), node),
            config,
        );
        proxy.set_materials(vec![
            Material::new("caps").with_color(0.9, 0.3, 0.2).shared(),
            Material::new("sides").with_color(0.2, 0.4, 0.9).shared(),
        ]);

        Ok(Self {
            oracle: SceneOverlayOracle::new(scene.clone(), node),
            mesh: SharedMeshSlot::new(Some(Arc::new(SourceMesh::cube()))),
            scene,
            world,
            canvas,
            node,
            proxy,
        })
    }

    fn step(&mut self, label: &str) -> Result<(), ProxyError> {
        let outcome = self.proxy.tick(&self.mesh, &self.oracle)?;
        let scene = self.scene.borrow();
        log::info!(
            "{:<16} {:?} | flat primitives: {} active, {} pooled | surface attached: {}",
            label,
            outcome,
            scene.active_primitives(self.node),
            self.proxy.idle_pool_len(),
            self.proxy.surface().is_attached(),
        );
        Ok(())
    }

    fn reparent(&self, parent: NodeKey) -> Result<(), SceneError> {
        self.scene.borrow_mut().set_parent(self.node, Some(parent))
    }

    fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.step("standard")?;
        self.step("idle")?;

        self.reparent(self.canvas)?;
        self.step("overlay")?;

        let cube = SourceMesh::cube();
        let caps_only = SourceMesh::new(cube.positions().to_vec())
            .with_colors(cube.colors().to_vec())
            .with_normals(cube.normals().to_vec())
            .with_uv0(cube.uv0().to_vec())
            .with_submesh(cube.submesh(0).map(<[u32]>::to_vec).unwrap_or_default());
        self.mesh.set(Arc::new(caps_only));
        self.step("shrink")?;

        self.mesh.set(Arc::new(cube));
        self.step("regrow")?;

        self.reparent(self.world)?;
        self.step("standard again")?;

        self.proxy.shutdown();
        log::info!("Scene nodes after shutdown: {}", self.scene.borrow().node_count());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => ProxyConfig::load_from_file(&path)?,
        None => ProxyConfig::default(),
    };
    config.validate()?;

    logging::init_with_level(&config.log_level);
    log::info!("Starting canvas proxy demo with {:?}", config);

    let mut demo = CanvasDemo::new(&config)?;
    demo.run()?;

    log::info!("Demo finished");
    Ok(())
}
