//! Inputs the proxy reads from its host every tick

use crate::render::mesh::SourceMesh;
use std::sync::Arc;

/// Supplies the mesh currently assigned to the proxy
///
/// The returned reference is compared by identity between ticks, so a host
/// should hand out the same `Arc` until the mesh is actually replaced.
pub trait MeshSource {
    /// Current mesh, if any
    fn current_mesh(&self) -> Option<Arc<SourceMesh>>;
}

/// Answers whether the proxy is parented under an overlay root
pub trait OverlayOracle {
    /// Whether the proxy currently sits inside a 2D overlay
    fn is_in_overlay(&self) -> bool;
}

impl MeshSource for Option<Arc<SourceMesh>> {
    fn current_mesh(&self) -> Option<Arc<SourceMesh>> {
        self.clone()
    }
}

impl OverlayOracle for bool {
    fn is_in_overlay(&self) -> bool {
        *self
    }
}
