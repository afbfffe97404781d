//! Minimal hierarchical scene graph
//!
//! Nodes live in a slot map and link to their parent and children. A node can
//! be flagged as an overlay root (a 2D canvas); anything parented beneath one
//! is drawn through flat primitives instead of the shaded surface renderer.
//! Nodes may carry a [`FlatPrimitive`] or a [`SurfaceComponent`] payload.

use crate::foundation::math::Transform;
use crate::render::material::SharedMaterial;
use crate::render::vertex::{Color32, CornerVertex};
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Stable key of a node in a [`SceneGraph`]
    pub struct NodeKey;
}

/// Scene graph errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The key does not refer to a live node
    #[error("Scene node {0:?} does not exist")]
    NodeNotFound(NodeKey),

    /// Reparenting would make a node its own ancestor
    #[error("Parenting {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Node being moved
        child: NodeKey,
        /// Requested parent
        parent: NodeKey,
    },
}

/// Drawable state of a flat overlay primitive
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPrimitive {
    /// Material for the whole primitive
    pub material: Option<SharedMaterial>,
    /// Four corners per quad
    pub vertices: Vec<CornerVertex>,
    /// Uniform tint
    pub color: Color32,
    /// Uniform opacity
    pub alpha: f32,
    /// Whether the primitive is drawn
    pub active: bool,
}

impl Default for FlatPrimitive {
    fn default() -> Self {
        Self {
            material: None,
            vertices: Vec::new(),
            color: Color32::WHITE,
            alpha: 1.0,
            active: false,
        }
    }
}

/// Standard shaded-surface renderer attached to a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceComponent {
    /// One material per submesh
    pub materials: Vec<SharedMaterial>,
}

/// A node in the scene graph
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    /// Debug name
    pub name: String,
    /// Transform relative to the parent
    pub local: Transform,
    /// Whether this node is the root of a 2D overlay
    pub overlay_root: bool,
    /// Flat primitive payload
    pub primitive: Option<FlatPrimitive>,
    /// Shaded surface payload
    pub surface: Option<SurfaceComponent>,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl SceneNode {
    /// Parent node, if any
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Direct children
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

/// Slot-map backed node hierarchy
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root node
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeKey {
        self.nodes.insert(SceneNode {
            name: name.into(),
            ..Default::default()
        })
    }

    /// Create a node under `parent` at identity local transform
    pub fn create_child(&mut self, parent: NodeKey, name: impl Into<String>) -> Result<NodeKey, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }

        let child = self.nodes.insert(SceneNode {
            name: name.into(),
            parent: Some(parent),
            ..Default::default()
        });
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        Ok(child)
    }

    /// Move a node under a new parent (or to the root with `None`)
    pub fn set_parent(&mut self, child: NodeKey, parent: Option<NodeKey>) -> Result<(), SceneError> {
        if !self.nodes.contains_key(child) {
            return Err(SceneError::NodeNotFound(child));
        }

        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::NodeNotFound(parent));
            }
            if self.ancestors_inclusive(parent).any(|key| key == child) {
                return Err(SceneError::CycleDetected { child, parent });
            }
        }

        self.detach_from_parent(child);
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.push(child);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = parent;
        }
        Ok(())
    }

    /// Destroy a node and its whole subtree
    ///
    /// Returns the number of nodes removed (0 if the key was already gone).
    pub fn destroy_node(&mut self, key: NodeKey) -> usize {
        if !self.nodes.contains_key(key) {
            return 0;
        }

        self.detach_from_parent(key);

        let mut removed = 0;
        let mut pending = vec![key];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Flag or unflag a node as an overlay root
    pub fn set_overlay_root(&mut self, key: NodeKey, overlay_root: bool) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound(key))?;
        node.overlay_root = overlay_root;
        Ok(())
    }

    /// Whether the node or any of its ancestors is an overlay root
    pub fn is_under_overlay(&self, key: NodeKey) -> bool {
        self.ancestors_inclusive(key)
            .any(|ancestor| self.nodes.get(ancestor).map_or(false, |node| node.overlay_root))
    }

    /// Transform of a node relative to the scene root
    pub fn world_transform(&self, key: NodeKey) -> Option<Transform> {
        let chain: Vec<NodeKey> = self.ancestors_inclusive(key).collect();
        if chain.is_empty() {
            return None;
        }

        let mut world = Transform::identity();
        for ancestor in chain.iter().rev() {
            let node = self.nodes.get(*ancestor)?;
            world = world.combine(&node.local);
        }
        Some(world)
    }

    /// Node by key
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Mutable node by key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Direct children of a node (empty if the node does not exist)
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map_or(&[], |node| node.children.as_slice())
    }

    /// Flat primitives directly under a node that are currently drawn
    pub fn active_primitives(&self, key: NodeKey) -> usize {
        self.children(key)
            .iter()
            .filter_map(|child| self.nodes.get(*child))
            .filter(|node| node.primitive.as_ref().map_or(false, |p| p.active))
            .count()
    }

    /// Total number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk from a node up to its root, starting with the node itself
    fn ancestors_inclusive(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        let start = self.nodes.contains_key(key).then_some(key);
        std::iter::successors(start, move |current| {
            self.nodes.get(*current).and_then(|node| node.parent)
        })
    }

    fn detach_from_parent(&mut self, key: NodeKey) {
        let parent = self.nodes.get(key).and_then(|node| node.parent);
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.retain(|child| *child != key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_create_child_links_both_ways() {
        let mut scene = SceneGraph::new();
        let root = scene.create_node("root");
        let child = scene.create_child(root, "child").unwrap();

        assert_eq!(scene.children(root), &[child]);
        assert_eq!(scene.node(child).unwrap().parent(), Some(root));
        assert!(scene.node(child).unwrap().local.is_identity());
    }

    #[test]
    fn test_create_child_of_missing_parent() {
        let mut scene = SceneGraph::new();
        let root = scene.create_node("root");
        scene.destroy_node(root);
        assert_eq!(scene.create_child(root, "orphan"), Err(SceneError::NodeNotFound(root)));
    }

    #[test]
    fn test_overlay_detection_walks_ancestors() {
        let mut scene = SceneGraph::new();
        let canvas = scene.create_node("canvas");
        let panel = scene.create_child(canvas, "panel").unwrap();
        let item = scene.create_child(panel, "item").unwrap();
        let world = scene.create_node("world");

        assert!(!scene.is_under_overlay(item));

        scene.set_overlay_root(canvas, true).unwrap();
        assert!(scene.is_under_overlay(canvas));
        assert!(scene.is_under_overlay(item));
        assert!(!scene.is_under_overlay(world));

        scene.set_parent(panel, Some(world)).unwrap();
        assert!(!scene.is_under_overlay(item));
        assert_eq!(scene.children(world), &[panel]);
        assert!(scene.children(canvas).is_empty());
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.create_node("a");
        let b = scene.create_child(a, "b").unwrap();

        assert_eq!(
            scene.set_parent(a, Some(b)),
            Err(SceneError::CycleDetected { child: a, parent: b })
        );
        assert_eq!(
            scene.set_parent(a, Some(a)),
            Err(SceneError::CycleDetected { child: a, parent: a })
        );
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let mut scene = SceneGraph::new();
        let root = scene.create_node("root");
        let child = scene.create_child(root, "child").unwrap();
        scene.create_child(child, "grandchild").unwrap();
        let sibling = scene.create_child(root, "sibling").unwrap();

        assert_eq!(scene.destroy_node(child), 2);
        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.children(root), &[sibling]);
        assert_eq!(scene.destroy_node(child), 0);
    }

    #[test]
    fn test_world_transform_accumulates() {
        let mut scene = SceneGraph::new();
        let root = scene.create_node("root");
        let child = scene.create_child(root, "child").unwrap();
        scene.node_mut(root).unwrap().local = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        scene.node_mut(child).unwrap().local = Transform::from_position(Vec3::new(0.0, 2.0, 0.0));

        let world = scene.world_transform(child).unwrap();
        assert_relative_eq!(world.position, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_active_primitives() {
        let mut scene = SceneGraph::new();
        let root = scene.create_node("root");
        for active in [true, false, true] {
            let child = scene.create_child(root, "quad").unwrap();
            scene.node_mut(child).unwrap().primitive = Some(FlatPrimitive {
                active,
                ..Default::default()
            });
        }
        scene.create_child(root, "empty").unwrap();

        assert_eq!(scene.active_primitives(root), 2);
    }
}
