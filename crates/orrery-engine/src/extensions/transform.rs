// extensions/transform.rs
//
// Transform hierarchy: an arena of nodes with parent/children index lists.
// Knows nothing about orbits or spin; bodies write local transforms into it
// and read composed world transforms back.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   let sun = graph.insert(LocalTransform::default());
//   let earth = graph.insert(LocalTransform::new().with_offset(Vec3::X * 100.0));
//   graph.set_parent(earth, sun)?;
//   graph.propagate(&mut world);

use glam::{Quat, Vec3};
use crate::api::error::ConfigurationError;
use crate::api::types::BodyId;

/// Group transform of a node, relative to its parent (or the origin for roots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    /// Translation relative to the parent group.
    pub offset: Vec3,
    /// Orientation of the group. Children's offsets are rotated by it.
    pub rotation: Quat,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Composed transform in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl WorldTransform {
    /// Compose a child's local transform onto this one.
    #[inline]
    pub fn compose(&self, local: &LocalTransform) -> WorldTransform {
        WorldTransform {
            position: self.position + self.rotation * local.offset,
            rotation: self.rotation * local.rotation,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<BodyId>,
    children: Vec<BodyId>,
    local: LocalTransform,
}

/// Arena transform hierarchy. Nodes are never removed, so ids stay dense.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: Vec<TransformNode>,
    /// Nodes with no parent, in insertion order.
    roots: Vec<BodyId>,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node and return its id.
    pub fn insert(&mut self, local: LocalTransform) -> BodyId {
        let id = BodyId(self.nodes.len() as u32);
        self.nodes.push(TransformNode {
            local,
            ..TransformNode::default()
        });
        self.roots.push(id);
        id
    }

    /// Attach `child` under `parent`. A node gets a parent once; attaching
    /// a node to itself or to one of its own descendants is rejected.
    pub fn set_parent(&mut self, child: BodyId, parent: BodyId) -> Result<(), ConfigurationError> {
        self.check(child)?;
        self.check(parent)?;
        if child == parent {
            return Err(ConfigurationError::SelfSatellite(child));
        }
        if let Some(existing) = self.nodes[child.index()].parent {
            return Err(ConfigurationError::AlreadyAttached { parent: existing, child });
        }
        if self.is_ancestor(child, parent) {
            return Err(ConfigurationError::SatelliteCycle { parent, child });
        }

        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        self.roots.retain(|&r| r != child);
        Ok(())
    }

    /// Whether `ancestor` appears on the parent chain of `id` (or is `id`).
    pub fn is_ancestor(&self, ancestor: BodyId, id: BodyId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current.index()).and_then(|n| n.parent);
        }
        false
    }

    pub fn local(&self, id: BodyId) -> Option<&LocalTransform> {
        self.nodes.get(id.index()).map(|n| &n.local)
    }

    pub fn local_mut(&mut self, id: BodyId) -> Option<&mut LocalTransform> {
        self.nodes.get_mut(id.index()).map(|n| &mut n.local)
    }

    pub fn parent(&self, id: BodyId) -> Option<BodyId> {
        self.nodes.get(id.index()).and_then(|n| n.parent)
    }

    pub fn children(&self, id: BodyId) -> &[BodyId] {
        self.nodes
            .get(id.index())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[BodyId] {
        &self.roots
    }

    /// Compose world transforms from the roots down. `world` is resized to
    /// the node count and indexed by id.
    pub fn propagate(&self, world: &mut Vec<WorldTransform>) {
        world.resize(self.nodes.len(), WorldTransform::default());
        for &root in &self.roots {
            self.propagate_recursive(root, WorldTransform::default(), world);
        }
    }

    fn propagate_recursive(&self, id: BodyId, parent: WorldTransform, world: &mut [WorldTransform]) {
        let node = &self.nodes[id.index()];
        let current = parent.compose(&node.local);
        world[id.index()] = current;
        for &child in &node.children {
            self.propagate_recursive(child, current, world);
        }
    }

    /// Number of nodes in the hierarchy.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn check(&self, id: BodyId) -> Result<(), ConfigurationError> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownBody(id))
        }
    }
}
