// skylark_core/src/paths.rs

use nalgebra::Point3;
use std::collections::BTreeMap;

use crate::types::SceneHandle;

/// Speed handed to a freshly assigned follow behavior, in m/s.
pub const FOLLOW_SPEED: f64 = 10.0;

/// One waypoint on a named path. `display_name` is the scene-authored node
/// name that behavior anchors refer to; it is not required to be unique
/// across paths.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub display_name: String,
    /// World-space position of the node.
    pub position: Point3<f64>,
    /// The scene object this node was harvested from.
    pub handle: SceneHandle,
}

/// A named, ordered waypoint structure. Node keys are unique within one
/// path only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    nodes: BTreeMap<String, PathNode>,
}

impl Path {
    pub fn insert_node(&mut self, key: impl Into<String>, node: PathNode) {
        self.nodes.insert(key.into(), node);
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PathNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The world's navigation registry: path name -> path. Read-only from the
/// spawn pipeline's perspective; only the scene harvester fills it.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    paths: BTreeMap<String, Path>,
}

impl PathRegistry {
    /// Adds a node to the named path, creating the path on first use.
    pub fn insert_node(&mut self, path_name: &str, key: impl Into<String>, node: PathNode) {
        self.paths
            .entry(path_name.to_string())
            .or_default()
            .insert_node(key, node);
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        self.paths.get(name)
    }

    pub fn paths(&self) -> impl Iterator<Item = (&String, &Path)> {
        self.paths.iter()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn node_count(&self) -> usize {
        self.paths.values().map(Path::len).sum()
    }

    /// Scans every path, then every node, for the first node whose display
    /// name equals `anchor`.
    ///
    /// Iteration order is an implementation detail: when the same display
    /// name appears on several paths, which one wins is deliberately left
    /// unspecified to callers. The only guarantee is "some match", and that
    /// an unchanged registry always resolves the same name to the same
    /// node.
    pub fn resolve_anchor(&self, anchor: &str) -> Option<&PathNode> {
        self.paths
            .values()
            .flat_map(Path::nodes)
            .find(|node| node.display_name == anchor)
    }
}
