use std::collections::HashMap;

use log::{debug, warn};

use crate::toc::{NodeId, TocTree};
use crate::view::{ItemHandle, TreeView};

/// Two-way link between outline nodes and the view items showing them
#[derive(Debug, Default)]
pub struct ViewBinding {
    nodes: HashMap<ItemHandle, NodeId>,
}

impl ViewBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the whole forest under a fresh view root labelled `root_label`
    pub fn attach<V: TreeView>(
        &mut self,
        view: &mut V,
        root_label: &str,
        tree: &mut TocTree,
    ) -> ItemHandle {
        self.clear(tree);
        let root = view.add_root(root_label);
        let roots = tree.roots().to_vec();
        for node in roots {
            self.materialize(view, root, tree, node);
        }
        view.expand(root);
        debug!("Materialized {} outline entries", self.len());
        root
    }

    /// Create view items for `node` and its descendants under `parent`, parent first
    pub fn materialize<V: TreeView>(
        &mut self,
        view: &mut V,
        parent: ItemHandle,
        tree: &mut TocTree,
        node: NodeId,
    ) {
        let Some(entry) = tree.get_mut(node) else {
            warn!("Outline node {:?} is not part of this tree", node);
            return;
        };
        let handle = view.append_child(parent, &entry.title);
        entry.view_handle = Some(handle);
        let children = entry.children().to_vec();
        self.nodes.insert(handle, node);

        for child in children {
            self.materialize(view, handle, tree, child);
        }
    }

    /// Forget every handle, e.g. before the view is rebuilt
    pub fn clear(&mut self, tree: &mut TocTree) {
        for (_, node) in self.nodes.drain() {
            if let Some(node) = tree.get_mut(node) {
                node.view_handle = None;
            }
        }
    }

    pub fn node_for(&self, handle: ItemHandle) -> Option<NodeId> {
        self.nodes.get(&handle).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
