use std::io::{self, Write};

use log::debug;

use crate::error::{Result, TocError};
use crate::outline::{OutlineElement, PageResolver};
use crate::view::ItemHandle;

/// Page number carried by the synthetic root used while building
pub const ROOT_PAGE_NUMBER: i64 = -1;

/// Index of a node inside its `TocTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One table of contents entry
#[derive(Debug, Clone, PartialEq)]
pub struct TocNode {
    pub title: String,
    pub page_number: i64,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) view_handle: Option<ItemHandle>,
}

impl TocNode {
    fn new(title: String, page_number: i64, parent: Option<NodeId>) -> Self {
        Self {
            title,
            page_number,
            children: Vec::new(),
            parent,
            view_handle: None,
        }
    }

    fn synthetic_root() -> Self {
        Self::new(String::new(), ROOT_PAGE_NUMBER, None)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn view_handle(&self) -> Option<ItemHandle> {
        self.view_handle
    }
}

/// The outline forest. Nodes live in a flat arena and refer to each other by `NodeId`.
#[derive(Debug, Clone, Default)]
pub struct TocTree {
    nodes: Vec<TocNode>,
    roots: Vec<NodeId>,
}

impl TocTree {
    /// Build the forest from a nested outline, resolving each entry's page on the way
    pub fn build<R: PageResolver>(outline: &[OutlineElement], resolver: &R) -> Result<Self> {
        let mut tree = Self::default();
        let mut root = TocNode::synthetic_root();
        tree.append_level(&mut root, None, outline, resolver)?;
        tree.roots = root.children;
        debug!("Built outline with {} entries, {} top level", tree.len(), tree.roots.len());
        Ok(tree)
    }

    /// Entries of this level go to `owner`, or to the synthetic `root` when `owner` is
    /// `None`. The synthetic root never enters the arena.
    fn append_level<R: PageResolver>(
        &mut self,
        root: &mut TocNode,
        owner: Option<NodeId>,
        elements: &[OutlineElement],
        resolver: &R,
    ) -> Result<()> {
        for (position, element) in elements.iter().enumerate() {
            match element {
                OutlineElement::Nested(children) => {
                    // Nested entries belong to the most recently appended sibling
                    let last = self
                        .children_mut(root, owner)
                        .last()
                        .copied()
                        .ok_or(TocError::MalformedOutline { position })?;
                    self.append_level(root, Some(last), children, resolver)?;
                }
                OutlineElement::Entry(entry) => {
                    let page_number = resolver.resolve_page_number(entry)?;
                    let id = NodeId(self.nodes.len());
                    self.nodes
                        .push(TocNode::new(entry.title.clone(), page_number, owner));
                    self.children_mut(root, owner).push(id);
                }
            }
        }
        Ok(())
    }

    fn children_mut<'a>(
        &'a mut self,
        root: &'a mut TocNode,
        owner: Option<NodeId>,
    ) -> &'a mut Vec<NodeId> {
        match owner {
            Some(id) => &mut self.nodes[id.0].children,
            None => &mut root.children,
        }
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Panics if `id` belongs to another tree; see `get` for the checked lookup
    pub fn node(&self, id: NodeId) -> &TocNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TocNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TocNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parents before children, siblings left to right
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Depth of a node, zero for top level entries
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    /// Write one `title:page` line per entry, indented two spaces per level
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for id in self.pre_order() {
            let node = self.node(id);
            writeln!(
                out,
                "{:indent$}{}:{}",
                "",
                node.title,
                node.page_number,
                indent = self.depth(id) * 2
            )?;
        }
        Ok(())
    }
}
