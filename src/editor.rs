use std::path::Path;

use log::{debug, info};

use crate::binding::ViewBinding;
use crate::edit::{self, EditProtocol, EndEdit};
use crate::error::Result;
use crate::outline::PdfOutline;
use crate::toc::{TocNode, TocTree};
use crate::view::{ItemHandle, TreeView};

/// Read a PDF's outline into a `TocTree`
pub fn load_toc(path: &Path) -> Result<TocTree> {
    let pdf = PdfOutline::open(path)?;
    let outline = pdf.parse_outline()?;
    TocTree::build(&outline, &pdf)
}

/// An open document's outline shown in a tree view, with the edit callbacks wired up
pub struct TocEditor<V: TreeView> {
    file_name: String,
    tree: TocTree,
    binding: ViewBinding,
    protocol: EditProtocol,
    view: V,
}

impl<V: TreeView> TocEditor<V> {
    /// Show `tree` in `view` under a root item labelled with the file name
    pub fn new(file_name: impl Into<String>, mut tree: TocTree, mut view: V) -> Self {
        let file_name = file_name.into();
        let mut binding = ViewBinding::new();
        binding.attach(&mut view, &file_name, &mut tree);

        Self {
            file_name,
            tree,
            binding,
            protocol: EditProtocol::new(),
            view,
        }
    }

    pub fn open(path: &Path, view: V) -> Result<Self> {
        let tree = load_toc(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Opened {} with {} outline entries", file_name, tree.len());
        Ok(Self::new(file_name, tree, view))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn tree(&self) -> &TocTree {
        &self.tree
    }

    pub fn binding(&self) -> &ViewBinding {
        &self.binding
    }

    pub fn protocol(&self) -> &EditProtocol {
        &self.protocol
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The outline entry behind the selected item, if it has one
    pub fn selected_entry(&self) -> Option<&TocNode> {
        let item = self.view.selection()?;
        let node = self.binding.node_for(item)?;
        self.tree.get(node)
    }

    pub fn on_selection_changing(&mut self, item: ItemHandle) {
        debug!("Selection changing to {:?}", item);
    }

    pub fn on_begin_edit(&mut self, item: ItemHandle) -> bool {
        self.protocol
            .begin_edit(&self.tree, &self.binding, &mut self.view, item)
    }

    pub fn on_end_edit(&mut self, item: ItemHandle, candidate: &str) -> EndEdit {
        self.protocol
            .end_edit(&mut self.tree, &self.binding, &mut self.view, item, candidate)
    }

    pub fn on_cancel_edit(&mut self, item: ItemHandle) {
        self.protocol
            .cancel_edit(&self.tree, &self.binding, &mut self.view, item);
    }

    /// Ctrl+N
    pub fn new_entry(&mut self) -> Option<ItemHandle> {
        edit::insert_new_child(&mut self.view)
    }

    /// Ctrl+E
    pub fn edit_entry(&mut self) -> Option<ItemHandle> {
        edit::edit_selected(&mut self.view)
    }
}
