use std::collections::HashMap;

/// Opaque identity the tree view assigns to each displayed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(u64);

impl ItemHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Answer given to the view when a label edit finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditVerdict {
    /// Keep the text the user typed as the new label
    Accept,
    /// Discard the typed text; the label was already set by the handler
    Veto,
}

/// The operations the outline editor needs from a tree widget
pub trait TreeView {
    fn add_root(&mut self, label: &str) -> ItemHandle;
    fn append_child(&mut self, parent: ItemHandle, label: &str) -> ItemHandle;
    /// Insert a new child of `parent` right after its child `after`
    fn insert_child(&mut self, parent: ItemHandle, after: ItemHandle, label: &str) -> ItemHandle;
    fn set_label(&mut self, item: ItemHandle, text: &str);
    fn label(&self, item: ItemHandle) -> Option<&str>;
    fn expand(&mut self, item: ItemHandle);
    fn selection(&self) -> Option<ItemHandle>;
    fn parent(&self, item: ItemHandle) -> Option<ItemHandle>;
    /// Ask the view to start a label edit on `item`
    fn edit_label(&mut self, item: ItemHandle);
}

#[derive(Debug, Clone)]
struct Item {
    label: String,
    parent: Option<ItemHandle>,
    children: Vec<ItemHandle>,
    expanded: bool,
}

/// In-memory tree of labelled items, rendered by the desktop panel
#[derive(Debug, Default)]
pub struct ItemTree {
    items: HashMap<ItemHandle, Item>,
    root: Option<ItemHandle>,
    next_id: u64,
    selection: Option<ItemHandle>,
    edit_request: Option<ItemHandle>,
}

impl ItemTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, label: &str, parent: Option<ItemHandle>) -> ItemHandle {
        // Handles are never reused, even after `clear`
        self.next_id += 1;
        let handle = ItemHandle(self.next_id);
        self.items.insert(
            handle,
            Item {
                label: label.to_string(),
                parent,
                children: Vec::new(),
                expanded: false,
            },
        );
        handle
    }

    pub fn root(&self) -> Option<ItemHandle> {
        self.root
    }

    pub fn children(&self, item: ItemHandle) -> &[ItemHandle] {
        self.items
            .get(&item)
            .map(|item| item.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, item: ItemHandle) -> bool {
        self.items.contains_key(&item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_expanded(&self, item: ItemHandle) -> bool {
        self.items.get(&item).map_or(false, |item| item.expanded)
    }

    pub fn toggle(&mut self, item: ItemHandle) {
        if let Some(item) = self.items.get_mut(&item) {
            item.expanded = !item.expanded;
        }
    }

    pub fn select(&mut self, item: ItemHandle) {
        if self.items.contains_key(&item) {
            self.selection = Some(item);
        }
    }

    /// The item a label edit was requested for, if any, clearing the request
    pub fn take_edit_request(&mut self) -> Option<ItemHandle> {
        self.edit_request.take()
    }

    pub fn pending_edit(&self) -> Option<ItemHandle> {
        self.edit_request
    }

    /// Apply the answer to an end-edit: accepted text becomes the label, vetoed text is dropped
    pub fn finish_edit(&mut self, item: ItemHandle, candidate: &str, verdict: EditVerdict) {
        if verdict == EditVerdict::Accept {
            self.set_label(item, candidate);
        }
    }

    /// Drop every item. Previously issued handles stay invalid.
    pub fn clear(&mut self) {
        self.items.clear();
        self.root = None;
        self.selection = None;
        self.edit_request = None;
    }
}

impl TreeView for ItemTree {
    fn add_root(&mut self, label: &str) -> ItemHandle {
        self.clear();
        let root = self.allocate(label, None);
        self.root = Some(root);
        root
    }

    fn append_child(&mut self, parent: ItemHandle, label: &str) -> ItemHandle {
        let child = self.allocate(label, Some(parent));
        if let Some(parent) = self.items.get_mut(&parent) {
            parent.children.push(child);
        }
        child
    }

    fn insert_child(&mut self, parent: ItemHandle, after: ItemHandle, label: &str) -> ItemHandle {
        let child = self.allocate(label, Some(parent));
        if let Some(parent) = self.items.get_mut(&parent) {
            let position = parent
                .children
                .iter()
                .position(|&c| c == after)
                .map_or(parent.children.len(), |index| index + 1);
            parent.children.insert(position, child);
        }
        child
    }

    fn set_label(&mut self, item: ItemHandle, text: &str) {
        if let Some(item) = self.items.get_mut(&item) {
            item.label = text.to_string();
        }
    }

    fn label(&self, item: ItemHandle) -> Option<&str> {
        self.items.get(&item).map(|item| item.label.as_str())
    }

    fn expand(&mut self, item: ItemHandle) {
        if let Some(item) = self.items.get_mut(&item) {
            item.expanded = true;
        }
    }

    fn selection(&self) -> Option<ItemHandle> {
        self.selection
    }

    fn parent(&self, item: ItemHandle) -> Option<ItemHandle> {
        self.items.get(&item).and_then(|item| item.parent)
    }

    fn edit_label(&mut self, item: ItemHandle) {
        if self.items.contains_key(&item) {
            self.selection = Some(item);
            self.edit_request = Some(item);
        }
    }
}
