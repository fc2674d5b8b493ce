use log::{debug, info, warn};

use crate::binding::ViewBinding;
use crate::error::{Result, TocError};
use crate::toc::{NodeId, TocTree};
use crate::view::{EditVerdict, ItemHandle, TreeView};

/// Joins title and page number in the label while it is being edited
pub const PAGE_SEPARATOR: char = ':';

/// Label of a freshly inserted item
pub const NEW_ENTRY_LABEL: &str = "new entry";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    /// The view owns the label text until the edit ends
    Editing { item: ItemHandle, node: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Committed { title: String, page_number: i64 },
    /// The label was rolled back to the committed title
    Rejected { reason: String },
    /// The item has no outline node behind it; nothing was changed
    Unmapped,
}

/// Result of finishing a label edit: what happened, and what to tell the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndEdit {
    pub outcome: EditOutcome,
    pub verdict: EditVerdict,
}

/// The label shown while an entry is edited, e.g. `Chapter 1:5`
pub fn edit_label_text(title: &str, page_number: i64) -> String {
    format!("{}{}{}", title, PAGE_SEPARATOR, page_number)
}

/// Split an edited label into title and page number.
///
/// Every separator splits, so a title containing `:` cannot be entered; only the first two
/// parts are used.
pub fn parse_label(candidate: &str) -> Result<(String, i64)> {
    let parts: Vec<&str> = candidate.split(PAGE_SEPARATOR).collect();
    if parts.len() < 2 {
        return Err(TocError::InvalidLabelEdit(format!(
            "'{}' has no '{}' before the page number",
            candidate, PAGE_SEPARATOR
        )));
    }

    let page_number: i64 = parts[1].trim().parse().map_err(|_| {
        TocError::InvalidLabelEdit(format!("'{}' is not a page number", parts[1]))
    })?;
    if page_number < 0 {
        return Err(TocError::InvalidLabelEdit(format!(
            "page number {} is negative",
            page_number
        )));
    }

    Ok((parts[0].to_string(), page_number))
}

/// Drives the begin-edit / end-edit exchange with the view for outline entries
#[derive(Debug, Default)]
pub struct EditProtocol {
    state: EditState,
}

impl EditProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// Expose the page number in the label before the user starts typing.
    ///
    /// Returns false, leaving the protocol idle, for items with no outline node.
    pub fn begin_edit<V: TreeView>(
        &mut self,
        tree: &TocTree,
        binding: &ViewBinding,
        view: &mut V,
        item: ItemHandle,
    ) -> bool {
        let Some((node, entry)) = binding
            .node_for(item)
            .and_then(|node| tree.get(node).map(|entry| (node, entry)))
        else {
            debug!("Begin edit on unmapped item {:?}", item);
            self.state = EditState::Idle;
            return false;
        };

        view.set_label(item, &edit_label_text(&entry.title, entry.page_number));
        self.state = EditState::Editing { item, node };
        true
    }

    /// Commit or roll back the edited label. Mapped items are always vetoed: the view shows
    /// the label set here instead of the raw text.
    pub fn end_edit<V: TreeView>(
        &mut self,
        tree: &mut TocTree,
        binding: &ViewBinding,
        view: &mut V,
        item: ItemHandle,
        candidate: &str,
    ) -> EndEdit {
        self.state = EditState::Idle;

        let Some(node) = binding.node_for(item) else {
            debug!("End edit on unmapped item {:?}, keeping '{}'", item, candidate);
            return EndEdit {
                outcome: EditOutcome::Unmapped,
                verdict: EditVerdict::Accept,
            };
        };

        let Some(entry) = tree.get_mut(node) else {
            warn!("Item {:?} is bound to a node outside this tree", item);
            return EndEdit {
                outcome: EditOutcome::Unmapped,
                verdict: EditVerdict::Accept,
            };
        };

        let outcome = match parse_label(candidate) {
            Ok((title, page_number)) => {
                entry.title = title.clone();
                entry.page_number = page_number;
                info!("Entry updated to '{}' on page {}", title, page_number);
                EditOutcome::Committed { title, page_number }
            }
            Err(err) => {
                debug!("Rejected label edit: {}", err);
                EditOutcome::Rejected {
                    reason: err.to_string(),
                }
            }
        };

        view.set_label(item, &entry.title);
        EndEdit {
            outcome,
            verdict: EditVerdict::Veto,
        }
    }

    /// The user abandoned the edit; show the committed title again
    pub fn cancel_edit<V: TreeView>(
        &mut self,
        tree: &TocTree,
        binding: &ViewBinding,
        view: &mut V,
        item: ItemHandle,
    ) {
        self.state = EditState::Idle;
        if let Some(entry) = binding.node_for(item).and_then(|node| tree.get(node)) {
            view.set_label(item, &entry.title);
        }
    }
}

/// Insert a placeholder sibling right after the selected item and start editing it.
///
/// The new item is not backed by an outline node.
pub fn insert_new_child<V: TreeView>(view: &mut V) -> Option<ItemHandle> {
    let selected = view.selection()?;
    let parent = view.parent(selected)?;
    let item = view.insert_child(parent, selected, NEW_ENTRY_LABEL);
    view.edit_label(item);
    Some(item)
}

/// Start a label edit on the selected item
pub fn edit_selected<V: TreeView>(view: &mut V) -> Option<ItemHandle> {
    let selected = view.selection()?;
    view.edit_label(selected);
    Some(selected)
}
