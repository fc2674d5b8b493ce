use egui::{Key, ScrollArea, TextEdit, Ui};

use crate::view::{ItemHandle, ItemTree, TreeView};

/// Notifications raised by the tree panel, in the order the user caused them
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    SelectionChanging(ItemHandle),
    EditRequested(ItemHandle),
    EditFinished { item: ItemHandle, candidate: String },
    EditCancelled(ItemHandle),
}

/// Inline single-line editor over one item's label
struct LabelEditor {
    item: ItemHandle,
    buffer: String,
    needs_focus: bool,
}

/// Draws an `ItemTree` as collapsible rows with inline label editing
#[derive(Default)]
pub struct TreePanel {
    editor: Option<LabelEditor>,
}

enum RowAction {
    Toggle(ItemHandle),
    Select(ItemHandle),
}

impl TreePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editing_item(&self) -> Option<ItemHandle> {
        self.editor.as_ref().map(|editor| editor.item)
    }

    /// Start editing `item`, seeded with its current label
    pub fn open_editor(&mut self, tree: &ItemTree, item: ItemHandle) {
        self.editor = Some(LabelEditor {
            item,
            buffer: tree.label(item).unwrap_or_default().to_string(),
            needs_focus: true,
        });
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub fn show(&mut self, ui: &mut Ui, tree: &mut ItemTree) -> Vec<TreeEvent> {
        let mut events = Vec::new();
        let mut actions = Vec::new();

        if let Some(item) = tree.take_edit_request() {
            events.push(TreeEvent::EditRequested(item));
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match tree.root() {
                Some(root) => self.show_item(ui, tree, root, &mut events, &mut actions),
                None => {
                    ui.label("No outline available");
                }
            });

        for action in actions {
            match action {
                RowAction::Toggle(item) => tree.toggle(item),
                RowAction::Select(item) => tree.select(item),
            }
        }

        events
    }

    fn show_item(
        &mut self,
        ui: &mut Ui,
        tree: &ItemTree,
        item: ItemHandle,
        events: &mut Vec<TreeEvent>,
        actions: &mut Vec<RowAction>,
    ) {
        let children = tree.children(item).to_vec();
        let expanded = tree.is_expanded(item);

        ui.horizontal(|ui| {
            if children.is_empty() {
                ui.add_space(18.0);
            } else {
                let icon = if expanded { "▼" } else { "▶" };
                if ui.small_button(icon).clicked() {
                    actions.push(RowAction::Toggle(item));
                }
            }

            let label = tree.label(item).unwrap_or_default();
            match self.editor.as_mut().filter(|editor| editor.item == item) {
                Some(editor) => {
                    let response = ui.add(
                        TextEdit::singleline(&mut editor.buffer).desired_width(f32::INFINITY),
                    );
                    if editor.needs_focus {
                        response.request_focus();
                        editor.needs_focus = false;
                    }

                    // Enter and Escape both surrender focus
                    if response.lost_focus() {
                        if ui.input(|i| i.key_pressed(Key::Escape)) {
                            events.push(TreeEvent::EditCancelled(item));
                        } else {
                            events.push(TreeEvent::EditFinished {
                                item,
                                candidate: editor.buffer.clone(),
                            });
                        }
                        self.editor = None;
                    }
                }
                None => {
                    let response = ui.selectable_label(tree.selection() == Some(item), label);
                    if response.clicked() && tree.selection() != Some(item) {
                        events.push(TreeEvent::SelectionChanging(item));
                        actions.push(RowAction::Select(item));
                    }
                    if response.double_clicked() {
                        events.push(TreeEvent::EditRequested(item));
                    }
                }
            }
        });

        if expanded && !children.is_empty() {
            ui.indent(item.raw(), |ui| {
                for child in children {
                    self.show_item(ui, tree, child, events, actions);
                }
            });
        }
    }
}
