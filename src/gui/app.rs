use std::path::{Path, PathBuf};

use anyhow::Result;
use eframe::CreationContext;
use egui::{Context, Key, KeyboardShortcut, Modifiers, Ui, ViewportCommand};
use log::{error, info, warn};
use rfd::FileDialog;

use super::theme::{apply_theme, Theme};
use super::tree_panel::{TreeEvent, TreePanel};
use crate::edit::EditOutcome;
use crate::editor::TocEditor;
use crate::error::TocError;
use crate::view::ItemTree;

const NEW_ENTRY_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::N);
const EDIT_ENTRY_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::E);
const MAX_RECENT_FILES: usize = 10;

/// The outline editor window
pub struct TocEditorApp {
    editor: Option<TocEditor<ItemTree>>,
    tree_panel: TreePanel,
    recent_files: Vec<PathBuf>,
    status: String,
    theme: Theme,
}

impl TocEditorApp {
    pub fn new(cc: &CreationContext, editor: Option<TocEditor<ItemTree>>) -> Self {
        // Apply custom theme
        let theme = Theme::Light;
        apply_theme(&cc.egui_ctx, theme);

        // Load recent files if available
        let recent_files = load_recent_files().unwrap_or_else(|e| {
            warn!("Could not load recent files: {}", e);
            Vec::new()
        });

        let status = match &editor {
            Some(editor) => format!("{} entries", editor.tree().len()),
            None => String::new(),
        };

        // Create the app
        Self {
            editor,
            tree_panel: TreePanel::new(),
            recent_files,
            status,
            theme,
        }
    }

    /// Replace the current document with the outline of `path`
    fn open(&mut self, path: PathBuf) {
        match TocEditor::open(&path, ItemTree::new()) {
            Ok(editor) => {
                self.status = format!("{} entries", editor.tree().len());
                self.editor = Some(editor);
                self.tree_panel.close_editor();
                add_to_recent_files(&mut self.recent_files, path);
            }
            Err(e) => {
                error!("Failed to open {}: {}", path.display(), e);
                self.status = format!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    /// Draw the top menu bar
    fn menu_bar(&mut self, ui: &mut Ui, ctx: &Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open PDF...").clicked() {
                    ui.close_menu();
                    if let Ok(path) = choose_file() {
                        self.open(path);
                    }
                }

                ui.menu_button("Recent Files", |ui| {
                    let mut chosen = None;
                    for path in &self.recent_files {
                        let name = path.file_name().unwrap_or_default().to_string_lossy();
                        if ui.button(name.to_string()).clicked() {
                            chosen = Some(path.clone());
                        }
                    }
                    if self.recent_files.is_empty() {
                        ui.label("No recent files");
                    }
                    if let Some(path) = chosen {
                        ui.close_menu();
                        self.open(path);
                    }
                });

                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let new_entry = egui::Button::new("New Entry")
                    .shortcut_text(ctx.format_shortcut(&NEW_ENTRY_SHORTCUT));
                if ui.add(new_entry).clicked() {
                    self.new_entry();
                    ui.close_menu();
                }

                let edit_entry = egui::Button::new("Edit Entry")
                    .shortcut_text(ctx.format_shortcut(&EDIT_ENTRY_SHORTCUT));
                if ui.add(edit_entry).clicked() {
                    self.edit_entry();
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.radio_value(&mut self.theme, Theme::Light, "Light Theme").clicked() {
                    apply_theme(ctx, self.theme);
                    ui.close_menu();
                }
                if ui.radio_value(&mut self.theme, Theme::Dark, "Dark Theme").clicked() {
                    apply_theme(ctx, self.theme);
                    ui.close_menu();
                }
            });
        });
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        // The label editor owns the keyboard while open
        if self.tree_panel.is_editing() {
            return;
        }
        if ctx.input_mut(|i| i.consume_shortcut(&NEW_ENTRY_SHORTCUT)) {
            self.new_entry();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&EDIT_ENTRY_SHORTCUT)) {
            self.edit_entry();
        }
    }

    fn new_entry(&mut self) {
        if let Some(editor) = &mut self.editor {
            if editor.new_entry().is_none() {
                self.status = "Select an entry first".to_string();
            }
        }
    }

    fn edit_entry(&mut self) {
        if let Some(editor) = &mut self.editor {
            if editor.edit_entry().is_none() {
                self.status = "Select an entry first".to_string();
            }
        }
    }

    fn handle_tree_events(&mut self, events: Vec<TreeEvent>) {
        let Some(editor) = &mut self.editor else {
            return;
        };

        for event in events {
            match event {
                TreeEvent::SelectionChanging(item) => editor.on_selection_changing(item),
                TreeEvent::EditRequested(item) => {
                    // Only one label editor at a time
                    if let Some(previous) = self.tree_panel.editing_item() {
                        editor.on_cancel_edit(previous);
                    }
                    editor.view_mut().select(item);
                    editor.on_begin_edit(item);
                    self.tree_panel.open_editor(editor.view(), item);
                }
                TreeEvent::EditFinished { item, candidate } => {
                    let end = editor.on_end_edit(item, &candidate);
                    editor.view_mut().finish_edit(item, &candidate, end.verdict);
                    self.status = match end.outcome {
                        EditOutcome::Committed { title, page_number } => {
                            format!("'{}' now points at page {}", title, page_number)
                        }
                        EditOutcome::Rejected { reason } => reason,
                        EditOutcome::Unmapped => String::new(),
                    };
                }
                TreeEvent::EditCancelled(item) => editor.on_cancel_edit(item),
            }
        }
    }

    fn status_text(&self) -> String {
        let selected = self
            .editor
            .as_ref()
            .and_then(|editor| editor.selected_entry())
            .map(|entry| format!("{} (page {})", entry.title, entry.page_number));

        match selected {
            Some(selected) if self.status.is_empty() => selected,
            Some(selected) => format!("{}  |  {}", selected, self.status),
            None => self.status.clone(),
        }
    }
}

impl eframe::App for TocEditorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        // Draw the menu bar
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.menu_bar(ui, ctx);
        });

        // Draw the status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.status_text());
        });

        // Draw the outline tree, collecting what the user did to it
        let mut events = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| match &mut self.editor {
            Some(editor) => events = self.tree_panel.show(ui, editor.view_mut()),
            None => {
                ui.label("Open a PDF from the File menu");
            }
        });

        if !events.is_empty() {
            self.handle_tree_events(events);
            ctx.request_repaint();
        }
    }
}

/// Ask the user for a PDF file
pub fn choose_file() -> std::result::Result<PathBuf, TocError> {
    FileDialog::new()
        .set_title("Select a PDF file")
        .add_filter("PDF files", &["pdf"])
        .pick_file()
        .ok_or(TocError::NoFileSelected)
}

fn recent_files_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pdftoc").join("recent_files.txt"))
}

/// Load recent files from storage
fn load_recent_files() -> Result<Vec<PathBuf>> {
    // Try to load from config directory
    let path = match recent_files_path() {
        Some(path) if path.exists() => path,
        _ => return Ok(Vec::new()),
    };

    // Read file contents
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Save recent files to storage
fn save_recent_files(recent_files: &[PathBuf]) -> Result<()> {
    let Some(path) = recent_files_path() else {
        return Ok(());
    };
    // Create directory if it doesn't exist
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let content = recent_files
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("\n");
    std::fs::write(path, content)?;
    Ok(())
}

/// Move `path` to the front of the recent files list and persist it
pub fn add_to_recent_files(recent_files: &mut Vec<PathBuf>, path: PathBuf) {
    recent_files.retain(|p| p != &path);
    recent_files.insert(0, path);
    recent_files.truncate(MAX_RECENT_FILES);

    if let Err(e) = save_recent_files(recent_files) {
        warn!("Could not save recent files: {}", e);
    }
}

/// Open the outline at startup, remembering the file on success
pub fn open_initial(path: &Path) -> crate::error::Result<TocEditor<ItemTree>> {
    let editor = TocEditor::open(path, ItemTree::new())?;
    let mut recent_files = load_recent_files().unwrap_or_default();
    add_to_recent_files(&mut recent_files, path.to_path_buf());
    info!("Showing outline of {}", editor.file_name());
    Ok(editor)
}
