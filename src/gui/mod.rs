mod app;
mod theme;
mod tree_panel;

pub use app::{choose_file, open_initial, TocEditorApp};
pub use tree_panel::{TreeEvent, TreePanel};
