pub mod binding;
pub mod edit;
pub mod editor;
pub mod error;
pub mod outline;
pub mod toc;
pub mod view;

#[cfg(feature = "gui")]
pub mod gui;

pub use binding::ViewBinding;
pub use edit::{EditOutcome, EditProtocol, EditState, EndEdit};
pub use editor::{load_toc, TocEditor};
pub use error::{Result, TocError};
pub use outline::{Destination, OutlineElement, OutlineEntry, PageResolver, PdfOutline};
pub use toc::{NodeId, TocNode, TocTree};
pub use view::{EditVerdict, ItemHandle, ItemTree, TreeView};
