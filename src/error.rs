use std::io;
use thiserror::Error;

/// Errors produced while loading an outline or editing its entries
#[derive(Debug, Error)]
pub enum TocError {
    /// The user closed the file picker without choosing a file
    #[error("no file selected")]
    NoFileSelected,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The outline or one of its destinations could not be read
    #[error("PDF read error: {0}")]
    PdfRead(String),

    /// A nested outline sequence appeared before any entry at its level
    #[error("malformed outline: nested entries at position {position} have no owning entry")]
    MalformedOutline { position: usize },

    #[error("invalid label edit: {0}")]
    InvalidLabelEdit(String),
}

pub type Result<T> = std::result::Result<T, TocError>;
