use std::path::PathBuf;
use std::process;

use clap::Parser;
use eframe::{run_native, NativeOptions};
use egui::ViewportBuilder;
use log::{error, info};

use pdftoc::gui::{choose_file, open_initial, TocEditorApp};
use pdftoc::TocError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Edit the table of contents of a PDF")]
struct Args {
    /// PDF to open; a file picker is shown when omitted
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    // Initialize logging
    env_logger::init();
    let args = Args::parse();

    // Take the path from the command line or ask for one

    let path = match args.path.map(Ok).unwrap_or_else(choose_file) {
        Ok(path) => path,
        Err(TocError::NoFileSelected) => {
            info!("No file selected, exiting");
            return Ok(());
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    // Read the outline before any window opens
    let editor = match open_initial(&path) {
        Ok(editor) => editor,
        Err(e) => {
            error!("Failed to read the outline of {}: {}", path.display(), e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Set up native options
    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([500.0, 400.0])
            .with_title("PdfTocEditor"),
        ..Default::default()
    };

    // Run the app
    run_native(
        "PdfTocEditor",
        options,
        Box::new(move |cc| Box::new(TocEditorApp::new(cc, Some(editor)))),
    )
}
