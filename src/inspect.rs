use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::warn;
use pdftoc::{PdfOutline, TocTree};
use walkdir::WalkDir;

/// Print every outline, each headed by its file name
pub fn show(input_paths: &[PathBuf]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in collect_pdf_paths(input_paths)? {
        let (tree, _) = read_outline(&path)?;
        writeln!(out, "== {}", path.display())?;
        if tree.is_empty() {
            writeln!(out, "(no outline)")?;
        }
        tree.write_text(&mut out)?;
    }
    Ok(())
}

/// Print outline entry and page counts per file
pub fn count(input_paths: &[PathBuf]) -> Result<()> {
    for path in collect_pdf_paths(input_paths)? {
        let (tree, pages) = read_outline(&path)?;
        println!("{}: {} entries, {} pages", path.display(), tree.len(), pages);
    }
    Ok(())
}

fn read_outline(path: &Path) -> Result<(TocTree, usize)> {
    let pdf = PdfOutline::open(path).with_context(|| format!("reading {}", path.display()))?;
    let outline = pdf.parse_outline()?;
    let tree = TocTree::build(&outline, &pdf)
        .with_context(|| format!("building the outline of {}", path.display()))?;
    Ok((tree, pdf.page_count()))
}

/// Collect all PDF file paths from the provided input paths
fn collect_pdf_paths(input_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut pdf_paths = Vec::new();

    for path in input_paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                if is_pdf(entry.path()) {
                    pdf_paths.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() && is_pdf(path) {
            pdf_paths.push(path.clone());
        } else {
            warn!("Skipping invalid path: {}", path.display());
        }
    }

    pdf_paths.sort();
    pdf_paths.dedup();

    if pdf_paths.is_empty() {
        bail!("No PDF files found in the provided paths");
    }
    Ok(pdf_paths)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
}
