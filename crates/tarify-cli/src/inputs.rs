//! Input collection.
//!
//! Turns the paths given on the command line into the ordered list of
//! source files for one batch run. Directories are scanned one level deep
//! for `.pdf` files and their entries are sorted by name, so the
//! submission order (and with it the workbook row order) is stable across
//! runs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tarify_core::SourceFile;

use crate::TRACING_TARGET_INPUTS;

/// Collects source files from the given paths, in argument order.
pub fn collect_source_files(paths: &[PathBuf]) -> anyhow::Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            collect_from_directory(path, &mut files)?;
        } else {
            files.push(read_source_file(path)?);
        }
    }

    tracing::info!(
        target: TRACING_TARGET_INPUTS,
        files = files.len(),
        "Collected input files"
    );

    Ok(files)
}

fn collect_from_directory(dir: &Path, files: &mut Vec<SourceFile>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut pdf_paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && is_pdf(path))
        .collect();
    pdf_paths.sort();

    if pdf_paths.is_empty() {
        tracing::warn!(
            target: TRACING_TARGET_INPUTS,
            directory = %dir.display(),
            "Directory contains no PDF files"
        );
    }

    for path in pdf_paths {
        files.push(read_source_file(&path)?);
    }

    Ok(())
}

fn read_source_file(path: &Path) -> anyhow::Result<SourceFile> {
    let content =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(SourceFile::new(file_name, content))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|extension| extension.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
