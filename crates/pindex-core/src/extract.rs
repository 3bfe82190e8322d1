use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use zip::ZipArchive;

/// Scratch directory holding one unpacked archive; removed when dropped.
#[derive(Debug)]
pub struct ExtractionDir {
    path: PathBuf,
}

impl ExtractionDir {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ExtractionDir {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_dir_all(&self.path) {
            tracing::debug!(dir = %self.path.display(), error = %err, "failed to remove extraction dir");
        }
    }
}

/// Unpacks `archive` into `<root>/<prefix><archive base name>`, replacing any leftover
/// directory of that name from an earlier run.
pub fn extract_archive(archive: &Path, root: &Path, prefix: &str) -> Result<ExtractionDir> {
    let stem = archive
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("archive {} has no usable base name", archive.display()))?;
    let path = root.join(format!("{prefix}{stem}"));
    if path.is_dir() {
        tracing::debug!(dir = %path.display(), "removing stale extraction dir");
        fs::remove_dir_all(&path)
            .with_context(|| format!("failed to clear stale directory {}", path.display()))?;
    } else if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("failed to remove stale file {}", path.display()))?;
    }
    fs::create_dir_all(&path)
        .with_context(|| format!("failed to create extraction dir {}", path.display()))?;
    // Guard first so a failed unpack still cleans up.
    let dir = ExtractionDir { path };

    let file = File::open(archive)
        .with_context(|| format!("failed to open archive {}", archive.display()))?;
    let mut zip = ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive {}", archive.display()))?;
    zip.extract(dir.path())
        .with_context(|| format!("failed to extract {}", archive.display()))?;
    Ok(dir)
}
