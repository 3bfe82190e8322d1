use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glob::Pattern;
use pindex_plugin_sdk::{PluginDescriptor, TypeDescriptor};

use crate::{
    classify::classify,
    manifest::{strip_build_metadata, BaseUrl, ManifestEntry},
};

const DEFAULT_VERSION: &str = "0.0.0";

/// Outcome of inspecting one extracted archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    Entries(Vec<ManifestEntry>),
    /// No descriptor inside the archive; it contributes nothing.
    Skipped,
}

/// Everything derived from the archive itself rather than from its contents.
#[derive(Debug, Clone)]
pub struct ArchiveSource<'a> {
    pub file_name: &'a str,
    pub base_name: Option<&'a str>,
    pub base_url: &'a BaseUrl,
    pub icon_extension: &'a str,
}

impl<'a> ArchiveSource<'a> {
    pub fn new(archive: &'a Path, base_url: &'a BaseUrl, icon_extension: &'a str) -> Result<Self> {
        let file_name = archive
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("archive {} has no UTF-8 file name", archive.display()))?;
        Ok(Self {
            file_name,
            base_name: archive.file_stem().and_then(|s| s.to_str()),
            base_url,
            icon_extension,
        })
    }

    fn icon_uri(&self) -> Option<String> {
        self.base_name
            .map(|stem| self.base_url.plugin_url(&format!("{stem}.{}", self.icon_extension)))
    }

    fn source_uri(&self) -> String {
        self.base_url.plugin_url(self.file_name)
    }

    fn fallback_id(&self) -> String {
        self.base_name.unwrap_or(self.file_name).to_lowercase()
    }
}

/// Finds the descriptor at the root of an extraction. With several candidates the
/// lexicographically first one is used.
pub fn find_descriptor(dir: &Path, pattern: &Pattern) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(|n| pattern.matches(n)) {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    if candidates.len() > 1 {
        tracing::warn!(
            dir = %dir.display(),
            count = candidates.len(),
            chosen = %candidates[0].display(),
            "multiple plugin descriptors found; using the first"
        );
    }
    Ok(candidates.into_iter().next())
}

pub fn inspect(dir: &Path, pattern: &Pattern, source: &ArchiveSource<'_>) -> Result<Inspection> {
    let Some(path) = find_descriptor(dir, pattern)? else {
        return Ok(Inspection::Skipped);
    };
    let descriptor = PluginDescriptor::from_path(&path)?;
    let entries = entries_from_descriptor(&descriptor, source)?;
    Ok(Inspection::Entries(entries))
}

pub fn entries_from_descriptor(
    descriptor: &PluginDescriptor,
    source: &ArchiveSource<'_>,
) -> Result<Vec<ManifestEntry>> {
    let version = strip_build_metadata(descriptor.version.as_deref().unwrap_or(DEFAULT_VERSION));
    descriptor
        .plugin_types()
        .map(|ty| build_entry(ty, version, source))
        .collect()
}

fn build_entry(ty: &TypeDescriptor, version: &str, source: &ArchiveSource<'_>) -> Result<ManifestEntry> {
    let full_name = ty.full_name.as_deref().filter(|n| !n.trim().is_empty());
    let Some(metadata) = &ty.metadata else {
        bail!(
            "plugin type `{}` in {} does not declare plugin metadata",
            full_name.unwrap_or("<unnamed>"),
            source.file_name
        );
    };
    let id = full_name.map_or_else(|| source.fallback_id(), str::to_lowercase);
    Ok(ManifestEntry {
        id,
        name: metadata.name.clone(),
        description: metadata.description.clone(),
        version: version.to_string(),
        icon_uri: source.icon_uri(),
        plugin_type: classify(ty).to_string(),
        supported_platforms: metadata.platforms(),
        source_uri: source.source_uri(),
    })
}
