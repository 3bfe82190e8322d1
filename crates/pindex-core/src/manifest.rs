use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One plugin as published in the generated index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
    pub plugin_type: String,
    pub supported_platforms: Vec<String>,
    pub source_uri: String,
}

/// Download location prefix; trailing slashes are dropped so joins never double up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    base: String,
    segment: String,
}

impl BaseUrl {
    pub fn new(base: &str, segment: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            segment: segment.trim_matches('/').to_string(),
        }
    }

    pub fn plugin_url(&self, file_name: &str) -> String {
        format!("{}/{}/{}", self.base, self.segment, file_name)
    }
}

/// Drops build metadata (`+...`) from a version string.
pub fn strip_build_metadata(version: &str) -> &str {
    version.split_once('+').map_or(version, |(core, _)| core)
}

/// Ordered collection of entries; insertion order is output order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ManifestEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the manifest to `path`, creating parent directories. Returns the entry count.
    pub async fn write(&self, path: &Path) -> Result<usize> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
        Ok(self.len())
    }
}
