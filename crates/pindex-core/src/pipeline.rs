use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::Pattern;

use crate::{
    config::Config,
    extract::extract_archive,
    inspect::{inspect, ArchiveSource, Inspection},
    locator::locate_archives,
    manifest::{BaseUrl, Manifest},
};

/// The three inputs of one generator run.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub zip_dir: PathBuf,
    pub output: PathBuf,
    pub base_url: String,
}

pub struct Pipeline {
    invocation: Invocation,
    base_url: BaseUrl,
    archive_pattern: Pattern,
    descriptor_pattern: Pattern,
    work_root: PathBuf,
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config, invocation: Invocation) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base_url: BaseUrl::new(&invocation.base_url, &config.plugins_segment),
            archive_pattern: config.archive_matcher()?,
            descriptor_pattern: config.descriptor_matcher()?,
            work_root: std::env::temp_dir(),
            invocation,
            config,
        })
    }

    /// Extracts into `root` instead of the system temp directory.
    pub fn with_work_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.work_root = root.into();
        self
    }

    /// Inspects every archive and returns the assembled manifest without writing it.
    pub fn collect(&self) -> Result<Manifest> {
        let archives = locate_archives(&self.invocation.zip_dir, &self.archive_pattern)?;
        tracing::info!(
            count = archives.len(),
            dir = %self.invocation.zip_dir.display(),
            "found plugin archives"
        );

        let mut manifest = Manifest::default();
        for archive in &archives {
            let name = archive.display().to_string();
            match self.process_archive(archive) {
                Ok(Inspection::Entries(entries)) => {
                    for entry in &entries {
                        tracing::info!(
                            id = %entry.id,
                            version = %entry.version,
                            plugin_type = %entry.plugin_type,
                            "added plugin"
                        );
                    }
                    manifest.extend(entries);
                }
                Ok(Inspection::Skipped) => {
                    tracing::warn!(
                        archive = %name,
                        pattern = %self.descriptor_pattern,
                        "no plugin descriptor at archive root; skipping archive"
                    );
                }
                Err(err) => {
                    tracing::error!(archive = %name, error = %err, "failed to inspect archive");
                    return Err(err.context(format!("failed to inspect archive {name}")));
                }
            }
        }
        if manifest.is_empty() {
            bail!(
                "none of the {} archives in {} declared a plugin",
                archives.len(),
                self.invocation.zip_dir.display()
            );
        }
        Ok(manifest)
    }

    /// Collects the manifest and writes it to the output path. Returns the entry count.
    pub async fn run(&self) -> Result<usize> {
        let manifest = self.collect()?;
        let output = &self.invocation.output;
        let written = manifest
            .write(output)
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;
        tracing::info!(entries = written, output = %output.display(), "manifest written");
        Ok(written)
    }

    pub fn output(&self) -> &Path {
        &self.invocation.output
    }

    fn process_archive(&self, archive: &Path) -> Result<Inspection> {
        let source = ArchiveSource::new(archive, &self.base_url, &self.config.icon_extension)?;
        let dir = extract_archive(archive, &self.work_root, &self.config.work_dir_prefix)?;
        tracing::debug!(archive = %archive.display(), dir = %dir.path().display(), "extracted archive");
        inspect(dir.path(), &self.descriptor_pattern, &source)
    }
}
