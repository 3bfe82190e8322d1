use std::{fs, path::Path, sync::OnceLock};

use anyhow::{bail, Context, Result};
use glob::Pattern;
use pindex_plugin_sdk::DESCRIPTOR_SUFFIX;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Naming conventions the generator relies on, optionally overridden from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Glob matched against file names in the input directory.
    pub archive_pattern: String,
    /// Glob matched against file names at the root of each extracted archive.
    pub descriptor_pattern: String,
    pub work_dir_prefix: String,
    pub icon_extension: String,
    pub plugins_segment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_pattern: "*.plugin.zip".into(),
            descriptor_pattern: format!("*{DESCRIPTOR_SUFFIX}"),
            work_dir_prefix: "pindex-".into(),
            icon_extension: "png".into(),
            plugins_segment: "plugins".into(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let expanded = interpolate_env(&raw);
        let cfg = toml::from_str::<Config>(&expanded)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates structural invariants and provides actionable error messages.
    pub fn validate(&self) -> Result<()> {
        validate_pattern("archive_pattern", &self.archive_pattern)?;
        validate_pattern("descriptor_pattern", &self.descriptor_pattern)?;
        if self.work_dir_prefix.trim().is_empty() {
            bail!("work_dir_prefix must not be empty");
        }
        if self.work_dir_prefix.contains(['/', '\\']) {
            bail!(
                "work_dir_prefix `{}` must not contain path separators",
                self.work_dir_prefix
            );
        }
        if self.icon_extension.trim().is_empty() {
            bail!("icon_extension must not be empty");
        }
        if self.plugins_segment.trim_matches('/').is_empty() {
            bail!("plugins_segment must not be empty");
        }
        Ok(())
    }

    pub fn archive_matcher(&self) -> Result<Pattern> {
        Pattern::new(&self.archive_pattern)
            .with_context(|| format!("invalid archive_pattern `{}`", self.archive_pattern))
    }

    pub fn descriptor_matcher(&self) -> Result<Pattern> {
        Pattern::new(&self.descriptor_pattern)
            .with_context(|| format!("invalid descriptor_pattern `{}`", self.descriptor_pattern))
    }
}

fn validate_pattern(key: &str, pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        bail!("{key} must not be empty");
    }
    if pattern.contains(['/', '\\']) {
        bail!("{key} `{pattern}` must match file names, not paths");
    }
    Pattern::new(pattern).with_context(|| format!("invalid {key} `{pattern}`"))?;
    Ok(())
}

fn interpolate_env(input: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let regex = RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z0-9_]+)(?::([^}]+))?\}").expect("interpolation regex is valid")
    });
    let result = regex.replace_all(input, |caps: &regex::Captures| {
        let key = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(key).unwrap_or_else(|_| default.to_string())
    });
    result.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert!(cfg.archive_matcher().unwrap().matches("lastfm.plugin.zip"));
        assert!(!cfg.archive_matcher().unwrap().matches("lastfm.zip"));
        assert!(cfg.descriptor_matcher().unwrap().matches("LastFm.plugin.json"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(r#"archive_pattern = "pkg-*.zip""#).unwrap();
        assert_eq!(cfg.archive_pattern, "pkg-*.zip");
        assert_eq!(cfg.descriptor_pattern, Config::default().descriptor_pattern);
    }

    #[test]
    fn rejects_path_patterns_and_bad_globs() {
        let mut cfg = Config {
            archive_pattern: "sub/*.zip".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
        cfg.archive_pattern = "[*.zip".into();
        assert!(cfg.validate().is_err());
        cfg.archive_pattern = "*.zip".into();
        cfg.work_dir_prefix = " ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bundled_example_matches_defaults() {
        let raw = interpolate_env(include_str!("../../../pindex.example.toml"));
        let cfg: Config = toml::from_str(&raw).unwrap();
        if std::env::var("PINDEX_ARCHIVE_PATTERN").is_err() {
            assert_eq!(cfg, Config::default());
        }
    }

    #[test]
    fn interpolation_falls_back_to_default() {
        let out = interpolate_env(r#"archive_pattern = "${PINDEX_TEST_UNSET_VAR:*.pkg.zip}""#);
        assert_eq!(out, r#"archive_pattern = "*.pkg.zip""#);
    }

    #[test]
    fn load_reads_and_expands_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pindex.toml");
        fs::write(
            &path,
            "descriptor_pattern = \"${PINDEX_TEST_UNSET_DESC:*.desc.json}\"\nicon_extension = \"svg\"\n",
        )
        .unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.descriptor_pattern, "*.desc.json");
        assert_eq!(cfg.icon_extension, "svg");
    }
}
