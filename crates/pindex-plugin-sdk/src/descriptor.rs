use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// On-disk JSON descriptor shipped inside each plugin archive, next to the plugin artifact.
///
/// It declares the artifact version and every type the artifact exports, so manifest
/// tooling can read plugin metadata without loading plugin code.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub version: Option<String>,
    pub types: Vec<TypeDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub full_name: Option<String>,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub capabilities: Vec<Capability>,
    pub metadata: Option<PluginMetadata>,
}

/// Human-facing metadata a plugin type declares about itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    pub name: String,
    pub description: String,
    pub supported_platforms: String,
}

/// Capability tags a type can declare.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Base marker shared by every plugin.
    Plugin,
    AccountManager,
    ManualScrobbler,
    AutoScrobbler,
    #[serde(other)]
    Unknown,
}

impl Capability {
    /// Every known capability extends the base plugin marker.
    pub fn implies_plugin(self) -> bool {
        !matches!(self, Capability::Unknown)
    }
}

impl PluginDescriptor {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read plugin descriptor {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse plugin descriptor {}", path.display()))
    }

    /// Concrete types that carry the plugin capability, in declaration order.
    pub fn plugin_types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter().filter(|ty| ty.is_concrete_plugin())
    }
}

impl TypeDescriptor {
    pub fn has_capability(&self, cap: Capability) -> bool {
        self.capabilities.contains(&cap)
    }

    pub fn is_concrete_plugin(&self) -> bool {
        !self.is_abstract && self.capabilities.iter().any(|c| c.implies_plugin())
    }
}

impl PluginMetadata {
    /// Splits the declared platform list on `", "`, keeping order and dropping empty tokens.
    pub fn platforms(&self) -> Vec<String> {
        self.supported_platforms
            .split(", ")
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_capabilities_do_not_mark_a_plugin() {
        let raw = r#"{
            "version": "2.0.1+g1234",
            "types": [
                { "fullName": "Acme.Helpers", "capabilities": ["telemetry"] },
                { "fullName": "Acme.Base", "abstract": true, "capabilities": ["plugin"] },
                { "fullName": "Acme.LastFm", "capabilities": ["auto-scrobbler"] }
            ]
        }"#;
        let descriptor: PluginDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(descriptor.types[0].capabilities, vec![Capability::Unknown]);
        let names: Vec<_> = descriptor
            .plugin_types()
            .map(|ty| ty.full_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Acme.LastFm"]);
    }

    #[test]
    fn metadata_requires_all_fields() {
        let raw = r#"{ "name": "LastFm", "description": "Scrobbles" }"#;
        assert!(serde_json::from_str::<PluginMetadata>(raw).is_err());
    }

    #[test]
    fn platforms_split_on_comma_space() {
        let metadata = PluginMetadata {
            name: "n".into(),
            description: "d".into(),
            supported_platforms: "Windows, Linux, Android".into(),
        };
        assert_eq!(metadata.platforms(), vec!["Windows", "Linux", "Android"]);

        let empty = PluginMetadata {
            supported_platforms: String::new(),
            ..metadata
        };
        assert!(empty.platforms().is_empty());
    }
}
