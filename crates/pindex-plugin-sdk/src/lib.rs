pub mod descriptor;

pub use descriptor::{Capability, PluginDescriptor, PluginMetadata, TypeDescriptor};

/// File name suffix the default descriptor pattern expects (`<Name>.plugin.json`).
pub const DESCRIPTOR_SUFFIX: &str = ".plugin.json";
