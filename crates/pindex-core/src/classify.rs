use pindex_plugin_sdk::{Capability, TypeDescriptor};

/// Label used when a plugin declares none of the classified capabilities.
pub const FALLBACK_LABEL: &str = "Generic";

/// Capability to label lookup, tested top to bottom. The first hit wins, so the order
/// here decides types that declare several capabilities.
pub const CLASSIFICATION: &[(Capability, &str)] = &[
    (Capability::AccountManager, "Account Manager"),
    (Capability::ManualScrobbler, "Scrobbler"),
    (Capability::AutoScrobbler, "Scrobbler"),
];

pub fn classify(ty: &TypeDescriptor) -> &'static str {
    CLASSIFICATION
        .iter()
        .find(|(cap, _)| ty.has_capability(*cap))
        .map(|(_, label)| *label)
        .unwrap_or(FALLBACK_LABEL)
}
