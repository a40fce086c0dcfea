use crate::error::{RegistryError, RegistryErrorExt};
use crate::registry::{EventRegistry, HandlerRegistry};
use evroute_domain::config::ManifestConfig;
use tracing::info;

/// Applies a static declaration manifest, in file order.
///
/// Equivalent to calling [`EventRegistry::register_event`] and
/// [`HandlerRegistry::register_handler`] for every entry.
///
/// # Errors
/// Stops at the first entry the registries reject.
pub fn apply_manifest(
    manifest: &ManifestConfig,
    events: &mut EventRegistry,
    handlers: &mut HandlerRegistry,
) -> Result<(), RegistryError> {
    for entry in &manifest.events {
        events
            .register_event(entry.producer.as_str(), entry.routing_key.as_str())
            .context("manifest event entry")?;
    }
    for entry in &manifest.handlers {
        handlers
            .register_handler(entry.handler.as_str(), &entry.routing_keys, entry.priority)
            .context("manifest handler entry")?;
    }

    info!(
        events = manifest.events.len(),
        handlers = manifest.handlers.len(),
        "Applied declaration manifest"
    );
    Ok(())
}
