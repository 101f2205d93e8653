use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use atlas_runtime::UserRegistry;
use atlas_taxonomy::Taxonomy;

/// Envelope key the taxonomy file wraps its sections in.
const TAXONOMY_ENVELOPE_KEY: &str = "Anatomie";

/// Loads the taxonomy source, degrading to an empty taxonomy when the file
/// is missing or malformed. The chat transport and the landing page have
/// independent value, so this never aborts startup.
pub(crate) fn load_taxonomy(path: &Path) -> Taxonomy {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(path = %path.display(), "taxonomy source unavailable, starting empty: {error}");
            return Taxonomy::empty();
        }
    };

    let result = match serde_json::from_str::<Value>(&raw) {
        Ok(mut document) => {
            let sections = match document.get_mut(TAXONOMY_ENVELOPE_KEY).map(Value::take) {
                Some(inner) => inner,
                None => document,
            };
            Taxonomy::from_value(sections)
        }
        Err(error) => Err(error.into()),
    };

    match result {
        Ok(taxonomy) => {
            info!(
                path = %path.display(),
                sections = taxonomy.sections().count(),
                "taxonomy loaded"
            );
            taxonomy
        }
        Err(error) => {
            warn!(path = %path.display(), "taxonomy source malformed, starting empty: {error}");
            Taxonomy::empty()
        }
    }
}

/// Restores the user registry snapshot, degrading to an empty registry when
/// the file is missing or malformed.
pub(crate) fn load_registry(path: &Path) -> UserRegistry {
    match UserRegistry::load_snapshot(path) {
        Ok(registry) => {
            info!(path = %path.display(), users = registry.len(), "user snapshot loaded");
            registry
        }
        Err(error) => {
            warn!(path = %path.display(), "user snapshot unavailable, starting empty: {error:#}");
            UserRegistry::new()
        }
    }
}
