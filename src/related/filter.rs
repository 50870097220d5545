//! Namespace exclusion.

use crate::config::CollectorConfig;

/// True iff package skipping is enabled and `qualified_name` starts with one
/// of the configured (non-empty) exclusion prefixes.
pub fn should_skip(qualified_name: &str, config: &CollectorConfig) -> bool {
    if !config.skip_java_packages {
        return false;
    }
    config
        .excluded_packages
        .iter()
        .any(|prefix| !prefix.is_empty() && qualified_name.starts_with(prefix.as_str()))
}
