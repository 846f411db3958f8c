//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

#[rustfmt::skip]
const DEFS: &[DefTuple] = &[
    ("DEFAULT_DENSITY", "127",  "Threshold fill for newly loaded images and brush value (0-255)"),
    ("BRUSH_RADIUS",    "10",   "Brush radius in image pixels"),
    ("SAMPLE_CHANNEL",  "luma", "Source channel compared against thresholds: luma or red"),
    ("OUTPUT_DIR",      "out",  "Directory for preview PNGs, report and print payload"),
    ("FEED_LINES",      "3",    "Paper lines fed after each printed copy"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn test_defaults_are_valid() {
        for def in DEFAULT_SETTINGS.values() {
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "default for {} is invalid",
                def.key
            );
            assert!(!def.description.is_empty());
        }
    }

    #[test]
    fn test_get_default() {
        assert_eq!(get_default("DEFAULT_DENSITY"), Some("127"));
        assert_eq!(get_default("NOPE"), None);
    }
}
