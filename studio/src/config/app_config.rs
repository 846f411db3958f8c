//! Runtime configuration loaded from defaults + environment overrides.

use std::path::PathBuf;

use density_engine::SampleChannel;

use super::defaults::get_default;
use super::validation::validate_setting;

/// Runtime configuration for a studio run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub default_density: u8,
    pub brush_radius: u32,
    pub sample_channel: SampleChannel,
    pub output_dir: PathBuf,
    pub feed_lines: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_density: density_engine::DEFAULT_DENSITY,
            brush_radius: density_engine::DEFAULT_BRUSH_RADIUS,
            sample_channel: SampleChannel::Luma,
            output_dir: PathBuf::from("out"),
            feed_lines: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or invalid values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String {
            if let Some(v) = lookup(key) {
                match validate_setting(key, &v) {
                    Ok(()) => return v.trim().to_string(),
                    Err(e) => tracing::warn!("Ignoring {key}={v:?}: {e}"),
                }
            }
            get_default(key).unwrap_or_default().to_string()
        };

        let defaults = Self::default();
        Self {
            default_density: g("DEFAULT_DENSITY")
                .parse()
                .unwrap_or(defaults.default_density),
            brush_radius: g("BRUSH_RADIUS").parse().unwrap_or(defaults.brush_radius),
            sample_channel: g("SAMPLE_CHANNEL")
                .parse()
                .unwrap_or(defaults.sample_channel),
            output_dir: PathBuf::from(g("OUTPUT_DIR")),
            feed_lines: g("FEED_LINES").parse().unwrap_or(defaults.feed_lines),
        }
    }
}
