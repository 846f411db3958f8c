//! Setting value validation.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use density_engine::SampleChannel;

static RE_IMAGE_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(png|jpe?g|bmp)$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "DEFAULT_DENSITY" => validate_int_range(value, 0, 255)?,
        "BRUSH_RADIUS" => validate_int_range(value, 0, 4096)?,
        "FEED_LINES" => validate_int_range(value, 0, 255)?,
        "SAMPLE_CHANNEL" => {
            value.parse::<SampleChannel>()?;
        }
        "OUTPUT_DIR" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Whether a file name has one of the accepted image extensions.
pub fn is_allowed_image(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| RE_IMAGE_FILE.is_match(n))
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.trim().parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
