//! INI config file loading for ~/.markercluster/config.ini.
//!
//! Values found in the file overlay onto [`ClusterConfig::default`]; a
//! missing file is not an error, it simply means defaults. This is the
//! single place where INI key names are mapped to struct fields.
//!
//! Recognized layout:
//!
//! ```ini
//! [cluster]
//! enabled = true
//! min_points = 2
//! radius = 43.2
//! extent = 512
//! node_size = 64
//! min_zoom = 0
//! max_zoom = 19
//!
//! [display]
//! screen_width = 360
//!
//! [style]
//! min_cluster_size = 28
//! max_cluster_size = 44
//! font_size = 14
//! color = #F44336
//! font_color = #FFFFFF
//! font_family = Gwendolyn-Bold
//!
//! [camera]
//! zoom_enabled = false
//! animation_duration_ms = 1000
//! ceiling_overshoot = 1.1
//! split_overshoot = 0.5
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::ClusterConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// A value was present but unusable.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Default config file location: `~/.markercluster/config.ini`.
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".markercluster")
        .join("config.ini")
}

/// Load configuration from a specific path.
///
/// A missing file returns defaults.
pub(super) fn load_from(path: &Path) -> Result<ClusterConfig, ConfigFileError> {
    if !path.exists() {
        return Ok(ClusterConfig::default());
    }
    let ini = Ini::load_from_file(path)?;
    parse_ini(&ini)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(invalid(section, key, value, "expected true or false")),
    }
}

fn parse_positive_f64(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(invalid(section, key, value, "expected a positive number")),
    }
}

fn parse_f64(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(section, key, value, "expected a number")),
    }
}

fn parse_u8(section: &str, key: &str, value: &str) -> Result<u8, ConfigFileError> {
    value
        .trim()
        .parse::<u8>()
        .map_err(|_| invalid(section, key, value, "expected an integer in 0-255"))
}

fn parse_usize(section: &str, key: &str, value: &str) -> Result<usize, ConfigFileError> {
    match value.trim().parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(invalid(section, key, value, "expected a positive integer")),
    }
}

fn parse_u64(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid(section, key, value, "expected a non-negative integer"))
}

/// Parse an `Ini` object into a `ClusterConfig` by overlaying onto defaults.
fn parse_ini(ini: &Ini) -> Result<ClusterConfig, ConfigFileError> {
    let mut config = ClusterConfig::default();

    if let Some(section) = ini.section(Some("cluster")) {
        if let Some(v) = section.get("enabled") {
            config.cluster_enabled = parse_bool("cluster", "enabled", v)?;
        }
        if let Some(v) = section.get("min_points") {
            config.index.min_points = parse_usize("cluster", "min_points", v)?;
        }
        if let Some(v) = section.get("radius") {
            config.index.radius = parse_positive_f64("cluster", "radius", v)?;
        }
        if let Some(v) = section.get("extent") {
            config.index.extent = parse_positive_f64("cluster", "extent", v)?;
        }
        if let Some(v) = section.get("node_size") {
            config.index.node_size = parse_usize("cluster", "node_size", v)?;
        }
        if let Some(v) = section.get("min_zoom") {
            config.index.min_zoom = parse_u8("cluster", "min_zoom", v)?;
        }
        if let Some(v) = section.get("max_zoom") {
            config.index.max_zoom = parse_u8("cluster", "max_zoom", v)?;
        }
    }

    if let Some(section) = ini.section(Some("display")) {
        if let Some(v) = section.get("screen_width") {
            config.screen_width_px = parse_positive_f64("display", "screen_width", v)?;
            config.index.radius = config.screen_width_px * crate::index::DEFAULT_RADIUS_FRACTION;
            // An explicit [cluster] radius wins over the derived one.
            if let Some(r) = ini.section(Some("cluster")).and_then(|s| s.get("radius")) {
                config.index.radius = parse_positive_f64("cluster", "radius", r)?;
            }
        }
    }

    if let Some(section) = ini.section(Some("style")) {
        if let Some(v) = section.get("min_cluster_size") {
            config.style.min_cluster_size = parse_positive_f64("style", "min_cluster_size", v)?;
        }
        if let Some(v) = section.get("max_cluster_size") {
            config.style.max_cluster_size = parse_positive_f64("style", "max_cluster_size", v)?;
        }
        if let Some(v) = section.get("font_size") {
            config.style.base_font_size = parse_positive_f64("style", "font_size", v)?;
        }
        if let Some(v) = section.get("color") {
            let v = v.trim();
            if !v.is_empty() {
                config.style.cluster_color = v.to_string();
            }
        }
        if let Some(v) = section.get("font_color") {
            let v = v.trim();
            if !v.is_empty() {
                config.style.cluster_font_color = v.to_string();
            }
        }
        if let Some(v) = section.get("font_family") {
            let v = v.trim();
            if !v.is_empty() {
                config.style.cluster_font_family = Some(v.to_string());
            }
        }
    }

    if let Some(section) = ini.section(Some("camera")) {
        if let Some(v) = section.get("zoom_enabled") {
            config.camera.zoom_enabled = parse_bool("camera", "zoom_enabled", v)?;
        }
        if let Some(v) = section.get("animation_duration_ms") {
            config.camera.animation_duration_ms = parse_u64("camera", "animation_duration_ms", v)?;
        }
        if let Some(v) = section.get("ceiling_overshoot") {
            config.camera.ceiling_overshoot = parse_f64("camera", "ceiling_overshoot", v)?;
        }
        if let Some(v) = section.get("split_overshoot") {
            config.camera.split_overshoot = parse_f64("camera", "split_overshoot", v)?;
        }
    }

    Ok(config)
}
