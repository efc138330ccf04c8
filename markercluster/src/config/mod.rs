//! Component configuration for marker clustering.
//!
//! [`ClusterConfig`] is the top-level configuration surface: it aggregates
//! the index, style, and camera sub-configs plus the two component switches
//! (`cluster_enabled`, `zoom_enabled` via [`CameraConfig`]). Defaults mirror
//! the values the component shipped with.
//!
//! Settings can also be loaded from an INI file (see [`file`]), overlaying
//! onto these defaults.

mod file;

pub use file::{config_file_path, ConfigFileError};

use crate::camera::CameraConfig;
use crate::index::IndexConfig;
use crate::presentation::ClusterStyle;

pub use crate::index::DEFAULT_SCREEN_WIDTH_PX;

/// Top-level clustering configuration.
///
/// The screen width is explicit here so zoom derivation never reads ambient
/// display state; hosts with a real display pass their own width through
/// [`ClusterConfig::for_screen_width`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Master switch: when false the controller is a pass-through and the
    /// index is never built or queried.
    pub cluster_enabled: bool,
    /// Screen width used for zoom derivation, in pixels.
    pub screen_width_px: f64,
    /// Spatial index knobs.
    pub index: IndexConfig,
    /// Badge visual configuration.
    pub style: ClusterStyle,
    /// Camera behavior on cluster activation.
    pub camera: CameraConfig,
}

impl ClusterConfig {
    /// Defaults scaled to a concrete screen width.
    pub fn for_screen_width(screen_width_px: f64) -> Self {
        Self {
            screen_width_px,
            index: IndexConfig::for_screen_width(screen_width_px),
            ..Self::default()
        }
    }

    /// Enable or disable clustering.
    pub fn with_cluster_enabled(mut self, enabled: bool) -> Self {
        self.cluster_enabled = enabled;
        self
    }

    /// Enable or disable zoom-on-tap.
    pub fn with_zoom_enabled(mut self, enabled: bool) -> Self {
        self.camera.zoom_enabled = enabled;
        self
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cluster_enabled: true,
            screen_width_px: DEFAULT_SCREEN_WIDTH_PX,
            index: IndexConfig::default(),
            style: ClusterStyle::default(),
            camera: CameraConfig::default(),
        }
    }
}

/// Load configuration from the default path, falling back to defaults when
/// the file does not exist.
pub fn load_default() -> Result<ClusterConfig, ConfigFileError> {
    file::load_from(&config_file_path())
}

/// Load configuration from a specific INI file.
pub fn load_from(path: &std::path::Path) -> Result<ClusterConfig, ConfigFileError> {
    file::load_from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_values() {
        let config = ClusterConfig::default();

        assert!(config.cluster_enabled);
        assert!(!config.camera.zoom_enabled);
        assert_eq!(config.index.min_points, 2);
        assert_eq!(config.index.max_zoom, 19);
        assert_eq!(config.style.min_cluster_size, 28.0);
        assert_eq!(config.style.max_cluster_size, 44.0);
        assert_eq!(config.camera.animation_duration_ms, 1000);
    }

    #[test]
    fn test_for_screen_width_scales_radius() {
        let config = ClusterConfig::for_screen_width(720.0);

        assert_eq!(config.screen_width_px, 720.0);
        assert!((config.index.radius - 86.4).abs() < 1e-9);
    }
}
