use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: ForceConstants,
    pub view: ViewConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConstants {
    pub min_distance: f32,
    pub separation_strength: f32,
    pub repulsion: f32,
    /// Lower bound on the distance used in the inverse-square term.
    pub min_repulsion_distance: f32,
    pub center_force: f32,
    pub attraction: f32,
    pub damping: f32,
    pub max_velocity: f32,
    pub boundary_inset: f32,
}

impl Default for ForceConstants {
    fn default() -> Self {
        Self {
            min_distance: 80.0,
            separation_strength: 0.1,
            repulsion: 5000.0,
            min_repulsion_distance: 10.0,
            center_force: 0.002,
            attraction: 0.002,
            damping: 0.9,
            max_velocity: 5.0,
            boundary_inset: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default_zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub wheel_zoom_in: f32,
    pub wheel_zoom_out: f32,
    pub button_zoom_step: f32,
    pub hit_radius: f32,
    pub node_radius: f32,
    pub selected_node_radius: f32,
    pub label_max_chars: usize,
    pub initial_viewport: [f32; 2],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_zoom: 0.8,
            min_zoom: 0.3,
            max_zoom: 3.0,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            button_zoom_step: 1.2,
            hit_radius: 20.0,
            node_radius: 4.0,
            selected_node_radius: 6.0,
            label_max_chars: 18,
            initial_viewport: [960.0, 640.0],
        }
    }
}

impl ViewConfig {
    /// Repairs zoom bounds that would make clamping panic: non-finite or
    /// non-positive bounds fall back to defaults, and reversed bounds are swapped.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        let usable = |value: f32| value.is_finite() && value > 0.0;

        if !usable(self.min_zoom) {
            self.min_zoom = defaults.min_zoom;
        }
        if !usable(self.max_zoom) {
            self.max_zoom = defaults.max_zoom;
        }
        if self.min_zoom > self.max_zoom {
            tracing::warn!(
                min_zoom = self.min_zoom,
                max_zoom = self.max_zoom,
                "zoom bounds reversed, swapping"
            );
            std::mem::swap(&mut self.min_zoom, &mut self.max_zoom);
        }
        if !usable(self.default_zoom) {
            self.default_zoom = defaults.default_zoom;
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub api_url: String,
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_owned(),
            poll_interval_secs: 3,
            timeout_secs: 120,
            request_timeout_secs: 15,
        }
    }
}

impl ExtractionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl EngineConfig {
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.view = config.view.normalized();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_path_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = EngineConfig::load_or_default(Some(&dir.path().join("absent.toml")))
            .expect("defaults");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(EngineConfig::load_or_default(None).expect("defaults"), config);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("graph.toml");
        fs::write(
            &path,
            r#"
[physics]
repulsion = 4200.0

[extraction]
api_url = "http://analysis.internal:9000"
"#,
        )
        .expect("write config");

        let config = EngineConfig::load_or_default(Some(&path)).expect("parse config");
        assert_eq!(config.physics.repulsion, 4200.0);
        assert_eq!(config.physics.min_distance, 80.0);
        assert_eq!(config.extraction.api_url, "http://analysis.internal:9000");
        assert_eq!(config.extraction.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.view, ViewConfig::default());
    }

    #[test]
    fn unusable_zoom_bounds_are_repaired() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("graph.toml");
        fs::write(
            &path,
            r#"
[view]
min_zoom = 4.0
max_zoom = 0.5
default_zoom = -1.0
"#,
        )
        .expect("write config");

        let view = EngineConfig::load_or_default(Some(&path)).expect("parse config").view;
        assert_eq!(view.min_zoom, 0.5);
        assert_eq!(view.max_zoom, 4.0);
        assert_eq!(view.default_zoom, 0.8);

        let nan = ViewConfig {
            min_zoom: f32::NAN,
            max_zoom: f32::INFINITY,
            ..ViewConfig::default()
        }
        .normalized();
        assert_eq!(nan.min_zoom, 0.3);
        assert_eq!(nan.max_zoom, 3.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("graph.toml");
        fs::write(&path, "[physics\nrepulsion = ").expect("write config");

        assert!(EngineConfig::load_or_default(Some(&path)).is_err());
    }
}
