/// Viewer configuration.
///
/// Every tunable constant of the renderer and the controls, loadable from a
/// TOML file. Missing keys fall back to their defaults, so an empty file is
/// a valid configuration.
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::projection::ProjectionParams;
use crate::raster::Rasterizer;
use crate::shade::{GlyphRamp, Shader, DEFAULT_GLYPHS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub render: RenderConfig,
    pub controls: ControlConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Horizontal stretch compensating for tall terminal cells
    pub aspect_correction: f32,
    /// Blank glyph followed by the shading ramp, dimmest first
    pub glyphs: String,
    pub degenerate_epsilon: f32,
    /// Extent substituted for a flat axis when fitting the canvas
    pub min_span: f32,
    /// Rows per rasterizer band; unset splits across the thread pool
    pub band_rows: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            aspect_correction: 2.0,
            glyphs: DEFAULT_GLYPHS.to_string(),
            degenerate_epsilon: 1e-6,
            min_span: 1.0,
            band_rows: None,
        }
    }
}

impl RenderConfig {
    pub fn projection(&self) -> ProjectionParams {
        ProjectionParams {
            aspect_correction: self.aspect_correction,
            min_span: self.min_span,
        }
    }

    pub fn rasterizer(&self) -> Rasterizer {
        Rasterizer::new(self.degenerate_epsilon, self.band_rows)
    }

    pub fn shader(&self) -> Shader {
        Shader::new(GlyphRamp::parse(&self.glyphs).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    /// Radians per rotate key press
    pub rotation_step: f32,
    /// Multiplier per zoom-in step; zoom-out divides by it
    pub zoom_factor: f32,
    pub min_zoom: f32,
    /// Radians per cell of mouse drag
    pub drag_sensitivity: f32,
    /// Radians per auto-rotate tick
    pub auto_rotate_step: f32,
    pub auto_rotate_period_ms: u64,
    pub debounce_ms: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            rotation_step: 0.1,
            zoom_factor: 1.2,
            min_zoom: 1e-3,
            drag_sensitivity: 0.01,
            auto_rotate_step: 0.01,
            auto_rotate_period_ms: 16,
            debounce_ms: 50,
        }
    }
}

impl ControlConfig {
    pub fn auto_rotate_period(&self) -> Duration {
        Duration::from_millis(self.auto_rotate_period_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

impl Config {
    /// Load configuration from a file path, or defaults when no path is given.
    ///
    /// A path that is given but unreadable or malformed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        positive("render.aspect_correction", render.aspect_correction)?;
        positive("render.degenerate_epsilon", render.degenerate_epsilon)?;
        positive("render.min_span", render.min_span)?;
        if GlyphRamp::parse(&render.glyphs).is_none() {
            return Err(ConfigError::Invalid(
                "render.glyphs needs a blank glyph and at least one shading glyph".to_string(),
            ));
        }
        if render.band_rows == Some(0) {
            return Err(ConfigError::Invalid(
                "render.band_rows must be at least 1".to_string(),
            ));
        }

        let controls = &self.controls;
        positive("controls.rotation_step", controls.rotation_step)?;
        positive("controls.min_zoom", controls.min_zoom)?;
        positive("controls.drag_sensitivity", controls.drag_sensitivity)?;
        positive("controls.auto_rotate_step", controls.auto_rotate_step)?;
        if !(controls.zoom_factor.is_finite() && controls.zoom_factor > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "controls.zoom_factor must be greater than 1, got {}",
                controls.zoom_factor
            )));
        }
        if controls.auto_rotate_period_ms == 0 {
            return Err(ConfigError::Invalid(
                "controls.auto_rotate_period_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.aspect_correction, 2.0);
        assert_eq!(config.controls.debounce(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml(
            r#"
            [render]
            glyphs = " .:-=+*#%@"
            band_rows = 4

            [controls]
            zoom_factor = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.render.glyphs, " .:-=+*#%@");
        assert_eq!(config.render.band_rows, Some(4));
        assert_eq!(config.render.shader().ramp.len(), 9);
        assert_eq!(config.controls.zoom_factor, 1.5);
        assert_eq!(config.controls.rotation_step, 0.1);
    }

    #[test]
    fn test_invalid_values() {
        for toml in [
            "[render]\naspect_correction = 0.0",
            "[render]\nglyphs = \" \"",
            "[render]\nband_rows = 0",
            "[controls]\nzoom_factor = 0.9",
            "[controls]\nmin_zoom = -1.0",
            "[controls]\nauto_rotate_period_ms = 0",
        ] {
            assert!(
                matches!(Config::from_toml(toml), Err(ConfigError::Invalid(_))),
                "{}",
                toml
            );
        }
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        assert!(matches!(
            Config::from_toml("[render]\ncolour = true"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[controls]\ndebounce_ms = 20").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.controls.debounce(), Duration::from_millis(20));
    }

    #[test]
    fn test_load_errors_carry_path() {
        let missing = Path::new("/definitely/not/here/stlview.toml");
        match Config::load(Some(missing)) {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Io error, got {:?}", other),
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[controls\n").unwrap();
        match Config::load(Some(file.path())) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected Parse error, got {:?}", other),
        }
    }
}
