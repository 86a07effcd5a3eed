//! Configuration and settings management for AnnotKit
//!
//! Provides configuration file handling and validation for the annotation
//! canvas. Supports JSON and TOML file formats stored in platform-specific
//! directories.
//!
//! Configuration is organized into logical sections:
//! - Canvas tuning (hit-test radius, history depth, drag threshold)
//! - Theme colors used by the overlay renderer

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use annotkit_core::constants::{
    DEFAULT_COPY_SHIFT, DEFAULT_DRAG_THRESHOLD, DEFAULT_EPSILON, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_POINT_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shape type names accepted for `canvas.default_create_type`.
const SHAPE_TYPE_NAMES: [&str; 7] = [
    "polygon",
    "rectangle",
    "circle",
    "line",
    "point",
    "polyline",
    "linestrip",
];

/// RGBA color, 8 bits per channel.
pub type Rgba = [u8; 4];

/// Canvas interaction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Hit-test radius in widget pixels
    pub epsilon: f64,
    /// Snapshots kept for undo
    pub history_capacity: usize,
    /// Minimum travel for press-drag-release creation, image pixels
    pub drag_threshold: f64,
    /// Offset applied to duplicated shapes
    pub copy_shift: f64,
    /// Shape type selected when the canvas starts
    pub default_create_type: String,
    /// Fill polygons while they are being drawn
    pub fill_drawing: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            copy_shift: DEFAULT_COPY_SHIFT,
            default_create_type: "polygon".to_string(),
            fill_drawing: false,
        }
    }
}

/// Overlay colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub line_color: Rgba,
    pub fill_color: Rgba,
    pub select_line_color: Rgba,
    pub select_fill_color: Rgba,
    pub vertex_fill_color: Rgba,
    pub hvertex_fill_color: Rgba,
    /// Stroke color of the shape being drawn
    pub drawing_line_color: Rgba,
    /// Vertex marker size in widget pixels
    pub point_size: f64,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            line_color: [0, 255, 0, 128],
            fill_color: [255, 0, 0, 128],
            select_line_color: [255, 255, 255, 255],
            select_fill_color: [0, 128, 255, 155],
            vertex_fill_color: [0, 255, 0, 255],
            hvertex_fill_color: [255, 0, 0, 255],
            drawing_line_color: [0, 0, 255, 255],
            point_size: DEFAULT_POINT_SIZE,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Most recently opened images, newest first
    pub recent_files: Vec<PathBuf>,
    pub recent_files_count: usize,
    pub canvas: CanvasSettings,
    pub theme: ThemeSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recent_files: Vec::new(),
            recent_files_count: 10,
            canvas: CanvasSettings::default(),
            theme: ThemeSettings::default(),
        }
    }
}

impl Config {
    /// Create new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from file (JSON or TOML, chosen by extension)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to file (JSON or TOML, chosen by extension)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Load from `path` if it exists, otherwise return defaults.
    ///
    /// A file that exists but fails to parse or validate is reported as an
    /// error rather than silently replaced.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Default location: `<platform config dir>/annotkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("Could not determine config directory".to_string())
        })?;
        Ok(base.join("annotkit").join("config.toml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let canvas = &self.canvas;

        if !is_positive(canvas.epsilon) {
            return Err(out_of_range("canvas.epsilon", canvas.epsilon));
        }

        if canvas.history_capacity == 0 {
            return Err(out_of_range(
                "canvas.history_capacity",
                canvas.history_capacity,
            ));
        }

        if !canvas.drag_threshold.is_finite() || canvas.drag_threshold < 0.0 {
            return Err(out_of_range("canvas.drag_threshold", canvas.drag_threshold));
        }

        if !canvas.copy_shift.is_finite() {
            return Err(out_of_range("canvas.copy_shift", canvas.copy_shift));
        }

        if !SHAPE_TYPE_NAMES.contains(&canvas.default_create_type.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "canvas.default_create_type".to_string(),
                reason: format!("unknown shape type '{}'", canvas.default_create_type),
            });
        }

        if !is_positive(self.theme.point_size) {
            return Err(out_of_range("theme.point_size", self.theme.point_size));
        }

        Ok(())
    }

    /// Add file to recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.recent_files_count);
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
