//! AnnotKit Settings Crate
//!
//! Handles canvas tuning, theme colors and settings persistence.

pub mod config;
pub mod error;

pub use config::{CanvasSettings, Config, Rgba, ThemeSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
