//! # AnnotKit
//!
//! Image annotation core: vector shapes drawn over a raster image, the
//! create/edit interaction state machine that manipulates them, bounded
//! snapshot undo and JSON sidecar persistence.
//!
//! ## Architecture
//!
//! AnnotKit is organized as a workspace with multiple crates:
//!
//! 1. **annotkit-core** - Geometry primitives and the error taxonomy
//! 2. **annotkit-settings** - Canvas tuning, theme colors, config files
//! 3. **annotkit-canvas** - Shapes, boundary clamping, history, the canvas
//!    state machine, rendering and persistence
//! 4. **annotkit** - This facade, plus logging setup for host applications
//!
//! The library never installs a subscriber on its own; hosts call
//! [`init_logging`] once at startup.

pub use annotkit_canvas;
pub use annotkit_core;
pub use annotkit_settings;

pub use annotkit_core::{Point, Rect, ValidationError};

pub use annotkit_settings::{CanvasSettings, Config, ThemeSettings};

pub use annotkit_canvas::{
    load_sidecar, render, render_overlay, save_sidecar, sidecar_path, Annotation, AnnotationFile,
    AttributeValue, Buttons, Canvas, CanvasEvent, CanvasMode, CursorHint, ImageBounds,
    ImageSource, InteractionState, Key, Label, Modifiers, PixmapBackend, PointerButton,
    RenderBackend, ShapeId, ShapeType, SnapshotHistory, Style,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, INFO otherwise
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use anyhow::Context;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.as_str()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(version = VERSION, build_date = BUILD_DATE, "Logging initialized");
    Ok(())
}
