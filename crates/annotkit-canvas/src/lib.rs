//! # AnnotKit Canvas
//!
//! Vector annotations over a raster image and the interaction logic that
//! edits them.
//!
//! ## Features
//!
//! - **Shapes**: polygon, rectangle, circle, line, point and polyline with
//!   hit-testing and nearest vertex/edge queries
//! - **Canvas**: create/edit state machine driven by pointer and key events
//! - **Boundary clamping**: drags stop at the image border and slide along it
//! - **History**: bounded snapshot undo with redo
//! - **Rendering**: draw-command list plus a tiny-skia raster backend
//! - **Persistence**: JSON sidecar files next to the image

pub mod annotation;
pub mod boundary;
pub mod canvas;
pub mod history;
pub mod label;
pub mod renderer;
pub mod selection_manager;
pub mod serialization;

pub use annotation::{Annotation, Highlight, HighlightMode, ShapeId, ShapeType, VertexMarker};
pub use boundary::{ImageBounds, ImageSource};
pub use canvas::{
    Buttons, Canvas, CanvasEvent, CanvasMode, CursorHint, Hover, InteractionState, Key, Modifiers,
    PointerButton,
};
pub use history::SnapshotHistory;
pub use label::{AttributeValue, Label};
pub use renderer::{build_commands, render, render_overlay, DrawCommand, PixmapBackend, RenderBackend, Style};
pub use selection_manager::SelectionManager;
pub use serialization::{load_sidecar, save_sidecar, sidecar_path, AnnotationFile, ShapeRecord};
