//! Canvas type definitions: CanvasMode, InteractionState, input types,
//! CanvasEvent, CursorHint, Hover.

use crate::annotation::{ShapeId, ShapeType};
use annotkit_core::Point;

/// Top-level canvas mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasMode {
    Create,
    Edit,
}

/// Where the canvas is within the current interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// Create mode, nothing in progress
    Idle,
    /// Create mode, a shape is being placed
    Creating(ShapeType),
    /// Edit mode, nothing grabbed
    EditingIdle,
    DraggingVertex,
    DraggingShapes,
    CopyDragging,
}

/// Pointer button that changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Drags a copy of the selection
    Secondary,
}

/// Buttons held during a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons {
        primary: false,
        secondary: false,
    };

    pub const PRIMARY: Buttons = Buttons {
        primary: true,
        secondary: false,
    };

    pub const SECONDARY: Buttons = Buttons {
        primary: false,
        secondary: true,
    };
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Adds to the selection in edit mode, finalizes a polyline in create mode
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
    };
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Discard the shape being drawn
    Escape,
    /// Finalize the shape being drawn
    Enter,
}

/// Notifications for the host, drained with `Canvas::drain_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A shape was finalized and appended to the shape set
    NewShape(ShapeId),
    SelectionChanged(Vec<ShapeId>),
    /// A drag moved one or more shapes or a vertex
    ShapeMoved,
    /// Drawing started (`true`) or stopped (`false`)
    DrawingPolygon(bool),
    /// The cursor is (`true`) or is no longer (`false`) over an edge
    EdgeSelected(bool),
    /// The shape set was replaced by an undo or redo
    ShapesRestored,
}

/// Cursor the host should show after a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over a vertex
    Point,
    /// Drawing
    Draw,
    /// Dragging shapes
    Move,
    /// Over a shape body
    Grab,
}

/// Hover target found by the last edit-mode pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hover {
    pub shape: Option<ShapeId>,
    pub vertex: Option<usize>,
    pub edge: Option<usize>,
}

impl Hover {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Drag bookkeeping shared by the pointer handlers.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DragState {
    /// Last pointer position applied to a shape drag
    pub prev_point: Option<Point>,
    /// Selection bounds relative to the press point: top-left, bottom-right
    pub offsets: (Point, Point),
    /// Set once a drag actually moved something
    pub moved: bool,
    /// Press position of a create-mode gesture
    pub anchor: Option<Point>,
}

/// What the held pointer button is dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grab {
    Vertex,
    Shapes,
    Copy,
}
