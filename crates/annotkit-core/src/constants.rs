//! Default tuning values for the annotation canvas.

/// Hit-test radius in widget pixels. Divided by the zoom scale before use.
pub const DEFAULT_EPSILON: f64 = 10.0;

/// Number of shape-set snapshots kept for edit-mode undo.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Minimum pointer travel (image px) between press and release for a
/// press-drag-release to finalize a two-point shape.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 3.0;

/// Offset applied when duplicating a selection in place.
pub const DEFAULT_COPY_SHIFT: f64 = 2.0;

/// Vertex marker diameter in widget pixels.
pub const DEFAULT_POINT_SIZE: f64 = 8.0;

/// Vertex marker scale for a vertex the cursor is near.
pub const NEAR_VERTEX_SCALE: f64 = 4.0;

/// Vertex marker scale for a vertex grabbed for moving.
pub const MOVE_VERTEX_SCALE: f64 = 1.5;

/// Minimum vertices before a polygon may be finalized.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Minimum vertices before a polyline may be finalized.
pub const MIN_POLYLINE_POINTS: usize = 2;
