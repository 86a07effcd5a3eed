//! Error handling for AnnotKit
//!
//! The annotation core has a single domain error kind, [`ValidationError`],
//! raised when a caller breaks an operation's contract (unknown shape type,
//! finalizing without a shape in progress, out-of-range vertex index).
//! Geometric queries never fail; they return `None` instead.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Contract violation by a caller of the annotation core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Shape type name is not one of the supported kinds
    #[error("Unexpected shape type: {value}")]
    UnknownShapeType {
        /// The rejected name.
        value: String,
    },

    /// An operation needs a shape in progress but none exists
    #[error("No shape is being created")]
    NoCurrentShape,

    /// The shape in progress does not have enough points to be finalized
    #[error("Cannot finalize {shape_type} with {points} points, {required} required")]
    NotFinalizable {
        /// The shape type name.
        shape_type: String,
        /// Points currently placed.
        points: usize,
        /// Points needed.
        required: usize,
    },

    /// Vertex index outside the shape's point list
    #[error("Vertex index {index} out of range for shape with {len} points")]
    VertexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of points in the shape.
        len: usize,
    },

    /// A shape carries more points than its type allows
    #[error("{shape_type} holds at most {max} points, got {points}")]
    TooManyPoints {
        /// The shape type name.
        shape_type: String,
        /// Points supplied.
        points: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Image dimensions must be at least 1x1
    #[error("Invalid image size {width}x{height}")]
    InvalidImageSize {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// Operation invoked in a state that does not allow it
    #[error("Invalid state: {reason}")]
    InvalidState {
        /// What was wrong.
        reason: String,
    },
}

impl ValidationError {
    /// Create an invalid-state error from a message
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        ValidationError::InvalidState {
            reason: reason.into(),
        }
    }
}
