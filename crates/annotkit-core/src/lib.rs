//! # AnnotKit Core
//!
//! Core types shared by every AnnotKit crate: image-space geometry
//! primitives and the error taxonomy used by the annotation canvas.

pub mod constants;
pub mod error;
pub mod geometry;

pub use error::ValidationError;
pub use geometry::{distance_to_segment, segment_intersection, Point, Rect, SegmentIntersection};
