//! Annotation shapes.
//!
//! An [`Annotation`] is an ordered vertex list interpreted according to its
//! [`ShapeType`]:
//!
//! - `rectangle`: two opposite corners
//! - `circle`: center, then a point on the circumference
//! - `line`: two endpoints
//! - `point`: a single vertex
//! - `polygon` / `polyline`: any number of vertices in drawing order
//!
//! Shapes with no vertices are never drawn or hit-tested.

use crate::label::Label;
use annotkit_core::constants::{
    MIN_POLYGON_POINTS, MIN_POLYLINE_POINTS, MOVE_VERTEX_SCALE, NEAR_VERTEX_SCALE,
};
use annotkit_core::{distance_to_segment, Point, Rect, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of annotation shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShapeType {
    Polygon,
    Rectangle,
    Circle,
    Line,
    Point,
    Polyline,
}

impl ShapeType {
    pub const ALL: [ShapeType; 6] = [
        ShapeType::Polygon,
        ShapeType::Rectangle,
        ShapeType::Circle,
        ShapeType::Line,
        ShapeType::Point,
        ShapeType::Polyline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polygon => "polygon",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Point => "point",
            Self::Polyline => "polyline",
        }
    }

    /// Upper bound on vertex count, `None` for open-ended types.
    pub fn max_points(&self) -> Option<usize> {
        match self {
            Self::Rectangle | Self::Circle | Self::Line => Some(2),
            Self::Point => Some(1),
            Self::Polygon | Self::Polyline => None,
        }
    }

    /// Vertices needed before a shape of this type may be finalized.
    pub fn min_points(&self) -> usize {
        match self {
            Self::Polygon => MIN_POLYGON_POINTS,
            Self::Polyline => MIN_POLYLINE_POINTS,
            Self::Rectangle | Self::Circle | Self::Line => 2,
            Self::Point => 1,
        }
    }

    /// Rectangle, circle and line are defined by an anchor and one more point.
    pub fn is_two_point(&self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle | Self::Line)
    }

    /// Polygon and polyline are built vertex by vertex.
    pub fn is_multi_point(&self) -> bool {
        matches!(self, Self::Polygon | Self::Polyline)
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polygon" => Ok(Self::Polygon),
            "rectangle" => Ok(Self::Rectangle),
            "circle" => Ok(Self::Circle),
            "line" => Ok(Self::Line),
            "point" => Ok(Self::Point),
            "polyline" | "linestrip" => Ok(Self::Polyline),
            other => Err(ValidationError::UnknownShapeType {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ShapeType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeType> for String {
    fn from(value: ShapeType) -> Self {
        value.as_str().to_string()
    }
}

/// Vertex highlight kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    /// Cursor is close to the vertex
    Near,
    /// Vertex is grabbed for moving
    Move,
}

/// Vertex marker outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexMarker {
    Round,
    Square,
}

impl HighlightMode {
    /// Multiplier applied to the vertex marker size.
    pub fn scale(&self) -> f64 {
        match self {
            Self::Near => NEAR_VERTEX_SCALE,
            Self::Move => MOVE_VERTEX_SCALE,
        }
    }

    pub fn marker(&self) -> VertexMarker {
        match self {
            Self::Near => VertexMarker::Round,
            Self::Move => VertexMarker::Square,
        }
    }
}

/// The single highlighted vertex of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub vertex: usize,
    pub mode: HighlightMode,
}

/// Stable identifier of an annotation within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An annotation shape.
///
/// `Clone` copies everything including the id, which is what history
/// snapshots need. Use [`Annotation::duplicate`] for a new, independent shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    id: ShapeId,
    shape_type: ShapeType,
    points: Vec<Point>,
    closed: bool,
    visible: bool,
    label: Option<Label>,
    highlight: Option<Highlight>,
}

impl Annotation {
    /// Empty shape of the given type.
    pub fn new(shape_type: ShapeType) -> Self {
        Self {
            id: ShapeId::new(),
            shape_type,
            points: Vec::new(),
            closed: false,
            visible: true,
            label: None,
            highlight: None,
        }
    }

    /// Parse the type name and create an empty shape.
    pub fn from_type_name(name: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(name.parse()?))
    }

    /// Shape with an initial vertex list, checked against the type's limit.
    pub fn with_points(shape_type: ShapeType, points: Vec<Point>) -> Result<Self, ValidationError> {
        let mut shape = Self::new(shape_type);
        shape.set_points(points)?;
        Ok(shape)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// Change the type by name. Fails on unknown names or when the current
    /// vertices exceed what the new type allows.
    pub fn set_shape_type(&mut self, name: &str) -> Result<(), ValidationError> {
        let shape_type: ShapeType = name.parse()?;
        check_point_count(shape_type, self.points.len())?;
        self.shape_type = shape_type;
        Ok(())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Replace all vertices.
    pub fn set_points(&mut self, points: Vec<Point>) -> Result<(), ValidationError> {
        check_point_count(self.shape_type, points.len())?;
        self.points = points;
        Ok(())
    }

    /// Overwrite one vertex.
    pub fn set_point(&mut self, index: usize, point: Point) -> Result<(), ValidationError> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(ValidationError::VertexOutOfRange { index, len })?;
        *slot = point;
        Ok(())
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn set_open(&mut self) {
        self.closed = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn set_label(&mut self, label: Option<Label>) {
        self.label = label;
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }

    pub fn highlight_vertex(&mut self, vertex: usize, mode: HighlightMode) {
        self.highlight = Some(Highlight { vertex, mode });
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    /// Whether enough vertices exist to finalize this shape.
    pub fn can_finalize(&self) -> bool {
        self.points.len() >= self.shape_type.min_points()
    }

    /// Append a vertex, or close the shape when `point` equals the first vertex.
    ///
    /// Types with a fixed vertex count ignore points beyond their limit.
    pub fn add_point(&mut self, point: Point) {
        if self.points.first() == Some(&point) {
            self.closed = true;
            return;
        }
        if let Some(max) = self.shape_type.max_points() {
            if self.points.len() >= max {
                return;
            }
        }
        self.points.push(point);
    }

    /// Remove the last vertex and reopen the shape.
    pub fn pop_point(&mut self) -> Option<Point> {
        let point = self.points.pop()?;
        self.closed = false;
        Some(point)
    }

    /// Insert a vertex before `index`. Indices past the end append.
    pub fn insert_point(&mut self, index: usize, point: Point) {
        let index = index.min(self.points.len());
        self.points.insert(index, point);
    }

    /// Index of the closest vertex within `epsilon` of `point`.
    ///
    /// On an exact tie the lowest index wins.
    pub fn nearest_vertex(&self, point: Point, epsilon: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let dist = p.distance_to(&point);
            if dist <= epsilon && best.is_none_or(|(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index `i` of the closest edge within `epsilon`, where edge `i` joins
    /// vertex `i - 1` to vertex `i` and edge 0 joins the last vertex to the
    /// first.
    ///
    /// On an exact tie the lowest index wins. Shapes with fewer than two
    /// vertices have no edges.
    pub fn nearest_edge(&self, point: Point, epsilon: f64) -> Option<usize> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for i in 0..n {
            let a = self.points[(i + n - 1) % n];
            let b = self.points[i];
            let dist = distance_to_segment(point, a, b);
            if dist <= epsilon && best.is_none_or(|(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Axis-aligned bounds, or `None` for an empty shape.
    pub fn bounding_box(&self) -> Option<Rect> {
        match (self.shape_type, self.points.as_slice()) {
            (ShapeType::Rectangle, [a, b]) => Some(Rect::from_corners(*a, *b)),
            (ShapeType::Circle, [center, rim]) => {
                let r = center.distance_to(rim);
                Some(Rect::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r))
            }
            _ => Rect::from_points(&self.points),
        }
    }

    /// Point-in-shape test.
    ///
    /// Everything other than a two-point rectangle or circle is treated as
    /// the closed polygon through all vertices, open polylines included.
    pub fn contains_point(&self, point: Point) -> bool {
        match (self.shape_type, self.points.as_slice()) {
            (_, []) => false,
            (ShapeType::Rectangle, [a, b]) => Rect::from_corners(*a, *b).contains(point),
            (ShapeType::Circle, [center, rim]) => {
                center.distance_to(&point) <= center.distance_to(rim)
            }
            (_, points) => polygon_contains(points, point),
        }
    }

    /// Translate every vertex.
    pub fn move_by(&mut self, offset: Point) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Translate a single vertex.
    pub fn move_vertex_by(&mut self, index: usize, offset: Point) -> Result<(), ValidationError> {
        let len = self.points.len();
        let p = self
            .points
            .get_mut(index)
            .ok_or(ValidationError::VertexOutOfRange { index, len })?;
        *p += offset;
        Ok(())
    }

    /// Deep copy with a fresh id and no highlight.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ShapeId::new(),
            shape_type: self.shape_type,
            points: self.points.clone(),
            closed: self.closed,
            visible: self.visible,
            label: self.label.clone(),
            highlight: None,
        }
    }
}

fn check_point_count(shape_type: ShapeType, points: usize) -> Result<(), ValidationError> {
    match shape_type.max_points() {
        Some(max) if points > max => Err(ValidationError::TooManyPoints {
            shape_type: shape_type.to_string(),
            points,
            max,
        }),
        _ => Ok(()),
    }
}

/// Even-odd ray cast against the closed polygon through `points`.
fn polygon_contains(points: &[Point], p: Point) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = points[i];
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
