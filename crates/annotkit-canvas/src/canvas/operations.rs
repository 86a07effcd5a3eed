//! Pointer and keyboard handling for the canvas.

use super::types::{Buttons, CanvasEvent, CursorHint, Grab, Hover, Key, Modifiers, PointerButton};
use super::{Canvas, CanvasMode};
use crate::annotation::{Annotation, HighlightMode, ShapeType};
use crate::selection_manager::SelectionManager;
use annotkit_core::{Point, Rect};

impl Canvas {
    /// Pointer moved to `pos` with `buttons` held.
    pub fn pointer_move(&mut self, pos: Point, buttons: Buttons) -> CursorHint {
        self.last_move_point = Some(pos);
        if self.mode == CanvasMode::Create {
            if self.current.is_none() {
                return CursorHint::Draw;
            }
            return self.update_preview(pos);
        }

        if buttons.secondary {
            return self.drag_copy(pos);
        }

        if buttons.primary {
            return match self.grab {
                Some(Grab::Vertex) => {
                    self.bounded_move_vertex(pos);
                    CursorHint::Point
                }
                Some(Grab::Shapes) => {
                    if let Some(delta) = self.bounded_delta(pos) {
                        for index in self.selection.indices(&self.shapes) {
                            self.shapes[index].move_by(delta);
                        }
                        self.drag.moved = true;
                    }
                    CursorHint::Move
                }
                _ => CursorHint::Default,
            };
        }

        self.hover_scan(pos)
    }

    /// Pointer button pressed at `pos`.
    pub fn pointer_press(
        &mut self,
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> CursorHint {
        match (self.mode, button) {
            (CanvasMode::Create, PointerButton::Primary) => self.press_create(pos, modifiers),
            (CanvasMode::Create, PointerButton::Secondary) => CursorHint::Draw,
            (CanvasMode::Edit, PointerButton::Primary) => {
                self.grab = self.select_shape_point(pos, modifiers.ctrl);
                self.drag.prev_point = Some(pos);
                self.drag.moved = false;
                match self.grab {
                    Some(Grab::Vertex) => CursorHint::Point,
                    Some(_) => CursorHint::Grab,
                    None => CursorHint::Default,
                }
            }
            (CanvasMode::Edit, PointerButton::Secondary) => {
                let hit = SelectionManager::hit_test(&self.shapes, pos);
                let on_selection = hit.is_some_and(|i| self.selection.contains(self.shapes[i].id()));
                if on_selection {
                    self.calculate_offsets(pos);
                } else {
                    self.select_shape_point(pos, modifiers.ctrl);
                }
                self.drag.prev_point = Some(pos);
                self.drag.moved = false;
                self.grab = (!self.selection.is_empty()).then_some(Grab::Copy);
                CursorHint::Default
            }
        }
    }

    /// Pointer button released at `pos`.
    pub fn pointer_release(
        &mut self,
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> CursorHint {
        if self.mode == CanvasMode::Create {
            if button == PointerButton::Primary {
                self.release_create(pos);
            }
            return CursorHint::Draw;
        }

        let grab = self.grab.take();
        match button {
            PointerButton::Secondary => {
                if !self.selection_clones.is_empty() {
                    if let Err(err) = self.end_move(true) {
                        tracing::warn!(%err, "Could not commit copy-drag");
                        self.selection_clones.clear();
                    }
                }
            }
            PointerButton::Primary => {
                if self.drag.moved {
                    self.store_shapes();
                    self.events.push(CanvasEvent::ShapeMoved);
                } else if grab == Some(Grab::Shapes) && !modifiers.ctrl && self.selection.len() > 1 {
                    // A plain click inside a multi-selection narrows it.
                    if let Some(index) = SelectionManager::hit_test(&self.shapes, pos) {
                        let id = self.shapes[index].id();
                        self.set_selection(&[id]);
                    }
                }
            }
        }
        self.drag.prev_point = None;
        self.drag.moved = false;
        CursorHint::Default
    }

    /// Returns whether the key was handled.
    pub fn key_press(&mut self, key: Key) -> bool {
        match key {
            Key::Escape if self.current.is_some() => self.cancel_current(),
            Key::Escape if !self.selection_clones.is_empty() => {
                self.cancel_copy();
                true
            }
            Key::Enter if self.current.is_some() => match self.finalize() {
                Ok(_) => true,
                Err(err) => {
                    tracing::debug!(%err, "Shape not finalized");
                    false
                }
            },
            _ => false,
        }
    }

    fn press_create(&mut self, pos: Point, modifiers: Modifiers) -> CursorHint {
        if self.current.is_none() {
            return self.start_shape(pos);
        }

        self.update_preview(pos);
        let Some(target) = self.preview.as_ref().and_then(Annotation::last) else {
            return CursorHint::Draw;
        };
        let Some(current) = self.current.as_mut() else {
            return CursorHint::Draw;
        };
        let Some(first) = current.first() else {
            return CursorHint::Draw;
        };

        let finalize = match current.shape_type() {
            ShapeType::Polygon => {
                if target == first && !current.can_finalize() {
                    tracing::debug!(points = current.len(), "Too few points to close polygon");
                    return CursorHint::Draw;
                }
                current.add_point(target);
                current.is_closed()
            }
            ShapeType::Polyline => {
                current.add_point(target);
                modifiers.ctrl && current.can_finalize()
            }
            ShapeType::Rectangle | ShapeType::Circle | ShapeType::Line => {
                if let Err(err) = current.set_points(vec![first, target]) {
                    tracing::warn!(%err, "Could not place second point");
                    return CursorHint::Draw;
                }
                true
            }
            ShapeType::Point => true,
        };

        if finalize {
            if let Err(err) = self.finalize() {
                tracing::warn!(%err, "Could not finalize shape");
            }
        } else if let Some(last) = self.current.as_ref().and_then(Annotation::last) {
            self.rebuild_preview(last);
        }
        CursorHint::Draw
    }

    fn start_shape(&mut self, pos: Point) -> CursorHint {
        if self.bounds.is_some_and(|b| b.is_out(pos)) {
            return CursorHint::Default;
        }
        let mut shape = Annotation::new(self.create_type);
        shape.add_point(pos);
        self.current = Some(shape);
        self.drag.anchor = Some(pos);

        if self.create_type == ShapeType::Point {
            if let Err(err) = self.finalize() {
                tracing::warn!(%err, "Could not finalize point");
            }
            return CursorHint::Draw;
        }

        self.rebuild_preview(pos);
        tracing::debug!(shape_type = %self.create_type, "Started drawing");
        self.events.push(CanvasEvent::DrawingPolygon(true));
        CursorHint::Draw
    }

    /// Finalize a two-point shape dragged out in a single gesture.
    fn release_create(&mut self, pos: Point) {
        let Some(anchor) = self.drag.anchor.take() else {
            return;
        };
        let Some(current) = self.current.as_ref() else {
            return;
        };
        if !current.shape_type().is_two_point() || current.len() != 1 {
            return;
        }

        self.update_preview(pos);
        let Some(target) = self.preview.as_ref().and_then(Annotation::last) else {
            return;
        };
        if target.distance_to(&anchor) <= self.settings.drag_threshold {
            return;
        }
        if let Some(current) = self.current.as_mut() {
            if let Err(err) = current.set_points(vec![anchor, target]) {
                tracing::warn!(%err, "Could not place second point");
                return;
            }
        }
        if let Err(err) = self.finalize() {
            tracing::warn!(%err, "Could not finalize shape");
        }
    }

    /// Recompute the preview from the cursor, clamping to the image and
    /// snapping to the start vertex of a polygon.
    fn update_preview(&mut self, pos: Point) -> CursorHint {
        let epsilon = self.epsilon();
        let bounds = self.bounds;
        let Some(current) = self.current.as_mut() else {
            return CursorHint::Draw;
        };
        current.clear_highlight();
        let (Some(first), Some(last)) = (current.first(), current.last()) else {
            return CursorHint::Draw;
        };

        let mut hint = CursorHint::Draw;
        let pos = match bounds {
            Some(b) if b.is_out(pos) => b.clamp_to_border(last, pos),
            _ if current.shape_type() == ShapeType::Polygon
                && current.len() > 1
                && first.distance_to(&pos) < epsilon =>
            {
                current.highlight_vertex(0, HighlightMode::Near);
                hint = CursorHint::Point;
                first
            }
            _ => pos,
        };

        self.rebuild_preview(pos);
        hint
    }

    /// Preview from the shape being drawn to `pos`, without clamping.
    pub(super) fn rebuild_preview(&mut self, pos: Point) {
        let Some(current) = self.current.as_ref() else {
            self.preview = None;
            return;
        };
        let (Some(first), Some(last)) = (current.first(), current.last()) else {
            self.preview = None;
            return;
        };
        let shape_type = current.shape_type();
        let points = match shape_type {
            ShapeType::Polygon | ShapeType::Polyline => vec![last, pos],
            ShapeType::Rectangle | ShapeType::Circle | ShapeType::Line => vec![first, pos],
            ShapeType::Point => vec![first],
        };

        match self.preview.as_mut() {
            Some(preview) if preview.shape_type() == shape_type => {
                if let Err(err) = preview.set_points(points) {
                    tracing::warn!(%err, "Invalid preview");
                }
            }
            _ => match Annotation::with_points(shape_type, points) {
                Ok(preview) => self.preview = Some(preview),
                Err(err) => tracing::warn!(%err, "Invalid preview"),
            },
        }
    }

    /// Topmost-first hover scan. A vertex hit beats a body hit.
    fn hover_scan(&mut self, pos: Point) -> CursorHint {
        let epsilon = self.epsilon();
        let had_edge = self.hover.edge.is_some();
        for shape in &mut self.shapes {
            shape.clear_highlight();
        }

        let found = self
            .shapes
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, s)| s.is_visible())
            .find_map(|(index, shape)| {
                let edge = shape.nearest_edge(pos, epsilon);
                match shape.nearest_vertex(pos, epsilon) {
                    Some(vertex) => Some((index, Some(vertex), edge)),
                    None if shape.contains_point(pos) => Some((index, None, edge)),
                    None => None,
                }
            });

        let hint = match found {
            Some((index, vertex, edge)) => {
                let shape = &mut self.shapes[index];
                self.hover = Hover {
                    shape: Some(shape.id()),
                    vertex,
                    edge,
                };
                match vertex {
                    Some(vertex) => {
                        shape.highlight_vertex(vertex, HighlightMode::Move);
                        CursorHint::Point
                    }
                    None => CursorHint::Grab,
                }
            }
            None => {
                self.hover.clear();
                CursorHint::Default
            }
        };

        let has_edge = self.hover.edge.is_some();
        if had_edge != has_edge {
            self.events.push(CanvasEvent::EdgeSelected(has_edge));
        }
        hint
    }

    /// Click selection. A highlighted vertex is grabbed in preference to
    /// selecting a shape, and clears the shape selection.
    fn select_shape_point(&mut self, pos: Point, multiple: bool) -> Option<Grab> {
        let before = self.selection.ids().to_vec();

        if let (Some(id), Some(vertex)) = (self.hover.shape, self.hover.vertex) {
            if let Some(index) = self.index_of(id) {
                self.shapes[index].highlight_vertex(vertex, HighlightMode::Move);
                self.selection.clear();
                self.notify_selection(&before);
                return Some(Grab::Vertex);
            }
        }

        let hit = self.selection.select_at(&self.shapes, pos, multiple);
        self.notify_selection(&before);
        hit.map(|_| {
            self.calculate_offsets(pos);
            Grab::Shapes
        })
    }

    fn drag_copy(&mut self, pos: Point) -> CursorHint {
        if self.grab != Some(Grab::Copy) {
            return CursorHint::Default;
        }
        if self.selection_clones.is_empty() {
            if self.selection.is_empty() {
                return CursorHint::Default;
            }
            self.selection_clones = self
                .selected_shapes()
                .into_iter()
                .map(Annotation::duplicate)
                .collect();
            tracing::debug!(count = self.selection_clones.len(), "Copy-drag started");
        }
        if let Some(delta) = self.bounded_delta(pos) {
            for clone in &mut self.selection_clones {
                clone.move_by(delta);
            }
            self.drag.moved = true;
        }
        CursorHint::Move
    }

    fn bounded_move_vertex(&mut self, pos: Point) {
        let (Some(id), Some(vertex)) = (self.hover.shape, self.hover.vertex) else {
            return;
        };
        let Some(index) = self.index_of(id) else {
            return;
        };
        let Some(point) = self.shapes[index].point(vertex) else {
            return;
        };
        let pos = match self.bounds {
            Some(b) if b.is_out(pos) => b.clamp_to_border(point, pos),
            _ => pos,
        };
        if pos == point {
            return;
        }
        match self.shapes[index].move_vertex_by(vertex, pos - point) {
            Ok(()) => self.drag.moved = true,
            Err(err) => tracing::warn!(%err, "Vertex drag failed"),
        }
    }

    /// Delta that moves the dragged selection toward `pos` while keeping its
    /// bounding box inside the image. Each axis is limited on its own so
    /// the selection slides along the border. Updates the reference point.
    pub(super) fn bounded_delta(&mut self, pos: Point) -> Option<Point> {
        let prev = self.drag.prev_point?;
        let mut pos = pos;
        if let Some(bounds) = self.bounds {
            pos = bounds.clamp_point(pos);
            let (top_left, bottom_right) = self.drag.offsets;
            let o1 = pos + top_left;
            pos -= Point::new(o1.x.min(0.0), o1.y.min(0.0));
            let o2 = pos + bottom_right;
            pos += Point::new(
                (bounds.max_x() - o2.x).min(0.0),
                (bounds.max_y() - o2.y).min(0.0),
            );
        }
        let delta = pos - prev;
        if delta == Point::ORIGIN {
            return None;
        }
        self.drag.prev_point = Some(pos);
        Some(delta)
    }

    /// Selection bounds relative to `point`.
    pub(super) fn calculate_offsets(&mut self, point: Point) {
        let bbox = self
            .selected_shapes()
            .into_iter()
            .filter_map(Annotation::bounding_box)
            .reduce(|a, b| a.union(&b));
        self.drag.offsets = match bbox {
            Some(r) => offsets_of(r, point),
            None => (Point::ORIGIN, Point::ORIGIN),
        };
    }
}

fn offsets_of(rect: Rect, point: Point) -> (Point, Point) {
    (rect.top_left() - point, rect.bottom_right() - point)
}
