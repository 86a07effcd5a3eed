//! Interactive annotation canvas.
//!
//! [`Canvas`] owns the shape set, the shape being drawn, the selection and
//! the undo history. Pointer and key handlers live in `operations`; this
//! module holds the state and the command-style API a host calls from menus
//! and list widgets.
//!
//! All coordinates are image space. The host converts widget coordinates
//! (pan and zoom) before calling in.

mod operations;
mod types;

pub use types::{
    Buttons, CanvasEvent, CanvasMode, CursorHint, Hover, InteractionState, Key, Modifiers,
    PointerButton,
};

use crate::annotation::{Annotation, HighlightMode, ShapeId, ShapeType};
use crate::boundary::ImageBounds;
use crate::history::SnapshotHistory;
use crate::label::Label;
use crate::selection_manager::SelectionManager;
use annotkit_core::{Point, ValidationError};
use annotkit_settings::CanvasSettings;
use types::{DragState, Grab};

/// Canvas state: shapes, drawing, selection and history.
#[derive(Debug, Clone)]
pub struct Canvas {
    shapes: Vec<Annotation>,
    current: Option<Annotation>,
    preview: Option<Annotation>,
    selection: SelectionManager,
    selection_clones: Vec<Annotation>,
    hover: Hover,
    last_move_point: Option<Point>,
    drag: DragState,
    grab: Option<Grab>,
    history: SnapshotHistory<Vec<Annotation>>,
    mode: CanvasMode,
    create_type: ShapeType,
    bounds: Option<ImageBounds>,
    scale: f64,
    settings: CanvasSettings,
    hide_background: bool,
    events: Vec<CanvasEvent>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Creates a canvas with default settings, in edit mode.
    pub fn new() -> Self {
        Self::with_settings(CanvasSettings::default())
    }

    /// Creates a canvas from explicit settings.
    pub fn with_settings(settings: CanvasSettings) -> Self {
        let create_type = settings
            .default_create_type
            .parse::<ShapeType>()
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "Falling back to polygon creation");
                ShapeType::Polygon
            });
        Self {
            shapes: Vec::new(),
            current: None,
            preview: None,
            selection: SelectionManager::new(),
            selection_clones: Vec::new(),
            hover: Hover::default(),
            last_move_point: None,
            drag: DragState::default(),
            grab: None,
            history: SnapshotHistory::new(settings.history_capacity),
            mode: CanvasMode::Edit,
            create_type,
            bounds: None,
            scale: 1.0,
            settings,
            hide_background: false,
            events: Vec::new(),
        }
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn mode(&self) -> CanvasMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == CanvasMode::Edit
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == CanvasMode::Create
    }

    /// Current interaction state, derived from mode and drag bookkeeping.
    pub fn state(&self) -> InteractionState {
        match self.mode {
            CanvasMode::Create => match &self.current {
                Some(shape) => InteractionState::Creating(shape.shape_type()),
                None => InteractionState::Idle,
            },
            CanvasMode::Edit => match self.grab {
                Some(Grab::Vertex) => InteractionState::DraggingVertex,
                Some(Grab::Shapes) => InteractionState::DraggingShapes,
                Some(Grab::Copy) => InteractionState::CopyDragging,
                None => InteractionState::EditingIdle,
            },
        }
    }

    /// Switch between create and edit mode.
    ///
    /// Entering create mode drops hover, highlight and selection. Leaving it
    /// finalizes the shape being drawn when it has enough points and
    /// discards it otherwise.
    pub fn set_mode(&mut self, mode: CanvasMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            CanvasMode::Create => {
                self.unhighlight();
                self.selection_clones.clear();
                self.grab = None;
                self.drag = DragState::default();
                self.deselect();
            }
            CanvasMode::Edit => self.finish_or_discard(),
        }
        tracing::debug!(?mode, "Canvas mode changed");
        self.mode = mode;
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.set_mode(if editing {
            CanvasMode::Edit
        } else {
            CanvasMode::Create
        });
    }

    pub fn create_type(&self) -> ShapeType {
        self.create_type
    }

    /// Choose the type of the next shape. A shape already being drawn is
    /// finalized or discarded first.
    pub fn set_create_type(&mut self, shape_type: ShapeType) {
        if shape_type != self.create_type {
            self.finish_or_discard();
            self.create_type = shape_type;
        }
    }

    /// Finalized shapes in z-order, bottom first.
    pub fn shapes(&self) -> &[Annotation] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Annotation> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Shape being drawn.
    pub fn current(&self) -> Option<&Annotation> {
        self.current.as_ref()
    }

    /// Transient shape tracking the pointer while drawing.
    pub fn preview(&self) -> Option<&Annotation> {
        self.preview.as_ref()
    }

    /// Clones being dragged by a copy-drag.
    pub fn selection_clones(&self) -> &[Annotation] {
        &self.selection_clones
    }

    /// Selected ids in shape-set order.
    pub fn selected_ids(&self) -> &[ShapeId] {
        self.selection.ids()
    }

    pub fn selected_shapes(&self) -> Vec<&Annotation> {
        self.shapes
            .iter()
            .filter(|s| self.selection.contains(s.id()))
            .collect()
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(id)
    }

    pub fn hover(&self) -> Hover {
        self.hover
    }

    pub fn history(&self) -> &SnapshotHistory<Vec<Annotation>> {
        &self.history
    }

    pub fn bounds(&self) -> Option<ImageBounds> {
        self.bounds
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the zoom factor. Hit-test radius and marker sizes shrink as it grows.
    pub fn set_scale(&mut self, scale: f64) -> Result<(), ValidationError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ValidationError::invalid_state(format!(
                "zoom scale must be positive, got {}",
                scale
            )));
        }
        self.scale = scale;
        Ok(())
    }

    /// Hit-test radius in image pixels.
    pub fn epsilon(&self) -> f64 {
        self.settings.epsilon / self.scale
    }

    pub fn set_hide_background(&mut self, hide: bool) {
        self.hide_background = hide;
    }

    /// Whether unselected shapes are currently suppressed from painting.
    pub fn is_hiding(&self) -> bool {
        self.hide_background && (!self.selection.is_empty() || self.current.is_some())
    }

    /// Take the notifications recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    /// Show a new image: shapes, selection and history start empty.
    pub fn load_image(&mut self, bounds: ImageBounds) {
        self.clear_interaction();
        self.shapes.clear();
        self.history.clear();
        self.bounds = Some(bounds);
        tracing::info!(
            width = bounds.width(),
            height = bounds.height(),
            "Image loaded"
        );
    }

    /// Install shapes, e.g. from a sidecar file, and record the result as
    /// the base snapshot.
    pub fn load_shapes(&mut self, shapes: Vec<Annotation>, replace: bool) {
        if replace {
            self.shapes = shapes;
        } else {
            self.shapes.extend(shapes);
        }
        self.current = None;
        self.preview = None;
        self.hover.clear();
        self.selection.retain_existing(&self.shapes);
        self.store_shapes();
        tracing::debug!(count = self.shapes.len(), replace, "Shapes loaded");
    }

    /// Back to a blank canvas with no image.
    pub fn reset_state(&mut self) {
        self.clear_interaction();
        self.shapes.clear();
        self.history.clear();
        self.bounds = None;
    }

    /// Finalize the shape being drawn.
    pub fn finalize(&mut self) -> Result<ShapeId, ValidationError> {
        let current = self.current.as_ref().ok_or(ValidationError::NoCurrentShape)?;
        if !current.can_finalize() {
            return Err(ValidationError::NotFinalizable {
                shape_type: current.shape_type().to_string(),
                points: current.len(),
                required: current.shape_type().min_points(),
            });
        }
        let Some(mut shape) = self.current.take() else {
            return Err(ValidationError::NoCurrentShape);
        };
        shape.close();
        shape.clear_highlight();
        let id = shape.id();
        tracing::info!(
            shape_type = %shape.shape_type(),
            points = shape.len(),
            "Shape finalized"
        );
        self.shapes.push(shape);
        self.preview = None;
        self.drag.anchor = None;
        self.store_shapes();
        self.events.push(CanvasEvent::NewShape(id));
        self.events.push(CanvasEvent::DrawingPolygon(false));
        Ok(id)
    }

    /// Discard the shape being drawn. Nothing is recorded in history.
    pub fn cancel_current(&mut self) -> bool {
        self.preview = None;
        self.drag.anchor = None;
        match self.current.take() {
            Some(shape) => {
                tracing::debug!(
                    shape_type = %shape.shape_type(),
                    points = shape.len(),
                    "Shape discarded"
                );
                self.events.push(CanvasEvent::DrawingPolygon(false));
                true
            }
            None => false,
        }
    }

    /// Mode-dependent undo.
    ///
    /// Create mode steps back through the shape being drawn, then reopens
    /// the last finalized shape. Edit mode restores the previous snapshot.
    pub fn undo(&mut self) -> bool {
        match self.mode {
            CanvasMode::Create if self.current.is_some() => self.undo_last_point(),
            CanvasMode::Create => self.undo_last_line(),
            CanvasMode::Edit => self.restore_shapes(),
        }
    }

    /// Remove the last placed point of the shape being drawn.
    pub fn undo_last_point(&mut self) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        current.pop_point();
        match current.last() {
            Some(last) => {
                let trailing = self
                    .preview
                    .as_ref()
                    .and_then(Annotation::last)
                    .unwrap_or(last);
                self.rebuild_preview(trailing);
            }
            None => {
                self.cancel_current();
            }
        }
        true
    }

    /// Take the most recent shape out of the shape set and resume drawing it.
    ///
    /// History is left untouched; finalizing the reopened shape records a
    /// fresh snapshot.
    pub fn undo_last_line(&mut self) -> bool {
        let Some(mut shape) = self.shapes.pop() else {
            return false;
        };
        self.selection.retain_existing(&self.shapes);
        shape.set_open();
        shape.clear_highlight();
        self.create_type = shape.shape_type();

        let (Some(first), Some(last)) = (shape.first(), shape.last()) else {
            return true;
        };
        match shape.shape_type() {
            ShapeType::Point => {
                self.current = None;
                self.preview = None;
                self.events.push(CanvasEvent::DrawingPolygon(false));
                return true;
            }
            ShapeType::Polygon | ShapeType::Polyline => {
                self.current = Some(shape);
                self.rebuild_preview(first);
            }
            ShapeType::Rectangle | ShapeType::Circle | ShapeType::Line => {
                if let Err(err) = shape.set_points(vec![first]) {
                    tracing::warn!(%err, "Could not reopen shape");
                    return false;
                }
                self.current = Some(shape);
                self.rebuild_preview(last);
            }
        }
        tracing::debug!(shape_type = %self.create_type, "Reopened last shape");
        self.events.push(CanvasEvent::DrawingPolygon(true));
        true
    }

    /// Re-apply the snapshot most recently undone in edit mode.
    pub fn redo(&mut self) -> bool {
        if self.current.is_some() {
            return false;
        }
        let Some(shapes) = self.history.redo() else {
            return false;
        };
        tracing::debug!(count = shapes.len(), "Redo");
        self.apply_restored(shapes);
        true
    }

    /// Remove the selected shapes and return them.
    pub fn delete_selected(&mut self) -> Vec<Annotation> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let (deleted, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.shapes)
            .into_iter()
            .partition(|s| self.selection.contains(s.id()));
        self.shapes = kept;
        self.hover.clear();
        self.set_selection(&[]);
        self.store_shapes();
        tracing::info!(count = deleted.len(), "Deleted shapes");
        deleted
    }

    /// Duplicate the selection in place, nudged by the configured shift, and
    /// select the duplicates.
    pub fn copy_selected(&mut self) -> Vec<ShapeId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.selection_clones = self
            .selected_shapes()
            .into_iter()
            .map(Annotation::duplicate)
            .collect();
        let Some(anchor) = self.selection_clones.iter().find_map(Annotation::first) else {
            self.selection_clones.clear();
            return Vec::new();
        };

        let shift = Point::new(self.settings.copy_shift, self.settings.copy_shift);
        self.calculate_offsets(anchor);
        self.drag.prev_point = Some(anchor);
        let delta = self
            .bounded_delta(anchor - shift)
            .or_else(|| self.bounded_delta(anchor + shift));
        if let Some(delta) = delta {
            for clone in &mut self.selection_clones {
                clone.move_by(delta);
            }
        }
        self.drag = DragState::default();

        match self.end_move(true) {
            Ok(ids) => ids,
            Err(err) => {
                tracing::warn!(%err, "Copy failed");
                Vec::new()
            }
        }
    }

    /// Commit a copy-drag.
    ///
    /// With `copy` the clones are appended and become the selection;
    /// otherwise the selected shapes take the clones' positions.
    pub fn end_move(&mut self, copy: bool) -> Result<Vec<ShapeId>, ValidationError> {
        if self.selection_clones.is_empty() || self.selection.is_empty() {
            return Err(ValidationError::invalid_state("no copy in progress"));
        }
        let clones = std::mem::take(&mut self.selection_clones);
        let indices = self.selection.indices(&self.shapes);
        if clones.len() != indices.len() {
            return Err(ValidationError::invalid_state(format!(
                "{} clones for {} selected shapes",
                clones.len(),
                indices.len()
            )));
        }

        if copy {
            let ids: Vec<ShapeId> = clones.iter().map(Annotation::id).collect();
            self.shapes.extend(clones);
            self.set_selection(&ids);
        } else {
            for (index, clone) in indices.into_iter().zip(clones) {
                self.shapes[index].set_points(clone.points().to_vec())?;
            }
        }
        self.store_shapes();
        self.events.push(CanvasEvent::ShapeMoved);
        tracing::debug!(copy, count = self.selection.len(), "Copy-drag committed");
        Ok(self.selection.ids().to_vec())
    }

    /// Drop the clones of an unfinished copy-drag.
    pub fn cancel_copy(&mut self) {
        if !self.selection_clones.is_empty() {
            tracing::debug!(count = self.selection_clones.len(), "Copy-drag cancelled");
        }
        self.selection_clones.clear();
        if self.grab == Some(Grab::Copy) {
            self.grab = None;
        }
    }

    /// Insert the last hover position as a vertex on the hovered edge and
    /// grab the new vertex.
    pub fn add_point_to_edge(&mut self) -> Result<(), ValidationError> {
        let (Some(id), Some(edge), Some(point)) =
            (self.hover.shape, self.hover.edge, self.last_move_point)
        else {
            return Err(ValidationError::invalid_state("no edge under the cursor"));
        };
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| ValidationError::invalid_state("hovered shape no longer exists"))?;
        if !shape.shape_type().is_multi_point() {
            return Err(ValidationError::invalid_state(format!(
                "cannot add a vertex to a {}",
                shape.shape_type()
            )));
        }
        shape.insert_point(edge, point);
        shape.highlight_vertex(edge, HighlightMode::Move);
        self.hover = Hover {
            shape: Some(id),
            vertex: Some(edge),
            edge: None,
        };
        self.store_shapes();
        Ok(())
    }

    /// Label the most recently added shape. The label becomes part of the
    /// snapshot taken when the shape was finalized rather than a new step.
    pub fn set_last_label(&mut self, label: Label) -> Result<ShapeId, ValidationError> {
        let shape = self
            .shapes
            .last_mut()
            .ok_or_else(|| ValidationError::invalid_state("no shapes to label"))?;
        shape.set_label(Some(label));
        let id = shape.id();
        self.history.replace_latest(self.shapes.clone());
        Ok(id)
    }

    /// Label the topmost selected shape.
    pub fn apply_label_to_selection(&mut self, label: Label) -> Result<ShapeId, ValidationError> {
        let index = self
            .selection
            .indices(&self.shapes)
            .last()
            .copied()
            .ok_or_else(|| ValidationError::invalid_state("nothing selected"))?;
        self.shapes[index].set_label(Some(label));
        let id = self.shapes[index].id();
        self.store_shapes();
        Ok(id)
    }

    /// Show or hide one shape. Not recorded in history.
    pub fn set_shape_visible(&mut self, id: ShapeId, visible: bool) -> bool {
        match self.shapes.iter_mut().find(|s| s.id() == id) {
            Some(shape) => {
                shape.set_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Show or hide every selected shape.
    pub fn set_selection_visibility(&mut self, visible: bool) {
        let selection = &self.selection;
        let changed = set_visibility(
            self.shapes.iter_mut().filter(|s| selection.contains(s.id())),
            visible,
        );
        if changed {
            self.store_shapes();
        }
    }

    /// Show or hide every shape.
    pub fn set_all_visibility(&mut self, visible: bool) {
        if set_visibility(self.shapes.iter_mut(), visible) {
            self.store_shapes();
        }
    }

    /// Show everything if anything is hidden, otherwise hide everything.
    pub fn toggle_all_visibility(&mut self) {
        let any_hidden = self.shapes.iter().any(|s| !s.is_visible());
        self.set_all_visibility(any_hidden);
    }

    /// Replace the selection, e.g. from an external list widget.
    pub fn select_shapes(&mut self, ids: &[ShapeId]) {
        self.set_selection(ids);
    }

    pub fn deselect(&mut self) {
        self.set_selection(&[]);
    }

    fn set_selection(&mut self, ids: &[ShapeId]) {
        let before = self.selection.ids().to_vec();
        self.selection.set(ids, &self.shapes);
        self.notify_selection(&before);
    }

    fn notify_selection(&mut self, before: &[ShapeId]) {
        if self.selection.ids() != before {
            tracing::debug!(count = self.selection.len(), "Selection changed");
            self.events
                .push(CanvasEvent::SelectionChanged(self.selection.ids().to_vec()));
        }
    }

    fn store_shapes(&mut self) {
        self.history.push(self.shapes.clone());
        tracing::debug!(snapshots = self.history.len(), "Stored shape snapshot");
    }

    fn restore_shapes(&mut self) -> bool {
        let Some(shapes) = self.history.restore() else {
            return false;
        };
        tracing::debug!(count = shapes.len(), "Restored shape snapshot");
        self.apply_restored(shapes);
        true
    }

    fn apply_restored(&mut self, shapes: Vec<Annotation>) {
        self.clear_interaction();
        self.shapes = shapes;
        for shape in &mut self.shapes {
            shape.clear_highlight();
        }
        self.events.push(CanvasEvent::ShapesRestored);
    }

    fn finish_or_discard(&mut self) {
        let Some(ready) = self.current.as_ref().map(Annotation::can_finalize) else {
            return;
        };
        if ready {
            if let Err(err) = self.finalize() {
                tracing::warn!(%err, "Could not finalize shape");
            }
        } else {
            self.cancel_current();
        }
    }

    fn unhighlight(&mut self) {
        for shape in &mut self.shapes {
            shape.clear_highlight();
        }
        if self.hover.edge.is_some() {
            self.events.push(CanvasEvent::EdgeSelected(false));
        }
        self.hover.clear();
    }

    fn clear_interaction(&mut self) {
        self.current = None;
        self.preview = None;
        self.selection_clones.clear();
        self.hover.clear();
        self.grab = None;
        self.drag = DragState::default();
        self.last_move_point = None;
        self.set_selection(&[]);
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }
}

fn set_visibility<'a>(shapes: impl Iterator<Item = &'a mut Annotation>, visible: bool) -> bool {
    let mut changed = false;
    for shape in shapes {
        if shape.is_visible() != visible {
            shape.set_visible(visible);
            changed = true;
        }
    }
    changed
}
