use crate::annotation::{Annotation, ShapeId};
use annotkit_core::Point;

/// Tracks which annotations are selected.
///
/// `SelectionManager` is responsible for:
/// - Hit-testing the shape set topmost-first
/// - Replacing the selection on a plain click
/// - Growing the selection on a modifier click
///
/// # Selection Model
///
/// The selection is a list of [`ShapeId`]s kept in shape-set order, so the
/// last entry is the topmost selected shape. Ids are resolved against the
/// shape set on every access; ids of removed shapes are dropped by
/// [`SelectionManager::retain_existing`].
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Vec<ShapeId>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use annotkit_canvas::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert!(manager.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in shape-set order.
    pub fn ids(&self) -> &[ShapeId] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.selected.contains(&id)
    }

    /// Index of the topmost visible shape containing `point`.
    pub fn hit_test(shapes: &[Annotation], point: Point) -> Option<usize> {
        shapes
            .iter()
            .rposition(|s| s.is_visible() && s.contains_point(point))
    }

    /// Replace the selection with a single shape.
    pub fn select_only(&mut self, id: ShapeId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Add a shape, ignoring duplicates, and restore shape-set order.
    pub fn add(&mut self, id: ShapeId, shapes: &[Annotation]) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
        self.retain_existing(shapes);
    }

    /// Replace the selection with `ids`, ignoring unknown ids.
    pub fn set(&mut self, ids: &[ShapeId], shapes: &[Annotation]) {
        self.selected = ids.to_vec();
        self.retain_existing(shapes);
    }

    /// Click selection.
    ///
    /// With `multiple` the topmost shape under `point` is added to the
    /// selection; otherwise it replaces it, unless it is already selected so
    /// that a multi-selection can be grabbed as a whole. Returns the hit
    /// shape's index. A click on empty space clears the selection.
    pub fn select_at(
        &mut self,
        shapes: &[Annotation],
        point: Point,
        multiple: bool,
    ) -> Option<usize> {
        let Some(index) = Self::hit_test(shapes, point) else {
            self.clear();
            return None;
        };
        let id = shapes[index].id();
        if multiple {
            self.add(id, shapes);
        } else if !self.contains(id) {
            self.select_only(id);
        }
        Some(index)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop ids that no longer exist and sort the rest by shape-set position.
    pub fn retain_existing(&mut self, shapes: &[Annotation]) {
        let selected = std::mem::take(&mut self.selected);
        self.selected = shapes
            .iter()
            .map(Annotation::id)
            .filter(|id| selected.contains(id))
            .collect();
    }

    /// Indices of the selected shapes within `shapes`.
    pub fn indices(&self, shapes: &[Annotation]) -> Vec<usize> {
        shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| self.contains(s.id()))
            .map(|(i, _)| i)
            .collect()
    }
}
