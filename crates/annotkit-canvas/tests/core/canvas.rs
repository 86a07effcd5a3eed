use annotkit_canvas::{
    Annotation, Buttons, Canvas, CanvasEvent, CanvasMode, ImageBounds, InteractionState, Key,
    Label, Modifiers, PointerButton, ShapeId, ShapeType,
};
use annotkit_core::{Point, Rect, ValidationError};

fn canvas(width: u32, height: u32) -> Canvas {
    let mut canvas = Canvas::new();
    canvas.load_image(ImageBounds::new(width, height).unwrap());
    canvas
}

fn rectangle(x: f64, y: f64, size: f64) -> Annotation {
    Annotation::with_points(
        ShapeType::Rectangle,
        vec![Point::new(x, y), Point::new(x + size, y + size)],
    )
    .unwrap()
}

fn square_polygon(x: f64, y: f64, size: f64) -> Annotation {
    Annotation::with_points(
        ShapeType::Polygon,
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ],
    )
    .unwrap()
}

fn click(canvas: &mut Canvas, x: f64, y: f64) {
    let pos = Point::new(x, y);
    canvas.pointer_press(pos, PointerButton::Primary, Modifiers::NONE);
    canvas.pointer_release(pos, PointerButton::Primary, Modifiers::NONE);
}

fn ctrl_click(canvas: &mut Canvas, x: f64, y: f64) {
    let pos = Point::new(x, y);
    canvas.pointer_press(pos, PointerButton::Primary, Modifiers::CTRL);
    canvas.pointer_release(pos, PointerButton::Primary, Modifiers::CTRL);
}

#[test]
fn test_starts_in_edit_mode() {
    let canvas = Canvas::new();
    assert_eq!(canvas.mode(), CanvasMode::Edit);
    assert_eq!(canvas.state(), InteractionState::EditingIdle);
    assert_eq!(canvas.create_type(), ShapeType::Polygon);
}

#[test]
fn test_non_positive_scale_is_rejected() {
    let mut canvas = Canvas::new();
    assert!(matches!(
        canvas.set_scale(0.0),
        Err(ValidationError::InvalidState { .. })
    ));
    canvas.set_scale(2.0).unwrap();
    assert_eq!(canvas.epsilon(), 5.0);
}

#[test]
fn test_finalize_without_shape_fails() {
    let mut canvas = canvas(100, 100);
    assert_eq!(canvas.finalize(), Err(ValidationError::NoCurrentShape));
}

#[test]
fn test_enter_needs_enough_points() {
    let mut canvas = canvas(100, 100);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 10.0, 10.0);
    click(&mut canvas, 30.0, 10.0);
    assert_eq!(
        canvas.state(),
        InteractionState::Creating(ShapeType::Polygon)
    );
    assert!(matches!(
        canvas.finalize(),
        Err(ValidationError::NotFinalizable { required: 3, .. })
    ));
    assert!(!canvas.key_press(Key::Enter));

    click(&mut canvas, 30.0, 30.0);
    assert!(canvas.key_press(Key::Enter));
    assert_eq!(canvas.shape_count(), 1);
    assert!(canvas.shapes()[0].is_closed());
}

#[test]
fn test_escape_discards_drawing() {
    let mut canvas = canvas(100, 100);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 10.0, 10.0);
    click(&mut canvas, 30.0, 10.0);
    assert!(canvas.key_press(Key::Escape));
    assert!(canvas.current().is_none());
    assert!(canvas.preview().is_none());
    assert_eq!(canvas.shape_count(), 0);
    assert!(canvas.history().is_empty());
}

#[test]
fn test_press_outside_image_starts_nothing() {
    let mut canvas = canvas(50, 50);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 60.0, 10.0);
    assert!(canvas.current().is_none());
}

#[test]
fn test_preview_is_clamped_to_image() {
    let mut canvas = canvas(50, 50);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 10.0, 10.0);
    canvas.pointer_move(Point::new(80.0, 10.0), Buttons::NONE);
    let end = canvas.preview().and_then(Annotation::last).unwrap();
    assert!((end.x - 49.0).abs() < 1e-9);
    assert!((end.y - 10.0).abs() < 1e-9);
}

#[test]
fn test_leaving_create_mode_finalizes_or_discards() {
    let mut canvas = canvas(100, 100);
    canvas.set_create_type(ShapeType::Polyline);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 10.0, 10.0);
    click(&mut canvas, 40.0, 10.0);
    canvas.set_mode(CanvasMode::Edit);
    assert_eq!(canvas.shape_count(), 1);
    assert_eq!(canvas.shapes()[0].shape_type(), ShapeType::Polyline);

    canvas.set_create_type(ShapeType::Polygon);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 10.0, 50.0);
    click(&mut canvas, 40.0, 50.0);
    canvas.set_mode(CanvasMode::Edit);
    assert_eq!(canvas.shape_count(), 1);
    assert!(canvas.current().is_none());
}

#[test]
fn test_ctrl_click_finalizes_polyline() {
    let mut canvas = canvas(100, 100);
    canvas.set_create_type(ShapeType::Polyline);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 10.0, 10.0);
    click(&mut canvas, 40.0, 10.0);
    ctrl_click(&mut canvas, 40.0, 40.0);
    assert_eq!(canvas.shape_count(), 1);
    assert_eq!(canvas.shapes()[0].len(), 3);
}

#[test]
fn test_point_is_finalized_on_press() {
    let mut canvas = canvas(100, 100);
    canvas.set_create_type(ShapeType::Point);
    canvas.set_mode(CanvasMode::Create);
    canvas.drain_events();
    click(&mut canvas, 5.0, 5.0);

    assert_eq!(canvas.shape_count(), 1);
    let id = canvas.shapes()[0].id();
    assert!(canvas.drain_events().contains(&CanvasEvent::NewShape(id)));
}

#[test]
fn test_create_undo_removes_points_then_reopens_shape() {
    let mut canvas = canvas(100, 100);
    canvas.set_mode(CanvasMode::Create);
    for (x, y) in [(10.0, 10.0), (40.0, 10.0), (40.0, 40.0)] {
        click(&mut canvas, x, y);
    }
    assert!(canvas.undo());
    assert_eq!(canvas.current().map(Annotation::len), Some(2));

    click(&mut canvas, 40.0, 40.0);
    assert!(canvas.key_press(Key::Enter));
    assert_eq!(canvas.shape_count(), 1);
    assert_eq!(canvas.history().len(), 1);

    assert!(canvas.undo());
    assert_eq!(canvas.shape_count(), 0);
    assert_eq!(canvas.history().len(), 1);
    let current = canvas.current().unwrap();
    assert_eq!(current.len(), 3);
    assert!(!current.is_closed());
}

#[test]
fn test_reopened_rectangle_keeps_anchor() {
    let mut canvas = canvas(100, 100);
    canvas.set_create_type(ShapeType::Rectangle);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 10.0, 10.0);
    click(&mut canvas, 30.0, 30.0);
    assert_eq!(canvas.shape_count(), 1);

    canvas.set_create_type(ShapeType::Circle);
    assert!(canvas.undo_last_line());
    assert_eq!(canvas.create_type(), ShapeType::Rectangle);
    assert_eq!(canvas.current().unwrap().points(), &[Point::new(10.0, 10.0)]);
    assert_eq!(canvas.preview().and_then(Annotation::last), Some(Point::new(30.0, 30.0)));
}

#[test]
fn test_edit_undo_restores_previous_snapshots() {
    let mut canvas = canvas(100, 100);
    canvas.set_create_type(ShapeType::Point);
    canvas.set_mode(CanvasMode::Create);
    for x in [10.0, 20.0, 30.0] {
        click(&mut canvas, x, 10.0);
    }
    canvas.set_mode(CanvasMode::Edit);
    assert_eq!(canvas.history().len(), 3);

    assert!(canvas.undo());
    assert_eq!(canvas.shape_count(), 2);
    assert!(!canvas.undo());
    assert_eq!(canvas.shape_count(), 2);

    assert!(canvas.redo());
    assert_eq!(canvas.shape_count(), 3);
    assert_eq!(canvas.history().len(), 3);
    assert!(!canvas.redo());

    assert!(canvas.undo());
    assert_eq!(canvas.shape_count(), 2);
}

#[test]
fn test_new_snapshot_after_undo_drops_redo() {
    let mut canvas = canvas(100, 100);
    canvas.set_create_type(ShapeType::Point);
    canvas.set_mode(CanvasMode::Create);
    for x in [10.0, 20.0, 30.0] {
        click(&mut canvas, x, 10.0);
    }
    canvas.set_mode(CanvasMode::Edit);
    assert!(canvas.undo());

    canvas.set_all_visibility(false);
    assert!(!canvas.redo());
    assert_eq!(canvas.shape_count(), 2);
}

#[test]
fn test_reopening_moved_shape_keeps_history() {
    let mut canvas = canvas(100, 100);
    canvas.set_mode(CanvasMode::Create);
    for (x, y) in [(10.0, 10.0), (40.0, 10.0), (40.0, 40.0)] {
        click(&mut canvas, x, y);
    }
    assert!(canvas.key_press(Key::Enter));
    let drawn = canvas.shapes()[0].points().to_vec();

    canvas.set_mode(CanvasMode::Edit);
    canvas.pointer_press(Point::new(35.0, 20.0), PointerButton::Primary, Modifiers::NONE);
    canvas.pointer_move(Point::new(45.0, 25.0), Buttons::PRIMARY);
    canvas.pointer_release(Point::new(45.0, 25.0), PointerButton::Primary, Modifiers::NONE);
    assert_eq!(canvas.history().len(), 2);
    let moved = canvas.shapes()[0].points().to_vec();
    assert_ne!(moved, drawn);

    canvas.set_mode(CanvasMode::Create);
    assert!(canvas.undo());
    assert_eq!(canvas.shape_count(), 0);
    assert_eq!(canvas.history().len(), 2);
    let latest = canvas.history().latest().unwrap();
    assert_eq!(latest[0].points(), moved.as_slice());
    assert_eq!(canvas.current().unwrap().points(), moved.as_slice());

    assert!(canvas.key_press(Key::Escape));
    canvas.set_mode(CanvasMode::Edit);
    assert!(canvas.undo());
    assert_eq!(canvas.shape_count(), 1);
    assert_eq!(canvas.shapes()[0].points(), drawn.as_slice());
}

#[test]
fn test_click_at_exactly_epsilon_from_start_adds_vertex() {
    let mut canvas = canvas(100, 100);
    canvas.set_mode(CanvasMode::Create);
    for (x, y) in [(10.0, 10.0), (40.0, 10.0), (40.0, 40.0)] {
        click(&mut canvas, x, y);
    }
    let epsilon = canvas.epsilon();
    canvas.pointer_move(Point::new(10.0, 10.0 + epsilon), Buttons::NONE);
    click(&mut canvas, 10.0, 10.0 + epsilon);
    assert_eq!(canvas.shape_count(), 0);
    assert_eq!(canvas.current().map(Annotation::len), Some(4));

    canvas.pointer_move(Point::new(11.0, 12.0), Buttons::NONE);
    click(&mut canvas, 11.0, 12.0);
    assert_eq!(canvas.shape_count(), 1);
    assert_eq!(canvas.shapes()[0].len(), 4);
    assert!(canvas.shapes()[0].is_closed());
}

#[test]
fn test_history_is_bounded_by_settings() {
    let mut canvas = canvas(100, 100);
    canvas.set_create_type(ShapeType::Point);
    canvas.set_mode(CanvasMode::Create);
    for i in 0..15 {
        click(&mut canvas, f64::from(i), 10.0);
    }
    assert_eq!(canvas.shape_count(), 15);
    assert_eq!(canvas.history().len(), canvas.settings().history_capacity);
}

#[test]
fn test_ctrl_click_extends_and_plain_click_narrows() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 10.0), rectangle(20.0, 20.0, 10.0)], true);
    let a = canvas.shapes()[0].id();
    let b = canvas.shapes()[1].id();

    click(&mut canvas, 5.0, 5.0);
    assert_eq!(canvas.selected_ids(), &[a]);
    ctrl_click(&mut canvas, 25.0, 25.0);
    assert_eq!(canvas.selected_ids(), &[a, b]);

    click(&mut canvas, 5.0, 5.0);
    assert_eq!(canvas.selected_ids(), &[a]);

    click(&mut canvas, 60.0, 60.0);
    assert!(canvas.selected_ids().is_empty());
}

#[test]
fn test_multi_selection_drags_together() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 10.0), rectangle(20.0, 20.0, 10.0)], true);
    click(&mut canvas, 5.0, 5.0);
    ctrl_click(&mut canvas, 25.0, 25.0);

    canvas.pointer_press(Point::new(5.0, 5.0), PointerButton::Primary, Modifiers::NONE);
    canvas.pointer_move(Point::new(15.0, 10.0), Buttons::PRIMARY);
    assert_eq!(canvas.state(), InteractionState::DraggingShapes);
    canvas.pointer_release(Point::new(15.0, 10.0), PointerButton::Primary, Modifiers::NONE);

    assert_eq!(canvas.selected_ids().len(), 2);
    assert_eq!(canvas.shapes()[0].bounding_box(), Some(Rect::new(10.0, 5.0, 10.0, 10.0)));
    assert_eq!(canvas.shapes()[1].bounding_box(), Some(Rect::new(30.0, 25.0, 10.0, 10.0)));
    assert!(canvas.drain_events().contains(&CanvasEvent::ShapeMoved));
}

#[test]
fn test_vertex_drag_stops_at_border() {
    let mut canvas = canvas(50, 50);
    canvas.load_shapes(vec![square_polygon(10.0, 10.0, 10.0)], true);
    let snapshots = canvas.history().len();

    canvas.pointer_move(Point::new(20.0, 20.0), Buttons::NONE);
    assert_eq!(canvas.hover().vertex, Some(2));
    canvas.pointer_press(Point::new(20.0, 20.0), PointerButton::Primary, Modifiers::NONE);
    assert_eq!(canvas.state(), InteractionState::DraggingVertex);
    canvas.pointer_move(Point::new(80.0, 30.0), Buttons::PRIMARY);
    canvas.pointer_release(Point::new(80.0, 30.0), PointerButton::Primary, Modifiers::NONE);

    let moved = canvas.shapes()[0].point(2).unwrap();
    assert!((moved.x - 49.0).abs() < 1e-9);
    assert!(moved.y > 20.0 && moved.y < 49.0);
    assert_eq!(canvas.history().len(), snapshots + 1);
}

#[test]
fn test_hover_prefers_topmost_shape() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 40.0), rectangle(20.0, 20.0, 40.0)], true);
    let top = canvas.shapes()[1].id();
    canvas.pointer_move(Point::new(30.0, 30.0), Buttons::NONE);
    assert_eq!(canvas.hover().shape, Some(top));
}

#[test]
fn test_copy_selected_offsets_duplicate() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(10.0, 10.0, 10.0)], true);
    let original = canvas.shapes()[0].id();
    canvas.select_shapes(&[original]);

    let copies = canvas.copy_selected();
    assert_eq!(copies.len(), 1);
    assert_eq!(canvas.shape_count(), 2);
    assert_eq!(canvas.selected_ids(), copies.as_slice());
    assert_ne!(copies[0], original);
    assert_eq!(
        canvas.shape(copies[0]).and_then(Annotation::bounding_box),
        Some(Rect::new(8.0, 8.0, 10.0, 10.0))
    );
    assert_eq!(
        canvas.shape(original).and_then(Annotation::bounding_box),
        Some(Rect::new(10.0, 10.0, 10.0, 10.0))
    );
}

#[test]
fn test_copy_at_origin_shifts_inward() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 10.0)], true);
    let original = canvas.shapes()[0].id();
    canvas.select_shapes(&[original]);

    let copies = canvas.copy_selected();
    assert_eq!(
        canvas.shape(copies[0]).and_then(Annotation::bounding_box),
        Some(Rect::new(2.0, 2.0, 10.0, 10.0))
    );
}

#[test]
fn test_secondary_drag_copies_selection() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(10.0, 10.0, 10.0)], true);

    canvas.pointer_press(Point::new(15.0, 15.0), PointerButton::Secondary, Modifiers::NONE);
    assert_eq!(canvas.state(), InteractionState::CopyDragging);
    canvas.pointer_move(Point::new(45.0, 15.0), Buttons::SECONDARY);
    assert_eq!(canvas.selection_clones().len(), 1);
    canvas.pointer_release(Point::new(45.0, 15.0), PointerButton::Secondary, Modifiers::NONE);

    assert_eq!(canvas.shape_count(), 2);
    assert!(canvas.selection_clones().is_empty());
    let copy = canvas.selected_ids()[0];
    assert_eq!(
        canvas.shape(copy).and_then(Annotation::bounding_box),
        Some(Rect::new(40.0, 10.0, 10.0, 10.0))
    );
}

#[test]
fn test_escape_cancels_copy_drag() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(10.0, 10.0, 10.0)], true);
    canvas.pointer_press(Point::new(15.0, 15.0), PointerButton::Secondary, Modifiers::NONE);
    canvas.pointer_move(Point::new(30.0, 15.0), Buttons::SECONDARY);
    assert!(canvas.key_press(Key::Escape));
    assert!(canvas.selection_clones().is_empty());
    assert_eq!(canvas.shape_count(), 1);
}

#[test]
fn test_delete_selected() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 10.0), rectangle(20.0, 20.0, 10.0)], true);
    let keep = canvas.shapes()[1].id();
    click(&mut canvas, 5.0, 5.0);
    canvas.drain_events();

    let deleted = canvas.delete_selected();
    assert_eq!(deleted.len(), 1);
    assert_eq!(canvas.shape_count(), 1);
    assert_eq!(canvas.shapes()[0].id(), keep);
    assert!(canvas
        .drain_events()
        .contains(&CanvasEvent::SelectionChanged(Vec::new())));
    assert!(canvas.delete_selected().is_empty());
}

#[test]
fn test_add_point_to_hovered_edge() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![square_polygon(0.0, 0.0, 40.0)], true);
    let snapshots = canvas.history().len();

    canvas.pointer_move(Point::new(20.0, 2.0), Buttons::NONE);
    assert_eq!(canvas.hover().edge, Some(1));
    assert!(canvas.drain_events().contains(&CanvasEvent::EdgeSelected(true)));

    canvas.add_point_to_edge().unwrap();
    let shape = &canvas.shapes()[0];
    assert_eq!(shape.len(), 5);
    assert_eq!(shape.point(1), Some(Point::new(20.0, 2.0)));
    assert_eq!(canvas.hover().vertex, Some(1));
    assert_eq!(canvas.history().len(), snapshots + 1);
}

#[test]
fn test_add_point_rejected_for_rectangle() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 40.0)], true);
    canvas.pointer_move(Point::new(20.0, 22.0), Buttons::NONE);
    assert_eq!(canvas.hover().edge, Some(0));
    assert!(canvas.add_point_to_edge().is_err());
    assert_eq!(canvas.shapes()[0].len(), 2);
}

#[test]
fn test_last_label_amends_latest_snapshot() {
    let mut canvas = canvas(100, 100);
    canvas.set_create_type(ShapeType::Point);
    canvas.set_mode(CanvasMode::Create);
    click(&mut canvas, 5.0, 5.0);
    let snapshots = canvas.history().len();

    let id = canvas.set_last_label(Label::new("tree")).unwrap();
    assert_eq!(canvas.history().len(), snapshots);
    let stored = canvas.history().latest().unwrap();
    assert_eq!(stored[0].label().map(|l| l.name.as_str()), Some("tree"));
    assert_eq!(canvas.shape(id).and_then(Annotation::label), Some(&Label::new("tree")));
}

#[test]
fn test_label_selection() {
    let mut canvas = canvas(100, 100);
    assert!(canvas.apply_label_to_selection(Label::new("car")).is_err());
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 10.0)], true);
    click(&mut canvas, 5.0, 5.0);
    let id = canvas
        .apply_label_to_selection(Label::new("car").with_attribute("truncated", true))
        .unwrap();
    let label = canvas.shape(id).and_then(Annotation::label).unwrap();
    assert_eq!(label.name, "car");
}

#[test]
fn test_hidden_shapes_are_not_hit() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 10.0)], true);
    let id = canvas.shapes()[0].id();
    let snapshots = canvas.history().len();

    assert!(canvas.set_shape_visible(id, false));
    assert_eq!(canvas.history().len(), snapshots);
    click(&mut canvas, 5.0, 5.0);
    assert!(canvas.selected_ids().is_empty());

    canvas.toggle_all_visibility();
    assert!(canvas.shapes()[0].is_visible());
    canvas.toggle_all_visibility();
    assert!(!canvas.shapes()[0].is_visible());
    assert!(!canvas.set_shape_visible(ShapeId::new(), true));
}

#[test]
fn test_bulk_visibility_changes_are_snapshotted() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 10.0), rectangle(20.0, 20.0, 10.0)], true);
    let first = canvas.shapes()[0].id();
    canvas.select_shapes(&[first]);
    let snapshots = canvas.history().len();

    canvas.set_selection_visibility(false);
    assert_eq!(canvas.history().len(), snapshots + 1);
    assert!(!canvas.shapes()[0].is_visible());
    assert!(canvas.shapes()[1].is_visible());
    assert!(canvas.history().latest().unwrap()[1].is_visible());
    assert!(!canvas.history().latest().unwrap()[0].is_visible());

    canvas.set_selection_visibility(false);
    assert_eq!(canvas.history().len(), snapshots + 1);

    canvas.set_all_visibility(false);
    assert_eq!(canvas.history().len(), snapshots + 2);
    assert!(canvas.shapes().iter().all(|s| !s.is_visible()));
    canvas.set_all_visibility(false);
    assert_eq!(canvas.history().len(), snapshots + 2);

    canvas.toggle_all_visibility();
    assert_eq!(canvas.history().len(), snapshots + 3);
    assert!(canvas.shapes().iter().all(Annotation::is_visible));
}

#[test]
fn test_end_move_without_copy_moves_originals() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(10.0, 10.0, 10.0)], true);
    let original = canvas.shapes()[0].id();
    let snapshots = canvas.history().len();
    assert!(canvas.end_move(false).is_err());

    canvas.pointer_press(Point::new(15.0, 15.0), PointerButton::Secondary, Modifiers::NONE);
    canvas.pointer_move(Point::new(45.0, 15.0), Buttons::SECONDARY);
    assert_eq!(canvas.selection_clones().len(), 1);
    canvas.drain_events();

    let ids = canvas.end_move(false).unwrap();
    assert_eq!(ids, vec![original]);
    assert_eq!(canvas.shape_count(), 1);
    assert!(canvas.selection_clones().is_empty());
    assert_eq!(
        canvas.shape(original).and_then(Annotation::bounding_box),
        Some(Rect::new(40.0, 10.0, 10.0, 10.0))
    );
    assert_eq!(canvas.history().len(), snapshots + 1);
    assert!(canvas.drain_events().contains(&CanvasEvent::ShapeMoved));
}

#[test]
fn test_load_image_resets_everything() {
    let mut canvas = canvas(100, 100);
    canvas.load_shapes(vec![rectangle(0.0, 0.0, 10.0)], true);
    click(&mut canvas, 5.0, 5.0);
    canvas.load_image(ImageBounds::new(20, 20).unwrap());
    assert_eq!(canvas.shape_count(), 0);
    assert!(canvas.selected_ids().is_empty());
    assert!(canvas.history().is_empty());
    assert_eq!(canvas.bounds().map(|b| b.width()), Some(20));
}
