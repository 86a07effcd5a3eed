use annotkit_canvas::{
    load_sidecar, save_sidecar, sidecar_path, Annotation, AnnotationFile, Canvas, ImageBounds,
    Label, ShapeType,
};
use annotkit_core::{Point, ValidationError};
use std::path::Path;
use tempfile::TempDir;

fn annotated_canvas() -> Canvas {
    let mut canvas = Canvas::new();
    canvas.load_image(ImageBounds::new(64, 48).unwrap());
    let mut polygon = Annotation::with_points(
        ShapeType::Polygon,
        vec![
            Point::new(1.0, 1.0),
            Point::new(20.5, 1.0),
            Point::new(10.0, 30.25),
        ],
    )
    .unwrap();
    polygon.close();
    polygon.set_label(Some(
        Label::new("leaf")
            .with_attribute("occluded", true)
            .with_attribute("score", 0.5),
    ));
    let mut line = Annotation::with_points(
        ShapeType::Line,
        vec![Point::new(0.0, 0.0), Point::new(63.0, 47.0)],
    )
    .unwrap();
    line.set_visible(false);
    canvas.load_shapes(vec![polygon, line], true);
    canvas
}

#[test]
fn test_sidecar_path_replaces_extension() {
    assert_eq!(
        sidecar_path(Path::new("/data/photos/cat.png")),
        Path::new("/data/photos/cat.annotations.json")
    );
    assert_eq!(
        sidecar_path(Path::new("scan")),
        Path::new("scan.annotations.json")
    );
}

#[test]
fn test_sidecar_round_trip() {
    let dir = TempDir::new().unwrap();
    let image_path = dir.path().join("leaf.jpg");
    let canvas = annotated_canvas();

    let written = save_sidecar(&image_path, &canvas).unwrap();
    assert_eq!(written, dir.path().join("leaf.annotations.json"));

    let mut reloaded = Canvas::new();
    reloaded.load_image(ImageBounds::new(64, 48).unwrap());
    assert!(load_sidecar(&image_path, &mut reloaded).unwrap());

    assert_eq!(reloaded.shape_count(), 2);
    for (before, after) in canvas.shapes().iter().zip(reloaded.shapes()) {
        assert_eq!(before.shape_type(), after.shape_type());
        assert_eq!(before.points(), after.points());
        assert_eq!(before.is_closed(), after.is_closed());
        assert_eq!(before.is_visible(), after.is_visible());
        assert_eq!(before.label(), after.label());
        assert_ne!(before.id(), after.id());
    }
    assert_eq!(reloaded.history().len(), 1);
}

#[test]
fn test_missing_sidecar_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let mut canvas = Canvas::new();
    assert!(!load_sidecar(&dir.path().join("none.png"), &mut canvas).unwrap());
    assert_eq!(canvas.shape_count(), 0);
}

#[test]
fn test_save_without_image_fails() {
    let dir = TempDir::new().unwrap();
    let canvas = Canvas::new();
    assert!(save_sidecar(&dir.path().join("a.png"), &canvas).is_err());
}

#[test]
fn test_resave_keeps_creation_time() {
    let dir = TempDir::new().unwrap();
    let image_path = dir.path().join("leaf.jpg");
    let canvas = annotated_canvas();

    let path = save_sidecar(&image_path, &canvas).unwrap();
    let first = AnnotationFile::load_from_file(&path).unwrap();
    save_sidecar(&image_path, &canvas).unwrap();
    let second = AnnotationFile::load_from_file(&path).unwrap();

    assert_eq!(first.metadata.created, second.metadata.created);
    assert!(second.metadata.modified >= first.metadata.modified);
    assert_eq!(second.metadata.image, "leaf.jpg");
    assert_eq!((second.metadata.width, second.metadata.height), (64, 48));
}

#[test]
fn test_invalid_record_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.annotations.json");
    let json = r#"{
        "version": "1.0",
        "metadata": {
            "image": "bad.png",
            "width": 10,
            "height": 10,
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z"
        },
        "shapes": [
            { "shape_type": "rectangle", "points": [[0, 0], [1, 1], [2, 2]] }
        ]
    }"#;
    std::fs::write(&path, json).unwrap();

    let file = AnnotationFile::load_from_file(&path).unwrap();
    assert!(file.to_annotations().is_err());
}

#[test]
fn test_unknown_shape_type_fails_to_parse() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("odd.annotations.json");
    let json = r#"{
        "version": "1.0",
        "metadata": {
            "image": "odd.png",
            "width": 10,
            "height": 10,
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z"
        },
        "shapes": [ { "shape_type": "hexagon", "points": [] } ]
    }"#;
    std::fs::write(&path, json).unwrap();
    assert!(AnnotationFile::load_from_file(&path).is_err());
}

#[test]
fn test_linestrip_alias_is_accepted() {
    let json = r#"{ "shape_type": "linestrip", "points": [[0, 0], [3, 4]] }"#;
    let record: annotkit_canvas::ShapeRecord = serde_json::from_str(json).unwrap();
    let shape = record.to_annotation().unwrap();
    assert_eq!(shape.shape_type(), ShapeType::Polyline);
    assert!(shape.is_visible());
    assert!(!shape.is_closed());
}

#[test]
fn test_records_short_of_minimum_points_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.annotations.json");
    let json = r#"{
        "version": "1.0",
        "metadata": {
            "image": "short.png",
            "width": 10,
            "height": 10,
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z"
        },
        "shapes": [ { "shape_type": "point", "points": [] } ]
    }"#;
    std::fs::write(&path, json).unwrap();

    let file = AnnotationFile::load_from_file(&path).unwrap();
    let err = file.to_annotations().unwrap_err();
    assert!(err
        .chain()
        .any(|cause| matches!(
            cause.downcast_ref::<ValidationError>(),
            Some(ValidationError::NotFinalizable { points: 0, required: 1, .. })
        )));

    let json = r#"{ "shape_type": "rectangle", "points": [[2, 2]] }"#;
    let record: annotkit_canvas::ShapeRecord = serde_json::from_str(json).unwrap();
    assert!(record.to_annotation().is_err());

    let json = r#"{ "shape_type": "polygon", "points": [[0, 0], [5, 0]], "closed": true }"#;
    let record: annotkit_canvas::ShapeRecord = serde_json::from_str(json).unwrap();
    assert!(record.to_annotation().is_err());
}
