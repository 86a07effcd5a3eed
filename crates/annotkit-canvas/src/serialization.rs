//! Serialization and deserialization of annotation sidecar files.
//!
//! Annotations for `photo.png` are stored next to it in
//! `photo.annotations.json`, a JSON document holding the image metadata and
//! one record per shape. Shape ids are session-local and are not stored.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::annotation::{Annotation, ShapeType};
use crate::boundary::ImageBounds;
use crate::canvas::Canvas;
use crate::label::Label;
use annotkit_core::{Point, ValidationError};

/// Annotation file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Suffix appended to the image stem
const SIDECAR_SUFFIX: &str = ".annotations.json";

/// Complete annotation file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub version: String,
    pub metadata: AnnotationMetadata,
    pub shapes: Vec<ShapeRecord>,
}

/// Image the annotations belong to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    /// Image file name
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Serialized shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub shape_type: ShapeType,
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

fn default_visible() -> bool {
    true
}

impl ShapeRecord {
    pub fn from_annotation(shape: &Annotation) -> Self {
        Self {
            shape_type: shape.shape_type(),
            points: shape.points().iter().map(|p| [p.x, p.y]).collect(),
            closed: shape.is_closed(),
            visible: shape.is_visible(),
            label: shape.label().cloned(),
        }
    }

    /// Rebuild the shape with a fresh id.
    pub fn to_annotation(&self) -> Result<Annotation> {
        let points = self.points.iter().map(|[x, y]| Point::new(*x, *y)).collect();
        let mut shape = Annotation::with_points(self.shape_type, points)
            .with_context(|| format!("Invalid {} record", self.shape_type))?;
        if !shape.can_finalize() {
            return Err(ValidationError::NotFinalizable {
                shape_type: self.shape_type.to_string(),
                points: shape.len(),
                required: self.shape_type.min_points(),
            })
            .with_context(|| format!("Invalid {} record", self.shape_type));
        }
        if self.closed {
            shape.close();
        }
        shape.set_visible(self.visible);
        shape.set_label(self.label.clone());
        Ok(shape)
    }
}

impl AnnotationFile {
    /// Empty annotation file for an image.
    pub fn new(image: impl Into<String>, bounds: ImageBounds) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: AnnotationMetadata {
                image: image.into(),
                width: bounds.width(),
                height: bounds.height(),
                created: now,
                modified: now,
            },
            shapes: Vec::new(),
        }
    }

    /// Replace the stored shapes and bump the modified time.
    pub fn set_shapes(&mut self, shapes: &[Annotation]) {
        self.shapes = shapes.iter().map(ShapeRecord::from_annotation).collect();
        self.metadata.modified = Utc::now();
    }

    /// Decode every record. Fails on the first invalid one.
    pub fn to_annotations(&self) -> Result<Vec<Annotation>> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, record)| {
                record
                    .to_annotation()
                    .with_context(|| format!("Shape {} is invalid", i))
            })
            .collect()
    }

    pub fn image_bounds(&self) -> Result<ImageBounds> {
        ImageBounds::new(self.metadata.width, self.metadata.height)
            .context("Invalid image size in annotation file")
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize annotations")?;

        std::fs::write(path.as_ref(), json).context("Failed to write annotation file")?;

        tracing::info!(
            path = %path.as_ref().display(),
            shapes = self.shapes.len(),
            "Saved annotations"
        );
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read annotation file")?;

        let file: AnnotationFile =
            serde_json::from_str(&content).context("Failed to parse annotation file")?;

        if file.version != FILE_FORMAT_VERSION {
            tracing::warn!(version = %file.version, "Unexpected annotation file version");
        }
        tracing::info!(
            path = %path.as_ref().display(),
            shapes = file.shapes.len(),
            "Loaded annotations"
        );
        Ok(file)
    }
}

/// Sidecar location for an image: same directory, `<stem>.annotations.json`.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    image_path.with_file_name(format!("{}{}", stem, SIDECAR_SUFFIX))
}

/// Write the canvas shapes next to `image_path`. The creation time of an
/// existing sidecar is kept.
pub fn save_sidecar(image_path: &Path, canvas: &Canvas) -> Result<PathBuf> {
    let Some(bounds) = canvas.bounds() else {
        bail!("No image loaded");
    };
    let path = sidecar_path(image_path);
    let image_name = image_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut file = AnnotationFile::new(image_name, bounds);
    if path.exists() {
        match AnnotationFile::load_from_file(&path) {
            Ok(previous) => file.metadata.created = previous.metadata.created,
            Err(err) => tracing::warn!(%err, "Overwriting unreadable annotation file"),
        }
    }
    file.set_shapes(canvas.shapes());
    file.save_to_file(&path)?;
    Ok(path)
}

/// Load the sidecar of `image_path` into the canvas, replacing its shapes.
///
/// Returns `false` when there is no sidecar.
pub fn load_sidecar(image_path: &Path, canvas: &mut Canvas) -> Result<bool> {
    let path = sidecar_path(image_path);
    if !path.exists() {
        return Ok(false);
    }
    let file = AnnotationFile::load_from_file(&path)?;
    if let Some(bounds) = canvas.bounds() {
        if bounds != file.image_bounds()? {
            tracing::warn!(
                expected_width = bounds.width(),
                expected_height = bounds.height(),
                width = file.metadata.width,
                height = file.metadata.height,
                "Annotation file was made for a different image size"
            );
        }
    }
    let shapes = file.to_annotations()?;
    canvas.load_shapes(shapes, true);
    Ok(true)
}
