//! Overlay renderer for annotation shapes.
//!
//! Rendering is split in two steps:
//! - [`build_commands`] turns the canvas state into a flat list of
//!   [`DrawCommand`]s in image coordinates, choosing colors from a [`Style`]
//! - a [`RenderBackend`] paints those commands; [`PixmapBackend`] does it
//!   with tiny-skia and exports an RGBA image buffer
//!
//! Line widths and marker sizes are divided by the zoom scale so they stay
//! constant on screen.

use crate::annotation::{Annotation, ShapeType, VertexMarker};
use crate::canvas::Canvas;
use annotkit_core::{Point, Rect, ValidationError};
use annotkit_settings::{Config, Rgba, ThemeSettings};
use image::RgbaImage;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

/// Alpha of the polygon fill shown while drawing.
const DRAWING_FILL_ALPHA: u8 = 64;

/// Immutable paint settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub line_color: Rgba,
    pub fill_color: Rgba,
    pub select_line_color: Rgba,
    pub select_fill_color: Rgba,
    pub vertex_fill_color: Rgba,
    pub hvertex_fill_color: Rgba,
    pub drawing_line_color: Rgba,
    pub point_size: f64,
    /// Fill the polygon being drawn
    pub fill_drawing: bool,
}

impl Style {
    pub fn from_theme(theme: &ThemeSettings, fill_drawing: bool) -> Self {
        Self {
            line_color: theme.line_color,
            fill_color: theme.fill_color,
            select_line_color: theme.select_line_color,
            select_fill_color: theme.select_fill_color,
            vertex_fill_color: theme.vertex_fill_color,
            hvertex_fill_color: theme.hvertex_fill_color,
            drawing_line_color: theme.drawing_line_color,
            point_size: theme.point_size,
            fill_drawing,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::from_theme(&ThemeSettings::default(), false)
    }
}

impl From<&Config> for Style {
    fn from(config: &Config) -> Self {
        Self::from_theme(&config.theme, config.canvas.fill_drawing)
    }
}

/// One primitive in image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Path {
        points: Vec<Point>,
        closed: bool,
        stroke: Rgba,
        width: f64,
        fill: Option<Rgba>,
    },
    Rect {
        rect: Rect,
        stroke: Rgba,
        width: f64,
        fill: Option<Rgba>,
    },
    Ellipse {
        center: Point,
        radius: f64,
        stroke: Rgba,
        width: f64,
        fill: Option<Rgba>,
    },
    Vertex {
        center: Point,
        size: f64,
        marker: VertexMarker,
        fill: Rgba,
    },
}

/// Something that can paint draw commands.
pub trait RenderBackend {
    fn draw(&mut self, command: &DrawCommand);
}

struct ShapePaint {
    stroke: Rgba,
    fill: Option<Rgba>,
}

/// Draw commands for the whole canvas, bottom to top: finalized shapes,
/// the shape being drawn with its preview, then copy-drag clones.
pub fn build_commands(canvas: &Canvas, style: &Style) -> Vec<DrawCommand> {
    let scale = canvas.scale();
    let hiding = canvas.is_hiding();
    let hovered = canvas.hover().shape;
    let mut commands = Vec::new();

    for shape in canvas.shapes() {
        let selected = canvas.is_selected(shape.id());
        if !shape.is_visible() || (hiding && !selected) {
            continue;
        }
        let filled = selected || hovered == Some(shape.id());
        let paint = ShapePaint {
            stroke: if selected {
                style.select_line_color
            } else {
                style.line_color
            },
            fill: filled.then_some(if selected {
                style.select_fill_color
            } else {
                style.fill_color
            }),
        };
        push_shape(&mut commands, shape, &paint, style, scale);
    }

    if let Some(current) = canvas.current() {
        let drawing = ShapePaint {
            stroke: style.drawing_line_color,
            fill: None,
        };
        if style.fill_drawing && current.shape_type() == ShapeType::Polygon && current.len() >= 2 {
            if let Some(trailing) = canvas.preview().and_then(Annotation::last) {
                let mut points = current.points().to_vec();
                points.push(trailing);
                let mut fill = style.fill_color;
                fill[3] = DRAWING_FILL_ALPHA;
                commands.push(DrawCommand::Path {
                    points,
                    closed: true,
                    stroke: style.drawing_line_color,
                    width: line_width(scale),
                    fill: Some(fill),
                });
            }
        }
        push_shape(&mut commands, current, &drawing, style, scale);
        if let Some(preview) = canvas.preview() {
            push_shape(&mut commands, preview, &drawing, style, scale);
        }
    }

    for clone in canvas.selection_clones() {
        let paint = ShapePaint {
            stroke: style.select_line_color,
            fill: Some(style.select_fill_color),
        };
        push_shape(&mut commands, clone, &paint, style, scale);
    }

    commands
}

fn line_width(scale: f64) -> f64 {
    (2.0 / scale).round().max(1.0)
}

fn push_shape(
    commands: &mut Vec<DrawCommand>,
    shape: &Annotation,
    paint: &ShapePaint,
    style: &Style,
    scale: f64,
) {
    let width = line_width(scale);
    match (shape.shape_type(), shape.points()) {
        (_, []) => return,
        (ShapeType::Rectangle, [a, b]) => commands.push(DrawCommand::Rect {
            rect: Rect::from_corners(*a, *b),
            stroke: paint.stroke,
            width,
            fill: paint.fill,
        }),
        (ShapeType::Circle, [center, rim]) => commands.push(DrawCommand::Ellipse {
            center: *center,
            radius: center.distance_to(rim),
            stroke: paint.stroke,
            width,
            fill: paint.fill,
        }),
        (ShapeType::Rectangle | ShapeType::Circle | ShapeType::Point, _) => {}
        (ShapeType::Polyline | ShapeType::Line, points) => commands.push(DrawCommand::Path {
            points: points.to_vec(),
            closed: false,
            stroke: paint.stroke,
            width,
            fill: None,
        }),
        (ShapeType::Polygon, points) => commands.push(DrawCommand::Path {
            points: points.to_vec(),
            closed: shape.is_closed(),
            stroke: paint.stroke,
            width,
            fill: paint.fill,
        }),
    }

    let highlight = shape.highlight();
    let vertex_fill = if highlight.is_some() {
        style.hvertex_fill_color
    } else {
        style.vertex_fill_color
    };
    let base = style.point_size / scale;
    for (i, p) in shape.points().iter().enumerate() {
        let (size, marker) = match highlight {
            Some(h) if h.vertex == i => (base * h.mode.scale(), h.mode.marker()),
            _ => (base, VertexMarker::Round),
        };
        commands.push(DrawCommand::Vertex {
            center: *p,
            size,
            marker,
            fill: vertex_fill,
        });
    }
}

/// Paint commands onto a canvas-sized tiny-skia pixmap.
pub struct PixmapBackend {
    pixmap: Pixmap,
    transform: Transform,
}

impl PixmapBackend {
    /// Transparent `width` x `height` pixmap; image coordinates are scaled
    /// by `scale`.
    pub fn new(width: u32, height: u32, scale: f64) -> Result<Self, ValidationError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(ValidationError::InvalidImageSize { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::from_scale(scale as f32, scale as f32),
        })
    }

    /// Demultiplied RGBA copy of the pixmap.
    pub fn into_image(self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    fn fill_and_stroke(&mut self, path: &Path, stroke: Rgba, width: f64, fill: Option<Rgba>) {
        if let Some(fill) = fill {
            self.pixmap
                .fill_path(path, &paint_of(fill), FillRule::Winding, self.transform, None);
        }
        let stroke_style = Stroke {
            width: width as f32,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(path, &paint_of(stroke), &stroke_style, self.transform, None);
    }
}

impl RenderBackend for PixmapBackend {
    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Path {
                points,
                closed,
                stroke,
                width,
                fill,
            } => {
                let Some(path) = polyline_path(points, *closed) else {
                    return;
                };
                self.fill_and_stroke(&path, *stroke, *width, *fill);
            }
            DrawCommand::Rect {
                rect,
                stroke,
                width,
                fill,
            } => {
                let Some(r) = tiny_skia::Rect::from_xywh(
                    rect.x as f32,
                    rect.y as f32,
                    rect.width as f32,
                    rect.height as f32,
                ) else {
                    return;
                };
                let path = PathBuilder::from_rect(r);
                self.fill_and_stroke(&path, *stroke, *width, *fill);
            }
            DrawCommand::Ellipse {
                center,
                radius,
                stroke,
                width,
                fill,
            } => {
                let Some(path) =
                    PathBuilder::from_circle(center.x as f32, center.y as f32, *radius as f32)
                else {
                    return;
                };
                self.fill_and_stroke(&path, *stroke, *width, *fill);
            }
            DrawCommand::Vertex {
                center,
                size,
                marker,
                fill,
            } => {
                let half = (*size / 2.0) as f32;
                let (cx, cy) = (center.x as f32, center.y as f32);
                let path = match marker {
                    VertexMarker::Round => PathBuilder::from_circle(cx, cy, half),
                    VertexMarker::Square => {
                        tiny_skia::Rect::from_xywh(cx - half, cy - half, half * 2.0, half * 2.0)
                            .map(PathBuilder::from_rect)
                    }
                };
                if let Some(path) = path {
                    self.pixmap
                        .fill_path(&path, &paint_of(*fill), FillRule::Winding, self.transform, None);
                }
            }
        }
    }
}

fn paint_of(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

fn polyline_path(points: &[Point], closed: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

/// Paint every command on `backend`.
pub fn render(canvas: &Canvas, style: &Style, backend: &mut impl RenderBackend) {
    for command in build_commands(canvas, style) {
        backend.draw(&command);
    }
}

/// Render the canvas overlay into a transparent `width` x `height` image.
pub fn render_overlay(
    canvas: &Canvas,
    style: &Style,
    width: u32,
    height: u32,
) -> Result<RgbaImage, ValidationError> {
    let mut backend = PixmapBackend::new(width, height, canvas.scale())?;
    render(canvas, style, &mut backend);
    Ok(backend.into_image())
}
