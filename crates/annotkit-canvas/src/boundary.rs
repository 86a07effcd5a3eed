//! Image boundary clamping.
//!
//! Pixel centers span `[0, width - 1] x [0, height - 1]`. Points dragged
//! past that area are pulled back onto its border along the direction of
//! motion.

use annotkit_core::{segment_intersection, Point, ValidationError};
use image::{DynamicImage, RgbaImage};

/// Pixel extent of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    width: u32,
    height: u32,
}

impl ImageBounds {
    /// Bounds for a `width` x `height` image. Both must be at least 1.
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        if width == 0 || height == 0 {
            return Err(ValidationError::InvalidImageSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Bounds of a decoded image.
    pub fn of_image(image: &impl ImageSource) -> Result<Self, ValidationError> {
        let (width, height) = image.dimensions();
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Largest valid x coordinate.
    pub fn max_x(&self) -> f64 {
        f64::from(self.width - 1)
    }

    /// Largest valid y coordinate.
    pub fn max_y(&self) -> f64 {
        f64::from(self.height - 1)
    }

    pub fn contains(&self, p: Point) -> bool {
        (0.0..=self.max_x()).contains(&p.x) && (0.0..=self.max_y()).contains(&p.y)
    }

    pub fn is_out(&self, p: Point) -> bool {
        !self.contains(p)
    }

    /// Clamp each coordinate independently.
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.max_x()), p.y.clamp(0.0, self.max_y()))
    }

    /// Border corners in clockwise order starting at the origin.
    pub fn corners(&self) -> [Point; 4] {
        let (w, h) = (self.max_x(), self.max_y());
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    }

    /// Point where the motion from `inside` to `outside` leaves the image.
    ///
    /// Among the border edges the motion segment crosses, the one whose
    /// midpoint is nearest `outside` is used. When the crossing is `inside`
    /// itself (the motion starts on the border) the free coordinate of
    /// `outside` is clamped along that edge instead, so the point can still
    /// slide along the border. Degenerate input falls back to clamping
    /// `outside` per axis.
    pub fn clamp_to_border(&self, inside: Point, outside: Point) -> Point {
        let start = self.clamp_point(inside);
        let corners = self.corners();

        let mut best: Option<(f64, usize, Point)> = None;
        for i in 0..corners.len() {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            let Some(hit) = segment_intersection(start, outside, a, b) else {
                continue;
            };
            let mid = (a + b) / 2.0;
            let d = mid.distance_to(&outside);
            if best.is_none_or(|(best_d, _, _)| d < best_d) {
                best = Some((d, i, hit.point));
            }
        }

        let Some((_, edge, crossing)) = best else {
            tracing::debug!(?inside, ?outside, "No border crossing, clamping per axis");
            return self.clamp_point(outside);
        };

        if crossing == start {
            let a = corners[edge];
            let b = corners[(edge + 1) % corners.len()];
            let slid = if a.x == b.x {
                Point::new(a.x, outside.y.max(0.0).min(a.y.max(b.y)))
            } else {
                Point::new(outside.x.max(0.0).min(a.x.max(b.x)), a.y)
            };
            return self.clamp_point(slid);
        }

        self.clamp_point(crossing)
    }
}

/// Anything that can report decoded pixel dimensions.
pub trait ImageSource {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);
}

impl ImageSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl ImageSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl ImageSource for ImageBounds {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
