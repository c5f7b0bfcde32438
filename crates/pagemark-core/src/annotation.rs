//! Annotation records stored on the document overlay.

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn red() -> Self {
        Self::new(255, 0, 0, 255)
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Replace the alpha channel, keeping the color.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// RGB triple in [0, 1], the form the backend drawing primitives take.
    pub fn unit_rgb(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

/// Unique identifier for annotations.
pub type AnnotationId = Uuid;

/// Geometry variant of an annotation. All coordinates are document-space
/// points on the owning page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnnotationShape {
    /// Simplified freehand path (at least 2 points).
    Stroke { points: Vec<Point> },
    /// Axis-aligned rectangle given by two drag corners.
    Rectangle { start: Point, end: Point },
    /// Ellipse inscribed in the rectangle of two drag corners.
    Ellipse { start: Point, end: Point },
    /// Text anchored at a point; `width` doubles as the font size.
    Text { anchor: Point, content: String },
}

/// One annotation record on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    /// Page the annotation belongs to. Maintained by the store; remapped on
    /// structural edits.
    pub page_index: usize,
    pub color: Rgba,
    /// Stroke width, or font size for text.
    pub width: f64,
    /// Gesture group for strokes completed within the idle window.
    /// Shapes and text never auto-group.
    pub group: Option<u64>,
    pub shape: AnnotationShape,
}

impl Annotation {
    pub fn new(page_index: usize, color: Rgba, width: f64, shape: AnnotationShape) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_index,
            color,
            width,
            group: None,
            shape,
        }
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self.shape, AnnotationShape::Stroke { .. })
    }

    /// Bounding box in document space.
    pub fn bounds(&self) -> Rect {
        match &self.shape {
            AnnotationShape::Stroke { points } => {
                let mut bounds: Option<Rect> = None;
                for p in points {
                    let r = Rect::from_points(*p, *p);
                    bounds = Some(match bounds {
                        Some(b) => b.union(r),
                        None => r,
                    });
                }
                bounds.unwrap_or(Rect::ZERO)
            }
            AnnotationShape::Rectangle { start, end } | AnnotationShape::Ellipse { start, end } => {
                Rect::from_points(*start, *end)
            }
            AnnotationShape::Text { anchor, .. } => Rect::from_points(*anchor, *anchor),
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    if points.len() == 1 {
        return point.distance(points[0]);
    }
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}
