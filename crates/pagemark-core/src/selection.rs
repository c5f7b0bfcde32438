//! Hit-testing annotations under the pointer.
//!
//! Candidates are scanned topmost-first (reverse z-order) in viewport space,
//! so thresholds stay constant in screen pixels regardless of zoom.

use crate::annotation::{point_to_polyline_dist, AnnotationShape};
use crate::mapper::CoordinateMapper;
use crate::store::AnnotationStore;
use kurbo::{Point, Rect};

/// Pick radius around a text anchor, in viewport units.
const TEXT_HIT_RADIUS: f64 = 50.0;

/// A successful hit: annotation index on the page, and its gesture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub group: Option<u64>,
}

/// The session's current selection, anchored to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub page_index: usize,
    pub index: usize,
    pub group: Option<u64>,
}

/// Find the topmost annotation on `page_index` under a viewport point.
/// A miss is a normal `None`.
pub fn hit_test(
    store: &AnnotationStore,
    mapper: &CoordinateMapper,
    viewport_point: Point,
    page_index: usize,
) -> Option<Hit> {
    let annotations = store.list(page_index);
    for (index, annotation) in annotations.iter().enumerate().rev() {
        let hit = match &annotation.shape {
            AnnotationShape::Stroke { points } => {
                let projected: Vec<Point> = points
                    .iter()
                    .map(|&p| mapper.to_viewport(p, page_index))
                    .collect();
                let threshold = (annotation.width + 5.0).max(10.0);
                point_to_polyline_dist(viewport_point, &projected) <= threshold
            }
            // Bounding-box containment; an approximation for the ellipse,
            // which matches how users aim at thin outlines.
            AnnotationShape::Rectangle { start, end } | AnnotationShape::Ellipse { start, end } => {
                Rect::from_points(
                    mapper.to_viewport(*start, page_index),
                    mapper.to_viewport(*end, page_index),
                )
                .contains(viewport_point)
            }
            AnnotationShape::Text { anchor, .. } => {
                mapper.to_viewport(*anchor, page_index).distance(viewport_point)
                    <= TEXT_HIT_RADIUS
            }
        };
        if hit {
            return Some(Hit {
                index,
                group: annotation.group,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, AnnotationShape, Rgba};
    use crate::document::MemoryDocument;
    use crate::time::Instant;

    fn mapper() -> CoordinateMapper {
        let doc = MemoryDocument::new(&[(100.0, 100.0)]);
        let mut mapper = CoordinateMapper::new();
        mapper.viewport_width = 100.0;
        mapper.sync_pages(&doc);
        mapper
    }

    fn rect(start: Point, end: Point) -> Annotation {
        Annotation::new(
            0,
            Rgba::black(),
            2.0,
            AnnotationShape::Rectangle { start, end },
        )
    }

    #[test]
    fn test_topmost_annotation_wins() {
        let mut store = AnnotationStore::new();
        store.append(rect(Point::new(10.0, 10.0), Point::new(60.0, 60.0)));
        store.append(rect(Point::new(30.0, 30.0), Point::new(80.0, 80.0)));

        let hit = hit_test(&store, &mapper(), Point::new(40.0, 40.0), 0).unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_miss_is_none() {
        let mut store = AnnotationStore::new();
        store.append(rect(Point::new(10.0, 10.0), Point::new(20.0, 20.0)));
        assert!(hit_test(&store, &mapper(), Point::new(90.0, 90.0), 0).is_none());
    }

    #[test]
    fn test_stroke_threshold_scales_with_width() {
        let mut store = AnnotationStore::new();
        let mut thin = Annotation::new(
            0,
            Rgba::red(),
            1.0,
            AnnotationShape::Stroke {
                points: vec![Point::new(0.0, 50.0), Point::new(100.0, 50.0)],
            },
        );
        thin.group = Some(7);
        store.append(thin);

        let m = mapper();
        // Floor of max(10, width + 5) applies for thin strokes.
        let hit = hit_test(&store, &m, Point::new(50.0, 59.0), 0).unwrap();
        assert_eq!(hit.group, Some(7));
        assert!(hit_test(&store, &m, Point::new(50.0, 61.0), 0).is_none());
    }

    #[test]
    fn test_wide_stroke_has_larger_threshold() {
        let mut store = AnnotationStore::new();
        store.append(Annotation::new(
            0,
            Rgba::red(),
            20.0,
            AnnotationShape::Stroke {
                points: vec![Point::new(0.0, 50.0), Point::new(100.0, 50.0)],
            },
        ));

        // width + 5 = 25 viewport units.
        assert!(hit_test(&store, &mapper(), Point::new(50.0, 74.0), 0).is_some());
        assert!(hit_test(&store, &mapper(), Point::new(50.0, 76.0), 0).is_none());
    }

    #[test]
    fn test_text_anchor_radius() {
        let mut store = AnnotationStore::new();
        store.append(Annotation::new(
            0,
            Rgba::black(),
            14.0,
            AnnotationShape::Text {
                anchor: Point::new(50.0, 50.0),
                content: "note".into(),
            },
        ));

        let m = mapper();
        assert!(hit_test(&store, &m, Point::new(50.0, 99.0), 0).is_some());
        assert!(hit_test(&store, &m, Point::new(0.0, 0.0), 0).is_none());
    }

    #[test]
    fn test_hit_carries_group() {
        let mut store = AnnotationStore::new();
        store.complete_stroke(
            0,
            Annotation::new(
                0,
                Rgba::red(),
                3.0,
                AnnotationShape::Stroke {
                    points: vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)],
                },
            ),
            Instant::now(),
        );

        let hit = hit_test(&store, &mapper(), Point::new(15.0, 15.0), 0).unwrap();
        assert!(hit.group.is_some());
    }

    #[test]
    fn test_hit_testing_under_zoom() {
        let mut store = AnnotationStore::new();
        store.append(rect(Point::new(10.0, 10.0), Point::new(20.0, 20.0)));

        let mut m = mapper();
        m.set_zoom(4.0);
        // Document (15, 15) projects to viewport (15, 60) at zoom 4 with a
        // fixed viewport width.
        assert!(hit_test(&store, &m, Point::new(15.0, 60.0), 0).is_some());
        assert!(hit_test(&store, &m, Point::new(15.0, 15.0), 0).is_none());
    }
}
