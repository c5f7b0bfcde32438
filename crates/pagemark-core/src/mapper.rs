//! Viewport ↔ document coordinate mapping.
//!
//! Pages are stacked vertically in the viewport, each scaled by the zoom
//! factor. Document space is per-page, origin top-left, independent of
//! zoom and scroll.

use crate::document::DocumentBackend;
use crate::error::{Error, Result};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;
/// Maximum allowed zoom factor.
pub const ZOOM_MAX: f64 = 5.0;
/// Multiplicative step for zoom in/out.
pub const ZOOM_STEP: f64 = 1.2;

/// Maps between viewport pixels and per-page document units under the
/// current zoom, scroll, and page-geometry cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateMapper {
    zoom: f64,
    /// Vertical scroll offset of the viewport in pixels.
    pub scroll_offset: f64,
    /// Width of the scrollable container in pixels.
    pub viewport_width: f64,
    /// Cached per-page sizes in document units. `None` where geometry was
    /// unavailable; mapping then falls back to identity for that page.
    page_sizes: Vec<Option<Size>>,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll_offset: 0.0,
            viewport_width: 800.0,
            page_sizes: Vec::new(),
        }
    }
}

impl CoordinateMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and cache every page size from the backend. Call after load,
    /// reload, or any structural rewrite; replaces the previous cache.
    pub fn sync_pages(&mut self, backend: &dyn DocumentBackend) {
        self.page_sizes = (0..backend.page_count())
            .map(|i| {
                let size = backend.page_size(i);
                if size.is_none() {
                    log::warn!("page {i} geometry unavailable, mapping falls back to identity");
                }
                size
            })
            .collect();
    }

    /// Drop cached geometry. Mapping degrades to identity until the next
    /// `sync_pages`.
    pub fn invalidate_cache(&mut self) {
        self.page_sizes.clear();
    }

    pub fn page_count(&self) -> usize {
        self.page_sizes.len()
    }

    pub fn page_size(&self, page_index: usize) -> Option<Size> {
        self.page_sizes.get(page_index).copied().flatten()
    }

    /// Page size as a hard requirement. Mapping itself tolerates missing
    /// geometry via the identity fallback; callers that cannot tolerate it
    /// use this instead.
    pub fn require_page_size(&self, page_index: usize) -> Result<Size> {
        self.page_size(page_index)
            .ok_or(Error::GeometryUnavailable(page_index))
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Vertical offset of the top of `page_index` within the scrollable
    /// content, in zoomed pixels. Pages with unknown geometry contribute
    /// no height.
    fn cumulative_offset(&self, page_index: usize) -> f64 {
        self.page_sizes
            .iter()
            .take(page_index)
            .flatten()
            .map(|size| size.height * self.zoom)
            .sum()
    }

    /// Convert a viewport point to document space on the given page.
    ///
    /// Falls back to identity when the page geometry is unknown or the
    /// index is out of range; callers tolerate approximate placement.
    pub fn to_document(&self, viewport_point: Point, page_index: usize) -> Point {
        let Some(size) = self.page_size(page_index) else {
            return viewport_point;
        };
        if self.viewport_width <= 0.0 {
            return viewport_point;
        }

        let relative_y = viewport_point.y + self.scroll_offset - self.cumulative_offset(page_index);
        Point::new(
            viewport_point.x / self.viewport_width * size.width,
            relative_y / self.zoom,
        )
    }

    /// Convert a document-space point on the given page to viewport space.
    /// Exact inverse of `to_document`; identity fallback under the same
    /// conditions.
    pub fn to_viewport(&self, document_point: Point, page_index: usize) -> Point {
        let Some(size) = self.page_size(page_index) else {
            return document_point;
        };
        if self.viewport_width <= 0.0 {
            return document_point;
        }

        Point::new(
            document_point.x / size.width * self.viewport_width,
            document_point.y * self.zoom + self.cumulative_offset(page_index) - self.scroll_offset,
        )
    }

    /// Page whose vertical extent contains the given content-space y
    /// (viewport y plus scroll). Clamps to the last page past the end.
    fn page_at_content_y(&self, y: f64) -> usize {
        let mut top = 0.0;
        for (i, size) in self.page_sizes.iter().enumerate() {
            let height = size.map(|s| s.height * self.zoom).unwrap_or(0.0);
            if y < top + height {
                return i;
            }
            top += height;
        }
        self.page_sizes.len().saturating_sub(1)
    }

    /// Page under a viewport point.
    pub fn page_at(&self, viewport_point: Point) -> usize {
        if self.page_sizes.is_empty() {
            return 0;
        }
        self.page_at_content_y(self.scroll_offset + viewport_point.y)
    }

    /// Page whose vertical extent contains the center of the visible
    /// viewport strip; used to track the active page while scrolling.
    pub fn visible_page(&self, viewport_height: f64) -> usize {
        if self.page_sizes.is_empty() {
            return 0;
        }
        self.page_at_content_y(self.scroll_offset + viewport_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;

    fn mapper_for(doc: &MemoryDocument) -> CoordinateMapper {
        let mut mapper = CoordinateMapper::new();
        mapper.viewport_width = 640.0;
        mapper.sync_pages(doc);
        mapper
    }

    fn stacked_doc() -> MemoryDocument {
        MemoryDocument::new(&[(612.0, 792.0), (612.0, 792.0), (400.0, 600.0)])
    }

    #[test]
    fn test_roundtrip_under_zoom_and_scroll() {
        let doc = stacked_doc();
        let mut mapper = mapper_for(&doc);

        for &zoom in &[0.1, 1.0, 5.0] {
            for &scroll in &[0.0, 123.5, 4096.0] {
                mapper.set_zoom(zoom);
                mapper.scroll_offset = scroll;
                for page in 0..3 {
                    let p = Point::new(50.5, 321.25);
                    let viewport = mapper.to_viewport(p, page);
                    let back = mapper.to_document(viewport, page);
                    assert!(
                        (back.x - p.x).abs() < 1e-3 && (back.y - p.y).abs() < 1e-3,
                        "roundtrip failed at zoom {zoom} scroll {scroll} page {page}: {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_stacked_page_offset() {
        let doc = stacked_doc();
        let mut mapper = mapper_for(&doc);
        mapper.set_zoom(2.0);

        // Top of page 1 sits below page 0's zoomed height.
        let top = mapper.to_viewport(Point::ZERO, 1);
        assert!((top.y - 792.0 * 2.0).abs() < 1e-9);

        // Scrolling moves it up by the same amount.
        mapper.scroll_offset = 300.0;
        let scrolled = mapper.to_viewport(Point::ZERO, 1);
        assert!((scrolled.y - (792.0 * 2.0 - 300.0)).abs() < 1e-9);
    }

    #[test]
    fn test_identity_fallback_without_geometry() {
        let mapper = CoordinateMapper::new();
        let p = Point::new(77.0, 88.0);
        assert_eq!(mapper.to_document(p, 0), p);
        assert_eq!(mapper.to_viewport(p, 5), p);
    }

    #[test]
    fn test_cache_invalidation() {
        let doc = stacked_doc();
        let mut mapper = mapper_for(&doc);
        assert!(mapper.page_size(0).is_some());

        mapper.invalidate_cache();
        assert!(mapper.page_size(0).is_none());
        let p = Point::new(10.0, 20.0);
        assert_eq!(mapper.to_document(p, 0), p);
    }

    #[test]
    fn test_require_page_size() {
        let doc = stacked_doc();
        let mut mapper = mapper_for(&doc);
        assert!(mapper.require_page_size(0).is_ok());

        mapper.invalidate_cache();
        assert!(matches!(
            mapper.require_page_size(0),
            Err(Error::GeometryUnavailable(0))
        ));
    }

    #[test]
    fn test_zoom_clamp_and_step() {
        let mut mapper = CoordinateMapper::new();
        mapper.set_zoom(9.0);
        assert!((mapper.zoom() - ZOOM_MAX).abs() < f64::EPSILON);
        mapper.set_zoom(0.0);
        assert!((mapper.zoom() - ZOOM_MIN).abs() < f64::EPSILON);

        mapper.set_zoom(1.0);
        mapper.zoom_in();
        assert!((mapper.zoom() - 1.2).abs() < 1e-9);
        mapper.zoom_out();
        assert!((mapper.zoom() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_at_pointer() {
        let doc = MemoryDocument::with_uniform_pages(3, Size::new(100.0, 500.0));
        let mut mapper = mapper_for(&doc);
        mapper.scroll_offset = 600.0;

        assert_eq!(mapper.page_at(Point::new(10.0, 0.0)), 1);
        assert_eq!(mapper.page_at(Point::new(10.0, 450.0)), 2);
        assert_eq!(mapper.page_at(Point::new(10.0, 5000.0)), 2);
    }

    #[test]
    fn test_visible_page_tracks_scroll() {
        let doc = MemoryDocument::with_uniform_pages(4, Size::new(100.0, 500.0));
        let mut mapper = mapper_for(&doc);
        mapper.set_zoom(1.0);

        mapper.scroll_offset = 0.0;
        assert_eq!(mapper.visible_page(400.0), 0);

        mapper.scroll_offset = 1200.0;
        assert_eq!(mapper.visible_page(400.0), 2);

        mapper.scroll_offset = 10_000.0;
        assert_eq!(mapper.visible_page(400.0), 3);
    }
}
