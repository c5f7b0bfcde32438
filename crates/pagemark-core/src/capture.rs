//! Freehand stroke capture.
//!
//! Pointer samples accumulate in viewport space while a drag is active; the
//! owning page is locked at `begin`. The buffer is kept bounded during long
//! drags, and `end` resolves the samples into a simplified document-space
//! polyline.

use crate::mapper::CoordinateMapper;
use kurbo::Point;

/// Buffer length that triggers in-flight down-sampling.
pub const MAX_BUFFERED_POINTS: usize = 500;
/// Target point count after simplification.
pub const TARGET_POINTS: usize = 300;

/// Accumulates pointer samples for one in-progress freehand stroke.
#[derive(Debug, Default)]
pub struct StrokeCapture {
    page_index: Option<usize>,
    points: Vec<Point>,
}

/// Every `k`-th point with `k = ceil(len / TARGET_POINTS)`; the exact final
/// point is re-appended when the stride skips it.
fn downsample(points: &[Point]) -> Vec<Point> {
    let stride = points.len().div_ceil(TARGET_POINTS).max(1);
    let mut out: Vec<Point> = points.iter().step_by(stride).copied().collect();
    if let Some(&last) = points.last() {
        if out.last() != Some(&last) {
            out.push(last);
        }
    }
    out
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.page_index.is_some()
    }

    /// Page locked at `begin`, while a capture is active.
    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }

    /// Raw viewport-space samples, for the live preview.
    pub fn preview(&self) -> &[Point] {
        &self.points
    }

    /// Start a capture on `page_index`. Replaces any capture already active.
    pub fn begin(&mut self, page_index: usize, viewport_point: Point) {
        self.page_index = Some(page_index);
        self.points.clear();
        self.points.push(viewport_point);
    }

    /// Append a pointer sample. Ignored while no capture is active.
    pub fn extend(&mut self, viewport_point: Point) {
        if !self.is_active() {
            return;
        }
        self.points.push(viewport_point);
        if self.points.len() > MAX_BUFFERED_POINTS {
            self.points = downsample(&self.points);
        }
    }

    /// Discard the in-progress stroke.
    pub fn cancel(&mut self) {
        self.page_index = None;
        self.points.clear();
    }

    /// Finish the capture: simplify, convert to document space on the locked
    /// page, and reset. Returns `None` when fewer than 2 points remain (a
    /// click rather than a drag).
    pub fn end(&mut self, mapper: &CoordinateMapper) -> Option<(usize, Vec<Point>)> {
        let page_index = self.page_index.take()?;
        let raw = std::mem::take(&mut self.points);

        let simplified = downsample(&raw);
        if simplified.len() < 2 {
            return None;
        }
        let document_points = simplified
            .iter()
            .map(|&p| mapper.to_document(p, page_index))
            .collect();
        Some((page_index, document_points))
    }
}
