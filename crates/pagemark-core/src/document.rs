//! Document backend abstraction.
//!
//! The core never parses or rewrites documents itself; it drives a
//! collaborator through this trait. The backend owns page structure and the
//! drawing primitives used to bake annotations into the persisted document.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Backend errors. Surfaced verbatim through `Error::DocumentRewriteFailed`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("page {0} out of range")]
    PageOutOfRange(usize),
    #[error("invalid rewrite plan: {0}")]
    InvalidPlan(String),
    #[error("{0}")]
    Failed(String),
}

/// Result type for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Opaque byte snapshot of a document, sufficient to fully reconstruct it.
/// Cheap to clone; history eviction drops the bytes with the last reference.
#[derive(Debug, Clone)]
pub struct DocumentRevision(Arc<Vec<u8>>);

impl DocumentRevision {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A structural edit expressed against the current page ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewritePlan {
    /// New ordering of existing page indices. Omitting an index deletes
    /// that page.
    Reorder(Vec<usize>),
    /// Insert `count` pages starting at position `at` (0..=page_count).
    Insert { at: usize, count: usize },
}

impl RewritePlan {
    /// Old page index → new page index for pages that survive this plan.
    /// Pages absent from the result were deleted.
    pub fn index_mapping(&self, page_count: usize) -> Vec<(usize, usize)> {
        match self {
            RewritePlan::Reorder(order) => order
                .iter()
                .enumerate()
                .filter(|(_, &old)| old < page_count)
                .map(|(new, &old)| (old, new))
                .collect(),
            RewritePlan::Insert { at, count } => (0..page_count)
                .map(|old| (old, if old >= *at { old + count } else { old }))
                .collect(),
        }
    }
}

/// Collaborator-owned document: page structure, geometry, and the drawing
/// primitives annotations are committed through.
///
/// `rewrite` and `restore` must be atomic: on error the document is observed
/// unchanged.
pub trait DocumentBackend {
    fn page_count(&self) -> usize;

    /// Page size in document units. `None` when geometry is unavailable;
    /// the coordinate mapper then degrades to identity passthrough.
    fn page_size(&self, page_index: usize) -> Option<Size>;

    /// Byte snapshot of the current document state.
    fn revision(&self) -> DocumentRevision;

    /// Apply a structural edit, producing the new document in place.
    fn rewrite(&mut self, plan: &RewritePlan) -> BackendResult<()>;

    /// Replace the document with a previously captured revision.
    fn restore(&mut self, revision: &DocumentRevision) -> BackendResult<()>;

    /// Draw an open polyline on a page. `color` is an RGB triple in [0, 1].
    fn draw_polyline(
        &mut self,
        page_index: usize,
        points: &[Point],
        color: [f64; 3],
        width: f64,
    ) -> BackendResult<()>;

    fn draw_rect(
        &mut self,
        page_index: usize,
        start: Point,
        end: Point,
        color: [f64; 3],
        width: f64,
    ) -> BackendResult<()>;

    fn draw_ellipse(
        &mut self,
        page_index: usize,
        start: Point,
        end: Point,
        color: [f64; 3],
        width: f64,
    ) -> BackendResult<()>;

    fn insert_text(
        &mut self,
        page_index: usize,
        anchor: Point,
        content: &str,
        color: [f64; 3],
        font_size: f64,
    ) -> BackendResult<()>;
}

/// One committed drawing operation on a memory-backed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Polyline {
        points: Vec<Point>,
        color: [f64; 3],
        width: f64,
    },
    Rect {
        start: Point,
        end: Point,
        color: [f64; 3],
        width: f64,
    },
    Ellipse {
        start: Point,
        end: Point,
        color: [f64; 3],
        width: f64,
    },
    Text {
        anchor: Point,
        content: String,
        color: [f64; 3],
        font_size: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PageRecord {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
}

/// In-memory backend. The reference implementation used by tests and demos;
/// revisions are the JSON bytes of the page list.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<PageRecord>,
}

/// Default size for pages created by `RewritePlan::Insert` (US Letter in
/// PDF points).
const DEFAULT_PAGE_SIZE: Size = Size::new(612.0, 792.0);

impl MemoryDocument {
    /// Create a document with the given page sizes in document units.
    pub fn new(page_sizes: &[(f64, f64)]) -> Self {
        Self {
            pages: page_sizes
                .iter()
                .map(|&(width, height)| PageRecord {
                    width,
                    height,
                    ops: Vec::new(),
                })
                .collect(),
        }
    }

    /// Create a document with `count` uniformly sized pages.
    pub fn with_uniform_pages(count: usize, size: Size) -> Self {
        Self::new(&vec![(size.width, size.height); count])
    }

    /// Committed drawing operations on a page, in commit order.
    pub fn ops(&self, page_index: usize) -> &[DrawOp] {
        self.pages
            .get(page_index)
            .map(|p| p.ops.as_slice())
            .unwrap_or(&[])
    }

    fn page_mut(&mut self, page_index: usize) -> BackendResult<&mut PageRecord> {
        let count = self.pages.len();
        self.pages
            .get_mut(page_index)
            .ok_or(BackendError::PageOutOfRange(count.max(page_index)))
    }
}

impl DocumentBackend for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page_index: usize) -> Option<Size> {
        self.pages
            .get(page_index)
            .map(|p| Size::new(p.width, p.height))
    }

    fn revision(&self) -> DocumentRevision {
        // Serialization of plain records cannot fail.
        let bytes = serde_json::to_vec(&self.pages).unwrap_or_default();
        DocumentRevision::from_bytes(bytes)
    }

    fn rewrite(&mut self, plan: &RewritePlan) -> BackendResult<()> {
        match plan {
            RewritePlan::Reorder(order) => {
                let mut next = Vec::with_capacity(order.len());
                for &old in order {
                    let page = self
                        .pages
                        .get(old)
                        .ok_or(BackendError::PageOutOfRange(old))?;
                    next.push(page.clone());
                }
                self.pages = next;
                Ok(())
            }
            RewritePlan::Insert { at, count } => {
                if *at > self.pages.len() {
                    return Err(BackendError::InvalidPlan(format!(
                        "insert position {at} past end of {} pages",
                        self.pages.len()
                    )));
                }
                let blank = PageRecord {
                    width: DEFAULT_PAGE_SIZE.width,
                    height: DEFAULT_PAGE_SIZE.height,
                    ops: Vec::new(),
                };
                for i in 0..*count {
                    self.pages.insert(at + i, blank.clone());
                }
                Ok(())
            }
        }
    }

    fn restore(&mut self, revision: &DocumentRevision) -> BackendResult<()> {
        let pages: Vec<PageRecord> = serde_json::from_slice(revision.bytes())
            .map_err(|e| BackendError::Failed(format!("corrupt revision: {e}")))?;
        self.pages = pages;
        Ok(())
    }

    fn draw_polyline(
        &mut self,
        page_index: usize,
        points: &[Point],
        color: [f64; 3],
        width: f64,
    ) -> BackendResult<()> {
        self.page_mut(page_index)?.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
        Ok(())
    }

    fn draw_rect(
        &mut self,
        page_index: usize,
        start: Point,
        end: Point,
        color: [f64; 3],
        width: f64,
    ) -> BackendResult<()> {
        self.page_mut(page_index)?.ops.push(DrawOp::Rect {
            start,
            end,
            color,
            width,
        });
        Ok(())
    }

    fn draw_ellipse(
        &mut self,
        page_index: usize,
        start: Point,
        end: Point,
        color: [f64; 3],
        width: f64,
    ) -> BackendResult<()> {
        self.page_mut(page_index)?.ops.push(DrawOp::Ellipse {
            start,
            end,
            color,
            width,
        });
        Ok(())
    }

    fn insert_text(
        &mut self,
        page_index: usize,
        anchor: Point,
        content: &str,
        color: [f64; 3],
        font_size: f64,
    ) -> BackendResult<()> {
        self.page_mut(page_index)?.ops.push(DrawOp::Text {
            anchor,
            content: content.to_string(),
            color,
            font_size,
        });
        Ok(())
    }
}
