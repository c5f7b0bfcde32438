//! Error types shared across the core.

use thiserror::Error;

/// Errors surfaced by mutating core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Page geometry could not be fetched from the backend. Coordinate
    /// mapping degrades to an identity passthrough instead of returning
    /// this; `CoordinateMapper::require_page_size` surfaces it for callers
    /// that need geometry unconditionally.
    #[error("page geometry unavailable for page {0}")]
    GeometryUnavailable(usize),

    /// An undo was requested with nothing left to restore.
    #[error("nothing to undo")]
    EmptyHistory,

    /// A page or insertion index was out of bounds. Rejected before any
    /// state is touched.
    #[error("index {index} out of range (page count {count})")]
    InvalidRange { index: usize, count: usize },

    /// The backend failed to rewrite or restore the document. Core state is
    /// left exactly as it was.
    #[error("document rewrite failed: {0}")]
    DocumentRewriteFailed(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
