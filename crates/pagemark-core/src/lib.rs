//! Pagemark Core Library
//!
//! Platform-agnostic annotation overlay logic for the Pagemark document
//! editor: coordinate mapping, stroke capture, annotation storage, selection,
//! history, and the per-document editing session.

pub mod annotation;
pub mod capture;
pub mod document;
pub mod error;
pub mod history;
pub mod mapper;
pub mod selection;
pub mod session;
pub mod store;
pub mod time;

pub use annotation::{Annotation, AnnotationId, AnnotationShape, Rgba};
pub use capture::StrokeCapture;
pub use document::{
    BackendError, BackendResult, DocumentBackend, DocumentRevision, MemoryDocument, RewritePlan,
};
pub use error::{Error, Result};
pub use history::{HistoryManager, MAX_SNAPSHOTS};
pub use mapper::CoordinateMapper;
pub use selection::{hit_test, Hit, Selection};
pub use session::{DocumentSession, Mode, SessionEvent};
pub use store::AnnotationStore;
