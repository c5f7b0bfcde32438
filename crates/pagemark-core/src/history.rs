//! Bounded undo stacks.
//!
//! Annotation edits and structural document edits have independent histories
//! so undoing a drawing never rolls back a page move. Both stacks hold at
//! most [`MAX_SNAPSHOTS`] entries; pushing past the cap evicts the oldest.

use crate::annotation::Annotation;
use crate::document::DocumentRevision;
use crate::error::{Error, Result};
use crate::store::{GroupMap, GroupTable, PageMap};

/// Capacity of each undo stack.
pub const MAX_SNAPSHOTS: usize = 10;

/// One page's annotation state, captured before a destructive edit.
#[derive(Debug, Clone)]
pub struct AnnotationSnapshot {
    pub page_index: usize,
    pub annotations: Vec<Annotation>,
    pub groups: GroupTable,
}

/// Full document + overlay state, captured before a structural edit. The
/// revision bytes are enough for the backend to reconstruct the document;
/// the annotation map restores the overlay exactly, including annotations on
/// pages the edit deleted.
#[derive(Debug, Clone)]
pub struct StructureSnapshot {
    pub revision: DocumentRevision,
    pub pages: PageMap,
    pub groups: GroupMap,
}

#[derive(Debug, Default)]
pub struct HistoryManager {
    annotation_stack: Vec<AnnotationSnapshot>,
    structure_stack: Vec<StructureSnapshot>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo_annotation(&self) -> bool {
        !self.annotation_stack.is_empty()
    }

    pub fn can_undo_structure(&self) -> bool {
        !self.structure_stack.is_empty()
    }

    pub fn push_annotation(&mut self, snapshot: AnnotationSnapshot) {
        if self.annotation_stack.len() >= MAX_SNAPSHOTS {
            self.annotation_stack.remove(0);
        }
        self.annotation_stack.push(snapshot);
    }

    pub fn push_structure(&mut self, snapshot: StructureSnapshot) {
        if self.structure_stack.len() >= MAX_SNAPSHOTS {
            // Dropping the oldest entry releases its revision bytes.
            self.structure_stack.remove(0);
        }
        self.structure_stack.push(snapshot);
    }

    /// Pop the most recent annotation snapshot.
    pub fn undo_annotation(&mut self) -> Result<AnnotationSnapshot> {
        self.annotation_stack.pop().ok_or(Error::EmptyHistory)
    }

    /// Pop the most recent structure snapshot.
    pub fn undo_structure(&mut self) -> Result<StructureSnapshot> {
        self.structure_stack.pop().ok_or(Error::EmptyHistory)
    }

    /// Drop the annotation stack. Used after annotations are baked into the
    /// document, when restoring old overlay states would duplicate ink.
    pub fn clear_annotations(&mut self) {
        self.annotation_stack.clear();
    }

    /// Drop both stacks, e.g. when a different document is loaded.
    pub fn clear(&mut self) {
        self.annotation_stack.clear();
        self.structure_stack.clear();
    }
}
