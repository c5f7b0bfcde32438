//! Per-page annotation storage and gesture grouping.
//!
//! Strokes completed in quick succession belong to one gesture group, so a
//! single delete or undo treats a multi-stroke scribble as one unit. Shapes
//! and text never auto-group.

use crate::annotation::Annotation;
use crate::time::{Duration, Instant};
use std::collections::BTreeMap;

/// Idle time after which the next completed stroke starts a new group.
pub const GROUP_IDLE: Duration = Duration::from_millis(1000);

/// Group id → member annotation indices on one page.
pub type GroupTable = BTreeMap<u64, Vec<usize>>;
/// Page index → annotation list.
pub type PageMap = BTreeMap<usize, Vec<Annotation>>;
/// Page index → group table.
pub type GroupMap = BTreeMap<usize, GroupTable>;

/// Holds every overlay annotation, keyed by page, together with the group
/// membership tables.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    pages: PageMap,
    groups: GroupMap,
    next_group: u64,
    current_group: Option<u64>,
    last_stroke_at: Option<Instant>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations on a page, in z-order (oldest first).
    pub fn list(&self, page_index: usize) -> &[Annotation] {
        self.pages
            .get(&page_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn annotation(&self, page_index: usize, index: usize) -> Option<&Annotation> {
        self.list(page_index).get(index)
    }

    /// Member indices of a group on a page.
    pub fn group(&self, page_index: usize, group_id: u64) -> Option<&[usize]> {
        self.groups
            .get(&page_index)?
            .get(&group_id)
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.values().all(Vec::is_empty)
    }

    /// Pages that carry annotations, ascending, with their lists.
    pub fn iter_pages(&self) -> impl Iterator<Item = (usize, &[Annotation])> {
        self.pages.iter().map(|(&page, list)| (page, list.as_slice()))
    }

    /// Append a non-grouping annotation (shape or text).
    pub fn append(&mut self, annotation: Annotation) {
        self.pages
            .entry(annotation.page_index)
            .or_default()
            .push(annotation);
    }

    /// Append a completed stroke, assigning it to the current gesture group.
    /// More than `GROUP_IDLE` since the previously completed stroke (on any
    /// page) starts a new group; ids are monotonic within the session.
    pub fn complete_stroke(&mut self, page_index: usize, mut annotation: Annotation, now: Instant) {
        let new_group = match self.last_stroke_at {
            Some(last) => now.duration_since(last) > GROUP_IDLE,
            None => true,
        };
        if new_group || self.current_group.is_none() {
            self.current_group = Some(self.next_group);
            self.next_group += 1;
        }
        let group_id = self.current_group.unwrap_or_default();
        self.last_stroke_at = Some(now);

        annotation.group = Some(group_id);
        let list = self.pages.entry(page_index).or_default();
        let index = list.len();
        list.push(annotation);
        self.groups
            .entry(page_index)
            .or_default()
            .entry(group_id)
            .or_default()
            .push(index);
    }

    /// Remove the given annotation indices from a page. Deletion happens in
    /// descending index order; group tables drop the removed members, shift
    /// every surviving index down past the holes, and lose entries that end
    /// up empty.
    pub fn remove(&mut self, page_index: usize, indices: &[usize]) {
        let Some(annotations) = self.pages.get_mut(&page_index) else {
            return;
        };
        let mut targets: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < annotations.len())
            .collect();
        targets.sort_unstable();
        targets.dedup();
        if targets.is_empty() {
            return;
        }
        for &i in targets.iter().rev() {
            annotations.remove(i);
        }
        if annotations.is_empty() {
            self.pages.remove(&page_index);
        }

        if let Some(groups) = self.groups.get_mut(&page_index) {
            groups.retain(|_, members| {
                members.retain(|i| targets.binary_search(i).is_err());
                for index in members.iter_mut() {
                    *index -= targets.partition_point(|&t| t < *index);
                }
                !members.is_empty()
            });
            if groups.is_empty() {
                self.groups.remove(&page_index);
            }
        }
    }

    /// Remove every member of a group on a page.
    pub fn remove_group(&mut self, page_index: usize, group_id: u64) {
        if let Some(members) = self.group(page_index, group_id).map(<[usize]>::to_vec) {
            self.remove(page_index, &members);
        }
    }

    /// Drop every annotation and group on a page.
    pub fn clear_page(&mut self, page_index: usize) {
        self.pages.remove(&page_index);
        self.groups.remove(&page_index);
    }

    /// Drop the entire overlay, every page.
    pub fn clear_all(&mut self) {
        self.pages.clear();
        self.groups.clear();
    }

    /// JSON dump of a page's annotations.
    pub fn export_page(&self, page_index: usize) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self.list(page_index))
    }

    /// Reattach annotations after a structural rewrite, given an explicit
    /// old → new page-index mapping. Pages absent from the mapping lose
    /// their annotations.
    pub fn remap_pages(&mut self, mapping: &[(usize, usize)]) {
        let mut pages = PageMap::new();
        let mut groups = GroupMap::new();
        for &(old, new) in mapping {
            if let Some(mut list) = self.pages.remove(&old) {
                for annotation in &mut list {
                    annotation.page_index = new;
                }
                pages.insert(new, list);
            }
            if let Some(table) = self.groups.remove(&old) {
                groups.insert(new, table);
            }
        }
        let dropped: usize = self.pages.values().map(Vec::len).sum();
        if dropped > 0 {
            log::debug!("remap dropped {dropped} annotations on removed pages");
        }
        self.pages = pages;
        self.groups = groups;
    }

    /// Clone one page's state for an annotation-history snapshot.
    pub fn snapshot_page(&self, page_index: usize) -> (Vec<Annotation>, GroupTable) {
        (
            self.pages.get(&page_index).cloned().unwrap_or_default(),
            self.groups.get(&page_index).cloned().unwrap_or_default(),
        )
    }

    /// Restore one page from a snapshot.
    pub fn restore_page(&mut self, page_index: usize, annotations: Vec<Annotation>, groups: GroupTable) {
        if annotations.is_empty() {
            self.pages.remove(&page_index);
        } else {
            self.pages.insert(page_index, annotations);
        }
        if groups.is_empty() {
            self.groups.remove(&page_index);
        } else {
            self.groups.insert(page_index, groups);
        }
    }

    /// Clone the full overlay for a structure-history snapshot.
    pub fn snapshot_all(&self) -> (PageMap, GroupMap) {
        (self.pages.clone(), self.groups.clone())
    }

    /// Restore the full overlay from a snapshot. The group-id counter keeps
    /// advancing so ids stay monotonic across undo.
    pub fn restore_all(&mut self, pages: PageMap, groups: GroupMap) {
        self.pages = pages;
        self.groups = groups;
    }
}
