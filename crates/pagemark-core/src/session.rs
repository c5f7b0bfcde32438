//! Per-document editing session.
//!
//! One `DocumentSession` owns the backend plus all overlay state for a single
//! open document: tool mode, capture, annotations, selection, and both undo
//! stacks. All mutation is synchronous on the caller's thread; the session
//! communicates back through a drained event queue, never by reaching into
//! the presentation layer.

use crate::annotation::{Annotation, AnnotationShape, Rgba};
use crate::capture::StrokeCapture;
use crate::document::{DocumentBackend, RewritePlan};
use crate::error::{Error, Result};
use crate::history::{AnnotationSnapshot, HistoryManager, StructureSnapshot};
use crate::mapper::CoordinateMapper;
use crate::selection::{self, Selection};
use crate::store::AnnotationStore;
use crate::time::{Duration, Instant};
use kurbo::Point;
use uuid::Uuid;

/// Alpha applied to highlighter strokes.
pub const HIGHLIGHTER_ALPHA: u8 = 128;
/// Minimum interval between coalesced redraw requests during a drag.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(16);
/// Font size for placed text annotations.
pub const TEXT_FONT_SIZE: f64 = 14.0;

/// Active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Cursor,
    Select,
    Pen,
    Highlighter,
    Rectangle,
    Ellipse,
    Text,
}

/// Notifications queued for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Repaint the overlay. Coalesced during capture; purely a scheduling
    /// hint, overlay data is always current.
    RedrawRequested,
    /// The page list changed (count or order); thumbnails and scroll extents
    /// need rebuilding.
    PageListChanged,
    SelectionChanged(Option<Selection>),
}

/// Coalesces redraw requests to roughly one per display frame.
#[derive(Debug, Default)]
struct RedrawThrottle {
    last: Option<Instant>,
}

impl RedrawThrottle {
    fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < REDRAW_INTERVAL => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// An in-progress rectangle/ellipse drag, in viewport space.
#[derive(Debug, Clone, Copy)]
struct ShapeDrag {
    page_index: usize,
    start: Point,
    current: Point,
}

pub struct DocumentSession<B: DocumentBackend> {
    id: Uuid,
    backend: B,
    mapper: CoordinateMapper,
    store: AnnotationStore,
    capture: StrokeCapture,
    history: HistoryManager,
    mode: Mode,
    color: Rgba,
    stroke_width: f64,
    active_page: usize,
    selection: Option<Selection>,
    shape_drag: Option<ShapeDrag>,
    events: Vec<SessionEvent>,
    throttle: RedrawThrottle,
}

impl<B: DocumentBackend> DocumentSession<B> {
    pub fn new(backend: B) -> Self {
        let mut mapper = CoordinateMapper::new();
        mapper.sync_pages(&backend);
        Self {
            id: Uuid::new_v4(),
            backend,
            mapper,
            store: AnnotationStore::new(),
            capture: StrokeCapture::new(),
            history: HistoryManager::new(),
            mode: Mode::default(),
            color: Rgba::red(),
            stroke_width: 3.0,
            active_page: 0,
            selection: None,
            shape_drag: None,
            events: Vec::new(),
            throttle: RedrawThrottle::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Mutable mapper access for zoom and scroll driven by the viewport.
    pub fn mapper_mut(&mut self) -> &mut CoordinateMapper {
        &mut self.mapper
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn active_page(&self) -> usize {
        self.active_page
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Raw capture samples for the live preview, with the page they belong
    /// to, while a freehand drag is active.
    pub fn capture_preview(&self) -> Option<(usize, &[Point])> {
        let page_index = self.capture.page_index()?;
        Some((page_index, self.capture.preview()))
    }

    /// Corner pair of the in-progress shape drag, in viewport space.
    pub fn shape_preview(&self) -> Option<(usize, Point, Point)> {
        self.shape_drag
            .map(|drag| (drag.page_index, drag.start, drag.current))
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // --- tool state ---

    /// Switch tools. Any in-progress drag is discarded; leaving select mode
    /// clears the selection.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.capture.cancel();
        self.shape_drag = None;
        self.mode = mode;
        if mode != Mode::Select {
            self.set_selection(None);
        }
        self.force_redraw();
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width.max(0.5);
    }

    /// Switch the active page. A selection never outlives the page it was
    /// made on.
    pub fn set_active_page(&mut self, page_index: usize) -> Result<()> {
        self.validate_page(page_index)?;
        if page_index != self.active_page {
            self.active_page = page_index;
            self.set_selection(None);
        }
        Ok(())
    }

    /// Color as drawn by the current tool; the highlighter is translucent.
    fn paint_color(&self) -> Rgba {
        match self.mode {
            Mode::Highlighter => self.color.with_alpha(HIGHLIGHTER_ALPHA),
            _ => self.color.with_alpha(255),
        }
    }

    // --- pointer input ---

    pub fn on_pointer_down(&mut self, viewport_point: Point, now: Instant) {
        let page_index = self.mapper.page_at(viewport_point);
        match self.mode {
            Mode::Pen | Mode::Highlighter => {
                self.capture.begin(page_index, viewport_point);
                self.request_redraw(now);
            }
            Mode::Rectangle | Mode::Ellipse => {
                self.shape_drag = Some(ShapeDrag {
                    page_index,
                    start: viewport_point,
                    current: viewport_point,
                });
                self.request_redraw(now);
            }
            Mode::Select => {
                let hit = selection::hit_test(&self.store, &self.mapper, viewport_point, page_index);
                self.set_selection(hit.map(|h| Selection {
                    page_index,
                    index: h.index,
                    group: h.group,
                }));
            }
            // Text placement goes through `place_text` once the caller has
            // collected the content; a bare click does nothing.
            Mode::Cursor | Mode::Text => {}
        }
    }

    pub fn on_pointer_move(&mut self, viewport_point: Point, now: Instant) {
        if self.capture.is_active() {
            self.capture.extend(viewport_point);
            self.request_redraw(now);
        } else if let Some(drag) = &mut self.shape_drag {
            drag.current = viewport_point;
            self.request_redraw(now);
        }
    }

    pub fn on_pointer_up(&mut self, viewport_point: Point, now: Instant) {
        if self.capture.is_active() {
            self.capture.extend(viewport_point);
            if let Some((page_index, points)) = self.capture.end(&self.mapper) {
                self.snapshot_annotations(page_index);
                let annotation = Annotation::new(
                    page_index,
                    self.paint_color(),
                    self.stroke_width,
                    AnnotationShape::Stroke { points },
                );
                self.store.complete_stroke(page_index, annotation, now);
            }
            self.force_redraw();
        } else if let Some(drag) = self.shape_drag.take() {
            let start = self.mapper.to_document(drag.start, drag.page_index);
            let end = self.mapper.to_document(viewport_point, drag.page_index);
            let shape = match self.mode {
                Mode::Ellipse => AnnotationShape::Ellipse { start, end },
                _ => AnnotationShape::Rectangle { start, end },
            };
            self.snapshot_annotations(drag.page_index);
            self.store.append(Annotation::new(
                drag.page_index,
                self.paint_color(),
                self.stroke_width,
                shape,
            ));
            self.force_redraw();
        }
    }

    /// Discard any in-progress stroke or shape drag without committing.
    pub fn abort_capture(&mut self) {
        if self.capture.is_active() || self.shape_drag.is_some() {
            self.capture.cancel();
            self.shape_drag = None;
            self.force_redraw();
        }
    }

    /// Place a text annotation at a viewport point. Empty content is a no-op.
    pub fn place_text(&mut self, viewport_point: Point, content: &str) {
        if content.is_empty() {
            return;
        }
        let page_index = self.mapper.page_at(viewport_point);
        let anchor = self.mapper.to_document(viewport_point, page_index);
        self.snapshot_annotations(page_index);
        self.store.append(Annotation::new(
            page_index,
            self.color.with_alpha(255),
            TEXT_FONT_SIZE,
            AnnotationShape::Text {
                anchor,
                content: content.to_string(),
            },
        ));
        self.force_redraw();
    }

    // --- annotation edits ---

    /// Delete the selected annotation; a grouped stroke takes its whole
    /// gesture group with it. No-op without a selection.
    pub fn delete_selected(&mut self) {
        let Some(selection) = self.selection else {
            return;
        };
        self.snapshot_annotations(selection.page_index);
        match selection.group {
            Some(group_id) => self.store.remove_group(selection.page_index, group_id),
            None => self.store.remove(selection.page_index, &[selection.index]),
        }
        self.set_selection(None);
        self.force_redraw();
    }

    pub fn clear_page(&mut self, page_index: usize) -> Result<()> {
        self.validate_page(page_index)?;
        if self.store.list(page_index).is_empty() {
            return Ok(());
        }
        self.snapshot_annotations(page_index);
        self.store.clear_page(page_index);
        if self.selection.is_some_and(|s| s.page_index == page_index) {
            self.set_selection(None);
        }
        self.force_redraw();
        Ok(())
    }

    /// Restore the most recent annotation snapshot.
    pub fn undo_annotation(&mut self) -> Result<()> {
        let snapshot = self.history.undo_annotation()?;
        let page_index = snapshot.page_index;
        self.store
            .restore_page(page_index, snapshot.annotations, snapshot.groups);
        if self.selection.is_some_and(|s| s.page_index == page_index) {
            self.set_selection(None);
        }
        self.force_redraw();
        Ok(())
    }

    /// JSON dump of one page's annotations.
    pub fn export_annotations(&self, page_index: usize) -> String {
        // Serialization of plain records cannot fail.
        self.store.export_page(page_index).unwrap_or_default()
    }

    /// Bake every overlay annotation into the document through the backend
    /// drawing primitives, then clear the overlay. A mid-commit backend
    /// error aborts with pages already drawn left in the document.
    pub fn commit_annotations(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return Ok(());
        }
        for (page_index, annotations) in self.store.iter_pages() {
            for annotation in annotations {
                let rgb = annotation.color.unit_rgb();
                let result = match &annotation.shape {
                    AnnotationShape::Stroke { points } => {
                        self.backend
                            .draw_polyline(page_index, points, rgb, annotation.width)
                    }
                    AnnotationShape::Rectangle { start, end } => {
                        self.backend
                            .draw_rect(page_index, *start, *end, rgb, annotation.width)
                    }
                    AnnotationShape::Ellipse { start, end } => {
                        self.backend
                            .draw_ellipse(page_index, *start, *end, rgb, annotation.width)
                    }
                    AnnotationShape::Text { anchor, content } => self.backend.insert_text(
                        page_index,
                        *anchor,
                        content,
                        rgb,
                        annotation.width,
                    ),
                };
                result.map_err(|e| Error::DocumentRewriteFailed(e.to_string()))?;
            }
        }
        log::info!("committed overlay annotations into the document");
        self.store.clear_all();
        self.history.clear_annotations();
        self.set_selection(None);
        self.force_redraw();
        Ok(())
    }

    // --- structural edits ---

    pub fn move_page_up(&mut self, page_index: usize) -> Result<()> {
        self.validate_page(page_index)?;
        if page_index == 0 {
            return Ok(());
        }
        let mut order: Vec<usize> = (0..self.backend.page_count()).collect();
        order.swap(page_index - 1, page_index);
        self.apply_rewrite(RewritePlan::Reorder(order))
    }

    pub fn move_page_down(&mut self, page_index: usize) -> Result<()> {
        let count = self.backend.page_count();
        self.validate_page(page_index)?;
        if page_index + 1 >= count {
            return Ok(());
        }
        let mut order: Vec<usize> = (0..count).collect();
        order.swap(page_index, page_index + 1);
        self.apply_rewrite(RewritePlan::Reorder(order))
    }

    /// Delete a page. Refused when it is the last one remaining.
    pub fn delete_page(&mut self, page_index: usize) -> Result<()> {
        let count = self.backend.page_count();
        self.validate_page(page_index)?;
        if count <= 1 {
            return Err(Error::InvalidRange {
                index: page_index,
                count,
            });
        }
        let order: Vec<usize> = (0..count).filter(|&i| i != page_index).collect();
        self.apply_rewrite(RewritePlan::Reorder(order))
    }

    /// Insert blank pages at the given position (0..=page_count).
    pub fn insert_pages(&mut self, at: usize, count: usize) -> Result<()> {
        let page_count = self.backend.page_count();
        if at > page_count {
            return Err(Error::InvalidRange {
                index: at,
                count: page_count,
            });
        }
        if count == 0 {
            return Ok(());
        }
        self.apply_rewrite(RewritePlan::Insert { at, count })
    }

    /// Restore the most recent structure snapshot: document bytes and the
    /// full overlay, including annotations on pages the edit had deleted.
    pub fn undo_structure(&mut self) -> Result<()> {
        let snapshot = self.history.undo_structure()?;
        if let Err(e) = self.backend.restore(&snapshot.revision) {
            // Keep the snapshot; the user can retry.
            self.history.push_structure(snapshot);
            return Err(Error::DocumentRewriteFailed(e.to_string()));
        }
        self.store.restore_all(snapshot.pages, snapshot.groups);
        self.after_structure_change();
        Ok(())
    }

    /// Snapshot, rewrite, remap. The snapshot is pushed only after the
    /// backend succeeds, so a failed rewrite leaves session state untouched.
    fn apply_rewrite(&mut self, plan: RewritePlan) -> Result<()> {
        let old_count = self.backend.page_count();
        let revision = self.backend.revision();
        let (pages, groups) = self.store.snapshot_all();

        self.backend
            .rewrite(&plan)
            .map_err(|e| Error::DocumentRewriteFailed(e.to_string()))?;

        self.history.push_structure(StructureSnapshot {
            revision,
            pages,
            groups,
        });
        self.store.remap_pages(&plan.index_mapping(old_count));
        self.after_structure_change();
        Ok(())
    }

    fn after_structure_change(&mut self) {
        self.mapper.sync_pages(&self.backend);
        let count = self.backend.page_count();
        if self.active_page >= count {
            self.active_page = count.saturating_sub(1);
        }
        self.set_selection(None);
        self.events.push(SessionEvent::PageListChanged);
        self.force_redraw();
    }

    // --- internals ---

    fn validate_page(&self, page_index: usize) -> Result<()> {
        let count = self.backend.page_count();
        if page_index >= count {
            return Err(Error::InvalidRange {
                index: page_index,
                count,
            });
        }
        Ok(())
    }

    fn snapshot_annotations(&mut self, page_index: usize) {
        let (annotations, groups) = self.store.snapshot_page(page_index);
        self.history.push_annotation(AnnotationSnapshot {
            page_index,
            annotations,
            groups,
        });
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        if self.selection != selection {
            self.selection = selection;
            self.events.push(SessionEvent::SelectionChanged(selection));
        }
    }

    fn request_redraw(&mut self, now: Instant) {
        if self.throttle.ready(now) {
            self.events.push(SessionEvent::RedrawRequested);
        }
    }

    fn force_redraw(&mut self) {
        self.events.push(SessionEvent::RedrawRequested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;

    fn session() -> DocumentSession<MemoryDocument> {
        DocumentSession::new(MemoryDocument::with_uniform_pages(
            3,
            kurbo::Size::new(100.0, 200.0),
        ))
    }

    fn draw_stroke(s: &mut DocumentSession<MemoryDocument>, t0: Instant, y: f64) {
        s.on_pointer_down(Point::new(10.0, y), t0);
        s.on_pointer_move(Point::new(30.0, y + 5.0), t0 + Duration::from_millis(20));
        s.on_pointer_up(Point::new(50.0, y + 10.0), t0 + Duration::from_millis(40));
    }

    #[test]
    fn test_pen_drag_stores_a_stroke() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        draw_stroke(&mut s, Instant::now(), 20.0);

        let list = s.store().list(0);
        assert_eq!(list.len(), 1);
        assert!(list[0].is_stroke());
        assert_eq!(list[0].color.a, 255);
        assert!(list[0].group.is_some());
    }

    #[test]
    fn test_highlighter_is_translucent() {
        let mut s = session();
        s.set_mode(Mode::Highlighter);
        draw_stroke(&mut s, Instant::now(), 20.0);
        assert_eq!(s.store().list(0)[0].color.a, HIGHLIGHTER_ALPHA);
    }

    #[test]
    fn test_rectangle_drag_appends_shape() {
        let mut s = session();
        s.set_mode(Mode::Rectangle);
        let t0 = Instant::now();
        s.on_pointer_down(Point::new(10.0, 10.0), t0);
        s.on_pointer_move(Point::new(40.0, 20.0), t0 + Duration::from_millis(20));
        s.on_pointer_up(Point::new(40.0, 30.0), t0 + Duration::from_millis(40));

        let list = s.store().list(0);
        assert_eq!(list.len(), 1);
        assert!(matches!(list[0].shape, AnnotationShape::Rectangle { .. }));
        assert_eq!(list[0].group, None);
    }

    #[test]
    fn test_abort_discards_capture() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        let t0 = Instant::now();
        s.on_pointer_down(Point::new(10.0, 10.0), t0);
        s.on_pointer_move(Point::new(20.0, 20.0), t0 + Duration::from_millis(20));
        s.abort_capture();
        s.on_pointer_up(Point::new(30.0, 30.0), t0 + Duration::from_millis(40));

        assert!(s.store().list(0).is_empty());
    }

    #[test]
    fn test_place_text_and_export() {
        let mut s = session();
        s.set_mode(Mode::Text);
        s.place_text(Point::new(50.0, 60.0), "reviewed");

        let list = s.store().list(0);
        assert_eq!(list.len(), 1);
        assert!((list[0].width - TEXT_FONT_SIZE).abs() < f64::EPSILON);

        let json = s.export_annotations(0);
        assert!(json.contains("reviewed"));
    }

    #[test]
    fn test_select_and_delete_whole_group() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        let t0 = Instant::now();
        draw_stroke(&mut s, t0, 20.0);
        s.on_pointer_down(Point::new(10.0, 60.0), t0 + Duration::from_millis(100));
        s.on_pointer_up(Point::new(50.0, 70.0), t0 + Duration::from_millis(140));
        assert_eq!(s.store().list(0).len(), 2);

        s.set_mode(Mode::Select);
        s.on_pointer_down(Point::new(30.0, 25.0), t0 + Duration::from_millis(200));
        assert!(s.selection().is_some());

        s.delete_selected();
        // Both strokes were one gesture group.
        assert!(s.store().list(0).is_empty());
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn test_changing_active_page_clears_selection() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        let t0 = Instant::now();
        draw_stroke(&mut s, t0, 20.0);

        s.set_mode(Mode::Select);
        s.on_pointer_down(Point::new(30.0, 25.0), t0 + Duration::from_millis(100));
        assert!(s.selection().is_some());
        s.drain_events();

        s.set_active_page(1).unwrap();
        assert_eq!(s.selection(), None);
        assert!(s
            .drain_events()
            .contains(&SessionEvent::SelectionChanged(None)));

        // Deleting afterwards must not reach back to the old page.
        s.delete_selected();
        assert_eq!(s.store().list(0).len(), 1);
    }

    #[test]
    fn test_undo_annotation_restores_page() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        draw_stroke(&mut s, Instant::now(), 20.0);
        assert_eq!(s.store().list(0).len(), 1);

        s.undo_annotation().unwrap();
        assert!(s.store().list(0).is_empty());
        assert!(matches!(s.undo_annotation(), Err(Error::EmptyHistory)));
    }

    #[test]
    fn test_delete_page_remaps_annotations() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        // Page heights are 200 doc units at zoom 1: draw on page 1.
        draw_stroke(&mut s, Instant::now(), 250.0);
        assert_eq!(s.store().list(1).len(), 1);

        s.delete_page(0).unwrap();
        assert_eq!(s.backend().page_count(), 2);
        let list = s.store().list(0);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].page_index, 0);
    }

    #[test]
    fn test_undo_structure_restores_dropped_annotations() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        draw_stroke(&mut s, Instant::now(), 20.0);

        s.delete_page(0).unwrap();
        assert!(s.store().is_empty());
        assert_eq!(s.backend().page_count(), 2);

        s.undo_structure().unwrap();
        assert_eq!(s.backend().page_count(), 3);
        assert_eq!(s.store().list(0).len(), 1);
    }

    #[test]
    fn test_last_page_cannot_be_deleted() {
        let mut s = DocumentSession::new(MemoryDocument::with_uniform_pages(
            1,
            kurbo::Size::new(100.0, 200.0),
        ));
        assert!(matches!(
            s.delete_page(0),
            Err(Error::InvalidRange { count: 1, .. })
        ));
    }

    #[test]
    fn test_move_page_reorders_backend() {
        let mut s = DocumentSession::new(MemoryDocument::new(&[
            (100.0, 100.0),
            (100.0, 200.0),
            (100.0, 300.0),
        ]));
        s.move_page_up(2).unwrap();
        assert_eq!(
            s.backend().page_size(1),
            Some(kurbo::Size::new(100.0, 300.0))
        );

        s.move_page_down(0).unwrap();
        assert_eq!(
            s.backend().page_size(1),
            Some(kurbo::Size::new(100.0, 100.0))
        );
    }

    #[test]
    fn test_failed_rewrite_leaves_state_untouched() {
        let mut s = session();
        let err = s.insert_pages(99, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
        assert_eq!(s.backend().page_count(), 3);
        assert!(matches!(s.undo_structure(), Err(Error::EmptyHistory)));
    }

    #[test]
    fn test_commit_bakes_and_clears_overlay() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        draw_stroke(&mut s, Instant::now(), 20.0);
        s.set_mode(Mode::Text);
        s.place_text(Point::new(50.0, 50.0), "ok");

        s.commit_annotations().unwrap();
        assert!(s.store().is_empty());
        assert_eq!(s.backend().ops(0).len(), 2);
        // Baked ink is out of reach of annotation undo.
        assert!(matches!(s.undo_annotation(), Err(Error::EmptyHistory)));
    }

    #[test]
    fn test_commit_forwards_unit_rgb() {
        use crate::document::DrawOp;

        let mut s = session();
        s.set_color(Rgba::new(255, 0, 0, 255));
        s.set_mode(Mode::Pen);
        draw_stroke(&mut s, Instant::now(), 20.0);
        s.commit_annotations().unwrap();

        match &s.backend().ops(0)[0] {
            DrawOp::Polyline { color, .. } => assert_eq!(*color, [1.0, 0.0, 0.0]),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_redraw_requests_are_coalesced() {
        let mut s = session();
        s.set_mode(Mode::Pen);
        s.drain_events();

        let t0 = Instant::now();
        s.on_pointer_down(Point::new(0.0, 0.0), t0);
        for i in 1..10 {
            s.on_pointer_move(Point::new(i as f64, 0.0), t0 + Duration::from_millis(i));
        }

        let redraws = s
            .drain_events()
            .iter()
            .filter(|e| **e == SessionEvent::RedrawRequested)
            .count();
        // 9 moves inside one 16 ms window collapse into the initial request.
        assert_eq!(redraws, 1);
    }

    #[test]
    fn test_structure_events_emitted() {
        let mut s = session();
        s.drain_events();
        s.insert_pages(1, 2).unwrap();

        let events = s.drain_events();
        assert!(events.contains(&SessionEvent::PageListChanged));
        assert!(events.contains(&SessionEvent::RedrawRequested));
        assert_eq!(s.backend().page_count(), 5);
    }
}
