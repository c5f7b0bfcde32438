//! Overlay draw-command generation.
//!
//! A pure function of session state: annotations project into viewport space
//! in z-order, selected annotations (and their gesture-group peers) get a
//! dashed highlight, and any in-progress stroke or shape drag is appended as
//! a live preview. Presentation layers replay the commands with whatever
//! paint API they have; nothing here touches a GPU.

use kurbo::{Point, Rect};
use pagemark_core::annotation::AnnotationShape;
use pagemark_core::document::DocumentBackend;
use pagemark_core::selection::Selection;
use pagemark_core::session::{DocumentSession, Mode};
use pagemark_core::store::AnnotationStore;
use pagemark_core::CoordinateMapper;
use peniko::Color;

/// Padding around a highlighted annotation's bounds, in viewport pixels.
const HIGHLIGHT_PADDING: f64 = 5.0;

/// One viewport-space drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Polyline {
        points: Vec<Point>,
        color: Color,
        width: f64,
    },
    Rect {
        rect: Rect,
        color: Color,
        width: f64,
    },
    Ellipse {
        rect: Rect,
        color: Color,
        width: f64,
    },
    Text {
        origin: Point,
        content: String,
        color: Color,
        size: f64,
    },
    /// Dashed selection outline.
    DashedRect { rect: Rect, color: Color },
}

/// Everything the pipeline needs for one frame of one page.
pub struct RenderContext<'a> {
    pub store: &'a AnnotationStore,
    pub mapper: &'a CoordinateMapper,
    pub selection: Option<Selection>,
    /// Raw capture samples, already in viewport space.
    pub capture_preview: Option<(usize, &'a [Point])>,
    /// Corner pair of an in-progress shape drag, in viewport space.
    pub shape_preview: Option<(usize, Point, Point)>,
    /// True when the shape drag previews an ellipse rather than a rectangle.
    pub preview_is_ellipse: bool,
    pub preview_color: Color,
    pub preview_width: f64,
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(store: &'a AnnotationStore, mapper: &'a CoordinateMapper) -> Self {
        Self {
            store,
            mapper,
            selection: None,
            capture_preview: None,
            shape_preview: None,
            preview_is_ellipse: false,
            preview_color: Color::from_rgba8(255, 0, 0, 255),
            preview_width: 3.0,
            selection_color: Color::from_rgba8(59, 130, 246, 255),
        }
    }

    /// Snapshot the relevant state of a session for one frame.
    pub fn from_session<B: DocumentBackend>(session: &'a DocumentSession<B>) -> Self {
        let mut ctx = Self::new(session.store(), session.mapper());
        ctx.selection = session.selection();
        ctx.capture_preview = session.capture_preview();
        ctx.shape_preview = session.shape_preview();
        ctx.preview_is_ellipse = session.mode() == Mode::Ellipse;
        ctx.preview_color = session.color().into();
        ctx.preview_width = session.stroke_width();
        ctx
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }
}

/// Build the draw commands for one page, bottom annotation first.
pub fn build_page_commands(ctx: &RenderContext, page_index: usize) -> Vec<DrawCommand> {
    let zoom = ctx.mapper.zoom();
    let mut commands = Vec::new();

    for annotation in ctx.store.list(page_index) {
        let color: Color = annotation.color.into();
        let width = annotation.width * zoom;
        match &annotation.shape {
            AnnotationShape::Stroke { points } => {
                commands.push(DrawCommand::Polyline {
                    points: points
                        .iter()
                        .map(|&p| ctx.mapper.to_viewport(p, page_index))
                        .collect(),
                    color,
                    width,
                });
            }
            AnnotationShape::Rectangle { start, end } => {
                commands.push(DrawCommand::Rect {
                    rect: projected_rect(ctx.mapper, page_index, *start, *end),
                    color,
                    width,
                });
            }
            AnnotationShape::Ellipse { start, end } => {
                commands.push(DrawCommand::Ellipse {
                    rect: projected_rect(ctx.mapper, page_index, *start, *end),
                    color,
                    width,
                });
            }
            AnnotationShape::Text { anchor, content } => {
                commands.push(DrawCommand::Text {
                    origin: ctx.mapper.to_viewport(*anchor, page_index),
                    content: content.clone(),
                    color,
                    size: annotation.width * zoom,
                });
            }
        }
    }

    commands.extend(highlight_commands(ctx, page_index));
    commands.extend(preview_commands(ctx, page_index));
    commands
}

/// Dashed outlines around the selected annotation and its group peers.
fn highlight_commands(ctx: &RenderContext, page_index: usize) -> Vec<DrawCommand> {
    let Some(selection) = ctx.selection else {
        return Vec::new();
    };
    if selection.page_index != page_index {
        return Vec::new();
    }

    let indices: Vec<usize> = match selection.group {
        Some(group_id) => ctx
            .store
            .group(page_index, group_id)
            .map(<[usize]>::to_vec)
            .unwrap_or_else(|| vec![selection.index]),
        None => vec![selection.index],
    };

    indices
        .into_iter()
        .filter_map(|index| ctx.store.annotation(page_index, index))
        .map(|annotation| {
            let bounds = annotation.bounds();
            let rect = projected_rect(
                ctx.mapper,
                page_index,
                Point::new(bounds.x0, bounds.y0),
                Point::new(bounds.x1, bounds.y1),
            )
            .inflate(HIGHLIGHT_PADDING, HIGHLIGHT_PADDING);
            DrawCommand::DashedRect {
                rect,
                color: ctx.selection_color,
            }
        })
        .collect()
}

/// The live stroke or shape-drag preview, drawn above everything else.
fn preview_commands(ctx: &RenderContext, page_index: usize) -> Vec<DrawCommand> {
    let zoom = ctx.mapper.zoom();
    let width = ctx.preview_width * zoom;

    if let Some((page, points)) = ctx.capture_preview {
        if page == page_index && points.len() >= 2 {
            return vec![DrawCommand::Polyline {
                points: points.to_vec(),
                color: ctx.preview_color,
                width,
            }];
        }
    }
    if let Some((page, start, current)) = ctx.shape_preview {
        if page == page_index {
            let rect = Rect::from_points(start, current);
            let command = if ctx.preview_is_ellipse {
                DrawCommand::Ellipse {
                    rect,
                    color: ctx.preview_color,
                    width,
                }
            } else {
                DrawCommand::Rect {
                    rect,
                    color: ctx.preview_color,
                    width,
                }
            };
            return vec![command];
        }
    }
    Vec::new()
}

fn projected_rect(
    mapper: &CoordinateMapper,
    page_index: usize,
    start: Point,
    end: Point,
) -> Rect {
    Rect::from_points(
        mapper.to_viewport(start, page_index),
        mapper.to_viewport(end, page_index),
    )
}
