//! Pagemark Render Library
//!
//! Backend-agnostic draw-command generation for the annotation overlay.

pub mod pipeline;

pub use pipeline::{build_page_commands, DrawCommand, RenderContext};
