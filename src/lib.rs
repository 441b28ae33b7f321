//! Ekta: a photo editing pipeline.
//!
//! The core is [`processing::render`], a pure function from an original RGBA
//! bitmap and an [`EditState`] to a new bitmap. [`Editor`] keeps the original
//! across edits and re-renders on every change; [`RenderWorker`] does the same
//! off-thread. Decoding and export live in [`image_io`].

pub mod config;
pub mod editor;
pub mod error;
pub mod image_io;
pub mod processing;
pub mod state;
pub mod worker;

pub use editor::Editor;
pub use error::{PipelineError, bitmap_from_raw};
pub use image::RgbaImage;
pub use state::{Adjustments, EditState, FilterKind};
pub use worker::{RenderOutput, RenderWorker};
