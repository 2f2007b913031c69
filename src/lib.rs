//! Pixelpad — a pixel canvas editor core.
//!
//! The interesting part is [`ops::fill::flood_fill`], a scanline seed fill
//! over any [`canvas::PixelSurface`]. Around it sit the brush/eraser/line
//! strokes, the gesture-driven [`components::tools::Editor`], key-value
//! canvas persistence and image export used by the headless CLI.

pub mod logger;

pub mod canvas;
pub mod cli;
pub mod components;
pub mod io;
pub mod ops;
pub mod project;
pub mod settings;

pub use canvas::{CanvasState, Color, PixelSurface};
pub use ops::fill::{FillError, FillReport, flood_fill};
