pub mod command;
pub mod fill;
pub mod strokes;
