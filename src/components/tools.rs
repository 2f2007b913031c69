use image::RgbImage;

use crate::canvas::{BACKGROUND_COLOR, Color, PixelBounds};
use crate::io::{AUTOSAVE_KEY, CanvasStore, StoreError};
use crate::ops::command::CanvasOp;
use crate::ops::fill::{FillError, FillReport, flood_fill};
use crate::ops::strokes::stroke_segment;
use crate::project::Project;
use crate::settings::{AppSettings, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};

// ============================================================================
// TOOLS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
    Fill,
    Line,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Fill => "Fill",
            Tool::Line => "Line",
        }
    }
}

/// A straight line that has been started but not yet committed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePreview {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

// ============================================================================
// EDITOR — routes pointer gestures to the active tool
// ============================================================================

/// One document plus the tool state that acts on it.
///
/// Positions are canvas coordinates in pixels; `(2.5, 3.5)` is the centre of
/// pixel (2, 3). A gesture is one `pointer_down`, any number of
/// `pointer_move`s and one `pointer_up`.
pub struct Editor {
    pub project: Project,
    tool: Tool,
    color: Color,
    brush_size: u32,
    painting: bool,
    last_pos: Option<(f32, f32)>,
    line: Option<LinePreview>,
    store: Option<CanvasStore>,
}

impl Editor {
    pub fn new(project: Project, settings: &AppSettings) -> Self {
        Self {
            project,
            tool: Tool::default(),
            color: settings.ink_color,
            brush_size: settings.brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
            painting: false,
            last_pos: None,
            line: None,
            store: None,
        }
    }

    /// Autosave into `store` at the end of every gesture.
    pub fn with_store(mut self, store: CanvasStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Picking a color while erasing switches back to the brush.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        if self.tool == Tool::Eraser {
            self.tool = Tool::Brush;
        }
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    // -- Gestures ---------------------------------------------------------

    pub fn pointer_down(&mut self, pos: (f32, f32)) {
        self.painting = true;
        self.last_pos = Some(pos);

        match self.tool {
            Tool::Brush | Tool::Eraser => {
                self.paint_stroke(pos, pos);
            }
            Tool::Fill => match pixel_at(pos) {
                Some(seed) => {
                    if let Err(e) = self.fill_at(seed) {
                        crate::log_warn!("fill ignored: {}", e);
                    }
                }
                None => {
                    crate::log_warn!("fill ignored: ({}, {}) is off the canvas", pos.0, pos.1);
                }
            },
            Tool::Line => {
                self.line = Some(LinePreview {
                    start: pos,
                    end: pos,
                });
            }
        }
    }

    pub fn pointer_move(&mut self, pos: (f32, f32)) {
        if !self.painting {
            return;
        }
        match self.tool {
            Tool::Brush | Tool::Eraser => {
                let from = self.last_pos.unwrap_or(pos);
                self.paint_stroke(from, pos);
                self.last_pos = Some(pos);
            }
            Tool::Line => {
                if let Some(line) = self.line.as_mut() {
                    line.end = pos;
                }
            }
            Tool::Fill => {}
        }
    }

    pub fn pointer_up(&mut self, pos: (f32, f32)) {
        if !self.painting {
            return;
        }
        if self.tool == Tool::Line
            && let Some(line) = self.line.take()
        {
            let width = self.brush_size as f32;
            let color = self.color;
            stroke_segment(&mut self.project.canvas, line.start, pos, width, color);
        }
        self.end_gesture();
    }

    /// Canvas copy with the pending line drawn on it, while a line is being
    /// dragged. The canvas itself is untouched until `pointer_up`.
    pub fn line_preview(&self) -> Option<RgbImage> {
        let line = self.line?;
        let mut preview = self.project.canvas.pixels.clone();
        stroke_segment(
            &mut preview,
            line.start,
            line.end,
            self.brush_size as f32,
            self.color,
        );
        Some(preview)
    }

    pub fn pending_line(&self) -> Option<LinePreview> {
        self.line
    }

    /// Fill the region under `seed` with the current color.
    pub fn fill_at(&mut self, seed: (u32, u32)) -> Result<FillReport, FillError> {
        let color = self.color;
        let report = flood_fill(&mut self.project.canvas, seed, color)?;
        crate::log_info!(
            "fill at ({}, {}) with {}: {} px, peak frontier {}",
            seed.0,
            seed.1,
            crate::canvas::format_hex_color(color),
            report.painted,
            report.peak_frontier
        );
        Ok(report)
    }

    /// Wipe the canvas and forget the stored copy.
    pub fn clear(&mut self) {
        self.project.canvas.clear();
        if let Some(store) = &self.store
            && let Err(e) = store.remove(AUTOSAVE_KEY)
        {
            crate::log_warn!("could not drop stored canvas: {}", e);
        }
    }

    /// Draw the stored canvas, if any, over the current one at (0, 0).
    /// Returns whether anything was restored.
    pub fn restore(&mut self) -> Result<bool, StoreError> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        match store.load(AUTOSAVE_KEY)? {
            Some(img) => {
                self.project.canvas.blit(&img);
                crate::log_info!("restored stored canvas {}x{}", img.width(), img.height());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replay a scripted op as the equivalent pointer gesture.
    pub fn apply(&mut self, op: &CanvasOp) -> Result<(), FillError> {
        match op {
            CanvasOp::Fill { at, color } => {
                self.set_tool(Tool::Fill);
                self.set_color(*color);
                self.painting = true;
                let result = self.fill_at(*at);
                self.end_gesture();
                result.map(|_| ())
            }
            CanvasOp::Line {
                from,
                to,
                color,
                width,
            } => {
                self.set_tool(Tool::Line);
                self.set_color(*color);
                if let Some(w) = width {
                    self.set_brush_size(*w);
                }
                self.pointer_down(pixel_center(*from));
                self.pointer_move(pixel_center(*to));
                self.pointer_up(pixel_center(*to));
                Ok(())
            }
            CanvasOp::Brush { path, color, width } => {
                self.set_tool(Tool::Brush);
                self.set_color(*color);
                self.replay_path(path, *width);
                Ok(())
            }
            CanvasOp::Erase { path, width } => {
                self.set_tool(Tool::Eraser);
                self.replay_path(path, *width);
                Ok(())
            }
            CanvasOp::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    fn replay_path(&mut self, path: &[(u32, u32)], width: Option<u32>) {
        if let Some(w) = width {
            self.set_brush_size(w);
        }
        let Some((&first, rest)) = path.split_first() else { return };
        self.pointer_down(pixel_center(first));
        for &p in rest {
            self.pointer_move(pixel_center(p));
        }
        let last = path.last().copied().unwrap_or(first);
        self.pointer_up(pixel_center(last));
    }

    fn paint_stroke(&mut self, from: (f32, f32), to: (f32, f32)) -> Option<PixelBounds> {
        let color = if self.tool == Tool::Eraser {
            BACKGROUND_COLOR
        } else {
            self.color
        };
        stroke_segment(
            &mut self.project.canvas,
            from,
            to,
            self.brush_size as f32,
            color,
        )
    }

    fn end_gesture(&mut self) {
        self.painting = false;
        self.last_pos = None;
        if let Some(store) = &self.store
            && let Err(e) = store.save(AUTOSAVE_KEY, &self.project.canvas.pixels)
        {
            crate::log_err!("autosave failed: {}", e);
        }
    }
}

/// Integer pixel under a canvas position, if the position is not negative.
fn pixel_at(pos: (f32, f32)) -> Option<(u32, u32)> {
    if pos.0 < 0.0 || pos.1 < 0.0 || !pos.0.is_finite() || !pos.1.is_finite() {
        return None;
    }
    Some((pos.0 as u32, pos.1 as u32))
}

fn pixel_center(p: (u32, u32)) -> (f32, f32) {
    (p.0 as f32 + 0.5, p.1 as f32 + 0.5)
}
