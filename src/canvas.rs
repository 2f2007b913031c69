use image::{ImageBuffer, Rgb, RgbImage};
use rayon::prelude::*;

// ============================================================================
// COLOR
// ============================================================================

/// Exact RGB pixel value. Two colors match only when every component is equal.
pub type Color = Rgb<u8>;

/// Blank-canvas color, also what the eraser paints.
pub const BACKGROUND_COLOR: Color = Rgb([255, 255, 255]);
/// Ink used until the user picks something else.
pub const DEFAULT_INK: Color = Rgb([0, 0, 0]);

/// Largest canvas edge accepted anywhere (new canvases, project files).
pub const MAX_CANVAS_DIM: u32 = 32_768;

/// Inclusive pixel rectangle `(min_x, min_y, max_x, max_y)`.
pub type PixelBounds = (u32, u32, u32, u32);

/// Grow `bounds` so that it covers `(x, y)`.
pub fn extend_bounds(bounds: Option<PixelBounds>, x: u32, y: u32) -> Option<PixelBounds> {
    Some(match bounds {
        None => (x, y, x, y),
        Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
    })
}

/// Union of two optional rectangles.
pub fn union_bounds(a: Option<PixelBounds>, b: Option<PixelBounds>) -> Option<PixelBounds> {
    match (a, b) {
        (None, other) | (other, None) => other,
        (Some((ax0, ay0, ax1, ay1)), Some((bx0, by0, bx1, by1))) => {
            Some((ax0.min(bx0), ay0.min(by0), ax1.max(bx1), ay1.max(by1)))
        }
    }
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb([r, g, b]))
}

pub fn format_hex_color(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

// ============================================================================
// PIXEL SURFACE – the read/write interface tools operate on
// ============================================================================

/// Random-access pixel storage. Writes must be visible to the very next read.
pub trait PixelSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn get_pixel(&self, x: u32, y: u32) -> Color;
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }
}

impl PixelSurface for RgbImage {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        *ImageBuffer::get_pixel(self, x, y)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.put_pixel(x, y, color);
    }
}

// ============================================================================
// CANVAS STATE
// ============================================================================

/// The document raster. Every mutation bumps `generation`, which lets the
/// owning project tell whether anything changed since the last save.
#[derive(Clone, Debug)]
pub struct CanvasState {
    pub pixels: RgbImage,
    pub generation: u64,
}

impl CanvasState {
    /// Blank canvas painted with [`BACKGROUND_COLOR`].
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.clamp(1, MAX_CANVAS_DIM);
        let height = height.clamp(1, MAX_CANVAS_DIM);
        Self {
            pixels: RgbImage::from_pixel(width, height, BACKGROUND_COLOR),
            generation: 0,
        }
    }

    pub fn from_rgb_image(pixels: RgbImage) -> Self {
        Self {
            pixels,
            generation: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn mark_dirty(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Paint the whole canvas one color.
    pub fn fill(&mut self, color: Color) {
        self.pixels
            .par_chunks_mut(3)
            .for_each(|px| px.copy_from_slice(&color.0));
        self.mark_dirty();
    }

    /// Reset to a blank canvas.
    pub fn clear(&mut self) {
        self.fill(BACKGROUND_COLOR);
    }

    /// Draw `src` with its top-left corner at (0, 0). Parts that fall outside
    /// the canvas are clipped; the canvas is never resized.
    pub fn blit(&mut self, src: &RgbImage) {
        image::imageops::replace(&mut self.pixels, src, 0, 0);
        self.mark_dirty();
    }
}

impl PixelSurface for CanvasState {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        *self.pixels.get_pixel(x, y)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.pixels.put_pixel(x, y, color);
        self.mark_dirty();
    }
}
