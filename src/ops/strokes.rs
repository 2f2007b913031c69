// ============================================================================
// STROKES — round-capped hard brush, eraser and straight lines
// ============================================================================

use crate::canvas::{Color, PixelBounds, PixelSurface, extend_bounds, union_bounds};

/// Paint a filled disc of diameter `width` centred on `center`.
///
/// A pixel is covered when its centre lies inside the disc. Widths under 2
/// collapse to the single pixel under `center`, so thin brushes never vanish
/// between pixel centres. Returns the touched bounds, or `None` when the disc
/// lies entirely off the surface.
pub fn stamp_disc<S: PixelSurface + ?Sized>(
    surface: &mut S,
    center: (f32, f32),
    width: f32,
    color: Color,
) -> Option<PixelBounds> {
    let canvas_w = surface.width();
    let canvas_h = surface.height();
    if canvas_w == 0 || canvas_h == 0 {
        return None;
    }

    let (cx, cy) = center;
    let radius = width / 2.0;

    if radius < 1.0 {
        if cx < 0.0 || cy < 0.0 {
            return None;
        }
        let (px, py) = (cx as u32, cy as u32);
        if px >= canvas_w || py >= canvas_h {
            return None;
        }
        surface.set_pixel(px, py, color);
        return Some((px, py, px, py));
    }

    let right = (cx + radius).ceil();
    let bottom = (cy + radius).ceil();
    if right < 0.0 || bottom < 0.0 {
        return None;
    }
    let min_x = (cx - radius).floor().max(0.0) as u32;
    let min_y = (cy - radius).floor().max(0.0) as u32;
    let max_x = (right as u32).min(canvas_w - 1);
    let max_y = (bottom as u32).min(canvas_h - 1);
    if min_x > max_x || min_y > max_y {
        return None;
    }

    let radius_sq = radius * radius;
    let mut bounds = None;
    for y in min_y..=max_y {
        let dy = y as f32 + 0.5 - cy;
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - cx;
            if dx * dx + dy * dy <= radius_sq {
                surface.set_pixel(x, y, color);
                bounds = extend_bounds(bounds, x, y);
            }
        }
    }
    bounds
}

/// Stroke from `start` to `end` by stamping discs one pixel apart.
pub fn stroke_segment<S: PixelSurface + ?Sized>(
    surface: &mut S,
    start: (f32, f32),
    end: (f32, f32),
    width: f32,
    color: Color,
) -> Option<PixelBounds> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance < 0.1 {
        return stamp_disc(surface, start, width, color);
    }

    let steps = distance.ceil() as usize;
    let mut bounds = None;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let stamped = stamp_disc(surface, (start.0 + dx * t, start.1 + dy * t), width, color);
        bounds = union_bounds(bounds, stamped);
    }
    bounds
}
