// ============================================================================
// SCANLINE SEED FILL
// ============================================================================
//
// Repaints the 4-connected region of pixels that share the seed's color.
// Works column by column: each frontier entry is expanded into the full
// vertical run of matching pixels that contains it, and the columns to the
// left and right contribute at most one frontier entry per contiguous run.

use std::fmt;

use crate::canvas::{Color, PixelBounds, PixelSurface, extend_bounds};

/// Why a fill could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillError {
    /// The seed lies outside the surface. Callers must validate pointer
    /// positions before asking for a fill.
    SeedOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillError::SeedOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "fill seed ({}, {}) is outside the {}x{} canvas",
                x, y, width, height
            ),
        }
    }
}

impl std::error::Error for FillError {}

/// What a completed fill did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillReport {
    /// Pixels repainted. Zero when the seed already had the fill color.
    pub painted: usize,
    /// Bounding box of the repainted region.
    pub bounds: Option<PixelBounds>,
    /// Largest frontier-stack length seen during the walk.
    pub peak_frontier: usize,
}

impl FillReport {
    pub fn is_noop(&self) -> bool {
        self.painted == 0
    }

    fn record(&mut self, x: u32, y: u32) {
        self.painted += 1;
        self.bounds = extend_bounds(self.bounds, x, y);
    }
}

/// Flood-fill the region containing `seed` with `fill_color`.
///
/// The target color is read once from the seed before anything is written.
/// Every pixel is painted the moment its run is scanned, so a painted pixel
/// never matches the target again; that is what bounds the walk.
///
/// Returns [`FillError::SeedOutOfBounds`] without touching the surface when
/// the seed is not on it. A seed that already holds `fill_color` is a
/// successful no-op.
pub fn flood_fill<S: PixelSurface + ?Sized>(
    surface: &mut S,
    seed: (u32, u32),
    fill_color: Color,
) -> Result<FillReport, FillError> {
    let width = surface.width();
    let height = surface.height();
    let (seed_x, seed_y) = seed;

    if seed_x >= width || seed_y >= height {
        return Err(FillError::SeedOutOfBounds {
            x: seed_x,
            y: seed_y,
            width,
            height,
        });
    }

    let target = surface.get_pixel(seed_x, seed_y);
    let mut report = FillReport::default();
    if target == fill_color {
        return Ok(report);
    }

    let mut stack: Vec<(u32, u32)> = Vec::with_capacity(64);
    stack.push(seed);
    report.peak_frontier = 1;

    while let Some((x, y0)) = stack.pop() {
        // Another run may have painted this entry since it was queued.
        if surface.get_pixel(x, y0) != target {
            continue;
        }

        let mut y = y0;
        while y > 0 && surface.get_pixel(x, y - 1) == target {
            y -= 1;
        }

        let mut reach_left = false;
        let mut reach_right = false;

        while y < height && surface.get_pixel(x, y) == target {
            surface.set_pixel(x, y, fill_color);
            report.record(x, y);

            if x > 0 {
                if surface.get_pixel(x - 1, y) == target {
                    if !reach_left {
                        stack.push((x - 1, y));
                        reach_left = true;
                    }
                } else {
                    reach_left = false;
                }
            }

            if x + 1 < width {
                if surface.get_pixel(x + 1, y) == target {
                    if !reach_right {
                        stack.push((x + 1, y));
                        reach_right = true;
                    }
                } else {
                    reach_right = false;
                }
            }

            y += 1;
        }

        report.peak_frontier = report.peak_frontier.max(stack.len());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const RED: Color = Rgb([255, 0, 0]);
    const BLUE: Color = Rgb([0, 0, 255]);
    const GREEN: Color = Rgb([0, 255, 0]);
    const WHITE: Color = Rgb([255, 255, 255]);

    /// Build an image from rows of characters: `.` white, `#` blue, `r` red.
    fn grid(rows: &[&str]) -> RgbImage {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        RgbImage::from_fn(w, h, |x, y| match rows[y as usize].as_bytes()[x as usize] {
            b'#' => BLUE,
            b'r' => RED,
            _ => WHITE,
        })
    }

    #[test]
    fn fills_enclosed_room_only() {
        let mut img = grid(&[
            "#######", //
            "#.....#", //
            "#.###.#", //
            "#.#.#.#", //
            "#.###.#", //
            "#.....#", //
            "#######", //
        ]);
        let report = flood_fill(&mut img, (1, 1), GREEN).unwrap();
        assert_eq!(report.painted, 16);
        assert_eq!(report.bounds, Some((1, 1, 5, 5)));
        // The pocket inside the inner box is not connected.
        assert_eq!(*img.get_pixel(3, 3), WHITE);
        assert_eq!(*img.get_pixel(0, 0), BLUE);
        assert_eq!(*img.get_pixel(5, 5), GREEN);
    }

    #[test]
    fn diagonal_neighbors_are_not_connected() {
        let mut img = grid(&[
            ".#", //
            "#.", //
        ]);
        let report = flood_fill(&mut img, (0, 0), RED).unwrap();
        assert_eq!(report.painted, 1);
        assert_eq!(*img.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn walks_up_from_a_seed_below_the_run_top() {
        let mut img = grid(&[
            "..", //
            "..", //
            "..", //
        ]);
        let report = flood_fill(&mut img, (1, 2), RED).unwrap();
        assert_eq!(report.painted, 6);
        assert!(img.pixels().all(|p| *p == RED));
    }

    #[test]
    fn snaking_corridor_is_filled_completely() {
        let mut img = grid(&[
            "......#", //
            "#####.#", //
            "......#", //
            ".######", //
            ".......", //
        ]);
        let report = flood_fill(&mut img, (0, 0), RED).unwrap();
        let whites = img.pixels().filter(|p| **p == WHITE).count();
        assert_eq!(whites, 0);
        assert_eq!(report.painted, 21);
    }

    #[test]
    fn equal_target_and_fill_is_a_noop() {
        let mut img = grid(&["r.r"]);
        let before = img.clone();
        let report = flood_fill(&mut img, (1, 0), WHITE).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.bounds, None);
        assert_eq!(img, before);
    }

    #[test]
    fn seed_outside_surface_is_rejected_untouched() {
        let mut img = grid(&["...", "..."]);
        let before = img.clone();
        let err = flood_fill(&mut img, (3, 0), RED).unwrap_err();
        assert_eq!(
            err,
            FillError::SeedOutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            }
        );
        assert_eq!(img, before);
        assert!(flood_fill(&mut img, (0, 2), RED).is_err());
    }

    #[test]
    fn frontier_stays_per_run_not_per_pixel() {
        let mut img = RgbImage::from_pixel(2, 64, WHITE);
        let report = flood_fill(&mut img, (0, 0), RED).unwrap();
        assert_eq!(report.painted, 128);
        // One entry for the neighbouring column, not one per row.
        assert_eq!(report.peak_frontier, 1);
    }
}
