use std::collections::VecDeque;

use image::{Rgb, RgbImage};
use pixelpad::{CanvasState, Color, FillError, PixelSurface, flood_fill};

const RED: Color = Rgb([255, 0, 0]);
const BLUE: Color = Rgb([0, 0, 255]);
const GREEN: Color = Rgb([0, 255, 0]);
const WHITE: Color = Rgb([255, 255, 255]);

/// Plain BFS over the 4-connected component, used as the reference answer.
fn component(img: &RgbImage, seed: (u32, u32)) -> Vec<bool> {
    let (w, h) = img.dimensions();
    let target = *img.get_pixel(seed.0, seed.1);
    let mut inside = vec![false; (w * h) as usize];
    let mut queue = VecDeque::from([seed]);
    inside[(seed.1 * w + seed.0) as usize] = true;
    while let Some((x, y)) = queue.pop_front() {
        let mut visit = |nx: u32, ny: u32| {
            let i = (ny * w + nx) as usize;
            if !inside[i] && *img.get_pixel(nx, ny) == target {
                inside[i] = true;
                queue.push_back((nx, ny));
            }
        };
        if x > 0 {
            visit(x - 1, y);
        }
        if x + 1 < w {
            visit(x + 1, y);
        }
        if y > 0 {
            visit(x, y - 1);
        }
        if y + 1 < h {
            visit(x, y + 1);
        }
    }
    inside
}

/// Deterministic two-color noise so the regions have ragged edges.
fn noise(w: u32, h: u32, seed: u32) -> RgbImage {
    let mut state = seed | 1;
    RgbImage::from_fn(w, h, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        if state % 100 < 38 { BLUE } else { WHITE }
    })
}

#[test]
fn matches_reference_component_on_noisy_images() {
    for seed in 1..40u32 {
        let original = noise(23, 17, seed * 7919);
        let start = (seed % 23, (seed * 3) % 17);
        let expected = component(&original, start);

        let mut img = original.clone();
        let report = flood_fill(&mut img, start, GREEN).unwrap();

        assert_eq!(report.painted, expected.iter().filter(|b| **b).count());
        for (x, y, px) in img.enumerate_pixels() {
            let i = (y * 23 + x) as usize;
            if expected[i] {
                assert_eq!(*px, GREEN, "missed ({}, {}) for seed {}", x, y, seed);
            } else {
                assert_eq!(px, original.get_pixel(x, y), "leaked into ({}, {})", x, y);
            }
        }
    }
}

#[test]
fn disconnected_regions_untouched() {
    let mut canvas = CanvasState::from_rgb_image(RgbImage::from_fn(5, 5, |x, _| {
        if x == 2 { BLUE } else { RED }
    }));
    flood_fill(&mut canvas, (0, 0), GREEN).unwrap();
    for y in 0..5 {
        assert_eq!(canvas.get_pixel(0, y), GREEN);
        assert_eq!(canvas.get_pixel(1, y), GREEN);
        assert_eq!(canvas.get_pixel(2, y), BLUE);
        assert_eq!(canvas.get_pixel(3, y), RED);
        assert_eq!(canvas.get_pixel(4, y), RED);
    }
}

#[test]
fn blank_canvas_fills_completely() {
    let mut canvas = CanvasState::new(100, 100);
    let report = flood_fill(&mut canvas, (37, 81), RED).unwrap();
    assert_eq!(report.painted, 10_000);
    assert_eq!(report.bounds, Some((0, 0, 99, 99)));
    assert!(canvas.pixels.pixels().all(|p| *p == RED));
}

#[test]
fn second_fill_with_same_color_is_noop() {
    let mut img = noise(12, 12, 42);
    let seed = (0..12)
        .flat_map(|y| (0..12).map(move |x| (x, y)))
        .find(|&(x, y)| *img.get_pixel(x, y) == WHITE)
        .unwrap();
    flood_fill(&mut img, seed, RED).unwrap();
    let after_first = img.clone();
    let report = flood_fill(&mut img, seed, RED).unwrap();
    assert!(report.is_noop());
    assert_eq!(img, after_first);
}

#[test]
fn equal_colors_leave_buffer_identical() {
    let original = noise(9, 9, 5);
    let mut img = original.clone();
    let seed_color = *img.get_pixel(4, 4);
    flood_fill(&mut img, (4, 4), seed_color).unwrap();
    assert_eq!(img.as_raw(), original.as_raw());
}

#[test]
fn single_pixel_region() {
    let mut img = RgbImage::from_pixel(3, 3, BLUE);
    img.put_pixel(1, 1, WHITE);
    let report = flood_fill(&mut img, (1, 1), RED).unwrap();
    assert_eq!(report.painted, 1);
    assert_eq!(report.bounds, Some((1, 1, 1, 1)));
    assert_eq!(img.pixels().filter(|p| **p == BLUE).count(), 8);
}

#[test]
fn last_column_and_row_are_reached() {
    // Region hugs the right and bottom edges and is entered from the far side.
    let mut img = RgbImage::from_fn(6, 4, |x, y| if y == 0 && x < 5 { BLUE } else { WHITE });
    flood_fill(&mut img, (0, 3), RED).unwrap();
    assert_eq!(*img.get_pixel(5, 0), RED);
    assert_eq!(*img.get_pixel(5, 3), RED);
    assert_eq!(*img.get_pixel(4, 0), BLUE);
}

#[test]
fn single_column_and_single_row_buffers() {
    let mut column = RgbImage::from_pixel(1, 7, WHITE);
    assert_eq!(flood_fill(&mut column, (0, 6), RED).unwrap().painted, 7);

    let mut row = RgbImage::from_pixel(7, 1, WHITE);
    assert_eq!(flood_fill(&mut row, (3, 0), RED).unwrap().painted, 7);
    assert!(row.pixels().all(|p| *p == RED));
}

#[test]
fn out_of_bounds_seed_is_reported() {
    let mut canvas = CanvasState::new(4, 4);
    let generation = canvas.generation;
    let err = flood_fill(&mut canvas, (0, 4), RED).unwrap_err();
    assert!(matches!(err, FillError::SeedOutOfBounds { y: 4, .. }));
    assert_eq!(canvas.generation, generation);
}
