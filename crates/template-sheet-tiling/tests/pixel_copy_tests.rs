//! Tests pixel-exact template copies and untouched background.

use template_sheet_core::{Color, PixelBuffer, TRANSPARENT};
use template_sheet_tiling::{GridLayout, replicate};

const BACKGROUND: Color = [1, 2, 3, 4];

/// Template whose pixels encode their own coordinates.
fn coordinate_template(width: u32, height: u32) -> PixelBuffer {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            rgba.extend_from_slice(&[x as u8, y as u8, 200, 128]);
        }
    }
    PixelBuffer::from_rgba(width, height, rgba).expect("template should be valid")
}

#[test]
fn pixel_copy_tests_cells_hold_exact_template_and_background_is_untouched() {
    let template = coordinate_template(5, 3);
    let mut canvas = PixelBuffer::filled(23, 17, BACKGROUND).expect("canvas should build");
    let margin = 2;

    let replication = replicate(&template, &mut canvas, margin);
    let layout = GridLayout::new(23, 17, 5, 3, margin);
    let origins: Vec<_> = layout.origins().collect();

    assert_eq!(replication.cells, origins.len() as u64);
    assert_eq!(replication.cells, 3 * 4);
    assert_eq!(replication.pixels_written, 5 * 3 * replication.cells);

    for y in 0..17_i64 {
        for x in 0..23_i64 {
            let cell = origins
                .iter()
                .find(|o| o.x <= x && x < o.x + 5 && o.y <= y && y < o.y + 3);
            let actual = canvas.pixel_at(x, y).expect("pixel should be in bounds");
            match cell {
                Some(origin) => {
                    let expected = template
                        .pixel_at(x - origin.x, y - origin.y)
                        .expect("template pixel should exist");
                    assert_eq!(actual, expected, "cell pixel at ({x}, {y})");
                }
                None => assert_eq!(actual, BACKGROUND, "background pixel at ({x}, {y})"),
            }
        }
    }
}

#[test]
fn pixel_copy_tests_oversized_template_leaves_canvas_unchanged() {
    let template = PixelBuffer::filled(500, 500, [255, 0, 0, 255]).expect("template");
    let mut canvas = PixelBuffer::filled(400, 400, TRANSPARENT).expect("canvas");
    let before = canvas.clone();

    let replication = replicate(&template, &mut canvas, 0);

    assert!(replication.is_empty());
    assert_eq!(replication.pixels_written, 0);
    assert_eq!(canvas, before);
}

#[test]
fn pixel_copy_tests_template_too_large_for_margins_places_nothing() {
    let template = PixelBuffer::filled(100, 10, [9, 9, 9, 9]).expect("template");
    let mut canvas = PixelBuffer::filled(110, 110, TRANSPARENT).expect("canvas");

    let replication = replicate(&template, &mut canvas, 10);

    assert!(replication.is_empty());
    assert!(canvas.as_rgba().iter().all(|byte| *byte == 0));
}

#[test]
fn pixel_copy_tests_negative_margin_clips_but_counts_every_template_pixel() {
    let template = coordinate_template(4, 4);
    let mut canvas = PixelBuffer::filled(10, 10, TRANSPARENT).expect("canvas");

    let replication = replicate(&template, &mut canvas, -2);

    assert_eq!(replication.cells, 9);
    assert_eq!(replication.pixels_written, 4 * 4 * 9);
    // Canvas (0, 0) is template (2, 2) of the cell starting at (-2, -2).
    assert_eq!(canvas.pixel_at(0, 0), Some([2, 2, 200, 128]));
    // Canvas (9, 9) is template (3, 3) of the cell starting at (6, 6).
    assert_eq!(canvas.pixel_at(9, 9), Some([3, 3, 200, 128]));
}

#[test]
fn pixel_copy_tests_repeated_runs_are_deterministic() {
    let template = coordinate_template(7, 5);
    let mut first = PixelBuffer::filled(64, 48, TRANSPARENT).expect("canvas");
    let mut second = first.clone();

    let a = replicate(&template, &mut first, 3);
    let b = replicate(&template, &mut second, 3);

    assert_eq!(a, b);
    assert_eq!(first, second);
}
