//! Tests canvas sizing and the memory cap.

use template_sheet_core::{CoreError, MAX_CANVAS_BYTES, allocate_canvas};

#[test]
fn canvas_allocation_tests_sizes_a4_at_default_resolution() {
    let canvas = allocate_canvas(210, 297, 10).expect("A4 canvas should allocate");
    assert_eq!(canvas.width(), 2100);
    assert_eq!(canvas.height(), 2970);
    assert_eq!(canvas.as_rgba().len(), 2100 * 2970 * 4);
}

#[test]
fn canvas_allocation_tests_starts_fully_transparent() {
    let canvas = allocate_canvas(5, 3, 2).expect("small canvas should allocate");
    assert_eq!((canvas.width(), canvas.height()), (10, 6));
    assert!(canvas.as_rgba().iter().all(|byte| *byte == 0));
}

#[test]
fn canvas_allocation_tests_rejects_oversized_canvas() {
    let result = allocate_canvas(30_000, 30_000, 10);
    assert!(matches!(
        result,
        Err(CoreError::SizeLimitExceeded {
            requested: Some(360_000_000_000),
            limit: MAX_CANVAS_BYTES,
        })
    ));
}

#[test]
fn canvas_allocation_tests_rejects_one_column_past_the_cap() {
    // 16384 x 16384 px x 4 bytes is exactly the cap; one more column is not.
    let over = allocate_canvas(16_385, 16_384, 1);
    assert!(matches!(
        over,
        Err(CoreError::SizeLimitExceeded {
            requested: Some(1_073_807_360),
            ..
        })
    ));
}

#[test]
fn canvas_allocation_tests_treats_overflow_as_size_limit() {
    let result = allocate_canvas(i64::MAX, 2, 10);
    assert!(matches!(
        result,
        Err(CoreError::SizeLimitExceeded {
            requested: None,
            ..
        })
    ));
}

#[test]
fn canvas_allocation_tests_rejects_non_positive_dimensions() {
    assert_eq!(
        allocate_canvas(0, 10, 10),
        Err(CoreError::InvalidCanvasDimensions {
            width: 0,
            height: 100
        })
    );
    assert!(matches!(
        allocate_canvas(10, 10, -1),
        Err(CoreError::InvalidCanvasDimensions { .. })
    ));
}
