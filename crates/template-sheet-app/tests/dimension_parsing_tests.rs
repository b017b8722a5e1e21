//! Integration tests for `<width>x<height>` parsing.

use template_sheet_app::{AppError, parse_dimensions};

#[test]
fn dimension_parsing_tests_accepts_width_by_height() {
    assert_eq!(parse_dimensions("50x20").expect("should parse"), (50, 20));
    assert_eq!(parse_dimensions("+7x3").expect("should parse"), (7, 3));
}

#[test]
fn dimension_parsing_tests_rejects_missing_delimiter() {
    let error = parse_dimensions("50X20").expect_err("uppercase X is not a delimiter");
    assert!(matches!(error, AppError::Configuration(_)));
    assert!(error.to_string().contains("`x` delimiter"));
}

#[test]
fn dimension_parsing_tests_rejects_non_integer_components() {
    for raw in ["ax20", "50xb", "50x", "x20", "10x20x30", "1.5x2"] {
        let result = parse_dimensions(raw);
        assert!(
            matches!(result, Err(AppError::Configuration(_))),
            "{raw} should be rejected"
        );
    }
}

#[test]
fn dimension_parsing_tests_rejects_non_positive_components() {
    assert!(matches!(
        parse_dimensions("0x20"),
        Err(AppError::Configuration(_))
    ));
    assert!(matches!(
        parse_dimensions("20x-5"),
        Err(AppError::Configuration(_))
    ));
}
