//! Shared fixtures for app integration tests.

use std::path::Path;

use template_sheet_core::{Color, PixelBuffer};
use template_sheet_io::encode_png;

/// Converts string literals into owned CLI words.
#[allow(dead_code)]
pub fn words(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|word| word.to_string()).collect()
}

/// Writes a solid `width x height` PNG named `name` into `dir`.
#[allow(dead_code)]
pub fn write_template(dir: &Path, name: &str, width: u32, height: u32, color: Color) {
    let template = PixelBuffer::filled(width, height, color).expect("template fixture should build");
    encode_png(&template, &dir.join(name)).expect("template fixture should be written");
}

/// Decodes captured progress output.
#[allow(dead_code)]
pub fn lines(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .lines()
        .map(str::to_string)
        .collect()
}
