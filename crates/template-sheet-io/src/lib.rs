#![warn(missing_docs)]
//! # template-sheet-io
//!
//! ## Purpose
//! Moves pixel buffers between the filesystem and the in-memory model.
//!
//! ## Responsibilities
//! - Decode PNG and JPEG templates into straight-alpha RGBA buffers.
//! - Encode canvases as PNG files.
//! - List candidate template files in a directory.
//!
//! ## Data flow
//! Template path -> [`decode_image`] -> [`DecodedImage`] for tiling; filled
//! canvas -> [`encode_png`] -> file on disk.
//!
//! ## Ownership and lifetimes
//! Decoded buffers are owned and detached from the reader. Encoding only
//! borrows the canvas.
//!
//! ## Error model
//! Read and decode failures map to [`IoError::Decode`], output failures to
//! [`IoError::Write`]. A failed encode may leave a partial file behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use template_sheet_core::PixelBuffer;
use thiserror::Error;
use tracing::debug;

/// File extensions recognized as templates by [`list_templates`].
pub const TEMPLATE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Template pixels together with the detected source format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Decoded RGBA pixels.
    pub buffer: PixelBuffer,
    /// Short lowercase format name (`png`, `jpeg`).
    pub format_name: &'static str,
}

/// Decodes the image at `path`, sniffing the format from its contents.
///
/// # Errors
/// Returns [`IoError::Decode`] when the file cannot be opened, the format is
/// not PNG or JPEG, or the data is corrupt.
pub fn decode_image(path: &Path) -> Result<DecodedImage, IoError> {
    let decode_error = |reason: String| IoError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let reader = ImageReader::open(path)
        .map_err(|error| decode_error(error.to_string()))?
        .with_guessed_format()
        .map_err(|error| decode_error(error.to_string()))?;

    let format_name = match reader.format() {
        Some(ImageFormat::Png) => "png",
        Some(ImageFormat::Jpeg) => "jpeg",
        Some(other) => return Err(decode_error(format!("unsupported format {other:?}"))),
        None => return Err(decode_error("unrecognized image format".to_string())),
    };

    let rgba = reader
        .decode()
        .map_err(|error| decode_error(error.to_string()))?
        .into_rgba8();
    let (width, height) = rgba.dimensions();
    let buffer = PixelBuffer::from_rgba(width, height, rgba.into_raw())
        .map_err(|error| decode_error(error.to_string()))?;

    debug!(path = %path.display(), format_name, width, height, "template decoded");
    Ok(DecodedImage {
        buffer,
        format_name,
    })
}

/// Writes `buffer` to `path` as an 8-bit RGBA PNG, replacing any existing file.
///
/// # Errors
/// Returns [`IoError::Write`] when the file cannot be created or encoding fails.
pub fn encode_png(buffer: &PixelBuffer, path: &Path) -> Result<(), IoError> {
    let write_error = |reason: String| IoError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::create(path).map_err(|error| write_error(error.to_string()))?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new(&mut writer)
        .write_image(
            buffer.as_rgba(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|error| write_error(error.to_string()))?;
    writer
        .flush()
        .map_err(|error| write_error(error.to_string()))?;

    debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "png written"
    );
    Ok(())
}

/// Lists image files in `dir` that look like templates, sorted by name.
///
/// A file qualifies when its extension is one of [`TEMPLATE_EXTENSIONS`],
/// compared ASCII case-insensitively. Directories are skipped.
///
/// # Errors
/// Returns [`IoError::List`] when the directory cannot be read.
pub fn list_templates(dir: &Path) -> Result<Vec<String>, IoError> {
    let list_error = |error: std::io::Error| IoError::List {
        path: dir.to_path_buf(),
        reason: error.to_string(),
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        if entry.file_type().map_err(list_error)?.is_dir() {
            continue;
        }

        let path = entry.path();
        let is_template = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                TEMPLATE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if is_template {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

/// Error type for image file access.
#[derive(Debug, Error)]
pub enum IoError {
    /// Input could not be read or decoded.
    #[error("failed to decode '{}': {reason}", .path.display())]
    Decode {
        /// Input path.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
    /// Output could not be written.
    #[error("failed to write '{}': {reason}", .path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
    /// Directory listing failed.
    #[error("failed to list '{}': {reason}", .path.display())]
    List {
        /// Listed directory.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
}
