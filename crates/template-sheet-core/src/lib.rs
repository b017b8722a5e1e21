#![warn(missing_docs)]
//! # template-sheet-core
//!
//! ## Purpose
//! Defines the pure data model used across the `template-sheet` workspace.
//!
//! ## Responsibilities
//! - Hold the compiled-in A-series paper catalog.
//! - Represent resolved run [`Settings`] and their defaults.
//! - Represent straight-alpha RGBA pixel buffers.
//! - Allocate blank canvases under a fixed memory cap.
//!
//! ## Data flow
//! The app resolves [`Settings`] -> [`allocate_canvas`] builds a blank
//! [`PixelBuffer`] -> the tiling crate writes template copies into it -> the
//! io crate encodes it to disk.
//!
//! ## Ownership and lifetimes
//! Pixel buffers own their bytes (`Vec<u8>`). The canvas is lent mutably to
//! one writer at a time; templates are only ever borrowed immutably.
//!
//! ## Error model
//! Out-of-range paper indices, malformed buffers and oversized canvases return
//! [`CoreError`] variants. Nothing in this crate panics on user input.
//!
//! ## Example
//! ```rust
//! use template_sheet_core::{allocate_canvas, paper_by_index};
//!
//! let a4 = paper_by_index(4).unwrap();
//! let canvas = allocate_canvas(a4.width_mm, a4.height_mm, 10).unwrap();
//! assert_eq!((canvas.width(), canvas.height()), (2100, 2970));
//! ```

use thiserror::Error;

/// Largest canvas byte size [`allocate_canvas`] will commit (1 GiB).
pub const MAX_CANVAS_BYTES: u64 = 1024 * 1024 * 1024;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// One straight-alpha RGBA pixel value.
pub type Color = [u8; BYTES_PER_PIXEL];

/// Fully transparent black, the initial value of every canvas pixel.
pub const TRANSPARENT: Color = [0, 0, 0, 0];

/// Physical paper dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperSize {
    /// Paper width in millimeters.
    pub width_mm: i64,
    /// Paper height in millimeters.
    pub height_mm: i64,
}

impl PaperSize {
    const fn new(width_mm: i64, height_mm: i64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }
}

/// ISO 216 A-series sizes, indexed by the number after the `A` (A0..A8).
pub const A_SERIES: [PaperSize; 9] = [
    PaperSize::new(841, 1189),
    PaperSize::new(594, 841),
    PaperSize::new(420, 594),
    PaperSize::new(297, 420),
    PaperSize::new(210, 297),
    PaperSize::new(148, 210),
    PaperSize::new(105, 148),
    PaperSize::new(74, 105),
    PaperSize::new(52, 74),
];

/// A4, the default sheet.
pub const A4: PaperSize = A_SERIES[4];

/// Looks up an A-series paper size by its index (`4` for A4).
///
/// # Errors
/// Returns [`CoreError::PaperOutOfRange`] when `index` is outside `0..=8`.
pub fn paper_by_index(index: i64) -> Result<PaperSize, CoreError> {
    usize::try_from(index)
        .ok()
        .and_then(|slot| A_SERIES.get(slot))
        .copied()
        .ok_or(CoreError::PaperOutOfRange(index))
}

/// Default resolution in pixels per millimeter.
pub const DEFAULT_PIXELS_PER_MM: i64 = 10;

/// Default margin kept free on every canvas edge, in millimeters.
pub const DEFAULT_MARGIN_MM: i64 = 10;

/// Resolved configuration for one `create` or `replicate` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Sheet used as the replication canvas.
    pub paper: PaperSize,
    /// Resolution factor converting millimeters to pixels. Always positive.
    pub pixels_per_mm: i64,
    /// Margin in millimeters. May be zero or negative.
    pub margin_mm: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paper: A4,
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
            margin_mm: DEFAULT_MARGIN_MM,
        }
    }
}

impl Settings {
    /// Returns the margin converted to pixels.
    ///
    /// # Errors
    /// Returns [`CoreError::DimensionOverflow`] when the product overflows.
    pub fn margin_px(&self) -> Result<i64, CoreError> {
        self.margin_mm
            .checked_mul(self.pixels_per_mm)
            .ok_or(CoreError::DimensionOverflow)
    }
}

/// Row-major straight-alpha RGBA pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps an existing RGBA byte vector.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidBufferShape`] when the byte length is not
    /// exactly `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, CoreError> {
        let expected = required_rgba_len(width, height)?;
        if rgba.len() != expected {
            return Err(CoreError::InvalidBufferShape {
                expected,
                actual: rgba.len(),
            });
        }

        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Creates a buffer with every pixel set to `color`.
    ///
    /// # Errors
    /// Returns [`CoreError::DimensionOverflow`] when the byte length overflows.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, CoreError> {
        let len = required_rgba_len(width, height)?;
        let rgba = if color == TRANSPARENT {
            vec![0_u8; len]
        } else {
            color.iter().copied().cycle().take(len).collect()
        };

        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Bytes in one pixel row.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Returns the bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride();
        Some(&self.rgba[start..start + self.stride()])
    }

    /// Returns a mutable view of row `y`, or `None` past the last row.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        Some(&mut self.rgba[start..start + stride])
    }

    /// Reads the pixel at `(x, y)`; `None` when outside the buffer.
    pub fn pixel_at(&self, x: i64, y: i64) -> Option<Color> {
        let offset = self.offset_of(x, y)?;
        let mut color = TRANSPARENT;
        color.copy_from_slice(&self.rgba[offset..offset + BYTES_PER_PIXEL]);
        Some(color)
    }

    /// Writes `color` at `(x, y)`.
    ///
    /// Coordinates outside the buffer are ignored; the return value reports
    /// whether the write landed.
    pub fn set_pixel_at(&mut self, x: i64, y: i64, color: Color) -> bool {
        match self.offset_of(x, y) {
            Some(offset) => {
                self.rgba[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color);
                true
            }
            None => false,
        }
    }

    fn offset_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }
}

/// Allocates a blank canvas sized from physical dimensions.
///
/// The byte-size cap is checked before any memory is committed.
///
/// # Errors
/// Returns [`CoreError::InvalidCanvasDimensions`] when either pixel dimension
/// is not positive, and [`CoreError::SizeLimitExceeded`] when the canvas would
/// need more than [`MAX_CANVAS_BYTES`].
pub fn allocate_canvas(
    width_mm: i64,
    height_mm: i64,
    pixels_per_mm: i64,
) -> Result<PixelBuffer, CoreError> {
    let width_px = width_mm.checked_mul(pixels_per_mm);
    let height_px = height_mm.checked_mul(pixels_per_mm);

    let (width_px, height_px) = match (width_px, height_px) {
        (Some(width), Some(height)) if width > 0 && height > 0 => (width as u64, height as u64),
        (Some(width), Some(height)) => {
            return Err(CoreError::InvalidCanvasDimensions { width, height });
        }
        _ => {
            return Err(CoreError::SizeLimitExceeded {
                requested: None,
                limit: MAX_CANVAS_BYTES,
            });
        }
    };

    let requested = width_px
        .checked_mul(height_px)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL as u64));
    match requested {
        Some(bytes) if bytes <= MAX_CANVAS_BYTES => {}
        _ => {
            return Err(CoreError::SizeLimitExceeded {
                requested,
                limit: MAX_CANVAS_BYTES,
            });
        }
    }

    // Both sides fit in u32: their product times four is at most 1 GiB.
    PixelBuffer::filled(width_px as u32, height_px as u32, TRANSPARENT)
}

/// Error type for core domain validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Paper index is outside the A0..A8 catalog.
    #[error("paper size out of range: A{0} (expected A0-A8)")]
    PaperOutOfRange(i64),
    /// Canvas would exceed the memory cap.
    #[error("canvas size exceeds 1GB ({limit} bytes); reduce dimensions or pixels per mm")]
    SizeLimitExceeded {
        /// Requested byte count, `None` when the computation overflowed.
        requested: Option<u64>,
        /// Configured byte cap.
        limit: u64,
    },
    /// Canvas pixel dimensions are zero or negative.
    #[error("canvas dimensions must be positive, got {width}x{height} px")]
    InvalidCanvasDimensions {
        /// Computed pixel width.
        width: i64,
        /// Computed pixel height.
        height: i64,
    },
    /// Pixel buffer length does not match its declared geometry.
    #[error("invalid buffer shape: expected {expected} bytes, got {actual}")]
    InvalidBufferShape {
        /// Expected RGBA byte count.
        expected: usize,
        /// Actual RGBA byte count.
        actual: usize,
    },
    /// Integer overflow while computing a dimension.
    #[error("dimension overflow")]
    DimensionOverflow,
}

fn required_rgba_len(width: u32, height: u32) -> Result<usize, CoreError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .ok_or(CoreError::DimensionOverflow)
}
