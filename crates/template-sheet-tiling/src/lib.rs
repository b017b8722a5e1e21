#![warn(missing_docs)]
//! # template-sheet-tiling
//!
//! ## Purpose
//! Replicates one template image across a canvas in a uniform grid.
//!
//! ## Responsibilities
//! - Compute the row-major grid of cell origins that fit inside the margins.
//! - Copy template pixels verbatim into every cell.
//! - Report how many cells and pixels were written.
//!
//! ## Data flow
//! Decoded template + blank canvas -> [`replicate`] -> canvas filled in place
//! plus a [`Replication`] summary for diagnostics.
//!
//! ## Ownership and lifetimes
//! The template is borrowed immutably and the canvas mutably for the duration
//! of one call; nothing is retained afterwards.
//!
//! ## Error model
//! Tiling never fails. A template that does not fit places zero cells, which
//! is reported through [`Replication::is_empty`].

use template_sheet_core::{BYTES_PER_PIXEL, PixelBuffer};
use tracing::debug;

/// Top-left pixel coordinate of one grid cell on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Column of the cell's left edge.
    pub x: i64,
    /// Row of the cell's top edge.
    pub y: i64,
}

/// Grid geometry for one template/canvas/margin combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    canvas_width: i64,
    canvas_height: i64,
    tile_width: i64,
    tile_height: i64,
    margin_px: i64,
    /// Cells per row.
    pub columns: u64,
    /// Rows of cells.
    pub rows: u64,
}

impl GridLayout {
    /// Computes the grid for a `tile_*` template on a `canvas_*` canvas.
    ///
    /// # Semantics
    /// Cells start at `margin_px` on both axes and step by the template size.
    /// A row or column that would cross `canvas - margin_px` is dropped
    /// entirely. Zero or negative margins are used as-is.
    pub fn new(
        canvas_width: u32,
        canvas_height: u32,
        tile_width: u32,
        tile_height: u32,
        margin_px: i64,
    ) -> Self {
        Self {
            canvas_width: i64::from(canvas_width),
            canvas_height: i64::from(canvas_height),
            tile_width: i64::from(tile_width),
            tile_height: i64::from(tile_height),
            margin_px,
            columns: cells_along(canvas_width, tile_width, margin_px),
            rows: cells_along(canvas_height, tile_height, margin_px),
        }
    }

    /// Number of cells the grid places.
    pub fn cell_count(&self) -> u64 {
        self.columns.saturating_mul(self.rows)
    }

    /// Iterates cell origins top-to-bottom, left-to-right.
    pub fn origins(&self) -> GridOrigins {
        GridOrigins {
            layout: *self,
            x: i128::from(self.margin_px),
            y: i128::from(self.margin_px),
        }
    }
}

fn cells_along(canvas: u32, tile: u32, margin_px: i64) -> u64 {
    if tile == 0 {
        return 0;
    }
    let span = i128::from(canvas) - 2 * i128::from(margin_px);
    if span < i128::from(tile) {
        return 0;
    }
    u64::try_from(span / i128::from(tile)).unwrap_or(u64::MAX)
}

/// Row-major iterator over [`GridLayout`] cell origins.
///
/// Walks the same loop the placement uses: `y` from the margin while
/// `y + tile_height <= canvas_height - margin`, and inside it `x` likewise.
#[derive(Debug, Clone)]
pub struct GridOrigins {
    layout: GridLayout,
    x: i128,
    y: i128,
}

impl Iterator for GridOrigins {
    type Item = Cursor;

    fn next(&mut self) -> Option<Cursor> {
        let layout = &self.layout;
        if layout.columns == 0 || layout.rows == 0 {
            return None;
        }

        let margin = i128::from(layout.margin_px);
        let tile_width = i128::from(layout.tile_width);
        let tile_height = i128::from(layout.tile_height);
        let x_limit = i128::from(layout.canvas_width) - margin;
        let y_limit = i128::from(layout.canvas_height) - margin;

        while self.y + tile_height <= y_limit {
            if self.x + tile_width <= x_limit {
                let cursor = Cursor {
                    x: i64::try_from(self.x).ok()?,
                    y: i64::try_from(self.y).ok()?,
                };
                self.x += tile_width;
                return Some(cursor);
            }
            self.x = margin;
            self.y += tile_height;
        }

        None
    }
}

/// Outcome of one [`replicate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replication {
    /// Cells per row.
    pub columns: u64,
    /// Rows of cells.
    pub rows: u64,
    /// Cells placed (`columns * rows`).
    pub cells: u64,
    /// Template pixels copied, `template_width * template_height * cells`.
    pub pixels_written: u64,
}

impl Replication {
    /// Returns `true` when the template did not fit even once.
    pub fn is_empty(&self) -> bool {
        self.cells == 0
    }
}

/// Tiles `template` across `canvas` inside a `margin_px` border.
///
/// Every placed cell receives an exact copy of the template's RGBA values; no
/// blending or resampling happens and pixels outside placed cells are left
/// untouched. With a negative margin, cell pixels that fall off the canvas are
/// dropped but still counted in [`Replication::pixels_written`].
pub fn replicate(template: &PixelBuffer, canvas: &mut PixelBuffer, margin_px: i64) -> Replication {
    let layout = GridLayout::new(
        canvas.width(),
        canvas.height(),
        template.width(),
        template.height(),
        margin_px,
    );
    let cell_pixels = u64::from(template.width()) * u64::from(template.height());

    let mut cells = 0_u64;
    let mut pixels_written = 0_u64;
    for origin in layout.origins() {
        copy_cell(template, canvas, origin);
        cells += 1;
        pixels_written += cell_pixels;
    }

    debug!(
        columns = layout.columns,
        rows = layout.rows,
        cells,
        pixels_written,
        margin_px,
        "template replicated"
    );

    Replication {
        columns: layout.columns,
        rows: layout.rows,
        cells,
        pixels_written,
    }
}

fn copy_cell(template: &PixelBuffer, canvas: &mut PixelBuffer, origin: Cursor) {
    let canvas_width = i64::from(canvas.width());
    let canvas_height = i64::from(canvas.height());
    let tile_width = i64::from(template.width());

    // Invariant:
    // - Only the part of the cell that overlaps the canvas is written; with a
    //   non-negative margin that is always the whole cell.
    let dst_x_start = origin.x.max(0);
    let dst_x_end = origin.x.saturating_add(tile_width).min(canvas_width);
    if dst_x_start >= dst_x_end {
        return;
    }
    let src_x_start = (dst_x_start - origin.x) as usize;
    let run_len = (dst_x_end - dst_x_start) as usize * BYTES_PER_PIXEL;
    let src_offset = src_x_start * BYTES_PER_PIXEL;
    let dst_offset = dst_x_start as usize * BYTES_PER_PIXEL;

    for src_y in 0..template.height() {
        let dst_y = origin.y.saturating_add(i64::from(src_y));
        if dst_y < 0 || dst_y >= canvas_height {
            continue;
        }

        let (Some(src_row), Some(dst_row)) = (template.row(src_y), canvas.row_mut(dst_y as u32))
        else {
            continue;
        };
        dst_row[dst_offset..dst_offset + run_len]
            .copy_from_slice(&src_row[src_offset..src_offset + run_len]);
    }
}
