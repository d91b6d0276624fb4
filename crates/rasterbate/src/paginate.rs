//! Page tiling: slice a finished poster into printable pages.
//!
//! Tiles are laid out column by column, each `page * resolution` pixels
//! wide and high, except the last column and row which take whatever is
//! left of the canvas. Together the tiles cover the canvas exactly once.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::Result;
use crate::options::{OutputFormat, PageGeometry};
use crate::surface::{PageSink, Surface};

/// One printed page: a canvas rectangle and its 1-based grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTile {
    pub column: u32,
    pub row: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Page layout over a canvas of known size.
///
/// Tile sizes may be fractional. Page `n` (1-based) spans canvas pixels
/// `floor((n - 1) * tile)` up to `floor(n * tile)`, and the page count is
/// `ceil(canvas / tile)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGrid {
    canvas_width: u32,
    canvas_height: u32,
    tile_width: f64,
    tile_height: f64,
    pub x_pages: u32,
    pub y_pages: u32,
}

impl PageGrid {
    pub fn new(canvas_width: u32, canvas_height: u32, geometry: &PageGeometry) -> Self {
        let (tile_width, tile_height) = geometry.effective_size();
        Self::with_tile_size(canvas_width, canvas_height, tile_width, tile_height)
    }

    /// # Panics
    /// Panics if either tile dimension is below one pixel.
    pub fn with_tile_size(
        canvas_width: u32,
        canvas_height: u32,
        tile_width: f64,
        tile_height: f64,
    ) -> Self {
        assert!(
            tile_width >= 1.0 && tile_height >= 1.0,
            "Tile size must be at least one pixel, got {tile_width}x{tile_height}"
        );
        Self {
            canvas_width,
            canvas_height,
            tile_width,
            tile_height,
            x_pages: page_count(canvas_width, tile_width),
            y_pages: page_count(canvas_height, tile_height),
        }
    }

    pub fn len(&self) -> usize {
        self.x_pages as usize * self.y_pages as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tile at 1-based `(column, row)`.
    pub fn tile(&self, column: u32, row: u32) -> PageTile {
        let x = boundary(column - 1, self.tile_width, self.canvas_width);
        let y = boundary(row - 1, self.tile_height, self.canvas_height);
        PageTile {
            column,
            row,
            x,
            y,
            width: boundary(column, self.tile_width, self.canvas_width) - x,
            height: boundary(row, self.tile_height, self.canvas_height) - y,
        }
    }

    /// Iterate tiles column by column; each call starts from the first page.
    pub fn tiles(&self) -> Tiles {
        Tiles {
            grid: *self,
            next: 0,
        }
    }
}

impl IntoIterator for &PageGrid {
    type Item = PageTile;
    type IntoIter = Tiles;

    fn into_iter(self) -> Tiles {
        self.tiles()
    }
}

/// Iterator over the tiles of a [`PageGrid`].
#[derive(Debug, Clone)]
pub struct Tiles {
    grid: PageGrid,
    next: usize,
}

impl Iterator for Tiles {
    type Item = PageTile;

    fn next(&mut self) -> Option<PageTile> {
        if self.next >= self.grid.len() {
            return None;
        }
        let rows = self.grid.y_pages as usize;
        let column = (self.next / rows) as u32 + 1;
        let row = (self.next % rows) as u32 + 1;
        self.next += 1;
        Some(self.grid.tile(column, row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tiles {}

/// Canvas offset where page `index` ends (and page `index + 1` begins).
fn boundary(index: u32, tile: f64, extent: u32) -> u32 {
    let edge = (f64::from(index) * tile).floor();
    if edge >= f64::from(extent) {
        extent
    } else {
        edge as u32
    }
}

/// `ceil(extent / tile)`, nudged so the last page is never empty and always
/// reaches the canvas edge.
fn page_count(extent: u32, tile: f64) -> u32 {
    let mut count = (f64::from(extent) / tile).ceil() as u32;
    while count > 0 && boundary(count - 1, tile, extent) >= extent {
        count -= 1;
    }
    while (f64::from(count) * tile).floor() < f64::from(extent) {
        count += 1;
    }
    count
}

/// File name of a page: `page_{column}_{row}` prefixed to the poster's file
/// name, kept in the poster's directory.
pub fn page_file_name(column: u32, row: u32, base: &Path) -> PathBuf {
    let prefix = format!("page_{column}_{row}");
    match base.file_name() {
        Some(name) => base.with_file_name(format!("{prefix}{}", name.to_string_lossy())),
        None => PathBuf::from(format!("{prefix}{}", base.display())),
    }
}

/// Crop `canvas` into pages and hand each to `sink`.
///
/// Stops at the first failed save. Returns the paths written, in order.
pub fn paginate<S, K>(
    canvas: &S,
    geometry: &PageGeometry,
    base: &Path,
    format: OutputFormat,
    sink: &mut K,
) -> Result<Vec<PathBuf>>
where
    S: Surface,
    K: PageSink<S>,
{
    let (width, height) = canvas.dimensions();
    let grid = PageGrid::new(width, height, geometry);
    info!(
        "Outputting {} pages ({}x{})",
        grid.len(),
        grid.x_pages,
        grid.y_pages
    );

    let mut written = Vec::with_capacity(grid.len());
    for tile in &grid {
        debug!(
            x = tile.x,
            y = tile.y,
            width = tile.width,
            height = tile.height,
            "Paginating: page_{}_{}",
            tile.column,
            tile.row
        );
        let page = canvas.crop(tile.x, tile.y, tile.width, tile.height);
        let path = page_file_name(tile.column, tile.row, base);
        sink.save(&path, &page, format)?;
        written.push(path);
    }

    Ok(written)
}
