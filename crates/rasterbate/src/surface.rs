//! Imaging capabilities the rasterizer depends on.
//!
//! The core only reads pixels, draws filled rectangles and ovals, crops,
//! and saves. `RgbaImage` provides all of these through `image` and
//! `imageproc`; tests substitute in-memory fakes.

use std::path::Path;

use image::{ImageReader, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use tracing::{debug, info};

use crate::options::OutputFormat;
use crate::{RasterError, Result};

/// Straight (non-premultiplied) RGBA colour.
pub type Rgba8 = [u8; 4];

pub const WHITE: Rgba8 = [255, 255, 255, 255];
pub const BLACK: Rgba8 = [0, 0, 0, 255];

/// Read access to a decoded source image.
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    /// RGB channels of the pixel at `(x, y)`. Alpha is ignored.
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

/// A drawable output canvas.
pub trait Surface: Sized {
    /// Fully transparent canvas of the given size.
    fn blank(width: u32, height: u32) -> Self;

    fn dimensions(&self) -> (u32, u32);

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba8);

    /// Filled ellipse around `center` with the given horizontal and vertical radii.
    fn fill_oval(&mut self, center: (i32, i32), x_radius: i32, y_radius: i32, color: Rgba8);

    /// Copy of the rectangle at `(x, y)`; the rectangle must lie inside the canvas.
    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self;
}

/// Destination for finished posters and pages.
pub trait PageSink<S: Surface> {
    fn save(&mut self, path: &Path, surface: &S, format: OutputFormat) -> Result<()>;
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        [r, g, b]
    }
}

impl Surface for RgbaImage {
    fn blank(width: u32, height: u32) -> Self {
        RgbaImage::new(width, height)
    }

    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba8) {
        if width == 0 || height == 0 {
            return;
        }
        let rect = Rect::at(x as i32, y as i32).of_size(width, height);
        draw_filled_rect_mut(self, rect, Rgba(color));
    }

    fn fill_oval(&mut self, center: (i32, i32), x_radius: i32, y_radius: i32, color: Rgba8) {
        if x_radius == 0 && y_radius == 0 {
            // A zero-radius dot covers its centre pixel
            if let (Ok(x), Ok(y)) = (u32::try_from(center.0), u32::try_from(center.1)) {
                if x < self.width() && y < self.height() {
                    self.put_pixel(x, y, Rgba(color));
                }
            }
            return;
        }
        draw_filled_ellipse_mut(self, center, x_radius, y_radius, Rgba(color));
    }

    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        image::imageops::crop_imm(self, x, y, width, height).to_image()
    }
}

/// Writes surfaces to the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSink;

impl PageSink<RgbaImage> for FileSink {
    fn save(&mut self, path: &Path, surface: &RgbaImage, format: OutputFormat) -> Result<()> {
        debug!(path = %path.display(), "Writing image");
        surface
            .save_with_format(path, format.image_format())
            .map_err(|source| RasterError::Save {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Decode the image at `path` into an RGBA buffer.
pub fn load_source(path: &Path) -> Result<RgbaImage> {
    let load_error = |source: image::ImageError| RasterError::Load {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| load_error(image::ImageError::IoError(e)))?;
    let format = reader.format();
    let img = reader.decode().map_err(load_error)?.to_rgba8();

    let (width, height) = RgbaImage::dimensions(&img);
    info!(
        path = %path.display(),
        format = ?format,
        width,
        height,
        "Loaded source image"
    );
    Ok(img)
}
