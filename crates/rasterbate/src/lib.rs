//! Poster rasterization: block sampling, dot rendering and page tiling.
//!
//! Divides a source image into square blocks, draws one dot per block at a
//! magnified scale, and slices the finished poster into printable pages.

#[cfg(test)]
mod fake;
pub mod options;
pub mod paginate;
pub mod render;
pub mod sample;
pub mod session;
pub mod surface;

// Re-exports for convenience
pub use options::{OutputFormat, PageGeometry, RasterOptions, SamplingWindow};
pub use paginate::{PageGrid, PageTile, page_file_name, paginate};
pub use render::{DotSpec, dot_color, dot_spec, max_surface, rasterize};
pub use sample::{BlockSample, sample_block};
pub use session::Rasterbator;
pub use surface::{FileSink, PageSink, PixelSource, Rgba8, Surface, load_source};

use std::path::PathBuf;

/// Result type alias for rasterization operations.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Errors that can occur while rasterizing or paginating.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image {width}x{height} is smaller than one {step}px block")]
    ImageTooSmall { width: u32, height: u32, step: u32 },

    #[error("Poster for a {width}x{height} working area at step {step} is too large to draw")]
    CanvasTooLarge { width: u32, height: u32, step: u32 },

    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),
}
