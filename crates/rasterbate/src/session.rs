//! A rasterize-then-paginate run over one source image.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, info};

use crate::Result;
use crate::options::{PageGeometry, RasterOptions};
use crate::paginate::paginate;
use crate::render::rasterize;
use crate::surface::{PageSink, PixelSource, Surface, load_source};

/// Holds the source image, its options and, once rendered, the poster.
pub struct Rasterbator<P, S = RgbaImage> {
    source: P,
    options: RasterOptions,
    output: Option<S>,
}

impl Rasterbator<RgbaImage, RgbaImage> {
    /// Load `path` from disk and prepare a run over it.
    pub fn open(path: &Path, options: RasterOptions) -> Result<Self> {
        Ok(Self::new(load_source(path)?, options))
    }
}

impl<P: PixelSource, S: Surface> Rasterbator<P, S> {
    pub fn new(source: P, options: RasterOptions) -> Self {
        Self {
            source,
            options,
            output: None,
        }
    }

    /// The poster from the last successful [`Rasterbator::rasterbate`] call.
    pub fn output(&self) -> Option<&S> {
        self.output.as_ref()
    }

    /// Render the poster, save it under the configured output path and keep it
    /// for pagination.
    pub fn rasterbate<K: PageSink<S>>(&mut self, sink: &mut K) -> Result<&S> {
        let canvas: S = rasterize(&self.source, &self.options)?;
        sink.save(&self.options.output, &canvas, self.options.format)?;
        info!(path = %self.options.output.display(), "Saved poster");
        Ok(&*self.output.insert(canvas))
    }

    /// Slice the rendered poster into pages. Does nothing before the poster
    /// has been rendered.
    pub fn paginate<K: PageSink<S>>(
        &self,
        geometry: &PageGeometry,
        sink: &mut K,
    ) -> Result<Vec<PathBuf>> {
        let Some(canvas) = &self.output else {
            debug!("No poster rendered yet, skipping pagination");
            return Ok(Vec::new());
        };
        paginate(
            canvas,
            geometry,
            &self.options.output,
            self.options.format,
            sink,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{MemorySink, RecordingSurface};
    use image::Rgba;

    fn session(options: RasterOptions) -> Rasterbator<RgbaImage, RecordingSurface> {
        let img = RgbaImage::from_pixel(24, 12, Rgba([30, 60, 90, 255]));
        Rasterbator::new(img, options)
    }

    #[test]
    fn test_paginate_before_rasterbate_is_noop() {
        let run = session(RasterOptions::new());
        let mut sink = MemorySink::default();

        let pages = run
            .paginate(&PageGeometry::new(1.0, 1.0, 10.0).unwrap(), &mut sink)
            .unwrap();

        assert!(pages.is_empty());
        assert!(sink.saved.is_empty());
        assert!(run.output().is_none());
    }

    #[test]
    fn test_rasterbate_saves_poster_under_output_name() {
        let mut run = session(RasterOptions::new().with_step(4).with_output("big.png"));
        let mut sink = MemorySink::default();

        let size = run.rasterbate(&mut sink).unwrap().dimensions();

        assert_eq!(size, (96, 48));
        assert_eq!(sink.saved.len(), 1);
        assert_eq!(sink.saved[0].0, PathBuf::from("big.png"));
        assert!(run.output().is_some());
    }

    #[test]
    fn test_rasterbate_then_paginate() {
        let mut run = session(RasterOptions::new().with_step(4).with_output("big.png"));
        let mut sink = MemorySink::default();
        run.rasterbate(&mut sink).unwrap();

        let pages = run
            .paginate(&PageGeometry::new(0.5, 1.0, 80.0).unwrap(), &mut sink)
            .unwrap();

        // 96x48 canvas on 40x80 pages
        assert_eq!(
            pages,
            vec![
                PathBuf::from("page_1_1big.png"),
                PathBuf::from("page_2_1big.png"),
                PathBuf::from("page_3_1big.png"),
            ]
        );
        assert_eq!(sink.saved.len(), 4);
        assert_eq!(sink.saved[3].1.width, 16);
        assert_eq!(sink.saved[3].1.height, 48);
    }

    #[test]
    fn test_too_small_source_keeps_no_output() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        let mut run: Rasterbator<RgbaImage, RecordingSurface> =
            Rasterbator::new(img, RasterOptions::new());
        let mut sink = MemorySink::default();

        assert!(run.rasterbate(&mut sink).is_err());
        assert!(run.output().is_none());
        assert!(sink.saved.is_empty());
    }
}
