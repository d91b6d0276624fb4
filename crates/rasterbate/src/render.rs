//! Dot rendering: one filled circle per block, magnified `step` times.

use std::f64::consts::PI;

use tracing::{debug, info, warn};

use crate::options::{RasterOptions, SamplingWindow};
use crate::sample::{BlockSample, sample_block};
use crate::surface::{BLACK, PixelSource, Rgba8, Surface, WHITE};
use crate::{RasterError, Result};

/// Radius and colour of the dot drawn for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotSpec {
    /// Radius in source pixels; at most `step / 2`.
    pub radius: f64,
    pub color: Rgba8,
}

/// Area of the largest dot that fits inside one block.
pub fn max_surface(step: u32) -> f64 {
    PI * (f64::from(step) / 2.0).powi(2)
}

/// Map a block sample to its dot.
///
/// Surface grows with ink fraction, or shrinks with it under `mono_invert`.
pub fn dot_spec(sample: &BlockSample, options: &RasterOptions, max_surface: f64) -> DotSpec {
    let inked = sample.ink_fraction * max_surface;
    let surface = if options.mono_invert {
        max_surface - inked
    } else {
        inked
    };

    DotSpec {
        radius: (surface.max(0.0) / PI).sqrt(),
        color: dot_color(sample, options),
    }
}

/// `mono_invert` forces black, then `monochrome` forces white, otherwise the
/// sampled colour with the configured alpha.
pub fn dot_color(sample: &BlockSample, options: &RasterOptions) -> Rgba8 {
    if options.mono_invert {
        BLACK
    } else if options.monochrome {
        WHITE
    } else {
        [sample.r, sample.g, sample.b, options.alpha]
    }
}

/// Render the dot poster for `source`.
///
/// The canvas is `step` times the working area, which is the source cropped
/// down to whole blocks. Dots with no surface are skipped; a dot narrower
/// than one output pixel still covers its centre pixel.
pub fn rasterize<P, S>(source: &P, options: &RasterOptions) -> Result<S>
where
    P: PixelSource + ?Sized,
    S: Surface,
{
    let step = options.step;
    let (src_w, src_h) = source.dimensions();
    let (work_w, work_h) = options.working_size(src_w, src_h);
    if work_w == 0 || work_h == 0 {
        return Err(RasterError::ImageTooSmall {
            width: src_w,
            height: src_h,
            step,
        });
    }

    let (canvas_w, canvas_h) = canvas_size(work_w, work_h, step).ok_or(
        RasterError::CanvasTooLarge {
            width: work_w,
            height: work_h,
            step,
        },
    )?;
    debug!(
        work_w,
        work_h, canvas_w, canvas_h, step, "Preparing output canvas"
    );

    let mut canvas = S::blank(canvas_w, canvas_h);
    if options.mono_invert {
        if options.monochrome {
            warn!("monochrome has no effect together with mono_invert; drawing black dots");
        }
        canvas.fill_rect(0, 0, canvas_w, canvas_h, WHITE);
    }

    let max_surface = max_surface(step);
    let half = step / 2;
    let mut drawn = 0usize;

    for y in (half..work_h).step_by(step as usize) {
        for x in (half..work_w).step_by(step as usize) {
            // Legacy windows start at the block centre, exact ones at its origin
            let (sx, sy) = match options.sampling {
                SamplingWindow::Exact => (x - half, y - half),
                SamplingWindow::Legacy => (x, y),
            };
            let sample = sample_block(source, sx, sy, step, options.sampling);
            let dot = dot_spec(&sample, options, max_surface);

            if dot.radius == 0.0 {
                continue;
            }
            // Bounded by the canvas size, which fits in i32
            let radius = (dot.radius * f64::from(step)) as i32;
            let center = ((x * step + half) as i32, (y * step + half) as i32);
            canvas.fill_oval(center, radius, radius, dot.color);
            drawn += 1;
        }
    }

    info!(
        width = canvas_w,
        height = canvas_h,
        blocks = (work_w / step) * (work_h / step),
        drawn,
        "Rasterized poster"
    );
    Ok(canvas)
}

/// Output canvas for a working area, if it fits the drawing coordinate range.
fn canvas_size(work_w: u32, work_h: u32, step: u32) -> Option<(u32, u32)> {
    let limit = i32::MAX as u32;
    work_w
        .checked_mul(step)
        .zip(work_h.checked_mul(step))
        .filter(|&(w, h)| w <= limit && h <= limit)
}
