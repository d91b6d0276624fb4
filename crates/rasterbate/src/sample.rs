//! Block sampling: reduce a square of source pixels to one colour.

use crate::options::SamplingWindow;
use crate::surface::PixelSource;

/// Maximum channel sum of a pixel (`255 * 3`).
const FULL_INK: f64 = 765.0;

/// Aggregate colour of one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// `(r + g + b) / 765`, always within `0.0..=1.0`.
    pub ink_fraction: f64,
}

impl BlockSample {
    fn from_channels([r, g, b]: [u8; 3]) -> Self {
        let sum = f64::from(r) + f64::from(g) + f64::from(b);
        Self {
            r,
            g,
            b,
            ink_fraction: sum / FULL_INK,
        }
    }
}

/// Sample the block whose window starts at `(x, y)`.
///
/// Channel sums are divided by `step^2` with integer division and clamped
/// to 255. With `SamplingWindow::Legacy` the window is one pixel wider in
/// each axis than the divisor assumes, so bright blocks can overflow before
/// the clamp; reads past the image edge repeat the edge pixel.
pub fn sample_block<P: PixelSource + ?Sized>(
    source: &P,
    x: u32,
    y: u32,
    step: u32,
    window: SamplingWindow,
) -> BlockSample {
    let span = match window {
        SamplingWindow::Exact => step,
        SamplingWindow::Legacy => step + 1,
    };
    let (width, height) = source.dimensions();

    let mut sums = [0u64; 3];
    for j in y..y + span {
        let sy = j.min(height - 1);
        for i in x..x + span {
            let pixel = source.rgb(i.min(width - 1), sy);
            for (sum, channel) in sums.iter_mut().zip(pixel) {
                *sum += u64::from(channel);
            }
        }
    }

    let area = u64::from(step) * u64::from(step);
    BlockSample::from_channels(sums.map(|sum| (sum / area).min(255) as u8))
}
