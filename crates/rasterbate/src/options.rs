//! Rasterization and page geometry options.
//!
//! `RasterOptions` controls block size, dot colour and output encoding.
//! `PageGeometry` describes the physical page the poster is tiled onto.

use std::path::{Path, PathBuf};

use crate::{RasterError, Result};

/// Default block edge length in source pixels.
pub const DEFAULT_STEP: u32 = 5;

/// Default output alpha (fully opaque).
pub const DEFAULT_ALPHA: u8 = 255;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "out.png";

/// Output encoding for the poster and its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
}

impl OutputFormat {
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Pixel window a block is reduced over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingWindow {
    /// Exactly `step x step` pixels starting at the block origin.
    #[default]
    Exact,
    /// `(step + 1)^2` pixels starting at the block centre, still divided by
    /// `step^2`. Reproduces posters made by earlier versions of the tool.
    Legacy,
}

/// Configuration for a single rasterize run.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Block edge length in source pixels; also the magnification factor.
    pub step: u32,

    /// Alpha applied to sampled dot colours.
    pub alpha: u8,

    /// Draw every dot white.
    pub monochrome: bool,

    /// Invert the ink-to-surface mapping, fill the page white and draw black dots.
    pub mono_invert: bool,

    pub format: OutputFormat,

    pub sampling: SamplingWindow,

    /// Where the finished poster is written; page names derive from it.
    pub output: PathBuf,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            alpha: DEFAULT_ALPHA,
            monochrome: false,
            mono_invert: false,
            format: OutputFormat::Png,
            sampling: SamplingWindow::Exact,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl RasterOptions {
    /// Create options with the stock defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set block size.
    ///
    /// # Panics
    /// Panics if `step` is zero.
    pub fn with_step(mut self, step: u32) -> Self {
        assert!(step >= 1, "Step must be at least 1, got {step}");
        self.step = step;
        self
    }

    /// Builder: set the alpha applied to sampled dot colours.
    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    /// Builder: set monochrome (white dots) mode.
    pub fn with_monochrome(mut self, val: bool) -> Self {
        self.monochrome = val;
        self
    }

    /// Builder: set inverted monochrome (black dots on white) mode.
    pub fn with_mono_invert(mut self, val: bool) -> Self {
        self.mono_invert = val;
        self
    }

    /// Builder: set the block sampling window.
    pub fn with_sampling(mut self, sampling: SamplingWindow) -> Self {
        self.sampling = sampling;
        self
    }

    /// Builder: set the poster output path.
    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = output.as_ref().to_path_buf();
        self
    }

    /// Largest multiples of `step` not exceeding the source dimensions.
    pub fn working_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width - width % self.step, height - height % self.step)
    }
}

/// Validate a raw `--step` value. Returns the block size or an error message.
pub fn parse_step(value: &str) -> std::result::Result<u32, String> {
    let v: i64 = value.trim().parse().map_err(|_| "must be an integer")?;
    if v <= 0 {
        return Err("must be greater than 0".into());
    }
    u32::try_from(v).map_err(|_| format!("must be at most {}", u32::MAX))
}

/// Validate a raw `--alpha` value. Returns the alpha or an error message.
pub fn parse_alpha(value: &str) -> std::result::Result<u8, String> {
    let v: i64 = value.trim().parse().map_err(|_| "must be an integer")?;
    if !(0..=255).contains(&v) {
        return Err("must be between 0 and 255".into());
    }
    Ok(v as u8)
}

/// Physical page size and print resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    /// Pixels per physical unit.
    pub resolution: f64,
}

impl PageGeometry {
    pub fn new(page_width: f64, page_height: f64, resolution: f64) -> Result<Self> {
        for (name, value) in [
            ("page width", page_width),
            ("page height", page_height),
            ("resolution", resolution),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RasterError::InvalidGeometry(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        let geometry = Self {
            page_width,
            page_height,
            resolution,
        };
        let (w, h) = geometry.effective_size();
        if w < 1.0 || h < 1.0 {
            return Err(RasterError::InvalidGeometry(format!(
                "page covers less than one pixel ({w:.3}x{h:.3})"
            )));
        }
        Ok(geometry)
    }

    /// Page size in canvas pixels. Not rounded: pages of 595.44px alternate
    /// between 595 and 596 pixel crops.
    pub fn effective_size(&self) -> (f64, f64) {
        (
            self.page_width * self.resolution,
            self.page_height * self.resolution,
        )
    }
}
