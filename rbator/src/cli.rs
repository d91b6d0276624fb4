//! Command-line surface.
//!
//! Out-of-range `--step` and `--alpha` values are ignored and the default
//! kept, so they are taken as raw strings and validated here.

use std::path::PathBuf;

use clap::Parser;
use rasterbate::options::{DEFAULT_OUTPUT, parse_alpha, parse_step};
use rasterbate::{PageGeometry, RasterOptions, SamplingWindow};
use tracing::debug;

/// Turn an image into a poster of dots, optionally sliced into printable pages.
#[derive(Debug, Parser)]
#[command(name = "rbator", version, about)]
pub struct Cli {
    /// Source image
    pub input: PathBuf,

    /// Draw every dot white, suitable for displays
    #[arg(short, long)]
    pub monochrome: bool,

    /// Black dots on white with inverted tones, suitable for printing
    #[arg(short = 'i', long)]
    pub mono_invert: bool,

    /// Block size in pixels; the poster scales this many times in each dimension
    #[arg(short, long, value_name = "X", allow_hyphen_values = true)]
    pub step: Option<String>,

    /// Alpha channel of the dots (0..255)
    #[arg(short, long, value_name = "X", allow_hyphen_values = true)]
    pub alpha: Option<String>,

    /// Poster file; pages are written next to it as page_<col>_<row><name>
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output_file: PathBuf,

    /// Sample one extra pixel row and column per block, as older versions did
    #[arg(long)]
    pub legacy_sampling: bool,

    /// Page width in physical units
    #[arg(long, value_name = "UNITS", requires_all = ["page_height", "resolution"])]
    pub page_width: Option<f64>,

    /// Page height in physical units
    #[arg(long, value_name = "UNITS", requires_all = ["page_width", "resolution"])]
    pub page_height: Option<f64>,

    /// Print resolution in pixels per unit
    #[arg(long, value_name = "PPU", requires_all = ["page_width", "page_height"])]
    pub resolution: Option<f64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn raster_options(&self) -> RasterOptions {
        let mut options = RasterOptions::new()
            .with_monochrome(self.monochrome)
            .with_mono_invert(self.mono_invert)
            .with_output(&self.output_file);

        if self.legacy_sampling {
            options = options.with_sampling(SamplingWindow::Legacy);
        }
        if let Some(raw) = &self.step {
            match parse_step(raw) {
                Ok(step) => options = options.with_step(step),
                Err(reason) => debug!(value = %raw, %reason, "Ignoring --step"),
            }
        }
        if let Some(raw) = &self.alpha {
            match parse_alpha(raw) {
                Ok(alpha) => options = options.with_alpha(alpha),
                Err(reason) => debug!(value = %raw, %reason, "Ignoring --alpha"),
            }
        }
        options
    }

    /// Page layout, if pagination was requested.
    pub fn page_geometry(&self) -> rasterbate::Result<Option<PageGeometry>> {
        match (self.page_width, self.page_height, self.resolution) {
            (Some(w), Some(h), Some(r)) => PageGeometry::new(w, h, r).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rbator").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["photo.jpg"]).unwrap();
        let options = cli.raster_options();

        assert_eq!(cli.input, PathBuf::from("photo.jpg"));
        assert_eq!(options.step, 5);
        assert_eq!(options.alpha, 255);
        assert!(!options.monochrome);
        assert!(!options.mono_invert);
        assert_eq!(options.sampling, SamplingWindow::Exact);
        assert_eq!(options.output, PathBuf::from("out.png"));
        assert!(cli.page_geometry().unwrap().is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-m", "-i", "-s", "8", "-a", "100", "-o", "big.png", "in.png"]).unwrap();
        let options = cli.raster_options();

        assert!(options.monochrome);
        assert!(options.mono_invert);
        assert_eq!(options.step, 8);
        assert_eq!(options.alpha, 100);
        assert_eq!(options.output, PathBuf::from("big.png"));
    }

    #[test]
    fn test_long_flags() {
        let cli = parse(&[
            "--monochrome",
            "--mono-invert",
            "--step",
            "3",
            "--alpha",
            "0",
            "--output-file",
            "p.png",
            "--legacy-sampling",
            "in.png",
        ])
        .unwrap();
        let options = cli.raster_options();

        assert_eq!(options.step, 3);
        assert_eq!(options.alpha, 0);
        assert_eq!(options.sampling, SamplingWindow::Legacy);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        for (step, alpha) in [("0", "256"), ("-4", "-1"), ("big", "opaque")] {
            let cli = parse(&["--step", step, "--alpha", alpha, "in.png"]).unwrap();
            let options = cli.raster_options();
            assert_eq!(options.step, 5, "step {step}");
            assert_eq!(options.alpha, 255, "alpha {alpha}");
        }
    }

    #[test]
    fn test_positional_count_is_enforced() {
        assert_eq!(
            parse(&[]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert!(parse(&["a.png", "b.png"]).is_err());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert_eq!(
            parse(&["--sepia", "in.png"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
    }

    #[test]
    fn test_page_options_come_together() {
        assert!(parse(&["--page-width", "8.5", "in.png"]).is_err());

        let cli = parse(&[
            "--page-width",
            "1",
            "--page-height",
            "2",
            "--resolution",
            "60",
            "in.png",
        ])
        .unwrap();
        let geometry = cli.page_geometry().unwrap().unwrap();
        assert_eq!(geometry.effective_size(), (60.0, 120.0));
    }

    #[test]
    fn test_degenerate_page_is_an_error() {
        let cli = parse(&[
            "--page-width",
            "0",
            "--page-height",
            "2",
            "--resolution",
            "60",
            "in.png",
        ])
        .unwrap();
        assert!(cli.page_geometry().is_err());
    }
}
