//! In-memory stand-ins for the imaging backend.

use std::path::{Path, PathBuf};

use crate::options::OutputFormat;
use crate::surface::{PageSink, Rgba8, Surface};
use crate::{RasterError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Rect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgba8,
    },
    Oval {
        center: (i32, i32),
        x_radius: i32,
        y_radius: i32,
        color: Rgba8,
    },
}

/// Records draw calls instead of touching pixels.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    /// Position of this surface inside the surface it was cropped from.
    pub origin: (u32, u32),
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn ovals(&self) -> impl Iterator<Item = (&(i32, i32), &i32, &i32, &Rgba8)> {
        self.ops.iter().filter_map(|op| match op {
            Op::Oval {
                center,
                x_radius,
                y_radius,
                color,
            } => Some((center, x_radius, y_radius, color)),
            Op::Rect { .. } => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba8) {
        self.ops.push(Op::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_oval(&mut self, center: (i32, i32), x_radius: i32, y_radius: i32, color: Rgba8) {
        self.ops.push(Op::Oval {
            center,
            x_radius,
            y_radius,
            color,
        });
    }

    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        assert!(
            x + width <= self.width && y + height <= self.height,
            "crop {x},{y} {width}x{height} outside {}x{}",
            self.width,
            self.height
        );
        Self {
            width,
            height,
            origin: (self.origin.0 + x, self.origin.1 + y),
            ops: Vec::new(),
        }
    }
}

/// Keeps every saved surface in memory; optionally fails after `fail_after` saves.
#[derive(Debug)]
pub struct MemorySink<S> {
    pub saved: Vec<(PathBuf, S)>,
    pub fail_after: Option<usize>,
}

impl<S> Default for MemorySink<S> {
    fn default() -> Self {
        Self {
            saved: Vec::new(),
            fail_after: None,
        }
    }
}

impl<S: Surface + Clone> PageSink<S> for MemorySink<S> {
    fn save(&mut self, path: &Path, surface: &S, _format: OutputFormat) -> Result<()> {
        if self.fail_after.is_some_and(|limit| self.saved.len() >= limit) {
            return Err(RasterError::Save {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(std::io::Error::other("disk full")),
            });
        }
        self.saved.push((path.to_path_buf(), surface.clone()));
        Ok(())
    }
}
