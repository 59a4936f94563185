use tiny_skia::{FillRule, Mask, PathBuilder, Transform};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per pixel, 0 for empty and 255 for filled pixels
    Gray8,
}

/// Drawing surface used to rasterize polygons.
///
/// Coordinates are expressed in pixels, (0, 0) is the top left corner of the top left pixel.
/// A pixel is filled when its center lies inside the polygon, no antialiasing is applied.
pub struct Canvas {
    width: usize,
    height: usize,
    format: PixelFormat,
    mask: Option<Mask>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}

impl Canvas {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Ok(Canvas {
                width,
                height,
                format,
                mask: None,
            });
        }

        let mask = u32::try_from(width)
            .ok()
            .zip(u32::try_from(height).ok())
            .and_then(|(w, h)| Mask::new(w, h))
            .ok_or_else(|| Error::InvalidArgument(format!("Invalid canvas size: {width}x{height}")))?;

        Ok(Canvas {
            width,
            height,
            format,
            mask: Some(mask),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Fills a polygon given as its rings, the first ring is the exterior.
    /// Overlapping rings are filled with the even-odd rule so interior rings become holes.
    pub fn draw_polygon(&mut self, rings: &[Vec<(f64, f64)>]) {
        let Some(mask) = self.mask.as_mut() else {
            return;
        };

        let mut builder = PathBuilder::new();
        for ring in rings.iter().filter(|ring| ring.len() >= 3) {
            let (x, y) = ring[0];
            builder.move_to(x as f32, y as f32);
            for &(x, y) in &ring[1..] {
                builder.line_to(x as f32, y as f32);
            }
            builder.close();
        }

        // No path for degenerate polygons, nothing to fill
        if let Some(path) = builder.finish() {
            mask.fill_path(&path, FillRule::EvenOdd, false, Transform::identity());
        }
    }

    /// Passes the pixels in row major order, the row stride equals the width
    pub fn with_bytes<R>(&self, consumer: impl FnOnce(&[u8]) -> R) -> R {
        match &self.mask {
            Some(mask) => consumer(mask.data()),
            None => consumer(&[]),
        }
    }
}
