//! RGBA raster buffer shared by every stage of challenge generation.

use image::{Rgba, RgbaImage};

/// Alpha at or below this value counts as transparent for shape logic.
pub const TRANSLUCENCY_THRESHOLD: u8 = 125;

/// Opaque white, used for piece outlines.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A mutable RGBA image tagged with the catalog index it was loaded from.
///
/// Pixel accessors panic on out-of-range coordinates; bounds are the
/// caller's responsibility.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: RgbaImage,
    source_index: Option<usize>,
}

impl RasterImage {
    /// Wrap a decoded image that was drawn from catalog slot `source_index`.
    #[must_use]
    pub fn new(pixels: RgbaImage, source_index: usize) -> Self {
        Self {
            pixels,
            source_index: Some(source_index),
        }
    }

    /// Wrap an image that did not come from a catalog.
    #[must_use]
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            source_index: None,
        }
    }

    /// Catalog slot this image was loaded from, if any.
    #[must_use]
    pub fn source_index(&self) -> Option<usize> {
        self.source_index
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether the pixel at `(x, y)` is mostly transparent (alpha <= 125).
    #[must_use]
    pub fn is_transparent(&self, x: u32, y: u32) -> bool {
        self.pixels.get_pixel(x, y)[3] <= TRANSLUCENCY_THRESHOLD
    }

    /// Color of the pixel at `(x, y)`.
    #[must_use]
    pub fn color_at(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        self.pixels.put_pixel(x, y, color);
    }

    /// Borrow the underlying buffer.
    #[must_use]
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Mutably borrow the underlying buffer (used for text drawing).
    pub fn as_rgba_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Consume the wrapper and return the pixel buffer.
    #[must_use]
    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}
