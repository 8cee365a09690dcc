//! Right-aligned text overlay on the challenge background.
//!
//! The text width is estimated as one `font_size`-wide cell per character,
//! CJK or not, plus a caller-supplied pixel adjustment. Real glyph advances
//! are not consulted.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::Rgba;
use imageproc::drawing::draw_text_mut;

use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Default watermark font size in pixels per em.
pub const DEFAULT_FONT_SIZE: u32 = 20;

/// Vertical placement: the baseline sits `25 / 2 - 7` pixels above the bottom.
const BASELINE_INSET: i64 = 25 / 2 - 7;

/// Watermark options. A `None` text disables the watermark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkConfig {
    /// Text to draw.
    pub text: Option<String>,
    /// Font size in pixels per em.
    pub font_size: u32,
    /// Pixel adjustment added to the estimated text width.
    pub offset: i32,
    /// Fill color.
    pub color: Rgba<u8>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: None,
            font_size: DEFAULT_FONT_SIZE,
            offset: 0,
            color: Rgba([255, 255, 255, 255]),
        }
    }
}

impl WatermarkConfig {
    /// Set the watermark text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the font size.
    #[must_use]
    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the width adjustment.
    #[must_use]
    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    /// Set the fill color.
    #[must_use]
    pub fn with_color(mut self, color: Rgba<u8>) -> Self {
        self.color = color;
        self
    }

    /// Whether a watermark will be drawn.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Character counts used by the width estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphCounts {
    /// Han (CJK ideograph) characters.
    pub han: u32,
    /// Everything else.
    pub other: u32,
}

impl GlyphCounts {
    /// Classify every character of `text`.
    #[must_use]
    pub fn of(text: &str) -> Self {
        text.chars().fold(Self::default(), |mut counts, c| {
            if is_han(c) {
                counts.han += 1;
            } else {
                counts.other += 1;
            }
            counts
        })
    }
}

/// Han ideograph blocks (unified, extensions, compatibility).
fn is_han(c: char) -> bool {
    matches!(
        u32::from(c),
        0x2E80..=0x2FDF
            | 0x3005
            | 0x3007
            | 0x3021..=0x3029
            | 0x3038..=0x303B
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x16FE2..=0x16FE3
            | 0x16FF0..=0x16FF1
            | 0x20000..=0x323AF
    )
}

/// Estimated rendered width: `font_size * (han + other) + offset`.
#[must_use]
pub fn text_width(text: &str, font_size: u32, offset: i32) -> i64 {
    let counts = GlyphCounts::of(text);
    i64::from(font_size) * i64::from(counts.han)
        + i64::from(font_size) * i64::from(counts.other)
        + i64::from(offset)
}

/// Left edge and baseline of right-aligned text on a `width` x `height` image.
#[must_use]
pub fn text_origin(width: u32, height: u32, text_width: i64) -> (i64, i64) {
    (
        i64::from(width) - text_width,
        i64::from(height) - BASELINE_INSET,
    )
}

/// Draw the configured watermark onto `background`. Does nothing when the
/// config has no text.
///
/// # Errors
///
/// Returns [`Error::RenderFailure`] if the font lacks a glyph for a visible
/// character or reports no usable metrics.
pub fn render(
    background: &mut RasterImage,
    font: &FontArc,
    config: &WatermarkConfig,
) -> Result<()> {
    let Some(text) = config.text.as_deref().filter(|t| !t.is_empty()) else {
        return Ok(());
    };

    if let Some(missing) = text
        .chars()
        .find(|c| !c.is_whitespace() && font.glyph_id(*c).0 == 0)
    {
        return Err(Error::RenderFailure(format!("font has no glyph for {missing:?}")));
    }

    let scale = em_scale(font, config.font_size)?;
    let width = text_width(text, config.font_size, config.offset);
    let (origin_x, baseline_y) = text_origin(background.width(), background.height(), width);

    // draw_text_mut positions the top of the line box, not the baseline.
    #[allow(clippy::cast_possible_truncation)]
    let ascent = font.as_scaled(scale).ascent().round() as i64;
    let x = to_i32(origin_x)?;
    let y = to_i32(baseline_y - ascent)?;

    log::debug!("drawing watermark {text:?} at ({x}, {baseline_y}), estimated width {width}");
    let canvas = background.as_rgba_mut();
    draw_text_mut(canvas, config.color, x, y, scale, font, text);
    Ok(())
}

/// Pixel scale for an em size of `font_size` pixels.
fn em_scale(font: &FontArc, font_size: u32) -> Result<PxScale> {
    let units_per_em = font
        .units_per_em()
        .filter(|u| *u > 0.0)
        .ok_or_else(|| Error::RenderFailure("font reports no units per em".to_string()))?;
    #[allow(clippy::cast_precision_loss)]
    let px_per_em = font_size as f32;
    let line_height = px_per_em * font.height_unscaled() / units_per_em;
    Ok(PxScale::from(line_height))
}

fn to_i32(value: i64) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| Error::RenderFailure(format!("text origin {value} out of range")))
}
