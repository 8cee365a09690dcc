//! Challenge assembly: resources, placement, two cutouts, encoding.

use rand::Rng;
use serde::Serialize;

use crate::codec;
use crate::cutout;
use crate::error::{Error, Result};
use crate::placement::{Placement, PlacementPlanner};
use crate::raster::RasterImage;
use crate::resources::ResourceProvider;
use crate::watermark::{self, WatermarkConfig};

/// Encoded challenge, ready to hand to a client.
#[derive(Debug, Clone, Serialize)]
pub struct SliderCaptchaData {
    /// Background with both holes cut, PNG as base64.
    pub background_image_base64: String,
    /// The real piece, PNG as base64.
    pub slider_image_base64: String,
    /// Horizontal position of the real piece in hundredths of the background
    /// width. This is the answer and is never serialized.
    #[serde(skip)]
    pub result_percent: u32,
}

/// A generated challenge before encoding.
#[derive(Debug, Clone)]
pub struct Challenge {
    /// Background with both holes cut.
    pub background: RasterImage,
    /// The real piece filled with background pixels.
    pub piece: RasterImage,
    /// Offsets of the real and decoy pieces.
    pub placement: Placement,
    /// Answer in hundredths of the background width.
    pub percent: u32,
}

impl Challenge {
    /// Encode both images.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if PNG encoding fails.
    pub fn encode(&self) -> Result<SliderCaptchaData> {
        Ok(SliderCaptchaData {
            background_image_base64: codec::encode_base64_png(&self.background)?,
            slider_image_base64: codec::encode_base64_png(&self.piece)?,
            result_percent: self.percent,
        })
    }
}

/// `round(100 * x / width)`, halves rounded up.
#[must_use]
pub fn answer_percent(x: u32, width: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    let (x, width) = (u64::from(x), u64::from(width));
    let percent = (200 * x + width) / (2 * width);
    u32::try_from(percent.min(100)).unwrap_or(100)
}

/// Slider captcha generator.
///
/// Holds the injected resource catalog and configuration; every call to
/// [`SliderCaptcha::generate`] builds an independent challenge.
#[derive(Debug, Clone)]
pub struct SliderCaptcha<P> {
    resources: P,
    watermark: WatermarkConfig,
    planner: PlacementPlanner,
}

impl<P: ResourceProvider> SliderCaptcha<P> {
    /// Create a generator with no watermark and the default retry ceiling.
    #[must_use]
    pub fn new(resources: P) -> Self {
        Self {
            resources,
            watermark: WatermarkConfig::default(),
            planner: PlacementPlanner::default(),
        }
    }

    /// Replace the watermark configuration.
    #[must_use]
    pub fn with_watermark(mut self, watermark: WatermarkConfig) -> Self {
        self.watermark = watermark;
        self
    }

    /// Replace the placement planner.
    #[must_use]
    pub fn with_planner(mut self, planner: PlacementPlanner) -> Self {
        self.planner = planner;
        self
    }

    /// The resource catalog.
    #[must_use]
    pub fn resources(&self) -> &P {
        &self.resources
    }

    /// Generate and encode a challenge using a thread-local RNG.
    ///
    /// # Errors
    ///
    /// Propagates any resource, placement, render, or encoding failure.
    pub fn generate(&self) -> Result<SliderCaptchaData> {
        self.generate_with_rng(&mut rand::rng())
    }

    /// Generate and encode a challenge drawing randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Propagates any resource, placement, render, or encoding failure.
    pub fn generate_with_rng<R: Rng>(&self, rng: &mut R) -> Result<SliderCaptchaData> {
        self.build_challenge(rng)?.encode()
    }

    /// Generate a challenge without encoding it.
    ///
    /// The real piece is cut before the decoy, so the background accumulates
    /// both cutouts in that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceUnavailable`], [`Error::RenderFailure`],
    /// [`Error::BackgroundTooSmall`], or [`Error::PlacementInfeasible`].
    pub fn build_challenge<R: Rng>(&self, rng: &mut R) -> Result<Challenge> {
        let mut background = self.resources.random_background(rng)?;
        let mut piece = self.resources.random_piece(rng, None)?;
        let mut decoy = self.resources.random_piece(rng, piece.source_index())?;
        log::debug!(
            "background #{:?} ({}x{}), piece #{:?}, decoy #{:?}",
            background.source_index(),
            background.width(),
            background.height(),
            piece.source_index(),
            decoy.source_index()
        );

        if self.watermark.is_enabled() {
            let font = self.resources.random_font(rng)?;
            watermark::render(&mut background, &font, &self.watermark)?;
        }

        ensure_fits(&background, &piece)?;
        ensure_fits(&background, &decoy)?;

        let (width, piece_width) = (background.width(), piece.width());
        let placement = self.planner.plan(rng, width, piece_width, decoy.width())?;

        cutout::cut_by_template(&mut background, &mut piece, placement.real_x);
        cutout::cut_by_template(&mut background, &mut decoy, placement.decoy_x);

        let percent = answer_percent(placement.real_x, width);
        log::debug!(
            "challenge ready: real_x={} percent={percent}",
            placement.real_x
        );

        Ok(Challenge {
            background,
            piece,
            placement,
            percent,
        })
    }
}

fn ensure_fits(background: &RasterImage, piece: &RasterImage) -> Result<()> {
    if piece.width() > background.width() || piece.height() > background.height() {
        return Err(Error::BackgroundTooSmall {
            width: background.width(),
            height: background.height(),
            piece_width: piece.width(),
            piece_height: piece.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MemoryResources;
    use image::{Rgba, RgbaImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog(bg: (u32, u32), pieces: &[(u32, u32)]) -> MemoryResources {
        MemoryResources::new(
            vec![RgbaImage::from_pixel(bg.0, bg.1, Rgba([90, 120, 150, 255]))],
            pieces
                .iter()
                .map(|&(w, h)| RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])))
                .collect(),
        )
    }

    #[test]
    fn answer_percent_rounds_to_hundredths() {
        assert_eq!(answer_percent(0, 300), 0);
        assert_eq!(answer_percent(60, 300), 20);
        assert_eq!(answer_percent(61, 300), 20);
        assert_eq!(answer_percent(62, 300), 21);
        assert_eq!(answer_percent(1, 200), 1);
        assert_eq!(answer_percent(300, 300), 100);
        assert_eq!(answer_percent(5, 0), 0);
    }

    #[test]
    fn decoy_uses_a_different_template() {
        let captcha = SliderCaptcha::new(catalog((300, 150), &[(50, 50), (40, 40)]));
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let challenge = captcha.build_challenge(&mut rng).unwrap();
            let placement = challenge.placement;
            let piece_width = challenge.piece.width();
            let decoy_width = if piece_width == 50 { 40 } else { 50 };
            assert!(placement.is_separated(piece_width, decoy_width));
        }
    }

    #[test]
    fn single_template_catalog_cannot_supply_decoy() {
        let captcha = SliderCaptcha::new(catalog((300, 150), &[(50, 50)]));
        let mut rng = StdRng::seed_from_u64(1);
        let err = captcha.build_challenge(&mut rng).unwrap_err();
        assert!(matches!(err, Error::ResourceUnavailable { .. }));
    }

    #[test]
    fn tall_piece_is_rejected_before_cutting() {
        let captcha = SliderCaptcha::new(catalog((300, 40), &[(50, 50), (50, 50)]));
        let mut rng = StdRng::seed_from_u64(1);
        let err = captcha.build_challenge(&mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::BackgroundTooSmall {
                height: 40,
                piece_height: 50,
                ..
            }
        ));
    }

    #[test]
    fn watermark_without_fonts_fails_the_challenge() {
        let captcha = SliderCaptcha::new(catalog((300, 150), &[(50, 50), (50, 50)]))
            .with_watermark(WatermarkConfig::default().with_text("demo"));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            captcha.build_challenge(&mut rng),
            Err(Error::ResourceUnavailable { .. })
        ));
    }

    #[test]
    fn resources_accessor_exposes_the_catalog() {
        let captcha = SliderCaptcha::new(catalog((300, 150), &[(50, 50), (40, 40)]));
        let mut rng = StdRng::seed_from_u64(3);
        let bg = captcha.resources().random_background(&mut rng).unwrap();
        assert_eq!((bg.width(), bg.height()), (300, 150));
        assert_eq!(bg.color_at(0, 0), Rgba([90, 120, 150, 255]));
    }

    #[test]
    fn serialized_payload_hides_the_answer() {
        let captcha = SliderCaptcha::new(catalog((300, 150), &[(50, 50), (50, 50)]));
        let mut rng = StdRng::seed_from_u64(8);
        let data = captcha.generate_with_rng(&mut rng).unwrap();
        let json = serde_json::to_value(&data).unwrap();

        assert!(json.get("background_image_base64").is_some());
        assert!(json.get("slider_image_base64").is_some());
        assert!(json.get("result_percent").is_none());
        assert!(data.result_percent <= 100);
    }
}
