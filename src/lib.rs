//! Generate slider puzzle captchas.
//!
//! A piece-shaped template is cut out of a background photograph: the piece
//! receives the background pixels under its opaque area, the hole left in the
//! background is blurred, and the silhouette is outlined in white on both
//! images. A second, differently shaped decoy piece is cut at a
//! non-overlapping position so the hole cannot be found by diffing against the
//! original photo. The answer is the real piece's horizontal offset in
//! hundredths of the background width.
//!
//! # Quick Start
//!
//! ```no_run
//! use slider_captcha::{DirectoryResources, SliderCaptcha, WatermarkConfig};
//!
//! let resources = DirectoryResources::open("assets").expect("failed to read assets");
//! let captcha = SliderCaptcha::new(resources)
//!     .with_watermark(WatermarkConfig::default().with_text("example.com"));
//! let data = captcha.generate().expect("failed to generate challenge");
//! println!("answer: {}%", data.result_percent);
//! ```
//!
//! # Lower-level pieces
//!
//! The cutout, blur, and placement stages are exposed on their own and work
//! on [`RasterImage`] buffers directly.
//!
//! ```no_run
//! use slider_captcha::{cutout, PlacementPlanner, RasterImage};
//!
//! let mut background = RasterImage::from_rgba(image::open("bg.png").unwrap().to_rgba8());
//! let mut piece = RasterImage::from_rgba(image::open("piece.png").unwrap().to_rgba8());
//! let placement = PlacementPlanner::default()
//!     .plan(&mut rand::rng(), background.width(), piece.width(), piece.width())
//!     .unwrap();
//! cutout::cut_by_template(&mut background, &mut piece, placement.real_x);
//! ```

#![deny(missing_docs)]

pub mod blur;
mod captcha;
pub mod codec;
pub mod cutout;
pub mod error;
pub mod placement;
mod raster;
pub mod resources;
pub mod watermark;

pub use ab_glyph::FontArc;
pub use captcha::{answer_percent, Challenge, SliderCaptcha, SliderCaptchaData};
pub use error::{Error, Result};
pub use placement::{Placement, PlacementPlanner};
pub use raster::{RasterImage, TRANSLUCENCY_THRESHOLD, WHITE};
pub use resources::{DirectoryResources, MemoryResources, ResourceProvider};
pub use watermark::WatermarkConfig;
