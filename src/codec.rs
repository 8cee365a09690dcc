//! PNG + base64 encoding of finished challenge images.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;

use crate::error::Result;
use crate::raster::RasterImage;

/// Encode an image as PNG bytes.
///
/// # Errors
///
/// Returns [`crate::Error::Image`] if PNG encoding fails.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    image
        .as_rgba()
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Encode an image as PNG and then as standard (padded) base64 text.
///
/// # Errors
///
/// Returns [`crate::Error::Image`] if PNG encoding fails.
pub fn encode_base64_png(image: &RasterImage) -> Result<String> {
    Ok(STANDARD.encode(encode_png(image)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn png_bytes_start_with_signature() {
        let img = RasterImage::from_rgba(RgbaImage::new(4, 4));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn base64_payload_decodes_back_to_same_pixels() {
        let img = RasterImage::from_rgba(RgbaImage::from_fn(5, 3, |x, y| {
            let red = u8::try_from(x * 40).unwrap();
            let green = u8::try_from(y * 80).unwrap();
            Rgba([red, green, 7, 128])
        }));
        let text = encode_base64_png(&img).unwrap();
        assert!(text.is_ascii());
        assert!(!text.contains('\0'));

        let bytes = STANDARD.decode(&text).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(&decoded, img.as_rgba());
    }
}
