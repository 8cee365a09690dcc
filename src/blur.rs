//! Eight-neighbor smoothing applied to the area a piece is cut from.

use image::Rgba;

use crate::raster::RasterImage;

/// Offsets of the eight neighbors, in sampling order.
const NEIGHBORS: [(i64, i64); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Divisor applied to the channel sums. Fixed at 8 even when fewer neighbors
/// are in bounds, so edge pixels come out darker and more transparent.
const DIVISOR: u32 = 8;

/// Replace the pixel at `(x, y)` with the sum of its in-bounds neighbors
/// divided by 8, per channel (alpha included).
pub fn blur_pixel(image: &mut RasterImage, x: u32, y: u32) {
    let width = i64::from(image.width());
    let height = i64::from(image.height());
    let mut sums = [0u32; 4];

    for (dx, dy) in NEIGHBORS {
        let nx = i64::from(x) + dx;
        let ny = i64::from(y) + dy;
        if nx < 0 || nx >= width || ny < 0 || ny >= height {
            continue;
        }
        // Both coordinates are inside [0, u32 dimension) here.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let px = image.color_at(nx as u32, ny as u32);
        for (sum, channel) in sums.iter_mut().zip(px.0) {
            *sum += u32::from(channel);
        }
    }

    // A sum of at most 8 * 255 divided by 8 always fits in a u8.
    #[allow(clippy::cast_possible_truncation)]
    let averaged = Rgba(sums.map(|s| (s / DIVISOR) as u8));
    image.set_pixel(x, y, averaged);
}
