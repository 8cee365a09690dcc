//! Transplant a piece-shaped region from the background into a template.
//!
//! The template's alpha channel is the shape mask. For every opaque template
//! pixel the background color is copied into the template and the background
//! pixel is smeared with [`blur_pixel`]. Pixels where the mask changes between
//! a pixel and its right or lower neighbor are painted white on both images,
//! which draws the piece silhouette.

use crate::blur::blur_pixel;
use crate::raster::{RasterImage, WHITE};

/// Cut `template`'s shape out of `background` with its left edge at `x_offset`.
///
/// The template is anchored at the top row of the background. The caller
/// guarantees `x_offset + template.width() <= background.width()` and
/// `template.height() <= background.height()`.
pub fn cut_by_template(background: &mut RasterImage, template: &mut RasterImage, x_offset: u32) {
    let width = template.width();
    let height = template.height();

    for x in 0..width {
        for y in 0..height {
            let transparent = template.is_transparent(x, y);
            let bg_x = x + x_offset;
            let bg_y = y;

            if !transparent {
                template.set_pixel(x, y, background.color_at(bg_x, bg_y));
                blur_pixel(background, bg_x, bg_y);
            }

            if x == width - 1 || y == height - 1 {
                continue;
            }

            let right = template.is_transparent(x + 1, y);
            let below = template.is_transparent(x, y + 1);
            if transparent != right || transparent != below {
                template.set_pixel(x, y, WHITE);
                background.set_pixel(bg_x, bg_y, WHITE);
            }
        }
    }
}

/// Coordinates (template-local) that [`cut_by_template`] paints as outline.
///
/// Depends only on the template's mask, so it can be computed before cutting.
#[must_use]
pub fn outline_points(template: &RasterImage) -> Vec<(u32, u32)> {
    let width = template.width();
    let height = template.height();
    let mut points = Vec::new();
    for x in 0..width.saturating_sub(1) {
        for y in 0..height.saturating_sub(1) {
            let here = template.is_transparent(x, y);
            let right = template.is_transparent(x + 1, y);
            let below = template.is_transparent(x, y + 1);
            if here != right || here != below {
                points.push((x, y));
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// 6x6 template with an opaque 2x2 block at (2..4, 2..4).
    fn small_square() -> RasterImage {
        RasterImage::from_rgba(RgbaImage::from_fn(6, 6, |x, y| {
            if (2..4).contains(&x) && (2..4).contains(&y) {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        }))
    }

    fn gradient(width: u32, height: u32) -> RasterImage {
        RasterImage::from_rgba(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                u8::try_from(x % 256).unwrap(),
                u8::try_from(y % 256).unwrap(),
                u8::try_from((x + y) % 256).unwrap(),
                255,
            ])
        }))
    }

    #[test]
    fn outline_marks_mask_transitions() {
        let points = outline_points(&small_square());
        // Left/top neighbors of the block and the block cells that touch
        // transparency on their right or bottom.
        for p in [(1, 2), (1, 3), (2, 1), (3, 1), (3, 2), (2, 3), (3, 3)] {
            assert!(points.contains(&p), "missing {p:?}");
        }
        assert!(!points.contains(&(2, 2)));
        assert!(!points.contains(&(0, 0)));
        assert!(!points.contains(&(4, 4)));
    }

    #[test]
    fn cut_paints_outline_white_on_both_images() {
        let mut bg = gradient(20, 10);
        let mut tpl = small_square();
        let expected = outline_points(&tpl);

        cut_by_template(&mut bg, &mut tpl, 5);

        for (x, y) in expected {
            assert_eq!(tpl.color_at(x, y), WHITE);
            assert_eq!(bg.color_at(x + 5, y), WHITE);
        }
    }

    #[test]
    fn opaque_interior_copies_original_background() {
        // A larger block so that some opaque pixels are not on the outline.
        let mut tpl = RasterImage::from_rgba(RgbaImage::from_fn(10, 10, |x, y| {
            if (2..8).contains(&x) && (2..8).contains(&y) {
                Rgba([1, 2, 3, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        }));
        let outline = outline_points(&tpl);
        let original = gradient(40, 12);
        let mut bg = original.clone();

        cut_by_template(&mut bg, &mut tpl, 17);

        let mut checked = 0;
        for x in 2..8 {
            for y in 2..8 {
                if outline.contains(&(x, y)) {
                    continue;
                }
                assert_eq!(tpl.color_at(x, y), original.color_at(x + 17, y));
                checked += 1;
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn transparent_area_of_template_is_untouched() {
        let mut bg = gradient(20, 10);
        let mut tpl = small_square();
        cut_by_template(&mut bg, &mut tpl, 5);

        assert_eq!(tpl.color_at(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(tpl.color_at(5, 5), Rgba([0, 0, 0, 0]));
        // Background outside the template span is unchanged.
        assert_eq!(bg.color_at(0, 0), gradient(20, 10).color_at(0, 0));
        assert_eq!(bg.color_at(19, 9), gradient(20, 10).color_at(19, 9));
    }

    #[test]
    fn recutting_yields_same_outline() {
        let mut bg = gradient(20, 10);
        let mut first = small_square();
        let mut second = small_square();
        let expected = outline_points(&first);

        cut_by_template(&mut bg, &mut first, 5);
        cut_by_template(&mut bg, &mut second, 5);

        assert_eq!(outline_points(&small_square()), expected);
        for (x, y) in expected {
            assert_eq!(first.color_at(x, y), WHITE);
            assert_eq!(second.color_at(x, y), WHITE);
            assert_eq!(bg.color_at(x + 5, y), WHITE);
        }
    }

    #[test]
    fn fully_opaque_template_blurs_the_cut_region() {
        let gray = Rgba([160, 160, 160, 255]);
        let mut bg = RasterImage::from_rgba(RgbaImage::from_pixel(8, 8, gray));
        let mut tpl = RasterImage::from_rgba(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));

        cut_by_template(&mut bg, &mut tpl, 2);

        // Uniform mask: no outline, so the template holds the background color.
        assert!(outline_points(&tpl).is_empty());
        assert_eq!(tpl.color_at(1, 1), gray);
        // First cut pixel at (2, 0) sits on the top edge: 5 neighbors / 8.
        assert_eq!(bg.color_at(2, 0), Rgba([100, 100, 100, 159]));
        assert_ne!(bg.color_at(3, 2), gray);
    }
}
