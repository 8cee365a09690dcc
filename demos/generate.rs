//! Generate one slider challenge from in-memory assets.
//!
//! Usage:
//! ```sh
//! cargo run --example generate -- [output-dir]
//! ```
//!
//! Writes `bk.png` and `sli.png` and prints the answer.

use std::env;
use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use slider_captcha::{codec, MemoryResources, SliderCaptcha};

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = u8::try_from(x * 255 / width).unwrap_or(u8::MAX);
        let g = u8::try_from(y * 255 / height).unwrap_or(u8::MAX);
        Rgba([r, g, 160, 255])
    })
}

fn disc(size: u32) -> RgbaImage {
    let c = f64::from(size) / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let d = (f64::from(x) + 0.5 - c).hypot(f64::from(y) + 0.5 - c);
        let alpha = if d <= c - 2.0 { 255 } else { 0 };
        Rgba([0, 0, 0, alpha])
    })
}

fn square(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let inside = (4..size - 4).contains(&x) && (4..size - 4).contains(&y);
        Rgba([0, 0, 0, if inside { 255 } else { 0 }])
    })
}

fn main() {
    let output = PathBuf::from(env::args().nth(1).unwrap_or_else(|| ".".to_string()));

    let resources = MemoryResources::new(vec![gradient(320, 160)], vec![disc(56), square(48)]);
    let captcha = SliderCaptcha::new(resources);
    let challenge = captcha
        .build_challenge(&mut rand::rng())
        .expect("failed to build challenge");

    let bk = codec::encode_png(&challenge.background).expect("failed to encode background");
    let sli = codec::encode_png(&challenge.piece).expect("failed to encode piece");
    std::fs::write(output.join("bk.png"), bk).expect("failed to write bk.png");
    std::fs::write(output.join("sli.png"), sli).expect("failed to write sli.png");

    println!(
        "answer: {}% (real_x={}, decoy_x={})",
        challenge.percent, challenge.placement.real_x, challenge.placement.decoy_x
    );
}
