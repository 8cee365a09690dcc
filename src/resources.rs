//! Catalogs of backgrounds, piece templates, and fonts.
//!
//! The assembler only sees the [`ResourceProvider`] trait. Two providers are
//! included: [`DirectoryResources`] reads an asset directory laid out as
//!
//! ```text
//! <root>/backgrounds/*.png|jpg|jpeg|webp|bmp
//! <root>/pieces/*.png|webp
//! <root>/fonts/*.ttf|otf      (optional)
//! ```
//!
//! and [`MemoryResources`] serves already-decoded assets, e.g. ones embedded
//! with `include_bytes!`.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use image::RgbaImage;
use rand::{Rng, RngCore};

use crate::error::{Error, Result};
use crate::raster::RasterImage;

const BACKGROUNDS_DIR: &str = "backgrounds";
const PIECES_DIR: &str = "pieces";
const FONTS_DIR: &str = "fonts";

/// Source of raw challenge assets. Every call returns a fresh buffer.
pub trait ResourceProvider {
    /// A randomly chosen background.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceUnavailable`] if the catalog is empty or the
    /// chosen image cannot be decoded.
    fn random_background(&self, rng: &mut dyn RngCore) -> Result<RasterImage>;

    /// A randomly chosen piece template whose source index differs from
    /// `exclude`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceUnavailable`] if no eligible template exists
    /// or the chosen image cannot be decoded.
    fn random_piece(&self, rng: &mut dyn RngCore, exclude: Option<usize>) -> Result<RasterImage>;

    /// A randomly chosen font.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceUnavailable`] if no font is available or the
    /// chosen font cannot be parsed.
    fn random_font(&self, rng: &mut dyn RngCore) -> Result<FontArc>;
}

/// Pick a uniform index in `0..len`, skipping `exclude`.
fn pick_index(
    rng: &mut dyn RngCore,
    len: usize,
    exclude: Option<usize>,
    catalog: &str,
) -> Result<usize> {
    match exclude.filter(|e| *e < len) {
        None if len == 0 => Err(Error::unavailable(catalog, &"catalog is empty")),
        None => Ok(rng.random_range(0..len)),
        Some(_) if len < 2 => Err(Error::unavailable(
            catalog,
            &"no entry left after excluding the real piece",
        )),
        Some(excluded) => {
            let idx = rng.random_range(0..len - 1);
            Ok(if idx >= excluded { idx + 1 } else { idx })
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    has_extension(path, &["jpg", "jpeg", "png", "webp", "bmp"])
}

fn is_alpha_image(path: &Path) -> bool {
    has_extension(path, &["png", "webp"])
}

fn is_font(path: &Path) -> bool {
    has_extension(path, &["ttf", "otf"])
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => allowed.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Assets read from an on-disk directory.
///
/// File listings are taken once by [`DirectoryResources::open`] and sorted by
/// name, so a file's index is stable for the lifetime of the provider. Files
/// are decoded on every request.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
    backgrounds: Vec<PathBuf>,
    pieces: Vec<PathBuf>,
    fonts: Vec<PathBuf>,
}

impl DirectoryResources {
    /// Scan `root` for backgrounds, pieces, and fonts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceUnavailable`] if `backgrounds/` or `pieces/`
    /// cannot be read. A missing `fonts/` directory yields an empty font list.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let backgrounds = scan(&root.join(BACKGROUNDS_DIR), is_supported_image)?;
        let pieces = scan(&root.join(PIECES_DIR), is_alpha_image)?;
        let fonts_dir = root.join(FONTS_DIR);
        let fonts = if fonts_dir.is_dir() {
            scan(&fonts_dir, is_font)?
        } else {
            Vec::new()
        };

        log::debug!(
            "asset catalog {}: {} backgrounds, {} pieces, {} fonts",
            root.display(),
            backgrounds.len(),
            pieces.len(),
            fonts.len()
        );

        Ok(Self {
            root,
            backgrounds,
            pieces,
            fonts,
        })
    }

    /// The asset root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn scan(dir: &Path, keep: fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| unreadable(dir, &e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_ok_and(|ft| ft.is_file()))
        .map(|e| e.path())
        .filter(|p| {
            let kept = keep(p);
            if !kept {
                log::warn!("ignoring unsupported asset {}", p.display());
            }
            kept
        })
        .collect();
    files.sort();
    Ok(files)
}

fn load_image(path: &Path, index: usize) -> Result<RasterImage> {
    let img = image::open(path).map_err(|e| unreadable(path, &e))?;
    Ok(RasterImage::new(img.to_rgba8(), index))
}

fn load_font(path: &Path) -> Result<FontArc> {
    let bytes = std::fs::read(path).map_err(|e| unreadable(path, &e))?;
    FontArc::try_from_vec(bytes).map_err(|e| unreadable(path, &e))
}

fn unreadable(path: &Path, reason: &impl Display) -> Error {
    Error::unavailable(path.display().to_string(), reason)
}

impl ResourceProvider for DirectoryResources {
    fn random_background(&self, rng: &mut dyn RngCore) -> Result<RasterImage> {
        let idx = pick_index(rng, self.backgrounds.len(), None, BACKGROUNDS_DIR)?;
        load_image(&self.backgrounds[idx], idx)
    }

    fn random_piece(&self, rng: &mut dyn RngCore, exclude: Option<usize>) -> Result<RasterImage> {
        let idx = pick_index(rng, self.pieces.len(), exclude, PIECES_DIR)?;
        load_image(&self.pieces[idx], idx)
    }

    fn random_font(&self, rng: &mut dyn RngCore) -> Result<FontArc> {
        let idx = pick_index(rng, self.fonts.len(), None, FONTS_DIR)?;
        load_font(&self.fonts[idx])
    }
}

/// Assets held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryResources {
    backgrounds: Vec<RgbaImage>,
    pieces: Vec<RgbaImage>,
    fonts: Vec<FontArc>,
}

impl MemoryResources {
    /// Build a catalog from decoded backgrounds and piece templates.
    #[must_use]
    pub fn new(backgrounds: Vec<RgbaImage>, pieces: Vec<RgbaImage>) -> Self {
        Self {
            backgrounds,
            pieces,
            fonts: Vec::new(),
        }
    }

    /// Add fonts available for watermarking.
    #[must_use]
    pub fn with_fonts(mut self, fonts: Vec<FontArc>) -> Self {
        self.fonts = fonts;
        self
    }

    /// Decode encoded images (PNG, JPEG, ...) into a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceUnavailable`] for the first blob that fails to
    /// decode.
    pub fn from_encoded(backgrounds: &[&[u8]], pieces: &[&[u8]]) -> Result<Self> {
        let decode = |catalog: &str, blobs: &[&[u8]]| -> Result<Vec<RgbaImage>> {
            blobs
                .iter()
                .enumerate()
                .map(|(i, bytes)| {
                    image::load_from_memory(bytes)
                        .map(|img| img.to_rgba8())
                        .map_err(|e| Error::unavailable(format!("{catalog}[{i}]"), &e))
                })
                .collect()
        };
        Ok(Self::new(
            decode(BACKGROUNDS_DIR, backgrounds)?,
            decode(PIECES_DIR, pieces)?,
        ))
    }
}

impl ResourceProvider for MemoryResources {
    fn random_background(&self, rng: &mut dyn RngCore) -> Result<RasterImage> {
        let idx = pick_index(rng, self.backgrounds.len(), None, BACKGROUNDS_DIR)?;
        Ok(RasterImage::new(self.backgrounds[idx].clone(), idx))
    }

    fn random_piece(&self, rng: &mut dyn RngCore, exclude: Option<usize>) -> Result<RasterImage> {
        let idx = pick_index(rng, self.pieces.len(), exclude, PIECES_DIR)?;
        Ok(RasterImage::new(self.pieces[idx].clone(), idx))
    }

    fn random_font(&self, rng: &mut dyn RngCore) -> Result<FontArc> {
        let idx = pick_index(rng, self.fonts.len(), None, FONTS_DIR)?;
        Ok(self.fonts[idx].clone())
    }
}
