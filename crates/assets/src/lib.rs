//! Asset loading: decodes the block texture atlas into a flat RGBA buffer.
//!
//! The GPU backend consumes [`TextureImage`] values and never touches files
//! directly.
//!
//! # Layout
//! Pixel rows are stored top-to-bottom, four bytes per pixel, with no row
//! padding.

use image::ImageFormat;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Errors from texture loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to open texture {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported memory layout for {path}: {len} bytes for {width}x{height} RGBA")]
    UnsupportedLayout {
        path: PathBuf,
        width: u32,
        height: u32,
        len: usize,
    },
}

/// A decoded texture: tightly packed RGBA8 rows, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Bytes per row of pixel data.
    pub fn row_bytes(&self) -> u32 {
        self.width * 4
    }

    /// Load and decode a texture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        tracing::info!("loading texture: {}", path.display());

        let open_err = |source| AssetError::Open {
            path: path.to_path_buf(),
            source,
        };
        let reader = image::ImageReader::open(path)
            .map_err(open_err)?
            .with_guessed_format()
            .map_err(open_err)?;

        match reader.format() {
            Some(ImageFormat::Png) => {}
            Some(other) => {
                tracing::warn!("texture {} is format {other:?}, not png", path.display())
            }
            None => tracing::warn!("texture {} has an unrecognised format", path.display()),
        }

        let decoded = reader.decode().map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let texture = Self::from_raw(path, width, height, rgba.into_raw())?;

        tracing::info!(
            "texture decoded: {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Number of levels in a full mip chain for this image, base included.
    pub fn mip_level_count(&self) -> u32 {
        u32::BITS - self.width.max(self.height).max(1).leading_zeros()
    }

    /// Successively halved copies of the image down to 1x1, base excluded.
    ///
    /// Each level is filtered from the one before it.
    pub fn mip_chain(&self) -> Vec<TextureImage> {
        let Some(base) = image::RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
        else {
            return Vec::new();
        };
        let mut levels = Vec::new();
        let mut current = base;
        for _ in 1..self.mip_level_count() {
            let width = (current.width() / 2).max(1);
            let height = (current.height() / 2).max(1);
            current = image::imageops::resize(&current, width, height, FilterType::Triangle);
            levels.push(TextureImage {
                width,
                height,
                rgba: current.as_raw().clone(),
            });
        }
        levels
    }

    fn from_raw(path: &Path, width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(AssetError::UnsupportedLayout {
                path: path.to_path_buf(),
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}
