//! Tile sources for the simulator.

use std::path::{Path, PathBuf};

use flowcover_core::{LoadError, TileSource};
use image::{ImageError, Rgba, RgbaImage};

const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Covers decoded from a directory of images, or flat swatches when no
/// directory is given.
#[derive(Debug)]
pub enum Library {
    Directory { paths: Vec<PathBuf>, thumb: u32 },
    Swatches { count: usize, thumb: u32 },
}

impl Library {
    /// Collect the decodable files directly under `dir`, sorted by name.
    pub fn scan(dir: &Path, thumb: u32) -> std::io::Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        log::info!("found {} images in {}", paths.len(), dir.display());
        Ok(Self::Directory { paths, thumb })
    }

    pub fn swatches(count: usize, thumb: u32) -> Self {
        Self::Swatches { count, thumb }
    }

    pub fn placeholder() -> RgbaImage {
        RgbaImage::from_pixel(1, 1, Rgba([32, 32, 32, 255]))
    }
}

impl TileSource for Library {
    type Resource = RgbaImage;

    fn tile_count(&self) -> usize {
        match self {
            Self::Directory { paths, .. } => paths.len(),
            Self::Swatches { count, .. } => *count,
        }
    }

    fn load_tile(&self, index: usize) -> Result<RgbaImage, LoadError> {
        let count = self.tile_count();
        if index >= count {
            return Err(LoadError::OutOfRange { index, count });
        }
        match self {
            Self::Directory { paths, thumb } => {
                let path = &paths[index];
                let decoded = image::open(path).map_err(|err| match err {
                    ImageError::IoError(io) => LoadError::Io(io),
                    other => LoadError::Decode(format!("{}: {other}", path.display())),
                })?;
                if decoded.width() > *thumb || decoded.height() > *thumb {
                    Ok(decoded.thumbnail(*thumb, *thumb).to_rgba8())
                } else {
                    Ok(decoded.to_rgba8())
                }
            }
            Self::Swatches { thumb, .. } => {
                Ok(RgbaImage::from_pixel(*thumb, *thumb, swatch_color(index)))
            }
        }
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn swatch_color(index: usize) -> Rgba<u8> {
    let hue = (index as u32).wrapping_mul(47) % 360;
    let (r, g, b) = match hue / 60 {
        0 => (255, hue * 255 / 60, 0),
        1 => (255 - (hue - 60) * 255 / 60, 255, 0),
        2 => (0, 255, (hue - 120) * 255 / 60),
        3 => (0, 255 - (hue - 180) * 255 / 60, 255),
        4 => ((hue - 240) * 255 / 60, 0, 255),
        _ => (255, 0, 255 - (hue - 300) * 255 / 60),
    };
    Rgba([r as u8, g as u8, b as u8, 255])
}
