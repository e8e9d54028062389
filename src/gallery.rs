//! The picture window: one horizontal strip of pictograms that is
//! replaced on every request and released on clear.

use crate::errors::Result;
use crate::persistence::save_strip;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Upper bounds applied to configured geometry before any pixel is allocated.
pub const MAX_TILE_HEIGHT: u32 = 4096;
pub const MAX_SPACING: u32 = 256;

/// Geometry of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryLayout {
    /// Every tile is scaled to this height, keeping its aspect ratio.
    pub tile_height: u32,
    /// Transparent gap around and between tiles.
    pub spacing: u32,
}

impl Default for GalleryLayout {
    fn default() -> Self {
        Self {
            tile_height: 200,
            spacing: 8,
        }
    }
}

impl GalleryLayout {
    /// The same layout with both fields brought into a drawable range.
    pub fn clamped(self) -> Self {
        Self {
            tile_height: self.tile_height.clamp(1, MAX_TILE_HEIGHT),
            spacing: self.spacing.min(MAX_SPACING),
        }
    }
}

fn scale_to_height(img: &DynamicImage, height: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let width = (u64::from(w) * u64::from(height) / u64::from(h.max(1))).max(1);
    let width = u32::try_from(width).unwrap_or(u32::MAX);
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Lays `images` out left to right at a fixed height.
/// No images gives a blank strip rather than an error.
pub fn compose_strip(images: &[DynamicImage], layout: GalleryLayout) -> RgbaImage {
    let GalleryLayout { tile_height: height, spacing } = layout.clamped();
    let tiles: Vec<RgbaImage> = images.iter().map(|img| scale_to_height(img, height)).collect();

    let width = tiles
        .iter()
        .fold(spacing, |acc, tile| acc.saturating_add(tile.width()).saturating_add(spacing))
        .max(1);
    let mut canvas = RgbaImage::new(width, height + 2 * spacing);

    let mut x = i64::from(spacing);
    for tile in &tiles {
        imageops::overlay(&mut canvas, tile, x, i64::from(spacing));
        x += i64::from(tile.width()) + i64::from(spacing);
    }
    canvas
}

/// A strip currently on display.
#[derive(Debug)]
pub struct OpenGallery {
    canvas: RgbaImage,
    tiles: usize,
    path: PathBuf,
}

impl OpenGallery {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tiles(&self) -> usize {
        self.tiles
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }
}

#[derive(Debug)]
pub enum GalleryState {
    Closed,
    Open(OpenGallery),
}

/// Owns the strip file at `output`. Presenting always starts from a
/// cleared state; clearing (or dropping the presenter) deletes the file.
pub struct GalleryPresenter {
    layout: GalleryLayout,
    output: PathBuf,
    state: GalleryState,
}

impl GalleryPresenter {
    pub fn new(output: &Path, layout: GalleryLayout) -> Self {
        Self {
            layout,
            output: output.to_path_buf(),
            state: GalleryState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GalleryState::Open(_))
    }

    pub fn current(&self) -> Option<&OpenGallery> {
        match &self.state {
            GalleryState::Open(open) => Some(open),
            GalleryState::Closed => None,
        }
    }

    /// Replaces whatever is on display with `images`.
    pub fn present(&mut self, images: &[DynamicImage]) -> Result<()> {
        self.clear()?;

        let canvas = compose_strip(images, self.layout);
        save_strip(&canvas, &self.output)?;
        info!(
            "Gallery shows {} pictogram(s) at {}",
            images.len(),
            self.output.display()
        );

        self.state = GalleryState::Open(OpenGallery {
            canvas,
            tiles: images.len(),
            path: self.output.clone(),
        });
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        if let GalleryState::Open(open) = std::mem::replace(&mut self.state, GalleryState::Closed) {
            match fs::remove_file(&open.path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            debug!("Gallery closed");
        }
        Ok(())
    }
}

impl Drop for GalleryPresenter {
    fn drop(&mut self) {
        if let Err(e) = self.clear() {
            warn!("Could not release gallery {}: {}", self.output.display(), e);
        }
    }
}
