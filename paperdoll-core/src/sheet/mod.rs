//! Spritesheet loading and fixed-grid slicing.

use std::path::Path;

use image::{GenericImageView, RgbaImage};

use crate::error::{SheetError, SheetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    /// Legs, torsos and weapon torsos.
    pub const LIMB: CellSize = CellSize::new(64, 64);
    pub const HEAD: CellSize = CellSize::new(32, 32);

    pub const fn new(width: u32, height: u32) -> Self { Self { width, height } }
}

/// Cut `image` into `cell`-sized frames in row-major order.
///
/// Trailing strips narrower or shorter than a cell are dropped with a warning.
pub fn slice(image: &RgbaImage, cell: CellSize) -> Vec<RgbaImage> {
    if cell.width == 0 || cell.height == 0 {
        log::warn!("refusing to slice with an empty cell size {}x{}", cell.width, cell.height);
        return Vec::new();
    }
    let (width, height) = image.dimensions();
    if width % cell.width != 0 || height % cell.height != 0 {
        log::warn!(
            "image dimensions ({}x{}) are not a multiple of {}x{}; partial cells are discarded",
            width, height, cell.width, cell.height
        );
    }
    let cols = width / cell.width;
    let rows = height / cell.height;
    let mut frames = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let view = image.view(col * cell.width, row * cell.height, cell.width, cell.height);
            frames.push(view.to_image());
        }
    }
    frames
}

/// Decode an image file as RGBA, adding an opaque alpha channel when missing.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> SheetResult<RgbaImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(SheetError::NotFound { path: path.to_path_buf() });
    }
    let img = image::open(path).map_err(|source| SheetError::Decode { path: path.to_path_buf(), source })?;
    Ok(img.to_rgba8())
}

pub fn load_sheet<P: AsRef<Path>>(path: P, cell: CellSize) -> SheetResult<Vec<RgbaImage>> {
    let path = path.as_ref();
    let img = load_rgba(path)?;
    log::debug!("slicing '{}' ({}x{})", path.display(), img.width(), img.height());
    let frames = slice(&img, cell);
    log::debug!("sliced '{}' into {} frames", path.display(), frames.len());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    // Each 8x4 cell is filled with a colour encoding its grid position.
    fn grid(cols: u32, rows: u32, cell: CellSize) -> RgbaImage {
        RgbaImage::from_fn(cols * cell.width, rows * cell.height, |x, y| {
            Rgba([(x / cell.width) as u8, (y / cell.height) as u8, 0, 255])
        })
    }

    #[test]
    fn slices_in_row_major_order() {
        let cell = CellSize::new(8, 4);
        let (cols, rows) = (3, 2);
        let frames = slice(&grid(cols, rows, cell), cell);
        assert_eq!(frames.len(), (cols * rows) as usize);
        for (k, frame) in frames.iter().enumerate() {
            let k = k as u32;
            assert_eq!(frame.dimensions(), (8, 4));
            assert_eq!(*frame.get_pixel(0, 0), Rgba([(k % cols) as u8, (k / cols) as u8, 0, 255]));
        }
    }

    #[test]
    fn wide_sheet_yields_left_then_right() {
        let img = RgbaImage::from_fn(128, 64, |x, _| if x < 64 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) });
        let frames = slice(&img, CellSize::LIMB);
        assert_eq!(frames.len(), 2);
        assert_eq!(*frames[0].get_pixel(63, 63), Rgba([255, 0, 0, 255]));
        assert_eq!(*frames[1].get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn partial_cells_are_discarded() {
        let img = RgbaImage::new(100, 70);
        assert_eq!(slice(&img, CellSize::LIMB).len(), 1);
        assert_eq!(slice(&img, CellSize::HEAD).len(), 6);
        assert!(slice(&RgbaImage::new(10, 10), CellSize::LIMB).is_empty());
        assert!(slice(&img, CellSize::new(0, 8)).is_empty());
    }

    #[test]
    fn load_reports_missing_and_undecodable_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Legs.png");
        assert!(matches!(load_sheet(&missing, CellSize::LIMB), Err(SheetError::NotFound { .. })));

        let bogus = dir.path().join("Torso.png");
        std::fs::write(&bogus, b"not a png").unwrap();
        assert!(matches!(load_sheet(&bogus, CellSize::LIMB), Err(SheetError::Decode { .. })));
    }

    #[test]
    fn load_adds_alpha_to_rgb_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("head.png");
        image::RgbImage::from_pixel(64, 32, image::Rgb([10, 20, 30])).save(&path).unwrap();
        let frames = load_sheet(&path, CellSize::HEAD).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(*frames[1].get_pixel(5, 5), Rgba([10, 20, 30, 255]));
    }
}
