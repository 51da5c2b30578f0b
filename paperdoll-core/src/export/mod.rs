//! Export utilities: contact sheets (PNG) and their layout metadata (JSON).

use std::path::Path;

use glam::IVec2;
use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::compose::paste;
use crate::error::{SheetError, SheetResult};

pub const DEFAULT_MAX_COLUMNS: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Background {
    #[default]
    White,
    Black,
    Transparent,
}

impl Background {
    pub fn rgba(self) -> Rgba<u8> {
        match self {
            Background::White => Rgba([255, 255, 255, 255]),
            Background::Black => Rgba([0, 0, 0, 255]),
            Background::Transparent => Rgba([0, 0, 0, 0]),
        }
    }
}

/// Grid geometry of a contact sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SheetLayout {
    pub cols: u32,
    pub rows: u32,
    pub frames: u32,
    pub cell: (u32, u32),
}

impl SheetLayout {
    /// Cells are as large as the largest frame; rows wrap after `max_cols`.
    pub fn for_frames(frames: &[RgbaImage], max_cols: u32) -> Self {
        let n = frames.len() as u32;
        let cell_w = frames.iter().map(RgbaImage::width).max().unwrap_or(0);
        let cell_h = frames.iter().map(RgbaImage::height).max().unwrap_or(0);
        let cols = n.min(max_cols.max(1));
        let rows = if cols == 0 { 0 } else { n.div_ceil(cols) };
        Self { cols, rows, frames: n, cell: (cell_w, cell_h) }
    }

    pub fn size(&self) -> (u32, u32) { (self.cols * self.cell.0, self.rows * self.cell.1) }

    /// Top-left corner of cell `i`.
    pub fn origin(&self, i: u32) -> IVec2 {
        let cols = self.cols.max(1);
        IVec2::new(((i % cols) * self.cell.0) as i32, ((i / cols) * self.cell.1) as i32)
    }
}

/// Lay `frames` out in a grid over `background`. Returns `None` when there is
/// nothing to draw.
pub fn contact_sheet(frames: &[RgbaImage], max_cols: u32, background: Background) -> Option<(RgbaImage, SheetLayout)> {
    if frames.is_empty() {
        log::warn!("no frames to write");
        return None;
    }
    let layout = SheetLayout::for_frames(frames, max_cols);
    let (w, h) = layout.size();
    let mut sheet = RgbaImage::from_pixel(w, h, background.rgba());
    for (i, frame) in frames.iter().enumerate() {
        paste(&mut sheet, frame, layout.origin(i as u32));
    }
    Some((sheet, layout))
}

pub fn save_png<P: AsRef<Path>>(path: P, image: &RgbaImage) -> SheetResult<()> {
    let path = path.as_ref();
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| SheetError::Encode { path: path.to_path_buf(), source })
}

/// Write `layout` as pretty JSON next to its sheet.
pub fn save_layout_json<P: AsRef<Path>>(path: P, layout: &SheetLayout) -> SheetResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(layout).map_err(|e| SheetError::Serialize(e.to_string()))?;
    std::fs::write(path, json).map_err(|source| SheetError::Io { path: path.to_path_buf(), source })
}
