use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use super::Rgb;
use crate::compose::label;

const SWATCH: u32 = 30;
const PADDING: u32 = 10;
const ROW_HEIGHT: u32 = SWATCH + PADDING;
const IMAGE_WIDTH: u32 = 400;
const TEXT_SCALE: u32 = 2;
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Pixel counts per opaque-ish colour across a set of images.
#[derive(Debug, Clone, Default)]
pub struct PaletteHistogram {
    counts: HashMap<Rgb, u64>,
}

impl PaletteHistogram {
    pub fn new() -> Self { Self::default() }

    /// Count every pixel whose alpha is non-zero.
    pub fn add(&mut self, image: &RgbaImage) {
        for px in image.pixels() {
            let [r, g, b, a] = px.0;
            if a == 0 {
                continue;
            }
            *self.counts.entry(Rgb([r, g, b])).or_default() += 1;
        }
    }

    pub fn is_empty(&self) -> bool { self.counts.is_empty() }

    /// Most frequent first; ties ordered by colour value.
    pub fn sorted(&self) -> Vec<(Rgb, u64)> {
        let mut entries: Vec<(Rgb, u64)> = self.counts.iter().map(|(c, n)| (*c, *n)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    /// One row per colour: an outlined swatch followed by `#RRGGBB count`.
    pub fn render(&self) -> RgbaImage {
        let entries = self.sorted();
        let height = entries.len() as u32 * ROW_HEIGHT + PADDING;
        let mut img = RgbaImage::from_pixel(IMAGE_WIDTH, height, Rgba([255, 255, 255, 255]));

        for (row, (color, count)) in entries.iter().enumerate() {
            let y = PADDING + row as u32 * ROW_HEIGHT;
            let [r, g, b] = color.0;
            for sy in y..y + SWATCH {
                for sx in PADDING..PADDING + SWATCH {
                    let edge = sy == y || sy == y + SWATCH - 1 || sx == PADDING || sx == PADDING + SWATCH - 1;
                    img.put_pixel(sx, sy, if edge { INK } else { Rgba([r, g, b, 255]) });
                }
            }
            let text = format!("{} {}", color, count);
            let text_y = y + SWATCH / 2 - label::GLYPH_HEIGHT * TEXT_SCALE / 2;
            label::draw_text(&mut img, (PADDING + SWATCH + 15) as i64, text_y as i64, &text, INK, TEXT_SCALE);
        }
        img
    }
}
