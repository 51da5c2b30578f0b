//! 3x5 bitmap font for index and palette annotations.

use image::{Rgba, RgbaImage};

pub const GLYPH_WIDTH: u32 = 3;
pub const GLYPH_HEIGHT: u32 = 5;
const ADVANCE: u32 = GLYPH_WIDTH + 1;

// Rows top to bottom; bit 2 is the leftmost column.
fn glyph(ch: char) -> Option<[u8; 5]> {
    let rows = match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => return None,
    };
    Some(rows)
}

/// Width in pixels of `text` drawn at `scale`, without trailing spacing.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 { return 0; }
    (n * ADVANCE - 1) * scale
}

/// Draw `text` with its top-left corner at `(x, y)`. Characters without a
/// glyph advance like a space. Pixels outside the canvas are skipped.
pub fn draw_text(canvas: &mut RgbaImage, x: i64, y: i64, text: &str, color: Rgba<u8>, scale: u32) {
    let scale = scale.max(1) as i64;
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    let mut pen_x = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0b100 >> col) == 0 { continue; }
                    let px = pen_x + col as i64 * scale;
                    let py = y + row as i64 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let (cx, cy) = (px + dx, py + dy);
                            if cx >= 0 && cy >= 0 && cx < w && cy < h {
                                canvas.put_pixel(cx as u32, cy as u32, color);
                            }
                        }
                    }
                }
            }
        }
        pen_x += ADVANCE as i64 * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn only_glyph_pixels_change() {
        let mut canvas = RgbaImage::new(20, 10);
        draw_text(&mut canvas, 1, 1, "1 2", INK, 1);
        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == INK)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        let right = 1 + text_width("1 2", 1);
        for (x, y) in inked {
            assert!((1..right).contains(&x) && (1..1 + GLYPH_HEIGHT).contains(&y));
        }
        // the space cell stays blank
        assert!((5..8).all(|x| (1..6).all(|y| canvas.get_pixel(x, y)[3] == 0)));
    }

    #[test]
    fn clips_at_canvas_edges() {
        let mut canvas = RgbaImage::new(4, 4);
        draw_text(&mut canvas, -2, -2, "88", INK, 2);
        assert!(canvas.pixels().any(|p| *p == INK));
    }

    #[test]
    fn width_accounts_for_scale() {
        assert_eq!(text_width("", 3), 0);
        assert_eq!(text_width("7", 1), 3);
        assert_eq!(text_width("#EEC39A", 2), (7 * 4 - 1) * 2);
    }
}
