//! Layered character compositing: legs, torso and head into one pose image.

pub mod label;

use glam::IVec2;
use image::{Rgba, RgbaImage};

use crate::metadata::{FrameMetadata, LegFrameMetadata};

/// Centers a 32x32 head inside a 64x64 frame: (64 - 32) / 2.
pub const HEAD_CENTER_OFFSET: i32 = 16;

pub const LABEL_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Frame indexes selected for one pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoseIndex {
    pub leg: usize,
    pub torso: usize,
    pub head: usize,
}

impl PoseIndex {
    pub const fn new(leg: usize, torso: usize, head: usize) -> Self { Self { leg, torso, head } }

    pub fn label(&self) -> String { format!("{} {} {}", self.leg, self.torso, self.head) }
}

/// Resolved placement of each part on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub torso_offset: IVec2,
    pub head_offset: IVec2,
    pub width: u32,
    pub height: u32,
}

/// Sidecar y axes point up, the canvas y axis points down, hence the negations.
pub fn resolve_layout(
    legs: (u32, u32),
    torso: (u32, u32),
    head: (u32, u32),
    torso_meta: &FrameMetadata,
    leg_meta: &LegFrameMetadata,
) -> Layout {
    let torso_offset = IVec2::new(leg_meta.torso_offset.x, -leg_meta.torso_offset.y);
    let head_meta = IVec2::from(torso_meta.head_offset);
    let head_offset = IVec2::new(
        HEAD_CENTER_OFFSET + head_meta.x + torso_offset.x,
        HEAD_CENTER_OFFSET - head_meta.y + torso_offset.y,
    );

    let extent = |leg: u32, torso: u32, head: u32, offset: i32| -> u32 {
        let head_reach = (head as i64 + offset as i64).max(0) as u32;
        leg.max(torso).max(head_reach)
    };

    Layout {
        torso_offset,
        head_offset,
        width: extent(legs.0, torso.0, head.0, head_offset.x),
        height: extent(legs.1, torso.1, head.1, head_offset.y),
    }
}

/// Stack one pose on a transparent canvas. Legs are always backmost; the
/// torso metadata decides whether the head goes over or under the torso.
pub fn compose(
    legs: &RgbaImage,
    torso: &RgbaImage,
    head: &RgbaImage,
    torso_meta: &FrameMetadata,
    leg_meta: &LegFrameMetadata,
) -> RgbaImage {
    let layout = resolve_layout(legs.dimensions(), torso.dimensions(), head.dimensions(), torso_meta, leg_meta);
    log::trace!("pose layout {:?}", layout);

    let mut canvas = RgbaImage::new(layout.width, layout.height);
    paste(&mut canvas, legs, IVec2::ZERO);
    if torso_meta.head_in_front_of_torso {
        paste(&mut canvas, torso, layout.torso_offset);
        paste(&mut canvas, head, layout.head_offset);
    } else {
        paste(&mut canvas, head, layout.head_offset);
        paste(&mut canvas, torso, layout.torso_offset);
    }
    canvas
}

/// Alpha-composite `top` onto `canvas` with its top-left corner at `at`,
/// clipped to the canvas. Transparent source pixels are skipped outright.
pub fn paste(canvas: &mut RgbaImage, top: &RgbaImage, at: IVec2) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for (x, y, src) in top.enumerate_pixels() {
        let cx = at.x as i64 + x as i64;
        let cy = at.y as i64 + y as i64;
        if cx < 0 || cy < 0 || cx >= w || cy >= h {
            continue;
        }
        let (cx, cy) = (cx as u32, cy as u32);
        match src[3] {
            0 => {}
            255 => canvas.put_pixel(cx, cy, *src),
            _ => blend_over(canvas.get_pixel_mut(cx, cy), src),
        }
    }
}

/// Source-over with rounded integer arithmetic; an opaque destination stays
/// opaque.
fn blend_over(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    let sa = src[3] as u32;
    let da = dst[3] as u32;
    let src_w = sa * 255;
    let dst_w = da * (255 - sa);
    let total = src_w + dst_w;
    if total == 0 {
        return;
    }
    for c in 0..3 {
        let v = src[c] as u32 * src_w + dst[c] as u32 * dst_w;
        dst[c] = ((v + total / 2) / total) as u8;
    }
    dst[3] = ((total + 127) / 255) as u8;
}

/// [`compose`] plus the pose indexes printed in the top-left corner.
pub fn compose_labeled(
    legs: &RgbaImage,
    torso: &RgbaImage,
    head: &RgbaImage,
    torso_meta: &FrameMetadata,
    leg_meta: &LegFrameMetadata,
    index: PoseIndex,
) -> RgbaImage {
    let mut canvas = compose(legs, torso, head, torso_meta, leg_meta);
    label::draw_text(&mut canvas, 1, 1, &index.label(), LABEL_COLOR, 1);
    canvas
}
