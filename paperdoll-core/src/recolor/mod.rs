//! Exact-match palette substitution.

pub mod palette;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::RgbaImage;
use thiserror::Error;

pub use palette::PaletteHistogram;

/// Torso sheets considered when recoloring a torso skin, in this order.
pub const TORSO_FILES: [&str; 7] =
    ["Torso.png", "pistol.png", "smg.png", "rifle.png", "shotgun.png", "Sword.png", "Fence-cutter.png"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecolorError {
    #[error("invalid hex color code: '{0}'")]
    InvalidHex(String),
    #[error("invalid replacement '{0}': format must be OLD=NEW")]
    InvalidReplacement(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb(pub [u8; 3]);

impl FromStr for Rgb {
    type Err = RecolorError;

    /// Accepts `#RRGGBB` or `RRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RecolorError::InvalidHex(s.to_string()));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| RecolorError::InvalidHex(s.to_string()));
        Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// Exact RGB to RGB substitutions; alpha is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMap {
    map: HashMap<Rgb, Rgb>,
}

impl ColorMap {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, from: Rgb, to: Rgb) { self.map.insert(from, to); }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    /// Parse an `OLD=NEW` pair, e.g. `FF0000=#0000FF`.
    pub fn parse_replacement(s: &str) -> Result<(Rgb, Rgb), RecolorError> {
        let (old, new) = s.split_once('=').ok_or_else(|| RecolorError::InvalidReplacement(s.to_string()))?;
        if new.contains('=') {
            return Err(RecolorError::InvalidReplacement(s.to_string()));
        }
        Ok((old.parse()?, new.parse()?))
    }

    pub fn from_replacements<S: AsRef<str>>(items: &[S]) -> Result<Self, RecolorError> {
        let mut map = Self::new();
        for item in items {
            let (from, to) = Self::parse_replacement(item.as_ref())?;
            map.insert(from, to);
        }
        Ok(map)
    }

    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        let mut out = image.clone();
        for px in out.pixels_mut() {
            let [r, g, b, a] = px.0;
            if let Some(Rgb([nr, ng, nb])) = self.map.get(&Rgb([r, g, b])) {
                px.0 = [*nr, *ng, *nb, a];
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rgb, &Rgb)> { self.map.iter() }
}

/// Sheets of the selected skins that exist on disk. Missing inputs are
/// reported and skipped.
pub fn gather_sources(
    sheet_root: &Path,
    head_root: &Path,
    legs: Option<&str>,
    torso: Option<&str>,
    heads: &[&str],
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Some(legs) = legs {
        let path = sheet_root.join(legs).join(crate::skin::LEGS_SHEET);
        if path.is_file() {
            files.push(path);
        } else {
            log::warn!("legs spritesheet not found at '{}'", path.display());
        }
    }

    if let Some(torso) = torso {
        let dir = sheet_root.join(torso);
        if dir.is_dir() {
            let found: Vec<PathBuf> = TORSO_FILES.iter().map(|f| dir.join(f)).filter(|p| p.is_file()).collect();
            if found.is_empty() {
                log::warn!("no standard torso spritesheets found in '{}'", dir.display());
            }
            files.extend(found);
        } else {
            log::warn!("torso skin directory not found at '{}'", dir.display());
        }
    }

    for head in heads {
        let path = head_root.join(format!("{}.png", head));
        if path.is_file() {
            files.push(path);
        } else {
            log::warn!("head spritesheet not found at '{}'", path.display());
        }
    }
    files
}
