//! A character skin on disk: leg, torso (unarmed and per-weapon) and head
//! sheets plus their sidecars, loaded once per run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::compose::{compose, compose_labeled, PoseIndex};
use crate::error::{SheetError, SheetResult};
use crate::index::Part;
use crate::metadata::{self, FrameMetadata, LegFrameMetadata};
use crate::sheet::{self, CellSize};

pub const LEGS_SHEET: &str = "Legs.png";
pub const LEGS_METADATA: &str = "LegSpriteData.xml";

/// Which torso sheet a pose is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TorsoKind {
    Unarmed,
    Pistol,
    Smg,
    Rifle,
    Shotgun,
}

impl TorsoKind {
    pub const ALL: [TorsoKind; 5] =
        [TorsoKind::Unarmed, TorsoKind::Pistol, TorsoKind::Smg, TorsoKind::Rifle, TorsoKind::Shotgun];
    pub const WEAPONS: [TorsoKind; 4] = [TorsoKind::Pistol, TorsoKind::Smg, TorsoKind::Rifle, TorsoKind::Shotgun];

    pub fn name(self) -> &'static str {
        match self {
            TorsoKind::Unarmed => "unarmed",
            TorsoKind::Pistol => "pistol",
            TorsoKind::Smg => "smg",
            TorsoKind::Rifle => "rifle",
            TorsoKind::Shotgun => "shotgun",
        }
    }

    pub fn sheet_file(self) -> &'static str {
        match self {
            TorsoKind::Unarmed => "Torso.png",
            TorsoKind::Pistol => "pistol.png",
            TorsoKind::Smg => "smg.png",
            TorsoKind::Rifle => "rifle.png",
            TorsoKind::Shotgun => "shotgun.png",
        }
    }

    pub fn metadata_file(self) -> &'static str {
        match self {
            TorsoKind::Unarmed => "TorsoSpriteData.xml",
            TorsoKind::Pistol => "pistolSpriteData.xml",
            TorsoKind::Smg => "smgSpriteData.xml",
            TorsoKind::Rifle => "rifleSpriteData.xml",
            TorsoKind::Shotgun => "shotgunSpriteData.xml",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl From<TorsoKind> for Part {
    fn from(kind: TorsoKind) -> Self {
        match kind {
            TorsoKind::Unarmed => Part::Unarmed,
            TorsoKind::Pistol => Part::Pistol,
            TorsoKind::Smg => Part::Smg,
            TorsoKind::Rifle => Part::Rifle,
            TorsoKind::Shotgun => Part::Shotgun,
        }
    }
}

impl fmt::Display for TorsoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Frames of one sheet together with their per-frame metadata.
#[derive(Debug, Clone)]
pub struct PartSheet<M> {
    pub frames: Vec<RgbaImage>,
    pub metadata: Vec<M>,
}

impl<M> PartSheet<M> {
    pub fn new(frames: Vec<RgbaImage>, metadata: Vec<M>) -> Self {
        Self { frames, metadata }
    }

    fn warn_on_mismatch(&self, what: &str) {
        if self.frames.len() != self.metadata.len() {
            log::warn!(
                "{} sheet has {} frames but {} metadata records",
                what,
                self.frames.len(),
                self.metadata.len()
            );
        }
    }

    /// Frame and metadata at `index`, checked against both lists.
    pub fn get(&self, part: &'static str, index: usize) -> SheetResult<(&RgbaImage, &M)> {
        let len = self.frames.len().min(self.metadata.len());
        match (self.frames.get(index), self.metadata.get(index)) {
            (Some(frame), Some(meta)) => Ok((frame, meta)),
            _ => Err(SheetError::IndexOutOfRange { part, index, len }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkinSet {
    pub legs: PartSheet<LegFrameMetadata>,
    pub torsos: BTreeMap<TorsoKind, PartSheet<FrameMetadata>>,
    pub heads: Vec<RgbaImage>,
}

impl SkinSet {
    /// Load a skin from its leg and torso directories and a head sheet.
    ///
    /// The unarmed torso is required; weapon torsos whose sheet or sidecar is
    /// missing are skipped with a warning.
    pub fn load(legs_dir: &Path, torso_dir: &Path, head_sheet: &Path) -> SheetResult<Self> {
        log::info!("legs:  '{}'", legs_dir.display());
        log::info!("torso: '{}'", torso_dir.display());
        log::info!("head:  '{}'", head_sheet.display());

        let legs = PartSheet::new(
            sheet::load_sheet(legs_dir.join(LEGS_SHEET), CellSize::LIMB)?,
            metadata::load_leg_metadata(legs_dir.join(LEGS_METADATA))?,
        );
        legs.warn_on_mismatch("legs");

        let mut torsos = BTreeMap::new();
        torsos.insert(TorsoKind::Unarmed, load_torso(torso_dir, TorsoKind::Unarmed)?);
        for kind in TorsoKind::WEAPONS {
            match load_torso(torso_dir, kind) {
                Ok(part) => {
                    torsos.insert(kind, part);
                }
                Err(SheetError::NotFound { path }) => {
                    log::warn!("skipping {} torso: '{}' not found", kind, path.display());
                }
                Err(e) => return Err(e),
            }
        }

        let heads = sheet::load_sheet(head_sheet, CellSize::HEAD)?;
        Ok(Self { legs, torsos, heads })
    }

    pub fn has_torso(&self, kind: TorsoKind) -> bool { self.torsos.contains_key(&kind) }

    /// Composite one pose. Every index is checked against its frame list and
    /// metadata list.
    pub fn pose(&self, index: PoseIndex, kind: TorsoKind, label: bool) -> SheetResult<RgbaImage> {
        let (leg_frame, leg_meta) = self.legs.get("legs", index.leg)?;
        let torso = self
            .torsos
            .get(&kind)
            .ok_or(SheetError::SheetNotLoaded { sheet: kind.sheet_file() })?;
        let (torso_frame, torso_meta) = torso.get(kind.name(), index.torso)?;
        let head = self
            .heads
            .get(index.head)
            .ok_or(SheetError::IndexOutOfRange { part: "head", index: index.head, len: self.heads.len() })?;

        log::debug!("pose {} legs={} torso={} head={}", kind, index.leg, index.torso, index.head);
        Ok(if label {
            compose_labeled(leg_frame, torso_frame, head, torso_meta, leg_meta, index)
        } else {
            compose(leg_frame, torso_frame, head, torso_meta, leg_meta)
        })
    }
}

fn load_torso(dir: &Path, kind: TorsoKind) -> SheetResult<PartSheet<FrameMetadata>> {
    let part = PartSheet::new(
        sheet::load_sheet(dir.join(kind.sheet_file()), CellSize::LIMB)?,
        metadata::load_frame_metadata(dir.join(kind.metadata_file()))?,
    );
    part.warn_on_mismatch(kind.name());
    Ok(part)
}

/// Skin directory names under `root`, sorted, minus `exclude`.
pub fn list_skins(root: &Path, exclude: &[String]) -> SheetResult<Vec<String>> {
    if !root.is_dir() {
        return Err(SheetError::NotFound { path: root.to_path_buf() });
    }
    let entries = std::fs::read_dir(root).map_err(|source| SheetError::Io { path: root.to_path_buf(), source })?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SheetError::Io { path: root.to_path_buf(), source })?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !exclude.iter().any(|e| *e == name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Resolve a skin name to its directory, rejecting names not in `available`.
pub fn skin_dir(root: &Path, name: &str, available: &[String]) -> Option<PathBuf> {
    available.iter().any(|n| n == name).then(|| root.join(name))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use image::Rgba;

    pub fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage { RgbaImage::from_pixel(w, h, Rgba(color)) }

    /// Write a minimal skin: `frames` limb cells per sheet, `heads` head cells,
    /// and matching sidecars. Weapon sheets are written for `weapons` only.
    pub fn write_skin(dir: &Path, frames: u32, heads: u32, weapons: &[TorsoKind]) -> PathBuf {
        let skin = dir.join("marine");
        std::fs::create_dir_all(&skin).unwrap();
        solid(64 * frames, 64, [0, 255, 0, 255]).save(skin.join(LEGS_SHEET)).unwrap();
        let legs = vec![LegFrameMetadata::default(); frames as usize];
        metadata::save_leg_metadata(skin.join(LEGS_METADATA), &legs).unwrap();

        for kind in std::iter::once(TorsoKind::Unarmed).chain(weapons.iter().copied()) {
            solid(64 * frames, 64, [0, 0, 255, 255]).save(skin.join(kind.sheet_file())).unwrap();
            let torso = vec![FrameMetadata::default(); frames as usize];
            metadata::save_frame_metadata(skin.join(kind.metadata_file()), &torso).unwrap();
        }

        let head = dir.join("marine_head.png");
        solid(32 * heads, 32, [255, 255, 0, 255]).save(&head).unwrap();
        skin
    }
}
