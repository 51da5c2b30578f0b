//! Diagnostic contact sheets: full animation cycles of a skin combination,
//! one sheet for unarmed locomotion and one per weapon and leg stance.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::compose::PoseIndex;
use crate::error::SheetResult;
use crate::export::{self, Background, DEFAULT_MAX_COLUMNS};
use crate::index::{Direction, IndexTable, Part};
use crate::skin::{SkinSet, TorsoKind};

pub const UNARMED_ANIMATIONS: [&str; 2] = ["walk", "run"];
pub const WEAPON_ANIMATIONS: [&str; 3] = ["shoot", "rack", "reload"];
pub const LEG_STANCES: [&str; 2] = ["idle", "crouch"];

#[derive(Debug, Clone)]
pub struct DiagnosticOptions {
    pub background: Background,
    pub show_indices: bool,
    pub max_columns: u32,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self { background: Background::White, show_indices: false, max_columns: DEFAULT_MAX_COLUMNS }
    }
}

/// Skin names making up the combination, used for output file names.
#[derive(Debug, Clone)]
pub struct SkinNames {
    pub legs: String,
    pub torso: String,
    pub head: String,
}

impl SkinNames {
    fn prefix(&self) -> String { format!("{}_{}_{}", self.legs, self.torso, self.head) }
}

/// One planned sheet: its file name, torso variant and the poses it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSheet {
    pub file_name: String,
    pub kind: TorsoKind,
    pub poses: Vec<PoseIndex>,
}

/// Decide which poses go on which sheet. Combinations with no frames in the
/// table are skipped; sheets without poses are dropped.
pub fn plan(names: &SkinNames, kinds: &[TorsoKind], table: &IndexTable) -> Vec<PlannedSheet> {
    let mut sheets = Vec::new();

    let mut unarmed = Vec::new();
    for animation in UNARMED_ANIMATIONS {
        for direction in Direction::ALL {
            let legs = table.lookup(Part::Legs, animation, direction);
            let torsos = table.lookup(Part::Unarmed, animation, direction);
            let Some(head) = table.head_index(direction) else { continue };
            if legs.is_empty() || torsos.is_empty() {
                continue;
            }
            for (&leg, &torso) in legs.iter().zip(torsos) {
                unarmed.push(PoseIndex::new(leg as usize, torso as usize, head as usize));
            }
        }
    }
    if !unarmed.is_empty() {
        sheets.push(PlannedSheet {
            file_name: format!("{}_unarmed_walk_run.png", names.prefix()),
            kind: TorsoKind::Unarmed,
            poses: unarmed,
        });
    }

    for &kind in kinds.iter().filter(|k| **k != TorsoKind::Unarmed) {
        for stance in LEG_STANCES {
            let mut poses = Vec::new();
            for animation in WEAPON_ANIMATIONS {
                for direction in Direction::ALL {
                    let legs = table.lookup(Part::Legs, stance, direction);
                    let torsos = table.lookup(kind.into(), animation, direction);
                    let (Some(&leg), Some(head)) = (legs.first(), table.head_index(direction)) else { continue };
                    if torsos.is_empty() {
                        continue;
                    }
                    log::debug!("{} {} on {} legs facing {}: leg {} head {}", kind, animation, stance, direction, leg, head);
                    poses.extend(torsos.iter().map(|&t| PoseIndex::new(leg as usize, t as usize, head as usize)));
                }
            }
            if !poses.is_empty() {
                sheets.push(PlannedSheet {
                    file_name: format!("{}_{}_{}_legs.png", names.prefix(), kind, stance),
                    kind,
                    poses,
                });
            }
        }
    }
    sheets
}

/// Composite every pose of `planned` into a contact sheet.
pub fn render_sheet(skin: &SkinSet, planned: &PlannedSheet, options: &DiagnosticOptions) -> SheetResult<Option<(RgbaImage, export::SheetLayout)>> {
    let frames = planned
        .poses
        .iter()
        .map(|&pose| skin.pose(pose, planned.kind, options.show_indices))
        .collect::<SheetResult<Vec<_>>>()?;
    Ok(export::contact_sheet(&frames, options.max_columns, options.background))
}

/// Plan, render and write all diagnostic sheets into `out_dir`. Returns the
/// written PNG paths.
pub fn write_all(
    skin: &SkinSet,
    names: &SkinNames,
    table: &IndexTable,
    options: &DiagnosticOptions,
    out_dir: &Path,
) -> SheetResult<Vec<PathBuf>> {
    let kinds: Vec<TorsoKind> = TorsoKind::ALL.into_iter().filter(|k| skin.has_torso(*k)).collect();
    let mut written = Vec::new();
    for planned in plan(names, &kinds, table) {
        let Some((sheet, layout)) = render_sheet(skin, &planned, options)? else { continue };
        let path = out_dir.join(&planned.file_name);
        export::save_png(&path, &sheet)?;
        export::save_layout_json(path.with_extension("json"), &layout)?;
        log::info!("wrote '{}' ({} poses)", path.display(), planned.poses.len());
        written.push(path);
    }
    Ok(written)
}
