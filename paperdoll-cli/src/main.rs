use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use paperdoll_core::compose::PoseIndex;
use paperdoll_core::config::{self, ToolConfig};
use paperdoll_core::diagnostic::{self, DiagnosticOptions, SkinNames};
use paperdoll_core::export::{self, Background};
use paperdoll_core::index::IndexTable;
use paperdoll_core::metadata::{self, MetadataField};
use paperdoll_core::recolor::{self, ColorMap, PaletteHistogram};
use paperdoll_core::sheet;
use paperdoll_core::skin::{self, SkinSet, TorsoKind};
use paperdoll_core::VERSION;

#[derive(Parser, Debug)]
#[command(name = "paperdoll", version = VERSION, about = "Character spritesheet compositing tools")]
struct Cli {
    /// YAML tool config (defaults to ./paperdoll.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log per-frame detail
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Color {
    White,
    Black,
    Transparent,
}

impl From<Color> for Background {
    fn from(c: Color) -> Self {
        match c {
            Color::White => Background::White,
            Color::Black => Background::Black,
            Color::Transparent => Background::Transparent,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Torso {
    Unarmed,
    Pistol,
    Smg,
    Rifle,
    Shotgun,
}

impl From<Torso> for TorsoKind {
    fn from(t: Torso) -> Self {
        match t {
            Torso::Unarmed => TorsoKind::Unarmed,
            Torso::Pistol => TorsoKind::Pistol,
            Torso::Smg => TorsoKind::Smg,
            Torso::Rifle => TorsoKind::Rifle,
            Torso::Shotgun => TorsoKind::Shotgun,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List skin directories under the sheet root
    Skins,
    /// Composite a single pose and write it as PNG
    Compose {
        #[arg(long, value_name = "DIR_NAME")]
        legs: String,
        #[arg(long, value_name = "DIR_NAME")]
        torso: String,
        #[arg(long, value_name = "SKIN_ID")]
        head: String,
        #[arg(long, default_value_t = 0)]
        leg_index: usize,
        #[arg(long, default_value_t = 0)]
        torso_index: usize,
        #[arg(long, default_value_t = 0)]
        head_index: usize,
        #[arg(long, value_enum, default_value_t = Torso::Unarmed)]
        weapon: Torso,
        /// Print the leg, torso and head index on the pose
        #[arg(long)]
        show_indices: bool,
        #[arg(long, default_value = "pose.png")]
        out: PathBuf,
    },
    /// Render walk/run and weapon contact sheets for a skin combination
    Diagnostic {
        #[arg(long, value_name = "DIR_NAME")]
        legs: String,
        #[arg(long, value_name = "DIR_NAME")]
        torso: String,
        #[arg(long, value_name = "SKIN_ID")]
        head: String,
        #[arg(long, value_enum, default_value_t = Color::White)]
        color: Color,
        /// Print the leg, torso and head index on each pose
        #[arg(long)]
        show_indices: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Copy holstered-weapon fields from one skin's metadata to another's
    CopyMetadata {
        #[arg(long, value_name = "DIR_NAME")]
        from_sheet: String,
        #[arg(long, value_name = "DIR_NAME")]
        to_sheet: String,
        #[arg(long, value_enum, default_value_t = Torso::Unarmed)]
        kind: Torso,
    },
    /// Replace palette colours in skin sheets, or chart their palette
    #[command(group(ArgGroup::new("action").required(true).multiple(true).args(["replace", "palette", "analyze_head"])))]
    Recolor {
        #[arg(long, value_name = "SKIN_NAME")]
        legs: Option<String>,
        #[arg(long, value_name = "SKIN_NAME")]
        torso: Option<String>,
        #[arg(long, value_name = "SKIN_NAME")]
        head: Option<String>,
        /// Colour replacement, repeatable (e.g. FF0000=0000FF)
        #[arg(long, value_name = "OLD=NEW")]
        replace: Vec<String>,
        /// Write palette_diagnostic.png with every colour and its pixel count
        #[arg(long)]
        palette: bool,
        /// Chart the palette of one head sheet
        #[arg(long, value_name = "SKIN_ID")]
        analyze_head: Option<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the records of a metadata sidecar
    Inspect {
        path: PathBuf,
        /// Parse as leg metadata
        #[arg(long)]
        legs: bool,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();

    let cfg = config::resolve(cli.config.as_deref())?;
    match cli.cmd {
        Command::Skins => {
            let names = skin::list_skins(&cfg.sheet_root, &cfg.exclude_skins)?;
            println!("Available spritesheet directories in '{}':", cfg.sheet_root.display());
            for name in names {
                println!("  - {}", name);
            }
        }
        Command::Compose { legs, torso, head, leg_index, torso_index, head_index, weapon, show_indices, out } => {
            let (skin, _) = load_skin(&cfg, &legs, &torso, &head)?;
            let pose = PoseIndex::new(leg_index, torso_index, head_index);
            let img = skin.pose(pose, weapon.into(), show_indices)?;
            export::save_png(&out, &img)?;
            println!("Wrote {}x{} pose to {}", img.width(), img.height(), out.display());
        }
        Command::Diagnostic { legs, torso, head, color, show_indices, out_dir } => {
            let (skin, names) = load_skin(&cfg, &legs, &torso, &head)?;
            let table = IndexTable::builtin().context("parsing built-in index table")?;
            let options = DiagnosticOptions { background: color.into(), show_indices, max_columns: cfg.max_columns };
            let out_dir = out_dir.unwrap_or_else(|| cfg.output_dir.clone());
            std::fs::create_dir_all(&out_dir).with_context(|| format!("creating '{}'", out_dir.display()))?;
            let written = diagnostic::write_all(&skin, &names, &table, &options, &out_dir)?;
            if written.is_empty() {
                println!("No sheets generated.");
            }
            for path in written {
                println!("Wrote {}", path.display());
            }
        }
        Command::CopyMetadata { from_sheet, to_sheet, kind } => {
            let kind = TorsoKind::from(kind);
            let available = skin::list_skins(&cfg.sheet_root, &cfg.exclude_skins)?;
            let from_dir = require_skin(&cfg, &from_sheet, &available)?;
            let to_dir = require_skin(&cfg, &to_sheet, &available)?;

            let from = metadata::load_frame_metadata(from_dir.join(kind.metadata_file()))?;
            let to_path = to_dir.join(kind.metadata_file());
            let mut to = metadata::load_frame_metadata(&to_path)?;
            if from.is_empty() || to.is_empty() {
                println!("Skipping {}: one or both metadata lists are empty.", kind);
                return Ok(());
            }
            let copied = metadata::copy_fields(&from, &mut to, &MetadataField::WEAPON_BACK);
            metadata::save_frame_metadata(&to_path, &to)?;
            println!("Copied {} records into '{}' for '{}'.", copied, kind.metadata_file(), to_sheet);
        }
        Command::Recolor { legs, torso, head, replace, palette, analyze_head, out_dir } => {
            let map = ColorMap::from_replacements(&replace)?;
            for (from, to) in map.iter() {
                log::info!("replace {} -> {}", from, to);
            }
            let heads: Vec<&str> = head.iter().chain(analyze_head.iter()).map(String::as_str).collect();
            let files = recolor::gather_sources(&cfg.sheet_root, &cfg.head_root, legs.as_deref(), torso.as_deref(), &heads);
            if files.is_empty() {
                println!("No files found to process.");
                return Ok(());
            }
            let out_dir = out_dir.unwrap_or_else(|| cfg.output_dir.clone());
            std::fs::create_dir_all(&out_dir).with_context(|| format!("creating '{}'", out_dir.display()))?;

            if palette || analyze_head.is_some() {
                write_palette(&files, &out_dir)?;
            }
            if !map.is_empty() {
                recolor_files(&map, &files, &out_dir);
            }
        }
        Command::Inspect { path, legs, json } => {
            if legs {
                let frames = metadata::load_leg_metadata(&path)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&frames)?);
                } else {
                    println!("{}: {} leg records", path.display(), frames.len());
                    for (i, f) in frames.iter().enumerate() {
                        println!("  [{}] torso offset ({}, {})", i, f.torso_offset.x, f.torso_offset.y);
                    }
                }
            } else {
                let frames = metadata::load_frame_metadata(&path)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&frames)?);
                } else {
                    println!("{}: {} records", path.display(), frames.len());
                    for (i, f) in frames.iter().enumerate() {
                        println!(
                            "  [{}] head ({}, {}) {}  weapon back ({}, {}) rot {:.1} {}{}",
                            i,
                            f.head_offset.x,
                            f.head_offset.y,
                            if f.head_in_front_of_torso { "front" } else { "behind" },
                            f.weapon_back_position.x,
                            f.weapon_back_position.y,
                            f.weapon_back_rotation,
                            if f.weapon_back_in_front_of_torso { "front" } else { "behind" },
                            if f.weapon_visible { "" } else { " hidden" },
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn require_skin(cfg: &ToolConfig, name: &str, available: &[String]) -> Result<PathBuf> {
    skin::skin_dir(&cfg.sheet_root, name, available)
        .ok_or_else(|| anyhow!("unknown skin '{}'; available: {}", name, available.join(", ")))
}

fn load_skin(cfg: &ToolConfig, legs: &str, torso: &str, head: &str) -> Result<(SkinSet, SkinNames)> {
    let available = skin::list_skins(&cfg.sheet_root, &cfg.exclude_skins)
        .with_context(|| format!("listing skins in '{}'", cfg.sheet_root.display()))?;
    let legs_dir = require_skin(cfg, legs, &available)?;
    let torso_dir = require_skin(cfg, torso, &available)?;
    let head_sheet = cfg.head_root.join(format!("{}.png", head));
    if !head_sheet.is_file() {
        bail!("head sheet '{}' not found", head_sheet.display());
    }
    let skin = SkinSet::load(&legs_dir, &torso_dir, &head_sheet)?;
    let names = SkinNames { legs: legs.to_string(), torso: torso.to_string(), head: head.to_string() };
    Ok((skin, names))
}

fn write_palette(files: &[PathBuf], out_dir: &Path) -> Result<()> {
    log::info!("analyzing palette of {} files", files.len());
    let mut hist = PaletteHistogram::new();
    for path in files {
        match sheet::load_rgba(path) {
            Ok(img) => hist.add(&img),
            Err(e) => log::warn!("{}", e),
        }
    }
    if hist.is_empty() {
        println!("No opaque pixels found in the selected images.");
        return Ok(());
    }
    let out = out_dir.join("palette_diagnostic.png");
    export::save_png(&out, &hist.render())?;
    println!("Saved palette diagnostic to '{}'", out.display());
    Ok(())
}

fn recolor_files(map: &ColorMap, files: &[PathBuf], out_dir: &Path) {
    log::info!("recoloring {} files", files.len());
    for path in files {
        let Some(name) = path.file_name() else { continue };
        let out = out_dir.join(format!("recolored_{}", name.to_string_lossy()));
        let result = sheet::load_rgba(path).and_then(|img| export::save_png(&out, &map.apply(&img)));
        match result {
            Ok(()) => println!("  Saved '{}'", out.display()),
            Err(e) => log::warn!("{}", e),
        }
    }
}
