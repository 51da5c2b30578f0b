use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::export::DEFAULT_MAX_COLUMNS;

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "paperdoll.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Directory holding one sub-directory per skin.
    pub sheet_root: PathBuf,
    /// Directory holding `{name}.png` head sheets.
    pub head_root: PathBuf,
    /// Sub-directories of `sheet_root` that are not skins.
    pub exclude_skins: Vec<String>,
    pub max_columns: u32,
    pub output_dir: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            sheet_root: PathBuf::from("spritesheets"),
            head_root: PathBuf::from("spritesheets/head"),
            exclude_skins: ["cyber", "generic64", "gibs", "head"].map(String::from).to_vec(),
            max_columns: DEFAULT_MAX_COLUMNS,
            output_dir: PathBuf::from("."),
        }
    }
}

pub fn load_from_yaml_str(s: &str) -> Result<ToolConfig> {
    let cfg: ToolConfig = serde_yaml::from_str(s)?;
    Ok(cfg)
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ToolConfig> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).with_context(|| format!("reading config '{}'", path.display()))?;
    load_from_yaml_str(&data).with_context(|| format!("parsing config '{}'", path.display()))
}

/// An explicit path must exist; otherwise fall back to `paperdoll.yaml` in the
/// working directory, then to defaults.
pub fn resolve(explicit: Option<&Path>) -> Result<ToolConfig> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }
    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        log::debug!("using config '{}'", local.display());
        return load_from_path(local);
    }
    Ok(ToolConfig::default())
}
