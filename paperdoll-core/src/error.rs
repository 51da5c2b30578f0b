use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading, slicing, or writing sheets and their sidecars.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("file not found: '{}'", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to decode image '{}': {source}", path.display())]
    Decode { path: PathBuf, source: image::ImageError },
    #[error("malformed metadata '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("i/o error on '{}': {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to encode '{}': {source}", path.display())]
    Encode { path: PathBuf, source: image::ImageError },
    #[error("failed to serialize metadata: {0}")]
    Serialize(String),
    #[error("'{sheet}' was not loaded for this skin")]
    SheetNotLoaded { sheet: &'static str },
    #[error("{part} index {index} out of range (len {len})")]
    IndexOutOfRange { part: &'static str, index: usize, len: usize },
}

pub type SheetResult<T> = Result<T, SheetError>;
