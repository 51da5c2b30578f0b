pub mod compose;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod export;
pub mod index;
pub mod metadata;
pub mod recolor;
pub mod sheet;
pub mod skin;

pub use error::{SheetError, SheetResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
