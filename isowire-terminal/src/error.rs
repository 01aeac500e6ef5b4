use std::path::PathBuf;

use isowire_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read scene file {path}: {source}")]
    SceneFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, TerminalError>;
