//! Error types for terminal acquisition, reading and restoration

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtyError {
    /// The terminal device could not be opened (missing device, permissions,
    /// or no controlling terminal).
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read terminal attributes: {0}")]
    GetAttr(#[source] nix::Error),

    #[error("failed to enter raw mode: {0}")]
    SetAttr(#[source] nix::Error),

    /// Leaves the terminal in raw mode, so callers must surface it.
    #[error("failed to restore terminal attributes: {0}")]
    Restore(#[source] nix::Error),

    #[error("failed to read from terminal: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),
}

impl TtyError {
    /// True for failures that happen before the read loop starts.
    pub fn is_acquisition(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::GetAttr(_) | Self::SetAttr(_))
    }
}

pub type Result<T> = std::result::Result<T, TtyError>;
