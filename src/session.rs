//! Controlling-terminal session: raw mode on open, original mode on restore
//!
//! A [`TtySession`] owns both handles to the device and the configuration
//! captured before raw mode was applied. Dropping a session that was not
//! explicitly restored restores it, so every return path (including `?` and
//! unwinding) leaves the terminal as it was found.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use nix::sys::termios::{self, SetArg, Termios};
use tracing::{debug, error, trace};

use crate::cleanup::RestoreHandle;
use crate::error::{Result, TtyError};
use crate::mode::{derive_raw, TermMode};
use crate::read_loop::KeySource;

/// Device for "the terminal controlling this process"
pub const CONTROLLING_TTY: &str = "/dev/tty";

#[derive(Debug)]
pub struct TtySession {
    reader: BufReader<File>,
    output: File,
    original: Termios,
    restored: bool,
}

impl TtySession {
    /// Open the controlling terminal and switch it to raw mode.
    pub fn open() -> Result<Self> {
        Self::open_path(CONTROLLING_TTY)
    }

    /// Open a specific terminal device and switch it to raw mode.
    ///
    /// # Errors
    ///
    /// [`TtyError::Open`] if either handle cannot be opened, otherwise the
    /// errors of [`TtySession::from_files`].
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|source| TtyError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let output = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| TtyError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "opened terminal");

        Self::from_files(input, output)
    }

    /// Capture the configuration of `input` and apply raw mode to it.
    ///
    /// # Errors
    ///
    /// [`TtyError::GetAttr`] if `input` is not a terminal, [`TtyError::SetAttr`]
    /// if raw mode cannot be applied. In both cases the device is unchanged.
    pub fn from_files(input: File, output: File) -> Result<Self> {
        let original = termios::tcgetattr(&input).map_err(TtyError::GetAttr)?;
        let raw = derive_raw(&original);
        trace!(mode = ?TermMode::capture(&raw), "entering raw mode");
        termios::tcsetattr(&input, SetArg::TCSANOW, &raw).map_err(TtyError::SetAttr)?;

        Ok(Self {
            reader: BufReader::new(input),
            output,
            original,
            restored: false,
        })
    }

    /// Re-apply the configuration captured at open. Safe to call repeatedly.
    pub fn restore(&mut self) -> Result<()> {
        termios::tcsetattr(self.reader.get_ref(), SetArg::TCSANOW, &self.original)
            .map_err(TtyError::Restore)?;
        self.restored = true;
        debug!("restored original terminal attributes");
        Ok(())
    }

    /// Configuration captured before raw mode was applied
    pub fn original(&self) -> &Termios {
        &self.original
    }

    /// Query the device for its current mode.
    pub fn current_mode(&self) -> Result<TermMode> {
        let current = termios::tcgetattr(self.reader.get_ref()).map_err(TtyError::GetAttr)?;
        Ok(TermMode::capture(&current))
    }

    /// Write handle to the same device
    pub fn output(&self) -> &File {
        &self.output
    }

    /// A detached handle for restoring from a panic hook or signal handler.
    pub fn restore_handle(&self) -> io::Result<RestoreHandle> {
        Ok(RestoreHandle::new(self.output.try_clone()?, self.original.clone()))
    }
}

impl KeySource for TtySession {
    fn reader(&mut self) -> &mut dyn BufRead {
        &mut self.reader
    }

    fn restore(&mut self) -> Result<()> {
        TtySession::restore(self)
    }
}

impl Drop for TtySession {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.restore() {
            error!("{}; the terminal may be left in raw mode", e);
        }
    }
}
