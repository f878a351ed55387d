//! The steady-state loop: read a unit, report it, stop on the quit key

use std::io::{BufRead, Write};

use tracing::{debug, trace, warn};

use crate::decode::{read_unit, ReadError};
use crate::error::{Result, TtyError};
use crate::report::Reporter;

/// Quit key used when none is configured
pub const DEFAULT_QUIT: char = 'q';

/// Something the loop can read units from and put back afterwards.
///
/// Implemented by [`crate::TtySession`]; tests use in-memory fakes.
pub trait KeySource {
    fn reader(&mut self) -> &mut dyn BufRead;

    fn restore(&mut self) -> Result<()>;
}

/// How the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The quit key was read.
    Quit,
    /// The input stream closed.
    EndOfInput,
}

enum State {
    Running,
    Terminated(Exit),
}

/// Run until the quit key or end of input, restoring `source` before
/// returning either way.
///
/// I/O failures other than interruptions are returned without restoring;
/// the caller's session guard handles that.
pub fn run<S, W>(source: &mut S, reporter: &mut Reporter<W>, quit: char) -> Result<Exit>
where
    S: KeySource + ?Sized,
    W: Write,
{
    let mut reported = 0usize;

    loop {
        match step(source, reporter, quit)? {
            State::Running => reported += 1,
            State::Terminated(exit) => {
                source.restore()?;
                debug!(?exit, reported, "read loop terminated");
                return Ok(exit);
            }
        }
    }
}

/// One iteration. Returns `Running` only when a unit was reported.
fn step<S, W>(source: &mut S, reporter: &mut Reporter<W>, quit: char) -> Result<State>
where
    S: KeySource + ?Sized,
    W: Write,
{
    loop {
        match read_unit(source.reader()) {
            Ok(c) if c == quit => return Ok(State::Terminated(Exit::Quit)),
            Ok(c) => {
                trace!(unit = ?c, "read");
                reporter.report(c).map_err(TtyError::Report)?;
                return Ok(State::Running);
            }
            Err(ReadError::Interrupted) => trace!("read interrupted, retrying"),
            Err(ReadError::Decode(bytes)) => {
                warn!("skipping invalid UTF-8 input {:02x?}", bytes);
            }
            Err(ReadError::EndOfInput) => return Ok(State::Terminated(Exit::EndOfInput)),
            Err(ReadError::Io(e)) => return Err(TtyError::Read(e)),
        }
    }
}
