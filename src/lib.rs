//! rawtty - raw keystroke access to the controlling terminal
//!
//! Opens the controlling terminal, switches it to raw mode, reports each input
//! unit as it arrives and puts the original terminal configuration back on
//! every way out.

pub mod cleanup;
pub mod decode;
pub mod error;
pub mod mode;
pub mod read_loop;
pub mod report;
pub mod session;

pub use error::{Result, TtyError};
pub use mode::TermMode;
pub use read_loop::{Exit, KeySource, DEFAULT_QUIT};
pub use session::{TtySession, CONTROLLING_TTY};
