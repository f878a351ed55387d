//! Report lines for each unit read

use std::io::{self, Write};

/// Output post-processing is off in raw mode, so lines need an explicit
/// carriage return.
pub const LINE_END: &str = "\r\n";

/// Format one unit. Control characters are shown as code points so a raw ESC
/// or NUL never reaches the terminal.
pub fn format_unit(c: char) -> String {
    if c.is_control() {
        format!("char: U+{:04X}", c as u32)
    } else {
        format!("char: {}", c)
    }
}

/// Writes one line per unit to any sink, flushing each line
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn report(&mut self, c: char) -> io::Result<()> {
        write!(self.out, "{}{}", format_unit(c), LINE_END)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
