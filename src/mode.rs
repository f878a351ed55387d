//! Structured view of the termios bits that raw mode touches
//!
//! Each behavior group gets its own struct of named booleans so the raw-mode
//! transformation reads as plain field assignments. Bits not named here are
//! never read or written.

use nix::sys::termios::{InputFlags, LocalFlags, OutputFlags, SpecialCharacterIndices, Termios};

/// Input-processing behavior (`c_iflag`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputMode {
    /// IGNBRK
    pub ignore_break: bool,
    /// BRKINT
    pub break_interrupt: bool,
    /// PARMRK
    pub mark_parity: bool,
    /// ISTRIP
    pub strip_high_bit: bool,
    /// INLCR
    pub nl_to_cr: bool,
    /// IGNCR
    pub ignore_cr: bool,
    /// ICRNL
    pub cr_to_nl: bool,
    /// IXON
    pub flow_control: bool,
}

/// Local-mode behavior (`c_lflag`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalMode {
    /// ECHO
    pub echo: bool,
    /// ECHONL
    pub echo_newline: bool,
    /// ICANON
    pub canonical: bool,
    /// ISIG
    pub signals: bool,
    /// IEXTEN
    pub extended: bool,
}

/// Output-processing behavior (`c_oflag`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputMode {
    /// OPOST
    pub post_process: bool,
}

/// VMIN / VTIME
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadTiming {
    pub min_bytes: u8,
    pub timeout_deciseconds: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TermMode {
    pub input: InputMode,
    pub local: LocalMode,
    pub output: OutputMode,
    pub timing: ReadTiming,
}

impl TermMode {
    /// Read the named fields out of a full terminal configuration
    pub fn capture(termios: &Termios) -> Self {
        let i = termios.input_flags;
        let l = termios.local_flags;
        let cc = &termios.control_chars;

        Self {
            input: InputMode {
                ignore_break: i.contains(InputFlags::IGNBRK),
                break_interrupt: i.contains(InputFlags::BRKINT),
                mark_parity: i.contains(InputFlags::PARMRK),
                strip_high_bit: i.contains(InputFlags::ISTRIP),
                nl_to_cr: i.contains(InputFlags::INLCR),
                ignore_cr: i.contains(InputFlags::IGNCR),
                cr_to_nl: i.contains(InputFlags::ICRNL),
                flow_control: i.contains(InputFlags::IXON),
            },
            local: LocalMode {
                echo: l.contains(LocalFlags::ECHO),
                echo_newline: l.contains(LocalFlags::ECHONL),
                canonical: l.contains(LocalFlags::ICANON),
                signals: l.contains(LocalFlags::ISIG),
                extended: l.contains(LocalFlags::IEXTEN),
            },
            output: OutputMode {
                post_process: termios.output_flags.contains(OutputFlags::OPOST),
            },
            timing: ReadTiming {
                min_bytes: cc[SpecialCharacterIndices::VMIN as usize],
                timeout_deciseconds: cc[SpecialCharacterIndices::VTIME as usize],
            },
        }
    }

    /// Derive raw mode: every named behavior off, reads return after one byte
    /// with no inter-byte timeout.
    pub fn raw(self) -> Self {
        let mut mode = self;

        mode.input.ignore_break = false;
        mode.input.break_interrupt = false;
        mode.input.mark_parity = false;
        mode.input.strip_high_bit = false;
        mode.input.nl_to_cr = false;
        mode.input.ignore_cr = false;
        mode.input.cr_to_nl = false;
        mode.input.flow_control = false;

        mode.local.echo = false;
        mode.local.echo_newline = false;
        mode.local.canonical = false;
        mode.local.signals = false;
        mode.local.extended = false;

        mode.output.post_process = false;

        mode.timing.min_bytes = 1;
        mode.timing.timeout_deciseconds = 0;

        mode
    }

    /// True if this mode is what [`TermMode::raw`] produces.
    pub fn is_raw(&self) -> bool {
        *self == self.raw()
    }

    /// Write the named fields into `termios`. Every other flag bit and control
    /// character is left as it was.
    pub fn apply_to(&self, termios: &mut Termios) {
        let input = &self.input;
        let i = &mut termios.input_flags;
        i.set(InputFlags::IGNBRK, input.ignore_break);
        i.set(InputFlags::BRKINT, input.break_interrupt);
        i.set(InputFlags::PARMRK, input.mark_parity);
        i.set(InputFlags::ISTRIP, input.strip_high_bit);
        i.set(InputFlags::INLCR, input.nl_to_cr);
        i.set(InputFlags::IGNCR, input.ignore_cr);
        i.set(InputFlags::ICRNL, input.cr_to_nl);
        i.set(InputFlags::IXON, input.flow_control);

        let local = &self.local;
        let l = &mut termios.local_flags;
        l.set(LocalFlags::ECHO, local.echo);
        l.set(LocalFlags::ECHONL, local.echo_newline);
        l.set(LocalFlags::ICANON, local.canonical);
        l.set(LocalFlags::ISIG, local.signals);
        l.set(LocalFlags::IEXTEN, local.extended);

        termios
            .output_flags
            .set(OutputFlags::OPOST, self.output.post_process);

        let cc = &mut termios.control_chars;
        cc[SpecialCharacterIndices::VMIN as usize] = self.timing.min_bytes;
        cc[SpecialCharacterIndices::VTIME as usize] = self.timing.timeout_deciseconds;
    }
}

/// Clone `original` and switch it to raw mode.
pub fn derive_raw(original: &Termios) -> Termios {
    let mut raw = original.clone();
    TermMode::capture(original).raw().apply_to(&mut raw);
    raw
}
