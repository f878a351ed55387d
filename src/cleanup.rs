//! Terminal restoration outside the normal return path
//!
//! `Drop` on the session covers returns and unwinding. A panic hook restores
//! before the panic message is printed (so it is readable), and a signal
//! watcher thread restores when the process is told to terminate.

use std::fs::File;
use std::io;
use std::os::raw::c_int;
use std::process;
use std::sync::Mutex;
use std::thread;

use nix::sys::termios::{self, SetArg, Termios};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::{error, warn};

/// Signals that restore the terminal and end the process. With ISIG cleared
/// these only arrive from outside (e.g. `kill`), never from the keyboard.
pub const TERMINATION_SIGNALS: [c_int; 4] = [SIGTERM, SIGHUP, SIGINT, SIGQUIT];

/// A terminal fd paired with the configuration to put back on it
#[derive(Debug)]
pub struct RestoreHandle {
    tty: File,
    original: Termios,
}

impl RestoreHandle {
    pub fn new(tty: File, original: Termios) -> Self {
        Self { tty, original }
    }

    pub fn try_clone(&self) -> io::Result<Self> {
        Ok(Self {
            tty: self.tty.try_clone()?,
            original: self.original.clone(),
        })
    }

    pub fn restore(&self) -> nix::Result<()> {
        termios::tcsetattr(&self.tty, SetArg::TCSANOW, &self.original)
    }
}

/// Chain a panic hook that restores the terminal, then runs the previous hook.
pub fn install_panic_hook(handle: RestoreHandle) {
    let handle = Mutex::new(handle);
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let handle = handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = handle.restore() {
            error!("failed to restore terminal after panic: {}", e);
        }
        previous(info);
    }));
}

/// Start a thread that waits for a termination signal, restores the terminal
/// and exits with `128 + signo`.
pub fn spawn_signal_watcher(handle: RestoreHandle) -> io::Result<thread::JoinHandle<()>> {
    let mut signals = Signals::new(TERMINATION_SIGNALS)?;

    thread::Builder::new()
        .name("tty-signals".to_string())
        .spawn(move || {
            if let Some(signo) = signals.forever().next() {
                warn!(signal = signo, "received termination signal, restoring terminal");
                if let Err(e) = handle.restore() {
                    error!("failed to restore terminal: {}", e);
                }
                process::exit(128 + signo);
            }
        })
}
