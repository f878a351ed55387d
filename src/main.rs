//! rawtty - echo raw keystrokes from the controlling terminal
//!
//! Press the quit key (default `q`) to restore the terminal and exit.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use rawtty::cleanup;
use rawtty::read_loop;
use rawtty::report::Reporter;
use rawtty::{TtyError, TtySession, CONTROLLING_TTY, DEFAULT_QUIT};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "rawtty")]
#[command(about = "Put the terminal in raw mode and report each key until quit")]
#[command(version)]
struct Cli {
    /// Key that restores the terminal and exits
    #[arg(long, short = 'q', default_value_t = DEFAULT_QUIT)]
    quit: char,

    /// Terminal device to open
    #[arg(long, short = 'd', default_value = CONTROLLING_TTY)]
    device: PathBuf,

    /// Write reports to the terminal device instead of stdout
    #[arg(long)]
    tty_output: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        if e.downcast_ref::<TtyError>().is_some_and(TtyError::is_acquisition) {
            eprintln!("hint: {} needs a terminal device (see --device)", env!("CARGO_PKG_NAME"));
        }
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Dropped on every return below, restoring the terminal
    let mut session = TtySession::open_path(&cli.device)?;

    let handle = session.restore_handle()?;
    cleanup::install_panic_hook(handle.try_clone()?);
    cleanup::spawn_signal_watcher(handle)?;

    info!(device = %cli.device.display(), quit = ?cli.quit, "terminal in raw mode");

    let exit = if cli.tty_output {
        let mut reporter = Reporter::new(session.output().try_clone()?);
        read_loop::run(&mut session, &mut reporter, cli.quit)?
    } else {
        let mut reporter = Reporter::new(io::stdout().lock());
        read_loop::run(&mut session, &mut reporter, cli.quit)?
    };

    info!(?exit, "terminal restored");
    Ok(())
}
