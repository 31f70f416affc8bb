//! jellybox - button-panel menu controller for the JellyBox appliance.
//!
//! Brings up the buttons and the ST7789 panel, then runs the menu poll
//! loop in the foreground until SIGINT or SIGTERM.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::{error, info, warn};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

use jellybox::app::App;
use jellybox::config::LOG_PATH;
use jellybox::error::InitError;
use jellybox::hardware;
use jellybox::system::runner::SystemRunner;
use jellybox::system::{HostConfig, HostSystem};
use jellybox::ui::display::PanelRenderer;
use jellybox::ui::engine::{EngineConfig, Io};

/// Raised by the signal handler, polled by the menu loop.
static STOP: AtomicBool = AtomicBool::new(false);

extern "C" fn request_stop(_: nix::libc::c_int) {
    STOP.store(true, Ordering::SeqCst);
}

fn main() -> Result<()> {
    let log_to_file = init_logging();
    if !log_to_file {
        warn!("Cannot open {LOG_PATH}, logging to stderr");
    }

    run().map_err(|e| {
        error!("JellyBox failed to start: {e:#}");
        e
    })
}

fn run() -> Result<()> {
    install_signal_handlers().context("installing signal handlers")?;

    let hw = hardware::init().context("initialising panel hardware")?;
    let io = Io {
        system: HostSystem::new(SystemRunner, HostConfig::default()),
        renderer: PanelRenderer::new(hw.panel),
        delay: hw.delay,
    };
    let mut app = App::new(hw.buttons, io, EngineConfig::default());

    info!("JellyBox started");
    app.run(&STOP);
    info!("JellyBox stopped by operator");

    // Keep the backlight line claimed until the loop has ended.
    drop(hw.backlight);
    Ok(())
}

/// Log to [`LOG_PATH`] when it is writable, stderr otherwise.
///
/// Returns `true` when the log file is in use.
fn init_logging() -> bool {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {}",
            buf.timestamp(),
            record.level(),
            record.args()
        )
    });

    let file = OpenOptions::new().create(true).append(true).open(LOG_PATH);
    let to_file = file.is_ok();
    if let Ok(file) = file {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    to_file
}

fn install_signal_handlers() -> Result<(), InitError> {
    let action = SigAction::new(
        SigHandler::Handler(request_stop),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { sigaction(signal, &action) }
            .map_err(|e| InitError::Signal(format!("{signal}: {e}")))?;
    }
    Ok(())
}
