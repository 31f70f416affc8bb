//! Error types for jellybox.
//!
//! The menu engine itself never fails. Everything fallible lives at the
//! collaborator boundary: host effects, rendering, and hardware bring-up.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A side effect (mount, template, power) that did not complete.
///
/// Always transient from the engine's point of view: it is logged and the
/// operator may retry.
#[derive(Debug, Error)]
pub enum EffectError {
    /// The command could not be started at all.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The command ran but exited non-zero.
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// The selected USB volume is no longer present.
    #[error("no removable volume at index {0}")]
    NoSuchVolume(usize),

    /// A web template could not be read.
    #[error("cannot read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Drawing to the panel failed.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The panel driver rejected the frame transfer.
    #[error("display transfer failed")]
    Panel,

    /// The Wi-Fi payload does not fit in a QR code.
    #[error("QR payload too long")]
    Qr,
}

/// A hardware resource required at startup is unavailable.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("GPIO line {line}: {reason}")]
    Gpio { line: u32, reason: String },

    #[error("SPI: {0}")]
    Spi(String),

    #[error("display: {0}")]
    Display(String),

    #[error("signal handler: {0}")]
    Signal(String),
}
