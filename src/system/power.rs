//! Host power control.

use log::info;

use super::runner::{run_checked, CommandRunner};
use crate::error::EffectError;

pub fn reboot<R: CommandRunner + ?Sized>(runner: &mut R) -> Result<(), EffectError> {
    info!("Power: rebooting host");
    run_checked(runner, "sudo", &["reboot"]).map(drop)
}

pub fn shutdown<R: CommandRunner + ?Sized>(runner: &mut R) -> Result<(), EffectError> {
    info!("Power: shutting down host");
    run_checked(runner, "sudo", &["shutdown", "now"]).map(drop)
}
