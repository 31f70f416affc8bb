//! Host side effects - USB volumes, web templates, network, power.
//!
//! The navigation engine only sees [`SystemActions`]. [`HostSystem`]
//! implements it by shelling out through a [`runner::CommandRunner`].

pub mod network;
pub mod power;
pub mod runner;
pub mod usb;
pub mod web;

use std::path::PathBuf;

use crate::config;
use crate::error::EffectError;
use runner::CommandRunner;

/// A removable FAT/exFAT volume found by `lsblk`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Volume {
    /// Kernel device name, e.g. `sda1`.
    pub name: String,
    /// Size as printed by `lsblk`, e.g. `14.9G`.
    pub size_label: String,
    pub filesystem: String,
    pub mount_point: Option<String>,
}

impl Volume {
    pub fn is_mounted(&self) -> bool {
        self.mount_point.is_some()
    }

    pub fn device_path(&self) -> String {
        format!("/dev/{}", self.name)
    }
}

/// Access point details shown on the network screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkInfo {
    pub ssid: Option<String>,
    pub password: Option<String>,
    pub local_ip: Option<String>,
}

/// Web templates the operator can publish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WebTemplate {
    Retro,
    Cyberpunk,
}

impl WebTemplate {
    /// File name (without `.html`) inside the templates directory.
    pub fn file_stem(&self) -> &'static str {
        match self {
            WebTemplate::Retro => "index_retro",
            WebTemplate::Cyberpunk => "index_cyberpunk",
        }
    }
}

/// Side effects requested by the menu engine.
///
/// Every effect reports success or failure; none of them may panic or
/// abort the poll loop.
pub trait SystemActions {
    fn list_removable_volumes(&mut self) -> Vec<Volume>;

    /// Mount volume `index` if unmounted, unmount it otherwise.
    fn toggle_mount(&mut self, index: usize) -> Result<(), EffectError>;

    fn apply_web_template(&mut self, template: WebTemplate) -> Result<(), EffectError>;

    fn reboot(&mut self) -> Result<(), EffectError>;

    fn shutdown(&mut self) -> Result<(), EffectError>;

    fn network_info(&mut self) -> NetworkInfo;

    /// IPv4 address of the access point interface, for the menu header.
    fn local_ip(&mut self) -> Option<String>;
}

/// Host paths and interface names used by [`HostSystem`].
#[derive(Clone, Debug)]
pub struct HostConfig {
    pub wifi_interface: String,
    pub templates_dir: PathBuf,
    pub web_root_index: PathBuf,
    pub fstab: PathBuf,
    pub mount_root: PathBuf,
    pub nm_connections_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            wifi_interface: config::WIFI_INTERFACE.to_owned(),
            templates_dir: PathBuf::from(config::TEMPLATES_DIR),
            web_root_index: PathBuf::from(config::WEB_ROOT_INDEX),
            fstab: PathBuf::from(config::FSTAB_PATH),
            mount_root: PathBuf::from(config::MOUNT_ROOT),
            nm_connections_dir: PathBuf::from(config::NM_CONNECTIONS_DIR),
        }
    }
}

/// [`SystemActions`] backed by the host's command-line tools.
pub struct HostSystem<R> {
    runner: R,
    config: HostConfig,
}

impl<R: CommandRunner> HostSystem<R> {
    pub fn new(runner: R, config: HostConfig) -> Self {
        Self { runner, config }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> SystemActions for HostSystem<R> {
    fn list_removable_volumes(&mut self) -> Vec<Volume> {
        usb::list_volumes(&mut self.runner)
    }

    fn toggle_mount(&mut self, index: usize) -> Result<(), EffectError> {
        usb::toggle(&mut self.runner, &self.config, index)
    }

    fn apply_web_template(&mut self, template: WebTemplate) -> Result<(), EffectError> {
        let ip = network::local_ip(&mut self.runner, &self.config.wifi_interface);
        web::apply(&mut self.runner, &self.config, template, ip.as_deref())
    }

    fn reboot(&mut self) -> Result<(), EffectError> {
        power::reboot(&mut self.runner)
    }

    fn shutdown(&mut self) -> Result<(), EffectError> {
        power::shutdown(&mut self.runner)
    }

    fn network_info(&mut self) -> NetworkInfo {
        network::info(&mut self.runner, &self.config)
    }

    fn local_ip(&mut self) -> Option<String> {
        network::local_ip(&mut self.runner, &self.config.wifi_interface)
    }
}
