//! Access point information via NetworkManager and iproute2.
//!
//! Each lookup degrades to `None` on failure; the network screen shows
//! "Not available" for missing fields.

use std::path::Path;

use log::{debug, warn};

use super::runner::{run_checked, CommandRunner};
use super::{HostConfig, NetworkInfo};

/// Collect SSID, PSK and IPv4 address of the access point.
pub fn info<R: CommandRunner + ?Sized>(runner: &mut R, config: &HostConfig) -> NetworkInfo {
    let access_point = access_point_name(runner, &config.wifi_interface);
    let (ssid, password) = match &access_point {
        Some(ap) => (
            ssid(runner, ap),
            password(runner, &config.nm_connections_dir, ap),
        ),
        None => (None, None),
    };

    NetworkInfo {
        ssid,
        password,
        local_ip: local_ip(runner, &config.wifi_interface),
    }
}

/// Name of the NetworkManager connection bound to `interface`.
pub fn access_point_name<R: CommandRunner + ?Sized>(
    runner: &mut R,
    interface: &str,
) -> Option<String> {
    let out = run_checked(runner, "nmcli", &["-t", "-f", "NAME,DEVICE", "connection", "show"])
        .map_err(|e| warn!("Network: listing connections failed: {}", e))
        .ok()?;
    let name = connection_for_device(&out, interface);
    if name.is_none() {
        debug!("Network: no connection on {}", interface);
    }
    name
}

/// Pick the connection name for `interface` from `nmcli -t` output.
///
/// Terse mode escapes `:` inside names as `\:`.
pub fn connection_for_device(output: &str, interface: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (name, device) = line.rsplit_once(':')?;
        (device.trim() == interface).then(|| unescape_terse(name))
    })
}

/// Undo `nmcli -t`/`-g` escaping (`\:` and `\\`).
pub fn unescape_terse(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            c => out.push(c),
        }
    }
    out
}

pub fn ssid<R: CommandRunner + ?Sized>(runner: &mut R, access_point: &str) -> Option<String> {
    run_checked(
        runner,
        "nmcli",
        &["-g", "802-11-wireless.ssid", "connection", "show", access_point],
    )
    .map_err(|e| warn!("Network: reading SSID failed: {}", e))
    .ok()
    .map(|s| unescape_terse(s.trim()))
    .filter(|s| !s.is_empty())
}

/// PSK from the connection's keyfile (root-only, read through sudo).
pub fn password<R: CommandRunner + ?Sized>(
    runner: &mut R,
    connections_dir: &Path,
    access_point: &str,
) -> Option<String> {
    let keyfile = connections_dir.join(format!("{access_point}.nmconnection"));
    let keyfile = keyfile.to_string_lossy();
    let content = run_checked(runner, "sudo", &["cat", &keyfile])
        .map_err(|e| warn!("Network: reading {} failed: {}", keyfile, e))
        .ok()?;
    parse_psk(&content)
}

pub fn parse_psk(keyfile: &str) -> Option<String> {
    keyfile
        .lines()
        .find_map(|line| line.trim().strip_prefix("psk="))
        .map(|psk| psk.trim().to_owned())
}

pub fn local_ip<R: CommandRunner + ?Sized>(runner: &mut R, interface: &str) -> Option<String> {
    let out = run_checked(runner, "ip", &["-o", "-4", "addr", "show", interface])
        .map_err(|e| warn!("Network: reading {} address failed: {}", interface, e))
        .ok()?;
    parse_ipv4(&out)
}

/// Address from `ip -o -4 addr show` (4th field, prefix length dropped).
pub fn parse_ipv4(output: &str) -> Option<String> {
    let cidr = output.split_whitespace().nth(3)?;
    cidr.split('/').next().map(str::to_owned)
}

impl NetworkInfo {
    /// Wi-Fi join payload (`WIFI:S:..;T:WPA;P:..;;`) for the QR code.
    pub fn wifi_qr_payload(&self) -> Option<String> {
        let ssid = self.ssid.as_deref()?;
        let password = self.password.as_deref().unwrap_or("");
        Some(format!(
            "WIFI:S:{};T:WPA;P:{};;",
            escape_qr_field(ssid),
            escape_qr_field(password)
        ))
    }
}

fn escape_qr_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
