//! Removable USB volumes - discovery, mount and unmount.
//!
//! Only FAT/exFAT volumes larger than 1 GB are offered. Mounting a volume
//! also records it in fstab (`nofail`) so it comes back after a reboot;
//! unmounting removes that entry again.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use super::runner::{run_checked, run_checked_with_input, CommandRunner};
use super::{HostConfig, Volume};
use crate::config::SUPPORTED_FILESYSTEMS;
use crate::error::EffectError;

/// `lsblk` invocation: no header, flat list, fixed columns.
pub const LSBLK_ARGS: &[&str] = &["-n", "-l", "-o", "NAME,SIZE,FSTYPE,MOUNTPOINT"];

/// List supported volumes. Failures are logged and yield an empty list.
pub fn list_volumes<R: CommandRunner + ?Sized>(runner: &mut R) -> Vec<Volume> {
    match run_checked(runner, "lsblk", LSBLK_ARGS) {
        Ok(out) => parse_lsblk(&out),
        Err(e) => {
            error!("USB: listing block devices failed: {}", e);
            Vec::new()
        }
    }
}

/// Parse `lsblk -n -l -o NAME,SIZE,FSTYPE,MOUNTPOINT` output.
pub fn parse_lsblk(output: &str) -> Vec<Volume> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return None;
            }
            let (size, filesystem) = (parts[1], parts[2]);
            if !size_is_large(size) || !SUPPORTED_FILESYSTEMS.contains(&filesystem) {
                return None;
            }
            let mount_point = if parts.len() > 3 {
                Some(parts[3..].join(" "))
            } else {
                None
            };
            Some(Volume {
                name: parts[0]
                    .trim_start_matches(|c: char| matches!(c, '└' | '├' | '─' | '│' | '`' | '|' | '-'))
                    .to_owned(),
                size_label: size.to_owned(),
                filesystem: filesystem.to_owned(),
                mount_point,
            })
        })
        .collect()
}

/// `true` for sizes in G/T with a numeric part above 1 (`1.5G`, `2T`).
fn size_is_large(size: &str) -> bool {
    let Some(number) = size.strip_suffix('G').or_else(|| size.strip_suffix('T')) else {
        return false;
    };
    number.replace(',', ".").parse::<f64>().map(|n| n > 1.0).unwrap_or(false)
}

/// Where volume `index` is mounted by [`toggle`].
pub fn mount_point_for(mount_root: &Path, index: usize) -> PathBuf {
    mount_root.join(format!("usb{index}"))
}

/// fstab line for a volume mounted by this appliance.
pub fn fstab_entry(volume: &Volume, mount_point: &str) -> String {
    format!(
        "{}\t{}\t{}\tnofail\t0\t2",
        volume.device_path(),
        mount_point,
        volume.filesystem
    )
}

/// Drop every fstab line that mounts `device` on `mount_point`.
///
/// Returns `None` when no line matched.
pub fn strip_fstab_entry(fstab: &str, device: &str, mount_point: &str) -> Option<String> {
    let mut kept = String::with_capacity(fstab.len());
    let mut removed = false;
    for line in fstab.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() == Some(device) && fields.next() == Some(mount_point) {
            removed = true;
            continue;
        }
        kept.push_str(line);
        kept.push('\n');
    }
    removed.then_some(kept)
}

/// Mount or unmount the volume currently listed at `index`.
pub fn toggle<R: CommandRunner + ?Sized>(
    runner: &mut R,
    config: &HostConfig,
    index: usize,
) -> Result<(), EffectError> {
    let volumes = list_volumes(runner);
    let volume = volumes.get(index).ok_or(EffectError::NoSuchVolume(index))?;

    match &volume.mount_point {
        Some(mount_point) => unmount(runner, config, volume, mount_point),
        None => mount(runner, config, volume, index),
    }
}

fn mount<R: CommandRunner + ?Sized>(
    runner: &mut R,
    config: &HostConfig,
    volume: &Volume,
    index: usize,
) -> Result<(), EffectError> {
    let target = mount_point_for(&config.mount_root, index);
    let target = target.to_string_lossy();
    let device = volume.device_path();
    let fstab = config.fstab.to_string_lossy();

    run_checked(runner, "sudo", &["mkdir", "-p", &target])?;
    run_checked(runner, "sudo", &["mount", &device, &target])?;

    let entry = format!("{}\n", fstab_entry(volume, &target));
    run_checked_with_input(runner, "sudo", &["tee", "-a", &fstab], Some(entry.as_str()))?;

    info!("USB: mounted {} on {}", device, target);
    Ok(())
}

fn unmount<R: CommandRunner + ?Sized>(
    runner: &mut R,
    config: &HostConfig,
    volume: &Volume,
    mount_point: &str,
) -> Result<(), EffectError> {
    let device = volume.device_path();

    run_checked(runner, "sudo", &["umount", mount_point])?;

    if let Err(e) = run_checked(runner, "sudo", &["rmdir", mount_point]) {
        warn!("USB: leaving mount point {} in place: {}", mount_point, e);
    }

    let current = fs::read_to_string(&config.fstab)?;
    if let Some(cleaned) = strip_fstab_entry(&current, &device, mount_point) {
        let fstab = config.fstab.to_string_lossy();
        run_checked_with_input(runner, "sudo", &["tee", &fstab], Some(cleaned.as_str()))?;
    }

    info!("USB: unmounted {} from {}", device, mount_point);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::runner::scripted::ScriptedRunner;

    const LSBLK: &str = "\
mmcblk0      29.7G
mmcblk0p1     256M vfat   /boot/firmware
mmcblk0p2    29.5G ext4   /
sda          14.9G
sda1         14.9G vfat
sdb         931.5G
sdb1        931.5G exfat  /mnt/usb1
sdc           1.0G
sdc1          1.0G vfat
";

    fn config(root: &Path) -> HostConfig {
        HostConfig {
            fstab: root.join("fstab"),
            mount_root: PathBuf::from("/mnt"),
            ..HostConfig::default()
        }
    }

    #[test]
    fn parse_keeps_large_fat_volumes_only() {
        let volumes = parse_lsblk(LSBLK);
        assert_eq!(volumes.len(), 2);

        assert_eq!(volumes[0].name, "sda1");
        assert_eq!(volumes[0].size_label, "14.9G");
        assert_eq!(volumes[0].filesystem, "vfat");
        assert!(!volumes[0].is_mounted());

        assert_eq!(volumes[1].name, "sdb1");
        assert_eq!(volumes[1].mount_point.as_deref(), Some("/mnt/usb1"));
    }

    #[test]
    fn parse_strips_tree_glyphs_and_keeps_spaced_mount_points() {
        let volumes = parse_lsblk("└─sda1 2T exfat /media/My Stick\n");
        assert_eq!(volumes[0].name, "sda1");
        assert_eq!(volumes[0].mount_point.as_deref(), Some("/media/My Stick"));
    }

    #[test]
    fn size_filter_matches_gigabytes_above_one() {
        assert!(size_is_large("1.5G"));
        assert!(size_is_large("2T"));
        assert!(size_is_large("7,5G"));
        assert!(!size_is_large("1G"));
        assert!(!size_is_large("512M"));
        assert!(!size_is_large("SIZE"));
    }

    #[test]
    fn fstab_entry_is_tab_separated() {
        let v = Volume {
            name: "sda1".into(),
            size_label: "14.9G".into(),
            filesystem: "vfat".into(),
            mount_point: None,
        };
        assert_eq!(fstab_entry(&v, "/mnt/usb0"), "/dev/sda1\t/mnt/usb0\tvfat\tnofail\t0\t2");
    }

    #[test]
    fn strip_removes_only_matching_entry() {
        let fstab = "proc /proc proc defaults 0 0\n\
                     /dev/sda1\t/mnt/usb0\tvfat\tnofail\t0\t2\n\
                     /dev/sda1 /srv vfat defaults 0 2\n";
        let cleaned = strip_fstab_entry(fstab, "/dev/sda1", "/mnt/usb0");
        assert_eq!(
            cleaned.as_deref(),
            Some("proc /proc proc defaults 0 0\n/dev/sda1 /srv vfat defaults 0 2\n")
        );
    }

    #[test]
    fn strip_without_match_reports_nothing_removed() {
        let fstab = "proc /proc proc defaults 0 0";
        assert_eq!(strip_fstab_entry(fstab, "/dev/sda1", "/mnt/usb0"), None);
    }

    #[test]
    fn unmount_leaves_unrelated_fstab_alone() {
        let dir = tempfile::tempdir().unwrap();
        // No trailing newline and no entry for the volume.
        fs::write(dir.path().join("fstab"), "proc /proc proc defaults 0 0").unwrap();
        let mut runner = ScriptedRunner::new().respond("lsblk", LSBLK);

        toggle(&mut runner, &config(dir.path()), 1).unwrap();

        assert!(!runner.lines().iter().any(|l| l.starts_with("sudo tee")));
    }

    #[test]
    fn toggle_mounts_unmounted_volume() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ScriptedRunner::new().respond("lsblk", LSBLK);

        toggle(&mut runner, &config(dir.path()), 0).unwrap();

        let tee = format!("sudo tee -a {}", dir.path().join("fstab").display());
        assert_eq!(
            runner.lines()[1..],
            [
                "sudo mkdir -p /mnt/usb0",
                "sudo mount /dev/sda1 /mnt/usb0",
                tee.as_str(),
            ]
        );
        assert_eq!(
            runner.calls[3].stdin.as_deref(),
            Some("/dev/sda1\t/mnt/usb0\tvfat\tnofail\t0\t2\n")
        );
    }

    #[test]
    fn toggle_unmounts_and_cleans_fstab() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("fstab"),
            "proc /proc proc defaults 0 0\n/dev/sdb1\t/mnt/usb1\texfat\tnofail\t0\t2\n",
        )
        .unwrap();
        let mut runner = ScriptedRunner::new().respond("lsblk", LSBLK);

        toggle(&mut runner, &config(dir.path()), 1).unwrap();

        let lines = runner.lines();
        assert_eq!(lines[1], "sudo umount /mnt/usb1");
        assert_eq!(lines[2], "sudo rmdir /mnt/usb1");
        assert!(lines[3].starts_with("sudo tee "));
        assert_eq!(
            runner.calls[3].stdin.as_deref(),
            Some("proc /proc proc defaults 0 0\n")
        );
    }

    #[test]
    fn failed_mount_does_not_touch_fstab() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ScriptedRunner::new()
            .respond("lsblk", LSBLK)
            .fail("sudo mount", 32, "mount: wrong fs type");

        let err = toggle(&mut runner, &config(dir.path()), 0).unwrap_err();

        assert!(matches!(err, EffectError::CommandFailed { status: 32, .. }));
        assert!(!runner.lines().iter().any(|l| l.starts_with("sudo tee")));
    }

    #[test]
    fn stale_index_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ScriptedRunner::new().respond("lsblk", LSBLK);
        let err = toggle(&mut runner, &config(dir.path()), 5).unwrap_err();
        assert!(matches!(err, EffectError::NoSuchVolume(5)));
    }

    #[test]
    fn lsblk_failure_lists_nothing() {
        let mut runner = ScriptedRunner::new().fail("lsblk", 1, "boom");
        assert!(list_volumes(&mut runner).is_empty());
    }
}
