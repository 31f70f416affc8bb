//! Publish a web template as the served index page.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use log::info;
use tempfile::NamedTempFile;

use super::runner::{run_checked, CommandRunner};
use super::{HostConfig, WebTemplate};
use crate::config::TEMPLATE_IP_PLACEHOLDER;
use crate::error::EffectError;

/// Substituted for the IP when the access point address is unknown.
const UNKNOWN_IP: &str = "Not available";

pub fn template_path(config: &HostConfig, template: WebTemplate) -> PathBuf {
    config
        .templates_dir
        .join(format!("{}.html", template.file_stem()))
}

pub fn render_template(content: &str, local_ip: &str) -> String {
    content.replace(TEMPLATE_IP_PLACEHOLDER, local_ip)
}

/// Render `template` with the access point IP and install it as the index page.
pub fn apply<R: CommandRunner + ?Sized>(
    runner: &mut R,
    config: &HostConfig,
    template: WebTemplate,
    local_ip: Option<&str>,
) -> Result<(), EffectError> {
    let path = template_path(config, template);
    let content =
        fs::read_to_string(&path).map_err(|source| EffectError::Template { path, source })?;
    let page = render_template(&content, local_ip.unwrap_or(UNKNOWN_IP));

    let mut staged = NamedTempFile::new()?;
    staged.write_all(page.as_bytes())?;
    staged.flush()?;

    let source = staged.path().to_string_lossy();
    let target = config.web_root_index.to_string_lossy();
    run_checked(runner, "sudo", &["install", "-m", "0644", &source, &target])?;

    info!("Web: published {} to {}", template.file_stem(), target);
    Ok(())
}
