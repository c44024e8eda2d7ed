//! Firmware versions and repository updates (`racadm getversion` /
//! `racadm update ...`).

use crate::domain::models::{FirmwareVersion, UpdateItem};
use crate::session::Session;
use tracing::info;

pub fn parse_versions(output: &str) -> Vec<FirmwareVersion> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(component, version)| FirmwareVersion {
            component: component.trim().to_string(),
            version: version.trim().to_string(),
        })
        .collect()
}

/// Parse `update viewreport` output: blank-line separated blocks of
/// `Key = Value` pairs, one block per updatable component.
pub fn parse_report(output: &str) -> Vec<UpdateItem> {
    let mut items = Vec::new();
    let mut component = None;
    let mut current = None;
    let mut available = None;
    let mut criticality: Option<String> = None;

    let mut flush = |component: &mut Option<String>,
                     current: &mut Option<String>,
                     available: &mut Option<String>,
                     criticality: &mut Option<String>| {
        if let (Some(c), Some(cur), Some(avail)) = (component.take(), current.take(), available.take())
        {
            items.push(UpdateItem {
                component: c,
                current_version: cur,
                available_version: avail,
                criticality: criticality.take(),
            });
        }
        criticality.take();
    };

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            flush(&mut component, &mut current, &mut available, &mut criticality);
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim() {
            "ComponentName" | "ElementName" => component = Some(value),
            "Current Version" => current = Some(value),
            "Available Version" => available = Some(value),
            "Criticality" => criticality = Some(value),
            _ => {}
        }
    }
    flush(&mut component, &mut current, &mut available, &mut criticality);
    items
}

pub fn versions(session: &Session) -> anyhow::Result<Vec<FirmwareVersion>> {
    let output = session.exec("getversion")?;
    Ok(parse_versions(&output))
}

pub fn report(session: &Session) -> anyhow::Result<Vec<UpdateItem>> {
    let output = session.exec("update viewreport")?;
    Ok(parse_report(&output))
}

/// Stage a repository-based comparison, or apply the updates when `apply`.
pub fn repository_update(
    session: &Session,
    repository: &str,
    catalog: &str,
    apply: bool,
    reboot: bool,
) -> anyhow::Result<String> {
    info!(
        "staging repository update from {} ({}apply)",
        repository,
        if apply { "" } else { "no " }
    );
    let mut command = format!(
        "update -f {} -e {} -t HTTP -a {}",
        catalog,
        repository,
        if apply { "TRUE" } else { "FALSE" }
    );
    if apply && reboot {
        command.push_str(" --reboot");
    }
    session.exec(&command)
}
