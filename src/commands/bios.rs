use crate::cli::{BiosCommands, Cli, Commands};
use crate::config::Settings;
use crate::services::bios;
use crate::services::output::{envelope, print_one, print_out};
use crate::services::registry::Registry;
use crate::services::state;
use crate::session::Session;
use std::collections::BTreeMap;

pub fn handle_bios_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    let Commands::Bios { command } = &cli.command else {
        return Ok(false);
    };

    match command {
        BiosCommands::Get { group } => {
            let group = bios::resolve_group(group);
            let session = Session::connect(settings)?;
            let registry = Registry::load(&session, &group)?;
            if cli.json {
                let map: BTreeMap<&str, &str> = registry.entries().collect();
                println!("{}", envelope(map)?);
            } else {
                for (key, value) in registry.entries() {
                    let marker = if registry.is_readonly(key) { "#" } else { "" };
                    println!("{marker}{key}={value}");
                }
            }
        }
        BiosCommands::Set { group, key, value } => {
            let group = bios::resolve_group(group);
            let session = Session::connect(settings)?;
            let report = bios::stage(&session, &settings.endpoint, &group, key, value)?;
            print_one(cli.json, report, |r| {
                format!("{} {}.{}={}", r.status, r.group, r.key, r.value)
            })?;
        }
        BiosCommands::Pending => {
            let pending = state::load_pending()?;
            let entries = bios::pending_entries(&pending, &settings.endpoint);
            print_out(cli.json, &entries, |e| {
                format!("{}.{} = {}", e.group, e.key, e.value)
            })?;
        }
        BiosCommands::Discard => {
            let dropped = bios::discard(&settings.endpoint)?;
            print_one(cli.json, dropped, |n| format!("discarded {n} pending change(s)"))?;
        }
        BiosCommands::Commit { no_wait } => {
            let session = Session::connect(settings)?;
            let report = bios::commit(&session, &settings.endpoint, !no_wait)?;
            print_one(cli.json, report, |r| {
                if r.written.is_empty() {
                    "nothing to commit".to_string()
                } else {
                    let mut line = format!("wrote {}", r.written.join(", "));
                    if let Some(jid) = &r.jid {
                        line.push_str(&format!("\nscheduled {} ({jid})", bios::BIOS_SETUP_UNIT));
                    }
                    if let Some(status) = &r.job_status {
                        line.push_str(&format!("\njob finished: {status}"));
                    }
                    line
                }
            })?;
        }
    }
    Ok(true)
}
