use crate::cli::{Cli, Commands, JobCommands, UpdateCommands};
use crate::config::Settings;
use crate::domain::models::JobRunReport;
use crate::services::output::{print_one, print_out, row};
use crate::services::{jobs, updates};
use crate::session::Session;

pub fn handle_maintenance_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Job { command } => {
            let session = Session::connect(settings)?;
            match command {
                JobCommands::Run {
                    unit,
                    wait,
                    scheduled,
                } => {
                    let report = if *wait {
                        let job = jobs::run_and_wait(&session, unit, !scheduled)?;
                        JobRunReport {
                            unit: unit.clone(),
                            status: Some(job.status().to_string()),
                            jid: job.jid,
                        }
                    } else {
                        JobRunReport {
                            unit: unit.clone(),
                            jid: jobs::run(&session, unit, !scheduled)?,
                            status: None,
                        }
                    };
                    print_one(cli.json, report, |r| match &r.status {
                        Some(status) => format!("{} -> {} ({})", r.unit, r.jid, status),
                        None => format!("{} -> {}", r.unit, r.jid),
                    })?;
                }
                JobCommands::View { jid } => {
                    let job = jobs::view(&session, jid)?;
                    print_one(cli.json, job, |j| {
                        let mut out = format!("job {}", j.jid);
                        for (key, value) in &j.fields {
                            out.push_str(&format!("\n    {key} = {value}"));
                        }
                        out
                    })?;
                }
            }
        }
        Commands::Update { command } => {
            let session = Session::connect(settings)?;
            match command {
                UpdateCommands::Versions => {
                    let versions = updates::versions(&session)?;
                    print_out(cli.json, &versions, |v| {
                        row(&[v.component.as_str(), v.version.as_str()])
                    })?;
                }
                UpdateCommands::Report => {
                    let items = updates::report(&session)?;
                    print_out(cli.json, &items, |i| {
                        row(&[
                            i.component.as_str(),
                            &format!("{} -> {}", i.current_version, i.available_version),
                            i.criticality.as_deref().unwrap_or("n/a"),
                        ])
                    })?;
                }
                UpdateCommands::Firmware {
                    repository,
                    catalog,
                    apply,
                    reboot,
                } => {
                    let output =
                        updates::repository_update(&session, repository, catalog, *apply, *reboot)?;
                    print_one(cli.json, output, |o| o.clone())?;
                }
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}
