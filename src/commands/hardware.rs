use crate::cli::{Cli, Commands, InventoryCommands, SelCommands};
use crate::config::Settings;
use crate::domain::models::InventoryReport;
use crate::services::inventory::{render_details, render_summary, Inventory};
use crate::services::output::{print_one, print_out, row};
use crate::services::sel;
use crate::session::Session;

pub fn handle_hardware_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Inventory { command } => {
            let session = Session::connect(settings)?;
            let mut inventory = Inventory::new(&session);
            match command {
                InventoryCommands::Show { brief } => {
                    let report = InventoryReport {
                        summary: inventory.summary()?,
                        details: if *brief {
                            None
                        } else {
                            Some(inventory.details()?)
                        },
                    };
                    print_one(cli.json, report, |r| match &r.details {
                        Some(details) => {
                            format!("{}\n{}", render_summary(&r.summary), render_details(details))
                        }
                        None => render_summary(&r.summary),
                    })?;
                }
                InventoryCommands::Devices { device_type } => {
                    let devices = inventory.device_type(device_type)?;
                    print_out(cli.json, &devices, |d| {
                        row(&[d.instance_id.as_str(), d.attr("DeviceDescription")])
                    })?;
                }
            }
        }
        Commands::Sel { command } => {
            let session = Session::connect(settings)?;
            let SelCommands::List { severity } = command;
            let events = sel::list(&session, severity)?;
            print_out(cli.json, &events, |e| {
                format!(
                    "{} {} {} {} {}",
                    e.date, e.time, e.source, e.severity, e.message
                )
            })?;
        }
        Commands::Power { action } => {
            let session = Session::connect(settings)?;
            let output = session.serveraction(action.as_racadm_arg())?;
            print_one(cli.json, output, |o| o.clone())?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
