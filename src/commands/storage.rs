use crate::cli::{Cli, Commands, StorageCommands};
use crate::config::Settings;
use crate::domain::models::SizeBand;
use crate::services::output::{print_one, print_out, row};
use crate::services::storage::Storage;
use crate::session::Session;

pub fn handle_storage_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    let Commands::Storage { command } = &cli.command else {
        return Ok(false);
    };

    let session = Session::connect(settings)?;
    let mut storage = Storage::new(&session);

    match command {
        StorageCommands::Pdisks { by_size } => {
            if *by_size {
                let bands: Vec<SizeBand> = storage
                    .pdisks_by_size()?
                    .into_iter()
                    .map(|(size_gb, disks)| SizeBand { size_gb, disks })
                    .collect();
                print_out(cli.json, &bands, |band| {
                    let mut out = format!("~{} GB:", band.size_gb);
                    for disk in &band.disks {
                        out.push_str(&format!(
                            "\n    {}\t{}\t{}",
                            disk.dkey,
                            disk.field("state"),
                            disk.field("size")
                        ));
                    }
                    out
                })?;
            } else {
                let disks = storage.pdisks()?.to_vec();
                print_out(cli.json, &disks, |d| {
                    row(&[
                        d.dkey.as_str(),
                        d.field("state"),
                        d.field("status"),
                        d.field("mediatype"),
                        d.field("size"),
                    ])
                })?;
            }
        }
        StorageCommands::Vdisks => {
            let disks = storage.vdisks()?.to_vec();
            print_out(cli.json, &disks, |d| {
                row(&[
                    d.dkey.as_str(),
                    d.field("name"),
                    d.field("state"),
                    d.field("layout"),
                    d.field("size"),
                ])
            })?;
        }
        StorageCommands::CreateVd { name, raid, disks } => {
            let members: Vec<_> = {
                let all = storage.pdisks()?;
                let mut members = Vec::new();
                for dkey in disks {
                    let disk = all
                        .iter()
                        .find(|d| &d.dkey == dkey || &d.disk == dkey)
                        .ok_or_else(|| anyhow::anyhow!("physical disk not found: {dkey}"))?;
                    members.push(disk.clone());
                }
                members
            };
            let output = storage.create_vd(name, raid, &members)?;
            print_one(cli.json, output, |o| o.clone())?;
        }
        StorageCommands::DeleteVd { vdkey } => {
            let output = storage.delete_vd(vdkey)?;
            print_one(cli.json, output, |o| o.clone())?;
        }
        StorageCommands::Hotspare { vdkey, pdkey } => {
            let output = storage.assign_hotspare(vdkey, pdkey)?;
            print_one(cli.json, output, |o| o.clone())?;
        }
        StorageCommands::Reset { controller } => {
            storage.reset_controller(controller)?;
            print_one(cli.json, controller.clone(), |c| {
                format!("controller {c} configuration destroyed")
            })?;
        }
        StorageCommands::Profile { profile } => {
            let report = storage.apply_profile(profile)?;
            print_one(cli.json, report, |r| {
                let mut line = format!(
                    "profile {} applied: vdisks {}",
                    r.profile,
                    r.created_vdisks.join(", ")
                );
                if let Some(hotspare) = &r.hotspare {
                    line.push_str(&format!(" (hotspare {hotspare})"));
                }
                line
            })?;
        }
    }
    Ok(true)
}
