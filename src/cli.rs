use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dractl", version, about = "Dell iDRAC management CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "DRACTL_ENDPOINT",
        help = "iDRAC address (hostname or IP)"
    )]
    pub endpoint: Option<String>,
    #[arg(long, global = true, env = "DRACTL_USER", help = "iDRAC account name")]
    pub user: Option<String>,
    #[arg(
        long,
        global = true,
        env = "DRACTL_PASSWORD",
        hide_env_values = true,
        help = "iDRAC account password"
    )]
    pub password: Option<String>,
    #[arg(long, global = true, help = "racadm executable to drive")]
    pub racadm_bin: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Config file (default ~/.config/dractl/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hardware inventory read from the iDRAC
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
    /// BIOS and iDRAC configuration registries
    Bios {
        #[command(subcommand)]
        command: BiosCommands,
    },
    /// RAID controller and disk management
    Storage {
        #[command(subcommand)]
        command: StorageCommands,
    },
    /// iDRAC job queue
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// System event log
    Sel {
        #[command(subcommand)]
        command: SelCommands,
    },
    /// Server power control (racadm serveraction)
    Power {
        #[arg(value_enum)]
        action: PowerAction,
    },
    /// Firmware versions and repository updates
    Update {
        #[command(subcommand)]
        command: UpdateCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommands {
    /// Human summary of the machine (model, CPUs, memory, disks...)
    Show {
        #[arg(long, help = "Skip per-device detail sections")]
        brief: bool,
    },
    /// Raw inventory records of one device type
    Devices {
        #[arg(long, help = "Device type (System, CPU, Memory, NIC, PowerSupply...)")]
        device_type: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BiosCommands {
    /// Read a configuration group as key/value pairs
    Get { group: String },
    /// Stage a configuration change (validated now, committed later)
    Set {
        group: String,
        key: String,
        value: String,
    },
    /// Show staged changes across all groups
    Pending,
    /// Drop all staged changes for this endpoint
    Discard,
    /// Write staged changes and schedule the BIOS setup job
    Commit {
        #[arg(long, help = "Do not wait for the setup job to finish")]
        no_wait: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum StorageCommands {
    /// List physical disks
    Pdisks {
        #[arg(long, help = "Group disks into 10 GB size bands")]
        by_size: bool,
    },
    /// List virtual disks
    Vdisks,
    /// Create a RAID virtual disk
    CreateVd {
        name: String,
        #[arg(long, help = "RAID level (r0, r1, r5, r10...)")]
        raid: String,
        #[arg(long, value_delimiter = ',', help = "Member physical disk keys")]
        disks: Vec<String>,
    },
    /// Delete a virtual disk
    DeleteVd { vdkey: String },
    /// Assign a dedicated hotspare to a virtual disk
    Hotspare { vdkey: String, pdkey: String },
    /// Destroy the controller configuration and wait for the job
    Reset { controller: String },
    /// Apply a canned disk layout
    Profile {
        #[arg(value_enum)]
        profile: StorageProfile,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Create the pending job queue for a unit
    Run {
        unit: String,
        #[arg(long, help = "Poll until the job completes or fails")]
        wait: bool,
        #[arg(long, help = "Schedule at next reboot instead of realtime")]
        scheduled: bool,
    },
    /// Show one job record
    View { jid: String },
}

#[derive(Subcommand, Debug)]
pub enum SelCommands {
    /// List system event log entries
    List {
        #[arg(long, help = "Keep only these severities (repeatable)")]
        severity: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UpdateCommands {
    /// Firmware versions currently installed
    Versions,
    /// Show the staged update comparison report
    Report,
    /// Stage (and optionally apply) updates from a Dell repository
    Firmware {
        #[arg(long, help = "Update repository host or URL")]
        repository: String,
        #[arg(long, default_value = "Catalog.xml.gz", help = "Catalog file name")]
        catalog: String,
        #[arg(long, help = "Apply the updates instead of only comparing")]
        apply: bool,
        #[arg(long, help = "Reboot if an update requires it")]
        reboot: bool,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    Powerup,
    Powerdown,
    Powercycle,
    Hardreset,
    Graceshutdown,
    Powerstatus,
}

impl PowerAction {
    pub fn as_racadm_arg(&self) -> &'static str {
        match self {
            PowerAction::Powerup => "powerup",
            PowerAction::Powerdown => "powerdown",
            PowerAction::Powercycle => "powercycle",
            PowerAction::Hardreset => "hardreset",
            PowerAction::Graceshutdown => "graceshutdown",
            PowerAction::Powerstatus => "powerstatus",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageProfile {
    /// system RAID1 (2 smallest) + data RAID5 (largest, 1 hotspare)
    Default,
    /// system RAID1 (2 smallest) only
    Nodata,
    /// system + logtemp RAID1 pairs + data RAID5 with hotspare
    Database,
    /// every non-system disk exposed as single-disk RAID0
    Passthrough,
}
