//! Hardware inventory (`racadm hwinventory`).
//!
//! Output is a sequence of records delimited by blank lines or dashed rules;
//! each record opens with `[InstanceID: <id>]` and continues with
//! `Key = Value` lines. Records are cached for the session lifetime.

use crate::domain::models::{
    ControllerInfo, CpuInfo, DimmInfo, EnclosureDiskInfo, EnclosureInfo, InventoryDetails,
    InventoryRecord, InventorySummary, SlotUsage,
};
use crate::session::{RacError, Session};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::debug;

const BYTES_PER_GB: u64 = 1_073_741_824;

pub fn parse_hwinventory(output: &str) -> Vec<InventoryRecord> {
    let mut records = Vec::new();
    let mut instance: Option<String> = None;
    let mut attrs: BTreeMap<String, String> = BTreeMap::new();

    let mut flush = |instance: &mut Option<String>, attrs: &mut BTreeMap<String, String>| {
        if let Some(id) = instance.take() {
            if !attrs.is_empty() {
                records.push(InventoryRecord {
                    instance_id: id,
                    attrs: std::mem::take(attrs),
                });
                return;
            }
        }
        attrs.clear();
    };

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("-------") {
            flush(&mut instance, &mut attrs);
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("[InstanceID: ") {
            flush(&mut instance, &mut attrs);
            instance = Some(rest.trim_end_matches(']').to_string());
        } else if instance.is_some() {
            match trimmed.split_once('=') {
                Some((key, value)) => {
                    attrs.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => debug!("skipping inventory line: {}", trimmed),
            }
        }
    }
    flush(&mut instance, &mut attrs);
    records
}

pub struct Inventory<'a> {
    session: &'a Session,
    records: Option<Vec<InventoryRecord>>,
}

impl<'a> Inventory<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            records: None,
        }
    }

    pub fn load(&mut self) -> anyhow::Result<&[InventoryRecord]> {
        if self.records.is_none() {
            let output = self.session.exec("hwinventory")?;
            self.records = Some(parse_hwinventory(&output));
        }
        Ok(self.records.as_deref().unwrap_or_default())
    }

    pub fn device_type(&mut self, device_type: &str) -> anyhow::Result<Vec<InventoryRecord>> {
        Ok(self
            .load()?
            .iter()
            .filter(|r| r.device_type() == device_type)
            .cloned()
            .collect())
    }

    pub fn system(&mut self) -> anyhow::Result<InventoryRecord> {
        self.device_type("System")?
            .into_iter()
            .next()
            .ok_or_else(|| RacError::Parse("no System record in hwinventory".to_string()).into())
    }

    pub fn raid_controllers(&mut self) -> anyhow::Result<Vec<InventoryRecord>> {
        Ok(self
            .device_type("PCIDevice")?
            .into_iter()
            .filter(|d| d.instance_id.starts_with("RAID."))
            .collect())
    }

    pub fn enclosure_disks(&mut self, enclosure_id: &str) -> anyhow::Result<Vec<InventoryRecord>> {
        Ok(self
            .device_type("PhysicalDisk")?
            .into_iter()
            .filter(|d| d.instance_id.ends_with(enclosure_id))
            .collect())
    }

    pub fn summary(&mut self) -> anyhow::Result<InventorySummary> {
        let system = self.system()?;
        let psu_count = self.device_type("PowerSupply")?.len();
        Ok(InventorySummary {
            model: system.attr("Model").to_string(),
            chassis_height: system.attr("ChassisSystemHeight").to_string(),
            service_tag: system.attr("ServiceTag").to_string(),
            hostname: system.attr("HostName").to_string(),
            cpu_sockets: SlotUsage {
                populated: system.attr("PopulatedCPUSockets").to_string(),
                max: system.attr("MaxCPUSockets").to_string(),
            },
            dimm_slots: SlotUsage {
                populated: system.attr("PopulatedDIMMSlots").to_string(),
                max: system.attr("MaxDIMMSlots").to_string(),
            },
            installed_memory: system.attr("SysMemTotalSize").to_string(),
            max_memory: system.attr("SysMemMaxCapacitySize").to_string(),
            psu_count,
        })
    }

    pub fn details(&mut self) -> anyhow::Result<InventoryDetails> {
        let cpus = self
            .device_type("CPU")?
            .iter()
            .map(|cpu| CpuInfo {
                description: cpu.attr("DeviceDescription").to_string(),
                model: cpu.attr("Model").to_string(),
                cores: cpu.attr("NumberOfEnabledCores").to_string(),
                threads: cpu.attr("NumberOfEnabledThreads").to_string(),
            })
            .collect();
        let memory = self
            .device_type("Memory")?
            .iter()
            .map(|mem| DimmInfo {
                description: mem.attr("DeviceDescription").to_string(),
                size: mem.attr("Size").to_string(),
                model: mem.attr("Model").to_string(),
                speed: mem.attr("Speed").to_string(),
                rank: mem.attr("Rank").to_string(),
            })
            .collect();
        let nics = self
            .device_type("NIC")?
            .iter()
            .map(|nic| nic.attr("ProductName").to_string())
            .collect();
        let raid_controllers = self
            .raid_controllers()?
            .iter()
            .map(|dev| ControllerInfo {
                description: dev.attr("Description").to_string(),
                device_description: dev.attr("DeviceDescription").to_string(),
            })
            .collect();

        let mut enclosures = Vec::new();
        for encl in self.device_type("Enclosure")? {
            let disks = self
                .enclosure_disks(&encl.instance_id)?
                .iter()
                .map(|disk| EnclosureDiskInfo {
                    form_factor: disk.attr("DriveFormFactor").to_string(),
                    media_type: disk.attr("MediaType").to_string(),
                    serial: disk.attr("SerialNumber").to_string(),
                    manufacturer: disk.attr("Manufacturer").to_string(),
                    model: disk.attr("Model").to_string(),
                    size_gb: disk
                        .attr("SizeInBytes")
                        .split_whitespace()
                        .next()
                        .and_then(|b| b.parse::<u64>().ok())
                        .map(|b| b / BYTES_PER_GB)
                        .unwrap_or(0),
                })
                .collect();
            enclosures.push(EnclosureInfo {
                service_tag: encl.attr("ServiceTag").to_string(),
                product_name: encl.attr("ProductName").to_string(),
                device_description: encl.attr("DeviceDescription").to_string(),
                disks,
            });
        }

        Ok(InventoryDetails {
            cpus,
            memory,
            nics,
            raid_controllers,
            enclosures,
        })
    }
}

pub fn render_summary(summary: &InventorySummary) -> String {
    format!(
        "Model: {} ({})\n\
         Serial: {}\n\
         Hostname: {}\n\
         CPU slots: {} / {}\n\
         Memory slots: {} / {}\n\
         Installed memory: {} / {}\n\
         Power supply: {} psu(s)",
        summary.model,
        summary.chassis_height,
        summary.service_tag,
        summary.hostname,
        summary.cpu_sockets.populated,
        summary.cpu_sockets.max,
        summary.dimm_slots.populated,
        summary.dimm_slots.max,
        summary.installed_memory,
        summary.max_memory,
        summary.psu_count,
    )
}

pub fn render_details(details: &InventoryDetails) -> String {
    let mut out = String::from("CPUs specs:");
    for cpu in &details.cpus {
        let _ = write!(
            out,
            "\n   {} Model: {} ({}c/{}t)",
            cpu.description, cpu.model, cpu.cores, cpu.threads
        );
    }
    out.push_str("\nMemory specs:");
    for mem in &details.memory {
        let _ = write!(
            out,
            "\n    {}: {} {} @{} {}",
            mem.description, mem.size, mem.model, mem.speed, mem.rank
        );
    }
    out.push_str("\nNICs specs:");
    for nic in &details.nics {
        let _ = write!(out, "\n    {nic}");
    }
    out.push_str("\nRAID ctls:");
    for ctl in &details.raid_controllers {
        let _ = write!(out, "\n    {} {}", ctl.description, ctl.device_description);
    }
    out.push_str("\nEnclosures:");
    for encl in &details.enclosures {
        let _ = write!(
            out,
            "\n    {} - {} {}",
            encl.service_tag, encl.product_name, encl.device_description
        );
        out.push_str("\n    Disks:");
        for disk in &encl.disks {
            let _ = write!(
                out,
                "\n        {} {} {} ({} {}) - {} GB",
                disk.form_factor,
                disk.media_type,
                disk.serial,
                disk.manufacturer,
                disk.model,
                disk.size_gb
            );
        }
    }
    out
}
