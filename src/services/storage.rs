//! RAID controller and disk management (`racadm raid ...`).
//!
//! Disk listings are blocks opened by a disk key line (`A:B:C` for physical
//! disks, `A:B` for virtual disks) followed by `Field = Value` lines.
//! Physical and virtual disk lists are cached until an operation invalidates
//! them.

use crate::cli::StorageProfile;
use crate::domain::models::{DiskRecord, ProfileReport};
use crate::services::jobs;
use crate::session::{RacError, Session};
use std::collections::BTreeMap;
use tracing::{info, warn};

const PDISK_PROPS: &str = "Name,State,Status,MediaType,Size";
const VDISK_PROPS: &str = "Name,State,Status,MediaType,Size,Layout";

/// Policy defaults applied to every created virtual disk.
pub const VD_READ_POLICY: &str = "nra";
pub const VD_WRITE_POLICY: &str = "wt";
pub const VD_STRIPE_SIZE: &str = "1M";

/// Disks within this span (GB) land in the same size band.
const SIZE_BAND_SPAN_GB: f64 = 10.0;

pub fn parse_disks(output: &str) -> anyhow::Result<Vec<DiskRecord>> {
    let mut disks: Vec<DiskRecord> = Vec::new();
    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.contains('=') {
            let parts: Vec<&str> = trimmed.splitn(3, ':').collect();
            let record = match parts.as_slice() {
                // physical disks carry enclosure information
                [disk, enclosure, controller] => DiskRecord {
                    dkey: trimmed.to_string(),
                    disk: disk.to_string(),
                    enclosure: Some(enclosure.to_string()),
                    controller: controller.to_string(),
                    fields: BTreeMap::new(),
                },
                [disk, controller] => DiskRecord {
                    dkey: trimmed.to_string(),
                    disk: disk.to_string(),
                    enclosure: None,
                    controller: controller.to_string(),
                    fields: BTreeMap::new(),
                },
                _ => return Err(RacError::Parse(format!("disk key: {trimmed}")).into()),
            };
            disks.push(record);
        } else {
            let (Some(last), Some((name, value))) = (disks.last_mut(), trimmed.split_once('='))
            else {
                return Err(RacError::Parse(format!("disk field: {trimmed}")).into());
            };
            last.fields
                .insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    Ok(disks)
}

/// Group disks into size bands with a 10 GB tolerance.
pub fn band_by_size(disks: &[DiskRecord]) -> BTreeMap<u64, Vec<DiskRecord>> {
    let mut bands: BTreeMap<u64, Vec<DiskRecord>> = BTreeMap::new();
    for disk in disks {
        let Some(size) = disk.size_gb() else {
            warn!("disk {} has no parseable size", disk.dkey);
            continue;
        };
        let band = bands
            .keys()
            .copied()
            .find(|&known| (size - known as f64).abs() < SIZE_BAND_SPAN_GB)
            .unwrap_or(size as u64);
        bands.entry(band).or_default().push(disk.clone());
    }
    bands
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Smallest,
    Largest,
}

pub struct Storage<'a> {
    session: &'a Session,
    pdisks: Option<Vec<DiskRecord>>,
    vdisks: Option<Vec<DiskRecord>>,
}

impl<'a> Storage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            pdisks: None,
            vdisks: None,
        }
    }

    /// Run a storage command; everything is prefixed with `raid`.
    fn r_exec(&self, command: &str, retries: u32, ignore_errors: bool) -> anyhow::Result<String> {
        self.session
            .exec_opts(&format!("raid {command}"), retries, ignore_errors)
    }

    fn exec(&self, command: &str) -> anyhow::Result<String> {
        self.r_exec(command, 3, false)
    }

    pub fn pdisks(&mut self) -> anyhow::Result<&[DiskRecord]> {
        if self.pdisks.is_none() {
            let output = self.exec(&format!("get pdisks -o -p {PDISK_PROPS}"))?;
            self.pdisks = Some(parse_disks(&output)?);
        }
        Ok(self.pdisks.as_deref().unwrap_or_default())
    }

    pub fn vdisks(&mut self) -> anyhow::Result<&[DiskRecord]> {
        if self.vdisks.is_none() {
            // listing vdisks on a machine without any returns an error
            self.vdisks = Some(match self.exec(&format!("get vdisks -o -p {VDISK_PROPS}")) {
                Ok(output) => parse_disks(&output)?,
                Err(_) => Vec::new(),
            });
        }
        Ok(self.vdisks.as_deref().unwrap_or_default())
    }

    pub fn get_vdisk(&mut self, name: &str) -> anyhow::Result<Option<DiskRecord>> {
        Ok(self
            .vdisks()?
            .iter()
            .find(|vd| vd.field("name") == name)
            .cloned())
    }

    pub fn pdisks_by_size(&mut self) -> anyhow::Result<BTreeMap<u64, Vec<DiskRecord>>> {
        Ok(band_by_size(self.pdisks()?))
    }

    pub fn has_foreign_disks(&mut self) -> anyhow::Result<bool> {
        Ok(self.pdisks()?.iter().any(|d| d.field("state") == "Foreign"))
    }

    pub fn select_pdisks(&mut self, class: SizeClass) -> anyhow::Result<Vec<DiskRecord>> {
        let bands = self.pdisks_by_size()?;
        let band = match class {
            SizeClass::Smallest => bands.into_iter().next(),
            SizeClass::Largest => bands.into_iter().next_back(),
        };
        Ok(band.map(|(_, disks)| disks).unwrap_or_default())
    }

    pub fn convert_to_raid(&self, pdkey: &str) -> anyhow::Result<String> {
        info!("converting Non-Raid disk: {}", pdkey);
        self.exec(&format!("converttoraid:{pdkey}"))
    }

    pub fn create_vd(
        &mut self,
        name: &str,
        raid_level: &str,
        disks: &[DiskRecord],
    ) -> anyhow::Result<String> {
        anyhow::ensure!(!disks.is_empty(), "no member disks for vdisk {name}");
        info!("registering '{}' virtual disk creation job", name);
        info!("member disks:");
        for disk in disks {
            info!(
                "  {} ({}) - {}",
                disk.dkey,
                disk.field("mediatype"),
                disk.field("size")
            );
        }

        for disk in disks {
            if disk.field("state") == "Non-Raid" {
                self.convert_to_raid(&disk.dkey)?;
            }
        }

        self.vdisks = None;
        let pdkeys: Vec<&str> = disks.iter().map(|d| d.dkey.as_str()).collect();
        self.exec(&format!(
            "createvd:{} -name {} -rl {} -rp {} -wp {} -ss {} -pdkey:{}",
            disks[0].controller,
            name,
            raid_level,
            VD_READ_POLICY,
            VD_WRITE_POLICY,
            VD_STRIPE_SIZE,
            pdkeys.join(",")
        ))
    }

    pub fn delete_vd(&mut self, vdkey: &str) -> anyhow::Result<String> {
        self.vdisks = None;
        warn!("deleting vdisk {}", vdkey);
        self.exec(&format!("deletevd:{vdkey}"))
    }

    pub fn assign_hotspare(&self, vdkey: &str, pdkey: &str) -> anyhow::Result<String> {
        info!("assigning hotspare {} to {}", pdkey, vdkey);
        self.exec(&format!("hotspare:{pdkey} -assign yes -type dhs -vdkey:{vdkey}"))
    }

    /// Destroy the entire storage controller configuration.
    pub fn reset_controller(&mut self, controller: &str) -> anyhow::Result<()> {
        warn!("destroying entire controller configuration");
        if self.has_foreign_disks()? {
            self.r_exec(&format!("clearconfig:{controller}"), 1, true)?;
        }
        self.exec(&format!("resetconfig:{controller}"))?;
        jobs::run_and_wait(self.session, controller, true)?;
        self.pdisks = None;
        self.vdisks = None;
        info!("virtual disks cleaning is done");
        Ok(())
    }

    pub fn apply_profile(&mut self, profile: &StorageProfile) -> anyhow::Result<ProfileReport> {
        match profile {
            StorageProfile::Default => self.profile_default(),
            StorageProfile::Nodata => self.profile_nodata(),
            StorageProfile::Database => self.profile_database(),
            StorageProfile::Passthrough => self.profile_passthrough(),
        }
    }

    fn take_disks(
        mut disks: Vec<DiskRecord>,
        count: usize,
        purpose: &str,
    ) -> anyhow::Result<Vec<DiskRecord>> {
        anyhow::ensure!(
            disks.len() >= count,
            "not enough disks for {purpose}: need {count}, have {}",
            disks.len()
        );
        disks.truncate(count);
        Ok(disks)
    }

    /// system RAID1 on the 2 smallest disks; data RAID5 on the largest disks
    /// with one kept as dedicated hotspare.
    fn profile_default(&mut self) -> anyhow::Result<ProfileReport> {
        let system_disks =
            Self::take_disks(self.select_pdisks(SizeClass::Smallest)?, 2, "system vdisk")?;
        let mut largest = self.select_pdisks(SizeClass::Largest)?;
        let Some(hotspare) = largest.pop().filter(|_| !largest.is_empty()) else {
            anyhow::bail!("not enough large disks for data vdisk with hotspare");
        };
        let controller = system_disks[0].controller.clone();

        self.create_vd("system", "r1", &system_disks)?;
        self.create_vd("data", "r5", &largest)?;
        jobs::run_and_wait(self.session, &controller, true)?;

        self.vdisks = None;
        let data_vd = self
            .get_vdisk("data")?
            .ok_or_else(|| RacError::Parse("data vdisk missing after creation".to_string()))?;
        self.assign_hotspare(&data_vd.dkey, &hotspare.dkey)?;
        jobs::run(self.session, &controller, true)?;

        Ok(ProfileReport {
            profile: "default".to_string(),
            created_vdisks: vec!["system".to_string(), "data".to_string()],
            hotspare: Some(hotspare.dkey),
        })
    }

    /// system RAID1 on the 2 smallest disks, nothing else.
    fn profile_nodata(&mut self) -> anyhow::Result<ProfileReport> {
        let system_disks =
            Self::take_disks(self.select_pdisks(SizeClass::Smallest)?, 2, "system vdisk")?;
        let controller = system_disks[0].controller.clone();

        self.create_vd("system", "r1", &system_disks)?;
        jobs::run_and_wait(self.session, &controller, true)?;
        self.vdisks = None;

        Ok(ProfileReport {
            profile: "nodata".to_string(),
            created_vdisks: vec!["system".to_string()],
            hotspare: None,
        })
    }

    /// system RAID1 (2 smallest), logtemp RAID1 (2 largest), data RAID5 on
    /// the remaining largest disks with one hotspare.
    fn profile_database(&mut self) -> anyhow::Result<ProfileReport> {
        let system_disks =
            Self::take_disks(self.select_pdisks(SizeClass::Smallest)?, 2, "system vdisk")?;
        let controller = system_disks[0].controller.clone();

        let mut largest = self.select_pdisks(SizeClass::Largest)?;
        anyhow::ensure!(
            largest.len() >= 4,
            "database profile needs at least 4 large disks, have {}",
            largest.len()
        );
        let Some(hotspare) = largest.pop() else {
            anyhow::bail!("database profile needs a hotspare disk");
        };
        let logtemp_disks: Vec<DiskRecord> = largest.drain(..2).collect();
        let data_disks = largest;

        self.create_vd("system", "r1", &system_disks)?;
        self.create_vd("logtemp", "r1", &logtemp_disks)?;
        self.create_vd("data", "r5", &data_disks)?;
        jobs::run_and_wait(self.session, &controller, true)?;

        self.vdisks = None;
        let data_vd = self
            .get_vdisk("data")?
            .ok_or_else(|| RacError::Parse("data vdisk missing after creation".to_string()))?;
        self.assign_hotspare(&data_vd.dkey, &hotspare.dkey)?;
        jobs::run(self.session, &controller, true)?;

        Ok(ProfileReport {
            profile: "database".to_string(),
            created_vdisks: vec![
                "system".to_string(),
                "logtemp".to_string(),
                "data".to_string(),
            ],
            hotspare: Some(hotspare.dkey),
        })
    }

    /// All disks exposed as single-disk RAID0, bypassing the missing JBOD
    /// mode on the controller. The first two disks still form a system
    /// RAID1.
    fn profile_passthrough(&mut self) -> anyhow::Result<ProfileReport> {
        let all = self.pdisks()?.to_vec();
        anyhow::ensure!(all.len() >= 2, "passthrough profile needs at least 2 disks");
        let controller = all[0].controller.clone();

        let mut created = vec!["system".to_string()];
        self.create_vd("system", "r1", &all[..2])?;
        for pdisk in &all[2..] {
            self.create_vd(&pdisk.disk, "r0", std::slice::from_ref(pdisk))?;
            created.push(pdisk.disk.clone());
        }
        jobs::run_and_wait(self.session, &controller, true)?;
        self.vdisks = None;

        Ok(ProfileReport {
            profile: "passthrough".to_string(),
            created_vdisks: created,
            hotspare: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::ScriptedTransport;

    const PDISKS: &str = "\
Disk.Bay.0:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = Solid State Disk 0:1:0
   State      = Online
   Status     = Ok
   MediaType  = SSD
   Size       = 223.00 GB
Disk.Bay.1:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = Solid State Disk 0:1:1
   State      = Non-Raid
   Status     = Ok
   MediaType  = SSD
   Size       = 229.25 GB
Disk.Bay.2:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = Physical Disk 0:1:2
   State      = Online
   Status     = Ok
   MediaType  = HDD
   Size       = 1863.00 GB
Disk.Bay.3:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = Physical Disk 0:1:3
   State      = Foreign
   Status     = Ok
   MediaType  = HDD
   Size       = 1862.50 GB
";

    const VDISKS: &str = "\
Disk.Virtual.0:RAID.Integrated.1-1
   Name       = system
   State      = Online
   Status     = Ok
   MediaType  = SSD
   Size       = 223.00 GB
   Layout     = Raid-1
";

    #[test]
    fn parse_pdisk_keys_with_enclosure() {
        let disks = parse_disks(PDISKS).unwrap();
        assert_eq!(disks.len(), 4);
        assert_eq!(disks[0].disk, "Disk.Bay.0");
        assert_eq!(
            disks[0].enclosure.as_deref(),
            Some("Enclosure.Internal.0-1")
        );
        assert_eq!(disks[0].controller, "RAID.Integrated.1-1");
        assert_eq!(disks[0].field("state"), "Online");
        assert_eq!(disks[0].field("name"), "Solid State Disk 0:1:0");
    }

    #[test]
    fn parse_vdisk_keys_without_enclosure() {
        let disks = parse_disks(VDISKS).unwrap();
        assert_eq!(disks.len(), 1);
        assert_eq!(disks[0].disk, "Disk.Virtual.0");
        assert!(disks[0].enclosure.is_none());
        assert_eq!(disks[0].controller, "RAID.Integrated.1-1");
        assert_eq!(disks[0].field("layout"), "Raid-1");
    }

    #[test]
    fn parse_rejects_field_before_key() {
        assert!(parse_disks("   Name  = orphan field").is_err());
    }

    #[test]
    fn banding_groups_within_ten_gb() {
        let disks = parse_disks(PDISKS).unwrap();
        let bands = band_by_size(&disks);
        // 223.00 and 229.25 merge; 1863.00 and 1862.50 merge
        assert_eq!(bands.len(), 2);
        let sizes: Vec<u64> = bands.keys().copied().collect();
        assert_eq!(bands[&sizes[0]].len(), 2);
        assert_eq!(bands[&sizes[1]].len(), 2);
    }

    #[test]
    fn banding_does_not_merge_distant_smaller_disks() {
        // the original compared without abs() and would merge these
        let output = "\
Disk.Bay.0:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = big
   Size       = 1863.00 GB
Disk.Bay.1:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = small
   Size       = 223.00 GB
";
        let disks = parse_disks(output).unwrap();
        assert_eq!(band_by_size(&disks).len(), 2);
    }

    #[test]
    fn select_smallest_and_largest() {
        let transport = ScriptedTransport::new(&[PDISKS]);
        let session = Session::with_transport(Box::new(transport), 1);
        let mut storage = Storage::new(&session);
        let smallest = storage.select_pdisks(SizeClass::Smallest).unwrap();
        assert_eq!(smallest.len(), 2);
        assert!(smallest.iter().all(|d| d.field("mediatype") == "SSD"));
        let largest = storage.select_pdisks(SizeClass::Largest).unwrap();
        assert!(largest.iter().all(|d| d.field("mediatype") == "HDD"));
    }

    #[test]
    fn foreign_disk_detection() {
        let transport = ScriptedTransport::new(&[PDISKS]);
        let session = Session::with_transport(Box::new(transport), 1);
        let mut storage = Storage::new(&session);
        assert!(storage.has_foreign_disks().unwrap());
    }

    #[test]
    fn vdisk_listing_error_yields_empty_list() {
        let transport = ScriptedTransport::new(&["ERROR: STOR004 : no virtual disks"]);
        let session = Session::with_transport(Box::new(transport), 1);
        let mut storage = Storage::new(&session);
        assert!(storage.vdisks().unwrap().is_empty());
    }

    // 2 small SSDs + 3 large HDDs, all RAID-ready
    const PROFILE_PDISKS: &str = "\
Disk.Bay.0:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = ssd0
   State      = Online
   MediaType  = SSD
   Size       = 223.00 GB
Disk.Bay.1:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = ssd1
   State      = Online
   MediaType  = SSD
   Size       = 223.00 GB
Disk.Bay.2:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = hdd0
   State      = Online
   MediaType  = HDD
   Size       = 1863.00 GB
Disk.Bay.3:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = hdd1
   State      = Online
   MediaType  = HDD
   Size       = 1863.00 GB
Disk.Bay.4:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = hdd2
   State      = Online
   MediaType  = HDD
   Size       = 1863.00 GB
";

    const PROFILE_JOB_DONE: &str = "\
---------------------------- JOB -------------------------
[Job ID=JID_CFG]
Job Name=Configure: RAID.Integrated.1-1
Status=Completed
Message=[PR19: Job completed successfully.]
----------------------------------------------------------";

    const JOB_CREATED: &str = "RAC1024: Successfully scheduled a job.\nCommit JID = JID_CFG";

    fn bay(n: u32) -> String {
        format!("Disk.Bay.{n}:Enclosure.Internal.0-1:RAID.Integrated.1-1")
    }

    #[test]
    fn default_profile_allocates_system_data_and_hotspare() {
        let vdisks_after = "\
Disk.Virtual.0:RAID.Integrated.1-1
   Name   = system
   State  = Online
   Size   = 223.00 GB
Disk.Virtual.1:RAID.Integrated.1-1
   Name   = data
   State  = Online
   Size   = 3726.00 GB
";
        let transport = std::rc::Rc::new(ScriptedTransport::new(&[
            PROFILE_PDISKS,
            "ok",
            "ok",
            JOB_CREATED,
            PROFILE_JOB_DONE,
            vdisks_after,
            "ok",
            JOB_CREATED,
        ]));
        let session = Session::with_transport(Box::new(transport.clone()), 1);
        let mut storage = Storage::new(&session);

        let report = storage.apply_profile(&StorageProfile::Default).unwrap();
        assert_eq!(report.created_vdisks, ["system", "data"]);
        assert_eq!(report.hotspare.as_deref(), Some(bay(4).as_str()));

        let commands = transport.commands.borrow();
        // system RAID1 on the two smallest disks
        assert!(commands[1].starts_with("raid createvd:RAID.Integrated.1-1 -name system -rl r1"));
        assert!(commands[1].ends_with(&format!("-pdkey:{},{}", bay(0), bay(1))));
        // data RAID5 on the largest disks minus the hotspare
        assert!(commands[2].starts_with("raid createvd:RAID.Integrated.1-1 -name data -rl r5"));
        assert!(commands[2].ends_with(&format!("-pdkey:{},{}", bay(2), bay(3))));
        assert_eq!(commands[3], "jobqueue create RAID.Integrated.1-1 --realtime");
        assert_eq!(commands[4], "jobqueue view -i JID_CFG");
        assert_eq!(
            commands[6],
            format!(
                "raid hotspare:{} -assign yes -type dhs -vdkey:Disk.Virtual.1:RAID.Integrated.1-1",
                bay(4)
            )
        );
        assert_eq!(commands[7], "jobqueue create RAID.Integrated.1-1 --realtime");
    }

    #[test]
    fn database_profile_allocates_logtemp_and_data_with_hotspare() {
        // 2 small SSDs + 5 large HDDs
        let pdisks = format!(
            "{}Disk.Bay.5:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = hdd3
   State      = Online
   MediaType  = HDD
   Size       = 1863.00 GB
Disk.Bay.6:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = hdd4
   State      = Online
   MediaType  = HDD
   Size       = 1863.00 GB
",
            PROFILE_PDISKS
        );
        let vdisks_after = "\
Disk.Virtual.0:RAID.Integrated.1-1
   Name   = system
Disk.Virtual.1:RAID.Integrated.1-1
   Name   = logtemp
Disk.Virtual.2:RAID.Integrated.1-1
   Name   = data
";
        let transport = std::rc::Rc::new(ScriptedTransport::new(&[
            pdisks.as_str(),
            "ok",
            "ok",
            "ok",
            JOB_CREATED,
            PROFILE_JOB_DONE,
            vdisks_after,
            "ok",
            JOB_CREATED,
        ]));
        let session = Session::with_transport(Box::new(transport.clone()), 1);
        let mut storage = Storage::new(&session);

        let report = storage.apply_profile(&StorageProfile::Database).unwrap();
        assert_eq!(report.created_vdisks, ["system", "logtemp", "data"]);
        assert_eq!(report.hotspare.as_deref(), Some(bay(6).as_str()));

        let commands = transport.commands.borrow();
        assert!(commands[1].starts_with("raid createvd:RAID.Integrated.1-1 -name system -rl r1"));
        assert!(commands[1].ends_with(&format!("-pdkey:{},{}", bay(0), bay(1))));
        // logtemp RAID1 on the first two large disks
        assert!(commands[2].starts_with("raid createvd:RAID.Integrated.1-1 -name logtemp -rl r1"));
        assert!(commands[2].ends_with(&format!("-pdkey:{},{}", bay(2), bay(3))));
        // data RAID5 on the remaining large disks minus the hotspare
        assert!(commands[3].starts_with("raid createvd:RAID.Integrated.1-1 -name data -rl r5"));
        assert!(commands[3].ends_with(&format!("-pdkey:{},{}", bay(4), bay(5))));
        assert_eq!(
            commands[7],
            format!(
                "raid hotspare:{} -assign yes -type dhs -vdkey:Disk.Virtual.2:RAID.Integrated.1-1",
                bay(6)
            )
        );
    }

    #[test]
    fn passthrough_profile_exposes_each_extra_disk_as_raid0() {
        let transport = std::rc::Rc::new(ScriptedTransport::new(&[
            PROFILE_PDISKS,
            "ok",
            "ok",
            "ok",
            "ok",
            JOB_CREATED,
            PROFILE_JOB_DONE,
        ]));
        let session = Session::with_transport(Box::new(transport.clone()), 1);
        let mut storage = Storage::new(&session);

        let report = storage.apply_profile(&StorageProfile::Passthrough).unwrap();
        assert_eq!(
            report.created_vdisks,
            ["system", "Disk.Bay.2", "Disk.Bay.3", "Disk.Bay.4"]
        );
        assert!(report.hotspare.is_none());

        let commands = transport.commands.borrow();
        assert!(commands[1].starts_with("raid createvd:RAID.Integrated.1-1 -name system -rl r1"));
        for (i, n) in (2..=4).enumerate() {
            assert!(commands[2 + i]
                .starts_with(&format!("raid createvd:RAID.Integrated.1-1 -name Disk.Bay.{n} -rl r0")));
            assert!(commands[2 + i].ends_with(&format!("-pdkey:{}", bay(n))));
        }
        assert_eq!(commands[5], "jobqueue create RAID.Integrated.1-1 --realtime");
        assert_eq!(commands[6], "jobqueue view -i JID_CFG");
    }

    #[test]
    fn create_vd_converts_non_raid_members_and_builds_command() {
        let transport = std::rc::Rc::new(ScriptedTransport::new(&["ok", "ok"]));
        let session = Session::with_transport(Box::new(transport.clone()), 1);
        let mut storage = Storage::new(&session);

        let disks = parse_disks(PDISKS).unwrap();
        storage.create_vd("system", "r1", &disks[..2]).unwrap();

        let commands = transport.commands.borrow();
        assert_eq!(commands[0], "raid converttoraid:Disk.Bay.1:Enclosure.Internal.0-1:RAID.Integrated.1-1");
        assert!(commands[1].starts_with("raid createvd:RAID.Integrated.1-1 -name system -rl r1"));
        assert!(commands[1].contains("-rp nra -wp wt -ss 1M"));
        assert!(commands[1].contains(
            "-pdkey:Disk.Bay.0:Enclosure.Internal.0-1:RAID.Integrated.1-1,Disk.Bay.1:Enclosure.Internal.0-1:RAID.Integrated.1-1"
        ));
    }
}
