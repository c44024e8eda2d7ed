use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// One `[InstanceID: ...]` block of `racadm hwinventory` output.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryRecord {
    pub instance_id: String,
    pub attrs: BTreeMap<String, String>,
}

impl InventoryRecord {
    pub fn attr(&self, name: &str) -> &str {
        self.attrs.get(name).map(String::as_str).unwrap_or("n/a")
    }

    pub fn device_type(&self) -> &str {
        self.attr("Device Type")
    }
}

/// One block of a `racadm raid get pdisks/vdisks` listing.
///
/// `dkey` is the full disk key line; physical disks carry an enclosure
/// segment (`disk:enclosure:controller`), virtual disks do not.
#[derive(Debug, Clone, Serialize)]
pub struct DiskRecord {
    pub dkey: String,
    pub disk: String,
    pub enclosure: Option<String>,
    pub controller: String,
    pub fields: BTreeMap<String, String>,
}

impl DiskRecord {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Size in GB parsed from a `223.00 GB` style field.
    pub fn size_gb(&self) -> Option<f64> {
        self.field("size").split_whitespace().next()?.parse().ok()
    }
}

/// Parsed `racadm jobqueue view -i <JID>` block, keys lowercased with
/// spaces replaced by underscores (`job_name`, `percent_complete`, ...).
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub jid: String,
    pub fields: BTreeMap<String, String>,
}

impl JobRecord {
    pub fn status(&self) -> &str {
        self.fields.get("status").map(String::as_str).unwrap_or("")
    }

    pub fn message(&self) -> &str {
        self.fields.get("message").map(String::as_str).unwrap_or("")
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status(), "Completed" | "Failed")
    }
}

/// One `racadm getsel -o` line.
#[derive(Debug, Clone, Serialize)]
pub struct SelEvent {
    pub date: String,
    pub time: String,
    pub source: String,
    pub severity: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FirmwareVersion {
    pub component: String,
    pub version: String,
}

/// One block of a `racadm update viewreport` comparison.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateItem {
    pub component: String,
    pub current_version: String,
    pub available_version: String,
    pub criticality: Option<String>,
}

/// Staged registry changes persisted between invocations:
/// endpoint -> group -> key -> value.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct PendingChanges {
    pub endpoints: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
}

impl PendingChanges {
    pub fn group_mut(&mut self, endpoint: &str, group: &str) -> &mut BTreeMap<String, String> {
        self.endpoints
            .entry(endpoint.to_string())
            .or_default()
            .entry(group.to_string())
            .or_default()
    }

    pub fn groups(&self, endpoint: &str) -> BTreeMap<String, BTreeMap<String, String>> {
        self.endpoints.get(endpoint).cloned().unwrap_or_default()
    }

    pub fn clear(&mut self, endpoint: &str) {
        self.endpoints.remove(endpoint);
    }

    pub fn is_empty_for(&self, endpoint: &str) -> bool {
        self.endpoints
            .get(endpoint)
            .map(|groups| groups.values().all(BTreeMap::is_empty))
            .unwrap_or(true)
    }
}

// ---- report structs (JSON output schema) ----

#[derive(Debug, Serialize)]
pub struct SlotUsage {
    pub populated: String,
    pub max: String,
}

#[derive(Debug, Serialize)]
pub struct InventorySummary {
    pub model: String,
    pub chassis_height: String,
    pub service_tag: String,
    pub hostname: String,
    pub cpu_sockets: SlotUsage,
    pub dimm_slots: SlotUsage,
    pub installed_memory: String,
    pub max_memory: String,
    pub psu_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CpuInfo {
    pub description: String,
    pub model: String,
    pub cores: String,
    pub threads: String,
}

#[derive(Debug, Serialize)]
pub struct DimmInfo {
    pub description: String,
    pub size: String,
    pub model: String,
    pub speed: String,
    pub rank: String,
}

#[derive(Debug, Serialize)]
pub struct ControllerInfo {
    pub description: String,
    pub device_description: String,
}

#[derive(Debug, Serialize)]
pub struct EnclosureDiskInfo {
    pub form_factor: String,
    pub media_type: String,
    pub serial: String,
    pub manufacturer: String,
    pub model: String,
    pub size_gb: u64,
}

#[derive(Debug, Serialize)]
pub struct EnclosureInfo {
    pub service_tag: String,
    pub product_name: String,
    pub device_description: String,
    pub disks: Vec<EnclosureDiskInfo>,
}

#[derive(Debug, Serialize)]
pub struct InventoryDetails {
    pub cpus: Vec<CpuInfo>,
    pub memory: Vec<DimmInfo>,
    pub nics: Vec<String>,
    pub raid_controllers: Vec<ControllerInfo>,
    pub enclosures: Vec<EnclosureInfo>,
}

#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub summary: InventorySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<InventoryDetails>,
}

#[derive(Debug, Serialize)]
pub struct StageReport {
    pub group: String,
    pub key: String,
    pub value: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CommitReport {
    pub written: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PendingEntry {
    pub group: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct JobRunReport {
    pub unit: String,
    pub jid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SizeBand {
    pub size_gb: u64,
    pub disks: Vec<DiskRecord>,
}

#[derive(Debug, Serialize)]
pub struct ProfileReport {
    pub profile: String,
    pub created_vdisks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspare: Option<String>,
}
