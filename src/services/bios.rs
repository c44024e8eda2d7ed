//! BIOS and iDRAC configuration facade.
//!
//! Groups a set of configuration registries behind stage/pending/commit
//! operations. Staged changes persist between invocations (see `state.rs`)
//! so several `bios set` calls can accumulate before one `bios commit`.

use crate::domain::models::{CommitReport, PendingChanges, PendingEntry, StageReport};
use crate::services::registry::{Registry, StageOutcome};
use crate::services::{jobs, state};
use crate::session::Session;
use tracing::info;

/// Job unit that picks up committed BIOS changes.
pub const BIOS_SETUP_UNIT: &str = "BIOS.Setup.1-1";

/// Registries the original facade exposes as attributes; any other racadm
/// group is accepted as well.
pub const CANONICAL_GROUPS: [&str; 3] = [
    "idrac.ipv4",
    "BIOS.BiosBootSettings",
    "BIOS.SysProfileSettings",
];

/// Expand the short aliases of the canonical groups; anything else is
/// passed to racadm as-is.
pub fn resolve_group(name: &str) -> String {
    match name.to_ascii_lowercase().as_str() {
        "ipv4" => CANONICAL_GROUPS[0].to_string(),
        "boot" => CANONICAL_GROUPS[1].to_string(),
        "profile" => CANONICAL_GROUPS[2].to_string(),
        _ => name.to_string(),
    }
}

/// Validate a change against the live registry and persist it as pending.
pub fn stage(
    session: &Session,
    endpoint: &str,
    group: &str,
    key: &str,
    value: &str,
) -> anyhow::Result<StageReport> {
    let mut registry = Registry::load(session, group)?;
    let outcome = registry.stage(key, value)?;

    let mut pending = state::load_pending()?;
    let staged = pending.group_mut(endpoint, group);
    match outcome {
        StageOutcome::Staged => {
            staged.insert(key.to_string(), value.to_string());
        }
        // staging the current value drops any previously pending change
        StageOutcome::Unchanged => {
            staged.remove(key);
        }
    }
    state::save_pending(&pending)?;

    Ok(StageReport {
        group: group.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        status: match outcome {
            StageOutcome::Staged => "staged".to_string(),
            StageOutcome::Unchanged => "unchanged".to_string(),
        },
    })
}

/// Aggregated `<group>.<key> = <value>` view of staged changes.
pub fn pending_entries(pending: &PendingChanges, endpoint: &str) -> Vec<PendingEntry> {
    let mut entries = Vec::new();
    for (group, changes) in pending.groups(endpoint) {
        for (key, value) in changes {
            entries.push(PendingEntry { group: group.clone(), key, value });
        }
    }
    entries
}

pub fn discard(endpoint: &str) -> anyhow::Result<usize> {
    let mut pending = state::load_pending()?;
    let dropped = pending_entries(&pending, endpoint).len();
    pending.clear(endpoint);
    state::save_pending(&pending)?;
    Ok(dropped)
}

/// Write every group's staged changes, then schedule the BIOS setup job if
/// anything was written.
pub fn commit(session: &Session, endpoint: &str, wait: bool) -> anyhow::Result<CommitReport> {
    let mut pending = state::load_pending()?;
    if pending.is_empty_for(endpoint) {
        return Ok(CommitReport {
            written: Vec::new(),
            jid: None,
            job_status: None,
        });
    }

    let mut written = Vec::new();
    for (group, changes) in pending.groups(endpoint) {
        let mut registry = Registry::load(session, &group)?;
        for (key, value) in &changes {
            // revalidate against the live registry; firmware updates can
            // drop keys between stage and commit
            if registry.stage(key, value)? == StageOutcome::Unchanged {
                info!("{}.{} already set to {}", group, key, value);
                continue;
            }
            written.push(format!("{group}.{key}"));
        }
        registry.write(session)?;
    }

    pending.clear(endpoint);
    state::save_pending(&pending)?;

    if written.is_empty() {
        return Ok(CommitReport {
            written,
            jid: None,
            job_status: None,
        });
    }

    let jid = jobs::run(session, BIOS_SETUP_UNIT, true)?;
    let job_status = if wait {
        Some(jobs::wait_for(session, &jid)?.status().to_string())
    } else {
        None
    };
    Ok(CommitReport {
        written,
        jid: Some(jid),
        job_status,
    })
}
