use crate::domain::models::PendingChanges;
use anyhow::Context;
use std::path::PathBuf;

fn pending_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".config/dractl/pending.json"))
}

pub fn load_pending() -> anyhow::Result<PendingChanges> {
    let p = pending_path()?;
    if !p.exists() {
        return Ok(PendingChanges::default());
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_pending(pending: &PendingChanges) -> anyhow::Result<()> {
    let p = pending_path()?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(pending)?)?;
    Ok(())
}
