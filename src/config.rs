use crate::cli::Cli;
use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_RACADM_BIN: &str = "racadm";
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_RETRIES: u32 = 3;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub endpoint: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub racadm_bin: Option<String>,
    pub retries: Option<u32>,
    pub probe: Option<bool>,
}

/// Fully resolved connection settings: CLI flag > environment (via clap) >
/// config file > built-in default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub user: String,
    pub password: String,
    pub racadm_bin: String,
    pub retries: u32,
    pub probe: bool,
}

pub fn config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.config {
        return Ok(path.clone());
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".config/dractl/config.toml"))
}

pub fn load_config_file(cli: &Cli) -> anyhow::Result<ConfigFile> {
    let path = config_path(cli)?;
    if !path.exists() {
        if cli.config.is_some() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn resolve(cli: &Cli) -> anyhow::Result<Settings> {
    let file = load_config_file(cli)?;

    let endpoint = cli
        .endpoint
        .clone()
        .or(file.endpoint)
        .context("no iDRAC endpoint configured (use --endpoint or config.toml)")?;
    let password = cli
        .password
        .clone()
        .or(file.password)
        .context("no iDRAC password configured (use --password or config.toml)")?;

    Ok(Settings {
        endpoint,
        user: cli
            .user
            .clone()
            .or(file.user)
            .unwrap_or_else(|| DEFAULT_USER.to_string()),
        password,
        racadm_bin: cli
            .racadm_bin
            .clone()
            .or(file.racadm_bin)
            .unwrap_or_else(|| DEFAULT_RACADM_BIN.to_string()),
        retries: file.retries.unwrap_or(DEFAULT_RETRIES),
        probe: file.probe.unwrap_or(true),
    })
}
