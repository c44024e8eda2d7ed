mod cli;
mod commands;
mod config;
mod domain;
mod services;
mod session;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = config::resolve(cli)?;

    if commands::handle_hardware_commands(cli, &settings)? {
        return Ok(());
    }
    if commands::handle_bios_commands(cli, &settings)? {
        return Ok(());
    }
    if commands::handle_storage_commands(cli, &settings)? {
        return Ok(());
    }
    if commands::handle_maintenance_commands(cli, &settings)? {
        return Ok(());
    }
    anyhow::bail!("command not handled")
}
