//! racadm session layer.
//!
//! Everything the tool knows about the iDRAC flows through [`Session::exec`]:
//! a command string handed to a [`RacTransport`], with the retry and error
//! conventions of the racadm wire format applied on top. The production
//! transport spawns the local racadm binary in remote mode
//! (`racadm -r <endpoint> -u <user> -p <password> ...`).

use crate::config::Settings;
use anyhow::Context;
use std::net::{TcpStream, ToSocketAddrs};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, error, info};

/// Wait between probes while a profile export job blocks the iDRAC.
const BUSY_WAIT: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// racadm remote mode speaks to the iDRAC web services port.
const PROBE_PORT: u16 = 443;

#[derive(thiserror::Error, Debug)]
pub enum RacError {
    #[error("iDRAC {0}:443 is unreachable")]
    Unreachable(String),
    #[error("racadm: {0}")]
    Command(String),
    #[error("unparseable racadm output: {0}")]
    Parse(String),
    #[error("unknown key in {group}: {key}")]
    UnknownKey { group: String, key: String },
    #[error("read-only key in {group}: {key}")]
    ReadOnlyKey { group: String, key: String },
    #[error("job {jid} failed: {message}")]
    JobFailed { jid: String, message: String },
}

/// Seam between command semantics and command delivery. One call runs one
/// racadm command and returns its raw output.
pub trait RacTransport {
    fn run(&self, command: &str) -> anyhow::Result<String>;
}

/// Drives the local racadm binary in remote mode.
pub struct RacadmBin {
    bin: String,
    endpoint: String,
    user: String,
    password: String,
}

impl RacadmBin {
    pub fn new(settings: &Settings) -> Self {
        Self {
            bin: settings.racadm_bin.clone(),
            endpoint: settings.endpoint.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
        }
    }
}

impl RacTransport for RacadmBin {
    fn run(&self, command: &str) -> anyhow::Result<String> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(["-r", &self.endpoint, "-u", &self.user, "-p", &self.password]);
        cmd.args(command.split_whitespace());
        let output = cmd
            .output()
            .with_context(|| format!("spawning {}", self.bin))?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() && stdout.trim().is_empty() {
            // racadm reports its own errors on stdout; an empty stdout with a
            // failed status means the binary itself could not run.
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{} exited with {}: {}", self.bin, output.status, stderr.trim());
        }
        Ok(stdout)
    }
}

/// Classification of one racadm reply.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Ok,
    /// `ERROR: LC062` - a profile export job is running; wait and retry
    /// without consuming an attempt.
    Busy,
    Error,
}

pub fn classify(output: &str) -> Reply {
    if output.starts_with("ERROR: LC062") {
        Reply::Busy
    } else if output.starts_with("ERROR: ") {
        Reply::Error
    } else {
        Reply::Ok
    }
}

fn first_line(output: &str) -> &str {
    output.lines().next().unwrap_or_default()
}

pub struct Session {
    transport: Box<dyn RacTransport>,
    retries: u32,
    busy_wait: Duration,
}

impl Session {
    /// Probe the endpoint and open a session over the default transport.
    pub fn connect(settings: &Settings) -> anyhow::Result<Self> {
        if settings.probe {
            probe(&settings.endpoint)?;
        }
        info!(endpoint = %settings.endpoint, "connecting via racadm remote mode");
        Ok(Self {
            transport: Box::new(RacadmBin::new(settings)),
            retries: settings.retries,
            busy_wait: BUSY_WAIT,
        })
    }

    pub fn with_transport(transport: Box<dyn RacTransport>, retries: u32) -> Self {
        Self {
            transport,
            retries,
            busy_wait: BUSY_WAIT,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_busy_wait(&mut self, wait: Duration) {
        self.busy_wait = wait;
    }

    pub fn exec(&self, command: &str) -> anyhow::Result<String> {
        self.exec_opts(command, self.retries, false)
    }

    /// Run a racadm command with an explicit retry budget.
    ///
    /// `ERROR: LC062` replies wait [`BUSY_WAIT`] and retry without consuming
    /// the budget; other `ERROR:` replies consume one attempt each. With
    /// `ignore_errors` an exhausted budget returns the error output instead
    /// of failing.
    pub fn exec_opts(
        &self,
        command: &str,
        retries: u32,
        ignore_errors: bool,
    ) -> anyhow::Result<String> {
        let mut attempts = retries.max(1);
        loop {
            debug!(%command, "running racadm command");
            let output = self.transport.run(command)?.trim().to_string();
            match classify(&output) {
                Reply::Ok => return Ok(output),
                Reply::Busy => {
                    debug!("profile export job is running, waiting");
                    std::thread::sleep(self.busy_wait);
                }
                Reply::Error => {
                    attempts -= 1;
                    if attempts == 0 {
                        if ignore_errors {
                            return Ok(output);
                        }
                        error!(%command, "error running command");
                        error!("error was: {}", output);
                        return Err(RacError::Command(first_line(&output).to_string()).into());
                    }
                    debug!("retrying command");
                }
            }
        }
    }

    pub fn serveraction(&self, action: &str) -> anyhow::Result<String> {
        self.exec(&format!("serveraction {action}"))
    }
}

fn probe(endpoint: &str) -> anyhow::Result<()> {
    debug!("testing {}:{}", endpoint, PROBE_PORT);
    let addrs = (endpoint, PROBE_PORT)
        .to_socket_addrs()
        .map_err(|_| RacError::Unreachable(endpoint.to_string()))?;
    for addr in addrs {
        if TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).is_ok() {
            debug!("{}:{} is open", endpoint, PROBE_PORT);
            return Ok(());
        }
    }
    Err(RacError::Unreachable(endpoint.to_string()).into())
}
