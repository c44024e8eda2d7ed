//! iDRAC job queue (`racadm jobqueue ...`).

use crate::domain::models::JobRecord;
use crate::session::{RacError, Session};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub fn parse_jid(output: &str) -> anyhow::Result<String> {
    let jid = output
        .split("Commit JID = ")
        .nth(1)
        .map(|rest| rest.split_whitespace().next().unwrap_or(rest).to_string())
        .filter(|jid| !jid.is_empty())
        .ok_or_else(|| RacError::Parse(format!("no Commit JID in: {output}")))?;
    Ok(jid)
}

/// Parse a `jobqueue view -i <JID>` block.
///
/// ```text
/// ---------------------------- JOB -------------------------
/// [Job ID=JID_378288740486]
/// Job Name=Configure: RAID.Integrated.1-1
/// Status=Completed
/// ...
/// ----------------------------------------------------------
/// ```
pub fn parse_job(jid: &str, output: &str) -> anyhow::Result<JobRecord> {
    let mut fields = BTreeMap::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('-') || line.starts_with('[') {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| RacError::Parse(format!("job line: {line}")))?;
        fields.insert(
            key.trim().to_ascii_lowercase().replace(' ', "_"),
            value.trim().to_string(),
        );
    }
    if fields.is_empty() {
        return Err(RacError::Parse(format!("empty job record for {jid}")).into());
    }
    Ok(JobRecord {
        jid: jid.to_string(),
        fields,
    })
}

pub fn view(session: &Session, jid: &str) -> anyhow::Result<JobRecord> {
    let output = session.exec(&format!("jobqueue view -i {jid}"))?;
    parse_job(jid, &output)
}

/// Run the pending jobs of a unit, returning the commit JID.
pub fn run(session: &Session, unit: &str, now: bool) -> anyhow::Result<String> {
    info!("running unit {} pending jobs", unit);
    let mut command = format!("jobqueue create {unit}");
    if now {
        command.push_str(" --realtime");
    }
    let output = session.exec(&command)?;
    parse_jid(&output)
}

/// Run the pending jobs of a unit and poll until the created job finishes,
/// returning its final record.
pub fn run_and_wait(session: &Session, unit: &str, now: bool) -> anyhow::Result<JobRecord> {
    let jid = run(session, unit, now)?;
    wait_for(session, &jid)
}

/// Poll the job until it reaches a terminal status; failure is an error.
pub fn wait_for(session: &Session, jid: &str) -> anyhow::Result<JobRecord> {
    info!("waiting job {} completion", jid);
    loop {
        let job = view(session, jid)?;
        if job.is_finished() {
            if job.status() == "Failed" {
                return Err(RacError::JobFailed {
                    jid: jid.to_string(),
                    message: job.message().to_string(),
                }
                .into());
            }
            return Ok(job);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::ScriptedTransport;

    const JOB_VIEW: &str = "\
---------------------------- JOB -------------------------
[Job ID=JID_378288740486]
Job Name=Configure: RAID.Integrated.1-1
Status=Completed
Start Time=[Now]
Expiration Time=[Not Applicable]
Message=[PR19: Job completed successfully.]
Percent Complete=[100]
----------------------------------------------------------";

    #[test]
    fn jid_is_extracted_from_create_reply() {
        let output = "RAC1024: Successfully scheduled a job.\nCommit JID = JID_378288740486";
        assert_eq!(parse_jid(output).unwrap(), "JID_378288740486");
    }

    #[test]
    fn missing_jid_is_an_error() {
        assert!(parse_jid("RAC1024: Successfully scheduled a job.").is_err());
    }

    #[test]
    fn job_view_keys_are_snake_cased() {
        let job = parse_job("JID_378288740486", JOB_VIEW).unwrap();
        assert_eq!(job.fields["job_name"], "Configure: RAID.Integrated.1-1");
        assert_eq!(job.status(), "Completed");
        assert_eq!(job.fields["percent_complete"], "[100]");
        assert!(job.is_finished());
    }

    #[test]
    fn run_and_wait_returns_the_final_record_without_extra_views() {
        let transport = std::rc::Rc::new(ScriptedTransport::new(&[
            "RAC1024: Successfully scheduled a job.\nCommit JID = JID_378288740486",
            JOB_VIEW,
        ]));
        let session = Session::with_transport(Box::new(transport.clone()), 1);
        let job = run_and_wait(&session, "BIOS.Setup.1-1", true).unwrap();
        assert_eq!(job.jid, "JID_378288740486");
        assert_eq!(job.status(), "Completed");
        let commands = transport.commands.borrow();
        assert_eq!(
            commands.as_slice(),
            [
                "jobqueue create BIOS.Setup.1-1 --realtime",
                "jobqueue view -i JID_378288740486",
            ]
        );
    }

    #[test]
    fn running_job_is_not_finished() {
        let output = "\
---------------------------- JOB -------------------------
[Job ID=JID_1]
Job Name=Configure: BIOS.Setup.1-1
Status=Running
Percent Complete=[40]
----------------------------------------------------------";
        let job = parse_job("JID_1", output).unwrap();
        assert!(!job.is_finished());
    }
}
