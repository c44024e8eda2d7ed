//! System event log (`racadm getsel -o`).

use crate::domain::models::SelEvent;
use crate::session::Session;
use tracing::debug;

fn split_field(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    let end = input.find(char::is_whitespace)?;
    Some((&input[..end], input[end..].trim_start()))
}

/// Parse one SEL line: `date time source severity message`. The first four
/// fields are whitespace-delimited; the message is the remainder of the
/// line, kept verbatim.
pub fn parse_line(line: &str) -> Option<SelEvent> {
    let (date, rest) = split_field(line)?;
    let (time, rest) = split_field(rest)?;
    let (source, rest) = split_field(rest)?;
    let (severity, message) = split_field(rest)?;
    if message.is_empty() {
        return None;
    }
    Some(SelEvent {
        date: date.to_string(),
        time: time.to_string(),
        source: source.to_string(),
        severity: severity.to_string(),
        message: message.to_string(),
    })
}

pub fn parse(output: &str) -> Vec<SelEvent> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_line(line) {
            Some(event) => Some(event),
            None => {
                debug!("skipping malformed SEL line: {}", line);
                None
            }
        })
        .collect()
}

pub fn list(session: &Session, severities: &[String]) -> anyhow::Result<Vec<SelEvent>> {
    let output = session.exec("getsel -o")?;
    Ok(parse(&output)
        .into_iter()
        .filter(|event| severities.is_empty() || severities.iter().any(|s| s == &event.severity))
        .collect())
}
