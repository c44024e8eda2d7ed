//! Output helpers shared by the command handlers.
//!
//! Every command prints either plain text or, under the global `--json`
//! flag, the `{ "ok": ..., "data": ... }` envelope. Listings use
//! tab-separated rows so the text output stays `cut`/`awk` friendly.

use crate::domain::models::JsonOut;
use serde::Serialize;

/// Serialize `data` into the `{ ok, data }` envelope.
pub fn envelope<T: Serialize>(data: T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonOut { ok: true, data })?)
}

/// Tab-separated listing row.
pub fn row(fields: &[&str]) -> String {
    fields.join("\t")
}

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", envelope(data)?);
    } else {
        for d in data {
            println!("{}", line(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(json: bool, data: T, line: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", envelope(&data)?);
    } else {
        println!("{}", line(&data));
    }
    Ok(())
}
