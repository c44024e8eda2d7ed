//! Shared data model layer (structs only).
//!
//! Records parsed out of racadm output and the report structs behind
//! `--json`. Domain types are data-only: no racadm calls, no filesystem
//! side effects. Changes here affect the JSON output schema; keep them
//! deliberate.

pub mod models;
