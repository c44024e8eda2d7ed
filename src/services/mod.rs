//! Service layer containing racadm command semantics and parsing.
//!
//! ## Service map
//! - `registry.rs` — configuration group load/stage/write semantics.
//! - `bios.rs` — BIOS facade: canonical groups, pending view, commit flow.
//! - `inventory.rs` — hwinventory parsing + summary rendering.
//! - `storage.rs` — disk listings, size banding, vdisk ops, canned profiles.
//! - `jobs.rs` — jobqueue create/view/wait.
//! - `sel.rs` — system event log parsing + severity filter.
//! - `updates.rs` — firmware versions and repository update flow.
//! - `state.rs` — pending-changes persistence under `~/.config/dractl/`.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Parsers are pure functions over racadm output; unit tests live beside
//!   them.
//! - Side effects (racadm calls, file writes) should be explicit and
//!   localized.
//! - Keep command handlers thin; delegate to services.

pub mod bios;
pub mod inventory;
pub mod jobs;
pub mod output;
pub mod registry;
pub mod sel;
pub mod state;
pub mod storage;
pub mod updates;
