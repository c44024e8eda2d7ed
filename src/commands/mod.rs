//! Command handlers, one `handle_*_commands` per subcommand group.
//!
//! Each handler returns `Ok(false)` when the parsed command is not its own,
//! so `main` can chain them. Handlers stay thin and delegate to services.

mod bios;
mod hardware;
mod maintenance;
mod storage;

pub use bios::handle_bios_commands;
pub use hardware::handle_hardware_commands;
pub use maintenance::handle_maintenance_commands;
pub use storage::handle_storage_commands;
