//! Sumtype CLI library
//!
//! The command implementations live here so they can be driven from tests
//! without spawning the binary.

pub mod commands;
pub mod logging;
pub mod output;

pub use output::OutputFormat;

/// `Ok(None)` exits successfully, `Ok(Some(code))` exits with `code`.
pub type CommandResult = anyhow::Result<Option<u8>>;
