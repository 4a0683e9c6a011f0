pub mod check;
pub mod expand;

pub use check::*;
pub use expand::*;

use std::path::Path;

use anyhow::Context;
use sumtype_gen::{GenConfig, discover_config};
use tracing::debug;

/// Use `--config` when given, otherwise the nearest `sumtype.toml` above
/// `start_dir`, otherwise defaults.
pub fn load_config(explicit: Option<&Path>, start_dir: &Path) -> anyhow::Result<GenConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(start_dir),
    };

    match path {
        Some(path) => {
            debug!(config = %path.display(), "loading configuration");
            GenConfig::load(&path).with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => Ok(GenConfig::default()),
    }
}
