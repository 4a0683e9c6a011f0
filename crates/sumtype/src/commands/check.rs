//! Check command: validate declarations without writing anything

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use sumtype_gen::{GenConfig, Session};

use crate::CommandResult;
use crate::output::{OutputFormat, write_check};

/// Run the check command. Exits with 1 when any declaration is rejected.
pub fn run_check(
    files: &[PathBuf],
    config: &GenConfig,
    format: OutputFormat,
    out: &mut impl Write,
    color: bool,
) -> CommandResult {
    let mut session = Session::new();
    for file in files {
        session
            .add_file(file)
            .with_context(|| format!("Failed to read declarations from {}", file.display()))?;
    }

    let diagnostics: Vec<_> = session
        .expand(config)
        .context("Failed to resolve declarations")?
        .into_iter()
        .flat_map(|expansion| expansion.diagnostics)
        .collect();

    write_check(out, format, files.len(), &diagnostics, color).context("Failed to write report")?;

    Ok(if diagnostics.is_empty() { None } else { Some(1) })
}
