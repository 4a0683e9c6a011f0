//! Expand command: print or write the generated source for one file

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use sumtype_gen::{GenConfig, Session};
use tracing::info;

use crate::CommandResult;

/// Run the expand command
pub fn run_expand(input: &Path, output: Option<&Path>, config: &GenConfig, out: &mut impl Write) -> CommandResult {
    let mut session = Session::new();
    session
        .add_file(input)
        .with_context(|| format!("Failed to read declarations from {}", input.display()))?;

    let mut expansions = session.expand(config).context("Failed to expand declarations")?;
    let expansion = expansions.pop().context("No expansion produced")?;

    let source = expansion.to_source();
    match output {
        Some(path) => {
            std::fs::write(path, &source).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(output = %path.display(), "wrote expansion");
        }
        None => out.write_all(source.as_bytes()).context("Failed to write expansion")?,
    }

    for diagnostic in &expansion.diagnostics {
        eprintln!("{diagnostic}");
    }

    if config.fail_on_diagnostics && !expansion.diagnostics.is_empty() {
        return Ok(Some(1));
    }
    Ok(None)
}
