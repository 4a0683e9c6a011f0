//! Rendering command results for humans and machines.

use std::io::{self, Write};

use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::Serialize;
use sumtype_gen::Diagnostic;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// JSON shape of `sumtype check`.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    pub success: bool,
    pub files: usize,
    pub diagnostics: &'a [Diagnostic],
}

pub fn write_check(
    out: &mut impl Write,
    format: OutputFormat,
    files: usize,
    diagnostics: &[Diagnostic],
    color: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let report = CheckOutput {
                success: diagnostics.is_empty(),
                files,
                diagnostics,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)
        }
        OutputFormat::Human => {
            for diagnostic in diagnostics {
                write_diagnostic(out, diagnostic, color)?;
            }
            let summary = format!("{files} file(s) checked, {} diagnostic(s)", diagnostics.len());
            match (color, diagnostics.is_empty()) {
                (true, true) => writeln!(out, "{}", summary.green()),
                (true, false) => writeln!(out, "{}", summary.yellow()),
                (false, _) => writeln!(out, "{summary}"),
            }
        }
    }
}

fn write_diagnostic(out: &mut impl Write, diagnostic: &Diagnostic, color: bool) -> io::Result<()> {
    if let Some(file) = &diagnostic.file {
        write!(out, "{}: ", file.display())?;
    }
    if color {
        write!(out, "{} ", diagnostic.id.red().bold())?;
    } else {
        write!(out, "{} ", diagnostic.id)?;
    }
    writeln!(out, "{}: {}", diagnostic.code, diagnostic.message)
}
