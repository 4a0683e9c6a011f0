//! Build-script entry point.
//!
//! ```no_run
//! // build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     sumtype_gen::Builder::new()
//!         .file("decls/shapes.rs")
//!         .compile()?;
//!     Ok(())
//! }
//! ```
//!
//! Each input `decls/shapes.rs` is written to `$OUT_DIR/shapes.rs`, ready for
//! `include!(concat!(env!("OUT_DIR"), "/shapes.rs"));`.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::GenConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::expand::{Expansion, Session};

const HEADER: &str = "// Generated by sumtype-gen. Do not edit.\n\n";

/// What a [`Builder::compile`] run produced.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Written files, in input order.
    pub outputs: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Configures and runs the generation pass over a set of files.
#[derive(Debug, Clone)]
pub struct Builder {
    files: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    config: GenConfig,
    emit_rerun_if_changed: bool,
    cargo_warnings: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Defaults suit a build script: output goes to `OUT_DIR` and cargo is
    /// told about inputs and diagnostics.
    pub fn new() -> Self {
        let in_build_script = std::env::var_os("OUT_DIR").is_some();
        Self {
            files: Vec::new(),
            out_dir: None,
            config: GenConfig::default(),
            emit_rerun_if_changed: in_build_script,
            cargo_warnings: in_build_script,
        }
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Replace every setting at once, e.g. with a loaded `sumtype.toml`.
    pub fn config(mut self, config: GenConfig) -> Self {
        self.config = config;
        self
    }

    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.config.runtime_path = path.into();
        self
    }

    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.config.case_insensitive = enabled;
        self
    }

    pub fn fail_on_diagnostics(mut self, enabled: bool) -> Self {
        self.config.fail_on_diagnostics = enabled;
        self
    }

    pub fn emit_rerun_if_changed(mut self, enabled: bool) -> Self {
        self.emit_rerun_if_changed = enabled;
        self
    }

    pub fn cargo_warnings(mut self, enabled: bool) -> Self {
        self.cargo_warnings = enabled;
        self
    }

    /// Expand every file without writing anything.
    pub fn expand(&self) -> Result<Vec<Expansion>> {
        let mut session = Session::new();
        for file in &self.files {
            if self.emit_rerun_if_changed {
                println!("cargo:rerun-if-changed={}", file.display());
            }
            session.add_file(file)?;
        }
        session.expand(&self.config)
    }

    /// Expand every file and write `<stem>.rs` for each into the output
    /// directory.
    pub fn compile(&self) -> Result<Report> {
        let out_dir = self.resolve_out_dir()?;
        std::fs::create_dir_all(&out_dir).map_err(|e| Error::io(&out_dir, e))?;

        let mut report = Report::default();
        for expansion in self.expand()? {
            for diagnostic in &expansion.diagnostics {
                if self.cargo_warnings {
                    println!("cargo:warning={diagnostic}");
                }
            }
            report.diagnostics.extend(expansion.diagnostics.iter().cloned());

            let target = out_dir.join(output_name(expansion.path.as_deref()));
            let mut content = String::from(HEADER);
            content.push_str(&expansion.to_source());
            std::fs::write(&target, content).map_err(|e| Error::io(&target, e))?;
            info!(output = %target.display(), generated = expansion.generated.len(), "wrote expansion");
            report.outputs.push(target);
        }

        if self.config.fail_on_diagnostics && report.has_diagnostics() {
            warn!(count = report.diagnostics.len(), "failing on diagnostics");
            return Err(Error::Diagnostics(report.diagnostics.len()));
        }
        Ok(report)
    }

    fn resolve_out_dir(&self) -> Result<PathBuf> {
        match &self.out_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::var_os("OUT_DIR")
                .map(PathBuf::from)
                .ok_or(Error::MissingOutDir),
        }
    }
}

fn output_name(path: Option<&Path>) -> String {
    let stem = path
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "generated".to_string());
    format!("{stem}.rs")
}
