//! Configuration for the generation pass.
//!
//! Settings come from `sumtype.toml`:
//!
//! ```toml
//! [generate]
//! runtime_path = "::sumtype_core"
//! fail_on_diagnostics = false
//!
//! [codec]
//! case_insensitive = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name looked up by [`discover_config`].
pub const CONFIG_FILE_NAME: &str = "sumtype.toml";

const DEFAULT_RUNTIME_PATH: &str = "::sumtype_core";

/// Root of `sumtype.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub generate: GenerateSection,
    pub codec: CodecSection,
}

/// `[generate]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateSection {
    /// Path under which generated code finds the runtime crate.
    pub runtime_path: String,
    /// Turn any diagnostic into a hard error.
    pub fail_on_diagnostics: bool,
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            fail_on_diagnostics: false,
        }
    }
}

/// `[codec]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSection {
    /// Baked into the generated `Deserialize` impls.
    pub case_insensitive: bool,
}

/// Effective settings for one run of the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    pub runtime_path: String,
    pub fail_on_diagnostics: bool,
    pub case_insensitive: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        ConfigFile::default().into()
    }
}

impl From<ConfigFile> for GenConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            runtime_path: file.generate.runtime_path,
            fail_on_diagnostics: file.generate.fail_on_diagnostics,
            case_insensitive: file.codec.case_insensitive,
        }
    }
}

impl GenConfig {
    /// Load settings from a `sumtype.toml`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.into())
    }

    /// Load the nearest `sumtype.toml` above `start_dir`, or defaults.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        match discover_config(start_dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn runtime(&self) -> Result<syn::Path> {
        syn::parse_str(&self.runtime_path).map_err(|source| Error::RuntimePath {
            value: self.runtime_path.clone(),
            source,
        })
    }
}

/// Walk up the directory tree to find `sumtype.toml`
pub fn discover_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    None
}
