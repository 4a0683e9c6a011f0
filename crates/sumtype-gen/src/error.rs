//! Error types for the generation pass
//!
//! Validation problems in a declaration are not errors: they are reported as
//! [`Diagnostic`](crate::Diagnostic)s and the pass carries on. The variants
//! here stop the pass as a whole.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Syn {
        origin: String,
        #[source]
        source: syn::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("runtime path `{value}` is not a Rust path: {source}")]
    RuntimePath {
        value: String,
        #[source]
        source: syn::Error,
    },

    #[error("generation reported {0} diagnostic(s)")]
    Diagnostics(usize),

    #[error("no output directory: set one on the builder or run from a build script")]
    MissingOutDir,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn syn(origin: impl Into<String>, source: syn::Error) -> Self {
        Error::Syn {
            origin: origin.into(),
            source,
        }
    }
}
