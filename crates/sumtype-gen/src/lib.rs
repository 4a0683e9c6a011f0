//! Build-time generation of tagged unions and results.
//!
//! Declarations are marker structs in ordinary Rust files:
//!
//! ```text
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[union(Circle, Square, Triangle)]
//! pub struct Shape;
//!
//! #[result(Shape, String)]
//! pub struct Drawn;
//! ```
//!
//! The pass scans every file, validates each declaration, and replaces every
//! valid shell with a generated enum plus its dispatch, conversion and codec
//! impls. Invalid declarations are reported as [`Diagnostic`]s and left in
//! place without their marker.
//!
//! The usual entry point is [`Builder`], called from `build.rs`:
//!
//! ```no_run
//! sumtype_gen::Builder::new()
//!     .file("decls/shapes.rs")
//!     .compile()
//!     .unwrap();
//! ```

pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod expand;
pub mod model;
pub mod naming;
pub mod resolver;
pub mod scan;
pub mod synth;

pub use builder::{Builder, Report};
pub use config::{CONFIG_FILE_NAME, GenConfig, discover_config};
pub use diagnostics::{Diagnostic, DiagnosticCode};
pub use error::{Error, Result};
pub use expand::{Expansion, Session, expand_source};
