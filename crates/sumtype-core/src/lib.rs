//! Runtime support for generated sum types.
//!
//! The generation pass (`sumtype-gen`) turns each declared variant set into a
//! plain Rust enum. Everything those enums share lives here:
//!
//! - [`TaggedUnion`]: identity tests and erased access for unions
//! - [`Outcome`] and [`Fallible`]: the two-tag success/failure model and its
//!   combinators
//! - [`OutcomeBuilder`]: turns returned errors into `Err` values by exact type
//! - [`codec`]: the `{tag, value}` and `{IsOk, Ok|Err}` wire envelopes

pub mod builder;
pub mod codec;
pub mod error;
pub mod outcome;
pub mod union;
pub mod unit;

pub use builder::{BoxError, OutcomeBuilder};
pub use codec::{Codec, CodecOptions, ResultSeed, UnionCodec, UnionSeed};
pub use error::{CodecError, UnionError};
pub use outcome::{Fallible, Outcome};
pub use union::TaggedUnion;
pub use unit::Unit;

// Generated codec impls name serde through the runtime crate.
#[doc(hidden)]
pub use serde;
