//! Wire envelopes for generated unions and results.
//!
//! Two shapes coexist:
//! - unions: `{ "tag": "Circle", "value": { ... } }`
//! - results: `{ "IsOk": true, "Ok": 4 }` or `{ "IsOk": false, "Err": "boom" }`
//!
//! Only the envelope is handled here; payloads go through their own serde
//! impls. Generated types route their `Serialize`/`Deserialize` impls through
//! [`serialize_envelope`], [`UnionSeed`], [`serialize_result`] and
//! [`ResultSeed`], so each concrete type is bound to its codec statically.

mod options;
mod result;
mod union;

pub use options::CodecOptions;
pub use result::{ResultSeed, serialize_result};
pub use union::{UnionCodec, UnionSeed, serialize_envelope};

use serde::de::DeserializeSeed;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::outcome::Fallible;

/// JSON front door carrying a fixed set of [`CodecOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    pub fn to_string<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(CodecError::Encode)
    }

    pub fn to_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<serde_json::Value> {
        serde_json::to_value(value).map_err(CodecError::Encode)
    }

    /// Decode a union envelope honouring this codec's options.
    pub fn union_from_str<U: UnionCodec>(&self, src: &str) -> Result<U> {
        let seed = UnionSeed::<U>::new(self.options);
        decode_seed(seed, &mut serde_json::Deserializer::from_str(src))
    }

    pub fn union_from_slice<U: UnionCodec>(&self, bytes: &[u8]) -> Result<U> {
        let seed = UnionSeed::<U>::new(self.options);
        decode_seed(seed, &mut serde_json::Deserializer::from_slice(bytes))
    }

    /// Decode a result envelope honouring this codec's options.
    pub fn result_from_str<R>(&self, src: &str) -> Result<R>
    where
        R: Fallible,
        R::Ok: for<'de> Deserialize<'de>,
        R::Err: for<'de> Deserialize<'de>,
    {
        let seed = ResultSeed::<R>::new(self.options);
        decode_seed(seed, &mut serde_json::Deserializer::from_str(src))
    }

    pub fn result_from_slice<R>(&self, bytes: &[u8]) -> Result<R>
    where
        R: Fallible,
        R::Ok: for<'de> Deserialize<'de>,
        R::Err: for<'de> Deserialize<'de>,
    {
        let seed = ResultSeed::<R>::new(self.options);
        decode_seed(seed, &mut serde_json::Deserializer::from_slice(bytes))
    }
}

fn decode_seed<'de, S, R>(seed: S, de: &mut serde_json::Deserializer<R>) -> Result<S::Value>
where
    S: DeserializeSeed<'de>,
    R: serde_json::de::Read<'de>,
{
    let mut track = serde_path_to_error::Track::new();
    let decoded = seed.deserialize(serde_path_to_error::Deserializer::new(&mut *de, &mut track));
    let value = decoded.map_err(|source| CodecError::Decode {
        path: track.path().to_string(),
        source,
    })?;
    de.end()
        .map_err(|err| CodecError::Decode { path: ".".to_string(), source: err })?;
    Ok(value)
}
