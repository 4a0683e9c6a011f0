use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

use super::options::CodecOptions;
use crate::union::TaggedUnion;

const TAG_KEY: &str = "tag";
const VALUE_KEY: &str = "value";
const FIELDS: &[&str] = &[TAG_KEY, VALUE_KEY];

/// Per-type decoding hook emitted by the generator.
pub trait UnionCodec: TaggedUnion {
    /// Deserialize the payload of variant `tag` and wrap it.
    fn decode_variant<'de, D>(tag: usize, deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>;
}

/// Write `{ "tag": tag, "value": value }`.
pub fn serialize_envelope<S, T>(serializer: S, tag: &str, value: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let mut envelope = serializer.serialize_struct("Envelope", 2)?;
    envelope.serialize_field(TAG_KEY, tag)?;
    envelope.serialize_field(VALUE_KEY, value)?;
    envelope.end()
}

/// Decodes a `{tag, value}` envelope into `U`, in either key order.
pub struct UnionSeed<U> {
    options: CodecOptions,
    _union: PhantomData<fn() -> U>,
}

impl<U> UnionSeed<U> {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            options,
            _union: PhantomData,
        }
    }
}

impl<U> Default for UnionSeed<U> {
    fn default() -> Self {
        Self::new(CodecOptions::default())
    }
}

impl<'de, U: UnionCodec> DeserializeSeed<'de> for UnionSeed<U> {
    type Value = U;

    fn deserialize<D>(self, deserializer: D) -> Result<U, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(EnvelopeVisitor::<U> {
            options: self.options,
            _union: PhantomData,
        })
    }
}

struct EnvelopeVisitor<U> {
    options: CodecOptions,
    _union: PhantomData<fn() -> U>,
}

impl<U: UnionCodec> EnvelopeVisitor<U> {
    fn resolve<E: de::Error>(&self, name: &str) -> Result<usize, E> {
        U::VARIANTS
            .iter()
            .position(|variant| self.options.names_match(variant, name))
            .ok_or_else(|| de::Error::unknown_variant(name, U::VARIANTS))
    }
}

impl<'de, U: UnionCodec> Visitor<'de> for EnvelopeVisitor<U> {
    type Value = U;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a union envelope like { \"tag\": \"Variant\", \"value\": ... }")
    }

    fn visit_map<M>(self, mut map: M) -> Result<U, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut tag: Option<usize> = None;
        let mut decoded: Option<U> = None;
        // Holds the payload when it arrives before the tag.
        let mut buffered: Option<serde_json::Value> = None;

        while let Some(key) = map.next_key::<String>()? {
            if self.options.names_match(TAG_KEY, &key) {
                if tag.is_some() {
                    return Err(de::Error::duplicate_field(TAG_KEY));
                }
                let name: String = map.next_value()?;
                tag = Some(self.resolve(&name)?);
            } else if self.options.names_match(VALUE_KEY, &key) {
                if decoded.is_some() || buffered.is_some() {
                    return Err(de::Error::duplicate_field(VALUE_KEY));
                }
                match tag {
                    Some(index) => {
                        decoded = Some(map.next_value_seed(PayloadSeed::<U> {
                            tag: index,
                            _union: PhantomData,
                        })?)
                    }
                    None => buffered = Some(map.next_value()?),
                }
            } else {
                return Err(de::Error::unknown_field(&key, FIELDS));
            }
        }

        let tag = tag.ok_or_else(|| de::Error::missing_field(TAG_KEY))?;
        if let Some(union) = decoded {
            return Ok(union);
        }
        let value = buffered.ok_or_else(|| de::Error::missing_field(VALUE_KEY))?;
        U::decode_variant(tag, value).map_err(de::Error::custom)
    }
}

struct PayloadSeed<U> {
    tag: usize,
    _union: PhantomData<fn() -> U>,
}

impl<'de, U: UnionCodec> DeserializeSeed<'de> for PayloadSeed<U> {
    type Value = U;

    fn deserialize<D>(self, deserializer: D) -> Result<U, D::Error>
    where
        D: Deserializer<'de>,
    {
        U::decode_variant(self.tag, deserializer)
    }
}
