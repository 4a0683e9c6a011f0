use serde::de::value::UnitDeserializer;
use serde::de::{self, DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, Visitor};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use super::options::CodecOptions;
use crate::outcome::{Fallible, Outcome};

const IS_OK_KEY: &str = "IsOk";
const OK_KEY: &str = "Ok";
const ERR_KEY: &str = "Err";

/// Write `{ "IsOk": true, "Ok": .. }` or `{ "IsOk": false, "Err": .. }`.
///
/// The absent branch is omitted, never written as null.
pub fn serialize_result<S, T, E>(serializer: S, outcome: Outcome<&T, &E>) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
    E: Serialize + ?Sized,
{
    let mut envelope = serializer.serialize_struct("Result", 2)?;
    match outcome {
        Outcome::Ok(ok) => {
            envelope.serialize_field(IS_OK_KEY, &true)?;
            envelope.serialize_field(OK_KEY, ok)?;
        }
        Outcome::Err(err) => {
            envelope.serialize_field(IS_OK_KEY, &false)?;
            envelope.serialize_field(ERR_KEY, err)?;
        }
    }
    envelope.end()
}

impl<T: Serialize, E: Serialize> Serialize for Outcome<T, E> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_result(serializer, self.as_ref())
    }
}

impl<'de, T: Deserialize<'de>, E: Deserialize<'de>> Deserialize<'de> for Outcome<T, E> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ResultSeed::<Self>::default().deserialize(deserializer)
    }
}

/// Decodes an `{IsOk, Ok|Err}` envelope into any [`Fallible`].
pub struct ResultSeed<R> {
    options: CodecOptions,
    _result: PhantomData<fn() -> R>,
}

impl<R> ResultSeed<R> {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            options,
            _result: PhantomData,
        }
    }
}

impl<R> Default for ResultSeed<R> {
    fn default() -> Self {
        Self::new(CodecOptions::default())
    }
}

impl<'de, R> DeserializeSeed<'de> for ResultSeed<R>
where
    R: Fallible,
    R::Ok: Deserialize<'de>,
    R::Err: Deserialize<'de>,
{
    type Value = R;

    fn deserialize<D>(self, deserializer: D) -> Result<R, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ResultVisitor::<R> {
            options: self.options,
            _result: PhantomData,
        })
    }
}

struct ResultVisitor<R> {
    options: CodecOptions,
    _result: PhantomData<fn() -> R>,
}

impl<'de, R> Visitor<'de> for ResultVisitor<R>
where
    R: Fallible,
    R::Ok: Deserialize<'de>,
    R::Err: Deserialize<'de>,
{
    type Value = R;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a result envelope like { \"IsOk\": true, \"Ok\": ... }")
    }

    fn visit_map<M>(self, mut map: M) -> Result<R, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut is_ok: Option<bool> = None;
        let mut ok: Option<R::Ok> = None;
        let mut err: Option<R::Err> = None;

        while let Some(key) = map.next_key::<String>()? {
            if self.options.names_match(IS_OK_KEY, &key) {
                if is_ok.is_some() {
                    return Err(de::Error::duplicate_field(IS_OK_KEY));
                }
                is_ok = Some(map.next_value()?);
            } else if self.options.names_match(OK_KEY, &key) {
                if ok.is_some() {
                    return Err(de::Error::duplicate_field(OK_KEY));
                }
                ok = Some(map.next_value()?);
            } else if self.options.names_match(ERR_KEY, &key) {
                if err.is_some() {
                    return Err(de::Error::duplicate_field(ERR_KEY));
                }
                err = Some(map.next_value()?);
            } else {
                map.next_value::<de::IgnoredAny>()?;
            }
        }

        let is_ok = is_ok.ok_or_else(|| de::Error::missing_field(IS_OK_KEY))?;
        match (is_ok, ok, err) {
            (_, Some(_), Some(_)) => Err(de::Error::custom(
                "result envelope carries both `Ok` and `Err`",
            )),
            (true, Some(ok), None) => Ok(R::from_ok(ok)),
            (true, None, None) => {
                // An empty success payload (e.g. `Unit`) may be left out.
                let unit: UnitDeserializer<M::Error> = ().into_deserializer();
                <R::Ok as Deserialize<'de>>::deserialize(unit)
                    .map(R::from_ok)
                    .map_err(|_| de::Error::missing_field(OK_KEY))
            }
            (false, None, Some(err)) => Ok(R::from_err(err)),
            (false, None, None) => Err(de::Error::missing_field(ERR_KEY)),
            (true, None, Some(_)) => Err(de::Error::custom(
                "`IsOk` is true but the envelope carries `Err`",
            )),
            (false, Some(_), None) => Err(de::Error::custom(
                "`IsOk` is false but the envelope carries `Ok`",
            )),
        }
    }
}
