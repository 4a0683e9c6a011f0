use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The empty payload carried by the `Ok` branch of a single-parameter result.
///
/// On the wire it is written as an empty string and read back from any value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unit;

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("()")
    }
}

impl From<()> for Unit {
    fn from(_: ()) -> Self {
        Unit
    }
}

impl Serialize for Unit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_writes_empty_string() {
        assert_eq!(serde_json::to_string(&Unit).unwrap(), r#""""#);
    }

    #[test]
    fn test_unit_reads_anything() {
        for json in [r#""""#, "null", "{}", "[1,2]", "42"] {
            let unit: Unit = serde_json::from_str(json).unwrap();
            assert_eq!(unit, Unit);
        }
    }
}
