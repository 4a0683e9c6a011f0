use serde::{Deserialize, Serialize};

/// Settings shared by every envelope decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CodecOptions {
    /// Match envelope keys and union tags ignoring ASCII case.
    pub case_insensitive: bool,
}

impl CodecOptions {
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
        }
    }

    pub(crate) fn names_match(&self, expected: &str, found: &str) -> bool {
        if self.case_insensitive {
            expected.eq_ignore_ascii_case(found)
        } else {
            expected == found
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_case_sensitive() {
        let options = CodecOptions::default();
        assert!(options.names_match("Circle", "Circle"));
        assert!(!options.names_match("Circle", "circle"));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let options = CodecOptions::case_insensitive();
        assert!(options.names_match("Circle", "CIRCLE"));
        assert!(!options.names_match("Circle", "Circles"));
    }

    #[test]
    fn test_options_load_from_toml_like_json() {
        let options: CodecOptions = serde_json::from_str(r#"{"case_insensitive": true}"#).unwrap();
        assert!(options.case_insensitive);
        let options: CodecOptions = serde_json::from_str("{}").unwrap();
        assert!(!options.case_insensitive);
    }
}
