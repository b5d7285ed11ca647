//! Pointer fallback table.
//!
//! Some parameters are pointers to types the analyzer cannot name, typically
//! template instantiations such as `CCMutableArray<CCObject*>*`. For those,
//! the native type is picked from the parameter name (and optionally the
//! method name). The first matching entry wins; a parameter no entry matches
//! fails its method.
//!
//! The default entries:
//!
//! | param contains | method contains | native type |
//! |----------------|-----------------|-------------|
//! | `dictionary`   | `spriteframe`   | `CCDictionary<std::string,CCSpriteFrame*>` |
//! | `dictionary`   |                 | `CCDictionary<std::string,CCObject*>` |
//! | `array`        |                 | `CCMutableArray<CCObject*>` |
//! | `frames`       |                 | `CCMutableArray<CCSpriteFrame*>` |
//!
//! Matching is a case-insensitive substring test.

use serde::{Deserialize, Serialize};

/// One fallback rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackEntry {
    /// Substring of the parameter name.
    pub param: String,
    /// Substring of the method name, if the rule is method-specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Native pointee type used for the parameter.
    pub native_type: String,
}

impl FallbackEntry {
    pub fn new(param: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            method: None,
            native_type: native_type.into(),
        }
    }

    pub fn for_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    fn matches(&self, param_name: &str, method_name: &str) -> bool {
        contains_ignore_case(param_name, &self.param)
            && self
                .method
                .as_deref()
                .is_none_or(|m| contains_ignore_case(method_name, m))
    }
}

/// Ordered fallback rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackTable {
    entries: Vec<FallbackEntry>,
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self {
            entries: vec![
                FallbackEntry::new("dictionary", "CCDictionary<std::string,CCSpriteFrame*>")
                    .for_method("spriteframe"),
                FallbackEntry::new("dictionary", "CCDictionary<std::string,CCObject*>"),
                FallbackEntry::new("array", "CCMutableArray<CCObject*>"),
                FallbackEntry::new("frames", "CCMutableArray<CCSpriteFrame*>"),
            ],
        }
    }
}

impl FallbackTable {
    /// A table with no entries; every opaque pointer parameter fails.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<FallbackEntry>) -> Self {
        Self { entries }
    }

    pub fn with_entry(mut self, entry: FallbackEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[FallbackEntry] {
        &self.entries
    }

    /// Native type for a parameter, first match wins.
    pub fn lookup(&self, param_name: &str, method_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.matches(param_name, method_name))
            .map(|e| e.native_type.as_str())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_entries_in_order() {
        let table = FallbackTable::default();
        assert_eq!(
            table.lookup("pobDictionary", "addSpriteFramesWithDictionary"),
            Some("CCDictionary<std::string,CCSpriteFrame*>")
        );
        assert_eq!(
            table.lookup("dictionary", "initWithDictionary"),
            Some("CCDictionary<std::string,CCObject*>")
        );
        assert_eq!(
            table.lookup("arrayOfItems", "initWithArray"),
            Some("CCMutableArray<CCObject*>")
        );
        assert_eq!(
            table.lookup("pFrames", "initWithFrames"),
            Some("CCMutableArray<CCSpriteFrame*>")
        );
        assert_eq!(table.lookup("pData", "initWithData"), None);
    }

    #[test]
    fn empty_table_matches_nothing() {
        assert_eq!(FallbackTable::empty().lookup("array", "x"), None);
    }

    #[test]
    fn custom_entries_append() {
        let table = FallbackTable::empty().with_entry(FallbackEntry::new("list", "CCArray"));
        assert_eq!(table.lookup("pList", "initWithList"), Some("CCArray"));
        assert_eq!(table.entries().len(), 1);
    }
}
