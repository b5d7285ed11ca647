use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a type entity in the analyzer document.
///
/// The generator never looks inside a `TypeId`; it is only compared and
/// hashed. Analyzer dumps typically use ids like `_T42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(String);

impl TypeId {
    const MISSING: &'static str = "<missing>";

    /// Create a type id from its raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Stand-in for a type reference the analyzer left out.
    ///
    /// No catalog entry ever carries this id, so it always resolves as
    /// unresolved and only the member that uses it degrades.
    pub fn missing() -> Self {
        Self(Self::MISSING.to_string())
    }

    pub fn is_missing(&self) -> bool {
        self.0 == Self::MISSING
    }

    /// The raw identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TypeId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_id_is_opaque_key() {
        let a = TypeId::new("_T1");
        let b = TypeId::from("_T1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "_T1");
        assert_eq!(a.to_string(), "_T1");
        assert_ne!(a, TypeId::from("_T2"));
    }

    #[test]
    fn missing_id_is_distinct() {
        assert!(TypeId::missing().is_missing());
        assert!(!TypeId::from("_T1").is_missing());
    }
}
