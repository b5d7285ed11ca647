//! Inputs shared by every generator function.

use rustc_hash::FxHashSet;

use scriptbind_core::Conventions;
use scriptbind_registry::TypeResolver;

use crate::FallbackTable;

/// Read-only state for generating a batch of classes.
pub struct GenerationContext<'a> {
    pub resolver: &'a TypeResolver,
    pub conventions: &'a Conventions,
    pub fallbacks: &'a FallbackTable,
    /// Classes that get bindings in this run.
    bound: FxHashSet<String>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        resolver: &'a TypeResolver,
        conventions: &'a Conventions,
        fallbacks: &'a FallbackTable,
    ) -> Self {
        Self {
            resolver,
            conventions,
            fallbacks,
            bound: FxHashSet::default(),
        }
    }

    /// Declare the classes bound in this run.
    pub fn with_bound<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bound.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_bound(&self, class_name: &str) -> bool {
        self.bound.contains(class_name)
    }

    /// Script class and prototype for wrapping a native `class_name`.
    ///
    /// Unbound classes get `NULL` for both.
    pub fn js_class_refs(&self, class_name: &str) -> (String, String) {
        if self.is_bound(class_name) {
            (
                format!("S_{class_name}::jsClass"),
                format!("S_{class_name}::jsObject"),
            )
        } else {
            ("NULL".to_string(), "NULL".to_string())
        }
    }

    /// Readable name for a raw type id in messages (record name when known).
    pub fn describe_type_id(&self, raw_id: &str) -> String {
        let id = raw_id.into();
        let catalog = self.resolver.catalog();
        match catalog.record_name(&id).or_else(|| catalog.typedef_name(&id)) {
            Some(name) => format!("{name} ({raw_id})"),
            None => raw_id.to_string(),
        }
    }
}
