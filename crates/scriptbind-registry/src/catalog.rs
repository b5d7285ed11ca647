//! TypeCatalog - every type entity of the analyzer document, by kind.
//!
//! The catalog is the first resolution phase: it sorts raw type entries into
//! per-kind tables without interpreting how they refer to each other. The
//! [`TypeResolver`](crate::TypeResolver) builds on top of it.
//!
//! # Storage Model
//!
//! - **Leaf tables**: fundamentals and classes classify themselves.
//! - **Wrapper tables**: pointers, references and const/volatile entries
//!   point at another id that may not be classified yet.
//! - **Typedefs**: substituted away before any lookup (`real_type`).
//!
//! Only records with a definition in the translation unit enter the class
//! table; a record that is only ever forward-declared stays unknown.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use scriptbind_core::{InputDocument, RawType, TypeId};

/// A const/volatile wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvEntry {
    pub wrapped: TypeId,
    /// Only set for `const="1"`; volatile-only wrappers are transparent.
    pub is_const: bool,
}

/// A typedef: declared alias name and aliased id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefEntry {
    pub name: String,
    pub aliased: TypeId,
}

/// Wrapper entries that take part in the fixpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    Pointer,
    CvQualified,
    Reference,
}

/// Per-kind tables of type entities.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    // === Leaf Tables ===
    fundamentals: FxHashMap<TypeId, String>,
    /// Defined classes and structs: id -> name.
    classes: FxHashMap<TypeId, String>,
    /// Every record name, defined or not.
    records: FxHashMap<TypeId, String>,

    // === Wrapper Tables ===
    pointers: FxHashMap<TypeId, TypeId>,
    references: FxHashMap<TypeId, TypeId>,
    cv_qualified: FxHashMap<TypeId, CvEntry>,
    /// Wrapper ids in document order.
    wrapper_order: Vec<(TypeId, WrapperKind)>,

    // === Aliases ===
    typedefs: FxHashMap<TypeId, TypedefEntry>,
    /// Typedefs whose alias chain loops.
    cyclic_typedefs: FxHashSet<TypeId>,
}

impl TypeCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort every type entry of `document` into its table.
    ///
    /// Repeated ids keep their first entry.
    pub fn from_document(document: &InputDocument) -> Self {
        let mut catalog = Self::new();
        let defined: FxHashSet<&TypeId> = document.classes.iter().map(|c| &c.type_id).collect();

        for entry in &document.types {
            let id = entry.id.clone();
            if catalog.contains(&id) {
                continue;
            }
            match &entry.ty {
                RawType::Fundamental { kind } => {
                    catalog.fundamentals.insert(id, kind.clone());
                }
                RawType::Pointer { pointee } => {
                    catalog.pointers.insert(id.clone(), pointee.clone());
                    catalog.wrapper_order.push((id, WrapperKind::Pointer));
                }
                RawType::Reference { referenced } => {
                    catalog.references.insert(id.clone(), referenced.clone());
                    catalog.wrapper_order.push((id, WrapperKind::Reference));
                }
                RawType::CvQualified {
                    wrapped, is_const, ..
                } => {
                    catalog.cv_qualified.insert(
                        id.clone(),
                        CvEntry {
                            wrapped: wrapped.clone(),
                            is_const: *is_const,
                        },
                    );
                    catalog.wrapper_order.push((id, WrapperKind::CvQualified));
                }
                RawType::Typedef { name, aliased } => {
                    catalog.typedefs.insert(
                        id,
                        TypedefEntry {
                            name: name.clone(),
                            aliased: aliased.clone(),
                        },
                    );
                }
                RawType::Record { name, .. } => {
                    if defined.contains(&id) {
                        catalog.classes.insert(id.clone(), name.clone());
                    }
                    catalog.records.insert(id, name.clone());
                }
            }
        }

        catalog.find_typedef_cycles();
        catalog
    }

    fn contains(&self, id: &TypeId) -> bool {
        self.fundamentals.contains_key(id)
            || self.records.contains_key(id)
            || self.pointers.contains_key(id)
            || self.references.contains_key(id)
            || self.cv_qualified.contains_key(id)
            || self.typedefs.contains_key(id)
    }

    fn find_typedef_cycles(&mut self) {
        let mut ids: Vec<&TypeId> = self.typedefs.keys().collect();
        ids.sort();

        let mut cyclic = FxHashSet::default();
        for start in ids {
            let mut visited = FxHashSet::default();
            let mut current = start;
            while let Some(td) = self.typedefs.get(current) {
                if !visited.insert(current) {
                    warn!(typedef = %start, name = %td.name, "typedef cycle");
                    cyclic.insert(start.clone());
                    break;
                }
                current = &td.aliased;
            }
        }
        self.cyclic_typedefs = cyclic;
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Substitute typedefs until none applies.
    ///
    /// Returns `None` when the alias chain loops.
    pub fn real_type<'a>(&'a self, id: &'a TypeId) -> Option<&'a TypeId> {
        if self.cyclic_typedefs.contains(id) {
            return None;
        }
        let mut current = id;
        while let Some(td) = self.typedefs.get(current) {
            current = &td.aliased;
        }
        Some(current)
    }

    /// Declared alias name, if `id` is a typedef.
    pub fn typedef_name(&self, id: &TypeId) -> Option<&str> {
        self.typedefs.get(id).map(|td| td.name.as_str())
    }

    pub fn fundamental(&self, id: &TypeId) -> Option<&str> {
        self.fundamentals.get(id).map(String::as_str)
    }

    /// Name of a defined class or struct.
    pub fn class_name(&self, id: &TypeId) -> Option<&str> {
        self.classes.get(id).map(String::as_str)
    }

    /// Name of any record, defined or only forward-declared.
    pub fn record_name(&self, id: &TypeId) -> Option<&str> {
        self.records.get(id).map(String::as_str)
    }

    pub fn pointee(&self, id: &TypeId) -> Option<&TypeId> {
        self.pointers.get(id)
    }

    pub fn referenced(&self, id: &TypeId) -> Option<&TypeId> {
        self.references.get(id)
    }

    pub fn cv_qualified(&self, id: &TypeId) -> Option<&CvEntry> {
        self.cv_qualified.get(id)
    }

    /// Wrapper ids (pointers, references, cv entries) in document order.
    pub fn wrappers(&self) -> &[(TypeId, WrapperKind)] {
        &self.wrapper_order
    }

    // ==========================================================================
    // Counts
    // ==========================================================================

    pub fn fundamental_count(&self) -> usize {
        self.fundamentals.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    pub fn cv_count(&self) -> usize {
        self.cv_qualified.len()
    }

    pub fn typedef_count(&self) -> usize {
        self.typedefs.len()
    }

    /// Total number of catalogued entries.
    pub fn len(&self) -> usize {
        self.fundamentals.len()
            + self.records.len()
            + self.pointers.len()
            + self.references.len()
            + self.cv_qualified.len()
            + self.typedefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
