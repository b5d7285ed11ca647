//! Class entity.
//!
//! This module provides `ClassEntity`, the structured model of one class as
//! the code generator sees it.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::TypeId;

use super::{MethodDescriptor, MethodKind, OverloadSet, OverrideKind, PropertyDescriptor};

/// Model of one class.
///
/// Property and method maps keep source declaration order; generated
/// property ids are assigned by position, so that order is part of the
/// output contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassEntity {
    pub name: String,
    /// Record id in the analyzer document.
    pub type_id: TypeId,

    // === Inheritance ===
    /// First declared base, modeled once and shared between subclasses.
    pub base: Option<Arc<ClassEntity>>,
    /// Bases beyond the first, kept only so they can be reported.
    pub extra_bases: Vec<TypeId>,

    // === Members ===
    pub properties: IndexMap<String, PropertyDescriptor>,
    pub methods: IndexMap<String, OverloadSet>,

    // === Lifecycle ===
    /// Constructed only through its static factory.
    pub singleton: bool,
    /// At least one constructor was declared.
    pub has_constructor: bool,
    /// A public zero-argument constructor exists (or none was declared at all).
    pub has_default_constructor: bool,
    /// A per-frame update override must be generated.
    pub needs_update: bool,
}

impl ClassEntity {
    /// Create an empty, default-constructible class.
    pub fn new(name: impl Into<String>, type_id: impl Into<TypeId>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            base: None,
            extra_bases: Vec::new(),
            properties: IndexMap::new(),
            methods: IndexMap::new(),
            singleton: false,
            has_constructor: false,
            has_default_constructor: true,
            needs_update: false,
        }
    }

    // === Builder Methods ===

    pub fn with_base(mut self, base: Arc<ClassEntity>) -> Self {
        self.base = Some(base);
        self
    }

    /// Add a property. A repeated name replaces the earlier value but keeps its position.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    /// Add a method overload under `kind`.
    pub fn with_method(mut self, kind: MethodKind, method: MethodDescriptor) -> Self {
        self.add_method(kind, method);
        self
    }

    pub fn as_singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Append an overload, grouping by name. The first overload fixes the set's kind.
    pub fn add_method(&mut self, kind: MethodKind, method: MethodDescriptor) {
        match self.methods.get_mut(&method.name) {
            Some(set) => set.push(method),
            None => {
                self.methods
                    .insert(method.name.clone(), OverloadSet::new(kind, method));
            }
        }
    }

    // === Query Methods ===

    /// Iterate the base chain, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &ClassEntity> {
        std::iter::successors(self.base.as_deref(), |c| c.base.as_deref())
    }

    /// Check whether this class is `name` or inherits from it.
    pub fn is_or_descends_from(&self, name: &str) -> bool {
        self.name == name || self.ancestors().any(|a| a.name == name)
    }

    /// Find a property by name.
    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Find the dispatch overload of a method by name.
    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name).map(OverloadSet::first)
    }

    /// Properties with their generated enumeration ids (starting at 1).
    pub fn property_ids(&self) -> impl Iterator<Item = (u32, &PropertyDescriptor)> {
        (1u32..).zip(self.properties.values())
    }

    /// Overload sets called from script, in declaration order.
    pub fn dispatched_methods(&self) -> impl Iterator<Item = &OverloadSet> {
        self.methods.values().filter(|s| s.kind.is_dispatched())
    }

    /// Overload sets forwarded into script, with their kind.
    ///
    /// `Update` sets are excluded; they only contribute through `needs_update`.
    pub fn override_methods(&self) -> impl Iterator<Item = (OverrideKind, &OverloadSet)> {
        self.methods.values().filter_map(|s| match s.kind {
            MethodKind::Override(OverrideKind::Update) => None,
            MethodKind::Override(kind) => Some((kind, s)),
            _ => None,
        })
    }
}
