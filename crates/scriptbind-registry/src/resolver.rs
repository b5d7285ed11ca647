//! TypeResolver - `TypeId -> TypeDescriptor` over a [`TypeCatalog`].
//!
//! # Phases
//!
//! 1. **Seeding**: every wrapper entry (pointer, reference, const/volatile)
//!    gets a slot. Slots whose target is a fundamental or a class resolve
//!    immediately; slots waiting on another wrapper register themselves in
//!    that wrapper's dependents list.
//! 2. **Fixpoint**: pending slots are retried until an iteration makes no
//!    progress. Resolving a slot drains its dependents list, so a chain of
//!    wrappers settles as soon as its innermost link does.
//!
//! After [`TypeResolver::new`] returns, the resolver is read-only.
//! [`TypeResolver::resolve`] is total: ids that never resolved come back as
//! [`TypeCategory::Unresolved`](scriptbind_core::TypeCategory::Unresolved).
//!
//! # Example
//!
//! ```
//! use scriptbind_core::{InputDocument, RawClass, RawTypeEntry, TypeCategory};
//! use scriptbind_registry::TypeResolver;
//!
//! let doc = InputDocument::new()
//!     .with_type(RawTypeEntry::pointer("_1", "_2"))
//!     .with_type(RawTypeEntry::class("_2", "CCNode"))
//!     .with_class(RawClass::new("_2", "CCNode"));
//!
//! let resolver = TypeResolver::from_document(&doc);
//! let parent = resolver.resolve(&"_1".into());
//! assert_eq!(parent.category, TypeCategory::Pointer);
//! assert_eq!(parent.name, "CCNode");
//! ```

use std::mem;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use scriptbind_core::{InputDocument, TargetKind, TypeDescriptor, TypeId};

use crate::catalog::{TypeCatalog, WrapperKind};

/// What a resolved wrapper designates.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SlotTarget {
    kind: TargetKind,
    name: String,
}

impl SlotTarget {
    fn new(kind: TargetKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    kind: WrapperKind,
    target: Option<SlotTarget>,
    /// Slots waiting on this one.
    dependents: Vec<TypeId>,
}

/// Outcome of one classification attempt.
enum Attempt {
    Resolved(SlotTarget),
    /// The target is another wrapper that has not resolved yet.
    Waiting(TypeId),
    /// The target is not a kind this wrapper can designate.
    Failed,
}

/// Counts gathered while resolving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub fundamentals: usize,
    pub classes: usize,
    pub pointers: usize,
    pub references: usize,
    pub cv_qualified: usize,
    pub typedefs: usize,
    /// Fixpoint iterations run in phase 2.
    pub iterations: usize,
    /// Wrappers that never resolved, in document order.
    pub unresolved: Vec<TypeId>,
}

/// Resolves type ids to descriptors.
#[derive(Debug)]
pub struct TypeResolver {
    catalog: TypeCatalog,
    slots: FxHashMap<TypeId, Slot>,
    iterations: usize,
}

impl TypeResolver {
    /// Build and settle a resolver over `catalog`.
    pub fn new(catalog: TypeCatalog) -> Self {
        let mut resolver = Self {
            catalog,
            slots: FxHashMap::default(),
            iterations: 0,
        };
        resolver.seed();
        resolver.run_fixpoint();
        resolver
    }

    /// Catalog `document` and build a resolver over it.
    pub fn from_document(document: &InputDocument) -> Self {
        Self::new(TypeCatalog::from_document(document))
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    // ==========================================================================
    // Phase 1: Seeding
    // ==========================================================================

    fn seed(&mut self) {
        for (id, kind) in self.catalog.wrappers() {
            self.slots.insert(
                id.clone(),
                Slot {
                    kind: *kind,
                    target: None,
                    dependents: Vec::new(),
                },
            );
        }
        let order: Vec<TypeId> = self.catalog.wrappers().iter().map(|(id, _)| id.clone()).collect();
        for id in order {
            self.attempt(&id);
        }
    }

    // ==========================================================================
    // Phase 2: Fixpoint
    // ==========================================================================

    fn run_fixpoint(&mut self) {
        let bound = self.slots.len() + 1;
        loop {
            let pending: Vec<TypeId> = self
                .catalog
                .wrappers()
                .iter()
                .map(|(id, _)| id)
                .filter(|id| self.slots.get(*id).is_some_and(|s| s.target.is_none()))
                .cloned()
                .collect();
            if pending.is_empty() || self.iterations >= bound {
                break;
            }

            self.iterations += 1;
            let mut progressed = false;
            for id in &pending {
                progressed |= self.attempt(id);
            }
            if !progressed {
                break;
            }
        }

        let unresolved = self.unresolved_wrappers();
        debug!(
            iterations = self.iterations,
            slots = self.slots.len(),
            unresolved = unresolved.len(),
            "type resolution settled"
        );
        for id in unresolved {
            warn!(type_id = %id, "type never resolved");
        }
    }

    /// Try to resolve one slot. Returns `true` if it settled.
    fn attempt(&mut self, id: &TypeId) -> bool {
        let Some(slot) = self.slots.get(id) else {
            return false;
        };
        if slot.target.is_some() {
            return false;
        }
        match self.classify(id, slot.kind) {
            Attempt::Resolved(target) => {
                self.settle(id.clone(), target);
                true
            }
            Attempt::Waiting(on) => {
                if let Some(dependency) = self.slots.get_mut(&on) {
                    if !dependency.dependents.contains(id) {
                        dependency.dependents.push(id.clone());
                    }
                }
                false
            }
            Attempt::Failed => false,
        }
    }

    /// Record a target and drain the dependents lists it unblocks.
    fn settle(&mut self, id: TypeId, target: SlotTarget) {
        let mut work = vec![(id, target)];
        while let Some((id, target)) = work.pop() {
            let Some(slot) = self.slots.get_mut(&id) else {
                continue;
            };
            if slot.target.is_some() {
                continue;
            }
            slot.target = Some(target.clone());
            for dependent in mem::take(&mut slot.dependents) {
                work.push((dependent, target.clone()));
            }
        }
    }

    fn classify(&self, id: &TypeId, kind: WrapperKind) -> Attempt {
        let inner = match kind {
            WrapperKind::Pointer => self.catalog.pointee(id),
            WrapperKind::Reference => self.catalog.referenced(id),
            WrapperKind::CvQualified => self.catalog.cv_qualified(id).map(|cv| &cv.wrapped),
        };
        let Some(inner) = inner else {
            return Attempt::Failed;
        };
        let Some(real) = self.catalog.real_type(inner) else {
            return Attempt::Failed;
        };

        if let Some(fundamental) = self.catalog.fundamental(real) {
            return Attempt::Resolved(SlotTarget::new(TargetKind::Fundamental, fundamental));
        }
        if let Some(class) = self.catalog.class_name(real) {
            return Attempt::Resolved(SlotTarget::new(TargetKind::Class, class));
        }
        if self.catalog.pointee(real).is_some() {
            // A pointer or a reference to a pointer stays opaque.
            return match kind {
                WrapperKind::Reference => Attempt::Failed,
                _ => Attempt::Resolved(SlotTarget::new(TargetKind::Pointer, real.as_str())),
            };
        }
        if self.catalog.cv_qualified(real).is_some() {
            return self.follow(real);
        }
        if self.catalog.referenced(real).is_some() {
            // only a cv wrapper may wrap a reference; it adds nothing
            return match kind {
                WrapperKind::CvQualified => self.follow(real),
                _ => Attempt::Failed,
            };
        }
        Attempt::Failed
    }

    /// Take over the target of the wrapper `inner`, or wait for it.
    fn follow(&self, inner: &TypeId) -> Attempt {
        match self.slot_target(inner) {
            Some(target) => Attempt::Resolved(target.clone()),
            None => Attempt::Waiting(inner.clone()),
        }
    }

    fn unresolved_wrappers(&self) -> Vec<TypeId> {
        self.catalog
            .wrappers()
            .iter()
            .filter(|(id, _)| self.slots.get(id).is_some_and(|s| s.target.is_none()))
            .map(|(id, _)| id.clone())
            .collect()
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// Resolve a type id. Never fails.
    ///
    /// Typedefs are substituted first, so any number of alias layers
    /// resolves exactly like the final target.
    pub fn resolve(&self, id: &TypeId) -> TypeDescriptor {
        self.resolve_at(id, 0)
    }

    fn resolve_at(&self, id: &TypeId, depth: usize) -> TypeDescriptor {
        let Some(real) = self.catalog.real_type(id) else {
            return TypeDescriptor::unresolved(id.as_str());
        };
        if depth > self.slots.len() {
            return TypeDescriptor::unresolved(real.as_str());
        }

        if let Some(cv) = self.catalog.cv_qualified(real) {
            let inner = self.resolve_at(&cv.wrapped, depth + 1);
            return match (inner.is_resolved(), cv.is_const) {
                (false, _) => TypeDescriptor::unresolved(real.as_str()),
                (true, true) => inner.with_const(),
                (true, false) => inner,
            };
        }
        if let Some(kind) = self.catalog.fundamental(real) {
            return TypeDescriptor::fundamental(kind);
        }
        if let Some(pointee) = self.catalog.pointee(real) {
            return match self.slot_target(real) {
                Some(target) => TypeDescriptor::pointer(target.kind, target.name.as_str()),
                None => TypeDescriptor::pointer(TargetKind::Unknown, pointee.as_str()),
            };
        }
        if let Some(name) = self.catalog.class_name(real) {
            return TypeDescriptor::class(name);
        }
        if self.catalog.referenced(real).is_some() {
            if let Some(target) = self.slot_target(real) {
                let reference = TypeDescriptor::reference(target.kind, target.name.as_str());
                // const is recorded on the referenced cv entry
                if self.referenced_is_const(real) {
                    return reference.with_const();
                }
                return reference;
            }
        }
        TypeDescriptor::unresolved(real.as_str())
    }

    fn slot_target(&self, id: &TypeId) -> Option<&SlotTarget> {
        self.slots.get(id).and_then(|s| s.target.as_ref())
    }

    fn referenced_is_const(&self, id: &TypeId) -> bool {
        self.catalog
            .referenced(id)
            .and_then(|inner| self.catalog.real_type(inner))
            .and_then(|real| self.catalog.cv_qualified(real))
            .is_some_and(|cv| cv.is_const)
    }

    /// Declared alias name of `id`, if it is a typedef.
    pub fn typedef_name(&self, id: &TypeId) -> Option<&str> {
        self.catalog.typedef_name(id)
    }

    /// Name of the defined class `id` designates (after typedefs).
    pub fn class_name(&self, id: &TypeId) -> Option<&str> {
        self.catalog
            .real_type(id)
            .and_then(|real| self.catalog.class_name(real))
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            fundamentals: self.catalog.fundamental_count(),
            classes: self.catalog.class_count(),
            pointers: self.catalog.pointer_count(),
            references: self.catalog.reference_count(),
            cv_qualified: self.catalog.cv_count(),
            typedefs: self.catalog.typedef_count(),
            iterations: self.iterations,
            unresolved: self.unresolved_wrappers(),
        }
    }
}
