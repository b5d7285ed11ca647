//! ClassModelBuilder - class declarations to [`ClassEntity`] models.
//!
//! Models are built on demand and memoized by record id, so a base class
//! shared by many subclasses is modeled once and shared through `Arc`.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use scriptbind_core::{
    ClassEntity, Conventions, Diagnostic, InputDocument, MethodDescriptor, MethodKind,
    ParamDescriptor, PropertyDescriptor, RawClass, RawMethod, TypeId,
};
use scriptbind_registry::TypeResolver;

use crate::classify::{AccessorRole, ClassContext, MemberClass, ModelError, NamingRules};

/// Builds and caches class models.
pub struct ClassModelBuilder<'a> {
    document: &'a InputDocument,
    resolver: &'a TypeResolver,
    rules: NamingRules,
    /// Record id -> index into `document.classes`.
    index: FxHashMap<TypeId, usize>,
    cache: FxHashMap<TypeId, Arc<ClassEntity>>,
    /// Classes whose model is being built; guards against inheritance cycles.
    in_progress: FxHashSet<TypeId>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ClassModelBuilder<'a> {
    /// Create a builder over `document`.
    pub fn new(
        document: &'a InputDocument,
        resolver: &'a TypeResolver,
        conventions: Conventions,
    ) -> Result<Self, ModelError> {
        let mut index = FxHashMap::default();
        for (i, class) in document.classes.iter().enumerate() {
            index.entry(class.type_id.clone()).or_insert(i);
        }
        Ok(Self {
            document,
            resolver,
            rules: NamingRules::new(conventions)?,
            index,
            cache: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            diagnostics: Vec::new(),
        })
    }

    pub fn rules(&self) -> &NamingRules {
        &self.rules
    }

    /// Diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Model of the class defined under `type_id` (typedefs allowed).
    ///
    /// Returns `None` if no definition exists.
    pub fn build(&mut self, type_id: &TypeId) -> Option<Arc<ClassEntity>> {
        let real = self.resolver.catalog().real_type(type_id)?.clone();
        if let Some(entity) = self.cache.get(&real) {
            return Some(Arc::clone(entity));
        }
        let document = self.document;
        let raw = document.classes.get(*self.index.get(&real)?)?;
        Some(self.build_class(raw))
    }

    /// Model of `raw`, from the cache when available.
    pub fn build_class(&mut self, raw: &RawClass) -> Arc<ClassEntity> {
        if let Some(entity) = self.cache.get(&raw.type_id) {
            return Arc::clone(entity);
        }
        self.in_progress.insert(raw.type_id.clone());
        let entity = Arc::new(self.extract(raw));
        self.in_progress.remove(&raw.type_id);
        self.cache.insert(raw.type_id.clone(), Arc::clone(&entity));
        entity
    }

    fn extract(&mut self, raw: &RawClass) -> ClassEntity {
        debug!(class = %raw.name, "extracting class model");
        let mut entity = ClassEntity::new(raw.name.as_str(), raw.type_id.clone());

        // === Inheritance ===
        if let Some((first, extra)) = raw.bases.split_first() {
            if let Some(base) = self.build_base(raw, first) {
                entity.base = Some(base);
            }
            for base in extra {
                let name = self.resolver.class_name(base).unwrap_or(base.as_str()).to_string();
                warn!(class = %raw.name, base = %name, "only the first base class is bound");
                self.diagnostics.push(Diagnostic::warning(
                    raw.name.as_str(),
                    "",
                    format!("additional base class {name} is not bound"),
                ));
                entity.extra_bases.push(base.clone());
            }
        }

        let conventions = self.rules.conventions();
        let ctx = ClassContext {
            class_name: &raw.name,
            in_action_family: entity.is_or_descends_from(&conventions.action_family_root),
        };

        // === Fields ===
        for field in &raw.fields {
            let property = match self.rules.classify_field(field) {
                MemberClass::PlainProperty(name) => {
                    let mut property =
                        PropertyDescriptor::direct(name, self.resolver.resolve(&field.type_id));
                    property.field_name = field.name.clone();
                    property
                }
                MemberClass::AccessorProperty(name) => PropertyDescriptor::accessor(
                    name,
                    field.name.as_str(),
                    self.resolver.resolve(&field.type_id),
                ),
                _ => continue,
            };
            entity.properties.insert(property.name.clone(), property);
        }

        // === Constructors ===
        entity.has_constructor = !raw.constructors.is_empty();
        entity.has_default_constructor = raw.constructors.is_empty()
            || raw
                .constructors
                .iter()
                .any(|c| c.access.is_public() && c.num_args == 0);

        // === Methods ===
        for method in &raw.methods {
            let class = self.rules.classify_method(ctx, method, |name| {
                entity.properties.contains_key(name)
            });
            match class {
                MemberClass::RegularMethod => {
                    entity.add_method(MethodKind::Regular, self.describe(method));
                }
                MemberClass::SingletonFactory => {
                    entity.singleton = true;
                    entity.add_method(MethodKind::SingletonFactory, self.describe(method));
                }
                MemberClass::OverrideMethod(kind) => {
                    entity.add_method(MethodKind::Override(kind), self.describe(method));
                }
                MemberClass::AccessorMethod { role, property } => {
                    let descriptor = self.describe(method);
                    if let Some(prop) = entity.properties.get_mut(&property) {
                        let slot = match role {
                            AccessorRole::Get => &mut prop.getter,
                            AccessorRole::Set => &mut prop.setter,
                        };
                        if slot.is_none() {
                            *slot = Some(descriptor);
                        } else {
                            debug!(class = %raw.name, method = %method.name, "duplicate accessor ignored");
                        }
                    }
                }
                MemberClass::PlainProperty(_) | MemberClass::AccessorProperty(_) => {}
                MemberClass::Skipped(reason) => {
                    debug!(class = %raw.name, method = %method.name, ?reason, "method skipped");
                }
            }
        }

        // === Update ===
        entity.needs_update = entity
            .methods
            .keys()
            .any(|name| name.starts_with(conventions.update_trigger_prefix.as_str()))
            || entity.is_or_descends_from(&conventions.update_family_root);

        entity
    }

    fn build_base(&mut self, raw: &RawClass, base_id: &TypeId) -> Option<Arc<ClassEntity>> {
        let real = self.resolver.catalog().real_type(base_id).cloned();
        let Some(real) = real.filter(|id| self.index.contains_key(id)) else {
            let name = self
                .resolver
                .catalog()
                .record_name(base_id)
                .unwrap_or(base_id.as_str())
                .to_string();
            warn!(class = %raw.name, base = %name, "base class has no definition");
            self.diagnostics.push(Diagnostic::warning(
                raw.name.as_str(),
                "",
                format!("base class {name} has no definition and is not linked"),
            ));
            return None;
        };
        if self.in_progress.contains(&real) {
            warn!(class = %raw.name, base = %real, "inheritance cycle");
            self.diagnostics.push(Diagnostic::warning(
                raw.name.as_str(),
                "",
                format!("inheritance cycle through {real}; base link dropped"),
            ));
            return None;
        }
        self.build(&real)
    }

    fn describe(&self, method: &RawMethod) -> MethodDescriptor {
        MethodDescriptor {
            name: method.name.clone(),
            is_static: method.is_static,
            num_args: method.num_args,
            params: method
                .params
                .iter()
                .map(|p| ParamDescriptor::new(p.name.as_str(), self.resolver.resolve(&p.type_id)))
                .collect(),
            return_type: self.resolver.resolve(&method.return_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptbind_core::{
        Access, MethodKind, OverrideKind, RawField, RawTypeEntry, TypeDescriptor,
    };

    /// Types shared by every fixture.
    fn base_document() -> InputDocument {
        InputDocument::new()
            .with_type(RawTypeEntry::fundamental("_void", "void"))
            .with_type(RawTypeEntry::fundamental("_int", "int"))
            .with_type(RawTypeEntry::fundamental("_float", "float"))
            .with_type(RawTypeEntry::fundamental("_bool", "bool"))
            .with_type(RawTypeEntry::class("_obj", "CCObject"))
            .with_type(RawTypeEntry::class("_node", "CCNode"))
            .with_type(RawTypeEntry::pointer("_node_ptr", "_node"))
            .with_class(RawClass::new("_obj", "CCObject"))
            .with_class(
                RawClass::new("_node", "CCNode")
                    .with_base("_obj")
                    .with_field(RawField::new("m_nTag", "_int", Access::Protected))
                    .with_method(RawMethod::new("getTag", "_int"))
                    .with_method(RawMethod::new("setTag", "_void").with_param("nTag", "_int"))
                    .with_method(RawMethod::new("addChild", "_void").with_param("child", "_node_ptr"))
                    .with_method(
                        RawMethod::new("addChild", "_void")
                            .with_param("child", "_node_ptr")
                            .with_param("z", "_int"),
                    )
                    .with_method(RawMethod::new("onEnter", "_void"))
                    .with_method(RawMethod::new("scheduleUpdate", "_void")),
            )
    }

    fn build(doc: &InputDocument, id: &str) -> (Arc<ClassEntity>, Vec<Diagnostic>) {
        let resolver = TypeResolver::from_document(doc);
        let mut builder = ClassModelBuilder::new(doc, &resolver, Conventions::default()).unwrap();
        let entity = builder.build(&id.into()).unwrap();
        (entity, builder.take_diagnostics())
    }

    #[test]
    fn public_field_is_direct_property() {
        let doc = base_document()
            .with_type(RawTypeEntry::class("_circle", "Circle"))
            .with_class(
                RawClass::new("_circle", "Circle")
                    .with_field(RawField::new("radius", "_float", Access::Public)),
            );
        let (circle, _) = build(&doc, "_circle");

        let radius = circle.find_property("radius").unwrap();
        assert!(!radius.requires_accessor);
        assert_eq!(radius.data_type, TypeDescriptor::fundamental("float"));
    }

    #[test]
    fn prefixed_field_binds_accessors() {
        let (node, _) = build(&base_document(), "_node");
        let tag = node.find_property("tag").unwrap();
        assert!(tag.requires_accessor);
        assert_eq!(tag.field_name, "m_nTag");
        assert_eq!(tag.getter.as_ref().map(|g| g.name.as_str()), Some("getTag"));
        assert_eq!(tag.setter.as_ref().map(|s| s.name.as_str()), Some("setTag"));
        assert!(node.find_method("getTag").is_none());
        assert!(node.find_method("setTag").is_none());
    }

    #[test]
    fn overloads_and_roles() {
        let (node, _) = build(&base_document(), "_node");
        assert_eq!(node.methods["addChild"].len(), 2);
        assert_eq!(node.methods["addChild"].kind, MethodKind::Regular);
        assert_eq!(
            node.methods["onEnter"].kind,
            MethodKind::Override(OverrideKind::Notification)
        );
        let names: Vec<_> = node.methods.keys().map(String::as_str).collect();
        assert_eq!(names, ["addChild", "onEnter", "scheduleUpdate"]);
        assert!(node.needs_update);
    }

    #[test]
    fn base_models_are_shared() {
        let doc = base_document()
            .with_type(RawTypeEntry::class("_sprite", "CCSprite"))
            .with_type(RawTypeEntry::class("_layer", "CCLayer"))
            .with_class(RawClass::new("_sprite", "CCSprite").with_base("_node"))
            .with_class(RawClass::new("_layer", "CCLayer").with_base("_node"));
        let resolver = TypeResolver::from_document(&doc);
        let mut builder = ClassModelBuilder::new(&doc, &resolver, Conventions::default()).unwrap();

        let sprite = builder.build(&"_sprite".into()).unwrap();
        let layer = builder.build(&"_layer".into()).unwrap();
        let (Some(a), Some(b)) = (&sprite.base, &layer.base) else {
            panic!("bases not linked");
        };
        assert!(Arc::ptr_eq(a, b));
        assert!(sprite.needs_update);
        assert!(builder.diagnostics().is_empty());
    }

    #[test]
    fn singleton_class() {
        let doc = base_document()
            .with_type(RawTypeEntry::class("_foo", "Foo"))
            .with_type(RawTypeEntry::pointer("_foo_ptr", "_foo"))
            .with_class(
                RawClass::new("_foo", "Foo")
                    .with_method(RawMethod::new("sharedFoo", "_foo_ptr").as_static()),
            );
        let (foo, _) = build(&doc, "_foo");
        assert!(foo.singleton);
        assert_eq!(foo.methods["sharedFoo"].kind, MethodKind::SingletonFactory);
    }

    #[test]
    fn extra_bases_are_flagged() {
        let doc = base_document()
            .with_type(RawTypeEntry::class("_proto", "CCTouchDelegate"))
            .with_type(RawTypeEntry::class("_layer", "CCLayer"))
            .with_class(RawClass::new("_proto", "CCTouchDelegate"))
            .with_class(RawClass::new("_layer", "CCLayer").with_base("_node").with_base("_proto"));
        let (layer, diagnostics) = build(&doc, "_layer");

        assert_eq!(layer.base.as_ref().map(|b| b.name.as_str()), Some("CCNode"));
        assert_eq!(layer.extra_bases, [TypeId::from("_proto")]);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("CCTouchDelegate"));
    }

    #[test]
    fn inheritance_cycle_drops_link() {
        let doc = InputDocument::new()
            .with_type(RawTypeEntry::class("_a", "A"))
            .with_type(RawTypeEntry::class("_b", "B"))
            .with_class(RawClass::new("_a", "A").with_base("_b"))
            .with_class(RawClass::new("_b", "B").with_base("_a"));
        let (a, diagnostics) = build(&doc, "_a");

        let b = a.base.as_ref().unwrap();
        assert_eq!(b.name, "B");
        assert!(b.base.is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn default_constructor_detection() {
        let doc = base_document()
            .with_type(RawTypeEntry::class("_a", "NeedsArgs"))
            .with_class(
                RawClass::new("_a", "NeedsArgs")
                    .with_constructor(RawMethod::new("NeedsArgs", "_a").with_param("n", "_int")),
            );
        let (entity, _) = build(&doc, "_a");
        assert!(entity.has_constructor);
        assert!(!entity.has_default_constructor);
    }

    #[test]
    fn action_family_excludes_step() {
        let doc = base_document()
            .with_type(RawTypeEntry::class("_action", "CCAction"))
            .with_type(RawTypeEntry::class("_move", "CCMoveBy"))
            .with_class(
                RawClass::new("_action", "CCAction")
                    .with_method(RawMethod::new("step", "_void").with_param("dt", "_float")),
            )
            .with_class(
                RawClass::new("_move", "CCMoveBy")
                    .with_base("_action")
                    .with_method(RawMethod::new("update", "_void").with_param("t", "_float"))
                    .with_method(RawMethod::new("reverse", "_void")),
            );
        let (action, _) = build(&doc, "_action");
        let (movement, _) = build(&doc, "_move");
        assert!(action.methods.is_empty());
        let names: Vec<_> = movement.methods.keys().map(String::as_str).collect();
        assert_eq!(names, ["reverse"]);
        assert!(!movement.needs_update);
    }

    #[test]
    fn extraction_is_deterministic() {
        let doc = base_document();
        let (first, _) = build(&doc, "_node");
        let (second, _) = build(&doc, "_node");
        assert_eq!(*first, *second);
    }

    #[test]
    fn missing_class_is_none() {
        let doc = base_document();
        let resolver = TypeResolver::from_document(&doc);
        let mut builder = ClassModelBuilder::new(&doc, &resolver, Conventions::default()).unwrap();
        assert!(builder.build(&"_nope".into()).is_none());
    }
}
