//! Raw declarations as the analyzer described them.
//!
//! These types are the output of the input reader and the input of the type
//! catalog and the class model extractor. Nothing here is resolved: every
//! type reference is still an opaque [`TypeId`].
//!
//! # Design Principles
//!
//! 1. **Declaration order preserved** - every list keeps document order
//! 2. **No interpretation** - names and ids are stored exactly as written
//! 3. **Builders for tests** - fixtures are built with `with_*` methods

use crate::{Diagnostic, TypeId};

/// Member access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    Public,
    Protected,
    /// Also used when the analyzer omitted the attribute.
    #[default]
    Private,
}

impl Access {
    /// Parse the analyzer's access attribute. Unknown spellings are private.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "public" => Access::Public,
            "protected" => Access::Protected,
            _ => Access::Private,
        }
    }

    /// Check for public access.
    pub fn is_public(self) -> bool {
        self == Access::Public
    }
}

/// Kind of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Class,
    Struct,
}

/// One type entity from the analyzer's reference section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawType {
    /// Built-in scalar, e.g. `float`.
    Fundamental { kind: String },
    /// `T*`
    Pointer { pointee: TypeId },
    /// `T&`
    Reference { referenced: TypeId },
    /// `const T` / `volatile T`
    CvQualified {
        wrapped: TypeId,
        is_const: bool,
        is_volatile: bool,
    },
    /// `typedef T name`
    Typedef { name: String, aliased: TypeId },
    /// A class or struct name. Its body (if any) is a [`RawClass`].
    Record { name: String, kind: RecordKind },
}

/// A type entity keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTypeEntry {
    pub id: TypeId,
    pub ty: RawType,
}

impl RawTypeEntry {
    pub fn new(id: impl Into<TypeId>, ty: RawType) -> Self {
        Self { id: id.into(), ty }
    }

    pub fn fundamental(id: impl Into<TypeId>, kind: impl Into<String>) -> Self {
        Self::new(id, RawType::Fundamental { kind: kind.into() })
    }

    pub fn pointer(id: impl Into<TypeId>, pointee: impl Into<TypeId>) -> Self {
        Self::new(
            id,
            RawType::Pointer {
                pointee: pointee.into(),
            },
        )
    }

    pub fn reference(id: impl Into<TypeId>, referenced: impl Into<TypeId>) -> Self {
        Self::new(
            id,
            RawType::Reference {
                referenced: referenced.into(),
            },
        )
    }

    pub fn constant(id: impl Into<TypeId>, wrapped: impl Into<TypeId>) -> Self {
        Self::new(
            id,
            RawType::CvQualified {
                wrapped: wrapped.into(),
                is_const: true,
                is_volatile: false,
            },
        )
    }

    pub fn typedef(
        id: impl Into<TypeId>,
        name: impl Into<String>,
        aliased: impl Into<TypeId>,
    ) -> Self {
        Self::new(
            id,
            RawType::Typedef {
                name: name.into(),
                aliased: aliased.into(),
            },
        )
    }

    pub fn class(id: impl Into<TypeId>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            RawType::Record {
                name: name.into(),
                kind: RecordKind::Class,
            },
        )
    }

    pub fn structure(id: impl Into<TypeId>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            RawType::Record {
                name: name.into(),
                kind: RecordKind::Struct,
            },
        )
    }
}

/// A data member declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub name: String,
    pub type_id: TypeId,
    pub access: Access,
}

impl RawField {
    pub fn new(name: impl Into<String>, type_id: impl Into<TypeId>, access: Access) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            access,
        }
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParam {
    /// May be empty for unnamed parameters.
    pub name: String,
    pub type_id: TypeId,
}

impl RawParam {
    pub fn new(name: impl Into<String>, type_id: impl Into<TypeId>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
        }
    }
}

/// A method or constructor declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethod {
    pub name: String,
    pub is_static: bool,
    /// Declared argument count. Usually equals `params.len()`.
    pub num_args: usize,
    /// Return type id. Constructors carry the class id here.
    pub return_type: TypeId,
    pub params: Vec<RawParam>,
    pub access: Access,
}

impl RawMethod {
    /// A public, non-static method with no parameters.
    pub fn new(name: impl Into<String>, return_type: impl Into<TypeId>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            num_args: 0,
            return_type: return_type.into(),
            params: Vec::new(),
            access: Access::Public,
        }
    }

    /// Add a parameter (also bumps `num_args`).
    pub fn with_param(mut self, name: impl Into<String>, type_id: impl Into<TypeId>) -> Self {
        self.params.push(RawParam::new(name, type_id));
        self.num_args = self.params.len();
        self
    }

    /// Mark as static.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Set access level.
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

/// A class or struct definition from the translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawClass {
    /// Id of the matching record entry in the reference section.
    pub type_id: TypeId,
    pub name: String,
    /// Base class ids in declaration order.
    pub bases: Vec<TypeId>,
    pub fields: Vec<RawField>,
    pub constructors: Vec<RawMethod>,
    pub methods: Vec<RawMethod>,
}

impl RawClass {
    pub fn new(type_id: impl Into<TypeId>, name: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeId>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn with_field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_constructor(mut self, constructor: RawMethod) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_method(mut self, method: RawMethod) -> Self {
        self.methods.push(method);
        self
    }
}

/// The whole analyzer document after structural validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDocument {
    /// Type entities in document order.
    pub types: Vec<RawTypeEntry>,
    /// Class definitions in document order (forward declarations dropped).
    pub classes: Vec<RawClass>,
    /// Members the reader had to drop.
    pub diagnostics: Vec<Diagnostic>,
}

impl InputDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, entry: RawTypeEntry) -> Self {
        self.types.push(entry);
        self
    }

    pub fn with_class(mut self, class: RawClass) -> Self {
        self.classes.push(class);
        self
    }

    /// Find a class definition by its record id.
    pub fn find_class(&self, type_id: &TypeId) -> Option<&RawClass> {
        self.classes.iter().find(|c| &c.type_id == type_id)
    }

    /// Find a class definition by name.
    pub fn find_class_by_name(&self, name: &str) -> Option<&RawClass> {
        self.classes.iter().find(|c| c.name == name)
    }
}
