//! TypeDescriptor - the resolved shape of a type.
//!
//! A descriptor is what the resolver hands to the rest of the pipeline. It
//! answers "what kind of thing is this?" without exposing the analyzer's
//! wrapper chain (typedefs, cv-qualifiers, pointer/reference entries).
//!
//! # Example
//!
//! ```
//! use scriptbind_core::{ScalarKind, TargetKind, TypeCategory, TypeDescriptor};
//!
//! let radius = TypeDescriptor::fundamental("float");
//! assert_eq!(radius.scalar_kind(), Some(ScalarKind::Float));
//!
//! let parent = TypeDescriptor::pointer(TargetKind::Class, "CCNode");
//! assert_eq!(parent.category, TypeCategory::Pointer);
//! assert_eq!(parent.native_spelling().as_deref(), Some("CCNode*"));
//! ```

use std::fmt;

/// Broad classification of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Built-in scalar (`bool`, `int`, `float`, `char`, `void`, ...).
    Fundamental,
    /// Pointer to a fundamental, a class, or something the resolver could not name.
    Pointer,
    /// Reference to a fundamental or a class.
    Reference,
    /// Class or struct held by value.
    Class,
    /// The type id could not be classified.
    Unresolved,
}

/// What a pointer or reference ultimately designates.
///
/// Fundamentals and classes designate themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Fundamental,
    Class,
    /// Pointer to a pointer (or to a const pointer).
    Pointer,
    /// The pointee never resolved; parameters of this shape go through the
    /// fallback table.
    Unknown,
}

/// Resolved type descriptor.
///
/// Two resolutions of the same type id always produce equal descriptors.
/// Typedef names are deliberately not part of the descriptor so that a type
/// reached through any number of aliases compares equal to its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Type name (class name, fundamental kind, or the raw id when unresolved).
    pub name: String,
    /// Broad category.
    pub category: TypeCategory,
    /// The type is a pointer.
    pub is_pointer: bool,
    /// A const qualifier was unwrapped on the way.
    pub is_const: bool,
    /// What the type designates once pointers and references are looked through.
    pub target: TargetKind,
}

impl TypeDescriptor {
    /// A built-in scalar.
    pub fn fundamental(kind: impl Into<String>) -> Self {
        Self {
            name: kind.into(),
            category: TypeCategory::Fundamental,
            is_pointer: false,
            is_const: false,
            target: TargetKind::Fundamental,
        }
    }

    /// A class held by value.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: TypeCategory::Class,
            is_pointer: false,
            is_const: false,
            target: TargetKind::Class,
        }
    }

    /// A pointer whose pointee is `target` named `name`.
    pub fn pointer(target: TargetKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: TypeCategory::Pointer,
            is_pointer: true,
            is_const: false,
            target,
        }
    }

    /// A reference to `target` named `name`.
    pub fn reference(target: TargetKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: TypeCategory::Reference,
            is_pointer: false,
            is_const: false,
            target,
        }
    }

    /// An id the resolver could not classify.
    pub fn unresolved(raw_id: impl Into<String>) -> Self {
        Self {
            name: raw_id.into(),
            category: TypeCategory::Unresolved,
            is_pointer: false,
            is_const: false,
            target: TargetKind::Unknown,
        }
    }

    /// Mark as const-qualified.
    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    // === Query Methods ===

    /// Check if the resolver classified this type.
    pub fn is_resolved(&self) -> bool {
        self.category != TypeCategory::Unresolved
    }

    /// Check for the `void` fundamental.
    pub fn is_void(&self) -> bool {
        self.category == TypeCategory::Fundamental && self.name == "void"
    }

    /// Scalar conversion class for fundamentals and references to fundamentals.
    ///
    /// Pointers never have a scalar kind.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match (self.category, self.target) {
            (TypeCategory::Fundamental, _) | (TypeCategory::Reference, TargetKind::Fundamental) => {
                ScalarKind::from_fundamental(&self.name)
            }
            _ => None,
        }
    }

    /// Check for a character pointer (marshalled as script text).
    pub fn is_text(&self) -> bool {
        self.category == TypeCategory::Pointer
            && self.target == TargetKind::Fundamental
            && self.name.contains("char")
    }

    /// Check for a pointer to a known class.
    pub fn is_class_pointer(&self) -> bool {
        self.category == TypeCategory::Pointer && self.target == TargetKind::Class
    }

    /// Check for a class held by value or by reference.
    pub fn is_class_value(&self) -> bool {
        match self.category {
            TypeCategory::Class => true,
            TypeCategory::Reference => self.target == TargetKind::Class,
            _ => false,
        }
    }

    /// Check for a pointer whose pointee is not a fundamental or a class.
    pub fn is_opaque_pointer(&self) -> bool {
        self.category == TypeCategory::Pointer
            && matches!(self.target, TargetKind::Unknown | TargetKind::Pointer)
    }

    /// C++ spelling of this type, used for native override signatures.
    ///
    /// Returns `None` for types that cannot be spelled (unresolved ids and
    /// pointers with an unknown pointee).
    pub fn native_spelling(&self) -> Option<String> {
        let constness = if self.is_const { "const " } else { "" };
        match self.category {
            TypeCategory::Fundamental | TypeCategory::Class => {
                Some(format!("{constness}{}", self.name))
            }
            TypeCategory::Pointer => match self.target {
                TargetKind::Fundamental | TargetKind::Class => {
                    Some(format!("{constness}{}*", self.name))
                }
                TargetKind::Pointer | TargetKind::Unknown => None,
            },
            TypeCategory::Reference => match self.target {
                TargetKind::Fundamental | TargetKind::Class => {
                    Some(format!("{constness}{}&", self.name))
                }
                TargetKind::Pointer | TargetKind::Unknown => None,
            },
            TypeCategory::Unresolved => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.native_spelling() {
            Some(spelling) => f.write_str(&spelling),
            None => write!(f, "<unresolved {}>", self.name),
        }
    }
}

/// Scalar conversion class of a fundamental type.
///
/// Decides the argument format code and native temporary used when a script
/// value is converted into a native scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Char,
    Int,
    UnsignedInt,
    /// `float` and `double`; the runtime only deals in doubles.
    Float,
    Void,
}

impl ScalarKind {
    /// Classify a fundamental kind name as the analyzer spells it.
    ///
    /// Returns `None` for kinds with no scalar conversion (e.g. `__int128`
    /// spelled in an unexpected way, or vendor extensions).
    pub fn from_fundamental(kind: &str) -> Option<Self> {
        if kind == "void" {
            return Some(ScalarKind::Void);
        }
        if kind.contains("bool") || kind.contains("BOOL") {
            return Some(ScalarKind::Bool);
        }
        if kind.contains("char") {
            return Some(ScalarKind::Char);
        }
        if kind.contains("int") || kind.contains("long") || kind.contains("short") {
            return Some(if kind.contains("unsigned") {
                ScalarKind::UnsignedInt
            } else {
                ScalarKind::Int
            });
        }
        if kind.contains("float") || kind.contains("double") {
            return Some(ScalarKind::Float);
        }
        None
    }

    /// Format code understood by the runtime's argument conversion primitive.
    pub fn format_code(self) -> Option<char> {
        match self {
            ScalarKind::Bool => Some('b'),
            ScalarKind::Char => Some('c'),
            ScalarKind::Int => Some('i'),
            ScalarKind::UnsignedInt => Some('u'),
            ScalarKind::Float => Some('d'),
            ScalarKind::Void => None,
        }
    }

    /// Native type of the temporary the conversion primitive writes into.
    pub fn temporary_type(self) -> &'static str {
        match self {
            ScalarKind::Bool => "JSBool",
            ScalarKind::Char => "uint16_t",
            ScalarKind::Int => "int32_t",
            ScalarKind::UnsignedInt => "uint32_t",
            ScalarKind::Float => "double",
            ScalarKind::Void => "void",
        }
    }

    /// Check if values of this kind become script numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ScalarKind::Char | ScalarKind::Int | ScalarKind::UnsignedInt | ScalarKind::Float
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kinds_follow_kind_names() {
        assert_eq!(ScalarKind::from_fundamental("bool"), Some(ScalarKind::Bool));
        assert_eq!(ScalarKind::from_fundamental("int"), Some(ScalarKind::Int));
        assert_eq!(ScalarKind::from_fundamental("long long"), Some(ScalarKind::Int));
        assert_eq!(
            ScalarKind::from_fundamental("unsigned int"),
            Some(ScalarKind::UnsignedInt)
        );
        assert_eq!(ScalarKind::from_fundamental("unsigned char"), Some(ScalarKind::Char));
        assert_eq!(ScalarKind::from_fundamental("double"), Some(ScalarKind::Float));
        assert_eq!(ScalarKind::from_fundamental("void"), Some(ScalarKind::Void));
        assert_eq!(ScalarKind::from_fundamental("nullptr_t"), None);
    }

    #[test]
    fn format_codes() {
        assert_eq!(ScalarKind::Float.format_code(), Some('d'));
        assert_eq!(ScalarKind::UnsignedInt.format_code(), Some('u'));
        assert_eq!(ScalarKind::Void.format_code(), None);
        assert_eq!(ScalarKind::Float.temporary_type(), "double");
    }

    #[test]
    fn reference_to_fundamental_is_scalar() {
        let desc = TypeDescriptor::reference(TargetKind::Fundamental, "float").with_const();
        assert_eq!(desc.scalar_kind(), Some(ScalarKind::Float));
        assert_eq!(desc.native_spelling().as_deref(), Some("const float&"));
    }

    #[test]
    fn pointers_are_never_scalar() {
        let text = TypeDescriptor::pointer(TargetKind::Fundamental, "char").with_const();
        assert!(text.is_text());
        assert_eq!(text.scalar_kind(), None);
        assert_eq!(text.native_spelling().as_deref(), Some("const char*"));
    }

    #[test]
    fn class_shapes() {
        let value = TypeDescriptor::class("CCPoint");
        let by_ref = TypeDescriptor::reference(TargetKind::Class, "CCPoint").with_const();
        let by_ptr = TypeDescriptor::pointer(TargetKind::Class, "CCNode");

        assert!(value.is_class_value());
        assert!(by_ref.is_class_value());
        assert!(!by_ptr.is_class_value());
        assert!(by_ptr.is_class_pointer());
        assert_eq!(by_ref.to_string(), "const CCPoint&");
    }

    #[test]
    fn opaque_pointers_cannot_be_spelled() {
        let opaque = TypeDescriptor::pointer(TargetKind::Unknown, "_T9");
        assert!(opaque.is_opaque_pointer());
        assert!(opaque.native_spelling().is_none());
        assert_eq!(opaque.to_string(), "<unresolved _T9>");
    }

    #[test]
    fn unresolved_descriptor() {
        let desc = TypeDescriptor::unresolved("_T77");
        assert!(!desc.is_resolved());
        assert_eq!(desc.name, "_T77");
        assert!(!desc.is_void());
    }
}
