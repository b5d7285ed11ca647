//! Error types for scriptbind.
//!
//! ## Error Hierarchy
//!
//! ```text
//! InputError       - fatal; the document is unusable and nothing is generated
//! GenerationError  - local; one method, property or override degrades
//! ```
//!
//! Input errors abort the run before any output exists. Generation errors
//! are caught at the smallest unit (one parameter, one method, one property)
//! and turned into a placeholder plus a [`Diagnostic`](crate::Diagnostic).

use thiserror::Error;

// ============================================================================
// Input Errors
// ============================================================================

/// Errors that make the analyzer document unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The XML itself could not be read.
    #[error("malformed input document: {0}")]
    Xml(String),

    /// The document has no root element.
    #[error("input document is empty")]
    Empty,

    /// The root element is not the analyzer's marker.
    #[error("invalid input document: root element is <{found}>, expected <{expected}>")]
    InvalidRoot {
        found: String,
        expected: &'static str,
    },

    /// A required top-level section is absent.
    #[error("invalid input document: missing <{0}> section")]
    MissingSection(&'static str),

    /// A type or class entry lacks an attribute it cannot do without.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
}

// ============================================================================
// Generation Errors
// ============================================================================

/// Errors scoped to a single generated unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A type id never resolved.
    #[error("unresolved type {type_id} in {context}")]
    UnresolvedType { type_id: String, context: String },

    /// A pointer parameter of unknown pointee matched no fallback entry.
    #[error(
        "unrecognized pointer parameter '{param}' in {class}::{method}; add a pointer fallback entry"
    )]
    UnrecognizedPointer {
        class: String,
        method: String,
        param: String,
    },

    /// The type resolved but has no marshalling rule.
    #[error("unsupported type {type_name} in {context}")]
    UnsupportedType { type_name: String, context: String },

    /// The declared argument count disagrees with the parameter list.
    #[error("{class}::{method} declares {declared} arguments but lists {listed} parameters")]
    ArityMismatch {
        class: String,
        method: String,
        declared: usize,
        listed: usize,
    },
}

impl GenerationError {
    /// Short tag used in placeholder comments.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::UnresolvedType { .. } => "unresolved type",
            GenerationError::UnrecognizedPointer { .. } => "unrecognized pointer",
            GenerationError::UnsupportedType { .. } => "unsupported type",
            GenerationError::ArityMismatch { .. } => "arity mismatch",
        }
    }
}
