//! Core types for scriptbind.
//!
//! This crate holds the vocabulary shared by every stage of the binding
//! generator:
//!
//! - [`TypeId`] - opaque type identifiers from the analyzer document
//! - [`TypeDescriptor`] - the resolved shape of a type
//! - [`raw`] - declarations exactly as the analyzer described them
//! - [`entries`] - the structured class model handed to code generation
//! - [`Conventions`] - the naming conventions of the bound library
//! - [`error`] - fatal input errors and per-unit generation errors
//!
//! ## Pipeline
//!
//! ```text
//! InputDocument (raw) -> TypeCatalog -> TypeResolver -> ClassEntity -> generated text
//! ```

pub mod conventions;
pub mod descriptor;
pub mod diagnostic;
pub mod entries;
pub mod error;
pub mod ownership;
pub mod raw;
mod type_id;

pub use conventions::Conventions;
pub use descriptor::{ScalarKind, TargetKind, TypeCategory, TypeDescriptor};
pub use diagnostic::{Diagnostic, Severity};
pub use entries::{
    ClassEntity, MethodDescriptor, MethodKind, OverloadSet, OverrideKind, ParamDescriptor,
    PropertyDescriptor,
};
pub use error::{GenerationError, InputError};
pub use ownership::Ownership;
pub use raw::{
    Access, InputDocument, RawClass, RawField, RawMethod, RawParam, RawType, RawTypeEntry,
    RecordKind,
};
pub use type_id::TypeId;
