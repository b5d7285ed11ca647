//! Class model entries.
//!
//! This module provides the structured model produced by the class model
//! extractor and consumed by the code generator:
//!
//! - [`ClassEntity`] - one bound class with its base chain
//! - [`PropertyDescriptor`] - a field-backed or accessor-backed property
//! - [`MethodDescriptor`], [`ParamDescriptor`] - a resolved method signature
//! - [`OverloadSet`] - all overloads sharing one name, with their [`MethodKind`]

mod class;
mod method;
mod property;

pub use class::ClassEntity;
pub use method::{MethodDescriptor, MethodKind, OverloadSet, OverrideKind, ParamDescriptor};
pub use property::PropertyDescriptor;
