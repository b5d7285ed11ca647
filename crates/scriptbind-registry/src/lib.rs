//! Type catalog and resolver for scriptbind.
//!
//! - [`TypeCatalog`] sorts the analyzer's type entities into per-kind tables.
//! - [`TypeResolver`] answers `TypeId -> TypeDescriptor` once its fixpoint
//!   has settled, and is read-only afterwards.

pub mod catalog;
mod resolver;

pub use catalog::{CvEntry, TypeCatalog, TypedefEntry, WrapperKind};
pub use resolver::{ResolverStats, TypeResolver};
