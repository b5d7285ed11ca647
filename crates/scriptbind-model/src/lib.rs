//! Class model extraction for scriptbind.
//!
//! Turns raw class declarations into [`ClassEntity`](scriptbind_core::ClassEntity)
//! models ready for code generation:
//!
//! - [`classify`] - pure naming rules deciding what each member becomes
//! - [`ClassModelBuilder`] - applies the rules with resolved types and
//!   memoizes models by record id

pub mod classify;
mod extractor;

pub use classify::{
    AccessorRole, ClassContext, MemberClass, ModelError, NamingRules, SkipReason,
    accessor_target,
};
pub use extractor::ClassModelBuilder;
