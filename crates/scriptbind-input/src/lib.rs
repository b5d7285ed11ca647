//! Analyzer document reader for scriptbind.
//!
//! Reads the Clang-style XML dump of a C++ library into an
//! [`InputDocument`](scriptbind_core::InputDocument):
//!
//! ```text
//! <CLANG_XML>
//!   <TranslationUnit>  ... CXXRecord / Field / CXXMethod / ParmVar ...
//!   <ReferenceSection> ... FundamentalType / PointerType / Typedef / Record ...
//! </CLANG_XML>
//! ```
//!
//! # Example
//!
//! ```
//! let doc = scriptbind_input::parse_document(
//!     r#"<CLANG_XML><TranslationUnit/><ReferenceSection>
//!          <FundamentalType id="_1" kind="float"/>
//!        </ReferenceSection></CLANG_XML>"#,
//! ).unwrap();
//! assert_eq!(doc.types.len(), 1);
//! ```

pub mod dom;
mod reader;

pub use reader::{ROOT_ELEMENT, parse_document};
