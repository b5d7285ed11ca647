//! scriptbind generates scripting-engine glue code for a native C++ class
//! library from the XML dump of a C++ analyzer.
//!
//! # Architecture
//!
//! ```text
//! analyzer XML -> InputDocument -> TypeResolver -> ClassEntity -> header + implementation
//!   (input)        (core)          (registry)      (model)        (codegen)
//! ```
//!
//! Every class in the document is catalogued so that types can be resolved,
//! but only classes on the allow list get bindings. Classes are emitted in
//! document order.
//!
//! # Example
//!
//! ```
//! use scriptbind::{BindingGenerator, GeneratorConfig};
//!
//! let xml = r#"<CLANG_XML>
//!   <TranslationUnit>
//!     <CXXRecord type="_circle" name="Circle">
//!       <Field name="radius" type="_float" access="public"/>
//!     </CXXRecord>
//!   </TranslationUnit>
//!   <ReferenceSection>
//!     <FundamentalType id="_float" kind="float"/>
//!     <Record id="_circle" kind="class" name="Circle"/>
//!   </ReferenceSection>
//! </CLANG_XML>"#;
//!
//! let generator = BindingGenerator::new(GeneratorConfig::new().with_allow_list(["Circle"]));
//! let output = generator.generate_xml(xml).unwrap();
//! assert!(output.header.contains("class S_Circle : public Circle"));
//! assert!(output.implementation.contains("case kRadius:"));
//! ```

pub mod config;
pub mod error;

pub use config::{DEFAULT_ALLOW_LIST, GeneratorConfig};
pub use error::BindError;

pub use scriptbind_codegen::{FallbackEntry, FallbackTable, GeneratedClass};
pub use scriptbind_core::{Conventions, Diagnostic, InputDocument, Severity};

use scriptbind_codegen::{Fragment, GenerationContext, prelude};
use scriptbind_model::ClassModelBuilder;
use scriptbind_registry::TypeResolver;
use tracing::{debug, info};

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Declaration artifact (`<prefix>.hpp`).
    pub header: String,
    /// Implementation artifact (`<prefix>.cpp`).
    pub implementation: String,
    /// Per-class artifacts in document order.
    pub classes: Vec<GeneratedClass>,
    /// Everything that degraded during the run.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    /// Find the artifacts of one class.
    pub fn class(&self, name: &str) -> Option<&GeneratedClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}

/// Runs the whole pipeline for one document.
#[derive(Debug, Clone, Default)]
pub struct BindingGenerator {
    config: GeneratorConfig,
}

impl BindingGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Parse `xml` and generate bindings for it.
    pub fn generate_xml(&self, xml: &str) -> Result<GenerationOutput, BindError> {
        let document = {
            #[cfg(feature = "profiling")]
            profiling::scope!("parse");
            scriptbind_input::parse_document(xml)?
        };
        self.generate(&document)
    }

    /// Generate bindings for every allow-listed class of `document`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(&self, document: &InputDocument) -> Result<GenerationOutput, BindError> {
        let resolver = {
            #[cfg(feature = "profiling")]
            profiling::scope!("resolve");
            TypeResolver::from_document(document)
        };
        let stats = resolver.stats();
        debug!(
            classes = stats.classes,
            typedefs = stats.typedefs,
            iterations = stats.iterations,
            unresolved = stats.unresolved.len(),
            "types resolved"
        );

        let mut builder = ClassModelBuilder::new(document, &resolver, self.config.conventions.clone())?;
        let selected: Vec<_> = document
            .classes
            .iter()
            .filter(|c| self.config.is_allowed(&c.name))
            .collect();

        let ctx = GenerationContext::new(
            &resolver,
            &self.config.conventions,
            &self.config.pointer_fallbacks,
        )
        .with_bound(selected.iter().map(|c| c.name.as_str()));

        let mut classes = Vec::with_capacity(selected.len());
        let mut diagnostics = document.diagnostics.clone();
        for raw in selected {
            #[cfg(feature = "profiling")]
            profiling::scope!("class", raw.name.as_str());
            let entity = builder.build_class(raw);
            diagnostics.extend(builder.take_diagnostics());
            let generated = scriptbind_codegen::generate(&entity, &ctx);
            diagnostics.extend(generated.diagnostics.iter().cloned());
            classes.push(generated);
        }

        let prefix = include_name(&self.config.output_prefix);
        let header = Fragment::join_blocks(
            std::iter::once(prelude::header_preamble(prefix))
                .chain(classes.iter().map(|c| c.declaration.clone()))
                .chain(std::iter::once(prelude::header_footer())),
        );
        let implementation = Fragment::join_blocks(
            std::iter::once(prelude::implementation_preamble(prefix))
                .chain(classes.iter().map(|c| c.implementation.clone())),
        );

        info!(
            classes = classes.len(),
            diagnostics = diagnostics.len(),
            "bindings generated"
        );
        Ok(GenerationOutput {
            header: header.render(),
            implementation: implementation.render(),
            classes,
            diagnostics,
        })
    }
}

/// File name part of the output prefix, as the implementation includes it.
fn include_name(prefix: &str) -> &str {
    prefix.rsplit(['/', '\\']).next().unwrap_or(prefix)
}
