//! Binding code generator for scriptbind.
//!
//! Turns one [`ClassEntity`] into a binding class declaration and its
//! implementation for the embedded script engine:
//!
//! - construction and finalization ([`lifecycle`])
//! - property enumeration and get/set dispatch ([`properties`])
//! - one dispatch routine per method ([`dispatch`])
//! - override forwarding into script ([`overrides`])
//! - class registration ([`registration`])
//!
//! Every piece is a pure function returning a [`Fragment`]. A failing method
//! or override leaves a `// scriptbind:` placeholder and a [`Diagnostic`];
//! the rest of the class is still generated.

mod context;
pub mod dispatch;
pub mod fallback;
pub mod fragment;
pub mod lifecycle;
pub mod marshal;
pub mod overrides;
pub mod prelude;
pub mod properties;
pub mod registration;

pub use context::GenerationContext;
pub use fallback::{FallbackEntry, FallbackTable};
pub use fragment::{Fragment, do_while};

use scriptbind_core::{
    ClassEntity, Diagnostic, GenerationError, MethodDescriptor, MethodKind, OverrideKind,
};
use tracing::{debug, warn};

/// Generated artifacts of one class.
#[derive(Debug, Clone)]
pub struct GeneratedClass {
    pub name: String,
    pub declaration: Fragment,
    pub implementation: Fragment,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedClass {
    /// Check whether every unit of the class was generated.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Generate the binding class for `entity`.
pub fn generate(entity: &ClassEntity, ctx: &GenerationContext<'_>) -> GeneratedClass {
    debug!(class = %entity.name, "generating bindings");
    let name = &entity.name;
    let mut diagnostics = Vec::new();

    let mut bound_methods: Vec<&MethodDescriptor> = Vec::new();
    let mut method_decls = Fragment::new();
    let mut override_decls = Fragment::new();
    let mut units = Vec::new();

    for set in entity.methods.values() {
        let method = set.first();
        match set.kind {
            MethodKind::Regular | MethodKind::SingletonFactory => {
                match dispatch::method_dispatch(ctx, entity, method) {
                    Ok(unit) => {
                        bound_methods.push(method);
                        method_decls = method_decls.line(dispatch::method_declaration(method));
                        units.push(unit);
                    }
                    Err(err) => {
                        warn!(class = %name, method = %method.name, error = %err, "method skipped");
                        units.push(placeholder("method", &method.name, &err));
                        diagnostics.push(Diagnostic::error(
                            name.as_str(),
                            method.name.as_str(),
                            err.to_string(),
                        ));
                    }
                }
            }
            MethodKind::Override(OverrideKind::Update) => {}
            MethodKind::Override(kind) => match overrides::override_unit(ctx, entity, kind, method) {
                Ok(unit) => {
                    override_decls = override_decls.line(unit.declaration);
                    units.push(unit.implementation);
                }
                Err(err) => {
                    warn!(class = %name, method = %method.name, error = %err, "override skipped");
                    units.push(placeholder("override", &method.name, &err));
                    diagnostics.push(Diagnostic::warning(
                        name.as_str(),
                        method.name.as_str(),
                        err.to_string(),
                    ));
                }
            },
        }
    }

    if entity.needs_update {
        let update = overrides::update_override(ctx, entity);
        override_decls = override_decls.line(update.declaration);
        units.push(update.implementation);
    }

    let props = properties::property_routines(ctx, entity);
    diagnostics.extend(props.diagnostics);

    let members = Fragment::new()
        .line("static JSClass *jsClass;")
        .line("static JSObject *jsObject;")
        .blank()
        .lines(lifecycle::native_constructor(entity))
        .append_opt(properties::property_enum(entity))
        .blank()
        .append(lifecycle::lifecycle_declarations())
        .append(properties::property_declarations())
        .line(registration::registration_declaration())
        .append(method_decls)
        .append(override_decls);

    let declaration = Fragment::new()
        .line(format!("class S_{name} : public {name}"))
        .line("{")
        .line("\tJSObject *m_jsobj;")
        .line("public:")
        .append(members.indent(1))
        .line("};");

    let statics = Fragment::new()
        .line(format!("JSClass* S_{name}::jsClass = NULL;"))
        .line(format!("JSObject* S_{name}::jsObject = NULL;"));

    let implementation = Fragment::join_blocks(
        [
            statics,
            lifecycle::constructor(entity),
            lifecycle::finalizer(entity),
            props.getter,
            props.setter,
            registration::registration(ctx, entity, &bound_methods),
        ]
        .into_iter()
        .chain(units),
    );

    GeneratedClass {
        name: name.clone(),
        declaration,
        implementation,
        diagnostics,
    }
}

fn placeholder(unit: &str, name: &str, err: &GenerationError) -> Fragment {
    Fragment::new().line(format!(
        "// scriptbind: skipped {unit} {name} ({}): {err}",
        err.kind()
    ))
}
