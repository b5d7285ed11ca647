//! Value marshalling between native and script representations.
//!
//! Three directions are covered:
//!
//! - **arguments**: script call arguments into native temporaries
//!   ([`convert_arg`]), driven by a per-type format code;
//! - **native to script**: a native expression into a `jsval`
//!   ([`to_js`]), wrapping objects in handles with the ownership rule;
//! - **script to native**: a `jsval` into a native assignment ([`from_js`]).
//!
//! Ownership: pointers cross as `Borrowed` handles; values and references
//! are copied onto the heap and cross as `Owned` handles.

use scriptbind_core::{GenerationError, Ownership, ScalarKind, TypeCategory, TypeDescriptor};

use crate::context::GenerationContext;
use crate::fragment::{Fragment, do_while};

/// Where a converted script value goes.
#[derive(Debug, Clone, Copy)]
pub enum JsTarget<'a> {
    /// A return value slot (`JS_SET_RVAL(cx, slot, value)`).
    Rval(&'a str),
    /// A `jsval` variable.
    Var(&'a str),
}

impl JsTarget<'_> {
    fn assign(&self, value: &str) -> String {
        match self {
            JsTarget::Rval(slot) => format!("JS_SET_RVAL(cx, {slot}, {value});"),
            JsTarget::Var(name) => format!("{name} = {value};"),
        }
    }
}

fn unresolved(desc: &TypeDescriptor, ctx: &GenerationContext<'_>, context: &str) -> GenerationError {
    GenerationError::UnresolvedType {
        type_id: ctx.describe_type_id(&desc.name),
        context: context.to_string(),
    }
}

fn unsupported(desc: &TypeDescriptor, ctx: &GenerationContext<'_>, context: &str) -> GenerationError {
    let type_name = match desc.native_spelling() {
        Some(spelling) => spelling,
        None => format!("pointer to {}", ctx.describe_type_id(&desc.name)),
    };
    GenerationError::UnsupportedType {
        type_name,
        context: context.to_string(),
    }
}

// ============================================================================
// Native -> Script
// ============================================================================

/// Convert the native expression `expr` of type `desc` into `target`.
pub fn to_js(
    ctx: &GenerationContext<'_>,
    desc: &TypeDescriptor,
    expr: &str,
    target: JsTarget<'_>,
    context: &str,
) -> Result<Fragment, GenerationError> {
    if !desc.is_resolved() {
        return Err(unresolved(desc, ctx, context));
    }
    match desc.scalar_kind() {
        Some(ScalarKind::Void) => return Err(unsupported(desc, ctx, context)),
        Some(ScalarKind::Bool) => {
            return Ok(Fragment::new().line(target.assign(&format!("BOOLEAN_TO_JSVAL({expr})"))));
        }
        Some(_) => {
            return Ok(Fragment::new().line(format!(
                "do {{ jsval tmp; JS_NewNumberValue(cx, {expr}, &tmp); {} }} while (0);",
                target.assign("tmp")
            )));
        }
        None => {}
    }
    if desc.is_text() {
        return Ok(Fragment::new().line(format!(
            "do {{ const char *tmp = {expr}; {} }} while (0);",
            target.assign("tmp ? STRING_TO_JSVAL(JS_NewStringCopyZ(cx, tmp)) : JSVAL_NULL")
        )));
    }
    if desc.is_class_pointer() || desc.is_class_value() {
        return Ok(wrap_object(ctx, &desc.name, expr, Ownership::for_value(desc), target));
    }
    Err(unsupported(desc, ctx, context))
}

/// Wrap a native object in a new script handle.
///
/// `Owned` handles hold a heap copy of `expr`; `Borrowed` handles hold
/// `expr` itself.
pub fn wrap_object(
    ctx: &GenerationContext<'_>,
    class_name: &str,
    expr: &str,
    ownership: Ownership,
    target: JsTarget<'_>,
) -> Fragment {
    let (js_class, js_proto) = ctx.js_class_refs(class_name);
    let mut body = Fragment::new()
        .line(format!("JSObject *tmp = JS_NewObject(cx, {js_class}, {js_proto}, NULL);"))
        .line("pointerShell_t *pt = (pointerShell_t *)JS_malloc(cx, sizeof(pointerShell_t));");
    let data = match ownership {
        Ownership::Owned => {
            body = body.line(format!("{class_name}* ctmp = new {class_name}({expr});"));
            "ctmp"
        }
        Ownership::Borrowed => expr,
    };
    body = body
        .line(format!("pt->flags = {};", ownership.shell_flag()))
        .line(format!("pt->data = (void *){data};"))
        .line("JS_SetPrivate(tmp, pt);")
        .line(target.assign("OBJECT_TO_JSVAL(tmp)"));
    do_while(body)
}

// ============================================================================
// Script -> Native
// ============================================================================

/// Convert the `jsval` expression `src` to `desc` and hand it to `assign`.
///
/// `assign` receives the native temporary expression and returns the
/// statement (without `;`) storing it.
pub fn from_js(
    ctx: &GenerationContext<'_>,
    desc: &TypeDescriptor,
    src: &str,
    assign: impl Fn(&str) -> String,
    context: &str,
) -> Result<Fragment, GenerationError> {
    if !desc.is_resolved() {
        return Err(unresolved(desc, ctx, context));
    }
    let scalar = |decl: &str, convert: &str| {
        Fragment::new().line(format!(
            "do {{ {decl} tmp; {convert}(cx, {src}, &tmp); {}; }} while (0);",
            assign("tmp")
        ))
    };
    match desc.scalar_kind() {
        Some(ScalarKind::Bool) => return Ok(scalar("JSBool", "JS_ValueToBoolean")),
        Some(ScalarKind::Float) => return Ok(scalar("double", "JS_ValueToNumber")),
        Some(ScalarKind::Int | ScalarKind::Char) => {
            return Ok(scalar("int32_t", "JS_ValueToECMAInt32"));
        }
        Some(ScalarKind::UnsignedInt) => return Ok(scalar("uint32_t", "JS_ValueToECMAUint32")),
        Some(ScalarKind::Void) => return Err(unsupported(desc, ctx, context)),
        None => {}
    }
    if desc.is_text() {
        return Ok(do_while(
            Fragment::new()
                .line(format!("char *tmp = JS_EncodeString(cx, JSVAL_TO_STRING({src}));"))
                .line(format!("if (tmp) {{ {}; }}", assign("tmp"))),
        ));
    }
    if desc.is_class_pointer() || desc.is_class_value() {
        let class_name = &desc.name;
        let value = if desc.is_pointer { "tmp" } else { "*tmp" };
        return Ok(do_while(
            Fragment::new()
                .line(format!(
                    "{class_name}* tmp; JSGET_PTRSHELL({class_name}, tmp, JSVAL_TO_OBJECT({src}));"
                ))
                .line(format!("if (tmp) {{ {}; }}", assign(value))),
        ));
    }
    Err(unsupported(desc, ctx, context))
}

// ============================================================================
// Arguments
// ============================================================================

/// How one script argument becomes a native call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgConversion {
    /// Declaration of the temporary filled by `JS_ConvertArguments`.
    pub declaration: String,
    /// Format code passed to `JS_ConvertArguments`.
    pub format_code: char,
    /// Statements turning the temporary into the native value.
    pub unwrap: Vec<String>,
    /// Expression passed to the native call.
    pub call_arg: String,
}

/// Conversion for parameter `index` of `class_name::method_name`.
pub fn convert_arg(
    ctx: &GenerationContext<'_>,
    class_name: &str,
    method_name: &str,
    index: usize,
    param_name: &str,
    desc: &TypeDescriptor,
) -> Result<ArgConversion, GenerationError> {
    let context = format!("parameter {index} of {class_name}::{method_name}");
    if !desc.is_resolved() {
        return Err(unresolved(desc, ctx, &context));
    }
    let arg = format!("arg{index}");
    let narg = format!("narg{index}");

    if let Some(kind) = desc.scalar_kind() {
        let Some(format_code) = kind.format_code() else {
            return Err(unsupported(desc, ctx, &context));
        };
        let declaration = format!("{} {arg};", kind.temporary_type());
        if desc.category == TypeCategory::Reference {
            // a native reference needs an lvalue of its own type
            let native = &desc.name;
            return Ok(ArgConversion {
                declaration,
                format_code,
                unwrap: vec![format!("{native} {narg} = ({native}){arg};")],
                call_arg: narg,
            });
        }
        return Ok(ArgConversion {
            declaration,
            format_code,
            unwrap: Vec::new(),
            call_arg: arg,
        });
    }
    if desc.is_text() {
        return Ok(ArgConversion {
            declaration: format!("JSString *{arg};"),
            format_code: 'S',
            unwrap: vec![format!("char *{narg} = JS_EncodeString(cx, {arg});")],
            call_arg: narg,
        });
    }
    if desc.is_class_pointer() {
        return Ok(object_arg(&desc.name, arg, narg, false));
    }
    if desc.is_class_value() {
        return Ok(object_arg(&desc.name, arg, narg, true));
    }
    if desc.is_opaque_pointer() {
        let Some(native_type) = ctx.fallbacks.lookup(param_name, method_name) else {
            return Err(GenerationError::UnrecognizedPointer {
                class: class_name.to_string(),
                method: method_name.to_string(),
                param: if param_name.is_empty() { arg } else { param_name.to_string() },
            });
        };
        return Ok(object_arg(native_type, arg, narg, false));
    }
    Err(unsupported(desc, ctx, &context))
}

/// A handle argument. Template types are aliased first so their commas do
/// not split the unwrap macro's arguments.
fn object_arg(native_type: &str, arg: String, narg: String, deref: bool) -> ArgConversion {
    let mut unwrap = Vec::new();
    let type_name = if native_type.contains(',') {
        let alias = format!("{narg}_t");
        unwrap.push(format!("typedef {native_type} {alias};"));
        alias
    } else {
        native_type.to_string()
    };
    unwrap.push(format!(
        "{type_name}* {narg}; JSGET_PTRSHELL({type_name}, {narg}, {arg});"
    ));
    let call_arg = if deref {
        unwrap.push(format!("if ({narg} == NULL) return JS_FALSE;"));
        format!("*{narg}")
    } else {
        narg
    };
    ArgConversion {
        declaration: format!("JSObject *{arg};"),
        format_code: 'o',
        unwrap,
        call_arg,
    }
}
