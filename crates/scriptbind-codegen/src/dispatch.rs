//! Method dispatch routines.
//!
//! One routine per dispatched method name; only the first-declared overload
//! is bound. The routine checks the arity, converts the arguments, calls the
//! native method and marshals the result.

use scriptbind_core::{ClassEntity, GenerationError, MethodDescriptor};

use crate::context::GenerationContext;
use crate::fragment::Fragment;
use crate::marshal::{ArgConversion, JsTarget, convert_arg, to_js};

/// Declaration of the dispatch routine for `method`.
pub fn method_declaration(method: &MethodDescriptor) -> String {
    format!("static JSBool js{}(JSContext *cx, uint32_t argc, jsval *vp);", method.name)
}

/// Dispatch routine for `method` of `entity`.
pub fn method_dispatch(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    method: &MethodDescriptor,
) -> Result<Fragment, GenerationError> {
    let class_name = &entity.name;
    if method.num_args != method.params.len() {
        return Err(GenerationError::ArityMismatch {
            class: class_name.clone(),
            method: method.name.clone(),
            declared: method.num_args,
            listed: method.params.len(),
        });
    }
    let conversions = method
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| convert_arg(ctx, class_name, &method.name, i, &p.name, &p.data_type))
        .collect::<Result<Vec<_>, _>>()?;

    let call = native_call(entity, method, &conversions);
    let result = result_handling(ctx, entity, method, &call)?;

    let mut body = Fragment::new();
    if !method.is_static {
        body = body
            .line("JSObject* obj = (JSObject *)JS_THIS_OBJECT(cx, vp);")
            .line(format!(
                "S_{class_name}* self = NULL; JSGET_PTRSHELL(S_{class_name}, self, obj);"
            ))
            .line("if (self == NULL) return JS_FALSE;");
    }

    let arity = Fragment::new()
        .lines(conversions.iter().map(|c| c.declaration.clone()))
        .append_opt(convert_arguments(&conversions))
        .lines(conversions.iter().flat_map(|c| c.unwrap.iter().cloned()))
        .append(result)
        .line("return JS_TRUE;");

    body = body
        .line(format!("if (argc == {}) {{", method.num_args))
        .append(arity.indent(1))
        .line("}")
        .line("JS_SET_RVAL(cx, vp, JSVAL_TRUE);")
        .line("return JS_TRUE;");

    Ok(Fragment::new()
        .line(format!(
            "JSBool S_{class_name}::js{}(JSContext *cx, uint32_t argc, jsval *vp) {{",
            method.name
        ))
        .append(body.indent(1))
        .line("}"))
}

fn convert_arguments(conversions: &[ArgConversion]) -> Option<Fragment> {
    if conversions.is_empty() {
        return None;
    }
    let format: String = conversions.iter().map(|c| c.format_code).collect();
    let args: Vec<String> = (0..conversions.len()).map(|i| format!("&arg{i}")).collect();
    Some(Fragment::new().line(format!(
        "if (!JS_ConvertArguments(cx, {}, JS_ARGV(cx, vp), \"{format}\", {})) return JS_FALSE;",
        conversions.len(),
        args.join(", ")
    )))
}

fn native_call(entity: &ClassEntity, method: &MethodDescriptor, conversions: &[ArgConversion]) -> String {
    let args: Vec<&str> = conversions.iter().map(|c| c.call_arg.as_str()).collect();
    if method.is_static {
        format!("{}::{}({})", entity.name, method.name, args.join(", "))
    } else {
        format!("self->{}({})", method.name, args.join(", "))
    }
}

fn result_handling(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    method: &MethodDescriptor,
    call: &str,
) -> Result<Fragment, GenerationError> {
    let ret = &method.return_type;
    let context = format!("return value of {}::{}", entity.name, method.name);

    if ret.is_void() {
        return Ok(Fragment::new()
            .line(format!("{call};"))
            .line("JS_SET_RVAL(cx, vp, JSVAL_TRUE);"));
    }
    if ret.scalar_kind().is_some() {
        let spelling = ret.native_spelling().unwrap_or_else(|| ret.name.clone());
        return Ok(Fragment::new()
            .line(format!("{spelling} ret = {call};"))
            .append(to_js(ctx, ret, "ret", JsTarget::Rval("vp"), &context)?));
    }
    if ret.is_pointer {
        // opaque pointers have no spelling and fail inside to_js
        let marshal = to_js(ctx, ret, "ret", JsTarget::Rval("vp"), &context)?;
        let spelling = ret.native_spelling().unwrap_or_else(|| ret.name.clone());
        return Ok(Fragment::new()
            .line(format!("{spelling} ret = {call};"))
            .line("if (ret == NULL) {")
            .append(
                Fragment::new()
                    .line("JS_SET_RVAL(cx, vp, JSVAL_NULL);")
                    .line("return JS_TRUE;")
                    .indent(1),
            )
            .line("}")
            .append(marshal));
    }
    to_js(ctx, ret, call, JsTarget::Rval("vp"), &context)
}
