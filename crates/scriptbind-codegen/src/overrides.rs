//! Override forwarding.
//!
//! An override is a native virtual that native code calls on the binding
//! object. If the script object carries a property of the same name, the
//! virtual invokes it; the native implementation is only called afterwards
//! for notifications. Touch payloads cross as borrowed handles.

use scriptbind_core::{
    ClassEntity, GenerationError, MethodDescriptor, Ownership, OverrideKind, TypeDescriptor,
};

use crate::context::GenerationContext;
use crate::fragment::Fragment;
use crate::marshal::{JsTarget, to_js, wrap_object};

/// A generated override: its declaration line and its definition.
#[derive(Debug, Clone)]
pub struct OverrideUnit {
    pub declaration: String,
    pub implementation: Fragment,
}

/// Parameter names used in a native signature; unnamed ones become `argN`.
fn param_names(method: &MethodDescriptor) -> Vec<String> {
    method
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if p.name.is_empty() {
                format!("arg{i}")
            } else {
                p.name.clone()
            }
        })
        .collect()
}

/// `RET NAME(T0 p0, ...)`, qualified with `S_CLASS::` for definitions.
fn native_signature(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    method: &MethodDescriptor,
    qualifier: &str,
) -> Result<String, GenerationError> {
    let spell = |desc: &TypeDescriptor, what: String| {
        desc.native_spelling().ok_or_else(|| GenerationError::UnresolvedType {
            type_id: ctx.describe_type_id(&desc.name),
            context: what,
        })
    };
    let ret = spell(
        &method.return_type,
        format!("return value of {}::{}", entity.name, method.name),
    )?;
    let params = method
        .params
        .iter()
        .zip(param_names(method))
        .enumerate()
        .map(|(i, (p, name))| {
            spell(
                &p.data_type,
                format!("parameter {i} of {}::{}", entity.name, method.name),
            )
            .map(|ty| format!("{ty} {name}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{ret} {qualifier}{}({})", method.name, params.join(", ")))
}

/// Forwarding override for `method` of kind `kind`.
pub fn override_unit(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    kind: OverrideKind,
    method: &MethodDescriptor,
) -> Result<OverrideUnit, GenerationError> {
    let declaration = format!("virtual {};", native_signature(ctx, entity, method, "")?);
    let signature = native_signature(ctx, entity, method, &format!("S_{}::", entity.name))?;
    let names = param_names(method);

    let call = match kind {
        OverrideKind::Notification => notification_call(ctx, entity, method, &names)?,
        OverrideKind::Touch => touch_call(ctx, entity, method, &names)?,
        OverrideKind::Touches => touches_call(ctx, entity, method, &names)?,
        OverrideKind::TouchBegan => {
            touch_call(ctx, entity, method, &names)?
                .line("JSBool ret = JS_FALSE;")
                .line("JS_ValueToBoolean(cx, rval, &ret);")
                .line("return ret;")
        }
        // update is generated once per class by `update_override`
        OverrideKind::Update => {
            return Err(GenerationError::UnsupportedType {
                type_name: method.name.clone(),
                context: format!("{}::{} is forwarded by the update hook", entity.name, method.name),
            });
        }
    };

    let native_call = format!("{}::{}({})", entity.name, method.name, names.join(", "));
    let tail = match kind {
        OverrideKind::TouchBegan => Some("return false;".to_string()),
        OverrideKind::Notification if method.return_type.is_void() => Some(format!("{native_call};")),
        _ if !method.return_type.is_void() => Some(format!("return {native_call};")),
        _ => None,
    };

    let implementation = Fragment::new()
        .line(format!("{signature} {{"))
        .append(forward(&method.name, call).indent(1))
        .lines(tail.map(|t| format!("\t{t}")))
        .line("}");
    Ok(OverrideUnit {
        declaration,
        implementation,
    })
}

/// Per-frame update override forwarding the time delta.
pub fn update_override(ctx: &GenerationContext<'_>, entity: &ClassEntity) -> OverrideUnit {
    let conventions = ctx.conventions;
    let update = &conventions.update_method;
    let delta = &conventions.update_delta_type;
    let call = Fragment::new()
        .line("jsval jsdelta; JS_NewNumberValue(cx, delta, &jsdelta);")
        .line("JS_CallFunctionValue(cx, m_jsobj, fval, 1, &jsdelta, &rval);");
    OverrideUnit {
        declaration: format!("virtual void {update}({delta} delta);"),
        implementation: Fragment::new()
            .line(format!("void S_{}::{update}({delta} delta) {{", entity.name))
            .append(forward(update, call).indent(1))
            .line("}"),
    }
}

/// Look up `name` on the script object and run `call` when present.
fn forward(name: &str, call: Fragment) -> Fragment {
    let found = Fragment::new()
        .line("jsval rval, fval;")
        .line(format!("JS_GetProperty(cx, m_jsobj, \"{name}\", &fval);"))
        .append(call);
    let body = Fragment::new()
        .line("JSContext* cx = ScriptingCore::getInstance().getGlobalContext();")
        .line(format!("JSBool found; JS_HasProperty(cx, m_jsobj, \"{name}\", &found);"))
        .line("if (found == JS_TRUE) {")
        .append(found.indent(1))
        .line("}");
    Fragment::new()
        .line("if (m_jsobj) {")
        .append(body.indent(1))
        .line("}")
}

fn notification_call(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    method: &MethodDescriptor,
    names: &[String],
) -> Result<Fragment, GenerationError> {
    if method.params.is_empty() {
        return Ok(Fragment::from("JS_CallFunctionValue(cx, m_jsobj, fval, 0, 0, &rval);"));
    }
    let mut call = Fragment::new().line(format!("jsval argv[{}];", method.params.len()));
    for (i, (param, name)) in method.params.iter().zip(names).enumerate() {
        let slot = format!("argv[{i}]");
        let context = format!("parameter {i} of {}::{}", entity.name, method.name);
        call = call.append(to_js(ctx, &param.data_type, name, JsTarget::Var(&slot), &context)?);
    }
    Ok(call.line(format!(
        "JS_CallFunctionValue(cx, m_jsobj, fval, {}, argv, &rval);",
        method.params.len()
    )))
}

fn touch_call(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    method: &MethodDescriptor,
    names: &[String],
) -> Result<Fragment, GenerationError> {
    let Some(touch) = names.first() else {
        return Err(missing_payload(entity, method));
    };
    Ok(Fragment::new()
        .line("jsval arg;")
        .append(wrap_object(
            ctx,
            &ctx.conventions.touch_class,
            touch,
            Ownership::Borrowed,
            JsTarget::Var("arg"),
        ))
        .line("JS_CallFunctionValue(cx, m_jsobj, fval, 1, &arg, &rval);"))
}

fn touches_call(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    method: &MethodDescriptor,
    names: &[String],
) -> Result<Fragment, GenerationError> {
    let Some(set) = names.first() else {
        return Err(missing_payload(entity, method));
    };
    let touch_class = &ctx.conventions.touch_class;
    let (js_class, js_proto) = ctx.js_class_refs(touch_class);
    let element = Fragment::new()
        .line("pointerShell_t *shell = (pointerShell_t *)JS_malloc(cx, sizeof(pointerShell_t));")
        .line(format!("shell->flags = {};", Ownership::Borrowed.shell_flag()))
        .line(format!("shell->data = (void *)(({touch_class} *)(*setIter));"))
        .line(format!("JSObject *tmp = JS_NewObject(cx, {js_class}, {js_proto}, NULL);"))
        .line("JS_SetPrivate(tmp, shell);")
        .line("touches[i] = OBJECT_TO_JSVAL(tmp);");
    Ok(Fragment::new()
        .line(format!("jsval *touches = new jsval[{set}->count()];"))
        .line(format!("{} setIter;", ctx.conventions.touch_set_iterator))
        .line("int i = 0;")
        .line(format!(
            "for (setIter = {set}->begin(); setIter != {set}->end(); setIter++, i++) {{"
        ))
        .append(element.indent(1))
        .line("}")
        .line(format!("JSObject *array = JS_NewArrayObject(cx, {set}->count(), touches);"))
        .line("jsval arg = OBJECT_TO_JSVAL(array);")
        .line("JS_CallFunctionValue(cx, m_jsobj, fval, 1, &arg, &rval);")
        .line("delete[] touches;"))
}

fn missing_payload(entity: &ClassEntity, method: &MethodDescriptor) -> GenerationError {
    GenerationError::UnsupportedType {
        type_name: "(no parameters)".to_string(),
        context: format!("touch hook {}::{}", entity.name, method.name),
    }
}
