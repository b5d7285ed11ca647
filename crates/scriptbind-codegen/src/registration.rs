//! Class registration routine.
//!
//! `jsCreateClass` allocates the script class, builds the property and
//! function tables and initialises the class against its parent prototype.

use scriptbind_core::{ClassEntity, MethodDescriptor};

use crate::context::GenerationContext;
use crate::fragment::Fragment;
use crate::properties::property_table;

pub fn registration_declaration() -> &'static str {
    "static void jsCreateClass(JSContext *cx, JSObject *globalObj, const char *name);"
}

/// Prototype the class is wired to: the nearest bound ancestor.
///
/// The configured root class never serves as a parent, and neither do
/// ancestors without bindings.
pub fn parent_prototype(ctx: &GenerationContext<'_>, entity: &ClassEntity) -> String {
    entity
        .ancestors()
        .find(|a| !ctx.conventions.is_root_class(&a.name) && ctx.is_bound(&a.name))
        .map(|a| format!("S_{}::jsObject", a.name))
        .unwrap_or_else(|| "NULL".to_string())
}

fn function_table(name: &str, class_name: &str, methods: &[&MethodDescriptor]) -> Fragment {
    let rows = Fragment::new()
        .lines(methods.iter().map(|m| {
            format!(
                "JS_FN(\"{}\", S_{class_name}::js{}, {}, JSPROP_PERMANENT | JSPROP_SHARED),",
                m.name, m.name, m.num_args
            )
        }))
        .line("JS_FS_END");
    Fragment::new()
        .line(format!("static JSFunctionSpec {name}[] = {{"))
        .append(rows.indent(1))
        .line("};")
}

/// Registration routine.
///
/// `methods` are the dispatched methods whose routines were generated;
/// instance and static ones go to separate tables.
pub fn registration(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    methods: &[&MethodDescriptor],
) -> Fragment {
    let name = &entity.name;
    let (statics, instance): (Vec<&MethodDescriptor>, Vec<&MethodDescriptor>) =
        methods.iter().copied().partition(|m| m.is_static);

    let body = Fragment::new()
        .line("jsClass = (JSClass *)calloc(1, sizeof(JSClass));")
        .line("jsClass->name = name;")
        .line("jsClass->addProperty = JS_PropertyStub;")
        .line("jsClass->delProperty = JS_PropertyStub;")
        .line("jsClass->getProperty = JS_PropertyStub;")
        .line("jsClass->setProperty = JS_StrictPropertyStub;")
        .line("jsClass->enumerate = JS_EnumerateStub;")
        .line("jsClass->resolve = JS_ResolveStub;")
        .line("jsClass->convert = JS_ConvertStub;")
        .line("jsClass->finalize = jsFinalize;")
        .line("jsClass->flags = JSCLASS_HAS_PRIVATE;")
        .line("static JSPropertySpec properties[] = {")
        .append(property_table(entity).indent(1))
        .line("};")
        .blank()
        .append(function_table("funcs", name, &instance))
        .blank()
        .append(function_table("st_funcs", name, &statics))
        .blank()
        .line(format!(
            "jsObject = JS_InitClass(cx,globalObj,{},jsClass,S_{name}::jsConstructor,0,properties,funcs,NULL,st_funcs);",
            parent_prototype(ctx, entity)
        ));

    Fragment::new()
        .line(format!(
            "void S_{name}::jsCreateClass(JSContext *cx, JSObject *globalObj, const char *name)"
        ))
        .line("{")
        .append(body.indent(1))
        .line("}")
}
