//! Construction and finalization.

use scriptbind_core::{ClassEntity, Ownership};

use crate::fragment::Fragment;

/// Check whether script code may construct `entity`.
///
/// Singletons are only reachable through their factory, and classes without
/// a default constructor cannot be allocated without arguments.
pub fn is_constructible(entity: &ClassEntity) -> bool {
    !entity.singleton && entity.has_default_constructor
}

/// Native constructor of the binding class, present only when constructible.
pub fn native_constructor(entity: &ClassEntity) -> Option<String> {
    is_constructible(entity).then(|| {
        format!(
            "S_{name}(JSObject *obj) : {name}(), m_jsobj(obj) {{}};",
            name = entity.name
        )
    })
}

pub fn lifecycle_declarations() -> Fragment {
    Fragment::new()
        .line("static JSBool jsConstructor(JSContext *cx, uint32_t argc, jsval *vp);")
        .line("static void jsFinalize(JSContext *cx, JSObject *obj);")
}

/// Script constructor.
///
/// Allocates the native object and hands it to the new script object as an
/// owned handle; fails for classes that cannot be constructed.
pub fn constructor(entity: &ClassEntity) -> Fragment {
    let name = &entity.name;
    let body = if is_constructible(entity) {
        Fragment::new()
            .line(format!("JSObject *obj = JS_NewObject(cx, S_{name}::jsClass, S_{name}::jsObject, NULL);"))
            .line(format!("S_{name} *cobj = new S_{name}(obj);"))
            .line("pointerShell_t *pt = (pointerShell_t *)JS_malloc(cx, sizeof(pointerShell_t));")
            .line(format!("pt->flags = {};", Ownership::Owned.shell_flag()))
            .line("pt->data = cobj;")
            .line("JS_SetPrivate(obj, pt);")
            .line("JS_SET_RVAL(cx, vp, OBJECT_TO_JSVAL(obj));")
            .line("return JS_TRUE;")
    } else {
        let reason = if entity.singleton {
            "is a singleton"
        } else {
            "has no default constructor"
        };
        Fragment::new()
            .line(format!("JS_ReportError(cx, \"{name} {reason} and cannot be constructed from script\");"))
            .line("return JS_FALSE;")
    };
    Fragment::new()
        .line(format!("JSBool S_{name}::jsConstructor(JSContext *cx, uint32_t argc, jsval *vp)"))
        .line("{")
        .append(body.indent(1))
        .line("}")
}

/// Finalizer: deletes the native object of owned handles, always frees the handle.
pub fn finalizer(entity: &ClassEntity) -> Fragment {
    let name = &entity.name;
    let release = Fragment::new()
        .line(format!(
            "if (pt->flags == {} && pt->data) delete ({name} *)pt->data;",
            Ownership::Owned.shell_flag()
        ))
        .line("JS_free(cx, pt);");
    Fragment::new()
        .line(format!("void S_{name}::jsFinalize(JSContext *cx, JSObject *obj)"))
        .line("{")
        .line("\tpointerShell_t *pt = (pointerShell_t *)JS_GetPrivate(obj);")
        .line("\tif (pt) {")
        .append(release.indent(2))
        .line("\t}")
        .line("}")
}
