//! Artifact preambles shared by every class.

use crate::fragment::Fragment;

/// Include guard macro for `prefix`, e.g. `out` -> `__out__h`.
pub fn include_guard(prefix: &str) -> String {
    let sanitized: String = prefix
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("__{sanitized}__h")
}

/// Start of the declaration artifact: guard, engine includes and the handle
/// type with its unwrap macro.
pub fn header_preamble(prefix: &str) -> Fragment {
    let guard = include_guard(prefix);
    Fragment::new()
        .line(format!("#ifndef {guard}"))
        .line(format!("#define {guard}"))
        .blank()
        .line("#include \"ScriptingCore.h\"")
        .line("#include \"cocos2d.h\"")
        .blank()
        .line("using namespace cocos2d;")
        .blank()
        .line("typedef struct {")
        .line("\tuint32_t flags;")
        .line("\tvoid* data;")
        .line("} pointerShell_t;")
        .blank()
        .line("typedef enum {")
        .line("\tkPointerOwned = 0,")
        .line("\tkPointerTemporary = 1")
        .line("} pointerShellFlags;")
        .blank()
        .line("#define JSGET_PTRSHELL(type, cobj, jsobj) do { \\")
        .line("\tpointerShell_t *pt = (pointerShell_t *)JS_GetPrivate(jsobj); \\")
        .line("\tif (pt) { \\")
        .line("\t\tcobj = (type *)pt->data; \\")
        .line("\t} else { \\")
        .line("\t\tcobj = NULL; \\")
        .line("\t} \\")
        .line("} while (0)")
}

pub fn header_footer() -> Fragment {
    Fragment::from("#endif")
}

/// Start of the implementation artifact.
pub fn implementation_preamble(prefix: &str) -> Fragment {
    Fragment::new().line(format!("#include \"{prefix}.hpp\""))
}
