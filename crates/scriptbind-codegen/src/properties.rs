//! Property enumeration, property table and get/set dispatch.
//!
//! Every property gets an enumeration id and a table entry. The get and set
//! routines switch on the id; a branch exists only when the property can be
//! read (or written), so accessor properties without a getter (or setter)
//! silently fall through to the no-op default.

use scriptbind_core::{ClassEntity, Diagnostic, GenerationError, PropertyDescriptor};
use tracing::warn;

use crate::context::GenerationContext;
use crate::fragment::Fragment;
use crate::marshal::{JsTarget, from_js, to_js};

/// Get and set routines with the diagnostics of skipped branches.
#[derive(Debug, Clone, Default)]
pub struct PropertyRoutines {
    pub getter: Fragment,
    pub setter: Fragment,
    pub diagnostics: Vec<Diagnostic>,
}

/// `enum { kA = 1, kB, ... };` for the class declaration.
pub fn property_enum(entity: &ClassEntity) -> Option<Fragment> {
    if entity.properties.is_empty() {
        return None;
    }
    let count = entity.properties.len();
    let entries = entity.property_ids().map(|(id, prop)| {
        let value = if id == 1 { " = 1" } else { "" };
        let comma = if id as usize == count { "" } else { "," };
        format!("{}{value}{comma}", prop.enum_ident())
    });
    Some(
        Fragment::new()
            .line("enum {")
            .append(Fragment::new().lines(entries).indent(1))
            .line("};"),
    )
}

/// Property table rows, terminated by the null entry.
pub fn property_table(entity: &ClassEntity) -> Fragment {
    let class_name = &entity.name;
    Fragment::new()
        .lines(entity.properties.values().map(|prop| {
            format!(
                "{{\"{}\", {}, JSPROP_PERMANENT | JSPROP_SHARED, S_{class_name}::jsPropertyGet, S_{class_name}::jsPropertySet}},",
                prop.name,
                prop.enum_ident()
            )
        }))
        .line("{0, 0, 0, 0, 0}")
}

pub fn property_declarations() -> Fragment {
    Fragment::new()
        .line("static JSBool jsPropertyGet(JSContext *cx, JSObject *obj, jsid _id, jsval *val);")
        .line("static JSBool jsPropertySet(JSContext *cx, JSObject *obj, jsid _id, JSBool strict, jsval *val);")
}

/// Get and set routines for `entity`.
pub fn property_routines(ctx: &GenerationContext<'_>, entity: &ClassEntity) -> PropertyRoutines {
    let mut diagnostics = Vec::new();
    let mut get_cases = Fragment::new();
    let mut set_cases = Fragment::new();

    for prop in entity.properties.values() {
        if prop.is_readable() {
            let case = read_case(ctx, entity, prop);
            get_cases = get_cases.append(branch(entity, prop, "read", case, &mut diagnostics));
        }
        if prop.is_writable() {
            let case = write_case(ctx, entity, prop);
            set_cases = set_cases.append(branch(entity, prop, "write", case, &mut diagnostics));
        }
    }

    let class_name = &entity.name;
    PropertyRoutines {
        getter: routine(
            format!("JSBool S_{class_name}::jsPropertyGet(JSContext *cx, JSObject *obj, jsid _id, jsval *val)"),
            class_name,
            get_cases,
        ),
        setter: routine(
            format!(
                "JSBool S_{class_name}::jsPropertySet(JSContext *cx, JSObject *obj, jsid _id, JSBool strict, jsval *val)"
            ),
            class_name,
            set_cases,
        ),
        diagnostics,
    }
}

fn branch(
    entity: &ClassEntity,
    prop: &PropertyDescriptor,
    direction: &str,
    case: Result<Fragment, GenerationError>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Fragment {
    let body = match case {
        Ok(body) => body,
        Err(err) => {
            warn!(class = %entity.name, property = %prop.name, error = %err, "property branch skipped");
            diagnostics.push(Diagnostic::warning(
                entity.name.as_str(),
                prop.name.as_str(),
                format!("cannot {direction} property: {err}"),
            ));
            Fragment::new().line(format!(
                "// scriptbind: skipped property {} ({}): {err}",
                prop.name,
                err.kind()
            ))
        }
    };
    Fragment::new()
        .line(format!("case {}:", prop.enum_ident()))
        .append(body.line("break;").indent(1))
}

fn read_case(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    prop: &PropertyDescriptor,
) -> Result<Fragment, GenerationError> {
    let expr = match &prop.getter {
        Some(getter) if prop.requires_accessor => format!("cobj->{}()", getter.name),
        _ => format!("cobj->{}", prop.field_name),
    };
    let context = format!("property {}::{}", entity.name, prop.name);
    to_js(ctx, prop.read_type(), &expr, JsTarget::Var("*val"), &context)
}

fn write_case(
    ctx: &GenerationContext<'_>,
    entity: &ClassEntity,
    prop: &PropertyDescriptor,
) -> Result<Fragment, GenerationError> {
    let context = format!("property {}::{}", entity.name, prop.name);
    match &prop.setter {
        Some(setter) if prop.requires_accessor => from_js(
            ctx,
            prop.write_type(),
            "*val",
            |v| format!("cobj->{}({v})", setter.name),
            &context,
        ),
        _ => from_js(
            ctx,
            prop.write_type(),
            "*val",
            |v| format!("cobj->{} = {v}", prop.field_name),
            &context,
        ),
    }
}

fn routine(signature: String, class_name: &str, cases: Fragment) -> Fragment {
    let switch = Fragment::new()
        .line("switch(propId) {")
        .append(cases)
        .line("default:")
        .line("\tbreak;")
        .line("}");
    let body = Fragment::new()
        .line("int32_t propId = JSID_TO_INT(_id);")
        .line(format!("S_{class_name} *cobj; JSGET_PTRSHELL(S_{class_name}, cobj, obj);"))
        .line("if (!cobj) return JS_FALSE;")
        .append(switch)
        .line("return JS_TRUE;");
    Fragment::new()
        .line(signature)
        .line("{")
        .append(body.indent(1))
        .line("}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FallbackTable;
    use scriptbind_core::{
        Conventions, InputDocument, MethodDescriptor, ParamDescriptor, TypeDescriptor,
    };
    use scriptbind_registry::TypeResolver;

    fn routines(entity: &ClassEntity) -> PropertyRoutines {
        let resolver = TypeResolver::from_document(&InputDocument::new());
        let conventions = Conventions::default();
        let fallbacks = FallbackTable::default();
        let ctx = GenerationContext::new(&resolver, &conventions, &fallbacks);
        property_routines(&ctx, entity)
    }

    fn int() -> TypeDescriptor {
        TypeDescriptor::fundamental("int")
    }

    #[test]
    fn public_field_reads_and_writes_in_place() {
        let entity = ClassEntity::new("CCCircle", "_T1")
            .with_property(PropertyDescriptor::direct("radius", TypeDescriptor::fundamental("float")));
        let out = routines(&entity);
        let get = out.getter.render();
        let set = out.setter.render();

        assert!(get.contains("\tcase kRadius:\n"));
        assert!(get.contains("JS_NewNumberValue(cx, cobj->radius, &tmp); *val = tmp;"));
        assert!(set.contains("\tcase kRadius:\n"));
        assert!(set.contains("JS_ValueToNumber(cx, *val, &tmp); cobj->radius = tmp;"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn accessor_property_calls_accessors() {
        let getter = MethodDescriptor::new("getCount", int());
        let setter = MethodDescriptor::new("setCount", TypeDescriptor::fundamental("void"))
            .with_param(ParamDescriptor::new("n", int()));
        let entity = ClassEntity::new("CCCounter", "_T1").with_property(
            PropertyDescriptor::accessor("count", "m_nCount", int())
                .with_getter(getter)
                .with_setter(setter),
        );
        let out = routines(&entity);

        assert!(out.getter.render().contains("JS_NewNumberValue(cx, cobj->getCount(), &tmp)"));
        assert!(out.setter.render().contains("JS_ValueToECMAInt32(cx, *val, &tmp); cobj->setCount(tmp);"));
    }

    #[test]
    fn missing_accessor_has_no_branch() {
        let getter = MethodDescriptor::new("getCount", int());
        let entity = ClassEntity::new("CCCounter", "_T1")
            .with_property(PropertyDescriptor::accessor("count", "m_nCount", int()).with_getter(getter))
            .with_property(PropertyDescriptor::accessor("tag", "m_nTag", int()));
        let out = routines(&entity);
        let get = out.getter.render();
        let set = out.setter.render();

        assert!(get.contains("case kCount:"));
        assert!(!get.contains("case kTag:"));
        assert!(!set.contains("case"));
        assert!(set.contains("\tdefault:\n\t\tbreak;\n"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn unresolved_property_leaves_placeholder() {
        let entity = ClassEntity::new("CCThing", "_T1")
            .with_property(PropertyDescriptor::direct("blob", TypeDescriptor::unresolved("_T99")));
        let out = routines(&entity);

        assert!(out.getter.render().contains("// scriptbind: skipped property blob (unresolved type)"));
        assert_eq!(out.diagnostics.len(), 2);
        assert_eq!(out.diagnostics[0].unit, "blob");
    }

    #[test]
    fn enum_and_table() {
        let entity = ClassEntity::new("CCPoint", "_T1")
            .with_property(PropertyDescriptor::direct("x", TypeDescriptor::fundamental("float")))
            .with_property(PropertyDescriptor::direct("y", TypeDescriptor::fundamental("float")));

        assert_eq!(
            property_enum(&entity).unwrap().render(),
            "enum {\n\tkX = 1,\n\tkY\n};\n"
        );
        let table = property_table(&entity).render();
        assert!(table.starts_with(
            "{\"x\", kX, JSPROP_PERMANENT | JSPROP_SHARED, S_CCPoint::jsPropertyGet, S_CCPoint::jsPropertySet},\n"
        ));
        assert!(table.ends_with("{0, 0, 0, 0, 0}\n"));
        assert!(property_enum(&ClassEntity::new("CCEmpty", "_T2")).is_none());
    }
}
