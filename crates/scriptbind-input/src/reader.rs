//! Analyzer document reader.
//!
//! Converts the element tree into an [`InputDocument`]. Only structural
//! checks happen here; whether the types make sense is the resolver's
//! business.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use scriptbind_core::{
    Access, Diagnostic, InputDocument, InputError, RawClass, RawField, RawMethod, RawParam, RawType,
    RawTypeEntry, RecordKind, TypeId,
};

use crate::dom::{self, Element};

/// Root element of an analyzer document.
pub const ROOT_ELEMENT: &str = "CLANG_XML";
const TRANSLATION_UNIT: &str = "TranslationUnit";
const REFERENCE_SECTION: &str = "ReferenceSection";

/// Parse an analyzer document.
///
/// # Errors
///
/// Fails on malformed XML, a wrong root element, a missing section, a type
/// entry without its `id`/`type` attributes, or a record without `type`.
pub fn parse_document(text: &str) -> Result<InputDocument, InputError> {
    let root = dom::parse_tree(text)?;
    if root.name != ROOT_ELEMENT {
        return Err(InputError::InvalidRoot {
            found: root.name,
            expected: ROOT_ELEMENT,
        });
    }

    let translation_unit = root
        .find_descendant(TRANSLATION_UNIT)
        .ok_or(InputError::MissingSection(TRANSLATION_UNIT))?;
    let reference_section = root
        .find_descendant(REFERENCE_SECTION)
        .ok_or(InputError::MissingSection(REFERENCE_SECTION))?;

    let mut document = InputDocument::new();
    for element in reference_section.descendants() {
        if let Some(entry) = read_type(element)? {
            document.types.push(entry);
        }
    }

    let mut seen = FxHashSet::default();
    for element in translation_unit.descendants() {
        if element.name != "CXXRecord" || element.has_attr("forward") {
            continue;
        }
        let class = read_class(element, &mut document.diagnostics)?;
        // The first definition of a record wins.
        if seen.insert(class.type_id.clone()) {
            document.classes.push(class);
        }
    }

    debug!(
        types = document.types.len(),
        classes = document.classes.len(),
        dropped = document.diagnostics.len(),
        "read analyzer document"
    );
    Ok(document)
}

// ============================================================================
// Reference Section
// ============================================================================

fn read_type(element: &Element) -> Result<Option<RawTypeEntry>, InputError> {
    let ty = match element.name.as_str() {
        "FundamentalType" => RawType::Fundamental {
            kind: element.required_attr("kind")?.to_string(),
        },
        "PointerType" => RawType::Pointer {
            pointee: type_attr(element)?,
        },
        "ReferenceType" => RawType::Reference {
            referenced: type_attr(element)?,
        },
        "CvQualifiedType" => RawType::CvQualified {
            wrapped: type_attr(element)?,
            is_const: element.attr("const") == Some("1"),
            is_volatile: element.attr("volatile") == Some("1"),
        },
        "Typedef" => RawType::Typedef {
            name: element.attr("name").unwrap_or_default().to_string(),
            aliased: type_attr(element)?,
        },
        "Record" => {
            let kind = match element.attr("kind") {
                Some("class") => RecordKind::Class,
                Some("struct") => RecordKind::Struct,
                // unions, enums
                _ => return Ok(None),
            };
            let Some(name) = element.attr("name").filter(|n| !n.is_empty()) else {
                // anonymous record
                return Ok(None);
            };
            RawType::Record {
                name: name.to_string(),
                kind,
            }
        }
        _ => return Ok(None),
    };
    let id = element.required_attr("id")?;
    Ok(Some(RawTypeEntry::new(id, ty)))
}

fn type_attr(element: &Element) -> Result<TypeId, InputError> {
    element.required_attr("type").map(TypeId::from)
}

// ============================================================================
// Translation Unit
// ============================================================================

/// Read one record definition.
///
/// Only the record's own `type` is required. A member with missing
/// attributes degrades on its own: a missing member type becomes
/// [`TypeId::missing`], a method without a name is dropped with a
/// diagnostic.
fn read_class(element: &Element, diagnostics: &mut Vec<Diagnostic>) -> Result<RawClass, InputError> {
    let type_id = type_attr(element)?;
    let name = element.attr("name").unwrap_or_default();
    let mut class = RawClass::new(type_id.clone(), name);

    for child in &element.children {
        match child.name.as_str() {
            "Base" => match child.attr("id").or_else(|| child.attr("type")) {
                Some(base) => class.bases.push(TypeId::from(base)),
                None => {
                    warn!(class = %name, "base without an id ignored");
                    diagnostics.push(Diagnostic::warning(name, "", "<Base> without an id ignored"));
                }
            },
            "Field" => {
                let field_name = child.attr("name").unwrap_or_default();
                class.fields.push(RawField::new(
                    field_name,
                    member_type(child, name, field_name),
                    read_access(child),
                ));
            }
            "CXXConstructor" => {
                class
                    .constructors
                    .push(read_function(child, name, name, type_id.clone()));
            }
            "CXXMethod" => {
                let Some(method_name) = child.attr("name").filter(|n| !n.is_empty()) else {
                    warn!(class = %name, "method without a name ignored");
                    diagnostics.push(Diagnostic::warning(
                        name,
                        "",
                        "<CXXMethod> without a name ignored",
                    ));
                    continue;
                };
                let return_type = member_type(child, name, method_name);
                class
                    .methods
                    .push(read_function(child, name, method_name, return_type));
            }
            _ => {}
        }
    }
    Ok(class)
}

fn read_function(element: &Element, class: &str, name: &str, return_type: TypeId) -> RawMethod {
    let params: Vec<RawParam> = element
        .children_named("ParmVar")
        .map(|param| {
            let param_name = param.attr("name").unwrap_or_default();
            RawParam::new(param_name, member_type(param, class, name))
        })
        .collect();
    let num_args = element
        .attr("num_args")
        .and_then(|n| n.parse().ok())
        .unwrap_or(params.len());

    RawMethod {
        name: name.to_string(),
        is_static: element.attr("static") == Some("1"),
        num_args,
        return_type,
        params,
        access: read_access(element),
    }
}

/// The `type` of a member, or [`TypeId::missing`] if absent.
fn member_type(element: &Element, class: &str, member: &str) -> TypeId {
    match element.attr("type") {
        Some(ty) => TypeId::from(ty),
        None => {
            warn!(class, member, element = %element.name, "member has no type");
            TypeId::missing()
        }
    }
}

fn read_access(element: &Element) -> Access {
    Access::parse(element.attr("access").unwrap_or_default())
}
