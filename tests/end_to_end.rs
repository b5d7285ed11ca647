//! End-to-end tests: analyzer XML in, binding artifacts out.

use scriptbind::{BindError, BindingGenerator, GeneratorConfig, Severity};
use scriptbind_core::{InputError, TypeId};
use scriptbind_registry::TypeResolver;

const LIBRARY: &str = r#"<?xml version="1.0"?>
<CLANG_XML version="2.0">
  <TranslationUnit>
    <Namespace name="cocos2d">
      <CXXRecord type="_obj" name="CCObject"/>
      <CXXRecord type="_point" name="CCPoint">
        <Field name="x" type="_float" access="public"/>
        <Field name="y" type="_float" access="public"/>
        <CXXConstructor access="public" num_args="0"/>
      </CXXRecord>
      <CXXRecord type="_circle" name="CCCircle">
        <Base id="_obj" access="public"/>
        <Field name="radius" type="_float" access="public"/>
      </CXXRecord>
      <CXXRecord type="_counter" name="CCCounter">
        <Base id="_obj" access="public"/>
        <Field name="m_nCount" type="_int" access="protected"/>
        <Field name="m_nTag" type="_int" access="protected"/>
        <Field name="m_bVisible" type="_bool" access="protected"/>
        <CXXMethod name="getCount" num_args="0" type="_int" access="public"/>
        <CXXMethod name="setCount" num_args="1" type="_void" access="public">
          <ParmVar name="var" type="_int"/>
        </CXXMethod>
        <CXXMethod name="getTag" num_args="0" type="_int" access="public"/>
        <CXXMethod name="setVisible" num_args="1" type="_void" access="public">
          <ParmVar name="bVisible" type="_bool"/>
        </CXXMethod>
      </CXXRecord>
      <CXXRecord type="_foo" name="Foo">
        <CXXMethod name="sharedFoo" static="1" num_args="0" type="_foo_ptr" access="public"/>
      </CXXRecord>
      <CXXRecord type="_node" name="CCNode">
        <Base id="_obj" access="public"/>
        <CXXConstructor access="public" num_args="0"/>
        <CXXMethod name="onEnter" num_args="0" type="_void" access="public"/>
        <CXXMethod name="getParent" num_args="0" type="_node_ptr" access="public"/>
        <CXXMethod name="getPosition" num_args="0" type="_point_cref" access="public"/>
        <CXXMethod name="addChild" num_args="1" type="_void" access="public">
          <ParmVar name="child" type="_node_ptr"/>
        </CXXMethod>
        <CXXMethod name="setUserData" num_args="1" type="_void" access="public">
          <ParmVar name="pData" type="_blob_ptr"/>
        </CXXMethod>
        <CXXMethod name="description" num_args="0" type="_void" access="public"/>
      </CXXRecord>
      <CXXRecord type="_sprite" name="CCSprite">
        <Base id="_node" access="public"/>
        <CXXMethod name="setScale" num_args="1" type="_void" access="public">
          <ParmVar name="scale" type="_time"/>
        </CXXMethod>
      </CXXRecord>
    </Namespace>
  </TranslationUnit>
  <ReferenceSection>
    <FundamentalType id="_void" kind="void"/>
    <FundamentalType id="_int" kind="int"/>
    <FundamentalType id="_float" kind="float"/>
    <FundamentalType id="_bool" kind="bool"/>
    <Record id="_obj" kind="class" name="CCObject"/>
    <Record id="_point" kind="struct" name="CCPoint"/>
    <Record id="_circle" kind="class" name="CCCircle"/>
    <Record id="_counter" kind="class" name="CCCounter"/>
    <Record id="_foo" kind="class" name="Foo"/>
    <Record id="_node" kind="class" name="CCNode"/>
    <Record id="_sprite" kind="class" name="CCSprite"/>
    <PointerType id="_foo_ptr" type="_foo"/>
    <PointerType id="_node_ptr" type="_node"/>
    <PointerType id="_blob_ptr" type="_blob"/>
    <CvQualifiedType id="_point_c" type="_point" const="1"/>
    <ReferenceType id="_point_cref" type="_point_c"/>
    <Typedef id="_time" name="ccTime" type="_time2"/>
    <Typedef id="_time2" name="ccTimeBase" type="_time3"/>
    <Typedef id="_time3" name="ccFloat" type="_float"/>
  </ReferenceSection>
</CLANG_XML>
"#;

const BOUND: &[&str] = &["CCPoint", "CCCircle", "CCCounter", "Foo", "CCNode", "CCSprite"];

fn generate() -> scriptbind::GenerationOutput {
    let config = GeneratorConfig::new().with_allow_list(BOUND.iter().copied());
    BindingGenerator::new(config)
        .generate_xml(LIBRARY)
        .expect("fixture should generate")
}

/// Text of the branch for `case` inside `routine` of `implementation`.
fn case_body<'a>(implementation: &'a str, routine: &str, case: &str) -> Option<&'a str> {
    let start = implementation.find(routine)?;
    let routine_text = &implementation[start..];
    let end = routine_text.find("\n}\n").unwrap_or(routine_text.len());
    let routine_text = &routine_text[..end];
    let case_start = routine_text.find(&format!("case {case}:"))?;
    let rest = &routine_text[case_start..];
    let case_end = rest.find("break;").unwrap_or(rest.len());
    Some(&rest[..case_end])
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn public_field_becomes_plain_property() {
    let output = generate();
    let circle = output.class("CCCircle").unwrap();
    let implementation = circle.implementation.render();

    let get = case_body(&implementation, "S_CCCircle::jsPropertyGet(", "kRadius").unwrap();
    assert!(get.contains("JS_NewNumberValue(cx, cobj->radius, &tmp)"));
    let set = case_body(&implementation, "S_CCCircle::jsPropertySet(", "kRadius").unwrap();
    assert!(set.contains("JS_ValueToNumber(cx, *val, &tmp); cobj->radius = tmp;"));
}

#[test]
fn prefixed_field_becomes_accessor_property() {
    let output = generate();
    let implementation = output.class("CCCounter").unwrap().implementation.render();

    let get = case_body(&implementation, "S_CCCounter::jsPropertyGet(", "kCount").unwrap();
    assert!(get.contains("cobj->getCount()"));
    assert!(!get.contains("m_nCount"));
    let set = case_body(&implementation, "S_CCCounter::jsPropertySet(", "kCount").unwrap();
    assert!(set.contains("cobj->setCount(tmp);"));

    // accessors are not dispatched as methods
    assert!(!implementation.contains("JS_FN(\"getCount\""));
    assert!(!implementation.contains("S_CCCounter::jsgetCount("));
}

#[test]
fn missing_accessors_gate_branches() {
    let output = generate();
    let implementation = output.class("CCCounter").unwrap().implementation.render();

    assert!(case_body(&implementation, "S_CCCounter::jsPropertyGet(", "kTag").is_some());
    assert!(case_body(&implementation, "S_CCCounter::jsPropertySet(", "kTag").is_none());
    assert!(case_body(&implementation, "S_CCCounter::jsPropertyGet(", "kVisible").is_none());
    assert!(case_body(&implementation, "S_CCCounter::jsPropertySet(", "kVisible").is_some());
    assert!(output.class("CCCounter").unwrap().is_complete());
}

#[test]
fn singleton_constructor_fails() {
    let output = generate();
    let foo = output.class("Foo").unwrap();
    let implementation = foo.implementation.render();

    assert!(implementation.contains("JS_ReportError(cx, \"Foo is a singleton"));
    assert!(!implementation.contains("new S_Foo(obj)"));
    assert!(implementation.contains("static JSFunctionSpec st_funcs[] = {\n\t\tJS_FN(\"sharedFoo\", S_Foo::jssharedFoo, 0"));
    assert!(implementation.contains("Foo* ret = Foo::sharedFoo();"));
    assert!(!foo.declaration.render().contains("S_Foo(JSObject *obj)"));
}

#[test]
fn notification_override_forwards_to_script() {
    let output = generate();
    let node = output.class("CCNode").unwrap();
    let implementation = node.implementation.render();

    assert!(node.declaration.render().contains("\tvirtual void onEnter();\n"));
    assert!(implementation.contains("void S_CCNode::onEnter() {"));
    assert!(implementation.contains("JS_HasProperty(cx, m_jsobj, \"onEnter\", &found);"));
    assert!(implementation.contains("JS_CallFunctionValue(cx, m_jsobj, fval, 0, 0, &rval);"));
    assert!(implementation.contains("\tCCNode::onEnter();\n"));
    assert!(!implementation.contains("JS_FN(\"onEnter\""));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn output_is_deterministic() {
    let a = generate();
    let b = generate();
    assert_eq!(a.header, b.header);
    assert_eq!(a.implementation, b.implementation);
}

#[test]
fn classes_follow_document_order() {
    let output = generate();
    let names: Vec<_> = output.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["CCPoint", "CCCircle", "CCCounter", "Foo", "CCNode", "CCSprite"]);

    let header = &output.header;
    assert!(header.find("class S_CCPoint").unwrap() < header.find("class S_CCSprite").unwrap());
    assert!(header.starts_with("#ifndef __out__h\n"));
    assert!(header.ends_with("#endif\n"));
    assert!(output.implementation.starts_with("#include \"out.hpp\"\n"));
}

#[test]
fn ownership_follows_return_shape() {
    let output = generate();
    let implementation = output.class("CCNode").unwrap().implementation.render();

    let start = implementation.find("S_CCNode::jsgetPosition(").unwrap();
    let get_position = &implementation[start..];
    let get_position = &get_position[..get_position.find("\n}\n").unwrap()];
    assert!(get_position.contains("CCPoint* ctmp = new CCPoint(self->getPosition());"));
    assert!(get_position.contains("pt->flags = kPointerOwned;"));
    assert!(get_position.contains("JS_NewObject(cx, S_CCPoint::jsClass, S_CCPoint::jsObject, NULL)"));

    let start = implementation.find("S_CCNode::jsgetParent(").unwrap();
    let get_parent = &implementation[start..];
    let get_parent = &get_parent[..get_parent.find("\n}\n").unwrap()];
    assert!(get_parent.contains("if (ret == NULL) {"));
    assert!(get_parent.contains("JS_SET_RVAL(cx, vp, JSVAL_NULL);"));
    assert!(get_parent.contains("pt->flags = kPointerTemporary;"));
}

#[test]
fn unrecognized_pointer_fails_one_method() {
    let output = generate();
    let node = output.class("CCNode").unwrap();
    let implementation = node.implementation.render();

    assert!(implementation.contains("// scriptbind: skipped method setUserData (unrecognized pointer)"));
    assert!(!implementation.contains("JS_FN(\"setUserData\""));
    assert!(implementation.contains("JS_FN(\"addChild\", S_CCNode::jsaddChild, 1"));

    let errors: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].class, "CCNode");
    assert_eq!(errors[0].unit, "setUserData");
    assert_eq!(output.error_count(), 1);
}

#[test]
fn excluded_methods_are_not_bound() {
    let implementation = generate().class("CCNode").unwrap().implementation.render();
    assert!(!implementation.contains("description"));
}

#[test]
fn update_override_for_node_family() {
    let output = generate();
    for name in ["CCNode", "CCSprite"] {
        let class = output.class(name).unwrap();
        assert!(class.declaration.render().contains("\tvirtual void update(ccTime delta);\n"));
    }
    assert!(!output.class("CCCircle").unwrap().declaration.render().contains("update"));
}

#[test]
fn subclass_wires_to_bound_parent() {
    let output = generate();
    let sprite = output.class("CCSprite").unwrap().implementation.render();
    assert!(sprite.contains("JS_InitClass(cx,globalObj,S_CCNode::jsObject,jsClass,S_CCSprite::jsConstructor,"));

    // the root class is never a parent
    let node = output.class("CCNode").unwrap().implementation.render();
    assert!(node.contains("JS_InitClass(cx,globalObj,NULL,jsClass,S_CCNode::jsConstructor,"));
}

#[test]
fn typedef_chain_resolves_like_its_target() {
    let output = generate();
    let sprite = output.class("CCSprite").unwrap().implementation.render();
    assert!(sprite.contains("if (!JS_ConvertArguments(cx, 1, JS_ARGV(cx, vp), \"d\", &arg0)) return JS_FALSE;"));

    let document = scriptbind_input::parse_document(LIBRARY).unwrap();
    let resolver = TypeResolver::from_document(&document);
    assert_eq!(
        resolver.resolve(&TypeId::from("_time")),
        resolver.resolve(&TypeId::from("_float"))
    );
}

#[test]
fn unlisted_classes_are_catalogued_only() {
    let config = GeneratorConfig::new().with_allow_list(["CCSprite"]);
    let output = BindingGenerator::new(config).generate_xml(LIBRARY).unwrap();

    assert_eq!(output.classes.len(), 1);
    assert!(!output.header.contains("class S_CCNode"));
    let sprite = output.class("CCSprite").unwrap().implementation.render();
    // CCNode is not bound, so nothing to wire to
    assert!(sprite.contains("JS_InitClass(cx,globalObj,NULL,"));
}

// =============================================================================
// Touch Hooks
// =============================================================================

const TOUCH_LIBRARY: &str = r#"<CLANG_XML>
  <TranslationUnit>
    <CXXRecord type="_obj" name="CCObject"/>
    <CXXRecord type="_touch" name="CCTouch">
      <Base id="_obj" access="public"/>
    </CXXRecord>
    <CXXRecord type="_event" name="CCEvent"/>
    <CXXRecord type="_set" name="CCSet"/>
    <CXXRecord type="_layer" name="CCLayer">
      <Base id="_obj" access="public"/>
      <CXXMethod name="ccTouchBegan" num_args="2" type="_bool" access="public">
        <ParmVar name="pTouch" type="_touch_ptr"/>
        <ParmVar name="pEvent" type="_event_ptr"/>
      </CXXMethod>
      <CXXMethod name="ccTouchesMoved" num_args="2" type="_void" access="public">
        <ParmVar name="pTouches" type="_set_ptr"/>
        <ParmVar name="pEvent" type="_event_ptr"/>
      </CXXMethod>
    </CXXRecord>
  </TranslationUnit>
  <ReferenceSection>
    <FundamentalType id="_void" kind="void"/>
    <FundamentalType id="_bool" kind="bool"/>
    <Record id="_obj" kind="class" name="CCObject"/>
    <Record id="_touch" kind="class" name="CCTouch"/>
    <Record id="_event" kind="class" name="CCEvent"/>
    <Record id="_set" kind="class" name="CCSet"/>
    <Record id="_layer" kind="class" name="CCLayer"/>
    <PointerType id="_touch_ptr" type="_touch"/>
    <PointerType id="_event_ptr" type="_event"/>
    <PointerType id="_set_ptr" type="_set"/>
  </ReferenceSection>
</CLANG_XML>
"#;

/// Text of the function starting at `signature` up to its closing brace.
fn function_text<'a>(implementation: &'a str, signature: &str) -> &'a str {
    let start = implementation.find(signature).expect("function should be generated");
    let text = &implementation[start..];
    &text[..text.find("\n}\n").map_or(text.len(), |end| end + 3)]
}

#[test]
fn touch_hooks_forward_through_the_pipeline() {
    let config = GeneratorConfig::new().with_allow_list(["CCTouch", "CCLayer"]);
    let output = BindingGenerator::new(config).generate_xml(TOUCH_LIBRARY).unwrap();
    assert_eq!(output.error_count(), 0);

    let layer = output.class("CCLayer").unwrap();
    let declaration = layer.declaration.render();
    assert!(declaration.contains("\tvirtual bool ccTouchBegan(CCTouch* pTouch, CCEvent* pEvent);\n"));
    assert!(declaration.contains("\tvirtual void ccTouchesMoved(CCSet* pTouches, CCEvent* pEvent);\n"));

    let implementation = layer.implementation.render();
    assert!(!implementation.contains("JS_FN(\"ccTouch"));

    let began = function_text(&implementation, "bool S_CCLayer::ccTouchBegan(CCTouch* pTouch, CCEvent* pEvent) {");
    assert!(began.contains("JS_HasProperty(cx, m_jsobj, \"ccTouchBegan\", &found);"));
    assert!(began.contains("pt->flags = kPointerTemporary;"));
    assert!(began.contains("pt->data = (void *)pTouch;"));
    assert!(began.contains("JS_NewObject(cx, S_CCTouch::jsClass, S_CCTouch::jsObject, NULL)"));
    assert!(began.contains("JS_ValueToBoolean(cx, rval, &ret);"));
    assert!(began.contains("return ret;"));
    assert!(began.ends_with("\treturn false;\n}\n"));

    let moved = function_text(&implementation, "void S_CCLayer::ccTouchesMoved(CCSet* pTouches, CCEvent* pEvent) {");
    assert!(moved.contains("jsval *touches = new jsval[pTouches->count()];"));
    assert!(moved.contains("CCSetIterator setIter;"));
    assert!(moved.contains("shell->flags = kPointerTemporary;"));
    assert!(moved.contains("shell->data = (void *)((CCTouch *)(*setIter));"));
    assert!(moved.contains("JS_NewArrayObject(cx, pTouches->count(), touches);"));
    assert!(moved.contains("delete[] touches;"));
    assert!(!moved.contains("CCLayer::ccTouchesMoved("));
}

// =============================================================================
// Incomplete Members
// =============================================================================

const INCOMPLETE_LIBRARY: &str = r#"<CLANG_XML>
  <TranslationUnit>
    <CXXRecord type="_a" name="CCA">
      <Field name="radius" access="public"/>
      <Field name="scale" type="_float" access="public"/>
      <CXXMethod num_args="0" type="_void" access="public"/>
      <CXXMethod name="setPosition" num_args="2" type="_void" access="public">
        <ParmVar name="x" type="_float"/>
      </CXXMethod>
      <CXXMethod name="cleanup" num_args="0" type="_void" access="public"/>
    </CXXRecord>
    <CXXRecord type="_b" name="CCB">
      <Field name="width" type="_float" access="public"/>
    </CXXRecord>
  </TranslationUnit>
  <ReferenceSection>
    <FundamentalType id="_void" kind="void"/>
    <FundamentalType id="_float" kind="float"/>
    <Record id="_a" kind="class" name="CCA"/>
    <Record id="_b" kind="class" name="CCB"/>
  </ReferenceSection>
</CLANG_XML>
"#;

fn generate_incomplete() -> scriptbind::GenerationOutput {
    let config = GeneratorConfig::new().with_allow_list(["CCA", "CCB"]);
    BindingGenerator::new(config)
        .generate_xml(INCOMPLETE_LIBRARY)
        .expect("missing member attributes are not fatal")
}

#[test]
fn missing_field_type_degrades_one_property() {
    let output = generate_incomplete();
    let implementation = output.class("CCA").unwrap().implementation.render();

    let radius = case_body(&implementation, "S_CCA::jsPropertyGet(", "kRadius").unwrap();
    assert!(radius.contains("// scriptbind: skipped property radius (unresolved type)"));
    let scale = case_body(&implementation, "S_CCA::jsPropertyGet(", "kScale").unwrap();
    assert!(scale.contains("JS_NewNumberValue(cx, cobj->scale, &tmp)"));

    let sibling = output.class("CCB").unwrap();
    assert!(sibling.is_complete());
    assert!(sibling.implementation.render().contains("cobj->width"));
}

#[test]
fn nameless_method_is_dropped_with_a_warning() {
    let output = generate_incomplete();
    let dropped: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.class == "CCA" && d.message.contains("without a name"))
        .collect();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].severity, Severity::Warning);

    let implementation = output.class("CCA").unwrap().implementation.render();
    assert!(implementation.contains("JS_FN(\"cleanup\", S_CCA::jscleanup, 0"));
}

#[test]
fn arity_mismatch_skips_the_method() {
    let output = generate_incomplete();
    let class = output.class("CCA").unwrap();
    let implementation = class.implementation.render();

    assert!(implementation.contains("// scriptbind: skipped method setPosition (arity mismatch)"));
    assert!(!implementation.contains("JS_FN(\"setPosition\""));
    assert!(!class.declaration.render().contains("jssetPosition"));

    assert_eq!(output.error_count(), 1);
    let error = output
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
        .unwrap();
    assert_eq!(error.unit, "setPosition");
}

// =============================================================================
// Fatal Input
// =============================================================================

#[test]
fn wrong_root_is_fatal() {
    let err = BindingGenerator::default()
        .generate_xml("<html><body/></html>")
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::Input(InputError::InvalidRoot { ref found, .. }) if found == "html"
    ));
}

#[test]
fn missing_section_is_fatal() {
    let err = BindingGenerator::default()
        .generate_xml("<CLANG_XML><TranslationUnit/></CLANG_XML>")
        .unwrap_err();
    assert!(matches!(err, BindError::Input(InputError::MissingSection(_))));
}
