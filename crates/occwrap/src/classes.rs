//! Class translation
//!
//! The heaviest section of an interface file. Classes arrive already
//! linearized so every ancestor precedes its descendants; each one is
//! rendered as a star banner, constructor and destructor policy
//! directives, the declaration with up to two bases, the public body
//! (typedefs, nested class stubs, enums, fields, methods) and the
//! trailing extension blocks.

use indexmap::IndexMap;

use crate::context::TranslationContext;
use crate::cpp::{Access, CppClass, CppMethod, CppProperty};
use crate::deps::record_dependency;
use crate::diagnostics::DiagnosticsCollector;
use crate::enums::class_enum_block;
use crate::fragments::{Fragment, Section};
use crate::functions::{translate_function, FunctionOutcome};
use crate::hints::{render_class_hint, ClassHint};
use crate::modules::{is_persistent_class, method_exclusion, Exclusion, ModuleRules};
use crate::params::fix_type;

/// Classes whose synthesized zero-argument constructor builds an unusable
/// instance, even though their headers declare no constructor to hide
const NODEFAULTCTOR_DENYLIST: &[&str] = &[
    "AIS_InteractiveContext",
    "Graphic3d_GraphicDriver",
    "V3d_View",
    "V3d_Viewer",
];

/// Classes given a wrapped copy constructor plus byte-string serialization
const PICKLED_CLASSES: &[&str] = &["TopoDS_Shape", "TopoDS_Vertex"];

/// Field types the binding compiler cannot digest; reported when skipped
const UNWRAPPABLE_FIELD_TYPES: &[&str] = &["NCollection_Vec2", "using", "return", "std::map<"];

/// Translate every class of a module, in linearized order
///
/// A wildcard class exclusion suppresses the whole section. Excluded and
/// foreign-prefixed classes still get their banner so the section reads as
/// a complete inventory of what the headers declared.
pub fn translate_classes(
    ctx: &mut TranslationContext,
    collector: &mut DiagnosticsCollector,
    classes: &IndexMap<String, CppClass>,
    order: &[String],
    rules: &ModuleRules,
) -> Fragment {
    if rules.excluded_classes.contains(&"*") {
        return Fragment::new(Section::Classes, "");
    }

    let mut text = String::new();
    let mut hint = String::new();
    for name in order {
        let Some(class) = classes.get(name) else {
            continue;
        };
        text.push_str(&banner(name));
        if rules.excluded_classes.contains(&name.as_str()) {
            continue;
        }
        if !name.starts_with(ctx.module()) {
            continue;
        }

        let (body, class_hint) = translate_class(ctx, collector, class, rules);
        text.push_str(&body);
        hint.push_str(&render_class_hint(&class_hint));
        ctx.run.classes_done += 1;
    }

    Fragment::new(Section::Classes, text).with_hint(hint)
}

/// The star banner above each class, aligned to the name
fn banner(class_name: &str) -> String {
    let stars = "*".repeat(class_name.len() + 9);
    format!("/{}\n* class {} *\n{}/\n", stars, class_name, stars)
}

fn translate_class(
    ctx: &mut TranslationContext,
    collector: &mut DiagnosticsCollector,
    class: &CppClass,
    rules: &ModuleRules,
) -> (String, ClassHint) {
    let name = &class.name;
    let mut text = String::new();

    // a class sharing its module's name shadows the package on import
    if name == ctx.module() {
        text.push_str(&format!("%rename({}) {};\n", name.to_lowercase(), name));
    }
    if suppress_default_constructor(class) {
        text.push_str(&format!("%nodefaultctor {};\n", name));
    }
    if let Some(dtor) = class.destructor() {
        if dtor.access != Access::Public {
            text.push_str(&format!("%ignore {}::~{}();\n", name, name));
        }
    }

    text.push_str(&format!("class {}", name));
    for (i, ancestor) in class.ancestors.iter().take(2).enumerate() {
        record_dependency(ctx, &ancestor.name);
        let lead = if i == 0 { " :" } else { "," };
        text.push_str(&format!(
            "{} {} {}",
            lead,
            ancestor.access.keyword(),
            ancestor.name
        ));
    }
    text.push_str(" {\n");
    text.push_str("\tpublic:\n");

    for (alias, target) in &class.typedefs {
        // function-pointer aliases carry their declarator decoration
        if alias.contains(')') {
            continue;
        }
        text.push_str(&format!("typedef {} {};\n", target, alias));
    }
    for nested in &class.nested_classes {
        collector.info(format!("wrapping nested class {}::{}", name, nested));
        text.push_str(&format!("\t\tclass {} {{}};\n", nested));
    }
    if !class.enums.is_empty() {
        text.push_str(&class_enum_block(ctx, &class.enums));
    }
    for prop in &class.properties {
        if prop.access != Access::Public {
            continue;
        }
        text.push_str(&field_line(collector, prop));
    }
    if PICKLED_CLASSES.contains(&name.as_str()) {
        text.push_str("\t\t%feature(\"autodoc\", \"1\");\n");
        text.push_str(&format!("\t\t{}(const {} arg0);\n", name, name));
    }

    let (constructors, others, placeholders) = filter_methods(collector, class, rules);
    let mut class_hint = ClassHint {
        name: name.clone(),
        ancestor: class
            .ancestors
            .first()
            .map(|a| a.name.clone())
            .filter(|n| !n.contains('<')),
        methods: Vec::new(),
    };
    for method in constructors.into_iter().chain(others) {
        match translate_function(ctx, method) {
            FunctionOutcome::Dropped => {}
            FunctionOutcome::Shim(shim) => text.push_str(&shim.text),
            FunctionOutcome::Standard { text: line, hint } => {
                text.push_str(&line);
                class_hint.methods.push(hint);
            }
        }
    }

    text.push_str("};\n\n");
    text.push('\n');
    if ctx.run.is_transient(name) && !is_persistent_class(name) {
        text.push_str(&format!("%make_alias({})\n\n", name));
    }
    if PICKLED_CLASSES.contains(&name.as_str()) {
        text.push_str(&pickling_extension(name));
    }
    text.push_str(&repr_extension(name));
    for method_name in placeholders {
        text.push_str(&placeholder_extension(name, method_name));
    }

    (text, class_hint)
}

/// Should the binding compiler skip synthesizing a zero-argument constructor?
///
/// Abstract classes cannot be instantiated at all, and a class whose only
/// declared constructors are nonpublic keeps its implicit one hidden too.
/// The denylist covers classes that build but misbehave when default
/// constructed.
fn suppress_default_constructor(class: &CppClass) -> bool {
    if class.is_abstract {
        return true;
    }
    if NODEFAULTCTOR_DENYLIST.contains(&class.name.as_str()) {
        return true;
    }
    class.has_any_constructor() && class.public_constructors().next().is_none()
}

/// Split the wrappable public members into constructors and the rest
///
/// Constructors keep declaration order and come first; other methods are
/// sorted by name, overload groups staying in declaration order. The
/// returned placeholder names are plain-name exclusions owed a stand-in
/// attribute after the class body.
fn filter_methods<'a>(
    collector: &mut DiagnosticsCollector,
    class: &'a CppClass,
    rules: &ModuleRules,
) -> (Vec<&'a CppMethod>, Vec<&'a CppMethod>, Vec<&'a str>) {
    let mut constructors = Vec::new();
    let mut others = Vec::new();
    let mut placeholders: Vec<&str> = Vec::new();

    for method in &class.methods {
        if method.access != Access::Public || method.is_destructor || method.is_friend {
            continue;
        }
        if let Some(exclusion) = method_exclusion(rules, &class.name, method) {
            if exclusion == Exclusion::Placeholder && !placeholders.contains(&method.name.as_str())
            {
                placeholders.push(&method.name);
            }
            continue;
        }
        if method.is_constructor && class.is_abstract {
            collector.warning(format!(
                "constructor skipped for abstract class {}",
                class.name
            ));
            continue;
        }
        // ShallowCopy clashes with the handle downcast machinery
        if method.name == "ShallowCopy" || method.name.contains('<') {
            continue;
        }
        if method.is_constructor {
            constructors.push(method);
        } else {
            others.push(method);
        }
    }
    others.sort_by(|a, b| a.name.cmp(&b.name));
    (constructors, others, placeholders)
}

/// One public data member, or nothing when the type is unwrappable
fn field_line(collector: &mut DiagnosticsCollector, prop: &CppProperty) -> String {
    if UNWRAPPABLE_FIELD_TYPES
        .iter()
        .any(|t| prop.type_text.contains(t))
    {
        collector.warning(format!("field type cannot be wrapped: {}", prop.type_text));
        return String::new();
    }
    if prop.is_constant
        || prop.type_text.contains("virtual")
        || prop.type_text.contains("Standard_EXPORT")
        || prop.type_text.to_lowercase().contains("callback")
    {
        return String::new();
    }
    match &prop.array_size {
        Some(size) => format!("\t\t{} {}[{}];\n", fix_type(&prop.type_text), prop.name, size),
        None => format!("\t\t{} {};\n", fix_type(&prop.type_text), prop.name),
    }
}

/// Pickling support routed through the shape-set string serializer
fn pickling_extension(class_name: &str) -> String {
    let mut text = format!("%extend {} {{\n%pythoncode {{\n", class_name);
    text.push_str("\tdef __getstate__(self):\n");
    text.push_str("\t\tfrom .BRepTools import BRepTools_ShapeSet\n");
    text.push_str("\t\tss = BRepTools_ShapeSet()\n");
    text.push_str("\t\tss.Add(self)\n");
    text.push_str("\t\tstr_shape = ss.WriteToString()\n");
    text.push_str("\t\tindx = ss.Locations().Index(self.Location())\n");
    text.push_str("\t\treturn str_shape, indx\n");
    text.push_str("\tdef __setstate__(self, state):\n");
    text.push_str("\t\tfrom .BRepTools import BRepTools_ShapeSet\n");
    text.push_str("\t\ttopods_str, indx = state\n");
    text.push_str("\t\tss = BRepTools_ShapeSet()\n");
    text.push_str("\t\tss.ReadFromString(topods_str)\n");
    text.push_str("\t\tthe_shape = ss.Shape(ss.NbShapes())\n");
    text.push_str("\t\tlocation = ss.Locations().Location(indx)\n");
    text.push_str("\t\tthe_shape.Location(location)\n");
    text.push_str("\t\tself.this = the_shape.this\n");
    text.push_str("\t}\n};\n");
    text
}

fn repr_extension(class_name: &str) -> String {
    format!(
        "%extend {} {{\n\t%pythoncode {{\n\t__repr__ = _dumps_object\n\t}}\n}};\n\n",
        class_name
    )
}

/// Stand-in attribute for a method excluded by plain name
fn placeholder_extension(class_name: &str, method_name: &str) -> String {
    format!(
        "%extend {} {{\n\t%pythoncode {{\n\t@methodnotwrapped\n\tdef {}(self):\n\t\tpass\n\t}}\n}};\n\n",
        class_name, method_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpp::{CppAncestor, CppEnum, CppEnumEntry, CppParam};
    use crate::modules::{signature_hash, ExcludedMethod, MethodFilter};
    use crate::test::mock_context;
    use pretty_assertions::assert_eq;

    fn no_rules() -> ModuleRules {
        ModuleRules::default()
    }

    fn translate_one(
        ctx: &mut TranslationContext,
        class: CppClass,
        rules: &ModuleRules,
    ) -> Fragment {
        let mut collector = DiagnosticsCollector::new();
        let order = vec![class.name.clone()];
        let mut classes = IndexMap::new();
        classes.insert(class.name.clone(), class);
        translate_classes(ctx, &mut collector, &classes, &order, rules)
    }

    #[test]
    fn test_banner_lines_are_aligned() {
        let text = banner("Geom_Line");
        assert_eq!(
            text,
            "/******************\n* class Geom_Line *\n******************/\n"
        );
        let widths: Vec<usize> = text.lines().map(|l| l.len()).collect();
        assert_eq!(widths, vec![19, 19, 19]);
    }

    #[test]
    fn test_wildcard_exclusion_drops_the_section() {
        let rules = ModuleRules {
            extra_dependencies: &[],
            excluded_classes: &["*"],
            excluded_methods: &[],
        };
        let mut ctx = mock_context("Graphic3d");
        let fragment = translate_one(&mut ctx, CppClass::new("Graphic3d_Camera"), &rules);
        assert!(fragment.is_empty());
        assert_eq!(ctx.run.classes_done, 0);
    }

    #[test]
    fn test_excluded_class_keeps_banner_only() {
        let rules = ModuleRules {
            extra_dependencies: &[],
            excluded_classes: &["Standard_Mutex"],
            excluded_methods: &[],
        };
        let mut ctx = mock_context("Standard");
        let fragment = translate_one(&mut ctx, CppClass::new("Standard_Mutex"), &rules);
        assert!(fragment.text.contains("* class Standard_Mutex *"));
        assert!(!fragment.text.contains("class Standard_Mutex {"));
        assert!(!fragment.text.contains("_dumps_object"));
        assert_eq!(ctx.run.classes_done, 0);
    }

    #[test]
    fn test_foreign_prefix_keeps_banner_only() {
        let mut ctx = mock_context("Geom");
        let fragment = translate_one(&mut ctx, CppClass::new("gp_Pnt"), &no_rules());
        assert!(fragment.text.contains("* class gp_Pnt *"));
        assert!(!fragment.text.contains("class gp_Pnt {"));
        assert_eq!(ctx.run.classes_done, 0);
    }

    #[test]
    fn test_single_ancestor_declaration() {
        let mut ctx = mock_context("Geom");
        let class =
            CppClass::new("Geom_Line").with_ancestor(CppAncestor::new("Geom_Curve"));
        let fragment = translate_one(&mut ctx, class, &no_rules());
        assert!(fragment
            .text
            .contains("class Geom_Line : public Geom_Curve {\n\tpublic:\n"));
        assert!(fragment.text.contains("};\n\n"));
        assert!(fragment.hint.starts_with("class Geom_Line(Geom_Curve):\n"));
        assert_eq!(ctx.run.classes_done, 1);
    }

    #[test]
    fn test_two_ancestor_declaration() {
        let mut ctx = mock_context("TColgp");
        let class = CppClass::new("TColgp_HArray1OfPnt")
            .with_ancestor(CppAncestor::new("TColgp_Array1OfPnt"))
            .with_ancestor(CppAncestor::new("Standard_Transient"));
        let fragment = translate_one(&mut ctx, class, &no_rules());
        assert!(fragment.text.contains(
            "class TColgp_HArray1OfPnt : public TColgp_Array1OfPnt, public Standard_Transient {\n"
        ));
    }

    #[test]
    fn test_foreign_ancestor_recorded_as_dependency() {
        let mut ctx = mock_context("BRep");
        let class =
            CppClass::new("BRep_TEdge").with_ancestor(CppAncestor::new("TopoDS_TEdge"));
        translate_one(&mut ctx, class, &no_rules());
        assert!(ctx.dependencies.iter().any(|d| d == "TopoDS"));
    }

    #[test]
    fn test_class_named_after_module_renamed_lowercase() {
        let mut ctx = mock_context("Standard");
        let fragment = translate_one(&mut ctx, CppClass::new("Standard"), &no_rules());
        assert!(fragment.text.contains("%rename(standard) Standard;\n"));
    }

    #[test]
    fn test_default_constructor_suppression_policy() {
        let abstract_class = CppClass::new("Geom_Curve").as_abstract();
        assert!(suppress_default_constructor(&abstract_class));

        let denylisted = CppClass::new("V3d_View");
        assert!(suppress_default_constructor(&denylisted));

        let nonpublic_only = CppClass::new("Geom_Axis").with_method(
            CppMethod::new("Geom_Axis")
                .as_constructor()
                .with_access(Access::Protected),
        );
        assert!(suppress_default_constructor(&nonpublic_only));

        let open = CppClass::new("gp_Pnt")
            .with_method(CppMethod::new("gp_Pnt").as_constructor());
        assert!(!suppress_default_constructor(&open));

        let bare = CppClass::new("gp_XYZ");
        assert!(!suppress_default_constructor(&bare));
    }

    #[test]
    fn test_nonpublic_destructor_ignored() {
        let mut ctx = mock_context("Geom");
        let class = CppClass::new("Geom_Line").with_method(
            CppMethod::new("~Geom_Line")
                .as_destructor()
                .with_access(Access::Protected),
        );
        let fragment = translate_one(&mut ctx, class, &no_rules());
        assert!(fragment.text.contains("%ignore Geom_Line::~Geom_Line();\n"));
    }

    #[test]
    fn test_class_typedefs_skip_function_pointers() {
        let mut ctx = mock_context("NCollection");
        let mut class = CppClass::new("NCollection_CellFilter");
        class
            .typedefs
            .insert("Target".to_string(), "NCollection_CellFilter_Inspector".to_string());
        class
            .typedefs
            .insert("(*Purge)".to_string(), "void".to_string());
        let fragment = translate_one(&mut ctx, class, &no_rules());
        assert!(fragment
            .text
            .contains("typedef NCollection_CellFilter_Inspector Target;\n"));
        assert!(!fragment.text.contains("(*Purge)"));
    }

    #[test]
    fn test_nested_class_stub_and_enum_block() {
        let mut ctx = mock_context("BRepClass3d");
        let mut class = CppClass::new("BRepClass3d_SolidExplorer");
        class.nested_classes.push("Iterator".to_string());
        class.enums.push(
            CppEnum::new(Some("BRepClass3d_Position".to_string()))
                .with_entry(CppEnumEntry::new("BRepClass3d_IN")),
        );
        let fragment = translate_one(&mut ctx, class, &no_rules());
        assert!(fragment.text.contains("\t\tclass Iterator {};\n"));
        assert!(fragment.text.contains("/* public enums */\n"));
        assert!(fragment.text.contains("\tBRepClass3d_IN = 0,\n"));
        assert!(ctx.run.enums.contains("BRepClass3d_Position"));
    }

    #[test]
    fn test_field_emission_and_filtering() {
        let mut collector = DiagnosticsCollector::new();
        let plain = CppProperty::new("myValue", "Standard_Real");
        assert_eq!(field_line(&mut collector, &plain), "\t\tfloat myValue;\n");

        let mut array = CppProperty::new("myCoords", "Standard_Integer");
        array.array_size = Some("3".to_string());
        assert_eq!(field_line(&mut collector, &array), "\t\tint myCoords[3];\n");

        let mut constant = CppProperty::new("myLimit", "Standard_Integer");
        constant.is_constant = true;
        assert_eq!(field_line(&mut collector, &constant), "");
        assert_eq!(collector.warning_count(), 0);

        let mapped = CppProperty::new("myIndex", "std::map<int, int>");
        assert_eq!(field_line(&mut collector, &mapped), "");
        assert_eq!(collector.warning_count(), 1);
    }

    #[test]
    fn test_constructors_come_before_sorted_methods() {
        let mut ctx = mock_context("Geom");
        let class = CppClass::new("Geom_Line")
            .with_method(CppMethod::new("Value").with_return_type("Standard_Real"))
            .with_method(CppMethod::new("Geom_Line").as_constructor())
            .with_method(CppMethod::new("Ancestor").with_return_type("Standard_Integer"));
        let fragment = translate_one(&mut ctx, class, &no_rules());
        let ctor = fragment
            .text
            .find("/****************** Geom_Line ******************/")
            .unwrap();
        let ancestor = fragment
            .text
            .find("/****************** Ancestor ******************/")
            .unwrap();
        let value = fragment
            .text
            .find("/****************** Value ******************/")
            .unwrap();
        assert!(ctor < ancestor);
        assert!(ancestor < value);
    }

    #[test]
    fn test_abstract_class_constructors_skipped_with_warning() {
        let mut collector = DiagnosticsCollector::new();
        let class = CppClass::new("Geom_Curve")
            .as_abstract()
            .with_method(CppMethod::new("Geom_Curve").as_constructor())
            .with_method(CppMethod::new("Value").with_return_type("Standard_Real"));
        let (constructors, others, _) = filter_methods(&mut collector, &class, &no_rules());
        assert!(constructors.is_empty());
        assert_eq!(others.len(), 1);
        assert_eq!(collector.warning_count(), 1);
    }

    #[test]
    fn test_name_excluded_method_gets_placeholder() {
        let rules = ModuleRules {
            extra_dependencies: &[],
            excluded_classes: &[],
            excluded_methods: &[ExcludedMethod {
                class: "AIS_InteractiveContext",
                filter: MethodFilter::Name("SetCurrentObject"),
            }],
        };
        let mut ctx = mock_context("AIS");
        let class = CppClass::new("AIS_InteractiveContext").with_method(
            CppMethod::new("SetCurrentObject")
                .with_param(CppParam::new("theObject", "const Handle_AIS_InteractiveObject &")),
        );
        let fragment = translate_one(&mut ctx, class, &rules);
        assert!(fragment.text.contains("@methodnotwrapped\n\tdef SetCurrentObject(self):"));
        assert!(!fragment.text.contains("%feature(\"compactdefaultargs\") SetCurrentObject;"));
    }

    #[test]
    fn test_signature_excluded_overload_emits_nothing() {
        let rules = ModuleRules {
            extra_dependencies: &[],
            excluded_classes: &[],
            excluded_methods: &[ExcludedMethod {
                class: "TCollection_AsciiString",
                filter: MethodFilter::Signature {
                    name: "Write",
                    hash: "2a954057",
                },
            }],
        };
        let excluded =
            CppMethod::new("Write").with_param(CppParam::new("S", "Standard_OStream &"));
        assert_eq!(signature_hash(&excluded), "2a954057");

        let mut ctx = mock_context("TCollection");
        let class = CppClass::new("TCollection_AsciiString")
            .with_method(excluded)
            .with_method(
                CppMethod::new("Write")
                    .with_param(CppParam::new("S", "Standard_OStream &"))
                    .with_param(CppParam::new("theProgress", "const Message_ProgressRange &")),
            );
        let fragment = translate_one(&mut ctx, class, &rules);
        assert!(!fragment.text.contains("WriteToString"));
        assert!(!fragment.text.contains("@methodnotwrapped"));
        assert!(fragment.text.contains("%feature(\"compactdefaultargs\") Write;"));
    }

    #[test]
    fn test_transient_class_gets_make_alias() {
        let run = crate::test::mock_run_with_transients(&["Geom_Line"]);
        let mut ctx = TranslationContext::for_module("Geom", run);
        let fragment = translate_one(&mut ctx, CppClass::new("Geom_Line"), &no_rules());
        assert!(fragment.text.contains("%make_alias(Geom_Line)\n\n"));
    }

    #[test]
    fn test_every_wrapped_class_gets_repr() {
        let mut ctx = mock_context("gp");
        let fragment = translate_one(&mut ctx, CppClass::new("gp_Pnt"), &no_rules());
        assert!(fragment.text.contains(
            "%extend gp_Pnt {\n\t%pythoncode {\n\t__repr__ = _dumps_object\n\t}\n};\n\n"
        ));
    }

    #[test]
    fn test_pickled_classes_get_copy_constructor_and_state_methods() {
        let mut ctx = mock_context("TopoDS");
        let fragment = translate_one(&mut ctx, CppClass::new("TopoDS_Shape"), &no_rules());
        assert!(fragment
            .text
            .contains("\t\tTopoDS_Shape(const TopoDS_Shape arg0);\n"));
        assert!(fragment.text.contains("def __getstate__(self):"));
        assert!(fragment
            .text
            .contains("from .BRepTools import BRepTools_ShapeSet"));
        assert!(fragment.text.contains("self.this = the_shape.this"));
    }

    #[test]
    fn test_shallow_copy_and_template_members_dropped() {
        let mut collector = DiagnosticsCollector::new();
        let class = CppClass::new("Geom_Line")
            .with_method(CppMethod::new("ShallowCopy").with_return_type("Handle_Geom_Line"))
            .with_method(CppMethod::new("Dump<T>").with_return_type("void"));
        let (constructors, others, placeholders) =
            filter_methods(&mut collector, &class, &no_rules());
        assert!(constructors.is_empty());
        assert!(others.is_empty());
        assert!(placeholders.is_empty());
    }

    #[test]
    fn test_templated_ancestor_not_hinted() {
        let mut ctx = mock_context("TColgp");
        let class = CppClass::new("TColgp_SequenceOfPnt")
            .with_ancestor(CppAncestor::new("NCollection_Sequence<gp_Pnt>"));
        let fragment = translate_one(&mut ctx, class, &no_rules());
        assert!(fragment.hint.starts_with("class TColgp_SequenceOfPnt:\n"));
    }
}
