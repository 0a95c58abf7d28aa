//! Typedef translation
//!
//! A typedef lands in one of three places. A target carrying template
//! angle-brackets is an instantiation and is routed to the templates block
//! instead of a plain typedef line. A target that is nothing but a
//! module-prefixed class name becomes a class alias binding on top of its
//! typedef line. Everything else is emitted as a plain typedef and shows up
//! in the stub only as an opaque named type.

use indexmap::IndexMap;

use crate::context::TranslationContext;
use crate::deps::record_dependency;
use crate::diagnostics::DiagnosticsCollector;
use crate::fragments::{Fragment, Section};
use crate::hints::render_opaque_hint;
use crate::modules::is_module;

/// Aliases never emitted; each one either double-defines a wrapper another
/// module already owns or names a construct the binding compiler rejects
const TYPEDEF_DENYLIST: &[&str] = &[
    "Handle_Standard_Transient",
    "NCollection_DelMapNode",
    "BOPDS_DataMapOfPaveBlockCommonBlock",
    "BOPCol_MapOfInteger",
    "BOPCol_SequenceOfReal",
    "BOPCol_DataMapOfIntegerInteger",
    "BOPCol_DataMapOfIntegerReal",
    "BOPCol_IndexedMapOfInteger",
    "BOPCol_ListOfInteger",
    "IntWalk_VectorOfWalkingData",
    "IntWalk_VectorOfInteger",
    "TopoDS_AlertWithShape",
    "gp_TrsfNLerp",
    "TopOpeBRepTool_IndexedDataMapOfSolidClassifier",
    "Graphic3d_Vec2u",
    "Graphic3d_Vec3u",
    "Graphic3d_Vec4u",
    "Select3D_BndBox3d",
    "SelectMgr_TriangFrustums",
    "SelectMgr_TriangFrustumsIter",
    "SelectMgr_MapOfObjectSensitives",
    "Graphic3d_IndexedMapOfAddress",
    "Graphic3d_MapOfObject",
    "Storage_PArray",
    "Interface_StaticSatisfies",
    "IMeshData::ICurveArrayAdaptor",
];

/// Template families whose instantiations never compile as bindings
const TEMPLATE_DENYLIST: &[&str] = &[
    "gp_TrsfNLerp",
    "IntPolyh_Array",
    "NCollection_CellFilter",
    "BVH_PrimitiveSet",
    "BVH_Builder",
    "std::pair",
    "Graphic3d_UniformValue",
    "NCollection_Shared",
    "NCollection_Handle",
    "NCollection_DelMapNode",
    "BOPTools_BoxSet",
    "BOPTools_BoxSelector",
    "BOPTools_PairSelector",
];

/// Accessor extension for every fixed-size array instantiation, indexing
/// from zero on top of the wrapped type's own bounds
const ARRAY1_EXTENSION: &str = "
%extend NCollection_Array1_Template_Instanciation {
    %pythoncode {
    def __getitem__(self, index):
        if index + self.Lower() > self.Upper():
            raise IndexError(\"index out of range\")
        else:
            return self.Value(index + self.Lower())

    def __setitem__(self, index, value):
        if index + self.Lower() > self.Upper():
            raise IndexError(\"index out of range\")
        else:
            self.SetValue(index + self.Lower(), value)

    def __len__(self):
        return self.Length()

    def __iter__(self):
        self.low = self.Lower()
        self.up = self.Upper()
        self.current = self.Lower() - 1
        return self

    def next(self):
        if self.current >= self.Upper():
            raise StopIteration
        else:
            self.current += 1
        return self.Value(self.current)

    __next__ = next
    }
};
";

/// Translate the merged typedef map of one module
///
/// Returns the templates, typedefs and class-alias fragments, in that
/// order. Targets that reference a handle-wrapped foreign class pull that
/// class's module into the dependency list first, so the import exists
/// before any emitted line mentions the type.
pub fn translate_typedefs(
    ctx: &mut TranslationContext,
    collector: &mut DiagnosticsCollector,
    typedefs: &IndexMap<String, String>,
) -> Vec<Fragment> {
    let kept: Vec<(&String, &String)> = typedefs
        .iter()
        .filter(|(alias, _)| !TYPEDEF_DENYLIST.contains(&alias.as_str()))
        .collect();

    for (_, target) in &kept {
        record_handle_dependency(ctx, collector, target);
    }

    let mut typedef_lines = String::from("/* typedefs */\n");
    let mut opaque_hints = String::new();
    let mut templated: Vec<(String, String)> = Vec::new();
    let mut aliases: Vec<(String, String)> = Vec::new();

    for (alias, target) in kept {
        if let Some(first) = target.split_whitespace().next() {
            record_dependency(ctx, first);
        }
        if target.contains('<') || target.contains('>') {
            templated.push((target.clone(), alias.clone()));
            opaque_hints.push_str(&render_opaque_hint(alias));
            continue;
        }
        typedef_lines.push_str(&format!("typedef {} {};\n", target, alias));
        if plain_class_target(target).is_some() {
            aliases.push((alias.clone(), target.clone()));
        } else {
            opaque_hints.push_str(&render_opaque_hint(alias));
        }
    }
    typedef_lines.push_str("/* end typedefs declaration */\n\n");

    vec![
        translate_templates(ctx, collector, &templated),
        Fragment::new(Section::Typedefs, typedef_lines).with_hint(opaque_hints),
        alias_bindings(ctx, &aliases),
    ]
}

/// Emit a template instantiation per angle-bracketed typedef
///
/// A list-iterator alias is instantiated over the generic iterator type
/// with the element type read back out of the target. Fixed-size array
/// instantiations get the indexing extension on top.
fn translate_templates(
    ctx: &mut TranslationContext,
    collector: &mut DiagnosticsCollector,
    templated: &[(String, String)],
) -> Fragment {
    let mut text = String::from("/* templates */\n");
    for (target, alias) in templated {
        if target.ends_with("::Iterator") || target.ends_with("::Type") {
            if alias.ends_with("Iter") || alias.contains("_ListIteratorOf") {
                let element = if alias.contains("IteratorOf") {
                    match iterator_element(target) {
                        Some(element) => element,
                        None => {
                            collector.warning(format!(
                                "iterator typedef target cannot be decomposed: {}",
                                target
                            ));
                            continue;
                        }
                    }
                } else {
                    alias.split("Iter").next().unwrap_or(alias).to_string()
                };
                text.push_str(&format!(
                    "%template({}) NCollection_TListIterator<{}>;\n",
                    alias, element
                ));
            }
            continue;
        }
        if TEMPLATE_DENYLIST.iter().any(|family| target.contains(family)) {
            continue;
        }
        if !alias.contains('_') {
            collector.warning(format!(
                "template alias {} skipped, no module prefix in the name",
                alias
            ));
            continue;
        }
        if !ctx.seen_templates.insert(alias.clone()) {
            continue;
        }
        text.push_str(&format!("%template({}) {};\n", alias, target));
        if target.contains("NCollection_Array1") {
            text.push_str(&ARRAY1_EXTENSION.replace("NCollection_Array1_Template_Instanciation", target));
        }
    }
    text.push_str("/* end templates declaration */\n");
    text.push('\n');
    Fragment::new(Section::Templates, text)
}

/// Class-alias bindings, one assignment per plain-class typedef
///
/// A cross-module target needs its defining module imported inside the
/// binding block; the stub side leans on the wildcard dependency imports
/// instead.
fn alias_bindings(ctx: &TranslationContext, aliases: &[(String, String)]) -> Fragment {
    let mut text = String::from("/* class aliases */\n%pythoncode {\n");
    let mut hint = String::new();
    let mut imported: Vec<&str> = Vec::new();
    for (alias, target) in aliases {
        if let Some(module) = foreign_module(ctx, target) {
            if !imported.contains(&module) {
                text.push_str(&format!("from OCC.Core.{} import {}\n", module, target));
                imported.push(module);
            }
        }
        text.push_str(&format!("{}={}\n", alias, target));
        hint.push_str(&format!("{} = {}\n", alias, target));
    }
    text.push_str("}\n");
    Fragment::new(Section::Aliases, text).with_hint(hint)
}

/// A target that is exactly one module-prefixed class name, nothing else
fn plain_class_target(target: &str) -> Option<&str> {
    let trimmed = target.trim();
    if trimmed.contains(['<', '>', '*', '&', ':']) {
        return None;
    }
    if trimmed.split_whitespace().count() != 1 {
        return None;
    }
    let module = trimmed.split('_').next().unwrap_or(trimmed);
    if module == trimmed || !is_module(module) {
        return None;
    }
    Some(trimmed)
}

/// The defining module of a plain class target, when it is not the module
/// being translated
fn foreign_module<'a>(ctx: &TranslationContext, target: &'a str) -> Option<&'a str> {
    let module = target.split('_').next().unwrap_or(target);
    if module != ctx.module() && is_module(module) {
        Some(module)
    } else {
        None
    }
}

/// Pull the dependency out of a handle-wrapped typedef target
///
/// One level of angle brackets means the handle itself is the target, two
/// mean the handle sits inside a collection instantiation. Anything deeper
/// is not a shape the emitters can produce code for.
fn record_handle_dependency(
    ctx: &mut TranslationContext,
    collector: &mut DiagnosticsCollector,
    target: &str,
) {
    if !target.contains("opencascade::handle") {
        return;
    }
    let inner = match target.matches('<').count() {
        1 => angle_inner(target, 1),
        2 => angle_inner(target, 2),
        _ => None,
    };
    let Some(inner) = inner else {
        collector.warning(format!("typedef target cannot be handled: {}", target));
        return;
    };
    let module = inner.split('_').next().unwrap_or(inner);
    ctx.add_dependency(module);
}

/// The text between the nth `<` and the next `>`
fn angle_inner(target: &str, depth: usize) -> Option<&str> {
    let piece = target.split('<').nth(depth)?;
    piece.split('>').next()
}

/// Element type of a list-iterator target, handle targets kept wrapped
fn iterator_element(target: &str) -> Option<String> {
    if target.contains("opencascade::handle") {
        angle_inner(target, 2).map(|inner| format!("opencascade::handle<{}>", inner))
    } else {
        angle_inner(target, 1).map(str::to_string)
    }
}
