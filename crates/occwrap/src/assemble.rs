//! Output file assembly
//!
//! Takes the translated fragments of one module and lays them out as the
//! final interface file, its type-hint twin, and the aggregated module
//! header. Section order is fixed; nothing here depends on translation
//! state beyond what the context carries.

use std::fs;
use std::path::Path;

use crate::context::TranslationContext;
use crate::diagnostics::WrapResult;
use crate::fragments::{FragmentSet, Section};
use crate::hints::hint_header;
use crate::modules::module_docstring;

/// License block carried at the top of every generated file
pub const LICENSE_HEADER: &str = r#"/*
Copyright 2008-2019 Thomas Paviot (tpaviot@gmail.com)

This file is part of pythonOCC.
pythonOCC is free software: you can redistribute it and/or modify
it under the terms of the GNU Lesser General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

pythonOCC is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Lesser General Public License for more details.

You should have received a copy of the GNU Lesser General Public License
along with pythonOCC.  If not, see <http://www.gnu.org/licenses/>.
*/
"#;

const WIN_PRAGMAS: &str = "\n%{\n#ifdef WNT\n#pragma warning(disable : 4716)\n#endif\n%}\n\n";

/// Shared interface files included by every module
const COMMON_INTERFACES: &[&str] = &[
    "CommonIncludes",
    "ExceptionCatcher",
    "FunctionTransformers",
    "Operators",
    "OccHandle",
];

/// Sections of the interface file, in emission order
///
/// Free functions are translated for their statistics and dependency side
/// effects but never assembled.
const EMITTED_SECTIONS: &[Section] = &[
    Section::Enums,
    Section::Handles,
    Section::Templates,
    Section::Typedefs,
    Section::Classes,
    Section::Aliases,
];

const NCOLLECTION_SNIPPET: &str = r#"
%include "NCollection_TypeDef.hxx";
%include "NCollection_Array1.hxx";
%include "NCollection_Array2.hxx";
%include "NCollection_Map.hxx";
%include "NCollection_DefaultHasher.hxx";
%include "NCollection_List.hxx";
%include "NCollection_Sequence.hxx";
%include "NCollection_DataMap.hxx";
%include "NCollection_IndexedMap.hxx";
%include "NCollection_IndexedDataMap.hxx";
%include "NCollection_DoubleMap.hxx";
%include "NCollection_DefineAlloc.hxx";
%include "Standard_Macro.hxx";
%include "Standard_DefineAlloc.hxx";
%include "NCollection_UBTree.hxx";
%include "NCollection_UBTreeFiller.hxx";
%include "NCollection_Lerp.hxx";
%include "NCollection_Vector.hxx";
%include "NCollection_Vec2.hxx";
%include "NCollection_Vec3.hxx";
%include "NCollection_Vec4.hxx";
%include "NCollection_Mat4.hxx";
%include "NCollection_TListIterator.hxx";
%include "NCollection_UtfString.hxx";
%include "NCollection_UtfIterator.hxx";
%include "NCollection_SparseArray.hxx";

%ignore NCollection_List::First();
%ignore NCollection_List::Last();
%ignore NCollection_TListIterator::Value();
"#;

const BVH_SNIPPET: &str = "\n%include \"BVH_Box.hxx\";\n%include \"BVH_PrimitiveSet.hxx\";\n";

const PRS3D_SNIPPET: &str = "\n%include \"Prs3d_Point.hxx\";\n";

const GRAPHIC3D_SNIPPET: &str = r#"
%define Handle_Graphic3d_TextureSet Handle(Graphic3d_TextureSet)
%enddef
%define Handle_Aspect_DisplayConnection Handle(Aspect_DisplayConnection)
%enddef
%define Handle_Graphic3d_NMapOfTransient Handle(Graphic3d_NMapOfTransient)
%enddef
"#;

const BREPALGOAPI_SNIPPET: &str = "\n%include \"BRepAlgoAPI_Algo.hxx\";\n";

const BOPDS_SNIPPET: &str = "\n%include \"BOPCol_NCVector.hxx\";\n";

const INTPOLYH_SNIPPET: &str = r#"
%include "IntPolyh_Array.hxx";
%include "IntPolyh_ArrayOfTriangles.hxx";
%include "IntPolyh_SeqOfStartPoints.hxx";
%include "IntPolyh_ArrayOfEdges.hxx";
%include "IntPolyh_ArrayOfTangentZones.hxx";
%include "IntPolyh_ArrayOfSectionLines.hxx";
%include "IntPolyh_ListOfCouples.hxx";
%include "IntPolyh_ArrayOfPoints.hxx";
"#;

/// Per-module interface snippet injected after the imports
fn module_snippet(module: &str) -> Option<&'static str> {
    match module {
        "NCollection" => Some(NCOLLECTION_SNIPPET),
        "BVH" => Some(BVH_SNIPPET),
        "Prs3d" => Some(PRS3D_SNIPPET),
        "Graphic3d" => Some(GRAPHIC3D_SNIPPET),
        "BRepAlgoAPI" => Some(BREPALGOAPI_SNIPPET),
        "BOPDS" => Some(BOPDS_SNIPPET),
        "IntPolyh" => Some(INTPOLYH_SNIPPET),
        _ => None,
    }
}

/// Extra raw includes at the top of the `%{ … %}` block
///
/// Each entry works around an upstream header that does not compile when
/// included in aggregated order.
fn special_includes(module: &str) -> &'static str {
    match module {
        "Adaptor3d" => "#include<Adaptor2d_HCurve2d.hxx>\n",
        "BRepMesh" => "#include<BRepMesh_Delaun.hxx>\n",
        "ShapeUpgrade" => {
            "#include<Precision.hxx>\n#include<ShapeUpgrade_UnifySameDomain.hxx>\n"
        }
        _ => "",
    }
}

/// The three generated files of one module
#[derive(Debug, Clone)]
pub struct ModuleOutput {
    /// `<module>.i`
    pub interface: String,
    /// `<module>.pyi`
    pub hints: String,
    /// `<module>_module.hxx`
    pub aggregated_header: String,
}

/// Lay out every output file of one module
pub fn assemble_module(
    ctx: &TranslationContext,
    fragments: &FragmentSet,
    include_headers: &[String],
    extra_dependencies: &[&str],
) -> ModuleOutput {
    ModuleOutput {
        interface: interface_file(ctx, fragments, extra_dependencies),
        hints: hint_file(ctx, fragments),
        aggregated_header: aggregated_header(ctx, include_headers),
    }
}

/// The complete interface file text
pub fn interface_file(
    ctx: &TranslationContext,
    fragments: &FragmentSet,
    extra_dependencies: &[&str],
) -> String {
    let module = ctx.module();
    let macro_name = format!("{}DOCSTRING", module.to_uppercase());

    let mut text = String::from(LICENSE_HEADER);
    text.push_str(&format!("%define {}\n", macro_name));
    text.push_str(&format!("\"{}\"\n", module_docstring(module)));
    text.push_str("%enddef\n");
    text.push_str(&format!(
        "%module (package=\"OCC.Core\", docstring={}) {}\n\n",
        macro_name, module
    ));
    text.push_str(WIN_PRAGMAS);
    for include in COMMON_INTERFACES {
        text.push_str(&format!("%include ../common/{}.i\n", include));
    }
    text.push_str("\n\n");

    text.push_str("%{\n");
    text.push_str(special_includes(module));
    text.push_str(&format!("#include<{}_module.hxx>\n", module));
    text.push_str("\n//Dependencies\n");
    for dep in &ctx.dependencies {
        text.push_str(&format!("#include<{}_module.hxx>\n", dep));
    }
    for extra in extra_dependencies {
        text.push_str(&format!("#include<{}_module.hxx>\n", extra));
    }
    for header_dep in &ctx.header_dependencies {
        text.push_str(&format!("#include<{}_module.hxx>\n", header_dep));
    }
    text.push_str("%};\n");

    for dep in &ctx.dependencies {
        text.push_str(&format!("%import {}.i\n", dep));
    }
    text.push_str("\n%pythoncode {\nfrom enum import IntEnum\nfrom OCC.Core.Exception import *\n};\n\n");

    if let Some(snippet) = module_snippet(module) {
        text.push_str(snippet);
    }
    for section in EMITTED_SECTIONS {
        text.push_str(&fragments.section_text(*section));
    }
    text
}

/// The type-hint stub file text
pub fn hint_file(ctx: &TranslationContext, fragments: &FragmentSet) -> String {
    let mut text = format!(
        "# generated type hints for the {} module, do not edit\n\n",
        ctx.module()
    );
    text.push_str(&hint_header(&ctx.dependencies));
    for section in EMITTED_SECTIONS {
        text.push_str(&fragments.section_hints(*section));
    }
    text
}

/// The aggregated module header included by the interface files
pub fn aggregated_header(ctx: &TranslationContext, include_headers: &[String]) -> String {
    let guard = format!("{}_HXX", ctx.module().to_uppercase());
    let mut text = format!("#ifndef {}\n#define {}\n\n", guard, guard);
    text.push_str(LICENSE_HEADER);
    text.push('\n');
    for header in include_headers {
        text.push_str(&format!("#include<{}>\n", header));
    }
    for dep in &ctx.dependencies {
        text.push_str(&format!("#include<{}_module.hxx>\n", dep));
    }
    text.push_str(&format!("\n#endif // {}\n", guard));
    text
}

/// Write a file only when its content changed
///
/// Keeps mtimes stable across runs so downstream build systems do not
/// recompile untouched modules.
pub fn write_if_changed(path: &Path, content: &str) -> WrapResult<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == content {
            return Ok(false);
        }
    }
    fs::write(path, content)?;
    Ok(true)
}
