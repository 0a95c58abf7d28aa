//! Parameter, return-type, and default-value adaptation
//!
//! Raw type spellings from the headers are not emittable as-is. This module
//! rewrites them: C-string aliases become plain char pointers, non-const
//! references to primitives become output values, returned references to
//! value types lose their reference, and default-value literals are
//! normalized. Every adapted type is also run through the dependency
//! tracker, so using a foreign type is what pulls its module in.

use crate::context::{RunState, TranslationContext};
use crate::cpp::CppParam;
use crate::deps::record_dependency;

/// How a parameter leaves the wrapped call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRole {
    /// Ordinary input parameter
    Input,
    /// Promoted to the return tuple; the value names the hint type
    OutValue(&'static str),
    /// Non-const reference to a known enum, handled by the run-wide
    /// by-reference template file
    OutEnum,
}

/// One parameter rendered for a signature line
#[derive(Debug, Clone)]
pub struct RenderedParam {
    /// Text as it appears between the parentheses, default value included
    pub text: String,
    pub role: ParamRole,
    /// The whole function must be dropped (unresolved template artifact)
    pub poisoned: bool,
}

/// Adapt one parameter type and record its module dependency
pub fn adapt_param_type(ctx: &mut TranslationContext, param_type: &str) -> String {
    let adapted = param_type.replace("Standard_CString", "const char *");
    record_dependency(ctx, &adapted);
    adapted
}

/// Render a parameter for the signature line
///
/// Non-const references to the three primitive aliases become anonymous
/// output values. Non-const references to a registered enum are recorded in
/// the by-reference enum registry and emitted untouched; the run-wide
/// template file carries their conversion.
pub fn render_param(ctx: &mut TranslationContext, param: &CppParam) -> RenderedParam {
    let param_type = adapt_param_type(ctx, &param.type_text);
    if param_type.contains("Handle_T &") {
        return RenderedParam {
            text: String::new(),
            role: ParamRole::Input,
            poisoned: true,
        };
    }

    let type_and_name = match &param.array_size {
        Some(size) => format!("{} {}[{}]", param_type, param.name, size),
        None => format!("{} {}", param_type, param.name),
    };

    let is_const = type_and_name.contains("const");
    let (mut text, mut role) = if !is_const && (contains_ref(&type_and_name, "Standard_Real")
        || type_and_name.starts_with("double &"))
    {
        ("Standard_Real &OutValue".to_string(), ParamRole::OutValue("float"))
    } else if !is_const
        && (contains_ref(&type_and_name, "Standard_Integer") || type_and_name.starts_with("int &"))
    {
        ("Standard_Integer &OutValue".to_string(), ParamRole::OutValue("int"))
    } else if !is_const
        && (contains_ref(&type_and_name, "Standard_Boolean") || type_and_name.starts_with("bool &"))
    {
        ("Standard_Boolean &OutValue".to_string(), ParamRole::OutValue("bool"))
    } else {
        (type_and_name, ParamRole::Input)
    };

    if role == ParamRole::Input && !is_const {
        if let Some(enum_name) = reference_target(&param_type) {
            if ctx.run.enums.contains(enum_name) {
                let owned = enum_name.to_string();
                ctx.run.byref_enums.insert(owned);
                role = ParamRole::OutEnum;
            }
        }
    }

    text = text.replace("& &", "&");
    if role == ParamRole::Input || role == ParamRole::OutEnum {
        if let Some(default) = &param.default_value {
            text.push_str(" = ");
            text.push_str(&adapt_default_value_parmlist(default));
        }
    }

    RenderedParam {
        text: text.trim_end().to_string(),
        role,
        poisoned: false,
    }
}

fn contains_ref(text: &str, type_name: &str) -> bool {
    text.contains(&format!("{} &", type_name)) || text.contains(&format!("{}&", type_name))
}

/// The referent of a `T &` type, None for non-reference types
fn reference_target(param_type: &str) -> Option<&str> {
    let stripped = param_type.trim().strip_suffix('&')?;
    let target = stripped.trim();
    if target.contains(' ') || target.contains('*') {
        return None;
    }
    Some(target)
}

/// Adapt a return type and record its module dependency
///
/// Returned references to small value-type families lose their reference
/// to force a copy at the boundary, and so do returned enum references.
pub fn adapt_return_type(ctx: &mut TranslationContext, return_type: &str) -> String {
    let mut adapted = return_type.replace("Standard_CString", "const char *");
    adapted = adapted.trim().to_string();
    if (adapted.contains("gp") && !adapted.contains("TColgp")) || adapted.contains("TopoDS") {
        adapted = adapted.replace('&', "");
    }
    record_dependency(ctx, &adapted);
    if is_enum_type(&ctx.run, &adapted) && adapted.contains('&') {
        adapted = adapted.replace('&', "");
    }
    adapted.trim().to_string()
}

/// Is any whitespace-separated token of the type a registered enum?
pub fn is_enum_type(run: &RunState, type_text: &str) -> bool {
    type_text.split_whitespace().any(|t| run.enums.contains(t))
}

/// Put a space between the `operator` keyword and its symbol
pub fn adapt_function_name(name: &str) -> String {
    match name.strip_prefix("operator") {
        Some(rest)
            if !rest.is_empty()
                && !rest.starts_with(' ')
                && !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') =>
        {
            format!("operator {}", rest)
        }
        _ => name.to_string(),
    }
}

/// Normalize a default-value literal for docstrings
pub fn adapt_default_value(value: &str) -> String {
    let mut adapted = value.replace(' ', "");
    adapted = adapted.replace('"', "'");
    adapted = adapted.replace("''", "\"\"");
    fix_precision_calls(&adapted)
}

/// Normalize a default-value literal for the signature line
pub fn adapt_default_value_parmlist(value: &str) -> String {
    let adapted = value.replace(' ', "");
    fix_precision_calls(&adapted)
}

/// Space-stripping mangles scope operators in the one default-value family
/// that uses them
fn fix_precision_calls(value: &str) -> String {
    let mut fixed = value.replace("PConfusion", "::Confusion");
    fixed = fixed.replace("PrecisionConfusion", "Precision::Confusion");
    fixed.replace("Precision::::Confusion", "Precision::Confusion")
}

/// Map a C++ type spelling to its hint spelling
pub fn fix_type(type_str: &str) -> String {
    let mut fixed = type_str.replace("Standard_Boolean &", "bool");
    fixed = fixed.replace("Standard_Boolean", "bool");
    fixed = fixed.replace("Standard_Real", "float");
    fixed = fixed.replace("Standard_Integer", "int");
    fixed = fixed.replace("const", "");
    fixed = fixed.replace("& &", "&");
    fixed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpp::CppParam;
    use crate::test::mock_context;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cstring_becomes_char_pointer() {
        let mut ctx = mock_context("Geom");
        assert_eq!(
            adapt_param_type(&mut ctx, "const Standard_CString"),
            "const const char *"
        );
    }

    #[test]
    fn test_param_type_records_dependency() {
        let mut ctx = mock_context("Geom");
        adapt_param_type(&mut ctx, "const TopoDS_Shape &");
        assert!(ctx.dependencies.contains(&"TopoDS".to_string()));
    }

    #[test]
    fn test_out_value_promotion() {
        let mut ctx = mock_context("Geom");
        let rendered = render_param(&mut ctx, &CppParam::new("Xp", "Standard_Real &"));
        assert_eq!(rendered.text, "Standard_Real &OutValue");
        assert_eq!(rendered.role, ParamRole::OutValue("float"));

        let rendered = render_param(&mut ctx, &CppParam::new("I", "Standard_Integer &"));
        assert_eq!(rendered.text, "Standard_Integer &OutValue");

        let rendered = render_param(&mut ctx, &CppParam::new("j", "int &"));
        assert_eq!(rendered.text, "Standard_Integer &OutValue");

        let rendered = render_param(&mut ctx, &CppParam::new("x", "double &"));
        assert_eq!(rendered.text, "Standard_Real &OutValue");
    }

    #[test]
    fn test_const_reference_not_promoted() {
        let mut ctx = mock_context("Geom");
        let rendered = render_param(&mut ctx, &CppParam::new("V", "const Standard_Real &"));
        assert_eq!(rendered.text, "const Standard_Real & V");
        assert_eq!(rendered.role, ParamRole::Input);
    }

    #[test]
    fn test_byref_enum_recorded() {
        let mut ctx = mock_context("Geom");
        ctx.run.enums.insert("BRepCheck_Status".to_string());
        let rendered = render_param(&mut ctx, &CppParam::new("S", "BRepCheck_Status &"));
        assert_eq!(rendered.role, ParamRole::OutEnum);
        assert!(ctx.run.byref_enums.contains("BRepCheck_Status"));
        assert_eq!(rendered.text, "BRepCheck_Status & S");
    }

    #[test]
    fn test_template_artifact_poisons_function() {
        let mut ctx = mock_context("Geom");
        let rendered = render_param(&mut ctx, &CppParam::new("h", "Handle_T &"));
        assert!(rendered.poisoned);
    }

    #[test]
    fn test_default_value_rendered() {
        let mut ctx = mock_context("Geom");
        let param = CppParam::new("Tol", "const Standard_Real").with_default("Precision :: Confusion ( )");
        let rendered = render_param(&mut ctx, &param);
        assert_eq!(
            rendered.text,
            "const Standard_Real Tol = Precision::Confusion()"
        );
    }

    #[test]
    fn test_array_param_keeps_extent() {
        let mut ctx = mock_context("Geom");
        let mut param = CppParam::new("coords", "const Standard_Real");
        param.array_size = Some("3".to_string());
        let rendered = render_param(&mut ctx, &param);
        assert_eq!(rendered.text, "const Standard_Real coords[3]");
    }

    #[test]
    fn test_return_type_value_families_lose_reference() {
        let mut ctx = mock_context("Geom");
        assert_eq!(adapt_return_type(&mut ctx, "const gp_Pnt &"), "const gp_Pnt");
        assert_eq!(
            adapt_return_type(&mut ctx, "const TopoDS_Shape &"),
            "const TopoDS_Shape"
        );
        assert_eq!(
            adapt_return_type(&mut ctx, "const TColgp_Array1OfPnt &"),
            "const TColgp_Array1OfPnt &"
        );
    }

    #[test]
    fn test_enum_return_loses_reference() {
        let mut ctx = mock_context("Geom");
        ctx.run.enums.insert("BRepCheck_Status".to_string());
        assert_eq!(
            adapt_return_type(&mut ctx, "BRepCheck_Status &"),
            "BRepCheck_Status"
        );
    }

    #[test]
    fn test_operator_name_spacing() {
        assert_eq!(adapt_function_name("operator=="), "operator ==");
        assert_eq!(adapt_function_name("operator +="), "operator +=");
        assert_eq!(adapt_function_name("Distance"), "Distance");
        assert_eq!(adapt_function_name("operator TopoDS_Edge &"), "operator TopoDS_Edge &");
    }

    #[test]
    fn test_fix_type_for_hints() {
        assert_eq!(fix_type("const Standard_Real &"), "float &");
        assert_eq!(fix_type("Standard_Boolean"), "bool");
        assert_eq!(fix_type("Standard_Integer"), "int");
    }
}
