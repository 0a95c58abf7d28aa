//! Dependency tracking
//!
//! Every type spelling that crosses a translator is classified to the module
//! that owns it. Recognized foreign modules are appended to the current
//! module's dependency list so the assembler can emit the matching imports.

use crate::context::TranslationContext;

/// Qualifier fragments removed before classification, in this order
const QUALIFIER_FRAGMENTS: &[&str] = &[
    "const ",
    "static ",
    "virtual ",
    "clocale_t",
    "pointer",
    "size_type",
    "void",
    "reference",
    "const_",
    "inline ",
];

/// Classify a type spelling and record the owning module as a dependency
///
/// Returns the owning module name whenever one can be read out of the
/// spelling, or None when the token carries no module information. The
/// dependency list is only touched for known foreign modules; the font
/// subsystem is recognized but never recorded, which keeps an optional
/// platform coupling out of every generated module.
pub fn record_dependency(ctx: &mut TranslationContext, item: &str) -> Option<String> {
    let mut item = item.to_string();
    for fragment in QUALIFIER_FRAGMENTS {
        item = item.replace(fragment, "");
    }
    if item.trim().is_empty() {
        return None;
    }

    let module = if let Some(inner) = wrapped_handle_target(&item) {
        module_prefix(&inner)
    } else if let Some(rest) = item.strip_prefix("Handle_") {
        rest.split('_').next().unwrap_or(rest).to_string()
    } else if let Some(inner) = item
        .strip_prefix("opencascade::handle<")
        .and_then(|rest| rest.split('>').next())
    {
        module_prefix(inner)
    } else if item.contains('_') {
        module_prefix(&item)
    } else {
        return None;
    };

    let module = module.trim().to_string();
    if module == "Font" {
        // font headers drag in a platform toolkit, never depend on them
        return Some(module);
    }
    ctx.add_dependency(&module);
    Some(module)
}

/// Inner type of a `Handle ( X )` call form, both spacings accepted
fn wrapped_handle_target(item: &str) -> Option<String> {
    let rest = item.strip_prefix("Handle")?;
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('(')?;
    Some(inner.split(')').next().unwrap_or(inner).trim().to_string())
}

/// Module prefix of an underscore-joined type name
fn module_prefix(name: &str) -> String {
    name.trim()
        .split('_')
        .next()
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::mock_context;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classification_forms() {
        let mut ctx = mock_context("BRepAlgoAPI");
        assert_eq!(
            record_dependency(&mut ctx, "Handle_Geom_Curve"),
            Some("Geom".to_string())
        );
        assert_eq!(
            record_dependency(&mut ctx, "Handle ( Geom2d_Curve)"),
            Some("Geom2d".to_string())
        );
        assert_eq!(
            record_dependency(&mut ctx, "opencascade::handle<TopoDS_TShape>"),
            Some("TopoDS".to_string())
        );
        assert_eq!(
            record_dependency(&mut ctx, "Standard_Integer"),
            Some("Standard".to_string())
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let mut ctx = mock_context("BRepAlgoAPI");
        for _ in 0..3 {
            assert_eq!(
                record_dependency(&mut ctx, "Handle_Geom_Curve"),
                Some("Geom".to_string())
            );
        }
        let geom_entries = ctx.dependencies.iter().filter(|d| *d == "Geom").count();
        assert_eq!(geom_entries, 1);
    }

    #[test]
    fn test_qualifiers_stripped() {
        let mut ctx = mock_context("TopoDS");
        assert_eq!(
            record_dependency(&mut ctx, "const Geom_Curve &"),
            Some("Geom".to_string())
        );
        assert_eq!(
            record_dependency(&mut ctx, "static Standard_Boolean"),
            Some("Standard".to_string())
        );
    }

    #[test]
    fn test_underscore_free_token_is_a_trap() {
        let mut ctx = mock_context("Geom");
        assert_eq!(record_dependency(&mut ctx, "double"), None);
        assert_eq!(record_dependency(&mut ctx, "int"), None);
        assert_eq!(ctx.dependencies, vec!["Standard", "NCollection"]);
    }

    #[test]
    fn test_font_is_satisfied_but_never_recorded() {
        let mut ctx = mock_context("Graphic3d");
        assert_eq!(
            record_dependency(&mut ctx, "Font_FontAspect"),
            Some("Font".to_string())
        );
        assert!(!ctx.dependencies.iter().any(|d| d == "Font"));
    }

    #[test]
    fn test_current_module_not_recorded() {
        let mut ctx = mock_context("Geom");
        assert_eq!(
            record_dependency(&mut ctx, "Geom_Curve"),
            Some("Geom".to_string())
        );
        assert!(!ctx.dependencies.iter().any(|d| d == "Geom"));
    }

    #[test]
    fn test_unknown_module_recognized_but_not_recorded() {
        let mut ctx = mock_context("Geom");
        assert_eq!(
            record_dependency(&mut ctx, "Nonexistent_Thing"),
            Some("Nonexistent".to_string())
        );
        assert!(!ctx.dependencies.iter().any(|d| d == "Nonexistent"));
    }

    #[test]
    fn test_nested_template_prefix() {
        let mut ctx = mock_context("Geom");
        assert_eq!(
            record_dependency(&mut ctx, "NCollection_CellFilter_InspectorXYZ"),
            Some("NCollection".to_string())
        );
    }
}
