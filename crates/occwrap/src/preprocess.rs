//! Header preprocessing
//!
//! Headers are rewritten as text before they reach the C++ parser. The
//! library's convenience macros would otherwise confuse the grammar, and two
//! of them (the collection-definition family) carry information the
//! generator needs, so the pass both cleans the text and records what the
//! macros declared.

use crate::context::RunState;
use crate::diagnostics::{Diagnostic, DiagnosticsCollector};
use lazy_static::lazy_static;
use regex::Regex;

/// Macro families the preprocessor recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    /// Handle declaration macro; commented out
    StandardHandle,
    /// Out-of-line RTTI declaration; commented out
    RttiExt,
    /// Inline RTTI declaration; commented out
    RttiInline,
    /// One-dimensional collection wrapper; captured then commented out
    Harray1,
    /// Two-dimensional collection wrapper; captured then commented out
    Harray2,
    /// Sequence collection wrapper; captured then commented out
    Hsequence,
    /// Deprecation marker; commented out
    Deprecated,
}

impl MacroKind {
    /// The macro token as spelled in the headers
    pub fn token(&self) -> &'static str {
        match self {
            MacroKind::StandardHandle => "DEFINE_STANDARD_HANDLE",
            MacroKind::RttiExt => "DEFINE_STANDARD_RTTIEXT",
            MacroKind::RttiInline => "DEFINE_STANDARD_RTTI_INLINE",
            MacroKind::Harray1 => "DEFINE_HARRAY1",
            MacroKind::Harray2 => "DEFINE_HARRAY2",
            MacroKind::Hsequence => "DEFINE_HSEQUENCE",
            MacroKind::Deprecated => "Standard_DEPRECATED",
        }
    }

    /// Does this macro declare a collection wrapper worth recording?
    fn captures(&self) -> bool {
        matches!(
            self,
            MacroKind::Harray1 | MacroKind::Harray2 | MacroKind::Hsequence
        )
    }
}

/// One scanned macro occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroMatch {
    pub kind: MacroKind,
    /// Comma-separated arguments, trimmed; empty for argument-less macros
    pub args: Vec<String>,
}

impl MacroMatch {
    /// A capturing macro must have exactly wrapper name and element type
    fn captures_ok(&self) -> bool {
        !self.kind.captures() || self.args.len() == 2
    }
}

struct MacroRule {
    kind: MacroKind,
    pattern: Regex,
}

lazy_static! {
    static ref MACRO_RULES: Vec<MacroRule> = vec![
        MacroRule {
            kind: MacroKind::StandardHandle,
            pattern: Regex::new(r"DEFINE_STANDARD_HANDLE[\s]*\(([\w\s]+),([\w\s]+)\)").unwrap(),
        },
        MacroRule {
            kind: MacroKind::RttiExt,
            pattern: Regex::new(r"DEFINE_STANDARD_RTTIEXT[\s]*\(([\w\s]+),([\w\s]+)\)").unwrap(),
        },
        MacroRule {
            kind: MacroKind::RttiInline,
            pattern: Regex::new(r"DEFINE_STANDARD_RTTI_INLINE[\s]*\(([\w\s]+),([\w\s]+)\)")
                .unwrap(),
        },
        MacroRule {
            kind: MacroKind::Harray1,
            pattern: Regex::new(r"DEFINE_HARRAY1[\s]*\(([\w\s]+),([\w\s]+)\)").unwrap(),
        },
        MacroRule {
            kind: MacroKind::Harray2,
            pattern: Regex::new(r"DEFINE_HARRAY2[\s]*\(([\w\s]+),([\w\s]+)\)").unwrap(),
        },
        MacroRule {
            kind: MacroKind::Hsequence,
            pattern: Regex::new(r"DEFINE_HSEQUENCE[\s]*\(([\w\s]+),([\w\s]+)\)").unwrap(),
        },
        MacroRule {
            kind: MacroKind::Deprecated,
            pattern: Regex::new(r"Standard_DEPRECATED").unwrap(),
        },
    ];
    static ref HANDLE_CALL: Regex = Regex::new(r"\bHandle[\s]*\(([\w\s]*)\)").unwrap();
}

/// Tokens stripped outright; they carry no information the generator needs
/// and they derail a grammar-based parser when left in a declaration.
const EXPORT_MACROS: &[&str] = &[
    "Standard_EXPORTEXTERN",
    "Standard_EXPORT",
    "Standard_IMPORT",
    "DEFINE_STANDARD_ALLOC",
    "DEFINE_NCOLLECTION_ALLOC",
    "SMESH_EXPORT",
    "SMESHCONTROLS_EXPORT",
    "SMESHDS_EXPORT",
    "STDMESHERS_EXPORT",
    "NETGENPLUGIN_EXPORT",
];

/// Textual marker of a pure forwarding header left behind by a rename
const ALIAS_HEADER_MARKER: &str = "Alias to moved file";

/// Result of preprocessing one header
#[derive(Debug, Clone)]
pub struct AdaptedHeader {
    /// Rewritten text, empty when the header was skipped
    pub text: String,
    /// True when the header was a forwarding alias and carries nothing
    pub skipped: bool,
}

/// Scan the text against the macro rule table without rewriting anything
pub fn scan_macros(content: &str) -> Vec<MacroMatch> {
    let mut matches = Vec::new();
    for rule in MACRO_RULES.iter() {
        for capture in rule.pattern.captures_iter(content) {
            let args = capture
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().trim().to_string())
                .collect();
            matches.push(MacroMatch {
                kind: rule.kind,
                args,
            });
        }
    }
    matches
}

/// Rewrite `Handle(X)` call forms to the template spelling
///
/// Matches with an empty argument or an argument starting with a lowercase
/// letter are macro definition sites or locals and are left alone.
fn rewrite_handle_calls(content: &str) -> String {
    HANDLE_CALL
        .replace_all(content, |caps: &regex::Captures| {
            let inner = caps[1].trim();
            if inner.is_empty() || inner.starts_with(|c: char| c.is_lowercase()) {
                caps[0].to_string()
            } else {
                format!("opencascade::handle<{}>", inner)
            }
        })
        .into_owned()
}

/// Preprocess one header
///
/// Comments out the macro families from the rule table, records collection
/// wrapper definitions into the run registries, rewrites handle call forms,
/// and strips export markers. Forwarding alias headers are skipped whole.
pub fn adapt_header(
    content: &str,
    run: &mut RunState,
    collector: &mut DiagnosticsCollector,
) -> AdaptedHeader {
    if content.contains(ALIAS_HEADER_MARKER) {
        return AdaptedHeader {
            text: String::new(),
            skipped: true,
        };
    }

    let matches = scan_macros(content);
    let mut text = content.to_string();

    for m in &matches {
        match m.kind {
            MacroKind::StandardHandle => {
                // the declared class is reference counted even when its
                // ancestry is not visible from this header
                if let Some(first) = m.args.first() {
                    run.add_transient(first);
                }
            }
            MacroKind::Harray1 => {
                collector.add(Diagnostic::info(format!(
                    "found HARRAY1 definition {}: {}",
                    m.args[0], m.args[1]
                )));
                run.harray1.insert(m.args[0].clone(), m.args[1].clone());
            }
            MacroKind::Harray2 => {
                collector.add(Diagnostic::info(format!(
                    "found HARRAY2 definition {}: {}",
                    m.args[0], m.args[1]
                )));
                run.harray2.insert(m.args[0].clone(), m.args[1].clone());
            }
            MacroKind::Hsequence => {
                collector.add(Diagnostic::info(format!(
                    "found HSEQUENCE definition {}: {}",
                    m.args[0], m.args[1]
                )));
                run.hsequence.insert(m.args[0].clone(), m.args[1].clone());
            }
            _ => {}
        }
    }

    // comment out every matched macro family, once per family
    let mut seen_kinds: Vec<MacroKind> = Vec::new();
    for m in &matches {
        if seen_kinds.contains(&m.kind) {
            continue;
        }
        seen_kinds.push(m.kind);
        let token = m.kind.token();
        text = text.replace(token, &format!("//{}", token));
    }

    // an argument-bearing macro token the rule table did not match has a
    // malformed argument list; drop the line and carry on
    for kind in [
        MacroKind::StandardHandle,
        MacroKind::RttiExt,
        MacroKind::RttiInline,
        MacroKind::Harray1,
        MacroKind::Harray2,
        MacroKind::Hsequence,
    ] {
        let raw_occurrences = content.matches(kind.token()).count();
        let matched = matches
            .iter()
            .filter(|m| m.kind == kind && m.captures_ok())
            .count();
        if raw_occurrences > matched {
            collector.add(Diagnostic::warning(format!(
                "{} occurrence with unexpected argument list, commented out",
                kind.token()
            )));
            let token = kind.token();
            if !seen_kinds.contains(&kind) {
                text = text.replace(token, &format!("//{}", token));
            }
        }
    }

    text = rewrite_handle_calls(&text);

    for macro_name in EXPORT_MACROS {
        text = text.replace(macro_name, "");
    }

    AdaptedHeader {
        text,
        skipped: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quiet() -> DiagnosticsCollector {
        DiagnosticsCollector::new().quiet()
    }

    #[test]
    fn test_scan_finds_handle_macro() {
        let matches = scan_macros("DEFINE_STANDARD_HANDLE(Geom_Line, Geom_Curve)\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, MacroKind::StandardHandle);
        assert_eq!(matches[0].args, vec!["Geom_Line", "Geom_Curve"]);
    }

    #[test]
    fn test_handle_macro_commented_out() {
        let mut run = RunState::new();
        let adapted = adapt_header(
            "DEFINE_STANDARD_HANDLE(Geom_Line, Geom_Curve)\nclass Geom_Line;\n",
            &mut run,
            &mut quiet(),
        );
        assert!(adapted.text.contains("//DEFINE_STANDARD_HANDLE"));
        assert!(adapted.text.contains("class Geom_Line;"));
    }

    #[test]
    fn test_handle_macro_marks_transient() {
        let mut run = RunState::new();
        adapt_header(
            "DEFINE_STANDARD_HANDLE(Geom_Line, Geom_Curve)\n",
            &mut run,
            &mut quiet(),
        );
        assert!(run.is_transient("Geom_Line"));
    }

    #[test]
    fn test_harray1_captured() {
        let mut run = RunState::new();
        let adapted = adapt_header(
            "DEFINE_HARRAY1(TColgp_HArray1OfPnt, TColgp_Array1OfPnt)\n",
            &mut run,
            &mut quiet(),
        );
        assert_eq!(
            run.harray1.get("TColgp_HArray1OfPnt"),
            Some(&"TColgp_Array1OfPnt".to_string())
        );
        assert!(adapted.text.contains("//DEFINE_HARRAY1"));
    }

    #[test]
    fn test_hsequence_captured() {
        let mut run = RunState::new();
        adapt_header(
            "DEFINE_HSEQUENCE(TColStd_HSequenceOfReal, TColStd_SequenceOfReal)\n",
            &mut run,
            &mut quiet(),
        );
        assert_eq!(
            run.hsequence.get("TColStd_HSequenceOfReal"),
            Some(&"TColStd_SequenceOfReal".to_string())
        );
    }

    #[test]
    fn test_handle_call_rewritten() {
        let mut run = RunState::new();
        let adapted = adapt_header(
            "const Handle(Geom_Curve) & BasisCurve() const;\n",
            &mut run,
            &mut quiet(),
        );
        assert!(adapted
            .text
            .contains("const opencascade::handle<Geom_Curve> & BasisCurve() const;"));
    }

    #[test]
    fn test_handle_call_lowercase_left_alone() {
        let mut run = RunState::new();
        let adapted = adapt_header(
            "#define Handle(className) opencascade::handle<className>\nHandle() h;\n",
            &mut run,
            &mut quiet(),
        );
        assert!(adapted.text.contains("Handle(className)"));
        assert!(adapted.text.contains("Handle() h;"));
    }

    #[test]
    fn test_export_macros_stripped() {
        let mut run = RunState::new();
        let adapted = adapt_header(
            "Standard_EXPORT void SetLocation (const TopLoc_Location& Loc);\n",
            &mut run,
            &mut quiet(),
        );
        assert!(adapted
            .text
            .contains(" void SetLocation (const TopLoc_Location& Loc);"));
        assert!(!adapted.text.contains("Standard_EXPORT"));
    }

    #[test]
    fn test_deprecated_commented_out() {
        let mut run = RunState::new();
        let adapted = adapt_header(
            "Standard_DEPRECATED(\"use BasisCurve\")\nvoid OldMethod();\n",
            &mut run,
            &mut quiet(),
        );
        assert!(adapted.text.contains("//Standard_DEPRECATED"));
        assert!(adapted.text.contains("void OldMethod();"));
    }

    #[test]
    fn test_alias_header_skipped() {
        let mut run = RunState::new();
        let adapted = adapt_header(
            "// Alias to moved file\n#include <GeomAdaptor_Curve.hxx>\n",
            &mut run,
            &mut quiet(),
        );
        assert!(adapted.skipped);
        assert!(adapted.text.is_empty());
    }

    #[test]
    fn test_rtti_inline_commented_out() {
        let mut run = RunState::new();
        let adapted = adapt_header(
            "DEFINE_STANDARD_RTTI_INLINE(Geom_Line, Geom_Curve)\n",
            &mut run,
            &mut quiet(),
        );
        assert!(adapted.text.contains("//DEFINE_STANDARD_RTTI_INLINE"));
    }
}
