//! Handle directive emission
//!
//! Reference counted classes are announced to the binding compiler before
//! any typedef or class body mentions them. The section mirrors the class
//! section's ordering and exclusions, then appends the collection wrappers
//! the current module owns.

use crate::context::TranslationContext;
use crate::fragments::{Fragment, Section};
use crate::modules::is_persistent_class;

/// Emit one handle-wrap directive per reference counted class
///
/// A wildcard class exclusion suppresses the whole section. Persistence
/// framework classes are reference counted through a different mechanism
/// and never get a directive.
pub fn translate_handles(
    ctx: &TranslationContext,
    ordered_classes: &[String],
    excluded_classes: &[&str],
) -> Fragment {
    if excluded_classes.contains(&"*") {
        return Fragment::new(Section::Handles, "");
    }
    let mut text = String::from("/* handles */\n");
    for name in ordered_classes {
        if excluded_classes.contains(&name.as_str()) {
            continue;
        }
        if ctx.run.is_transient(name) && !is_persistent_class(name) {
            text.push_str(&format!("%wrap_handle({})\n", name));
        }
    }
    let prefix = format!("{}_", ctx.module());
    for registry in [&ctx.run.harray1, &ctx.run.harray2, &ctx.run.hsequence] {
        for wrapper in registry.keys() {
            if wrapper.starts_with(&prefix) {
                text.push_str(&format!("%wrap_handle({})\n", wrapper));
            }
        }
    }
    text.push_str("/* end handles declaration */\n\n");
    Fragment::new(Section::Handles, text)
}
