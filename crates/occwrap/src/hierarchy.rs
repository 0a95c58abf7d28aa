//! Inheritance linearization
//!
//! Classes must be emitted parents-first or the interface text references
//! wrappers that do not exist yet. The linearizer orders a module's classes
//! by inheritance depth, tracking only ancestors that live in the module
//! being processed, and propagates reference-counted status along the way.

use crate::context::TranslationContext;
use crate::cpp::CppClass;
use crate::diagnostics::{Diagnostic, DiagnosticsCollector, WrapError, WrapResult};
use indexmap::IndexMap;

/// Hard cap on ancestor-chain length; beyond this the chain is cyclic
const MAX_ANCESTOR_DEPTH: usize = 64;

/// Order a module's classes from most abstract to most specialized
///
/// Returns class names sorted by ascending inheritance depth, ties broken
/// alphabetically. Classes with more than two ancestors are outside the
/// supported inheritance model and are dropped with a warning. A class
/// whose tracked ancestor chain exceeds the depth cap aborts the run.
pub fn linearize(
    classes: &IndexMap<String, CppClass>,
    ctx: &mut TranslationContext,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<Vec<String>> {
    let tracked = build_tracked_ancestors(classes, ctx, collector)?;

    let mut depths: Vec<(usize, &str)> = Vec::with_capacity(tracked.len());
    for name in tracked.keys() {
        let depth = chain_depth(name, &tracked)?;
        depths.push((depth, name.as_str()));
    }
    depths.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    let order: Vec<String> = depths.into_iter().map(|(_, name)| name.to_string()).collect();

    propagate_transients(&order, classes, ctx);
    Ok(order)
}

/// Phase one: read-only map from class name to its tracked local ancestor
///
/// None marks a depth-0 root. Classes outside the inheritance model are not
/// present in the map at all.
fn build_tracked_ancestors(
    classes: &IndexMap<String, CppClass>,
    ctx: &TranslationContext,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<IndexMap<String, Option<String>>> {
    let module = ctx.module();
    let mut tracked = IndexMap::new();

    for (class_name, class) in classes {
        let ancestors = &class.ancestors;
        let entry = match ancestors.len() {
            0 => None,
            1 => {
                let upper = ancestors[0].name.as_str();
                if upper == class_name {
                    return Err(WrapError::SelfAncestor(class_name.clone()));
                }
                if module_of(upper) == module {
                    Some(upper.to_string())
                } else {
                    None
                }
            }
            2 => {
                let first = ancestors[0].name.as_str();
                let second = ancestors[1].name.as_str();
                let first_local = module_of(first) == module;
                let second_local = module_of(second) == module;
                match (first_local, second_local) {
                    (true, false) => {
                        if first == class_name {
                            return Err(WrapError::SelfAncestor(class_name.clone()));
                        }
                        Some(first.to_string())
                    }
                    (false, true) => {
                        if second == class_name {
                            return Err(WrapError::SelfAncestor(class_name.clone()));
                        }
                        Some(second.to_string())
                    }
                    _ => {
                        collector.add(
                            Diagnostic::warning(format!(
                                "class {} has two ancestors ({}, {}) outside the \
                                 one-local-base model, treated as a root",
                                class_name, first, second
                            ))
                            .in_module(module),
                        );
                        None
                    }
                }
            }
            n => {
                collector.add(
                    Diagnostic::warning(format!(
                        "class {} has {} ancestors and is skipped",
                        class_name, n
                    ))
                    .in_module(module),
                );
                continue;
            }
        };
        tracked.insert(class_name.clone(), entry);
    }

    Ok(tracked)
}

/// Phase two: hops along tracked links until the chain leaves the map
fn chain_depth(name: &str, tracked: &IndexMap<String, Option<String>>) -> WrapResult<usize> {
    let mut depth = 0;
    let mut cursor = name;
    while let Some(Some(parent)) = tracked.get(cursor) {
        cursor = parent;
        depth += 1;
        if depth > MAX_ANCESTOR_DEPTH {
            return Err(WrapError::AncestorCycle {
                class: name.to_string(),
                depth: MAX_ANCESTOR_DEPTH,
            });
        }
    }
    Ok(depth)
}

/// Forward pass in linearized order: a class with a reference-counted
/// ancestor is itself reference-counted
fn propagate_transients(
    order: &[String],
    classes: &IndexMap<String, CppClass>,
    ctx: &mut TranslationContext,
) {
    for name in order {
        let Some(class) = classes.get(name) else {
            continue;
        };
        if class
            .ancestors
            .iter()
            .any(|a| ctx.run.is_transient(&a.name))
        {
            ctx.run.add_transient(name);
        }
    }
}

/// Module prefix of a class name
fn module_of(class_name: &str) -> &str {
    class_name.split('_').next().unwrap_or(class_name)
}
