//! Run orchestration
//!
//! Drives one module at a time through the fixed pipeline: resolve headers,
//! translate constructs, assemble, write. Modules run in sorted order within
//! a toolkit and toolkits in sorted order across a run. The optional
//! parallel mode fans toolkits out over rayon workers that share no state;
//! their registries and diagnostics are merged after the join, and the
//! first failing toolkit in sorted order decides the run's outcome.

use crate::assemble::{assemble_module, write_if_changed};
use crate::classes::translate_classes;
use crate::collections::collection_wrappers;
use crate::config::RunConfig;
use crate::context::{RunState, TranslationContext};
use crate::diagnostics::{DiagnosticsCollector, WrapError, WrapResult};
use crate::enums::{byref_enum_templates, translate_enums};
use crate::fragments::FragmentSet;
use crate::functions::translate_free_functions;
use crate::handles::translate_handles;
use crate::hierarchy::linearize;
use crate::modules::{self, rules_for, TOOLKITS};
use crate::preprocess::scan_macros;
use crate::resolver::{include_headers, resolve_module};
use crate::stats;
use crate::typedefs::translate_typedefs;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::time::Instant;

/// Run-wide by-reference enum typemap file, regenerated in full each run
const ENUM_TEMPLATES_FILE: &str = "EnumTemplates.i";

/// Version manifest written next to the generated interface files
const VERSION_MANIFEST_FILE: &str = "__init__.py";

/// Table sanity checks, run before anything else
///
/// Cheap enough to repeat on every invocation. A module claimed by two
/// toolkits or a rule naming a module outside the tables would quietly
/// corrupt dependency tracking, so both abort the run up front.
pub fn self_check() -> WrapResult<()> {
    let mut owners: IndexMap<&str, &str> = IndexMap::new();
    for toolkit in TOOLKITS {
        for module in toolkit.modules {
            if let Some(first) = owners.insert(module, toolkit.name) {
                return Err(WrapError::selfcheck(format!(
                    "module {} listed in both {} and {}",
                    module, first, toolkit.name
                )));
            }
        }
    }
    for module in modules::ruled_modules() {
        if !modules::is_module(module) {
            return Err(WrapError::selfcheck(format!(
                "rules registered for unknown module {}",
                module
            )));
        }
    }
    let probe = scan_macros("DEFINE_STANDARD_HANDLE(Geom_Line, Geom_Curve)");
    if probe.is_empty() {
        return Err(WrapError::selfcheck(
            "macro rule table does not match its own probe",
        ));
    }
    Ok(())
}

/// Translate one module and write its three output files
///
/// The context is re-seeded for the module; everything learned run-wide
/// (reference counting, collection wrappers, enum names) stays in `ctx.run`
/// for the modules that follow.
pub fn wrap_module(
    module: &str,
    config: &RunConfig,
    ctx: &mut TranslationContext,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<()> {
    collector.info(format!("## Processing module {}", module));
    ctx.reset_for_module(module);
    let rules = rules_for(module);
    let ir = resolve_module(module, config, &mut ctx.run, collector)?;

    let mut fragments = FragmentSet::new();
    fragments.push(translate_enums(ctx, &ir.enums));
    let order = linearize(&ir.classes, ctx, collector)?;
    fragments.push(translate_handles(ctx, &order, rules.excluded_classes));
    fragments.extend(translate_typedefs(ctx, collector, &ir.typedefs));
    fragments.push(translate_classes(ctx, collector, &ir.classes, &order, &rules));
    fragments.push(collection_wrappers(ctx));
    // free functions run through the translator for the counters and
    // diagnostics; the assembler never writes them
    let _ = translate_free_functions(ctx, &ir.free_functions);

    let includes = include_headers(module, &config.include_roots());
    let output = assemble_module(ctx, &fragments, &includes, rules.extra_dependencies);

    write_if_changed(
        &config.interface_output_dir.join(format!("{}.i", module)),
        &output.interface,
    )?;
    write_if_changed(
        &config.hints_dir().join(format!("{}.pyi", module)),
        &output.hints,
    )?;
    write_if_changed(
        &config
            .header_output_dir
            .join(format!("{}_module.hxx", module)),
        &output.aggregated_header,
    )?;
    Ok(())
}

/// Translate every module of one toolkit, in sorted order
pub fn wrap_toolkit(
    toolkit_name: &str,
    config: &RunConfig,
    ctx: &mut TranslationContext,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<()> {
    let toolkit = modules::toolkit(toolkit_name)
        .ok_or_else(|| WrapError::UnknownToolkit(toolkit_name.to_string()))?;
    collector.info(format!("Processing toolkit {}", toolkit_name));
    let mut names: Vec<&str> = toolkit.modules.to_vec();
    names.sort_unstable();
    for module in names {
        wrap_module(module, config, ctx, collector)?;
    }
    Ok(())
}

/// Translate the selected toolkits, sequentially or fanned out
///
/// In parallel mode each worker owns a fresh `RunState`; cross-module
/// knowledge accumulates within a toolkit but not across workers. All
/// workers are awaited before any failure is reported, so one bad toolkit
/// cannot swallow the diagnostics of the others.
pub fn wrap_all_toolkits(
    config: &RunConfig,
    run: RunState,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<RunState> {
    let mut selected: Vec<&str> = if config.toolkits.is_empty() {
        TOOLKITS.iter().map(|tk| tk.name).collect()
    } else {
        config.toolkits.iter().map(String::as_str).collect()
    };
    selected.sort_unstable();

    if config.parallel {
        collector.info("Multiprocess mode");
        let results: Vec<(WrapResult<RunState>, DiagnosticsCollector)> = selected
            .par_iter()
            .map(|toolkit| {
                let mut ctx = TranslationContext::new(RunState::new());
                let mut worker = DiagnosticsCollector::new();
                let outcome = match wrap_toolkit(toolkit, config, &mut ctx, &mut worker) {
                    Ok(()) => Ok(ctx.into_run()),
                    Err(err) => Err(err),
                };
                (outcome, worker)
            })
            .collect();

        let mut merged = run;
        let mut first_failure = None;
        for (outcome, worker) in results {
            collector.absorb(worker);
            match outcome {
                Ok(worker_run) => merged.absorb(worker_run),
                Err(err) => {
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(merged),
        }
    } else {
        collector.info("Single process mode");
        let mut ctx = TranslationContext::new(run);
        for toolkit in selected {
            wrap_toolkit(toolkit, config, &mut ctx, collector)?;
        }
        Ok(ctx.into_run())
    }
}

/// A complete generation run
///
/// Self-check, opening banner, every selected toolkit, the run-wide
/// support files, closing banner.
pub fn generate_all(
    config: &RunConfig,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<RunState> {
    self_check()?;
    config.validate(collector)?;
    collector.plain(&stats::log_header(config));
    let started = Instant::now();
    let run = wrap_all_toolkits(config, RunState::new(), collector)?;
    write_run_files(config, &run)?;
    collector.plain(&stats::log_footer(started.elapsed().as_secs_f64(), &run));
    Ok(run)
}

/// Generate a hand-picked list of modules, outside the toolkit loop
///
/// The run-wide support files are left alone: a partial run must not
/// shrink the by-reference enum registry accumulated by a full one.
pub fn generate_modules(
    selected: &[String],
    config: &RunConfig,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<RunState> {
    self_check()?;
    config.validate(collector)?;
    collector.plain(&stats::log_header(config));
    let started = Instant::now();
    let mut ctx = TranslationContext::new(RunState::new());
    for module in selected {
        wrap_module(module, config, &mut ctx, collector)?;
    }
    let run = ctx.into_run();
    collector.plain(&stats::log_footer(started.elapsed().as_secs_f64(), &run));
    Ok(run)
}

/// Generate selected toolkits only
///
/// Scopes the run to the given toolkit names; like `generate_modules`,
/// the run-wide support files stay untouched.
pub fn generate_toolkits(
    selected: &[String],
    config: &RunConfig,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<RunState> {
    self_check()?;
    let mut scoped = config.clone();
    scoped.toolkits = selected.to_vec();
    scoped.validate(collector)?;
    collector.plain(&stats::log_header(&scoped));
    let started = Instant::now();
    let run = wrap_all_toolkits(&scoped, RunState::new(), collector)?;
    collector.plain(&stats::log_footer(started.elapsed().as_secs_f64(), &run));
    Ok(run)
}

/// The files owned by the run rather than any module
fn write_run_files(config: &RunConfig, run: &RunState) -> WrapResult<()> {
    write_if_changed(
        &config.common_output_dir.join(ENUM_TEMPLATES_FILE),
        &byref_enum_templates(run),
    )?;
    let manifest = stats::version_manifest(config, &stats::occt_version(&config.include_dir));
    write_if_changed(
        &config.interface_output_dir.join(VERSION_MANIFEST_FILE),
        &manifest,
    )?;
    Ok(())
}
