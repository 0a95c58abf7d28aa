//! Structure export and coverage reporting
//!
//! Companion operations next to the generator proper: `export_structure`
//! parses the selected modules and serializes their class hierarchy as JSON
//! for downstream tooling, `check_coverage` compares the module tables
//! against the headers an include tree actually provides.

use crate::config::RunConfig;
use crate::context::RunState;
use crate::diagnostics::{DiagnosticsCollector, WrapResult};
use crate::modules::all_modules;
use crate::resolver::resolve_module;
use crate::stats::occt_version;
use indexmap::IndexSet;
use serde::Serialize;
use walkdir::WalkDir;

/// One class in the structure export
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub name: String,
    /// Module the defining header belongs to
    pub module: String,
    /// Base class names as declared, template arguments included
    pub ancestors: Vec<String>,
    pub reference_counted: bool,
}

/// The export document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureExport {
    pub generator_version: String,
    pub occt_version: String,
    pub classes: Vec<ClassRecord>,
}

/// Parse the selected modules and export their class hierarchy
///
/// An empty selection exports every module of every toolkit. Reference
/// counting is resolved only after all modules are parsed, so a class whose
/// base lives in a later module is still flagged.
pub fn export_structure(
    selected: &[String],
    config: &RunConfig,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<StructureExport> {
    let mut names: Vec<String> = if selected.is_empty() {
        all_modules().map(str::to_string).collect()
    } else {
        selected.to_vec()
    };
    names.sort_unstable();

    let mut run = RunState::new();
    let mut records: Vec<ClassRecord> = Vec::new();
    for module in &names {
        let ir = resolve_module(module, config, &mut run, collector)?;
        for (name, class) in &ir.classes {
            records.push(ClassRecord {
                name: name.clone(),
                module: module.clone(),
                ancestors: class.ancestors.iter().map(|a| a.name.clone()).collect(),
                reference_counted: false,
            });
        }
    }

    let flagged = propagate_reference_counting(&records, &run);
    for record in &mut records {
        record.reference_counted = flagged.contains(&record.name);
    }

    Ok(StructureExport {
        generator_version: config.version.clone(),
        occt_version: occt_version(&config.include_dir),
        classes: records,
    })
}

/// Serialize an export document as pretty JSON
pub fn structure_json(export: &StructureExport) -> WrapResult<String> {
    Ok(serde_json::to_string_pretty(export)?)
}

/// Close the reference-counted set over the recorded ancestry
fn propagate_reference_counting(records: &[ClassRecord], run: &RunState) -> IndexSet<String> {
    let mut transients = run.transients.clone();
    loop {
        let mut changed = false;
        for record in records {
            if transients.contains(&record.name) {
                continue;
            }
            if record
                .ancestors
                .iter()
                .any(|ancestor| transients.contains(ancestor))
            {
                transients.insert(record.name.clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    transients
}

/// Outcome of the coverage comparison
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Header name prefixes present under the roots with no table entry
    pub unwrapped: Vec<String>,
    /// Table modules with no header under any root
    pub missing_headers: Vec<String>,
}

impl CoverageReport {
    pub fn is_clean(&self) -> bool {
        self.unwrapped.is_empty() && self.missing_headers.is_empty()
    }
}

/// Compare the module tables against the headers actually present
///
/// A header's module is the part of its base name before the first
/// underscore; `gp.hxx` style headers name their module outright. Packages
/// appear and disappear across library releases, so both directions of the
/// comparison matter.
pub fn check_coverage(config: &RunConfig) -> CoverageReport {
    let mut found: IndexSet<String> = IndexSet::new();
    for root in config.include_roots() {
        for entry in WalkDir::new(root).max_depth(1).into_iter().flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            let Some(stem) = name.strip_suffix(".hxx") else {
                continue;
            };
            let prefix = stem.split('_').next().unwrap_or(stem);
            found.insert(prefix.to_string());
        }
    }

    let known: IndexSet<&str> = all_modules().collect();
    let mut unwrapped: Vec<String> = found
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .cloned()
        .collect();
    unwrapped.sort_unstable();

    let mut missing_headers: Vec<String> = known
        .iter()
        .filter(|module| !found.contains(**module))
        .map(|module| module.to_string())
        .collect();
    missing_headers.sort_unstable();

    CoverageReport {
        unwrapped,
        missing_headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn record(name: &str, ancestors: &[&str]) -> ClassRecord {
        ClassRecord {
            name: name.to_string(),
            module: "Test".to_string(),
            ancestors: ancestors.iter().map(|a| a.to_string()).collect(),
            reference_counted: false,
        }
    }

    fn include_config(dir: &TempDir) -> RunConfig {
        let include = dir.path().join("include");
        fs::create_dir_all(&include).unwrap();
        RunConfig {
            include_dir: include,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_propagation_crosses_records() {
        // B inherits A inherits the root; order in the slice is reversed so
        // the closure needs more than one pass
        let records = vec![
            record("B_Child", &["A_Shape"]),
            record("A_Shape", &["Standard_Transient"]),
            record("C_Free", &[]),
        ];
        let flagged = propagate_reference_counting(&records, &RunState::new());
        assert!(flagged.contains("A_Shape"));
        assert!(flagged.contains("B_Child"));
        assert!(!flagged.contains("C_Free"));
    }

    #[test]
    fn test_export_structure_parses_classes() {
        let dir = tempfile::tempdir().unwrap();
        let config = include_config(&dir);
        fs::write(
            config.include_dir.join("gp_Pnt.hxx"),
            "class gp_Pnt {\npublic:\n  gp_Pnt();\n};\n",
        )
        .unwrap();
        let mut collector = DiagnosticsCollector::new().quiet();
        let export = export_structure(&["gp".to_string()], &config, &mut collector).unwrap();
        assert_eq!(export.classes.len(), 1);
        assert_eq!(export.classes[0].name, "gp_Pnt");
        assert_eq!(export.classes[0].module, "gp");
        assert!(!export.classes[0].reference_counted);

        let json = structure_json(&export).unwrap();
        assert!(json.contains("\"name\": \"gp_Pnt\""));
        assert!(json.contains("\"referenceCounted\": false"));
    }

    #[test]
    fn test_export_flags_handle_classes() {
        let dir = tempfile::tempdir().unwrap();
        let config = include_config(&dir);
        fs::write(
            config.include_dir.join("Geom2d_Curve.hxx"),
            "class Geom2d_Curve {\npublic:\n  Geom2d_Curve();\n};\nDEFINE_STANDARD_HANDLE(Geom2d_Curve, Standard_Transient)\n",
        )
        .unwrap();
        let mut collector = DiagnosticsCollector::new().quiet();
        let export =
            export_structure(&["Geom2d".to_string()], &config, &mut collector).unwrap();
        let curve = export
            .classes
            .iter()
            .find(|c| c.name == "Geom2d_Curve")
            .unwrap();
        assert!(curve.reference_counted);
    }

    #[test]
    fn test_check_coverage_reports_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let config = include_config(&dir);
        fs::write(config.include_dir.join("gp_Pnt.hxx"), "").unwrap();
        fs::write(config.include_dir.join("Weird_Thing.hxx"), "").unwrap();
        fs::write(config.include_dir.join("notes.txt"), "").unwrap();

        let report = check_coverage(&config);
        assert_eq!(report.unwrapped, vec!["Weird".to_string()]);
        assert!(!report.missing_headers.contains(&"gp".to_string()));
        assert!(report.missing_headers.contains(&"Geom".to_string()));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_check_coverage_module_named_header() {
        let dir = tempfile::tempdir().unwrap();
        let config = include_config(&dir);
        fs::write(config.include_dir.join("gp.hxx"), "").unwrap();
        let report = check_coverage(&config);
        assert!(report.unwrapped.is_empty());
        assert!(!report.missing_headers.contains(&"gp".to_string()));
    }
}
