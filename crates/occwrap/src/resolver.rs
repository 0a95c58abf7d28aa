//! Header discovery and module assembly
//!
//! A module's input is every header named `<module>.hxx` or
//! `<module>_*.hxx` under the configured include roots. The surviving
//! headers are preprocessed, parsed, and merged into one module view in
//! deterministic order.
//!
//! Two denylists apply at different stages: headers the parser cannot
//! digest are dropped before parsing but still reach the aggregated
//! module header, and headers that break compilation are dropped from the
//! aggregated header but may still be parsed.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::context::RunState;
use crate::cpp::ModuleIr;
use crate::diagnostics::{DiagnosticsCollector, WrapError, WrapResult};
use crate::modules::is_module;
use crate::parser::parse_header;
use crate::preprocess::adapt_header;

/// Headers never fed to the parser
const PARSE_DENYLIST: &[&str] = &[
    "NCollection_StlIterator.hxx",
    "NCollection_CellFilter.hxx",
    "Standard_CLocaleSentry.hxx",
    "TColStd_PackedMapOfInteger.hxx",
    // missing include upstream
    "Aspect_VKeySet.hxx",
    "TPrsStd_AISPresentation.hxx",
    "TPrsStd_AISViewer.hxx",
    "StepToTopoDS_Tool.hxx",
    "AIS_DataMapOfSelStat.hxx",
    "BVH_IndexedBoxSet.hxx",
    "AIS_Axis.hxx",
    "BRepApprox_SurfaceTool.hxx",
    "BRepBlend_BlendTool.hxx",
    "BRepBlend_HCurveTool.hxx",
    "BRepBlend_HCurve2dTool.hxx",
    "IntWalk_PWalking.hxx",
    "HLRAlgo_PolyHidingData.hxx",
    "HLRAlgo_Array1OfPHDat.hxx",
    // keeps Standard free of a TCollection dependency
    "Standard_Dump.hxx",
    "IMeshData_ParametersListArrayAdaptor.hxx",
    "BRepMesh_CustomBaseMeshAlgo.hxx",
    "BRepMesh_CylinderRangeSplitter.hxx",
    "BRepMesh_DefaultRangeSplitter.hxx",
    "BRepMesh_BoundaryParamsRangeSplitter.hxx",
    "BRepMesh_ConeRangeSplitter.hxx",
    "BRepMesh_NURBSRangeSplitter.hxx",
    "BRepMesh_SphereRangeSplitter.hxx",
    "BRepMesh_TorusRangeSplitter.hxx",
    "BRepMesh_UVParamRangeSplitter.hxx",
];

/// Headers kept out of the aggregated module header
const INCLUDE_DENYLIST: &[&str] = &[
    "AIS_DataMapOfSelStat.hxx",
    "AIS_DataMapIteratorOfDataMapOfSelStat.hxx",
    // missing include upstream
    "NCollection_CellFilter.hxx",
    "Aspect_VKeySet.hxx",
    "TPrsStd_AISPresentation.hxx",
    "Interface_ValueInterpret.hxx",
    "TPrsStd_AISViewer.hxx",
    "StepToTopoDS_Tool.hxx",
    "BVH_IndexedBoxSet.hxx",
    "AIS_Axis.hxx",
    "ChFiKPart_ComputeData_ChPlnPln.hxx",
    "ChFiKPart_ComputeData_ChPlnCyl.hxx",
    "ChFiKPart_ComputeData_ChPlnCon.hxx",
    "BRepApprox_SurfaceTool.hxx",
    "BRepBlend_BlendTool.hxx",
    "BRepBlend_HCurveTool.hxx",
    "BRepBlend_HCurve2dTool.hxx",
    "IntWalk_PWalking.hxx",
    "HLRAlgo_PolyHidingData.hxx",
    "HLRAlgo_Array1OfPHDat.hxx",
    // included directly by the interface prologue instead
    "ShapeUpgrade_UnifySameDomain.hxx",
    "IMeshData_ParametersListArrayAdaptor.hxx",
    "BRepMesh_CustomBaseMeshAlgo.hxx",
    "BRepMesh_CylinderRangeSplitter.hxx",
    "BRepMesh_DefaultRangeSplitter.hxx",
    "BRepMesh_BoundaryParamsRangeSplitter.hxx",
    "BRepMesh_ConeRangeSplitter.hxx",
    "BRepMesh_NURBSRangeSplitter.hxx",
    "BRepMesh_SphereRangeSplitter.hxx",
    "BRepMesh_TorusRangeSplitter.hxx",
    "BRepMesh_UVParamRangeSplitter.hxx",
];

/// Platform-conditional headers, filtered so every platform generates
/// identical interface files
fn platform_conditional(name: &str) -> bool {
    name.to_lowercase().contains("wnt")
        || name.contains("X11")
        || name.contains("XWD")
        || name.contains("Cocoa")
}

/// Collect the headers belonging to a module, primary root first
///
/// Name comparison is byte exact, so the filesystem's case rules never
/// widen the match. Within a root the headers are sorted by name; the bare
/// `<module>.hxx` sorts ahead of every prefixed one.
pub fn module_headers(module: &str, roots: &[&Path]) -> Vec<PathBuf> {
    let exact = format!("{}.hxx", module);
    let prefix = format!("{}_", module);
    let mut headers = Vec::new();
    for root in roots {
        let mut found = Vec::new();
        for entry in WalkDir::new(root).max_depth(1).into_iter().flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != exact && !(name.starts_with(&prefix) && name.ends_with(".hxx")) {
                continue;
            }
            if platform_conditional(&name) {
                continue;
            }
            found.push(entry.into_path());
        }
        found.sort();
        headers.extend(found);
    }
    headers
}

/// Basenames for the aggregated module header, sorted and deduplicated
pub fn include_headers(module: &str, roots: &[&Path]) -> Vec<String> {
    let mut names: Vec<String> = module_headers(module, roots)
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .filter(|name| !INCLUDE_DENYLIST.contains(&name.as_str()))
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Read, preprocess, parse, and merge every header of a module
///
/// Headers are decoded lossily; a few legacy ones carry stray Latin-1
/// bytes in comments. Forwarding alias headers are skipped after
/// preprocessing. A parser that returns no tree aborts the module.
pub fn resolve_module(
    module: &str,
    config: &RunConfig,
    run: &mut RunState,
    collector: &mut DiagnosticsCollector,
) -> WrapResult<ModuleIr> {
    if !is_module(module) {
        return Err(WrapError::UnknownModule(module.to_string()));
    }

    let roots = config.include_roots();
    let headers = module_headers(module, &roots);
    if headers.is_empty() {
        collector.warning(format!("no headers found for module {}", module));
    }

    let mut ir = ModuleIr::default();
    for path in &headers {
        let header_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if PARSE_DENYLIST.contains(&header_name.as_str()) {
            continue;
        }
        let bytes = fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        let adapted = adapt_header(&content, run, collector);
        if adapted.skipped {
            collector.info(format!("skipped forwarding header {}", header_name));
            continue;
        }
        let parsed = parse_header(path, &adapted.text)?;
        ir.merge(&header_name, parsed);
    }
    Ok(ir)
}
