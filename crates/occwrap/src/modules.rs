//! Static toolkit and module tables
//!
//! The generator only processes modules it knows about. Each toolkit maps to
//! the packages it provides, and per-module rules add dependency hints and
//! exclusion lists for constructs that cannot or must not be wrapped.

use crate::cpp::CppMethod;

/// A toolkit and the modules it provides
#[derive(Debug, Clone, Copy)]
pub struct Toolkit {
    pub name: &'static str,
    /// Coarse grouping used in reports (Foundation, Modeling, ...)
    pub group: &'static str,
    pub modules: &'static [&'static str],
}

/// All toolkits addressed by the generator, grouped the way the upstream
/// library organizes its sources.
pub const TOOLKITS: &[Toolkit] = &[
    Toolkit {
        name: "TKernel",
        group: "Foundation",
        modules: &[
            "FSD",
            "MMgt",
            "Message",
            "NCollection",
            "OSD",
            "Plugin",
            "Quantity",
            "Resource",
            "Standard",
            "StdFail",
            "Storage",
            "TColStd",
            "TCollection",
            "TShort",
            "Units",
            "UnitsAPI",
        ],
    },
    Toolkit {
        name: "TKMath",
        group: "Foundation",
        modules: &[
            "BSplCLib",
            "BSplSLib",
            "BVH",
            "Bnd",
            "CSLib",
            "Convert",
            "ElCLib",
            "ElSLib",
            "Expr",
            "ExprIntrp",
            "GeomAbs",
            "PLib",
            "Poly",
            "Precision",
            "TColgp",
            "TopLoc",
            "gp",
            "math",
        ],
    },
    Toolkit {
        name: "TKG2d",
        group: "Modeling",
        modules: &[
            "Adaptor2d",
            "Geom2d",
            "Geom2dAdaptor",
            "Geom2dEvaluator",
            "Geom2dLProp",
            "LProp",
            "TColGeom2d",
        ],
    },
    Toolkit {
        name: "TKG3d",
        group: "Modeling",
        modules: &[
            "Adaptor3d",
            "Geom",
            "GeomAdaptor",
            "GeomEvaluator",
            "GeomLProp",
            "LProp3d",
            "TColGeom",
            "TopAbs",
        ],
    },
    Toolkit {
        name: "TKGeomBase",
        group: "Modeling",
        modules: &[
            "AppCont",
            "AppDef",
            "AppParCurves",
            "Approx",
            "BndLib",
            "CPnts",
            "Extrema",
            "FEmTool",
            "GC",
            "GCE2d",
            "GCPnts",
            "Geom2dConvert",
            "GeomConvert",
            "GeomLib",
            "GeomProjLib",
            "GeomTools",
            "Hermit",
            "IntAna",
            "IntAna2d",
            "ProjLib",
            "gce",
        ],
    },
    Toolkit {
        name: "TKBRep",
        group: "Modeling",
        modules: &[
            "BRep",
            "BRepAdaptor",
            "BRepLProp",
            "BRepTools",
            "BinTools",
            "TopExp",
            "TopTools",
            "TopoDS",
        ],
    },
    Toolkit {
        name: "TKGeomAlgo",
        group: "Modeling",
        modules: &[
            "AppBlend",
            "ApproxInt",
            "FairCurve",
            "GccAna",
            "GccEnt",
            "GccInt",
            "Geom2dAPI",
            "Geom2dGcc",
            "Geom2dHatch",
            "Geom2dInt",
            "GeomAPI",
            "GeomFill",
            "GeomInt",
            "GeomPlate",
            "Hatch",
            "HatchGen",
            "IntCurve",
            "IntCurveSurface",
            "IntImp",
            "IntImpParGen",
            "IntPatch",
            "IntPolyh",
            "IntRes2d",
            "IntStart",
            "IntSurf",
            "IntWalk",
            "Intf",
            "Law",
            "NLPlate",
            "Plate",
            "TopClass",
            "TopTrans",
        ],
    },
    Toolkit {
        name: "TKTopAlgo",
        group: "Modeling",
        modules: &[
            "BRepApprox",
            "BRepBndLib",
            "BRepBuilderAPI",
            "BRepCheck",
            "BRepClass",
            "BRepClass3d",
            "BRepExtrema",
            "BRepGProp",
            "BRepIntCurveSurface",
            "BRepLib",
            "BRepMAT2d",
            "BRepTopAdaptor",
            "Bisector",
            "IntCurvesFace",
            "MAT",
            "MAT2d",
        ],
    },
    Toolkit {
        name: "TKPrim",
        group: "Modeling",
        modules: &["BRepPrim", "BRepPrimAPI", "BRepSweep", "Sweep"],
    },
    Toolkit {
        name: "TKBO",
        group: "Modeling",
        modules: &["BOPAlgo", "BOPDS", "BOPTools", "BRepAlgoAPI", "IntTools"],
    },
    Toolkit {
        name: "TKBool",
        group: "Modeling",
        modules: &[
            "BRepAlgo",
            "BRepFill",
            "BRepProj",
            "TopOpeBRep",
            "TopOpeBRepBuild",
            "TopOpeBRepDS",
            "TopOpeBRepTool",
        ],
    },
    Toolkit {
        name: "TKFillet",
        group: "Modeling",
        modules: &[
            "Blend",
            "BlendFunc",
            "BRepBlend",
            "BRepFilletAPI",
            "ChFi2d",
            "ChFi3d",
            "ChFiDS",
            "ChFiKPart",
            "FilletSurf",
        ],
    },
    Toolkit {
        name: "TKOffset",
        group: "Modeling",
        modules: &["BRepOffset", "BRepOffsetAPI", "BiTgte", "Draft"],
    },
    Toolkit {
        name: "TKFeat",
        group: "Modeling",
        modules: &["BRepFeat", "LocOpe"],
    },
    Toolkit {
        name: "TKMesh",
        group: "Modeling",
        modules: &["BRepMesh", "IMeshData", "IMeshTools"],
    },
    Toolkit {
        name: "TKShHealing",
        group: "Modeling",
        modules: &[
            "ShapeAlgo",
            "ShapeAnalysis",
            "ShapeBuild",
            "ShapeConstruct",
            "ShapeCustom",
            "ShapeExtend",
            "ShapeFix",
            "ShapeProcess",
            "ShapeProcessAPI",
            "ShapeUpgrade",
        ],
    },
    Toolkit {
        name: "TKHLR",
        group: "Modeling",
        modules: &[
            "Contap",
            "HLRAlgo",
            "HLRAppli",
            "HLRBRep",
            "HLRTopoBRep",
            "Intrv",
            "TopBas",
            "TopCnx",
        ],
    },
    Toolkit {
        name: "TKService",
        group: "Visualisation",
        modules: &["Aspect", "Graphic3d", "Image", "Media", "SelectBasics"],
    },
    Toolkit {
        name: "TKV3d",
        group: "Visualisation",
        modules: &[
            "AIS",
            "DsgPrs",
            "Prs3d",
            "PrsMgr",
            "Select3D",
            "SelectMgr",
            "StdPrs",
            "StdSelect",
            "V3d",
        ],
    },
    Toolkit {
        name: "TKXSBase",
        group: "DataExchange",
        modules: &["IFSelect", "Interface", "Transfer", "TransferBRep", "XSControl"],
    },
    Toolkit {
        name: "TKSTL",
        group: "DataExchange",
        modules: &["RWStl", "StlAPI"],
    },
];

/// Exclusion filter for one member function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFilter {
    /// Exclude every overload of the name; a placeholder stand-in is emitted
    Name(&'static str),
    /// Exclude only the overload with this signature hash; nothing is emitted
    Signature {
        name: &'static str,
        hash: &'static str,
    },
}

/// One excluded member function rule
#[derive(Debug, Clone, Copy)]
pub struct ExcludedMethod {
    pub class: &'static str,
    pub filter: MethodFilter,
}

/// Per-module wrapping rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleRules {
    /// Modules to import beyond the tracked dependencies
    pub extra_dependencies: &'static [&'static str],
    /// Classes to skip entirely; `["*"]` skips every class of the module
    pub excluded_classes: &'static [&'static str],
    /// Member functions to skip
    pub excluded_methods: &'static [ExcludedMethod],
}

const MODULE_RULES: &[(&str, ModuleRules)] = &[
    (
        "Standard",
        ModuleRules {
            extra_dependencies: &[],
            excluded_classes: &["Standard_ErrorHandler", "Standard_Mutex", "Standard_Condition"],
            excluded_methods: &[ExcludedMethod {
                class: "Standard_MMgrRoot",
                filter: MethodFilter::Name("Purge"),
            }],
        },
    ),
    (
        "NCollection",
        ModuleRules {
            extra_dependencies: &[],
            excluded_classes: &["NCollection_AccAllocator", "NCollection_WinHeapAllocator"],
            excluded_methods: &[],
        },
    ),
    (
        "OSD",
        ModuleRules {
            extra_dependencies: &[],
            excluded_classes: &["OSD_Signal", "OSD_Thread", "OSD_ThreadPool"],
            excluded_methods: &[],
        },
    ),
    (
        "TCollection",
        ModuleRules {
            extra_dependencies: &[],
            excluded_classes: &[],
            excluded_methods: &[ExcludedMethod {
                class: "TCollection_AsciiString",
                filter: MethodFilter::Name("Print"),
            }],
        },
    ),
    (
        "BRepTools",
        ModuleRules {
            extra_dependencies: &["Message"],
            excluded_classes: &[],
            excluded_methods: &[],
        },
    ),
    (
        "BOPAlgo",
        ModuleRules {
            extra_dependencies: &["Message"],
            excluded_classes: &[],
            excluded_methods: &[],
        },
    ),
    (
        "BRepMesh",
        ModuleRules {
            extra_dependencies: &["Message"],
            excluded_classes: &[],
            excluded_methods: &[],
        },
    ),
    (
        "ShapeProcess",
        ModuleRules {
            extra_dependencies: &["Message"],
            excluded_classes: &[],
            excluded_methods: &[],
        },
    ),
    (
        "Graphic3d",
        ModuleRules {
            extra_dependencies: &["Image"],
            excluded_classes: &["Graphic3d_CLight", "Graphic3d_CView"],
            excluded_methods: &[],
        },
    ),
    (
        "AIS",
        ModuleRules {
            extra_dependencies: &["Aspect"],
            excluded_classes: &[],
            excluded_methods: &[ExcludedMethod {
                class: "AIS_InteractiveContext",
                filter: MethodFilter::Name("SetCurrentObject"),
            }],
        },
    ),
    (
        "V3d",
        ModuleRules {
            extra_dependencies: &["Aspect"],
            excluded_classes: &[],
            excluded_methods: &[],
        },
    ),
];

/// Is the name a module the generator knows about?
pub fn is_module(name: &str) -> bool {
    TOOLKITS.iter().any(|tk| tk.modules.contains(&name))
}

/// Look up a toolkit by name
pub fn toolkit(name: &str) -> Option<&'static Toolkit> {
    TOOLKITS.iter().find(|tk| tk.name == name)
}

/// The toolkit providing a module
pub fn module_toolkit(module: &str) -> Option<&'static Toolkit> {
    TOOLKITS.iter().find(|tk| tk.modules.contains(&module))
}

/// Every module of every toolkit, in table order
pub fn all_modules() -> impl Iterator<Item = &'static str> {
    TOOLKITS.iter().flat_map(|tk| tk.modules.iter().copied())
}

/// Module names that carry explicit rules, for the startup self-check
pub fn ruled_modules() -> impl Iterator<Item = &'static str> {
    MODULE_RULES.iter().map(|(name, _)| *name)
}

/// Wrapping rules for a module; empty rules when none are registered
pub fn rules_for(module: &str) -> ModuleRules {
    MODULE_RULES
        .iter()
        .find(|(name, _)| *name == module)
        .map(|(_, rules)| *rules)
        .unwrap_or_default()
}

/// How an excluded method should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Emit a stand-in stub so the attribute still exists
    Placeholder,
    /// Emit nothing
    Silent,
}

/// Check a method of a class against the module's exclusion rules
pub fn method_exclusion(
    rules: &ModuleRules,
    class_name: &str,
    method: &CppMethod,
) -> Option<Exclusion> {
    for rule in rules.excluded_methods {
        if rule.class != class_name {
            continue;
        }
        match rule.filter {
            MethodFilter::Name(name) if name == method.name => {
                return Some(Exclusion::Placeholder);
            }
            MethodFilter::Signature { name, hash }
                if name == method.name && hash == signature_hash(method) =>
            {
                return Some(Exclusion::Silent);
            }
            _ => {}
        }
    }
    None
}

/// Stable 8-hex-digit fingerprint of a method signature
///
/// Name plus the comma-joined raw parameter types, FNV-1a folded to 32 bits.
/// Used so a single overload can be excluded without touching its siblings.
pub fn signature_hash(method: &CppMethod) -> String {
    let mut text = method.name.clone();
    text.push('(');
    for (i, param) in method.params.iter().enumerate() {
        if i > 0 {
            text.push(',');
        }
        text.push_str(param.type_text.trim());
    }
    text.push(')');

    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("{:08x}", (hash >> 32) as u32 ^ hash as u32)
}

/// Classes belonging to the legacy persistence layer are never handle-wrapped
pub fn is_persistent_class(class_name: &str) -> bool {
    const PERSISTENT_PREFIXES: &[&str] = &[
        "PFunction",
        "PDataStd",
        "PPrsStd",
        "PDF",
        "PDocStd",
        "PDataXtd",
        "PNaming",
        "PCDM_Document",
    ];
    PERSISTENT_PREFIXES
        .iter()
        .any(|prefix| class_name.starts_with(prefix))
}

/// The docstring attached to a generated module
///
/// Package documentation moved out of the headers in release 7, so the
/// docstring points at the official reference manual instead.
pub fn module_docstring(module: &str) -> String {
    format!(
        "{} module, see official documentation at\nhttps://www.opencascade.com/doc/occt-7.4.0/refman/html/package_{}.html",
        module,
        module.to_lowercase()
    )
}
