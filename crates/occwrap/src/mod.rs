//! occwrap: SWIG interface and Python type-hint generator for OCCT headers
//!
//! This crate reads the C++ headers of an OCCT-style geometry library and
//! emits, per module, a SWIG interface file (`<module>.i`), a Python type
//! stub (`<module>.pyi`) and an aggregated include header
//! (`<module>_module.hxx`):
//! - Preprocessing normalizes the macro-heavy header dialect into something
//!   a grammar-based parser digests, capturing handle and collection macro
//!   declarations on the way
//! - Parsing is delegated to tree-sitter-cpp and distilled into a small
//!   construct model (classes, methods, enums, typedefs)
//! - Translators order class hierarchies, track cross-module dependencies
//!   and render every construct in interface-file form with a parallel
//!   type hint
//! - The assembler lays the fragments out in fixed section order behind the
//!   module prologue
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ OCCT headers │──▶│  preprocess  │──▶│ tree-sitter  │
//! │  (resolver)  │   │  macro scan  │   │ parse (cpp)  │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!         ┌────────────────────────────────────┘
//!         ▼
//! ┌──────────────────┐   ┌────────────────────┐   ┌─────────────────────┐
//! │ hierarchy + deps │──▶│    translators     │──▶│      assemble       │
//! │ linearize, track │   │ enums, typedefs,   │   │ <module>.i / .pyi   │
//! └──────────────────┘   │ classes, functions │   │ <module>_module.hxx │
//!                        └────────────────────┘   └─────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use occwrap::config::RunConfig;
//! use occwrap::diagnostics::DiagnosticsCollector;
//! use occwrap::generator::generate_all;
//! use std::path::Path;
//!
//! let config = RunConfig::load(Path::new("occwrap.toml")).unwrap();
//! let mut collector = DiagnosticsCollector::with_log_file(&config.log_path()).unwrap();
//! generate_all(&config, &mut collector).unwrap();
//! ```

// Model and state
pub mod config;
pub mod context;
pub mod cpp;
pub mod diagnostics;
pub mod fragments;
pub mod modules;

// Header intake
pub mod parser;
pub mod preprocess;
pub mod resolver;

// Translation
pub mod classes;
pub mod collections;
pub mod deps;
pub mod enums;
pub mod functions;
pub mod handles;
pub mod hierarchy;
pub mod hints;
pub mod params;
pub mod shims;
pub mod typedefs;

// Emission and orchestration
pub mod assemble;
pub mod export;
pub mod generator;
pub mod stats;

// Re-exports for convenience
pub use config::RunConfig;
pub use context::{RunState, TranslationContext};
pub use cpp::{
    Access, CppAncestor, CppClass, CppEnum, CppEnumEntry, CppMethod, CppParam, CppProperty,
    ModuleIr, ParsedHeader,
};
pub use diagnostics::{
    Diagnostic, DiagnosticSeverity, DiagnosticsCollector, WrapError, WrapResult,
};
pub use fragments::{Fragment, FragmentSet, Section};

// Run entry points
pub use generator::{
    generate_all, generate_modules, generate_toolkits, self_check, wrap_all_toolkits,
    wrap_module, wrap_toolkit,
};

// Companion operations
pub use export::{check_coverage, export_structure, structure_json, CoverageReport, StructureExport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
