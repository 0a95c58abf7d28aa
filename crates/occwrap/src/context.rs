//! Run-wide and per-module translation state
//!
//! The registries accumulate across every module of a run; the per-module
//! scratch state is reset at each module boundary. Keeping the two apart is
//! what makes the module pipeline restartable and the parallel mode sound.

use indexmap::{IndexMap, IndexSet};

/// Modules every generated module implicitly depends on
pub const FOUNDATION_DEPENDENCIES: &[&str] = &["Standard", "NCollection"];

/// Modules whose aggregated headers are always included
pub const FOUNDATION_HEADER_DEPENDENCIES: &[&str] =
    &["TColgp", "TColStd", "TCollection", "Storage"];

/// State that lives for a whole run
///
/// Grow-only registries plus the statistics counters. In parallel mode each
/// worker owns one and the results are merged after the join.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Reference-counted classes; membership drives handle wrapping
    pub transients: IndexSet<String>,
    /// Collection wrapper classes captured from the one-dimensional
    /// array-definition macro, wrapper name → element container type
    pub harray1: IndexMap<String, String>,
    /// Same for the two-dimensional array macro
    pub harray2: IndexMap<String, String>,
    /// Same for the sequence macro
    pub hsequence: IndexMap<String, String>,
    /// Every named enum seen so far
    pub enums: IndexSet<String>,
    /// Enums that appeared as non-const reference output parameters
    pub byref_enums: IndexSet<String>,
    /// Classes translated so far
    pub classes_done: usize,
    /// Methods translated so far
    pub methods_done: usize,
}

impl RunState {
    /// Fresh state; the reference-counted registry starts with the one
    /// class every handle chain bottoms out in.
    pub fn new() -> Self {
        let mut transients = IndexSet::new();
        transients.insert("Standard_Transient".to_string());
        Self {
            transients,
            harray1: IndexMap::new(),
            harray2: IndexMap::new(),
            hsequence: IndexMap::new(),
            enums: IndexSet::new(),
            byref_enums: IndexSet::new(),
            classes_done: 0,
            methods_done: 0,
        }
    }

    /// Is the class reference-counted?
    pub fn is_transient(&self, class_name: &str) -> bool {
        self.transients.contains(class_name)
    }

    /// Register a reference-counted class
    pub fn add_transient(&mut self, class_name: &str) {
        self.transients.insert(class_name.to_string());
    }

    /// Merge a worker's state into this one
    pub fn absorb(&mut self, other: RunState) {
        self.transients.extend(other.transients);
        self.harray1.extend(other.harray1);
        self.harray2.extend(other.harray2);
        self.hsequence.extend(other.hsequence);
        self.enums.extend(other.enums);
        self.byref_enums.extend(other.byref_enums);
        self.classes_done += other.classes_done;
        self.methods_done += other.methods_done;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-module translation state plus the owned run state
///
/// Translators receive this by mutable reference; nothing about the current
/// module survives `reset_for_module` except what was pushed into `run`.
#[derive(Debug)]
pub struct TranslationContext {
    module: String,
    /// Tracked module dependencies, append order, deduplicated
    pub dependencies: Vec<String>,
    /// Additional aggregated-header includes beyond the dependencies
    pub header_dependencies: Vec<String>,
    /// Template instantiations already emitted for this module
    pub seen_templates: IndexSet<String>,
    /// Run-wide registries and counters
    pub run: RunState,
}

impl TranslationContext {
    pub fn new(run: RunState) -> Self {
        Self {
            module: String::new(),
            dependencies: Vec::new(),
            header_dependencies: Vec::new(),
            seen_templates: IndexSet::new(),
            run,
        }
    }

    /// Start a context already positioned on a module
    pub fn for_module(module: &str, run: RunState) -> Self {
        let mut ctx = Self::new(run);
        ctx.reset_for_module(module);
        ctx
    }

    /// The module currently being translated
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Re-seed the per-module state for the next module
    ///
    /// Every module implicitly depends on the foundational modules, except
    /// the foundational modules themselves, which must not import each other
    /// upward or themselves.
    pub fn reset_for_module(&mut self, module: &str) {
        self.module = module.to_string();
        self.dependencies = if module == "Standard" {
            Vec::new()
        } else {
            FOUNDATION_DEPENDENCIES
                .iter()
                .filter(|dep| **dep != module)
                .map(|dep| dep.to_string())
                .collect()
        };
        self.header_dependencies = FOUNDATION_HEADER_DEPENDENCIES
            .iter()
            .filter(|dep| **dep != module)
            .map(|dep| dep.to_string())
            .collect();
        self.seen_templates.clear();
    }

    /// Append a module dependency unless it is the current module, unknown,
    /// or already recorded
    pub fn add_dependency(&mut self, module: &str) {
        if module == self.module {
            return;
        }
        if !crate::modules::is_module(module) {
            return;
        }
        if !self.dependencies.iter().any(|d| d == module) {
            self.dependencies.push(module.to_string());
        }
    }

    /// Hand the run state back, consuming the context
    pub fn into_run(self) -> RunState {
        self.run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_run_state_seed() {
        let run = RunState::new();
        assert!(run.is_transient("Standard_Transient"));
        assert_eq!(run.transients.len(), 1);
    }

    #[test]
    fn test_registry_monotonic() {
        let mut run = RunState::new();
        run.add_transient("Geom_Curve");
        run.add_transient("Geom_Curve");
        assert_eq!(run.transients.len(), 2);
        assert!(run.is_transient("Geom_Curve"));
    }

    #[test]
    fn test_reset_seeds_foundation() {
        let mut ctx = TranslationContext::for_module("Geom", RunState::new());
        assert_eq!(ctx.dependencies, vec!["Standard", "NCollection"]);

        ctx.reset_for_module("Standard");
        assert!(ctx.dependencies.is_empty());

        ctx.reset_for_module("NCollection");
        assert_eq!(ctx.dependencies, vec!["Standard"]);
    }

    #[test]
    fn test_reset_clears_module_state() {
        let mut ctx = TranslationContext::for_module("Geom", RunState::new());
        ctx.add_dependency("gp");
        ctx.seen_templates.insert("TColgp_Array1OfPnt".to_string());
        ctx.run.add_transient("Geom_Curve");

        ctx.reset_for_module("TopoDS");
        assert_eq!(ctx.dependencies, vec!["Standard", "NCollection"]);
        assert!(ctx.seen_templates.is_empty());
        // run-wide state persists across the boundary
        assert!(ctx.run.is_transient("Geom_Curve"));
    }

    #[test]
    fn test_add_dependency_rules() {
        let mut ctx = TranslationContext::for_module("Geom", RunState::new());
        ctx.add_dependency("gp");
        ctx.add_dependency("gp");
        ctx.add_dependency("Geom");
        ctx.add_dependency("NotAModule");
        assert_eq!(ctx.dependencies, vec!["Standard", "NCollection", "gp"]);
    }

    #[test]
    fn test_absorb_merges_registries() {
        let mut main = RunState::new();
        main.add_transient("Geom_Curve");
        main.classes_done = 3;

        let mut worker = RunState::new();
        worker.add_transient("Poly_Triangulation");
        worker.enums.insert("TopAbs_Orientation".to_string());
        worker.classes_done = 2;

        main.absorb(worker);
        assert!(main.is_transient("Geom_Curve"));
        assert!(main.is_transient("Poly_Triangulation"));
        assert!(main.enums.contains("TopAbs_Orientation"));
        assert_eq!(main.classes_done, 5);
    }
}
