//! Generator configuration
//!
//! Loaded from a TOML file before a run. Paths are validated up front so a
//! misconfigured run fails before any header is touched.

use crate::diagnostics::{DiagnosticsCollector, WrapError, WrapResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Version stamp written into the log header and the version manifest
    pub version: String,
    /// Primary header root; missing is fatal
    pub include_dir: PathBuf,
    /// Optional secondary header root; missing only raises a warning
    pub extra_include_dir: Option<PathBuf>,
    /// Where interface files and the run log land
    pub interface_output_dir: PathBuf,
    /// Where type-hint files land; defaults to the interface directory
    pub hints_output_dir: Option<PathBuf>,
    /// Where aggregated module headers land
    pub header_output_dir: PathBuf,
    /// Where the run-wide support files land
    pub common_output_dir: PathBuf,
    /// Toolkits to process; empty means all of them
    pub toolkits: Vec<String>,
    /// Fan toolkits out over worker threads
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            include_dir: PathBuf::from("include"),
            extra_include_dir: None,
            interface_output_dir: PathBuf::from("generated/wrapper"),
            hints_output_dir: None,
            header_output_dir: PathBuf::from("generated/headers"),
            common_output_dir: PathBuf::from("generated/common"),
            toolkits: Vec::new(),
            parallel: false,
        }
    }
}

impl RunConfig {
    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> WrapResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            WrapError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> WrapResult<Self> {
        toml::from_str(text).map_err(|e| WrapError::config(e.to_string()))
    }

    /// Where type hints are written
    pub fn hints_dir(&self) -> &Path {
        self.hints_output_dir
            .as_deref()
            .unwrap_or(&self.interface_output_dir)
    }

    /// The run log file path
    pub fn log_path(&self) -> PathBuf {
        self.interface_output_dir.join("generator.log")
    }

    /// All configured include roots that exist, primary first
    pub fn include_roots(&self) -> Vec<&Path> {
        let mut roots = vec![self.include_dir.as_path()];
        if let Some(ref extra) = self.extra_include_dir {
            if extra.is_dir() {
                roots.push(extra.as_path());
            }
        }
        roots
    }

    /// Check paths and create output directories
    ///
    /// The primary include root must exist. A configured but absent secondary
    /// root is reported and ignored, matching the optional add-on layout.
    pub fn validate(&self, collector: &mut DiagnosticsCollector) -> WrapResult<()> {
        if !self.include_dir.is_dir() {
            return Err(WrapError::config(format!(
                "include dir {} not found",
                self.include_dir.display()
            )));
        }
        if let Some(ref extra) = self.extra_include_dir {
            if !extra.is_dir() {
                collector.warning(format!(
                    "extra include dir {} not found, add-on modules skipped",
                    extra.display()
                ));
            }
        }
        for toolkit in &self.toolkits {
            if crate::modules::toolkit(toolkit).is_none() {
                return Err(WrapError::UnknownToolkit(toolkit.clone()));
            }
        }
        fs::create_dir_all(&self.interface_output_dir)?;
        fs::create_dir_all(self.hints_dir())?;
        fs::create_dir_all(&self.header_output_dir)?;
        fs::create_dir_all(&self.common_output_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.hints_dir(), Path::new("generated/wrapper"));
        assert!(!config.parallel);
        assert!(config.toolkits.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = RunConfig::from_toml(
            r#"
            version = "7.4.0"
            include_dir = "/opt/occt/include"
            interface_output_dir = "out/wrapper"
            header_output_dir = "out/headers"
            common_output_dir = "out/common"
            toolkits = ["TKernel", "TKMath"]
            parallel = true
            "#,
        )
        .unwrap();
        assert_eq!(config.version, "7.4.0");
        assert_eq!(config.include_dir, PathBuf::from("/opt/occt/include"));
        assert_eq!(config.toolkits, vec!["TKernel", "TKMath"]);
        assert!(config.parallel);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = RunConfig::from_toml("include_dir = [").unwrap_err();
        assert!(matches!(err, WrapError::Config(_)));
    }

    #[test]
    fn test_validate_missing_include_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            include_dir: dir.path().join("no_such_dir"),
            ..RunConfig::default()
        };
        let mut collector = DiagnosticsCollector::new().quiet();
        assert!(config.validate(&mut collector).is_err());
    }

    #[test]
    fn test_validate_creates_output_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            include_dir: dir.path().to_path_buf(),
            interface_output_dir: dir.path().join("out/wrapper"),
            hints_output_dir: None,
            header_output_dir: dir.path().join("out/headers"),
            common_output_dir: dir.path().join("out/common"),
            ..RunConfig::default()
        };
        let mut collector = DiagnosticsCollector::new().quiet();
        config.validate(&mut collector).unwrap();
        assert!(dir.path().join("out/wrapper").is_dir());
        assert!(dir.path().join("out/headers").is_dir());
    }

    #[test]
    fn test_validate_unknown_toolkit() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            include_dir: dir.path().to_path_buf(),
            toolkits: vec!["TKNope".to_string()],
            ..RunConfig::default()
        };
        let mut collector = DiagnosticsCollector::new().quiet();
        let err = config.validate(&mut collector).unwrap_err();
        assert!(matches!(err, WrapError::UnknownToolkit(_)));
    }
}
