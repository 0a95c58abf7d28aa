//! Run bookkeeping
//!
//! The banner blocks that bracket the run log, the environment probes they
//! report, and the version manifest dropped next to the generated sources.
//! Everything here degrades to `"unknown"` instead of failing: a missing
//! version header or a checkout without git must never abort a run.

use crate::config::RunConfig;
use crate::context::RunState;
use chrono::Local;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Title line of the opening banner
const RUN_BANNER: &str = "Running the occwrap generator.";

/// Rule width of the closing banner
const FOOTER_RULE_WIDTH: usize = 49;

/// Banner logged before any toolkit is touched
///
/// Records what is needed to reproduce the run afterwards: generator
/// version and git revision, host platform, the targeted library version
/// and a timestamp.
pub fn log_header(config: &RunConfig) -> String {
    let rule = "#".repeat(RUN_BANNER.len());
    format!(
        "\n{rule}\n{RUN_BANNER}\n{rule}\n\
         generator version : {}\n\
         git revision : {}\n\n\
         operating system : {}\n\n\
         occt version targeted : {}\n\n\
         date : {}\n{rule}\n",
        config.version,
        git_revision(),
        host_platform(),
        occt_version(&config.include_dir),
        Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
    )
}

/// Banner logged once the run is over
pub fn log_footer(elapsed_secs: f64, run: &RunState) -> String {
    let rule = "#".repeat(FOOTER_RULE_WIDTH);
    format!(
        "\n{rule}\n\
         SWIG interface file generation completed in {:.2}s\n\
         {} classes and {} methods wrapped\n{rule}\n",
        elapsed_secs, run.classes_done, run.methods_done,
    )
}

/// The targeted library version, read from `Standard_Version.hxx`
///
/// The version header carries a line of the form
/// `#define OCC_VERSION_COMPLETE     "7.4.0"`.
pub fn occt_version(include_dir: &Path) -> String {
    let header = include_dir.join("Standard_Version.hxx");
    let text = match fs::read_to_string(&header) {
        Ok(text) => text,
        Err(_) => return "unknown".to_string(),
    };
    for line in text.lines() {
        if line.starts_with("#define OCC_VERSION_COMPLETE") {
            if let Some(version) = line.split('"').nth(1) {
                return version.trim().to_string();
            }
        }
    }
    "unknown".to_string()
}

/// Short git revision of the generator checkout
pub fn git_revision() -> String {
    match Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).trim().to_string(),
        _ => "unknown".to_string(),
    }
}

fn host_platform() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Content of the version manifest written next to the generated sources
pub fn version_manifest(config: &RunConfig, occt_version: &str) -> String {
    format!(
        "VERSION = \"{}\"\nOCCT_VERSION = \"{}\"\n",
        config.version, occt_version
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn version_fixture(complete: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Standard_Version.hxx"),
            format!(
                "#define OCC_VERSION_MAJOR 7\n\
                 #define OCC_VERSION_MINOR 4\n\
                 #define OCC_VERSION_COMPLETE     \"{}\"\n",
                complete
            ),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_occt_version_parses_define() {
        let dir = version_fixture("7.4.0");
        assert_eq!(occt_version(dir.path()), "7.4.0");
    }

    #[test]
    fn test_occt_version_missing_header() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(occt_version(dir.path()), "unknown");
    }

    #[test]
    fn test_occt_version_missing_define() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Standard_Version.hxx"),
            "#define OCC_VERSION_MAJOR 7\n",
        )
        .unwrap();
        assert_eq!(occt_version(dir.path()), "unknown");
    }

    #[test]
    fn test_log_header_reports_versions() {
        let dir = version_fixture("7.4.0");
        let config = RunConfig {
            version: "1.2.3".to_string(),
            include_dir: dir.path().to_path_buf(),
            ..RunConfig::default()
        };
        let header = log_header(&config);
        let rule = "#".repeat(RUN_BANNER.len());
        assert!(header.starts_with(&format!("\n{rule}\n{RUN_BANNER}\n{rule}\n")));
        assert!(header.contains("generator version : 1.2.3\n"));
        assert!(header.contains("occt version targeted : 7.4.0\n"));
        assert!(header.contains("git revision : "));
        assert!(header.ends_with(&format!("{rule}\n")));
    }

    #[test]
    fn test_log_footer_format() {
        let mut run = RunState::new();
        run.classes_done = 12;
        run.methods_done = 340;
        assert_eq!(
            log_footer(3.14159, &run),
            "\n\
             #################################################\n\
             SWIG interface file generation completed in 3.14s\n\
             12 classes and 340 methods wrapped\n\
             #################################################\n"
        );
    }

    #[test]
    fn test_git_revision_never_empty() {
        assert!(!git_revision().is_empty());
    }

    #[test]
    fn test_version_manifest() {
        let config = RunConfig {
            version: "7.4.0".to_string(),
            ..RunConfig::default()
        };
        assert_eq!(
            version_manifest(&config, "7.4.0"),
            "VERSION = \"7.4.0\"\nOCCT_VERSION = \"7.4.0\"\n"
        );
    }
}
