//! Error types and diagnostics
//!
//! This module provides error handling and diagnostic reporting
//! for the wrapper generator.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use thiserror::Error;

/// Result type for occwrap operations
pub type WrapResult<T> = Result<T, WrapError>;

/// Main error type for occwrap
#[derive(Debug, Error)]
pub enum WrapError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The C++ parser produced no syntax tree for a header
    #[error("fatal parse failure in {file}")]
    FatalParse {
        file: PathBuf,
        /// Full preprocessed header content, printed by the CLI so the
        /// offending input can be inspected without re-running.
        content: String,
    },

    /// A module name that is not present in the toolkit tables
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// A toolkit name that is not present in the toolkit tables
    #[error("unknown toolkit: {0}")]
    UnknownToolkit(String),

    /// Ancestor chain exceeded the depth cap (an inheritance cycle)
    #[error("ancestor cycle detected at {class}: depth exceeded {depth}")]
    AncestorCycle { class: String, depth: usize },

    /// A class naming itself as its own ancestor
    #[error("class {0} lists itself as an ancestor")]
    SelfAncestor(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Startup self-check failure
    #[error("self-check failed: {0}")]
    Selfcheck(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl WrapError {
    /// Create a fatal parse error carrying the adapted header text
    pub fn fatal_parse(file: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        WrapError::FatalParse {
            file: file.into(),
            content: content.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        WrapError::Config(message.into())
    }

    /// Create a self-check error
    pub fn selfcheck(message: impl Into<String>) -> Self {
        WrapError::Selfcheck(message.into())
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        WrapError::Other(message.into())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Error - aborts the run
    Error,
    /// Warning - the construct is dropped, the run continues
    Warning,
    /// Info - informational message
    Info,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }

    /// Console color for the severity tag
    pub fn color(&self) -> Color {
        match self {
            DiagnosticSeverity::Error => Color::Red,
            DiagnosticSeverity::Warning => Color::Yellow,
            DiagnosticSeverity::Info => Color::Blue,
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Source header file
    pub file: Option<PathBuf>,
    /// Module being processed when the diagnostic was raised
    pub module: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            module: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    /// Set the source file
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the module context
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = String::new();

        if let Some(ref module) = self.module {
            result.push('[');
            result.push_str(module);
            result.push_str("] ");
        }

        if let Some(ref file) = self.file {
            result.push_str(&file.display().to_string());
            result.push_str(": ");
        }

        result.push_str(self.severity.display());
        result.push_str(": ");
        result.push_str(&self.message);

        result
    }

    /// Write with colors to a WriteColor implementor
    pub fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        if let Some(ref module) = self.module {
            w.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(w, "[{}]", module)?;
            w.reset()?;
            write!(w, " ")?;
        }

        if let Some(ref file) = self.file {
            w.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(w, "{}", file.display())?;
            w.reset()?;
            write!(w, ": ")?;
        }

        w.set_color(ColorSpec::new().set_fg(Some(self.severity.color())))?;
        write!(w, "{}", self.severity.display())?;
        w.reset()?;
        writeln!(w, ": {}", self.message)
    }
}

/// Collector for diagnostics during a generation run
///
/// Every diagnostic is kept in memory for inspection, echoed to stderr
/// with colors, and mirrored plain into the run log file when one is open.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
    log_file: Option<File>,
    quiet: bool,
}

impl DiagnosticsCollector {
    /// Create a new collector without a log file
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector mirroring messages into a log file
    pub fn with_log_file(path: &Path) -> WrapResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            diagnostics: Vec::new(),
            log_file: Some(file),
            quiet: false,
        })
    }

    /// Suppress console echo (tests, parallel workers)
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Add a diagnostic, echoing it to both sinks
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if !self.quiet {
            let mut stderr = StandardStream::stderr(ColorChoice::Auto);
            let _ = diagnostic.write_colored(&mut stderr);
        }
        if let Some(ref mut file) = self.log_file {
            let _ = writeln!(file, "{}", diagnostic.format());
        }
        self.diagnostics.push(diagnostic);
    }

    /// Add an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::error(message));
    }

    /// Add a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::warning(message));
    }

    /// Add an info message
    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::info(message));
    }

    /// Write a plain text line to both sinks, bypassing severity formatting
    ///
    /// Used for the run header and footer blocks.
    pub fn plain(&mut self, text: &str) {
        if !self.quiet {
            eprintln!("{}", text);
        }
        if let Some(ref mut file) = self.log_file {
            let _ = writeln!(file, "{}", text);
        }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .count()
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Fold another collector's diagnostics into this one
    ///
    /// Used when parallel toolkit workers hand their records back.
    pub fn absorb(&mut self, other: DiagnosticsCollector) {
        for diagnostic in other.diagnostics {
            if let Some(ref mut file) = self.log_file {
                let _ = writeln!(file, "{}", diagnostic.format());
            }
            self.diagnostics.push(diagnostic);
        }
    }
}
