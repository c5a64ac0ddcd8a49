//! Compilation runtime
//!
//! Carries the mode flags a source can toggle and collects diagnostics.

use std::fmt;

use dyescript_parser::SourceLocation;

/// Severity of a reported diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A reported problem, tied to the statement that caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Component that reported it (e.g. "DyeInterpreter")
    pub component: String,
    pub file: String,
    pub location: SourceLocation,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {} ({}:{})",
            self.severity, self.component, self.message, self.file, self.location
        )
    }
}

/// Forwards reports to the `log` facade and keeps them for inspection
#[derive(Debug, Default)]
pub struct Logger {
    diagnostics: Vec<Diagnostic>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: &str, component: &str, file: &str, location: SourceLocation) {
        log::error!("[{}] {} ({}:{})", component, message, file, location);
        self.record(Severity::Error, message, component, file, location);
    }

    pub fn warn(&mut self, message: &str, component: &str, file: &str, location: SourceLocation) {
        log::warn!("[{}] {} ({}:{})", component, message, file, location);
        self.record(Severity::Warning, message, component, file, location);
    }

    fn record(
        &mut self,
        severity: Severity,
        message: &str,
        component: &str,
        file: &str,
        location: SourceLocation,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            message: message.to_string(),
            component: component.to_string(),
            file: file.to_string(),
            location,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// State shared by one compilation: file name, mode flags and logger
#[derive(Debug)]
pub struct Runtime {
    file: String,
    strict: bool,
    dyegest: bool,
    pub logger: Logger,
}

impl Runtime {
    /// Version of the DyeScript language this compiler implements
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            strict: false,
            dyegest: false,
            logger: Logger::new(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Unresolved variable references are reported as warnings
    pub fn enable_strict_mode(&mut self) {
        self.strict = true;
    }

    /// The source asks to be emitted in digested (minified) form
    pub fn enable_dyegest_mode(&mut self) {
        self.dyegest = true;
    }

    /// Report an error against the current file
    pub fn report_error(&mut self, message: &str, component: &str, location: SourceLocation) {
        self.logger.error(message, component, &self.file, location);
    }

    /// Report a warning against the current file
    pub fn report_warning(&mut self, message: &str, component: &str, location: SourceLocation) {
        self.logger.warn(message, component, &self.file, location);
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn is_dyegest(&self) -> bool {
        self.dyegest
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new("<input>")
    }
}
