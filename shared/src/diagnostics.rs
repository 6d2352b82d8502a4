use log::{error, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Where the weaver reports problems. Errors abort the current procedure or type,
/// warnings never do.
pub trait DiagnosticsSink {
    fn log_error(&mut self, message: &str);
    fn log_warning(&mut self, message: &str);
}

/// Collects diagnostics for the build driver and mirrors them to the `log` facade.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|entry| entry.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|entry| entry.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

impl DiagnosticsSink for Diagnostics {
    fn log_error(&mut self, message: &str) {
        error!("{}", message);
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            message: message.to_string(),
        });
    }

    fn log_warning(&mut self, message: &str) {
        warn!("{}", message);
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            message: message.to_string(),
        });
    }
}
