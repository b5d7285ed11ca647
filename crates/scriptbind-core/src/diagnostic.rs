//! Diagnostics reported for units that degraded during generation.

use std::fmt;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Generation continued with reduced output (placeholder, dropped base, ...).
    Warning,
    /// A unit could not be generated at all.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A problem scoped to one class member (or to the class itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub class: String,
    /// Member name, or empty for class-level diagnostics.
    pub unit: String,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(
        class: impl Into<String>,
        unit: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            class: class.into(),
            unit: unit.into(),
            message: message.into(),
        }
    }

    pub fn error(
        class: impl Into<String>,
        unit: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            class: class.into(),
            unit: unit.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}: {}: {}", self.severity, self.class, self.message)
        } else {
            write!(
                f,
                "{}: {}::{}: {}",
                self.severity, self.class, self.unit, self.message
            )
        }
    }
}
