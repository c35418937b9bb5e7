//! User-friendly diagnostic messages.
//!
//! Every unresolved workspace is reported with what was asked for, what was
//! seen instead, and what to try next.

use std::fmt;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the API refuses or throttles requests.
    pub const RATE_LIMITED: &str =
        "Set GITHUB_TOKEN (or the configured token_env) to raise the GitHub API rate limit";

    /// Suggestion when a listing endpoint answers 404.
    pub const CHECK_UPSTREAM: &str =
        "Check the [upstream] owner, repo and reference in .pluginsync/config.toml";

    /// Suggestion for other fetch failures.
    pub const FETCH_FAILED: &str = "Check your network connection and run again with --debug";

    /// Suggestion when no commit declares the target version.
    pub const CHECK_TARGET: &str = "Pick one of the versions listed above as --target";

    /// Suggestion to relax matching.
    pub const TRY_FUZZY: &str = "Use --policy fuzzy to match by substring instead";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Warning, message)
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (self.severity, color) {
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
            (Severity::Error, false) => "error",
            (Severity::Warning, false) => "warning",
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::warning("no commit found where backstage.json has version=1.99.0")
            .with_context("workspace: tekton")
            .with_context("1.46.0 at abc123")
            .with_suggestion(suggestions::CHECK_TARGET)
            .with_suggestion(suggestions::TRY_FUZZY);

        let output = diag.format(false);
        assert!(output.starts_with("warning: no commit found"));
        assert!(output.contains("  -> workspace: tekton"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("2. Use --policy fuzzy"));
    }

    #[test]
    fn test_diagnostic_color() {
        let output = Diagnostic::error("boom").format(true);
        assert!(output.contains("\x1b[1;31merror\x1b[0m: boom"));
        assert!(!output.contains("help"));
    }
}
