//! Miette-based error diagnostics for CLI error presentation.
//!
//! Configuration syntax errors are rendered with the offending span of the
//! file highlighted, along with an optional help message.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(quantfolio::config))]
pub struct ConfigDiagnostic {
    /// Human-readable error message.
    pub message: String,

    /// Source content (the configuration file).
    #[source_code]
    pub src: String,

    /// Byte offset and length of the problematic region.
    #[label("here")]
    pub span: SourceSpan,

    /// Optional help text with suggestions for fixing the error.
    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    /// Create a new configuration diagnostic with source location.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: src.into(),
            span: (offset, len).into(),
            help: None,
        }
    }

    /// Add a help suggestion.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Diagnostic for a TOML syntax or type error in `src`.
    ///
    /// Errors without a span point at the start of the file.
    #[must_use]
    pub fn from_toml(err: &toml::de::Error, src: &str) -> Self {
        let (offset, len) = err
            .span()
            .map_or((0, 0), |span| (span.start, span.end.saturating_sub(span.start)));
        Self::new(err.message().to_string(), src, offset, len)
            .with_help("run `quantfolio config init --force` to regenerate a commented file")
    }
}

/// Render a diagnostic with miette's graphical handler.
#[must_use]
pub fn render(diagnostic: ConfigDiagnostic) -> String {
    format!("{:?}", miette::Report::new(diagnostic))
}
