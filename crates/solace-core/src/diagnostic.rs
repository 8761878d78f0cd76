//! Diagnostic messages emitted while building and resolving a tree.

use crate::{NodeId, Span};

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub node: Option<NodeId>,
    pub severity: DiagnosticSeverity,
    pub phase: CompilationPhase,
}

impl Diagnostic {
    pub fn warning(phase: CompilationPhase, span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            node: None,
            severity: DiagnosticSeverity::Warning,
            phase,
        }
    }

    pub fn error(phase: CompilationPhase, span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            node: None,
            severity: DiagnosticSeverity::Error,
            phase,
        }
    }

    /// Attach the node the diagnostic is about.
    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }
}

/// Severity level of a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// Compilation phase where a diagnostic was emitted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompilationPhase {
    Parsing,
    AstGeneration,
    NameResolution,
    Serialization,
    IrGeneration,
    AbiGeneration,
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "ERROR"),
            DiagnosticSeverity::Warning => write!(f, "WARNING"),
            DiagnosticSeverity::Info => write!(f, "INFO"),
        }
    }
}
