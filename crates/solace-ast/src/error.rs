//! Error types for tree construction.

use derive_more::{Display, From};
use solace_cst::CstNode;

pub type BuildResult<T> = Result<T, BuildError>;

/// A build failure. Any error aborts the enclosing build; no partial tree is
/// handed back.
#[derive(Clone, Display, Debug, From, PartialEq)]
#[display("{kind}")]
pub struct BuildError {
    #[from]
    kind: Box<BuildErrorKind>,
}

impl From<BuildErrorKind> for BuildError {
    fn from(kind: BuildErrorKind) -> Self {
        BuildError {
            kind: Box::new(kind),
        }
    }
}

impl BuildError {
    /// The parse tree contains a production outside the recognised set.
    pub fn unsupported(node: &CstNode) -> Self {
        BuildErrorKind::UnsupportedConstruct {
            kind: node.kind().to_string(),
            line: node.line(),
            column: node.column(),
        }
        .into()
    }

    pub fn missing_field(node: &CstNode, field: &'static str) -> Self {
        BuildErrorKind::MissingField {
            kind: node.kind().to_string(),
            field,
            line: node.line(),
            column: node.column(),
        }
        .into()
    }

    pub fn kind(&self) -> &BuildErrorKind {
        &self.kind
    }

    pub fn is_unsupported_construct(&self) -> bool {
        matches!(*self.kind, BuildErrorKind::UnsupportedConstruct { .. })
    }
}

#[derive(Clone, Display, Debug, PartialEq, Eq)]
pub enum BuildErrorKind {
    #[display("unsupported construct `{kind}` at {line}:{column}")]
    UnsupportedConstruct {
        kind: String,
        line: usize,
        column: usize,
    },

    #[display("`{kind}` at {line}:{column} has no `{field}`")]
    MissingField {
        kind: String,
        field: &'static str,
        line: usize,
        column: usize,
    },
}

impl std::error::Error for BuildError {}
