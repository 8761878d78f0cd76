//! Solace compiler utilities shared by every front-end stage.
pub mod diagnostic;
pub mod node_id;
pub mod span;
pub mod type_description;

pub use diagnostic::{CompilationPhase, Diagnostic, DiagnosticSeverity};
pub use node_id::{NodeId, NodeIdGen};
pub use span::Span;
pub use type_description::TypeDescription;
