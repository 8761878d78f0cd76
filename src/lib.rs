//! Solace front end: parse tree in, typed AST, IR and ABI out.

pub mod pipeline;

pub use pipeline::{BuildOptions, Emit, PipelineError, PipelineErrorKind, PipelineResult};
pub use solace_ast::{BuiltAst, SourceUnit};
