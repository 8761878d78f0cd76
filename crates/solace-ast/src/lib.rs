//! Typed AST construction for Solace.
//!
//! A parse tree ([`solace_cst::CstNode`]) is lowered into [`ast::SourceUnit`]
//! by [`astgen::build`]. Every node carries a synthesized
//! [`TypeDescription`](solace_core::TypeDescription) once its inputs are
//! known; references to declarations that appear later in the source are
//! settled by the [`resolver`] after the tree is complete.

pub mod ast;
pub mod astgen;
pub mod error;
pub mod resolver;
pub mod serialize;
pub mod synth;

pub use ast::{AstNode, Node, NodeType, SourceUnit, SrcNode};
pub use astgen::{AstLoweringCtx, BuiltAst, build, build_with};
pub use error::{BuildError, BuildErrorKind, BuildResult};
pub use resolver::{ReferenceKey, ResolutionReport, Resolver};
pub use serialize::{CodecError, CodecResult, Envelope};
