//! Solace intermediate representation.
//!
//! A flatter view of a resolved [`SourceUnit`](solace_ast::SourceUnit): pragmas,
//! contracts and their entry points with ordered, typed parameters. This is
//! what ABI generation and other downstream tooling consume.

pub mod builder;
pub mod errors;
pub mod ir;

pub use builder::Builder;
pub use errors::{IrError, IrErrorKind, IrResult};
pub use ir::*;
