//! CST to AST lowering.
//!
//! Lowering runs in two phases. The first walks the parse tree once,
//! allocating ids in construction order and resolving whatever names are
//! already declared. The second ([`AstLoweringCtx::resolve_forward_references`])
//! runs after the whole tree exists and fills in references to declarations
//! that appeared later in the source.

mod context;
mod declarations;
mod expressions;
mod helpers;
mod statements;
mod types;

use solace_core::Diagnostic;
use solace_cst::CstNode;

pub use context::{AstLoweringCtx, Scope};
pub use declarations::lower_source_unit;
pub use expressions::{ExpressionKind, lower_expr};
pub use statements::{lower_block, lower_statement};
pub use types::lower_type_name;

use crate::ast::SourceUnit;
use crate::error::BuildResult;
use crate::resolver::ResolutionReport;

/// Result of a full build.
#[derive(Clone, Debug)]
pub struct BuiltAst {
    pub unit: SourceUnit,
    /// `None` when forward reference resolution was skipped.
    pub report: Option<ResolutionReport>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of node ids allocated.
    pub node_count: u64,
}

/// Build a source unit from a parse tree, running both phases.
pub fn build(root: &CstNode) -> BuildResult<BuiltAst> {
    build_with(root, true)
}

/// Build a source unit, optionally skipping the second resolution phase.
pub fn build_with(root: &CstNode, resolve_forward_references: bool) -> BuildResult<BuiltAst> {
    let mut ctx = AstLoweringCtx::new();
    let mut unit = lower_source_unit(&mut ctx, root)?;

    let report = resolve_forward_references.then(|| ctx.resolve_forward_references(&mut unit));
    if let Some(report) = &report {
        tracing::debug!(
            "forward references: accepted={} rejected={} unresolved={}",
            report.accepted,
            report.rejected,
            report.unresolved.len()
        );
    }

    Ok(BuiltAst {
        unit,
        report,
        diagnostics: ctx.take_diagnostics(),
        node_count: ctx.allocated(),
    })
}
