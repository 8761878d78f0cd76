//! Build context threaded through CST to AST lowering.

use solace_core::{CompilationPhase, Diagnostic, NodeId, NodeIdGen, TypeDescription};

use crate::ast::{AstNode, SourceUnit, find};
use crate::resolver::{Reference, ReferenceKey, ResolutionReport, Resolver};

/// State owned by one build session: the id allocator and the resolver.
///
/// A context must not be shared between concurrent builds; independent
/// builds each own their own.
#[derive(Debug, Default)]
pub struct AstLoweringCtx {
    node_id_gen: NodeIdGen,
    resolver: Resolver,
    diagnostics: Vec<Diagnostic>,
}

impl AstLoweringCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh NodeId.
    pub fn fresh_id(&mut self) -> NodeId {
        self.node_id_gen.fresh()
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.node_id_gen.allocated()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn declare(
        &mut self,
        scope: Option<NodeId>,
        name: &str,
        id: NodeId,
        type_description: Option<TypeDescription>,
    ) {
        if let Some(scope) = scope
            && !name.is_empty()
        {
            self.resolver.declare(scope, name, id, type_description);
        }
    }

    pub fn resolve(&mut self, node: NodeId, key: ReferenceKey, scope: &Scope) -> Option<Reference> {
        self.resolver.resolve_by_node(node, key, &scope.lookup_chain())
    }

    /// Register a composite whose children left it unresolved.
    pub fn defer(&mut self, node: NodeId, prefix: &str, scope: &Scope) {
        self.resolver
            .resolve_by_node(node, ReferenceKey::synthetic(prefix, node), &scope.lookup_chain());
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Run the second resolution phase over a finished tree.
    ///
    /// Every reference left unresolved becomes a warning; the nodes keep
    /// their `None` description.
    pub fn resolve_forward_references(&mut self, unit: &mut SourceUnit) -> ResolutionReport {
        let report = self.resolver.resolve_pending(unit);
        for unresolved in &report.unresolved {
            let span = find(unit, unresolved.node)
                .map(|node| node.src().span())
                .unwrap_or_else(|| unit.src().span());
            self.diagnostics.push(
                Diagnostic::warning(
                    CompilationPhase::NameResolution,
                    span,
                    format!("unresolved reference `{}`", unresolved.key),
                )
                .with_node(unresolved.node),
            );
        }
        report
    }
}

/// Enclosing nodes of the production being lowered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    pub unit: Option<NodeId>,
    pub contract: Option<NodeId>,
    pub function: Option<NodeId>,
    pub body: Option<NodeId>,
    /// Variable declaration the expression initialises.
    pub var_decl: Option<NodeId>,
    /// Syntactically enclosing expression or statement.
    pub parent_expr: Option<NodeId>,
}

impl Scope {
    pub fn unit(id: NodeId) -> Self {
        Self {
            unit: Some(id),
            ..Self::default()
        }
    }

    pub fn with_contract(self, id: NodeId) -> Self {
        Self {
            contract: Some(id),
            ..self
        }
    }

    pub fn with_function(self, id: NodeId) -> Self {
        Self {
            function: Some(id),
            ..self
        }
    }

    pub fn with_body(self, id: NodeId) -> Self {
        Self {
            body: Some(id),
            ..self
        }
    }

    pub fn with_var_decl(self, id: NodeId) -> Self {
        Self {
            var_decl: Some(id),
            ..self
        }
    }

    pub fn with_parent(self, id: NodeId) -> Self {
        Self {
            parent_expr: Some(id),
            ..self
        }
    }

    /// Logical parent of an expression: the target variable declaration,
    /// else the enclosing expression, else the function, else the body.
    pub fn parent_id(&self) -> Option<NodeId> {
        self.var_decl
            .or(self.parent_expr)
            .or(self.function)
            .or(self.body)
    }

    /// Scopes searched for a name, innermost first.
    pub fn lookup_chain(&self) -> Vec<NodeId> {
        [self.function, self.contract, self.unit]
            .into_iter()
            .flatten()
            .collect()
    }
}
