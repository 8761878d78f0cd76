//! Typed syntax tree.
//!
//! Every variant is a plain struct that owns its syntactic children and
//! implements [`AstNode`]. Polymorphic positions hold a [`Node`]; fixed
//! positions (parameter lists, type names, bodies) hold the concrete struct.
//! Back-references such as a node's parent or its referenced declaration are
//! stored as [`NodeId`]s and resolved by lookup.

mod declarations;
mod expressions;
mod node_type;
mod src_node;
mod statements;
mod types;

use serde::Serialize;
use solace_core::{NodeId, TypeDescription};

pub use declarations::{
    ContractDefinition, ContractKind, ErrorDefinition, FunctionDefinition, FunctionKind,
    Parameter, ParameterList, PragmaDirective, SourceUnit, StateMutability, StorageLocation,
    VariableDeclaration, Visibility,
};
pub use expressions::{
    Assignment, BinaryOperation, FunctionCall, FunctionCallOption, IndexAccess,
    IndexRangeAccess, MemberAccess, MetaType, NewExpression, PayableConversion, PrimaryExpression,
    PrimaryKind, TupleExpression, UnaryOperation,
};
pub use node_type::NodeType;
pub use src_node::SrcNode;
pub use statements::{Body, ReturnStatement, RevertStatement};
pub use types::{TypeName, TypeNameKind};

/// Capabilities shared by every node variant.
pub trait AstNode {
    fn id(&self) -> NodeId;

    fn node_type(&self) -> NodeType;

    fn src(&self) -> &SrcNode;

    fn type_description(&self) -> Option<&TypeDescription> {
        None
    }

    fn referenced_declaration(&self) -> Option<NodeId> {
        None
    }

    /// Owned syntactic children in source order.
    fn children(&self) -> Vec<&dyn AstNode>;

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode>;

    fn is_resolved(&self) -> bool {
        self.type_description().is_some()
    }

    /// Push a description resolved for a deferred reference into this node.
    ///
    /// Returns `true` only when the node accepted it and its own state
    /// changed. Nodes that never defer, or that are already settled, return
    /// `false` and stay untouched.
    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        false
    }
}

/// `id`, `node_type` and `src` accessors for structs carrying those fields.
macro_rules! node_header {
    () => {
        fn id(&self) -> solace_core::NodeId {
            self.id
        }

        fn node_type(&self) -> $crate::ast::NodeType {
            self.node_type
        }

        fn src(&self) -> &$crate::ast::SrcNode {
            &self.src
        }
    };
}
pub(crate) use node_header;

/// Any node of the tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    SourceUnit(SourceUnit),
    Pragma(PragmaDirective),
    Contract(ContractDefinition),
    VariableDeclaration(VariableDeclaration),
    Function(FunctionDefinition),
    ParameterList(ParameterList),
    Parameter(Parameter),
    Error(ErrorDefinition),
    TypeName(TypeName),
    Body(Body),
    Revert(RevertStatement),
    Return(ReturnStatement),
    BinaryOperation(BinaryOperation),
    Assignment(Assignment),
    FunctionCall(FunctionCall),
    FunctionCallOption(FunctionCallOption),
    MemberAccess(MemberAccess),
    Primary(PrimaryExpression),
    IndexAccess(IndexAccess),
    IndexRangeAccess(IndexRangeAccess),
    MetaType(MetaType),
    PayableConversion(PayableConversion),
    UnaryOperation(UnaryOperation),
    NewExpression(NewExpression),
    Tuple(TupleExpression),
}

macro_rules! each_variant {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            Node::SourceUnit($inner) => $body,
            Node::Pragma($inner) => $body,
            Node::Contract($inner) => $body,
            Node::VariableDeclaration($inner) => $body,
            Node::Function($inner) => $body,
            Node::ParameterList($inner) => $body,
            Node::Parameter($inner) => $body,
            Node::Error($inner) => $body,
            Node::TypeName($inner) => $body,
            Node::Body($inner) => $body,
            Node::Revert($inner) => $body,
            Node::Return($inner) => $body,
            Node::BinaryOperation($inner) => $body,
            Node::Assignment($inner) => $body,
            Node::FunctionCall($inner) => $body,
            Node::FunctionCallOption($inner) => $body,
            Node::MemberAccess($inner) => $body,
            Node::Primary($inner) => $body,
            Node::IndexAccess($inner) => $body,
            Node::IndexRangeAccess($inner) => $body,
            Node::MetaType($inner) => $body,
            Node::PayableConversion($inner) => $body,
            Node::UnaryOperation($inner) => $body,
            Node::NewExpression($inner) => $body,
            Node::Tuple($inner) => $body,
        }
    };
}

impl AstNode for Node {
    fn id(&self) -> NodeId {
        each_variant!(self, node => node.id())
    }

    fn node_type(&self) -> NodeType {
        each_variant!(self, node => node.node_type())
    }

    fn src(&self) -> &SrcNode {
        each_variant!(self, node => node.src())
    }

    fn type_description(&self) -> Option<&TypeDescription> {
        each_variant!(self, node => node.type_description())
    }

    fn referenced_declaration(&self) -> Option<NodeId> {
        each_variant!(self, node => node.referenced_declaration())
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        each_variant!(self, node => node.children())
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        each_variant!(self, node => node.children_mut())
    }

    fn is_resolved(&self) -> bool {
        each_variant!(self, node => node.is_resolved())
    }

    fn set_reference_descriptor(
        &mut self,
        declaration: NodeId,
        description: &TypeDescription,
    ) -> bool {
        each_variant!(self, node => node.set_reference_descriptor(declaration, description))
    }
}

impl Node {
    pub fn as_primary(&self) -> Option<&PrimaryExpression> {
        match self {
            Node::Primary(primary) => Some(primary),
            _ => None,
        }
    }

    pub fn as_source_unit(&self) -> Option<&SourceUnit> {
        match self {
            Node::SourceUnit(unit) => Some(unit),
            _ => None,
        }
    }
}

/// Visit `node` and its descendants in pre-order.
pub fn walk<'a>(node: &'a dyn AstNode, visit: &mut impl FnMut(&'a dyn AstNode)) {
    visit(node);
    for child in node.children() {
        walk(child, visit);
    }
}

pub fn find(node: &dyn AstNode, id: NodeId) -> Option<&dyn AstNode> {
    if node.id() == id {
        return Some(node);
    }
    node.children()
        .into_iter()
        .find_map(|child| find(child, id))
}

pub fn find_mut(node: &mut dyn AstNode, id: NodeId) -> Option<&mut dyn AstNode> {
    if node.id() == id {
        return Some(node);
    }
    for child in node.children_mut() {
        if let Some(found) = find_mut(child, id) {
            return Some(found);
        }
    }
    None
}

/// All ids in the subtree, in pre-order.
pub fn ids(node: &dyn AstNode) -> Vec<NodeId> {
    let mut ids = Vec::new();
    walk(node, &mut |node| ids.push(node.id()));
    ids
}

/// Type descriptions of a list of children, `None` for unresolved ones.
pub(crate) fn descriptions(nodes: &[Node]) -> Vec<Option<TypeDescription>> {
    nodes
        .iter()
        .map(|node| node.type_description().cloned())
        .collect()
}

/// Store a re-synthesized description, reporting whether anything changed.
pub(crate) fn replace_description(
    slot: &mut Option<TypeDescription>,
    synthesized: Option<TypeDescription>,
) -> bool {
    if synthesized.is_none() || *slot == synthesized {
        return false;
    }
    *slot = synthesized;
    true
}
