use serde::{Deserialize, Serialize};
use solace_core::{NodeId, TypeDescription};

use super::{AstNode, Node, NodeType, SrcNode, node_header};
use crate::synth;

/// A `{ ... }` statement block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub statements: Vec<Node>,
}

impl AstNode for Body {
    node_header!();

    fn children(&self) -> Vec<&dyn AstNode> {
        self.statements
            .iter()
            .map(|node| node as &dyn AstNode)
            .collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        self.statements
            .iter_mut()
            .map(|node| node as &mut dyn AstNode)
            .collect()
    }
}

/// `revert InsufficientBalance(available, required);`
///
/// Its description is fixed and never derived from its children; it is
/// written out for readers but never read back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevertStatement {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub arguments: Vec<Node>,
    pub expression: Box<Node>,
    #[serde(skip_deserializing, default = "synth::revert")]
    pub type_description: TypeDescription,
}

impl AstNode for RevertStatement {
    node_header!();

    fn type_description(&self) -> Option<&TypeDescription> {
        Some(&self.type_description)
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> = self
            .arguments
            .iter()
            .map(|node| node as &dyn AstNode)
            .collect();
        children.push(&*self.expression);
        children
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        let mut children: Vec<&mut dyn AstNode> = self
            .arguments
            .iter_mut()
            .map(|node| node as &mut dyn AstNode)
            .collect();
        children.push(&mut *self.expression);
        children
    }

    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        false
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub expression: Option<Box<Node>>,
}

impl AstNode for ReturnStatement {
    node_header!();

    fn type_description(&self) -> Option<&TypeDescription> {
        self.expression
            .as_deref()
            .and_then(|expression| expression.type_description())
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        self.expression
            .as_deref()
            .map(|node| node as &dyn AstNode)
            .into_iter()
            .collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        self.expression
            .as_deref_mut()
            .map(|node| node as &mut dyn AstNode)
            .into_iter()
            .collect()
    }

    fn is_resolved(&self) -> bool {
        true
    }
}
