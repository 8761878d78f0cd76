use serde::{Deserialize, Serialize};
use solace_core::{NodeId, TypeDescription};

use super::{
    AstNode, Node, NodeType, SrcNode, TypeName, descriptions, node_header, replace_description,
};
use crate::synth;

macro_rules! described {
    () => {
        fn type_description(&self) -> Option<&TypeDescription> {
            self.type_description.as_ref()
        }
    };
}

fn as_dyn(node: &Node) -> &dyn AstNode {
    node
}

fn as_dyn_mut(node: &mut Node) -> &mut dyn AstNode {
    node
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperation {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub operator: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub type_description: Option<TypeDescription>,
}

impl BinaryOperation {
    pub fn synthesize(&self) -> Option<TypeDescription> {
        synth::binary(
            &self.operator,
            self.left.type_description(),
            self.right.type_description(),
        )
    }
}

impl AstNode for BinaryOperation {
    node_header!();
    described!();

    fn children(&self) -> Vec<&dyn AstNode> {
        vec![as_dyn(&self.left), as_dyn(&self.right)]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        vec![as_dyn_mut(&mut self.left), as_dyn_mut(&mut self.right)]
    }

    /// Settled only once both operands are, so a literal operand cannot
    /// stand in for a forward-declared one.
    fn is_resolved(&self) -> bool {
        self.type_description.is_some() && self.left.is_resolved() && self.right.is_resolved()
    }

    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = self.synthesize();
        replace_description(&mut self.type_description, synthesized)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub operator: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
}

impl Assignment {
    pub fn synthesize(&self) -> Option<TypeDescription> {
        self.left
            .type_description()
            .or(self.right.type_description())
            .cloned()
    }
}

impl AstNode for Assignment {
    node_header!();
    described!();

    fn referenced_declaration(&self) -> Option<NodeId> {
        self.referenced_declaration
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        vec![as_dyn(&self.left), as_dyn(&self.right)]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        vec![as_dyn_mut(&mut self.left), as_dyn_mut(&mut self.right)]
    }

    fn is_resolved(&self) -> bool {
        self.type_description.is_some() && self.left.is_resolved() && self.right.is_resolved()
    }

    fn set_reference_descriptor(
        &mut self,
        declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = self.synthesize();
        let accepted = replace_description(&mut self.type_description, synthesized);
        if accepted {
            self.referenced_declaration = Some(declaration);
        }
        accepted
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub expression: Box<Node>,
    #[serde(default)]
    pub arguments: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for FunctionCall {
    node_header!();
    described!();

    fn referenced_declaration(&self) -> Option<NodeId> {
        self.referenced_declaration
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        let mut children = vec![as_dyn(&self.expression)];
        children.extend(self.arguments.iter().map(as_dyn));
        children
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        let mut children = vec![as_dyn_mut(&mut self.expression)];
        children.extend(self.arguments.iter_mut().map(as_dyn_mut));
        children
    }

    fn set_reference_descriptor(
        &mut self,
        declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = synth::call(self.expression.type_description());
        let accepted = replace_description(&mut self.type_description, synthesized);
        if accepted {
            self.referenced_declaration =
                self.expression.referenced_declaration().or(Some(declaration));
        }
        accepted
    }
}

/// `target.call{value: amount, gas: limit}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallOption {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub expression: Box<Node>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub options: Vec<Node>,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for FunctionCallOption {
    node_header!();
    described!();

    fn children(&self) -> Vec<&dyn AstNode> {
        let mut children = vec![as_dyn(&self.expression)];
        children.extend(self.options.iter().map(as_dyn));
        children
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        let mut children = vec![as_dyn_mut(&mut self.expression)];
        children.extend(self.options.iter_mut().map(as_dyn_mut));
        children
    }

    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = self.expression.type_description().cloned();
        replace_description(&mut self.type_description, synthesized)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberAccess {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub member_name: String,
    pub expression: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for MemberAccess {
    node_header!();
    described!();

    fn referenced_declaration(&self) -> Option<NodeId> {
        self.referenced_declaration
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        vec![as_dyn(&self.expression)]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        vec![as_dyn_mut(&mut self.expression)]
    }

    fn set_reference_descriptor(
        &mut self,
        declaration: NodeId,
        description: &TypeDescription,
    ) -> bool {
        if self.type_description.is_some() {
            return false;
        }
        self.referenced_declaration = Some(declaration);
        self.type_description = Some(description.clone());
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKind {
    Identifier,
    Number,
    HexNumber,
    String,
    Boolean,
    ElementaryType,
}

/// Identifiers and literals. The node type is `IDENTIFIER` for names,
/// including elementary type names used as values, and `LITERAL` otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimaryExpression {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub kind: PrimaryKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default)]
    pub is_pure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for PrimaryExpression {
    node_header!();
    described!();

    fn referenced_declaration(&self) -> Option<NodeId> {
        self.referenced_declaration
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        Vec::new()
    }

    fn set_reference_descriptor(
        &mut self,
        declaration: NodeId,
        description: &TypeDescription,
    ) -> bool {
        if self.kind != PrimaryKind::Identifier || self.type_description.is_some() {
            return false;
        }
        self.referenced_declaration = Some(declaration);
        self.type_description = Some(description.clone());
        true
    }
}

/// `base[index]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexAccess {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub base_expression: Option<Box<Node>>,
    #[serde(default)]
    pub index_expression: Option<Box<Node>>,
    /// Inputs to synthesis, taken from the index or else the base.
    #[serde(default)]
    pub type_descriptions: Vec<Option<TypeDescription>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
}

impl IndexAccess {
    /// Rebuild the synthesis inputs: the index when there is one, else the
    /// base. An unresolved input stays `None`.
    pub fn refresh_descriptions(&mut self) {
        let source = self
            .index_expression
            .as_deref()
            .or(self.base_expression.as_deref());
        if let Some(child) = source {
            self.type_descriptions = vec![child.type_description().cloned()];
        }
    }
}

impl AstNode for IndexAccess {
    node_header!();
    described!();

    fn referenced_declaration(&self) -> Option<NodeId> {
        self.referenced_declaration
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        [&self.base_expression, &self.index_expression]
            .into_iter()
            .filter_map(|slot| slot.as_deref().map(as_dyn))
            .collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        [&mut self.base_expression, &mut self.index_expression]
            .into_iter()
            .filter_map(|slot| slot.as_deref_mut().map(as_dyn_mut))
            .collect()
    }

    fn is_resolved(&self) -> bool {
        self.type_description.is_some() && self.type_descriptions.iter().all(Option::is_some)
    }

    fn set_reference_descriptor(
        &mut self,
        declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        self.refresh_descriptions();
        let synthesized = Some(synth::index_access(&self.type_descriptions));
        let accepted = replace_description(&mut self.type_description, synthesized);
        if accepted {
            self.referenced_declaration = Some(declaration);
        }
        accepted
    }
}

/// `base[start:end]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexRangeAccess {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub base_expression: Box<Node>,
    #[serde(default)]
    pub start_expression: Option<Box<Node>>,
    #[serde(default)]
    pub end_expression: Option<Box<Node>>,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for IndexRangeAccess {
    node_header!();
    described!();

    fn children(&self) -> Vec<&dyn AstNode> {
        let mut children = vec![as_dyn(&self.base_expression)];
        children.extend(self.start_expression.as_deref().map(as_dyn));
        children.extend(self.end_expression.as_deref().map(as_dyn));
        children
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        let mut children = vec![as_dyn_mut(&mut self.base_expression)];
        children.extend(self.start_expression.as_deref_mut().map(as_dyn_mut));
        children.extend(self.end_expression.as_deref_mut().map(as_dyn_mut));
        children
    }

    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = synth::slice(self.base_expression.type_description());
        replace_description(&mut self.type_description, synthesized)
    }
}

/// `type(T)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaType {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub type_name: TypeName,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for MetaType {
    node_header!();
    described!();

    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.type_name as &dyn AstNode]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        vec![&mut self.type_name as &mut dyn AstNode]
    }

    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = synth::meta_type(self.type_name.type_description.as_ref());
        replace_description(&mut self.type_description, synthesized)
    }
}

/// `payable(x)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayableConversion {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub arguments: Vec<Node>,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for PayableConversion {
    node_header!();
    described!();

    fn children(&self) -> Vec<&dyn AstNode> {
        self.arguments.iter().map(as_dyn).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        self.arguments.iter_mut().map(as_dyn_mut).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnaryOperation {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub operator: String,
    pub prefix: bool,
    pub sub_expression: Box<Node>,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for UnaryOperation {
    node_header!();
    described!();

    fn children(&self) -> Vec<&dyn AstNode> {
        vec![as_dyn(&self.sub_expression)]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        vec![as_dyn_mut(&mut self.sub_expression)]
    }

    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = synth::unary(&self.operator, self.sub_expression.type_description());
        replace_description(&mut self.type_description, synthesized)
    }
}

/// `new T`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewExpression {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub type_name: TypeName,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for NewExpression {
    node_header!();
    described!();

    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.type_name as &dyn AstNode]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        vec![&mut self.type_name as &mut dyn AstNode]
    }

    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = self.type_name.type_description.clone();
        replace_description(&mut self.type_description, synthesized)
    }
}

/// `(a, b, ...)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TupleExpression {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub is_constant: bool,
    #[serde(default)]
    pub is_pure: bool,
    #[serde(default)]
    pub components: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
}

impl TupleExpression {
    pub fn synthesize(&self) -> TypeDescription {
        synth::tuple(&descriptions(&self.components))
    }

    /// Pure when a direct component is a pure primary expression.
    pub fn has_pure_component(&self) -> bool {
        self.components
            .iter()
            .filter_map(Node::as_primary)
            .any(|primary| primary.is_pure)
    }
}

impl AstNode for TupleExpression {
    node_header!();
    described!();

    fn referenced_declaration(&self) -> Option<NodeId> {
        self.referenced_declaration
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        self.components.iter().map(as_dyn).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        self.components.iter_mut().map(as_dyn_mut).collect()
    }

    fn is_resolved(&self) -> bool {
        self.components.iter().all(|component| component.is_resolved())
    }

    fn set_reference_descriptor(
        &mut self,
        declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = Some(self.synthesize());
        let accepted = replace_description(&mut self.type_description, synthesized);
        if accepted {
            self.referenced_declaration = Some(declaration);
        }
        accepted
    }
}
