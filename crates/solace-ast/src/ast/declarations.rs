use serde::{Deserialize, Serialize};
use solace_core::{NodeId, TypeDescription};

use super::{AstNode, Body, Node, NodeType, SrcNode, TypeName, node_header, replace_description};
use crate::synth;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl SourceUnit {
    pub fn pragmas(&self) -> impl Iterator<Item = &PragmaDirective> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Pragma(pragma) => Some(pragma),
            _ => None,
        })
    }

    pub fn contracts(&self) -> impl Iterator<Item = &ContractDefinition> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Contract(contract) => Some(contract),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorDefinition> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Error(error) => Some(error),
            _ => None,
        })
    }
}

impl AstNode for SourceUnit {
    node_header!();

    fn children(&self) -> Vec<&dyn AstNode> {
        self.nodes.iter().map(|node| node as &dyn AstNode).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        self.nodes
            .iter_mut()
            .map(|node| node as &mut dyn AstNode)
            .collect()
    }
}

/// `pragma solidity ^0.8.0;`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PragmaDirective {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    /// Whitespace-separated words after `pragma`, without the terminator.
    #[serde(default)]
    pub literals: Vec<String>,
    pub text: String,
}

impl AstNode for PragmaDirective {
    node_header!();

    fn children(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        Vec::new()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    #[default]
    Contract,
    AbstractContract,
    Interface,
    Library,
}

impl ContractKind {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "contract" => Some(ContractKind::Contract),
            "abstract" | "abstract contract" => Some(ContractKind::AbstractContract),
            "interface" => Some(ContractKind::Interface),
            "library" => Some(ContractKind::Library),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractDefinition {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub name: String,
    #[serde(default)]
    pub kind: ContractKind,
    #[serde(default)]
    pub nodes: Vec<Node>,
    pub type_description: Option<TypeDescription>,
}

impl ContractDefinition {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Function(function) => Some(function),
            _ => None,
        })
    }

    pub fn state_variables(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.nodes.iter().filter_map(|node| match node {
            Node::VariableDeclaration(variable) => Some(variable),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorDefinition> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Error(error) => Some(error),
            _ => None,
        })
    }
}

impl AstNode for ContractDefinition {
    node_header!();

    fn type_description(&self) -> Option<&TypeDescription> {
        self.type_description.as_ref()
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        self.nodes.iter().map(|node| node as &dyn AstNode).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        self.nodes
            .iter_mut()
            .map(|node| node as &mut dyn AstNode)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    #[default]
    Internal,
    Private,
    External,
}

impl Visibility {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "public" => Some(Visibility::Public),
            "internal" => Some(Visibility::Internal),
            "private" => Some(Visibility::Private),
            "external" => Some(Visibility::External),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

impl StateMutability {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "pure" => Some(StateMutability::Pure),
            "view" => Some(StateMutability::View),
            "nonpayable" => Some(StateMutability::Nonpayable),
            "payable" => Some(StateMutability::Payable),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::Nonpayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }
}

impl std::fmt::Display for StateMutability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data location of a reference-typed declaration. `Default` covers state
/// variables and nested type positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLocation {
    #[default]
    Default,
    Memory,
    Storage,
    Calldata,
}

impl StorageLocation {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "memory" => Some(StorageLocation::Memory),
            "storage" => Some(StorageLocation::Storage),
            "calldata" => Some(StorageLocation::Calldata),
            _ => None,
        }
    }
}

/// State variable or local variable declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub name: String,
    pub type_name: TypeName,
    #[serde(default)]
    pub storage_location: StorageLocation,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_constant: bool,
    #[serde(default)]
    pub state_variable: bool,
    #[serde(default)]
    pub initial_value: Option<Box<Node>>,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for VariableDeclaration {
    node_header!();

    fn type_description(&self) -> Option<&TypeDescription> {
        self.type_description.as_ref()
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> = vec![&self.type_name as &dyn AstNode];
        children.extend(self.initial_value.as_deref().map(|node| node as &dyn AstNode));
        children
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        let mut children: Vec<&mut dyn AstNode> = vec![&mut self.type_name as &mut dyn AstNode];
        children.extend(
            self.initial_value
                .as_deref_mut()
                .map(|node| node as &mut dyn AstNode),
        );
        children
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

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    Function,
    Constructor,
    Receive,
    Fallback,
}

/// Functions, constructors and the receive/fallback entry points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub kind: FunctionKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub state_mutability: StateMutability,
    pub parameters: ParameterList,
    pub return_parameters: ParameterList,
    #[serde(default)]
    pub body: Option<Body>,
    pub type_description: Option<TypeDescription>,
}

impl FunctionDefinition {
    pub fn synthesize(&self) -> Option<TypeDescription> {
        synth::function(
            &self.parameters.descriptions(),
            &self.return_parameters.descriptions(),
            self.state_mutability,
        )
    }
}

impl AstNode for FunctionDefinition {
    node_header!();

    fn type_description(&self) -> Option<&TypeDescription> {
        self.type_description.as_ref()
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> =
            vec![&self.parameters as &dyn AstNode, &self.return_parameters];
        children.extend(self.body.as_ref().map(|body| body as &dyn AstNode));
        children
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        let mut children: Vec<&mut dyn AstNode> =
            vec![&mut self.parameters as &mut dyn AstNode, &mut self.return_parameters];
        children.extend(self.body.as_mut().map(|body| body as &mut dyn AstNode));
        children
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
pub struct ParameterList {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl ParameterList {
    pub fn descriptions(&self) -> Vec<Option<TypeDescription>> {
        self.parameters
            .iter()
            .map(|parameter| parameter.type_description.clone())
            .collect()
    }
}

impl AstNode for ParameterList {
    node_header!();

    fn children(&self) -> Vec<&dyn AstNode> {
        self.parameters
            .iter()
            .map(|parameter| parameter as &dyn AstNode)
            .collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        self.parameters
            .iter_mut()
            .map(|parameter| parameter as &mut dyn AstNode)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    #[serde(default)]
    pub name: String,
    pub type_name: TypeName,
    #[serde(default)]
    pub storage_location: StorageLocation,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for Parameter {
    node_header!();

    fn type_description(&self) -> Option<&TypeDescription> {
        self.type_description.as_ref()
    }

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

/// `error InsufficientBalance(uint256 available, uint256 required);`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorDefinition {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub name: String,
    pub parameters: ParameterList,
    pub type_description: Option<TypeDescription>,
}

impl AstNode for ErrorDefinition {
    node_header!();

    fn type_description(&self) -> Option<&TypeDescription> {
        self.type_description.as_ref()
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        vec![&self.parameters as &dyn AstNode]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        vec![&mut self.parameters as &mut dyn AstNode]
    }

    fn set_reference_descriptor(
        &mut self,
        _declaration: NodeId,
        _description: &TypeDescription,
    ) -> bool {
        let synthesized = synth::error(&self.parameters.descriptions());
        replace_description(&mut self.type_description, synthesized)
    }
}
