use serde::{Deserialize, Serialize};
use solace_ast::ast::{ContractKind, StateMutability, Visibility};
use solace_ast::NodeType;
use solace_core::{NodeId, TypeDescription};

/// IR of one source unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootSourceUnit {
    pub pragmas: Vec<Pragma>,
    pub contracts: Vec<Contract>,
    /// File-level error definitions.
    pub errors: Vec<ErrorDef>,
}

impl RootSourceUnit {
    pub fn contract(&self, name: &str) -> Option<&Contract> {
        self.contracts.iter().find(|contract| contract.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pragma {
    pub id: NodeId,
    pub node_type: NodeType,
    pub literals: Vec<String>,
    pub text: String,
}

impl Pragma {
    pub fn get_literals(&self) -> &[String] {
        &self.literals
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    /// The version constraint: the last word of the text without the
    /// terminating `;`.
    ///
    /// `pragma solidity ^0.8.0;` gives `^0.8.0`.
    pub fn get_version(&self) -> String {
        self.text
            .split_whitespace()
            .rev()
            .map(|word| word.replace(';', ""))
            .find(|word| !word.is_empty())
            .unwrap_or_default()
    }
}

/// A named, typed parameter in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: NodeId,
    pub name: String,
    pub type_description: Option<TypeDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateVariable {
    pub id: NodeId,
    pub name: String,
    pub visibility: Visibility,
    pub is_constant: bool,
    pub type_description: Option<TypeDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: NodeId,
    pub name: String,
    pub visibility: Visibility,
    pub state_mutability: StateMutability,
    pub parameters: Vec<Parameter>,
    pub return_parameters: Vec<Parameter>,
    pub type_description: Option<TypeDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    pub id: NodeId,
    pub state_mutability: StateMutability,
    pub parameters: Vec<Parameter>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receive {
    pub id: NodeId,
    pub name: String,
    pub state_mutability: StateMutability,
    pub parameters: Vec<Parameter>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fallback {
    pub id: NodeId,
    pub name: String,
    pub state_mutability: StateMutability,
    pub parameters: Vec<Parameter>,
    pub return_parameters: Vec<Parameter>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorDef {
    pub id: NodeId,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub type_description: Option<TypeDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: NodeId,
    pub name: String,
    pub kind: ContractKind,
    pub state_variables: Vec<StateVariable>,
    pub functions: Vec<Function>,
    pub constructor: Option<Constructor>,
    pub receive: Option<Receive>,
    pub fallback: Option<Fallback>,
    pub errors: Vec<ErrorDef>,
}

impl Contract {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }
}
