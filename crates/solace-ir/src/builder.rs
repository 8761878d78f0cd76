use solace_ast::ast::{
    ContractDefinition, ErrorDefinition, FunctionDefinition, FunctionKind, Node, ParameterList,
    PragmaDirective, VariableDeclaration,
};
use solace_ast::{AstNode, SourceUnit};
use tracing::{debug, trace};

use crate::errors::{IrError, IrResult};
use crate::ir::*;

/// Builds the IR of a resolved source unit.
#[derive(Debug, Default)]
pub struct Builder;

impl Builder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, unit: &SourceUnit) -> IrResult<RootSourceUnit> {
        let mut root = RootSourceUnit::default();
        for node in &unit.nodes {
            match node {
                Node::Pragma(pragma) => root.pragmas.push(self.process_pragma(pragma)),
                Node::Contract(contract) => root.contracts.push(self.process_contract(contract)?),
                Node::Error(error) => root.errors.push(self.process_error(error)),
                other => trace!("ir: skipping top-level {}", other.node_type()),
            }
        }
        debug!(
            "ir: {} pragma(s), {} contract(s), {} file-level error(s)",
            root.pragmas.len(),
            root.contracts.len(),
            root.errors.len()
        );
        Ok(root)
    }

    pub fn process_pragma(&self, pragma: &PragmaDirective) -> Pragma {
        Pragma {
            id: pragma.id,
            node_type: pragma.node_type,
            literals: pragma.literals.clone(),
            text: pragma.text.clone(),
        }
    }

    pub fn process_contract(&self, contract: &ContractDefinition) -> IrResult<Contract> {
        let mut ir = Contract {
            id: contract.id,
            name: contract.name.clone(),
            kind: contract.kind,
            state_variables: Vec::new(),
            functions: Vec::new(),
            constructor: None,
            receive: None,
            fallback: None,
            errors: Vec::new(),
        };

        for node in &contract.nodes {
            match node {
                Node::VariableDeclaration(variable) => {
                    ir.state_variables.push(process_state_variable(variable))
                }
                Node::Error(error) => ir.errors.push(self.process_error(error)),
                Node::Function(function) => self.process_function_like(&mut ir, function)?,
                other => trace!("ir: skipping member {} of `{}`", other.node_type(), contract.name),
            }
        }
        Ok(ir)
    }

    fn process_function_like(
        &self,
        ir: &mut Contract,
        function: &FunctionDefinition,
    ) -> IrResult<()> {
        match function.kind {
            FunctionKind::Function => ir.functions.push(self.process_function(function)),
            FunctionKind::Constructor => {
                if ir.constructor.is_some() {
                    let id = function.id;
                    return Err(IrError::duplicate_entry_point(&ir.name, "constructor", id));
                }
                ir.constructor = Some(self.process_constructor(function));
            }
            FunctionKind::Receive => {
                if ir.receive.is_some() {
                    return Err(IrError::duplicate_entry_point(&ir.name, "receive", function.id));
                }
                ir.receive = Some(self.process_receive(function));
            }
            FunctionKind::Fallback => {
                if ir.fallback.is_some() {
                    return Err(IrError::duplicate_entry_point(&ir.name, "fallback", function.id));
                }
                ir.fallback = Some(self.process_fallback(function));
            }
        }
        Ok(())
    }

    pub fn process_function(&self, function: &FunctionDefinition) -> Function {
        Function {
            id: function.id,
            name: function.name.clone(),
            visibility: function.visibility,
            state_mutability: function.state_mutability,
            parameters: process_parameters(&function.parameters),
            return_parameters: process_parameters(&function.return_parameters),
            type_description: function.type_description.clone(),
        }
    }

    pub fn process_constructor(&self, function: &FunctionDefinition) -> Constructor {
        Constructor {
            id: function.id,
            state_mutability: function.state_mutability,
            parameters: process_parameters(&function.parameters),
        }
    }

    pub fn process_receive(&self, function: &FunctionDefinition) -> Receive {
        Receive {
            id: function.id,
            name: "receive".to_string(),
            state_mutability: function.state_mutability,
            parameters: process_parameters(&function.parameters),
        }
    }

    pub fn process_fallback(&self, function: &FunctionDefinition) -> Fallback {
        Fallback {
            id: function.id,
            name: "fallback".to_string(),
            state_mutability: function.state_mutability,
            parameters: process_parameters(&function.parameters),
            return_parameters: process_parameters(&function.return_parameters),
        }
    }

    pub fn process_error(&self, error: &ErrorDefinition) -> ErrorDef {
        ErrorDef {
            id: error.id,
            name: error.name.clone(),
            parameters: process_parameters(&error.parameters),
            type_description: error.type_description.clone(),
        }
    }
}

fn process_parameters(list: &ParameterList) -> Vec<Parameter> {
    list.parameters
        .iter()
        .map(|parameter| Parameter {
            id: parameter.id,
            name: parameter.name.clone(),
            type_description: parameter.type_description.clone(),
        })
        .collect()
}

fn process_state_variable(variable: &VariableDeclaration) -> StateVariable {
    StateVariable {
        id: variable.id,
        name: variable.name.clone(),
        visibility: variable.visibility,
        is_constant: variable.is_constant,
        type_description: variable.type_description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use solace_ast::ast::{StateMutability, Visibility};
    use solace_cst::CstNode;

    use super::*;

    fn parameter(type_name: &str, name: &str) -> CstNode {
        CstNode::branch(
            "parameter",
            vec![
                CstNode::leaf("elementary_type_name", type_name).labeled("type_name"),
                CstNode::leaf("identifier", name).labeled("name"),
            ],
        )
    }

    fn parameters(items: Vec<CstNode>) -> CstNode {
        let mut children = vec![CstNode::token("(")];
        children.extend(items);
        children.push(CstNode::token(")"));
        CstNode::branch("parameter_list", children).labeled("parameters")
    }

    fn body() -> CstNode {
        CstNode::branch("block", vec![CstNode::token("{"), CstNode::token("}")]).labeled("body")
    }

    fn unit(members: Vec<CstNode>) -> SourceUnit {
        let mut contract = vec![
            CstNode::token("contract").labeled("kind"),
            CstNode::leaf("identifier", "Vault").labeled("name"),
            CstNode::token("{"),
        ];
        contract.extend(members);
        contract.push(CstNode::token("}"));

        let root = CstNode::branch(
            "source_unit",
            vec![
                CstNode::branch(
                    "pragma_directive",
                    vec![
                        CstNode::token("pragma"),
                        CstNode::leaf("solidity_version", "solidity ^0.8.0"),
                        CstNode::token(";"),
                    ],
                ),
                CstNode::branch("contract_definition", contract),
            ],
        )
        .layout();
        solace_ast::build(&root).unwrap().unit
    }

    fn receive() -> CstNode {
        CstNode::branch(
            "receive_function_definition",
            vec![
                CstNode::token("receive"),
                parameters(Vec::new()),
                CstNode::token("external"),
                CstNode::token("payable"),
                body(),
            ],
        )
    }

    #[test]
    fn test_pragma_version() {
        let root = Builder::new().build(&unit(Vec::new())).unwrap();
        let pragma = &root.pragmas[0];
        assert_eq!(pragma.get_literals(), ["solidity", "^0.8.0"]);
        assert_eq!(pragma.get_text(), "pragma solidity ^0.8.0;");
        assert_eq!(pragma.get_version(), "^0.8.0");
    }

    #[test]
    fn test_entry_points_are_separated() {
        let constructor = CstNode::branch(
            "constructor_definition",
            vec![
                CstNode::token("constructor"),
                parameters(vec![parameter("address", "owner")]),
                body(),
            ],
        );
        let root = Builder::new().build(&unit(vec![constructor, receive()])).unwrap();
        let contract = root.contract("Vault").unwrap();

        assert!(contract.functions.is_empty());
        let constructor = contract.constructor.as_ref().unwrap();
        assert_eq!(constructor.parameters[0].name, "owner");
        assert_eq!(
            constructor.parameters[0].type_description.as_ref().unwrap().type_string,
            "address"
        );
        let receive = contract.receive.as_ref().unwrap();
        assert_eq!(receive.state_mutability, StateMutability::Payable);
        assert!(contract.fallback.is_none());
    }

    #[test]
    fn test_second_receive_fails() {
        let error = Builder::new().build(&unit(vec![receive(), receive()])).unwrap_err();
        assert!(error.to_string().contains("more than one receive"));
    }

    #[test]
    fn test_state_variables_keep_visibility() {
        let variable = CstNode::branch(
            "state_variable_declaration",
            vec![
                CstNode::leaf("elementary_type_name", "uint256").labeled("type_name"),
                CstNode::leaf("visibility", "public").labeled("visibility"),
                CstNode::leaf("identifier", "total").labeled("name"),
                CstNode::token(";"),
            ],
        );
        let root = Builder::new().build(&unit(vec![variable])).unwrap();
        let state = &root.contracts[0].state_variables[0];
        assert_eq!(state.name, "total");
        assert_eq!(state.visibility, Visibility::Public);
        insta::assert_snapshot!(
            serde_json::to_string(&state.type_description).unwrap(),
            @r#"{"type_string":"uint256","type_identifier":"t_uint256"}"#
        );
    }
}
