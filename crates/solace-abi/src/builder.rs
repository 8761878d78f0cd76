use solace_ast::ast::{StateMutability, Visibility};
use solace_ir::{Constructor, Contract, ErrorDef, Fallback, Function, Parameter, Receive};
use tracing::{debug, trace};

use crate::errors::{AbiError, AbiResult};
use crate::method::{Method, MethodIO};

/// Produces ABI descriptors from IR entries.
#[derive(Debug, Default)]
pub struct Builder;

impl Builder {
    pub fn new() -> Self {
        Self
    }

    /// All ABI entries of a contract: constructor, externally visible
    /// functions, receive, fallback, then errors.
    pub fn build_contract(&self, contract: &Contract) -> AbiResult<Vec<Method>> {
        let mut methods = Vec::new();
        if let Some(constructor) = &contract.constructor {
            methods.push(self.process_constructor(constructor)?);
        }
        for function in &contract.functions {
            if matches!(function.visibility, Visibility::Public | Visibility::External) {
                methods.push(self.process_function(function)?);
            } else {
                trace!("abi: skipping {:?} function `{}`", function.visibility, function.name);
            }
        }
        if let Some(receive) = &contract.receive {
            methods.push(self.process_receive(receive)?);
        }
        if let Some(fallback) = &contract.fallback {
            methods.push(self.process_fallback(fallback)?);
        }
        for error in &contract.errors {
            methods.push(self.process_error(error)?);
        }
        debug!("abi: `{}` has {} entries", contract.name, methods.len());
        Ok(methods)
    }

    pub fn build_contract_json(&self, contract: &Contract) -> AbiResult<String> {
        let methods = self.build_contract(contract)?;
        serde_json::to_string_pretty(&methods).map_err(AbiError::serialize)
    }

    pub fn process_function(&self, function: &Function) -> AbiResult<Method> {
        Ok(Method {
            inputs: method_io(&function.name, &function.parameters)?,
            outputs: method_io(&function.name, &function.return_parameters)?,
            name: function.name.clone(),
            r#type: "function".to_string(),
            state_mutability: function.state_mutability.to_string(),
        })
    }

    pub fn process_constructor(&self, constructor: &Constructor) -> AbiResult<Method> {
        Ok(Method {
            inputs: method_io("constructor", &constructor.parameters)?,
            outputs: Vec::new(),
            name: String::new(),
            r#type: "constructor".to_string(),
            state_mutability: constructor.state_mutability.to_string(),
        })
    }

    /// Receive entries are always payable and unnamed.
    pub fn process_receive(&self, receive: &Receive) -> AbiResult<Method> {
        Ok(Method {
            inputs: method_io(&receive.name, &receive.parameters)?,
            outputs: Vec::new(),
            name: String::new(),
            r#type: "receive".to_string(),
            state_mutability: StateMutability::Payable.to_string(),
        })
    }

    pub fn process_fallback(&self, fallback: &Fallback) -> AbiResult<Method> {
        Ok(Method {
            inputs: method_io(&fallback.name, &fallback.parameters)?,
            outputs: method_io(&fallback.name, &fallback.return_parameters)?,
            name: String::new(),
            r#type: "fallback".to_string(),
            state_mutability: fallback.state_mutability.to_string(),
        })
    }

    pub fn process_error(&self, error: &ErrorDef) -> AbiResult<Method> {
        Ok(Method {
            inputs: method_io(&error.name, &error.parameters)?,
            outputs: Vec::new(),
            name: error.name.clone(),
            r#type: "error".to_string(),
            state_mutability: String::new(),
        })
    }
}

fn method_io(method: &str, parameters: &[Parameter]) -> AbiResult<Vec<MethodIO>> {
    parameters
        .iter()
        .enumerate()
        .map(|(position, parameter)| {
            let description = parameter
                .type_description
                .as_ref()
                .ok_or_else(|| AbiError::untyped_parameter(method, &parameter.name, position))?;
            Ok(MethodIO::new(parameter.name.clone(), description))
        })
        .collect()
}
