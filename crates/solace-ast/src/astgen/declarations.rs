//! Source unit, contract and member lowering.

use solace_core::NodeId;
use solace_cst::CstNode;

use crate::ast::{
    ContractDefinition, ContractKind, ErrorDefinition, FunctionDefinition, FunctionKind, Node,
    NodeType, Parameter, ParameterList, PragmaDirective, SourceUnit, SrcNode, StateMutability,
    StorageLocation, VariableDeclaration, Visibility,
};
use crate::error::{BuildError, BuildResult};
use crate::synth;

use super::context::{AstLoweringCtx, Scope};
use super::expressions::lower_expr;
use super::helpers::{field_text, normalized_text, required, significant_children};
use super::statements::lower_block;
use super::types::lower_type_name;

/// Lower the root of a parse tree.
pub fn lower_source_unit(ctx: &mut AstLoweringCtx, root: &CstNode) -> BuildResult<SourceUnit> {
    if root.kind() != "source_unit" {
        return Err(BuildError::unsupported(root));
    }
    tracing::trace!("lower_source_unit: children={}", root.children().len());

    let id = ctx.fresh_id();
    let scope = Scope::unit(id);

    let nodes = significant_children(root)
        .map(|child| match child.kind() {
            "pragma_directive" => Ok(Node::Pragma(lower_pragma(ctx, id, child))),
            "contract_definition" => lower_contract(ctx, scope, child).map(Node::Contract),
            "error_definition" => lower_error(ctx, scope, child).map(Node::Error),
            _ => Err(BuildError::unsupported(child)),
        })
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(SourceUnit {
        id,
        node_type: NodeType::SourceUnit,
        src: SrcNode::from_cst(root, None),
        nodes,
    })
}

/// `pragma solidity ^0.8.0;`
///
/// The stored text is rebuilt from the literals, so it reads the same
/// however the source spaced the directive.
fn lower_pragma(ctx: &mut AstLoweringCtx, unit: NodeId, node: &CstNode) -> PragmaDirective {
    let text = normalized_text(node);
    let mut words = text.trim_end().trim_end_matches(';').split_whitespace().peekable();
    if words.peek() == Some(&"pragma") {
        words.next();
    }
    let literals: Vec<String> = words.map(str::to_string).collect();

    PragmaDirective {
        id: ctx.fresh_id(),
        node_type: NodeType::PragmaDirective,
        src: SrcNode::from_cst(node, Some(unit)),
        text: format!("pragma {};", literals.join(" ")),
        literals,
    }
}

fn lower_contract(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
) -> BuildResult<ContractDefinition> {
    let id = ctx.fresh_id();
    let name = normalized_text(required(node, "name")?);
    let kind = node
        .child_by_field_name("kind")
        .or_else(|| node.tokens().next())
        .and_then(|keyword| ContractKind::from_keyword(&normalized_text(keyword)))
        .unwrap_or_default();

    let type_description = synth::contract(&name, id);
    ctx.declare(scope.unit, &name, id, Some(type_description.clone()));

    let inner = scope.with_contract(id);
    let nodes = contract_members(node)
        .into_iter()
        .map(|member| lower_member(ctx, inner, member))
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(ContractDefinition {
        id,
        node_type: NodeType::ContractDefinition,
        src: SrcNode::from_cst(node, scope.unit),
        name,
        kind,
        nodes,
        type_description: Some(type_description),
    })
}

/// Members either sit directly under the contract or inside a
/// `contract_body` child.
fn contract_members(node: &CstNode) -> Vec<&CstNode> {
    let mut members = Vec::new();
    for child in significant_children(node) {
        match (child.field(), child.kind()) {
            (Some("name") | Some("kind"), _) => {}
            (_, "contract_body") => members.extend(significant_children(child)),
            _ => members.push(child),
        }
    }
    members
}

fn lower_member(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    tracing::trace!("lower_member: kind={}", node.kind());

    let lowered = match node.kind() {
        "state_variable_declaration" => {
            Node::VariableDeclaration(lower_state_variable(ctx, scope, node)?)
        }
        "function_definition" => {
            Node::Function(lower_function(ctx, scope, node, FunctionKind::Function)?)
        }
        "constructor_definition" => {
            Node::Function(lower_function(ctx, scope, node, FunctionKind::Constructor)?)
        }
        "receive_function_definition" => {
            Node::Function(lower_function(ctx, scope, node, FunctionKind::Receive)?)
        }
        "fallback_function_definition" => {
            Node::Function(lower_function(ctx, scope, node, FunctionKind::Fallback)?)
        }
        "error_definition" => Node::Error(lower_error(ctx, scope, node)?),
        _ => return Err(BuildError::unsupported(node)),
    };
    Ok(lowered)
}

fn lower_state_variable(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
) -> BuildResult<VariableDeclaration> {
    let id = ctx.fresh_id();
    let inner = scope.with_var_decl(id);

    let type_name = lower_type_name(
        ctx,
        inner,
        required(node, "type_name")?,
        StorageLocation::Default,
    )?;
    let name = normalized_text(required(node, "name")?);
    let visibility = field_text(node, "visibility")
        .and_then(|keyword| Visibility::from_keyword(&keyword))
        .unwrap_or_default();
    let is_constant = node.child_by_field_name("constant").is_some() || node.has_token("constant");
    let initial_value = node
        .child_by_field_name("initial_value")
        .map(|value| lower_expr(ctx, inner, value).map(Box::new))
        .transpose()?;

    let type_description = type_name.type_description.clone();
    ctx.declare(scope.contract, &name, id, type_description.clone());
    if type_description.is_none() {
        ctx.defer(id, "variable_declaration", &scope);
    }

    Ok(VariableDeclaration {
        id,
        node_type: NodeType::VariableDeclaration,
        src: SrcNode::from_cst(node, scope.contract),
        name,
        type_name,
        storage_location: StorageLocation::Default,
        visibility,
        is_constant,
        state_variable: true,
        initial_value,
        type_description,
    })
}

fn lower_function(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    kind: FunctionKind,
) -> BuildResult<FunctionDefinition> {
    let id = ctx.fresh_id();
    let inner = scope.with_function(id);

    let name = match kind {
        FunctionKind::Function => normalized_text(required(node, "name")?),
        _ => String::new(),
    };
    let visibility = field_text(node, "visibility")
        .and_then(|keyword| Visibility::from_keyword(&keyword))
        .unwrap_or(match kind {
            FunctionKind::Receive | FunctionKind::Fallback => Visibility::External,
            FunctionKind::Constructor => Visibility::Public,
            FunctionKind::Function => Visibility::default(),
        });
    let state_mutability = field_text(node, "state_mutability")
        .and_then(|keyword| StateMutability::from_keyword(&keyword))
        .unwrap_or(match kind {
            FunctionKind::Receive => StateMutability::Payable,
            _ => StateMutability::default(),
        });

    let parameters = lower_parameter_list(
        ctx,
        inner,
        node.child_by_field_name("parameters"),
        node,
        id,
        Some(id),
    )?;
    let return_parameters =
        lower_parameter_list(ctx, inner, node.child_by_field_name("returns"), node, id, Some(id))?;
    let body = node
        .child_by_field_name("body")
        .map(|body| lower_block(ctx, inner, body))
        .transpose()?;

    let mut function = FunctionDefinition {
        id,
        node_type: NodeType::FunctionDefinition,
        src: SrcNode::from_cst(node, scope.contract),
        kind,
        name,
        visibility,
        state_mutability,
        parameters,
        return_parameters,
        body,
        type_description: None,
    };
    function.type_description = function.synthesize();

    if kind == FunctionKind::Function {
        ctx.declare(scope.contract, &function.name, id, function.type_description.clone());
    }
    if function.type_description.is_none() {
        ctx.defer(id, "function_definition", &scope);
    }
    Ok(function)
}

fn lower_error(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
) -> BuildResult<ErrorDefinition> {
    let id = ctx.fresh_id();
    let name = normalized_text(required(node, "name")?);
    let container = scope.contract.or(scope.unit);

    let parameters = lower_parameter_list(
        ctx,
        scope,
        node.child_by_field_name("parameters"),
        node,
        id,
        None,
    )?;
    let type_description = synth::error(&parameters.descriptions());

    ctx.declare(container, &name, id, type_description.clone());
    if type_description.is_none() {
        ctx.defer(id, "error_definition", &scope);
    }

    Ok(ErrorDefinition {
        id,
        node_type: NodeType::ErrorDefinition,
        src: SrcNode::from_cst(node, container),
        name,
        parameters,
        type_description,
    })
}

/// Lower a parameter list owned by `owner`. An absent list becomes an
/// empty one spanning the owner. Named parameters are declared in
/// `declare_in`.
fn lower_parameter_list(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: Option<&CstNode>,
    owner_node: &CstNode,
    owner: NodeId,
    declare_in: Option<NodeId>,
) -> BuildResult<ParameterList> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node.unwrap_or(owner_node), Some(owner));

    let mut parameters = Vec::new();
    if let Some(node) = node {
        for parameter in significant_children(node) {
            if parameter.kind() != "parameter" {
                return Err(BuildError::unsupported(parameter));
            }
            parameters.push(lower_parameter(ctx, scope, parameter, id, declare_in)?);
        }
    }

    Ok(ParameterList {
        id,
        node_type: NodeType::ParameterList,
        src,
        parameters,
    })
}

fn lower_parameter(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    list: NodeId,
    declare_in: Option<NodeId>,
) -> BuildResult<Parameter> {
    let id = ctx.fresh_id();
    let storage_location = field_text(node, "data_location")
        .and_then(|keyword| StorageLocation::from_keyword(&keyword))
        .unwrap_or_default();
    let inner = Scope {
        var_decl: None,
        ..scope.with_parent(id)
    };

    let type_name = lower_type_name(ctx, inner, required(node, "type_name")?, storage_location)?;
    let name = field_text(node, "name").unwrap_or_default();

    let type_description = type_name.type_description.clone();
    ctx.declare(declare_in, &name, id, type_description.clone());
    if type_description.is_none() {
        ctx.defer(id, "parameter", &scope);
    }

    Ok(Parameter {
        id,
        node_type: NodeType::Parameter,
        src: SrcNode::from_cst(node, Some(list)),
        name,
        type_name,
        storage_location,
        type_description,
    })
}
