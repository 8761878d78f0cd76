//! Statement lowering.

use solace_cst::CstNode;

use crate::ast::{
    Body, Node, NodeType, ReturnStatement, RevertStatement, SrcNode, StorageLocation,
    VariableDeclaration, Visibility,
};
use crate::error::{BuildError, BuildResult};
use crate::synth;

use super::context::{AstLoweringCtx, Scope};
use super::expressions::lower_expr;
use super::helpers::{call_arguments, normalized_text, required, significant_children};
use super::types::lower_type_name;

/// Lower a `{ ... }` block. Comments between statements are skipped.
pub fn lower_block(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Body> {
    if node.kind() != "block" {
        return Err(BuildError::unsupported(node));
    }

    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.body.or(scope.function));
    let inner = Scope {
        parent_expr: None,
        var_decl: None,
        ..scope.with_body(id)
    };

    let statements = significant_children(node)
        .map(|statement| lower_statement(ctx, inner, statement))
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(Body {
        id,
        node_type: NodeType::Block,
        src,
        statements,
    })
}

pub fn lower_statement(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
) -> BuildResult<Node> {
    tracing::trace!("lower_statement: kind={}", node.kind());

    match node.kind() {
        "block" => lower_block(ctx, scope, node).map(Node::Body),
        "expression_statement" => {
            let expression = node
                .child_by_field_name("expression")
                .or_else(|| significant_children(node).next())
                .ok_or_else(|| BuildError::missing_field(node, "expression"))?;
            lower_expr(ctx, scope, expression)
        }
        "revert_statement" => lower_revert(ctx, scope, node),
        "return_statement" => lower_return(ctx, scope, node),
        "variable_declaration_statement" => lower_local_variable(ctx, scope, node),
        _ => Err(BuildError::unsupported(node)),
    }
}

fn lower_revert(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());
    let inner = scope.with_parent(id);

    let arguments = call_arguments(node)
        .into_iter()
        .map(|argument| lower_expr(ctx, inner, argument))
        .collect::<BuildResult<Vec<_>>>()?;
    let expression = lower_expr(ctx, inner, required(node, "expression")?)?;

    Ok(Node::Revert(RevertStatement {
        id,
        node_type: NodeType::RevertStatement,
        src,
        arguments,
        expression: Box::new(expression),
        type_description: synth::revert(),
    }))
}

fn lower_return(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());

    let expression = node
        .child_by_field_name("expression")
        .map(|expression| lower_expr(ctx, scope.with_parent(id), expression).map(Box::new))
        .transpose()?;

    Ok(Node::Return(ReturnStatement {
        id,
        node_type: NodeType::ReturnStatement,
        src,
        expression,
    }))
}

/// `uint256 amount = msg.value;` inside a function body. The name is
/// declared in the function scope once the initial value is lowered.
fn lower_local_variable(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
) -> BuildResult<Node> {
    let declaration = required(node, "declaration")?;

    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.body.or(scope.function));
    let inner = scope.with_var_decl(id);

    let storage_location = declaration
        .child_by_field_name("data_location")
        .and_then(|location| StorageLocation::from_keyword(&normalized_text(location)))
        .unwrap_or_default();
    let type_name = lower_type_name(
        ctx,
        inner,
        required(declaration, "type_name")?,
        storage_location,
    )?;
    let name = normalized_text(required(declaration, "name")?);
    let initial_value = node
        .child_by_field_name("initial_value")
        .map(|value| lower_expr(ctx, inner, value).map(Box::new))
        .transpose()?;

    let type_description = type_name.type_description.clone();
    ctx.declare(scope.function, &name, id, type_description.clone());
    if type_description.is_none() {
        ctx.defer(id, "variable_declaration", &scope);
    }

    Ok(Node::VariableDeclaration(VariableDeclaration {
        id,
        node_type: NodeType::VariableDeclaration,
        src,
        name,
        type_name,
        storage_location,
        visibility: Visibility::Internal,
        is_constant: false,
        state_variable: false,
        initial_value,
        type_description,
    }))
}
