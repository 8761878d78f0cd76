//! Expression lowering.
//!
//! [`lower_expr`] is the single entry point for every expression position.
//! The production kinds it understands form a closed set
//! ([`ExpressionKind`]); anything else is reported as an unsupported
//! construct instead of being lowered into a degraded node.

use solace_cst::CstNode;

use crate::ast::{
    Assignment, AstNode, BinaryOperation, FunctionCall, FunctionCallOption, IndexAccess,
    IndexRangeAccess, MemberAccess, MetaType, NewExpression, Node, NodeType, PayableConversion,
    PrimaryExpression, PrimaryKind, SrcNode, StorageLocation, TupleExpression, UnaryOperation,
};
use crate::error::{BuildError, BuildResult};
use crate::resolver::ReferenceKey;
use crate::synth;

use super::context::{AstLoweringCtx, Scope};
use super::helpers::{
    call_arguments, normalized_text, operator_text, required, significant_children,
};
use super::types::lower_type_name;

/// Expression productions the front end understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    AddSub,
    OrderComparison,
    MulDivMod,
    EqualityComparison,
    OrOperation,
    ExpOperation,
    Assignment,
    FunctionCall,
    MemberAccess,
    Primary,
    IndexAccess,
    IndexRangeAccess,
    MetaType,
    PayableConversion,
    UnaryPrefix,
    UnarySuffix,
    New,
    Tuple,
    FunctionCallOptions,
}

impl ExpressionKind {
    pub const ALL: [ExpressionKind; 19] = [
        ExpressionKind::AddSub,
        ExpressionKind::OrderComparison,
        ExpressionKind::MulDivMod,
        ExpressionKind::EqualityComparison,
        ExpressionKind::OrOperation,
        ExpressionKind::ExpOperation,
        ExpressionKind::Assignment,
        ExpressionKind::FunctionCall,
        ExpressionKind::MemberAccess,
        ExpressionKind::Primary,
        ExpressionKind::IndexAccess,
        ExpressionKind::IndexRangeAccess,
        ExpressionKind::MetaType,
        ExpressionKind::PayableConversion,
        ExpressionKind::UnaryPrefix,
        ExpressionKind::UnarySuffix,
        ExpressionKind::New,
        ExpressionKind::Tuple,
        ExpressionKind::FunctionCallOptions,
    ];

    /// Parse-tree production name.
    pub fn production(self) -> &'static str {
        match self {
            ExpressionKind::AddSub => "add_sub_operation",
            ExpressionKind::OrderComparison => "order_comparison",
            ExpressionKind::MulDivMod => "mul_div_mod_operation",
            ExpressionKind::EqualityComparison => "equality_comparison",
            ExpressionKind::OrOperation => "or_operation",
            ExpressionKind::ExpOperation => "exp_operation",
            ExpressionKind::Assignment => "assignment",
            ExpressionKind::FunctionCall => "function_call",
            ExpressionKind::MemberAccess => "member_access",
            ExpressionKind::Primary => "primary_expression",
            ExpressionKind::IndexAccess => "index_access",
            ExpressionKind::IndexRangeAccess => "index_range_access",
            ExpressionKind::MetaType => "meta_type",
            ExpressionKind::PayableConversion => "payable_conversion",
            ExpressionKind::UnaryPrefix => "unary_prefix_operation",
            ExpressionKind::UnarySuffix => "unary_suffix_operation",
            ExpressionKind::New => "new_expr",
            ExpressionKind::Tuple => "tuple",
            ExpressionKind::FunctionCallOptions => "function_call_options",
        }
    }

    pub fn classify(kind: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.production() == kind)
    }
}

/// Lower any expression production.
pub fn lower_expr(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let Some(kind) = ExpressionKind::classify(node.kind()) else {
        return Err(BuildError::unsupported(node));
    };
    tracing::trace!("lower_expr: kind={}", node.kind());

    match kind {
        ExpressionKind::AddSub
        | ExpressionKind::OrderComparison
        | ExpressionKind::MulDivMod
        | ExpressionKind::EqualityComparison
        | ExpressionKind::OrOperation
        | ExpressionKind::ExpOperation => lower_binary(ctx, scope, node),
        ExpressionKind::Assignment => lower_assignment(ctx, scope, node),
        ExpressionKind::FunctionCall => lower_call(ctx, scope, node),
        ExpressionKind::MemberAccess => lower_member_access(ctx, scope, node),
        ExpressionKind::Primary => lower_primary(ctx, scope, node),
        ExpressionKind::IndexAccess => lower_index_access(ctx, scope, node),
        ExpressionKind::IndexRangeAccess => lower_index_range_access(ctx, scope, node),
        ExpressionKind::MetaType => lower_meta_type(ctx, scope, node),
        ExpressionKind::PayableConversion => lower_payable(ctx, scope, node),
        ExpressionKind::UnaryPrefix => lower_unary(ctx, scope, node, true),
        ExpressionKind::UnarySuffix => lower_unary(ctx, scope, node, false),
        ExpressionKind::New => lower_new(ctx, scope, node),
        ExpressionKind::Tuple => lower_tuple(ctx, scope, node),
        ExpressionKind::FunctionCallOptions => lower_call_options(ctx, scope, node),
    }
}

fn lower_boxed(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Box<Node>> {
    lower_expr(ctx, scope, node).map(Box::new)
}

fn lower_all(ctx: &mut AstLoweringCtx, scope: Scope, nodes: &[&CstNode]) -> BuildResult<Vec<Node>> {
    nodes.iter().map(|node| lower_expr(ctx, scope, node)).collect()
}

fn lower_binary(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());
    let inner = scope.with_parent(id);

    let left = lower_boxed(ctx, inner, required(node, "left")?)?;
    let operator = operator_text(node)?;
    let right = lower_boxed(ctx, inner, required(node, "right")?)?;

    let mut operation = BinaryOperation {
        id,
        node_type: NodeType::BinaryOperation,
        src,
        operator,
        left,
        right,
        type_description: None,
    };
    operation.type_description = operation.synthesize();
    // A literal operand already yields a description; the node still waits
    // on the other side.
    if !operation.is_resolved() {
        ctx.defer(id, "binary_operation", &scope);
    }
    Ok(Node::BinaryOperation(operation))
}

fn lower_assignment(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());
    let inner = scope.with_parent(id);

    let left = lower_boxed(ctx, inner, required(node, "left")?)?;
    let operator = operator_text(node)?;
    let right = lower_boxed(ctx, inner, required(node, "right")?)?;

    let mut assignment = Assignment {
        id,
        node_type: NodeType::Assignment,
        src,
        operator,
        referenced_declaration: left.referenced_declaration(),
        left,
        right,
        type_description: None,
    };
    assignment.type_description = assignment.synthesize();
    if !assignment.is_resolved() {
        ctx.defer(id, "assignment", &scope);
    }
    Ok(Node::Assignment(assignment))
}

fn lower_call(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());
    let inner = scope.with_parent(id);

    let expression = lower_boxed(ctx, inner, required(node, "expression")?)?;
    let arguments = lower_all(ctx, inner, &call_arguments(node))?;

    let type_description = synth::call(expression.type_description());
    if type_description.is_none() {
        ctx.defer(id, "function_call", &scope);
    }
    Ok(Node::FunctionCall(FunctionCall {
        id,
        node_type: NodeType::FunctionCall,
        src,
        referenced_declaration: expression.referenced_declaration(),
        expression,
        arguments,
        type_description,
    }))
}

fn lower_call_options(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());
    let inner = scope.with_parent(id);

    let expression = lower_boxed(ctx, inner, required(node, "expression")?)?;
    let mut names = Vec::new();
    let mut options = Vec::new();
    for option in node.children_by_field_name("option") {
        names.push(normalized_text(required(option, "name")?));
        options.push(lower_expr(ctx, inner, required(option, "value")?)?);
    }

    let type_description = expression.type_description().cloned();
    if type_description.is_none() {
        ctx.defer(id, "function_call_option", &scope);
    }
    Ok(Node::FunctionCallOption(FunctionCallOption {
        id,
        node_type: NodeType::FunctionCallOption,
        src,
        expression,
        names,
        options,
        type_description,
    }))
}

fn lower_member_access(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());

    let expression = lower_boxed(ctx, scope.with_parent(id), required(node, "expression")?)?;
    let member_name = normalized_text(required(node, "member")?);

    let mut referenced_declaration = None;
    let mut type_description = synth::member(expression.type_description(), &member_name);
    if type_description.is_none()
        && let Some(reference) = ctx.resolve(id, ReferenceKey::name(member_name.clone()), &scope)
    {
        referenced_declaration = Some(reference.declaration);
        type_description = Some(reference.type_description);
    }

    Ok(Node::MemberAccess(MemberAccess {
        id,
        node_type: NodeType::MemberAccess,
        src,
        member_name,
        expression,
        referenced_declaration,
        type_description,
    }))
}

fn lower_primary(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let value = significant_children(node)
        .next()
        .ok_or_else(|| BuildError::missing_field(node, "value"))?;

    let id = ctx.fresh_id();
    let mut primary = PrimaryExpression {
        id,
        node_type: NodeType::Literal,
        src: SrcNode::from_cst(node, scope.parent_id()),
        kind: PrimaryKind::Number,
        name: String::new(),
        value: String::new(),
        is_pure: true,
        referenced_declaration: None,
        type_description: None,
    };
    let text = normalized_text(value);

    match value.kind() {
        "identifier" => {
            primary.node_type = NodeType::Identifier;
            primary.kind = PrimaryKind::Identifier;
            primary.is_pure = false;
            resolve_identifier(ctx, scope, &mut primary, &text);
            primary.name = text;
        }
        "elementary_type_name" => {
            primary.node_type = NodeType::Identifier;
            primary.kind = PrimaryKind::ElementaryType;
            primary.type_description = Some(synth::type_expression(&text));
            primary.name = text;
        }
        "number_literal" => {
            primary.type_description = Some(synth::number_literal(&text));
            primary.value = text;
        }
        "hex_number_literal" => {
            primary.kind = PrimaryKind::HexNumber;
            primary.type_description = Some(synth::hex_number_literal(&text));
            primary.value = text;
        }
        "string_literal" => {
            primary.kind = PrimaryKind::String;
            primary.type_description = Some(synth::string_literal(&text));
            primary.value = text;
        }
        "boolean_literal" => {
            primary.kind = PrimaryKind::Boolean;
            primary.type_description = Some(synth::boolean());
            primary.value = text;
        }
        _ => return Err(BuildError::unsupported(value)),
    }

    Ok(Node::Primary(primary))
}

/// Magic globals first, then `this`, then declared names. A miss stays
/// pending for the second phase.
fn resolve_identifier(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    primary: &mut PrimaryExpression,
    name: &str,
) {
    if let Some(description) = synth::magic(name) {
        primary.type_description = Some(description);
        return;
    }

    if name == "this"
        && let Some(contract) = scope.contract
    {
        primary.referenced_declaration = Some(contract);
        primary.type_description = ctx
            .resolver()
            .declaration(contract)
            .and_then(|declaration| declaration.type_description.clone());
        return;
    }

    match ctx.resolve(primary.id, ReferenceKey::name(name), &scope) {
        Some(reference) => {
            primary.referenced_declaration = Some(reference.declaration);
            primary.type_description = Some(reference.type_description);
        }
        None => {
            primary.referenced_declaration = ctx
                .resolver()
                .lookup(name, &scope.lookup_chain())
                .map(|declaration| declaration.id);
        }
    }
}

fn lower_index_access(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());
    let inner = scope.with_parent(id);

    let mut access = IndexAccess {
        id,
        node_type: NodeType::IndexAccess,
        src,
        base_expression: None,
        index_expression: None,
        type_descriptions: Vec::new(),
        referenced_declaration: None,
        type_description: None,
    };

    if let Some(base) = node.child_by_field_name("base") {
        let base = lower_boxed(ctx, inner, base)?;
        access.type_descriptions.push(base.type_description().cloned());
        access.base_expression = Some(base);
    }

    if let Some(index) = node.child_by_field_name("index") {
        let index = lower_boxed(ctx, inner, index)?;
        access.type_descriptions = vec![index.type_description().cloned()];
        access.index_expression = Some(index);
    }

    let unresolved = access.type_descriptions.iter().any(Option::is_none);
    let key = ReferenceKey::synthetic("index_access", id);
    if unresolved
        && let Some(reference) = ctx.resolve(id, key, &scope)
    {
        access.referenced_declaration = Some(reference.declaration);
    }

    access.type_description = Some(synth::index_access(&access.type_descriptions));
    Ok(Node::IndexAccess(access))
}

fn lower_index_range_access(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());
    let inner = scope.with_parent(id);

    let base_expression = lower_boxed(ctx, inner, required(node, "base")?)?;
    let start_expression = node
        .child_by_field_name("start")
        .map(|start| lower_boxed(ctx, inner, start))
        .transpose()?;
    let end_expression = node
        .child_by_field_name("end")
        .map(|end| lower_boxed(ctx, inner, end))
        .transpose()?;

    let type_description = synth::slice(base_expression.type_description());
    if type_description.is_none() {
        ctx.defer(id, "index_range_access", &scope);
    }
    Ok(Node::IndexRangeAccess(IndexRangeAccess {
        id,
        node_type: NodeType::IndexRangeAccess,
        src,
        base_expression,
        start_expression,
        end_expression,
        type_description,
    }))
}

fn lower_meta_type(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());

    let type_name = lower_type_name(
        ctx,
        scope.with_parent(id),
        required(node, "type_name")?,
        StorageLocation::Default,
    )?;

    let type_description = synth::meta_type(type_name.type_description.as_ref());
    if type_description.is_none() {
        ctx.defer(id, "meta_type", &scope);
    }
    Ok(Node::MetaType(MetaType {
        id,
        node_type: NodeType::MetaType,
        src,
        type_name,
        type_description,
    }))
}

fn lower_payable(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());
    let arguments = lower_all(ctx, scope.with_parent(id), &call_arguments(node))?;

    Ok(Node::PayableConversion(PayableConversion {
        id,
        node_type: NodeType::PayableConversion,
        src,
        arguments,
        type_description: Some(synth::payable()),
    }))
}

fn lower_unary(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    prefix: bool,
) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());

    let operator = operator_text(node)?;
    let sub_expression = lower_boxed(ctx, scope.with_parent(id), required(node, "operand")?)?;

    let type_description = synth::unary(&operator, sub_expression.type_description());
    if type_description.is_none() {
        ctx.defer(id, "unary_operation", &scope);
    }
    Ok(Node::UnaryOperation(UnaryOperation {
        id,
        node_type: NodeType::UnaryOperation,
        src,
        operator,
        prefix,
        sub_expression,
        type_description,
    }))
}

fn lower_new(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());

    let type_name = lower_type_name(
        ctx,
        scope.with_parent(id),
        required(node, "type_name")?,
        StorageLocation::Memory,
    )?;

    let type_description = type_name.type_description.clone();
    if type_description.is_none() {
        ctx.defer(id, "new_expression", &scope);
    }
    Ok(Node::NewExpression(NewExpression {
        id,
        node_type: NodeType::NewExpression,
        src,
        type_name,
        type_description,
    }))
}

fn lower_tuple(ctx: &mut AstLoweringCtx, scope: Scope, node: &CstNode) -> BuildResult<Node> {
    let id = ctx.fresh_id();
    let src = SrcNode::from_cst(node, scope.parent_id());

    let components: Vec<&CstNode> = node.children_by_field_name("component").collect();
    let components = lower_all(ctx, scope.with_parent(id), &components)?;

    let mut tuple = TupleExpression {
        id,
        node_type: NodeType::TupleExpression,
        src,
        is_constant: false,
        is_pure: false,
        components,
        referenced_declaration: None,
        type_description: None,
    };
    tuple.is_pure = tuple.has_pure_component();

    if tuple.components.iter().any(|component| component.type_description().is_none())
        && let Some(reference) = ctx.resolve(id, ReferenceKey::synthetic("tuple", id), &scope)
    {
        tuple.referenced_declaration = Some(reference.declaration);
    }
    tuple.type_description = Some(tuple.synthesize());
    Ok(Node::Tuple(tuple))
}

#[cfg(test)]
mod tests {
    use solace_core::{NodeId, TypeDescription};
    use solace_cst::CstNode;

    use super::*;

    fn identifier(name: &str) -> CstNode {
        CstNode::branch("primary_expression", vec![CstNode::leaf("identifier", name)])
    }

    fn number(text: &str) -> CstNode {
        CstNode::branch("primary_expression", vec![CstNode::leaf("number_literal", text)])
    }

    fn function_scope(ctx: &mut AstLoweringCtx) -> Scope {
        let unit = ctx.fresh_id();
        let contract = ctx.fresh_id();
        let function = ctx.fresh_id();
        Scope::unit(unit).with_contract(contract).with_function(function)
    }

    #[test]
    fn test_classify_covers_closed_set() {
        for kind in ExpressionKind::ALL {
            assert_eq!(ExpressionKind::classify(kind.production()), Some(kind));
        }
        assert_eq!(ExpressionKind::classify("inline_array_expression"), None);
    }

    #[test]
    fn test_unknown_production_is_fatal() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch("inline_array_expression", vec![number("1")]).layout();

        let error = lower_expr(&mut ctx, scope, &node).unwrap_err();
        assert!(error.is_unsupported_construct());
        assert_eq!(
            error.to_string(),
            "unsupported construct `inline_array_expression` at 1:0"
        );
    }

    #[test]
    fn test_binary_ids_follow_construction_order() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "add_sub_operation",
            vec![
                number("1").labeled("left"),
                CstNode::token("+").labeled("operator"),
                number("2").labeled("right"),
            ],
        )
        .layout();

        let Node::BinaryOperation(operation) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a binary operation");
        };
        assert_eq!(operation.operator, "+");
        assert!(operation.left.id() > operation.id);
        assert!(operation.right.id() > operation.left.id());
        assert_eq!(operation.left.src().parent_index, Some(operation.id));
        assert_eq!(operation.src.parent_index, scope.function);
        assert_eq!(
            operation.type_description.unwrap().type_identifier,
            "t_rational_1_by_1"
        );
    }

    #[test]
    fn test_identifier_resolves_declared_name() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let declaration = NodeId::from_raw(90);
        ctx.declare(scope.contract, "total", declaration, Some(synth::uint256()));

        let node = identifier("total").layout();
        let Node::Primary(primary) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a primary expression");
        };
        assert_eq!(primary.node_type, NodeType::Identifier);
        assert_eq!(primary.referenced_declaration, Some(declaration));
        assert_eq!(primary.type_description, Some(synth::uint256()));
        assert!(!primary.is_pure);
    }

    #[test]
    fn test_unknown_identifier_is_pending() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);

        let node = identifier("later").layout();
        let primary = lower_expr(&mut ctx, scope, &node).unwrap();
        assert!(primary.type_description().is_none());
        assert!(ctx.resolver().is_pending(primary.id()));
    }

    #[test]
    fn test_tuple_with_literal_is_pure() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "tuple",
            vec![
                CstNode::token("("),
                number("1").labeled("component"),
                CstNode::token(","),
                identifier("msg").labeled("component"),
                CstNode::token(")"),
            ],
        )
        .layout();

        let Node::Tuple(tuple) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a tuple");
        };
        assert!(tuple.is_pure);
        assert_eq!(tuple.components.len(), 2);
        assert_eq!(
            tuple.type_description.unwrap().type_string,
            "tuple(int_const 1,msg)"
        );
    }

    #[test]
    fn test_index_access_prefers_index_description() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        ctx.declare(
            scope.contract,
            "balances",
            NodeId::from_raw(70),
            Some(synth::mapping(Some(&synth::address()), Some(&synth::uint256())).unwrap()),
        );
        let node = CstNode::branch(
            "index_access",
            vec![
                identifier("balances").labeled("base"),
                CstNode::token("["),
                identifier("msg").labeled("index"),
                CstNode::token("]"),
            ],
        )
        .layout();

        let Node::IndexAccess(access) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected an index access");
        };
        assert_eq!(access.type_descriptions.len(), 1);
        let description = access.type_description.unwrap();
        assert_eq!(description.type_string, "index[msg]");
        assert_eq!(description.type_identifier, "t_[_[$_t_magic_message]$");
        assert!(!ctx.resolver().is_pending(access.id));
    }

    #[test]
    fn test_index_access_with_pending_child_defers() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "index_access",
            vec![
                identifier("entries").labeled("base"),
                CstNode::token("["),
                identifier("cursor").labeled("index"),
                CstNode::token("]"),
            ],
        )
        .layout();

        let access = lower_expr(&mut ctx, scope, &node).unwrap();
        assert!(ctx.resolver().is_pending(access.id()));
        assert_eq!(ctx.resolver().pending_count(), 3);
        assert_eq!(
            access.type_description().unwrap().type_identifier,
            "t_[_[$_t_unknown]$"
        );
    }

    #[test]
    fn test_refresh_keeps_pending_index_open() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let entries = synth::array(Some(&synth::uint256()), None, StorageLocation::Default);
        ctx.declare(scope.contract, "entries", NodeId::from_raw(70), entries);
        let node = CstNode::branch(
            "index_access",
            vec![
                identifier("entries").labeled("base"),
                CstNode::token("["),
                identifier("cursor").labeled("index"),
                CstNode::token("]"),
            ],
        )
        .layout();

        let Node::IndexAccess(mut access) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected an index access");
        };
        assert_eq!(access.type_descriptions, vec![None]);

        access.refresh_descriptions();
        assert_eq!(access.type_descriptions, vec![None]);
        assert!(!access.set_reference_descriptor(NodeId::from_raw(70), &synth::uint256()));
        assert!(!access.is_resolved());
    }

    #[test]
    fn test_index_access_with_resolved_index_does_not_defer() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "index_access",
            vec![
                identifier("entries").labeled("base"),
                CstNode::token("["),
                number("0").labeled("index"),
                CstNode::token("]"),
            ],
        )
        .layout();

        let access = lower_expr(&mut ctx, scope, &node).unwrap();
        assert!(!ctx.resolver().is_pending(access.id()));
        assert_eq!(ctx.resolver().pending_count(), 1);
    }

    #[test]
    fn test_member_access_on_msg() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "member_access",
            vec![
                identifier("msg").labeled("expression"),
                CstNode::token("."),
                CstNode::leaf("identifier", "sender").labeled("member"),
            ],
        )
        .layout();

        let Node::MemberAccess(access) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a member access");
        };
        assert_eq!(access.member_name, "sender");
        assert_eq!(access.type_description, Some(synth::address()));
    }

    #[test]
    fn test_type_conversion_call() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "function_call",
            vec![
                CstNode::branch(
                    "primary_expression",
                    vec![CstNode::leaf("elementary_type_name", "uint")],
                )
                .labeled("expression"),
                CstNode::branch(
                    "call_argument_list",
                    vec![CstNode::token("("), number("7"), CstNode::token(")")],
                )
                .labeled("arguments"),
            ],
        )
        .layout();

        let Node::FunctionCall(call) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(call.arguments.len(), 1);
        assert_eq!(call.type_description, Some(synth::uint256()));
    }

    fn hex(text: &str) -> CstNode {
        CstNode::branch("primary_expression", vec![CstNode::leaf("hex_number_literal", text)])
    }

    fn boolean(text: &str) -> CstNode {
        CstNode::branch("primary_expression", vec![CstNode::leaf("boolean_literal", text)])
    }

    fn operation(kind: &str, left: CstNode, operator: &str, right: CstNode) -> CstNode {
        CstNode::branch(
            kind,
            vec![
                left.labeled("left"),
                CstNode::token(operator).labeled("operator"),
                right.labeled("right"),
            ],
        )
    }

    #[test]
    fn test_binary_with_pending_operand_defers() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = operation("add_sub_operation", identifier("total"), "+", number("1")).layout();

        let Node::BinaryOperation(operation) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a binary operation");
        };
        assert_eq!(
            operation.type_description.as_ref().unwrap().type_string,
            "int_const 1"
        );
        assert!(!operation.is_resolved());
        assert!(ctx.resolver().is_pending(operation.id));
    }

    #[test]
    fn test_assignment_with_pending_target_defers() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = operation("assignment", identifier("total"), "=", number("5")).layout();

        let assignment = lower_expr(&mut ctx, scope, &node).unwrap();
        assert!(!assignment.is_resolved());
        assert!(ctx.resolver().is_pending(assignment.id()));
    }

    #[test]
    fn test_exponent_and_or_operators() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        ctx.declare(scope.contract, "base", NodeId::from_raw(80), Some(synth::uint256()));

        let node = operation("exp_operation", identifier("base"), "**", number("2")).layout();
        let Node::BinaryOperation(power) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a binary operation");
        };
        assert_eq!(power.operator, "**");
        assert_eq!(power.type_description, Some(synth::uint256()));
        assert!(!ctx.resolver().is_pending(power.id));

        let node = operation("or_operation", boolean("true"), "||", identifier("later")).layout();
        let Node::BinaryOperation(either) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a binary operation");
        };
        assert_eq!(either.operator, "||");
        assert_eq!(either.type_description, Some(synth::boolean()));
        // The right operand is still open, so the node waits on it.
        assert!(ctx.resolver().is_pending(either.id));
    }

    #[test]
    fn test_hex_and_boolean_literals() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);

        let Node::Primary(value) = lower_expr(&mut ctx, scope, &hex("0xff").layout()).unwrap()
        else {
            panic!("expected a primary expression");
        };
        assert_eq!(value.kind, PrimaryKind::HexNumber);
        assert_eq!(value.node_type, NodeType::Literal);
        assert_eq!(value.value, "0xff");
        assert!(value.is_pure);
        assert_eq!(
            value.type_description,
            Some(TypeDescription::new("int_const 255", "t_rational_255_by_1"))
        );

        let Node::Primary(flag) = lower_expr(&mut ctx, scope, &boolean("false").layout()).unwrap()
        else {
            panic!("expected a primary expression");
        };
        assert_eq!(flag.kind, PrimaryKind::Boolean);
        assert_eq!(flag.value, "false");
        assert_eq!(flag.type_description, Some(synth::boolean()));
        assert_eq!(ctx.resolver().pending_count(), 0);
    }

    #[test]
    fn test_unary_prefix_and_suffix() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        ctx.declare(scope.function, "counter", NodeId::from_raw(81), Some(synth::uint256()));

        let node = CstNode::branch(
            "unary_prefix_operation",
            vec![CstNode::token("!"), identifier("ready").labeled("operand")],
        )
        .layout();
        let Node::UnaryOperation(not) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a unary operation");
        };
        assert!(not.prefix);
        assert_eq!(not.operator, "!");
        assert_eq!(not.type_description, Some(synth::boolean()));
        assert_eq!(not.sub_expression.src().parent_index, Some(not.id));

        let node = CstNode::branch(
            "unary_suffix_operation",
            vec![identifier("counter").labeled("operand"), CstNode::token("++")],
        )
        .layout();
        let Node::UnaryOperation(increment) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a unary operation");
        };
        assert!(!increment.prefix);
        assert_eq!(increment.operator, "++");
        assert_eq!(increment.type_description, Some(synth::uint256()));
        assert!(!ctx.resolver().is_pending(increment.id));

        let node = CstNode::branch(
            "unary_prefix_operation",
            vec![CstNode::token("-"), identifier("later").labeled("operand")],
        )
        .layout();
        let negated = lower_expr(&mut ctx, scope, &node).unwrap();
        assert!(negated.type_description().is_none());
        assert!(ctx.resolver().is_pending(negated.id()));
    }

    #[test]
    fn test_index_range_access_slices_base() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let payload = synth::elementary("bytes", StorageLocation::Calldata);
        ctx.declare(scope.function, "payload", NodeId::from_raw(82), Some(payload));

        let node = CstNode::branch(
            "index_range_access",
            vec![
                identifier("payload").labeled("base"),
                CstNode::token("["),
                number("4").labeled("start"),
                CstNode::token(":"),
                CstNode::token("]"),
            ],
        )
        .layout();
        let Node::IndexRangeAccess(slice) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected an index range access");
        };
        assert!(slice.start_expression.is_some());
        assert!(slice.end_expression.is_none());
        assert_eq!(
            slice.type_description,
            Some(TypeDescription::new("bytes calldata slice", "t_bytes_calldata_ptr_slice"))
        );
        assert!(!ctx.resolver().is_pending(slice.id));

        let node = CstNode::branch(
            "index_range_access",
            vec![
                identifier("later").labeled("base"),
                CstNode::token("["),
                CstNode::token(":"),
                number("2").labeled("end"),
                CstNode::token("]"),
            ],
        )
        .layout();
        let pending = lower_expr(&mut ctx, scope, &node).unwrap();
        assert!(pending.type_description().is_none());
        assert!(ctx.resolver().is_pending(pending.id()));
    }

    #[test]
    fn test_meta_type_of_contract() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let token = NodeId::from_raw(40);
        ctx.declare(scope.unit, "Token", token, Some(synth::contract("Token", token)));

        let node = CstNode::branch(
            "meta_type",
            vec![
                CstNode::token("type"),
                CstNode::token("("),
                CstNode::leaf("user_defined_type_name", "Token").labeled("type_name"),
                CstNode::token(")"),
            ],
        )
        .layout();
        let Node::MetaType(meta) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a meta type");
        };
        assert_eq!(meta.type_name.referenced_declaration, Some(token));
        assert_eq!(
            meta.type_description,
            Some(TypeDescription::new(
                "type(contract Token)",
                "t_magic_meta_type_t_contract$_Token_$40"
            ))
        );
    }

    #[test]
    fn test_payable_conversion() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "payable_conversion",
            vec![
                CstNode::token("payable"),
                CstNode::branch(
                    "call_argument_list",
                    vec![
                        CstNode::token("("),
                        CstNode::branch(
                            "member_access",
                            vec![
                                identifier("msg").labeled("expression"),
                                CstNode::token("."),
                                CstNode::leaf("identifier", "sender").labeled("member"),
                            ],
                        ),
                        CstNode::token(")"),
                    ],
                )
                .labeled("arguments"),
            ],
        )
        .layout();
        let Node::PayableConversion(conversion) = lower_expr(&mut ctx, scope, &node).unwrap()
        else {
            panic!("expected a payable conversion");
        };
        assert_eq!(conversion.arguments.len(), 1);
        assert_eq!(
            conversion.arguments[0].type_description(),
            Some(&synth::address())
        );
        assert_eq!(
            conversion.type_description,
            Some(TypeDescription::new("address payable", "t_address_payable"))
        );
    }

    #[test]
    fn test_new_expression() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "new_expr",
            vec![
                CstNode::token("new"),
                CstNode::branch(
                    "array_type_name",
                    vec![
                        CstNode::leaf("elementary_type_name", "uint256").labeled("base"),
                        CstNode::token("["),
                        CstNode::token("]"),
                    ],
                )
                .labeled("type_name"),
            ],
        )
        .layout();
        let Node::NewExpression(array) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected a new expression");
        };
        assert_eq!(array.type_name.storage_location, StorageLocation::Memory);
        assert_eq!(
            array.type_description,
            Some(TypeDescription::new(
                "uint256[] memory",
                "t_array$_t_uint256_$dyn_memory_ptr"
            ))
        );

        let node = CstNode::branch(
            "new_expr",
            vec![
                CstNode::token("new"),
                CstNode::leaf("user_defined_type_name", "Vault").labeled("type_name"),
            ],
        )
        .layout();
        let pending = lower_expr(&mut ctx, scope, &node).unwrap();
        assert!(pending.type_description().is_none());
        assert!(ctx.resolver().is_pending(pending.id()));
    }

    #[test]
    fn test_call_options_take_the_callee_type() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        ctx.declare(scope.function, "who", NodeId::from_raw(83), Some(synth::payable()));

        let node = CstNode::branch(
            "function_call_options",
            vec![
                CstNode::branch(
                    "member_access",
                    vec![
                        identifier("who").labeled("expression"),
                        CstNode::token("."),
                        CstNode::leaf("identifier", "call").labeled("member"),
                    ],
                )
                .labeled("expression"),
                CstNode::token("{"),
                CstNode::branch(
                    "call_option",
                    vec![
                        CstNode::leaf("identifier", "value").labeled("name"),
                        CstNode::token(":"),
                        number("1").labeled("value"),
                    ],
                )
                .labeled("option"),
                CstNode::token("}"),
            ],
        )
        .layout();
        let Node::FunctionCallOption(options) = lower_expr(&mut ctx, scope, &node).unwrap() else {
            panic!("expected function call options");
        };
        assert_eq!(options.names, ["value"]);
        assert_eq!(options.options.len(), 1);
        assert_eq!(options.options[0].src().parent_index, Some(options.id));
        assert_eq!(
            options.type_description.as_ref().unwrap().type_string,
            "function (bytes memory) payable returns (bool,bytes memory)"
        );
        assert_eq!(options.type_description.as_ref(), options.expression.type_description());
        assert!(!ctx.resolver().is_pending(options.id));
    }

    #[test]
    fn test_unsupported_literal_kind() {
        let mut ctx = AstLoweringCtx::new();
        let scope = function_scope(&mut ctx);
        let node = CstNode::branch(
            "primary_expression",
            vec![CstNode::leaf("unicode_string_literal", "unicode\"x\"")],
        )
        .layout();

        let error = lower_expr(&mut ctx, scope, &node).unwrap_err();
        assert!(error.is_unsupported_construct());
    }
}
