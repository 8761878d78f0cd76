//! Parse-tree builders shared by the integration tests.
//!
//! Trees are assembled by hand in the shapes the grammar produces and laid
//! out with [`CstNode::layout`] so spans look like real source.

#![allow(dead_code)]

use solace_cst::CstNode;

pub fn ident(name: &str) -> CstNode {
    CstNode::branch("primary_expression", vec![CstNode::leaf("identifier", name)])
}

pub fn number(text: &str) -> CstNode {
    CstNode::branch("primary_expression", vec![CstNode::leaf("number_literal", text)])
}

pub fn string(text: &str) -> CstNode {
    CstNode::branch(
        "primary_expression",
        vec![CstNode::leaf("string_literal", format!("\"{text}\""))],
    )
}

pub fn hex(text: &str) -> CstNode {
    CstNode::branch("primary_expression", vec![CstNode::leaf("hex_number_literal", text)])
}

pub fn boolean(text: &str) -> CstNode {
    CstNode::branch("primary_expression", vec![CstNode::leaf("boolean_literal", text)])
}

pub fn binary(kind: &str, left: CstNode, operator: &str, right: CstNode) -> CstNode {
    CstNode::branch(
        kind,
        vec![
            left.labeled("left"),
            CstNode::token(operator).labeled("operator"),
            right.labeled("right"),
        ],
    )
}

pub fn assign(left: CstNode, right: CstNode) -> CstNode {
    binary("assignment", left, "=", right)
}

fn argument_list(arguments: Vec<CstNode>) -> CstNode {
    let mut children = vec![CstNode::token("(")];
    for (position, argument) in arguments.into_iter().enumerate() {
        if position > 0 {
            children.push(CstNode::token(","));
        }
        children.push(argument);
    }
    children.push(CstNode::token(")"));
    CstNode::branch("call_argument_list", children).labeled("arguments")
}

pub fn call(callee: CstNode, arguments: Vec<CstNode>) -> CstNode {
    CstNode::branch(
        "function_call",
        vec![callee.labeled("expression"), argument_list(arguments)],
    )
}

pub fn member(expression: CstNode, name: &str) -> CstNode {
    CstNode::branch(
        "member_access",
        vec![
            expression.labeled("expression"),
            CstNode::token("."),
            CstNode::leaf("identifier", name).labeled("member"),
        ],
    )
}

pub fn index(base: CstNode, index: CstNode) -> CstNode {
    CstNode::branch(
        "index_access",
        vec![
            base.labeled("base"),
            CstNode::token("["),
            index.labeled("index"),
            CstNode::token("]"),
        ],
    )
}

/// `base[start:end]`, either bound optional.
pub fn slice(base: CstNode, start: Option<CstNode>, end: Option<CstNode>) -> CstNode {
    let mut children = vec![base.labeled("base"), CstNode::token("[")];
    children.extend(start.map(|start| start.labeled("start")));
    children.push(CstNode::token(":"));
    children.extend(end.map(|end| end.labeled("end")));
    children.push(CstNode::token("]"));
    CstNode::branch("index_range_access", children)
}

pub fn meta_type(type_name: CstNode) -> CstNode {
    CstNode::branch(
        "meta_type",
        vec![
            CstNode::token("type"),
            CstNode::token("("),
            type_name.labeled("type_name"),
            CstNode::token(")"),
        ],
    )
}

pub fn payable(argument: CstNode) -> CstNode {
    CstNode::branch(
        "payable_conversion",
        vec![CstNode::token("payable"), argument_list(vec![argument])],
    )
}

pub fn prefix(operator: &str, operand: CstNode) -> CstNode {
    CstNode::branch(
        "unary_prefix_operation",
        vec![CstNode::token(operator), operand.labeled("operand")],
    )
}

pub fn suffix(operand: CstNode, operator: &str) -> CstNode {
    CstNode::branch(
        "unary_suffix_operation",
        vec![operand.labeled("operand"), CstNode::token(operator)],
    )
}

pub fn new_expr(type_name: CstNode) -> CstNode {
    CstNode::branch(
        "new_expr",
        vec![CstNode::token("new"), type_name.labeled("type_name")],
    )
}

/// `expression{name: value, ...}`
pub fn call_options(expression: CstNode, options: Vec<(&str, CstNode)>) -> CstNode {
    let mut children = vec![expression.labeled("expression"), CstNode::token("{")];
    for (position, (name, value)) in options.into_iter().enumerate() {
        if position > 0 {
            children.push(CstNode::token(","));
        }
        children.push(
            CstNode::branch(
                "call_option",
                vec![
                    CstNode::leaf("identifier", name).labeled("name"),
                    CstNode::token(":"),
                    value.labeled("value"),
                ],
            )
            .labeled("option"),
        );
    }
    children.push(CstNode::token("}"));
    CstNode::branch("function_call_options", children)
}

pub fn tuple(components: Vec<CstNode>) -> CstNode {
    let mut children = vec![CstNode::token("(")];
    for (position, component) in components.into_iter().enumerate() {
        if position > 0 {
            children.push(CstNode::token(","));
        }
        children.push(component.labeled("component"));
    }
    children.push(CstNode::token(")"));
    CstNode::branch("tuple", children)
}

pub fn expression_statement(expression: CstNode) -> CstNode {
    CstNode::branch(
        "expression_statement",
        vec![expression.labeled("expression"), CstNode::token(";")],
    )
}

pub fn ret(expression: CstNode) -> CstNode {
    CstNode::branch(
        "return_statement",
        vec![
            CstNode::token("return"),
            expression.labeled("expression"),
            CstNode::token(";"),
        ],
    )
}

pub fn revert(error: CstNode, arguments: Vec<CstNode>) -> CstNode {
    CstNode::branch(
        "revert_statement",
        vec![
            CstNode::token("revert"),
            error.labeled("expression"),
            argument_list(arguments),
            CstNode::token(";"),
        ],
    )
}

pub fn local(type_name: CstNode, name: &str, value: CstNode) -> CstNode {
    CstNode::branch(
        "variable_declaration_statement",
        vec![
            CstNode::branch(
                "variable_declaration",
                vec![
                    type_name.labeled("type_name"),
                    CstNode::leaf("identifier", name).labeled("name"),
                ],
            )
            .labeled("declaration"),
            CstNode::token("="),
            value.labeled("initial_value"),
            CstNode::token(";"),
        ],
    )
}

pub fn block(statements: Vec<CstNode>) -> CstNode {
    let mut children = vec![CstNode::token("{")];
    children.extend(statements);
    children.push(CstNode::token("}"));
    CstNode::branch("block", children)
}

pub fn elementary(name: &str) -> CstNode {
    CstNode::leaf("elementary_type_name", name)
}

pub fn user_type(name: &str) -> CstNode {
    CstNode::leaf("user_defined_type_name", name)
}

pub fn mapping(key: CstNode, value: CstNode) -> CstNode {
    CstNode::branch(
        "mapping",
        vec![
            CstNode::token("mapping"),
            CstNode::token("("),
            key.labeled("key_type"),
            CstNode::token("=>"),
            value.labeled("value_type"),
            CstNode::token(")"),
        ],
    )
}

pub fn array(base: CstNode) -> CstNode {
    CstNode::branch(
        "array_type_name",
        vec![base.labeled("base"), CstNode::token("["), CstNode::token("]")],
    )
}

pub fn param(type_name: CstNode, name: &str) -> CstNode {
    CstNode::branch(
        "parameter",
        vec![
            type_name.labeled("type_name"),
            CstNode::leaf("identifier", name).labeled("name"),
        ],
    )
}

/// Parameter with an explicit data location, e.g. `bytes calldata payload`.
pub fn param_at(type_name: CstNode, location: &str, name: &str) -> CstNode {
    CstNode::branch(
        "parameter",
        vec![
            type_name.labeled("type_name"),
            CstNode::leaf("data_location", location).labeled("data_location"),
            CstNode::leaf("identifier", name).labeled("name"),
        ],
    )
}

fn parameter_list(parameters: Vec<CstNode>, field: &str) -> CstNode {
    let mut children = vec![CstNode::token("(")];
    for (position, parameter) in parameters.into_iter().enumerate() {
        if position > 0 {
            children.push(CstNode::token(","));
        }
        children.push(parameter);
    }
    children.push(CstNode::token(")"));
    CstNode::branch("parameter_list", children).labeled(field)
}

/// `function name(params) <mutability> returns (returns) { body }`
pub fn function(
    name: &str,
    parameters: Vec<CstNode>,
    mutability: Option<&str>,
    returns: Vec<CstNode>,
    body: Vec<CstNode>,
) -> CstNode {
    let mut children = vec![
        CstNode::token("function"),
        CstNode::leaf("identifier", name).labeled("name"),
        parameter_list(parameters, "parameters"),
        CstNode::leaf("visibility", "public").labeled("visibility"),
    ];
    if let Some(mutability) = mutability {
        children.push(CstNode::leaf("state_mutability", mutability).labeled("state_mutability"));
    }
    if !returns.is_empty() {
        children.push(CstNode::token("returns"));
        children.push(parameter_list(returns, "returns"));
    }
    children.push(block(body).labeled("body"));
    CstNode::branch("function_definition", children)
}

pub fn receive(body: Vec<CstNode>) -> CstNode {
    CstNode::branch(
        "receive_function_definition",
        vec![
            CstNode::token("receive"),
            parameter_list(Vec::new(), "parameters"),
            CstNode::token("external"),
            CstNode::token("payable"),
            block(body).labeled("body"),
        ],
    )
}

pub fn state_var(type_name: CstNode, name: &str) -> CstNode {
    CstNode::branch(
        "state_variable_declaration",
        vec![
            type_name.labeled("type_name"),
            CstNode::leaf("identifier", name).labeled("name"),
            CstNode::token(";"),
        ],
    )
}

pub fn error_def(name: &str, parameters: Vec<CstNode>) -> CstNode {
    CstNode::branch(
        "error_definition",
        vec![
            CstNode::token("error"),
            CstNode::leaf("identifier", name).labeled("name"),
            parameter_list(parameters, "parameters"),
            CstNode::token(";"),
        ],
    )
}

pub fn contract(name: &str, members: Vec<CstNode>) -> CstNode {
    let mut children = vec![
        CstNode::token("contract").labeled("kind"),
        CstNode::leaf("identifier", name).labeled("name"),
        CstNode::token("{"),
    ];
    children.extend(members);
    children.push(CstNode::token("}"));
    CstNode::branch("contract_definition", children)
}

pub fn pragma(version: &str) -> CstNode {
    CstNode::branch(
        "pragma_directive",
        vec![
            CstNode::token("pragma"),
            CstNode::leaf("solidity_version", format!("solidity {version}")),
            CstNode::token(";"),
        ],
    )
}

/// A laid-out source unit.
pub fn source_unit(children: Vec<CstNode>) -> CstNode {
    CstNode::branch("source_unit", children).layout()
}
