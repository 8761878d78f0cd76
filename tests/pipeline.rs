use solace::pipeline::{self, BuildOptions, Emit};
use solace::PipelineErrorKind;
use solace_ast::{AstNode, Node};
use solace_cst::CstNode;
use tempfile::TempDir;

fn parameter(type_name: &str, name: &str) -> CstNode {
    CstNode::branch(
        "parameter",
        vec![
            CstNode::leaf("elementary_type_name", type_name).labeled("type_name"),
            CstNode::leaf("identifier", name).labeled("name"),
        ],
    )
}

fn parameter_list(field: &str, parameters: Vec<CstNode>) -> CstNode {
    let mut children = vec![CstNode::token("(")];
    children.extend(parameters);
    children.push(CstNode::token(")"));
    CstNode::branch("parameter_list", children).labeled(field)
}

/// `contract Wallet { function balance() external view returns (uint256 value) { return stored; } uint256 stored; receive() external payable {} }`
fn wallet() -> CstNode {
    let function = CstNode::branch(
        "function_definition",
        vec![
            CstNode::token("function"),
            CstNode::leaf("identifier", "balance").labeled("name"),
            parameter_list("parameters", Vec::new()),
            CstNode::leaf("visibility", "external").labeled("visibility"),
            CstNode::leaf("state_mutability", "view").labeled("state_mutability"),
            CstNode::token("returns"),
            parameter_list("returns", vec![parameter("uint256", "value")]),
            CstNode::branch(
                "block",
                vec![
                    CstNode::token("{"),
                    CstNode::branch(
                        "return_statement",
                        vec![
                            CstNode::token("return"),
                            CstNode::branch(
                                "primary_expression",
                                vec![CstNode::leaf("identifier", "stored")],
                            )
                            .labeled("expression"),
                            CstNode::token(";"),
                        ],
                    ),
                    CstNode::token("}"),
                ],
            )
            .labeled("body"),
        ],
    );
    let state = CstNode::branch(
        "state_variable_declaration",
        vec![
            CstNode::leaf("elementary_type_name", "uint256").labeled("type_name"),
            CstNode::leaf("identifier", "stored").labeled("name"),
            CstNode::token(";"),
        ],
    );
    let receive = CstNode::branch(
        "receive_function_definition",
        vec![
            CstNode::token("receive"),
            parameter_list("parameters", Vec::new()),
            CstNode::token("external"),
            CstNode::token("payable"),
            CstNode::branch("block", vec![CstNode::token("{"), CstNode::token("}")])
                .labeled("body"),
        ],
    );

    CstNode::branch(
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
            CstNode::branch(
                "contract_definition",
                vec![
                    CstNode::token("contract").labeled("kind"),
                    CstNode::leaf("identifier", "Wallet").labeled("name"),
                    CstNode::token("{"),
                    function,
                    state,
                    receive,
                    CstNode::token("}"),
                ],
            ),
        ],
    )
    .layout()
}

fn write_tree(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("wallet.cst.json");
    std::fs::write(&path, serde_json::to_vec(&wallet()).unwrap()).unwrap();
    path
}

#[test]
fn test_envelope_written_to_disk_decodes() {
    let dir = TempDir::new().unwrap();
    let root = pipeline::load_parse_tree(&write_tree(&dir)).unwrap();
    let built = pipeline::build(&root, &BuildOptions::default()).unwrap();
    assert!(built.diagnostics.is_empty());

    let out = dir.path().join("wallet.ast.msgpack");
    pipeline::write(&out, &pipeline::emit(&built, Emit::Envelope).unwrap()).unwrap();

    let decoded = pipeline::decode(&pipeline::read(&out).unwrap()).unwrap();
    assert_eq!(decoded, Node::SourceUnit(built.unit.clone()));
}

#[test]
fn test_json_document_decodes() {
    let dir = TempDir::new().unwrap();
    let root = pipeline::load_parse_tree(&write_tree(&dir)).unwrap();
    let built = pipeline::build(&root, &BuildOptions::default()).unwrap();

    let bytes = pipeline::emit(&built, Emit::Json).unwrap();
    let decoded = pipeline::decode(&bytes).unwrap();
    assert_eq!(decoded.id(), built.unit.id);
    assert_eq!(decoded.children().len(), 2);
}

#[test]
fn test_envelope_refused_without_second_phase() {
    let options = BuildOptions {
        resolve_forward_references: false,
        emit: Emit::Envelope,
    };
    let built = pipeline::build(&wallet(), &options).unwrap();

    let error = pipeline::emit(&built, options.emit).unwrap_err();
    assert!(matches!(error.kind(), PipelineErrorKind::Codec(_)));
}

#[test]
fn test_abi_of_wallet() {
    let built = pipeline::build(&wallet(), &BuildOptions::default()).unwrap();
    let abi = pipeline::abi(&built, Some("Wallet")).unwrap();

    insta::assert_snapshot!(serde_json::to_string(&abi["Wallet"]).unwrap(), @r#"[{"inputs":[],"outputs":[{"name":"value","type":"uint256","internalType":"uint256"}],"name":"balance","type":"function","stateMutability":"view"},{"inputs":[],"outputs":[],"name":"","type":"receive","stateMutability":"payable"}]"#);
}

#[test]
fn test_abi_of_unknown_contract() {
    let built = pipeline::build(&wallet(), &BuildOptions::default()).unwrap();

    let error = pipeline::abi(&built, Some("Missing")).unwrap_err();
    assert_eq!(error.to_string(), "no contract named `Missing`");
}

#[test]
fn test_ir_emit_carries_pragma_version() {
    let built = pipeline::build(&wallet(), &BuildOptions::default()).unwrap();

    let ir = pipeline::build_ir(&built).unwrap();
    assert_eq!(ir.pragmas[0].get_version(), "^0.8.0");
    let bytes = pipeline::emit(&built, Emit::Ir).unwrap();
    assert!(String::from_utf8(bytes).unwrap().contains("\"pragma solidity ^0.8.0;\""));
}

#[test]
fn test_missing_tree_file() {
    let dir = TempDir::new().unwrap();
    let error = pipeline::load_parse_tree(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(error.kind(), PipelineErrorKind::Io { .. }));
}
