use serde::{Deserialize, Serialize};

/// Discriminator identifying the concrete variant behind a serialized node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    SourceUnit,
    PragmaDirective,
    ContractDefinition,
    VariableDeclaration,
    FunctionDefinition,
    ParameterList,
    Parameter,
    ErrorDefinition,
    TypeName,
    Block,
    RevertStatement,
    ReturnStatement,
    BinaryOperation,
    Assignment,
    FunctionCall,
    FunctionCallOption,
    MemberAccess,
    Identifier,
    Literal,
    IndexAccess,
    IndexRangeAccess,
    MetaType,
    PayableConversion,
    UnaryOperation,
    NewExpression,
    TupleExpression,
}

impl NodeType {
    pub const ALL: [NodeType; 26] = [
        NodeType::SourceUnit,
        NodeType::PragmaDirective,
        NodeType::ContractDefinition,
        NodeType::VariableDeclaration,
        NodeType::FunctionDefinition,
        NodeType::ParameterList,
        NodeType::Parameter,
        NodeType::ErrorDefinition,
        NodeType::TypeName,
        NodeType::Block,
        NodeType::RevertStatement,
        NodeType::ReturnStatement,
        NodeType::BinaryOperation,
        NodeType::Assignment,
        NodeType::FunctionCall,
        NodeType::FunctionCallOption,
        NodeType::MemberAccess,
        NodeType::Identifier,
        NodeType::Literal,
        NodeType::IndexAccess,
        NodeType::IndexRangeAccess,
        NodeType::MetaType,
        NodeType::PayableConversion,
        NodeType::UnaryOperation,
        NodeType::NewExpression,
        NodeType::TupleExpression,
    ];

    /// Tag as it appears in the structured document.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::SourceUnit => "SOURCE_UNIT",
            NodeType::PragmaDirective => "PRAGMA_DIRECTIVE",
            NodeType::ContractDefinition => "CONTRACT_DEFINITION",
            NodeType::VariableDeclaration => "VARIABLE_DECLARATION",
            NodeType::FunctionDefinition => "FUNCTION_DEFINITION",
            NodeType::ParameterList => "PARAMETER_LIST",
            NodeType::Parameter => "PARAMETER",
            NodeType::ErrorDefinition => "ERROR_DEFINITION",
            NodeType::TypeName => "TYPE_NAME",
            NodeType::Block => "BLOCK",
            NodeType::RevertStatement => "REVERT_STATEMENT",
            NodeType::ReturnStatement => "RETURN_STATEMENT",
            NodeType::BinaryOperation => "BINARY_OPERATION",
            NodeType::Assignment => "ASSIGNMENT",
            NodeType::FunctionCall => "FUNCTION_CALL",
            NodeType::FunctionCallOption => "FUNCTION_CALL_OPTION",
            NodeType::MemberAccess => "MEMBER_ACCESS",
            NodeType::Identifier => "IDENTIFIER",
            NodeType::Literal => "LITERAL",
            NodeType::IndexAccess => "INDEX_ACCESS",
            NodeType::IndexRangeAccess => "INDEX_RANGE_ACCESS",
            NodeType::MetaType => "META_TYPE",
            NodeType::PayableConversion => "PAYABLE_CONVERSION",
            NodeType::UnaryOperation => "UNARY_OPERATION",
            NodeType::NewExpression => "NEW_EXPRESSION",
            NodeType::TupleExpression => "TUPLE_EXPRESSION",
        }
    }

    /// Name carried by the binary envelope for this variant.
    pub fn envelope_name(self) -> &'static str {
        match self {
            NodeType::SourceUnit => "SourceUnit",
            NodeType::PragmaDirective => "Pragma",
            NodeType::ContractDefinition => "Contract",
            NodeType::VariableDeclaration => "VariableDeclaration",
            NodeType::FunctionDefinition => "Function",
            NodeType::ParameterList => "ParameterList",
            NodeType::Parameter => "Parameter",
            NodeType::ErrorDefinition => "Error",
            NodeType::TypeName => "TypeName",
            NodeType::Block => "Body",
            NodeType::RevertStatement => "Revert",
            NodeType::ReturnStatement => "Return",
            NodeType::BinaryOperation => "BinaryOperation",
            NodeType::Assignment => "Assignment",
            NodeType::FunctionCall => "FunctionCall",
            NodeType::FunctionCallOption => "FunctionCallOption",
            NodeType::MemberAccess => "MemberAccess",
            NodeType::Identifier => "Identifier",
            NodeType::Literal => "Literal",
            NodeType::IndexAccess => "IndexAccess",
            NodeType::IndexRangeAccess => "IndexRangeAccess",
            NodeType::MetaType => "MetaType",
            NodeType::PayableConversion => "PayableConversion",
            NodeType::UnaryOperation => "UnaryOperation",
            NodeType::NewExpression => "NewExpression",
            NodeType::TupleExpression => "Tuple",
        }
    }

    pub fn from_envelope_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|node_type| node_type.envelope_name() == name)
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|node_type| node_type.as_str() == tag)
    }

    /// Variants whose type description the binary form requires.
    pub fn is_type_bearing(self) -> bool {
        matches!(
            self,
            NodeType::VariableDeclaration
                | NodeType::Parameter
                | NodeType::TypeName
                | NodeType::BinaryOperation
                | NodeType::Assignment
                | NodeType::FunctionCall
                | NodeType::FunctionCallOption
                | NodeType::MemberAccess
                | NodeType::Identifier
                | NodeType::Literal
                | NodeType::IndexAccess
                | NodeType::IndexRangeAccess
                | NodeType::MetaType
                | NodeType::PayableConversion
                | NodeType::UnaryOperation
                | NodeType::NewExpression
                | NodeType::TupleExpression
        )
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
