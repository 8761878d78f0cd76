use serde::{Deserialize, Serialize};
use solace_core::{NodeId, TypeDescription};

use super::{AstNode, NodeType, SrcNode, StorageLocation, node_header, replace_description};
use crate::synth;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNameKind {
    Elementary,
    UserDefined,
    Mapping,
    Array,
}

/// A written type: `uint256`, `Token`, `mapping(address => uint256)`, `bytes32[4]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeName {
    pub id: NodeId,
    pub node_type: NodeType,
    pub src: SrcNode,
    pub kind: TypeNameKind,
    /// Source spelling with whitespace normalised.
    pub name: String,
    #[serde(default)]
    pub storage_location: StorageLocation,
    #[serde(default)]
    pub key_type: Option<Box<TypeName>>,
    #[serde(default)]
    pub value_type: Option<Box<TypeName>>,
    #[serde(default)]
    pub base_type: Option<Box<TypeName>>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_declaration: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
}

impl TypeName {
    /// Derive the description from the written type and its children.
    ///
    /// User-defined names cannot be derived locally; their description
    /// comes from the referenced declaration.
    pub fn synthesize(&self) -> Option<TypeDescription> {
        let child = |slot: &Option<Box<TypeName>>| {
            slot.as_ref()
                .and_then(|type_name| type_name.type_description.clone())
        };
        match self.kind {
            TypeNameKind::Elementary => Some(synth::elementary(&self.name, self.storage_location)),
            TypeNameKind::UserDefined => self.type_description.clone(),
            TypeNameKind::Mapping => synth::mapping(
                child(&self.key_type).as_ref(),
                child(&self.value_type).as_ref(),
            ),
            TypeNameKind::Array => synth::array(
                child(&self.base_type).as_ref(),
                self.length.as_deref(),
                self.storage_location,
            ),
        }
    }
}

impl AstNode for TypeName {
    node_header!();

    fn type_description(&self) -> Option<&TypeDescription> {
        self.type_description.as_ref()
    }

    fn referenced_declaration(&self) -> Option<NodeId> {
        self.referenced_declaration
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        [&self.key_type, &self.value_type, &self.base_type]
            .into_iter()
            .filter_map(|slot| slot.as_deref().map(|type_name| type_name as &dyn AstNode))
            .collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn AstNode> {
        [&mut self.key_type, &mut self.value_type, &mut self.base_type]
            .into_iter()
            .filter_map(|slot| {
                slot.as_deref_mut()
                    .map(|type_name| type_name as &mut dyn AstNode)
            })
            .collect()
    }

    fn set_reference_descriptor(
        &mut self,
        declaration: NodeId,
        description: &TypeDescription,
    ) -> bool {
        if self.kind == TypeNameKind::UserDefined {
            if self.type_description.is_some() {
                return false;
            }
            self.referenced_declaration = Some(declaration);
            self.type_description = Some(description.clone());
            return true;
        }
        let synthesized = self.synthesize();
        replace_description(&mut self.type_description, synthesized)
    }
}
