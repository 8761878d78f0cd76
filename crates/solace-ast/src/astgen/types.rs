//! Type name lowering.

use solace_cst::CstNode;

use crate::ast::{NodeType, SrcNode, StorageLocation, TypeName, TypeNameKind};
use crate::error::{BuildError, BuildResult};
use crate::resolver::ReferenceKey;

use super::context::{AstLoweringCtx, Scope};
use super::helpers::{normalized_text, required, significant_children};

/// Lower a type name written at a declaration with data location `location`.
///
/// Nested positions (mapping keys and values, array bases) use the default
/// location.
pub fn lower_type_name(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    location: StorageLocation,
) -> BuildResult<TypeName> {
    tracing::trace!("lower_type_name: kind={}", node.kind());

    match node.kind() {
        "type_name" => {
            let inner = significant_children(node)
                .next()
                .ok_or_else(|| BuildError::missing_field(node, "type"))?;
            lower_type_name(ctx, scope, inner, location)
        }
        "elementary_type_name" => Ok(lower_elementary(ctx, scope, node, location)),
        "user_defined_type_name" => Ok(lower_user_defined(ctx, scope, node, location)),
        "mapping" => lower_mapping(ctx, scope, node, location),
        "array_type_name" => lower_array(ctx, scope, node, location),
        _ => Err(BuildError::unsupported(node)),
    }
}

fn empty_type_name(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    kind: TypeNameKind,
    location: StorageLocation,
) -> TypeName {
    TypeName {
        id: ctx.fresh_id(),
        node_type: NodeType::TypeName,
        src: SrcNode::from_cst(node, scope.parent_id()),
        kind,
        name: normalized_text(node),
        storage_location: location,
        key_type: None,
        value_type: None,
        base_type: None,
        length: None,
        referenced_declaration: None,
        type_description: None,
    }
}

fn lower_elementary(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    location: StorageLocation,
) -> TypeName {
    let mut type_name = empty_type_name(ctx, scope, node, TypeNameKind::Elementary, location);
    type_name.type_description = type_name.synthesize();
    type_name
}

fn lower_user_defined(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    location: StorageLocation,
) -> TypeName {
    let mut type_name = empty_type_name(ctx, scope, node, TypeNameKind::UserDefined, location);
    let key = ReferenceKey::name(type_name.name.clone());
    if let Some(reference) = ctx.resolve(type_name.id, key, &scope) {
        type_name.referenced_declaration = Some(reference.declaration);
        type_name.type_description = Some(reference.type_description);
    }
    type_name
}

fn lower_mapping(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    location: StorageLocation,
) -> BuildResult<TypeName> {
    let mut type_name = empty_type_name(ctx, scope, node, TypeNameKind::Mapping, location);
    let inner = scope.with_parent(type_name.id);

    let key = lower_type_name(ctx, inner, required(node, "key_type")?, StorageLocation::Default)?;
    let value = lower_type_name(
        ctx,
        inner,
        required(node, "value_type")?,
        StorageLocation::Default,
    )?;
    type_name.key_type = Some(Box::new(key));
    type_name.value_type = Some(Box::new(value));

    settle(ctx, scope, &mut type_name);
    Ok(type_name)
}

fn lower_array(
    ctx: &mut AstLoweringCtx,
    scope: Scope,
    node: &CstNode,
    location: StorageLocation,
) -> BuildResult<TypeName> {
    let mut type_name = empty_type_name(ctx, scope, node, TypeNameKind::Array, location);
    let inner = scope.with_parent(type_name.id);

    let base = lower_type_name(ctx, inner, required(node, "base")?, StorageLocation::Default)?;
    type_name.base_type = Some(Box::new(base));
    type_name.length = node.child_by_field_name("length").map(normalized_text);

    settle(ctx, scope, &mut type_name);
    Ok(type_name)
}

fn settle(ctx: &mut AstLoweringCtx, scope: Scope, type_name: &mut TypeName) {
    type_name.type_description = type_name.synthesize();
    if type_name.type_description.is_none() {
        ctx.defer(type_name.id, "type_name", &scope);
    }
}
