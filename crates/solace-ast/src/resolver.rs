//! Two-phase reference resolution.
//!
//! While the tree is being built, nodes whose own children could not supply
//! a type description ask the resolver for one. A hit is cached per node; a
//! miss registers the node as pending exactly once. After the whole tree
//! exists, [`Resolver::resolve_pending`] walks the pending set and pushes
//! resolved descriptions into the nodes, letting each node decide whether
//! to accept.

use std::collections::{BTreeMap, HashMap};

use solace_core::{NodeId, TypeDescription};

use crate::ast::{AstNode, find, find_mut, walk};

/// What a deferred node is looking for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    /// A declared name, looked up through the node's scopes.
    Name(String),
    /// A key owned by a composite node, e.g. `index_access_12`. Satisfied by
    /// the first reference resolved inside that node's subtree.
    Synthetic(String),
}

impl ReferenceKey {
    pub fn name(name: impl Into<String>) -> Self {
        ReferenceKey::Name(name.into())
    }

    pub fn synthetic(prefix: &str, id: NodeId) -> Self {
        ReferenceKey::Synthetic(format!("{prefix}_{}", id.raw()))
    }
}

impl std::fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKey::Name(name) => f.write_str(name),
            ReferenceKey::Synthetic(key) => f.write_str(key),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub id: NodeId,
    pub type_description: Option<TypeDescription>,
}

/// A resolved reference: the declaration and the description it supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub declaration: NodeId,
    pub type_description: TypeDescription,
}

#[derive(Clone, Debug)]
struct PendingReference {
    key: ReferenceKey,
    scopes: Vec<NodeId>,
}

/// A reference still unresolved after the second phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub node: NodeId,
    pub key: ReferenceKey,
}

/// Outcome of [`Resolver::resolve_pending`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Pushes a node accepted.
    pub accepted: usize,
    /// Pushes a node refused.
    pub rejected: usize,
    pub unresolved: Vec<UnresolvedReference>,
}

impl ResolutionReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Per-session lookup service for declarations and deferred references.
#[derive(Debug, Default)]
pub struct Resolver {
    declarations: HashMap<(NodeId, String), Declaration>,
    resolved: BTreeMap<NodeId, Reference>,
    pending: BTreeMap<NodeId, PendingReference>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` in `scope`. Later registrations shadow earlier ones.
    pub fn declare(
        &mut self,
        scope: NodeId,
        name: impl Into<String>,
        id: NodeId,
        type_description: Option<TypeDescription>,
    ) {
        let name = name.into();
        tracing::trace!("declare: scope={} name={} id={}", scope, name, id);
        self.declarations.insert(
            (scope, name),
            Declaration {
                id,
                type_description,
            },
        );
    }

    /// Find `name` in the first scope that declares it.
    pub fn lookup(&self, name: &str, scopes: &[NodeId]) -> Option<&Declaration> {
        scopes
            .iter()
            .find_map(|scope| self.declarations.get(&(*scope, name.to_string())))
    }

    pub fn declaration(&self, id: NodeId) -> Option<&Declaration> {
        self.declarations
            .values()
            .find(|declaration| declaration.id == id)
    }

    /// Resolve a node's reference now, or remember it for the second phase.
    ///
    /// Repeated calls for a node that already resolved return the cached
    /// result; repeated misses register the node once.
    pub fn resolve_by_node(
        &mut self,
        node: NodeId,
        key: ReferenceKey,
        scopes: &[NodeId],
    ) -> Option<Reference> {
        if let Some(reference) = self.resolved.get(&node) {
            return Some(reference.clone());
        }

        if let ReferenceKey::Name(name) = &key
            && let Some(reference) = self.lookup_reference(name, scopes)
        {
            self.pending.remove(&node);
            self.resolved.insert(node, reference.clone());
            return Some(reference);
        }

        if !self.pending.contains_key(&node) {
            tracing::debug!("deferring reference: node={} key={}", node, key);
            self.pending.insert(
                node,
                PendingReference {
                    key,
                    scopes: scopes.to_vec(),
                },
            );
        }
        None
    }

    pub fn resolved(&self, node: NodeId) -> Option<&Reference> {
        self.resolved.get(&node)
    }

    pub fn is_pending(&self, node: NodeId) -> bool {
        self.pending.contains_key(&node)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn lookup_reference(&self, name: &str, scopes: &[NodeId]) -> Option<Reference> {
        let declaration = self.lookup(name, scopes)?;
        let type_description = declaration.type_description.clone()?;
        Some(Reference {
            declaration: declaration.id,
            type_description,
        })
    }

    /// First resolved reference strictly inside the subtree rooted at `node`.
    fn subtree_reference(&self, root: &dyn AstNode, node: NodeId) -> Option<Reference> {
        let subtree = find(root, node)?;
        let mut first = None;
        walk(subtree, &mut |descendant| {
            if first.is_none() && descendant.id() != node {
                first = self.resolved.get(&descendant.id()).cloned();
            }
        });
        first
    }

    fn refresh_declaration(&mut self, id: NodeId, type_description: &TypeDescription) {
        for declaration in self.declarations.values_mut() {
            if declaration.id == id {
                declaration.type_description = Some(type_description.clone());
            }
        }
    }

    /// Second phase: push resolved descriptions into deferred nodes.
    ///
    /// Runs passes until one makes no progress. Within a pass pending nodes
    /// are visited in descending id order, so children settle before the
    /// composites that contain them. A node that accepts but is still only
    /// partially resolved stays pending for later passes.
    pub fn resolve_pending(&mut self, root: &mut dyn AstNode) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        loop {
            let mut progressed = false;
            let ids: Vec<NodeId> = self.pending.keys().rev().copied().collect();

            for id in ids {
                let Some(pending) = self.pending.get(&id).cloned() else {
                    continue;
                };

                let candidate = match &pending.key {
                    ReferenceKey::Name(name) => self.lookup_reference(name, &pending.scopes),
                    ReferenceKey::Synthetic(_) => self.subtree_reference(root, id),
                };
                let Some(reference) = candidate else {
                    continue;
                };

                let Some(node) = find_mut(root, id) else {
                    tracing::warn!("pending reference for detached node {}", id);
                    self.pending.remove(&id);
                    continue;
                };

                let declaration = reference.declaration;
                if node.set_reference_descriptor(declaration, &reference.type_description) {
                    tracing::debug!("accepted reference: node={} key={}", id, pending.key);
                    report.accepted += 1;
                    progressed = true;
                    // Composites stay pending until every input has settled.
                    if node.is_resolved() {
                        self.pending.remove(&id);
                    }

                    let settled = node.type_description().cloned();
                    if let Some(type_description) = settled {
                        self.refresh_declaration(id, &type_description);
                        self.resolved.insert(
                            id,
                            Reference {
                                declaration: reference.declaration,
                                type_description,
                            },
                        );
                    }
                } else {
                    tracing::trace!("rejected reference: node={} key={}", id, pending.key);
                    report.rejected += 1;
                    // Inputs settled without changing the description.
                    if node.is_resolved() {
                        self.pending.remove(&id);
                        progressed = true;
                    }
                }
            }

            if !progressed {
                break;
            }
        }

        report.unresolved = self
            .pending
            .iter()
            .map(|(node, pending)| UnresolvedReference {
                node: *node,
                key: pending.key.clone(),
            })
            .collect();
        for unresolved in &report.unresolved {
            tracing::warn!(
                "unresolved reference: node={} key={}",
                unresolved.node,
                unresolved.key
            );
        }
        report
    }
}
