//! Node identity for a single build session.
//!
//! Every AST node receives a `NodeId` from the session's `NodeIdGen` when it
//! is constructed. Ids are strictly increasing in construction order, so a
//! parent always has a smaller id than anything it owns. Cross-node
//! references (parent links, referenced declarations) are stored as ids and
//! resolved by lookup, never as pointers.

use serde::{Deserialize, Serialize};

/// Unique identifier for an AST node within one build session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw id, e.g. one read back from a serialized tree.
    #[inline]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value of this NodeId.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id allocator owned by one build session.
///
/// Not `Sync`-shared on purpose: independent sessions each own a generator,
/// and a generator is only ever driven from the thread running its build.
#[derive(Debug)]
pub struct NodeIdGen {
    next: u64,
}

impl NodeIdGen {
    /// Create a generator whose first id is `#1`.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate a fresh id.
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next - 1
    }
}

impl Default for NodeIdGen {
    fn default() -> Self {
        Self::new()
    }
}
