use std::collections::HashMap;

use crate::dom::DeclId;

use super::NodeId;

/// Maps an indexed declaration to the type tree node that binds it.
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    entries: HashMap<DeclId, NodeId>,
}

impl ReverseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, decl: DeclId, node: NodeId) {
        self.entries.insert(decl, node);
    }

    pub fn get(&self, decl: DeclId) -> Option<NodeId> {
        self.entries.get(&decl).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
