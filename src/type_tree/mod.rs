//! Merged cross-file type tree
//!
//! Every node is one name binding at one scope level. Nodes live in an arena
//! and refer to each other by [`NodeId`], so parent links stay valid no matter
//! how much the tree grows.

pub mod builder;
pub mod resolver;
pub mod reverse_index;

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::dom::DeclId;

pub use builder::TypeTreeBuilder;
pub use resolver::{NameResolver, SCOPE_SEPARATOR};
pub use reverse_index::ReverseIndex;

/// Stable identifier of a node in a [`TypeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One name binding in the type tree.
#[derive(Debug, Clone, Default)]
pub struct TypeNode {
    /// `None` only for the root.
    pub name: Option<String>,
    /// Declarations binding this name at this scope.
    pub contributors: BTreeSet<DeclId>,
    pub children: HashMap<String, NodeId>,
    /// `None` only for the root.
    pub parent: Option<NodeId>,
}

impl TypeNode {
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }
}

/// Arena-backed tree of [`TypeNode`]s rooted at global scope.
#[derive(Debug, Clone)]
pub struct TypeTree {
    nodes: Vec<TypeNode>,
}

impl Default for TypeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![TypeNode::default()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::from_index(0)
    }

    pub fn node(&self, id: NodeId) -> Option<&TypeNode> {
        self.nodes.get(id.index())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id).and_then(|n| n.child(name))
    }

    /// Returns the child of `parent` keyed by `name`, creating it if needed.
    /// Returns `None` if `parent` is not a node of this tree.
    pub fn obtain_child(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        let id = NodeId::from_index(self.nodes.len());
        let scope = self.nodes.get_mut(parent.index())?;
        if let Some(existing) = scope.child(name) {
            return Some(existing);
        }
        scope.children.insert(name.to_string(), id);

        self.nodes.push(TypeNode {
            name: Some(name.to_string()),
            contributors: BTreeSet::new(),
            children: HashMap::new(),
            parent: Some(parent),
        });
        Some(id)
    }

    /// Adds `decl` to the contributors of `node`. Returns false if it was
    /// already present.
    pub fn add_contributor(&mut self, node: NodeId, decl: DeclId) -> bool {
        match self.nodes.get_mut(node.index()) {
            Some(n) => n.contributors.insert(decl),
            None => false,
        }
    }

    /// Iterates from `id` up to the root, `id` included.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).map(|_| id),
        }
    }

    /// Root-to-node names joined by the scope separator. Empty for the root.
    pub fn qualified_name(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = self
            .ancestors(id)
            .filter_map(|n| self.node(n).and_then(|node| node.name.as_deref()))
            .collect();
        parts.reverse();
        parts.join(SCOPE_SEPARATOR)
    }

    /// Depth-first pre-order walk with children visited in name order.
    /// Yields each node with its depth (root is 0).
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), 0usize)];

        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            if let Some(node) = self.node(id) {
                let mut children: Vec<(&String, &NodeId)> = node.children.iter().collect();
                children.sort_by(|a, b| b.0.cmp(a.0));
                stack.extend(children.into_iter().map(|(_, child)| (*child, depth + 1)));
            }
        }

        out
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

pub struct Ancestors<'a> {
    tree: &'a TypeTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
