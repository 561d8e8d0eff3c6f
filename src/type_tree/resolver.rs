//! Name Resolver for C++ scoped names
//!
//! The first segment of a name is looked up the way an unqualified name is:
//! walking from the lookup context outwards, nearest scope first. Every
//! following segment must be a direct child of the node reached so far.

use super::{NodeId, TypeTree};

/// Token separating the segments of a qualified name.
pub const SCOPE_SEPARATOR: &str = "::";

/// Resolver for scoped names against a [`TypeTree`]
pub struct NameResolver<'a> {
    tree: &'a TypeTree,
}

impl<'a> NameResolver<'a> {
    pub fn new(tree: &'a TypeTree) -> Self {
        Self { tree }
    }

    /// Resolves `name` as seen from `context`.
    ///
    /// A leading `::` anchors the lookup at global scope. Empty names and
    /// empty segments never resolve.
    pub fn resolve(&self, name: &str, context: NodeId) -> Option<NodeId> {
        let (global, rest) = match name.strip_prefix(SCOPE_SEPARATOR) {
            Some(rest) => (true, rest),
            None => (false, name),
        };

        let mut segments = rest.split(SCOPE_SEPARATOR);
        let first = segments.next().filter(|s| !s.is_empty())?;

        let mut current = if global {
            self.tree.child(self.tree.root(), first)?
        } else {
            self.lookup_unqualified(first, context)?
        };

        for segment in segments {
            if segment.is_empty() {
                return None;
            }
            current = self.tree.child(current, segment)?;
        }

        Some(current)
    }

    /// Looks `name` up among the children of `context` and then of each
    /// enclosing scope in turn.
    pub fn lookup_unqualified(&self, name: &str, context: NodeId) -> Option<NodeId> {
        self.tree
            .ancestors(context)
            .find_map(|scope| self.tree.child(scope, name))
    }
}
