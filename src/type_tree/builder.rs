//! Type Tree Builder
//!
//! Walks a compound declaration and binds every type-introducing member
//! under the scope node of its enclosing compound.

use crate::dom::{DeclForest, DeclId, DeclKind};

use super::{NodeId, ReverseIndex, TypeTree};

/// Populates a [`TypeTree`] and its [`ReverseIndex`] from a [`DeclForest`].
///
/// The builder never mutates the forest. Running it again over declarations
/// it has already seen creates no new nodes.
pub struct TypeTreeBuilder<'a> {
    forest: &'a DeclForest,
    tree: &'a mut TypeTree,
    index: &'a mut ReverseIndex,
}

impl<'a> TypeTreeBuilder<'a> {
    pub fn new(forest: &'a DeclForest, tree: &'a mut TypeTree, index: &'a mut ReverseIndex) -> Self {
        Self {
            forest,
            tree,
            index,
        }
    }

    /// Binds the members of `compound` under `scope`, recursing into nested
    /// compounds. A `None` compound is a no-op.
    ///
    /// A file root does not get a scope level of its own: the file itself is
    /// bound to `scope` and its members become children of `scope`.
    pub fn load(&mut self, compound: Option<DeclId>, scope: NodeId) {
        let Some(compound) = compound else {
            return;
        };
        let forest = self.forest;
        let Some(decl) = forest.get(compound) else {
            return;
        };

        if decl.kind.is_file() {
            self.index.register(compound, scope);
            self.tree.add_contributor(scope, compound);
        }

        for &member in &decl.members {
            let Some(mem) = forest.get(member) else {
                continue;
            };

            match mem.kind {
                DeclKind::Compound(_) => {
                    if let Some(child) = self.bind(member, &mem.name, scope) {
                        self.load(Some(member), child);
                    }
                }
                DeclKind::TypeAlias | DeclKind::FunctionPointerType => {
                    self.bind(member, &mem.name, scope);
                }
                DeclKind::File | DeclKind::Other => {}
            }
        }
    }

    fn bind(&mut self, decl: DeclId, name: &str, scope: NodeId) -> Option<NodeId> {
        let Some(child) = self.tree.obtain_child(scope, name) else {
            tracing::debug!("scope node {} is not part of the tree", scope.index());
            return None;
        };
        self.tree.add_contributor(child, decl);
        self.index.register(decl, child);
        tracing::trace!("bound {} under node {}", name, scope.index());
        Some(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DeclNode;

    fn build(forest: &DeclForest, file: DeclId) -> (TypeTree, ReverseIndex) {
        let mut tree = TypeTree::new();
        let mut index = ReverseIndex::new();
        let root = tree.root();
        TypeTreeBuilder::new(forest, &mut tree, &mut index).load(Some(file), root);
        (tree, index)
    }

    #[test]
    fn test_file_binds_to_root() {
        let mut forest = DeclForest::new();
        let file = forest.insert(DeclNode::file("a.h").with_member(DeclNode::class("C")));
        let (tree, index) = build(&forest, file);

        assert_eq!(index.get(file), Some(tree.root()));
        let root = tree.node(tree.root()).unwrap();
        assert!(root.contributors.contains(&file));
        assert!(root.child("a.h").is_none());
        assert!(root.child("C").is_some());
    }

    #[test]
    fn test_nested_compounds_recurse() {
        let mut forest = DeclForest::new();
        let file = forest.insert(
            DeclNode::file("a.h").with_member(
                DeclNode::namespace("N").with_member(
                    DeclNode::structure("S")
                        .with_member(DeclNode::type_alias("T"))
                        .with_member(DeclNode::function_pointer("Callback")),
                ),
            ),
        );
        let (tree, index) = build(&forest, file);

        let n = tree.child(tree.root(), "N").unwrap();
        let s = tree.child(n, "S").unwrap();
        let t = tree.child(s, "T").unwrap();
        let cb = tree.child(s, "Callback").unwrap();

        assert_eq!(tree.parent(s), Some(n));
        assert_eq!(tree.qualified_name(cb), "N::S::Callback");
        assert_eq!(index.len(), 5);

        let t_decl = tree.node(t).unwrap().contributors.iter().next().copied().unwrap();
        assert_eq!(forest.get(t_decl).unwrap().name, "T");
        assert_eq!(index.get(t_decl), Some(t));
    }

    #[test]
    fn test_leaves_do_not_recurse() {
        let mut forest = DeclForest::new();
        // A type alias never carries members, but the builder must not open a
        // scope for it even if one were attached.
        let file = forest.insert(
            DeclNode::file("a.h")
                .with_member(DeclNode::type_alias("T").with_member(DeclNode::class("Hidden"))),
        );
        let (tree, _) = build(&forest, file);

        let t = tree.child(tree.root(), "T").unwrap();
        assert!(tree.node(t).unwrap().children.is_empty());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_unindexed_members_are_skipped() {
        let mut forest = DeclForest::new();
        let file = forest.insert(
            DeclNode::file("a.h")
                .with_member(DeclNode::other("main"))
                .with_member(DeclNode::class("C").with_member(DeclNode::other("method"))),
        );
        let (tree, index) = build(&forest, file);

        let members = forest.members(file);
        assert!(index.get(members[0]).is_none());
        assert!(tree.child(tree.root(), "main").is_none());
        let c = tree.child(tree.root(), "C").unwrap();
        assert!(tree.node(c).unwrap().children.is_empty());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_null_compound_is_noop() {
        let forest = DeclForest::new();
        let mut tree = TypeTree::new();
        let mut index = ReverseIndex::new();
        let root = tree.root();
        TypeTreeBuilder::new(&forest, &mut tree, &mut index).load(None, root);

        assert!(tree.is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_foreign_scope_binds_nothing() {
        let mut forest = DeclForest::new();
        let file = forest.insert(
            DeclNode::file("a.h").with_member(DeclNode::class("C").with_member(DeclNode::type_alias("T"))),
        );
        let class = forest.members(file)[0];

        let mut other = TypeTree::new();
        let root = other.root();
        let foreign = other.obtain_child(root, "Elsewhere").unwrap();

        let mut tree = TypeTree::new();
        let mut index = ReverseIndex::new();
        TypeTreeBuilder::new(&forest, &mut tree, &mut index).load(Some(class), foreign);

        assert!(tree.is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_same_named_members_share_a_node() {
        let mut forest = DeclForest::new();
        let file = forest.insert(
            DeclNode::file("a.h")
                .with_member(DeclNode::class("C"))
                .with_member(DeclNode::class("C").with_member(DeclNode::type_alias("T"))),
        );
        let (tree, index) = build(&forest, file);

        let c = tree.child(tree.root(), "C").unwrap();
        assert_eq!(tree.node(c).unwrap().contributors.len(), 2);
        assert!(tree.child(c, "T").is_some());
        for &member in forest.members(file) {
            assert_eq!(index.get(member), Some(c));
        }
    }

    #[test]
    fn test_rebuild_creates_no_new_nodes() {
        let mut forest = DeclForest::new();
        let file = forest.insert(
            DeclNode::file("a.h")
                .with_member(DeclNode::namespace("N").with_member(DeclNode::class("C"))),
        );
        let mut tree = TypeTree::new();
        let mut index = ReverseIndex::new();
        let root = tree.root();

        TypeTreeBuilder::new(&forest, &mut tree, &mut index).load(Some(file), root);
        let nodes = tree.len();
        let entries = index.len();

        TypeTreeBuilder::new(&forest, &mut tree, &mut index).load(Some(file), root);
        assert_eq!(tree.len(), nodes);
        assert_eq!(index.len(), entries);
        let n = tree.child(root, "N").unwrap();
        assert_eq!(tree.node(n).unwrap().contributors.len(), 1);
    }
}
