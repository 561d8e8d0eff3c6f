use super::{DeclId, DeclKind, DeclNode, Declaration};

/// Arena owning every declaration of every loaded compilation unit.
#[derive(Debug, Default)]
pub struct DeclForest {
    decls: Vec<Declaration>,
}

impl DeclForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns an owned declaration tree and returns the id of its root.
    ///
    /// Parents are allocated before their members, so ids grow in
    /// depth-first pre-order.
    pub fn insert(&mut self, node: DeclNode) -> DeclId {
        let DeclNode {
            kind,
            name,
            location,
            members,
        } = node;

        let id = DeclId::from_index(self.decls.len());
        self.decls.push(Declaration {
            kind,
            name,
            location,
            members: Vec::with_capacity(members.len()),
        });

        let member_ids: Vec<DeclId> = members.into_iter().map(|m| self.insert(m)).collect();
        self.decls[id.index()].members = member_ids;
        id
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get(id.index())
    }

    pub fn kind(&self, id: DeclId) -> Option<DeclKind> {
        self.get(id).map(|d| d.kind)
    }

    /// Member ids of a declaration; empty for unknown ids and leaves.
    pub fn members(&self, id: DeclId) -> &[DeclId] {
        self.get(id).map(|d| d.members.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(idx, decl)| (DeclId::from_index(idx), decl))
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
