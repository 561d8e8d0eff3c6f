//! Declaration forest
//!
//! Parsed compilation units are stored as trees of declarations. A parser
//! produces an owned [`DeclNode`] tree per file; the [`DeclForest`] interns
//! those trees into an arena so every declaration gets a stable [`DeclId`]
//! for the lifetime of the forest.

pub mod forest;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

pub use forest::DeclForest;

/// Stable identifier of a declaration inside a [`DeclForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(u32);

impl DeclId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of scope a compound declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundKind {
    Namespace,
    Class,
    Struct,
    Union,
}

impl CompoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundKind::Namespace => "namespace",
            CompoundKind::Class => "class",
            CompoundKind::Struct => "struct",
            CompoundKind::Union => "union",
        }
    }
}

/// Discriminant of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// A parsed source file, the outermost compound.
    File,
    Compound(CompoundKind),
    /// `typedef T Name;` or `using Name = T;`
    TypeAlias,
    /// `typedef R (*Name)(Args);`
    FunctionPointerType,
    /// Functions, variables, enums and anything else that is not indexed.
    Other,
}

impl DeclKind {
    pub fn is_file(&self) -> bool {
        matches!(self, DeclKind::File)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::File => "file",
            DeclKind::Compound(kind) => kind.as_str(),
            DeclKind::TypeAlias => "typedef",
            DeclKind::FunctionPointerType => "function_pointer",
            DeclKind::Other => "other",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source location of a declaration (1-based lines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, start_line: u32, end_line: u32) -> Self {
        Self {
            file: file.into(),
            start_line,
            end_line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.start_line)
    }
}

/// A declaration stored in the forest.
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    pub location: Option<Location>,
    /// Member declarations in source order; empty for non-compounds.
    pub members: Vec<DeclId>,
}

/// Owned declaration tree as handed over by a parser.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclNode {
    pub kind: DeclKind,
    pub name: String,
    pub location: Option<Location>,
    pub members: Vec<DeclNode>,
}

impl DeclNode {
    pub fn new(kind: DeclKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            location: None,
            members: Vec::new(),
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::new(DeclKind::File, path)
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(DeclKind::Compound(CompoundKind::Namespace), name)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(DeclKind::Compound(CompoundKind::Class), name)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(DeclKind::Compound(CompoundKind::Struct), name)
    }

    pub fn union(name: impl Into<String>) -> Self {
        Self::new(DeclKind::Compound(CompoundKind::Union), name)
    }

    pub fn type_alias(name: impl Into<String>) -> Self {
        Self::new(DeclKind::TypeAlias, name)
    }

    pub fn function_pointer(name: impl Into<String>) -> Self {
        Self::new(DeclKind::FunctionPointerType, name)
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self::new(DeclKind::Other, name)
    }

    pub fn with_member(mut self, member: DeclNode) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = DeclNode>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Number of declarations in this tree, including the node itself.
    pub fn count(&self) -> usize {
        1 + self.members.iter().map(DeclNode::count).sum::<usize>()
    }
}
