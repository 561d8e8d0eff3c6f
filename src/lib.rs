pub mod config;
pub mod dom;
pub mod error;
pub mod indexer;
pub mod languages;
pub mod program;
pub mod type_tree;

use once_cell::sync::Lazy;

pub use config::{Config, ParseConfig, WalkConfig};
pub use dom::{CompoundKind, DeclForest, DeclId, DeclKind, DeclNode, Declaration, Location};
pub use error::{IndexerError, Result};
pub use indexer::{CppDomParser, DeclExtractor, DomParser, FileWalker, Parser};
pub use languages::{LanguageGrammar, LanguageRegistry};
pub use program::{LoadReport, Program, ProgramStats};
pub use type_tree::{
    NameResolver, NodeId, ReverseIndex, TypeNode, TypeTree, TypeTreeBuilder, SCOPE_SEPARATOR,
};

/// Global language registry instance (lazily initialized)
pub static REGISTRY: Lazy<LanguageRegistry> = Lazy::new(LanguageRegistry::new);
