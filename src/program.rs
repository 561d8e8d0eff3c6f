//! Program: the loaded compilation units and the type tree built over them
//!
//! A [`Program`] owns the declaration forest, the list of file roots in load
//! order, the merged [`TypeTree`] and the [`ReverseIndex`]. Loading is
//! best-effort: inputs that cannot be read or parsed are logged and skipped.
//! Loads need exclusive access (`&mut self`); lookups only need `&self`.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::config::Config;
use crate::dom::{DeclForest, DeclId, DeclKind, DeclNode, Declaration};
use crate::indexer::{CppDomParser, DomParser, FileWalker};
use crate::type_tree::{NameResolver, NodeId, ReverseIndex, TypeTree, TypeTreeBuilder};

/// Outcome of a [`Program::load_program`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Files selected for parsing.
    pub files_found: usize,
    /// Files parsed and appended to the forest.
    pub files_loaded: usize,
    /// Files skipped because they could not be read or parsed.
    pub files_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramStats {
    pub files: usize,
    pub declarations: usize,
    pub indexed_declarations: usize,
    pub tree_nodes: usize,
}

pub struct Program {
    forest: DeclForest,
    files: Vec<DeclId>,
    tree: TypeTree,
    index: ReverseIndex,
    parser: Box<dyn DomParser>,
    walker: FileWalker,
    config: Config,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let parser = Box::new(CppDomParser::new(config.registry()));
        Self::build(config, parser)
    }

    /// Program using a custom parser collaborator with default settings.
    pub fn with_parser(parser: Box<dyn DomParser>) -> Self {
        Self::build(Config::default(), parser)
    }

    fn build(config: Config, parser: Box<dyn DomParser>) -> Self {
        Self {
            forest: DeclForest::new(),
            files: Vec::new(),
            tree: TypeTree::new(),
            index: ReverseIndex::new(),
            parser,
            walker: FileWalker::new(config.walk.clone()),
            config,
        }
    }

    /// Parses `path` (a file, or every accepted file below a directory),
    /// appends the results to the forest and rebuilds the type tree over all
    /// file roots in forest order.
    ///
    /// A path that does not exist loads nothing. Loads are not transactional:
    /// files parsed successfully are merged even if others fail.
    pub fn load_program(&mut self, path: impl AsRef<Path>) -> LoadReport {
        let path = path.as_ref();
        let (units, report) = self.load_cpp_dom(path);

        for unit in units {
            let id = self.forest.insert(unit);
            self.files.push(id);
        }

        let root = self.tree.root();
        let mut builder = TypeTreeBuilder::new(&self.forest, &mut self.tree, &mut self.index);
        for &file in &self.files {
            builder.load(Some(file), root);
        }

        tracing::info!(
            "Loaded {} of {} files from {} ({} failed)",
            report.files_loaded,
            report.files_found,
            path.display(),
            report.files_failed
        );
        report
    }

    fn load_cpp_dom(&self, path: &Path) -> (Vec<DeclNode>, LoadReport) {
        let mut report = LoadReport::default();

        let files: Vec<PathBuf> = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            match self.walker.walk(path) {
                Ok(mut files) => {
                    files.retain(|f| self.parser.accepts(f));
                    files
                }
                Err(e) => {
                    tracing::warn!("Failed to walk {}: {}", path.display(), e);
                    Vec::new()
                }
            }
        } else {
            tracing::warn!("Skipping {}: not a file or directory", path.display());
            Vec::new()
        };
        report.files_found = files.len();

        let parser = self.parser.as_ref();
        let parse = |file: &PathBuf| match parser.parse(file) {
            Ok(unit) => {
                tracing::debug!("Parsed {} ({} declarations)", file.display(), unit.count());
                Some(unit)
            }
            Err(e) => {
                tracing::warn!("Error parsing {}: {}", file.display(), e);
                None
            }
        };

        // Parsing may run in parallel; results keep walk order so merging
        // stays deterministic.
        let parsed: Vec<Option<DeclNode>> = if self.config.parse.parallel {
            files.par_iter().map(parse).collect()
        } else {
            files.iter().map(parse).collect()
        };

        let units: Vec<DeclNode> = parsed.into_iter().flatten().collect();
        report.files_loaded = units.len();
        report.files_failed = report.files_found - report.files_loaded;
        (units, report)
    }

    /// Adds a declaration tree to the forest without indexing it.
    pub fn intern(&mut self, node: DeclNode) -> DeclId {
        self.forest.insert(node)
    }

    /// Indexes an already interned file root and appends it to the file list.
    ///
    /// Anything that is not a file root is ignored and `false` is returned.
    /// Adding the same file twice lists it twice; its bindings are unchanged.
    pub fn add_cpp_dom(&mut self, file: DeclId) -> bool {
        if self.forest.kind(file) != Some(DeclKind::File) {
            tracing::debug!("Ignoring non-file declaration {:?}", file);
            return false;
        }

        let root = self.tree.root();
        TypeTreeBuilder::new(&self.forest, &mut self.tree, &mut self.index).load(Some(file), root);
        self.files.push(file);
        true
    }

    /// Interns and indexes an in-memory file root. Returns `None` without
    /// touching the forest if `node` is not a file.
    pub fn add_dom(&mut self, node: DeclNode) -> Option<DeclId> {
        if !node.kind.is_file() {
            return None;
        }
        let id = self.intern(node);
        self.add_cpp_dom(id);
        Some(id)
    }

    /// Resolves `name` as seen from the scope `context`.
    pub fn resolve(&self, name: &str, context: NodeId) -> Option<NodeId> {
        NameResolver::new(&self.tree).resolve(name, context)
    }

    pub fn resolve_from_root(&self, name: &str) -> Option<NodeId> {
        self.resolve(name, self.tree.root())
    }

    /// Resolves `name` from the scope a declaration is bound in.
    pub fn resolve_from_decl(&self, name: &str, decl: DeclId) -> Option<NodeId> {
        self.scope_of(decl)
            .and_then(|context| self.resolve(name, context))
    }

    /// Declarations contributing to the node `name` resolves to.
    pub fn resolve_declarations(&self, name: &str, context: NodeId) -> Vec<&Declaration> {
        self.resolve(name, context)
            .map(|node| self.contributors(node))
            .unwrap_or_default()
    }

    pub fn contributors(&self, node: NodeId) -> Vec<&Declaration> {
        self.tree
            .node(node)
            .map(|n| {
                n.contributors
                    .iter()
                    .filter_map(|id| self.forest.get(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tree node an indexed declaration is bound to.
    pub fn scope_of(&self, decl: DeclId) -> Option<NodeId> {
        self.index.get(decl)
    }

    pub fn qualified_name(&self, node: NodeId) -> String {
        self.tree.qualified_name(node)
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &TypeTree {
        &self.tree
    }

    pub fn forest(&self) -> &DeclForest {
        &self.forest
    }

    pub fn reverse_index(&self) -> &ReverseIndex {
        &self.index
    }

    /// File roots in load order.
    pub fn files(&self) -> &[DeclId] {
        &self.files
    }

    pub fn stats(&self) -> ProgramStats {
        ProgramStats {
            files: self.files.len(),
            declarations: self.forest.len(),
            indexed_declarations: self.index.len(),
            tree_nodes: self.tree.len(),
        }
    }
}
