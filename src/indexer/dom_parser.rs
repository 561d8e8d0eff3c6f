use std::path::Path;

use crate::dom::DeclNode;
use crate::error::Result;
use crate::indexer::extractor::DeclExtractor;
use crate::indexer::parser::Parser;
use crate::languages::LanguageRegistry;

/// Source of per-file declaration trees.
///
/// Implementations must be usable from several threads at once: directory
/// loads parse files in parallel before merging them one at a time.
pub trait DomParser: Send + Sync {
    /// Parses `path` into a file-root declaration tree.
    fn parse(&self, path: &Path) -> Result<DeclNode>;

    /// Whether files found during a directory walk should be handed to
    /// [`parse`](Self::parse).
    fn accepts(&self, path: &Path) -> bool;
}

/// tree-sitter backed C/C++ parser.
pub struct CppDomParser {
    parser: Parser,
    extractor: DeclExtractor,
}

impl CppDomParser {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self {
            parser: Parser::new(registry),
            extractor: DeclExtractor::new(),
        }
    }

    pub fn parse_source(&self, source: &str, file_name: &Path) -> Result<DeclNode> {
        let grammar = self
            .parser
            .get_grammar(file_name)
            .or_else(|| self.parser.registry().default_grammar())
            .ok_or_else(|| {
                crate::error::IndexerError::UnsupportedLanguage(file_name.display().to_string())
            })?;
        let parsed = self.parser.parse_source(source, grammar)?;
        Ok(self.extractor.extract(&parsed, file_name))
    }
}

impl Default for CppDomParser {
    fn default() -> Self {
        Self::new(crate::REGISTRY.clone())
    }
}

impl DomParser for CppDomParser {
    fn parse(&self, path: &Path) -> Result<DeclNode> {
        let parsed = self.parser.parse_file(path)?;
        Ok(self.extractor.extract(&parsed, path))
    }

    fn accepts(&self, path: &Path) -> bool {
        self.parser.get_grammar(path).is_some()
    }
}
