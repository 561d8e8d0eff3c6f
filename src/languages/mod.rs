pub mod cpp;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::dom::CompoundKind;

/// Grammar plus the node-kind knowledge needed to turn a syntax tree into
/// declarations.
pub trait LanguageGrammar: Send + Sync {
    fn name(&self) -> &'static str;
    fn file_extensions(&self) -> &[&'static str];
    fn language(&self) -> tree_sitter::Language;

    /// Compound kind introduced by a specifier node, e.g. `class_specifier`.
    fn compound_kind(&self, node_kind: &str) -> Option<CompoundKind>;

    /// Node kinds whose declarations belong to the enclosing scope, such as
    /// preprocessor conditionals or `extern "C"` blocks.
    fn is_transparent(&self, _node_kind: &str) -> bool {
        false
    }
}

#[derive(Clone)]
pub struct LanguageRegistry {
    languages: HashMap<String, Arc<dyn LanguageGrammar>>,
    extension_map: HashMap<String, String>,
    default_language: Option<String>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            languages: HashMap::new(),
            extension_map: HashMap::new(),
            default_language: None,
        };

        registry.register(Arc::new(cpp::CppGrammar));
        registry.default_language = Some(cpp::CppGrammar.name().to_string());

        registry
    }

    pub fn register(&mut self, grammar: Arc<dyn LanguageGrammar>) {
        let name = grammar.name().to_string();
        for ext in grammar.file_extensions() {
            self.extension_map.insert(ext.to_string(), name.clone());
        }
        self.languages.insert(name, grammar);
    }

    /// Maps an additional file extension to an already registered language.
    /// Returns false if the language is unknown.
    pub fn register_extension(&mut self, ext: &str, language: &str) -> bool {
        if !self.languages.contains_key(language) {
            return false;
        }
        let ext = ext.trim_start_matches('.');
        self.extension_map
            .insert(ext.to_string(), language.to_string());
        true
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn LanguageGrammar>> {
        self.languages.get(name).cloned()
    }

    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn LanguageGrammar>> {
        self.extension_map
            .get(ext)
            .and_then(|name| self.languages.get(name))
            .cloned()
    }

    pub fn get_for_file(&self, path: &Path) -> Option<Arc<dyn LanguageGrammar>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get_by_extension(ext))
    }

    /// Grammar used for explicitly requested files with unknown extensions.
    pub fn default_grammar(&self) -> Option<Arc<dyn LanguageGrammar>> {
        self.default_language
            .as_deref()
            .and_then(|name| self.get_by_name(name))
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
