use crate::dom::CompoundKind;

use super::LanguageGrammar;

/// C and C++ share the tree-sitter-cpp grammar; C sources parse as a subset.
pub struct CppGrammar;

impl LanguageGrammar for CppGrammar {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["c", "cc", "cpp", "cxx", "h", "hh", "hpp", "hxx", "inl"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_cpp::LANGUAGE.into()
    }

    fn compound_kind(&self, node_kind: &str) -> Option<CompoundKind> {
        match node_kind {
            "class_specifier" => Some(CompoundKind::Class),
            "struct_specifier" => Some(CompoundKind::Struct),
            "union_specifier" => Some(CompoundKind::Union),
            _ => None,
        }
    }

    fn is_transparent(&self, node_kind: &str) -> bool {
        matches!(
            node_kind,
            "preproc_if"
                | "preproc_ifdef"
                | "preproc_else"
                | "preproc_elif"
                | "preproc_elifdef"
                | "linkage_specification"
                | "template_declaration"
                | "declaration_list"
                | "field_declaration_list"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_kinds() {
        let grammar = CppGrammar;
        assert_eq!(grammar.compound_kind("class_specifier"), Some(CompoundKind::Class));
        assert_eq!(grammar.compound_kind("struct_specifier"), Some(CompoundKind::Struct));
        assert_eq!(grammar.compound_kind("union_specifier"), Some(CompoundKind::Union));
        assert_eq!(grammar.compound_kind("enum_specifier"), None);
        assert_eq!(grammar.compound_kind("namespace_definition"), None);
    }

    #[test]
    fn test_transparent_kinds() {
        let grammar = CppGrammar;
        assert!(grammar.is_transparent("preproc_ifdef"));
        assert!(grammar.is_transparent("linkage_specification"));
        assert!(!grammar.is_transparent("namespace_definition"));
        assert!(!grammar.is_transparent("function_definition"));
    }
}
