use ad_core::Language;
use tree_sitter::Language as TSLanguage;

/// Maps file extensions to tree-sitter grammars and Language enums.
pub struct ParserRegistry;

impl ParserRegistry {
    /// Get the tree-sitter grammar for a given Language and file extension.
    /// TSX files and all JavaScript use the TSX grammar so JSX parses.
    pub fn grammar_for_extension(lang: Language, ext: &str) -> TSLanguage {
        match lang {
            Language::TypeScript => {
                if ext == "tsx" {
                    tree_sitter_typescript::LANGUAGE_TSX.into()
                } else {
                    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
                }
            }
            Language::JavaScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Resolve a file extension to a Language.
    /// Delegates to `Language::from_extension`.
    pub fn language_for_extension(ext: &str) -> Option<Language> {
        Language::from_extension(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_languages_have_grammars() {
        let cases = [
            (Language::TypeScript, "ts"),
            (Language::TypeScript, "tsx"),
            (Language::JavaScript, "js"),
            (Language::JavaScript, "jsx"),
        ];
        for (lang, ext) in cases {
            let grammar = ParserRegistry::grammar_for_extension(lang, ext);
            let mut parser = tree_sitter::Parser::new();
            assert!(parser.set_language(&grammar).is_ok());
        }
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(
            ParserRegistry::language_for_extension("ts"),
            Some(Language::TypeScript)
        );
        assert_eq!(
            ParserRegistry::language_for_extension("mjs"),
            Some(Language::JavaScript)
        );
        assert_eq!(ParserRegistry::language_for_extension("css"), None);
    }
}
