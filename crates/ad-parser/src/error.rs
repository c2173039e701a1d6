/// Errors raised before or while building a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// Extension is not one of the JavaScript or TypeScript extensions.
    #[error("{path}: not a JavaScript or TypeScript source")]
    UnsupportedLanguage { path: String },

    #[error("{path}: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { path: String, size: u64, max: u64 },

    /// Null bytes or invalid UTF-8.
    #[error("{path}: not valid UTF-8 text")]
    InvalidEncoding { path: String },

    /// tree-sitter could not produce a tree at all. Syntax errors inside a
    /// tree are not reported here.
    #[error("{path}: parse failed: {reason}")]
    ParseFailed { path: String, reason: String },
}

impl ParserError {
    pub fn is_retryable(&self) -> bool {
        false
    }

    pub fn path(&self) -> &str {
        match self {
            Self::UnsupportedLanguage { path }
            | Self::FileTooLarge { path, .. }
            | Self::InvalidEncoding { path }
            | Self::ParseFailed { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_lead_with_path() {
        let err = ParserError::InvalidEncoding {
            path: "src/a.js".into(),
        };
        assert_eq!(err.to_string(), "src/a.js: not valid UTF-8 text");
        assert_eq!(err.path(), "src/a.js");
        assert!(!err.is_retryable());
    }
}
