use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Source languages AutoDoc can document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    TypeScript,
    JavaScript,
}

impl Language {
    /// Map a file extension to a Language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Whether type annotations in this language are trusted for inference.
    pub fn is_typed(self) -> bool {
        matches!(self, Self::TypeScript)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
        }
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" | "tsx" => Ok(Self::TypeScript),
            "javascript" | "js" | "jsx" => Ok(Self::JavaScript),
            _ => Err(CoreError::UnknownLanguage {
                name: s.to_string(),
            }),
        }
    }
}
