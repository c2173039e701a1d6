use std::fs;
use std::path::{Path, PathBuf};

use ad_core::Language;
use ad_doc::DocOptions;
use serde::{Deserialize, Serialize};

use crate::annotate::AnnotateOptions;
use crate::error::WriterError;

/// Config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".autodocrc.json";

/// Configuration for an annotation run.
///
/// Every field is optional in the JSON file; missing ones take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns a file must match (empty: every supported file).
    pub include: Vec<String>,
    /// Glob patterns excluded from the run.
    pub exclude: Vec<String>,
    /// Write annotated copies here, mirroring relative paths, instead of in place.
    pub output_dir: Option<PathBuf>,
    /// Compute previews without touching the filesystem.
    pub dry_run: bool,
    /// Keep going after a file fails (default: true).
    pub continue_on_error: bool,
    /// Retries for transient I/O errors (default: 2).
    pub retries: u32,
    pub include_example: bool,
    pub include_todo_placeholder: bool,
    pub summary_template: Option<String>,
    pub param_template: Option<String>,
    /// Line count above which the large-file warning is added (default: 5000).
    pub large_file_lines: usize,
    /// Byte size above which the large-file warning is added (default: 256 KiB).
    pub large_file_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            output_dir: None,
            dry_run: false,
            continue_on_error: true,
            retries: 2,
            include_example: false,
            include_todo_placeholder: false,
            summary_template: None,
            param_template: None,
            large_file_lines: 5000,
            large_file_bytes: 256 * 1024,
        }
    }
}

/// Command-line values layered over a loaded [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub include_example: bool,
    pub include_todo_placeholder: bool,
    pub no_continue: bool,
    pub retries: Option<u32>,
}

impl Config {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, WriterError> {
        let text = fs::read_to_string(path).map_err(|e| WriterError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| WriterError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load `.autodocrc.json` next to `root`, or fall back to defaults.
    pub fn discover(root: &Path) -> Result<Self, WriterError> {
        let dir = if root.is_file() {
            root.parent().unwrap_or(root)
        } else {
            root
        };
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "config file found");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line flags. Flags only ever switch features on; include
    /// globs replace the file's list, exclude globs extend it.
    pub fn merge_overrides(&mut self, overrides: ConfigOverrides) {
        if !overrides.include.is_empty() {
            self.include = overrides.include;
        }
        self.exclude.extend(overrides.exclude);
        if overrides.output_dir.is_some() {
            self.output_dir = overrides.output_dir;
        }
        self.dry_run |= overrides.dry_run;
        self.include_example |= overrides.include_example;
        self.include_todo_placeholder |= overrides.include_todo_placeholder;
        if overrides.no_continue {
            self.continue_on_error = false;
        }
        if let Some(retries) = overrides.retries {
            self.retries = retries;
        }
    }

    pub fn doc_options(&self, language: Language) -> DocOptions {
        DocOptions {
            typed: language.is_typed(),
            include_example: self.include_example,
            include_todo_placeholder: self.include_todo_placeholder,
            summary_template: self.summary_template.clone(),
            param_template: self.param_template.clone(),
        }
    }

    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            doc: self.doc_options(Language::JavaScript),
            large_file_lines: self.large_file_lines,
            large_file_bytes: self.large_file_bytes,
        }
    }
}
