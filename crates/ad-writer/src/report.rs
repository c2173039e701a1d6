use std::collections::HashMap;
use std::time::Duration;

/// Reason why a file was skipped during a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SkipReason {
    TooLarge,
    Binary,
    UnsupportedLanguage,
}

/// Report generated after an annotation run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub total_files_scanned: usize,
    /// Files whose annotated output differs from the input.
    pub files_changed: usize,
    pub files_unchanged: usize,
    pub files_skipped: HashMap<SkipReason, usize>,
    pub files_failed: usize,
    pub failed_details: Vec<(String, String)>,
    pub functions_documented: usize,
    pub functions_already_documented: usize,
    pub fallbacks: usize,
    /// `(relative path, annotated output)` for changed files in dry-run mode.
    pub previews: Vec<(String, String)>,
    pub duration: Duration,
}

impl RunReport {
    pub fn total_skipped(&self) -> usize {
        self.files_skipped.values().sum()
    }

    pub fn has_failures(&self) -> bool {
        self.files_failed > 0
    }
}
