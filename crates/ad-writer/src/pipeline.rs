use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ad_doc::render::FunctionDoc;
use ad_parser::error::ParserError;
use ad_parser::{parse_file, ParseOutput};
use rayon::prelude::*;
use serde::Serialize;

use crate::annotate::{annotate_parsed, describe_parsed, Annotation};
use crate::config::Config;
use crate::error::WriterError;
use crate::report::{RunReport, SkipReason};
use crate::scanner::scan_files;

/// Base delay between I/O retries; grows linearly per attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Outcome of annotating a single file.
enum FileOutcome {
    Annotated {
        rel_path: PathBuf,
        source: String,
        annotation: Annotation,
    },
    Skipped(SkipReason),
    Failed(String, String),
}

/// Documentation model of one file, as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct DescribedFile {
    pub path: String,
    pub functions: Vec<FunctionDoc>,
}

/// Annotate every source file under `root`.
///
/// Pipeline: scan → parallel parse and annotate (rayon) → sequential write.
/// `root` may also be a single file.
#[tracing::instrument(skip(config))]
pub fn run(root: &Path, config: &Config) -> Result<RunReport, WriterError> {
    let start = Instant::now();
    let (base, files) = discover(root, config)?;
    let total_files_scanned = files.len();
    tracing::info!(files = total_files_scanned, "annotation started");

    let options = config.annotate_options();
    let parent_span = tracing::Span::current();
    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|rel_path| {
            let _guard =
                tracing::debug_span!(parent: &parent_span, "annotate_file", path = %rel_path.display())
                    .entered();
            match read_and_parse(base, rel_path, config.retries) {
                Ok((source, parsed)) => {
                    let annotation = annotate_parsed(&source, &parsed, &options);
                    FileOutcome::Annotated {
                        rel_path: rel_path.clone(),
                        source,
                        annotation,
                    }
                }
                Err(outcome) => outcome,
            }
        })
        .collect();

    if !config.continue_on_error {
        if let Some(FileOutcome::Failed(path, reason)) =
            outcomes.iter().find(|o| matches!(o, FileOutcome::Failed(..)))
        {
            return Err(WriterError::PipelineFailed {
                stage: "annotate".to_string(),
                reason: format!("{path}: {reason}"),
            });
        }
    }

    let mut report = RunReport {
        total_files_scanned,
        ..RunReport::default()
    };

    for outcome in outcomes {
        match outcome {
            FileOutcome::Annotated {
                rel_path,
                source,
                annotation,
            } => {
                let rel_str = normalize_path(&rel_path);
                let changed = annotation.changed(&source);
                report.functions_documented += annotation.documented;
                report.functions_already_documented += annotation.already_documented;
                report.fallbacks += annotation.fallbacks;
                if changed {
                    report.files_changed += 1;
                } else {
                    report.files_unchanged += 1;
                }

                if config.dry_run {
                    if changed {
                        report.previews.push((rel_str, annotation.output));
                    }
                    continue;
                }

                let target = match &config.output_dir {
                    Some(dir) => dir.join(&rel_path),
                    None if changed => base.join(&rel_path),
                    None => continue,
                };
                if let Err(e) = write_output(&target, &annotation.output, config.retries) {
                    if !config.continue_on_error {
                        return Err(WriterError::PipelineFailed {
                            stage: "write".to_string(),
                            reason: format!("{rel_str}: {e}"),
                        });
                    }
                    tracing::warn!(path = %rel_str, error = %e, "write failed");
                    report.files_failed += 1;
                    report.failed_details.push((rel_str, e.to_string()));
                }
            }
            FileOutcome::Skipped(reason) => {
                *report.files_skipped.entry(reason).or_insert(0) += 1;
            }
            FileOutcome::Failed(path, reason) => {
                tracing::warn!(path = %path, error = %reason, "file failed");
                report.files_failed += 1;
                report.failed_details.push((path, reason));
            }
        }
    }

    report.duration = start.elapsed();
    tracing::info!(
        changed = report.files_changed,
        documented = report.functions_documented,
        failed = report.files_failed,
        duration_secs = %format!("{:.2}", report.duration.as_secs_f64()),
        "annotation completed"
    );

    Ok(report)
}

/// Documentation model of every function under `root`, without writing.
#[tracing::instrument(skip(config))]
pub fn describe(root: &Path, config: &Config) -> Result<Vec<DescribedFile>, WriterError> {
    let (base, files) = discover(root, config)?;
    let options = config.doc_options(ad_core::Language::JavaScript);

    let described: Vec<Option<DescribedFile>> = files
        .par_iter()
        .map(|rel_path| match read_and_parse(base, rel_path, config.retries) {
            Ok((_, parsed)) => Some(DescribedFile {
                path: normalize_path(rel_path),
                functions: describe_parsed(&parsed, &options),
            }),
            Err(FileOutcome::Failed(path, reason)) => {
                tracing::warn!(path = %path, error = %reason, "file failed");
                None
            }
            Err(_) => None,
        })
        .collect();

    Ok(described.into_iter().flatten().collect())
}

/// Base directory and relative file list for a run rooted at `root`.
fn discover<'a>(root: &'a Path, config: &Config) -> Result<(&'a Path, Vec<PathBuf>), WriterError> {
    if root.is_file() {
        let base = root.parent().unwrap_or(Path::new(""));
        let name = root.file_name().map(PathBuf::from).ok_or_else(|| WriterError::PipelineFailed {
            stage: "scan".to_string(),
            reason: format!("{} has no file name", root.display()),
        })?;
        return Ok((base, vec![name]));
    }
    let scan = scan_files(root, &config.include, &config.exclude)?;
    Ok((root, scan.files))
}

fn read_and_parse(base: &Path, rel_path: &Path, retries: u32) -> Result<(String, ParseOutput), FileOutcome> {
    let rel_str = normalize_path(rel_path);
    let abs_path = base.join(rel_path);

    let content = with_retries(retries, &rel_str, || fs::read(&abs_path))
        .map_err(|e| FileOutcome::Failed(rel_str.clone(), e.to_string()))?;

    let parsed = parse_file(&rel_str, &content, content.len() as u64).map_err(|e| match &e {
        ParserError::FileTooLarge { .. } => FileOutcome::Skipped(SkipReason::TooLarge),
        ParserError::InvalidEncoding { .. } => FileOutcome::Skipped(SkipReason::Binary),
        ParserError::UnsupportedLanguage { .. } => FileOutcome::Skipped(SkipReason::UnsupportedLanguage),
        ParserError::ParseFailed { reason, .. } => FileOutcome::Failed(e.path().to_string(), reason.clone()),
    })?;

    // parse_file rejected invalid UTF-8 above
    let source = String::from_utf8(content)
        .map_err(|e| FileOutcome::Failed(rel_str.clone(), e.to_string()))?;
    Ok((source, parsed))
}

fn write_output(target: &Path, contents: &str, retries: u32) -> Result<(), WriterError> {
    let label = target.display().to_string();
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            with_retries(retries, &label, || fs::create_dir_all(parent))?;
        }
    }
    with_retries(retries, &label, || fs::write(target, contents))
}

/// Run an I/O operation, retrying transient failures.
fn with_retries<T>(retries: u32, path: &str, mut op: impl FnMut() -> io::Result<T>) -> Result<T, WriterError> {
    let mut attempt = 0u32;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let err = WriterError::Io(e);
                if attempt >= retries || !err.is_retryable() {
                    return Err(err);
                }
                attempt += 1;
                tracing::warn!(path, attempt, error = %err, "transient io error, retrying");
                std::thread::sleep(RETRY_BACKOFF * attempt);
            }
        }
    }
}

/// Normalize a path to forward-slash format.
fn normalize_path(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::ErrorKind;

    #[test]
    fn retries_transient_errors() {
        let calls = Cell::new(0);
        let result = with_retries(2, "a.js", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(io::Error::new(ErrorKind::Interrupted, "again"))
            } else {
                Ok(7)
            }
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn gives_up_after_retry_budget() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retries(1, "a.js", || {
            calls.set(calls.get() + 1);
            Err(io::Error::new(ErrorKind::TimedOut, "slow"))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retries(5, "a.js", || {
            calls.set(calls.get() + 1);
            Err(io::Error::new(ErrorKind::NotFound, "gone"))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn single_file_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("one.js");
        fs::write(&file, "function one(a) { return a; }\n").unwrap();

        let report = run(&file, &Config::default()).unwrap();
        assert_eq!(report.total_files_scanned, 1);
        assert_eq!(report.files_changed, 1);
        let written = fs::read_to_string(&file).unwrap();
        assert!(written.starts_with("/**\n * Function one with parameter 'a'\n"));
    }
}
