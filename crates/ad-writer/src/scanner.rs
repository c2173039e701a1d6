use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

use crate::error::WriterError;

/// Extensions of files the parser understands.
pub(crate) const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Generated file patterns to skip.
pub(crate) const GENERATED_PATTERNS: &[&str] = &[".generated.", ".min.js", ".bundle.js", ".d.ts"];

/// Vendor directories to skip.
pub(crate) const VENDOR_DIRS: &[&str] = &["vendor", "node_modules", "third_party", "bower_components"];

/// Result of scanning a project directory for source files.
#[derive(Debug)]
pub struct ScanResult {
    /// Paths relative to the project root.
    pub files: Vec<PathBuf>,
    /// Total entries seen (including skipped).
    pub total_entries: usize,
}

/// Scan a project directory for JavaScript and TypeScript sources.
///
/// Walks with the `ignore` crate, so `.gitignore` rules apply. `include`
/// globs whitelist files, `exclude` globs remove them; both are relative
/// to `project_root`.
pub fn scan_files(project_root: &Path, include: &[String], exclude: &[String]) -> Result<ScanResult, WriterError> {
    let mut overrides = OverrideBuilder::new(project_root);
    for glob in include {
        overrides.add(glob).map_err(|e| WriterError::Glob(e.to_string()))?;
    }
    for glob in exclude {
        overrides
            .add(&format!("!{glob}"))
            .map_err(|e| WriterError::Glob(e.to_string()))?;
    }
    let overrides = overrides.build().map_err(|e| WriterError::Glob(e.to_string()))?;

    let mut files = Vec::new();
    let mut total_entries = 0usize;

    let walker = WalkBuilder::new(project_root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .overrides(overrides)
        .filter_entry(|entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                if let Some(name) = entry.file_name().to_str() {
                    return !VENDOR_DIRS.contains(&name);
                }
            }
            true
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "walk entry skipped");
                continue;
            }
        };

        total_entries += 1;

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if !is_supported(path) || is_generated_file(path) {
            continue;
        }

        if let Ok(rel) = path.strip_prefix(project_root) {
            files.push(rel.to_path_buf());
        }
    }

    files.sort();
    Ok(ScanResult {
        files,
        total_entries,
    })
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

fn is_generated_file(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(n) => n.to_string_lossy(),
        None => return false,
    };
    GENERATED_PATTERNS.iter().any(|pattern| name.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(result: &ScanResult) -> Vec<String> {
        result
            .files
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn scan_empty_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = scan_files(tmp.path(), &[], &[]).unwrap();
        assert!(result.files.is_empty());
    }

    #[test]
    fn scan_finds_supported_sources_only() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("app.ts"), "export {}").unwrap();
        fs::write(src.join("util.mjs"), "export {}").unwrap();
        fs::write(src.join("style.css"), "body {}").unwrap();
        fs::write(src.join("README.md"), "# hi").unwrap();

        let result = scan_files(tmp.path(), &[], &[]).unwrap();
        assert_eq!(names(&result), ["src/app.ts", "src/util.mjs"]);
    }

    #[test]
    fn scan_skips_vendor_and_generated() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("index.js"), "x").unwrap();
        fs::write(tmp.path().join("bundle.min.js"), "x").unwrap();
        fs::write(tmp.path().join("types.d.ts"), "x").unwrap();
        let nm = tmp.path().join("node_modules").join("dep");
        fs::create_dir_all(&nm).unwrap();
        fs::write(nm.join("index.js"), "x").unwrap();

        let result = scan_files(tmp.path(), &[], &[]).unwrap();
        assert_eq!(names(&result), ["index.js"]);
    }

    #[test]
    fn scan_skips_hidden_dirs() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("a.js"), "x").unwrap();
        let hidden = tmp.path().join(".cache");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("b.js"), "x").unwrap();

        let result = scan_files(tmp.path(), &[], &[]).unwrap();
        assert_eq!(names(&result), ["a.js"]);
    }

    #[test]
    fn include_and_exclude_globs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let legacy = src.join("legacy");
        fs::create_dir_all(&legacy).unwrap();
        fs::write(tmp.path().join("build.js"), "x").unwrap();
        fs::write(src.join("main.ts"), "x").unwrap();
        fs::write(src.join("main.test.ts"), "x").unwrap();
        fs::write(legacy.join("old.js"), "x").unwrap();

        let include = vec!["src/**".to_string()];
        let exclude = vec!["**/*.test.ts".to_string(), "src/legacy/**".to_string()];
        let result = scan_files(tmp.path(), &include, &exclude).unwrap();
        assert_eq!(names(&result), ["src/main.ts"]);
    }

    #[test]
    fn invalid_glob_is_reported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = scan_files(tmp.path(), &["src/[".to_string()], &[]).unwrap_err();
        assert!(matches!(err, WriterError::Glob(_)));
    }
}
