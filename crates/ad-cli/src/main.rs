//! autodoc - generate JSDoc comments for JavaScript and TypeScript sources

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ad_core::Language;
use ad_writer::{annotate_source, describe, describe_source, run, Config, ConfigOverrides, RunReport};

#[derive(Parser)]
#[command(name = "autodoc")]
#[command(version)]
#[command(about = "Generate JSDoc comments for undocumented JavaScript and TypeScript functions", long_about = None)]
struct Cli {
    /// Files or directories to process
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Config file (default: .autodocrc.json in each path)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only process files matching this glob (repeatable)
    #[arg(long)]
    include: Vec<String>,

    /// Skip files matching this glob (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Write annotated files here instead of in place
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print annotated output without writing files
    #[arg(long)]
    dry_run: bool,

    /// Add an @example section to each comment
    #[arg(long)]
    example: bool,

    /// Add a TODO line to each comment
    #[arg(long)]
    todo: bool,

    /// Stop at the first file that fails
    #[arg(long)]
    no_continue: bool,

    /// Retries for transient I/O errors
    #[arg(long)]
    retries: Option<u32>,

    /// Print the parameter model of every function as JSON instead of writing
    #[arg(long)]
    json: bool,

    /// Read source from stdin and write the result to stdout
    #[arg(long)]
    stdin: bool,

    /// Language of stdin input (typescript, javascript, ts, js)
    #[arg(long, requires = "stdin")]
    language: Option<Language>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            output_dir: self.output_dir.clone(),
            dry_run: self.dry_run,
            include_example: self.example,
            include_todo_placeholder: self.todo,
            no_continue: self.no_continue,
            retries: self.retries,
        }
    }

    fn load_config(&self, root: &Path) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::discover(root)?,
        };
        config.merge_overrides(self.overrides());
        tracing::debug!(?config, "effective config");
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    // `ignore` logs through the `log` facade
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("warning: log bridge not installed: {e}");
    }
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when at least one file failed.
fn execute(cli: &Cli) -> Result<bool> {
    if cli.stdin {
        return annotate_stdin(cli);
    }

    if cli.json {
        let mut files = Vec::new();
        for path in &cli.paths {
            let config = cli.load_config(path)?;
            files.extend(describe(path, &config).with_context(|| format!("failed to read {}", path.display()))?);
        }
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(true);
    }

    let mut ok = true;
    for path in &cli.paths {
        let config = cli.load_config(path)?;
        let report = run(path, &config).with_context(|| format!("failed to annotate {}", path.display()))?;
        print_report(&report);
        ok &= !report.has_failures();
    }
    Ok(ok)
}

fn annotate_stdin(cli: &Cli) -> Result<bool> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("failed to read stdin")?;
    let language = cli.language.unwrap_or(Language::JavaScript);
    let config = cli.load_config(Path::new("."))?;

    if cli.json {
        let functions = describe_source(&source, language, &config.doc_options(language))?;
        println!("{}", serde_json::to_string_pretty(&functions)?);
    } else {
        let annotation = annotate_source(&source, language, &config.annotate_options())?;
        print!("{}", annotation.output);
    }
    Ok(true)
}

fn print_report(report: &RunReport) {
    for (path, output) in &report.previews {
        println!("--- {path}");
        println!("{output}");
    }
    for (path, reason) in &report.failed_details {
        eprintln!("failed: {path}: {reason}");
    }
    eprintln!(
        "{} file(s) changed, {} function(s) documented ({} fallback), {} already documented, {} skipped, {} failed in {:.2}s",
        report.files_changed,
        report.functions_documented,
        report.fallbacks,
        report.functions_already_documented,
        report.total_skipped(),
        report.files_failed,
        report.duration.as_secs_f64(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "autodoc",
            "src",
            "--exclude",
            "**/*.test.ts",
            "--dry-run",
            "--todo",
            "--no-continue",
            "--retries",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.paths, [PathBuf::from("src")]);
        let overrides = cli.overrides();
        assert_eq!(overrides.exclude, ["**/*.test.ts"]);
        assert!(overrides.dry_run);
        assert!(overrides.include_todo_placeholder);
        assert!(!overrides.include_example);
        assert!(overrides.no_continue);
        assert_eq!(overrides.retries, Some(4));
    }

    #[test]
    fn default_path_is_current_dir() {
        let cli = Cli::try_parse_from(["autodoc"]).unwrap();
        assert_eq!(cli.paths, [PathBuf::from(".")]);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn language_requires_stdin() {
        assert!(Cli::try_parse_from(["autodoc", "--language", "ts"]).is_err());
        let cli = Cli::try_parse_from(["autodoc", "--stdin", "--language", "ts", "-vv"]).unwrap();
        assert_eq!(cli.language, Some(Language::TypeScript));
        assert_eq!(cli.verbose, 2);
    }
}
