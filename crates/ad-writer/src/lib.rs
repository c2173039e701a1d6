pub mod annotate;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod scanner;

pub use annotate::{annotate_source, describe_source, AnnotateOptions, Annotation, LARGE_FILE_WARNING};
pub use error::WriterError;
pub use config::{Config, ConfigOverrides, CONFIG_FILE_NAME};
pub use pipeline::{describe, run, DescribedFile};
pub use report::{RunReport, SkipReason};
pub use scanner::{scan_files, ScanResult};
