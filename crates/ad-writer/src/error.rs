use std::io::ErrorKind;

/// Writer errors.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("parser error: {0}")]
    Parser(#[from] ad_parser::error::ParserError),

    #[error("invalid config {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("invalid glob: {0}")]
    Glob(String),

    #[error("pipeline failed at stage '{stage}': {reason}")]
    PipelineFailed { stage: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WriterError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Parser(e) => e.is_retryable(),
            Self::Io(e) => matches!(
                e.kind(),
                ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_io_is_retryable() {
        let err = WriterError::from(std::io::Error::new(ErrorKind::Interrupted, "signal"));
        assert!(err.is_retryable());
    }

    #[test]
    fn missing_file_is_not_retryable() {
        let err = WriterError::from(std::io::Error::new(ErrorKind::NotFound, "gone"));
        assert!(!err.is_retryable());
        assert!(!WriterError::Glob("[".into()).is_retryable());
    }
}
