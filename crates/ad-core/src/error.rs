/// Errors from ad-core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("unknown language: {name}")]
    UnknownLanguage { name: String },
}

