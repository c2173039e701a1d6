pub mod extract;
pub mod infer;
mod options;
pub mod render;
pub mod returns;

pub use extract::{extract_params, Extractor, Naming};
pub use infer::{infer_type, literal_type};
pub use options::DocOptions;
pub use render::{document_function, render, FALLBACK_COMMENT};
pub use returns::infer_return;
