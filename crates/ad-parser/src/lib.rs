pub mod comment;
mod decode;
pub mod error;
mod lower;
mod registry;
mod visitor;

pub use comment::has_leading_doc_comment;
pub use decode::{decode_source, MAX_SOURCE_BYTES};
pub use registry::ParserRegistry;
pub use visitor::{parse_file, parse_source, FunctionSite, ParseOutput};
