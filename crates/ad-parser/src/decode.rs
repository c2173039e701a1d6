use crate::error::ParserError;

/// Largest source file the annotator will touch (1 MB).
pub const MAX_SOURCE_BYTES: u64 = 1_048_576;

/// Validate raw file bytes as annotatable source text.
///
/// The larger of `declared_size` (from metadata) and the buffer length must
/// fit in [`MAX_SOURCE_BYTES`]. A raw NUL anywhere in the buffer marks the
/// file as binary since no JavaScript or TypeScript source can contain one
/// outside an escape sequence.
pub fn decode_source<'a>(path: &str, content: &'a [u8], declared_size: u64) -> Result<&'a str, ParserError> {
    let size = declared_size.max(content.len() as u64);
    if size > MAX_SOURCE_BYTES {
        return Err(ParserError::FileTooLarge {
            path: path.to_string(),
            size,
            max: MAX_SOURCE_BYTES,
        });
    }

    let invalid = || ParserError::InvalidEncoding {
        path: path.to_string(),
    };
    if content.contains(&0) {
        return Err(invalid());
    }
    std::str::from_utf8(content).map_err(|_| invalid())
}
