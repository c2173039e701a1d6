//! Leading comment detection.
//!
//! Only the physical line directly above a node is consulted. A blank line
//! between a comment and the node means the comment is not attached.

/// Whether a comment immediately precedes the node starting at `start_line`
/// (1-indexed).
///
/// Recognizes `//` line comments and `/* */` or `/** */` blocks whose closing
/// line sits right above the node. A block is only accepted when its opener
/// is reached without crossing a blank line.
pub fn has_leading_doc_comment(start_line: usize, source: &str) -> bool {
    if start_line < 2 {
        return false;
    }
    let lines: Vec<&str> = source.lines().collect();
    let above = start_line - 2;
    let Some(line) = lines.get(above).map(|l| l.trim()) else {
        return false;
    };

    if line.is_empty() {
        return false;
    }
    if line.starts_with("//") {
        return true;
    }
    if !line.ends_with("*/") {
        return false;
    }
    if line.contains("/*") {
        return true;
    }

    for candidate in lines[..above].iter().rev() {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return false;
        }
        if candidate.contains("/*") {
            return true;
        }
    }
    false
}
