//! HTML document extraction from model responses.

use regex::Regex;
use std::sync::LazyLock;

/// `<!DOCTYPE html>…</html>` or `<html…>…</html>`, case-insensitive,
/// `.` matching newlines, shortest inner content.
static DOCUMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!DOCTYPE html>.*?</html>|<html.*?</html>")
        .expect("document pattern is valid")
});

/// Find the first complete HTML document in `text`.
///
/// Returns the matched span verbatim, delimiters included. Later documents
/// in the same text are ignored, and a document missing its closing
/// `</html>` is not matched.
///
/// ```
/// use codemax_domain::creation::extractor::extract_document;
///
/// let reply = "Here you go:\n<!doctype html>\n<html><body>Hi</body></html>\nEnjoy!";
/// assert_eq!(
///     extract_document(reply),
///     Some("<!doctype html>\n<html><body>Hi</body></html>")
/// );
/// assert_eq!(extract_document("no markup here"), None);
/// ```
pub fn extract_document(text: &str) -> Option<&str> {
    DOCUMENT_RE.find(text).map(|m| m.as_str())
}
