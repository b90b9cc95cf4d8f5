//! # Common-Name Extraction
//!
//! Fallback parsing of a caller's subject string when no parsed certificate
//! is available.

/// Marker preceding the common name in a subject string.
pub const CN_MARKER: &str = "CN=";

/// Delimiter terminating the subject component that holds the common name.
pub const SUBJECT_DELIMITER: &str = "::";

/// Extracts the common name from a subject of the form `…CN=<name>::…`.
///
/// The name runs from the first `CN=` marker to the next `::` delimiter, or
/// to the end of the string if none follows. A subject without any `CN=`
/// marker is returned unchanged, so the result is never empty for a
/// non-empty subject.
#[must_use]
pub fn extract_common_name(subject: &str) -> &str {
    let Some(start) = subject.find(CN_MARKER) else {
        return subject;
    };
    let rest = &subject[start + CN_MARKER.len()..];
    match rest.find(SUBJECT_DELIMITER) {
        Some(end) => &rest[..end],
        None => rest,
    }
}
