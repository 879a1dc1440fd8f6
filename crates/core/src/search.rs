//! Listing and search helpers shared by the repository and API layers.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of rows per page.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of rows per page.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Escape character used in generated `LIKE` patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Build a substring pattern for `ILIKE ... ESCAPE '\'`.
///
/// The input is trimmed and `%`, `_` and `\` are escaped so they match
/// literally. A blank query yields `%%`, which matches everything.
///
/// # Examples
///
/// ```
/// use autoflow_core::search::contains_pattern;
/// assert_eq!(contains_pattern(" engine "), "%engine%");
/// assert_eq!(contains_pattern("50%"), "%50\\%%");
/// ```
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
