//! Search query normalization.

/// Queries shorter than this (after trimming) are not sent.
pub const MIN_QUERY_CHARS: usize = 3;

/// The search endpoint rejects `q` values longer than this.
pub const MAX_QUERY_CHARS: usize = 100;

/// Turn free text into something the search endpoint accepts.
///
/// Keeps only `[A-Za-z0-9 -]`, collapses whitespace and cuts the result to
/// [`MAX_QUERY_CHARS`] on a word boundary. Returns `None` when the trimmed
/// input is shorter than [`MIN_QUERY_CHARS`] or nothing usable is left.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return None;
    }

    let kept: String = trimmed
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");

    // Only ASCII survives the filter above, so byte offsets are char offsets.
    let truncated = if collapsed.len() > MAX_QUERY_CHARS {
        let head = &collapsed[..MAX_QUERY_CHARS];
        if collapsed.as_bytes()[MAX_QUERY_CHARS] == b' ' {
            head
        } else {
            match head.rfind(' ') {
                Some(idx) => &head[..idx],
                None => head,
            }
        }
    } else {
        collapsed.as_str()
    };

    let query = truncated.trim();
    (!query.is_empty()).then(|| query.to_string())
}
