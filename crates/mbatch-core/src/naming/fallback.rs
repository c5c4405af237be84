//! Name token derived from a source identifier.

/// Token for naming artifacts when the title is unknown.
///
/// For URLs: the `v` query value if present, else the last path segment,
/// else the host. Non-URL identifiers are returned as-is. The result is not
/// yet sanitized.
pub fn token_from_source(source: &crate::types::SourceId) -> String {
    let raw = source.as_str();
    let Ok(parsed) = url::Url::parse(raw) else {
        return raw.to_string();
    };
    if let Some((_, v)) = parsed.query_pairs().find(|(k, v)| k == "v" && !v.is_empty()) {
        return v.into_owned();
    }
    if let Some(segment) = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
    {
        return segment.to_string();
    }
    parsed.host_str().unwrap_or(raw).to_string()
}
