//! Artifact naming.
//!
//! Every file a job produces starts with a base name: the sanitized resolved
//! title, or a token derived from the source identifier when no title is
//! available. The base name is also the key used to find produced files.

mod fallback;
mod sanitize;

pub use fallback::token_from_source;
pub use sanitize::sanitize_title;

use crate::types::SourceId;

/// Base name used when neither the title nor the identifier yield anything.
const DEFAULT_BASE: &str = "media";

/// Derives the artifact base name for `source`.
///
/// Prefers the resolved `title`; falls back to [`token_from_source`].
pub fn base_name(title: Option<&str>, source: &SourceId) -> String {
    let from_title = title.map(sanitize_title).filter(|s| !s.is_empty());
    if let Some(name) = from_title {
        return name;
    }
    let token = sanitize_title(&token_from_source(source));
    if token.is_empty() {
        DEFAULT_BASE.to_string()
    } else {
        token
    }
}
