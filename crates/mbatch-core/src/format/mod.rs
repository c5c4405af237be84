//! Format selection: listing parser plus a pure selection function.
//!
//! The parser is the only place that knows the fetch tool's table layout;
//! selection works on plain `(format_id, height)` candidates.

mod parse;
mod select;

pub use parse::parse_listing;
pub use select::select_format;

use crate::tool::{FetchTool, ToolError};
use crate::types::{FormatCandidate, SourceId};

/// Why no format could be chosen for a source.
#[derive(Debug, thiserror::Error)]
pub enum FormatUnavailable {
    #[error("format listing failed: {0}")]
    Listing(#[from] ToolError),
    #[error("no video formats listed")]
    NoCandidates,
}

/// Lists formats for `source` and picks the best one under `height_ceiling`.
pub async fn select_for_source<T>(
    tool: &T,
    source: &SourceId,
    height_ceiling: u32,
) -> Result<FormatCandidate, FormatUnavailable>
where
    T: FetchTool + ?Sized,
{
    let listing = tool.list_formats(source).await?;
    let candidates = parse_listing(&listing);
    let picked = select_format(&candidates, height_ceiling).ok_or(FormatUnavailable::NoCandidates)?;
    if picked.height > height_ceiling {
        tracing::info!(
            source = %source,
            height = picked.height,
            ceiling = height_ceiling,
            "no format under ceiling; using tallest available"
        );
    } else {
        tracing::debug!(source = %source, format = %picked.format_id, height = picked.height, "selected format");
    }
    Ok(picked)
}
