//! Best-format selection under a height ceiling.

use crate::types::FormatCandidate;

/// Picks the tallest candidate not exceeding `height_ceiling`.
///
/// Candidates are considered tallest first; equal heights keep listing
/// order, so the first one encountered wins. When nothing fits under the
/// ceiling the overall tallest is returned. `None` only for an empty list.
pub fn select_format(
    candidates: &[FormatCandidate],
    height_ceiling: u32,
) -> Option<FormatCandidate> {
    let mut ordered: Vec<&FormatCandidate> = candidates.iter().collect();
    // Stable sort keeps listing order among equal heights.
    ordered.sort_by(|a, b| b.height.cmp(&a.height));

    ordered
        .iter()
        .find(|c| c.height <= height_ceiling)
        .or_else(|| ordered.first())
        .map(|c| (*c).clone())
}
