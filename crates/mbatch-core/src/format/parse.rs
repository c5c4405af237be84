//! Parse the fetch tool's format table (`yt-dlp -F`) into candidates.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::FormatCandidate;

/// `<format_id> <ext> <width>x<height>` at the start of a table row.
fn row_pattern() -> &'static Regex {
    static ROW: OnceLock<Regex> = OnceLock::new();
    ROW.get_or_init(|| {
        Regex::new(r"^\s*(\S+)\s+(\w+)\s+(\d+)x(\d+)\b").expect("valid format row regex")
    })
}

/// Extracts `(format_id, height)` candidates in listing order.
///
/// Header lines, `audio only` rows and storyboard (`mhtml`) rows do not
/// yield candidates.
pub fn parse_listing(text: &str) -> Vec<FormatCandidate> {
    let re = row_pattern();
    text.lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            if caps[2].eq_ignore_ascii_case("mhtml") {
                return None;
            }
            let height = caps[4].parse::<u32>().ok()?;
            Some(FormatCandidate {
                format_id: caps[1].to_string(),
                height,
            })
        })
        .collect()
}
