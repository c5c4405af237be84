//! Filesystem-safe artifact names.

/// Longest base name we produce, leaving room for format tags, suffixes and
/// an extension under Linux NAME_MAX (255 bytes).
const MAX_BASE_BYTES: usize = 200;

/// Sanitizes a media title into a file base name.
///
/// - Drops characters illegal on common filesystems (`<>:"/\|?*`) and
///   control characters
/// - Collapses runs of whitespace into one space
/// - Trims leading/trailing spaces and dots
/// - Limits length to 200 bytes on a char boundary
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_space = false;

    for c in title.chars() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else if matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
        {
            continue;
        } else {
            out.push(c);
            prev_space = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.');

    if trimmed.len() > MAX_BASE_BYTES {
        let mut take = MAX_BASE_BYTES;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].trim_end().to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_illegal_characters() {
        assert_eq!(
            sanitize_title("AC/DC: Back in Black? <Official> \"Video\" | HD*"),
            "ACDC Back in Black Official Video HD"
        );
    }

    #[test]
    fn keeps_unicode_and_punctuation() {
        assert_eq!(sanitize_title("Canção - Ao Vivo (2019)"), "Canção - Ao Vivo (2019)");
    }

    #[test]
    fn trims_dots_and_spaces() {
        assert_eq!(sanitize_title("  ..  title  ..  "), "title");
    }

    #[test]
    fn control_chars_and_tabs() {
        assert_eq!(sanitize_title("a\x00b\tc\n\nd"), "ab c d");
    }

    #[test]
    fn caps_length_on_char_boundary() {
        let long = "é".repeat(150);
        let s = sanitize_title(&long);
        assert!(s.len() <= MAX_BASE_BYTES);
        assert!(s.chars().all(|c| c == 'é'));
    }
}
