//! Source list loading: one identifier per line, trimmed, blanks dropped,
//! first occurrence wins.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::types::SourceId;

#[derive(Debug, thiserror::Error)]
pub enum SourceListError {
    /// The list file could not be read. Fatal for the batch.
    #[error("source list unavailable: {path}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Deduplicated source list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceList {
    /// Unique sources in first-seen order.
    pub unique: Vec<SourceId>,
    /// Every repeated occurrence, in input order.
    pub duplicates: Vec<SourceId>,
}

impl SourceList {
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unique.is_empty()
    }
}

/// Parses raw list text into a deduplicated [`SourceList`].
pub fn parse(text: &str) -> SourceList {
    let mut seen = HashSet::new();
    let mut list = SourceList::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let id = SourceId::new(line);
        if seen.insert(id.clone()) {
            list.unique.push(id);
        } else {
            list.duplicates.push(id);
        }
    }
    list
}

/// Reads and parses the list at `path`.
pub fn load(path: &Path) -> Result<SourceList, SourceListError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceListError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let list = parse(&text);
    tracing::debug!(
        path = %path.display(),
        unique = list.unique.len(),
        duplicates = list.duplicate_count(),
        "loaded source list"
    );
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ids(raw: &[&str]) -> Vec<SourceId> {
        raw.iter().map(|s| SourceId::from(*s)).collect()
    }

    #[test]
    fn first_occurrence_wins() {
        let list = parse("a.com/1\na.com/1\na.com/2\n");
        assert_eq!(list.unique, ids(&["a.com/1", "a.com/2"]));
        assert_eq!(list.duplicates, ids(&["a.com/1"]));
        assert_eq!(list.duplicate_count(), 1);
    }

    #[test]
    fn trims_and_skips_blank_lines() {
        let list = parse("  https://x/1  \n\n\t\n https://x/2\r\nhttps://x/1\n");
        assert_eq!(list.unique, ids(&["https://x/1", "https://x/2"]));
        assert_eq!(list.duplicates, ids(&["https://x/1"]));
    }

    #[test]
    fn every_repeat_is_counted() {
        let list = parse("u\nu\nu\nv\nv\n");
        assert_eq!(list.unique, ids(&["u", "v"]));
        assert_eq!(list.duplicate_count(), 3);
    }

    #[test]
    fn empty_input() {
        let list = parse("\n   \n");
        assert!(list.is_empty());
        assert_eq!(list.duplicate_count(), 0);
    }

    #[test]
    fn load_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"https://v/1\nhttps://v/2\nhttps://v/1\n").unwrap();
        f.flush().unwrap();
        let list = load(f.path()).unwrap();
        assert_eq!(list.unique.len(), 2);
        assert_eq!(list.duplicate_count(), 1);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, SourceListError::Unavailable { .. }));
    }
}
