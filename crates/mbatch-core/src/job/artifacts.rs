//! Locating files produced by the fetch tool in the output directory.

use std::path::{Path, PathBuf};

const VIDEO_EXTS: &[&str] = &["mp4", "webm", "mkv", "mov", "flv", "avi"];
const AUDIO_EXTS: &[&str] = &["m4a", "mp3", "opus", "ogg", "oga", "aac", "wav", "flac"];
/// In-progress or bookkeeping files left by the fetch tool.
const PARTIAL_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
}

/// Stream kind implied by the file extension.
pub fn classify(path: &Path) -> Option<StreamKind> {
    let ext = path.extension()?.to_str()?;
    if VIDEO_EXTS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
        Some(StreamKind::Video)
    } else if AUDIO_EXTS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
        Some(StreamKind::Audio)
    } else {
        None
    }
}

/// Files in `dir` whose name starts with `<base>.`, sorted by name.
///
/// Partial downloads are skipped. Merged outputs (`<base><suffix>.ext`) do
/// not carry the `<base>.` prefix and are never returned.
pub async fn scan(dir: &Path, base: &str) -> std::io::Result<Vec<PathBuf>> {
    let prefix = format!("{base}.");
    let mut found = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(&prefix) || PARTIAL_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            continue;
        }
        if !entry.file_type().await?.is_file() {
            continue;
        }
        found.push(entry.path());
    }
    found.sort();
    Ok(found)
}

/// Splits the files of one video fetch into `(video, audio)`.
///
/// With a known `video_id` the video is the file named `<base>.f<video_id>.*`
/// and the audio is any other stream file, whatever its container. Without
/// one, extensions decide, and only when they name different stream kinds.
pub fn pick_streams(
    paths: &[PathBuf],
    base: &str,
    video_id: Option<&str>,
) -> (Option<PathBuf>, Option<PathBuf>) {
    let Some(id) = video_id else {
        return (first_of(paths, StreamKind::Video), first_of(paths, StreamKind::Audio));
    };
    let marker = format!("{base}.f{id}.");
    let video = paths
        .iter()
        .find(|p| file_name(p).is_some_and(|n| n.starts_with(&marker)))
        .cloned();
    let mut others = paths
        .iter()
        .filter(|p| Some(*p) != video.as_ref() && classify(p).is_some());
    let audio = others
        .clone()
        .find(|p| classify(p) == Some(StreamKind::Audio))
        .or_else(|| others.next())
        .cloned();
    (video, audio)
}

/// First file whose extension names `kind`.
pub fn first_of(paths: &[PathBuf], kind: StreamKind) -> Option<PathBuf> {
    paths.iter().find(|p| classify(p) == Some(kind)).cloned()
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()
}
