//! Scripted stand-ins for the fetch and mux tools.
//!
//! The fake fetch tool expands the job's output template the way yt-dlp
//! does (`%(format_id)s`, `%(ext)s`) and writes real files, so artifact
//! discovery and merging run against an actual directory.

#![allow(dead_code)]

use async_trait::async_trait;
use mbatch_core::tool::{FetchRequest, FetchTool, FormatRequest, MuxTool, ToolError};
use mbatch_core::types::SourceId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// What one fetch invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// Writes the expected files.
    Complete,
    /// Exits cleanly but writes only the video stream.
    VideoOnly,
    /// Exits cleanly without writing anything.
    Nothing,
    /// Exits non-zero.
    Fail,
}

#[derive(Debug, Clone)]
pub struct FakeSource {
    pub title: Option<String>,
    /// (format id, height) rows of the listing.
    pub formats: Vec<(&'static str, u32)>,
    /// One entry per attempt; the last repeats.
    pub fetches: Vec<Fetch>,
}

impl FakeSource {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            formats: vec![("160", 144), ("135", 480), ("137", 1080), ("401", 2160)],
            fetches: vec![Fetch::Complete],
        }
    }

    pub fn formats(mut self, formats: &[(&'static str, u32)]) -> Self {
        self.formats = formats.to_vec();
        self
    }

    pub fn fetches(mut self, fetches: &[Fetch]) -> Self {
        self.fetches = fetches.to_vec();
        self
    }
}

#[derive(Default)]
struct FetchState {
    sources: HashMap<SourceId, FakeSource>,
    calls: HashMap<SourceId, usize>,
    requests: Vec<(SourceId, FormatRequest)>,
}

/// Clonable handle; clones share call counters.
#[derive(Clone, Default)]
pub struct FakeFetchTool {
    state: Arc<Mutex<FetchState>>,
}

impl FakeFetchTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(self, source: &str, spec: FakeSource) -> Self {
        self.state
            .lock()
            .unwrap()
            .sources
            .insert(SourceId::from(source), spec);
        self
    }

    pub fn fetch_calls(&self, source: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .calls
            .get(&SourceId::from(source))
            .copied()
            .unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<(SourceId, FormatRequest)> {
        self.state.lock().unwrap().requests.clone()
    }

    fn spec(&self, source: &SourceId) -> Result<FakeSource, ToolError> {
        self.state
            .lock()
            .unwrap()
            .sources
            .get(source)
            .cloned()
            .ok_or_else(|| ToolError::Failed {
                tool: "yt-dlp".into(),
                code: Some(1),
                detail: format!("ERROR: Unsupported URL: {source}"),
            })
    }
}

fn expand(template: &Path, format_id: &str, ext: &str) -> PathBuf {
    PathBuf::from(
        template
            .to_string_lossy()
            .replace("%(format_id)s", format_id)
            .replace("%(ext)s", ext)
            .replace("%%", "%"),
    )
}

#[async_trait]
impl FetchTool for FakeFetchTool {
    async fn list_formats(&self, source: &SourceId) -> Result<String, ToolError> {
        let spec = self.spec(source)?;
        let mut out = String::from(
            "[info] Available formats\nID  EXT   RESOLUTION FPS\n---------------------------\n",
        );
        out.push_str("140 m4a   audio only    \n");
        for (id, height) in &spec.formats {
            out.push_str(&format!("{id} mp4   {}x{height} 30\n", height * 16 / 9));
        }
        Ok(out)
    }

    async fn resolve_title(&self, source: &SourceId) -> Result<String, ToolError> {
        self.spec(source)?.title.ok_or_else(|| ToolError::Reported {
            tool: "yt-dlp".into(),
            detail: "ERROR: unable to extract title".into(),
        })
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<(), ToolError> {
        let spec = self.spec(&request.source)?;
        let call = {
            let mut state = self.state.lock().unwrap();
            state
                .requests
                .push((request.source.clone(), request.format.clone()));
            let n = state.calls.entry(request.source.clone()).or_insert(0);
            *n += 1;
            *n
        };
        let step = spec.fetches[(call - 1).min(spec.fetches.len() - 1)];
        let template = &request.output_template;
        let write = |path: PathBuf| std::fs::write(path, b"stream").unwrap();
        match (step, &request.format) {
            (Fetch::Fail, _) => {
                return Err(ToolError::Failed {
                    tool: "yt-dlp".into(),
                    code: Some(1),
                    detail: "ERROR: HTTP Error 403: Forbidden".into(),
                })
            }
            (Fetch::Nothing, _) => {}
            (Fetch::VideoOnly, FormatRequest::Video { format_id }) => {
                write(expand(template, format_id.as_deref().unwrap_or("137"), "mp4"));
            }
            (Fetch::Complete, FormatRequest::Video { format_id }) => {
                write(expand(template, format_id.as_deref().unwrap_or("137"), "mp4"));
                write(expand(template, "140", "m4a"));
            }
            (_, FormatRequest::Audio { codec, .. }) => {
                if step == Fetch::Complete {
                    write(expand(template, "", codec));
                }
            }
        }
        Ok(())
    }
}

/// Mux fake: writes the output, or fails when `fail` is set.
#[derive(Clone, Default)]
pub struct FakeMuxTool {
    pub fail: bool,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeMuxTool {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn outputs(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MuxTool for FakeMuxTool {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), ToolError> {
        assert!(video.exists(), "video input missing: {}", video.display());
        assert!(audio.exists(), "audio input missing: {}", audio.display());
        self.calls.lock().unwrap().push(output.to_path_buf());
        if self.fail {
            return Err(ToolError::Failed {
                tool: "ffmpeg".into(),
                code: Some(1),
                detail: "Invalid data found when processing input".into(),
            });
        }
        std::fs::write(output, b"merged").unwrap();
        Ok(())
    }
}
