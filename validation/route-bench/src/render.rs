//! Output of query results.

use std::io::Write;
use std::sync::{Arc, Mutex};

use routing_client::QueryResult;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::BenchResult;

/// Emitted once per completed iteration in quiet benchmark mode.
pub const PROGRESS_MARKER: &str = ".";

/// Whether results come from a single query or a sustained benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    SingleShot,
    Sustained,
}

#[derive(Clone)]
enum Sink {
    Stdout,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Writes results to stdout, either in full or as a progress marker.
///
/// Each piece of output is written under a single lock so documents from
/// concurrent workers never interleave.
#[derive(Clone)]
pub struct ResultRenderer {
    quiet: bool,
    mode: RenderMode,
    sink: Sink,
}

impl ResultRenderer {
    pub fn new(quiet: bool, mode: RenderMode) -> Self {
        Self {
            quiet,
            mode,
            sink: Sink::Stdout,
        }
    }

    /// Renderer writing into a shared buffer instead of stdout.
    pub fn buffered(quiet: bool, mode: RenderMode) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let renderer = Self {
            quiet,
            mode,
            sink: Sink::Buffer(buffer.clone()),
        };
        (renderer, buffer)
    }

    /// Text to emit for `result`, if any.
    pub fn render(&self, result: &QueryResult) -> BenchResult<Option<String>> {
        match (self.quiet, self.mode) {
            (false, _) => {
                let mut text = to_indented_json(result)?;
                text.push('\n');
                Ok(Some(text))
            }
            (true, RenderMode::SingleShot) => Ok(None),
            (true, RenderMode::Sustained) => Ok(Some(PROGRESS_MARKER.to_string())),
        }
    }

    /// Render `result` and write it out.
    pub fn emit(&self, result: &QueryResult) -> BenchResult<()> {
        match self.render(result)? {
            Some(text) => self.write(&text),
            None => Ok(()),
        }
    }

    /// Progress marker for an iteration that produced no result.
    ///
    /// Writes [`PROGRESS_MARKER`] in quiet sustained runs and nothing
    /// otherwise, so failed iterations keep the marker stream going.
    pub fn heartbeat(&self) -> BenchResult<()> {
        if self.quiet && self.mode == RenderMode::Sustained {
            self.write(PROGRESS_MARKER)
        } else {
            Ok(())
        }
    }

    fn write(&self, text: &str) -> BenchResult<()> {
        match &self.sink {
            Sink::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
            Sink::Buffer(buffer) => {
                let mut buffer = buffer.lock().unwrap_or_else(|e| e.into_inner());
                buffer.extend_from_slice(text.as_bytes());
            }
        }
        Ok(())
    }
}

/// Serialize with a two-space indent.
pub fn to_indented_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"  "));
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result() -> QueryResult {
        QueryResult::new(json!({"duration": 120, "mode": "walking"}))
    }

    #[test]
    fn test_full_output_is_indented_json() {
        let renderer = ResultRenderer::new(false, RenderMode::SingleShot);
        let text = renderer.render(&result()).unwrap().unwrap();

        assert!(text.contains("\"duration\": 120"));
        assert!(text.starts_with("{\n  \"duration\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_field_order_follows_document() {
        let text = to_indented_json(&QueryResult::new(json!({"b": 1, "a": {"c": 2}}))).unwrap();
        assert_eq!(text, "{\n  \"b\": 1,\n  \"a\": {\n    \"c\": 2\n  }\n}");
    }

    #[test]
    fn test_quiet_single_shot_prints_nothing() {
        let (renderer, buffer) = ResultRenderer::buffered(true, RenderMode::SingleShot);
        renderer.emit(&result()).unwrap();
        assert!(buffer.lock().unwrap().is_empty());
    }

    #[test]
    fn test_quiet_sustained_prints_marker() {
        let (renderer, buffer) = ResultRenderer::buffered(true, RenderMode::Sustained);
        renderer.emit(&result()).unwrap();
        renderer.emit(&result()).unwrap();
        assert_eq!(buffer.lock().unwrap().as_slice(), b"..");
    }

    #[test]
    fn test_heartbeat_only_in_quiet_sustained() {
        let (renderer, buffer) = ResultRenderer::buffered(true, RenderMode::Sustained);
        renderer.heartbeat().unwrap();
        renderer.emit(&result()).unwrap();
        assert_eq!(buffer.lock().unwrap().as_slice(), b"..");

        for (quiet, mode) in [
            (true, RenderMode::SingleShot),
            (false, RenderMode::Sustained),
            (false, RenderMode::SingleShot),
        ] {
            let (renderer, buffer) = ResultRenderer::buffered(quiet, mode);
            renderer.heartbeat().unwrap();
            assert!(buffer.lock().unwrap().is_empty());
        }
    }

    #[test]
    fn test_sustained_not_quiet_prints_documents() {
        let (renderer, buffer) = ResultRenderer::buffered(false, RenderMode::Sustained);
        renderer.emit(&result()).unwrap();

        let text = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(text.contains("\"mode\": \"walking\""));
    }
}
