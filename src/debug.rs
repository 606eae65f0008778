use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// JSON-lines trace of layout decisions, shared across concurrent builds.
#[derive(Clone)]
pub(crate) struct DebugLogger {
    inner: Arc<Mutex<DebugState>>,
}

struct DebugState {
    writer: BufWriter<File>,
}

impl DebugLogger {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(DebugState {
                writer: BufWriter::new(file),
            })),
        })
    }

    pub fn log_event(&self, event: &Value) {
        if let Ok(mut state) = self.inner.lock() {
            let _ = writeln!(state.writer, "{event}");
        }
    }

    /// Writes a `debug.summary` line carrying one build's counters.
    pub fn emit_summary(&self, context: &str, counts: &BTreeMap<&str, u64>) {
        let line = json!({
            "type": "debug.summary",
            "context": context,
            "counts": counts,
        });
        self.log_event(&line);
    }

    pub fn flush(&self) {
        if let Ok(mut state) = self.inner.lock() {
            let _ = state.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_and_summary_are_json_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("trace.jsonl");
        let logger = DebugLogger::new(&path).expect("logger");
        logger.log_event(&json!({"type": "layout.page_break", "from_page": 1}));
        let counts = BTreeMap::from([("layout.page_break", 3), ("layout.pages", 4)]);
        logger.emit_summary("business-plan", &counts);
        logger.flush();

        let text = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).expect("json"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["from_page"], 1);
        assert_eq!(lines[1]["type"], "debug.summary");
        assert_eq!(lines[1]["context"], "business-plan");
        assert_eq!(lines[1]["counts"]["layout.page_break"], 3);
        assert_eq!(lines[1]["counts"]["layout.pages"], 4);
    }
}
