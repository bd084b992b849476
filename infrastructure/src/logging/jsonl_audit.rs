//! JSONL file writer for tool audit events.
//!
//! Each [`ToolAuditEvent`] is serialized as a single JSON line with a
//! `timestamp`, appended to the file via a buffered writer. Existing files
//! are appended to, never truncated.

use dealdesk_application::ports::tool_audit::{ToolAuditEvent, ToolAuditLogger};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL audit logger that writes one JSON object per tool call.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlToolAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlToolAuditLogger {
    /// Open (or create) the audit log at the given path.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ToolAuditLogger for JsonlToolAuditLogger {
    fn log(&self, event: ToolAuditEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(Value::Object(mut record)) = serde_json::to_value(&event) else {
            return;
        };
        record.insert("timestamp".to_string(), Value::String(timestamp));

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Could not write audit event for {}: {}", event.tool, e);
            }
        }
    }
}

impl Drop for JsonlToolAuditLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealdesk_domain::ErrorCode;

    fn event(tool: &str, code: Option<ErrorCode>) -> ToolAuditEvent {
        ToolAuditEvent {
            tool: tool.to_string(),
            organization_id: "org-1".to_string(),
            acting_user_id: "user-1".to_string(),
            ok: code.is_none(),
            code,
            duration_ms: 3,
            mutating: tool == "moveDeal",
        }
    }

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("tools.jsonl");
        let logger = JsonlToolAuditLogger::new(&path).unwrap();

        logger.log(event("searchDeals", None));
        logger.log(event("moveDeal", Some(ErrorCode::NotFoundOrForbidden)));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["tool"], "searchDeals");
        assert_eq!(lines[0]["ok"], true);
        assert!(lines[0].get("code").is_none());
        assert!(lines[0]["timestamp"].is_string());

        assert_eq!(lines[1]["code"], "NOT_FOUND_OR_FORBIDDEN");
        assert_eq!(lines[1]["mutating"], true);
        assert_eq!(lines[1]["organization_id"], "org-1");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.jsonl");

        let logger = JsonlToolAuditLogger::new(&path).unwrap();
        logger.log(event("listStages", None));
        drop(logger);

        let logger = JsonlToolAuditLogger::new(&path).unwrap();
        logger.log(event("listStages", None));
        assert_eq!(logger.path(), path.as_path());
        drop(logger);

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlToolAuditLogger::new(blocker.join("audit.jsonl")).is_none());
    }
}
