//! JSONL file writer for relay events.
//!
//! Each [`ConversationEvent`] becomes one JSON object per line, stamped with
//! `type` and an RFC 3339 `timestamp`. Object payloads are flattened into the
//! record; anything else is nested under `data`. The file is opened in append
//! mode so restarts extend the same log.

use mindcare_application::{ConversationEvent, ConversationLogger};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

#[derive(Serialize)]
struct Record<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    timestamp: String,
    #[serde(flatten)]
    body: Body<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Body<'a> {
    Fields(&'a Map<String, Value>),
    Data { data: &'a Value },
}

/// Appends relay events to a JSONL file.
///
/// Lines are flushed as they are completed, so a crash loses at most the
/// line being written.
pub struct JsonlConversationLogger {
    writer: Mutex<LineWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` (after a warning) if the file cannot be opened; the
    /// relay then runs without a conversation log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(LineWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Could not open conversation log {}: {}", path.display(), e);
                None
            }
        }
    }

    fn open(path: &Path) -> std::io::Result<File> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let body = match &event.payload {
            Value::Object(fields) => Body::Fields(fields),
            other => Body::Data { data: other },
        };
        let record = Record {
            event_type: event.event_type,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            body,
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock()
            && let Err(e) = writeln!(writer, "{}", line)
        {
            warn!("Failed to write conversation log: {}", e);
        }
    }
}
