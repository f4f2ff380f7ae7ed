//! Append-only JSON-lines event log.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use riskcast_core::log::{LogEvent, LogSink};
use tracing::{debug, warn};

/// Writes one JSON object per event, flushing after each. The file is opened
/// in append mode when the sink is created and closed when it is dropped.
#[derive(Debug)]
pub struct JsonlLogSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlLogSink {
    /// Open (or create) `path` for appending, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "Opened event log");
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &LogEvent) -> io::Result<()> {
        let line = serde_json::to_string(event)?;
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(writer, "{line}")?;
        writer.flush()
    }
}

impl LogSink for JsonlLogSink {
    fn record(&self, event: &LogEvent) {
        // Logging must never fail the request
        if let Err(e) = self.append(event) {
            warn!(path = %self.path.display(), error = %e, "Failed to append event");
        }
    }
}

/// Read back every event in a JSON-lines log. Blank lines are skipped.
pub fn read_events(path: impl AsRef<Path>) -> io::Result<Vec<LogEvent>> {
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }
    Ok(events)
}
