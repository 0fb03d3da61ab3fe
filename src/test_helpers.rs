//! Shared test utilities.
//!
//! [`RecordingFormat`] is an [`ImageFormat`] that records which of its two
//! methods was called, so registry tests can assert on resolution decisions
//! without depending on any filename convention. [`capture_logs`] collects
//! the `tracing` output of a closure as text.

use crate::format::{ImageFormat, SourceFormat};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Filename,
    Versioned(u64),
}

/// Mock format returning `"{label}"` and `"{label}@{version}"`.
/// Uses Mutex (not RefCell) so it is Sync like every real format.
#[derive(Debug)]
pub struct RecordingFormat {
    pub label: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingFormat {
    pub fn new(label: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ImageFormat for RecordingFormat {
    fn filename(&self) -> String {
        self.calls.lock().unwrap().push(RecordedCall::Filename);
        self.label.clone()
    }

    fn versioned_filename(&self, version: u64) -> String {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Versioned(version));
        format!("{}@{}", self.label, version)
    }
}

/// A base format over a source filename.
pub fn source(filename: &str) -> Arc<dyn ImageFormat> {
    Arc::new(SourceFormat::from_filename(filename))
}

/// Write `formats.toml` into a fresh temp directory.
pub fn config_dir(contents: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), contents);
    tmp
}

pub fn write_config(dir: &Path, contents: &str) {
    std::fs::write(dir.join(crate::config::CONFIG_FILENAME), contents).unwrap();
}

/// In-memory log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a debug-level subscriber scoped to this thread and return
/// everything it logged, one event per line.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
