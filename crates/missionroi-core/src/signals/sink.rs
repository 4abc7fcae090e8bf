//! Signal sinks.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::types::{Signal, SignalKind};
use crate::error::{Result, SignalWriteError};

/// Destination for signals. Appends only.
pub trait SignalSink: Send + Sync {
    fn append(&self, signal: &Signal) -> Result<(), SignalWriteError>;
}

impl<S: SignalSink + ?Sized> SignalSink for Arc<S> {
    fn append(&self, signal: &Signal) -> Result<(), SignalWriteError> {
        (**self).append(signal)
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug, Clone)]
pub struct JsonlSignalSink {
    path: PathBuf,
}

impl JsonlSignalSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink for the standard file of `kind` inside `dir`.
    pub fn for_stream(dir: impl AsRef<Path>, kind: SignalKind) -> Self {
        Self::new(dir.as_ref().join(kind.file_name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SignalWriteError {
        SignalWriteError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SignalSink for JsonlSignalSink {
    fn append(&self, signal: &Signal) -> Result<(), SignalWriteError> {
        let mut line = serde_json::to_string(signal)?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        // Single write per line so concurrent appenders do not interleave.
        file.write_all(line.as_bytes()).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// Keeps signals in memory; useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySignalSink {
    signals: Mutex<Vec<Signal>>,
}

impl MemorySignalSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SignalSink for MemorySignalSink {
    fn append(&self, signal: &Signal) -> Result<(), SignalWriteError> {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal.clone());
        Ok(())
    }
}

/// Fire-and-forget sink: hands signals to a tokio task that writes them to
/// an inner sink. Write failures are logged by the task.
#[derive(Debug, Clone)]
pub struct BackgroundSignalSink {
    sender: mpsc::UnboundedSender<Signal>,
}

impl BackgroundSignalSink {
    /// Spawn the writer task. Must be called inside a tokio runtime.
    ///
    /// The task ends once every `BackgroundSignalSink` clone is dropped and
    /// the queue is drained; await the handle to flush.
    pub fn spawn<S>(inner: S) -> (Self, JoinHandle<()>)
    where
        S: SignalSink + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Signal>();
        let handle = tokio::spawn(async move {
            while let Some(signal) = receiver.recv().await {
                if let Err(e) = inner.append(&signal) {
                    tracing::warn!(
                        signal_type = signal.kind().as_str(),
                        error = %e,
                        "dropping signal"
                    );
                }
            }
        });
        (Self { sender }, handle)
    }
}

impl SignalSink for BackgroundSignalSink {
    fn append(&self, signal: &Signal) -> Result<(), SignalWriteError> {
        self.sender
            .send(signal.clone())
            .map_err(|_| SignalWriteError::ChannelClosed)
    }
}

/// Read every signal from a JSONL stream, skipping blank lines.
pub fn read_signals(path: impl AsRef<Path>) -> Result<Vec<Signal>> {
    let file = std::fs::File::open(path)?;
    let mut signals = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        signals.push(serde_json::from_str(&line)?);
    }
    Ok(signals)
}
