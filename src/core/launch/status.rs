// ─── Launch Status ───
// Progress events streamed from a pipeline run to its caller.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::error::LauncherError;

pub const COMPLETE_STEP: &str = "Complete";
pub const COMPLETE_MESSAGE: &str = "Game closed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    pub fn as_str(self) -> &'static str {
        match self {
            LogStream::Stdout => "stdout",
            LogStream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of game output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub text: String,
    pub stream: LogStream,
}

/// A single update from the launch pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub step: String,
    /// Fraction in `[0, 1]`.
    pub progress: f64,
    pub message: String,
    pub is_complete: bool,
    pub error: Option<String>,
    pub log_line: Option<LogLine>,
}

impl Status {
    pub fn new(step: impl Into<String>, progress: f64, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
            is_complete: false,
            error: None,
            log_line: None,
        }
    }

    pub fn failed(step: impl Into<String>, progress: f64, error: &LauncherError) -> Self {
        let error = error.to_string();
        Self {
            message: error.clone(),
            error: Some(error),
            ..Self::new(step, progress, "")
        }
    }

    pub fn complete() -> Self {
        Self {
            is_complete: true,
            ..Self::new(COMPLETE_STEP, 1.0, COMPLETE_MESSAGE)
        }
    }

    pub fn log(step: impl Into<String>, progress: f64, text: String, stream: LogStream) -> Self {
        Self {
            log_line: Some(LogLine { text, stream }),
            ..Self::new(step, progress, "")
        }
    }

    /// Error or completion; the last status of a run.
    pub fn is_terminal(&self) -> bool {
        self.is_complete || self.error.is_some()
    }
}

/// Cloneable handle the pipeline pushes statuses through.
///
/// Intermediate updates never wait on the receiver. The terminal update is
/// awaited so it reaches a live receiver even when the buffer is full.
#[derive(Debug, Clone, Default)]
pub struct StatusSink {
    tx: Option<mpsc::Sender<Status>>,
}

impl StatusSink {
    pub fn new(tx: mpsc::Sender<Status>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that discards everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, status: Status) {
        if let Some(tx) = &self.tx {
            if tx.try_send(status).is_err() {
                debug!("Status channel full or closed, update dropped");
            }
        }
    }

    pub async fn finish(&self, status: Status) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(status).await;
        }
    }
}
