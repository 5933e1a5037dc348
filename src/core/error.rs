use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the launch core.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("{failed} items failed to download")]
    DownloadsFailed { failed: usize },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("SHA-256 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Java ────────────────────────────────────────────
    #[error("Java not found for major version {0}")]
    JavaNotFound(u32),

    #[error("No Java {major} runtime published for {os}/{arch}")]
    RuntimeUnavailable {
        major: u32,
        os: String,
        arch: String,
    },

    #[error("Not enough disk space at {path:?}: available={available} required={required}")]
    InsufficientDiskSpace {
        path: PathBuf,
        available: u64,
        required: u64,
    },

    #[error("Java execution failed: {0}")]
    JavaExecution(String),

    // ── Game process ────────────────────────────────────
    #[error("Game exited with {0}")]
    GameExited(String),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive entry {0:?} points outside the extraction root")]
    UnsafeArchiveEntry(PathBuf),

    // ── Pipeline ────────────────────────────────────────
    #[error("{step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<LauncherError>,
    },

    #[error("Cancelled")]
    Cancelled,

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl LauncherError {
    /// Wrap this error with the display name of the pipeline step that produced it.
    pub fn in_step(self, step: &'static str) -> Self {
        LauncherError::Step {
            step,
            source: Box::new(self),
        }
    }

    /// Name of the pipeline step this error was raised in, if any.
    pub fn step(&self) -> Option<&'static str> {
        match self {
            LauncherError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            LauncherError::Cancelled => true,
            LauncherError::Step { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_names_the_step() {
        let err = LauncherError::DownloadsFailed { failed: 3 }.in_step("Downloading libraries");
        assert_eq!(err.step(), Some("Downloading libraries"));
        assert_eq!(
            err.to_string(),
            "Downloading libraries: 3 items failed to download"
        );
    }

    #[test]
    fn cancellation_survives_step_wrapping() {
        let err = LauncherError::Cancelled.in_step("Checking Java");
        assert!(err.is_cancelled());
        assert!(!LauncherError::Other("x".into()).is_cancelled());
    }
}
