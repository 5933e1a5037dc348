// ─── Download Manager ───
// Concurrent batch downloads with SHA-1 verification and periodic progress.

mod progress;

pub use progress::{format_speed, Progress};

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::{build_http_client, get_with_retry, RetryPolicy};

use progress::{spawn_reporter, Counters};

const TEMP_SUFFIX: &str = ".part";

/// A single file to download with optional SHA-1 for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub url: String,
    pub dest: PathBuf,
    /// Lowercase hex SHA-1.
    pub sha1: Option<String>,
    pub size: u64,
    /// Higher goes first.
    pub priority: i32,
}

impl DownloadItem {
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            sha1: None,
            size: 0,
            priority: 0,
        }
    }

    pub fn with_sha1(mut self, sha1: impl Into<String>) -> Self {
        self.sha1 = Some(sha1.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn file_name(&self) -> String {
        self.dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// One failed item.
#[derive(Debug)]
pub struct ItemError {
    pub url: String,
    pub error: LauncherError,
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.error)
    }
}

/// Outcome of a batch.
#[derive(Debug, Default)]
pub struct DownloadResult {
    pub completed: usize,
    pub failed: usize,
    pub errors: Vec<ItemError>,
}

impl DownloadResult {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

enum Outcome {
    Completed,
    Failed(ItemError),
    NotAttempted,
}

/// Concurrent, SHA-1 validated downloader.
#[derive(Debug, Clone)]
pub struct DownloadManager {
    client: Client,
    /// Maximum number of parallel downloads.
    workers: usize,
    retry: RetryPolicy,
}

impl DownloadManager {
    pub fn new(workers: usize) -> LauncherResult<Self> {
        Ok(Self::with_client(build_http_client()?, workers))
    }

    pub fn with_client(client: Client, workers: usize) -> Self {
        Self {
            client,
            workers: workers.max(1),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    // ── Batch ───────────────────────────────────────────

    /// Download every item, never stopping early on item failures.
    ///
    /// Items sharing a destination are dropped after the first. When `cancel`
    /// fires, items not yet started are left out of the counts and in-flight
    /// transfers are abandoned.
    pub async fn download(
        &self,
        cancel: &CancellationToken,
        items: Vec<DownloadItem>,
        progress: Option<mpsc::Sender<Progress>>,
    ) -> DownloadResult {
        let items = prepare_batch(items);
        if items.is_empty() {
            return DownloadResult::default();
        }

        let total_bytes: u64 = items.iter().map(|item| item.size).sum();
        let total_items = items.len();
        info!(
            "Starting batch download: {} files ({} bytes), workers={}",
            total_items, total_bytes, self.workers
        );

        let counters = Arc::new(Counters::default());
        let stop_reporter = cancel.child_token();
        let reporter = progress.as_ref().map(|sink| {
            spawn_reporter(
                counters.clone(),
                total_bytes,
                total_items,
                sink.clone(),
                stop_reporter.clone(),
            )
        });

        let outcomes: Vec<Outcome> = stream::iter(items)
            .map(|item| {
                let counters = counters.clone();
                async move {
                    if cancel.is_cancelled() {
                        return Outcome::NotAttempted;
                    }
                    counters.set_current(&item.file_name());
                    let mut transferred = 0;
                    match self.fetch_item(cancel, &item, &counters, &mut transferred).await {
                        Ok(()) => {
                            counters.completed.fetch_add(1, Ordering::Relaxed);
                            Outcome::Completed
                        }
                        Err(error) => {
                            // Bytes of a discarded transfer do not count as progress.
                            counters.sub_bytes(transferred);
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                            debug!("Download failed: {}: {}", item.url, error);
                            Outcome::Failed(ItemError {
                                url: item.url,
                                error,
                            })
                        }
                    }
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        stop_reporter.cancel();
        if let Some(handle) = reporter {
            let _ = handle.await;
        }
        if let Some(sink) = &progress {
            let _ = sink.try_send(counters.snapshot(total_bytes, total_items));
        }

        let mut result = DownloadResult::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Completed => result.completed += 1,
                Outcome::Failed(err) => {
                    result.failed += 1;
                    result.errors.push(err);
                }
                Outcome::NotAttempted => {}
            }
        }

        if result.failed > 0 {
            warn!(
                "Batch finished: {} completed, {} failed",
                result.completed, result.failed
            );
        } else {
            info!("Batch finished: {} completed", result.completed);
        }
        result
    }

    // ── Single item ─────────────────────────────────────

    async fn fetch_item(
        &self,
        cancel: &CancellationToken,
        item: &DownloadItem,
        counters: &Counters,
        transferred: &mut u64,
    ) -> LauncherResult<()> {
        if let Some(expected) = item.sha1.as_deref() {
            if let Ok(actual) = sha1_file(&item.dest).await {
                if actual.eq_ignore_ascii_case(expected) {
                    counters.add_bytes(item.size);
                    debug!("Already present: {:?}", item.dest);
                    return Ok(());
                }
            }
        }

        if let Some(parent) = item.dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(LauncherError::Cancelled),
            response = get_with_retry(&self.client, &item.url, self.retry) => response?,
        };

        let temp = TempFile::new(temp_path(&item.dest));
        let mut file = tokio::fs::File::create(temp.path())
            .await
            .map_err(|e| LauncherError::Io {
                path: temp.path().to_path_buf(),
                source: e,
            })?;

        let mut hasher = Sha1::new();
        let mut body = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Err(LauncherError::Cancelled),
                chunk = body.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk?;
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|e| LauncherError::Io {
                    path: temp.path().to_path_buf(),
                    source: e,
                })?;
            counters.add_bytes(chunk.len() as u64);
            *transferred += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| LauncherError::Io {
            path: temp.path().to_path_buf(),
            source: e,
        })?;
        // Close before renaming, Windows refuses to move open files.
        drop(file);

        if let Some(expected) = item.sha1.as_deref() {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(LauncherError::Sha1Mismatch {
                    path: item.dest.clone(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        temp.persist(&item.dest).await?;
        debug!("Downloaded: {} -> {:?}", item.url, item.dest);
        Ok(())
    }
}

/// Drop later duplicates by destination, then order by descending priority.
fn prepare_batch(items: Vec<DownloadItem>) -> Vec<DownloadItem> {
    let mut seen = HashSet::new();
    let mut unique: Vec<DownloadItem> = items
        .into_iter()
        .filter(|item| seen.insert(item.dest.clone()))
        .collect();
    unique.sort_by(|a, b| b.priority.cmp(&a.priority));
    unique
}

fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Removes the partial file unless it was moved into place.
struct TempFile {
    path: PathBuf,
    persisted: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(mut self, dest: &Path) -> LauncherResult<()> {
        tokio::fs::rename(&self.path, dest)
            .await
            .map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// SHA-1 of a file on disk, lowercase hex.
pub async fn sha1_file(path: &Path) -> LauncherResult<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buf).await.map_err(|e| LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_dropped_and_priority_orders() {
        let items = vec![
            DownloadItem::new("u1", "/a").with_priority(1),
            DownloadItem::new("u2", "/b").with_priority(5),
            DownloadItem::new("u3", "/a").with_priority(9),
            DownloadItem::new("u4", "/c").with_priority(1),
        ];
        let prepared = prepare_batch(items);
        let urls: Vec<_> = prepared.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["u2", "u1", "u4"]);
    }

    #[test]
    fn temp_path_appends_suffix() {
        assert_eq!(
            temp_path(Path::new("/x/lib.jar")),
            PathBuf::from("/x/lib.jar.part")
        );
    }

    #[test]
    fn item_error_names_url() {
        let err = ItemError {
            url: "https://host/a.jar".into(),
            error: LauncherError::DownloadFailed {
                url: "https://host/a.jar".into(),
                status: 404,
            },
        };
        assert!(err.to_string().starts_with("https://host/a.jar: "));
    }

    #[tokio::test]
    async fn sha1_file_matches_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();
        assert_eq!(
            sha1_file(&path).await.unwrap(),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let manager = DownloadManager::new(2).unwrap();
        let result = manager
            .download(&CancellationToken::new(), Vec::new(), None)
            .await;
        assert_eq!(result.completed + result.failed, 0);
    }

    #[tokio::test]
    async fn cancelled_batch_attempts_nothing() {
        let manager = DownloadManager::new(2).unwrap().with_retry(RetryPolicy::none());
        let dir = tempfile::tempdir().unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let items = vec![DownloadItem::new("http://127.0.0.1:9/a", dir.path().join("a"))];
        let result = manager.download(&token, items, None).await;
        assert_eq!(result.completed, 0);
        assert_eq!(result.failed, 0);
        assert!(!dir.path().join("a").exists());
    }
}
