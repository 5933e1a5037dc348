use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const TICK: Duration = Duration::from_millis(100);

/// Aggregate snapshot of a running batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub total_bytes: u64,
    pub downloaded_bytes: u64,
    pub total_items: usize,
    pub completed_items: usize,
    /// File name of the item most recently picked up.
    pub current_item: String,
    /// Bytes per second since the previous tick.
    pub speed: f64,
}

impl Progress {
    /// Byte fraction in `[0, 1]`, falling back to item counts when sizes are unknown.
    pub fn fraction(&self) -> f64 {
        if self.total_bytes > 0 {
            (self.downloaded_bytes as f64 / self.total_bytes as f64).min(1.0)
        } else if self.total_items > 0 {
            self.completed_items as f64 / self.total_items as f64
        } else {
            0.0
        }
    }
}

/// Counters shared between the workers and the reporter.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub downloaded_bytes: AtomicU64,
    pub completed: AtomicUsize,
    pub failed: AtomicUsize,
    current_item: Mutex<String>,
}

impl Counters {
    pub fn add_bytes(&self, n: u64) {
        self.downloaded_bytes.fetch_add(n, Ordering::Relaxed);
    }

    pub fn sub_bytes(&self, n: u64) {
        self.downloaded_bytes.fetch_sub(n, Ordering::Relaxed);
    }

    pub fn set_current(&self, name: &str) {
        if let Ok(mut current) = self.current_item.lock() {
            current.clear();
            current.push_str(name);
        }
    }

    pub fn snapshot(&self, total_bytes: u64, total_items: usize) -> Progress {
        Progress {
            total_bytes,
            downloaded_bytes: self.downloaded_bytes.load(Ordering::Relaxed),
            total_items,
            completed_items: self.completed.load(Ordering::Relaxed),
            current_item: self
                .current_item
                .lock()
                .map(|c| c.clone())
                .unwrap_or_default(),
            speed: 0.0,
        }
    }
}

/// Emit a snapshot every tick until `stop` fires.
///
/// Sends never block: when the sink is full the tick is dropped.
pub(crate) fn spawn_reporter(
    counters: Arc<Counters>,
    total_bytes: u64,
    total_items: usize,
    sink: mpsc::Sender<Progress>,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(TICK);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last_bytes = 0_u64;
        let mut last_at = Instant::now();

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = ticker.tick() => {
                    let mut snapshot = counters.snapshot(total_bytes, total_items);
                    let now = Instant::now();
                    let elapsed = now.duration_since(last_at).as_secs_f64();
                    if elapsed > 0.0 {
                        let delta = snapshot.downloaded_bytes.saturating_sub(last_bytes);
                        snapshot.speed = delta as f64 / elapsed;
                        last_bytes = snapshot.downloaded_bytes;
                        last_at = now;
                    }
                    let _ = sink.try_send(snapshot);
                }
            }
        }
    })
}

/// Human-readable transfer rate using SI units, e.g. `1.5 MB/s`.
pub fn format_speed(bytes_per_sec: f64) -> String {
    const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
    let bytes = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
        bytes_per_sec
    } else {
        0.0
    };
    if bytes < 10.0 {
        return format!("{} B/s", bytes as u64);
    }

    let exp = ((bytes.log10() / 3.0).floor() as usize).min(UNITS.len() - 1);
    let value = bytes / 1000_f64.powi(exp as i32);
    if value < 10.0 {
        format!("{:.1} {}/s", value, UNITS[exp])
    } else {
        format!("{:.0} {}/s", value, UNITS[exp])
    }
}
