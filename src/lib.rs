pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::config::Config;
pub use crate::core::downloader::{DownloadItem, DownloadManager, DownloadResult, Progress};
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::instance::{Instance, InstanceStore, JsonInstanceStore};
pub use crate::core::launch::{
    LaunchOptions, LaunchPipeline, LaunchStep, PlayerIdentity, Status, StatusSink,
};
pub use crate::core::version::VersionJson;

/// Install the global `fmt` subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mctui_lib=debug")),
        )
        .init();
}
