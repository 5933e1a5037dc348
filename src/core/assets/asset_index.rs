use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::downloader::{DownloadItem, DownloadManager};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::AssetIndexInfo;

pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Top-level asset index JSON structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetIndex {
    #[serde(default)]
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    #[serde(default)]
    pub size: u64,
}

impl AssetObject {
    /// Two-character shard, `None` for hashes too short or not hex.
    fn prefix(&self) -> Option<&str> {
        let prefix = self.hash.get(..2)?;
        prefix
            .chars()
            .all(|c| c.is_ascii_hexdigit())
            .then_some(prefix)
    }
}

/// `<assets>/indexes/<id>.json`
pub fn index_path(assets_dir: &Path, index_id: &str) -> PathBuf {
    assets_dir.join("indexes").join(format!("{index_id}.json"))
}

/// `<assets>/objects/<hash[..2]>/<hash>`
pub fn object_path(assets_dir: &Path, hash: &str) -> PathBuf {
    assets_dir
        .join("objects")
        .join(hash.get(..2).unwrap_or_default())
        .join(hash)
}

impl AssetIndex {
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Download items for every object, skipping malformed hashes.
    pub fn download_items(&self, assets_dir: &Path) -> Vec<DownloadItem> {
        let mut items = Vec::with_capacity(self.objects.len());
        for (name, obj) in &self.objects {
            let Some(prefix) = obj.prefix() else {
                warn!("Skipping asset {} with malformed hash {:?}", name, obj.hash);
                continue;
            };
            items.push(
                DownloadItem::new(
                    format!("{}/{}/{}", RESOURCES_URL, prefix, obj.hash),
                    object_path(assets_dir, &obj.hash),
                )
                .with_sha1(obj.hash.clone())
                .with_size(obj.size),
            );
        }
        items
    }
}

/// Read the asset index from disk, fetching it first when absent or unreadable.
///
/// The fetch goes through `manager` so the file is hash-checked and only
/// appears under its final name once complete.
pub async fn ensure_index(
    manager: &DownloadManager,
    cancel: &CancellationToken,
    info: &AssetIndexInfo,
    assets_dir: &Path,
) -> LauncherResult<AssetIndex> {
    let path = index_path(assets_dir, &info.id);

    if let Ok(raw) = tokio::fs::read_to_string(&path).await {
        match AssetIndex::parse(&raw) {
            Ok(index) => {
                debug!("Using cached asset index {:?}", path);
                return Ok(index);
            }
            Err(e) => warn!("Cached asset index {:?} is corrupt, refetching: {}", path, e),
        }
        let _ = tokio::fs::remove_file(&path).await;
    }

    let mut item =
        DownloadItem::new(info.url.clone(), path.clone()).with_size(info.size.unwrap_or(0));
    if let Some(sha1) = info.sha1.clone() {
        item = item.with_sha1(sha1);
    }

    let result = manager.download(cancel, vec![item], None).await;
    if let Some(failure) = result.errors.into_iter().next() {
        return Err(failure.error);
    }
    if cancel.is_cancelled() {
        return Err(LauncherError::Cancelled);
    }

    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| LauncherError::Io {
            path: path.clone(),
            source: e,
        })?;
    let index = AssetIndex::parse(&raw)?;
    info!(
        "Fetched asset index {} ({} objects)",
        info.id,
        index.objects.len()
    );
    Ok(index)
}
