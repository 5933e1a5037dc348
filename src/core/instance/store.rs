use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use super::model::Instance;
use crate::core::error::{LauncherError, LauncherResult};

/// Persistence seam used by the launch pipeline.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Stamp the instance's last-played time.
    async fn record_last_played(&self, instance_id: &str) -> LauncherResult<()>;

    /// Persist the whole record.
    async fn save_instance(&self, instance: &Instance) -> LauncherResult<()>;
}

/// Stores each instance as `<instance.path>/instance.json`.
///
/// Records saved or tracked through this store are found by ID wherever they
/// live; anything else is looked up as `<instances_dir>/<id>/instance.json`.
#[derive(Debug, Clone)]
pub struct JsonInstanceStore {
    instances_dir: PathBuf,
    known: Arc<Mutex<HashMap<String, PathBuf>>>,
}

impl JsonInstanceStore {
    pub fn new(instances_dir: PathBuf) -> Self {
        Self {
            instances_dir,
            known: Arc::default(),
        }
    }

    /// Remember where `instance` is stored, for records outside `instances_dir`.
    pub fn track(&self, instance: &Instance) {
        if let Ok(mut known) = self.known.lock() {
            known.insert(instance.id.clone(), instance.config_path());
        }
    }

    fn config_path(&self, id: &str) -> PathBuf {
        self.known
            .lock()
            .ok()
            .and_then(|known| known.get(id).cloned())
            .unwrap_or_else(|| self.instances_dir.join(id).join("instance.json"))
    }

    /// Load a single instance by ID.
    pub async fn load(&self, id: &str) -> LauncherResult<Instance> {
        load_from_path(&self.config_path(id)).await
    }

    /// Save instance metadata to disk.
    pub async fn save(&self, instance: &Instance) -> LauncherResult<()> {
        let json = serde_json::to_string_pretty(instance)?;
        let config_path = instance.config_path();

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        tokio::fs::write(&config_path, json)
            .await
            .map_err(|e| LauncherError::Io {
                path: config_path,
                source: e,
            })?;

        self.track(instance);
        Ok(())
    }

    /// List all instances. Unreadable records are skipped with a warning.
    pub async fn list(&self) -> LauncherResult<Vec<Instance>> {
        let mut instances = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.instances_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(instances),
            Err(e) => {
                return Err(LauncherError::Io {
                    path: self.instances_dir.clone(),
                    source: e,
                })
            }
        };

        while let Some(entry) = entries.next_entry().await.map_err(|e| LauncherError::Io {
            path: self.instances_dir.clone(),
            source: e,
        })? {
            let config_path = entry.path().join("instance.json");
            if !config_path.is_file() {
                continue;
            }
            match load_from_path(&config_path).await {
                Ok(inst) => instances.push(inst),
                Err(e) => warn!("Skipping instance at {:?}: {}", config_path, e),
            }
        }

        instances.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(instances)
    }
}

#[async_trait]
impl InstanceStore for JsonInstanceStore {
    async fn record_last_played(&self, instance_id: &str) -> LauncherResult<()> {
        let mut instance = self.load(instance_id).await?;
        instance.last_played = Some(Utc::now());
        self.save(&instance).await?;
        info!("Recorded last played for {}", instance_id);
        Ok(())
    }

    async fn save_instance(&self, instance: &Instance) -> LauncherResult<()> {
        self.save(instance).await
    }
}

/// Read an instance record from an explicit `instance.json` path.
pub async fn load_from_path(config_path: &Path) -> LauncherResult<Instance> {
    let json = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|e| LauncherError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;
    Ok(serde_json::from_str(&json)?)
}
