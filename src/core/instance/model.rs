use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Instance record persisted to disk as `instance.json`.
///
/// Each instance has its own folder under `instances/<uuid>/` with:
/// - `.minecraft/` — game working directory
/// - `natives/`    — native libraries for `java.library.path`
/// - `instance.json` — this serialized struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
    /// Version id of the game distribution, e.g. `1.20.4`.
    pub version: String,
    pub path: PathBuf,
    /// Runtime remembered from a previous resolution.
    #[serde(default)]
    pub java_path: Option<PathBuf>,
    /// Overrides the global JVM arguments when non-empty.
    #[serde(default)]
    pub jvm_args: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
    /// Accumulated play time in seconds.
    #[serde(default)]
    pub play_time_secs: u64,

    // ── Cached state ──
    /// Set once every library and asset has been fetched; later launches skip downloads.
    #[serde(default)]
    pub is_fully_downloaded: bool,
    #[serde(default)]
    pub cached_at: Option<DateTime<Utc>>,
}

impl Instance {
    pub fn new(name: String, version: String, base_dir: &Path) -> Self {
        let id = Uuid::new_v4().to_string();
        let path = base_dir.join(&id);

        Self {
            id,
            name,
            version,
            path,
            java_path: None,
            jvm_args: Vec::new(),
            created_at: Utc::now(),
            last_played: None,
            play_time_secs: 0,
            is_fully_downloaded: false,
            cached_at: None,
        }
    }

    /// Path to the instance's `.minecraft/` game working directory.
    pub fn game_dir(&self) -> PathBuf {
        self.path.join(".minecraft")
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.game_dir().join("mods")
    }

    pub fn resourcepacks_dir(&self) -> PathBuf {
        self.game_dir().join("resourcepacks")
    }

    pub fn saves_dir(&self) -> PathBuf {
        self.game_dir().join("saves")
    }

    pub fn natives_dir(&self) -> PathBuf {
        self.path.join("natives")
    }

    /// Path to this instance's config file.
    pub fn config_path(&self) -> PathBuf {
        self.path.join("instance.json")
    }

    /// Flag the instance as fully downloaded as of now.
    pub fn mark_cached(&mut self) {
        self.is_fully_downloaded = true;
        self.cached_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_instance_path() {
        let inst = Instance::new("Test".into(), "1.20.4".into(), Path::new("/instances"));
        assert_eq!(inst.path, Path::new("/instances").join(&inst.id));
        assert_eq!(inst.game_dir(), inst.path.join(".minecraft"));
        assert_eq!(inst.mods_dir(), inst.path.join(".minecraft/mods"));
        assert_eq!(inst.natives_dir(), inst.path.join("natives"));
        assert!(!inst.is_fully_downloaded);
    }

    #[test]
    fn mark_cached_sets_flag_and_timestamp() {
        let mut inst = Instance::new("Test".into(), "1.20.4".into(), Path::new("/tmp"));
        inst.mark_cached();
        assert!(inst.is_fully_downloaded);
        assert!(inst.cached_at.is_some());
    }

    #[test]
    fn older_records_without_cache_fields_deserialize() {
        let inst: Instance = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "name": "Old",
            "version": "1.8.9",
            "path": "/instances/abc",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(!inst.is_fully_downloaded);
        assert!(inst.java_path.is_none());
        assert!(inst.jvm_args.is_empty());
    }
}
