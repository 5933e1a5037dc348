use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::RetryPolicy;

const APP_DIR_NAME: &str = "mctui";
const CONFIG_FILE: &str = "config.json";

/// Tuning for the download steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    pub max_retries: u32,
    pub library_workers: usize,
    pub asset_workers: usize,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            library_workers: 4,
            asset_workers: 8,
        }
    }
}

impl DownloadSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_retries(self.max_retries)
    }
}

/// Global launcher configuration, persisted as `config.json` in the data dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub instances_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub libraries_dir: PathBuf,
    /// Root of managed runtimes, one subdirectory per major version.
    pub java_dir: PathBuf,
    /// Default JVM arguments when an instance has none of its own.
    pub jvm_args: Vec<String>,
    pub download: DownloadSettings,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = default_data_dir();
        let java_dir = dirs::config_dir()
            .unwrap_or_else(|| data_dir.clone())
            .join(APP_DIR_NAME)
            .join("java");
        Self::rooted_at(data_dir, java_dir)
    }
}

impl Config {
    /// Layout with every directory placed under `data_dir`.
    pub fn rooted_at(data_dir: PathBuf, java_dir: PathBuf) -> Self {
        Self {
            instances_dir: data_dir.join("instances"),
            assets_dir: data_dir.join("assets"),
            libraries_dir: data_dir.join("libraries"),
            data_dir,
            java_dir,
            jvm_args: Vec::new(),
            download: DownloadSettings::default(),
        }
    }

    pub fn default_path() -> PathBuf {
        default_data_dir().join(CONFIG_FILE)
    }

    /// Load config from `path`, falling back to defaults when the file is absent.
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(LauncherError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn save(&self, path: &Path) -> LauncherResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| LauncherError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Create every configured directory.
    pub async fn ensure_dirs(&self) -> LauncherResult<()> {
        for dir in [
            &self.data_dir,
            &self.instances_dir,
            &self.assets_dir,
            &self.libraries_dir,
            &self.java_dir,
        ] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| LauncherError::Io {
                    path: dir.clone(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Managed runtime directory for one major version.
    pub fn java_major_dir(&self, major: u32) -> PathBuf {
        self.java_dir.join(major.to_string())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_layout_places_dirs_under_data_dir() {
        let cfg = Config::rooted_at(PathBuf::from("/data"), PathBuf::from("/java"));
        assert_eq!(cfg.instances_dir, PathBuf::from("/data/instances"));
        assert_eq!(cfg.assets_dir, PathBuf::from("/data/assets"));
        assert_eq!(cfg.libraries_dir, PathBuf::from("/data/libraries"));
        assert_eq!(cfg.java_major_dir(17), PathBuf::from("/java/17"));
        assert_eq!(cfg.download.library_workers, 4);
        assert_eq!(cfg.download.asset_workers, 8);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"jvm_args":["-Xmx4G"]}"#).unwrap();
        assert_eq!(cfg.jvm_args, vec!["-Xmx4G".to_string()]);
        assert_eq!(cfg.download.max_retries, 3);
    }

    #[tokio::test]
    async fn load_missing_file_returns_defaults_and_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let loaded = Config::load(&path).await.unwrap();
        assert_eq!(loaded.download.asset_workers, 8);

        let mut cfg = Config::rooted_at(dir.path().to_path_buf(), dir.path().join("java"));
        cfg.jvm_args = vec!["-Xmx3G".into()];
        cfg.save(&path).await.unwrap();
        let reloaded = Config::load(&path).await.unwrap();
        assert_eq!(reloaded.jvm_args, cfg.jvm_args);
        assert_eq!(reloaded.libraries_dir, cfg.libraries_dir);
    }
}
