// ─── Version File ───
// Typed view of a Mojang version JSON, as produced by the manifest client.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::rules::{Rule, RuleEvaluator};
use crate::core::error::{LauncherError, LauncherResult};

/// Runtime major assumed when the metadata does not declare one.
pub const LEGACY_JAVA_MAJOR: u32 = 8;

/// A fully parsed Mojang version JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    pub id: String,
    /// `release`, `snapshot`, `old_beta`, `old_alpha`.
    #[serde(rename = "type", default)]
    pub version_type: String,
    pub main_class: String,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default)]
    pub java_version: Option<JavaVersionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionInfo {
    pub major_version: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadArtifact {
    pub sha1: String,
    #[serde(default)]
    pub size: u64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<ArgumentEntry>,
    #[serde(default)]
    pub jvm: Vec<ArgumentEntry>,
}

/// One entry of `arguments.game` / `arguments.jvm`.
///
/// Conditional entries (`{"rules": [...], "value": ...}`) are kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentEntry {
    Plain(String),
    Structured(serde_json::Value),
}

impl ArgumentEntry {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            ArgumentEntry::Plain(s) => Some(s),
            ArgumentEntry::Structured(_) => None,
        }
    }
}

// ─── Library Entry with Rules ───

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibDownloadArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibDownloadArtifact {
    pub path: String,
    pub sha1: String,
    #[serde(default)]
    pub size: u64,
    pub url: String,
}

impl LibraryEntry {
    pub fn artifact(&self) -> Option<&LibDownloadArtifact> {
        self.downloads.as_ref()?.artifact.as_ref()
    }
}

impl VersionJson {
    /// Parse a version JSON from disk.
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Required Java major version, defaulting to the legacy runtime.
    pub fn required_java_major(&self) -> u32 {
        self.java_version
            .as_ref()
            .map(|j| j.major_version)
            .filter(|major| *major > 0)
            .unwrap_or(LEGACY_JAVA_MAJOR)
    }

    /// Libraries whose rules allow them on `rules`' platform and that carry an artifact.
    pub fn allowed_artifacts<'a>(
        &'a self,
        rules: &'a RuleEvaluator,
    ) -> impl Iterator<Item = &'a LibDownloadArtifact> + 'a {
        self.libraries
            .iter()
            .filter(move |lib| rules.applies(&lib.rules))
            .filter_map(LibraryEntry::artifact)
    }

    /// Where the client jar lives under the shared libraries root.
    pub fn client_jar_path(&self, libraries_dir: &Path) -> PathBuf {
        libraries_dir
            .join("com")
            .join("mojang")
            .join("minecraft")
            .join(&self.id)
            .join(format!("minecraft-{}-client.jar", self.id))
    }

    pub fn asset_index_id(&self) -> &str {
        self.asset_index
            .as_ref()
            .map(|index| index.id.as_str())
            .unwrap_or_default()
    }
}
