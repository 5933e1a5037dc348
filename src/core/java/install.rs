// ─── Runtime Acquisition ───
// Downloads a JRE from the Adoptium API into `<java_dir>/<major>`.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use flate2::read::GzDecoder;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use super::detect::java_exe;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::{build_http_client, get_with_retry, RetryPolicy};

pub const ADOPTIUM_API_BASE: &str = "https://api.adoptium.net";

/// Extracted runtime is assumed to need about this many times the archive size.
const EXTRACT_SIZE_FACTOR: u64 = 3;

#[derive(Debug, Clone, Deserialize)]
struct AdoptiumRelease {
    #[serde(default)]
    binaries: Vec<AdoptiumBinary>,
}

#[derive(Debug, Clone, Deserialize)]
struct AdoptiumBinary {
    package: AdoptiumPackage,
}

/// Downloadable archive as published by Adoptium.
#[derive(Debug, Clone, Deserialize)]
pub struct AdoptiumPackage {
    pub link: String,
    pub name: String,
    /// Hex SHA-256 of the archive.
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    fn from_name(name: &str) -> Self {
        if name.ends_with(".zip") {
            ArchiveKind::Zip
        } else {
            ArchiveKind::TarGz
        }
    }
}

/// Fetches and unpacks managed runtimes.
#[derive(Debug, Clone)]
pub struct RuntimeInstaller {
    client: Client,
    api_base: String,
    retry: RetryPolicy,
}

impl RuntimeInstaller {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self::with_client(build_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            api_base: ADOPTIUM_API_BASE.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point at another Adoptium-compatible API (mirrors, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn release_url(&self, major: u32, os: &str, arch: &str) -> String {
        format!(
            "{}/v3/assets/feature_releases/{}/ga?architecture={}&heap_size=normal&image_type=jre&jvm_impl=hotspot&os={}&page=0&page_size=1&project=jdk&sort_method=DEFAULT&sort_order=DESC&vendor=eclipse",
            self.api_base, major, arch, os
        )
    }

    /// Latest GA JRE package for `major` on this platform.
    pub async fn resolve(&self, major: u32) -> LauncherResult<AdoptiumPackage> {
        let os = adoptium_os(std::env::consts::OS);
        let arch = adoptium_arch(std::env::consts::ARCH);
        let url = self.release_url(major, os, arch);
        debug!("Resolving runtime via {}", url);

        let releases: Vec<AdoptiumRelease> =
            get_with_retry(&self.client, &url, self.retry).await?.json().await?;

        releases
            .into_iter()
            .next()
            .and_then(|release| release.binaries.into_iter().next())
            .map(|binary| binary.package)
            .ok_or_else(|| LauncherError::RuntimeUnavailable {
                major,
                os: os.to_string(),
                arch: arch.to_string(),
            })
    }

    /// Install Java `major` under `<java_dir>/<major>` and return its executable.
    ///
    /// Unpacks into `<major>.partial` and renames it onto `<major>` only once
    /// `bin/java` is in place. A failed install leaves `<major>` untouched.
    ///
    /// `on_status` receives short human-readable phase messages.
    #[instrument(skip(self, java_dir, cancel, on_status))]
    pub async fn install(
        &self,
        major: u32,
        java_dir: &Path,
        cancel: &CancellationToken,
        on_status: impl Fn(String),
    ) -> LauncherResult<PathBuf> {
        on_status(format!("Resolving Java {major}..."));
        let package = self.resolve(major).await?;

        let version_dir = java_dir.join(major.to_string());
        let staging_dir = java_dir.join(format!("{major}.partial"));
        remove_dir_if_exists(&staging_dir).await?;
        tokio::fs::create_dir_all(&staging_dir)
            .await
            .map_err(|source| LauncherError::Io {
                path: staging_dir.clone(),
                source,
            })?;

        let staged = self
            .install_into(major, &package, &staging_dir, cancel, &on_status)
            .await;
        let staged_java = match staged {
            Ok(java) => java,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_dir_all(&staging_dir).await {
                    warn!("Failed to remove {:?}: {}", staging_dir, cleanup);
                }
                return Err(e);
            }
        };

        remove_dir_if_exists(&version_dir).await?;
        tokio::fs::rename(&staging_dir, &version_dir)
            .await
            .map_err(|source| LauncherError::Io {
                path: version_dir.clone(),
                source,
            })?;

        let java = staged_java
            .strip_prefix(&staging_dir)
            .map(|rel| version_dir.join(rel))
            .map_err(|_| LauncherError::JavaNotFound(major))?;
        info!("Installed Java {} at {:?}", major, java);
        Ok(java)
    }

    async fn install_into(
        &self,
        major: u32,
        package: &AdoptiumPackage,
        staging_dir: &Path,
        cancel: &CancellationToken,
        on_status: &impl Fn(String),
    ) -> LauncherResult<PathBuf> {
        ensure_min_disk_space(
            staging_dir,
            package.size.saturating_mul(EXTRACT_SIZE_FACTOR),
        )?;

        on_status(format!("Downloading Java {major}..."));
        let archive_path = staging_dir.join(archive_file_name(&package.name));
        let started = Instant::now();
        let digest = self
            .download_archive(&package.link, &archive_path, cancel)
            .await?;
        info!("Runtime download finished in {:?}", started.elapsed());

        if let Some(expected) = package.checksum.as_deref().filter(|c| !c.is_empty()) {
            if !digest.eq_ignore_ascii_case(expected) {
                return Err(LauncherError::Sha256Mismatch {
                    path: archive_path,
                    expected: expected.to_string(),
                    actual: digest,
                });
            }
        }

        on_status("Extracting Java runtime...".to_string());
        let kind = ArchiveKind::from_name(&package.name);
        let archive = archive_path.clone();
        let dest = staging_dir.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || extract_archive(&archive, &dest, kind))
            .await
            .map_err(|e| LauncherError::Other(format!("Task join error: {e}")));
        let _ = tokio::fs::remove_file(&archive_path).await;
        extracted??;

        let java = locate_java_binary(staging_dir).ok_or(LauncherError::JavaNotFound(major))?;
        ensure_executable(&java)?;
        Ok(java)
    }

    /// Stream `url` into `dest`, returning the hex SHA-256 of what was written.
    async fn download_archive(
        &self,
        url: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> LauncherResult<String> {
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(LauncherError::Cancelled),
            response = get_with_retry(&self.client, url, self.retry) => response?,
        };

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|source| LauncherError::Io {
                path: dest.to_path_buf(),
                source,
            })?;
        let mut hasher = Sha256::new();
        let mut stream = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Err(LauncherError::Cancelled),
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk?;
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|source| LauncherError::Io {
                    path: dest.to_path_buf(),
                    source,
                })?;
        }
        file.flush().await.map_err(|source| LauncherError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(hex::encode(hasher.finalize()))
    }
}

pub fn adoptium_os(os: &str) -> &str {
    match os {
        "macos" => "mac",
        other => other,
    }
}

pub fn adoptium_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "aarch64" => "aarch64",
        other => other,
    }
}

async fn remove_dir_if_exists(dir: &Path) -> LauncherResult<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LauncherError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn archive_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "runtime.tar.gz".to_string())
}

/// First `bin/java` found below `root`.
pub fn locate_java_binary(root: &Path) -> Option<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| {
            entry.file_name() == java_exe()
                && entry
                    .path()
                    .parent()
                    .and_then(Path::file_name)
                    .map(|dir| dir == "bin")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
}

fn ensure_executable(java_bin: &Path) -> LauncherResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(java_bin)
            .map_err(|source| LauncherError::Io {
                path: java_bin.to_path_buf(),
                source,
            })?
            .permissions();
        if perms.mode() & 0o111 == 0 {
            perms.set_mode(0o755);
            fs::set_permissions(java_bin, perms).map_err(|source| LauncherError::Io {
                path: java_bin.to_path_buf(),
                source,
            })?;
        }
    }
    #[cfg(not(unix))]
    let _ = java_bin;
    Ok(())
}

fn ensure_min_disk_space(path: &Path, minimum_bytes: u64) -> LauncherResult<()> {
    if minimum_bytes == 0 {
        return Ok(());
    }
    let disks = sysinfo::Disks::new_with_refreshed_list();
    let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut best_len = 0usize;
    let mut available = None;
    for disk in disks.list() {
        let mount = disk.mount_point();
        if canonical.starts_with(mount) {
            let len = mount.as_os_str().len();
            if len >= best_len {
                best_len = len;
                available = Some(disk.available_space());
            }
        }
    }
    match available {
        Some(bytes) if bytes < minimum_bytes => Err(LauncherError::InsufficientDiskSpace {
            path: path.to_path_buf(),
            available: bytes,
            required: minimum_bytes,
        }),
        _ => Ok(()),
    }
}

// ── Extraction ─────────────────────────────────────────

fn extract_archive(archive: &Path, dest: &Path, kind: ArchiveKind) -> LauncherResult<()> {
    info!("Extracting {:?} as {:?}", archive, kind);
    match kind {
        ArchiveKind::TarGz => extract_tar_gz(archive, dest),
        ArchiveKind::Zip => extract_zip(archive, dest),
    }
}

/// Drop the archive's top-level directory; `None` for the directory itself
/// and for anything that would escape `dest`.
fn strip_top_level(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;
    let mut rel = PathBuf::new();
    for component in components {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!rel.as_os_str().is_empty()).then_some(rel)
}

/// Whether a symlink stored at `rel` (relative to the extraction root) with
/// target `link` resolves to somewhere inside that root.
fn link_stays_inside(rel: &Path, link: &Path) -> bool {
    let mut depth = rel.components().count().saturating_sub(1);
    for component in link.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> LauncherResult<()> {
    let file = fs::File::open(archive).map_err(|source| LauncherError::Io {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);

    let io_err = |source: io::Error| LauncherError::Io {
        path: archive.to_path_buf(),
        source,
    };

    fs::create_dir_all(dest).map_err(|source| LauncherError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    let root = fs::canonicalize(dest).map_err(|source| LauncherError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    for entry in tar.entries().map_err(io_err)? {
        let mut entry = entry.map_err(io_err)?;
        let entry_path = entry.path().map_err(io_err)?.into_owned();
        let Some(rel) = strip_top_level(&entry_path) else {
            continue;
        };
        let target = dest.join(&rel);

        let kind = entry.header().entry_type();
        if kind.is_hard_link() {
            warn!("Skipping hard link {:?} in runtime archive", entry_path);
            continue;
        }
        if kind.is_symlink() {
            let link = entry.link_name().map_err(io_err)?;
            let inside = link
                .as_deref()
                .map(|link| link_stays_inside(&rel, link))
                .unwrap_or(false);
            if !inside {
                warn!("Skipping symlink {:?} -> {:?} leaving the runtime", entry_path, link);
                continue;
            }
        }
        if !(kind.is_dir() || kind.is_file() || kind.is_symlink()) {
            continue;
        }

        let dir = if kind.is_dir() {
            target.as_path()
        } else {
            match target.parent() {
                Some(parent) => parent,
                None => continue,
            }
        };
        fs::create_dir_all(dir).map_err(|source| LauncherError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        // An earlier entry may have turned part of this path into a symlink.
        let resolved = fs::canonicalize(dir).map_err(|source| LauncherError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if !resolved.starts_with(&root) {
            return Err(LauncherError::UnsafeArchiveEntry(entry_path));
        }
        if kind.is_dir() {
            continue;
        }

        entry.unpack(&target).map_err(|source| LauncherError::Io {
            path: target.clone(),
            source,
        })?;
    }
    Ok(())
}

fn extract_zip(archive: &Path, dest: &Path) -> LauncherResult<()> {
    let file = fs::File::open(archive).map_err(|source| LauncherError::Io {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip = zip::ZipArchive::new(file)?;

    for index in 0..zip.len() {
        let mut zipped = zip.by_index(index)?;
        let Some(enclosed) = zipped.enclosed_name() else {
            return Err(LauncherError::Other("Invalid zip entry path".into()));
        };
        let Some(rel) = strip_top_level(&enclosed) else {
            continue;
        };
        let out_path = dest.join(rel);

        if zipped.is_dir() {
            fs::create_dir_all(&out_path).map_err(|source| LauncherError::Io {
                path: out_path,
                source,
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|source| LauncherError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut out = fs::File::create(&out_path).map_err(|source| LauncherError::Io {
            path: out_path.clone(),
            source,
        })?;
        io::copy(&mut zipped, &mut out).map_err(|source| LauncherError::Io {
            path: out_path.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = zipped.unix_mode() {
                let _ = fs::set_permissions(&out_path, fs::Permissions::from_mode(mode));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn platform_names_follow_adoptium() {
        assert_eq!(adoptium_os("macos"), "mac");
        assert_eq!(adoptium_os("linux"), "linux");
        assert_eq!(adoptium_os("windows"), "windows");
        assert_eq!(adoptium_arch("x86_64"), "x64");
        assert_eq!(adoptium_arch("aarch64"), "aarch64");
        assert_eq!(adoptium_arch("riscv64"), "riscv64");
    }

    #[test]
    fn release_url_filters_jre_hotspot() {
        let installer = RuntimeInstaller::with_client(Client::new()).with_api_base("http://mirror/");
        let url = installer.release_url(17, "linux", "x64");
        assert!(url.starts_with("http://mirror/v3/assets/feature_releases/17/ga?"));
        assert!(url.contains("architecture=x64"));
        assert!(url.contains("image_type=jre"));
        assert!(url.contains("jvm_impl=hotspot"));
        assert!(url.contains("os=linux"));
    }

    #[test]
    fn strip_top_level_drops_root_and_rejects_escapes() {
        assert_eq!(
            strip_top_level(Path::new("jdk-17.0.9+9-jre/bin/java")),
            Some(PathBuf::from("bin/java"))
        );
        assert_eq!(strip_top_level(Path::new("jdk-17.0.9+9-jre/")), None);
        assert_eq!(strip_top_level(Path::new("jdk/../../etc/passwd")), None);
    }

    #[test]
    fn zip_extraction_strips_top_level() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("jre.zip");
        {
            let file = fs::File::create(&archive).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            writer.add_directory("jdk-21-jre/", options).unwrap();
            writer.start_file("jdk-21-jre/bin/java.exe", options).unwrap();
            writer.write_all(b"MZ").unwrap();
            writer.start_file("jdk-21-jre/release", options).unwrap();
            writer.write_all(b"JAVA_VERSION=\"21\"").unwrap();
            writer.finish().unwrap();
        }

        let out = dir.path().join("out");
        extract_zip(&archive, &out).unwrap();
        assert!(out.join("bin/java.exe").is_file());
        assert!(out.join("release").is_file());
        assert!(!out.join("jdk-21-jre").exists());
    }

    #[cfg(unix)]
    #[test]
    fn tar_gz_extraction_keeps_symlinks_and_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("jre.tar.gz");
        {
            let file = fs::File::create(&archive).unwrap();
            let gz = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
            let mut builder = tar::Builder::new(gz);

            let body = b"#!/bin/sh\n";
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(body.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(&mut header, "jdk-17-jre/bin/java", &body[..])
                .unwrap();

            let mut link = tar::Header::new_gnu();
            link.set_entry_type(tar::EntryType::Symlink);
            link.set_size(0);
            link.set_mode(0o777);
            builder
                .append_link(&mut link, "jdk-17-jre/lib/java-link", "../bin/java")
                .unwrap();

            builder.into_inner().unwrap().finish().unwrap();
        }

        let out = dir.path().join("17");
        extract_tar_gz(&archive, &out).unwrap();
        let java = out.join("bin/java");
        assert!(java.is_file());
        assert_eq!(fs::metadata(&java).unwrap().permissions().mode() & 0o777, 0o755);
        let link = fs::symlink_metadata(out.join("lib/java-link")).unwrap();
        assert!(link.file_type().is_symlink());
    }

    #[test]
    fn symlink_targets_are_checked_against_the_root() {
        assert!(link_stays_inside(Path::new("lib/java-link"), Path::new("../bin/java")));
        assert!(link_stays_inside(Path::new("legal/LICENSE"), Path::new("java.base/LICENSE")));
        assert!(!link_stays_inside(Path::new("lib"), Path::new("../outside")));
        assert!(!link_stays_inside(Path::new("lib/a"), Path::new("../../outside")));
        assert!(!link_stays_inside(Path::new("lib"), Path::new("/etc")));
    }

    #[cfg(unix)]
    #[test]
    fn tar_gz_symlink_cannot_redirect_writes_outside() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();

        for target in [outside.clone(), PathBuf::from("../../outside")] {
            let archive = dir.path().join("evil.tar.gz");
            {
                let file = fs::File::create(&archive).unwrap();
                let gz = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
                let mut builder = tar::Builder::new(gz);

                let mut link = tar::Header::new_gnu();
                link.set_entry_type(tar::EntryType::Symlink);
                link.set_size(0);
                link.set_mode(0o777);
                builder.append_link(&mut link, "jdk/lib", &target).unwrap();

                let body = b"pwned";
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Regular);
                header.set_size(body.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder
                    .append_data(&mut header, "jdk/lib/evil", &body[..])
                    .unwrap();

                builder.into_inner().unwrap().finish().unwrap();
            }

            let out = dir.path().join("17");
            let _ = fs::remove_dir_all(&out);
            extract_tar_gz(&archive, &out).unwrap();

            assert!(!outside.join("evil").exists());
            let lib = fs::symlink_metadata(out.join("lib")).unwrap();
            assert!(lib.is_dir());
            assert!(out.join("lib/evil").is_file());
        }
    }

    #[cfg(unix)]
    #[test]
    fn tar_gz_entries_under_a_preexisting_escape_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        let out = dir.path().join("17");
        fs::create_dir_all(&out).unwrap();
        std::os::unix::fs::symlink(&outside, out.join("lib")).unwrap();

        let archive = dir.path().join("jre.tar.gz");
        {
            let file = fs::File::create(&archive).unwrap();
            let gz = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
            let mut builder = tar::Builder::new(gz);
            let body = b"x";
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, "jdk/lib/evil", &body[..])
                .unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        }

        let err = extract_tar_gz(&archive, &out).unwrap_err();
        assert!(matches!(err, LauncherError::UnsafeArchiveEntry(_)));
        assert!(!outside.join("evil").exists());
    }

    #[test]
    fn locate_finds_java_only_inside_bin() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib").join(java_exe()), b"").unwrap();
        assert!(locate_java_binary(dir.path()).is_none());

        fs::create_dir_all(dir.path().join("jre/bin")).unwrap();
        fs::write(dir.path().join("jre/bin").join(java_exe()), b"").unwrap();
        assert_eq!(
            locate_java_binary(dir.path()),
            Some(dir.path().join("jre/bin").join(java_exe()))
        );
    }

    #[test]
    fn archive_kind_from_name() {
        assert_eq!(ArchiveKind::from_name("OpenJDK17U-jre_x64_windows.zip"), ArchiveKind::Zip);
        assert_eq!(
            ArchiveKind::from_name("OpenJDK17U-jre_x64_linux.tar.gz"),
            ArchiveKind::TarGz
        );
    }
}
