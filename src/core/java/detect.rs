// ─── Java Detection ───
// Finds installed runtimes and probes them with `java -version`.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::core::error::{LauncherError, LauncherResult};

const VERSION_PATTERN: &str = r#"(?:java|openjdk) version "([^"]+)""#;
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaInstallation {
    /// Path to the `java` executable.
    pub path: PathBuf,
    /// Full version string, e.g. `17.0.9` or `1.8.0_391`.
    pub version: String,
    pub major: u32,
    pub is_64bit: bool,
    /// Empty when the vendor could not be determined.
    pub vendor: String,
}

impl fmt::Display for JavaInstallation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vendor = if self.vendor.is_empty() {
            "Unknown"
        } else {
            &self.vendor
        };
        let arch = if self.is_64bit { "64-bit" } else { "32-bit" };
        write!(f, "Java {} ({}, {})", self.major, vendor, arch)
    }
}

/// Finds Java installations on the system.
#[derive(Debug, Clone)]
pub struct JavaDetector {
    version_re: Regex,
    search_paths: Vec<PathBuf>,
    probe_timeout: Duration,
    /// Also consider `JAVA_HOME` and `PATH`.
    from_env: bool,
}

impl JavaDetector {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self::with_search_paths(
            compile_version_regex()?,
            default_search_paths(),
        ))
    }

    fn with_search_paths(version_re: Regex, search_paths: Vec<PathBuf>) -> Self {
        Self {
            version_re,
            search_paths,
            probe_timeout: PROBE_TIMEOUT,
            from_env: true,
        }
    }

    /// Detector that scans only the installations below `roots`.
    pub fn scanning(roots: Vec<PathBuf>) -> LauncherResult<Self> {
        let mut detector = Self::with_search_paths(compile_version_regex()?, roots);
        detector.from_env = false;
        Ok(detector)
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Every installation that answers `-version`, deduplicated by real path.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Vec<JavaInstallation> {
        let mut installations = Vec::new();
        let mut seen = HashSet::new();

        for candidate in self.candidates() {
            let real = std::fs::canonicalize(&candidate).unwrap_or(candidate);
            if !seen.insert(real.clone()) {
                continue;
            }
            if let Some(inst) = self.probe(&real).await {
                debug!("Found {} at {:?}", inst, inst.path);
                installations.push(inst);
            }
        }

        info!("Detected {} Java installation(s)", installations.len());
        installations
    }

    /// Best installation for `min_major`, see [`select_best`].
    pub async fn find_best(&self, min_major: u32) -> Option<JavaInstallation> {
        let installations = self.find_all().await;
        select_best(&installations, min_major).cloned()
    }

    /// Run `<path> -version` and parse what it prints.
    pub async fn probe(&self, path: &Path) -> Option<JavaInstallation> {
        let child = tokio::process::Command::new(path)
            .arg("-version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.probe_timeout, child).await {
            Ok(Ok(output)) if output.status.success() => output,
            Ok(Ok(output)) => {
                debug!("{:?} -version exited with {}", path, output.status);
                return None;
            }
            Ok(Err(e)) => {
                debug!("Cannot run {:?}: {}", path, e);
                return None;
            }
            Err(_) => {
                debug!("{:?} -version timed out", path);
                return None;
            }
        };

        let text = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
        self.parse_version_output(path, &text)
    }

    /// Parse combined `-version` output for the running platform.
    pub fn parse_version_output(&self, path: &Path, output: &str) -> Option<JavaInstallation> {
        parse_output(&self.version_re, path, output, !cfg!(windows))
    }

    fn candidates(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();

        if self.from_env {
            if let Some(home) = std::env::var_os("JAVA_HOME") {
                if let Some(java) = find_java_in_dir(Path::new(&home)) {
                    out.push(java);
                }
            }
            if let Some(java) = find_on_path() {
                out.push(java);
            }
        }

        for root in &self.search_paths {
            let Ok(entries) = std::fs::read_dir(root) else {
                continue;
            };
            let mut dirs: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect();
            dirs.sort();
            out.extend(dirs.iter().filter_map(|dir| find_java_in_dir(dir)));
        }

        out
    }
}

fn compile_version_regex() -> LauncherResult<Regex> {
    Regex::new(VERSION_PATTERN)
        .map_err(|e| LauncherError::Other(format!("invalid version pattern: {e}")))
}

fn parse_output(
    version_re: &Regex,
    path: &Path,
    output: &str,
    assume_64bit: bool,
) -> Option<JavaInstallation> {
    let mut version = String::new();
    let mut is_64bit = false;
    let mut vendor = String::new();

    for line in output.lines() {
        if let Some(caps) = version_re.captures(line) {
            version = caps[1].to_string();
        }

        if line.contains("64-Bit") || line.contains("amd64") || line.contains("x86_64") {
            is_64bit = true;
        }

        let lower = line.to_ascii_lowercase();
        if lower.contains("graalvm") {
            vendor = "GraalVM".into();
        } else if lower.contains("azul") {
            vendor = "Azul Zulu".into();
        } else if lower.contains("adoptium") || lower.contains("temurin") {
            vendor = "Eclipse Adoptium".into();
        } else if lower.contains("oracle") {
            vendor = "Oracle".into();
        } else if lower.contains("microsoft") {
            vendor = "Microsoft".into();
        } else if lower.contains("openjdk") && vendor.is_empty() {
            vendor = "OpenJDK".into();
        }
    }

    if version.is_empty() {
        return None;
    }

    Some(JavaInstallation {
        path: path.to_path_buf(),
        major: parse_major_version(&version),
        version,
        is_64bit: is_64bit || assume_64bit,
        vendor,
    })
}

/// `1.8.0_391` → 8, `17.0.9` → 17, unparseable → 0.
pub fn parse_major_version(version: &str) -> u32 {
    let mut parts = version.split('.');
    let first = parts.next().unwrap_or_default();
    if first == "1" {
        if let Some(second) = parts.next() {
            return second.parse().unwrap_or(0);
        }
    }
    first.parse().unwrap_or(0)
}

/// Smallest 64-bit major at or above `min_major`; otherwise the newest 64-bit one.
pub fn select_best(installations: &[JavaInstallation], min_major: u32) -> Option<&JavaInstallation> {
    let candidates = installations.iter().filter(|inst| inst.is_64bit);

    let qualifying = candidates
        .clone()
        .filter(|inst| inst.major >= min_major)
        .fold(None::<&JavaInstallation>, |best, inst| match best {
            Some(b) if b.major <= inst.major => Some(b),
            _ => Some(inst),
        });

    qualifying.or_else(|| {
        candidates.fold(None, |best, inst| match best {
            Some(b) if b.major >= inst.major => Some(b),
            _ => Some(inst),
        })
    })
}

pub fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

/// `bin/java` or the macOS bundle layout `Contents/Home/bin/java`.
pub fn find_java_in_dir(dir: &Path) -> Option<PathBuf> {
    let primary = dir.join("bin").join(java_exe());
    let mac_layout = dir
        .join("Contents")
        .join("Home")
        .join("bin")
        .join(java_exe());
    [primary, mac_layout].into_iter().find(|p| p.is_file())
}

fn find_on_path() -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(java_exe()))
        .find(|candidate| candidate.is_file())
}

fn default_search_paths() -> Vec<PathBuf> {
    let home = dirs::home_dir().unwrap_or_default();
    match std::env::consts::OS {
        "macos" => vec![
            PathBuf::from("/Library/Java/JavaVirtualMachines"),
            PathBuf::from("/System/Library/Java/JavaVirtualMachines"),
            home.join(".sdkman/candidates/java"),
            home.join(".jenv/versions"),
        ],
        "linux" => vec![
            PathBuf::from("/usr/lib/jvm"),
            PathBuf::from("/usr/lib64/jvm"),
            PathBuf::from("/usr/java"),
            home.join(".sdkman/candidates/java"),
            home.join(".jenv/versions"),
        ],
        "windows" => vec![
            PathBuf::from(r"C:\Program Files\Java"),
            PathBuf::from(r"C:\Program Files\Eclipse Adoptium"),
            PathBuf::from(r"C:\Program Files\Zulu"),
            PathBuf::from(r"C:\Program Files\Microsoft\jdk"),
        ],
        _ => Vec::new(),
    }
}
