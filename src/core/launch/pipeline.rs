// ─── Launch Pipeline ───
// Runtime check, downloads, directory setup and game launch as one ordered run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::core::assets;
use crate::core::config::Config;
use crate::core::downloader::{format_speed, DownloadItem, DownloadManager, Progress};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;
use crate::core::instance::{Instance, InstanceStore};
use crate::core::java::{locate_java_binary, JavaDetector, RuntimeInstaller};
use crate::core::version::{RuleEvaluator, VersionJson};

use super::arguments::{ArgumentBuilder, PlayerIdentity};
use super::process::GameProcess;
use super::status::{Status, StatusSink};

/// Everything one launch needs. Owned by the pipeline for the whole run.
pub struct LaunchOptions {
    pub instance: Instance,
    pub version: VersionJson,
    /// Skip runtime resolution and use this executable.
    pub java_path: Option<PathBuf>,
    pub offline: bool,
    pub player: PlayerIdentity,
    pub config: Config,
    pub store: Option<Arc<dyn InstanceStore>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchStep {
    CheckRuntime,
    DownloadLibraries,
    DownloadAssets,
    PrepareDirectories,
    LaunchProcess,
}

impl LaunchStep {
    pub const ALL: [LaunchStep; 5] = [
        LaunchStep::CheckRuntime,
        LaunchStep::DownloadLibraries,
        LaunchStep::DownloadAssets,
        LaunchStep::PrepareDirectories,
        LaunchStep::LaunchProcess,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            LaunchStep::CheckRuntime => "Checking Java",
            LaunchStep::DownloadLibraries => "Downloading libraries",
            LaunchStep::DownloadAssets => "Downloading assets",
            LaunchStep::PrepareDirectories => "Preparing game",
            LaunchStep::LaunchProcess => "Launching",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<LaunchStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Overall progress at the start of this step.
    pub fn progress(self) -> f64 {
        self.index() as f64 / Self::ALL.len() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Running(LaunchStep),
    Succeeded,
    Failed(LaunchStep),
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PipelineState::Running(_))
    }
}

pub struct LaunchPipeline {
    opts: LaunchOptions,
    client: Client,
    detector: JavaDetector,
    installer: RuntimeInstaller,
    status: StatusSink,
    state: PipelineState,
    java: Option<PathBuf>,
}

impl LaunchPipeline {
    pub fn new(opts: LaunchOptions, status: StatusSink) -> LauncherResult<Self> {
        let client = build_http_client()?;
        let installer = RuntimeInstaller::with_client(client.clone())
            .with_retry(opts.config.download.retry_policy());
        Ok(Self {
            opts,
            client,
            detector: JavaDetector::new()?,
            installer,
            status,
            state: PipelineState::Running(LaunchStep::CheckRuntime),
            java: None,
        })
    }

    pub fn with_detector(mut self, detector: JavaDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_installer(mut self, installer: RuntimeInstaller) -> Self {
        self.installer = installer;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn instance(&self) -> &Instance {
        &self.opts.instance
    }

    pub fn into_instance(self) -> Instance {
        self.opts.instance
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Exactly one terminal status (error or complete) is sent per run.
    #[instrument(skip_all, fields(instance = %self.opts.instance.id))]
    pub async fn run(&mut self, cancel: &CancellationToken) -> LauncherResult<()> {
        self.state = PipelineState::Running(LaunchStep::CheckRuntime);

        while let PipelineState::Running(step) = self.state {
            let name = step.display_name();
            info!("Step {}/{}: {}", step.index() + 1, LaunchStep::ALL.len(), name);
            self.status
                .emit(Status::new(name, step.progress(), format!("{name}...")));

            let outcome = if cancel.is_cancelled() {
                Err(LauncherError::Cancelled)
            } else {
                self.run_step(step, cancel).await
            };

            match outcome {
                Ok(()) => {
                    self.state = step
                        .next()
                        .map_or(PipelineState::Succeeded, PipelineState::Running);
                }
                Err(e) => {
                    let err = e.in_step(name);
                    error!("Launch failed: {}", err);
                    self.state = PipelineState::Failed(step);
                    self.status
                        .finish(Status::failed(name, step.progress(), &err))
                        .await;
                    return Err(err);
                }
            }
        }

        self.opts.instance.mark_cached();
        self.persist_instance().await;
        info!("Launch finished for {}", self.opts.instance.name);
        self.status.finish(Status::complete()).await;
        Ok(())
    }

    async fn run_step(&mut self, step: LaunchStep, cancel: &CancellationToken) -> LauncherResult<()> {
        match step {
            LaunchStep::CheckRuntime => self.check_runtime(cancel).await,
            LaunchStep::DownloadLibraries => self.download_libraries(cancel).await,
            LaunchStep::DownloadAssets => self.download_assets(cancel).await,
            LaunchStep::PrepareDirectories => self.prepare_directories().await,
            LaunchStep::LaunchProcess => self.launch_process().await,
        }
    }

    fn note(&self, step: LaunchStep, message: impl Into<String>) {
        self.status
            .emit(Status::new(step.display_name(), step.progress(), message));
    }

    async fn persist_instance(&self) {
        if let Some(store) = &self.opts.store {
            if let Err(e) = store.save_instance(&self.opts.instance).await {
                warn!("Failed to save instance {}: {}", self.opts.instance.id, e);
            }
        }
    }

    // ── Java ────────────────────────────────────────────

    async fn check_runtime(&mut self, cancel: &CancellationToken) -> LauncherResult<()> {
        let step = LaunchStep::CheckRuntime;

        if let Some(path) = self.opts.java_path.clone() {
            self.note(step, format!("Using Java at {}", path.display()));
            self.java = Some(path);
            return Ok(());
        }

        if let Some(path) = self.opts.instance.java_path.clone().filter(|p| p.exists()) {
            self.note(step, "Using instance Java");
            self.java = Some(path);
            return Ok(());
        }

        let major = self.opts.version.required_java_major();
        debug!("Version {} requires Java {}", self.opts.version.id, major);

        let managed = self.opts.config.java_major_dir(major);
        if let Some(path) = locate_java_binary(&managed) {
            self.note(step, format!("Using managed Java {major}"));
            self.remember_java(path).await;
            return Ok(());
        }

        self.note(step, "Detecting installed Java...");
        match self.detector.find_best(major).await {
            Some(found) if found.major >= major => {
                self.note(step, format!("Using {found}"));
                self.remember_java(found.path).await;
                return Ok(());
            }
            Some(found) => warn!(
                "Best installed runtime is {} but Java {} is required",
                found, major
            ),
            None => debug!("No installed Java found"),
        }

        let status = self.status.clone();
        let progress = step.progress();
        let path = self
            .installer
            .install(major, &self.opts.config.java_dir, cancel, |message| {
                status.emit(Status::new(step.display_name(), progress, message))
            })
            .await?;
        self.note(step, format!("Downloaded Java {major}"));
        self.remember_java(path).await;
        Ok(())
    }

    async fn remember_java(&mut self, path: PathBuf) {
        info!("Using Java at {:?}", path);
        self.java = Some(path.clone());
        self.opts.instance.java_path = Some(path);
        self.persist_instance().await;
    }

    // ── Downloads ───────────────────────────────────────

    async fn download_libraries(&mut self, cancel: &CancellationToken) -> LauncherResult<()> {
        let step = LaunchStep::DownloadLibraries;
        if cancel.is_cancelled() {
            return Err(LauncherError::Cancelled);
        }
        if self.opts.instance.is_fully_downloaded {
            self.note(step, "Libraries already downloaded");
            return Ok(());
        }

        let version = &self.opts.version;
        let libraries_dir = &self.opts.config.libraries_dir;
        let rules = RuleEvaluator::current();

        let mut items: Vec<DownloadItem> = version
            .allowed_artifacts(&rules)
            .filter(|artifact| !artifact.url.is_empty())
            .map(|artifact| {
                verified_item(
                    &artifact.url,
                    libraries_dir.join(&artifact.path),
                    &artifact.sha1,
                    artifact.size,
                )
            })
            .collect();

        if let Some(client) = version.downloads.as_ref().and_then(|d| d.client.as_ref()) {
            items.push(
                verified_item(
                    &client.url,
                    version.client_jar_path(libraries_dir),
                    &client.sha1,
                    client.size,
                )
                .with_priority(1),
            );
        }

        let workers = self.opts.config.download.library_workers;
        self.run_batch(step, items, workers, cancel).await
    }

    async fn download_assets(&mut self, cancel: &CancellationToken) -> LauncherResult<()> {
        let step = LaunchStep::DownloadAssets;
        if cancel.is_cancelled() {
            return Err(LauncherError::Cancelled);
        }
        if self.opts.instance.is_fully_downloaded {
            self.note(step, "Assets already downloaded");
            return Ok(());
        }
        let Some(info) = self.opts.version.asset_index.clone() else {
            self.note(step, "No asset index declared");
            return Ok(());
        };

        let assets_dir = self.opts.config.assets_dir.clone();
        self.note(step, format!("Fetching asset index {}...", info.id));
        let index = assets::ensure_index(&self.manager(1), cancel, &info, &assets_dir).await?;

        let items = index.download_items(&assets_dir);
        let workers = self.opts.config.download.asset_workers;
        self.run_batch(step, items, workers, cancel).await
    }

    fn manager(&self, workers: usize) -> DownloadManager {
        DownloadManager::with_client(self.client.clone(), workers)
            .with_retry(self.opts.config.download.retry_policy())
    }

    async fn run_batch(
        &self,
        step: LaunchStep,
        items: Vec<DownloadItem>,
        workers: usize,
        cancel: &CancellationToken,
    ) -> LauncherResult<()> {
        let (tx, mut rx) = mpsc::channel::<Progress>(8);
        let status = self.status.clone();
        let name = step.display_name();
        let base = step.progress();
        let forwarder = tokio::spawn(async move {
            while let Some(p) = rx.recv().await {
                let overall = base + p.fraction() / LaunchStep::ALL.len() as f64;
                status.emit(Status::new(
                    name,
                    overall,
                    format!(
                        "{}/{} files ({})",
                        p.completed_items,
                        p.total_items,
                        format_speed(p.speed)
                    ),
                ));
            }
        });

        let result = self.manager(workers).download(cancel, items, Some(tx)).await;
        let _ = forwarder.await;

        if cancel.is_cancelled() {
            return Err(LauncherError::Cancelled);
        }
        if !result.is_success() {
            for failure in &result.errors {
                warn!("{}", failure);
            }
            return Err(LauncherError::DownloadsFailed {
                failed: result.failed,
            });
        }
        self.note(step, format!("{} files ready", result.completed));
        Ok(())
    }

    // ── Game ────────────────────────────────────────────

    async fn prepare_directories(&self) -> LauncherResult<()> {
        let instance = &self.opts.instance;
        for dir in [
            instance.path.clone(),
            instance.game_dir(),
            instance.mods_dir(),
            instance.resourcepacks_dir(),
            instance.saves_dir(),
        ] {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|source| LauncherError::Io { path: dir, source })?;
        }
        Ok(())
    }

    async fn launch_process(&mut self) -> LauncherResult<()> {
        let step = LaunchStep::LaunchProcess;
        let java = self
            .java
            .clone()
            .ok_or_else(|| LauncherError::JavaNotFound(self.opts.version.required_java_major()))?;

        let args = ArgumentBuilder::new(
            &self.opts.instance,
            &self.opts.version,
            &self.opts.config,
            &self.opts.player,
        )
        .offline(self.opts.offline)
        .build();

        let instance_id = self.opts.instance.id.clone();
        let process = GameProcess::spawn(&java, &args, &self.opts.instance.game_dir(), &instance_id)?;
        let started = Instant::now();
        info!("Game started (pid {:?})", process.id());

        self.opts.instance.last_played = Some(Utc::now());
        if let Some(store) = &self.opts.store {
            if let Err(e) = store.record_last_played(&instance_id).await {
                warn!("Failed to record last played for {}: {}", instance_id, e);
            }
        }
        self.note(step, "Game running...");

        let exit = process
            .wait(step.display_name(), step.progress(), &self.status)
            .await;
        self.opts.instance.play_time_secs += started.elapsed().as_secs();
        exit
    }
}

/// Item with hash verification when the metadata declares one.
fn verified_item(url: &str, dest: PathBuf, sha1: &str, size: u64) -> DownloadItem {
    let item = DownloadItem::new(url, dest).with_size(size);
    if sha1.is_empty() {
        item
    } else {
        item.with_sha1(sha1.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_ordered() {
        let names: Vec<_> = LaunchStep::ALL.iter().map(|s| s.display_name()).collect();
        assert_eq!(
            names,
            vec![
                "Checking Java",
                "Downloading libraries",
                "Downloading assets",
                "Preparing game",
                "Launching"
            ]
        );
        assert_eq!(
            LaunchStep::CheckRuntime.next(),
            Some(LaunchStep::DownloadLibraries)
        );
        assert_eq!(LaunchStep::LaunchProcess.next(), None);
        assert_eq!(LaunchStep::CheckRuntime.progress(), 0.0);
        assert!((LaunchStep::LaunchProcess.progress() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn terminal_states() {
        assert!(!PipelineState::Running(LaunchStep::DownloadAssets).is_terminal());
        assert!(PipelineState::Succeeded.is_terminal());
        assert!(PipelineState::Failed(LaunchStep::LaunchProcess).is_terminal());
    }

    #[test]
    fn verified_item_skips_empty_hash() {
        let item = verified_item("http://x/a.jar", PathBuf::from("/a.jar"), "", 4);
        assert_eq!(item.sha1, None);
        assert_eq!(item.size, 4);

        let item = verified_item("http://x/a.jar", PathBuf::from("/a.jar"), "ABCD", 4);
        assert_eq!(item.sha1.as_deref(), Some("abcd"));
    }
}
