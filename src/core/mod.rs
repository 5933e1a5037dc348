// ─── mctui Core ───
// Backend for preparing and starting a Minecraft instance.
//
// Architecture:
//   core/
//     config      — Global directories and download tuning
//     http        — Shared client + retry with backoff
//     instance/   — Instance model + persistence seam
//     version/    — Version JSON + OS rules
//     downloader/ — Concurrent downloads with SHA-1 validation
//     assets/     — Asset index + object downloads
//     java/       — Java detection and managed runtime install
//     launch/     — Arguments, pipeline steps, game process

pub mod assets;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod instance;
pub mod java;
pub mod launch;
pub mod version;
