use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mctui_lib::core::instance::store::load_from_path;
use mctui_lib::{
    Config, InstanceStore, JsonInstanceStore, LaunchOptions, LaunchPipeline, LauncherResult,
    PlayerIdentity, Status, StatusSink, VersionJson,
};

#[derive(Parser, Debug)]
#[command(
    name = "mctui-launch",
    version,
    about = "Download, verify and start a Minecraft instance"
)]
struct Cli {
    /// Path to the instance's `instance.json`.
    #[arg(long)]
    instance: PathBuf,

    /// Resolved version JSON for the instance.
    #[arg(long)]
    version_json: PathBuf,

    /// Launcher config file (defaults to the data directory).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "")]
    player: String,

    #[arg(long, default_value = "")]
    uuid: String,

    #[arg(long, default_value = "")]
    access_token: String,

    /// Use this Java executable instead of resolving one.
    #[arg(long)]
    java: Option<PathBuf>,

    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    mctui_lib::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> LauncherResult<()> {
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path).await?;
    config.ensure_dirs().await?;

    let instance = load_from_path(&cli.instance).await?;
    let version = VersionJson::load(&cli.version_json).await?;
    info!("Launching {} ({})", instance.name, version.id);

    let store = JsonInstanceStore::new(config.instances_dir.clone());
    store.track(&instance);
    let store: Arc<dyn InstanceStore> = Arc::new(store);
    let opts = LaunchOptions {
        instance,
        version,
        java_path: cli.java,
        offline: cli.offline,
        player: PlayerIdentity {
            name: cli.player,
            uuid: cli.uuid,
            access_token: cli.access_token,
        },
        config,
        store: Some(store),
    };

    let (tx, mut rx) = mpsc::channel(64);
    let mut pipeline = LaunchPipeline::new(opts, StatusSink::new(tx))?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling launch");
                cancel.cancel();
            }
        });
    }

    let printer = tokio::spawn(async move {
        while let Some(status) = rx.recv().await {
            print_status(&status);
        }
    });

    let result = pipeline.run(&cancel).await;
    // Closes the status channel so the printer drains and exits.
    drop(pipeline);
    let _ = printer.await;
    result
}

fn print_status(status: &Status) {
    if let Some(line) = &status.log_line {
        println!("[{}] {}", line.stream, line.text);
    } else if let Some(error) = &status.error {
        eprintln!("[{}] failed: {}", status.step, error);
    } else if status.is_complete {
        println!("{}", status.message);
    } else {
        println!(
            "[{:>3.0}%] {}: {}",
            status.progress * 100.0,
            status.step,
            status.message
        );
    }
}
