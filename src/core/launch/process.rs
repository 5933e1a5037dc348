// ─── Game Process ───
// Spawns the game JVM and streams its output back as statuses.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};

use super::status::{LogStream, Status, StatusSink};

/// Markers that make a stdout line worth surfacing.
const IMPORTANT_MARKERS: [&str; 5] = ["[FATAL]", "[ERROR]", "[WARN]", "Exception", "Error"];

/// Whether a stdout line should be forwarded to the caller.
pub fn is_important(line: &str) -> bool {
    IMPORTANT_MARKERS.iter().any(|marker| line.contains(marker))
}

/// A running game with its output pipes attached.
pub struct GameProcess {
    child: Child,
    instance_id: String,
}

impl GameProcess {
    /// Start `java` with `args` inside `game_dir`.
    pub fn spawn(
        java: &Path,
        args: &[String],
        game_dir: &Path,
        instance_id: &str,
    ) -> LauncherResult<Self> {
        let mut cmd = Command::new(java);
        cmd.args(args)
            .current_dir(game_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        info!("Launching game with Java: {:?}", java);
        debug!("Command (copy/paste): {}", format_command_for_logs(java, args));

        let child = cmd
            .spawn()
            .map_err(|e| LauncherError::JavaExecution(format!("{}: {}", java.display(), e)))?;

        Ok(Self {
            child,
            instance_id: instance_id.to_string(),
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Forward output until the game exits and both pipes are drained.
    ///
    /// A non-zero exit is reported as [`LauncherError::GameExited`].
    pub async fn wait(
        mut self,
        step: &'static str,
        progress: f64,
        status: &StatusSink,
    ) -> LauncherResult<()> {
        let drain = |stream| Drain {
            stream,
            step,
            progress,
            status: status.clone(),
            instance_id: self.instance_id.clone(),
        };
        let stdout = self
            .child
            .stdout
            .take()
            .map(|out| drain(LogStream::Stdout).spawn(out));
        let stderr = self
            .child
            .stderr
            .take()
            .map(|err| drain(LogStream::Stderr).spawn(err));

        let exit = self.child.wait().await.map_err(LauncherError::from);

        for drain in [stdout, stderr].into_iter().flatten() {
            let _ = drain.await;
        }

        let exit = exit?;
        info!("[mc:{}] exited with {}", self.instance_id, exit);
        check_exit(exit)
    }
}

fn check_exit(exit: ExitStatus) -> LauncherResult<()> {
    if exit.success() {
        Ok(())
    } else {
        Err(LauncherError::GameExited(exit.to_string()))
    }
}

/// Copies one output pipe into log statuses until end-of-stream.
struct Drain {
    stream: LogStream,
    step: &'static str,
    progress: f64,
    status: StatusSink,
    instance_id: String,
}

impl Drain {
    fn spawn<R>(self, reader: R) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("[mc:{}][{}] read failed: {}", self.instance_id, self.stream, e);
                        break;
                    }
                }
                // Game output is not guaranteed to be UTF-8.
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(|c| c == '\r' || c == '\n')
                    .to_string();
                self.forward(line);
            }
        })
    }

    fn forward(&self, line: String) {
        match self.stream {
            LogStream::Stdout => {
                debug!("[mc:{}][stdout] {}", self.instance_id, line);
                if !is_important(&line) {
                    return;
                }
            }
            LogStream::Stderr => warn!("[mc:{}][stderr] {}", self.instance_id, line),
        }
        self.status
            .emit(Status::log(self.step, self.progress, line, self.stream));
    }
}

fn format_command_for_logs(program: &Path, args: &[String]) -> String {
    std::iter::once(shell_escape(&program.to_string_lossy()))
        .chain(args.iter().map(|arg| shell_escape(arg)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn important_lines() {
        assert!(is_important("[12:00:00] [Render thread/ERROR]: boom [ERROR]"));
        assert!(is_important("java.lang.NullPointerException"));
        assert!(is_important("[FATAL] out of memory"));
        assert!(is_important("Caused by: java.lang.Error"));
        assert!(!is_important("[12:00:00] [Render thread/INFO]: Setting user: Alice"));
    }

    #[test]
    fn command_formatting_quotes_spaces() {
        let cmd = format_command_for_logs(
            Path::new("/usr/bin/java"),
            &["-cp".into(), "/a b/c.jar".into(), "".into()],
        );
        assert_eq!(cmd, "/usr/bin/java -cp \"/a b/c.jar\" \"\"");
    }

    #[tokio::test]
    async fn missing_executable_is_an_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameProcess::spawn(&dir.path().join("no-java"), &[], dir.path(), "x")
            .err()
            .unwrap();
        assert!(matches!(err, LauncherError::JavaExecution(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn output_is_filtered_and_exit_code_checked() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::channel(16);
        let sink = StatusSink::new(tx);

        let args: Vec<String> = vec![
            "-c".into(),
            "echo hello; echo '[ERROR] broken'; echo oops >&2; exit 3".into(),
        ];
        let process = GameProcess::spawn(Path::new("/bin/sh"), &args, dir.path(), "x").unwrap();
        let err = process.wait("Launching", 0.8, &sink).await.unwrap_err();
        assert!(matches!(err, LauncherError::GameExited(_)));
        drop(sink);

        let mut lines = Vec::new();
        while let Some(status) = rx.recv().await {
            let line = status.log_line.unwrap();
            lines.push((line.stream, line.text));
        }
        lines.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(
            lines,
            vec![
                (LogStream::Stdout, "[ERROR] broken".to_string()),
                (LogStream::Stderr, "oops".to_string()),
            ]
        );
    }
}
