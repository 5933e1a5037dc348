// ─── Launch Arguments ───
// Builds the JVM command line from the instance, version JSON and player.

use std::path::Path;

use crate::core::config::Config;
use crate::core::instance::Instance;
use crate::core::version::{ArgumentEntry, RuleEvaluator, VersionJson};

const DEFAULT_JVM_ARGS: [&str; 2] = ["-Xmx2G", "-Xms512M"];
const DEFAULT_PLAYER_NAME: &str = "Player";
const DEFAULT_UUID: &str = "00000000-0000-0000-0000-000000000000";
const DEFAULT_ACCESS_TOKEN: &str = "0";

/// Who the game is launched as. Empty fields fall back to offline defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub name: String,
    pub uuid: String,
    pub access_token: String,
}

impl PlayerIdentity {
    pub fn offline(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn name_or_default(&self) -> &str {
        non_empty_or(&self.name, DEFAULT_PLAYER_NAME)
    }

    fn uuid_or_default(&self) -> &str {
        non_empty_or(&self.uuid, DEFAULT_UUID)
    }

    fn token_or_default(&self) -> &str {
        non_empty_or(&self.access_token, DEFAULT_ACCESS_TOKEN)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Placeholder table for game argument templates.
pub type Substitutions = Vec<(&'static str, String)>;

/// Replace every known `${...}` placeholder in `arg`.
///
/// Values never contain placeholders of their own, so the order of the table
/// does not matter and a second pass changes nothing.
pub fn substitute(arg: &str, vars: &[(&'static str, String)]) -> String {
    if !arg.contains("${") {
        return arg.to_string();
    }
    let mut out = arg.to_string();
    for (key, value) in vars {
        if out.contains(key) {
            out = out.replace(key, value);
        }
    }
    out
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

pub struct ArgumentBuilder<'a> {
    instance: &'a Instance,
    version: &'a VersionJson,
    config: &'a Config,
    player: &'a PlayerIdentity,
    offline: bool,
    os: String,
    rules: RuleEvaluator,
}

impl<'a> ArgumentBuilder<'a> {
    pub fn new(
        instance: &'a Instance,
        version: &'a VersionJson,
        config: &'a Config,
        player: &'a PlayerIdentity,
    ) -> Self {
        Self {
            instance,
            version,
            config,
            player,
            offline: false,
            os: std::env::consts::OS.to_string(),
            rules: RuleEvaluator::current(),
        }
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Build for another platform (`linux`, `macos`, `windows`).
    pub fn for_os(mut self, os: &str) -> Self {
        self.os = os.to_string();
        self.rules = RuleEvaluator::for_os(os);
        self
    }

    /// Full argument vector, excluding the Java executable itself.
    pub fn build(&self) -> Vec<String> {
        let mut args = self.jvm_arguments();

        if self.os == "macos" {
            args.push("-XstartOnFirstThread".to_string());
        }
        args.push(format!(
            "-Djava.library.path={}",
            path_str(&self.instance.natives_dir())
        ));
        args.push("-cp".to_string());
        args.push(self.classpath());
        args.push(self.version.main_class.clone());
        args.extend(self.game_arguments());
        args
    }

    pub fn jvm_arguments(&self) -> Vec<String> {
        if !self.instance.jvm_args.is_empty() {
            self.instance.jvm_args.clone()
        } else if !self.config.jvm_args.is_empty() {
            self.config.jvm_args.clone()
        } else {
            DEFAULT_JVM_ARGS.iter().map(|a| a.to_string()).collect()
        }
    }

    /// Allowed library jars followed by the client jar.
    pub fn classpath(&self) -> String {
        let libraries_dir = &self.config.libraries_dir;
        let mut entries: Vec<String> = self
            .version
            .allowed_artifacts(&self.rules)
            .map(|artifact| path_str(&libraries_dir.join(&artifact.path)))
            .collect();
        entries.push(path_str(&self.version.client_jar_path(libraries_dir)));
        entries.join(self.classpath_separator())
    }

    fn classpath_separator(&self) -> &'static str {
        if self.os == "windows" {
            ";"
        } else {
            ":"
        }
    }

    pub fn substitutions(&self) -> Substitutions {
        let user_type = if self.offline { "legacy" } else { "msa" };
        vec![
            ("${auth_player_name}", self.player.name_or_default().to_string()),
            ("${version_name}", self.version.id.clone()),
            ("${game_directory}", path_str(&self.instance.game_dir())),
            ("${assets_root}", path_str(&self.config.assets_dir)),
            ("${assets_index_name}", self.version.asset_index_id().to_string()),
            ("${auth_uuid}", self.player.uuid_or_default().to_string()),
            ("${auth_access_token}", self.player.token_or_default().to_string()),
            ("${user_type}", user_type.to_string()),
            ("${version_type}", self.version.version_type.clone()),
            ("${user_properties}", "{}".to_string()),
        ]
    }

    /// Structured game arguments when present, the legacy string otherwise.
    ///
    /// Conditional entries (objects with rules) are not evaluated and are left out.
    pub fn game_arguments(&self) -> Vec<String> {
        let vars = self.substitutions();
        let structured = self
            .version
            .arguments
            .as_ref()
            .map(|a| a.game.as_slice())
            .unwrap_or_default();

        if !structured.is_empty() {
            return structured
                .iter()
                .filter_map(ArgumentEntry::as_plain)
                .map(|arg| substitute(arg, &vars))
                .collect();
        }

        self.version
            .minecraft_arguments
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(|arg| substitute(arg, &vars))
            .collect()
    }
}
