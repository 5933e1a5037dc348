pub mod rules;
pub mod version_file;

pub use rules::{OsRule, Rule, RuleAction, RuleEvaluator};
pub use version_file::{
    ArgumentEntry, Arguments, AssetIndexInfo, DownloadArtifact, LibDownloadArtifact,
    LibraryDownloads, LibraryEntry, VersionDownloads, VersionJson,
};
