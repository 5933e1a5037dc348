pub mod detect;
pub mod install;

pub use detect::{parse_major_version, select_best, JavaDetector, JavaInstallation};
pub use install::{locate_java_binary, RuntimeInstaller};
