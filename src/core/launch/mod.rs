pub mod arguments;
pub mod pipeline;
pub mod process;
pub mod status;

pub use arguments::{substitute, ArgumentBuilder, PlayerIdentity};
pub use pipeline::{LaunchOptions, LaunchPipeline, LaunchStep, PipelineState};
pub use process::GameProcess;
pub use status::{LogLine, LogStream, Status, StatusSink};
