//! Build-log output in the platform's buildpack style
//!
//! Plain arrow-prefixed lines when attached to a build orchestrator (the
//! common case on Heroku), `cliclack`-styled output when a developer runs
//! the binary in an interactive terminal.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{detail, intro, outro_success, section};
pub use progress::DownloadProgress;
