//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// sops buildpack
///
/// Installs a pinned release of mozilla sops into a Heroku app's build
/// output so dynos can decrypt configuration at boot.
#[derive(Parser, Debug)]
#[command(name = "sops-buildpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Buildpack API phases
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install sops into the build directory (platform compile phase)
    Compile(CompileArgs),

    /// Report that this buildpack applies (platform detect phase)
    Detect(DetectArgs),

    /// Emit the release manifest (platform release phase)
    Release(ReleaseArgs),
}

/// Arguments for the compile command
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Platform-supplied directories: <BUILD_DIR> <CACHE_DIR> <ENV_DIR>
    #[arg(value_name = "DIR", num_args = 0..)]
    pub dirs: Vec<PathBuf>,
}

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// App source directory supplied by the platform
    #[arg(value_name = "BUILD_DIR")]
    pub build_dir: Option<PathBuf>,
}

/// Arguments for the release command
#[derive(Parser, Debug)]
pub struct ReleaseArgs {
    /// App source directory supplied by the platform
    #[arg(value_name = "BUILD_DIR")]
    pub build_dir: Option<PathBuf>,
}
