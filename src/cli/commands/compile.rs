//! Compile command - the four-stage build pipeline
//!
//! Bind arguments, read config vars, install the binary, write the profile
//! script. Each stage hands its result to the next as a value; a failure
//! anywhere aborts the run with nothing half-installed past the point of
//! failure.

use crate::cli::args::CompileArgs;
use crate::config::EnvDir;
use crate::error::BuildpackResult;
use crate::fetch::{ArtifactFetcher, HttpFetcher};
use crate::install::Installer;
use crate::invocation::InvocationArgs;
use crate::profile;
use crate::ui::{self, UiContext};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Execute the compile command
pub async fn execute(args: CompileArgs) -> BuildpackResult<()> {
    let ctx = UiContext::detect();
    let fetcher = HttpFetcher::new();
    run_pipeline(args.dirs, &fetcher, &ctx).await
}

pub(crate) async fn run_pipeline(
    dirs: Vec<PathBuf>,
    fetcher: &dyn ArtifactFetcher,
    ctx: &UiContext,
) -> BuildpackResult<()> {
    ui::intro(ctx, "sops buildpack");

    ui::section(ctx, "Parsing expected arguments");
    let invocation = InvocationArgs::bind(dirs)?;

    ui::section(ctx, "Processing required environment configuration");
    let config = EnvDir::new(invocation.env_dir.clone()).read().await?;

    ui::section(ctx, "Beginning sops install, or cache lookup");
    let version = config.require_version()?;
    warn_unless_semver(version);
    let build_dir = invocation.require_build_dir()?;
    let cache_dir = invocation.require_cache_dir()?;
    let url = config.url_for(version);
    debug!(%url, version, "resolved artifact source");

    let installer = Installer::new(build_dir, cache_dir);
    let installed = installer.install(version, &url, fetcher, ctx).await?;
    ui::detail(ctx, &format!("sops available at {}", installed.path.display()));

    ui::section(ctx, "Preparing environment for compatibility");
    profile::write_profile_script(build_dir).await?;

    ui::outro_success(ctx, &format!("sops {version} installed"));
    Ok(())
}

/// Version strings pass through verbatim; a value that is not a semver
/// release tag is usually a typo worth flagging in the build log.
fn warn_unless_semver(version: &str) {
    let normalized = version.strip_prefix('v').unwrap_or(version);
    if semver::Version::parse(normalized).is_err() {
        warn!(version, "SOPS_VERSION does not look like a semver release tag");
    }
}
