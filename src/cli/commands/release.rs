//! Release command - release-phase manifest
//!
//! This buildpack configures no addons and no default process types, so the
//! manifest is the empty YAML document the platform expects.

use crate::cli::args::ReleaseArgs;
use crate::error::BuildpackResult;

/// Execute the release command
pub async fn execute(_args: ReleaseArgs) -> BuildpackResult<()> {
    println!("--- {{}}");
    Ok(())
}
