//! Detect command - buildpack applicability
//!
//! An explicitly added buildpack applies to every app, so detect always
//! succeeds; the printed name shows up in the platform's build log.

use crate::cli::args::DetectArgs;
use crate::error::BuildpackResult;

/// Execute the detect command
pub async fn execute(_args: DetectArgs) -> BuildpackResult<()> {
    println!("sops");
    Ok(())
}
