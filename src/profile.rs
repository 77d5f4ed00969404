//! Runtime PATH setup via the platform's profile hook
//!
//! Dynos source every script in `.profile.d/` at boot; one line there puts
//! the installed binary's directory on PATH for web processes and one-off
//! invocations alike.

use crate::error::{BuildpackError, BuildpackResult};
use crate::install::INSTALL_DIR;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Profile hook directory inside the build output.
pub const PROFILE_DIR: &str = ".profile.d";

/// Script owned by this buildpack.
pub const PROFILE_SCRIPT: &str = "sops.sh";

/// The PATH line written into the profile script. `$HOME` is the app root
/// at dyno runtime, where the install directory ends up.
pub fn path_export_line() -> String {
    format!(r#"export PATH="$PATH:$HOME/{INSTALL_DIR}/""#)
}

/// Ensure the profile script exists and carries the PATH export.
///
/// Idempotent: if the line is already present the script is left untouched,
/// so builds reusing a persisted output directory do not grow it.
/// Pre-existing unrelated content is preserved.
pub async fn write_profile_script(build_dir: &Path) -> BuildpackResult<PathBuf> {
    let dir = build_dir.join(PROFILE_DIR);
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| BuildpackError::io(format!("creating {}", dir.display()), e))?;

    let script = dir.join(PROFILE_SCRIPT);
    let line = path_export_line();

    let existing = match fs::read_to_string(&script).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(BuildpackError::io(
                format!("reading {}", script.display()),
                e,
            ))
        }
    };

    if existing.lines().any(|l| l.trim() == line) {
        debug!("PATH export already present, leaving profile script unchanged");
        return Ok(script);
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&line);
    content.push('\n');

    fs::write(&script, content)
        .await
        .map_err(|e| BuildpackError::io(format!("writing {}", script.display()), e))?;

    Ok(script)
}
