//! Build configuration sourced from the platform's env dir
//!
//! Heroku materializes each config var as a file in `ENV_DIR` whose name is
//! the variable and whose content is the value. The reader binds the fixed
//! required set (plus optional overrides) into a [`BuildConfig`] that the
//! later pipeline stages consume directly.

use crate::error::{BuildpackError, BuildpackResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Config vars that must be present when an env dir exists at all.
pub const REQUIRED_VARS: &[&str] = &["SOPS_VERSION"];

/// Optional override for the artifact source. The literal `{version}` is
/// substituted with the requested version.
pub const VAR_DOWNLOAD_URL: &str = "SOPS_DOWNLOAD_URL";

/// Default artifact location for mozilla/sops release binaries.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://github.com/mozilla/sops/releases/download/{version}/sops-{version}.linux";

/// Values read from the env dir, passed between pipeline stages.
#[derive(Debug, Default, Clone)]
pub struct BuildConfig {
    /// Content of the `SOPS_VERSION` config var, trailing whitespace trimmed.
    pub sops_version: Option<String>,
    /// Content of the `SOPS_DOWNLOAD_URL` config var, if set.
    pub download_url: Option<String>,
}

impl BuildConfig {
    /// The requested version, or the exit-1 missing-config error.
    pub fn require_version(&self) -> BuildpackResult<&str> {
        self.sops_version
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(BuildpackError::MissingConfigVar("SOPS_VERSION"))
    }

    /// Resolve the download URL for a version from the configured or
    /// default template.
    pub fn url_for(&self, version: &str) -> String {
        let template = self.download_url.as_deref().unwrap_or(DEFAULT_URL_TEMPLATE);
        template.replace("{version}", version)
    }
}

/// Reader over the platform-supplied env dir.
pub struct EnvDir {
    root: Option<PathBuf>,
}

impl EnvDir {
    /// Wrap the (possibly unsupplied) env dir path.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Read the required config vars, then optional ones.
    ///
    /// A missing env dir is not an error: older platform revisions did not
    /// pass one, so all reads are skipped and every field stays unset. A
    /// present env dir that lacks a required var aborts before any further
    /// var is processed.
    pub async fn read(&self) -> BuildpackResult<BuildConfig> {
        let root = match self.root.as_deref() {
            Some(root) if root.is_dir() => root,
            _ => {
                debug!("env dir not present, skipping config reads");
                return Ok(BuildConfig::default());
            }
        };

        let mut config = BuildConfig::default();
        for &name in REQUIRED_VARS {
            let value = read_var(root, name)
                .await?
                .ok_or(BuildpackError::MissingConfigVar(name))?;
            debug!(var = name, "read required config var");
            if name == "SOPS_VERSION" {
                config.sops_version = Some(value);
            }
        }

        config.download_url = read_var(root, VAR_DOWNLOAD_URL).await?;
        if config.download_url.is_some() {
            debug!(var = VAR_DOWNLOAD_URL, "artifact source overridden");
        }

        Ok(config)
    }
}

/// Read one config var file, `None` when absent. Trailing whitespace is
/// trimmed to match shell `$(cat file)` semantics.
async fn read_var(root: &Path, name: &str) -> BuildpackResult<Option<String>> {
    let path = root.join(name);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| BuildpackError::ConfigRead {
            name: name.to_string(),
            path: path.clone(),
            source: e,
        })?;

    Ok(Some(content.trim_end().to_string()))
}
