//! Cache-or-download install of the sops binary
//!
//! The cache directory holds one entry per version ever built
//! (`sops_<version>`), plus a JSON receipt recording where the entry came
//! from. A cached version is never re-fetched or re-verified; the installed
//! copy in the build output is rewritten on every run.

use crate::error::{BuildpackError, BuildpackResult};
use crate::fetch::ArtifactFetcher;
use crate::ui::{self, UiContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Cache filename prefix: entries are `sops_<version>`.
pub const CACHE_PREFIX: &str = "sops";

/// Directory created inside the build output to hold the binary.
pub const INSTALL_DIR: &str = ".sops-buildpack";

/// Name of the installed executable.
pub const BINARY_NAME: &str = "sops";

/// Provenance record written beside each cache entry.
///
/// Informational only: cache hits never consult it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheReceipt {
    pub version: String,
    pub url: String,
    pub sha256: String,
    pub size_bytes: u64,
    pub fetched_at: DateTime<Utc>,
}

/// Where the binary ended up inside the build output.
#[derive(Debug, Clone)]
pub struct InstalledBinary {
    /// `<build_dir>/.sops-buildpack`
    pub dir: PathBuf,
    /// `<build_dir>/.sops-buildpack/sops`
    pub path: PathBuf,
}

/// Installs a versioned sops binary from cache or network.
pub struct Installer {
    build_dir: PathBuf,
    cache_dir: PathBuf,
}

impl Installer {
    pub fn new(build_dir: &Path, cache_dir: &Path) -> Self {
        Self {
            build_dir: build_dir.to_path_buf(),
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    /// Cache entry path for a version, deterministic in the version string.
    pub fn cache_entry(&self, version: &str) -> PathBuf {
        self.cache_dir.join(format!("{CACHE_PREFIX}_{version}"))
    }

    /// Receipt path for a version.
    pub fn receipt_path(&self, version: &str) -> PathBuf {
        self.cache_dir.join(format!("{CACHE_PREFIX}_{version}.json"))
    }

    /// Ensure the cache holds the requested version, then copy it into the
    /// build output. The copy is rewritten even on a cache hit.
    pub async fn install(
        &self,
        version: &str,
        url: &str,
        fetcher: &dyn ArtifactFetcher,
        ctx: &UiContext,
    ) -> BuildpackResult<InstalledBinary> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| BuildpackError::io(format!("creating {}", self.cache_dir.display()), e))?;

        let entry = self.cache_entry(version);
        if entry.exists() {
            ui::detail(ctx, &format!("Using cached sops {version}"));
            self.log_receipt(version).await;
        } else {
            self.populate_cache(version, url, fetcher, ctx).await?;
        }

        let target_dir = self.build_dir.join(INSTALL_DIR);
        fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| BuildpackError::io(format!("creating {}", target_dir.display()), e))?;

        let dest = target_dir.join(BINARY_NAME);
        fs::copy(&entry, &dest).await.map_err(|e| {
            BuildpackError::io(
                format!("copying {} to {}", entry.display(), dest.display()),
                e,
            )
        })?;
        set_executable(&dest).await?;

        Ok(InstalledBinary {
            dir: target_dir,
            path: dest,
        })
    }

    /// Download, validate, and atomically commit one cache entry.
    ///
    /// The artifact lands in a partial file first; only a non-empty,
    /// executable artifact is renamed into the cache path, so a racing
    /// build sees either no entry or a complete one.
    async fn populate_cache(
        &self,
        version: &str,
        url: &str,
        fetcher: &dyn ArtifactFetcher,
        ctx: &UiContext,
    ) -> BuildpackResult<()> {
        ui::detail(ctx, &format!("Downloading sops {version}"));
        debug!(url, "cache miss, fetching artifact");

        let partial = self
            .cache_dir
            .join(format!(".{CACHE_PREFIX}_{version}.partial"));

        let size_bytes = match fetcher.fetch(url, &partial, ctx).await {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        if size_bytes == 0 {
            let _ = fs::remove_file(&partial).await;
            return Err(BuildpackError::EmptyArtifact {
                url: url.to_string(),
            });
        }

        set_executable(&partial).await?;
        let sha256 = sha256_of(&partial).await?;

        let receipt = CacheReceipt {
            version: version.to_string(),
            url: url.to_string(),
            sha256: sha256.clone(),
            size_bytes,
            fetched_at: Utc::now(),
        };
        let receipt_path = self.receipt_path(version);
        fs::write(&receipt_path, serde_json::to_vec_pretty(&receipt)?)
            .await
            .map_err(|e| BuildpackError::io(format!("writing {}", receipt_path.display()), e))?;

        let entry = self.cache_entry(version);
        fs::rename(&partial, &entry).await.map_err(|e| {
            BuildpackError::io(
                format!("committing {} to {}", partial.display(), entry.display()),
                e,
            )
        })?;

        debug!(%sha256, size_bytes, "artifact cached");
        Ok(())
    }

    /// Surface the cache entry's provenance in the debug log, if recorded.
    async fn log_receipt(&self, version: &str) {
        if let Ok(raw) = fs::read(self.receipt_path(version)).await {
            if let Ok(receipt) = serde_json::from_slice::<CacheReceipt>(&raw) {
                debug!(
                    sha256 = %receipt.sha256,
                    fetched_at = %receipt.fetched_at,
                    "cache entry provenance"
                );
            }
        }
    }
}

async fn set_executable(path: &Path) -> BuildpackResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .await
        .map_err(|e| BuildpackError::io(format!("reading metadata of {}", path.display()), e))?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .await
        .map_err(|e| BuildpackError::io(format!("marking {} executable", path.display()), e))
}

async fn sha256_of(path: &Path) -> BuildpackResult<String> {
    let data = fs::read(path)
        .await
        .map_err(|e| BuildpackError::io(format!("hashing {}", path.display()), e))?;
    Ok(hex::encode(Sha256::digest(&data)))
}
