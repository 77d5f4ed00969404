//! Artifact transfer
//!
//! The transfer sits behind [`ArtifactFetcher`] so the install stage can be
//! exercised with a stub transport. The production fetcher is a blocking
//! `ureq` client run on tokio's blocking pool; it follows redirects, treats
//! non-success statuses as failures, and bounds the whole transfer with a
//! global timeout.

use crate::error::{BuildpackError, BuildpackResult};
use crate::ui::{DownloadProgress, UiContext};
use async_trait::async_trait;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Bound on one artifact transfer, connect through last body byte.
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(300);

/// Release binaries are tens of megabytes; anything near this is wrong.
const MAX_ARTIFACT_BYTES: u64 = 512 * 1024 * 1024;

/// Transport seam for the install stage.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written.
    async fn fetch(&self, url: &str, dest: &Path, ctx: &UiContext) -> BuildpackResult<u64>;
}

/// Redirect-following HTTPS fetcher.
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            timeout: TRANSFER_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path, ctx: &UiContext) -> BuildpackResult<u64> {
        let url = url.to_string();
        let dest = dest.to_path_buf();
        let interactive = ctx.use_fancy_output();
        let timeout = self.timeout;

        tokio::task::spawn_blocking(move || fetch_blocking(&url, &dest, interactive, timeout))
            .await
            .map_err(|e| BuildpackError::Internal(format!("transfer task failed: {e}")))?
    }
}

fn fetch_blocking(
    url: &str,
    dest: &Path,
    interactive: bool,
    timeout: Duration,
) -> BuildpackResult<u64> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .new_agent();

    let mut response = agent
        .get(url)
        .call()
        .map_err(|e| BuildpackError::fetch(url, e.to_string()))?;

    let total = response.body().content_length();
    debug!(url, ?total, "transfer started");

    let mut out = std::fs::File::create(dest)
        .map_err(|e| BuildpackError::io(format!("creating {}", dest.display()), e))?;
    let mut reader = response
        .body_mut()
        .with_config()
        .limit(MAX_ARTIFACT_BYTES)
        .reader();

    let progress = DownloadProgress::new(interactive, total);
    let result = copy_body(&mut reader, &mut out, &progress, url, dest);
    progress.finish();
    let written = result?;

    out.flush()
        .map_err(|e| BuildpackError::io(format!("flushing {}", dest.display()), e))?;
    debug!(url, written, "transfer complete");
    Ok(written)
}

fn copy_body(
    reader: &mut impl Read,
    out: &mut std::fs::File,
    progress: &DownloadProgress,
    url: &str,
    dest: &Path,
) -> BuildpackResult<u64> {
    let mut written: u64 = 0;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| BuildpackError::fetch(url, format!("mid-transfer read failed: {e}")))?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])
            .map_err(|e| BuildpackError::io(format!("writing {}", dest.display()), e))?;
        written += n as u64;
        progress.advance(n as u64);
    }
    Ok(written)
}
