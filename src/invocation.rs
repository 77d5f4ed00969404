//! Positional argument binding for the compile phase
//!
//! Heroku invokes compile with `<build_dir> <cache_dir> <env_dir>`. More
//! than three arguments means the calling contract changed upstream and the
//! run aborts before any side effect.

use crate::error::{BuildpackError, BuildpackResult};
use std::path::{Path, PathBuf};

/// The three platform-supplied directories, bound from positional arguments.
///
/// Unsupplied trailing arguments stay `None`; whether that is fatal is up to
/// the stage that needs the directory. Paths are not checked for existence
/// here.
#[derive(Debug, Clone)]
pub struct InvocationArgs {
    pub build_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub env_dir: Option<PathBuf>,
}

impl InvocationArgs {
    /// Bind positional arguments to directory roles.
    pub fn bind(dirs: Vec<PathBuf>) -> BuildpackResult<Self> {
        if dirs.len() > 3 {
            return Err(BuildpackError::ContractViolation {
                received: dirs.len(),
            });
        }

        let mut dirs = dirs.into_iter();
        Ok(Self {
            build_dir: dirs.next(),
            cache_dir: dirs.next(),
            env_dir: dirs.next(),
        })
    }

    /// The build output directory, required by the install stage.
    pub fn require_build_dir(&self) -> BuildpackResult<&Path> {
        self.build_dir
            .as_deref()
            .ok_or(BuildpackError::MissingDirectory { role: "build" })
    }

    /// The cache directory, required by the install stage.
    pub fn require_cache_dir(&self) -> BuildpackResult<&Path> {
        self.cache_dir
            .as_deref()
            .ok_or(BuildpackError::MissingDirectory { role: "cache" })
    }
}
