//! sops buildpack - installs mozilla sops into a Heroku slug
//!
//! A four-stage linear pipeline run once per build: bind the platform's
//! positional directories, read config vars from the env dir, install a
//! cached-or-downloaded sops binary into the build output, and write the
//! PATH profile script.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod invocation;
pub mod profile;
pub mod ui;

pub use error::{BuildpackError, BuildpackResult};
