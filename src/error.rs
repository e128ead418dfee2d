//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by descriptor inspection
///
/// Only three conditions are fatal for an inspection run: a missing
/// `setup.py`, a failed wheel build, and a build that produced no wheel.
/// Everything else a descriptor can throw at us (unknown markers, odd
/// metadata lines) degrades into the `unparsed` bucket instead of an error.
#[derive(Debug, Error)]
pub enum InspectError {
    /// No build descriptor at the given path; the caller must expect and
    /// propagate this, never retry it.
    #[error("no setup.py found under {0}")]
    MissingDescriptor(PathBuf),

    /// The external build step exited non-zero.
    #[error("wheel build failed ({0})")]
    BuildFailed(String),

    /// The build step reported success but left no `*.whl` behind.
    #[error("build produced no wheel artifact under {0}")]
    MissingArtifact(PathBuf),

    /// The unpacked wheel is missing a piece of required metadata.
    #[error("malformed distribution metadata: {0}")]
    Metadata(String),

    /// A single requirement failed to install. Recoverable: the lifecycle
    /// controller counts it and moves on.
    #[error("install failed: {0}")]
    InstallFailed(String),

    /// Invalid inspection configuration (empty platform, bad version value).
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wheel archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, InspectError>;
