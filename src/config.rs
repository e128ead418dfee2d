//! Per-inspection configuration
//!
//! Every inspection carries its own [`InspectConfig`]; there is no process
//! global state. The config is assembled from CLI arguments with
//! environment-variable fallbacks:
//!
//! - `WHEELHOUSE_PLATFORM`: target platform override (e.g. `Windows`, `Linux`)
//! - `WHEELHOUSE_PYTHON_VERSION`: interpreter version override (e.g. `3.9`)
//! - `WHEELHOUSE_PYTHON`: interpreter binary used for builds, installs and
//!   version probing - default: `python3`
//!
//! The interpreter version uses the major + minor/10 float encoding the marker
//! comparisons expect (3.9 → 3.9). When no override is given, the version is
//! probed from the configured interpreter's `--version` output.

use crate::error::{InspectError, Result};
use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, warn};

const DEFAULT_PYTHON_BIN: &str = "python3";

/// Version assumed when the interpreter cannot be probed and no override is
/// set. Marker comparisons still run; the result is only as good as this
/// guess, which is why the fallback is logged at warn level.
const FALLBACK_PYTHON_VERSION: f64 = 3.9;

/// Configuration for a single descriptor inspection.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Directory containing `setup.py`.
    pub setup_path: PathBuf,

    /// Normalized lower-case target platform (`linux`, `darwin`, `windows`).
    pub platform: String,

    /// Interpreter version, major + minor/10 encoded.
    pub python_version: f64,

    /// Interpreter binary for the build and install sub-processes.
    pub python_bin: String,
}

impl InspectConfig {
    /// Build a config for `setup_path` from the environment: platform from
    /// `WHEELHOUSE_PLATFORM` or the host, version from
    /// `WHEELHOUSE_PYTHON_VERSION` or an interpreter probe.
    pub fn detect(setup_path: impl Into<PathBuf>) -> Self {
        let python_bin =
            env::var("WHEELHOUSE_PYTHON").unwrap_or_else(|_| DEFAULT_PYTHON_BIN.to_string());

        let platform = env::var("WHEELHOUSE_PLATFORM")
            .map(|p| p.to_lowercase())
            .unwrap_or_else(|_| host_platform());

        let python_version = env::var("WHEELHOUSE_PYTHON_VERSION")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or_else(|| match probe_python_version(&python_bin) {
                Some(v) => v,
                None => {
                    warn!(
                        python_bin,
                        fallback = FALLBACK_PYTHON_VERSION,
                        "could not probe interpreter version, using fallback"
                    );
                    FALLBACK_PYTHON_VERSION
                }
            });

        debug!(platform, python_version, python_bin, "inspection config");

        Self {
            setup_path: setup_path.into(),
            platform,
            python_version,
            python_bin,
        }
    }

    /// Fully explicit config; no environment reads, no sub-processes.
    pub fn fixed(
        setup_path: impl Into<PathBuf>,
        platform: impl Into<String>,
        python_version: f64,
    ) -> Self {
        Self {
            setup_path: setup_path.into(),
            platform: platform.into().to_lowercase(),
            python_version,
            python_bin: DEFAULT_PYTHON_BIN.to_string(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into().to_lowercase();
        self
    }

    pub fn with_python_version(mut self, version: f64) -> Self {
        self.python_version = version;
        self
    }

    pub fn with_python_bin(mut self, python_bin: impl Into<String>) -> Self {
        self.python_bin = python_bin.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.platform.is_empty() {
            return Err(InspectError::Config("platform must not be empty".into()));
        }
        if self.platform.chars().any(|c| c.is_uppercase()) {
            return Err(InspectError::Config(format!(
                "platform must be lower-case: {}",
                self.platform
            )));
        }
        if !self.python_version.is_finite() || self.python_version <= 0.0 {
            return Err(InspectError::Config(format!(
                "python version must be positive: {}",
                self.python_version
            )));
        }
        Ok(())
    }
}

/// Host platform in the `platform_system` vocabulary, lower-cased.
pub fn host_platform() -> String {
    match env::consts::OS {
        "macos" => "darwin".to_string(),
        other => other.to_string(),
    }
}

/// Encode a major.minor pair as major + minor/10.
///
/// Two-digit minors overflow into the major (3.10 → 4.0). That matches how
/// the interpreter side has always been encoded; marker values go through a
/// plain float parse instead, so "3.10" compares as 3.1. Both quirks are kept.
pub fn encode_version(major: u32, minor: u32) -> f64 {
    f64::from(major) + f64::from(minor) / 10.0
}

/// Ask `python_bin --version` for its major.minor, encoded. `None` when the
/// binary is missing or prints something unrecognizable.
pub fn probe_python_version(python_bin: &str) -> Option<f64> {
    let output = Command::new(python_bin).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    // Python 2 printed the version on stderr.
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    parse_version_output(&text)
}

fn parse_version_output(text: &str) -> Option<f64> {
    let re = Regex::new(r"(\d+)\.(\d+)").expect("valid regex");
    let caps = re.captures(text)?;
    let major: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minor: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some(encode_version(major, minor))
}
