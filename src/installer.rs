//! Package installer collaborator
//!
//! One invocation per requirement, success or failure per call, no batch
//! mode. A failed install never aborts the run; the lifecycle controller
//! counts successes and reports the shortfall through its return value.

use crate::error::{InspectError, Result};
use std::process::Command;
use std::sync::Mutex;
use tracing::{debug, warn};

/// External installation mechanism.
pub trait Installer: Send + Sync {
    /// Install a single requirement. `Err` means the installer reported
    /// failure for this requirement; the caller decides what that means for
    /// the batch.
    fn install(&self, requirement: &str) -> Result<()>;
}

/// `<python> -m pip install <requirement>`, blocking, exit status checked.
pub struct PipInstaller {
    python_bin: String,
}

impl PipInstaller {
    pub fn new(python_bin: impl Into<String>) -> Self {
        Self {
            python_bin: python_bin.into(),
        }
    }
}

impl Installer for PipInstaller {
    fn install(&self, requirement: &str) -> Result<()> {
        debug!(requirement, "installing via pip");

        let output = Command::new(&self.python_bin)
            .args(["-m", "pip", "install", requirement])
            .output()
            .map_err(|e| InspectError::InstallFailed(format!("failed to spawn pip: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(requirement, status = %output.status, "pip install failed");
            return Err(InspectError::InstallFailed(format!(
                "pip install {requirement} failed: {}",
                stderr.lines().last().unwrap_or("no output")
            )));
        }

        Ok(())
    }
}

/// Test double that records what was requested and fails on command.
pub struct MockInstaller {
    installed: Mutex<Vec<String>>,
    fail_on: Vec<String>,
}

impl MockInstaller {
    pub fn new() -> Self {
        Self {
            installed: Mutex::new(Vec::new()),
            fail_on: Vec::new(),
        }
    }

    /// Fail every install of the named requirements.
    pub fn failing_on(requirements: &[&str]) -> Self {
        Self {
            installed: Mutex::new(Vec::new()),
            fail_on: requirements.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Requirements successfully "installed" so far, in invocation order.
    pub fn installed(&self) -> Vec<String> {
        self.installed.lock().unwrap().clone()
    }
}

impl Default for MockInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl Installer for MockInstaller {
    fn install(&self, requirement: &str) -> Result<()> {
        if self.fail_on.iter().any(|f| f == requirement) {
            return Err(InspectError::InstallFailed(format!(
                "simulated install failure: {requirement}"
            )));
        }
        self.installed.lock().unwrap().push(requirement.to_string());
        Ok(())
    }
}
