//! Requirement classification and install lifecycle
//!
//! One [`Inspection`] per build descriptor. The instance walks a strictly
//! ordered state machine - Init, Read, Loaded, Installed - where each public
//! operation checks its guard at the top and transparently runs its
//! prerequisite first. Classification happens exactly once per load and is
//! recomputed from scratch if a load is re-entered, never accumulated.

use crate::build::{SetupPyBuilder, WheelBuilder};
use crate::config::InspectConfig;
use crate::error::{InspectError, Result};
use crate::extract::MetadataExtractor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::installer::{Installer, PipInstaller};
use crate::markers::{self, Bucket};
use crate::metadata::DistMetadata;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Processing stage of an inspection, strictly ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Init,
    Read,
    Loaded,
    Installed,
}

/// The four authoritative requirement buckets plus the diagnostic
/// `other_platform` list.
///
/// A requirement appears in at most one of `base` / `platform_match` /
/// `version_match` / `unparsed`. Requirements whose platform marker did not
/// match land in `other_platform` so operators can see where everything
/// went; that list is never installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequirementBuckets {
    pub base: Vec<String>,
    pub platform_match: Vec<String>,
    pub version_match: Vec<String>,
    pub unparsed: Vec<String>,
    pub other_platform: Vec<String>,
}

impl RequirementBuckets {
    /// Count across the installable buckets (`other_platform` excluded).
    pub fn expected_total(&self) -> usize {
        self.base.len() + self.platform_match.len() + self.version_match.len() + self.unparsed.len()
    }

    fn file(&mut self, requirement: String, bucket: Bucket) {
        match bucket {
            Bucket::Base => self.base.push(requirement),
            Bucket::PlatformMatch => self.platform_match.push(requirement),
            Bucket::VersionMatch => self.version_match.push(requirement),
            Bucket::Unparsed => self.unparsed.push(requirement),
            Bucket::OtherPlatform => self.other_platform.push(requirement),
        }
    }
}

/// Expected vs. actually-installed requirement counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstallCounts {
    pub expected: usize,
    pub actual: usize,
}

/// Serializable snapshot of an inspection for display.
#[derive(Debug, Serialize)]
pub struct InspectionReport {
    pub name: String,
    pub version: String,
    pub platform: String,
    pub python_version: f64,
    pub state: Lifecycle,
    pub buckets: RequirementBuckets,
    pub counts: InstallCounts,
    pub packages: Vec<String>,
    pub top_level: Vec<String>,
    pub console_scripts: Vec<String>,
}

/// Stateful representation of one build descriptor.
pub struct Inspection {
    config: InspectConfig,
    extractor: Option<MetadataExtractor>,
    installer: Arc<dyn Installer>,
    state: Lifecycle,
    metadata: DistMetadata,
    buckets: RequirementBuckets,
    counts: InstallCounts,
    app_name: String,
    app_version: String,
}

impl Inspection {
    /// Inspection with explicit collaborators.
    pub fn new(
        config: InspectConfig,
        builder: Arc<dyn WheelBuilder>,
        installer: Arc<dyn Installer>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            extractor: Some(MetadataExtractor::new(builder, fs)),
            installer,
            config,
            state: Lifecycle::Init,
            metadata: DistMetadata::default(),
            buckets: RequirementBuckets::default(),
            counts: InstallCounts::default(),
            app_name: String::new(),
            app_version: String::new(),
        }
    }

    /// Production wiring: setup.py build step, pip installer, real
    /// filesystem.
    pub fn with_defaults(config: InspectConfig) -> Self {
        let builder = Arc::new(SetupPyBuilder::new(config.python_bin.clone()));
        let installer = Arc::new(PipInstaller::new(config.python_bin.clone()));
        Self::new(config, builder, installer, Arc::new(RealFileSystem::new()))
    }

    /// Start from already-extracted metadata, skipping the build step
    /// entirely. The inspection begins in the Read state.
    pub fn from_metadata(
        config: InspectConfig,
        metadata: DistMetadata,
        installer: Arc<dyn Installer>,
    ) -> Self {
        Self {
            extractor: None,
            installer,
            config,
            state: Lifecycle::Read,
            metadata,
            buckets: RequirementBuckets::default(),
            counts: InstallCounts::default(),
            app_name: String::new(),
            app_version: String::new(),
        }
    }

    /// Extract metadata from the descriptor. Returns whether any metadata
    /// was found. Propagates [`InspectError::MissingDescriptor`] unchanged.
    pub fn read_config(&mut self) -> Result<bool> {
        if self.state >= Lifecycle::Read {
            return Ok(!self.metadata.is_empty());
        }

        let extractor = self
            .extractor
            .as_ref()
            .ok_or_else(|| InspectError::Config("inspection has no extractor wired".into()))?;

        self.metadata = extractor.extract(&self.config.setup_path)?;
        self.state = Lifecycle::Read;
        Ok(!self.metadata.is_empty())
    }

    /// Classify every declared requirement into its bucket. Returns whether
    /// any installable requirement was found.
    ///
    /// Re-entering recomputes the partition from scratch; bucket contents are
    /// identical across repeat calls, never doubled.
    pub fn load_config(&mut self) -> Result<bool> {
        if self.state < Lifecycle::Read {
            self.read_config()?;
        }

        self.app_name = self
            .metadata
            .first("name")
            .ok_or_else(|| InspectError::Metadata("distribution has no name".into()))?
            .to_string();
        self.app_version = self
            .metadata
            .first("version")
            .ok_or_else(|| InspectError::Metadata("distribution has no version".into()))?
            .to_lowercase();

        debug!(
            name = %self.app_name,
            version = %self.app_version,
            platform = %self.config.platform,
            python_version = self.config.python_version,
            "classifying requirements"
        );

        self.buckets = RequirementBuckets::default();
        let requirements = self
            .metadata
            .list("requires-dist")
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        for line in &requirements {
            let line = line.to_lowercase();
            match line.split_once("; ") {
                Some((requirement, marker)) => {
                    let bucket = markers::evaluate(
                        marker,
                        &self.config.platform,
                        self.config.python_version,
                    );
                    self.buckets.file(requirement.to_string(), bucket);
                }
                None => self.buckets.file(line, Bucket::Base),
            }
        }

        self.counts.expected = self.buckets.expected_total();
        self.state = Lifecycle::Loaded;

        info!(
            base = self.buckets.base.len(),
            platform = self.buckets.platform_match.len(),
            version = self.buckets.version_match.len(),
            unparsed = self.buckets.unparsed.len(),
            other_platform = self.buckets.other_platform.len(),
            "requirements classified"
        );

        Ok(self.counts.expected > 0)
    }

    /// Install every bucketed requirement through the installer
    /// collaborator, in the fixed order platform matches, version matches,
    /// base, unparsed. The diagnostic `other_platform` list is skipped.
    ///
    /// Returns whether every expected install succeeded. A partial install
    /// is a `false` return, not an error; the counts carry the detail.
    pub fn install_packages(&mut self) -> Result<bool> {
        if self.state < Lifecycle::Loaded {
            self.load_config()?;
        }

        let order: Vec<String> = self
            .buckets
            .platform_match
            .iter()
            .chain(&self.buckets.version_match)
            .chain(&self.buckets.base)
            .chain(&self.buckets.unparsed)
            .cloned()
            .collect();

        for requirement in &order {
            match self.installer.install(requirement) {
                Ok(()) => self.counts.actual += 1,
                Err(e) => warn!(requirement, error = %e, "requirement failed to install"),
            }
        }

        self.state = Lifecycle::Installed;

        info!(
            expected = self.counts.expected,
            actual = self.counts.actual,
            "installation finished"
        );
        Ok(self.counts.actual == self.counts.expected)
    }

    /// Convenience: read, load and install in one call.
    pub fn process_config(&mut self) -> Result<bool> {
        Ok(self.read_config()? && self.load_config()? && self.install_packages()?)
    }

    /// Every requirement that applies to this platform and interpreter, in
    /// the order base, platform matches, version matches, unparsed.
    pub fn required(&mut self) -> Result<Vec<String>> {
        self.ensure_loaded()?;
        Ok(self
            .buckets
            .base
            .iter()
            .chain(&self.buckets.platform_match)
            .chain(&self.buckets.version_match)
            .chain(&self.buckets.unparsed)
            .cloned()
            .collect())
    }

    /// De-listified single metadata value (element `index` of the list for
    /// `key`), checking extractor-level lists before the raw metadata block.
    pub fn attr(&mut self, key: &str, index: usize) -> Result<Option<String>> {
        self.ensure_loaded()?;
        Ok(self.metadata.attr(key, index).map(String::from))
    }

    /// Full value list for `key`.
    pub fn list(&mut self, key: &str) -> Result<Vec<String>> {
        self.ensure_loaded()?;
        Ok(self
            .metadata
            .list(key)
            .map(<[String]>::to_vec)
            .unwrap_or_default())
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.state < Lifecycle::Loaded {
            self.load_config()?;
        }
        Ok(())
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn buckets(&self) -> &RequirementBuckets {
        &self.buckets
    }

    pub fn counts(&self) -> InstallCounts {
        self.counts
    }

    pub fn metadata(&self) -> &DistMetadata {
        &self.metadata
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Snapshot for display and serialization.
    pub fn report(&self) -> InspectionReport {
        InspectionReport {
            name: self.app_name.clone(),
            version: self.app_version.clone(),
            platform: self.config.platform.clone(),
            python_version: self.config.python_version,
            state: self.state,
            buckets: self.buckets.clone(),
            counts: self.counts,
            packages: self.metadata.packages.clone(),
            top_level: self.metadata.top_level.clone(),
            console_scripts: self.metadata.console_scripts.clone(),
        }
    }
}
