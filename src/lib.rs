//! wheelhouse - requirement extraction for setup.py projects
//!
//! This library builds a wheel from a `setup.py` project, reads the generated
//! dist-info metadata, and classifies every declared requirement by its
//! environment marker against a target platform and Python version. The
//! applicable requirements can then be installed through pip.
//!
//! # Core Concepts
//!
//! - **Inspection**: One stateful pass over a project, moving through the
//!   Init, Read, Loaded and Installed stages. Each operation runs its
//!   prerequisites automatically.
//! - **Buckets**: Each `Requires-Dist` line lands in exactly one of `base`,
//!   `platform_match`, `version_match` or `unparsed`; requirements gated on a
//!   different platform are kept in the diagnostic `other_platform` list.
//! - **Collaborators**: The wheel build, the filesystem and the installer sit
//!   behind traits so the whole lifecycle can run against mocks.
//!
//! # Example Usage
//!
//! ```ignore
//! use wheelhouse::{InspectConfig, Inspection};
//!
//! let config = InspectConfig::detect("/path/to/project");
//! let mut inspection = Inspection::with_defaults(config);
//!
//! inspection.load_config()?;
//! for requirement in inspection.required()? {
//!     println!("{}", requirement);
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`extract`]: wheel build orchestration and dist-info parsing
//! - [`markers`]: the environment-marker classification kernel
//! - [`inspect`]: the lifecycle state machine tying it all together

// Public modules
pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fs;
pub mod inspect;
pub mod installer;
pub mod markers;
pub mod metadata;
pub mod util;

// Re-export key types for convenient access
pub use build::{MockWheelBuilder, SetupPyBuilder, WheelBuilder, WheelSpec};
pub use config::InspectConfig;
pub use error::{InspectError, Result};
pub use extract::MetadataExtractor;
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use inspect::{InstallCounts, Inspection, InspectionReport, Lifecycle, RequirementBuckets};
pub use installer::{Installer, MockInstaller, PipInstaller};
pub use markers::Bucket;
pub use metadata::{DistMetadata, RawMetadata};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
