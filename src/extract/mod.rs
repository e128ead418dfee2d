//! Metadata extraction from a build descriptor
//!
//! Turns a directory containing `setup.py` into a [`DistMetadata`] by
//! building the wheel (through the injected [`WheelBuilder`]), unpacking it
//! into a scoped temporary area, and reading the dist-info text files.
//!
//! The extractor is careful about caller state: pre-existing `build/` and
//! `dist/` directories are renamed aside and restored, the working directory
//! change is guarded, and the temporary extraction area is removed on drop -
//! all of it on failure paths too.

mod dist_info;
mod workdir;

pub use dist_info::{parse_console_scripts, parse_metadata, parse_top_level};
pub use workdir::{CwdGuard, DisplacedDir};

use crate::build::WheelBuilder;
use crate::error::{InspectError, Result};
use crate::fs::FileSystem;
use crate::metadata::DistMetadata;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use zip::ZipArchive;

const DIST_DIR: &str = "dist";
const BUILD_DIR: &str = "build";

pub struct MetadataExtractor {
    builder: Arc<dyn WheelBuilder>,
    fs: Arc<dyn FileSystem>,
}

impl MetadataExtractor {
    pub fn new(builder: Arc<dyn WheelBuilder>, fs: Arc<dyn FileSystem>) -> Self {
        Self { builder, fs }
    }

    /// Build the wheel for `setup_path` and read its metadata.
    ///
    /// Fails with [`InspectError::MissingDescriptor`] when `setup.py` is
    /// absent, [`InspectError::BuildFailed`] when the build collaborator
    /// reports a non-zero exit, and [`InspectError::MissingArtifact`] when a
    /// successful build leaves no wheel behind.
    pub fn extract(&self, setup_path: &Path) -> Result<DistMetadata> {
        if !self.fs.is_file(&setup_path.join("setup.py")) {
            return Err(InspectError::MissingDescriptor(setup_path.to_path_buf()));
        }

        info!(setup_path = %setup_path.display(), "extracting distribution metadata");

        let suffix = rename_suffix();

        // Guard declaration order matters: the cwd guard must outlive the
        // directory guards so their relative paths still resolve when they
        // clean up.
        let _cwd = CwdGuard::enter(setup_path)?;
        let _build = DisplacedDir::displace(Path::new(BUILD_DIR), &suffix)?;
        let _dist = DisplacedDir::displace(Path::new(DIST_DIR), &suffix)?;

        self.builder.build(Path::new("."))?;

        let wheel = self.find_wheel(Path::new(DIST_DIR))?;
        debug!(wheel = %wheel.display(), "unpacking wheel");

        let temp = tempfile::tempdir_in(DIST_DIR)?;
        ZipArchive::new(File::open(&wheel)?)?.extract(temp.path())?;

        self.read_unpacked(temp.path())
    }

    fn find_wheel(&self, dist_dir: &Path) -> Result<PathBuf> {
        let entries = self
            .fs
            .read_dir(dist_dir)
            .map_err(|e| InspectError::Metadata(format!("cannot list {DIST_DIR}: {e}")))?;

        entries
            .into_iter()
            .find(|e| e.file_name().ends_with(".whl"))
            .map(|e| e.path)
            .ok_or_else(|| InspectError::MissingArtifact(dist_dir.to_path_buf()))
    }

    fn read_unpacked(&self, root: &Path) -> Result<DistMetadata> {
        let mut meta = DistMetadata::default();
        let mut dist_info_dir: Option<PathBuf> = None;

        for entry in self
            .fs
            .read_dir(root)
            .map_err(|e| InspectError::Metadata(format!("cannot list unpacked wheel: {e}")))?
        {
            if !entry.is_dir() {
                continue;
            }
            if entry.file_name().ends_with(".dist-info") {
                dist_info_dir = Some(entry.path.clone());
            } else {
                meta.packages.push(entry.file_name().to_string());
            }
        }

        let dist_info = dist_info_dir
            .ok_or_else(|| InspectError::Metadata("no .dist-info directory in wheel".into()))?;
        debug!(dist_info = %dist_info.display(), "reading dist-info");

        meta.top_level = parse_top_level(self.fs.as_ref(), &dist_info.join("top_level.txt"));
        meta.console_scripts =
            parse_console_scripts(self.fs.as_ref(), &dist_info.join("entry_points.txt"));
        meta.metadata = parse_metadata(self.fs.as_ref(), &dist_info.join("METADATA"))?;

        meta.packages.sort();

        info!(
            name = meta.first("name").unwrap_or("?"),
            requirements = meta.list("requires-dist").map_or(0, <[String]>::len),
            "metadata extracted"
        );
        Ok(meta)
    }
}

fn rename_suffix() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("_{}", &hex[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_suffix_shape() {
        let suffix = rename_suffix();
        assert_eq!(suffix.len(), 17);
        assert!(suffix.starts_with('_'));
        assert_ne!(rename_suffix(), suffix);
    }
}
