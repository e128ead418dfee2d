//! Wheel build collaborator
//!
//! Building the distribution artifact is an external concern: the real
//! implementation shells out to `setup.py bdist_wheel` and only the exit
//! status matters. The trait seam keeps the extractor testable without a
//! Python toolchain; [`MockWheelBuilder`] fabricates a structurally real
//! wheel (it is a zip archive) so extraction tests exercise the same code
//! path as production.

use crate::error::{InspectError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// External build step: materialize `dist/*.whl` under `setup_dir`.
pub trait WheelBuilder: Send + Sync {
    fn build(&self, setup_dir: &Path) -> Result<()>;
}

/// Blocking `<python> setup.py bdist_wheel --universal` invocation.
pub struct SetupPyBuilder {
    python_bin: String,
}

impl SetupPyBuilder {
    pub fn new(python_bin: impl Into<String>) -> Self {
        Self {
            python_bin: python_bin.into(),
        }
    }
}

impl WheelBuilder for SetupPyBuilder {
    fn build(&self, setup_dir: &Path) -> Result<()> {
        debug!(
            setup_dir = %setup_dir.display(),
            python = %self.python_bin,
            "building wheel"
        );

        let output = Command::new(&self.python_bin)
            .args(["setup.py", "bdist_wheel", "--universal"])
            .current_dir(setup_dir)
            .output()
            .map_err(|e| InspectError::BuildFailed(format!("failed to spawn build: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "wheel build failed");
            return Err(InspectError::BuildFailed(format!(
                "{}: {}",
                output.status,
                stderr.lines().last().unwrap_or("no output")
            )));
        }

        debug!("wheel build finished");
        Ok(())
    }
}

/// Declarative description of the wheel a [`MockWheelBuilder`] writes.
#[derive(Debug, Clone)]
pub struct WheelSpec {
    pub name: String,
    pub version: String,
    pub requires_dist: Vec<String>,
    pub top_level: Vec<String>,
    pub console_scripts: Vec<String>,
}

impl WheelSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            top_level: vec![name.clone()],
            console_scripts: Vec::new(),
            requires_dist: Vec::new(),
            version: version.into(),
            name,
        }
    }

    pub fn requires(mut self, requirements: &[&str]) -> Self {
        self.requires_dist = requirements.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn console_scripts(mut self, scripts: &[&str]) -> Self {
        self.console_scripts = scripts.iter().map(|s| s.to_string()).collect();
        self
    }

    fn metadata_text(&self) -> String {
        let mut text = String::new();
        text.push_str("Metadata-Version: 2.1\n");
        text.push_str(&format!("Name: {}\n", self.name));
        text.push_str(&format!("Version: {}\n", self.version));
        for requirement in &self.requires_dist {
            text.push_str(&format!("Requires-Dist: {requirement}\n"));
        }
        text.push_str("\nFree-text description body, not parsed.\n");
        text
    }

    fn entry_points_text(&self) -> String {
        let mut text = String::from("[console_scripts]\n");
        for script in &self.console_scripts {
            text.push_str(&format!("{script} = {}:main\n", self.name));
        }
        text
    }

    /// Write `<dist_dir>/<name>-<version>-py2.py3-none-any.whl`.
    pub fn write_wheel(&self, dist_dir: &Path) -> Result<()> {
        fs::create_dir_all(dist_dir)?;
        let wheel_path = dist_dir.join(format!(
            "{}-{}-py2.py3-none-any.whl",
            self.name, self.version
        ));
        let dist_info = format!("{}-{}.dist-info", self.name, self.version);

        let mut zip = ZipWriter::new(File::create(&wheel_path)?);
        let options = SimpleFileOptions::default();

        zip.start_file(format!("{}/__init__.py", self.name), options)?;
        zip.write_all(b"")?;

        zip.start_file(format!("{dist_info}/METADATA"), options)?;
        zip.write_all(self.metadata_text().as_bytes())?;

        zip.start_file(format!("{dist_info}/top_level.txt"), options)?;
        zip.write_all(format!("{}\n", self.top_level.join("\n")).as_bytes())?;

        zip.start_file(format!("{dist_info}/entry_points.txt"), options)?;
        zip.write_all(self.entry_points_text().as_bytes())?;

        zip.finish()?;

        debug!(wheel = %wheel_path.display(), "mock wheel written");
        Ok(())
    }
}

enum MockBehavior {
    Succeed(WheelSpec),
    Fail,
    /// Exit zero but leave no wheel behind.
    ProduceNothing,
}

/// Test double for the build step.
pub struct MockWheelBuilder {
    behavior: MockBehavior,
}

impl MockWheelBuilder {
    pub fn succeeding(spec: WheelSpec) -> Self {
        Self {
            behavior: MockBehavior::Succeed(spec),
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Fail,
        }
    }

    pub fn producing_nothing() -> Self {
        Self {
            behavior: MockBehavior::ProduceNothing,
        }
    }
}

impl WheelBuilder for MockWheelBuilder {
    fn build(&self, setup_dir: &Path) -> Result<()> {
        match &self.behavior {
            MockBehavior::Succeed(spec) => spec.write_wheel(&setup_dir.join("dist")),
            MockBehavior::Fail => Err(InspectError::BuildFailed(
                "exit status: 1: simulated build failure".to_string(),
            )),
            MockBehavior::ProduceNothing => {
                fs::create_dir_all(setup_dir.join("dist"))?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::ZipArchive;

    #[test]
    fn test_wheel_spec_metadata_text() {
        let spec = WheelSpec::new("minipippy", "0.1.0").requires(&["six", "backoff >=1.4.0"]);
        let text = spec.metadata_text();

        assert!(text.contains("Name: minipippy\n"));
        assert!(text.contains("Version: 0.1.0\n"));
        assert!(text.contains("Requires-Dist: six\n"));
        assert!(text.contains("Requires-Dist: backoff >=1.4.0\n"));
        // Header block ends before the free-text body.
        assert!(text.contains("\n\n"));
    }

    #[test]
    fn test_mock_builder_writes_readable_wheel() {
        let temp = TempDir::new().unwrap();
        let spec = WheelSpec::new("minipippy", "0.1.0").console_scripts(&["minipippy"]);

        MockWheelBuilder::succeeding(spec)
            .build(temp.path())
            .unwrap();

        let wheel = temp.path().join("dist/minipippy-0.1.0-py2.py3-none-any.whl");
        assert!(wheel.is_file());

        let mut archive = ZipArchive::new(File::open(&wheel).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"minipippy-0.1.0.dist-info/METADATA".to_string()));
        assert!(names.contains(&"minipippy-0.1.0.dist-info/entry_points.txt".to_string()));
        assert!(names.contains(&"minipippy-0.1.0.dist-info/top_level.txt".to_string()));
    }

    #[test]
    fn test_failing_builder() {
        let temp = TempDir::new().unwrap();
        let err = MockWheelBuilder::failing().build(temp.path()).unwrap_err();
        assert!(matches!(err, InspectError::BuildFailed(_)));
    }

    #[test]
    fn test_producing_nothing_creates_empty_dist() {
        let temp = TempDir::new().unwrap();
        MockWheelBuilder::producing_nothing()
            .build(temp.path())
            .unwrap();
        assert!(temp.path().join("dist").is_dir());
        assert_eq!(fs::read_dir(temp.path().join("dist")).unwrap().count(), 0);
    }
}
