//! End-to-end lifecycle tests over a mock wheel build
//!
//! These run the real extraction path (wheel unzip, dist-info parsing)
//! against wheels fabricated by [`MockWheelBuilder`], so no Python toolchain
//! is required. The tests change the working directory and are serialized.

use serial_test::serial;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wheelhouse::{
    InspectConfig, InspectError, Inspection, Lifecycle, MockInstaller, MockWheelBuilder,
    RealFileSystem, WheelSpec,
};

/// Creates a project directory containing a throwaway setup.py.
fn create_project() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().to_path_buf();
    std::fs::write(
        path.join("setup.py"),
        "from setuptools import setup\nsetup()\n",
    )
    .unwrap();
    (temp, path)
}

fn inspection_for(
    project: &Path,
    requirements: &[&str],
    platform: &str,
    python_version: f64,
    installer: Arc<MockInstaller>,
) -> Inspection {
    let spec = WheelSpec::new("minipippy", "0.1.0")
        .requires(requirements)
        .console_scripts(&["minipippy"]);

    Inspection::new(
        InspectConfig::fixed(project, platform, python_version),
        Arc::new(MockWheelBuilder::succeeding(spec)),
        installer,
        Arc::new(RealFileSystem::new()),
    )
}

#[test]
#[serial]
fn foreign_platform_requirement_is_kept_aside() {
    let (_temp, project) = create_project();
    let mut inspection = inspection_for(
        &project,
        &["six", "pywin32; platform_system == \"Windows\""],
        "linux",
        3.9,
        Arc::new(MockInstaller::new()),
    );

    assert!(inspection.load_config().unwrap());

    assert_eq!(inspection.app_name(), "minipippy");
    assert_eq!(inspection.app_version(), "0.1.0");
    assert_eq!(inspection.buckets().base, ["six"]);
    assert_eq!(inspection.buckets().other_platform, ["pywin32"]);
    assert!(inspection.buckets().platform_match.is_empty());
    assert_eq!(inspection.counts().expected, 1);
}

#[test]
#[serial]
fn failed_version_comparison_lands_in_unparsed() {
    let (_temp, project) = create_project();
    let mut inspection = inspection_for(
        &project,
        &["backport; python_version < \"3.0\""],
        "linux",
        3.9,
        Arc::new(MockInstaller::new()),
    );

    assert!(inspection.load_config().unwrap());

    assert!(inspection.buckets().version_match.is_empty());
    assert_eq!(inspection.buckets().unparsed, ["backport"]);
}

#[test]
fn missing_descriptor_keeps_state_untouched() {
    let temp = TempDir::new().unwrap();
    // No setup.py written.
    let mut inspection = inspection_for(
        temp.path(),
        &["six"],
        "linux",
        3.9,
        Arc::new(MockInstaller::new()),
    );

    let err = inspection.read_config().unwrap_err();

    assert!(matches!(err, InspectError::MissingDescriptor(_)));
    assert_eq!(inspection.state(), Lifecycle::Init);
    assert!(inspection.metadata().is_empty());
}

#[test]
#[serial]
fn partial_install_reports_incomplete() {
    let (_temp, project) = create_project();
    let installer = Arc::new(MockInstaller::failing_on(&["pyyaml"]));
    let mut inspection = inspection_for(
        &project,
        &[
            "six",
            "pyyaml",
            "pywin32; platform_system == \"Windows\"",
            "backport; python_version < \"3.0\"",
        ],
        "windows",
        3.9,
        installer.clone(),
    );

    let complete = inspection.install_packages().unwrap();

    assert!(!complete);
    assert_eq!(inspection.counts().expected, 4);
    assert_eq!(inspection.counts().actual, 3);
    // The failing requirement was still attempted in its slot.
    assert_eq!(installer.installed(), ["pywin32", "six", "backport"]);
}

#[test]
#[serial]
fn install_from_init_chains_the_whole_lifecycle() {
    let (_temp, project) = create_project();
    let installer = Arc::new(MockInstaller::new());
    let mut inspection = inspection_for(
        &project,
        &["six", "typing-extensions; python_version >= \"3.5\""],
        "linux",
        3.9,
        installer.clone(),
    );

    assert_eq!(inspection.state(), Lifecycle::Init);
    let complete = inspection.install_packages().unwrap();

    assert!(complete);
    assert_eq!(inspection.state(), Lifecycle::Installed);
    assert_eq!(installer.installed(), ["typing-extensions", "six"]);
}

#[test]
#[serial]
fn process_config_runs_end_to_end() {
    let (_temp, project) = create_project();
    let installer = Arc::new(MockInstaller::new());
    let mut inspection =
        inspection_for(&project, &["six"], "linux", 3.9, installer.clone());

    assert!(inspection.process_config().unwrap());

    assert_eq!(inspection.state(), Lifecycle::Installed);
    assert_eq!(inspection.required().unwrap(), ["six"]);
    assert_eq!(inspection.list("top_level").unwrap(), ["minipippy"]);
    assert_eq!(
        inspection.attr("console_scripts", 0).unwrap(),
        Some("minipippy".to_string())
    );
}

#[test]
#[serial]
fn repeat_load_is_idempotent() {
    let (_temp, project) = create_project();
    let mut inspection = inspection_for(
        &project,
        &["six", "pywin32; platform_system == \"Windows\""],
        "windows",
        3.9,
        Arc::new(MockInstaller::new()),
    );

    inspection.load_config().unwrap();
    let first = inspection.buckets().clone();

    inspection.load_config().unwrap();

    assert_eq!(inspection.buckets(), &first);
    assert_eq!(inspection.counts().expected, first.expected_total());
}
