//! Parsers for the dist-info text files inside an unpacked wheel
//!
//! Three fixed-name files are read: `METADATA` (RFC 822-style `Key: Value`
//! header block followed by a blank-line-delimited free-text body),
//! `top_level.txt` (one importable name per line), and `entry_points.txt`
//! (ini-style sections, of which only `[console_scripts]` matters).

use crate::error::{InspectError, Result};
use crate::fs::FileSystem;
use crate::metadata::RawMetadata;
use regex::Regex;
use std::path::Path;
use tracing::warn;

/// Parse the METADATA header block into a lower-cased multi-valued map.
///
/// Only the header block is parsed; everything after the first blank line is
/// the description body and is ignored. Header lines without a `": "`
/// separator are skipped.
pub fn parse_metadata<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<RawMetadata> {
    let bulk = fs
        .read_to_string(path)
        .map_err(|e| InspectError::Metadata(format!("cannot read METADATA: {e}")))?;

    let header = bulk.split("\n\n").next().unwrap_or(&bulk).trim();

    let mut metadata = RawMetadata::new();
    for line in header.lines() {
        if let Some((key, value)) = line.split_once(": ") {
            metadata
                .entry(key.trim().to_lowercase())
                .or_default()
                .push(value.trim().to_string());
        }
    }

    Ok(metadata)
}

/// Read `top_level.txt`: one name per line, blanks dropped. A missing file
/// degrades to an empty list.
pub fn parse_top_level<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Vec<String> {
    match fs.read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no top_level.txt in wheel");
            Vec::new()
        }
    }
}

/// Extract entry-point names from the `[console_scripts]` section of
/// `entry_points.txt`. Only the left-hand side of each `name = target`
/// assignment is kept. A missing file degrades to an empty list.
pub fn parse_console_scripts<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Vec<String> {
    let content = match fs.read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no entry_points.txt in wheel");
            return Vec::new();
        }
    };

    let section_re = Regex::new(r"^\[(.+)\]\s*$").expect("valid regex");
    let mut scripts = Vec::new();
    let mut in_console_scripts = false;

    for line in content.lines() {
        if let Some(caps) = section_re.captures(line) {
            in_console_scripts = &caps[1] == "console_scripts";
            continue;
        }
        if in_console_scripts {
            if let Some((name, _target)) = line.split_once(" = ") {
                let name = name.trim();
                if !name.is_empty() {
                    scripts.push(name.to_string());
                }
            }
        }
    }

    scripts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::path::PathBuf;

    const METADATA_FIXTURE: &str = "\
Metadata-Version: 2.1
Name: minipippy
Version: 0.1.0
Requires-Dist: backoff (>=1.4.3)
Requires-Dist: six
Requires-Dist: pywin32; platform_system == \"Windows\"
Classifier: Programming Language :: Python :: 3
Classifier: License :: OSI Approved :: MIT License

Mini package for testing.

Name: not-a-header-anymore
";

    #[test]
    fn test_metadata_header_block_only() {
        let fs = MockFileSystem::new();
        fs.add_file("METADATA", METADATA_FIXTURE);

        let meta = parse_metadata(&fs, &PathBuf::from("METADATA")).unwrap();
        assert_eq!(meta["name"], ["minipippy"]);
        assert_eq!(meta["version"], ["0.1.0"]);
        // Body content after the blank line never leaks into the map.
        assert_eq!(meta["name"].len(), 1);
    }

    #[test]
    fn test_metadata_multi_valued_keys() {
        let fs = MockFileSystem::new();
        fs.add_file("METADATA", METADATA_FIXTURE);

        let meta = parse_metadata(&fs, &PathBuf::from("METADATA")).unwrap();
        assert_eq!(
            meta["requires-dist"],
            [
                "backoff (>=1.4.3)",
                "six",
                "pywin32; platform_system == \"Windows\""
            ]
        );
        assert_eq!(meta["classifier"].len(), 2);
    }

    #[test]
    fn test_metadata_missing_file_is_an_error() {
        let fs = MockFileSystem::new();
        let err = parse_metadata(&fs, &PathBuf::from("METADATA")).unwrap_err();
        assert!(matches!(err, InspectError::Metadata(_)));
    }

    #[test]
    fn test_top_level_lines() {
        let fs = MockFileSystem::new();
        fs.add_file("top_level.txt", "minipippy\n\nextra_pkg\n");

        assert_eq!(
            parse_top_level(&fs, &PathBuf::from("top_level.txt")),
            ["minipippy", "extra_pkg"]
        );
    }

    #[test]
    fn test_top_level_missing_degrades_to_empty() {
        let fs = MockFileSystem::new();
        assert!(parse_top_level(&fs, &PathBuf::from("top_level.txt")).is_empty());
    }

    #[test]
    fn test_console_scripts_section() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "entry_points.txt",
            "[console_scripts]\nminipippy = minipippy.cli:main\nmp-tool = minipippy.cli:tool\n\n[gui_scripts]\nmp-gui = minipippy.gui:main\n",
        );

        assert_eq!(
            parse_console_scripts(&fs, &PathBuf::from("entry_points.txt")),
            ["minipippy", "mp-tool"]
        );
    }

    #[test]
    fn test_console_scripts_absent_section() {
        let fs = MockFileSystem::new();
        fs.add_file("entry_points.txt", "[gui_scripts]\nmp-gui = minipippy.gui:main\n");
        assert!(parse_console_scripts(&fs, &PathBuf::from("entry_points.txt")).is_empty());
    }
}
