//! Flat metadata model produced by the extractor
//!
//! Everything a wheel tells us is multi-valued: `Requires-Dist` appears once
//! per requirement, classifiers repeat, and so on. The model therefore keeps
//! ordered lists of strings throughout and lets callers de-list single values
//! through [`DistMetadata::attr`].

use serde::Serialize;
use std::collections::BTreeMap;

/// Keys in this map are METADATA header names, lower-cased (`name`,
/// `version`, `requires-dist`, ...).
pub type RawMetadata = BTreeMap<String, Vec<String>>;

/// Flat key → list-of-strings view of a built distribution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistMetadata {
    /// Top-level directories the wheel installs (excluding `*.dist-info`).
    pub packages: Vec<String>,
    /// Importable names from `top_level.txt`, one per line.
    pub top_level: Vec<String>,
    /// Entry-point names from the `[console_scripts]` section.
    pub console_scripts: Vec<String>,
    /// Raw `Key: Value` header block from the METADATA file.
    pub metadata: RawMetadata,
}

impl DistMetadata {
    /// Whether extraction produced anything at all.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
            && self.top_level.is_empty()
            && self.console_scripts.is_empty()
            && self.metadata.is_empty()
    }

    /// Look up the list for `key`: extractor-level lists first, then the raw
    /// metadata block.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match key {
            "packages" => Some(&self.packages),
            "top_level" => Some(&self.top_level),
            "console_scripts" => Some(&self.console_scripts),
            _ => self.metadata.get(key).map(Vec::as_slice),
        }
    }

    /// De-listified single value: element `index` of `list(key)`.
    pub fn attr(&self, key: &str, index: usize) -> Option<&str> {
        self.list(key).and_then(|v| v.get(index)).map(String::as_str)
    }

    /// Convenience for `attr(key, 0)`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.attr(key, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DistMetadata {
        let mut metadata = RawMetadata::new();
        metadata.insert("name".into(), vec!["minipippy".into()]);
        metadata.insert("version".into(), vec!["0.1.0".into()]);
        metadata.insert(
            "requires-dist".into(),
            vec!["six".into(), "pyyaml".into()],
        );

        DistMetadata {
            packages: vec!["minipippy".into()],
            top_level: vec!["minipippy".into()],
            console_scripts: vec!["minipippy".into()],
            metadata,
        }
    }

    #[test]
    fn list_prefers_extractor_fields() {
        let meta = sample();
        assert_eq!(meta.list("packages").unwrap(), ["minipippy"]);
        assert_eq!(meta.list("console_scripts").unwrap(), ["minipippy"]);
    }

    #[test]
    fn list_falls_back_to_raw_metadata() {
        let meta = sample();
        assert_eq!(meta.list("requires-dist").unwrap(), ["six", "pyyaml"]);
        assert!(meta.list("unknown-key").is_none());
    }

    #[test]
    fn attr_delists_values() {
        let meta = sample();
        assert_eq!(meta.first("name"), Some("minipippy"));
        assert_eq!(meta.attr("requires-dist", 1), Some("pyyaml"));
        assert_eq!(meta.attr("requires-dist", 5), None);
    }

    #[test]
    fn empty_detection() {
        assert!(DistMetadata::default().is_empty());
        assert!(!sample().is_empty());
    }
}
