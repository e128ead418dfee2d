//! Environment-marker classification kernel
//!
//! A requirement line in wheel metadata may carry a marker expression after a
//! `"; "` separator, e.g. `pywin32; platform_system == "Windows"`. This module
//! decides which bucket such a requirement belongs to for a given target
//! platform and Python version.
//!
//! Only plain three-token markers (`key operator value`) are understood.
//! Compound markers (`... and ...`, `... or ...`) and every other shape
//! degrade to [`Bucket::Unparsed`]; classification never fails.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classification outcome for a single marker-qualified requirement.
///
/// `Base` is never produced by [`evaluate`] itself; it is the bucket for
/// requirements that carry no marker at all and is included here so the
/// buckets type can name every destination with one enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// No marker; always applicable.
    Base,
    /// `platform_system == X` and X matches the target platform.
    PlatformMatch,
    /// `platform_system == X` and X does not match; diagnostic only,
    /// never installed.
    OtherPlatform,
    /// `python_version <op> N` and the comparison holds.
    VersionMatch,
    /// Marker present but not understood (or a false version comparison).
    Unparsed,
}

/// Classify a marker expression against a target platform and interpreter
/// version.
///
/// `platform` must already be lower-cased; `python_version` uses the
/// major + minor/10 float encoding (3.9 → 3.9). Rules are tried in fixed
/// priority order: platform match, platform other, python version, unparsed.
///
/// A structurally valid `python_version` comparison that evaluates false also
/// lands in `Unparsed`. That is deliberately asymmetric with the platform
/// handling (which gets its own `OtherPlatform` bucket) and is relied on by
/// downstream install accounting; do not "fix" it to a separate bucket.
pub fn evaluate(marker: &str, platform: &str, python_version: f64) -> Bucket {
    let tokens: Vec<String> = marker
        .split(' ')
        .map(|t| t.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string())
        .collect();

    if tokens.len() != 3 {
        debug!(marker, "unsupported marker shape, token count != 3");
        return Bucket::Unparsed;
    }

    let (key, op, value) = (tokens[0].as_str(), tokens[1].as_str(), tokens[2].as_str());

    if key == "platform_system" && op == "==" {
        return if value.to_lowercase() == platform {
            Bucket::PlatformMatch
        } else {
            Bucket::OtherPlatform
        };
    }

    if key == "python_version" {
        if version_comparison_holds(op, python_version, value) {
            return Bucket::VersionMatch;
        }
        debug!(marker, "python_version comparison false or malformed");
        return Bucket::Unparsed;
    }

    debug!(marker, key, "unrecognized marker key");
    Bucket::Unparsed
}

/// Evaluate `python_version <op> value` with standard float semantics.
/// Unknown operators and unparseable values are false.
fn version_comparison_holds(op: &str, python_version: f64, value: &str) -> bool {
    let rhs: f64 = match value.parse() {
        Ok(v) => v,
        Err(_) => return false,
    };

    match op {
        "<" => python_version < rhs,
        ">" => python_version > rhs,
        ">=" => python_version >= rhs,
        "<=" => python_version <= rhs,
        "!=" => python_version != rhs,
        "==" => python_version == rhs,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        linux_match = { "platform_system == \"Linux\"", "linux", Bucket::PlatformMatch },
        windows_match = { "platform_system == \"Windows\"", "windows", Bucket::PlatformMatch },
        case_folded = { "platform_system == \"DARWIN\"", "darwin", Bucket::PlatformMatch },
        wrong_platform = { "platform_system == \"Windows\"", "linux", Bucket::OtherPlatform },
        single_quotes = { "platform_system == 'Windows'", "windows", Bucket::PlatformMatch },
    )]
    fn platform_markers(marker: &str, platform: &str, expected: Bucket) {
        assert_eq!(evaluate(marker, platform, 3.9), expected);
    }

    #[parameterized(
        lt_true = { "python_version < \"3.0\"", 2.7, Bucket::VersionMatch },
        lt_false = { "python_version < \"3.0\"", 3.9, Bucket::Unparsed },
        gt_true = { "python_version > \"2.7\"", 3.9, Bucket::VersionMatch },
        ge_boundary = { "python_version >= \"3.9\"", 3.9, Bucket::VersionMatch },
        le_boundary = { "python_version <= \"3.9\"", 3.9, Bucket::VersionMatch },
        ne_true = { "python_version != \"2.7\"", 3.9, Bucket::VersionMatch },
        eq_true = { "python_version == \"3.9\"", 3.9, Bucket::VersionMatch },
        eq_false = { "python_version == \"2.7\"", 3.9, Bucket::Unparsed },
        bad_number = { "python_version < \"three\"", 3.9, Bucket::Unparsed },
    )]
    fn version_markers(marker: &str, python: f64, expected: Bucket) {
        assert_eq!(evaluate(marker, "linux", python), expected);
    }

    #[parameterized(
        compound_and = { "platform_system == \"Windows\" and python_version == \"2.7\"" },
        compound_or = { "python_version < \"3.0\" or python_version > \"3.8\"" },
        two_tokens = { "platform_system ==" },
        four_tokens = { "platform_system == really windows" },
        empty = { "" },
    )]
    fn malformed_markers_are_unparsed(marker: &str) {
        assert_eq!(evaluate(marker, "windows", 3.9), Bucket::Unparsed);
    }

    #[test]
    fn unknown_key_is_unparsed() {
        assert_eq!(
            evaluate("sys_platform == \"win32\"", "windows", 3.9),
            Bucket::Unparsed
        );
        assert_eq!(
            evaluate("implementation_name == \"cpython\"", "linux", 3.9),
            Bucket::Unparsed
        );
    }

    #[test]
    fn platform_inequality_operator_is_unparsed() {
        // Only `==` is understood for platform_system.
        assert_eq!(
            evaluate("platform_system != \"Windows\"", "linux", 3.9),
            Bucket::Unparsed
        );
    }

    #[test]
    fn marker_value_is_a_plain_float_parse() {
        // "3.10" compares as the float 3.1, not as minor release ten.
        assert_eq!(
            evaluate("python_version == \"3.10\"", "linux", 3.1),
            Bucket::VersionMatch
        );
    }
}
