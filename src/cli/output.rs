//! Output formatting for multiple formats
//!
//! Formatters for JSON, YAML and human-readable text over an
//! [`InspectionReport`].
//!
//! # Example
//!
//! ```ignore
//! use wheelhouse::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format(&inspection.report())?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};

use crate::inspect::InspectionReport;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for inspection reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats an inspection report according to the configured format
    pub fn format(&self, report: &InspectionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Yaml => self.format_yaml(report),
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    fn format_json(&self, report: &InspectionReport) -> Result<String> {
        serde_json::to_string_pretty(report)
            .context("Failed to serialize inspection report to JSON")
    }

    fn format_yaml(&self, report: &InspectionReport) -> Result<String> {
        serde_yaml::to_string(report).context("Failed to serialize inspection report to YAML")
    }

    fn format_human(&self, report: &InspectionReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            if report.name.is_empty() {
                "(unnamed distribution)"
            } else {
                &report.name
            },
            report.version
        ));
        output.push_str(&"\u{2501}".repeat(42));
        output.push_str("\n\n");

        output.push_str(&format!("Platform:        {}\n", report.platform));
        output.push_str(&format!("Python version:  {}\n\n", report.python_version));

        output.push_str("Requirements:\n");
        Self::push_bucket(&mut output, "Base", &report.buckets.base);
        Self::push_bucket(
            &mut output,
            "Platform match",
            &report.buckets.platform_match,
        );
        Self::push_bucket(&mut output, "Version match", &report.buckets.version_match);
        Self::push_bucket(&mut output, "Unparsed", &report.buckets.unparsed);
        Self::push_bucket(
            &mut output,
            "Other platform",
            &report.buckets.other_platform,
        );
        output.push('\n');

        if !report.packages.is_empty() {
            output.push_str(&format!("Packages:        {}\n", report.packages.join(", ")));
        }
        if !report.top_level.is_empty() {
            output.push_str(&format!("Top level:       {}\n", report.top_level.join(", ")));
        }
        if !report.console_scripts.is_empty() {
            output.push_str(&format!(
                "Console scripts: {}\n",
                report.console_scripts.join(", ")
            ));
        }

        if report.counts.expected > 0 || report.counts.actual > 0 {
            output.push_str(&format!(
                "\nInstalled {} of {} expected requirements\n",
                report.counts.actual, report.counts.expected
            ));
        }

        output
    }

    fn push_bucket(output: &mut String, label: &str, requirements: &[String]) {
        if requirements.is_empty() {
            output.push_str(&format!("  {:<16}(none)\n", label));
        } else {
            output.push_str(&format!("  {:<16}{}\n", label, requirements.join(", ")));
        }
    }
}
