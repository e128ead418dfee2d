//! Subcommand handlers
//!
//! Each handler drives a full [`Inspection`] and returns a process exit code:
//! 0 on success, 1 on failure or an incomplete install, 2 on configuration
//! errors.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::commands::InspectArgs;
use super::output::OutputFormatter;
use crate::config::InspectConfig;
use crate::error::Result;
use crate::inspect::Inspection;

pub fn handle_show(args: &InspectArgs) -> i32 {
    run_inspection(args, false)
}

pub fn handle_install(args: &InspectArgs) -> i32 {
    run_inspection(args, true)
}

fn run_inspection(args: &InspectArgs, install: bool) -> i32 {
    let config = build_config(args);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return 2;
    }

    let mut inspection = Inspection::with_defaults(config);
    let outcome: Result<bool> = if install {
        inspection.process_config()
    } else {
        inspection.load_config()
    };

    let complete = match outcome {
        Ok(complete) => complete,
        Err(e) => {
            error!(error = %e, "inspection failed");
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    let rendered = match formatter.format(&inspection.report()) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!(error = %e, "failed to render report");
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };

    if let Err(e) = emit(&rendered, args.output.as_deref()) {
        error!(error = %e, "failed to write output");
        eprintln!("Error: {}", e);
        return 1;
    }

    // Exit 1 when the action's own check came back false: no installable
    // requirements for `show`, an incomplete install for `install`.
    if complete {
        0
    } else {
        1
    }
}

fn build_config(args: &InspectArgs) -> InspectConfig {
    let path = args
        .project_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = InspectConfig::detect(path);
    if let Some(platform) = &args.platform {
        config = config.with_platform(platform);
    }
    if let Some(version) = args.python_version {
        config = config.with_python_version(version);
    }
    if let Some(bin) = &args.python_bin {
        config = config.with_python_bin(bin);
    }
    config
}

fn emit(rendered: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", ensure_trailing_newline(rendered)),
    }
    Ok(())
}

fn ensure_trailing_newline(rendered: &str) -> String {
    if rendered.ends_with('\n') {
        rendered.to_string()
    } else {
        format!("{}\n", rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;

    fn args_for(path: &str) -> InspectArgs {
        InspectArgs {
            project_path: Some(PathBuf::from(path)),
            format: OutputFormatArg::Human,
            platform: Some("Windows".to_string()),
            python_version: Some(3.6),
            python_bin: None,
            output: None,
        }
    }

    #[test]
    fn build_config_applies_overrides() {
        let config = build_config(&args_for("/tmp/project"));

        assert_eq!(config.setup_path, PathBuf::from("/tmp/project"));
        assert_eq!(config.platform, "windows");
        assert_eq!(config.python_version, 3.6);
    }

    #[test]
    fn trailing_newline_is_normalized() {
        assert_eq!(ensure_trailing_newline("report"), "report\n");
        assert_eq!(ensure_trailing_newline("report\n"), "report\n");
    }
}
