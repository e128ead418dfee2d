use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Extract and classify Python package requirements from a setup.py project
#[derive(Parser, Debug)]
#[command(
    name = "wheelhouse",
    about = "Extract and classify Python package requirements from a setup.py project",
    version,
    author,
    long_about = "wheelhouse builds a wheel from a setup.py project, reads the generated \
                  dist-info metadata, and classifies every declared requirement by its \
                  environment marker against a target platform and Python version. It can \
                  also install the applicable requirements through pip."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Extract metadata and show classified requirements",
        long_about = "Builds a wheel from the project's setup.py, reads the dist-info \
                      metadata and prints each requirement bucketed by its environment \
                      marker.\n\n\
                      Examples:\n  \
                      wheelhouse show\n  \
                      wheelhouse show /path/to/project\n  \
                      wheelhouse show --format json\n  \
                      wheelhouse show --platform windows --python-version 3.6"
    )]
    Show(InspectArgs),

    #[command(
        about = "Extract metadata and install the applicable requirements",
        long_about = "Runs the same extraction and classification as `show`, then installs \
                      every requirement that applies to the target platform and Python \
                      version through pip.\n\n\
                      Examples:\n  \
                      wheelhouse install\n  \
                      wheelhouse install /path/to/project --platform linux"
    )]
    Install(InspectArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the setup.py project (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'p',
        long,
        value_name = "PLATFORM",
        help = "Target platform for marker evaluation (defaults to the host platform)"
    )]
    pub platform: Option<String>,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Target Python version for marker evaluation, e.g. 3.9 (defaults to the \
                probed interpreter version)"
    )]
    pub python_version: Option<f64>,

    #[arg(
        long,
        value_name = "BIN",
        help = "Python interpreter used to build the wheel (and to install with pip)"
    )]
    pub python_bin: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
