use wheelhouse::cli::commands::{CliArgs, Commands};
use wheelhouse::cli::handlers::{handle_install, handle_show};
use wheelhouse::util::logging::{init_logging, parse_level, LoggingConfig};
use wheelhouse::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("wheelhouse v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Show(show_args) => handle_show(show_args),
        Commands::Install(install_args) => handle_install(install_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("WHEELHOUSE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    init_logging(LoggingConfig::with_level(level));
}
