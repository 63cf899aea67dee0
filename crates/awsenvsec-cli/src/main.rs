//! awsenvsec: print AWS secrets and parameters as environment variables

mod aws;
mod cli;
mod error;

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use awsenvsec_core::aggregator::{Aggregator, ResultMap};
use awsenvsec_core::config::RunConfig;
use awsenvsec_core::logging::{ConsoleLogger, LogLevel, SharedLogger};
use awsenvsec_core::presenter::Presenter;
use awsenvsec_core::{log_info, log_warn};

use aws::AwsRemoteStore;
use cli::Cli;
use error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut console = ConsoleLogger::from_env();
    if cli.verbose {
        console = console.with_level(LogLevel::Debug);
    }
    let logger: SharedLogger = Arc::new(console);

    match run(&cli, logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.shows_usage() {
                eprintln!("There was a problem running {}\n", env!("CARGO_BIN_NAME"));
                eprintln!("{}", Cli::usage());
            }
            eprintln!("{}", err);
            ExitCode::from(&err)
        }
    }
}

fn run(cli: &Cli, logger: SharedLogger) -> Result<(), CliError> {
    let config = cli.apply(RunConfig::from_env())?;
    let presenter = Presenter::now(config.output_mode);

    if let Some(banner) = presenter.banner() {
        eprintln!("{}", banner);
        log_info!(logger, "Output flag used: {}, running as a cli app...", config.output_mode);
    }

    let result = if config.wants_secrets() || config.wants_parameters() {
        let client = AwsRemoteStore::connect(&config, logger.clone())?;
        Aggregator::new(&client, logger.clone()).run(&config)
    } else {
        log_warn!(logger, "Neither a Secrets Manager path nor a Parameter Store path was given");
        ResultMap::new()
    };

    let rendered = presenter.render(&result)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
