#![deny(clippy::all, clippy::pedantic)]

use std::process;

use querybind::{config, telemetry};
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

mod commands;

use commands::CliError;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &CliError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "command failed");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "command failed");
    });
}

fn run() -> Result<(), CliError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    match cli_args.command {
        config::Command::Inspect(args) => commands::inspect(&settings, &args),
        config::Command::Bind(args) => commands::bind(&settings, &args),
        config::Command::Describe(_) => commands::describe(&settings),
    }
}
