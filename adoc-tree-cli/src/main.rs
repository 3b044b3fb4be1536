use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod error;
mod subcommands;

use subcommands::{check, complete, inspect, normalize, parse};

/// Concrete syntax trees for `AsciiDoc` documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Parse(parse::Args),
    Inspect(inspect::Args),
    Normalize(normalize::Args),
    Check(check::Args),
    Complete(complete::Args),
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let result = match &args.command {
        Command::Parse(args) => parse::run(args),
        Command::Inspect(args) => inspect::run(args),
        Command::Normalize(args) => normalize::run(args),
        Command::Check(args) => check::run(args),
        Command::Complete(args) => complete::run(args),
    };

    result.unwrap_or_else(|e| {
        error::display(&e);
        ExitCode::FAILURE
    })
}
