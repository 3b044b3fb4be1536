use std::{
    io::{self, Write},
    process::ExitCode,
};

use adoc_completions::Completions;
use anyhow::Result;

/// Complete the value of an `AsciiDoc` option such as `doctype` or `source-highlighter`.
/// Without an option, list the options that have completions.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Option to complete
    pub option: Option<String>,

    /// Only offer values starting with this prefix (case-insensitive)
    #[arg(default_value = "")]
    pub prefix: String,

    /// Rank values that fit this context first: a file extension such as `.rs` for
    /// `language`, or `web` for `backend`
    #[arg(long)]
    pub context: Option<String>,

    /// Instead of completing, check that VALUE is a valid value of the option
    #[arg(long, value_name = "VALUE", conflicts_with = "context")]
    pub validate: Option<String>,
}

pub fn run(args: &Args) -> Result<ExitCode> {
    let completions = Completions::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(option) = args.option.as_deref() else {
        for option in completions.available_options() {
            writeln!(out, "{option}")?;
        }
        return Ok(ExitCode::SUCCESS);
    };

    if let Some(value) = args.validate.as_deref() {
        if completions.is_valid_value(option, value) {
            writeln!(out, "'{value}' is a valid value for '{option}'")?;
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("'{value}' is not a valid value for '{option}'");
        let valid = completions.get_completions(option, "");
        if !valid.is_empty() {
            eprintln!("Valid values: {}", valid.join(", "));
        }
        return Ok(ExitCode::FAILURE);
    }

    let values = match args.context.as_deref() {
        Some(context) => completions.get_smart_completions(option, &args.prefix, context),
        None => completions.get_completions(option, &args.prefix),
    };
    if values.is_empty() {
        let similar = completions.get_similar_options(option);
        if similar.is_empty() || similar.contains(&option) {
            eprintln!("No completions found for '{option}'");
        } else {
            eprintln!("No completions found for '{option}'. Did you mean one of these?");
            for suggestion in similar {
                eprintln!("  {suggestion}");
            }
        }
        return Ok(ExitCode::FAILURE);
    }
    for value in values {
        writeln!(out, "{value}")?;
    }
    Ok(ExitCode::SUCCESS)
}
