use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use rayon::prelude::*;

use super::{ParserArgs, display_name, load};
use crate::error;

/// Report every warning found while parsing, with the offending source highlighted.
/// Exits with a failure status when any file has a warning or cannot be read.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Files to check, `-` for stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub parser: ParserArgs,
}

pub fn run(args: &Args) -> Result<ExitCode> {
    let options = args.parser.options();

    // Each parse owns its tree and scanner, so files are independent
    let results: Vec<_> = args
        .files
        .par_iter()
        .map(|path| (display_name(path), load(path, &options)))
        .collect();

    let mut warnings = 0;
    let mut failed = 0;
    for (name, result) in results {
        match result {
            Ok(tree) => {
                for warning in tree.warnings() {
                    eprintln!("{:?}", error::warning_report(&name, tree.source(), warning));
                }
                warnings += tree.warnings().len();
            }
            Err(e) => {
                error::display(&e);
                failed += 1;
            }
        }
    }

    tracing::info!(files = args.files.len(), warnings, failed, "check finished");
    if warnings > 0 || failed > 0 {
        eprintln!(
            "\n{warnings} warning(s) in {} file(s), {failed} file(s) could not be parsed",
            args.files.len()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
