use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use adoc_tree::normalize::{NormalizedBlock, normalize};
use anyhow::Result;
use serde::Serialize;

use super::{ParserArgs, load_all};

/// Print the top-level blocks of each file as JSON, with runs of same-kind lists merged
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Files to normalize, `-` for stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub parser: ParserArgs,
}

#[derive(Serialize)]
struct NormalizedFile {
    filename: String,
    normalized: Vec<NormalizedBlock>,
}

pub fn run(args: &Args) -> Result<ExitCode> {
    let files: Vec<NormalizedFile> = load_all(&args.files, &args.parser.options())?
        .into_iter()
        .map(|(filename, tree)| NormalizedFile {
            filename,
            normalized: normalize(&tree),
        })
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &files)?;
    writeln!(out)?;
    Ok(ExitCode::SUCCESS)
}
