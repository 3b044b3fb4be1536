use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use adoc_tree::{Node, Warning};
use anyhow::Result;
use serde::Serialize;

use super::{ParserArgs, load_all};

/// Print the syntax tree of each file as an s-expression, or as JSON
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Files to parse, `-` for stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the full node tree as JSON instead
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub parser: ParserArgs,
}

#[derive(Serialize)]
struct ParsedFile<'a> {
    filename: &'a str,
    tree: &'a Node,
    warnings: &'a [Warning],
}

pub fn run(args: &Args) -> Result<ExitCode> {
    let trees = load_all(&args.files, &args.parser.options())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let parsed: Vec<_> = trees
            .iter()
            .map(|(filename, tree)| ParsedFile {
                filename,
                tree: tree.root(),
                warnings: tree.warnings(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut out, &parsed)?;
        writeln!(out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let many = trees.len() > 1;
    for (filename, tree) in &trees {
        if many {
            writeln!(out, ";; {filename}")?;
        }
        writeln!(out, "{}", tree.to_sexp())?;
    }
    Ok(ExitCode::SUCCESS)
}
