use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use adoc_tree::{Options, Tree};
use anyhow::{Context, Result};

pub(crate) mod check;
pub(crate) mod complete;
pub(crate) mod inspect;
pub(crate) mod normalize;
pub(crate) mod parse;

/// Parser settings shared by every subcommand that reads documents
#[derive(clap::Args, Debug, Clone)]
pub struct ParserArgs {
    /// Keep inline text as plain `text` runs instead of tokenizing it
    #[arg(long)]
    pub no_inline: bool,

    /// Deepest nesting of lists, continuations and conditionals before falling back to
    /// a paragraph
    #[arg(long, default_value_t = adoc_tree::DEFAULT_MAX_NESTING)]
    pub max_nesting: usize,

    /// Decode input with this encoding label instead of detecting it
    #[arg(long)]
    pub encoding: Option<String>,
}

impl ParserArgs {
    pub fn options(&self) -> Options {
        let mut builder = Options::builder()
            .with_inline(!self.no_inline)
            .with_max_nesting(self.max_nesting);
        if let Some(encoding) = &self.encoding {
            builder = builder.with_encoding(encoding.as_str());
        }
        builder.build()
    }
}

/// Display name of an input, `<stdin>` for `-`.
pub fn display_name(path: &Path) -> String {
    if is_stdin(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read and parse `path`, where `-` is stdin.
#[tracing::instrument(skip(options), fields(path = %path.display()))]
pub fn load(path: &Path, options: &Options) -> Result<Tree> {
    if !is_stdin(path) {
        return adoc_tree::parse_file(path, options)
            .with_context(|| format!("failed to parse {}", path.display()));
    }
    let mut bytes = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .context("failed to read stdin")?;
    let text = adoc_tree::decode(&bytes, options.encoding.as_deref(), "<stdin>")?;
    Ok(adoc_tree::parse_with_options(&text, options))
}

/// Parse every input, in order.
pub fn load_all(files: &[PathBuf], options: &Options) -> Result<Vec<(String, Tree)>> {
    files
        .iter()
        .map(|path| Ok((display_name(path), load(path, options)?)))
        .collect()
}
