use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use adoc_tree::{Node, Tree};
use anyhow::Result;
use crossterm::style::{StyledContent, Stylize};

use super::{ParserArgs, load};

/// Show the syntax tree of an `AsciiDoc` document as an indented tree
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Input `AsciiDoc` file, `-` for stdin
    pub file: PathBuf,

    /// Show location information (line:column)
    #[arg(long)]
    pub show_locations: bool,

    /// Maximum depth to display (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_depth: usize,

    /// Also show anonymous nodes such as delimiters and line endings
    #[arg(long)]
    pub anonymous: bool,

    #[command(flatten)]
    pub parser: ParserArgs,
}

struct TreePrinter<'t, W: Write> {
    writer: W,
    tree: &'t Tree,
    is_last_stack: Vec<bool>,
    show_locations: bool,
    max_depth: usize,
    anonymous: bool,
    color: bool,
}

impl<'t, W: Write> TreePrinter<'t, W> {
    fn new(writer: W, tree: &'t Tree, args: &Args, color: bool) -> Self {
        Self {
            writer,
            tree,
            is_last_stack: Vec::new(),
            show_locations: args.show_locations,
            max_depth: args.max_depth,
            anonymous: args.anonymous,
            color,
        }
    }

    fn depth(&self) -> usize {
        self.is_last_stack.len()
    }

    fn visible(&self, node: &Node) -> bool {
        self.anonymous || node.is_named()
    }

    fn print_tree_line(&mut self, node: &Node) -> io::Result<()> {
        // Print tree structure: ├─, └─, │
        let depth = self.depth();
        for (i, is_last) in self.is_last_stack.iter().enumerate() {
            let prefix = match (i + 1 == depth, *is_last) {
                (true, true) => "└─ ",
                (true, false) => "├─ ",
                (false, true) => "   ",
                (false, false) => "│  ",
            };
            write!(self.writer, "{prefix}")?;
        }

        let color = self.color;
        if let Some(field) = node.field() {
            write!(self.writer, "{}: ", paint(color, field.as_str(), Stylize::magenta))?;
        }
        let kind = if node.is_named() {
            paint(color, node.kind_name(), |name| name.cyan().bold())
        } else {
            paint(color, node.kind_name(), Stylize::dark_grey)
        };
        write!(self.writer, "{kind}")?;

        if node.is_leaf() {
            let text = format!("{:?}", truncate(self.tree.text(node), 50));
            write!(self.writer, " {}", paint(color, &text, Stylize::yellow))?;
        }

        if self.show_locations {
            let location = self.tree.location(node);
            let loc_str = format!(
                " @{}:{} -> {}:{}",
                location.start.line, location.start.column, location.end.line, location.end.column
            );
            write!(self.writer, "{}", paint(color, &loc_str, Stylize::dark_grey))?;
        }

        writeln!(self.writer)
    }

    fn visit(&mut self, node: &Node) -> io::Result<()> {
        self.print_tree_line(node)?;
        if self.max_depth != 0 && self.depth() >= self.max_depth {
            return Ok(());
        }
        let children: Vec<&Node> = node
            .children()
            .iter()
            .filter(|child| self.visible(child))
            .collect();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.is_last_stack.push(i + 1 == count);
            let result = self.visit(child);
            self.is_last_stack.pop();
            result?;
        }
        Ok(())
    }
}

/// Apply `style` only when writing to a terminal.
fn paint<'a>(
    color: bool,
    text: &'a str,
    style: impl FnOnce(&'a str) -> StyledContent<&'a str>,
) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Truncate text for display
fn truncate(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}... ({count} chars)")
    }
}

pub fn run(args: &Args) -> Result<ExitCode> {
    let tree = load(&args.file, &args.parser.options())?;
    let stdout = io::stdout();
    let color = io::IsTerminal::is_terminal(&stdout);
    let mut printer = TreePrinter::new(stdout.lock(), &tree, args, color);
    printer.visit(tree.root())?;

    for warning in tree.warnings() {
        tracing::warn!(%warning, "parser recovered");
    }
    Ok(ExitCode::SUCCESS)
}
