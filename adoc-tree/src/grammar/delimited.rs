//! Fenced regions: delimited blocks, block comments and tables.
//!
//! The scanner decides every line inside a region: the matching close fence ends it and
//! everything else is an opaque content line. Table content lines are additionally
//! split into rows and cells; their text is never passed to the inline grammar.

use crate::{
    error::Warning,
    grammar::{
        ExternalToken, ParserState, RegionKind, Scanned, ValidTokens,
        block::open_children,
        line::{Line, Part, assemble, tail},
        shapes::line_shapes,
        utf8_utils::slice,
    },
    model::{FieldName, Node, NodeKind},
};

const REGION_LINE: ValidTokens = ValidTokens::FENCE_END.union(ValidTokens::CONTENT_LINE);

impl ParserState<'_> {
    /// Parse the fenced region opening on `line`.
    ///
    /// Returns `None` when the line is not a fence after all, so the caller can fall
    /// back to a paragraph.
    #[tracing::instrument(level = "debug", skip_all, fields(pos = line.start))]
    pub(crate) fn fenced(&mut self, line: &Line, metadata: Option<Node>) -> Option<(Node, usize)> {
        self.fenced_as(line, open_children(metadata), None)
    }

    /// Parse a fenced region after the `leading` children. A `math` block kind turns a
    /// passthrough region into that math block, its lines into `math_line`s.
    pub(crate) fn fenced_as(
        &mut self,
        line: &Line,
        leading: Vec<Node>,
        math: Option<NodeKind>,
    ) -> Option<(Node, usize)> {
        let Scanned {
            token: ExternalToken::FenceStart(kind),
            start: open_start,
            end: open_end,
        } = self
            .scanner
            .scan(self.input, line.start, ValidTokens::FENCE_START)?
        else {
            return None;
        };
        let (region_kind, open_kind, close_kind) = kind.nodes();
        let block_kind = math.unwrap_or(region_kind);

        let mut children = leading;
        children.push(Node::leaf(open_kind, open_start, open_end).with_field(FieldName::Open));
        children.extend(tail(self.input, line, open_end));

        let mut content = Vec::new();
        let mut close = None;
        let mut pos = line.end;
        while pos < self.input.len() {
            match self.scanner.scan(self.input, pos, REGION_LINE) {
                Some(Scanned {
                    token: ExternalToken::FenceEnd(_),
                    start,
                    end,
                }) => {
                    let close_line = Line::at(self.input, start);
                    close = Some(
                        std::iter::once(
                            Node::leaf(close_kind, start, end).with_field(FieldName::Close),
                        )
                        .chain(tail(self.input, &close_line, end))
                        .collect::<Vec<_>>(),
                    );
                    pos = close_line.end;
                    break;
                }
                Some(Scanned {
                    token: ExternalToken::ContentLine,
                    start,
                    end,
                }) => {
                    content.push(match math {
                        Some(_) => Node::leaf(NodeKind::MathLine, start, end),
                        None => self.region_line(kind, start, end),
                    });
                    pos = end;
                }
                Some(_) | None => break,
            }
        }

        if kind == RegionKind::Comment {
            children.extend(content);
        } else if math.is_some() && !content.is_empty() {
            children.push(
                Node::branch(NodeKind::MathContent, content, line.end)
                    .with_field(FieldName::Content),
            );
        } else if !content.is_empty() {
            let wrapper = if kind == RegionKind::Table {
                NodeKind::TableContent
            } else {
                NodeKind::BlockContent
            };
            children.push(Node::branch(wrapper, content, line.end));
        }

        match close {
            Some(close) => children.extend(close),
            None => {
                self.scanner.close_implicitly();
                let detail = self.detail(open_start, open_end);
                self.warn(match kind {
                    RegionKind::Comment => Warning::UnterminatedComment(detail),
                    RegionKind::Table => Warning::UnterminatedTable(detail),
                    RegionKind::Example
                    | RegionKind::Listing
                    | RegionKind::Literal
                    | RegionKind::Quote
                    | RegionKind::Sidebar
                    | RegionKind::Passthrough
                    | RegionKind::Open => {
                        Warning::UnterminatedBlock(detail, kind.name().to_string())
                    }
                });
            }
        }

        Some((Node::branch(block_kind, children, line.start), pos))
    }

    /// One content line of a region, terminator included.
    fn region_line(&self, kind: RegionKind, start: usize, end: usize) -> Node {
        match kind {
            RegionKind::Comment => Node::leaf(NodeKind::CommentLine, start, end),
            RegionKind::Table => {
                let line = Line::at(self.input, start);
                if line.is_blank(self.input) {
                    Node::leaf(NodeKind::BlankLine, start, end)
                } else {
                    self.table_row(&line)
                        .unwrap_or_else(|| Node::leaf(NodeKind::ContentLine, start, end))
                }
            }
            RegionKind::Example
            | RegionKind::Listing
            | RegionKind::Literal
            | RegionKind::Quote
            | RegionKind::Sidebar
            | RegionKind::Passthrough
            | RegionKind::Open => Node::leaf(NodeKind::ContentLine, start, end),
        }
    }

    /// A line of cells: it starts with `|`, or with a cell spec directly followed by `|`.
    fn table_row(&self, line: &Line) -> Option<Node> {
        let text = line.text(self.input);
        let pipes = cell_pipes(text);
        let first = *pipes.first()?;
        if first > 0 && line_shapes::cell_spec(slice(text, 0, first)).is_err() {
            return None;
        }

        let spec_starts: Vec<usize> = pipes
            .iter()
            .enumerate()
            .map(|(index, &pipe)| {
                if index == 0 {
                    0
                } else {
                    let previous = pipes.get(index - 1).map_or(0, |p| p + 1);
                    spec_start(slice(text, previous, pipe)).map_or(pipe, |offset| previous + offset)
                }
            })
            .collect();

        let mut cells = Vec::with_capacity(pipes.len());
        for (index, &pipe) in pipes.iter().enumerate() {
            let spec_start = spec_starts.get(index).copied().unwrap_or(pipe);
            let content_end = spec_starts.get(index + 1).copied().unwrap_or(text.len());
            cells.push(self.table_cell(line.start, spec_start, pipe, content_end));
        }
        cells.extend(tail(self.input, line, line.content_end));
        Some(Node::branch(NodeKind::TableRow, cells, line.start))
    }

    /// A cell from its spec (if any) through its content. Offsets are relative to
    /// `line_start`.
    fn table_cell(
        &self,
        line_start: usize,
        spec_start: usize,
        pipe: usize,
        content_end: usize,
    ) -> Node {
        let mut children = Vec::with_capacity(3);
        if spec_start < pipe {
            let spec = slice(self.input, line_start + spec_start, line_start + pipe);
            let parts: Vec<Part> = line_shapes::cell_spec(spec).unwrap_or_default();
            let spec_nodes = assemble(
                self.input,
                line_start + spec_start,
                line_start + pipe,
                line_start + spec_start,
                &parts,
            );
            children.push(
                Node::branch(NodeKind::CellSpec, spec_nodes, line_start + spec_start)
                    .with_field(FieldName::Spec),
            );
        }
        children.push(Node::leaf(NodeKind::Punctuation, line_start + pipe, line_start + pipe + 1));
        if pipe + 1 < content_end {
            children.push(
                Node::leaf(NodeKind::CellContent, line_start + pipe + 1, line_start + content_end)
                    .with_field(FieldName::Content),
            );
        }
        Node::branch(NodeKind::TableCell, children, line_start + spec_start)
    }
}

/// Offsets of the unescaped pipes in a row.
fn cell_pipes(text: &str) -> Vec<usize> {
    text.match_indices('|')
        .map(|(index, _)| index)
        .filter(|&index| index == 0 || text.as_bytes().get(index - 1) != Some(&b'\\'))
        .collect()
}

/// Where a spec for the next cell starts inside the text between two pipes: the last
/// word, when it follows whitespace and is a valid spec.
fn spec_start(segment: &str) -> Option<usize> {
    let word_start = segment.rfind([' ', '\t'])? + 1;
    let word = slice(segment, word_start, segment.len());
    (!word.is_empty() && line_shapes::cell_spec(word).is_ok()).then_some(word_start)
}
