use crate::{
    grammar::utf8_utils::slice,
    model::{FieldName, Node, NodeKind},
};

/// One physical line. `content_end` excludes the terminator, `end` includes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line {
    pub(crate) start: usize,
    pub(crate) content_end: usize,
    pub(crate) end: usize,
}

impl Line {
    /// The line starting at `start`. `\r\n` counts as one terminator.
    pub(crate) fn at(input: &str, start: usize) -> Self {
        let rest = input.get(start..).unwrap_or_default();
        match rest.find('\n') {
            Some(newline) => {
                let newline = start + newline;
                let content_end =
                    if newline > start && input.as_bytes().get(newline - 1) == Some(&b'\r') {
                        newline - 1
                    } else {
                        newline
                    };
                Self {
                    start,
                    content_end,
                    end: newline + 1,
                }
            }
            None => Self {
                start,
                content_end: input.len(),
                end: input.len(),
            },
        }
    }

    pub(crate) fn text<'a>(&self, input: &'a str) -> &'a str {
        slice(input, self.start, self.content_end)
    }

    pub(crate) fn is_blank(&self, input: &str) -> bool {
        self.text(input).chars().all(|c| c == ' ' || c == '\t')
    }

    /// End of the content without trailing spaces and tabs.
    pub(crate) fn trimmed_end(&self, input: &str) -> usize {
        self.start + self.text(input).trim_end_matches([' ', '\t']).len()
    }

    pub(crate) fn has_terminator(&self) -> bool {
        self.end > self.content_end
    }
}

/// First offset in `from..to` that is not a space or tab.
pub(crate) fn skip_blanks(input: &str, from: usize, to: usize) -> usize {
    let run = slice(input, from, to);
    from + run.len() - run.trim_start_matches([' ', '\t']).len()
}

/// Trailing whitespace from `from` plus the line terminator, as anonymous leaves.
pub(crate) fn tail(input: &str, line: &Line, from: usize) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(2);
    if from < line.content_end {
        let kind = if slice(input, from, line.content_end)
            .chars()
            .all(|c| c == ' ' || c == '\t')
        {
            NodeKind::Whitespace
        } else {
            NodeKind::Punctuation
        };
        nodes.push(Node::leaf(kind, from, line.content_end));
    }
    if line.has_terminator() {
        nodes.push(Node::leaf(NodeKind::LineEnding, line.content_end, line.end));
    }
    nodes
}

/// Named parts of a line shape, relative to the line start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Part {
    pub(crate) kind: NodeKind,
    pub(crate) field: Option<FieldName>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Part {
    pub(crate) fn new(kind: NodeKind, field: Option<FieldName>, start: usize, end: usize) -> Self {
        Self {
            kind,
            field,
            start,
            end,
        }
    }
}

/// Turn the named parts found in `start..end` into a complete run of leaves.
///
/// `offset` shifts part positions to absolute ones. Bytes not claimed by a part become
/// `whitespace` or `punctuation` leaves so the run covers the range exactly. Empty
/// parts are dropped.
pub(crate) fn assemble(
    input: &str,
    start: usize,
    end: usize,
    offset: usize,
    parts: &[Part],
) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(parts.len() * 2 + 1);
    let mut pos = start;
    for part in parts {
        let part_start = offset + part.start;
        let part_end = offset + part.end;
        if part_start >= part_end || part_start < pos || part_end > end {
            continue;
        }
        push_gap(input, &mut nodes, pos, part_start);
        let leaf = Node::leaf(part.kind, part_start, part_end);
        nodes.push(match part.field {
            Some(field) => leaf.with_field(field),
            None => leaf,
        });
        pos = part_end;
    }
    push_gap(input, &mut nodes, pos, end);
    nodes
}

/// Split `start..end` into whitespace and punctuation runs.
fn push_gap(input: &str, nodes: &mut Vec<Node>, start: usize, end: usize) {
    let mut run_start = start;
    let mut run_is_space = None;
    for (index, c) in slice(input, start, end).char_indices() {
        let is_space = c == ' ' || c == '\t';
        if run_is_space.is_some_and(|previous| previous != is_space) {
            nodes.push(gap_leaf(run_start, start + index, run_is_space));
            run_start = start + index;
        }
        run_is_space = Some(is_space);
    }
    if run_start < end {
        nodes.push(gap_leaf(run_start, end, run_is_space));
    }
}

fn gap_leaf(start: usize, end: usize, is_space: Option<bool>) -> Node {
    let kind = if is_space == Some(true) {
        NodeKind::Whitespace
    } else {
        NodeKind::Punctuation
    };
    Node::leaf(kind, start, end)
}
