use std::fmt::Write as _;

use crate::{
    Error, Options,
    error::Warning,
    grammar::{Checkpoint, LineMap, ParserState},
    model::{Location, Node, NodeKind},
};

/// A parsed document.
///
/// The tree owns its source text; every node refers back into it by byte offsets.
/// Trees are immutable: an edit produces a new tree via [`Tree::reparse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    source: String,
    root: Node,
    line_map: LineMap,
    warnings: Vec<Warning>,
    checkpoints: Vec<Checkpoint>,
    options: Options,
}

/// A change to the source, in the byte offsets of both the old and new text.
///
/// `start_byte..old_end_byte` of the old source was replaced by
/// `start_byte..new_end_byte` of the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
}

impl Tree {
    #[tracing::instrument(skip_all, fields(len = source.len()))]
    pub(crate) fn parse(source: String, options: Options) -> Self {
        let (root, line_map, warnings, checkpoints) = {
            let mut state = ParserState::new(&source, &options);
            let root = state.document(0, Vec::new());
            (root, state.line_map, state.warnings, state.checkpoints)
        };
        Self {
            source,
            root,
            line_map,
            warnings,
            checkpoints,
            options,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The source text covered by `node`.
    #[must_use]
    pub fn text(&self, node: &Node) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    #[must_use]
    pub fn location(&self, node: &Node) -> Location {
        self.line_map
            .location(node.start_byte(), node.end_byte(), &self.source)
    }

    /// Recoverable problems, in source order of the constructs they were found in.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The tree as an s-expression of its named nodes, with field labels.
    ///
    /// ```
    /// let tree = adoc_tree::parse("Hello\n");
    /// assert_eq!(
    ///     tree.to_sexp(),
    ///     "(document (paragraph content: (inline_content (text))))"
    /// );
    /// ```
    #[must_use]
    pub fn to_sexp(&self) -> String {
        to_sexp(&self.root)
    }

    /// Parse `new_source`, which is this tree's source with `edit` applied, reusing
    /// the top-level nodes that lie before the edit.
    ///
    /// The result is identical to parsing `new_source` from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEdit`] when `edit` does not describe how the old source
    /// turns into `new_source`.
    #[tracing::instrument(skip_all, fields(start = edit.start_byte))]
    pub fn reparse(&self, new_source: &str, edit: &InputEdit) -> Result<Tree, Error> {
        self.validate(new_source, edit)?;

        let children = self.root.children();
        let ending_before = children
            .iter()
            .take_while(|child| child.end_byte() < edit.start_byte)
            .count();
        // The node before the edit may have looked ahead at the line the edit touches.
        let mut keep = ending_before.saturating_sub(1);
        // Metadata and blank lines only mean something together with what follows them.
        while keep > 0
            && children.get(keep - 1).is_some_and(|child| {
                matches!(child.kind(), NodeKind::BlankLine | NodeKind::Metadata)
            })
        {
            keep -= 1;
        }

        let resume = self
            .checkpoints
            .partition_point(|checkpoint| checkpoint.node_index <= keep)
            .checked_sub(1);
        let Some((index, checkpoint)) = resume.and_then(|index| {
            self.checkpoints
                .get(index)
                .map(|checkpoint| (index, checkpoint))
        }) else {
            return Ok(Tree::parse(new_source.to_string(), self.options.clone()));
        };
        tracing::debug!(
            reused = checkpoint.node_index,
            offset = checkpoint.offset,
            "resuming from checkpoint"
        );

        let source = new_source.to_string();
        let (root, line_map, warnings, checkpoints) = {
            let mut state = ParserState::new(&source, &self.options);
            state.warnings = self
                .warnings
                .get(..checkpoint.warnings)
                .unwrap_or_default()
                .to_vec();
            state.checkpoints = self.checkpoints.get(..index).unwrap_or_default().to_vec();
            state.scanner.restore(checkpoint.scanner.clone());
            let reused = children
                .get(..checkpoint.node_index)
                .unwrap_or_default()
                .to_vec();
            let root = state.document(checkpoint.offset, reused);
            (root, state.line_map, state.warnings, state.checkpoints)
        };
        Ok(Tree {
            source,
            root,
            line_map,
            warnings,
            checkpoints,
            options: self.options.clone(),
        })
    }

    fn validate(&self, new_source: &str, edit: &InputEdit) -> Result<(), Error> {
        let InputEdit {
            start_byte,
            old_end_byte,
            new_end_byte,
        } = *edit;
        if start_byte > old_end_byte || start_byte > new_end_byte {
            return Err(Error::InvalidEdit(format!(
                "start {start_byte} is past the old end {old_end_byte} or the new end {new_end_byte}"
            )));
        }
        let (Some(old_prefix), Some(old_suffix), Some(new_prefix), Some(new_suffix)) = (
            self.source.get(..start_byte),
            self.source.get(old_end_byte..),
            new_source.get(..start_byte),
            new_source.get(new_end_byte..),
        ) else {
            return Err(Error::InvalidEdit(format!(
                "offsets {start_byte}, {old_end_byte}, {new_end_byte} are out of range or not on character boundaries"
            )));
        };
        if old_prefix != new_prefix {
            return Err(Error::InvalidEdit(format!(
                "text before byte {start_byte} differs"
            )));
        }
        if old_suffix != new_suffix {
            return Err(Error::InvalidEdit(format!(
                "text after the edit differs (old end {old_end_byte}, new end {new_end_byte})"
            )));
        }
        Ok(())
    }
}

/// S-expression of the named nodes below and including `node`.
pub(crate) fn to_sexp(node: &Node) -> String {
    let mut out = String::new();
    write_sexp(node, &mut out);
    out
}

fn write_sexp(node: &Node, out: &mut String) {
    let _ = write!(out, "({}", node.kind_name());
    for child in node.named_children() {
        out.push(' ');
        if let Some(field) = child.field() {
            let _ = write!(out, "{}: ", field.as_str());
        }
        write_sexp(child, out);
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::parse;

    fn edit(old: &str, start: usize, removed: usize, inserted: &str) -> (String, InputEdit) {
        let mut new = String::with_capacity(old.len() + inserted.len());
        new.push_str(old.get(..start).unwrap_or_default());
        new.push_str(inserted);
        new.push_str(old.get(start + removed..).unwrap_or_default());
        (
            new,
            InputEdit {
                start_byte: start,
                old_end_byte: start + removed,
                new_end_byte: start + inserted.len(),
            },
        )
    }

    #[test]
    fn sexp_lists_named_nodes_with_fields() {
        let tree = parse("== Title\n\ntext\n");
        assert_eq!(
            tree.to_sexp(),
            "(document (section marker: (section_marker) title: (title (inline_content (text))) \
             (paragraph content: (inline_content (text)))))"
        );
    }

    #[test]
    fn empty_input_is_a_bare_document() {
        let tree = parse("");
        assert_eq!(tree.to_sexp(), "(document)");
        assert_eq!(tree.root().byte_range(), 0..0);
    }

    #[test]
    fn text_and_location() {
        let tree = parse("a\n\n* é item\n");
        let list = tree.root().child_of_kind(NodeKind::UnorderedList);
        assert_eq!(list.map(|node| tree.text(node)), Some("* é item\n"));
        let start = list.map(|node| tree.location(node).start);
        assert_eq!(start.map(|position| (position.line, position.column)), Some((3, 1)));
    }

    #[rstest]
    #[case("= T\n\npara\n\n* a\n* b\n", 14, 0, "c")]
    #[case("para one\n\npara two\n", 0, 4, "text")]
    #[case("----\ncode\n----\n\nafter\n", 15, 0, "====\n")]
    #[case("== A\n\nx\n\n== B\n\ny\n", 15, 1, "z\n\n=== C")]
    #[case("[NOTE]\n\n====\nbody\n====\n", 8, 4, "")]
    #[case("ifdef::x[]\na\nendif::x[]\n\nlast\n", 25, 4, "endif::y[]")]
    fn reparse_matches_full_parse(
        #[case] old: &str,
        #[case] start: usize,
        #[case] removed: usize,
        #[case] inserted: &str,
    ) -> Result<(), Error> {
        let tree = parse(old);
        let (new, edit) = edit(old, start, removed, inserted);
        let reparsed = tree.reparse(&new, &edit)?;
        assert_eq!(reparsed, parse(&new));
        Ok(())
    }

    #[rstest]
    #[case(InputEdit { start_byte: 3, old_end_byte: 2, new_end_byte: 4 })]
    #[case(InputEdit { start_byte: 0, old_end_byte: 100, new_end_byte: 0 })]
    #[case(InputEdit { start_byte: 1, old_end_byte: 1, new_end_byte: 1 })]
    fn invalid_edits_are_rejected(#[case] edit: InputEdit) {
        let tree = parse("abc\n");
        assert!(matches!(
            tree.reparse("xbc\n", &edit),
            Err(Error::InvalidEdit(_))
        ));
    }
}
