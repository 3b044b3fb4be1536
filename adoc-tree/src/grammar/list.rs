//! Lists, list items, nested lists and continuations.
//!
//! A list is a run of items sharing one marker key. An item whose key differs from
//! every enclosing list opens a nested list inside the current item; a key already
//! used by an enclosing list closes the inner lists until that list is reached. A blank
//! line ends the list.

use crate::{
    grammar::{
        ParserState, ValidTokens,
        block::{BlockStart, Scope, open_children},
        inline::inline_content,
        line::{Line, tail},
        shapes::{DescriptionShape, ListItemShape, ListKind},
    },
    model::{FieldName, Node, NodeKind},
};

/// The first line of a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ItemStart {
    Item(ListItemShape),
    Description(DescriptionShape),
}

impl ItemStart {
    fn key(&self) -> &str {
        match self {
            ItemStart::Item(shape) => &shape.key,
            ItemStart::Description(shape) => &shape.key,
        }
    }

    fn kind(&self) -> ListKind {
        match self {
            ItemStart::Item(shape) => shape.kind,
            ItemStart::Description(_) => ListKind::Description,
        }
    }
}

impl ParserState<'_> {
    fn item_start(&self, line: &Line) -> Option<ItemStart> {
        match self.classify(line) {
            BlockStart::ListItem(shape) => Some(ItemStart::Item(shape)),
            BlockStart::Description(shape) => Some(ItemStart::Description(shape)),
            BlockStart::Fence(_)
            | BlockStart::Section(_)
            | BlockStart::AdmonitionBlock
            | BlockStart::MathBlock(_)
            | BlockStart::Bibliography
            | BlockStart::Conditional(_)
            | BlockStart::Endif
            | BlockStart::AttributeEntry(_)
            | BlockStart::BlockMacro
            | BlockStart::LineComment
            | BlockStart::ThematicBreak
            | BlockStart::PageBreak
            | BlockStart::Metadata
            | BlockStart::Paragraph => None,
        }
    }

    /// Parse the list whose first item starts on `line`.
    #[tracing::instrument(level = "debug", skip_all, fields(pos = line.start, key = first.key()))]
    pub(crate) fn list(
        &mut self,
        line: &Line,
        first: ItemStart,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let scope = scope.in_list();
        let kind = first.kind();
        let key = first.key().to_string();
        let mut children = open_children(metadata);
        self.list_keys.push(key.clone());

        let mut item = Some((*line, first));
        let mut next = line.start;
        while let Some((line, start)) = item.take() {
            next = self.list_item(&line, start, scope, &mut children);
            if next >= self.input.len() {
                break;
            }
            let following = Line::at(self.input, next);
            if following.is_blank(self.input) || self.stops(next, scope) {
                break;
            }
            item = self
                .item_start(&following)
                .filter(|start| start.key() == key)
                .map(|start| (following, start));
        }

        self.list_keys.pop();
        out.push(Node::branch(kind.list_node(), children, line.start));
        next
    }

    fn list_item(
        &mut self,
        line: &Line,
        start: ItemStart,
        scope: Scope,
        out: &mut Vec<Node>,
    ) -> usize {
        let mut children = Vec::new();
        let kind = match start {
            ItemStart::Item(shape) => {
                let marker_end = line.start + shape.marker_end;
                let content_start = line.start + shape.content_start;
                children.push(
                    Node::leaf(NodeKind::ListMarker, line.start, marker_end)
                        .with_field(FieldName::Marker),
                );
                children.push(Node::leaf(NodeKind::Whitespace, marker_end, content_start));
                children.extend(self.content_line(content_start, line));
                NodeKind::ListItem
            }
            ItemStart::Description(shape) => {
                let term_end = line.start + shape.term_end;
                let (marker_start, marker_end) =
                    (line.start + shape.marker.0, line.start + shape.marker.1);
                let term = inline_content(self, line.start, term_end).into_iter().collect();
                children.push(
                    Node::branch(NodeKind::Term, term, line.start).with_field(FieldName::Term),
                );
                children.push(
                    Node::leaf(NodeKind::DescriptionMarker, marker_start, marker_end)
                        .with_field(FieldName::Marker),
                );
                match shape.content_start {
                    Some(content_start) => {
                        let content_start = line.start + content_start;
                        children.push(Node::leaf(NodeKind::Whitespace, marker_end, content_start));
                        children.extend(self.content_line(content_start, line));
                    }
                    None => children.extend(tail(self.input, line, marker_end)),
                }
                NodeKind::DescriptionItem
            }
        };

        let mut next = line.end;
        while next < self.input.len() && !self.interrupts(next, scope) {
            let text_line = Line::at(self.input, next);
            children.extend(self.content_line(text_line.start, &text_line));
            next = text_line.end;
        }

        while next < self.input.len() {
            let attached = Line::at(self.input, next);
            if attached.is_blank(self.input) {
                break;
            }
            if self
                .scanner
                .peek(self.input, next, ValidTokens::LIST_CONTINUATION)
                .is_some()
            {
                next = self.continuation(&attached, scope, &mut children);
                continue;
            }
            match self.item_start(&attached) {
                Some(nested) if !self.list_keys.iter().any(|key| key == nested.key()) => {
                    next = self.nested_list(&attached, nested, scope, &mut children);
                }
                Some(_) | None => break,
            }
        }

        out.push(Node::branch(kind, children, line.start));
        next
    }

    fn nested_list(
        &mut self,
        line: &Line,
        start: ItemStart,
        scope: Scope,
        out: &mut Vec<Node>,
    ) -> usize {
        if self.too_deep(line.start) {
            return self.paragraph(line, scope, None, out);
        }
        self.depth += 1;
        let next = self.list(line, start, scope, None, out);
        self.depth -= 1;
        next
    }

    /// `+` followed by exactly one attached block.
    fn continuation(&mut self, line: &Line, scope: Scope, out: &mut Vec<Node>) -> usize {
        let marker_end = line.start + 1;
        let mut children = vec![Node::leaf(NodeKind::ListContinuation, line.start, marker_end)];
        children.extend(tail(self.input, line, marker_end));

        let mut next = line.end;
        if next < self.input.len() {
            let block_line = Line::at(self.input, next);
            let sibling_item = self
                .item_start(&block_line)
                .is_some_and(|start| self.list_keys.iter().any(|key| key == start.key()));
            if !block_line.is_blank(self.input) && !sibling_item && !self.stops(next, scope) {
                next = self.nested_block(next, scope, &mut children);
            }
        }
        out.push(Node::branch(NodeKind::ListItemContinuation, children, line.start));
        next
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::parse;

    fn sexp(input: &str) -> String {
        parse(input).to_sexp()
    }

    #[test]
    #[tracing_test::traced_test]
    fn continuation_attaches_to_item() {
        assert_eq!(
            sexp("* item\n+\npara\n"),
            "(document (unordered_list (list_item marker: (list_marker) content: (inline_content (text)) \
             (list_item_continuation (list_continuation) (paragraph content: (inline_content (text)))))))"
        );
    }

    #[test]
    fn continuation_attaches_one_block() {
        assert_eq!(
            sexp("* item\n+\n----\ncode\n----\n* next\n"),
            "(document (unordered_list (list_item marker: (list_marker) content: (inline_content (text)) \
             (list_item_continuation (list_continuation) \
             (listing_block open: (listing_open) (block_content (content_line)) close: (listing_close)))) \
             (list_item marker: (list_marker) content: (inline_content (text)))))"
        );
    }

    #[test]
    fn blank_line_splits_lists() {
        assert_eq!(
            sexp("* a\n* b\n\n* c\n"),
            "(document (unordered_list (list_item marker: (list_marker) content: (inline_content (text))) \
             (list_item marker: (list_marker) content: (inline_content (text)))) \
             (unordered_list (list_item marker: (list_marker) content: (inline_content (text)))))"
        );
    }

    #[test]
    fn nested_lists_by_marker() {
        assert_eq!(
            sexp("* a\n** b\n. c\n* d\n"),
            "(document (unordered_list \
             (list_item marker: (list_marker) content: (inline_content (text)) \
             (unordered_list (list_item marker: (list_marker) content: (inline_content (text)) \
             (ordered_list (list_item marker: (list_marker) content: (inline_content (text))))))) \
             (list_item marker: (list_marker) content: (inline_content (text)))))"
        );
    }

    #[test]
    fn multi_line_item_text() {
        assert_eq!(
            sexp("1. first\ncontinued\n2. second\n"),
            "(document (ordered_list (list_item marker: (list_marker) content: (inline_content (text)) \
             content: (inline_content (text))) \
             (list_item marker: (list_marker) content: (inline_content (text)))))"
        );
    }

    #[rstest]
    #[case(
        "CPU:: The brain\nRAM::\nMemory\n",
        "(document (description_list \
         (description_item term: (term (inline_content (text))) marker: (description_marker) content: (inline_content (text))) \
         (description_item term: (term (inline_content (text))) marker: (description_marker) content: (inline_content (text)))))"
    )]
    #[case(
        "<1> First\n<2> Second\n",
        "(document (callout_list (list_item marker: (list_marker) content: (inline_content (text))) \
         (list_item marker: (list_marker) content: (inline_content (text)))))"
    )]
    fn other_list_kinds(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sexp(input), expected);
    }

    #[test]
    fn nested_description_list() {
        assert_eq!(
            sexp("a:: one\nb::: two\n"),
            "(document (description_list (description_item term: (term (inline_content (text))) \
             marker: (description_marker) content: (inline_content (text)) \
             (description_list (description_item term: (term (inline_content (text))) \
             marker: (description_marker) content: (inline_content (text)))))))"
        );
    }

    #[test]
    fn continuation_before_sibling_is_empty() {
        assert_eq!(
            sexp("* a\n+\n* b\n"),
            "(document (unordered_list (list_item marker: (list_marker) content: (inline_content (text)) \
             (list_item_continuation (list_continuation))) \
             (list_item marker: (list_marker) content: (inline_content (text)))))"
        );
    }

    #[test]
    fn section_line_ends_list() {
        let tree = parse("= Doc\n\n* a\n== Next\n");
        assert!(tree.warnings().is_empty());
        assert!(tree.to_sexp().ends_with(
            "(section marker: (section_marker) title: (title (inline_content (text))))))"
        ));
    }
}
