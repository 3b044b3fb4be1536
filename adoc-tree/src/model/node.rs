use std::ops::Range;

use serde::Serialize;

use crate::model::{FieldName, NodeKind};

/// A node of the syntax tree.
///
/// Branches own their children exclusively and their span is exactly the span from the
/// first child's start to the last child's end. Leaves are never empty, so the leaves
/// of a tree partition the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<FieldName>,
    #[serde(rename = "startIndex")]
    start: usize,
    #[serde(rename = "endIndex")]
    end: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    pub(crate) fn leaf(kind: NodeKind, start: usize, end: usize) -> Self {
        debug_assert!(start < end, "empty {kind} leaf at {start}");
        Self {
            kind,
            field: None,
            start,
            end,
            children: Vec::new(),
        }
    }

    /// Build a branch spanning its children. An empty child list yields an empty node
    /// at `at`, which only the document root of an empty input ever is.
    pub(crate) fn branch(kind: NodeKind, children: Vec<Node>, at: usize) -> Self {
        let start = children.first().map_or(at, |child| child.start);
        let end = children.last().map_or(at, |child| child.end);
        Self {
            kind,
            field: None,
            start,
            end,
            children,
        }
    }

    #[must_use]
    pub(crate) fn with_field(mut self, field: FieldName) -> Self {
        self.field = Some(field);
        self
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The stable type name of this node.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.kind.as_str()
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        self.kind.is_named()
    }

    #[must_use]
    pub fn field(&self) -> Option<FieldName> {
        self.field
    }

    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn named_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|child| child.is_named())
    }

    #[must_use]
    pub fn child_by_field(&self, field: FieldName) -> Option<&Node> {
        self.children.iter().find(|child| child.field == Some(field))
    }

    /// Field lookup by name, e.g. `"title"`.
    #[must_use]
    pub fn child_by_field_name(&self, name: &str) -> Option<&Node> {
        FieldName::from_name(name).and_then(|field| self.child_by_field(field))
    }

    pub fn children_by_field(&self, field: FieldName) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .filter(move |child| child.field == Some(field))
    }

    #[must_use]
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|child| child.kind == kind)
    }

    /// All nodes below and including this one, in pre-order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// The leaves below this node in source order. The childless root of an empty
    /// document is not a leaf.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.descendants()
            .filter(|node| node.is_leaf() && node.start < node.end)
    }
}

/// Pre-order iterator returned by [`Node::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Node {
        Node::branch(
            NodeKind::Paragraph,
            vec![
                Node::branch(
                    NodeKind::InlineContent,
                    vec![Node::leaf(NodeKind::Text, 0, 5)],
                    0,
                )
                .with_field(FieldName::Content),
                Node::leaf(NodeKind::LineEnding, 5, 6),
            ],
            0,
        )
    }

    #[test]
    fn branch_spans_its_children() {
        let node = sample();
        assert_eq!(node.byte_range(), 0..6);
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.named_children().count(), 1);
    }

    #[test]
    fn field_lookup() {
        let node = sample();
        let content = node.child_by_field_name("content");
        assert_eq!(content.map(Node::kind), Some(NodeKind::InlineContent));
        assert!(node.child_by_field_name("title").is_none());
        assert!(node.child_by_field_name("not-a-field").is_none());
    }

    #[test]
    fn descendants_are_pre_order() {
        let node = sample();
        let kinds: Vec<_> = node.descendants().map(Node::kind_name).collect();
        assert_eq!(
            kinds,
            vec!["paragraph", "inline_content", "text", "line_ending"]
        );
        let leaves: Vec<_> = node.leaves().map(Node::byte_range).collect();
        assert_eq!(leaves, vec![0..5, 5..6]);
    }

    #[test]
    fn empty_branch_sits_at_anchor() {
        let node = Node::branch(NodeKind::Document, Vec::new(), 0);
        assert_eq!(node.byte_range(), 0..0);
        assert!(node.is_leaf());
    }
}
